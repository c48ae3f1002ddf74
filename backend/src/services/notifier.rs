use reqwest::Client;
use serde_json::json;
use shared::shared_wheel_game::{PrizeDefinition, SpinRecord};
use tracing::{error, info};

/// Fire-and-forget webhook announcements. A failed post is logged and
/// otherwise ignored: the spin it describes is already final.
#[derive(Clone)]
pub struct Notifier {
    client: Client,
    webhook_url: Option<String>,
    announce_all: bool,
}

impl Notifier {
    pub fn new(webhook_url: Option<String>, announce_all: bool) -> Self {
        Self {
            client: Client::new(),
            webhook_url,
            announce_all,
        }
    }

    pub fn should_announce(&self, record: &SpinRecord) -> bool {
        self.webhook_url.is_some() && (self.announce_all || record.is_rare)
    }

    pub fn notify_spin(&self, record: &SpinRecord, prize: &PrizeDefinition) {
        if !self.should_announce(record) {
            return;
        }
        let Some(url) = self.webhook_url.clone() else {
            return;
        };

        let client = self.client.clone();
        let content = spin_message(record, prize);
        let player_id = record.player_id.clone();

        tokio::spawn(async move {
            match client.post(&url).json(&json!({ "content": content })).send().await {
                Ok(response) if response.status().is_success() => {
                    info!("Announced wheel spin for {}", player_id);
                }
                Ok(response) => {
                    error!("Wheel webhook rejected announcement for {}: {}", player_id, response.status());
                }
                Err(e) => {
                    error!("Wheel webhook failed for {}: {}", player_id, e);
                }
            }
        });
    }
}

pub fn spin_message(record: &SpinRecord, prize: &PrizeDefinition) -> String {
    if record.is_rare {
        format!("🎡 {} hit a rare prize on the wheel: {} ({})", record.player_id, prize.label, prize.id)
    } else {
        format!("🎡 {} won {} ({}) on the wheel", record.player_id, prize.label, prize.id)
    }
}
