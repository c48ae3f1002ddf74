use tracing::{Event, Subscriber};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{layer::Context, EnvFilter, Layer, Registry};

#[derive(Default)]
struct MessageVisitor {
    message: String,
    /// Set for records bridged from the `log` facade, whose own target is "log".
    log_target: Option<String>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "message" => self.message.push_str(&format!("{:?}", value)),
            "log.target" => self.log_target = Some(format!("{:?}", value).trim_matches('"').to_string()),
            name if name.starts_with("log.") => {}
            name => self.message.push_str(&format!(" {}={:?}", name, value)),
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        match field.name() {
            "message" => self.message.push_str(value),
            "log.target" => self.log_target = Some(value.to_string()),
            name if name.starts_with("log.") => {}
            name => self.message.push_str(&format!(" {}={}", name, value)),
        }
    }
}

/// Debug output is limited to the wheel engine and the wheel routes.
fn is_wheel_target(target: &str) -> bool {
    target.starts_with("shared::shared_wheel_game") || target.starts_with("wheel_server::games")
}

struct WheelLogLayer;

impl<S: Subscriber> Layer<S> for WheelLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let target = visitor.log_target.as_deref().unwrap_or(metadata.target());

        // Connection chatter from the redis and http clients.
        if target.starts_with("hyper") || target.starts_with("reqwest") {
            return;
        }

        if !visitor.message.is_empty() {
            let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");

            match metadata.level().as_str() {
                "ERROR" => println!("[{}] ❌ Error: {} - {}", timestamp, target, visitor.message),
                "WARN" => println!("[{}] ⚠️ Warning: {} - {}", timestamp, target, visitor.message),
                "INFO" => println!("[{}] ℹ️ {} - {}", timestamp, target, visitor.message),
                "DEBUG" => {
                    if is_wheel_target(target) {
                        println!("[{}] 🔄 {} - {}", timestamp, target, visitor.message);
                    }
                },
                _ => {}
            }
        }
    }
}

pub fn setup() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,wheel_server=info"));

    // `init` also bridges `log` records, which is how the wheel engine reports.
    Registry::default()
        .with(env_filter)
        .with(WheelLogLayer)
        .init();
}
