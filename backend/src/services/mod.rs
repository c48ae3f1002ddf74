pub mod history_store;
pub mod notifier;
