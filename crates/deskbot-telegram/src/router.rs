use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use deskbot_core::{
    config::Config,
    effector::Effector,
    messaging::port::PanelMessenger,
    panel::{PanelReconciler, PanelStore},
    relay::Relay,
    utils::AuditLogger,
};

use crate::handlers;
use crate::TelegramMessenger;

pub async fn run_polling(cfg: Arc<Config>, effector: Arc<dyn Effector>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    // Basic startup info.
    if let Ok(me) = bot.get_me().await {
        tracing::info!("deskbot started: @{}", me.username());
    }
    tracing::info!("allowed users: {}", cfg.telegram_allowed_users.len());
    tracing::info!("panel state file: {}", cfg.panel_state_file.display());

    let messenger: Arc<dyn PanelMessenger> = Arc::new(TelegramMessenger::new(bot.clone()));
    let store = PanelStore::new(cfg.panel_state_file.clone());
    let reconciler = PanelReconciler::new(store, messenger.clone(), cfg.panel_image_path.clone());
    let audit = Arc::new(AuditLogger::new(
        cfg.audit_log_path.clone(),
        cfg.audit_log_json,
    ));

    let relay = Arc::new(Relay::new(
        cfg.telegram_allowed_users.clone(),
        messenger,
        effector,
        reconciler,
        audit,
    ));

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    // Ctrl-C / SIGTERM stops polling after the in-flight update finishes.
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![relay])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("deskbot shutting down");
    Ok(())
}
