use std::sync::Arc;

use deskbot_core::{config::Config, effector::Effector};
use deskbot_effectors::OsEffector;

#[tokio::main]
async fn main() -> Result<(), deskbot_core::Error> {
    deskbot_core::logging::init("deskbot")?;

    let cfg = Arc::new(Config::load()?);
    let effector: Arc<dyn Effector> = Arc::new(OsEffector::new());

    deskbot_telegram::router::run_polling(cfg, effector)
        .await
        .map_err(|e| deskbot_core::Error::Transport(format!("telegram bot failed: {e}")))?;

    Ok(())
}
