use std::sync::Arc;

use crate::{
    dispatch::{dispatch, Command},
    effector::Effector,
    messaging::{
        port::PanelMessenger,
        types::{CallbackEvent, CommandMessage, IncomingUpdate, TextMessage},
    },
    panel::PanelReconciler,
    security::is_authorized,
    utils::{AuditEvent, AuditLogger},
};

/// The event-loop body: routes one inbound update through the authorization
/// gate into the action dispatcher or the panel reconciler.
///
/// All failures are recovered locally (logged and audited); handling an
/// update never aborts the loop.
pub struct Relay {
    allowed_users: Vec<i64>,
    messenger: Arc<dyn PanelMessenger>,
    effector: Arc<dyn Effector>,
    reconciler: PanelReconciler,
    audit: Arc<AuditLogger>,
    // Updates are handled strictly in arrival order; the transport layer may
    // deliver them from concurrent tasks. Tokio's mutex is FIFO-fair.
    serial: tokio::sync::Mutex<()>,
}

impl Relay {
    pub fn new(
        allowed_users: Vec<i64>,
        messenger: Arc<dyn PanelMessenger>,
        effector: Arc<dyn Effector>,
        reconciler: PanelReconciler,
        audit: Arc<AuditLogger>,
    ) -> Self {
        Self {
            allowed_users,
            messenger,
            effector,
            reconciler,
            audit,
            serial: tokio::sync::Mutex::new(()),
        }
    }

    pub async fn handle_update(&self, update: IncomingUpdate) {
        let _guard = self.serial.lock().await;
        match update {
            IncomingUpdate::Callback(cb) => self.handle_callback(cb).await,
            IncomingUpdate::Command(cmd) => self.handle_command(cmd).await,
            IncomingUpdate::Text(txt) => self.handle_text(txt),
        }
    }

    async fn handle_callback(&self, cb: CallbackEvent) {
        // The transport expects every callback query to be acknowledged,
        // before and regardless of the authorization outcome.
        if let Err(e) = self.messenger.answer_callback(&cb.callback_id).await {
            tracing::warn!("failed to answer callback query: {e}");
        }

        let username = cb.username.as_deref().unwrap_or("unknown");
        if !is_authorized(Some(cb.user_id), &self.allowed_users) {
            tracing::warn!("unauthorized callback from user {}", cb.user_id.0);
            self.audit_write(AuditEvent::auth(cb.user_id.0, username, false));
            return;
        }

        let Some(command) = Command::parse(&cb.data) else {
            tracing::debug!("ignoring unknown callback data: {:?}", cb.data);
            return;
        };

        match dispatch(command, self.effector.as_ref()) {
            Ok(()) => {
                tracing::info!("command {command:?} executed");
                self.audit_write(AuditEvent::command(
                    cb.user_id.0,
                    username,
                    command.callback_data(),
                    "ok",
                ));
            }
            Err(e) => {
                // The event still counts as handled; no retry, no requeue.
                tracing::warn!("command {command:?} failed: {e}");
                self.audit_write(AuditEvent::command(
                    cb.user_id.0,
                    username,
                    command.callback_data(),
                    "failed",
                ));
            }
        }
    }

    async fn handle_command(&self, cmd: CommandMessage) {
        let username = cmd.username.as_deref().unwrap_or("unknown");
        let user_id = cmd.user_id.map(|u| u.0).unwrap_or_default();
        if !is_authorized(cmd.user_id, &self.allowed_users) {
            tracing::warn!("unauthorized /{} from user {user_id}", cmd.name);
            self.audit_write(AuditEvent::auth(user_id, username, false));
            return;
        }

        if cmd.name != "start" {
            tracing::debug!("ignoring unknown command /{}", cmd.name);
            return;
        }

        match self.reconciler.show_panel(cmd.chat_id).await {
            Ok(outcome) => {
                tracing::info!("panel shown in chat {:?}: {outcome:?}", cmd.chat_id);
                self.audit_write(AuditEvent::panel(
                    user_id,
                    username,
                    &format!("{outcome:?}").to_lowercase(),
                ));
            }
            Err(e) => {
                tracing::warn!("panel could not be shown in chat {:?}: {e}", cmd.chat_id);
                self.audit_write(AuditEvent::error(user_id, username, &e.to_string(), Some("panel")));
            }
        }
    }

    fn handle_text(&self, txt: TextMessage) {
        let username = txt.username.as_deref().unwrap_or("unknown");
        let user_id = txt.user_id.map(|u| u.0).unwrap_or_default();
        if !is_authorized(txt.user_id, &self.allowed_users) {
            tracing::warn!("unauthorized message from user {user_id}");
            self.audit_write(AuditEvent::auth(user_id, username, false));
            return;
        }

        // The relay has no free-text features; authorized chatter is ignored.
        tracing::debug!("ignoring text message from user {user_id}");
    }

    fn audit_write(&self, event: AuditEvent) {
        if let Err(e) = self.audit.write(event) {
            tracing::warn!("audit write failed: {e}");
        }
    }
}
