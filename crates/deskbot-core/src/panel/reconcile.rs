use std::{path::PathBuf, sync::Arc};

use crate::{
    domain::{ChatId, MessageRef},
    messaging::port::PanelMessenger,
    panel::{PanelContentSpec, PanelRecord, PanelStore},
    Result,
};

/// Terminal outcome of one "(re)show panel" reconciliation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// No usable record existed; a brand-new panel was sent.
    Sent,
    /// The recorded message was edited in place (or already matched).
    Reconciled,
    /// The recorded message was stale; it was discarded and a new panel sent.
    Replaced,
}

/// The panel state machine: edit-vs-resend-vs-noop against the persisted
/// record, with staleness detected lazily through the edit call failing.
pub struct PanelReconciler {
    store: PanelStore,
    messenger: Arc<dyn PanelMessenger>,
    image_path: PathBuf,
}

impl PanelReconciler {
    pub fn new(
        store: PanelStore,
        messenger: Arc<dyn PanelMessenger>,
        image_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            store,
            messenger,
            image_path: image_path.into(),
        }
    }

    /// Make a live panel exist in `chat_id`, reusing the recorded message
    /// where possible.
    ///
    /// On `Err` no panel was sent and no record was written; the next trigger
    /// re-attempts from scratch.
    pub async fn show_panel(&self, chat_id: ChatId) -> Result<ReconcileOutcome> {
        // Resolved once, before the state machine: the existing message is
        // edited against exactly what a replacement would contain.
        let spec = PanelContentSpec::resolve(&self.image_path);

        let Some(existing) = self.store.load(chat_id) else {
            self.send_new(chat_id, &spec).await?;
            return Ok(ReconcileOutcome::Sent);
        };

        // A text message cannot be edited into a photo message or back, so a
        // shape change is stale by construction and skips the edit attempt.
        if existing.has_image != spec.image.is_some() {
            tracing::info!(
                "panel shape changed (image: {} -> {}), replacing panel in chat {chat_id:?}",
                existing.has_image,
                spec.image.is_some()
            );
            self.send_new(chat_id, &spec).await?;
            return Ok(ReconcileOutcome::Replaced);
        }

        let status = self.messenger.edit_panel(existing.message, &spec).await;
        if status.is_reconciled() {
            tracing::debug!("panel {:?} reconciled in place ({status:?})", existing.message);
            return Ok(ReconcileOutcome::Reconciled);
        }

        // Stale record: the message is gone or unreachable. Discard it and
        // fall through to the send path; the old identifiers are never reused.
        tracing::warn!("panel edit failed ({status:?}), replacing panel in chat {chat_id:?}");
        self.send_new(chat_id, &spec).await?;
        Ok(ReconcileOutcome::Replaced)
    }

    async fn send_new(&self, chat_id: ChatId, spec: &PanelContentSpec) -> Result<MessageRef> {
        let (sent, has_image) = match self.messenger.send_panel(chat_id, spec).await {
            Ok(msg) => (msg, spec.image.is_some()),
            // Single fallback path: a failed photo send is retried once as a
            // plain text panel, then we give up for this invocation.
            Err(e) if spec.image.is_some() => {
                tracing::warn!("photo panel send failed ({e}), falling back to text panel");
                let msg = self
                    .messenger
                    .send_panel(chat_id, &spec.without_image())
                    .await?;
                (msg, false)
            }
            Err(e) => return Err(e),
        };

        let record = PanelRecord {
            message: sent,
            has_image,
        };
        if let Err(e) = self.store.save(record) {
            // The in-memory panel is still live; it just won't survive restart.
            tracing::warn!("panel record not persisted: {e}");
        }
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageId;
    use crate::errors::Error;
    use crate::messaging::types::EditStatus;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct SentPanel {
        chat_id: ChatId,
        with_image: bool,
    }

    struct FakeMessenger {
        next_id: Mutex<i32>,
        sends: Mutex<Vec<SentPanel>>,
        edits: Mutex<Vec<MessageRef>>,
        edit_status: EditStatus,
        fail_image_sends: bool,
        fail_all_sends: bool,
    }

    impl FakeMessenger {
        fn new(edit_status: EditStatus) -> Self {
            Self {
                next_id: Mutex::new(100),
                sends: Mutex::new(Vec::new()),
                edits: Mutex::new(Vec::new()),
                edit_status,
                fail_image_sends: false,
                fail_all_sends: false,
            }
        }

        fn sends(&self) -> Vec<SentPanel> {
            self.sends.lock().unwrap().clone()
        }

        fn edits(&self) -> Vec<MessageRef> {
            self.edits.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PanelMessenger for FakeMessenger {
        async fn send_panel(
            &self,
            chat_id: ChatId,
            spec: &PanelContentSpec,
        ) -> Result<MessageRef> {
            if self.fail_all_sends || (self.fail_image_sends && spec.image.is_some()) {
                return Err(Error::Transport("send rejected".to_string()));
            }
            self.sends.lock().unwrap().push(SentPanel {
                chat_id,
                with_image: spec.image.is_some(),
            });
            let mut id = self.next_id.lock().unwrap();
            *id += 1;
            Ok(MessageRef {
                chat_id,
                message_id: MessageId(*id),
            })
        }

        async fn edit_panel(&self, msg: MessageRef, _spec: &PanelContentSpec) -> EditStatus {
            self.edits.lock().unwrap().push(msg);
            self.edit_status.clone()
        }

        async fn answer_callback(&self, _callback_id: &str) -> Result<()> {
            Ok(())
        }
    }

    fn tmp_store(tag: &str) -> PanelStore {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        PanelStore::new(format!(
            "/tmp/deskbot-reconcile-{tag}-{}-{ts}.json",
            std::process::id()
        ))
    }

    fn text_record(chat: i64, id: i32) -> PanelRecord {
        PanelRecord {
            message: MessageRef {
                chat_id: ChatId(chat),
                message_id: MessageId(id),
            },
            has_image: false,
        }
    }

    const NO_IMAGE: &str = "/nonexistent/deskbot-panel.jpg";

    fn reconciler(
        store: &PanelStore,
        messenger: Arc<FakeMessenger>,
        image_path: &str,
    ) -> PanelReconciler {
        PanelReconciler::new(store.clone(), messenger, image_path)
    }

    #[tokio::test]
    async fn no_record_sends_new_panel_and_persists() {
        let store = tmp_store("fresh");
        let messenger = Arc::new(FakeMessenger::new(EditStatus::Edited));
        let rec = reconciler(&store, messenger.clone(), NO_IMAGE);

        let out = rec.show_panel(ChatId(1)).await.unwrap();
        assert_eq!(out, ReconcileOutcome::Sent);
        assert_eq!(messenger.sends().len(), 1);
        assert!(messenger.edits().is_empty());

        let saved = store.load(ChatId(1)).expect("record persisted");
        assert_eq!(saved.message.chat_id, ChatId(1));
        assert!(!saved.has_image);
        let _ = std::fs::remove_file(store.path());
    }

    #[tokio::test]
    async fn unchanged_panel_is_a_noop_edit() {
        let store = tmp_store("noop");
        let live = text_record(1, 42);
        store.save(live).unwrap();

        let messenger = Arc::new(FakeMessenger::new(EditStatus::NotModified));
        let rec = reconciler(&store, messenger.clone(), NO_IMAGE);

        // Two triggers in a row: both reconcile in place, nothing is resent.
        for _ in 0..2 {
            let out = rec.show_panel(ChatId(1)).await.unwrap();
            assert_eq!(out, ReconcileOutcome::Reconciled);
        }
        assert!(messenger.sends().is_empty());
        assert_eq!(messenger.edits(), vec![live.message, live.message]);
        assert_eq!(store.load(ChatId(1)), Some(live));
        let _ = std::fs::remove_file(store.path());
    }

    #[tokio::test]
    async fn stale_record_is_replaced_and_old_id_never_reused() {
        let store = tmp_store("stale");
        let stale = text_record(1, 42);
        store.save(stale).unwrap();

        let messenger = Arc::new(FakeMessenger::new(EditStatus::NotFound));
        let rec = reconciler(&store, messenger.clone(), NO_IMAGE);

        let out = rec.show_panel(ChatId(1)).await.unwrap();
        assert_eq!(out, ReconcileOutcome::Replaced);
        assert_eq!(messenger.edits(), vec![stale.message]);
        assert_eq!(messenger.sends().len(), 1);

        let saved = store.load(ChatId(1)).unwrap();
        assert_ne!(saved.message.message_id, stale.message.message_id);
        let _ = std::fs::remove_file(store.path());
    }

    #[tokio::test]
    async fn transport_edit_failure_also_replaces() {
        let store = tmp_store("transport");
        store.save(text_record(1, 42)).unwrap();

        let messenger = Arc::new(FakeMessenger::new(EditStatus::Transport(
            "chat unreachable".to_string(),
        )));
        let rec = reconciler(&store, messenger.clone(), NO_IMAGE);

        let out = rec.show_panel(ChatId(1)).await.unwrap();
        assert_eq!(out, ReconcileOutcome::Replaced);
        assert_eq!(messenger.sends().len(), 1);
        let _ = std::fs::remove_file(store.path());
    }

    #[tokio::test]
    async fn text_panel_gains_image_through_replacement() {
        // Last run sent a text panel; the image file appeared since. The text
        // message cannot become a photo message by editing, so the panel must
        // be replaced, not declared reconciled.
        let store = tmp_store("gains-image");
        let old = text_record(1, 42);
        store.save(old).unwrap();

        let image = std::env::temp_dir().join(format!(
            "deskbot-gains-{}-{}.jpg",
            std::process::id(),
            line!()
        ));
        std::fs::write(&image, b"jpg").unwrap();

        let messenger = Arc::new(FakeMessenger::new(EditStatus::Edited));
        let rec = reconciler(&store, messenger.clone(), image.to_str().unwrap());

        let out = rec.show_panel(ChatId(1)).await.unwrap();
        assert_eq!(out, ReconcileOutcome::Replaced);
        // No edit attempt: a markup-only edit would "succeed" on the old text
        // message and leave the panel imageless forever.
        assert!(messenger.edits().is_empty());
        let sends = messenger.sends();
        assert_eq!(sends.len(), 1);
        assert!(sends[0].with_image);

        let saved = store.load(ChatId(1)).unwrap();
        assert!(saved.has_image);
        assert_ne!(saved.message.message_id, old.message.message_id);

        let _ = std::fs::remove_file(&image);
        let _ = std::fs::remove_file(store.path());
    }

    #[tokio::test]
    async fn photo_panel_loses_image_through_replacement() {
        let store = tmp_store("loses-image");
        let old = PanelRecord {
            has_image: true,
            ..text_record(1, 42)
        };
        store.save(old).unwrap();

        let messenger = Arc::new(FakeMessenger::new(EditStatus::Edited));
        let rec = reconciler(&store, messenger.clone(), NO_IMAGE);

        let out = rec.show_panel(ChatId(1)).await.unwrap();
        assert_eq!(out, ReconcileOutcome::Replaced);
        assert!(messenger.edits().is_empty());
        let sends = messenger.sends();
        assert_eq!(sends.len(), 1);
        assert!(!sends[0].with_image);
        assert!(!store.load(ChatId(1)).unwrap().has_image);
        let _ = std::fs::remove_file(store.path());
    }

    #[tokio::test]
    async fn record_for_another_chat_is_left_untouched() {
        let store = tmp_store("isolation");
        let c1 = text_record(1, 42);
        store.save(c1).unwrap();

        let messenger = Arc::new(FakeMessenger::new(EditStatus::Edited));
        let rec = reconciler(&store, messenger.clone(), NO_IMAGE);

        // Chat 2 has no record, so this is a plain send; chat 1's record must
        // not be read, edited, or overwritten by it.
        let out = rec.show_panel(ChatId(2)).await.unwrap();
        assert_eq!(out, ReconcileOutcome::Sent);
        assert!(messenger.edits().is_empty());
        assert_eq!(store.load(ChatId(1)), Some(c1));
        assert!(store.load(ChatId(2)).is_some());
        let _ = std::fs::remove_file(store.path());
    }

    #[tokio::test]
    async fn failed_photo_send_falls_back_to_text_once() {
        let store = tmp_store("fallback");
        let image = std::env::temp_dir().join(format!(
            "deskbot-fallback-{}-{}.jpg",
            std::process::id(),
            line!()
        ));
        std::fs::write(&image, b"jpg").unwrap();

        let mut messenger = FakeMessenger::new(EditStatus::Edited);
        messenger.fail_image_sends = true;
        let messenger = Arc::new(messenger);
        let rec = reconciler(&store, messenger.clone(), image.to_str().unwrap());

        let out = rec.show_panel(ChatId(1)).await.unwrap();
        assert_eq!(out, ReconcileOutcome::Sent);
        let sends = messenger.sends();
        assert_eq!(sends.len(), 1);
        assert!(!sends[0].with_image);
        // The record reflects what was actually sent, not what was attempted,
        // so the next run with the image restored goes down the replace path.
        assert!(!store.load(ChatId(1)).unwrap().has_image);

        let _ = std::fs::remove_file(&image);
        let _ = std::fs::remove_file(store.path());
    }

    #[tokio::test]
    async fn total_send_failure_leaves_no_record() {
        let store = tmp_store("failure");
        let mut messenger = FakeMessenger::new(EditStatus::Edited);
        messenger.fail_all_sends = true;
        let messenger = Arc::new(messenger);
        let rec = reconciler(&store, messenger.clone(), NO_IMAGE);

        let err = rec.show_panel(ChatId(1)).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(store.load(ChatId(1)), None);
    }
}
