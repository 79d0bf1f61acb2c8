use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    domain::{ChatId, MessageRef},
    Result,
};

/// The persisted panel record for one chat: the message identifiers plus the
/// shape the message was sent with.
///
/// `has_image` matters because a photo message and a text message cannot be
/// edited into each other in place; the reconciler compares it against the
/// resolved content spec to detect shape changes between runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelRecord {
    pub message: MessageRef,
    pub has_image: bool,
}

/// One panel record per authorized chat, in a single human-readable JSON file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct PanelStateFile {
    panels: Vec<PanelRecord>,
}

/// Durable store for the last-sent panel message per chat.
///
/// Reads fail soft: a missing or malformed file means "no panel sent yet",
/// never a fatal error. Writes are best-effort; a failed write only costs
/// durability across the next restart.
#[derive(Clone, Debug)]
pub struct PanelStore {
    path: PathBuf,
}

impl PanelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The persisted panel record for `chat_id`, if one exists.
    ///
    /// `None` is the `NO_PANEL` state: no file, unreadable file, or no entry
    /// for this chat. Records for other chats are ignored here, never
    /// reconciled against the wrong conversation.
    pub fn load(&self, chat_id: ChatId) -> Option<PanelRecord> {
        self.read_state()
            .panels
            .into_iter()
            .find(|p| p.message.chat_id == chat_id)
    }

    /// Upsert the record for `record.message.chat_id`, leaving other chats'
    /// records untouched.
    pub fn save(&self, record: PanelRecord) -> Result<()> {
        let mut state = self.read_state();
        match state
            .panels
            .iter_mut()
            .find(|p| p.message.chat_id == record.message.chat_id)
        {
            Some(existing) => *existing = record,
            None => state.panels.push(record),
        }

        let txt = serde_json::to_string_pretty(&state)?;
        std::fs::write(&self.path, txt)?;
        Ok(())
    }

    fn read_state(&self) -> PanelStateFile {
        if !self.path.exists() {
            return PanelStateFile::default();
        }
        let txt = match std::fs::read_to_string(&self.path) {
            Ok(txt) => txt,
            Err(e) => {
                tracing::warn!("panel state file unreadable, treating as empty: {e}");
                return PanelStateFile::default();
            }
        };
        if txt.trim().is_empty() {
            return PanelStateFile::default();
        }
        match serde_json::from_str(&txt) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!("panel state file malformed, treating as empty: {e}");
                PanelStateFile::default()
            }
        }
    }
}
