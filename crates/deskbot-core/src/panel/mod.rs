//! Panel lifecycle: content spec, persisted record, reconciliation.

mod record;
mod reconcile;

pub use record::{PanelRecord, PanelStore};
pub use reconcile::{PanelReconciler, ReconcileOutcome};

use std::path::{Path, PathBuf};

use crate::messaging::types::{InlineButton, InlineKeyboard};

pub const PANEL_CAPTION: &str = "PC control panel";

/// The desired content of the control panel message.
///
/// Caption and keyboard are compile-time constants of the system; only the
/// image attachment varies, and only between runs of the reconciler.
#[derive(Clone, Debug)]
pub struct PanelContentSpec {
    pub caption: String,
    pub keyboard: InlineKeyboard,
    pub image: Option<PathBuf>,
}

impl PanelContentSpec {
    /// Resolve the content spec for one reconciliation attempt.
    ///
    /// The image is probed here, once, before the state machine runs; it is
    /// never cached across invocations, so adding or removing the file
    /// between runs changes the next panel's shape.
    pub fn resolve(image_path: &Path) -> Self {
        let image = image_path.is_file().then(|| image_path.to_path_buf());
        Self {
            caption: PANEL_CAPTION.to_string(),
            keyboard: panel_keyboard(),
            image,
        }
    }

    /// The same panel without its image attachment (the send fallback).
    pub fn without_image(&self) -> Self {
        Self {
            caption: self.caption.clone(),
            keyboard: self.keyboard.clone(),
            image: None,
        }
    }
}

fn panel_keyboard() -> InlineKeyboard {
    InlineKeyboard {
        rows: vec![
            vec![InlineButton::new("\u{1F4A4}", "hibernate")],
            vec![
                InlineButton::new("\u{23EF}\u{FE0F}", "play_pause"),
                InlineButton::new("\u{1F509}", "volume_down"),
                InlineButton::new("\u{1F50A}", "volume_up"),
            ],
        ],
    }
}
