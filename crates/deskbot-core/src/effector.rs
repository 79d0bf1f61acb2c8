use crate::Result;

/// Media keys the relay can emulate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaKey {
    PlayPause,
    VolumeDown,
    VolumeUp,
}

/// Port to the local machine's key / power effectors.
///
/// Calls are synchronous and blocking; the event loop processes one inbound
/// event at a time, so there is nothing to overlap with. Implementations live
/// in the `deskbot-effectors` adapter crate.
pub trait Effector: Send + Sync {
    fn press_key(&self, key: MediaKey) -> Result<()>;
    fn release_key(&self, key: MediaKey) -> Result<()>;
    fn hibernate(&self) -> Result<()>;
}
