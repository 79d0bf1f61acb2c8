use crate::{
    effector::{Effector, MediaKey},
    Result,
};

/// One volume key press rounds to a negligible change on most systems, so
/// volume commands fire this many press+release cycles back to back.
pub const VOLUME_KEY_REPEATS: usize = 5;

/// The closed set of commands the panel's buttons can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Hibernate,
    PlayPause,
    VolumeDown,
    VolumeUp,
}

impl Command {
    /// Parse inline-button callback data. Unknown tokens are ignored upstream.
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "hibernate" => Some(Self::Hibernate),
            "play_pause" => Some(Self::PlayPause),
            "volume_down" => Some(Self::VolumeDown),
            "volume_up" => Some(Self::VolumeUp),
            _ => None,
        }
    }

    pub fn callback_data(&self) -> &'static str {
        match self {
            Self::Hibernate => "hibernate",
            Self::PlayPause => "play_pause",
            Self::VolumeDown => "volume_down",
            Self::VolumeUp => "volume_up",
        }
    }
}

/// Route one command to its effector calls.
///
/// No retry: a failed call stops the whole dispatch immediately. For volume
/// commands that means a partial volume change may already have happened;
/// that is accepted, not rolled back.
pub fn dispatch(command: Command, effector: &dyn Effector) -> Result<()> {
    match command {
        Command::Hibernate => effector.hibernate(),
        Command::PlayPause => tap(effector, MediaKey::PlayPause),
        Command::VolumeDown => tap_repeated(effector, MediaKey::VolumeDown, VOLUME_KEY_REPEATS),
        Command::VolumeUp => tap_repeated(effector, MediaKey::VolumeUp, VOLUME_KEY_REPEATS),
    }
}

fn tap(effector: &dyn Effector, key: MediaKey) -> Result<()> {
    effector.press_key(key)?;
    effector.release_key(key)
}

fn tap_repeated(effector: &dyn Effector, key: MediaKey, times: usize) -> Result<()> {
    for _ in 0..times {
        tap(effector, key)?;
    }
    Ok(())
}
