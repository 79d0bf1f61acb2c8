//! OS effector adapter.
//!
//! Implements the `deskbot-core` Effector port against the local machine:
//! media-key emulation plus hibernation. On Windows this goes through
//! `keybd_event` and `powrprof.dll`; elsewhere it shells out to `xdotool`
//! and `systemctl` so the relay stays usable on a Linux desktop.

use deskbot_core::{
    effector::{Effector, MediaKey},
    errors::Error,
    Result,
};

/// Effector backed by the host OS.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsEffector;

impl OsEffector {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(windows)]
mod imp {
    use super::*;

    const VK_MEDIA_PLAY_PAUSE: u8 = 0xB3;
    const VK_VOLUME_DOWN: u8 = 0xAE;
    const VK_VOLUME_UP: u8 = 0xAF;

    const KEYEVENTF_KEYUP: u32 = 0x0002;

    #[link(name = "user32")]
    extern "system" {
        fn keybd_event(b_vk: u8, b_scan: u8, dw_flags: u32, dw_extra_info: usize);
    }

    fn vk_code(key: MediaKey) -> u8 {
        match key {
            MediaKey::PlayPause => VK_MEDIA_PLAY_PAUSE,
            MediaKey::VolumeDown => VK_VOLUME_DOWN,
            MediaKey::VolumeUp => VK_VOLUME_UP,
        }
    }

    pub fn press_key(key: MediaKey) -> Result<()> {
        unsafe { keybd_event(vk_code(key), 0, 0, 0) };
        Ok(())
    }

    pub fn release_key(key: MediaKey) -> Result<()> {
        unsafe { keybd_event(vk_code(key), 0, KEYEVENTF_KEYUP, 0) };
        Ok(())
    }

    pub fn hibernate() -> Result<()> {
        run_checked(
            std::process::Command::new("rundll32.exe")
                .args(["powrprof.dll,SetSuspendState", "0,1,0"]),
        )
    }
}

#[cfg(not(windows))]
mod imp {
    use super::*;

    fn key_name(key: MediaKey) -> &'static str {
        match key {
            MediaKey::PlayPause => "XF86AudioPlay",
            MediaKey::VolumeDown => "XF86AudioLowerVolume",
            MediaKey::VolumeUp => "XF86AudioRaiseVolume",
        }
    }

    pub fn press_key(key: MediaKey) -> Result<()> {
        run_checked(std::process::Command::new("xdotool").args(["keydown", key_name(key)]))
    }

    pub fn release_key(key: MediaKey) -> Result<()> {
        run_checked(std::process::Command::new("xdotool").args(["keyup", key_name(key)]))
    }

    pub fn hibernate() -> Result<()> {
        run_checked(std::process::Command::new("systemctl").arg("hibernate"))
    }
}

fn run_checked(cmd: &mut std::process::Command) -> Result<()> {
    let status = cmd
        .status()
        .map_err(|e| Error::Effector(format!("failed to spawn {:?}: {e}", cmd.get_program())))?;
    if !status.success() {
        return Err(Error::Effector(format!(
            "{:?} exited with {status}",
            cmd.get_program()
        )));
    }
    Ok(())
}

impl Effector for OsEffector {
    fn press_key(&self, key: MediaKey) -> Result<()> {
        imp::press_key(key)
    }

    fn release_key(&self, key: MediaKey) -> Result<()> {
        imp::release_key(key)
    }

    fn hibernate(&self) -> Result<()> {
        tracing::info!("invoking system hibernate");
        imp::hibernate()
    }
}
