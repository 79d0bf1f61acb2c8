//! Core domain + application logic for the deskbot PC remote-control relay.
//!
//! This crate is intentionally framework-agnostic. Telegram and the OS key /
//! power effectors live behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod dispatch;
pub mod domain;
pub mod effector;
pub mod errors;
pub mod logging;
pub mod messaging;
pub mod panel;
pub mod relay;
pub mod security;
pub mod utils;

pub use errors::{Error, Result};
