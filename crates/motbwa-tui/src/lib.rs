//! Terminal UI for motbwa
//!
//! A thin shell over [`motbwa_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`motbwa_app::Runtime`].
//!
//! This crate handles terminal rendering, command-line configuration and
//! logging setup.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
mod error;
pub mod terminal;
pub mod ui;

pub use config::{Args, init_logging};
pub use error::TuiError;
pub use motbwa_app::{App, AppAction, AppEvent, Driver, KeyInput, Runtime};
pub use terminal::TerminalDriver;
