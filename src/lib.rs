//! Library crate for user-console.
//!
//! This crate exposes the building blocks of the TUI:
//! - REST client for the users resource (`api`)
//! - Command-line and environment configuration (`config`)
//! - Prompt-and-wait dialog contract (`dialog`)
//! - Console state, flows and the event loop (`app`)
//! - Error and result types (`error`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `user-console` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod config;
pub mod dialog;
pub mod error;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
