//! Rotary: a terminal phone companion.
//!
//! Single Rust binary. Three screens: recent calls, a dial pad, and contacts.
//! Reads the platform's call-log and contacts stores, never writes them, and
//! places calls by handing a `tel:` URI to a configurable handler command.
//! Every sensitive action re-checks the runtime permission state first.
//!
//! See `DESIGN.md` for full architecture documentation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod logging;
pub mod model;

pub mod dialing;
pub mod permissions;
pub mod stores;

pub mod app;
pub mod screens;

pub mod demo;
