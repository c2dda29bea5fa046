//! Terminal launcher for an external mosh protocol engine.
//!
//! The launcher collects connection parameters, puts the local terminal in raw
//! mode and relays keystrokes, resizes and display output between it and the
//! engine process.

pub mod cli;
pub mod models;
pub mod services;
pub mod state;
pub mod ui;
pub mod utils;
