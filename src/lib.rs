//! HelixDB file indexer library.
//!
//! Watches directories for file changes and turns modified files into
//! chunked, metadata-tagged documents submitted to a HelixDB backend.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod backend;
pub mod config;
pub mod error;
pub mod observability;
pub mod watcher;

pub use app::App;
pub use config::Config;
pub use error::{Error, Result};
