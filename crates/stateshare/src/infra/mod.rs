//! Infrastructure adapters for config files and the OS clipboard.

pub mod clipboard;
pub mod config;
