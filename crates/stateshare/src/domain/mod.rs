//! Core types shared by the collector and the clipboard publisher.

pub mod errors;
pub mod model;
