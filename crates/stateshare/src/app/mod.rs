//! Application layer orchestrating domain logic and infrastructure.

pub mod collect;
pub mod manifest;
pub mod publish;
pub mod share;
