//! Artifact store endpoints.

pub mod list;
pub mod read;
