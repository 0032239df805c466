//! CLI command implementations

pub mod inspect;
#[cfg(feature = "server")]
pub mod serve;
