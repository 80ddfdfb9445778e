//! CMS "global" single type.
//!
//! One entry per locale, held in memory. Reached through the route table
//! (`global.find`, `global.sync`).

pub mod global;
pub mod handlers;

pub use global::{GlobalEntry, GlobalStore};
