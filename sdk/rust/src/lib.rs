//! Client for the pricing gate HTTP API.

pub mod client;

pub use client::{GateClient, GateError, GlobalEntry, PricingStatus, SyncRequest, SyncResponse};
