//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route table (static, table.rs)
//!     → check_table (well-formedness)
//!     → dispatch.rs (handler id → axum MethodRouter)
//!     → axum::Router (does the actual matching)
//! ```
//!
//! # Design Decisions
//! - Routes are declared as data, compiled at startup, immutable at runtime
//! - No path matching here; axum owns that
//! - Unknown handler ids are a startup error, not a runtime 404

pub mod dispatch;
pub mod table;

pub use dispatch::{mount, HandlerRegistry};
pub use table::{check_table, HttpMethod, RouteDescriptor, RouteTableError, GLOBAL_ROUTES};
