//! Session gating: which paths are reachable with or without a session.

pub mod middleware;
pub mod table;

pub use middleware::route_guard;
pub use table::{GuardDecision, RouteClass, RouteTable, RouteTableError};
