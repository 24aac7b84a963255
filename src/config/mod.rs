// This module re-exports important pieces for convenience,
// so we can "use crate::config::*" easily.
pub mod forms;
pub mod identity;
pub mod logging;
pub mod routes;
pub mod session;
pub mod types;

pub use forms::*;
pub use identity::*;
pub use logging::*;
pub use routes::*;
pub use session::*;
pub use types::*;
