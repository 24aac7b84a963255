pub mod access_executor;
pub mod base;
pub mod login_executor;

// Re-export so we can do "use crate::executors::*;"
pub use access_executor::{AccessExecutor, ACCESS_FAILED_MESSAGE};
pub use base::{
    ErrorOrigin, Executor, ExecutorError, FieldErrors, IdentityClient,
    PROTOCOL_ERROR_MESSAGE, UNKNOWN_ERROR_MESSAGE,
};
pub use login_executor::{LoginExecutor, LOGIN_FAILED_MESSAGE};
