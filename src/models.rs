//! Domain values shared by the executors, the form machines and the routes.

pub mod credentials;
pub mod token;

pub use credentials::{AccessRequest, LoginCredentials};
pub use token::SessionToken;
