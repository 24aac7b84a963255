//! Form submission state machines and the registry of live form instances.

pub mod machine;
pub mod registry;
pub mod state;

pub use machine::FormMachine;
pub use registry::{parse_form_id, FormRegistry};
pub use state::{FailureKind, FormError, FormState, SubmitOutcome};
