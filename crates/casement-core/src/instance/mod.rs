//! Single-instance enforcement.
//!
//! The first process to lock `<runtime_dir>/casement.lock` becomes the
//! primary instance. Later launches forward their argv and cwd over
//! `<runtime_dir>/instance.sock` and exit.

pub mod activation;
pub mod errors;
pub mod guard;

pub use activation::{Activation, ActivationCallback};
pub use errors::InstanceError;
pub use guard::{SingleInstanceGuard, read_holder_pid};
