//! Form validation and submission control for the employee-document registry.
//!
//! A [`FormController`] ties together per-field [`validation`] rules, an
//! [`ErrorRegistry`] of active field errors, and a [`SubmissionState`]
//! machine. UI bindings feed it values and events and render whatever it
//! reports; nothing in this crate touches a DOM, terminal, or network.
//!
//! # Example
//!
//! ```
//! use docreg_forms::catalog;
//!
//! let form = catalog::login_form();
//! form.set_value("email", "ana");
//!
//! assert!(!form.validate_all());
//! assert_eq!(form.first_invalid_field().as_deref(), Some("email"));
//! ```

pub mod address;
pub mod catalog;
pub mod error;
pub mod validation;

mod announce;
mod controller;
mod registry;
mod response;
mod snapshot;
mod submission;

pub use announce::{Announcement, Priority};
pub use controller::FormController;
pub use error::{BackendError, SubmitError, TransportError};
pub use registry::ErrorRegistry;
pub use response::Response;
pub use snapshot::FormSnapshot;
pub use submission::{SubmissionEvent, SubmissionMachine, SubmissionState, next_state};
