//! Contact form: validation, primary delivery, and the `mailto:` fallback.
//!
//! SYSTEM CONTEXT
//! ==============
//! `controller` owns the form lifecycle; `field`, `fallback`, and `status` are
//! pure helpers it composes, and `delivery` is the network seam.

pub mod controller;
pub mod delivery;
pub mod fallback;
pub mod field;
pub mod status;

pub use controller::{FormHandlers, FormSubmissionController, FormSurface, Outcome, SubmissionAttempt, SubmitRejected};
pub use delivery::{Delivery, DeliveryError, DeliveryRequest, HttpDelivery};
