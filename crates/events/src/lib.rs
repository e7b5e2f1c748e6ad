//! Outbound notification delivery for CollabSpace.
//!
//! Notifications are stored by the API layer; this crate turns a stored
//! notification into an email and sends it over SMTP. Delivery is optional:
//! when SMTP is not configured no [`EmailDelivery`] is constructed.

pub mod email;

pub use email::{EmailConfig, EmailDelivery, EmailError, OutgoingEmail};
