//! Payment processing for the fulfillment system.
//!
//! Models the gateway interaction behind order payment: a payment starts
//! `pending`, moves to `completed` or `failed` via [`PaymentProcessor::process`],
//! and a completed payment can be `refunded`. Gateway outcome is drawn from
//! an injectable [`PaymentGateway`] so tests can pin it; the production
//! [`SimulatedGateway`] approves with probability 3/4, making failure a
//! normal, expected outcome rather than an exception.

pub mod error;
pub mod gateway;
pub mod processor;
pub mod status;

pub use error::PaymentError;
pub use gateway::{FixedGateway, PaymentGateway, SimulatedGateway};
pub use processor::{Payment, PaymentProcessor};
pub use status::PaymentStatus;
