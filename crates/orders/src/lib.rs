//! Order orchestration for the fulfillment system.
//!
//! The orchestrator drives an order through creation, stock commitment,
//! payment, and cancellation using only synchronous calls to its
//! collaborators. There is no persisted saga log: each step's failure is
//! handled at the call site, and the stock-commit and stock-restore steps
//! are deliberately best-effort (logged, never retried). See
//! [`OrderOrchestrator`] for the exact windows this leaves open.

pub mod clients;
pub mod error;
pub mod orchestrator;
pub mod status;
pub mod store;

pub use clients::{
    ClientError, InMemoryPaymentClient, InMemoryProductClient, PaymentClient, PaymentReceipt,
    ProductClient, ProductSnapshot,
};
pub use error::OrderError;
pub use orchestrator::OrderOrchestrator;
pub use status::OrderStatus;
pub use store::{Order, OrderStore};
