//! Shared domain types for the cadence authorization engine.
//!
//! Everything the engine crates exchange lives here: the signed intent
//! structures, the resolved order consumed from the order-resolution layer,
//! durable execution state, engine events, and the configuration validation
//! helpers implemented by pluggable backends.

pub mod events;
pub mod intent;
pub mod order;
pub mod state;
pub mod validation;

pub use events::*;
pub use intent::*;
pub use order::*;
pub use state::*;
pub use validation::*;
