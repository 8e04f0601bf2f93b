//! `larder-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! aggregate traits, the domain error model, fixed-point money and the injected
//! time source.

pub mod aggregate;
pub mod clock;
pub mod entity;
pub mod error;
pub mod id;
pub mod money;

pub use aggregate::{Aggregate, AggregateRoot};
pub use clock::{Clock, ManualClock, SystemClock};
pub use entity::{Entity, remove_by_id};
pub use error::{DomainError, DomainResult};
pub use id::TransactionId;
pub use money::Money;
