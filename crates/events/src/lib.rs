//! Domain events, envelopes and projections.
//!
//! Aggregates emit events; the engine wraps each one in an [`EventEnvelope`]
//! carrying its position in the stream and hands it to [`Projection`]s.

pub mod envelope;
pub mod event;
pub mod projection;

pub use envelope::EventEnvelope;
pub use event::Event;
pub use projection::Projection;
