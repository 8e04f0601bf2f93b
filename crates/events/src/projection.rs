use crate::{Event, EventEnvelope};

/// A projection builds a read model from an append-only event stream.
///
/// Read models are **disposable**: they can be dropped and rebuilt by replaying
/// the envelopes in sequence order.
///
/// ## Idempotency
///
/// Projections must tolerate seeing the same envelope twice. Tracking the last
/// applied `sequence_number` and ignoring anything at or below it is enough.
///
/// ## Error Handling
///
/// `apply` does not return errors. Events a projection does not care about are
/// ignored.
pub trait Projection {
    type Ev: Event;

    /// Apply a single envelope to the read model.
    fn apply(&mut self, envelope: &EventEnvelope<Self::Ev>);

    /// Rebuild by replaying envelopes in order.
    fn replay<'a, I>(&mut self, envelopes: I)
    where
        I: IntoIterator<Item = &'a EventEnvelope<Self::Ev>>,
        Self::Ev: 'a,
    {
        for envelope in envelopes {
            self.apply(envelope);
        }
    }
}
