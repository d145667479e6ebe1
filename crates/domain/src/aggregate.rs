//! Core aggregate and domain event traits.

use common::AggregateId;
use event_store::{EventEnvelope, Version};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::DomainError;

/// Trait for domain events.
///
/// Domain events represent facts that have happened in the domain.
/// They are immutable and named in past tense.
pub trait DomainEvent: Serialize + DeserializeOwned + Send + Sync + Clone {
    /// Returns the event type name stored alongside the payload.
    fn event_type(&self) -> &'static str;
}

/// Trait for aggregates in an event-sourced system.
///
/// In event sourcing, aggregates:
/// - Are rebuilt by replaying events
/// - Generate events from commands
/// - Apply events to update state (pure, deterministic)
pub trait Aggregate: Default + Send + Sync + Sized {
    /// The type of events this aggregate produces and consumes.
    type Event: DomainEvent;

    /// The type of errors this aggregate's commands can produce.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the aggregate type name.
    fn aggregate_type() -> &'static str;

    /// Returns the aggregate's unique identifier.
    ///
    /// Returns None until the creation event has been applied.
    fn id(&self) -> Option<AggregateId>;

    /// Returns the number of events applied so far, which is also the
    /// version the next event will be appended at.
    fn version(&self) -> Version;

    /// Sets the aggregate version.
    fn set_version(&mut self, version: Version);

    /// Applies an event to the aggregate, updating its state.
    ///
    /// Must be deterministic: the same state and event always produce the
    /// same new state, with no side effects. Events are facts, so this
    /// cannot fail.
    fn apply(&mut self, event: Self::Event);

    /// Applies an event, refusing one that cannot follow the current state.
    ///
    /// Replay goes through here so that a stream which contradicts the
    /// aggregate's rules fails loudly. On error the state is left untouched.
    fn try_apply(&mut self, event: Self::Event) -> Result<(), Self::Error> {
        self.apply(event);
        Ok(())
    }

    /// Applies multiple events in sequence.
    fn apply_events(&mut self, events: impl IntoIterator<Item = Self::Event>) {
        for event in events {
            self.apply(event);
        }
    }
}

/// Rebuilds an aggregate by replaying its stored events onto a default
/// instance.
///
/// Envelopes must be the aggregate's complete stream in version order;
/// anything else fails with `OutOfOrderEvent`. An event the aggregate
/// refuses fails with `InvalidStoredEvent`.
pub fn reconstruct<A>(envelopes: impl IntoIterator<Item = EventEnvelope>) -> Result<A, DomainError>
where
    A: Aggregate,
{
    let mut aggregate = A::default();

    for envelope in envelopes {
        if envelope.version != aggregate.version() {
            return Err(DomainError::OutOfOrderEvent {
                aggregate_id: envelope.aggregate_id,
                expected: aggregate.version(),
                found: envelope.version,
            });
        }
        let event: A::Event = serde_json::from_value(envelope.payload)?;
        aggregate
            .try_apply(event)
            .map_err(|source| DomainError::InvalidStoredEvent {
                aggregate_id: envelope.aggregate_id,
                version: envelope.version,
                source: Box::new(source),
            })?;
        aggregate.set_version(envelope.version.next());
    }

    Ok(aggregate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    enum TestEvent {
        Created { id: AggregateId },
        Updated { value: i32 },
    }

    impl DomainEvent for TestEvent {
        fn event_type(&self) -> &'static str {
            match self {
                TestEvent::Created { .. } => "TestCreated",
                TestEvent::Updated { .. } => "TestUpdated",
            }
        }
    }

    #[derive(Debug, Default)]
    struct Counter {
        id: Option<AggregateId>,
        value: i32,
        version: Version,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("test error")]
    struct TestError;

    impl Aggregate for Counter {
        type Event = TestEvent;
        type Error = TestError;

        fn aggregate_type() -> &'static str {
            "Counter"
        }

        fn id(&self) -> Option<AggregateId> {
            self.id
        }

        fn version(&self) -> Version {
            self.version
        }

        fn set_version(&mut self, version: Version) {
            self.version = version;
        }

        fn apply(&mut self, event: Self::Event) {
            match event {
                TestEvent::Created { id } => self.id = Some(id),
                TestEvent::Updated { value } => self.value = value,
            }
        }

        fn try_apply(&mut self, event: Self::Event) -> Result<(), Self::Error> {
            if matches!(event, TestEvent::Updated { .. }) && self.id.is_none() {
                return Err(TestError);
            }
            self.apply(event);
            Ok(())
        }
    }

    fn envelope(id: AggregateId, version: u64, event: &TestEvent) -> EventEnvelope {
        EventEnvelope::builder()
            .aggregate_id(id)
            .aggregate_type("Counter")
            .event_type(event.event_type())
            .version(Version::new(version))
            .payload(event)
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn reconstruct_applies_events_in_order() {
        let id = AggregateId::new();
        let envelopes = vec![
            envelope(id, 0, &TestEvent::Created { id }),
            envelope(id, 1, &TestEvent::Updated { value: 7 }),
            envelope(id, 2, &TestEvent::Updated { value: 42 }),
        ];

        let counter: Counter = reconstruct(envelopes).unwrap();
        assert_eq!(counter.id(), Some(id));
        assert_eq!(counter.value, 42);
        assert_eq!(counter.version(), Version::new(3));
    }

    #[test]
    fn reconstruct_empty_stream_yields_default() {
        let counter: Counter = reconstruct(Vec::new()).unwrap();
        assert!(counter.id().is_none());
        assert_eq!(counter.version(), Version::initial());
    }

    #[test]
    fn reconstruct_rejects_gaps() {
        let id = AggregateId::new();
        let envelopes = vec![
            envelope(id, 0, &TestEvent::Created { id }),
            envelope(id, 2, &TestEvent::Updated { value: 1 }),
        ];

        let result: Result<Counter, _> = reconstruct(envelopes);
        assert!(matches!(
            result,
            Err(DomainError::OutOfOrderEvent { expected, found, .. })
                if expected == Version::new(1) && found == Version::new(2)
        ));
    }

    #[test]
    fn reconstruct_fails_on_refused_event() {
        let id = AggregateId::new();
        let envelopes = vec![envelope(id, 0, &TestEvent::Updated { value: 1 })];

        let result: Result<Counter, _> = reconstruct(envelopes);
        assert!(matches!(
            result,
            Err(DomainError::InvalidStoredEvent { version, .. }) if version == Version::new(0)
        ));
    }

    #[test]
    fn apply_events_folds_in_sequence() {
        let mut counter = Counter::default();
        counter.apply_events(vec![
            TestEvent::Created {
                id: AggregateId::new(),
            },
            TestEvent::Updated { value: 3 },
        ]);
        assert!(counter.id().is_some());
        assert_eq!(counter.value, 3);
    }
}
