//! Shared test doubles for the subscription tracker.

mod clock;
mod fixtures;
mod publisher;
mod repository;

pub use clock::FixedClock;
pub use fixtures::{fixed_now, sample_subscription};
pub use publisher::{FailingEventPublisher, RecordingEventHandler, RecordingEventPublisher};
pub use repository::{FailingSubscriptionRepository, InMemorySubscriptionRepository};
