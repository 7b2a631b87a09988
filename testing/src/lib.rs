//! # Shelter Testing
//!
//! Testing utilities for reducer-driven screens.
//!
//! This crate provides:
//! - A fixed clock for deterministic dates
//! - Recording mocks for the transport, navigator and widget host capabilities
//! - A Given-When-Then harness for reducers and effect assertions
//!
//! ## Example
//!
//! ```ignore
//! use shelter_testing::{RecordingTransport, test_clock};
//!
//! #[tokio::test]
//! async fn test_submit() {
//!     let transport = RecordingTransport::new().respond("move_reserve", None, Ok("88".into()));
//!     let env = screen_environment(transport.clone(), test_clock());
//!     // ...
//!     assert_eq!(transport.requests().len(), 1);
//! }
//! ```

use chrono::{DateTime, Utc};
use shelter_core::environment::Clock;

/// Recording mocks for screen capabilities
pub mod mocks;


pub use mocks::{RecordedRequest, RecordingNavigator, RecordingTransport, RecordingWidgets};
pub use reducer_test::{ReducerTest, assertions};

/// Fixed clock for deterministic tests
///
/// Always returns the same time, making default dates reproducible.
///
/// # Example
///
/// ```
/// use shelter_testing::FixedClock;
/// use shelter_core::environment::Clock;
/// use chrono::Utc;
///
/// let clock = FixedClock::new(Utc::now());
/// assert_eq!(clock.now(), clock.now());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    time: DateTime<Utc>,
}

impl FixedClock {
    /// Create a new fixed clock with the given time
    #[must_use]
    pub const fn new(time: DateTime<Utc>) -> Self {
        Self { time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.time
    }
}

/// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
#[must_use]
pub fn test_clock() -> FixedClock {
    FixedClock::new(DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default())
}
