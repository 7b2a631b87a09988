//! Reserve-an-animal screen.
//!
//! The screen records a reservation movement linking an animal to a person.
//! It demonstrates:
//!
//! - Eligibility rules for the chosen animal and person, reported as notices
//! - Required-field validation before submission
//! - A submission pipeline that always restores the Reserve button
//! - Discarding template lists that arrive for an earlier selection
//!
//! # Architecture
//!
//! 1. **Selections** (`AnimalSelection`, `PersonSelection`) are read from the
//!    chooser widgets' records at the boundary
//! 2. **Eligibility** turns a selection into notices; the reducer applies them to panels
//! 3. **Validation** gates the create request
//! 4. **Effects** post to the backend and navigate to the document screen
//!
//! # Example Usage
//!
//! ```no_run
//! use move_reserve::{HttpTransport, MoveReserveEnvironment, MoveReserveScreen};
//! use shelter_core::environment::{IdentityTranslator, LocaleFormatter, MapConfig, SystemClock};
//! use shelter_core::screen::ScreenModule;
//! use std::sync::Arc;
//! # use shelter_core::environment::{Navigator, WidgetHost};
//! # struct Log;
//! # impl Navigator for Log { fn route(&self, _: &str) {} }
//! # impl WidgetHost for Log { fn destroy(&self, _: &str) {} }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new("http://localhost:5000", std::time::Duration::from_secs(30))?;
//! let env = MoveReserveEnvironment::new(
//!     Arc::new(transport),
//!     Arc::new(MapConfig::new().with_flag("DonationOnMoveReserve", true)),
//!     Arc::new(LocaleFormatter::default()),
//!     Arc::new(IdentityTranslator),
//!     Arc::new(Log),
//!     Arc::new(Log),
//!     Arc::new(SystemClock),
//! );
//!
//! let mut screen = MoveReserveScreen::new(env, Vec::new());
//! screen.bind().await?;
//! screen.animal_changed(&serde_json::json!({"ID": 12, "ANIMALNAME": "Rex"})).await?;
//! screen.person_changed(&serde_json::json!({"ID": 34, "OWNERNAME": "Jane Smith"})).await?;
//!
//! let mut handle = screen.submit().await?;
//! handle.wait().await;
//! println!("{:?}", screen.snapshot().await?.navigation);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod eligibility;
pub mod environment;
pub mod http;
pub mod reducer;
pub mod screen;
pub mod selection;
pub mod types;
pub mod validation;
pub mod view;

// Re-export commonly used types
pub use config::AppConfig;
pub use eligibility::{EligibilityPolicy, Notice, Severity, assess_animal, assess_person};
pub use environment::MoveReserveEnvironment;
pub use http::HttpTransport;
pub use reducer::MoveReserveReducer;
pub use screen::MoveReserveScreen;
pub use selection::{AnimalSelection, PersonSelection, SelectionError};
pub use types::{
    MoveReserveAction, MoveReserveState, Phase, ReservationForm, ReservationStatus, SubmittedReservation,
};
pub use validation::{FormField, ValidationError, validate};
