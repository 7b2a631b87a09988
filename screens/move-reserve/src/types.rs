//! State and actions of the reservation screen.
//!
//! The screen moves through `Idle → Validating → Submitting → Navigating`
//! and back to `Idle` once the document screen has been requested;
//! validation and transport failures both return it to `Idle` directly.

use crate::eligibility::{AnimalAssessment, Notice, Panel, PersonAssessment};
use crate::selection::{AnimalSelection, PersonSelection};
use crate::validation::FormField;
use serde::Deserialize;
use shelter_core::environment::{Formatter, Translator};
use shelter_core::transport::{FormBody, TransportError};
use std::fmt;

/// Values of the reservation form inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReservationForm {
    /// Hidden `movementid`, filled in once the reservation is created
    pub movement_id: String,
    /// Selected animal id
    pub animal_id: String,
    /// Selected person id
    pub person_id: String,
    /// Optional movement number override
    pub movement_number: String,
    /// Reservation date as shown in the date box
    pub reservation_date: String,
    /// Selected reservation status id
    pub reservation_status: String,
    /// Gift Aid on the payment
    pub gift_aid: bool,
    /// Payment amount (`amount1`)
    pub payment_amount: String,
}

impl ReservationForm {
    /// Serialize the inputs in document order for the create request
    #[must_use]
    pub fn to_form_body(&self) -> FormBody {
        FormBody::new()
            .field("movementid", &self.movement_id)
            .field("animal", &self.animal_id)
            .field("person", &self.person_id)
            .field("movementnumber", &self.movement_number)
            .field("reservationdate", &self.reservation_date)
            .field("reservationstatus", &self.reservation_status)
            .field("giftaid", if self.gift_aid { "1" } else { "0" })
            .field("amount1", &self.payment_amount)
    }
}

/// An entry of the reservation status list.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ReservationStatus {
    /// Status id
    #[serde(rename = "ID")]
    pub id: i64,
    /// Display name
    #[serde(rename = "STATUSNAME")]
    pub name: String,
}

/// Visibility and text of the notice panels.
///
/// A panel with text is shown; `None` or `false` means hidden.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Panels {
    /// Adoption fee text
    pub fee_info: Option<String>,
    /// Warning about the selected person
    pub owner_warning: Option<String>,
    /// The animal already has an active reservation
    pub multiple_reserve: bool,
    /// The animal has left the shelter
    pub not_on_shelter: bool,
}

impl Panels {
    /// Whether `panel` is currently shown
    #[must_use]
    pub const fn is_visible(&self, panel: Panel) -> bool {
        match panel {
            Panel::FeeInfo => self.fee_info.is_some(),
            Panel::OwnerWarning => self.owner_warning.is_some(),
            Panel::MultipleReserve => self.multiple_reserve,
            Panel::NotOnShelter => self.not_on_shelter,
        }
    }

    /// Replace the animal panels with the notices of `assessment`
    pub fn show_animal(
        &mut self,
        assessment: &AnimalAssessment,
        translator: &dyn Translator,
        formatter: &dyn Formatter,
    ) {
        self.fee_info = None;
        self.multiple_reserve = false;
        self.not_on_shelter = false;

        for notice in assessment.notices() {
            match notice {
                Notice::NotOnShelter => self.not_on_shelter = true,
                Notice::ActiveReservation => self.multiple_reserve = true,
                Notice::AdoptionFee(_) => {
                    self.fee_info = Some(notice.message(translator, formatter));
                },
                Notice::Banned
                | Notice::UnderInvestigation
                | Notice::AnimalControlIncident
                | Notice::NoHomecheck => {},
            }
        }
    }

    /// Replace the person panel with the warning of `assessment`
    pub fn show_person(
        &mut self,
        assessment: &PersonAssessment,
        translator: &dyn Translator,
        formatter: &dyn Formatter,
    ) {
        self.owner_warning = assessment
            .warning
            .as_ref()
            .map(|notice| notice.message(translator, formatter));
    }
}

/// The reservation as it was posted by the create request.
///
/// Selections may change while the request is in flight; the success message
/// and the document screen use these values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmittedReservation {
    /// Posted animal id
    pub animal_id: String,
    /// Animal text for the success message
    pub animal_name: String,
    /// Person text for the success message
    pub person_name: String,
}

impl SubmittedReservation {
    /// Capture the current form and selections
    #[must_use]
    pub fn capture(state: &MoveReserveState) -> Self {
        let animal_name = state
            .animal
            .as_ref()
            .map_or(&state.form.animal_id, |a| &a.display_name);
        let person_name = state
            .person
            .as_ref()
            .map_or(&state.form.person_id, |p| &p.display_name);

        Self {
            animal_id: state.form.animal_id.clone(),
            animal_name: animal_name.clone(),
            person_name: person_name.clone(),
        }
    }
}

/// Where the submission pipeline is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the user
    #[default]
    Idle,
    /// Checking required fields
    Validating,
    /// Create request in flight
    Submitting,
    /// Reservation created, document screen requested
    Navigating,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Validating => write!(f, "Validating"),
            Self::Submitting => write!(f, "Submitting"),
            Self::Navigating => write!(f, "Navigating"),
        }
    }
}

/// State of the reservation screen.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)] // Mirrors independent widget states
pub struct MoveReserveState {
    /// Form input values
    pub form: ReservationForm,
    /// Notice panels
    pub panels: Panels,
    /// Movement number row shown
    pub movement_number_visible: bool,
    /// Payment region shown
    pub payment_visible: bool,
    /// Reserve button enabled
    pub submit_enabled: bool,
    /// Busy indicator text while a request is running
    pub busy: Option<String>,
    /// Error shown in the content header
    pub header_error: Option<String>,
    /// Input highlighted by the last validation failure
    pub highlighted: Option<FormField>,
    /// Submission pipeline phase
    pub phase: Phase,
    /// Document template list markup
    pub template_list: String,
    /// Current animal selection
    pub animal: Option<AnimalSelection>,
    /// Current person selection
    pub person: Option<PersonSelection>,
    /// Reservation posted by the create request in flight
    pub submitted: Option<SubmittedReservation>,
    /// URL of the document screen requested after a successful create
    pub navigation: Option<String>,
    /// Generation of the latest template list request
    pub template_generation: u64,
}

impl MoveReserveState {
    /// Create the state of a freshly rendered screen
    #[must_use]
    pub fn new() -> Self {
        Self {
            form: ReservationForm::default(),
            panels: Panels::default(),
            movement_number_visible: false,
            payment_visible: true,
            submit_enabled: true,
            busy: None,
            header_error: None,
            highlighted: None,
            phase: Phase::Idle,
            template_list: String::new(),
            animal: None,
            person: None,
            submitted: None,
            navigation: None,
            template_generation: 0,
        }
    }
}

impl Default for MoveReserveState {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything that can happen on the reservation screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveReserveAction {
    // Lifecycle
    /// Apply configuration defaults after the markup is bound
    Initialize,

    // Widget events
    /// The animal chooser selected an animal
    AnimalSelected(AnimalSelection),
    /// The person chooser selected a person
    PersonSelected(PersonSelection),
    /// Movement number edited
    MovementNumberChanged(String),
    /// Reservation date edited
    ReservationDateChanged(String),
    /// Reservation status changed
    ReservationStatusChanged(String),
    /// Gift Aid toggled
    GiftAidChanged(bool),
    /// Payment amount edited
    PaymentAmountChanged(String),
    /// The Reserve button was activated
    SubmitRequested,

    // Responses
    /// Template list markup arrived
    TemplatesLoaded {
        /// Generation of the request that produced it
        generation: u64,
        /// Replacement markup
        markup: String,
    },
    /// Template list request failed
    TemplatesFailed {
        /// Generation of the failed request
        generation: u64,
        /// Transport failure
        error: TransportError,
    },
    /// The create request finished
    SubmissionSettled {
        /// New movement id or the transport failure
        outcome: Result<String, TransportError>,
    },
    /// The document screen was requested
    NavigationIssued,
}
