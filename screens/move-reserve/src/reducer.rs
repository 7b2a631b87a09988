//! Reservation screen reducer.
//!
//! Handles selection events, field edits and the submission pipeline. Every
//! backend call and the final navigation are returned as effects; the reducer
//! itself only updates state.

use crate::eligibility::{EligibilityPolicy, assess_animal, assess_person};
use crate::environment::MoveReserveEnvironment;
use crate::types::{MoveReserveAction, MoveReserveState, Panels, Phase, SubmittedReservation};
use crate::validation::validate;
use crate::view;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use shelter_core::effect::Effect;
use shelter_core::reducer::Reducer;
use shelter_core::transport::{FormBody, Transport};
use shelter_core::{SmallVec, smallvec};
use std::marker::PhantomData;
use std::sync::Arc;

/// Backend endpoint for template lists and reservation creation
pub const ENDPOINT: &str = "move_reserve";

/// Route of the document generation screen shown after a reservation
pub const DOCUMENT_ROUTE: &str = "move_gendoc";

/// Busy indicator text while the reservation is created
pub const CREATING: &str = "Creating...";

/// Success message prefix
pub const CREATED: &str = "Reservation successfully created.";

/// Build the document screen URL for a newly created reservation.
///
/// The message is base64 encoded and then percent-encoded so it survives as a
/// single query parameter.
#[must_use]
pub fn document_url(animal_id: &str, message: &str) -> String {
    let encoded = BASE64.encode(message.as_bytes());
    format!(
        "{DOCUMENT_ROUTE}?mode=ANIMAL&id={}&message={}",
        urlencoding::encode(animal_id),
        urlencoding::encode(&encoded)
    )
}

/// Reducer for the reservation screen.
pub struct MoveReserveReducer<T> {
    transport: PhantomData<fn() -> T>,
}

impl<T> MoveReserveReducer<T> {
    /// Creates a new reducer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            transport: PhantomData,
        }
    }
}

impl<T> Default for MoveReserveReducer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for MoveReserveReducer<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T: Transport + 'static> MoveReserveReducer<T> {
    fn transition(state: &mut MoveReserveState, to: Phase) {
        tracing::debug!(from = %state.phase, %to, "Submission phase");
        state.phase = to;
    }

    fn initialize(state: &mut MoveReserveState, env: &MoveReserveEnvironment<T>) {
        let config = env.config.as_ref();

        state.panels = Panels::default();
        state.movement_number_visible = config.boolean("MovementNumberOverride");
        state.form.reservation_date = env.formatter.date(env.clock.today());
        state.form.reservation_status = config.string("AFDefaultReservationStatus");

        state.payment_visible = config.boolean("DonationOnMoveReserve");
        if !state.payment_visible {
            state.form.payment_amount = "0".to_string();
        }

        state.submit_enabled = true;
        state.busy = None;
        state.header_error = None;
        state.highlighted = None;
        state.phase = Phase::Idle;
    }

    fn fetch_templates(
        env: &MoveReserveEnvironment<T>,
        animal_id: &str,
        generation: u64,
    ) -> Effect<MoveReserveAction> {
        let transport = Arc::clone(&env.transport);
        let body = FormBody::new()
            .field("mode", "templates")
            .field("id", animal_id);

        Effect::future(async move {
            match transport.post(ENDPOINT, body).await {
                Ok(markup) => Some(MoveReserveAction::TemplatesLoaded { generation, markup }),
                Err(error) => Some(MoveReserveAction::TemplatesFailed { generation, error }),
            }
        })
    }

    fn create_reservation(env: &MoveReserveEnvironment<T>, body: FormBody) -> Effect<MoveReserveAction> {
        let transport = Arc::clone(&env.transport);

        Effect::future(async move {
            let outcome = transport.post(ENDPOINT, body).await;
            Some(MoveReserveAction::SubmissionSettled { outcome })
        })
    }

    fn success_message(submitted: &SubmittedReservation, env: &MoveReserveEnvironment<T>) -> String {
        format!(
            "{} {} {} {}",
            env.translator.translate(CREATED),
            view::escape(&submitted.animal_name),
            view::icon("right"),
            view::escape(&submitted.person_name)
        )
    }
}

impl<T: Transport + 'static> Reducer for MoveReserveReducer<T> {
    type State = MoveReserveState;
    type Action = MoveReserveAction;
    type Environment = MoveReserveEnvironment<T>;

    #[allow(clippy::too_many_lines)] // One arm per screen event
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            MoveReserveAction::Initialize => {
                Self::initialize(state, env);
                tracing::debug!(
                    movement_number = state.movement_number_visible,
                    payment = state.payment_visible,
                    "Screen initialized"
                );
                smallvec![Effect::None]
            },

            MoveReserveAction::AnimalSelected(animal) => {
                let policy = EligibilityPolicy::from_config(env.config.as_ref());
                let assessment = assess_animal(&animal, &policy);

                // The button stays disabled while a create request is in flight
                if state.phase == Phase::Idle {
                    state.submit_enabled = true;
                }
                state.panels.show_animal(
                    &assessment,
                    env.translator.as_ref(),
                    env.formatter.as_ref(),
                );
                state.form.animal_id.clone_from(&animal.id);

                // Any template response still in flight is for an earlier animal
                state.template_generation += 1;
                let generation = state.template_generation;

                let blocked = assessment.is_blocked();
                tracing::info!(
                    animal_id = %animal.id,
                    blocked,
                    notices = assessment.notices().len(),
                    "Animal selected"
                );

                let effect = if blocked {
                    state.submit_enabled = false;
                    Effect::None
                } else {
                    Self::fetch_templates(env, &animal.id, generation)
                };
                state.animal = Some(animal);
                smallvec![effect]
            },

            MoveReserveAction::PersonSelected(person) => {
                let policy = EligibilityPolicy::from_config(env.config.as_ref());
                let assessment = assess_person(&person, &policy);

                state.form.gift_aid = assessment.gift_aid;
                state.form.person_id.clone_from(&person.id);
                state.panels.show_person(
                    &assessment,
                    env.translator.as_ref(),
                    env.formatter.as_ref(),
                );

                tracing::info!(
                    person_id = %person.id,
                    warning = ?assessment.warning,
                    "Person selected"
                );
                state.person = Some(person);
                smallvec![Effect::None]
            },

            MoveReserveAction::MovementNumberChanged(value) => {
                state.form.movement_number = value;
                smallvec![Effect::None]
            },
            MoveReserveAction::ReservationDateChanged(value) => {
                state.form.reservation_date = value;
                smallvec![Effect::None]
            },
            MoveReserveAction::ReservationStatusChanged(value) => {
                state.form.reservation_status = value;
                smallvec![Effect::None]
            },
            MoveReserveAction::GiftAidChanged(value) => {
                state.form.gift_aid = value;
                smallvec![Effect::None]
            },
            MoveReserveAction::PaymentAmountChanged(value) => {
                state.form.payment_amount = value;
                smallvec![Effect::None]
            },

            MoveReserveAction::TemplatesLoaded { generation, markup } => {
                if generation == state.template_generation {
                    state.template_list = markup;
                } else {
                    tracing::debug!(
                        generation,
                        latest = state.template_generation,
                        "Discarding stale template list"
                    );
                }
                smallvec![Effect::None]
            },

            MoveReserveAction::TemplatesFailed { generation, error } => {
                if generation == state.template_generation {
                    tracing::warn!(%error, "Failed to load document templates");
                }
                smallvec![Effect::None]
            },

            MoveReserveAction::SubmitRequested => {
                if !state.submit_enabled || state.phase != Phase::Idle {
                    tracing::debug!(phase = %state.phase, "Ignoring submit while disabled");
                    return smallvec![Effect::None];
                }

                Self::transition(state, Phase::Validating);
                state.header_error = None;
                state.highlighted = None;

                if let Err(error) = validate(&state.form) {
                    tracing::warn!(field = error.field().id(), "Reservation form incomplete");
                    state.header_error = Some(env.translator.translate(error.message_key()));
                    state.highlighted = Some(error.field());
                    Self::transition(state, Phase::Idle);
                    return smallvec![Effect::None];
                }

                Self::transition(state, Phase::Submitting);
                state.submit_enabled = false;
                state.busy = Some(env.translator.translate(CREATING));
                state.submitted = Some(SubmittedReservation::capture(state));

                smallvec![Self::create_reservation(env, state.form.to_form_body())]
            },

            MoveReserveAction::SubmissionSettled { outcome } => {
                // Runs on every outcome
                state.busy = None;
                state.submit_enabled = !state.panels.not_on_shelter;
                let submitted = state
                    .submitted
                    .take()
                    .unwrap_or_else(|| SubmittedReservation::capture(state));

                match outcome {
                    Ok(movement_id) => {
                        state.form.movement_id = movement_id.trim().to_string();
                        let message = Self::success_message(&submitted, env);
                        let url = document_url(&submitted.animal_id, &message);

                        tracing::info!(
                            movement_id = %state.form.movement_id,
                            animal_id = %submitted.animal_id,
                            "Reservation created"
                        );
                        Self::transition(state, Phase::Navigating);
                        state.navigation = Some(url.clone());

                        let navigator = Arc::clone(&env.navigator);
                        smallvec![Effect::future(async move {
                            navigator.route(&url);
                            Some(MoveReserveAction::NavigationIssued)
                        })]
                    },
                    Err(error) => {
                        tracing::warn!(%error, "Failed to create reservation");
                        state.header_error = Some(error.to_string());
                        Self::transition(state, Phase::Idle);
                        smallvec![Effect::None]
                    },
                }
            },

            MoveReserveAction::NavigationIssued => {
                if state.phase == Phase::Navigating {
                    Self::transition(state, Phase::Idle);
                }
                smallvec![Effect::None]
            },
        }
    }
}
