//! The reservation screen as a registrable module.
//!
//! `bind` creates a store for the screen state and applies the configured
//! defaults; widget events enter through the `*_changed` methods and `submit`.
//! `destroy` releases the chooser widgets and closes the store, so responses
//! arriving after the user has left are dropped.

use crate::environment::MoveReserveEnvironment;
use crate::reducer::MoveReserveReducer;
use crate::selection::{AnimalSelection, PersonSelection};
use crate::types::{MoveReserveAction, MoveReserveState, ReservationStatus};
use crate::view;
use futures::future::BoxFuture;
use serde_json::Value;
use shelter_core::screen::{Route, ScreenError, ScreenModule};
use shelter_core::transport::Transport;
use shelter_runtime::{EffectHandle, Store};

/// Module and route name
pub const MODULE_NAME: &str = "move_reserve";

type MoveReserveStore<T> =
    Store<MoveReserveState, MoveReserveAction, MoveReserveEnvironment<T>, MoveReserveReducer<T>>;

/// Reserve-an-animal screen.
pub struct MoveReserveScreen<T: Transport + 'static> {
    environment: MoveReserveEnvironment<T>,
    statuses: Vec<ReservationStatus>,
    store: Option<MoveReserveStore<T>>,
}

impl<T: Transport + 'static> MoveReserveScreen<T> {
    /// Create an unbound screen
    #[must_use]
    pub const fn new(environment: MoveReserveEnvironment<T>, statuses: Vec<ReservationStatus>) -> Self {
        Self {
            environment,
            statuses,
            store: None,
        }
    }

    /// Whether the screen is bound and accepting events
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.store.is_some()
    }

    fn store(&self) -> Result<&MoveReserveStore<T>, ScreenError> {
        self.store.as_ref().ok_or(ScreenError::NotBound(MODULE_NAME))
    }

    async fn dispatch(&self, action: MoveReserveAction) -> Result<EffectHandle, ScreenError> {
        self.store()?
            .send(action)
            .await
            .map_err(|e| ScreenError::Runtime(e.to_string()))
    }

    /// The animal chooser selected `record`.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::InvalidRecord`] for a malformed record, or
    /// [`ScreenError::NotBound`] before `bind`.
    pub async fn animal_changed(&self, record: &Value) -> Result<EffectHandle, ScreenError> {
        let animal = AnimalSelection::from_record(record).map_err(|e| {
            tracing::warn!(error = %e, "Rejected animal chooser record");
            ScreenError::InvalidRecord {
                widget: "animal",
                reason: e.to_string(),
            }
        })?;
        self.dispatch(MoveReserveAction::AnimalSelected(animal)).await
    }

    /// The person chooser selected `record`.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::InvalidRecord`] for a malformed record, or
    /// [`ScreenError::NotBound`] before `bind`.
    pub async fn person_changed(&self, record: &Value) -> Result<EffectHandle, ScreenError> {
        let person = PersonSelection::from_record(record).map_err(|e| {
            tracing::warn!(error = %e, "Rejected person chooser record");
            ScreenError::InvalidRecord {
                widget: "person",
                reason: e.to_string(),
            }
        })?;
        self.dispatch(MoveReserveAction::PersonSelected(person)).await
    }

    /// Movement number edited.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::NotBound`] before `bind`.
    pub async fn movement_number_changed(&self, value: impl Into<String>) -> Result<EffectHandle, ScreenError> {
        self.dispatch(MoveReserveAction::MovementNumberChanged(value.into())).await
    }

    /// Reservation date edited.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::NotBound`] before `bind`.
    pub async fn reservation_date_changed(&self, value: impl Into<String>) -> Result<EffectHandle, ScreenError> {
        self.dispatch(MoveReserveAction::ReservationDateChanged(value.into())).await
    }

    /// Reservation status changed.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::NotBound`] before `bind`.
    pub async fn reservation_status_changed(&self, value: impl Into<String>) -> Result<EffectHandle, ScreenError> {
        self.dispatch(MoveReserveAction::ReservationStatusChanged(value.into())).await
    }

    /// Gift Aid toggled.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::NotBound`] before `bind`.
    pub async fn gift_aid_changed(&self, value: bool) -> Result<EffectHandle, ScreenError> {
        self.dispatch(MoveReserveAction::GiftAidChanged(value)).await
    }

    /// Payment amount edited.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::NotBound`] before `bind`.
    pub async fn payment_amount_changed(&self, value: impl Into<String>) -> Result<EffectHandle, ScreenError> {
        self.dispatch(MoveReserveAction::PaymentAmountChanged(value.into())).await
    }

    /// The Reserve button was activated.
    ///
    /// Wait on the returned handle to follow the create request through to
    /// navigation.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::NotBound`] before `bind`.
    pub async fn submit(&self) -> Result<EffectHandle, ScreenError> {
        self.dispatch(MoveReserveAction::SubmitRequested).await
    }

    /// Copy of the current screen state.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::NotBound`] before `bind`.
    pub async fn snapshot(&self) -> Result<MoveReserveState, ScreenError> {
        Ok(self.store()?.state(Clone::clone).await)
    }

    /// Markup for the current state.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::NotBound`] before `bind`.
    pub async fn render_current(&self) -> Result<String, ScreenError> {
        let state = self.snapshot().await?;
        Ok(view::render(
            &state,
            &self.statuses,
            self.environment.translator.as_ref(),
        ))
    }
}

impl<T: Transport + 'static> ScreenModule for MoveReserveScreen<T> {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    fn title(&self) -> String {
        self.environment.translator.translate("Reserve an animal")
    }

    fn autofocus(&self) -> &'static str {
        "#asm-content button:first"
    }

    fn routes(&self) -> Vec<Route> {
        vec![Route::new(MODULE_NAME, MODULE_NAME)]
    }

    fn render(&self) -> String {
        view::render(
            &MoveReserveState::new(),
            &self.statuses,
            self.environment.translator.as_ref(),
        )
    }

    fn bind(&mut self) -> BoxFuture<'_, Result<(), ScreenError>> {
        Box::pin(async move {
            if let Some(previous) = self.store.take() {
                previous.close();
            }

            let store = Store::new(
                MoveReserveState::new(),
                MoveReserveReducer::new(),
                self.environment.clone(),
            );
            let mut handle = store
                .send(MoveReserveAction::Initialize)
                .await
                .map_err(|e| ScreenError::Runtime(e.to_string()))?;
            handle.wait().await;

            self.store = Some(store);
            tracing::debug!(module = MODULE_NAME, "Screen bound");
            Ok(())
        })
    }

    fn destroy(&mut self) {
        self.environment.widgets.destroy("#animal");
        self.environment.widgets.destroy("#person");
        if let Some(store) = self.store.take() {
            store.close();
        }
        tracing::debug!(module = MODULE_NAME, "Screen destroyed");
    }
}
