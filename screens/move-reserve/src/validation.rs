//! Required-field checks run when the user submits the reservation.

use crate::types::ReservationForm;
use thiserror::Error;

/// A form input that validation can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    /// Animal chooser
    Animal,
    /// Person chooser
    Person,
    /// Reservation date box
    ReservationDate,
}

impl FormField {
    /// Element id of the input
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Animal => "animal",
            Self::Person => "person",
            Self::ReservationDate => "reservationdate",
        }
    }
}

/// A required field is empty.
///
/// The display text is the untranslated header message.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// No animal selected
    #[error("Movements require an animal")]
    MissingAnimal,

    /// No person selected
    #[error("This type of movement requires a person.")]
    MissingPerson,

    /// Reservation date left blank
    #[error("This type of movement requires a date.")]
    MissingDate,
}

impl ValidationError {
    /// The input to highlight
    #[must_use]
    pub const fn field(self) -> FormField {
        match self {
            Self::MissingAnimal => FormField::Animal,
            Self::MissingPerson => FormField::Person,
            Self::MissingDate => FormField::ReservationDate,
        }
    }

    /// Header message before translation
    #[must_use]
    pub const fn message_key(self) -> &'static str {
        match self {
            Self::MissingAnimal => "Movements require an animal",
            Self::MissingPerson => "This type of movement requires a person.",
            Self::MissingDate => "This type of movement requires a date.",
        }
    }
}

/// Check the required fields in order: animal, person, then date.
///
/// Whitespace-only values count as empty.
///
/// # Errors
///
/// Returns the first [`ValidationError`] found.
pub fn validate(form: &ReservationForm) -> Result<(), ValidationError> {
    if form.animal_id.trim().is_empty() {
        return Err(ValidationError::MissingAnimal);
    }
    if form.person_id.trim().is_empty() {
        return Err(ValidationError::MissingPerson);
    }
    if form.reservation_date.trim().is_empty() {
        return Err(ValidationError::MissingDate);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn complete_form() -> ReservationForm {
        ReservationForm {
            animal_id: "12".to_string(),
            person_id: "34".to_string(),
            reservation_date: "01/01/2025".to_string(),
            ..ReservationForm::default()
        }
    }

    #[test]
    fn complete_form_passes() {
        assert_eq!(validate(&complete_form()), Ok(()));
    }

    #[test]
    fn blank_date_is_rejected() {
        let form = ReservationForm {
            reservation_date: "   ".to_string(),
            ..complete_form()
        };

        let error = validate(&form).unwrap_err();
        assert_eq!(error, ValidationError::MissingDate);
        assert_eq!(error.field().id(), "reservationdate");
        assert_eq!(error.to_string(), error.message_key());
    }

    fn blank() -> impl Strategy<Value = String> {
        prop_oneof![Just(String::new()), "[ \t]{1,3}"]
    }

    fn value_or_blank() -> impl Strategy<Value = String> {
        prop_oneof![blank(), "[0-9]{1,4}"]
    }

    proptest! {
        #[test]
        fn first_missing_field_wins(
            animal in value_or_blank(),
            person in value_or_blank(),
            date in value_or_blank(),
        ) {
            let form = ReservationForm {
                animal_id: animal.clone(),
                person_id: person.clone(),
                reservation_date: date.clone(),
                ..ReservationForm::default()
            };

            let expected = if animal.trim().is_empty() {
                Err(ValidationError::MissingAnimal)
            } else if person.trim().is_empty() {
                Err(ValidationError::MissingPerson)
            } else if date.trim().is_empty() {
                Err(ValidationError::MissingDate)
            } else {
                Ok(())
            };
            prop_assert_eq!(validate(&form), expected);
        }
    }
}
