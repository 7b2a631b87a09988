//! Typed records for the animal and person chooser widgets.
//!
//! Choosers emit loosely-typed JSON records with upper-case field names.
//! Flags may arrive as numbers, numeric strings or booleans depending on the
//! backend serializer, so every field is normalized here and a malformed
//! record is rejected before it reaches the reducer.

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;
use thiserror::Error;

/// Active movement type of a fostered animal.
pub const FOSTER_MOVEMENT_TYPE: i64 = 2;

/// Errors raised while reading a chooser record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// The record is not a JSON object.
    #[error("Selection record must be an object")]
    NotAnObject,

    /// The record has no usable `ID`.
    #[error("Selection record has no ID")]
    MissingId,

    /// A field holds a value of the wrong shape.
    #[error("Field {field} has an unexpected value: {value}")]
    InvalidField {
        /// Upper-case field name
        field: &'static str,
        /// Offending value as JSON
        value: String,
    },
}

/// The animal picked in the animal chooser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimalSelection {
    /// Animal identifier
    pub id: String,
    /// Whether the animal has left the shelter
    pub is_archived: bool,
    /// Type of the animal's active movement, 0 when it has none
    pub active_movement_type: i64,
    /// Whether another reservation is already open
    pub has_active_reserve: bool,
    /// Adoption fee, if one is set
    pub adoption_fee: Option<Decimal>,
    /// Text shown for the animal in messages
    pub display_name: String,
}

impl AnimalSelection {
    /// An on-shelter animal with no reservation and no fee
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            is_archived: false,
            active_movement_type: 0,
            has_active_reserve: false,
            adoption_fee: None,
        }
    }

    /// Whether the animal is currently in foster care
    #[must_use]
    pub const fn is_fostered(&self) -> bool {
        self.active_movement_type == FOSTER_MOVEMENT_TYPE
    }

    /// Read an animal chooser record.
    ///
    /// `FEE` is read as minor currency units when it is a JSON integer and as
    /// major units when it is a float or a numeric string.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectionError`] when the record is not an object, has no
    /// `ID`, or has a field of the wrong shape.
    pub fn from_record(record: &Value) -> Result<Self, SelectionError> {
        let fields = record.as_object().ok_or(SelectionError::NotAnObject)?;
        let id = read_id(fields)?;

        let display_name = match (text(fields, "SHELTERCODE"), text(fields, "ANIMALNAME")) {
            (Some(code), Some(name)) => format!("{code} - {name}"),
            (Some(only), None) | (None, Some(only)) => only,
            (None, None) => id.clone(),
        };

        Ok(Self {
            is_archived: flag(fields, "ARCHIVED")?,
            active_movement_type: count(fields, "ACTIVEMOVEMENTTYPE")?,
            has_active_reserve: flag(fields, "HASACTIVERESERVE")?,
            adoption_fee: fee(fields, "FEE")?,
            display_name,
            id,
        })
    }
}

/// The person picked in the person chooser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonSelection {
    /// Person identifier
    pub id: String,
    /// Registered for Gift Aid
    pub is_gift_aid: bool,
    /// Banned from adopting
    pub is_banned: bool,
    /// Number of investigations recorded against the person
    pub investigation_count: i64,
    /// Number of animal control incidents recorded against the person
    pub incident_count: i64,
    /// Passed a homecheck
    pub is_home_checked: bool,
    /// Text shown for the person in messages
    pub display_name: String,
}

impl PersonSelection {
    /// A homechecked person with a clean record
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            is_gift_aid: false,
            is_banned: false,
            investigation_count: 0,
            incident_count: 0,
            is_home_checked: true,
        }
    }

    /// Read a person chooser record.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectionError`] when the record is not an object, has no
    /// `ID`, or has a field of the wrong shape.
    pub fn from_record(record: &Value) -> Result<Self, SelectionError> {
        let fields = record.as_object().ok_or(SelectionError::NotAnObject)?;
        let id = read_id(fields)?;

        Ok(Self {
            is_gift_aid: flag(fields, "ISGIFTAID")?,
            is_banned: flag(fields, "ISBANNED")?,
            investigation_count: count(fields, "INVESTIGATION")?,
            incident_count: count(fields, "INCIDENT")?,
            // Only an explicit IDCHECK of 0 marks a person as not homechecked
            is_home_checked: flag_or(fields, "IDCHECK", true)?,
            display_name: text(fields, "OWNERNAME").unwrap_or_else(|| id.clone()),
            id,
        })
    }
}

fn invalid(field: &'static str, value: &Value) -> SelectionError {
    SelectionError::InvalidField {
        field,
        value: value.to_string(),
    }
}

fn read_id(fields: &Map<String, Value>) -> Result<String, SelectionError> {
    match fields.get("ID") {
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(SelectionError::MissingId),
    }
}

fn flag(fields: &Map<String, Value>, field: &'static str) -> Result<bool, SelectionError> {
    flag_or(fields, field, false)
}

fn flag_or(fields: &Map<String, Value>, field: &'static str, missing: bool) -> Result<bool, SelectionError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(missing),
        Some(Value::Bool(b)) => Ok(*b),
        Some(value @ Value::Number(n)) => n.as_i64().map(|n| n != 0).ok_or_else(|| invalid(field, value)),
        Some(value @ Value::String(s)) => match s.trim() {
            "" | "0" | "false" => Ok(false),
            "1" | "true" => Ok(true),
            _ => Err(invalid(field, value)),
        },
        Some(value) => Err(invalid(field, value)),
    }
}

fn count(fields: &Map<String, Value>, field: &'static str) -> Result<i64, SelectionError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(0),
        Some(value @ Value::Number(n)) => n.as_i64().ok_or_else(|| invalid(field, value)),
        Some(value @ Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                Ok(0)
            } else {
                s.parse().map_err(|_| invalid(field, value))
            }
        },
        Some(value) => Err(invalid(field, value)),
    }
}

fn fee(fields: &Map<String, Value>, field: &'static str) -> Result<Option<Decimal>, SelectionError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value @ Value::Number(n)) => {
            if let Some(cents) = n.as_i64() {
                Ok(Some(Decimal::new(cents, 2)))
            } else {
                n.as_f64()
                    .and_then(|f| Decimal::try_from(f).ok())
                    .map(Some)
                    .ok_or_else(|| invalid(field, value))
            }
        },
        Some(value @ Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                Ok(None)
            } else {
                Decimal::from_str(s)
                    .map(Some)
                    .map_err(|_| invalid(field, value))
            }
        },
        Some(value) => Err(invalid(field, value)),
    }
}

fn text(fields: &Map<String, Value>, field: &str) -> Option<String> {
    match fields.get(field)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
