//! Capability traits injected into screen reducers.
//!
//! All external collaborators of a screen (clock, configuration, formatting,
//! translation, navigation, widgets) are abstracted behind traits so that
//! production, test and development environments can be swapped freely.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Clock trait - abstracts time operations for testability
///
/// # Examples
///
/// ```ignore
/// // Production - uses system clock
/// let clock = SystemClock;
///
/// // Test - fixed time for deterministic tests
/// let clock = FixedClock::new(time);
/// ```
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Utc>;

    /// Get the current calendar date
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall clock backed by [`Utc::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Read-only access to named configuration flags.
///
/// Screens consult configuration but never mutate it.
pub trait ConfigSource: Send + Sync {
    /// Boolean flag; unknown names are `false`.
    fn boolean(&self, name: &str) -> bool;

    /// String value; unknown names are the empty string.
    fn string(&self, name: &str) -> String;
}

/// Configuration held in an in-memory map of raw string values.
///
/// Boolean flags accept `Yes`, `true` and `1` (case-insensitive) as true,
/// anything else as false.
#[derive(Debug, Clone, Default)]
pub struct MapConfig {
    values: HashMap<String, String>,
}

impl MapConfig {
    /// Create an empty configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Builder-style setter for boolean flags
    #[must_use]
    pub fn with_flag(self, name: impl Into<String>, value: bool) -> Self {
        self.with(name, if value { "Yes" } else { "No" })
    }

    /// Set a raw value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }
}

impl FromIterator<(String, String)> for MapConfig {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl ConfigSource for MapConfig {
    fn boolean(&self, name: &str) -> bool {
        self.values.get(name).is_some_and(|value| {
            let value = value.trim();
            value.eq_ignore_ascii_case("yes")
                || value.eq_ignore_ascii_case("true")
                || value == "1"
        })
    }

    fn string(&self, name: &str) -> String {
        self.values.get(name).cloned().unwrap_or_default()
    }
}

/// Localized formatting of money and dates.
pub trait Formatter: Send + Sync {
    /// Format a monetary amount for display
    fn currency(&self, amount: Decimal) -> String;

    /// Format a calendar date the way date inputs expect it
    fn date(&self, date: NaiveDate) -> String;
}

/// Formatter driven by a currency symbol and a `strftime` date pattern.
#[derive(Debug, Clone)]
pub struct LocaleFormatter {
    currency_symbol: String,
    date_format: String,
}

impl LocaleFormatter {
    /// Create a formatter
    #[must_use]
    pub fn new(currency_symbol: impl Into<String>, date_format: impl Into<String>) -> Self {
        Self {
            currency_symbol: currency_symbol.into(),
            date_format: date_format.into(),
        }
    }
}

impl Default for LocaleFormatter {
    fn default() -> Self {
        Self::new("$", "%m/%d/%Y")
    }
}

impl Formatter for LocaleFormatter {
    fn currency(&self, amount: Decimal) -> String {
        format!("{}{:.2}", self.currency_symbol, amount.round_dp(2))
    }

    fn date(&self, date: NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }
}

/// Translation lookup keyed by the English source text.
pub trait Translator: Send + Sync {
    /// Localized text for `text`
    fn translate(&self, text: &str) -> String;
}

/// Translator that returns the source text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Translator backed by a message catalog, falling back to the source text.
#[derive(Debug, Clone, Default)]
pub struct CatalogTranslator {
    catalog: HashMap<String, String>,
}

impl CatalogTranslator {
    /// Create a translator from `(source, translation)` pairs
    #[must_use]
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            catalog: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Translator for CatalogTranslator {
    fn translate(&self, text: &str) -> String {
        self.catalog
            .get(text)
            .cloned()
            .unwrap_or_else(|| text.to_string())
    }
}

/// Loads another screen by URL.
pub trait Navigator: Send + Sync {
    /// Navigate to `url` (route name plus query string)
    fn route(&self, url: &str);
}

/// Host of the form widgets (choosers, date pickers) attached to a screen.
pub trait WidgetHost: Send + Sync {
    /// Release the widget bound to `selector`
    fn destroy(&self, selector: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_config_booleans() {
        let config = MapConfig::new()
            .with("A", "Yes")
            .with("B", "true")
            .with("C", "1")
            .with("D", "No")
            .with("E", "");

        assert!(config.boolean("A"));
        assert!(config.boolean("B"));
        assert!(config.boolean("C"));
        assert!(!config.boolean("D"));
        assert!(!config.boolean("E"));
        assert!(!config.boolean("missing"));
    }

    #[test]
    fn map_config_strings_default_to_empty() {
        let config = MapConfig::new().with("AFDefaultReservationStatus", "2");
        assert_eq!(config.string("AFDefaultReservationStatus"), "2");
        assert_eq!(config.string("missing"), "");
    }

    #[test]
    fn locale_formatter_formats_two_places() {
        let formatter = LocaleFormatter::new("£", "%d/%m/%Y");
        assert_eq!(formatter.currency(Decimal::new(2500, 2)), "£25.00");
        assert_eq!(formatter.currency(Decimal::new(7, 0)), "£7.00");

        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap_or_default();
        assert_eq!(formatter.date(date), "09/03/2025");
    }

    #[test]
    fn catalog_translator_falls_back_to_source() {
        let translator = CatalogTranslator::new([("Reserve", "Réserver")]);
        assert_eq!(translator.translate("Reserve"), "Réserver");
        assert_eq!(translator.translate("Date"), "Date");
    }
}
