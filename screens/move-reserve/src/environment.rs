//! Capabilities the reservation reducer depends on.

use shelter_core::environment::{Clock, ConfigSource, Formatter, Navigator, Translator, WidgetHost};
use shelter_core::transport::Transport;
use std::sync::Arc;

/// Environment for the reservation screen.
///
/// The transport is generic because [`Transport`] returns `impl Future` and
/// cannot be used as a trait object; every other capability is shared behind
/// an `Arc<dyn _>`.
pub struct MoveReserveEnvironment<T: Transport> {
    /// Backend requests (template list, create)
    pub transport: Arc<T>,
    /// Screen configuration flags
    pub config: Arc<dyn ConfigSource>,
    /// Money and date formatting
    pub formatter: Arc<dyn Formatter>,
    /// Message translation
    pub translator: Arc<dyn Translator>,
    /// Screen navigation
    pub navigator: Arc<dyn Navigator>,
    /// Chooser widget lifecycle
    pub widgets: Arc<dyn WidgetHost>,
    /// Source of the default reservation date
    pub clock: Arc<dyn Clock>,
}

impl<T: Transport> MoveReserveEnvironment<T> {
    /// Creates a new environment
    #[must_use]
    pub fn new(
        transport: Arc<T>,
        config: Arc<dyn ConfigSource>,
        formatter: Arc<dyn Formatter>,
        translator: Arc<dyn Translator>,
        navigator: Arc<dyn Navigator>,
        widgets: Arc<dyn WidgetHost>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            transport,
            config,
            formatter,
            translator,
            navigator,
            widgets,
            clock,
        }
    }
}

impl<T: Transport> Clone for MoveReserveEnvironment<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            config: Arc::clone(&self.config),
            formatter: Arc::clone(&self.formatter),
            translator: Arc::clone(&self.translator),
            navigator: Arc::clone(&self.navigator),
            widgets: Arc::clone(&self.widgets),
            clock: Arc::clone(&self.clock),
        }
    }
}
