//! Screen module contract.
//!
//! A screen module renders its markup, binds behavior to it, and releases its
//! widgets when the user navigates away. Modules announce the routes that
//! activate them so a registry can dispatch navigation requests.

use futures::future::BoxFuture;
use thiserror::Error;

/// Errors raised by screen modules.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScreenError {
    /// An event arrived before `bind` or after `destroy`.
    #[error("Screen {0} is not bound")]
    NotBound(&'static str),

    /// A widget emitted a record that does not have the expected shape.
    #[error("Invalid {widget} record: {reason}")]
    InvalidRecord {
        /// Widget that produced the record
        widget: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// The screen's store rejected the event.
    #[error("Screen runtime error: {0}")]
    Runtime(String),

    /// No module is registered for the requested route.
    #[error("No screen registered for route {0}")]
    UnknownRoute(String),
}

/// A named route and the module it activates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Route name as it appears in navigation URLs
    pub path: &'static str,
    /// Name of the module to load and start
    pub module: &'static str,
}

impl Route {
    /// Create a route
    #[must_use]
    pub const fn new(path: &'static str, module: &'static str) -> Self {
        Self { path, module }
    }
}

/// A registrable screen.
pub trait ScreenModule: Send + Sync {
    /// Unique module name
    fn name(&self) -> &'static str;

    /// Localized window title
    fn title(&self) -> String;

    /// Selector of the element that receives focus after binding
    fn autofocus(&self) -> &'static str;

    /// Transition used when the screen is shown
    fn animation(&self) -> &'static str {
        "newdata"
    }

    /// Routes that activate this module
    fn routes(&self) -> Vec<Route>;

    /// Produce the screen markup
    fn render(&self) -> String;

    /// Attach behavior and apply initial state.
    ///
    /// # Errors
    ///
    /// Returns a [`ScreenError`] if initialization fails.
    fn bind(&mut self) -> BoxFuture<'_, Result<(), ScreenError>>;

    /// Release widgets and stop reacting to events
    fn destroy(&mut self);
}
