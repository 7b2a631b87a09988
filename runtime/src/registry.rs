//! Screen module registry.
//!
//! Modules register themselves together with the routes that activate them.
//! Activating a route destroys the screen currently shown, then renders and
//! binds the target module.

use shelter_core::screen::{ScreenError, ScreenModule};
use std::collections::HashMap;

/// Registry of screen modules keyed by name, with a route table.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: HashMap<&'static str, Box<dyn ScreenModule>>,
    routes: HashMap<&'static str, &'static str>,
    active: Option<&'static str>,
}

impl ModuleRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module and its routes.
    ///
    /// A module registered under an existing name replaces the previous one.
    pub fn register(&mut self, module: Box<dyn ScreenModule>) {
        let name = module.name();
        for route in module.routes() {
            tracing::debug!(route = route.path, module = route.module, "Registering route");
            self.routes.insert(route.path, route.module);
        }
        self.modules.insert(name, module);
    }

    /// Names of all registered routes
    #[must_use]
    pub fn routes(&self) -> Vec<&'static str> {
        let mut routes: Vec<_> = self.routes.keys().copied().collect();
        routes.sort_unstable();
        routes
    }

    /// Name of the module currently shown
    #[must_use]
    pub const fn active(&self) -> Option<&'static str> {
        self.active
    }

    /// Look up a registered module
    #[must_use]
    pub fn module(&self, name: &str) -> Option<&dyn ScreenModule> {
        self.modules.get(name).map(AsRef::as_ref)
    }

    /// Load and start the module for `route`, returning its markup.
    ///
    /// Any query string after `?` is ignored for route matching.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::UnknownRoute`] when no module handles the route,
    /// or the module's own error if binding fails.
    pub async fn activate(&mut self, route: &str) -> Result<String, ScreenError> {
        let path = route.split('?').next().unwrap_or(route);
        let Some(&name) = self.routes.get(path) else {
            tracing::warn!(route, "No module registered for route");
            return Err(ScreenError::UnknownRoute(path.to_string()));
        };

        if let Some(previous) = self.active.take() {
            if let Some(module) = self.modules.get_mut(previous) {
                tracing::debug!(module = previous, "Destroying active module");
                module.destroy();
            }
        }

        let module = self
            .modules
            .get_mut(name)
            .ok_or_else(|| ScreenError::UnknownRoute(path.to_string()))?;

        let markup = module.render();
        module.bind().await?;
        self.active = Some(name);

        tracing::info!(module = name, title = %module.title(), "Screen activated");
        Ok(markup)
    }
}
