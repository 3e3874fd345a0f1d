//! Forecast backends and the name to backend registry
//!
//! The registry is built explicitly by the caller; nothing registers itself.

use std::collections::BTreeMap;

use crate::error::ForecastError;
use crate::models::{Coordinate, Forecast};

/// A complete forecast pipeline for one upstream provider
pub trait ForecastBackend: Send + Sync {
    /// Name the backend is registered under
    fn name(&self) -> &str;

    /// Fetch a forecast of up to `num_days` days for `location`
    fn fetch(&self, location: Coordinate, num_days: usize) -> crate::Result<Forecast>;
}

/// Backends keyed by name
#[derive(Default)]
pub struct BackendRegistry {
    backends: BTreeMap<String, Box<dyn ForecastBackend>>,
}

impl BackendRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a backend under its own name, replacing any previous one
    pub fn register<B: ForecastBackend + 'static>(&mut self, backend: B) -> &mut Self {
        self.backends
            .insert(backend.name().to_string(), Box::new(backend));
        self
    }

    pub fn get(&self, name: &str) -> crate::Result<&dyn ForecastBackend> {
        self.backends
            .get(name)
            .map(|backend| backend.as_ref())
            .ok_or_else(|| ForecastError::UnknownBackend {
                name: name.to_string(),
            })
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.backends.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl ForecastBackend for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn fetch(&self, location: Coordinate, _num_days: usize) -> crate::Result<Forecast> {
            Ok(Forecast {
                location,
                days: Vec::new(),
            })
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = BackendRegistry::new();
        registry.register(Named("weather.gov")).register(Named("mock"));

        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["mock", "weather.gov"]);
        assert_eq!(registry.get("mock").unwrap().name(), "mock");
    }

    #[test]
    fn test_unknown_backend() {
        let registry = BackendRegistry::new();
        assert!(registry.is_empty());
        match registry.get("met.no") {
            Err(ForecastError::UnknownBackend { name }) => assert_eq!(name, "met.no"),
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(_) => panic!("lookup should fail"),
        }
    }

    #[test]
    fn test_backend_fetch_through_registry() {
        let mut registry = BackendRegistry::new();
        registry.register(Named("mock"));

        let location = Coordinate::new(1.0, 2.0).unwrap();
        let forecast = registry.get("mock").unwrap().fetch(location, 1).unwrap();
        assert_eq!(forecast.location, location);
    }
}
