//! Entry Point Resolution
//!
//! The activated artifact exposes a single well-known entry point. It is
//! looked up by name, constructed, and then every lifecycle query from the
//! host is forwarded to it.

use super::ActivationError;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Data the host hands to the entry point during setup
pub type InjectedData = HashMap<String, Value>;

/// Lifecycle queries the host asks of the artifact's entry point
pub trait EntryPoint {
    /// Fully-qualified names of code transformers to install
    fn transformer_classes(&self) -> Vec<String>;
    fn container_class(&self) -> Option<String>;
    fn setup_class(&self) -> Option<String>;
    fn access_transformer_class(&self) -> Option<String>;
    fn inject_data(&mut self, data: &InjectedData);
}

/// Finds and constructs an entry point by name
pub trait EntryPointResolver {
    fn resolve(&self, name: &str) -> Result<Box<dyn EntryPoint>, ActivationError>;
}

/// Constructor registered for an entry-point name
pub type EntryPointFactory = Box<dyn Fn() -> Result<Box<dyn EntryPoint>, String>>;

/// Name → constructor table
#[derive(Default)]
pub struct EntryPointRegistry {
    factories: HashMap<String, EntryPointFactory>,
}

impl EntryPointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Box<dyn EntryPoint>, String> + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}

impl EntryPointResolver for EntryPointRegistry {
    fn resolve(&self, name: &str) -> Result<Box<dyn EntryPoint>, ActivationError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| ActivationError::EntryPointNotFound(name.to_string()))?;

        factory().map_err(|reason| ActivationError::Instantiation {
            name: name.to_string(),
            reason,
        })
    }
}

/// What the bootstrap hands back to the host.
///
/// Forwards every query to the resolved entry point; without one, queries
/// answer empty/`None` and data injection is a no-op.
pub struct ActivatedLoader {
    entry_point: Option<Box<dyn EntryPoint>>,
}

impl ActivatedLoader {
    pub fn new(entry_point: Box<dyn EntryPoint>) -> Self {
        Self {
            entry_point: Some(entry_point),
        }
    }

    /// Loader with nothing behind it
    pub fn inert() -> Self {
        Self { entry_point: None }
    }

    pub fn is_inert(&self) -> bool {
        self.entry_point.is_none()
    }
}

impl std::fmt::Debug for ActivatedLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivatedLoader")
            .field("inert", &self.is_inert())
            .finish()
    }
}

impl EntryPoint for ActivatedLoader {
    fn transformer_classes(&self) -> Vec<String> {
        self.entry_point
            .as_ref()
            .map(|e| e.transformer_classes())
            .unwrap_or_default()
    }

    fn container_class(&self) -> Option<String> {
        self.entry_point.as_ref().and_then(|e| e.container_class())
    }

    fn setup_class(&self) -> Option<String> {
        self.entry_point.as_ref().and_then(|e| e.setup_class())
    }

    fn access_transformer_class(&self) -> Option<String> {
        self.entry_point
            .as_ref()
            .and_then(|e| e.access_transformer_class())
    }

    fn inject_data(&mut self, data: &InjectedData) {
        match self.entry_point.as_mut() {
            Some(entry_point) => entry_point.inject_data(data),
            None => debug!(keys = data.len(), "no entry point, dropping injected data"),
        }
    }
}
