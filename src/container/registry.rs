//! Ordered provider registry
//!
//! Registration order is load order; exit order is the reverse. Besides
//! appending, a provider can be placed at the front or relative to an
//! already-registered provider by name.

use std::collections::HashSet;
use std::sync::Arc;

use crate::container::error::{ContainerError, ContainerResult};
use crate::container::provider::Provider;

#[derive(Default)]
pub(crate) struct ProviderRegistry {
    providers: Vec<Arc<dyn Provider>>,
    names: HashSet<String>,
}

impl ProviderRegistry {
    /// Append to the end of the load order.
    pub fn push(&mut self, provider: Arc<dyn Provider>) -> ContainerResult<()> {
        self.admit(&provider)?;
        self.providers.push(provider);
        Ok(())
    }

    /// Place at the front of the load order.
    pub fn front(&mut self, provider: Arc<dyn Provider>) -> ContainerResult<()> {
        self.admit(&provider)?;
        self.providers.insert(0, provider);
        Ok(())
    }

    /// Insert immediately before the named provider; unknown anchors fall
    /// back to the front.
    pub fn before(&mut self, anchor: &str, provider: Arc<dyn Provider>) -> ContainerResult<()> {
        self.admit(&provider)?;
        let at = self.position(anchor).unwrap_or(0);
        self.providers.insert(at, provider);
        Ok(())
    }

    /// Insert immediately after the named provider; unknown anchors fall
    /// back to the end.
    pub fn after(&mut self, anchor: &str, provider: Arc<dyn Provider>) -> ContainerResult<()> {
        self.admit(&provider)?;
        match self.position(anchor) {
            Some(at) => self.providers.insert(at + 1, provider),
            None => self.providers.push(provider),
        }
        Ok(())
    }

    /// Providers in load order.
    pub fn in_order(&self) -> Vec<Arc<dyn Provider>> {
        self.providers.clone()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    fn admit(&mut self, provider: &Arc<dyn Provider>) -> ContainerResult<()> {
        if !self.names.insert(provider.name().to_string()) {
            return Err(ContainerError::DuplicateProvider {
                name: provider.name().to_string(),
            });
        }
        Ok(())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.providers.iter().position(|p| p.name() == name)
    }
}
