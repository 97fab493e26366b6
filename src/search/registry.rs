// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Registry of available search providers, keyed by lowercase name

use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use super::config::AppConfig;
use super::duckduckgo::DuckDuckGoProvider;
use super::provider::SearchProvider;
use super::types::SearchError;

/// Registry key of the default provider
pub const DEFAULT_PROVIDER: &str = "duckduckgo";

#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn SearchProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `provider` under its lowercased name, replacing any previous entry
    pub fn register(&mut self, provider: Arc<dyn SearchProvider>) {
        let key = provider.name().to_lowercase();
        info!(name = provider.name(), "Registered search provider");
        self.providers.insert(key, provider);
    }

    pub fn register_duckduckgo(&mut self, config: &AppConfig) -> Result<(), SearchError> {
        let provider = DuckDuckGoProvider::new(config)?;
        self.register(Arc::new(provider));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn SearchProvider>> {
        self.providers.get(&name.to_lowercase()).cloned()
    }

    pub fn default_provider(&self) -> Result<Arc<dyn SearchProvider>, SearchError> {
        self.get(DEFAULT_PROVIDER)
            .ok_or_else(|| SearchError::ProviderUnavailable {
                provider: DEFAULT_PROVIDER.to_string(),
            })
    }

    pub fn all(&self) -> Vec<Arc<dyn SearchProvider>> {
        self.providers.values().cloned().collect()
    }

    pub fn has(&self, name: &str) -> bool {
        self.providers.contains_key(&name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.providers.keys().collect();
        names.sort();
        f.debug_struct("ProviderRegistry")
            .field("providers", &names)
            .finish()
    }
}
