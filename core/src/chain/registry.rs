//! Chain integration registry.
//!
//! Integrations are registered under their chain handle at startup and the
//! registry is then shared immutably. Handle lookup happens in the routing
//! glue; by the time the core's query operations run, they see only a
//! [`CapabilitySet`] — never a chain name.

use std::collections::HashMap;
use std::sync::Arc;

use crate::chain::capabilities::CapabilitySet;

// ---------------------------------------------------------------------------
// ChainIntegration
// ---------------------------------------------------------------------------

/// One registered chain: its handle plus the capabilities it implements.
#[derive(Debug, Clone)]
pub struct ChainIntegration {
    chain: String,
    capabilities: CapabilitySet,
}

impl ChainIntegration {
    pub fn new(chain: impl Into<String>, capabilities: CapabilitySet) -> Self {
        Self {
            chain: chain.into(),
            capabilities,
        }
    }

    /// The chain handle this integration is registered under.
    pub fn chain(&self) -> &str {
        &self.chain
    }

    /// The capabilities this integration implements.
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }
}

// ---------------------------------------------------------------------------
// ChainRegistry
// ---------------------------------------------------------------------------

/// All chain integrations known to this service instance.
///
/// Registering the same handle twice replaces the earlier integration; the
/// last registration wins, which is what you want when a deployment overlays
/// a default set with site-specific providers.
#[derive(Debug, Default)]
pub struct ChainRegistry {
    chains: HashMap<String, Arc<ChainIntegration>>,
}

impl ChainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an integration under its chain handle.
    pub fn register(&mut self, integration: ChainIntegration) {
        tracing::debug!(
            chain = integration.chain(),
            capabilities = ?integration.capabilities().names(),
            "registering chain integration"
        );
        self.chains
            .insert(integration.chain().to_string(), Arc::new(integration));
    }

    /// Looks up an integration by chain handle.
    pub fn get(&self, chain: &str) -> Option<Arc<ChainIntegration>> {
        self.chains.get(chain).cloned()
    }

    /// Registered chain handles, sorted for stable listings.
    pub fn chains(&self) -> Vec<&str> {
        let mut handles: Vec<&str> = self.chains.keys().map(String::as_str).collect();
        handles.sort_unstable();
        handles
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
