//! Named decision providers selectable from configuration.

use std::sync::Arc;

use crate::ai::{DecisionProvider, Heuristic, RandomProvider};

/// Factory definition for constructing decision providers.
pub struct ProviderFactory {
    pub name: &'static str,
    pub version: &'static str,
    pub make: fn(seed: Option<u64>) -> Arc<dyn DecisionProvider>,
}

static PROVIDER_FACTORIES: &[ProviderFactory] = &[
    ProviderFactory {
        name: Heuristic::NAME,
        version: Heuristic::VERSION,
        make: make_heuristic,
    },
    ProviderFactory {
        name: RandomProvider::NAME,
        version: RandomProvider::VERSION,
        make: make_random,
    },
];

pub fn registered_providers() -> &'static [ProviderFactory] {
    PROVIDER_FACTORIES
}

/// Case-insensitive lookup by name.
pub fn by_name(name: &str) -> Option<&'static ProviderFactory> {
    registered_providers()
        .iter()
        .find(|factory| factory.name.eq_ignore_ascii_case(name))
}

fn make_heuristic(seed: Option<u64>) -> Arc<dyn DecisionProvider> {
    Arc::new(Heuristic::new(seed))
}

fn make_random(seed: Option<u64>) -> Arc<dyn DecisionProvider> {
    Arc::new(RandomProvider::new(seed))
}
