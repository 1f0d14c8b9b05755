use crate::{
    config::Config,
    ledger::DailyLedger,
    registry::UserRegistry,
    ritual::RitualEvaluator,
    store::SharedStore,
};
use std::sync::Arc;

pub type SharedBot = Arc<Bot>;

pub struct Bot {
    pub config: Config,
    pub registry: UserRegistry,
    pub ritual: RitualEvaluator,
}

impl Bot {
    pub fn new(config: Config, store: SharedStore) -> Self {
        let registry = UserRegistry::new(store.clone());
        let ledger = DailyLedger::new(store);
        Self {
            config,
            ritual: RitualEvaluator::new(registry.clone(), ledger),
            registry,
        }
    }
}
