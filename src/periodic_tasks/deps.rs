use std::sync::Arc;

use tokio::sync::Mutex;

use crate::oracle::{GasPolicy, OracleServices};

/// Shared handles for the oracle duty tasks.
#[derive(Clone)]
pub(crate) struct OracleTaskDeps {
    pub(crate) services: OracleServices,
    pub(crate) gas_policy: GasPolicy,
    /// Held for a whole cycle; both duties sign with the same account.
    pub(crate) submission_lock: Arc<Mutex<()>>,
}

impl OracleTaskDeps {
    pub(crate) fn new(services: OracleServices, gas_policy: GasPolicy) -> Self {
        Self {
            services,
            gas_policy,
            submission_lock: Arc::new(Mutex::new(())),
        }
    }
}
