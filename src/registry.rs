use anyhow::Result;
use tracing::{debug, info};

use crate::data::UserRecord;
use crate::store::SharedStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Created,
    AlreadyRegistered,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub created: usize,
    pub existing: usize,
}

/// A server member as seen by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentMember {
    pub user_id: String,
    pub display_name: String,
}

impl PresentMember {
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
        }
    }
}

#[derive(Clone)]
pub struct UserRegistry {
    store: SharedStore,
}

impl UserRegistry {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Creates a zero-point record unless one exists. An existing record is left untouched.
    pub async fn ensure_registered(&self, user_id: &str, display_name: &str) -> Result<Registration> {
        let record = UserRecord::new(user_id, display_name);
        if self.store.insert_user_if_absent(&record).await? {
            debug!("Registered user {} ({})", user_id, display_name);
            Ok(Registration::Created)
        } else {
            debug!("User {} already registered", user_id);
            Ok(Registration::AlreadyRegistered)
        }
    }

    pub async fn add_points(&self, user_id: &str, delta: i64) -> Result<i64> {
        self.store.increment_points(user_id, delta).await
    }

    pub async fn get(&self, user_id: &str) -> Result<Option<UserRecord>> {
        self.store.get_user(user_id).await
    }

    pub async fn list_all(&self) -> Result<Vec<UserRecord>> {
        self.store.list_users().await
    }

    /// Registers every member that has no record yet.
    pub async fn reconcile(&self, members: &[PresentMember]) -> Result<ReconcileSummary> {
        let mut summary = ReconcileSummary::default();
        for member in members {
            match self.ensure_registered(&member.user_id, &member.display_name).await? {
                Registration::Created => summary.created += 1,
                Registration::AlreadyRegistered => {
                    info!("{} already in table", member.user_id);
                    summary.existing += 1;
                }
            }
        }
        Ok(summary)
    }
}
