use std::sync::Arc;

use mealweek_db::{Store, StoreResult};
use mealweek_shared::user::SubscriptionStatus;

/// Read side of the billing collaborator. Subscription rows are written
/// elsewhere; a missing row means free tier.
pub struct Subscriptions {
    store: Arc<dyn Store>,
}

impl Subscriptions {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn status(&self, user_id: &str) -> StoreResult<SubscriptionStatus> {
        Ok(self
            .store
            .subscription_status(user_id)
            .await?
            .unwrap_or_default())
    }
}
