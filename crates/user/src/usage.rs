use std::sync::Arc;

use mealweek_db::{Store, StoreError, UsageReservation};
use mealweek_shared::user::SubscriptionStatus;
use mealweek_shared::{Error, Result};

use crate::Subscriptions;

pub const FREE_MONTHLY_LIMIT: u32 = 3;

/// A request admitted through the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatePass {
    /// False when the tracking tables were unavailable and the request went
    /// through untracked.
    pub tracked: bool,
    /// Counter value after the reservation, when tracked.
    pub used: Option<u32>,
}

impl GatePass {
    fn untracked() -> GatePass {
        GatePass {
            tracked: false,
            used: None,
        }
    }
}

/// Monthly cap on plan generation for free users. Pro users always pass but
/// their usage is still recorded.
pub struct UsageGate {
    store: Arc<dyn Store>,
    subscriptions: Subscriptions,
    free_limit: u32,
}

impl UsageGate {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_limit(store, FREE_MONTHLY_LIMIT)
    }

    pub fn with_limit(store: Arc<dyn Store>, free_limit: u32) -> Self {
        Self {
            subscriptions: Subscriptions::new(store.clone()),
            store,
            free_limit,
        }
    }

    /// Admit or reject one plan-generation attempt for `(user_id, month)`,
    /// consuming a quota slot on admit.
    ///
    /// Store failures never block generation: the gate logs and admits the
    /// request untracked. The only rejection is an explicit exhausted
    /// reservation, surfaced as [`Error::QuotaExceeded`].
    pub async fn check_and_reserve(&self, user_id: &str, month: &str) -> Result<GatePass> {
        let status = match self.subscriptions.status(user_id).await {
            Ok(status) => status,
            Err(err) => return Ok(admit_untracked("subscription lookup", err)),
        };

        if let Err(err) = self.store.track_usage(user_id, month).await {
            return Ok(admit_untracked("usage upsert", err));
        }

        let limit = match status {
            SubscriptionStatus::Pro => None,
            SubscriptionStatus::Free => Some(self.free_limit),
        };

        match self.store.reserve_usage(user_id, month, limit).await {
            Ok(UsageReservation::Reserved { used }) => Ok(GatePass {
                tracked: true,
                used: Some(used),
            }),
            Ok(UsageReservation::Exhausted { used }) => Err(Error::QuotaExceeded {
                used,
                limit: self.free_limit,
            }),
            Err(err) => Ok(admit_untracked("usage reservation", err)),
        }
    }
}

fn admit_untracked(stage: &str, err: StoreError) -> GatePass {
    match err {
        StoreError::Unprovisioned(collection) => {
            tracing::warn!(
                collection = %collection,
                stage,
                "usage tracking not provisioned, admitting untracked"
            );
        }
        err => {
            tracing::warn!(error = %err, stage, "usage tracking unavailable, admitting untracked");
        }
    }

    GatePass::untracked()
}
