use serde::{Deserialize, Serialize};

/// Resolved session identity, supplied by the auth collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
}

/// Billing tier of a user. Written by the billing system, read-only here;
/// a missing subscription row means free.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SubscriptionStatus {
    #[default]
    Free,
    Pro,
}
