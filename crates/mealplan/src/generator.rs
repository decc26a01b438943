use mealweek_shared::mealplan::StructuredPlan;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::generative::{TextClient, build_prompt};
use crate::mock::mock_plan;
use crate::parse::parse_plan;

/// Caller preferences forwarded to the generative strategy. The mock
/// strategy ignores them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PlanPreferences {
    #[serde(default)]
    #[validate(range(min = 1))]
    pub target_calories: Option<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// How plans get produced. Picked once per process from configuration:
/// generative only when a credential is present, mock otherwise, so the
/// feature works with zero external dependencies.
enum Strategy {
    Mock,
    Generative(TextClient),
}

pub struct PlanGenerator {
    strategy: Strategy,
}

impl PlanGenerator {
    pub fn mock() -> Self {
        Self {
            strategy: Strategy::Mock,
        }
    }

    pub fn generative(client: TextClient) -> Self {
        Self {
            strategy: Strategy::Generative(client),
        }
    }

    /// Produce a valid plan for the week starting `week_start`. This never
    /// fails: the generative strategy degrades to the mock catalog on any
    /// upstream or parse trouble.
    pub async fn generate(
        &self,
        preferences: &PlanPreferences,
        week_start: &str,
    ) -> StructuredPlan {
        let client = match &self.strategy {
            Strategy::Mock => return mock_plan(week_start),
            Strategy::Generative(client) => client,
        };

        match client.complete(&build_prompt(preferences, week_start)).await {
            Ok(raw) => match parse_plan(&raw, week_start) {
                Some(plan) => plan,
                None => {
                    tracing::warn!("completion did not yield a valid plan, using mock catalog");
                    mock_plan(week_start)
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "text generation failed, using mock catalog");
                mock_plan(week_start)
            }
        }
    }
}
