use std::sync::Arc;

use mealweek_db::{NewPlan, NewPlanItem, PlanItemRow, PlanRow, Store};
use mealweek_shared::mealplan::Ingredient;
use mealweek_shared::user::CurrentUser;
use mealweek_shared::{Error, Result, add_days, iso_date, month_key, parse_iso_date, today_utc};
use mealweek_user::UsageGate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::generator::{PlanGenerator, PlanPreferences};

const DEFAULT_TITLE: &str = "My Weekly Plan";

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct GenerateRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub preferences: PlanPreferences,
}

#[derive(Debug, Serialize)]
pub struct GeneratedPlan {
    pub plan: PlanRow,
    pub shopping_list: Vec<Ingredient>,
    /// False when the quota tables were unavailable and generation went
    /// through untracked.
    pub tracked: bool,
}

/// Orchestrates one generation request: gate, generate, aggregate, persist.
/// Also the read/delete/export surface over stored plans.
pub struct PlanService {
    store: Arc<dyn Store>,
    generator: PlanGenerator,
    gate: UsageGate,
}

impl PlanService {
    pub fn new(store: Arc<dyn Store>, generator: PlanGenerator, gate: UsageGate) -> Self {
        Self {
            store,
            generator,
            gate,
        }
    }

    pub async fn generate(
        &self,
        user: &CurrentUser,
        request: GenerateRequest,
    ) -> Result<GeneratedPlan> {
        if user.id.is_empty() {
            return Err(Error::Auth);
        }
        request.validate()?;

        let today = today_utc();
        let pass = self.gate.check_and_reserve(&user.id, &month_key(today)).await?;

        let week_start = iso_date(today);
        let mut plan = self.generator.generate(&request.preferences, &week_start).await;
        plan.shopping_list = mealweek_shopping::aggregate(&plan);

        let start = parse_iso_date(&plan.week_start).unwrap_or(today);
        let items: Vec<NewPlanItem> = plan.shopping_list.iter().map(to_item).collect();

        let row = self
            .store
            .insert_plan(
                NewPlan {
                    user_id: user.id.clone(),
                    title: request
                        .title
                        .unwrap_or_else(|| DEFAULT_TITLE.to_owned()),
                    start_date: iso_date(start),
                    end_date: iso_date(add_days(start, 6)),
                },
                &items,
            )
            .await?;

        tracing::info!(
            plan_id = %row.id,
            user_id = %user.id,
            items = items.len(),
            tracked = pass.tracked,
            "plan generated"
        );

        Ok(GeneratedPlan {
            plan: row,
            shopping_list: plan.shopping_list,
            tracked: pass.tracked,
        })
    }

    pub async fn list(&self, user: &CurrentUser) -> Result<Vec<PlanRow>> {
        if user.id.is_empty() {
            return Err(Error::Auth);
        }

        Ok(self.store.list_plans(&user.id).await?)
    }

    pub async fn get(
        &self,
        user: &CurrentUser,
        plan_id: &str,
    ) -> Result<(PlanRow, Vec<PlanItemRow>)> {
        if user.id.is_empty() {
            return Err(Error::Auth);
        }

        self.store
            .find_plan(&user.id, plan_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("plan {plan_id}")))
    }

    pub async fn delete(&self, user: &CurrentUser, plan_id: &str) -> Result<()> {
        if user.id.is_empty() {
            return Err(Error::Auth);
        }

        if self.store.delete_plan(&user.id, plan_id).await? {
            tracing::info!(plan_id = %plan_id, user_id = %user.id, "plan deleted");
            Ok(())
        } else {
            Err(Error::NotFound(format!("plan {plan_id}")))
        }
    }

    /// CSV of a stored plan's shopping items.
    pub async fn export_csv(&self, user: &CurrentUser, plan_id: &str) -> Result<String> {
        let (_, items) = self.get(user, plan_id).await?;
        let rows: Vec<Ingredient> = items.iter().map(to_ingredient).collect();

        mealweek_shopping::export::csv(&rows)
    }
}

fn to_item(ingredient: &Ingredient) -> NewPlanItem {
    NewPlanItem {
        name: ingredient.name.clone(),
        quantity: ingredient.quantity,
        unit: ingredient.unit.clone(),
        section: ingredient.section.clone(),
    }
}

fn to_ingredient(row: &PlanItemRow) -> Ingredient {
    Ingredient {
        name: row.name.clone(),
        quantity: row.quantity,
        unit: row.unit.clone(),
        section: row.section.clone(),
    }
}
