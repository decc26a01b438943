use serde::{Deserialize, Serialize};

pub const DAYS_PER_WEEK: usize = 7;

/// One shopping-list or recipe line. A missing quantity counts as 0 but the
/// line is still kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    /// Lenient parse for slot strings coming from outside the system;
    /// anything unrecognized becomes dinner rather than failing the plan.
    pub fn normalize(raw: &str) -> MealSlot {
        raw.trim().to_lowercase().parse().unwrap_or(MealSlot::Dinner)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub title: String,
    pub slot: MealSlot,
    pub ingredients: Vec<Ingredient>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    /// 1-based position within the week.
    pub day: u8,
    pub meals: Vec<Meal>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// A full week of meals. `days` always holds exactly [`DAYS_PER_WEEK`]
/// entries; `shopping_list` is derived by aggregation, never authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredPlan {
    pub week_start: String,
    pub days: Vec<DayPlan>,
    pub totals: PlanTotals,
    #[serde(default)]
    pub shopping_list: Vec<Ingredient>,
}

impl StructuredPlan {
    /// Every ingredient of every meal, in day-then-slot-then-ingredient
    /// order.
    pub fn ingredients(&self) -> impl Iterator<Item = &Ingredient> {
        self.days
            .iter()
            .flat_map(|day| day.meals.iter())
            .flat_map(|meal| meal.ingredients.iter())
    }
}
