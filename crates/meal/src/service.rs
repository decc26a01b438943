use std::sync::Arc;

use mealweek_db::{MealFilter, MealIngredientRow, MealRow, NewMeal, NewMealIngredient, Store};
use mealweek_shared::mealplan::MealSlot;
use mealweek_shared::{Error, Result};
use serde::Deserialize;
use validator::Validate;

use crate::suggest;

const DEFAULT_SUGGEST_LIMIT: usize = 10;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MealIngredientInput {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub unit: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub section: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMealInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub slot: MealSlot,
    #[validate(range(min = 0))]
    pub calories: i64,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub carbs: Option<f64>,
    #[serde(default)]
    pub fat: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub ingredients: Vec<MealIngredientInput>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SuggestRequest {
    #[validate(range(min = 1))]
    pub target_calories: i64,
    #[serde(default)]
    pub slot: Option<MealSlot>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Catalog of reusable meals. Meals are shared across users; only plans are
/// user-scoped.
pub struct MealService {
    store: Arc<dyn Store>,
}

impl MealService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: CreateMealInput) -> Result<MealRow> {
        input.validate()?;

        let row = self
            .store
            .insert_meal(NewMeal {
                title: input.title,
                meal_type: input.slot.to_string(),
                calories: input.calories,
                protein: input.protein,
                carbs: input.carbs,
                fat: input.fat,
                tags: input.tags,
                instructions: input.instructions,
                ingredients: input
                    .ingredients
                    .into_iter()
                    .map(|ingredient| NewMealIngredient {
                        name: ingredient.name,
                        quantity: ingredient.quantity,
                        unit: ingredient.unit,
                        section: ingredient.section,
                    })
                    .collect(),
            })
            .await?;

        tracing::info!(meal_id = %row.id, "meal created");

        Ok(row)
    }

    pub async fn list(&self, slot: Option<MealSlot>, tags_any: Vec<String>) -> Result<Vec<MealRow>> {
        Ok(self
            .store
            .list_meals(&MealFilter {
                meal_type: slot.map(|slot| slot.to_string()),
                tags_any,
            })
            .await?)
    }

    pub async fn get(&self, id: &str) -> Result<(MealRow, Vec<MealIngredientRow>)> {
        self.store
            .find_meal(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("meal {id}")))
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if self.store.delete_meal(id).await? {
            tracing::info!(meal_id = %id, "meal deleted");
            Ok(())
        } else {
            Err(Error::NotFound(format!("meal {id}")))
        }
    }

    pub async fn suggest(&self, request: SuggestRequest) -> Result<Vec<MealRow>> {
        request.validate()?;

        let candidates = self
            .store
            .list_meals(&MealFilter {
                meal_type: request.slot.map(|slot| slot.to_string()),
                tags_any: request.tags,
            })
            .await?;

        Ok(suggest::rank(
            candidates,
            request.target_calories,
            request.limit.unwrap_or(DEFAULT_SUGGEST_LIMIT),
        ))
    }
}
