use std::collections::HashMap;

use mealweek_shared::mealplan::{Ingredient, StructuredPlan};

type MergeKey = (String, String, String);

/// The tuple identifying "the same" ingredient across meals: lowercased
/// trimmed name, unit and section (missing unit/section count as empty).
fn merge_key(ingredient: &Ingredient) -> MergeKey {
    (
        ingredient.name.trim().to_lowercase(),
        ingredient.unit.clone().unwrap_or_default(),
        ingredient.section.clone().unwrap_or_default(),
    )
}

fn section_of(ingredient: &Ingredient) -> &str {
    ingredient.section.as_deref().unwrap_or_default()
}

/// Collapse every ingredient of every meal of every day into one row per
/// merge key, summing quantities. The first occurrence of a key decides the
/// displayed casing, unit and section.
///
/// Output ordering is fixed: section ascending (a missing section sorts
/// first as the empty string), insertion order within a section. Pure and
/// deterministic; a zero or missing quantity still yields a row.
pub fn aggregate(plan: &StructuredPlan) -> Vec<Ingredient> {
    let mut order: Vec<MergeKey> = Vec::new();
    let mut merged: HashMap<MergeKey, Ingredient> = HashMap::new();

    for ingredient in plan.ingredients() {
        let key = merge_key(ingredient);
        match merged.get_mut(&key) {
            Some(entry) => entry.quantity += ingredient.quantity,
            None => {
                order.push(key.clone());
                merged.insert(
                    key,
                    Ingredient {
                        name: ingredient.name.trim().to_owned(),
                        quantity: ingredient.quantity,
                        unit: ingredient.unit.clone(),
                        section: ingredient.section.clone(),
                    },
                );
            }
        }
    }

    let mut list: Vec<Ingredient> = order
        .into_iter()
        .filter_map(|key| merged.remove(&key))
        .collect();

    // Stable sort keeps insertion order within a section.
    list.sort_by(|a, b| section_of(a).cmp(section_of(b)));

    list
}
