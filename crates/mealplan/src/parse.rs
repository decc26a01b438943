use mealweek_shared::mealplan::{
    DAYS_PER_WEEK, DayPlan, Ingredient, Meal, MealSlot, PlanTotals, StructuredPlan,
};
use mealweek_shared::{iso_date, parse_iso_date};
use serde::Deserialize;

const MAX_NAME_LEN: usize = 200;
const MAX_LABEL_LEN: usize = 50;

#[derive(Deserialize)]
struct RawPlan {
    #[serde(default)]
    week_start: String,
    #[serde(default)]
    days: Vec<RawDay>,
    #[serde(default)]
    totals: RawTotals,
}

#[derive(Deserialize)]
struct RawDay {
    #[serde(default)]
    meals: Vec<RawMeal>,
}

#[derive(Deserialize)]
struct RawMeal {
    #[serde(default)]
    title: String,
    #[serde(default)]
    slot: String,
    #[serde(default)]
    ingredients: Vec<RawIngredient>,
}

#[derive(Deserialize)]
struct RawIngredient {
    #[serde(default)]
    name: String,
    #[serde(default)]
    quantity: f64,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    section: Option<String>,
}

#[derive(Deserialize, Default)]
struct RawTotals {
    #[serde(default)]
    calories: f64,
    #[serde(default)]
    protein: f64,
    #[serde(default)]
    carbs: f64,
    #[serde(default)]
    fat: f64,
}

/// Parse raw completion text into a valid plan. Returns None on any parse
/// or shape failure so the caller can degrade to the mock catalog.
pub fn parse_plan(raw: &str, default_week_start: &str) -> Option<StructuredPlan> {
    let json = extract_json_object(raw)?;
    let raw_plan: RawPlan = serde_json::from_str(json).ok()?;

    normalize(raw_plan, default_week_start)
}

/// Extract the JSON object substring from raw completion text; models like
/// to wrap their output in prose or code fences.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }

    Some(&raw[start..=end])
}

fn normalize(raw: RawPlan, default_week_start: &str) -> Option<StructuredPlan> {
    if raw.days.len() != DAYS_PER_WEEK {
        return None;
    }

    let week_start = match parse_iso_date(&raw.week_start) {
        Some(date) => iso_date(date),
        None => default_week_start.to_owned(),
    };

    // Day numbering is positional: whatever the model claimed, the i-th
    // entry becomes day i+1.
    let days = raw
        .days
        .into_iter()
        .enumerate()
        .map(|(i, day)| DayPlan {
            day: i as u8 + 1,
            meals: day.meals.into_iter().filter_map(normalize_meal).collect(),
        })
        .collect();

    Some(StructuredPlan {
        week_start,
        days,
        totals: normalize_totals(raw.totals),
        shopping_list: vec![],
    })
}

fn normalize_meal(raw: RawMeal) -> Option<Meal> {
    let title = clamp(raw.title.trim(), MAX_NAME_LEN);
    if title.is_empty() {
        return None;
    }

    Some(Meal {
        title,
        slot: MealSlot::normalize(&raw.slot),
        ingredients: raw
            .ingredients
            .into_iter()
            .filter_map(normalize_ingredient)
            .collect(),
    })
}

fn normalize_ingredient(raw: RawIngredient) -> Option<Ingredient> {
    let name = clamp(raw.name.trim(), MAX_NAME_LEN);
    if name.is_empty() {
        return None;
    }

    let quantity = if raw.quantity.is_finite() && raw.quantity >= 0.0 {
        raw.quantity
    } else {
        0.0
    };

    Some(Ingredient {
        name,
        quantity,
        unit: clamp_label(raw.unit),
        section: clamp_label(raw.section),
    })
}

fn normalize_totals(raw: RawTotals) -> PlanTotals {
    let sane = |value: f64| {
        if value.is_finite() && value >= 0.0 {
            value
        } else {
            0.0
        }
    };

    PlanTotals {
        calories: sane(raw.calories),
        protein: sane(raw.protein),
        carbs: sane(raw.carbs),
        fat: sane(raw.fat),
    }
}

fn clamp(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

fn clamp_label(value: Option<String>) -> Option<String> {
    value
        .map(|label| clamp(label.trim(), MAX_LABEL_LEN))
        .filter(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seven_days(meals: &str) -> String {
        let day = format!(r#"{{"meals":[{meals}]}}"#);
        let days: Vec<_> = (0..7).map(|_| day.clone()).collect();
        format!(
            r#"{{"week_start":"2026-08-10","days":[{}],"totals":{{"calories":1800,"protein":90,"carbs":200,"fat":60}}}}"#,
            days.join(",")
        )
    }

    #[test]
    fn parses_a_clean_completion() {
        let raw = seven_days(
            r#"{"title":"Oats","slot":"breakfast","ingredients":[{"name":"Oats","quantity":80,"unit":"g","section":"Pantry"}]}"#,
        );

        let plan = parse_plan(&raw, "2026-08-07").unwrap();

        assert_eq!(plan.days.len(), 7);
        assert_eq!(plan.week_start, "2026-08-10");
        assert_eq!(plan.days[0].meals[0].slot, MealSlot::Breakfast);
        assert_eq!(plan.totals.calories, 1800.0);
    }

    #[test]
    fn strips_code_fences_and_prose() {
        let raw = format!(
            "Here is your plan:\n```json\n{}\n```\nEnjoy!",
            seven_days(r#"{"title":"Oats","slot":"breakfast","ingredients":[]}"#)
        );

        assert!(parse_plan(&raw, "2026-08-07").is_some());
    }

    #[test]
    fn rejects_wrong_day_counts() {
        let raw = r#"{"week_start":"2026-08-10","days":[{"meals":[]}],"totals":{}}"#;

        assert!(parse_plan(raw, "2026-08-07").is_none());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse_plan("not json at all", "2026-08-07").is_none());
        assert!(parse_plan("{\"days\": [", "2026-08-07").is_none());
    }

    #[test]
    fn unknown_slots_become_dinner() {
        let raw = seven_days(r#"{"title":"Mystery","slot":"brunch","ingredients":[]}"#);

        let plan = parse_plan(&raw, "2026-08-07").unwrap();

        assert_eq!(plan.days[0].meals[0].slot, MealSlot::Dinner);
    }

    #[test]
    fn bad_quantities_and_dates_are_normalized() {
        let raw = seven_days(
            r#"{"title":"Oats","slot":"breakfast","ingredients":[{"name":"Oats","quantity":-5,"unit":"g"}]}"#,
        )
        .replace("2026-08-10", "someday");

        let plan = parse_plan(&raw, "2026-08-07").unwrap();

        assert_eq!(plan.week_start, "2026-08-07");
        assert_eq!(plan.days[0].meals[0].ingredients[0].quantity, 0.0);
    }

    #[test]
    fn nameless_ingredients_are_dropped_and_day_numbers_are_positional() {
        let raw = seven_days(
            r#"{"title":"Oats","slot":"breakfast","ingredients":[{"name":"  ","quantity":1}]}"#,
        );

        let plan = parse_plan(&raw, "2026-08-07").unwrap();

        assert!(plan.days[0].meals[0].ingredients.is_empty());
        let numbers: Vec<_> = plan.days.iter().map(|d| d.day).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7]);
    }
}
