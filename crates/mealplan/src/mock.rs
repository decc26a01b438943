use mealweek_shared::mealplan::{
    DAYS_PER_WEEK, DayPlan, Ingredient, Meal, MealSlot, PlanTotals, StructuredPlan,
};

fn ingredient(name: &str, quantity: f64, unit: &str, section: &str) -> Ingredient {
    Ingredient {
        name: name.to_owned(),
        quantity,
        unit: Some(unit.to_owned()),
        section: Some(section.to_owned()),
    }
}

fn catalog() -> Vec<Meal> {
    vec![
        Meal {
            title: "Greek yogurt bowl".to_owned(),
            slot: MealSlot::Breakfast,
            ingredients: vec![
                ingredient("Greek yogurt", 500.0, "g", "Dairy"),
                ingredient("Mixed berries", 300.0, "g", "Produce"),
                ingredient("Honey", 50.0, "g", "Pantry"),
            ],
        },
        Meal {
            title: "Chicken wraps".to_owned(),
            slot: MealSlot::Lunch,
            ingredients: vec![
                ingredient("Chicken breast", 400.0, "g", "Meat"),
                ingredient("Tortilla wraps", 6.0, "pcs", "Bakery"),
                ingredient("Lettuce", 1.0, "head", "Produce"),
                ingredient("Yogurt dressing", 100.0, "g", "Dairy"),
            ],
        },
        Meal {
            title: "Salmon & rice".to_owned(),
            slot: MealSlot::Dinner,
            ingredients: vec![
                ingredient("Salmon fillets", 2.0, "pcs", "Fish"),
                ingredient("Rice", 200.0, "g", "Pantry"),
                ingredient("Asparagus", 250.0, "g", "Produce"),
            ],
        },
    ]
}

/// Fixed plan used when no generator credential is configured, and as the
/// fallback when generation misbehaves: the same three catalog meals on
/// each of the 7 days.
pub fn mock_plan(week_start: &str) -> StructuredPlan {
    let meals = catalog();
    let days = (1..=DAYS_PER_WEEK as u8)
        .map(|day| DayPlan {
            day,
            meals: meals.clone(),
        })
        .collect();

    StructuredPlan {
        week_start: week_start.to_owned(),
        days,
        totals: PlanTotals {
            calories: 1600.0,
            protein: 110.0,
            carbs: 150.0,
            fat: 53.0,
        },
        shopping_list: vec![],
    }
}
