use std::collections::HashMap;

use mealweek_shared::mealplan::{DayPlan, Ingredient, Meal, MealSlot, PlanTotals, StructuredPlan};
use mealweek_shopping::aggregate;

fn ingredient(name: &str, quantity: f64, unit: &str, section: &str) -> Ingredient {
    Ingredient {
        name: name.to_owned(),
        quantity,
        unit: (!unit.is_empty()).then(|| unit.to_owned()),
        section: (!section.is_empty()).then(|| section.to_owned()),
    }
}

fn meal(slot: MealSlot, ingredients: Vec<Ingredient>) -> Meal {
    Meal {
        title: format!("{slot} meal"),
        slot,
        ingredients,
    }
}

fn plan_of(days: Vec<Vec<Meal>>) -> StructuredPlan {
    StructuredPlan {
        week_start: "2026-08-07".to_owned(),
        days: days
            .into_iter()
            .enumerate()
            .map(|(i, meals)| DayPlan {
                day: i as u8 + 1,
                meals,
            })
            .collect(),
        totals: PlanTotals::default(),
        shopping_list: vec![],
    }
}

fn key(item: &Ingredient) -> (String, String, String) {
    (
        item.name.to_lowercase(),
        item.unit.clone().unwrap_or_default(),
        item.section.clone().unwrap_or_default(),
    )
}

#[test]
fn one_entry_per_distinct_key_with_summed_quantities() {
    let plan = plan_of(vec![
        vec![
            meal(
                MealSlot::Breakfast,
                vec![
                    ingredient("Oats", 80.0, "g", "Pantry"),
                    ingredient("Milk", 200.0, "ml", "Dairy"),
                ],
            ),
            meal(
                MealSlot::Dinner,
                vec![
                    ingredient("oats", 40.0, "g", "Pantry"),
                    ingredient("Milk", 1.0, "l", "Dairy"),
                ],
            ),
        ],
        vec![meal(
            MealSlot::Lunch,
            vec![ingredient("Oats", 80.0, "g", "Pantry")],
        )],
    ]);

    let list = aggregate(&plan);

    let mut totals: HashMap<(String, String, String), f64> = HashMap::new();
    for item in &list {
        assert!(
            totals.insert(key(item), item.quantity).is_none(),
            "duplicate merge key in output"
        );
    }

    assert_eq!(totals.len(), 3);
    assert_eq!(
        totals[&("oats".to_owned(), "g".to_owned(), "Pantry".to_owned())],
        200.0
    );
    assert_eq!(
        totals[&("milk".to_owned(), "ml".to_owned(), "Dairy".to_owned())],
        200.0
    );
    assert_eq!(
        totals[&("milk".to_owned(), "l".to_owned(), "Dairy".to_owned())],
        1.0
    );
}

#[test]
fn totals_are_iteration_order_independent() {
    let monday = meal(
        MealSlot::Breakfast,
        vec![
            ingredient("Rice", 200.0, "g", "Pantry"),
            ingredient("Salmon fillets", 2.0, "pcs", "Fish"),
        ],
    );
    let tuesday = meal(
        MealSlot::Dinner,
        vec![
            ingredient("rice", 100.0, "g", "Pantry"),
            ingredient("Lettuce", 1.0, "head", "Produce"),
        ],
    );

    let forward = aggregate(&plan_of(vec![
        vec![monday.clone()],
        vec![tuesday.clone()],
    ]));
    let backward = aggregate(&plan_of(vec![vec![tuesday], vec![monday]]));

    let forward_totals: HashMap<_, _> = forward.iter().map(|i| (key(i), i.quantity)).collect();
    let backward_totals: HashMap<_, _> = backward.iter().map(|i| (key(i), i.quantity)).collect();

    assert_eq!(forward_totals, backward_totals);
}

#[test]
fn mixed_casing_merges_into_one_row() {
    let plan = plan_of(vec![vec![meal(
        MealSlot::Dinner,
        vec![
            ingredient("Rice", 200.0, "g", ""),
            ingredient("rice", 100.0, "g", ""),
        ],
    )]]);

    let list = aggregate(&plan);

    assert_eq!(list.len(), 1);
    assert_eq!(list[0].name, "Rice");
    assert_eq!(list[0].quantity, 300.0);
    assert_eq!(list[0].unit.as_deref(), Some("g"));
}
