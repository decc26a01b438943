mod meal_ingredients;
mod meal_plans;
mod meals;
mod plan_items;
mod subscriptions;
mod usage_counters;

use sqlx_migrator::vec_box;

pub struct M0001;

sqlx_migrator::sqlite_migration!(
    M0001,
    "main",
    "m0001",
    vec_box![],
    vec_box![
        meals::Operation,
        meal_ingredients::Operation,
        meal_plans::Operation,
        plan_items::Operation,
        usage_counters::Operation,
        subscriptions::Operation
    ]
);
