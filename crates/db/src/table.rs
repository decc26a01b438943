use sea_query::Iden;

#[derive(Iden, Clone, Copy)]
pub enum Meal {
    #[iden = "meals"]
    Table,
    Id,
    Title,
    MealType,
    Calories,
    Protein,
    Carbs,
    Fat,
    Tags,
    Instructions,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum MealIngredient {
    #[iden = "meal_ingredients"]
    Table,
    Id,
    MealId,
    Name,
    Quantity,
    Unit,
    Section,
}

#[derive(Iden, Clone, Copy)]
pub enum MealPlan {
    #[iden = "meal_plans"]
    Table,
    Id,
    UserId,
    Title,
    StartDate,
    EndDate,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum PlanItem {
    #[iden = "plan_items"]
    Table,
    Id,
    PlanId,
    Name,
    Quantity,
    Unit,
    Section,
}

#[derive(Iden, Clone, Copy)]
pub enum UsageCounter {
    #[iden = "usage_counters"]
    Table,
    UserId,
    Month,
    PlansCreated,
}

#[derive(Iden, Clone, Copy)]
pub enum Subscription {
    #[iden = "subscriptions"]
    Table,
    UserId,
    Status,
}
