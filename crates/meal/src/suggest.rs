use mealweek_db::MealRow;

/// Rank candidates by calorie distance to the target, ascending. The input
/// comes in newest-first and the sort is stable, so ties keep recent meals
/// in front.
pub fn rank(mut candidates: Vec<MealRow>, target_calories: i64, limit: usize) -> Vec<MealRow> {
    candidates.sort_by_key(|meal| (meal.calories - target_calories).abs());
    candidates.truncate(limit);

    candidates
}
