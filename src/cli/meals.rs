use clap::{Args, Subcommand};
use mealweek_meal::{CreateMealInput, MealIngredientInput, SuggestRequest};
use mealweek_shared::Result;
use mealweek_shared::mealplan::MealSlot;
use serde_json::json;

use crate::app::App;

use super::print_json;

#[derive(Subcommand)]
pub enum MealsCommand {
    /// Add a meal to the catalog
    Add(AddMealArgs),
    /// List meals, optionally filtered by slot and tags
    List(ListMealsArgs),
    /// Show one meal with its ingredients
    Show(MealIdArgs),
    /// Delete a meal and its ingredients
    Delete(MealIdArgs),
    /// Rank meals against a calorie target
    Suggest(SuggestArgs),
}

#[derive(Args)]
pub struct AddMealArgs {
    #[arg(long)]
    pub title: String,

    /// breakfast, lunch, dinner or snack
    #[arg(long, value_parser = parse_slot)]
    pub slot: MealSlot,

    #[arg(long)]
    pub calories: i64,

    #[arg(long)]
    pub protein: Option<f64>,

    #[arg(long)]
    pub carbs: Option<f64>,

    #[arg(long)]
    pub fat: Option<f64>,

    /// Tag, repeatable
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    #[arg(long)]
    pub instructions: Option<String>,

    /// Ingredient spec `name|quantity|unit|section`, repeatable; all parts
    /// after the name are optional
    #[arg(long = "ingredient", value_parser = parse_ingredient_spec)]
    pub ingredients: Vec<MealIngredientInput>,
}

#[derive(Args)]
pub struct ListMealsArgs {
    #[arg(long, value_parser = parse_slot)]
    pub slot: Option<MealSlot>,

    /// Tag to match, repeatable; meals carrying any of them are kept
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

#[derive(Args)]
pub struct MealIdArgs {
    /// Meal id
    #[arg(long)]
    pub id: String,
}

#[derive(Args)]
pub struct SuggestArgs {
    /// Daily calorie target
    #[arg(long)]
    pub calories: i64,

    #[arg(long, value_parser = parse_slot)]
    pub slot: Option<MealSlot>,

    #[arg(long = "tag")]
    pub tags: Vec<String>,

    #[arg(long)]
    pub limit: Option<usize>,
}

pub async fn run_meals(app: &App, command: MealsCommand) -> Result<()> {
    match command {
        MealsCommand::Add(args) => {
            let meal = app
                .meals
                .create(CreateMealInput {
                    title: args.title,
                    slot: args.slot,
                    calories: args.calories,
                    protein: args.protein,
                    carbs: args.carbs,
                    fat: args.fat,
                    tags: args.tags,
                    instructions: args.instructions,
                    ingredients: args.ingredients,
                })
                .await?;
            print_json(&json!({ "meal": meal }))?;
        }
        MealsCommand::List(args) => {
            let meals = app.meals.list(args.slot, args.tags).await?;
            print_json(&json!({ "meals": meals }))?;
        }
        MealsCommand::Show(args) => {
            let (meal, ingredients) = app.meals.get(&args.id).await?;
            print_json(&json!({ "meal": meal, "ingredients": ingredients }))?;
        }
        MealsCommand::Delete(args) => {
            app.meals.delete(&args.id).await?;
            print_json(&json!({ "ok": true }))?;
        }
        MealsCommand::Suggest(args) => {
            let meals = app
                .meals
                .suggest(SuggestRequest {
                    target_calories: args.calories,
                    slot: args.slot,
                    tags: args.tags,
                    limit: args.limit,
                })
                .await?;
            print_json(&json!({ "meals": meals }))?;
        }
    }

    Ok(())
}

fn parse_slot(raw: &str) -> std::result::Result<MealSlot, String> {
    raw.parse().map_err(|_| format!("unknown slot: {raw}"))
}

fn parse_ingredient_spec(raw: &str) -> std::result::Result<MealIngredientInput, String> {
    let mut parts = raw.splitn(4, '|').map(str::trim);

    let name = parts
        .next()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| "ingredient needs a name".to_owned())?;

    let quantity = match parts.next() {
        None | Some("") => None,
        Some(quantity) => Some(
            quantity
                .parse::<f64>()
                .map_err(|_| format!("bad quantity: {quantity}"))?,
        ),
    };

    let unit = parts.next().filter(|part| !part.is_empty()).map(str::to_owned);
    let section = parts.next().filter(|part| !part.is_empty()).map(str::to_owned);

    Ok(MealIngredientInput {
        name: name.to_owned(),
        quantity,
        unit,
        section,
    })
}
