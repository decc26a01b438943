use clap::Args;
use mealweek_mealplan::{GenerateRequest, PlanPreferences};
use mealweek_shared::Result;
use mealweek_shared::user::CurrentUser;

use crate::app::App;

use super::{UserArgs, print_json};

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub user: UserArgs,

    /// Plan title
    #[arg(long)]
    pub title: Option<String>,

    /// Daily calorie target forwarded to the generator
    #[arg(long)]
    pub calories: Option<i64>,

    /// Dietary tag, repeatable
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Free-form generation notes
    #[arg(long)]
    pub notes: Option<String>,
}

pub async fn run_generate(app: &App, args: GenerateArgs) -> Result<()> {
    let user = CurrentUser::from(args.user);
    let request = GenerateRequest {
        title: args.title,
        preferences: PlanPreferences {
            target_calories: args.calories,
            tags: args.tags,
            notes: args.notes,
        },
    };

    let generated = app.plans.generate(&user, request).await?;
    print_json(&generated)?;

    Ok(())
}
