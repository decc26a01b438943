use clap::{Args, Subcommand, ValueEnum};
use mealweek_shared::Result;
use mealweek_shared::user::CurrentUser;
use serde_json::json;

use crate::app::App;

use super::{UserArgs, print_json};

#[derive(Subcommand)]
pub enum PlansCommand {
    /// List the user's plans, newest first
    List(UserArgs),
    /// Show one plan with its shopping items
    Show(ShowArgs),
    /// Delete one plan and its items
    Delete(PlanArgs),
}

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub user: UserArgs,

    /// Plan id
    #[arg(long)]
    pub id: String,
}

#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub plan: PlanArgs,

    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

pub async fn run_plans(app: &App, command: PlansCommand) -> Result<()> {
    match command {
        PlansCommand::List(user) => {
            let plans = app.plans.list(&CurrentUser::from(user)).await?;
            print_json(&json!({ "plans": plans }))?;
        }
        PlansCommand::Show(args) => {
            let user = CurrentUser::from(args.plan.user);
            match args.format {
                OutputFormat::Json => {
                    let (plan, items) = app.plans.get(&user, &args.plan.id).await?;
                    print_json(&json!({ "plan": plan, "items": items }))?;
                }
                OutputFormat::Csv => {
                    print!("{}", app.plans.export_csv(&user, &args.plan.id).await?);
                }
            }
        }
        PlansCommand::Delete(args) => {
            app.plans
                .delete(&CurrentUser::from(args.user), &args.id)
                .await?;
            print_json(&json!({ "ok": true }))?;
        }
    }

    Ok(())
}
