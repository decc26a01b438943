use clap::{Parser, Subcommand};
use mealweek::app::App;
use mealweek::cli::{GenerateArgs, MealsCommand, PlansCommand, run_generate, run_meals, run_plans};
use mealweek::config::Config;

/// mealweek - weekly meal plans with aggregated shopping lists
#[derive(Parser)]
#[command(name = "mealweek")]
#[command(about = "Weekly meal plans with aggregated shopping lists", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and persist a weekly plan for a user
    Generate(GenerateArgs),
    /// Inspect stored plans
    Plans {
        #[command(subcommand)]
        command: PlansCommand,
    },
    /// Manage the meal catalog
    Meals {
        #[command(subcommand)]
        command: MealsCommand,
    },
    /// Run database migrations
    Migrate,
    /// Drop the database if it exists and recreate it with migrations
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.clone())?;
    mealweek::observability::init_observability(&config.observability.log_level)?;

    if let Err(err) = run(cli.command, &config).await {
        // Failures print the structured {error, details} body, matching
        // what an HTTP surface would return.
        eprintln!("{}", serde_json::to_string(&err.body())?);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(command: Commands, config: &Config) -> mealweek_shared::Result<()> {
    match command {
        Commands::Generate(args) => {
            let app = App::build(config).await?;
            run_generate(&app, args).await
        }
        Commands::Plans { command } => {
            let app = App::build(config).await?;
            run_plans(&app, command).await
        }
        Commands::Meals { command } => {
            let app = App::build(config).await?;
            run_meals(&app, command).await
        }
        Commands::Migrate => Ok(mealweek::migrate::migrate(config).await?),
        Commands::Reset => Ok(mealweek::migrate::reset(config).await?),
    }
}
