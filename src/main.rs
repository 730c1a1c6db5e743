use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use fiscally::cli::{
    handle_categories, handle_export, handle_goal_command, handle_insights,
    handle_spending_report, ExportFormat, GoalCommands,
};
use fiscally::config::{FiscallyPaths, Settings};
use fiscally::models::{Money, Profile};
use fiscally::storage::{initialize_storage, JsonSnapshotStore};
use std::path::PathBuf;

/// Environment variable holding a tracing filter (e.g. `fiscally=debug`)
const LOG_ENV: &str = "FISCALLY_LOG";

#[derive(Parser)]
#[command(
    name = "fiscally",
    version,
    about = "Spending analytics and savings goal planning",
    long_about = "Fiscally aggregates your spending by category, checks it against your \
                  monthly budget, surfaces a headline insight and tip, and splits your \
                  monthly savings across prioritized goals."
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory
    Init {
        /// Monthly income (e.g., "80000")
        #[arg(long)]
        income: Option<String>,

        /// Planned monthly spending (e.g., "50000")
        #[arg(long)]
        budget: Option<String>,
    },

    /// Show current configuration and paths
    Config,

    /// List the category taxonomy
    #[command(alias = "cats")]
    Categories,

    /// Spending by category for a month
    Spending {
        /// Month to report on (YYYY-MM, default: current)
        #[arg(short, long)]
        month: Option<String>,

        /// Show top N categories only
        #[arg(long)]
        top: Option<usize>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Headline insight and tip for a month
    Insights {
        /// Month to report on (YYYY-MM, default: current)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Savings goal planning
    #[command(subcommand)]
    Goals(GoalCommands),

    /// Export computed analytics
    Export {
        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Month to export (YYYY-MM, default: current)
        #[arg(short, long)]
        month: Option<String>,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(settings: &Settings, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&settings.log_filter))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_amount(label: &str, value: Option<String>) -> Result<Option<Money>> {
    value
        .map(|v| {
            Money::parse(&v).map_err(|e| anyhow::anyhow!("Invalid {} '{}': {}", label, v, e))
        })
        .transpose()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = FiscallyPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings, cli.verbose);

    match cli.command {
        Some(Commands::Init { income, budget }) => {
            let income = parse_amount("income", income)?;
            let budget = parse_amount("budget", budget)?;
            let profile = (income.is_some() || budget.is_some()).then(|| Profile {
                monthly_income: income,
                monthly_budget: budget,
                ..Profile::default()
            });

            println!("Initializing Fiscally at: {}", paths.base_dir().display());
            initialize_storage(&paths, profile.as_ref())?;
            settings.save(&paths)?;
            println!("Done.");
        }
        Some(Commands::Config) => {
            println!("Fiscally Configuration");
            println!("======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Initialized:      {}", paths.is_initialized());
            println!();
            println!("Settings:");
            println!("  Currency:              {}", settings.currency_code);
            println!("  Log filter:            {}", settings.log_filter);
            println!(
                "  Category budget ratio: {}",
                settings.engine.category_budget_ratio
            );
            println!(
                "  Goal horizon (months): {}",
                settings.engine.default_goal_horizon_months
            );
            println!("  Over-pace factor:      {}", settings.engine.over_pace_factor);
            println!(
                "  Improvement threshold: {}%",
                settings.engine.improvement_threshold_percent
            );
        }
        Some(Commands::Categories) => {
            let store = JsonSnapshotStore::open(paths)?;
            handle_categories(&store)?;
        }
        Some(Commands::Spending { month, top, output }) => {
            let store = JsonSnapshotStore::open(paths)?;
            handle_spending_report(&store, &settings, month, top, output)?;
        }
        Some(Commands::Insights { month }) => {
            let store = JsonSnapshotStore::open(paths)?;
            handle_insights(&store, &settings, month)?;
        }
        Some(Commands::Goals(cmd)) => {
            let store = JsonSnapshotStore::open(paths)?;
            handle_goal_command(&store, &settings, cmd)?;
        }
        Some(Commands::Export {
            format,
            month,
            output,
        }) => {
            let store = JsonSnapshotStore::open(paths)?;
            handle_export(&store, &settings, format, month, output)?;
        }
        None => {
            println!("Fiscally - spending analytics and goal planning");
            println!();
            println!("Run 'fiscally --help' for usage information.");
        }
    }

    Ok(())
}
