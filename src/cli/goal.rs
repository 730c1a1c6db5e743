//! CLI commands for savings goals

use crate::config::Settings;
use crate::error::{FiscallyError, FiscallyResult};
use crate::models::{GoalId, Money, Month};
use crate::reports::{AllocationReport, BudgetAnalysisReport};
use crate::services::GoalService;
use crate::storage::{JsonSnapshotStore, ProfileSource};
use clap::Subcommand;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use super::report::build_dashboard;

/// Goal subcommands
#[derive(Subcommand, Debug)]
pub enum GoalCommands {
    /// Show how the monthly savings pool is split across goals
    Allocate {
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show progress and projected completion for each goal
    Progress,

    /// Show the monthly saving each goal needs to hit its target date
    Analysis,

    /// Record a contribution toward a goal
    Save {
        /// Goal ID
        goal: String,

        /// Amount (e.g., "1500" or "1,500.50")
        amount: String,
    },
}

/// Handle goal commands
pub fn handle_goal_command(
    store: &JsonSnapshotStore,
    settings: &Settings,
    cmd: GoalCommands,
) -> FiscallyResult<()> {
    let service = GoalService::new(store, &settings.engine);
    let profile = store.load_profile()?;
    let today = chrono::Local::now().date_naive();

    match cmd {
        GoalCommands::Allocate { output } => {
            let matrix = service.allocate(&profile, today);
            let report = AllocationReport::new(&matrix);

            if let Some(path) = output {
                let file = File::create(&path).map_err(|e| {
                    FiscallyError::Export(format!(
                        "Failed to create file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                report.export_csv(BufWriter::new(file))?;
                println!("Allocation exported to: {}", path.display());
            } else {
                println!("{}", report.format_terminal());
            }
        }

        GoalCommands::Progress => {
            let plan = service.plan(&profile, month_spent(store, settings, today)?, today);
            println!(
                "{}",
                AllocationReport::new(&plan.allocation)
                    .with_progress(&plan.progress)
                    .format_terminal()
            );
        }

        GoalCommands::Analysis => {
            let plan = service.plan(&profile, month_spent(store, settings, today)?, today);
            println!("{}", BudgetAnalysisReport::new(&plan.analysis).format_terminal());
        }

        GoalCommands::Save { goal, amount } => {
            let amount = Money::parse(&amount).map_err(|e| {
                FiscallyError::Validation(format!("Invalid amount '{}': {}", amount, e))
            })?;
            let goal = service.save_to_goal(&GoalId::from(goal.as_str()), amount)?;

            println!("Saved {} to '{}'", amount, goal.label);
            println!("  Saved so far: {} of {}", goal.saved_amount, goal.target_amount);
        }
    }

    Ok(())
}

/// Spend recorded so far in the month containing `today`
fn month_spent(
    store: &JsonSnapshotStore,
    settings: &Settings,
    today: chrono::NaiveDate,
) -> FiscallyResult<Money> {
    let dashboard = build_dashboard(store, settings, Month::containing(today), today)?;
    Ok(dashboard.aggregate.total_spent)
}
