use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use nestegg::{
    DataDirectory, ProjectOptions, ScenarioAction, SimulateOptions, commands, init_logging,
};
use nestegg_core::model::Period;

#[derive(Parser, Debug)]
#[command(name = "nestegg")]
#[command(about = "Cash-flow projection and Monte Carlo retirement simulation")]
struct Args {
    /// Path to the data directory (default: ~/.nestegg/)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Expand revenues and expenses into daily and period totals
    Project {
        /// Projection request (.yaml, .yml or .json)
        file: PathBuf,

        /// Only print this aggregation (weekly, monthly, quarterly, annual)
        #[arg(short, long)]
        period: Option<Period>,

        /// Also print the day-by-day ledger
        #[arg(long)]
        daily: bool,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Run a Monte Carlo retirement simulation
    Simulate {
        /// Simulation parameters (.yaml, .yml or .json); defaults when omitted
        file: Option<PathBuf>,

        /// Use a saved scenario instead of a file
        #[arg(short, long)]
        scenario: Option<String>,

        /// Number of simulated paths
        #[arg(long)]
        paths: Option<usize>,

        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,

        /// Print the full summary, path matrix included, as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage saved scenarios
    Scenario {
        #[command(subcommand)]
        action: ScenarioCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ScenarioCommand {
    /// Validate a parameter file and store it under NAME
    Save { name: String, file: PathBuf },
    /// Print a stored scenario as YAML
    Show { name: String },
    /// List stored scenarios
    List,
    /// Remove a stored scenario
    Delete { name: String },
}

impl From<ScenarioCommand> for ScenarioAction {
    fn from(command: ScenarioCommand) -> Self {
        match command {
            ScenarioCommand::Save { name, file } => ScenarioAction::Save { name, file },
            ScenarioCommand::Show { name } => ScenarioAction::Show { name },
            ScenarioCommand::List => ScenarioAction::List,
            ScenarioCommand::Delete { name } => ScenarioAction::Delete { name },
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(DataDirectory::default_path);

    init_logging(&data_dir, &args.log_level)?;

    let store = DataDirectory::new(data_dir);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = match args.command {
        Command::Project {
            file,
            period,
            daily,
            json,
        } => commands::project(
            &ProjectOptions {
                file,
                period,
                daily,
                json,
            },
            &mut out,
        ),
        Command::Simulate {
            file,
            scenario,
            paths,
            seed,
            json,
        } => commands::simulate(
            &store,
            &SimulateOptions {
                file,
                scenario,
                paths,
                seed,
                json,
            },
            &mut out,
        ),
        Command::Scenario { action } => commands::scenario(&store, &action.into(), &mut out),
    };

    if let Err(err) = &result {
        tracing::error!("{err:#}");
    }
    out.flush()?;
    result
}
