//! Subcommand implementations
//!
//! Every command writes to a caller-supplied sink so output can be captured.

use std::io::Write;
use std::path::PathBuf;

use color_eyre::eyre::{WrapErr, eyre};
use nestegg_core::config::SimulationParameters;
use nestegg_core::metrics;
use nestegg_core::model::{
    AggregatedPeriod, CashFlowProjection, DailyEntry, Period, ProjectionRequest, SimulationSummary,
};

use crate::storage::ScenarioStore;
use crate::util::format::{
    format_currency, format_currency_short, format_percentage, format_percentile_label,
};
use crate::util::io::load_document;

#[derive(Debug, Clone)]
pub struct ProjectOptions {
    pub file: PathBuf,
    /// Print only this aggregation
    pub period: Option<Period>,
    /// Include the day-by-day ledger
    pub daily: bool,
    pub json: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SimulateOptions {
    pub file: Option<PathBuf>,
    pub scenario: Option<String>,
    pub paths: Option<usize>,
    pub seed: Option<u64>,
    pub json: bool,
}

#[derive(Debug, Clone)]
pub enum ScenarioAction {
    Save { name: String, file: PathBuf },
    Show { name: String },
    List,
    Delete { name: String },
}

// ============================================================================
// project
// ============================================================================

pub fn project(options: &ProjectOptions, out: &mut dyn Write) -> color_eyre::Result<()> {
    let request: ProjectionRequest = load_document(&options.file)?;
    let projection = nestegg_core::project(&request)?;
    tracing::info!(
        file = %options.file.display(),
        days = projection.daily.len(),
        "projection complete"
    );

    if options.json {
        let json = match options.period {
            Some(period) => serde_json::to_string_pretty(projection.period(period))?,
            None => serde_json::to_string_pretty(&projection)?,
        };
        writeln!(out, "{json}")?;
        return Ok(());
    }

    if options.daily {
        write_daily_table(&projection.daily, out)?;
        writeln!(out)?;
    }

    let periods: Vec<Period> = match options.period {
        Some(period) => vec![period],
        None => Period::ALL.to_vec(),
    };
    write_period_tables(&projection, &periods, out)
}

fn write_daily_table(daily: &[DailyEntry], out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "Daily")?;
    writeln!(
        out,
        "{:<12} {:>16} {:>16} {:>16}",
        "Date", "Revenue", "Expense", "Net"
    )?;
    for entry in daily {
        writeln!(
            out,
            "{:<12} {:>16} {:>16} {:>16}",
            entry.date.to_string(),
            format_currency(entry.total_revenue),
            format_currency(entry.total_expense),
            format_currency(entry.net),
        )?;
    }
    Ok(())
}

fn write_period_table(rows: &[AggregatedPeriod], out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        out,
        "{:<12} {:<12} {:>16} {:>16} {:>16}",
        "Start", "End", "Revenue", "Expense", "Net"
    )?;
    for row in rows {
        writeln!(
            out,
            "{:<12} {:<12} {:>16} {:>16} {:>16}",
            row.start_date.to_string(),
            row.end_date.to_string(),
            format_currency(row.total_revenue),
            format_currency(row.total_expense),
            format_currency(row.net),
        )?;
    }
    Ok(())
}

fn write_period_tables(
    projection: &CashFlowProjection,
    periods: &[Period],
    out: &mut dyn Write,
) -> color_eyre::Result<()> {
    for (i, period) in periods.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{}", period.label())?;
        write_period_table(projection.period(*period), out)?;
    }
    Ok(())
}

// ============================================================================
// simulate
// ============================================================================

/// Parameters from a file, a stored scenario, or the defaults, with CLI overrides applied
pub fn resolve_parameters(
    store: &dyn ScenarioStore,
    options: &SimulateOptions,
) -> color_eyre::Result<SimulationParameters> {
    let mut params = match (&options.file, &options.scenario) {
        (Some(_), Some(_)) => {
            return Err(eyre!("pass either a parameter file or --scenario, not both"));
        }
        (Some(file), None) => load_document(file)?,
        (None, Some(name)) => store
            .load(name)?
            .ok_or_else(|| eyre!("no scenario named {name:?}"))?,
        (None, None) => SimulationParameters::default(),
    };

    if let Some(paths) = options.paths {
        params.num_simulations = paths;
    }
    if let Some(seed) = options.seed {
        params.seed = Some(seed);
    }
    Ok(params)
}

pub fn simulate(
    store: &dyn ScenarioStore,
    options: &SimulateOptions,
    out: &mut dyn Write,
) -> color_eyre::Result<()> {
    let params = resolve_parameters(store, options)?;
    let summary = metrics::run(&params).wrap_err("simulation failed")?;
    tracing::info!(
        paths = summary.path_matrix.rows(),
        risk = summary.risk_of_depletion,
        "simulation complete"
    );

    if options.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
        return Ok(());
    }
    write_summary(&params, &summary, out)?;
    Ok(())
}

fn write_summary(
    params: &SimulationParameters,
    summary: &SimulationSummary,
    out: &mut dyn Write,
) -> std::io::Result<()> {
    writeln!(
        out,
        "Simulated {} paths over {} years",
        summary.path_matrix.rows(),
        summary.path_matrix.years()
    )?;
    writeln!(
        out,
        "Starting portfolio:  {}",
        format_currency_short(params.starting_portfolio)
    )?;
    writeln!(
        out,
        "Risk of depletion:   {}",
        format_percentage(summary.risk_of_depletion)
    )?;
    writeln!(
        out,
        "Median final value:  {}",
        format_currency_short(summary.median_final_value)
    )?;
    for (p, value) in &summary.final_percentiles {
        writeln!(
            out,
            "{:<4} final value:   {}",
            format_percentile_label(*p),
            format_currency_short(*value)
        )?;
    }
    Ok(())
}

// ============================================================================
// scenario
// ============================================================================

pub fn scenario(
    store: &dyn ScenarioStore,
    action: &ScenarioAction,
    out: &mut dyn Write,
) -> color_eyre::Result<()> {
    match action {
        ScenarioAction::Save { name, file } => {
            let params: SimulationParameters = load_document(file)?;
            params
                .validate()
                .wrap_err_with(|| format!("scenario {name:?} is not valid"))?;
            store.save(name, &params)?;
            writeln!(out, "Saved scenario {name:?}")?;
        }
        ScenarioAction::Show { name } => {
            let params = store
                .load(name)?
                .ok_or_else(|| eyre!("no scenario named {name:?}"))?;
            let yaml = serde_saphyr::to_string(&params).map_err(|e| eyre!("{e}"))?;
            write!(out, "{yaml}")?;
        }
        ScenarioAction::List => {
            for name in store.list()? {
                writeln!(out, "{name}")?;
            }
        }
        ScenarioAction::Delete { name } => {
            if store.delete(name)? {
                writeln!(out, "Deleted scenario {name:?}")?;
            } else {
                return Err(eyre!("no scenario named {name:?}"));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DataDirectory;
    use std::fs;
    use tempfile::TempDir;

    fn output(f: impl FnOnce(&mut Vec<u8>) -> color_eyre::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn write_budget(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("budget.json");
        fs::write(
            &path,
            r#"{
                "start_date": "2025-01-01",
                "end_date": "2025-06-30",
                "revenues": [{"name": "pay", "amount": 2500, "type": "repeating", "frequency": "monthly", "start_date": "2025-01-01"}],
                "expenses": [{"name": "car", "amount": 8000, "type": "one-time", "start_date": "2025-04-10"}]
            }"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn test_project_prints_selected_period() {
        let dir = TempDir::new().unwrap();
        let options = ProjectOptions {
            file: write_budget(&dir),
            period: Some(Period::Quarterly),
            daily: false,
            json: false,
        };
        let text = output(|out| project(&options, out));

        assert!(text.starts_with("Quarterly\n"));
        assert!(text.contains("2025-04-01"));
        assert!(text.contains("-$500.00"));
        assert!(!text.contains("Monthly"));
    }

    #[test]
    fn test_project_json_is_parseable() {
        let dir = TempDir::new().unwrap();
        let options = ProjectOptions {
            file: write_budget(&dir),
            period: None,
            daily: false,
            json: true,
        };
        let text = output(|out| project(&options, out));
        let projection: CashFlowProjection = serde_json::from_str(&text).unwrap();
        assert_eq!(projection.daily.len(), 181);
        assert_eq!(projection.annual[0].net, 15_000.0 - 8_000.0);
    }

    #[test]
    fn test_simulate_with_saved_scenario_and_overrides() {
        let dir = TempDir::new().unwrap();
        let store = DataDirectory::new(dir.path().to_path_buf());
        store
            .save("base", &SimulationParameters::default().with_seed(1))
            .unwrap();

        let options = SimulateOptions {
            scenario: Some("base".to_string()),
            paths: Some(150),
            json: true,
            ..Default::default()
        };
        let text = output(|out| simulate(&store, &options, out));
        let summary: SimulationSummary = serde_json::from_str(&text).unwrap();
        assert_eq!(summary.path_matrix.rows(), 150);
    }

    #[test]
    fn test_simulate_text_summary() {
        let dir = TempDir::new().unwrap();
        let store = DataDirectory::new(dir.path().to_path_buf());
        let options = SimulateOptions {
            paths: Some(100),
            seed: Some(4),
            ..Default::default()
        };
        let text = output(|out| simulate(&store, &options, out));
        assert!(text.starts_with("Simulated 100 paths over 40 years"));
        assert!(text.contains("Risk of depletion:"));
        assert!(text.contains("P95"));
    }

    #[test]
    fn test_simulate_rejects_invalid_path_count() {
        let dir = TempDir::new().unwrap();
        let store = DataDirectory::new(dir.path().to_path_buf());
        let options = SimulateOptions {
            paths: Some(10),
            ..Default::default()
        };
        let err = simulate(&store, &options, &mut Vec::<u8>::new()).unwrap_err();
        assert!(format!("{err:#}").contains("num_simulations"));
    }

    #[test]
    fn test_unknown_scenario() {
        let dir = TempDir::new().unwrap();
        let store = DataDirectory::new(dir.path().to_path_buf());
        let options = SimulateOptions {
            scenario: Some("missing".to_string()),
            ..Default::default()
        };
        assert!(resolve_parameters(&store, &options).is_err());
        let delete = ScenarioAction::Delete {
            name: "missing".to_string(),
        };
        assert!(scenario(&store, &delete, &mut Vec::<u8>::new()).is_err());
    }

    #[test]
    fn test_scenario_lifecycle() {
        let dir = TempDir::new().unwrap();
        let store = DataDirectory::new(dir.path().join("data"));
        let file = dir.path().join("plan.yaml");
        fs::write(&file, "starting_portfolio: 750000\nage: 62\n").unwrap();

        let save = ScenarioAction::Save {
            name: "plan".to_string(),
            file,
        };
        assert_eq!(output(|out| scenario(&store, &save, out)), "Saved scenario \"plan\"\n");
        assert_eq!(output(|out| scenario(&store, &ScenarioAction::List, out)), "plan\n");

        let show = ScenarioAction::Show {
            name: "plan".to_string(),
        };
        assert!(output(|out| scenario(&store, &show, out)).contains("age: 62"));

        let delete = ScenarioAction::Delete {
            name: "plan".to_string(),
        };
        output(|out| scenario(&store, &delete, out));
        assert_eq!(output(|out| scenario(&store, &ScenarioAction::List, out)), "");
    }

    #[test]
    fn test_invalid_scenario_is_not_saved() {
        let dir = TempDir::new().unwrap();
        let store = DataDirectory::new(dir.path().join("data"));
        let file = dir.path().join("bad.yaml");
        fs::write(&file, "age: 5\n").unwrap();

        let save = ScenarioAction::Save {
            name: "bad".to_string(),
            file,
        };
        assert!(scenario(&store, &save, &mut Vec::<u8>::new()).is_err());
        assert!(store.list().unwrap().is_empty());
    }
}
