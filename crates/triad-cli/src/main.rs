//! `triad-sim`: runs the three intervention scenarios of the triadic
//! dwelling model and reports the comparison.

mod profile;
#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use prometheus_bridge::{regressed_interventions, ScenarioMetrics};
use tracing::Level;
use triad_scenarios::{series_rows, AnalysisReport, ScenarioDriver, ScenarioOutcome, SeriesRow};
use triad_solver::{Integrator, IntegratorChoice};

use crate::profile::{load_profile, Overrides, SimulationProfile};

fn cli() -> Command {
    Command::new("triad-sim")
        .about("Compare no-intervention, phase-one and dual-intervention runs of the triadic model")
        .arg(
            Arg::new("profile")
                .long("profile")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("JSON run profile (parameters, initial state, horizon, nudges, integrator)"),
        )
        .arg(
            Arg::new("integrator")
                .long("integrator")
                .value_name("METHOD")
                .value_parser(["rk4", "dopri5"])
                .help("Integration method, overrides the profile"),
        )
        .arg(
            Arg::new("horizon")
                .long("horizon")
                .value_name("END")
                .value_parser(value_parser!(f64))
                .help("End of the time horizon"),
        )
        .arg(
            Arg::new("samples")
                .long("samples")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Number of grid samples, both ends included"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_parser(["text", "json"])
                .default_value("text")
                .help("Report format on stdout"),
        )
        .arg(
            Arg::new("series")
                .long("series")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("Write per-sample series of every scenario as JSON"),
        )
        .arg(
            Arg::new("metrics")
                .long("metrics")
                .action(ArgAction::SetTrue)
                .help("Print Prometheus exposition and fail if an intervention regresses"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .help("Log integrator statistics"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
}

fn init_logging(matches: &ArgMatches) {
    let level = if matches.get_flag("verbose") {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr);
    if matches.get_flag("log-json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn overrides(matches: &ArgMatches) -> Result<Overrides> {
    let integrator = match matches.get_one::<String>("integrator") {
        Some(name) => Some(
            IntegratorChoice::from_name(name).ok_or_else(|| anyhow!("unknown integrator {name}"))?,
        ),
        None => None,
    };
    Ok(Overrides {
        integrator,
        horizon_end: matches.get_one::<f64>("horizon").copied(),
        samples: matches.get_one::<usize>("samples").copied(),
    })
}

fn write_series(path: &Path, outcomes: &[ScenarioOutcome]) -> Result<()> {
    let series: BTreeMap<String, Vec<SeriesRow>> = outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().ok())
        .map(|run| (run.kind.to_string(), series_rows(run)))
        .collect();
    let json = serde_json::to_string_pretty(&series)?;
    fs::write(path, json).with_context(|| format!("writing series to {}", path.display()))?;
    tracing::info!(path = %path.display(), scenarios = series.len(), "series written");
    Ok(())
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_logging(&matches);

    let profile = match matches.get_one::<PathBuf>("profile") {
        Some(path) => load_profile(path)?,
        None => SimulationProfile::default(),
    };
    let (config, integrator) = profile.resolve(&overrides(&matches)?)?;
    tracing::info!(
        integrator = integrator.name(),
        start = config.grid.start(),
        end = config.grid.end(),
        samples = config.grid.len(),
        "running scenarios"
    );

    let driver = ScenarioDriver::new(config, integrator);
    let outcomes = driver.run_all();
    let report = AnalysisReport::build(driver.integrator().name(), &driver.config().grid, &outcomes);

    match matches.get_one::<String>("format").map(String::as_str) {
        Some("json") => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print!("{}", report.render_text()),
    }

    if let Some(path) = matches.get_one::<PathBuf>("series") {
        write_series(path, &outcomes)?;
    }

    let mut regressions = Vec::new();
    if matches.get_flag("metrics") {
        let metrics = ScenarioMetrics::new().context("registering scenario gauges")?;
        metrics.observe_report(&report);
        regressions = regressed_interventions(&metrics, &report);
        for (baseline, candidate) in &regressions {
            tracing::warn!(%baseline, %candidate, "intervention finished below its baseline");
        }
        print!("{}", metrics.render().context("encoding metrics")?);
    }

    if !report.is_complete() {
        bail!("{} of {} scenarios failed", report.failures.len(), outcomes.len());
    }
    if !regressions.is_empty() {
        bail!("{} intervention(s) regressed against their baseline", regressions.len());
    }
    Ok(())
}
