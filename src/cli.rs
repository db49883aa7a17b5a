use crate::types::{FilterChange, ALL_LABEL};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing::Level;

/// Terminal dashboard for regional grain production and demand.
///
/// Examples:
///   grain_dashboard
///   grain_dashboard --data data/grain_clean.csv --region Asia --once
///   grain_dashboard --year 2020 --once --export-json summary.json
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// CSV file with Region, SubRegion, Year, Production, TotalDemand, SupplyGap
    #[arg(long, value_name = "FILE", default_value = "data/grain_clean.csv", env = "GRAIN_DATA")]
    pub data: PathBuf,

    /// Initial region filter
    #[arg(long, default_value = ALL_LABEL)]
    pub region: String,

    /// Initial sub-region filter
    #[arg(long, default_value = ALL_LABEL)]
    pub sub_region: String,

    /// Initial year filter
    #[arg(long, default_value = ALL_LABEL)]
    pub year: String,

    /// Render once for the initial selection and exit
    #[arg(long)]
    pub once: bool,

    /// Write the per-year series for the initial selection to a CSV file
    #[arg(long, value_name = "FILE")]
    pub export_csv: Option<PathBuf>,

    /// Write a JSON snapshot for the initial selection
    #[arg(long, value_name = "FILE")]
    pub export_json: Option<PathBuf>,

    /// Width of the supply gap bar chart, in characters
    #[arg(long, default_value = "40", value_parser = clap::value_parser!(u16).range(4..))]
    pub bar_width: u16,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// Filter edits that reproduce the requested starting selection.
    pub fn initial_changes(&self) -> Vec<FilterChange> {
        vec![
            FilterChange::Region(self.region.clone()),
            FilterChange::SubRegion(self.sub_region.clone()),
            FilterChange::Year(self.year.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_unfiltered() {
        let args = Args::try_parse_from(["grain_dashboard"]).unwrap();
        assert_eq!(args.region, ALL_LABEL);
        assert_eq!(args.year, ALL_LABEL);
        assert_eq!(args.bar_width, 40);
        assert!(!args.once);
        assert_eq!(args.log_level(), Level::INFO);
    }

    #[test]
    fn parses_selection_and_exports() {
        let args = Args::try_parse_from([
            "grain_dashboard",
            "--data",
            "grain.csv",
            "--sub-region",
            "East Asia",
            "--year",
            "2021",
            "--once",
            "--export-json",
            "out.json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.data, PathBuf::from("grain.csv"));
        assert_eq!(args.export_json, Some(PathBuf::from("out.json")));
        assert_eq!(args.log_level(), Level::TRACE);
        assert_eq!(
            args.initial_changes()[1],
            FilterChange::SubRegion("East Asia".into())
        );
    }

    #[test]
    fn rejects_tiny_bar_width() {
        assert!(Args::try_parse_from(["grain_dashboard", "--bar-width", "2"]).is_err());
    }
}
