//! Command-line arguments.

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use vaxboard_core::config::{DEFAULT_CACHE_TTL_SECS, DEFAULT_DATABASE_PATH};
use vaxboard_core::DashboardConfig;

use crate::formatter::OutputFormat;

/// Vaccination dashboard reports
#[derive(Parser, Debug)]
#[command(name = "vaxboard")]
#[command(version, about = "Vaccination dashboard reports")]
pub struct Args {
    /// Path to the SQLite database
    #[arg(short, long, env = "VAXBOARD_DATABASE", default_value = DEFAULT_DATABASE_PATH)]
    pub database: PathBuf,

    /// Seconds a query result is served from cache
    #[arg(long, env = "VAXBOARD_CACHE_TTL", default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub cache_ttl: u64,

    /// Output format
    #[arg(long, default_value = "table", value_enum)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Filtered indicators, distributions and latest applications
    Dashboard(DashboardArgs),

    /// Dataset-wide statistics
    Statistics {
        /// Length of rankings
        #[arg(long)]
        top: Option<usize>,
    },

    /// Filter choice lists
    Catalog {
        /// Only municipalities in these state codes (repeatable)
        #[arg(long = "state")]
        states: Vec<String>,
    },

    /// Create the schema in the database
    Init {
        /// Also insert a small demo dataset
        #[arg(long, default_value_t = false)]
        demo: bool,
    },
}

#[derive(clap::Args, Debug)]
pub struct DashboardArgs {
    /// First day, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// Last day, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub end: NaiveDate,

    /// Establishment municipality (repeatable)
    #[arg(long = "municipality")]
    pub municipalities: Vec<String>,

    /// Dose label (repeatable)
    #[arg(long = "dose")]
    pub doses: Vec<String>,

    /// Vaccine name (repeatable)
    #[arg(long = "vaccine")]
    pub vaccines: Vec<String>,

    /// Length of rankings
    #[arg(long)]
    pub top: Option<usize>,
}

impl Args {
    /// Build the core configuration from the global options.
    pub fn to_config(&self) -> DashboardConfig {
        DashboardConfig::new(&self.database).with_cache_ttl(Duration::from_secs(self.cache_ttl))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_args() {
        let args = Args::try_parse_from([
            "vaxboard",
            "--database",
            "/tmp/vax.db",
            "--cache-ttl",
            "60",
            "dashboard",
            "--start",
            "2024-01-01",
            "--end",
            "2024-01-31",
            "--dose",
            "1ª Dose",
            "--dose",
            "Reforço",
        ])
        .unwrap();

        let config = args.to_config();
        assert_eq!(config.database_path, PathBuf::from("/tmp/vax.db"));
        assert_eq!(config.cache_ttl, Duration::from_secs(60));

        match args.command {
            Command::Dashboard(d) => {
                assert_eq!(d.start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
                assert_eq!(d.doses, vec!["1ª Dose", "Reforço"]);
                assert!(d.municipalities.is_empty());
                assert_eq!(d.top, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_date() {
        let result = Args::try_parse_from([
            "vaxboard", "dashboard", "--start", "2024-13-01", "--end", "2024-12-31",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_catalog_states() {
        let args =
            Args::try_parse_from(["vaxboard", "--format", "json", "catalog", "--state", "PE"]).unwrap();
        assert_eq!(args.format, OutputFormat::Json);
        assert!(matches!(args.command, Command::Catalog { states } if states == ["PE"]));
    }
}
