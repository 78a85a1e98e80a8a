//! Command implementations.

use std::collections::BTreeSet;
use std::sync::Arc;

use vaxboard_core::aggregate::{self, Dimension, Kpis};
use vaxboard_core::{DashboardConfig, DataLoader, FilterSet, LoadOutcome, Overview, SqliteExecutor, Value};

use crate::config::{Args, Command, DashboardArgs};
use crate::demo::DEMO_DATA;
use crate::error::CliError;
use crate::formatter::{create_formatter, Formatter, Section};

/// Sections gathered for one command, plus the loads that failed.
struct Report {
    formatter: Box<dyn Formatter>,
    sections: Vec<Section>,
    total: usize,
    failed: usize,
}

impl Report {
    fn new(formatter: Box<dyn Formatter>) -> Self {
        Self {
            formatter,
            sections: Vec::new(),
            total: 0,
            failed: 0,
        }
    }

    /// The loaded value, or `None` after reporting the failure.
    fn take<T>(&mut self, outcome: LoadOutcome<T>) -> Option<T> {
        self.total += 1;
        match outcome.error {
            None => Some(outcome.value),
            Some(e) => {
                self.failed += 1;
                eprintln!("{}", self.formatter.format_error(&e.to_string()));
                None
            }
        }
    }

    fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    fn finish(self) -> Result<(), CliError> {
        println!("{}", self.formatter.format_report(&self.sections));
        if self.failed > 0 {
            return Err(CliError::PartialLoad {
                failed: self.failed,
                total: self.total,
            });
        }
        Ok(())
    }
}

/// Run the command selected by `args`.
pub fn run(args: Args) -> Result<(), CliError> {
    let config = args.to_config();
    config.validate()?;

    tracing::info!(
        database = %config.database_path.display(),
        cache_ttl_secs = config.cache_ttl.as_secs(),
        "configuration loaded"
    );

    let formatter = create_formatter(args.format);
    match args.command {
        Command::Init { demo } => init(&config, demo, formatter.as_ref()),
        Command::Dashboard(dashboard_args) => {
            dashboard(&open(&config)?, &dashboard_args, config.default_top_n, Report::new(formatter))
        }
        Command::Statistics { top } => {
            statistics(&open(&config)?, top.unwrap_or(config.default_top_n), Report::new(formatter))
        }
        Command::Catalog { states } => catalog(&open(&config)?, states, Report::new(formatter)),
    }
}

fn open(config: &DashboardConfig) -> Result<DataLoader, CliError> {
    let executor = Arc::new(SqliteExecutor::open(&config.database_path));
    Ok(DataLoader::from_config(executor, config)?)
}

fn init(config: &DashboardConfig, demo: bool, formatter: &dyn Formatter) -> Result<(), CliError> {
    let executor = SqliteExecutor::create(&config.database_path);
    executor.init_schema()?;
    if demo {
        executor.execute_batch(DEMO_DATA)?;
    }

    tracing::info!(database = %config.database_path.display(), demo, "database initialized");
    println!(
        "{}",
        formatter.format_message(&format!(
            "initialized {}{}",
            config.database_path.display(),
            if demo { " with demo data" } else { "" }
        ))
    );
    Ok(())
}

fn kpi_section(kpis: &Kpis) -> Section {
    Section::Summary {
        name: "kpis".to_string(),
        fields: vec![
            ("total_doses".to_string(), Value::from(kpis.total_doses)),
            ("unique_patients".to_string(), Value::from(kpis.unique_patients)),
            ("average_age".to_string(), Value::from(kpis.average_age)),
            ("booster_doses".to_string(), Value::from(kpis.booster_doses)),
        ],
    }
}

fn overview_section(overview: &Overview) -> Section {
    Section::Summary {
        name: "overview".to_string(),
        fields: vec![
            ("total_doses".to_string(), Value::from(overview.total_doses)),
            ("unique_patients".to_string(), Value::from(overview.unique_patients)),
            ("average_age".to_string(), Value::from(overview.average_age)),
        ],
    }
}

fn dashboard(
    loader: &DataLoader,
    args: &DashboardArgs,
    default_top_n: usize,
    mut report: Report,
) -> Result<(), CliError> {
    let filters = FilterSet::new(args.start, args.end)?
        .with_municipalities(&args.municipalities)
        .with_dose_types(&args.doses)
        .with_vaccine_names(&args.vaccines);
    let top = args.top.unwrap_or(default_top_n);

    if let Some(records) = report.take(loader.load(&filters)) {
        report.push(kpi_section(&aggregate::kpis(&records)));
        report.push(Section::Table(aggregate::top_n(&records, Dimension::VaccineName, top)));
        report.push(Section::Table(aggregate::time_series(&records, Dimension::Dose)));
        report.push(Section::Table(aggregate::group_summary(
            &records,
            Dimension::EstablishmentMunicipality,
        )));
        report.push(Section::Table(aggregate::age_pyramid(&records)));
        report.push(Section::Table(aggregate::category_counts(&records, Dimension::Strategy)));
        report.push(Section::Table(aggregate::category_counts(&records, Dimension::RaceColor)));
        report.push(Section::Table(aggregate::latest_applications(&records, top)));
    }

    report.finish()
}

fn statistics(loader: &DataLoader, top: usize, mut report: Report) -> Result<(), CliError> {
    if let Some(overview) = report.take(loader.overview()) {
        report.push(overview_section(&overview));
    }

    let tables = [
        loader.top_vaccines(top),
        loader.busiest_establishments(top),
        loader.establishment_locations(),
        loader.elderly_by_municipality(top),
        loader.elderly_top_vaccines(top),
        loader.oldest_patient_applications(),
    ];
    for outcome in tables {
        if let Some(table) = report.take(outcome) {
            report.push(Section::Table(table));
        }
    }

    report.finish()
}

fn catalog(loader: &DataLoader, states: Vec<String>, mut report: Report) -> Result<(), CliError> {
    let lists = if states.is_empty() {
        vec![
            ("municipalities", loader.municipalities()),
            ("vaccine_names", loader.vaccine_names()),
            ("dose_types", loader.dose_types()),
            ("strategies", loader.strategies()),
        ]
    } else {
        let codes: BTreeSet<String> = states.into_iter().collect();
        vec![("municipalities", loader.municipalities_for_region(&codes))]
    };

    for (name, outcome) in lists {
        if let Some(values) = report.take(outcome) {
            report.push(Section::List {
                name: name.to_string(),
                values,
            });
        }
    }

    report.finish()
}
