use anyhow::{Context, Result, bail};
use bonusmodel_core::{BonusConfig, BonusEngine, Category, Report, Timesheet, UnclassifiedLedger};
use bonusmodel_ingest::{load_holiday_dir, load_timesheet};
use bonusmodel_rules::{Classifier, MappingTable};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;
mod render;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "bonusmodel", version, about = "Compare legacy and proposed consultant bonus schemes")]
struct Cli {
    /// Config file (default: ~/.bonusmodel/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log engine decisions to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone, Default)]
struct InputArgs {
    /// Timesheet export (.json or .csv)
    #[arg(long)]
    timesheet: Option<PathBuf>,

    /// Directory with holidays_<year>.json files
    #[arg(long)]
    holidays: Option<PathBuf>,

    /// Manual classification overrides (JSON)
    #[arg(long)]
    mapping: Option<PathBuf>,

    /// Only show this year; earlier years still seed the hour bank
    #[arg(long)]
    year: Option<i32>,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Rtotal payment per qualifying month (overrides config)
    #[arg(long)]
    rtotal: Option<f64>,

    /// Rlinear payment per hour (overrides config)
    #[arg(long)]
    rlinear: Option<f64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Month-by-month breakdown with combined time sheet lines
    Monthly(InputArgs),

    /// Yearly totals and payout comparison
    Yearly(InputArgs),

    /// Time sheet lines no rule could classify
    Unclassified(InputArgs),

    /// Add a manual classification rule and save the mapping file
    Classify {
        /// Category name, e.g. billable, internal_bonus, vacation, VAB
        #[arg(long)]
        category: Category,

        #[arg(long)]
        job: String,

        #[arg(long)]
        activity: Option<String>,

        #[arg(long)]
        task: Option<String>,

        /// Mapping file to update
        #[arg(long)]
        mapping: Option<PathBuf>,
    },

    /// Manage ~/.bonusmodel/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,

    /// Print the effective config
    Show,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("BONUSMODEL_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "bonusmodel_core=debug,bonusmodel_rules=debug,bonusmodel_ingest=debug,info"
        } else {
            "warn"
        })
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = config::config_path(cli.config.as_deref())?;

    match cli.command {
        Command::Monthly(args) => {
            let cfg = config::load_config(&config_path)?;
            let (report, _) = build_report(&cfg, &args)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render::render_monthly(&report));
            }
        }

        Command::Yearly(args) => {
            let cfg = config::load_config(&config_path)?;
            let (report, _) = build_report(&cfg, &args)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render::render_yearly(&report));
            }
        }

        Command::Unclassified(args) => {
            let cfg = config::load_config(&config_path)?;
            let (_, ledger) = build_report(&cfg, &args)?;
            let groups = ledger.finalize();
            if args.json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
            } else {
                print!("{}", render::render_unclassified(&groups));
            }
        }

        Command::Classify {
            category,
            job,
            activity,
            task,
            mapping,
        } => {
            let cfg = config::load_config(&config_path)?;
            let path = mapping.unwrap_or(cfg.paths.mapping);
            classify(&path, category, &job, activity.as_deref(), task.as_deref())?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(cli.config.as_deref())?,
            ConfigCommand::Show => {
                let cfg = config::load_config(&config_path)?;
                println!("# {}", config_path.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

/// Effective bonus parameters: config file, then command-line rate overrides.
fn bonus_config(cfg: &Config, args: &InputArgs) -> Result<BonusConfig> {
    let mut bonus = cfg.bonus.clone();
    if let Some(rtotal) = args.rtotal {
        bonus.rates.rtotal = rtotal;
    }
    if let Some(rlinear) = args.rlinear {
        bonus.rates.rlinear = rlinear;
    }
    bonus.validate().context("invalid bonus parameters")?;
    Ok(bonus)
}

fn build_report(cfg: &Config, args: &InputArgs) -> Result<(Report, UnclassifiedLedger)> {
    let timesheet_path = args.timesheet.as_ref().unwrap_or(&cfg.paths.timesheet);
    if !timesheet_path.exists() {
        bail!(
            "Timesheet not found: {} (pass --timesheet <path>)",
            timesheet_path.display()
        );
    }
    let entries = load_timesheet(timesheet_path)
        .with_context(|| format!("reading {}", timesheet_path.display()))?;
    let timesheet = Timesheet::from_entries(entries)
        .with_context(|| format!("validating {}", timesheet_path.display()))?;

    let holidays_dir = args.holidays.as_ref().unwrap_or(&cfg.paths.holidays);
    let calendar = load_holiday_dir(holidays_dir, cfg.calendar.clone())
        .with_context(|| format!("reading holidays from {}", holidays_dir.display()))?;

    let mapping_path = args.mapping.as_ref().unwrap_or(&cfg.paths.mapping);
    let overrides = MappingTable::load_or_default(mapping_path)
        .with_context(|| format!("reading {}", mapping_path.display()))?;
    let classifier = Classifier::new(cfg.codes.clone()).with_overrides(overrides);

    debug!(
        timesheet = %timesheet_path.display(),
        holidays = %holidays_dir.display(),
        mapping = %mapping_path.display(),
        "resolved inputs"
    );

    let bonus = bonus_config(cfg, args)?;
    let engine = BonusEngine::new(classifier, calendar, &bonus);
    let mut ledger = UnclassifiedLedger::new();
    let mut report = engine.run(&timesheet, &mut ledger)?;

    if let Some(year) = args.year {
        if report.year(year).is_none() {
            bail!("No time sheet lines for {year}");
        }
        report.years.retain(|y| y.verdict.year == year);
    }

    Ok((report, ledger))
}

fn classify(
    path: &Path,
    category: Category,
    job: &str,
    activity: Option<&str>,
    task: Option<&str>,
) -> Result<()> {
    let mut table = MappingTable::load_or_default(path)
        .with_context(|| format!("reading {}", path.display()))?;
    table
        .add_mapping(category, job, activity, task)
        .context("mapping not changed")?;
    table
        .save(path)
        .with_context(|| format!("write {}", path.display()))?;
    info!(%category, job, ?activity, ?task, "saved override");
    println!("Saved {category} rule for {job} to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bonusmodel_core::Classify;
    use std::fs;

    fn write_inputs(dir: &Path) -> InputArgs {
        let sheet = dir.join("sheet.csv");
        let mut csv = String::from("date,hours,job,activity,task,invoiceable,internal_job,description\n");
        for day in [4, 5, 6, 7, 8] {
            csv.push_str(&format!("2024-03-0{day},8,P-1,10,Dev,true,false,work\n"));
        }
        csv.push_str("2024-03-11,4,K-9,3,Workshop,false,false,prestudy\n");
        fs::write(&sheet, csv).unwrap();

        let holidays = dir.join("holidays");
        fs::create_dir(&holidays).unwrap();
        fs::write(
            holidays.join("holidays_2024.json"),
            r#"[{"name": "Good Friday", "date": "2024-03-29"}]"#,
        )
        .unwrap();

        InputArgs {
            timesheet: Some(sheet),
            holidays: Some(holidays),
            mapping: Some(dir.join("mapping.json")),
            ..InputArgs::default()
        }
    }

    #[test]
    fn test_build_report_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let args = write_inputs(dir.path());

        let (report, ledger) = build_report(&Config::default(), &args).unwrap();
        let march = &report.years[0].months[0];
        assert_eq!(march.required_hours, 160.0);
        assert_eq!(march.totals.billed_hours, 40.0);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_classify_persists_override() {
        let dir = tempfile::tempdir().unwrap();
        let args = write_inputs(dir.path());
        let mapping = args.mapping.clone().unwrap();

        classify(&mapping, Category::Billable, "K-9", Some("3"), None).unwrap();
        // Same rule again is accepted, a different one is not.
        classify(&mapping, Category::Billable, "K-9", Some("3"), None).unwrap();
        assert!(classify(&mapping, Category::Vacation, "K-9", Some("3"), None).is_err());

        let (report, ledger) = build_report(&Config::default(), &args).unwrap();
        assert!(ledger.is_empty());
        assert_eq!(report.years[0].months[0].totals.billed_hours, 44.0);

        let table = MappingTable::load(&mapping).unwrap();
        let classifier = Classifier::default().with_overrides(table);
        let line = bonusmodel_core::TimeEntry::new(
            chrono::NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
            1.0,
            "K-9",
            "3",
            "Anything",
        );
        assert_eq!(classifier.classify(&line), Category::Billable);
    }

    #[test]
    fn test_rate_overrides_and_year_filter() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = write_inputs(dir.path());
        args.rtotal = Some(3000.0);
        args.year = Some(2024);

        let (report, _) = build_report(&Config::default(), &args).unwrap();
        assert_eq!(report.rates.rtotal, 3000.0);
        assert_eq!(report.rates.rlon, (40.0_f64 + 3000.0 / 38.0).ceil());

        args.year = Some(2023);
        assert!(build_report(&Config::default(), &args).is_err());
    }

    #[test]
    fn test_missing_timesheet_is_reported() {
        let args = InputArgs {
            timesheet: Some(PathBuf::from("/nonexistent/sheet.csv")),
            ..InputArgs::default()
        };
        let err = build_report(&Config::default(), &args).unwrap_err();
        assert!(err.to_string().contains("Timesheet not found"));
    }
}
