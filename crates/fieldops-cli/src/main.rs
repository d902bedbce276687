// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use fieldops_app::{AppState, EntityKind};
use fieldops_table::{ExportFormat, ExportRecord, SelectableRecordTable};
use fieldops_testkit::FieldFaker;
use runtime::SeedRuntime;
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `fieldops --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let log_file = config.log_file()?;
    runtime::init_logging(config.log_level(), &log_file)?;

    let seed = options.seed.unwrap_or_else(|| config.seed());
    let counts = config.seed_counts();
    if options.check_only {
        let data = FieldFaker::new(seed).dataset(counts);
        info!(
            config = %options.config_path.display(),
            customers = data.customers.len(),
            work_orders = data.work_orders.len(),
            invoices = data.invoices.len(),
            "check passed"
        );
        return Ok(());
    }

    if let Some(entity) = options.export {
        let format = options.format.unwrap_or_else(|| config.export_format());
        let data = FieldFaker::new(seed).dataset(counts);
        let stdout = io::stdout();
        let rows = match entity {
            EntityKind::Customers => export_entity(data.customers, &options, format, stdout.lock()),
            EntityKind::WorkOrders => {
                export_entity(data.work_orders, &options, format, stdout.lock())
            }
            EntityKind::Invoices => export_entity(data.invoices, &options, format, stdout.lock()),
        }?;
        info!(entity = entity.as_str(), rows, "stdout export finished");
        return Ok(());
    }

    let mut state = AppState {
        active_entity: config.default_entity(),
        ..AppState::default()
    };
    let mut runtime = SeedRuntime::new(
        seed,
        counts,
        config.page_size(),
        config.export_format(),
        config.export_dir(),
    );
    fieldops_tui::run_app(&mut state, &mut runtime)
}

/// Filters `records` the way the interactive table would and writes the
/// matching rows to `out`.
fn export_entity<R, W>(
    records: Vec<R>,
    options: &CliOptions,
    format: ExportFormat,
    out: W,
) -> Result<usize>
where
    R: ExportRecord,
    W: Write,
{
    let mut table = SelectableRecordTable::new(records);
    table.set_query(options.query.as_str());
    if let Some(tab) = &options.tab {
        table.set_active_tab_key(tab);
    }
    let batch = table.export_batch();
    format.exporter(out).export(&batch).with_context(|| {
        format!(
            "export {} as {}; loosen --query/--tab if nothing matched",
            R::ENTITY.as_str(),
            format.as_str()
        )
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
    seed: Option<u64>,
    export: Option<EntityKind>,
    format: Option<ExportFormat>,
    query: String,
    tab: Option<String>,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
        seed: None,
        export: None,
        format: None,
        query: String::new(),
        tab: None,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--seed" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--seed requires a number"))?;
                let seed = value
                    .as_ref()
                    .parse::<u64>()
                    .with_context(|| format!("--seed expects a number, got {:?}", value.as_ref()))?;
                options.seed = Some(seed);
            }
            "--export" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow!("--export requires an entity: customers, work_orders, or invoices")
                })?;
                let entity = EntityKind::parse(value.as_ref()).ok_or_else(|| {
                    anyhow!(
                        "unknown entity {:?} for --export; use customers, work_orders, or invoices",
                        value.as_ref()
                    )
                })?;
                options.export = Some(entity);
            }
            "--format" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--format requires csv or json"))?;
                let format = ExportFormat::parse(value.as_ref()).ok_or_else(|| {
                    anyhow!("unknown format {:?}; use csv or json", value.as_ref())
                })?;
                options.format = Some(format);
            }
            "--query" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--query requires search text"))?;
                options.query = value.as_ref().to_owned();
            }
            "--tab" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--tab requires a status key such as all or paid"))?;
                options.tab = Some(value.as_ref().to_owned());
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("fieldops");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --seed <n>               Override the mock data seed");
    println!("  --check                  Validate config and seed data, then exit");
    println!("  --export <entity>        Write customers, work_orders or invoices to stdout");
    println!("  --format <csv|json>      Export format (default from [export].format)");
    println!("  --query <text>           Search text applied before exporting");
    println!("  --tab <status>           Status tab applied before exporting");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, export_entity, parse_cli_args};
    use anyhow::Result;
    use fieldops_app::{EntityKind, InvoiceStatus};
    use fieldops_table::ExportFormat;
    use fieldops_testkit::{FieldFaker, SeedCounts};
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/fieldops-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                print_config_path: false,
                print_example: false,
                check_only: false,
                show_help: false,
                seed: None,
                export: None,
                format: None,
                query: String::new(),
                tab: None,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_config_value() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--wat"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_reads_export_options() -> Result<()> {
        let options = parse_cli_args(
            vec![
                "--export",
                "work-orders",
                "--format",
                "json",
                "--query",
                "boiler",
                "--tab",
                "scheduled",
                "--seed",
                "7",
            ],
            default_options_path(),
        )?;
        assert_eq!(options.export, Some(EntityKind::WorkOrders));
        assert_eq!(options.format, Some(ExportFormat::Json));
        assert_eq!(options.query, "boiler");
        assert_eq!(options.tab.as_deref(), Some("scheduled"));
        assert_eq!(options.seed, Some(7));
        Ok(())
    }

    #[test]
    fn parse_cli_args_rejects_bad_values() {
        let error = parse_cli_args(vec!["--export", "vendors"], default_options_path())
            .expect_err("unknown entity should fail");
        assert!(error.to_string().contains("unknown entity"));

        let error = parse_cli_args(vec!["--format", "xlsx"], default_options_path())
            .expect_err("unknown format should fail");
        assert!(error.to_string().contains("csv or json"));

        let error = parse_cli_args(vec!["--seed", "many"], default_options_path())
            .expect_err("non-numeric seed should fail");
        assert!(error.to_string().contains("--seed expects a number"));
    }

    #[test]
    fn parse_cli_args_sets_print_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--print-config-path", "--print-example-config", "--check"],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(options.print_example);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }

    #[test]
    fn export_entity_applies_tab_before_writing() -> Result<()> {
        let data = FieldFaker::new(3).dataset(SeedCounts::default());
        let expected = data
            .invoices
            .iter()
            .filter(|invoice| invoice.status == InvoiceStatus::Paid)
            .count();
        let mut options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        options.tab = Some("paid".to_owned());

        let mut out = Vec::new();
        if expected == 0 {
            assert!(export_entity(data.invoices, &options, ExportFormat::Csv, &mut out).is_err());
            return Ok(());
        }
        let rows = export_entity(data.invoices, &options, ExportFormat::Csv, &mut out)?;
        assert_eq!(rows, expected);
        let written = String::from_utf8(out)?;
        assert_eq!(written.lines().count(), expected + 1);
        Ok(())
    }

    #[test]
    fn export_entity_reports_empty_matches() -> Result<()> {
        let data = FieldFaker::new(3).dataset(SeedCounts::default());
        let mut options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        options.query = "no customer is named this".to_owned();

        let error = export_entity(data.customers, &options, ExportFormat::Json, Vec::new())
            .expect_err("empty export should fail");
        assert!(format!("{error:#}").contains("nothing to export"));
        Ok(())
    }
}
