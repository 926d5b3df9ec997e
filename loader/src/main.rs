//! Transfer one query bin from the research tool API into a database table.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use querybin_loader::config::{LoaderConfig, TransferSettings};
use querybin_loader::domain::ports::QueryBinRequest;
use querybin_loader::domain::{QueryBinTransferService, TableName};
use querybin_loader::outbound::persistence::{DatabaseConnection, PostgresRecordTableRepository};
use querybin_loader::outbound::querybin::QueryBinHttpSource;
use querybin_loader::telemetry;
use tokio::runtime::Builder;
use tracing::{info, info_span};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// `querybin-loader` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "querybin-loader",
    about = "Load a query bin's tweet export into a database table",
    version
)]
struct CliArgs {
    /// Path to the TOML file with `[source]` and `[database]` groups.
    #[arg(long, value_name = "path", default_value = "querybin-loader.toml")]
    config: PathBuf,
    /// Query-bin identifier.
    #[arg(long, value_name = "name")]
    querybin: String,
    /// Controller name appended after the query bin.
    #[arg(long, value_name = "name")]
    controller: String,
    /// Export records on or after this date (`YYYY-MM-DD`).
    #[arg(long, value_name = "date", value_parser = parse_date)]
    startdate: Option<NaiveDate>,
    /// Export records on or before this date (`YYYY-MM-DD`).
    #[arg(long, value_name = "date", value_parser = parse_date)]
    enddate: Option<NaiveDate>,
    /// Destination table. Overrides `QUERYBIN_LOADER_TABLE`.
    #[arg(long, value_name = "name")]
    table: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    telemetry::init();
    run(CliArgs::parse())
}

fn run(args: CliArgs) -> Result<()> {
    let request = build_request(&args)?;
    let config = LoaderConfig::from_path(&args.config)?;
    let settings = TransferSettings::load_from_iter([OsString::from("querybin-loader")])
        .map_err(|error| eyre!("failed to load run settings: {error}"))?;
    let table = resolve_table(args.table.as_deref(), &settings)?;

    let source = QueryBinHttpSource::new(config.source.clone(), settings.request_timeout())
        .wrap_err("failed to build HTTP client")?;
    let connection = DatabaseConnection::from_config(&config.database)?
        .with_connect_timeout(settings.connect_timeout());
    let repository = PostgresRecordTableRepository::new(connection, config.database.charset);
    let service = QueryBinTransferService::new(
        Arc::new(source),
        Arc::new(repository),
        Arc::new(DefaultClock),
    );

    let transfer = service.begin(request);
    let span = info_span!(
        "transfer",
        run_id = %transfer.run_id,
        querybin = %transfer.request.querybin,
        controller = %transfer.request.controller,
    );
    let _entered = span.enter();

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to create Tokio runtime")?;
    let fetched = runtime.block_on(service.fetch(&transfer))?;
    drop(runtime);

    let report = service.load(&transfer, &fetched, &table)?;
    let summary =
        serde_json::to_string(&report.summary()).wrap_err("failed to encode transfer summary")?;
    info!(%summary, "transfer complete");
    Ok(())
}

fn build_request(args: &CliArgs) -> Result<QueryBinRequest> {
    if let (Some(start), Some(end)) = (args.startdate, args.enddate) {
        if start > end {
            return Err(eyre!("--startdate {start} is after --enddate {end}"));
        }
    }
    let mut request = QueryBinRequest::new(args.querybin.as_str(), args.controller.as_str());
    request.start_date = args.startdate;
    request.end_date = args.enddate;
    Ok(request)
}

fn resolve_table(explicit: Option<&str>, settings: &TransferSettings) -> Result<TableName> {
    let table = match explicit {
        Some(raw) => TableName::parse(raw),
        None => settings.table(),
    };
    table.wrap_err("invalid destination table name")
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|error| format!("expected YYYY-MM-DD: {error}"))
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI parsing helpers.

    use rstest::rstest;

    use super::*;

    fn parse(extra: &[&str]) -> Result<CliArgs, clap::Error> {
        let args = ["querybin-loader", "--querybin", "climate", "--controller", "querybin.php"];
        CliArgs::try_parse_from(args.iter().chain(extra))
    }

    #[rstest]
    fn defaults_the_configuration_path() {
        let args = parse(&[]).expect("arguments should parse");
        assert_eq!(args.config, PathBuf::from("querybin-loader.toml"));
        assert!(args.startdate.is_none());
        assert!(args.table.is_none());
    }

    #[rstest]
    fn parses_the_date_window() {
        let args = parse(&["--startdate", "2024-01-01", "--enddate", "2024-01-31"])
            .expect("arguments should parse");
        let request = build_request(&args).expect("window is ordered");
        assert_eq!(request.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(request.end_date, NaiveDate::from_ymd_opt(2024, 1, 31));
    }

    #[rstest]
    #[case("01/02/2024")]
    #[case("2024-02-30")]
    #[case("yesterday")]
    fn rejects_malformed_dates(#[case] raw: &str) {
        assert!(parse(&["--startdate", raw]).is_err());
    }

    #[rstest]
    fn rejects_reversed_windows() {
        let args = parse(&["--startdate", "2024-02-01", "--enddate", "2024-01-01"])
            .expect("arguments should parse");
        assert!(build_request(&args).is_err());
    }

    #[rstest]
    fn requires_the_query_bin() {
        assert!(CliArgs::try_parse_from(["querybin-loader", "--controller", "x"]).is_err());
    }

    #[rstest]
    fn explicit_table_overrides_settings() {
        let settings = TransferSettings {
            table: Some("from_env".to_owned()),
            request_timeout_secs: 300,
            connect_timeout_secs: 30,
        };
        let table = resolve_table(Some("from_cli"), &settings).expect("valid table");
        assert_eq!(table.as_str(), "from_cli");
        let table = resolve_table(None, &settings).expect("valid table");
        assert_eq!(table.as_str(), "from_env");
    }
}
