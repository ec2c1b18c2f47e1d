// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

use crate::log::LogLevelParser;
use clap::{Args, Parser, Subcommand};
use shadowserver_api::{DateRange, Sort, DEFAULT_QUERY_LIMIT};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

/// Command line client for the Shadowserver reports API
///
/// Credentials are read from the configuration file and the
/// `SHADOWSERVER_API_KEY` and `SHADOWSERVER_API_SECRET` environment variables.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Arguments {
    /// Configuration file (toml, yaml or json)
    #[arg(long, env = "SHADOWSERVER_CONFIG")]
    pub config: Option<PathBuf>,
    /// Log level for the log output.
    /// Valid values are: `off`, `error`, `warn`, `info`, `debug`, `trace`
    #[clap(long, default_value_t = LevelFilter::WARN, value_parser = LogLevelParser)]
    pub log_level: LevelFilter,
    #[clap(subcommand)]
    pub cmd: SubCommands,
}

#[derive(Subcommand, Debug)]
pub enum SubCommands {
    /// Check the connection to the API server
    Ping,
    /// Show details about the API key
    KeyInfo,
    /// List the reports the account is subscribed to
    Subscribed,
    /// List the available report types
    Types,
    /// List reports which could be downloaded
    List(ListArgs),
    /// Download the rows of a report
    Download(DownloadArgs),
    /// Query report rows, one JSON object per line
    Query(QueryArgs),
    /// Show report statistics
    Stats(StatsArgs),
    /// Show device details for an IP, ASN or country
    DeviceInfo(DeviceInfoArgs),
    /// Show the schema of a report type
    Schema(SchemaArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Report name, may be repeated
    #[arg(long = "report")]
    pub reports: Vec<String>,
    /// Date range `start[:end]`, dates as `YYYY-MM-DD` or `now`
    #[arg(long)]
    pub date: Option<DateRange>,
    /// Report type
    #[arg(long = "type")]
    pub report_type: Option<String>,
    /// Maximum number of reports
    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Report id as returned by `list`
    pub id: String,
    /// Report name
    #[arg(long)]
    pub report: Option<String>,
    /// Maximum number of rows
    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Search criteria as `key=value`
    #[arg(required = true, value_parser = parse_key_val)]
    pub criteria: Vec<(String, String)>,
    /// Sort order, `ascending` or `descending`
    #[arg(long, default_value_t = Sort::Ascending)]
    pub sort: Sort,
    /// Date range `start[:end]`, dates as `YYYY-MM-DD` or `now`
    #[arg(long)]
    pub date: Option<DateRange>,
    /// Return value cardinalities of this field instead of rows
    #[arg(long)]
    pub facet: Option<String>,
    /// Rows per page
    #[arg(long, default_value_t = DEFAULT_QUERY_LIMIT)]
    pub limit: u32,
    /// Only fetch the first page
    #[arg(long)]
    pub no_paginate: bool,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Report name, may be repeated
    #[arg(long = "report")]
    pub reports: Vec<String>,
    /// Report type, may be repeated
    #[arg(long = "type")]
    pub report_types: Vec<String>,
    /// Date range `start[:end]`, dates as `YYYY-MM-DD` or `now`
    #[arg(long)]
    pub date: Option<DateRange>,
}

#[derive(Args, Debug)]
pub struct DeviceInfoArgs {
    /// Search criteria as `key=value`, keys are `ip`, `asn` or `geo`
    #[arg(required = true, value_parser = parse_key_val)]
    pub criteria: Vec<(String, String)>,
}

#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Report type
    pub report_type: String,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.into(), value.into())),
        _ => Err(format!("invalid KEY=value: no `=` found in `{s}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_val() {
        assert_eq!(
            parse_key_val("asn=64496").unwrap(),
            ("asn".to_string(), "64496".to_string())
        );
        assert_eq!(
            parse_key_val("tag=a=b").unwrap(),
            ("tag".to_string(), "a=b".to_string())
        );
        assert!(parse_key_val("asn").is_err());
        assert!(parse_key_val("=1").is_err());
    }

    #[test]
    fn query_args() {
        let args = Arguments::try_parse_from([
            "shadowserver",
            "--log-level",
            "debug",
            "query",
            "asn=64496",
            "geo=DE",
            "--sort",
            "descending",
            "--date",
            "2024-05-01:now",
            "--no-paginate",
        ])
        .unwrap();

        assert_eq!(args.log_level, LevelFilter::DEBUG);
        let SubCommands::Query(query) = args.cmd else {
            panic!("expected query subcommand");
        };
        assert_eq!(query.criteria.len(), 2);
        assert_eq!(query.sort, Sort::Descending);
        assert_eq!(query.date.unwrap().end(), Some("now"));
        assert_eq!(query.limit, DEFAULT_QUERY_LIMIT);
        assert!(query.no_paginate);
    }

    #[test]
    fn invalid_values_are_rejected() {
        for argv in [
            &["shadowserver", "list", "--date", "yesterday"][..],
            &["shadowserver", "query", "asn=1", "--sort", "up"],
            &["shadowserver", "--log-level", "loud", "ping"],
        ] {
            assert!(Arguments::try_parse_from(argv.iter().copied()).is_err(), "{argv:?}");
        }
    }
}
