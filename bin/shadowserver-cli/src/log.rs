// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

//! Logging of the `shadowserver` tool

use anyhow::Context;
use std::{ffi::OsStr, ffi::OsString, str::FromStr};
use tracing::level_filters::LevelFilter;
use tracing_log::LogTracer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Log target of the API client library.
const CLIENT_TARGET: &str = "shadowserver_api";

/// Clap parser for `--log-level`: one of "off", "error", "warn", "info", "debug", "trace"
#[derive(Clone)]
pub struct LogLevelParser;

impl clap::builder::TypedValueParser for LogLevelParser {
    type Value = LevelFilter;

    fn parse_ref(
        &self,
        cmd: &clap::Command,
        arg: Option<&clap::Arg>,
        value: &OsStr,
    ) -> Result<Self::Value, clap::Error> {
        clap::builder::TypedValueParser::parse(self, cmd, arg, value.to_owned())
    }

    fn parse(
        &self,
        cmd: &clap::Command,
        arg: Option<&clap::Arg>,
        value: OsString,
    ) -> Result<Self::Value, clap::Error> {
        let p = clap::builder::PossibleValuesParser::new([
            "off", "error", "warn", "info", "debug", "trace",
        ]);
        let v = p.parse(cmd, arg, value)?;

        LevelFilter::from_str(&v)
            .map_err(|e| clap::Error::raw(clap::error::ErrorKind::InvalidValue, e))
    }
}

/// Installs the global subscriber of the `shadowserver` tool.
///
/// Events of this binary and of the `shadowserver_api` client (one per call,
/// one per fetched query page) are written to stderr at `log_level`, so that
/// stdout only carries the JSON results. Other crates log at `warn`.
/// A `RUST_LOG` filter replaces all of this.
pub fn setup_logging(log_level: &LevelFilter) -> anyhow::Result<()> {
    LogTracer::init().context("Failed to set logger")?;
    let filter = EnvFilter::builder()
        .try_from_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(*log_level)));
    let subscriber = Registry::default()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr));
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

/// Filter directives used when `RUST_LOG` is not set.
fn default_directives(log_level: LevelFilter) -> String {
    if log_level == LevelFilter::OFF {
        return "off".into();
    }
    format!(
        "warn,{tool}={log_level},{client}={log_level}",
        tool = env!("CARGO_CRATE_NAME"),
        client = CLIENT_TARGET,
    )
}
