// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

//! Command line client for the Shadowserver reports API

mod args;
mod log;

use crate::{
    args::{Arguments, QueryArgs, SubCommands},
    log::setup_logging,
};
use anyhow::{Context, Result};
use clap::Parser;
use futures::TryStreamExt;
use serde::Serialize;
use shadowserver_api::{
    ApiClient, ClientConfig, ReportQuery, ReportsDownloadRequest,
    ReportsListRequest, ReportsStatsRequest,
};
use std::{
    io::{self, Write},
    pin::pin,
};
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Arguments::parse();
    setup_logging(&args.log_level)?;

    let config = ClientConfig::load(args.config.as_deref())
        .context("failed to load the configuration")?;
    debug!(?config, "loaded configuration");

    let client = ApiClient::from_config(&config).context("failed to create the API client")?;

    match args.cmd {
        SubCommands::Ping => print_json(&client.ping().await?),
        SubCommands::KeyInfo => print_json(&client.key_info().await?),
        SubCommands::Subscribed => print_json(&client.reports_subscribed().await?),
        SubCommands::Types => print_json(&client.reports_types().await?),
        SubCommands::List(args) => {
            let mut request = ReportsListRequest::new();
            request.reports = args.reports;
            request.date = args.date;
            request.report_type = args.report_type;
            request.limit = args.limit;
            print_json(&client.reports_list(&request).await?)
        }
        SubCommands::Download(args) => {
            let mut request = ReportsDownloadRequest::new(args.id);
            request.report = args.report;
            request.limit = args.limit;
            print_json(&client.reports_download(&request).await?)
        }
        SubCommands::Query(args) => query(&client, args).await,
        SubCommands::Stats(args) => {
            let mut request = ReportsStatsRequest::new();
            request.report = args.reports;
            request.report_type = args.report_types;
            request.date = args.date;
            print_json(&client.reports_stats(&request).await?)
        }
        SubCommands::DeviceInfo(args) => {
            print_json(&client.reports_device_info(args.criteria).await?)
        }
        SubCommands::Schema(args) => print_json(&client.reports_schema(&args.report_type).await?),
    }
}

async fn query(client: &ApiClient, args: QueryArgs) -> Result<()> {
    let mut query = ReportQuery::new(args.criteria)
        .with_sort(args.sort)
        .with_limit(Some(args.limit))
        .with_pagination(!args.no_paginate);
    if let Some(date) = args.date {
        query = query.with_date(date);
    }
    if let Some(facet) = args.facet {
        query = query.with_facet(facet);
    }

    let mut rows = pin!(client.reports_query(query));
    let mut stdout = io::stdout().lock();
    let mut count = 0usize;
    while let Some(row) = rows.try_next().await? {
        serde_json::to_writer(&mut stdout, &row)?;
        writeln!(stdout)?;
        count += 1;
    }
    info!(rows = count, "query finished");

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
