//! One-shot commands: load the canonical table, resolve a single selection,
//! print the JSON result.

use anyhow::Context;
use chrono::NaiveDate;
use log::info;
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use wqm_core::canonical::CanonicalTable;
use wqm_core::loader::SourcePaths;
use wqm_core::normalize::DropReport;
use wqm_view::selection::SelectionResolver;

fn load_resolver(paths: &SourcePaths) -> anyhow::Result<SelectionResolver> {
    let table = CanonicalTable::load(paths).context("Failed to build canonical table")?;
    info!(
        "Loaded {} canonical rows across {} parameters",
        table.len(),
        table.parameters().len()
    );
    Ok(SelectionResolver::new(Arc::new(table)))
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[derive(Serialize)]
struct Summary<'a> {
    rows: usize,
    parameters: &'a [String],
    dates: Vec<NaiveDate>,
    drop_report: &'a DropReport,
}

pub fn run_summary<W: Write>(paths: &SourcePaths, out: &mut W) -> anyhow::Result<()> {
    let resolver = load_resolver(paths)?;
    let table = resolver.table();
    let summary = Summary {
        rows: table.len(),
        parameters: table.parameters(),
        dates: resolver.available_dates(),
        drop_report: table.drop_report(),
    };
    write_json(out, &summary)
}

pub fn run_dates<W: Write>(paths: &SourcePaths, out: &mut W) -> anyhow::Result<()> {
    let resolver = load_resolver(paths)?;
    write_json(out, &resolver.available_dates())
}

pub fn run_map<W: Write>(paths: &SourcePaths, date: Option<&str>, out: &mut W) -> anyhow::Result<()> {
    let mut resolver = load_resolver(paths)?;
    if let Some(date) = date {
        resolver.date_chosen(date)?;
    }
    write_json(out, &resolver.map_view())
}

pub fn run_chart<W: Write>(
    paths: &SourcePaths,
    site: &str,
    parameters: Vec<String>,
    date: Option<&str>,
    out: &mut W,
) -> anyhow::Result<()> {
    let mut resolver = load_resolver(paths)?;
    resolver.site_clicked(site);
    if !parameters.is_empty() {
        resolver.parameters_chosen(parameters);
    }
    if let Some(date) = date {
        resolver.date_chosen(date)?;
    }
    write_json(out, &resolver.chart_view())
}
