// Copyright (c) 2025 Dealerbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

use crate::ledger::aggregate::{self, CategoryTotal, Summary};
use crate::ledger::filter::FlowFilter;
use crate::models::CashflowEntry;

/// A display/export-ready bundle: the filtered entries together with their
/// aggregation. Building one performs no I/O.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub flow: FlowFilter,
    pub entries: Vec<CashflowEntry>,
    pub summary: Summary,
    pub categories: Vec<CategoryTotal>,
}

pub fn build(
    start: NaiveDate,
    end: NaiveDate,
    flow: FlowFilter,
    entries: Vec<CashflowEntry>,
) -> Report {
    let summary = aggregate::summarize(&entries);
    let categories = aggregate::category_breakdown(&entries);
    Report {
        start,
        end,
        flow,
        entries,
        summary,
        categories,
    }
}

pub const CSV_HEADER: [&str; 8] = [
    "Date",
    "Entry Made by",
    "Category",
    "Type",
    "Amount",
    "Payment Method",
    "Payment From",
    "Notes",
];

/// One CSV row per entry. Quote/comma escaping of the free-text fields is the
/// csv crate's concern.
pub fn write_csv<W: std::io::Write>(report: &Report, out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(CSV_HEADER)?;
    for e in &report.entries {
        wtr.write_record([
            e.date.to_string(),
            e.entry_made_by.clone(),
            e.category.clone(),
            e.flow.as_str().to_string(),
            e.amount.to_string(),
            e.payment_method.clone(),
            e.payment_from.clone().unwrap_or_else(|| "N/A".to_string()),
            e.notes.clone().unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Deterministic export name for a date-range report.
pub fn export_filename(start: NaiveDate, end: NaiveDate) -> String {
    format!("cashflow-export-{}-to-{}.csv", start, end)
}

/// Deterministic export name for a single-day report.
pub fn daily_export_filename(date: NaiveDate) -> String {
    format!("cashflow-export-{}.csv", date)
}
