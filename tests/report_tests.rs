// Copyright (c) 2025 Dealerbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use dealerbook::ledger::filter::FlowFilter;
use dealerbook::ledger::report;
use dealerbook::models::{CashflowEntry, Flow};
use rust_decimal::Decimal;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn entry(id: i64, d: &str, flow: Flow, amount: i64, category: &str) -> CashflowEntry {
    CashflowEntry {
        id,
        date: date(d),
        flow,
        amount: Decimal::from(amount),
        category: category.to_string(),
        description: None,
        payment_method: "cash".to_string(),
        payment_from: Some("meezan".to_string()),
        vehicle_id: None,
        credit_sale_id: None,
        notes: None,
        entry_made_by: "tester".to_string(),
        added_by: "system".to_string(),
    }
}

#[test]
fn build_composes_summary_and_breakdown() {
    let entries = vec![
        entry(1, "2024-01-05", Flow::CashIn, 5000, "vehicle-sale"),
        entry(2, "2024-01-10", Flow::CashOut, 1200, "rent"),
    ];
    let rep = report::build(
        date("2024-01-01"),
        date("2024-01-31"),
        FlowFilter::All,
        entries,
    );
    assert_eq!(rep.summary.net_balance, Decimal::from(3800));
    assert_eq!(rep.categories.len(), 2);
    assert_eq!(rep.categories[0].category, "vehicle-sale");
    assert_eq!(rep.entries.len(), 2);
}

#[test]
fn csv_has_header_and_one_row_per_entry() {
    let entries = vec![
        entry(1, "2024-01-05", Flow::CashIn, 5000, "vehicle-sale"),
        entry(2, "2024-01-10", Flow::CashOut, 1200, "rent"),
    ];
    let rep = report::build(
        date("2024-01-01"),
        date("2024-01-31"),
        FlowFilter::All,
        entries,
    );
    let mut buf = Vec::new();
    report::write_csv(&rep, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[0],
        "Date,Entry Made by,Category,Type,Amount,Payment Method,Payment From,Notes"
    );
    assert_eq!(lines[1], "2024-01-05,tester,vehicle-sale,cash-in,5000,cash,meezan,");
}

#[test]
fn csv_escapes_quotes_and_commas_in_free_text() {
    let mut e = entry(1, "2024-01-05", Flow::CashIn, 100, "other");
    e.entry_made_by = "Ali \"the broker\", Jr.".to_string();
    e.notes = Some("paid in two parts, second \"pending\"".to_string());
    let rep = report::build(
        date("2024-01-01"),
        date("2024-01-31"),
        FlowFilter::All,
        vec![e],
    );
    let mut buf = Vec::new();
    report::write_csv(&rep, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let row = text.lines().nth(1).unwrap();
    assert!(row.contains("\"Ali \"\"the broker\"\", Jr.\""));
    assert!(row.contains("\"paid in two parts, second \"\"pending\"\"\""));

    // Round-trips through a csv reader
    let mut rdr = csv::Reader::from_reader(text.as_bytes());
    let rec = rdr.records().next().unwrap().unwrap();
    assert_eq!(&rec[1], "Ali \"the broker\", Jr.");
    assert_eq!(&rec[7], "paid in two parts, second \"pending\"");
}

#[test]
fn missing_location_exports_as_na() {
    let mut e = entry(1, "2024-01-05", Flow::CashIn, 100, "other");
    e.payment_from = None;
    let rep = report::build(
        date("2024-01-05"),
        date("2024-01-05"),
        FlowFilter::CashIn,
        vec![e],
    );
    let mut buf = Vec::new();
    report::write_csv(&rep, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.lines().nth(1).unwrap().contains("N/A"));
}

#[test]
fn export_filenames_are_deterministic() {
    assert_eq!(
        report::export_filename(date("2024-01-01"), date("2024-01-31")),
        "cashflow-export-2024-01-01-to-2024-01-31.csv"
    );
    assert_eq!(
        report::daily_export_filename(date("2024-02-14")),
        "cashflow-export-2024-02-14.csv"
    );
}
