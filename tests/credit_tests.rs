// Copyright (c) 2025 Dealerbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use dealerbook::ledger::aggregate;
use dealerbook::{cli, commands, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

fn run_credit(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(args);
    if let Some(("credit", sub)) = matches.subcommand() {
        commands::credit::handle(conn, sub)
    } else {
        panic!("no credit subcommand");
    }
}

fn add_sale(conn: &Connection, price: &str) -> i64 {
    run_credit(
        conn,
        &[
            "dealerbook", "credit", "add", "--vehicle-type", "Corolla", "--reg", "LEB-1234",
            "--customer", "Bilal", "--price", price, "--advance", "100",
            "--sale-date", "2024-01-01",
        ],
    )
    .unwrap();
    conn.last_insert_rowid()
}

#[test]
fn payments_append_and_remaining_shrinks() {
    let conn = setup();
    let id = add_sale(&conn, "1000");
    run_credit(
        &conn,
        &[
            "dealerbook", "credit", "pay", "--id", &id.to_string(), "--amount", "400",
            "--date", "2024-02-01",
        ],
    )
    .unwrap();
    run_credit(
        &conn,
        &[
            "dealerbook", "credit", "pay", "--id", &id.to_string(), "--amount", "150",
            "--date", "2024-03-01", "--method", "bank-transfer",
        ],
    )
    .unwrap();

    let sale = commands::credit::sale_by_id(&conn, id).unwrap();
    assert_eq!(sale.payments.len(), 2);
    assert_eq!(sale.total_paid(), Decimal::from(550));
    assert_eq!(sale.remaining(), Decimal::from(450));
    // Payment history stays ordered by date
    assert_eq!(sale.payments[0].amount, Decimal::from(400));
}

#[test]
fn pay_rejects_nonpositive_and_missing_sale() {
    let conn = setup();
    let id = add_sale(&conn, "1000");
    assert!(run_credit(
        &conn,
        &[
            "dealerbook", "credit", "pay", "--id", &id.to_string(), "--amount", "0",
            "--date", "2024-02-01",
        ],
    )
    .is_err());
    assert!(run_credit(
        &conn,
        &["dealerbook", "credit", "pay", "--id", "99", "--amount", "10", "--date", "2024-02-01"],
    )
    .is_err());
}

#[test]
fn schedule_creates_monthly_installments() {
    let conn = setup();
    let id = add_sale(&conn, "1200");
    run_credit(
        &conn,
        &[
            "dealerbook", "credit", "schedule", "--id", &id.to_string(),
            "--first-due", "2024-01-31", "--months", "3", "--amount", "400",
        ],
    )
    .unwrap();
    let sale = commands::credit::sale_by_id(&conn, id).unwrap();
    assert_eq!(sale.installments.len(), 3);
    let dues: Vec<String> = sale
        .installments
        .iter()
        .map(|i| i.due_date.to_string())
        .collect();
    // Month-end clamping: Jan 31 -> Feb 29 (2024 is a leap year) -> Mar 31
    assert_eq!(dues, vec!["2024-01-31", "2024-02-29", "2024-03-31"]);
    assert!(sale.installments.iter().all(|i| !i.paid));
}

#[test]
fn mark_paid_flips_one_installment() {
    let conn = setup();
    let id = add_sale(&conn, "1200");
    run_credit(
        &conn,
        &[
            "dealerbook", "credit", "schedule", "--id", &id.to_string(),
            "--first-due", "2024-02-01", "--months", "2", "--amount", "600",
        ],
    )
    .unwrap();
    let sale = commands::credit::sale_by_id(&conn, id).unwrap();
    let first = sale.installments[0].id;
    run_credit(
        &conn,
        &["dealerbook", "credit", "mark-paid", "--installment", &first.to_string()],
    )
    .unwrap();
    let sale = commands::credit::sale_by_id(&conn, id).unwrap();
    assert!(sale.installments[0].paid);
    assert!(!sale.installments[1].paid);
}

#[test]
fn status_transitions_and_totals() {
    let conn = setup();
    let first = add_sale(&conn, "1000");
    run_credit(
        &conn,
        &[
            "dealerbook", "credit", "pay", "--id", &first.to_string(), "--amount", "400",
            "--date", "2024-02-01",
        ],
    )
    .unwrap();
    // Second sale, fully paid and completed
    run_credit(
        &conn,
        &[
            "dealerbook", "credit", "add", "--vehicle-type", "Mehran", "--reg", "LEB-77",
            "--customer", "Imran", "--price", "500", "--sale-date", "2024-01-10",
        ],
    )
    .unwrap();
    let second = conn.last_insert_rowid();
    run_credit(
        &conn,
        &[
            "dealerbook", "credit", "pay", "--id", &second.to_string(), "--amount", "500",
            "--date", "2024-02-10",
        ],
    )
    .unwrap();
    run_credit(
        &conn,
        &["dealerbook", "credit", "status", "--id", &second.to_string(), "--status", "completed"],
    )
    .unwrap();
    assert!(run_credit(
        &conn,
        &["dealerbook", "credit", "status", "--id", &second.to_string(), "--status", "done"],
    )
    .is_err());

    let sales = commands::credit::all_sales(&conn).unwrap();
    let totals = aggregate::credit_sale_totals(&sales);
    assert_eq!(totals.total_selling_price, Decimal::from(1500));
    assert_eq!(totals.total_paid, Decimal::from(900));
    assert_eq!(totals.total_remaining, Decimal::from(600));
    assert_eq!(totals.completed_sales, 1);
    assert_eq!(totals.pending_sales, 1);
}

#[test]
fn rm_cascades_payments_and_installments() {
    let conn = setup();
    let id = add_sale(&conn, "1000");
    run_credit(
        &conn,
        &[
            "dealerbook", "credit", "pay", "--id", &id.to_string(), "--amount", "100",
            "--date", "2024-02-01",
        ],
    )
    .unwrap();
    run_credit(
        &conn,
        &[
            "dealerbook", "credit", "schedule", "--id", &id.to_string(),
            "--first-due", "2024-02-01", "--months", "2", "--amount", "450",
        ],
    )
    .unwrap();
    run_credit(&conn, &["dealerbook", "credit", "rm", "--id", &id.to_string()]).unwrap();
    let payments: i64 = conn
        .query_row("SELECT COUNT(*) FROM credit_payments", [], |r| r.get(0))
        .unwrap();
    let installments: i64 = conn
        .query_row("SELECT COUNT(*) FROM installments", [], |r| r.get(0))
        .unwrap();
    assert_eq!(payments, 0);
    assert_eq!(installments, 0);
}
