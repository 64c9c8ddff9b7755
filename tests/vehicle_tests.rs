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

fn run_vehicle(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from(args);
    if let Some(("vehicle", sub)) = matches.subcommand() {
        commands::vehicles::handle(conn, sub)
    } else {
        panic!("no vehicle subcommand");
    }
}

fn add_vehicle(conn: &Connection, reg: &str, kind: &str, price: &str) {
    run_vehicle(
        conn,
        &[
            "dealerbook", "vehicle", "add", "--reg", reg, "--kind", kind, "--name", "Akbar",
            "--phone", "0300-1234567", "--price", price,
        ],
    )
    .unwrap();
}

#[test]
fn add_writes_exactly_one_initial_record() {
    let conn = setup();
    add_vehicle(&conn, "LEB-1234", "bought", "900");
    let records = commands::vehicles::history_for(&conn, "LEB-1234").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].record_type, "initial");
    assert_eq!(records[0].name, "Akbar");
    assert_eq!(records[0].price, Some(Decimal::from(900)));
}

#[test]
fn add_rejects_unknown_kind_and_nonpositive_price() {
    let conn = setup();
    assert!(run_vehicle(
        &conn,
        &[
            "dealerbook", "vehicle", "add", "--reg", "LEB-1", "--kind", "leased",
            "--name", "Akbar", "--price", "100",
        ],
    )
    .is_err());
    assert!(run_vehicle(
        &conn,
        &[
            "dealerbook", "vehicle", "add", "--reg", "LEB-1", "--kind", "bought",
            "--name", "Akbar", "--price", "0",
        ],
    )
    .is_err());
    assert!(commands::vehicles::all_vehicles(&conn).unwrap().is_empty());
}

#[test]
fn update_merges_over_current_and_appends_record() {
    let conn = setup();
    add_vehicle(&conn, "LEB-1234", "bought", "900");
    run_vehicle(
        &conn,
        &[
            "dealerbook", "vehicle", "update", "--reg", "LEB-1234", "--phone", "0321-7654321",
        ],
    )
    .unwrap();
    let v = commands::vehicles::vehicle_by_reg(&conn, "LEB-1234").unwrap();
    // Unspecified fields keep their stored values
    assert_eq!(v.holder_name, "Akbar");
    assert_eq!(v.price, Decimal::from(900));
    assert_eq!(v.phone_number.as_deref(), Some("0321-7654321"));
    assert_eq!(v.kind, "bought");

    let records = commands::vehicles::history_for(&conn, "LEB-1234").unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].record_type, "update");
    assert_eq!(records[1].name, "Akbar");
}

#[test]
fn transfer_appends_record_and_marks_sold() {
    let conn = setup();
    add_vehicle(&conn, "LEB-1234", "bought", "900");
    run_vehicle(
        &conn,
        &[
            "dealerbook", "vehicle", "transfer", "--reg", "LEB-1234", "--name", "Danish",
            "--price", "1500",
        ],
    )
    .unwrap();
    let v = commands::vehicles::vehicle_by_reg(&conn, "LEB-1234").unwrap();
    assert_eq!(v.kind, "sold");
    assert_eq!(v.holder_name, "Danish");
    assert_eq!(v.price, Decimal::from(1500));

    let records = commands::vehicles::history_for(&conn, "LEB-1234").unwrap();
    let kinds: Vec<&str> = records.iter().map(|r| r.record_type.as_str()).collect();
    assert_eq!(kinds, vec!["initial", "transfer"]);
    assert_eq!(records[1].name, "Danish");
}

#[test]
fn search_matches_reg_name_and_phone() {
    let conn = setup();
    add_vehicle(&conn, "LEB-1234", "bought", "900");
    run_vehicle(
        &conn,
        &["dealerbook", "vehicle", "search", "--query", "LEB-12"],
    )
    .unwrap();
    run_vehicle(&conn, &["dealerbook", "vehicle", "search", "--query", "Akbar"]).unwrap();
    run_vehicle(&conn, &["dealerbook", "vehicle", "search", "--query", "0300"]).unwrap();
    assert!(run_vehicle(
        &conn,
        &["dealerbook", "vehicle", "search", "--query", "no-such-thing"],
    )
    .is_err());
}

#[test]
fn inventory_totals_over_stored_fleet() {
    let conn = setup();
    add_vehicle(&conn, "LEB-1", "bought", "900");
    add_vehicle(&conn, "LEB-2", "sold", "1500");
    add_vehicle(&conn, "LEB-3", "bought", "600");
    let vehicles = commands::vehicles::all_vehicles(&conn).unwrap();
    let t = aggregate::inventory_totals(&vehicles);
    assert_eq!(t.total_vehicles, 3);
    assert_eq!(t.total_bought_value, Decimal::from(1500));
    assert_eq!(t.total_sold_value, Decimal::from(1500));
    assert_eq!(t.net_value, Decimal::ZERO);
}

#[test]
fn rm_removes_vehicle_and_its_history() {
    let conn = setup();
    add_vehicle(&conn, "LEB-1234", "bought", "900");
    run_vehicle(&conn, &["dealerbook", "vehicle", "rm", "--reg", "LEB-1234"]).unwrap();
    assert!(commands::vehicles::all_vehicles(&conn).unwrap().is_empty());
    let history: i64 = conn
        .query_row("SELECT COUNT(*) FROM ownership_history", [], |r| r.get(0))
        .unwrap();
    assert_eq!(history, 0);
    assert!(run_vehicle(&conn, &["dealerbook", "vehicle", "rm", "--reg", "LEB-1234"]).is_err());
}
