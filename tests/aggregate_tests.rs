// Copyright (c) 2025 Dealerbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use dealerbook::ledger::{aggregate, filter};
use dealerbook::models::{
    CashflowEntry, CreditPayment, CreditSale, Flow, InvestorTxn, TxnKind, Vehicle,
};
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
        payment_from: None,
        vehicle_id: None,
        credit_sale_id: None,
        notes: None,
        entry_made_by: "tester".to_string(),
        added_by: "system".to_string(),
    }
}

fn located(mut e: CashflowEntry, from: Option<&str>) -> CashflowEntry {
    e.payment_from = from.map(|s| s.to_string());
    e
}

#[test]
fn summarize_empty_is_all_zero() {
    let s = aggregate::summarize(&[]);
    assert_eq!(s.cash_in, Decimal::ZERO);
    assert_eq!(s.cash_out, Decimal::ZERO);
    assert_eq!(s.net_balance, Decimal::ZERO);
}

#[test]
fn summarize_net_is_in_minus_out() {
    let entries = vec![
        entry(1, "2024-01-05", Flow::CashIn, 5000, "vehicle-sale"),
        entry(2, "2024-01-10", Flow::CashOut, 1200, "rent"),
        entry(3, "2024-01-20", Flow::CashIn, 800, "commission"),
    ];
    let s = aggregate::summarize(&entries);
    assert_eq!(s.cash_in, Decimal::from(5800));
    assert_eq!(s.cash_out, Decimal::from(1200));
    assert_eq!(s.net_balance, s.cash_in - s.cash_out);
}

#[test]
fn category_breakdown_groups_are_disjoint_and_cover_input() {
    let entries = vec![
        entry(1, "2024-01-01", Flow::CashIn, 100, "vehicle-sale"),
        entry(2, "2024-01-02", Flow::CashOut, 40, "rent"),
        entry(3, "2024-01-03", Flow::CashIn, 60, "vehicle-sale"),
        entry(4, "2024-01-04", Flow::CashOut, 10, ""),
    ];
    let breakdown = aggregate::category_breakdown(&entries);
    let mut names: Vec<&str> = breakdown.iter().map(|c| c.category.as_str()).collect();
    names.sort();
    // Empty categories are excluded, the rest appear exactly once
    assert_eq!(names, vec!["rent", "vehicle-sale"]);
    let vehicle = breakdown
        .iter()
        .find(|c| c.category == "vehicle-sale")
        .unwrap();
    assert_eq!(vehicle.total_in, Decimal::from(160));
    assert_eq!(vehicle.net, Decimal::from(160));
}

#[test]
fn category_breakdown_sorts_by_abs_net_with_first_seen_ties() {
    // Nets: a=-50, b=30, c=-30, d=10 -> order a, b, c (tie, first seen), d
    let entries = vec![
        entry(1, "2024-01-01", Flow::CashOut, 50, "a"),
        entry(2, "2024-01-02", Flow::CashIn, 30, "b"),
        entry(3, "2024-01-03", Flow::CashOut, 30, "c"),
        entry(4, "2024-01-04", Flow::CashIn, 10, "d"),
    ];
    let order: Vec<String> = aggregate::category_breakdown(&entries)
        .into_iter()
        .map(|c| c.category)
        .collect();
    assert_eq!(order, vec!["a", "b", "c", "d"]);
}

#[test]
fn location_breakdown_buckets_and_totals() {
    let entries = vec![
        located(entry(1, "2024-01-01", Flow::CashIn, 1000, "vehicle-sale"), Some("meezan")),
        located(entry(2, "2024-01-02", Flow::CashOut, 200, "rent"), Some("habib")),
        // No location -> falls back to home
        located(entry(3, "2024-01-03", Flow::CashIn, 500, "commission"), None),
    ];
    let b = aggregate::location_breakdown(&entries);
    let meezan = b.rows.iter().find(|r| r.location == "meezan").unwrap();
    assert_eq!(meezan.cash_in, Decimal::from(1000));
    let home = b.rows.iter().find(|r| r.location == "home").unwrap();
    assert_eq!(home.cash_in, Decimal::from(500));
    // Grand totals equal the plain summary when every slug is known
    let s = aggregate::summarize(&entries);
    assert_eq!(b.total_in, s.cash_in);
    assert_eq!(b.total_out, s.cash_out);
    assert_eq!(b.balance, s.net_balance);
    // Fixed list order is preserved
    let order: Vec<&str> = b.rows.iter().map(|r| r.location.as_str()).collect();
    assert_eq!(order, vec!["meezan", "habib", "punjab", "mcb", "home"]);
}

#[test]
fn location_breakdown_drops_unknown_slugs() {
    let entries = vec![
        located(entry(1, "2024-01-01", Flow::CashIn, 1000, "vehicle-sale"), Some("meezan")),
        located(entry(2, "2024-01-02", Flow::CashIn, 700, "commission"), Some("swiss-vault")),
    ];
    let b = aggregate::location_breakdown(&entries);
    // The unknown slug lands in no bucket, so the grand total misses it
    assert_eq!(b.total_in, Decimal::from(1000));
}

#[test]
fn investor_balance_signs() {
    let txns = vec![
        InvestorTxn {
            id: 1,
            date: date("2024-01-01"),
            kind: TxnKind::Investment,
            amount: Decimal::from(1000),
            notes: None,
        },
        InvestorTxn {
            id: 2,
            date: date("2024-02-01"),
            kind: TxnKind::Repayment,
            amount: Decimal::from(400),
            notes: None,
        },
        InvestorTxn {
            id: 3,
            date: date("2024-03-01"),
            kind: TxnKind::Investment,
            amount: Decimal::from(200),
            notes: None,
        },
    ];
    assert_eq!(aggregate::investor_balance(&txns), Decimal::from(800));
    assert_eq!(aggregate::investor_balance(&[]), Decimal::ZERO);
}

fn sale(id: i64, price: i64, paid: &[i64], status: &str) -> CreditSale {
    CreditSale {
        id,
        vehicle_type: "car".to_string(),
        registration_number: format!("LEB-{}", id),
        customer_name: "Customer".to_string(),
        id_card_number: None,
        phone_number: None,
        address: None,
        selling_price: Decimal::from(price),
        advance_received: Decimal::ZERO,
        sale_date: date("2024-01-01"),
        expected_completion_date: None,
        status: status.to_string(),
        notes: None,
        payments: paid
            .iter()
            .enumerate()
            .map(|(i, amount)| CreditPayment {
                id: i as i64 + 1,
                date: date("2024-02-01"),
                amount: Decimal::from(*amount),
                payment_method: "cash".to_string(),
                notes: None,
            })
            .collect(),
        installments: Vec::new(),
    }
}

#[test]
fn credit_sale_totals_scenario() {
    let sales = vec![sale(1, 1000, &[400], "pending"), sale(2, 500, &[500], "completed")];
    let t = aggregate::credit_sale_totals(&sales);
    assert_eq!(t.total_selling_price, Decimal::from(1500));
    assert_eq!(t.total_paid, Decimal::from(900));
    assert_eq!(t.total_remaining, Decimal::from(600));
    assert_eq!(t.total_sales, 2);
    assert_eq!(t.completed_sales, 1);
    assert_eq!(t.pending_sales, 1);
}

#[test]
fn cancelled_sales_count_in_neither_status_bucket() {
    let sales = vec![sale(1, 1000, &[], "cancelled")];
    let t = aggregate::credit_sale_totals(&sales);
    assert_eq!(t.total_sales, 1);
    assert_eq!(t.completed_sales, 0);
    assert_eq!(t.pending_sales, 0);
}

#[test]
fn inventory_totals_net_is_sold_minus_bought() {
    let vehicle = |id: i64, kind: &str, price: i64| Vehicle {
        id,
        registration_number: format!("LEB-{}", id),
        engine_number: None,
        kind: kind.to_string(),
        holder_name: "Holder".to_string(),
        id_card_number: None,
        phone_number: None,
        address: None,
        price: Decimal::from(price),
        commission_paid: Decimal::ZERO,
        notes: None,
    };
    let vehicles = vec![
        vehicle(1, "bought", 900),
        vehicle(2, "sold", 1500),
        vehicle(3, "bought", 600),
    ];
    let t = aggregate::inventory_totals(&vehicles);
    assert_eq!(t.total_vehicles, 3);
    assert_eq!(t.bought_count, 2);
    assert_eq!(t.sold_count, 1);
    assert_eq!(t.net_value, Decimal::from(0));
}

#[test]
fn filter_then_summarize_end_to_end() {
    let entries = vec![
        entry(1, "2024-01-05", Flow::CashIn, 5000, "vehicle-sale"),
        entry(2, "2024-01-10", Flow::CashOut, 1200, "rent"),
        entry(3, "2024-01-20", Flow::CashIn, 800, "commission"),
    ];
    let criteria = filter::Criteria {
        start: Some(date("2024-01-01")),
        end: Some(date("2024-01-15")),
        ..Default::default()
    };
    let filtered = filter::apply(&entries, &criteria);
    let s = aggregate::summarize(&filtered);
    assert_eq!(s.cash_in, Decimal::from(5000));
    assert_eq!(s.cash_out, Decimal::from(1200));
    assert_eq!(s.net_balance, Decimal::from(3800));
}
