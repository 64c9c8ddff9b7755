// Copyright (c) 2025 Dealerbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::commands::cashflow;
use crate::ledger::{aggregate, filter};
use crate::utils::{format_category, maybe_print_json, parse_month, pretty_table, stored_decimal};

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyVehicleStats {
    pub month: String,
    pub bought_count: usize,
    pub sold_count: usize,
    pub total_bought: Decimal,
    pub total_sold: Decimal,
    pub total_commission: Decimal,
    pub profit: Decimal,
}

/// Vehicles recorded within one calendar month, summed by kind.
pub fn monthly_vehicle_stats(conn: &Connection, month: &str) -> Result<MonthlyVehicleStats> {
    let mut stmt = conn.prepare(
        "SELECT kind, price, commission_paid FROM vehicles WHERE substr(created_at,1,7)=?1",
    )?;
    let mut rows = stmt.query(params![month])?;
    let mut stats = MonthlyVehicleStats {
        month: month.to_string(),
        bought_count: 0,
        sold_count: 0,
        total_bought: Decimal::ZERO,
        total_sold: Decimal::ZERO,
        total_commission: Decimal::ZERO,
        profit: Decimal::ZERO,
    };
    while let Some(r) = rows.next()? {
        let kind: String = r.get(0)?;
        let price_s: String = r.get(1)?;
        let commission_s: String = r.get(2)?;
        let price = stored_decimal(&price_s, "vehicles")?;
        stats.total_commission += stored_decimal(&commission_s, "vehicles")?;
        match kind.as_str() {
            "bought" => {
                stats.bought_count += 1;
                stats.total_bought += price;
            }
            "sold" => {
                stats.sold_count += 1;
                stats.total_sold += price;
            }
            _ => {}
        }
    }
    stats.profit = stats.total_sold - stats.total_bought;
    Ok(stats)
}

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let today = chrono::Utc::now().date_naive();
    let month = match sub.get_one::<String>("month") {
        Some(m) => parse_month(m)?,
        None => today.format("%Y-%m").to_string(),
    };

    let vehicle_stats = monthly_vehicle_stats(conn, &month)?;

    let entries = cashflow::all_entries(conn)?;
    let summary = aggregate::summarize(&entries);
    let categories = aggregate::category_breakdown(&entries);

    let today_entries = filter::apply(
        &entries,
        &filter::Criteria {
            start: Some(today),
            end: Some(today),
            ..Default::default()
        },
    );
    let today_summary = aggregate::summarize(&today_entries);

    #[derive(Serialize)]
    struct Dashboard<'a> {
        vehicles: &'a MonthlyVehicleStats,
        cashflow: &'a aggregate::Summary,
        today: &'a aggregate::Summary,
        categories: &'a [aggregate::CategoryTotal],
    }
    let bundle = Dashboard {
        vehicles: &vehicle_stats,
        cashflow: &summary,
        today: &today_summary,
        categories: &categories,
    };
    if maybe_print_json(json_flag, jsonl_flag, &bundle)? {
        return Ok(());
    }

    println!("Vehicles in {}", month);
    println!(
        "{}",
        pretty_table(
            &["Bought", "Sold", "Bought Value", "Sold Value", "Commission", "Profit"],
            vec![vec![
                vehicle_stats.bought_count.to_string(),
                vehicle_stats.sold_count.to_string(),
                vehicle_stats.total_bought.to_string(),
                vehicle_stats.total_sold.to_string(),
                vehicle_stats.total_commission.to_string(),
                vehicle_stats.profit.to_string(),
            ]],
        )
    );

    println!("Cashflow (all time / today {})", today);
    println!(
        "{}",
        pretty_table(
            &["Cash In", "Cash Out", "Net", "Today In", "Today Out", "Today Net"],
            vec![vec![
                summary.cash_in.to_string(),
                summary.cash_out.to_string(),
                summary.net_balance.to_string(),
                today_summary.cash_in.to_string(),
                today_summary.cash_out.to_string(),
                today_summary.net_balance.to_string(),
            ]],
        )
    );

    let cat_rows: Vec<Vec<String>> = categories
        .iter()
        .map(|c| {
            vec![
                format_category(&c.category),
                c.total_in.to_string(),
                c.total_out.to_string(),
                c.net.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "In", "Out", "Net"], cat_rows)
    );
    Ok(())
}
