// Copyright (c) 2025 Dealerbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

use crate::ledger::{filter, report};
use crate::models::{
    CashflowEntry, Flow, CASH_IN_CATEGORIES, CASH_LOCATIONS, CASH_OUT_CATEGORIES, PAYMENT_METHODS,
};
use crate::utils::{
    credit_sale_exists, format_category, id_for_vehicle, maybe_print_json, parse_date,
    parse_decimal, pretty_table, stored_decimal,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("report", sub)) => print_report(conn, sub)?,
        Some(("export", sub)) => export(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let flow: Flow = sub.get_one::<String>("type").unwrap().parse()?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap();
    let method = sub.get_one::<String>("method").unwrap();
    let from = sub.get_one::<String>("from").map(|s| s.to_string());
    let description = sub.get_one::<String>("description").map(|s| s.to_string());
    let notes = sub.get_one::<String>("notes").map(|s| s.to_string());
    let entry_by = sub.get_one::<String>("entry-by").unwrap();
    let added_by = sub.get_one::<String>("added-by").unwrap();

    // Validation happens before anything is written (no partial state).
    if amount <= Decimal::ZERO {
        bail!("Amount must be greater than 0");
    }
    let allowed = match flow {
        Flow::CashIn => CASH_IN_CATEGORIES,
        Flow::CashOut => CASH_OUT_CATEGORIES,
    };
    if !allowed.contains(&category.as_str()) {
        bail!(
            "Unknown {} category '{}', expected one of: {}",
            flow.as_str(),
            category,
            allowed.join("|")
        );
    }
    if !PAYMENT_METHODS.contains(&method.as_str()) {
        bail!(
            "Unknown payment method '{}', expected one of: {}",
            method,
            PAYMENT_METHODS.join("|")
        );
    }
    if let Some(ref loc) = from {
        if !CASH_LOCATIONS.iter().any(|(slug, _)| slug == loc) {
            bail!(
                "Unknown cash location '{}', expected one of: {}",
                loc,
                CASH_LOCATIONS
                    .iter()
                    .map(|(slug, _)| *slug)
                    .collect::<Vec<_>>()
                    .join("|")
            );
        }
    }
    if sub.get_one::<String>("vehicle").is_some() && sub.get_one::<i64>("credit").is_some() {
        bail!("An entry can reference a vehicle or a credit sale, not both");
    }

    let vehicle_id = match sub.get_one::<String>("vehicle") {
        Some(reg) => Some(id_for_vehicle(conn, reg)?),
        None => None,
    };
    let credit_sale_id = match sub.get_one::<i64>("credit") {
        Some(id) => {
            credit_sale_exists(conn, *id)?;
            Some(*id)
        }
        None => None,
    };

    conn.execute(
        "INSERT INTO cashflows(date, flow, amount, category, description, payment_method,
                               payment_from, vehicle_id, credit_sale_id, notes, entry_made_by, added_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            date.to_string(),
            flow.as_str(),
            amount.to_string(),
            category,
            description,
            method,
            from,
            vehicle_id,
            credit_sale_id,
            notes,
            entry_by,
            added_by
        ],
    )?;
    println!(
        "Recorded {} {} on {} ({})",
        flow.as_str(),
        amount,
        date,
        format_category(category)
    );
    Ok(())
}

/// Fetch every cashflow row into memory; filtering and aggregation stay
/// client-side in the ledger module.
pub fn all_entries(conn: &Connection) -> Result<Vec<CashflowEntry>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, flow, amount, category, description, payment_method,
                payment_from, vehicle_id, credit_sale_id, notes, entry_made_by, added_by
         FROM cashflows ORDER BY date, id",
    )?;
    let mut rows = stmt.query([])?;
    let mut entries = Vec::new();
    while let Some(r) = rows.next()? {
        let date_s: String = r.get(1)?;
        let flow_s: String = r.get(2)?;
        let amount_s: String = r.get(3)?;
        entries.push(CashflowEntry {
            id: r.get(0)?,
            date: parse_date(&date_s)?,
            flow: flow_s.parse()?,
            amount: stored_decimal(&amount_s, "cashflows")?,
            category: r.get(4)?,
            description: r.get(5)?,
            payment_method: r.get(6)?,
            payment_from: r.get(7)?,
            vehicle_id: r.get(8)?,
            credit_sale_id: r.get(9)?,
            notes: r.get(10)?,
            entry_made_by: r.get(11)?,
            added_by: r.get(12)?,
        });
    }
    Ok(entries)
}

/// Filter criteria from the shared range/type/category args. `--on` narrows to
/// a single calendar date.
pub fn criteria_from(sub: &clap::ArgMatches) -> Result<filter::Criteria> {
    let mut criteria = filter::Criteria {
        flow: sub.get_one::<String>("type").unwrap().parse()?,
        category: sub.get_one::<String>("category").map(|s| s.to_string()),
        ..Default::default()
    };
    if let Some(on) = sub.try_get_one::<String>("on").unwrap_or(None) {
        let day = parse_date(on)?;
        criteria.start = Some(day);
        criteria.end = Some(day);
    } else {
        if let Some(s) = sub.get_one::<String>("start") {
            criteria.start = Some(parse_date(s)?);
        }
        if let Some(e) = sub.get_one::<String>("end") {
            criteria.end = Some(parse_date(e)?);
        }
    }
    Ok(criteria)
}

pub fn query_entries(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<CashflowEntry>> {
    let entries = all_entries(conn)?;
    let criteria = criteria_from(sub)?;
    let mut filtered = filter::apply(&entries, &criteria);
    if let Some(limit) = sub.try_get_one::<usize>("limit").unwrap_or(None) {
        filtered.truncate(*limit);
    }
    Ok(filtered)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let filtered = query_entries(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &filtered)? {
        let rows: Vec<Vec<String>> = filtered
            .iter()
            .map(|e| {
                vec![
                    e.id.to_string(),
                    e.date.to_string(),
                    e.entry_made_by.clone(),
                    format_category(&e.category),
                    e.flow.as_str().to_string(),
                    e.amount.to_string(),
                    e.payment_method.clone(),
                    e.payment_from.clone().unwrap_or_else(|| "N/A".to_string()),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Entry Made by", "Category", "Type", "Amount", "Method", "From"],
                rows,
            )
        );
    }
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let n = conn.execute("DELETE FROM cashflows WHERE id=?1", params![id])?;
    if n == 0 {
        bail!("Cashflow entry #{} not found", id);
    }
    println!("Deleted cashflow entry #{}", id);
    Ok(())
}

fn build_report(conn: &Connection, sub: &clap::ArgMatches) -> Result<report::Report> {
    let entries = all_entries(conn)?;
    let criteria = criteria_from(sub)?;
    let filtered = filter::apply(&entries, &criteria);
    // Default the printed period to the span of the data when no range given.
    let start = match criteria.start {
        Some(s) => s,
        None => filtered
            .first()
            .map(|e| e.date)
            .unwrap_or_else(|| chrono::Utc::now().date_naive()),
    };
    let end = match criteria.end {
        Some(e) => e,
        None => filtered
            .last()
            .map(|e| e.date)
            .unwrap_or_else(|| chrono::Utc::now().date_naive()),
    };
    Ok(report::build(start, end, criteria.flow, filtered))
}

fn print_report(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let rep = build_report(conn, sub)?;
    if maybe_print_json(json_flag, jsonl_flag, &rep)? {
        return Ok(());
    }

    println!("Cashflow report {} .. {} ({})", rep.start, rep.end, rep.flow.as_str());
    println!(
        "{}",
        pretty_table(
            &["Cash In", "Cash Out", "Net Balance"],
            vec![vec![
                rep.summary.cash_in.to_string(),
                rep.summary.cash_out.to_string(),
                rep.summary.net_balance.to_string(),
            ]],
        )
    );

    let cat_rows: Vec<Vec<String>> = rep
        .categories
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

    let breakdown = crate::ledger::aggregate::location_breakdown(&rep.entries);
    let mut loc_rows: Vec<Vec<String>> = breakdown
        .rows
        .iter()
        .map(|l| {
            vec![
                l.label.clone(),
                l.cash_in.to_string(),
                l.cash_out.to_string(),
                l.balance.to_string(),
            ]
        })
        .collect();
    loc_rows.push(vec![
        "Total".to_string(),
        breakdown.total_in.to_string(),
        breakdown.total_out.to_string(),
        breakdown.balance.to_string(),
    ]);
    println!(
        "{}",
        pretty_table(&["Location", "Cash In", "Cash Out", "Balance"], loc_rows)
    );
    Ok(())
}

fn export(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let rep = build_report(conn, sub)?;
    let out = match sub.get_one::<String>("out") {
        Some(path) => path.clone(),
        None => match sub.get_one::<String>("on") {
            Some(on) => report::daily_export_filename(parse_date(on)?),
            None => report::export_filename(rep.start, rep.end),
        },
    };
    let file = std::fs::File::create(&out)?;
    report::write_csv(&rep, file)?;
    println!("Exported {} entries to {}", rep.entries.len(), out);
    Ok(())
}
