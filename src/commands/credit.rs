// Copyright (c) 2025 Dealerbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Context, Result};
use chrono::Months;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

use crate::ledger::aggregate;
use crate::models::{CreditPayment, CreditSale, Installment};
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table, stored_decimal};

const STATUSES: &[&str] = &["pending", "completed", "cancelled"];

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("view", sub)) => view(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        Some(("schedule", sub)) => schedule(conn, sub)?,
        Some(("mark-paid", sub)) => mark_paid(conn, sub)?,
        Some(("status", sub)) => set_status(conn, sub)?,
        Some(("totals", sub)) => totals(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let vehicle_type = sub.get_one::<String>("vehicle-type").unwrap();
    let reg = sub.get_one::<String>("reg").unwrap();
    let customer = sub.get_one::<String>("customer").unwrap();
    let price = parse_decimal(sub.get_one::<String>("price").unwrap())?;
    let advance = parse_decimal(sub.get_one::<String>("advance").unwrap())?;
    let sale_date = parse_date(sub.get_one::<String>("sale-date").unwrap())?;
    let completion = match sub.get_one::<String>("completion-date") {
        Some(s) => Some(parse_date(s)?),
        None => None,
    };

    if price <= Decimal::ZERO {
        bail!("Selling price must be greater than 0");
    }
    if advance < Decimal::ZERO {
        bail!("Advance cannot be negative");
    }

    conn.execute(
        "INSERT INTO credit_sales(vehicle_type, registration_number, customer_name, id_card_number,
                                  phone_number, address, selling_price, advance_received, sale_date,
                                  expected_completion_date, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            vehicle_type,
            reg,
            customer,
            sub.get_one::<String>("id-card"),
            sub.get_one::<String>("phone"),
            sub.get_one::<String>("address"),
            price.to_string(),
            advance.to_string(),
            sale_date.to_string(),
            completion.map(|d| d.to_string()),
            sub.get_one::<String>("notes"),
        ],
    )?;
    let id = conn.last_insert_rowid();
    println!(
        "Recorded credit sale #{}: {} {} to {} for {}",
        id, vehicle_type, reg, customer, price
    );
    Ok(())
}

fn load_payments(conn: &Connection, sale_id: i64) -> Result<Vec<CreditPayment>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, amount, payment_method, notes
         FROM credit_payments WHERE credit_sale_id=?1 ORDER BY date, id",
    )?;
    let mut rows = stmt.query(params![sale_id])?;
    let mut payments = Vec::new();
    while let Some(r) = rows.next()? {
        let date_s: String = r.get(1)?;
        let amount_s: String = r.get(2)?;
        payments.push(CreditPayment {
            id: r.get(0)?,
            date: parse_date(&date_s)?,
            amount: stored_decimal(&amount_s, "credit_payments")?,
            payment_method: r.get(3)?,
            notes: r.get(4)?,
        });
    }
    Ok(payments)
}

fn load_installments(conn: &Connection, sale_id: i64) -> Result<Vec<Installment>> {
    let mut stmt = conn.prepare(
        "SELECT id, due_date, amount, paid
         FROM installments WHERE credit_sale_id=?1 ORDER BY due_date, id",
    )?;
    let mut rows = stmt.query(params![sale_id])?;
    let mut installments = Vec::new();
    while let Some(r) = rows.next()? {
        let due_s: String = r.get(1)?;
        let amount_s: String = r.get(2)?;
        let paid: i64 = r.get(3)?;
        installments.push(Installment {
            id: r.get(0)?,
            due_date: parse_date(&due_s)?,
            amount: stored_decimal(&amount_s, "installments")?,
            paid: paid != 0,
        });
    }
    Ok(installments)
}

fn sale_from_row(conn: &Connection, r: &rusqlite::Row) -> Result<CreditSale> {
    let id: i64 = r.get(0)?;
    let price_s: String = r.get(7)?;
    let advance_s: String = r.get(8)?;
    let sale_date_s: String = r.get(9)?;
    let completion_s: Option<String> = r.get(10)?;
    Ok(CreditSale {
        id,
        vehicle_type: r.get(1)?,
        registration_number: r.get(2)?,
        customer_name: r.get(3)?,
        id_card_number: r.get(4)?,
        phone_number: r.get(5)?,
        address: r.get(6)?,
        selling_price: stored_decimal(&price_s, "credit_sales")?,
        advance_received: stored_decimal(&advance_s, "credit_sales")?,
        sale_date: parse_date(&sale_date_s)?,
        expected_completion_date: match completion_s {
            Some(s) => Some(parse_date(&s)?),
            None => None,
        },
        status: r.get(11)?,
        notes: r.get(12)?,
        payments: load_payments(conn, id)?,
        installments: load_installments(conn, id)?,
    })
}

const SALE_COLUMNS: &str = "id, vehicle_type, registration_number, customer_name, id_card_number,
        phone_number, address, selling_price, advance_received, sale_date,
        expected_completion_date, status, notes";

pub fn all_sales(conn: &Connection) -> Result<Vec<CreditSale>> {
    let sql = format!("SELECT {} FROM credit_sales ORDER BY sale_date, id", SALE_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    let mut sales = Vec::new();
    while let Some(r) = rows.next()? {
        sales.push(sale_from_row(conn, r)?);
    }
    Ok(sales)
}

pub fn sale_by_id(conn: &Connection, id: i64) -> Result<CreditSale> {
    let sql = format!("SELECT {} FROM credit_sales WHERE id=?1", SALE_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(r) => sale_from_row(conn, r),
        None => bail!("Credit sale #{} not found", id),
    }
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut sales = all_sales(conn)?;
    if let Some(status) = sub.get_one::<String>("status") {
        sales.retain(|s| s.status == *status);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &sales)? {
        let rows: Vec<Vec<String>> = sales
            .iter()
            .map(|s| {
                vec![
                    s.id.to_string(),
                    s.sale_date.to_string(),
                    s.customer_name.clone(),
                    format!("{} {}", s.vehicle_type, s.registration_number),
                    s.selling_price.to_string(),
                    s.total_paid().to_string(),
                    s.remaining().to_string(),
                    s.status.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Customer", "Vehicle", "Price", "Paid", "Remaining", "Status"],
                rows,
            )
        );
    }
    Ok(())
}

fn view(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let id = *sub.get_one::<i64>("id").unwrap();
    let sale = sale_by_id(conn, id)?;
    if maybe_print_json(json_flag, jsonl_flag, &sale)? {
        return Ok(());
    }

    println!(
        "Credit sale #{} — {} {} to {} ({})",
        sale.id, sale.vehicle_type, sale.registration_number, sale.customer_name, sale.status
    );
    println!(
        "{}",
        pretty_table(
            &["Price", "Advance", "Paid", "Remaining", "Sale Date", "Expected Completion"],
            vec![vec![
                sale.selling_price.to_string(),
                sale.advance_received.to_string(),
                sale.total_paid().to_string(),
                sale.remaining().to_string(),
                sale.sale_date.to_string(),
                sale.expected_completion_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
            ]],
        )
    );

    let pay_rows: Vec<Vec<String>> = sale
        .payments
        .iter()
        .map(|p| {
            vec![
                p.date.to_string(),
                p.amount.to_string(),
                p.payment_method.clone(),
                p.notes.clone().unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Payment Date", "Amount", "Method", "Notes"], pay_rows)
    );

    if !sale.installments.is_empty() {
        let inst_rows: Vec<Vec<String>> = sale
            .installments
            .iter()
            .map(|i| {
                vec![
                    i.id.to_string(),
                    i.due_date.to_string(),
                    i.amount.to_string(),
                    if i.paid { "paid" } else { "due" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Installment", "Due", "Amount", "Status"], inst_rows)
        );
    }
    Ok(())
}

fn pay(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let method = sub.get_one::<String>("method").unwrap();

    if amount <= Decimal::ZERO {
        bail!("Payment amount must be greater than 0");
    }
    // Payments may exceed the selling price; `doctor` flags that instead of
    // rejecting it here.
    let sale = sale_by_id(conn, id)?;
    conn.execute(
        "INSERT INTO credit_payments(credit_sale_id, date, amount, payment_method, notes)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            id,
            date.to_string(),
            amount.to_string(),
            method,
            sub.get_one::<String>("notes"),
        ],
    )?;
    println!(
        "Payment of {} recorded against sale #{} (remaining {})",
        amount,
        id,
        sale.remaining() - amount
    );
    Ok(())
}

fn schedule(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let first_due = parse_date(sub.get_one::<String>("first-due").unwrap())?;
    let months = *sub.get_one::<usize>("months").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;

    if months == 0 {
        bail!("Schedule needs at least one installment");
    }
    if amount <= Decimal::ZERO {
        bail!("Installment amount must be greater than 0");
    }
    sale_by_id(conn, id)?;

    for i in 0..months {
        let due = first_due
            .checked_add_months(Months::new(i as u32))
            .with_context(|| format!("Installment date out of range at month {}", i))?;
        conn.execute(
            "INSERT INTO installments(credit_sale_id, due_date, amount) VALUES (?1, ?2, ?3)",
            params![id, due.to_string(), amount.to_string()],
        )?;
    }
    println!(
        "Scheduled {} monthly installments of {} for sale #{} starting {}",
        months, amount, id, first_due
    );
    Ok(())
}

fn mark_paid(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let installment = *sub.get_one::<i64>("installment").unwrap();
    let n = conn.execute(
        "UPDATE installments SET paid=1 WHERE id=?1",
        params![installment],
    )?;
    if n == 0 {
        bail!("Installment #{} not found", installment);
    }
    println!("Installment #{} marked paid", installment);
    Ok(())
}

fn set_status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let status = sub.get_one::<String>("status").unwrap();
    if !STATUSES.contains(&status.as_str()) {
        bail!(
            "Unknown status '{}', expected one of: {}",
            status,
            STATUSES.join("|")
        );
    }
    let n = conn.execute(
        "UPDATE credit_sales SET status=?1 WHERE id=?2",
        params![status, id],
    )?;
    if n == 0 {
        bail!("Credit sale #{} not found", id);
    }
    println!("Credit sale #{} is now {}", id, status);
    Ok(())
}

fn totals(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let sales = all_sales(conn)?;
    let totals = aggregate::credit_sale_totals(&sales);
    if !maybe_print_json(json_flag, jsonl_flag, &totals)? {
        println!(
            "{}",
            pretty_table(
                &["Sales", "Completed", "Pending", "Total Price", "Paid", "Remaining"],
                vec![vec![
                    totals.total_sales.to_string(),
                    totals.completed_sales.to_string(),
                    totals.pending_sales.to_string(),
                    totals.total_selling_price.to_string(),
                    totals.total_paid.to_string(),
                    totals.total_remaining.to_string(),
                ]],
            )
        );
    }
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let n = conn.execute("DELETE FROM credit_sales WHERE id=?1", params![id])?;
    if n == 0 {
        bail!("Credit sale #{} not found", id);
    }
    println!("Deleted credit sale #{}", id);
    Ok(())
}
