// Copyright (c) 2025 Dealerbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

use crate::ledger::aggregate;
use crate::models::{Investor, InvestorTxn, TxnKind};
use crate::utils::{
    id_for_investor, maybe_print_json, parse_date, parse_decimal, pretty_table, stored_decimal,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("view", sub)) => view(conn, sub)?,
        Some(("invest", sub)) => append_txn(conn, sub, TxnKind::Investment)?,
        Some(("repay", sub)) => append_txn(conn, sub, TxnKind::Repayment)?,
        Some(("tx-rm", sub)) => tx_rm(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    conn.execute(
        "INSERT INTO investors(name, notes) VALUES (?1, ?2)",
        params![name, sub.get_one::<String>("notes")],
    )?;
    println!("Registered investor '{}'", name);
    Ok(())
}

fn load_transactions(conn: &Connection, investor_id: i64) -> Result<Vec<InvestorTxn>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, kind, amount, notes
         FROM investor_transactions WHERE investor_id=?1 ORDER BY date, id",
    )?;
    let mut rows = stmt.query(params![investor_id])?;
    let mut txns = Vec::new();
    while let Some(r) = rows.next()? {
        let date_s: String = r.get(1)?;
        let kind_s: String = r.get(2)?;
        let amount_s: String = r.get(3)?;
        txns.push(InvestorTxn {
            id: r.get(0)?,
            date: parse_date(&date_s)?,
            kind: kind_s.parse()?,
            amount: stored_decimal(&amount_s, "investor_transactions")?,
            notes: r.get(4)?,
        });
    }
    Ok(txns)
}

pub fn all_investors(conn: &Connection) -> Result<Vec<Investor>> {
    let mut stmt = conn.prepare("SELECT id, name, notes FROM investors ORDER BY name")?;
    let mut rows = stmt.query([])?;
    let mut investors = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        investors.push(Investor {
            id,
            name: r.get(1)?,
            notes: r.get(2)?,
            transactions: load_transactions(conn, id)?,
        });
    }
    Ok(investors)
}

pub fn investor_by_name(conn: &Connection, name: &str) -> Result<Investor> {
    let id = id_for_investor(conn, name)?;
    let mut stmt = conn.prepare("SELECT id, name, notes FROM investors WHERE id=?1")?;
    let (id, name, notes) = stmt.query_row(params![id], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, Option<String>>(2)?,
        ))
    })?;
    Ok(Investor {
        id,
        name,
        notes,
        transactions: load_transactions(conn, id)?,
    })
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let investors = all_investors(conn)?;
    if maybe_print_json(json_flag, jsonl_flag, &investors)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = investors
        .iter()
        .map(|inv| {
            vec![
                inv.name.clone(),
                inv.transactions.len().to_string(),
                aggregate::investor_balance(&inv.transactions).to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Investor", "Transactions", "Balance"], rows)
    );
    let totals = aggregate::investment_totals(&investors);
    println!(
        "{}",
        pretty_table(
            &["Investors", "Invested", "Repaid", "Net"],
            vec![vec![
                totals.total_investors.to_string(),
                totals.total_investment.to_string(),
                totals.total_repayment.to_string(),
                totals.net_investment.to_string(),
            ]],
        )
    );
    Ok(())
}

fn view(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let name = sub.get_one::<String>("name").unwrap();
    let investor = investor_by_name(conn, name)?;
    if maybe_print_json(json_flag, jsonl_flag, &investor)? {
        return Ok(());
    }
    println!(
        "Investor '{}' — balance {}",
        investor.name,
        aggregate::investor_balance(&investor.transactions)
    );
    let rows: Vec<Vec<String>> = investor
        .transactions
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.date.to_string(),
                t.kind.as_str().to_string(),
                t.amount.to_string(),
                t.notes.clone().unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Date", "Kind", "Amount", "Notes"], rows)
    );
    Ok(())
}

fn append_txn(conn: &Connection, sub: &clap::ArgMatches, kind: TxnKind) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    if amount <= Decimal::ZERO {
        bail!("Amount must be greater than 0");
    }
    let investor_id = id_for_investor(conn, name)?;
    conn.execute(
        "INSERT INTO investor_transactions(investor_id, date, kind, amount, notes)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            investor_id,
            date.to_string(),
            kind.as_str(),
            amount.to_string(),
            sub.get_one::<String>("notes"),
        ],
    )?;
    let investor = investor_by_name(conn, name)?;
    println!(
        "Recorded {} of {} for '{}' (balance {})",
        kind.as_str(),
        amount,
        name,
        aggregate::investor_balance(&investor.transactions)
    );
    Ok(())
}

fn tx_rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let n = conn.execute("DELETE FROM investor_transactions WHERE id=?1", params![id])?;
    if n == 0 {
        bail!("Investor transaction #{} not found", id);
    }
    println!("Deleted investor transaction #{}", id);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let n = conn.execute("DELETE FROM investors WHERE name=?1", params![name])?;
    if n == 0 {
        bail!("Investor '{}' not found", name);
    }
    println!("Removed investor '{}'", name);
    Ok(())
}
