// Copyright (c) 2025 Dealerbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::commands::credit;
use crate::models::CASH_LOCATIONS;
use crate::utils::pretty_table;

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = findings(conn)?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

/// Every integrity finding as an (issue, detail) pair.
pub fn findings(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) payment_from slugs outside the fixed location list: these amounts
    //    appear in no location bucket.
    let known: Vec<&str> = CASH_LOCATIONS.iter().map(|(slug, _)| *slug).collect();
    let mut stmt = conn.prepare(
        "SELECT DISTINCT payment_from FROM cashflows
         WHERE payment_from IS NOT NULL AND payment_from != ''",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let slug: String = r.get(0)?;
        if !known.contains(&slug.as_str()) {
            rows.push(vec!["unknown_payment_from".into(), slug]);
        }
    }

    // 2) Dangling references
    let mut stmt2 = conn.prepare(
        "SELECT id FROM cashflows
         WHERE vehicle_id IS NOT NULL AND vehicle_id NOT IN (SELECT id FROM vehicles)",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["dangling_vehicle_ref".into(), format!("cashflow #{}", id)]);
    }
    let mut stmt3 = conn.prepare(
        "SELECT id FROM cashflows
         WHERE credit_sale_id IS NOT NULL AND credit_sale_id NOT IN (SELECT id FROM credit_sales)",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["dangling_credit_ref".into(), format!("cashflow #{}", id)]);
    }

    // 3) Entries referencing both a vehicle and a credit sale
    let mut stmt4 = conn.prepare(
        "SELECT id FROM cashflows WHERE vehicle_id IS NOT NULL AND credit_sale_id IS NOT NULL",
    )?;
    let mut cur4 = stmt4.query([])?;
    while let Some(r) = cur4.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["double_reference".into(), format!("cashflow #{}", id)]);
    }

    // 4) Credit sales: overpayment, and installment/payment-history drift.
    //    Installments and ad-hoc payments are not reconciled against each
    //    other; report the drift, do not resolve it.
    for sale in credit::all_sales(conn)? {
        let paid = sale.total_paid();
        if paid > sale.selling_price {
            rows.push(vec![
                "overpaid_credit_sale".into(),
                format!("sale #{} paid {} of {}", sale.id, paid, sale.selling_price),
            ]);
        }
        let scheduled_paid: Decimal = sale
            .installments
            .iter()
            .filter(|i| i.paid)
            .map(|i| i.amount)
            .sum();
        if !sale.installments.is_empty() && scheduled_paid > paid {
            rows.push(vec![
                "installment_drift".into(),
                format!(
                    "sale #{} installments marked paid {} exceed payment history {}",
                    sale.id, scheduled_paid, paid
                ),
            ]);
        }
    }

    // 5) Ownership audit trail must start with exactly one initial record
    let mut stmt5 = conn.prepare(
        "SELECT v.registration_number,
                (SELECT COUNT(*) FROM ownership_history h
                 WHERE h.vehicle_id=v.id AND h.record_type='initial') AS initials
         FROM vehicles v",
    )?;
    let mut cur5 = stmt5.query([])?;
    while let Some(r) = cur5.next()? {
        let reg: String = r.get(0)?;
        let initials: i64 = r.get(1)?;
        if initials != 1 {
            rows.push(vec![
                "ownership_initial_count".into(),
                format!("{} has {} initial records", reg, initials),
            ]);
        }
    }

    Ok(rows)
}
