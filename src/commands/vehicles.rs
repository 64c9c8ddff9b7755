// Copyright (c) 2025 Dealerbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

use crate::ledger::aggregate;
use crate::models::{OwnershipRecord, Vehicle};
use crate::utils::{
    id_for_vehicle, maybe_print_json, parse_decimal, pretty_table, stored_decimal,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("search", sub)) => search(conn, sub)?,
        Some(("update", sub)) => update(conn, sub)?,
        Some(("transfer", sub)) => transfer(conn, sub)?,
        Some(("history", sub)) => history(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let reg = sub.get_one::<String>("reg").unwrap();
    let kind = sub.get_one::<String>("kind").unwrap();
    let name = sub.get_one::<String>("name").unwrap();
    let price = parse_decimal(sub.get_one::<String>("price").unwrap())?;
    let commission = parse_decimal(sub.get_one::<String>("commission").unwrap())?;

    if !["bought", "sold"].contains(&kind.as_str()) {
        bail!("Unknown kind '{}', expected bought|sold", kind);
    }
    if price <= Decimal::ZERO {
        bail!("Price must be greater than 0");
    }

    conn.execute(
        "INSERT INTO vehicles(registration_number, engine_number, kind, holder_name, id_card_number,
                              phone_number, address, price, commission_paid, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            reg,
            sub.get_one::<String>("engine"),
            kind,
            name,
            sub.get_one::<String>("id-card"),
            sub.get_one::<String>("phone"),
            sub.get_one::<String>("address"),
            price.to_string(),
            commission.to_string(),
            sub.get_one::<String>("notes"),
        ],
    )?;
    let vehicle_id = conn.last_insert_rowid();

    // The audit trail starts with exactly one initial record.
    conn.execute(
        "INSERT INTO ownership_history(vehicle_id, record_type, name, id_card_number, phone_number,
                                       address, price, commission_paid, notes)
         VALUES (?1, 'initial', ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            vehicle_id,
            name,
            sub.get_one::<String>("id-card"),
            sub.get_one::<String>("phone"),
            sub.get_one::<String>("address"),
            price.to_string(),
            commission.to_string(),
            sub.get_one::<String>("notes"),
        ],
    )?;
    println!("Added vehicle {} ({} for {})", reg, kind, price);
    Ok(())
}

fn vehicle_from_row(r: &rusqlite::Row) -> Result<Vehicle> {
    let price_s: String = r.get(8)?;
    let commission_s: String = r.get(9)?;
    Ok(Vehicle {
        id: r.get(0)?,
        registration_number: r.get(1)?,
        engine_number: r.get(2)?,
        kind: r.get(3)?,
        holder_name: r.get(4)?,
        id_card_number: r.get(5)?,
        phone_number: r.get(6)?,
        address: r.get(7)?,
        price: stored_decimal(&price_s, "vehicles")?,
        commission_paid: stored_decimal(&commission_s, "vehicles")?,
        notes: r.get(10)?,
    })
}

const VEHICLE_COLUMNS: &str = "id, registration_number, engine_number, kind, holder_name,
        id_card_number, phone_number, address, price, commission_paid, notes";

pub fn all_vehicles(conn: &Connection) -> Result<Vec<Vehicle>> {
    let sql = format!("SELECT {} FROM vehicles ORDER BY registration_number", VEHICLE_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    let mut vehicles = Vec::new();
    while let Some(r) = rows.next()? {
        vehicles.push(vehicle_from_row(r)?);
    }
    Ok(vehicles)
}

pub fn vehicle_by_reg(conn: &Connection, reg: &str) -> Result<Vehicle> {
    let sql = format!("SELECT {} FROM vehicles WHERE registration_number=?1", VEHICLE_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![reg])?;
    match rows.next()? {
        Some(r) => vehicle_from_row(r),
        None => bail!("Vehicle '{}' not found", reg),
    }
}

fn vehicle_rows(vehicles: &[Vehicle]) -> Vec<Vec<String>> {
    vehicles
        .iter()
        .map(|v| {
            vec![
                v.registration_number.clone(),
                v.kind.clone(),
                v.holder_name.clone(),
                v.phone_number.clone().unwrap_or_default(),
                v.price.to_string(),
                v.commission_paid.to_string(),
            ]
        })
        .collect()
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut vehicles = all_vehicles(conn)?;
    if let Some(kind) = sub.get_one::<String>("kind") {
        vehicles.retain(|v| v.kind == *kind);
    }
    if maybe_print_json(json_flag, jsonl_flag, &vehicles)? {
        return Ok(());
    }
    println!(
        "{}",
        pretty_table(
            &["Registration", "Kind", "Holder", "Phone", "Price", "Commission"],
            vehicle_rows(&vehicles),
        )
    );
    let totals = aggregate::inventory_totals(&vehicles);
    println!(
        "{}",
        pretty_table(
            &["Vehicles", "Bought", "Sold", "Bought Value", "Sold Value", "Net"],
            vec![vec![
                totals.total_vehicles.to_string(),
                totals.bought_count.to_string(),
                totals.sold_count.to_string(),
                totals.total_bought_value.to_string(),
                totals.total_sold_value.to_string(),
                totals.net_value.to_string(),
            ]],
        )
    );
    Ok(())
}

fn search(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let query = sub.get_one::<String>("query").unwrap();
    let pattern = format!("%{}%", query);
    let sql = format!(
        "SELECT {} FROM vehicles
         WHERE registration_number LIKE ?1 OR id_card_number LIKE ?1
            OR holder_name LIKE ?1 OR phone_number LIKE ?1
         ORDER BY registration_number",
        VEHICLE_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![pattern])?;
    let mut vehicles = Vec::new();
    while let Some(r) = rows.next()? {
        vehicles.push(vehicle_from_row(r)?);
    }
    if vehicles.is_empty() {
        bail!("No vehicles match '{}'", query);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &vehicles)? {
        println!(
            "{}",
            pretty_table(
                &["Registration", "Kind", "Holder", "Phone", "Price", "Commission"],
                vehicle_rows(&vehicles),
            )
        );
    }
    Ok(())
}

struct HolderChange {
    name: Option<String>,
    id_card: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    price: Option<Decimal>,
    commission: Option<Decimal>,
    notes: Option<String>,
}

impl HolderChange {
    fn from_args(sub: &clap::ArgMatches) -> Result<Self> {
        Ok(HolderChange {
            name: sub.get_one::<String>("name").cloned(),
            id_card: sub.get_one::<String>("id-card").cloned(),
            phone: sub.get_one::<String>("phone").cloned(),
            address: sub.get_one::<String>("address").cloned(),
            price: match sub.get_one::<String>("price") {
                Some(p) => Some(parse_decimal(p)?),
                None => None,
            },
            commission: match sub.get_one::<String>("commission") {
                Some(c) => Some(parse_decimal(c)?),
                None => None,
            },
            notes: sub.get_one::<String>("notes").cloned(),
        })
    }
}

/// Apply a holder change on top of the stored vehicle and append the audit
/// record reflecting the new current state.
fn apply_change(
    conn: &Connection,
    reg: &str,
    change: HolderChange,
    record_type: &str,
    new_kind: Option<&str>,
) -> Result<()> {
    let current = vehicle_by_reg(conn, reg)?;
    let name = change.name.unwrap_or(current.holder_name);
    let id_card = change.id_card.or(current.id_card_number);
    let phone = change.phone.or(current.phone_number);
    let address = change.address.or(current.address);
    let price = change.price.unwrap_or(current.price);
    let commission = change.commission.unwrap_or(current.commission_paid);
    let kind = new_kind.unwrap_or(current.kind.as_str());

    conn.execute(
        "UPDATE vehicles SET holder_name=?1, id_card_number=?2, phone_number=?3, address=?4,
                             price=?5, commission_paid=?6, kind=?7
         WHERE id=?8",
        params![
            name,
            id_card,
            phone,
            address,
            price.to_string(),
            commission.to_string(),
            kind,
            current.id
        ],
    )?;
    conn.execute(
        "INSERT INTO ownership_history(vehicle_id, record_type, name, id_card_number, phone_number,
                                       address, price, commission_paid, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            current.id,
            record_type,
            name,
            id_card,
            phone,
            address,
            price.to_string(),
            commission.to_string(),
            change.notes
        ],
    )?;
    Ok(())
}

fn update(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let reg = sub.get_one::<String>("reg").unwrap();
    let change = HolderChange::from_args(sub)?;
    apply_change(conn, reg, change, "update", None)?;
    println!("Updated vehicle {}", reg);
    Ok(())
}

fn transfer(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let reg = sub.get_one::<String>("reg").unwrap();
    let change = HolderChange::from_args(sub)?;
    apply_change(conn, reg, change, "transfer", Some("sold"))?;
    println!("Transferred vehicle {} to new holder", reg);
    Ok(())
}

pub fn history_for(conn: &Connection, reg: &str) -> Result<Vec<OwnershipRecord>> {
    let vehicle_id = id_for_vehicle(conn, reg)?;
    let mut stmt = conn.prepare(
        "SELECT id, record_type, name, id_card_number, phone_number, address,
                price, commission_paid, notes, created_at
         FROM ownership_history WHERE vehicle_id=?1 ORDER BY created_at, id",
    )?;
    let mut rows = stmt.query(params![vehicle_id])?;
    let mut records = Vec::new();
    while let Some(r) = rows.next()? {
        let price_s: Option<String> = r.get(6)?;
        let commission_s: Option<String> = r.get(7)?;
        records.push(OwnershipRecord {
            id: r.get(0)?,
            record_type: r.get(1)?,
            name: r.get(2)?,
            id_card_number: r.get(3)?,
            phone_number: r.get(4)?,
            address: r.get(5)?,
            price: match price_s {
                Some(s) => Some(stored_decimal(&s, "ownership_history")?),
                None => None,
            },
            commission_paid: match commission_s {
                Some(s) => Some(stored_decimal(&s, "ownership_history")?),
                None => None,
            },
            notes: r.get(8)?,
            created_at: r.get(9)?,
        });
    }
    Ok(records)
}

fn history(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let reg = sub.get_one::<String>("reg").unwrap();
    let records = history_for(conn, reg)?;
    if !maybe_print_json(json_flag, jsonl_flag, &records)? {
        let rows: Vec<Vec<String>> = records
            .iter()
            .map(|rec| {
                vec![
                    rec.record_type.clone(),
                    rec.name.clone(),
                    rec.phone_number.clone().unwrap_or_default(),
                    rec.price.map(|p| p.to_string()).unwrap_or_default(),
                    rec.commission_paid.map(|c| c.to_string()).unwrap_or_default(),
                    rec.created_at.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Record", "Name", "Phone", "Price", "Commission", "Date"],
                rows,
            )
        );
    }
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let reg = sub.get_one::<String>("reg").unwrap();
    let n = conn.execute(
        "DELETE FROM vehicles WHERE registration_number=?1",
        params![reg],
    )?;
    if n == 0 {
        bail!("Vehicle '{}' not found", reg);
    }
    println!("Removed vehicle '{}'", reg);
    Ok(())
}
