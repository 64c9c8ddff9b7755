// Copyright (c) 2025 Dealerbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.dealerbook", "Dealerbook", "dealerbook"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("dealerbook.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS vehicles(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        registration_number TEXT NOT NULL UNIQUE,
        engine_number TEXT,
        kind TEXT NOT NULL CHECK(kind IN ('bought','sold')),
        holder_name TEXT NOT NULL,
        id_card_number TEXT,
        phone_number TEXT,
        address TEXT,
        price TEXT NOT NULL,
        commission_paid TEXT NOT NULL DEFAULT '0',
        notes TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS ownership_history(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        vehicle_id INTEGER NOT NULL,
        record_type TEXT NOT NULL CHECK(record_type IN ('initial','update','transfer')),
        name TEXT NOT NULL,
        id_card_number TEXT,
        phone_number TEXT,
        address TEXT,
        price TEXT,
        commission_paid TEXT,
        notes TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(vehicle_id) REFERENCES vehicles(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_ownership_vehicle ON ownership_history(vehicle_id);

    CREATE TABLE IF NOT EXISTS credit_sales(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        vehicle_type TEXT NOT NULL,
        registration_number TEXT NOT NULL,
        customer_name TEXT NOT NULL,
        id_card_number TEXT,
        phone_number TEXT,
        address TEXT,
        selling_price TEXT NOT NULL,
        advance_received TEXT NOT NULL DEFAULT '0',
        sale_date TEXT NOT NULL,
        expected_completion_date TEXT,
        status TEXT NOT NULL DEFAULT 'pending' CHECK(status IN ('pending','completed','cancelled')),
        notes TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS credit_payments(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        credit_sale_id INTEGER NOT NULL,
        date TEXT NOT NULL,
        amount TEXT NOT NULL,
        payment_method TEXT NOT NULL DEFAULT 'cash',
        notes TEXT,
        FOREIGN KEY(credit_sale_id) REFERENCES credit_sales(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_credit_payments_sale ON credit_payments(credit_sale_id);

    CREATE TABLE IF NOT EXISTS installments(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        credit_sale_id INTEGER NOT NULL,
        due_date TEXT NOT NULL,
        amount TEXT NOT NULL,
        paid INTEGER NOT NULL DEFAULT 0,
        FOREIGN KEY(credit_sale_id) REFERENCES credit_sales(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_installments_sale ON installments(credit_sale_id);

    CREATE TABLE IF NOT EXISTS cashflows(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        flow TEXT NOT NULL CHECK(flow IN ('cash-in','cash-out')),
        amount TEXT NOT NULL,
        category TEXT NOT NULL,
        description TEXT,
        payment_method TEXT NOT NULL DEFAULT 'cash',
        payment_from TEXT,
        vehicle_id INTEGER,
        credit_sale_id INTEGER,
        notes TEXT,
        entry_made_by TEXT NOT NULL,
        added_by TEXT NOT NULL DEFAULT 'system',
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(vehicle_id) REFERENCES vehicles(id) ON DELETE SET NULL,
        FOREIGN KEY(credit_sale_id) REFERENCES credit_sales(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_cashflows_date ON cashflows(date);

    CREATE TABLE IF NOT EXISTS investors(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        notes TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS investor_transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        investor_id INTEGER NOT NULL,
        date TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('investment','repayment')),
        amount TEXT NOT NULL,
        notes TEXT,
        FOREIGN KEY(investor_id) REFERENCES investors(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_investor_txns_investor ON investor_transactions(investor_id);
    "#,
    )?;
    Ok(())
}
