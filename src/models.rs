// Copyright (c) 2025 Dealerbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a cashflow entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Flow {
    CashIn,
    CashOut,
}

impl Flow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flow::CashIn => "cash-in",
            Flow::CashOut => "cash-out",
        }
    }
}

impl std::str::FromStr for Flow {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash-in" => Ok(Flow::CashIn),
            "cash-out" => Ok(Flow::CashOut),
            other => Err(anyhow::anyhow!(
                "Invalid flow '{}', expected cash-in|cash-out",
                other
            )),
        }
    }
}

/// Cash locations money can sit in, as (slug, display name).
/// Entries with no location fall back to FALLBACK_LOCATION; slugs outside this
/// list land in no breakdown bucket (see `doctor`).
pub const CASH_LOCATIONS: &[(&str, &str)] = &[
    ("meezan", "Meezan Bank"),
    ("habib", "Bank Al-Habib"),
    ("punjab", "Punjab Bank"),
    ("mcb", "MCB Bank"),
    ("home", "Home"),
];

pub const FALLBACK_LOCATION: &str = "home";

pub const CASH_IN_CATEGORIES: &[&str] = &[
    "vehicle-sale",
    "commission",
    "advance-payment",
    "loan-repayment",
    "other",
];

pub const CASH_OUT_CATEGORIES: &[&str] = &[
    "vehicle-purchase",
    "repair",
    "salary",
    "rent",
    "utilities",
    "loan",
    "other",
];

pub const PAYMENT_METHODS: &[&str] = &["cash", "card", "bank-transfer", "check", "other"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashflowEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub flow: Flow,
    pub amount: Decimal,
    pub category: String,
    pub description: Option<String>,
    pub payment_method: String,
    pub payment_from: Option<String>,
    pub vehicle_id: Option<i64>,
    pub credit_sale_id: Option<i64>,
    pub notes: Option<String>,
    pub entry_made_by: String,
    pub added_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditSale {
    pub id: i64,
    pub vehicle_type: String,
    pub registration_number: String,
    pub customer_name: String,
    pub id_card_number: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub selling_price: Decimal,
    pub advance_received: Decimal,
    pub sale_date: NaiveDate,
    pub expected_completion_date: Option<NaiveDate>,
    pub status: String,
    pub notes: Option<String>,
    pub payments: Vec<CreditPayment>,
    pub installments: Vec<Installment>,
}

impl CreditSale {
    pub fn total_paid(&self) -> Decimal {
        self.payments.iter().map(|p| p.amount).sum()
    }

    pub fn remaining(&self) -> Decimal {
        self.selling_price - self.total_paid()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditPayment {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub payment_method: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installment {
    pub id: i64,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub paid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: i64,
    pub registration_number: String,
    pub engine_number: Option<String>,
    pub kind: String, // 'bought' | 'sold'
    pub holder_name: String,
    pub id_card_number: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub price: Decimal,
    pub commission_paid: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnershipRecord {
    pub id: i64,
    pub record_type: String, // 'initial' | 'update' | 'transfer'
    pub name: String,
    pub id_card_number: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub price: Option<Decimal>,
    pub commission_paid: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxnKind {
    Investment,
    Repayment,
}

impl TxnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxnKind::Investment => "investment",
            TxnKind::Repayment => "repayment",
        }
    }
}

impl std::str::FromStr for TxnKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "investment" => Ok(TxnKind::Investment),
            "repayment" => Ok(TxnKind::Repayment),
            other => Err(anyhow::anyhow!(
                "Invalid transaction kind '{}', expected investment|repayment",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Investor {
    pub id: i64,
    pub name: String,
    pub notes: Option<String>,
    pub transactions: Vec<InvestorTxn>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestorTxn {
    pub id: i64,
    pub date: NaiveDate,
    pub kind: TxnKind,
    pub amount: Decimal,
    pub notes: Option<String>,
}
