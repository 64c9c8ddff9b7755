// Copyright (c) 2025 Dealerbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{
    CashflowEntry, CreditSale, Flow, Investor, InvestorTxn, TxnKind, Vehicle, CASH_LOCATIONS,
    FALLBACK_LOCATION,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub cash_in: Decimal,
    pub cash_out: Decimal,
    pub net_balance: Decimal,
}

/// Total cash in, cash out, and net over a set of entries. Empty input yields
/// an all-zero summary.
pub fn summarize(entries: &[CashflowEntry]) -> Summary {
    let mut cash_in = Decimal::ZERO;
    let mut cash_out = Decimal::ZERO;
    for e in entries {
        match e.flow {
            Flow::CashIn => cash_in += e.amount,
            Flow::CashOut => cash_out += e.amount,
        }
    }
    Summary {
        cash_in,
        cash_out,
        net_balance: cash_in - cash_out,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total_in: Decimal,
    pub total_out: Decimal,
    pub net: Decimal,
}

/// Per-category in/out/net totals, sorted descending by |net|. The sort is
/// stable, so categories with equal |net| keep first-seen order. Entries with
/// an empty category are excluded.
pub fn category_breakdown(entries: &[CashflowEntry]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for e in entries {
        if e.category.is_empty() {
            continue;
        }
        let pos = match totals.iter().position(|t| t.category == e.category) {
            Some(p) => p,
            None => {
                totals.push(CategoryTotal {
                    category: e.category.clone(),
                    total_in: Decimal::ZERO,
                    total_out: Decimal::ZERO,
                    net: Decimal::ZERO,
                });
                totals.len() - 1
            }
        };
        match e.flow {
            Flow::CashIn => totals[pos].total_in += e.amount,
            Flow::CashOut => totals[pos].total_out += e.amount,
        }
    }
    for t in &mut totals {
        t.net = t.total_in - t.total_out;
    }
    totals.sort_by(|a, b| b.net.abs().cmp(&a.net.abs()));
    totals
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationTotal {
    pub location: String,
    pub label: String,
    pub cash_in: Decimal,
    pub cash_out: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationBreakdown {
    pub rows: Vec<LocationTotal>,
    pub total_in: Decimal,
    pub total_out: Decimal,
    pub balance: Decimal,
}

/// In/out totals per cash location, over the fixed location list in list
/// order. Entries with no location count against the fallback location;
/// entries with a slug outside the list land in no bucket (`doctor` reports
/// such slugs).
pub fn location_breakdown(entries: &[CashflowEntry]) -> LocationBreakdown {
    let mut rows: Vec<LocationTotal> = CASH_LOCATIONS
        .iter()
        .map(|(slug, label)| LocationTotal {
            location: (*slug).to_string(),
            label: (*label).to_string(),
            cash_in: Decimal::ZERO,
            cash_out: Decimal::ZERO,
            balance: Decimal::ZERO,
        })
        .collect();

    for e in entries {
        let slug = e
            .payment_from
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(FALLBACK_LOCATION);
        if let Some(row) = rows.iter_mut().find(|r| r.location == slug) {
            match e.flow {
                Flow::CashIn => row.cash_in += e.amount,
                Flow::CashOut => row.cash_out += e.amount,
            }
        }
    }

    let mut total_in = Decimal::ZERO;
    let mut total_out = Decimal::ZERO;
    for row in &mut rows {
        row.balance = row.cash_in - row.cash_out;
        total_in += row.cash_in;
        total_out += row.cash_out;
    }
    LocationBreakdown {
        rows,
        total_in,
        total_out,
        balance: total_in - total_out,
    }
}

/// Running balance of one investor: investments add, repayments subtract.
/// Positive means the business owes the investor.
pub fn investor_balance(transactions: &[InvestorTxn]) -> Decimal {
    let mut balance = Decimal::ZERO;
    for t in transactions {
        match t.kind {
            TxnKind::Investment => balance += t.amount,
            TxnKind::Repayment => balance -= t.amount,
        }
    }
    balance
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvestmentTotals {
    pub total_investors: usize,
    pub total_investment: Decimal,
    pub total_repayment: Decimal,
    pub net_investment: Decimal,
}

pub fn investment_totals(investors: &[Investor]) -> InvestmentTotals {
    let mut total_investment = Decimal::ZERO;
    let mut total_repayment = Decimal::ZERO;
    for inv in investors {
        for t in &inv.transactions {
            match t.kind {
                TxnKind::Investment => total_investment += t.amount,
                TxnKind::Repayment => total_repayment += t.amount,
            }
        }
    }
    InvestmentTotals {
        total_investors: investors.len(),
        total_investment,
        total_repayment,
        net_investment: total_investment - total_repayment,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreditSaleTotals {
    pub total_selling_price: Decimal,
    pub total_paid: Decimal,
    pub total_remaining: Decimal,
    pub total_sales: usize,
    pub completed_sales: usize,
    pub pending_sales: usize,
}

/// Aggregate position across all credit sales. Statuses other than
/// completed/pending (i.e. cancelled) are counted in neither bucket.
pub fn credit_sale_totals(sales: &[CreditSale]) -> CreditSaleTotals {
    let mut totals = CreditSaleTotals {
        total_selling_price: Decimal::ZERO,
        total_paid: Decimal::ZERO,
        total_remaining: Decimal::ZERO,
        total_sales: sales.len(),
        completed_sales: 0,
        pending_sales: 0,
    };
    for sale in sales {
        let paid = sale.total_paid();
        totals.total_selling_price += sale.selling_price;
        totals.total_paid += paid;
        totals.total_remaining += sale.selling_price - paid;
        match sale.status.as_str() {
            "completed" => totals.completed_sales += 1,
            "pending" => totals.pending_sales += 1,
            _ => {}
        }
    }
    totals
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryTotals {
    pub total_vehicles: usize,
    pub bought_count: usize,
    pub sold_count: usize,
    pub total_bought_value: Decimal,
    pub total_sold_value: Decimal,
    pub net_value: Decimal,
}

pub fn inventory_totals(vehicles: &[Vehicle]) -> InventoryTotals {
    let mut totals = InventoryTotals {
        total_vehicles: vehicles.len(),
        bought_count: 0,
        sold_count: 0,
        total_bought_value: Decimal::ZERO,
        total_sold_value: Decimal::ZERO,
        net_value: Decimal::ZERO,
    };
    for v in vehicles {
        match v.kind.as_str() {
            "bought" => {
                totals.bought_count += 1;
                totals.total_bought_value += v.price;
            }
            "sold" => {
                totals.sold_count += 1;
                totals.total_sold_value += v.price;
            }
            _ => {}
        }
    }
    totals.net_value = totals.total_sold_value - totals.total_bought_value;
    totals
}
