// Copyright (c) 2025 Dealerbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{CashflowEntry, Flow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowFilter {
    #[default]
    All,
    CashIn,
    CashOut,
}

impl FlowFilter {
    pub fn matches(&self, flow: Flow) -> bool {
        match self {
            FlowFilter::All => true,
            FlowFilter::CashIn => flow == Flow::CashIn,
            FlowFilter::CashOut => flow == Flow::CashOut,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowFilter::All => "all",
            FlowFilter::CashIn => "cash-in",
            FlowFilter::CashOut => "cash-out",
        }
    }
}

impl std::str::FromStr for FlowFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(FlowFilter::All),
            "cash-in" => Ok(FlowFilter::CashIn),
            "cash-out" => Ok(FlowFilter::CashOut),
            other => Err(anyhow::anyhow!(
                "Invalid type '{}', expected all|cash-in|cash-out",
                other
            )),
        }
    }
}

/// Criteria for narrowing a fetched entry list. Absent fields (and
/// `FlowFilter::All` / an empty category) impose no constraint.
#[derive(Debug, Clone, Default)]
pub struct Criteria {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub flow: FlowFilter,
    pub category: Option<String>,
}

/// Returns the subsequence of `entries` matching all active criteria,
/// preserving input order. The date range is inclusive on both ends.
pub fn apply(entries: &[CashflowEntry], criteria: &Criteria) -> Vec<CashflowEntry> {
    entries
        .iter()
        .filter(|e| matches(e, criteria))
        .cloned()
        .collect()
}

fn matches(entry: &CashflowEntry, criteria: &Criteria) -> bool {
    if let Some(start) = criteria.start {
        if entry.date < start {
            return false;
        }
    }
    if let Some(end) = criteria.end {
        if entry.date > end {
            return false;
        }
    }
    if !criteria.flow.matches(entry.flow) {
        return false;
    }
    if let Some(cat) = criteria.category.as_deref() {
        if !cat.is_empty() && entry.category != cat {
            return false;
        }
    }
    true
}
