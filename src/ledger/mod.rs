// Copyright (c) 2025 Dealerbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure in-memory aggregation over fetched records: filtering, totals and
//! breakdowns, and display/export report bundles. Nothing in here touches the
//! database or the filesystem; commands fetch rows and hand them over.

pub mod aggregate;
pub mod filter;
pub mod report;
