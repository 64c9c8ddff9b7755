// Copyright (c) 2025 Dealerbook Maintainers.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cashflow;
pub mod credit;
pub mod dashboard;
pub mod doctor;
pub mod investors;
pub mod vehicles;
