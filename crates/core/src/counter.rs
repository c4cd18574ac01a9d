// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stock counter record

use serde::{Deserialize, Serialize};
use std::fmt;

/// Database id of a counter row
pub type CounterId = i64;

/// A named, non-negative stock quantity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    pub id: CounterId,
    pub name: String,
    pub stock: i64,
}

impl Counter {
    pub fn new(id: CounterId, name: impl Into<String>, stock: i64) -> Self {
        Self {
            id,
            name: name.into(),
            stock,
        }
    }

    /// Stock left after taking `quantity`.
    ///
    /// `None` if there is not enough, or if `quantity` is not positive.
    pub fn stock_after(&self, quantity: i64) -> Option<i64> {
        if quantity < 1 || quantity > self.stock {
            return None;
        }
        self.stock.checked_sub(quantity)
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} (stock: {})", self.id, self.name, self.stock)
    }
}

/// Distributed-lock key guarding a counter
pub fn resource_key(id: CounterId) -> String {
    format!("product:{}:lock", id)
}
