//! Bag bookkeeping: how many bags, which were bought, what they cost.
//!
//! The ledger feeds the hit-ratio and buyout-profit displays. The box store
//! owns the chase values; callers pass its unmarked total into
//! [`Ledger::buyout_profit`].

#[cfg(test)]
#[path = "ledger_test.rs"]
mod ledger_test;

use std::collections::BTreeSet;

use crate::consts::{DEFAULT_BAG_COUNT, DEFAULT_REMAINING_CHASES, MAX_BAG_COUNT, MIN_BAG_COUNT};

#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    bag_count: u32,
    selected: BTreeSet<u32>,
    chase_numbers: BTreeSet<u32>,
    remaining_chases: u32,
    bag_cost: f64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            bag_count: DEFAULT_BAG_COUNT,
            selected: BTreeSet::new(),
            chase_numbers: BTreeSet::new(),
            remaining_chases: DEFAULT_REMAINING_CHASES,
            bag_cost: 0.0,
        }
    }
}

impl Ledger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from stored values, clamping anything out of range.
    #[must_use]
    pub fn restored(
        bag_count: u32,
        selected: impl IntoIterator<Item = u32>,
        chase_numbers: impl IntoIterator<Item = u32>,
        remaining_chases: u32,
        bag_cost: f64,
    ) -> Self {
        let bag_count = bag_count.clamp(MIN_BAG_COUNT, MAX_BAG_COUNT);
        Self {
            bag_count,
            selected: selected.into_iter().filter(|n| (1..=bag_count).contains(n)).collect(),
            chase_numbers: chase_numbers.into_iter().collect(),
            remaining_chases,
            bag_cost: sanitize_cost(bag_cost),
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn bag_count(&self) -> u32 {
        self.bag_count
    }

    /// Selected bag numbers in ascending order.
    #[must_use]
    pub fn selected(&self) -> &BTreeSet<u32> {
        &self.selected
    }

    #[must_use]
    pub fn is_selected(&self, n: u32) -> bool {
        self.selected.contains(&n)
    }

    #[must_use]
    pub fn chase_numbers(&self) -> &BTreeSet<u32> {
        &self.chase_numbers
    }

    #[must_use]
    pub fn remaining_chases(&self) -> u32 {
        self.remaining_chases
    }

    #[must_use]
    pub fn bag_cost(&self) -> f64 {
        self.bag_cost
    }

    /// Bags not yet bought.
    #[must_use]
    pub fn remaining_bags(&self) -> u32 {
        let selected = u32::try_from(self.selected.len()).unwrap_or(u32::MAX);
        self.bag_count.saturating_sub(selected)
    }

    /// Chance that the next bag is a chase, as display text ("12.5%").
    #[must_use]
    pub fn hit_ratio(&self) -> String {
        let bags = self.remaining_bags();
        if bags == 0 {
            return "0%".to_owned();
        }
        let ratio = f64::from(self.remaining_chases) / f64::from(bags) * 100.0;
        format!("{ratio:.1}%")
    }

    /// No chases left while bags remain.
    #[must_use]
    pub fn is_cooked(&self) -> bool {
        self.remaining_chases == 0 && self.remaining_bags() > 0
    }

    /// Value of the unmarked boxes minus the cost of buying every remaining bag.
    #[must_use]
    pub fn buyout_profit(&self, unmarked_total: f64) -> f64 {
        unmarked_total - f64::from(self.remaining_bags()) * self.bag_cost
    }

    // --- Mutations ---

    /// Add `delta` to the bag count, clamped. Selections above the new count are dropped.
    ///
    /// Returns true if the count changed.
    pub fn change_bag_count(&mut self, delta: i32) -> bool {
        let next = i64::from(self.bag_count)
            .saturating_add(i64::from(delta))
            .clamp(i64::from(MIN_BAG_COUNT), i64::from(MAX_BAG_COUNT));
        let next = u32::try_from(next).unwrap_or(DEFAULT_BAG_COUNT);
        if next == self.bag_count {
            return false;
        }
        self.bag_count = next;
        self.selected.retain(|n| *n <= next);
        true
    }

    /// Flip the selection of bag `n`. Numbers outside `1..=bag_count` are ignored.
    pub fn toggle_number(&mut self, n: u32) -> bool {
        if !(1..=self.bag_count).contains(&n) {
            return false;
        }
        if !self.selected.remove(&n) {
            self.selected.insert(n);
        }
        true
    }

    /// Set the per-bag cost. Negative or non-finite input becomes zero.
    pub fn set_bag_cost(&mut self, cost: f64) -> bool {
        let cost = sanitize_cost(cost);
        if cost == self.bag_cost {
            return false;
        }
        self.bag_cost = cost;
        true
    }

    pub fn set_remaining_chases(&mut self, n: u32) -> bool {
        if n == self.remaining_chases {
            return false;
        }
        self.remaining_chases = n;
        true
    }
}

fn sanitize_cost(cost: f64) -> f64 {
    if cost.is_finite() && cost > 0.0 { cost } else { 0.0 }
}
