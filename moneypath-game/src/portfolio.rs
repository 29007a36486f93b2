//! Portfolio buckets and the once-a-year return accrual.

use serde::{Deserialize, Serialize};

use crate::budget::InvestAllocation;

/// Fixed annual growth rates per instrument. Cash never accrues.
///
/// Growth is applied once per completed year of elapsed months as a single
/// `1 + rate` multiplication. This is a deliberate annual-compounding
/// approximation of the underlying instruments, not monthly compounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub fd: f64,
    pub sip: f64,
    pub index_fund: f64,
    pub gold: f64,
}

impl RateTable {
    pub(crate) const fn rates(&self) -> [(&'static str, f64); 4] {
        [
            ("fd", self.fd),
            ("sip", self.sip),
            ("index_fund", self.index_fund),
            ("gold", self.gold),
        ]
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            fd: 0.05,
            sip: 0.08,
            index_fund: 0.10,
            gold: 0.06,
        }
    }
}

/// Mutable balances owned by one running session. Created zeroed, reset on
/// replay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Portfolio {
    pub cash: f64,
    pub fd: f64,
    pub sip: f64,
    pub index_fund: f64,
    pub gold: f64,
}

impl Portfolio {
    /// Sum of every bucket, cash included.
    #[must_use]
    pub fn net_worth(&self) -> f64 {
        self.cash + self.fd + self.sip + self.index_fund + self.gold
    }

    /// Sum of the growth-bearing buckets.
    #[must_use]
    pub fn invested_total(&self) -> f64 {
        self.fd + self.sip + self.index_fund + self.gold
    }

    /// Credit one month's investment allocations; the undecided leftover is
    /// routed into cash rather than vanishing.
    pub fn apply_contributions(&mut self, alloc: &InvestAllocation, leftover: f64) {
        self.cash += f64::from(alloc.cash) + leftover;
        self.fd += f64::from(alloc.fd);
        self.sip += f64::from(alloc.sip);
        self.index_fund += f64::from(alloc.index_fund);
        self.gold += f64::from(alloc.gold);
    }

    /// Multiply each non-cash bucket by `1 + rate` for one elapsed year.
    pub fn apply_annual_growth(&mut self, rates: &RateTable) {
        self.fd *= 1.0 + rates.fd;
        self.sip *= 1.0 + rates.sip;
        self.index_fund *= 1.0 + rates.index_fund;
        self.gold *= 1.0 + rates.gold;
    }

    /// Apply a life event's signed cash impact, flooring stored cash at zero.
    /// Returns true when the pre-floor balance would have gone negative, so
    /// the caller can count the month against the player.
    pub fn apply_event_impact(&mut self, impact: i32) -> bool {
        let raw = self.cash + f64::from(impact);
        let went_negative = raw < 0.0;
        self.cash = raw.max(0.0);
        went_negative
    }
}
