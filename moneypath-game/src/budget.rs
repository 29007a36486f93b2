//! Monthly budget inputs: fixed needs, discretionary wants, and the
//! allocation check gating every month lock.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::streams::Stream;

/// Non-negotiable monthly costs, deducted from salary before any decision.
///
/// A process-wide constant table in practice; carried in config so data-driven
/// variants can re-cost the fixed basket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedExpenses {
    pub rent: u32,
    pub food: u32,
    pub transport: u32,
    pub phone: u32,
}

impl FixedExpenses {
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.rent + self.food + self.transport + self.phone
    }
}

impl Default for FixedExpenses {
    fn default() -> Self {
        Self {
            rent: 700,
            food: 400,
            transport: 200,
            phone: 150,
        }
    }
}

/// Discretionary spending amounts for one month, per want category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WantAllocation {
    #[serde(default)]
    pub eating_out: u32,
    #[serde(default)]
    pub shopping: u32,
    #[serde(default)]
    pub subscriptions: u32,
    #[serde(default)]
    pub entertainment: u32,
}

impl WantAllocation {
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.eating_out + self.shopping + self.subscriptions + self.entertainment
    }
}

/// Savings and investment amounts for one month, per instrument bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InvestAllocation {
    #[serde(default)]
    pub cash: u32,
    #[serde(default)]
    pub fd: u32,
    #[serde(default)]
    pub sip: u32,
    #[serde(default)]
    pub index_fund: u32,
    #[serde(default)]
    pub gold: u32,
}

impl InvestAllocation {
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.cash + self.fd + self.sip + self.index_fund + self.gold
    }
}

/// The player's full decision for a single month. Consumed and reset every
/// month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MonthlyDecision {
    #[serde(default)]
    pub wants: WantAllocation,
    #[serde(default)]
    pub investments: InvestAllocation,
}

impl MonthlyDecision {
    #[must_use]
    pub const fn wants_total(&self) -> u32 {
        self.wants.total()
    }

    #[must_use]
    pub const fn invest_total(&self) -> u32 {
        self.investments.total()
    }
}

/// Per-category input maxima surfaced to UI sliders. The engine itself only
/// enforces the over-allocation invariant, not these caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionLimits {
    pub wants: WantAllocation,
    pub investments: InvestAllocation,
}

impl DecisionLimits {
    /// Whether every category in `decision` sits at or below its cap.
    #[must_use]
    pub const fn allows(&self, decision: &MonthlyDecision) -> bool {
        decision.wants.eating_out <= self.wants.eating_out
            && decision.wants.shopping <= self.wants.shopping
            && decision.wants.subscriptions <= self.wants.subscriptions
            && decision.wants.entertainment <= self.wants.entertainment
            && decision.investments.cash <= self.investments.cash
            && decision.investments.fd <= self.investments.fd
            && decision.investments.sip <= self.investments.sip
            && decision.investments.index_fund <= self.investments.index_fund
            && decision.investments.gold <= self.investments.gold
    }
}

impl Default for DecisionLimits {
    fn default() -> Self {
        Self {
            wants: WantAllocation {
                eating_out: 500,
                shopping: 400,
                subscriptions: 300,
                entertainment: 500,
            },
            investments: InvestAllocation {
                cash: 800,
                fd: 600,
                sip: 500,
                index_fund: 500,
                gold: 400,
            },
        }
    }
}

/// Recoverable engine failures surfaced to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimError {
    /// The proposed month spends more than the disposable income left after
    /// fixed expenses. The state machine does not advance.
    #[error("month allocation exceeds disposable income by {overshoot} coins")]
    OverAllocation { overshoot: i64 },
}

/// Signed coins left undecided after needs, wants, and investments.
#[must_use]
pub fn unallocated(stream: &Stream, expenses: &FixedExpenses, decision: &MonthlyDecision) -> i64 {
    i64::from(stream.salary)
        - i64::from(expenses.total())
        - i64::from(decision.wants_total())
        - i64::from(decision.invest_total())
}

/// Validate a proposed month, returning the non-negative leftover on success.
///
/// # Errors
///
/// Returns `SimError::OverAllocation` when the decision overspends the month.
pub fn validate_allocation(
    stream: &Stream,
    expenses: &FixedExpenses,
    decision: &MonthlyDecision,
) -> Result<i64, SimError> {
    let leftover = unallocated(stream, expenses, decision);
    if leftover < 0 {
        return Err(SimError::OverAllocation {
            overshoot: -leftover,
        });
    }
    Ok(leftover)
}
