//! Turn-based state machine driving the month-by-month simulation.
//!
//! Every player action maps to exactly one transition on [`SimSession`]; no
//! transition is ever interleaved with another. The only recoverable failure
//! is an over-allocated month, which rejects the transition and leaves the
//! session untouched. Out-of-phase calls and unknown stream ids are contract
//! violations and panic.

use std::hash::Hasher;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use twox_hash::XxHash64;

use crate::budget::{FixedExpenses, MonthlyDecision, SimError, validate_allocation};
use crate::events::{EventCatalog, EventSource, LifeEvent, SeededEvents};
use crate::numbers::{i64_to_f64, round_f64_to_i64};
use crate::portfolio::{Portfolio, RateTable};
use crate::streams::{Stream, StreamsList};

const MONTHS_PER_YEAR: u16 = 12;

/// State-machine step the session currently sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GameStep {
    /// Idle landing state before the player starts.
    #[default]
    Hero,
    /// Career stream selection.
    Stream,
    /// Confirmation of the derived monthly budget.
    Setup,
    /// Monthly decision entry; repeats until the final month.
    Monthly,
    /// A drawn life event awaiting acknowledgement.
    Event,
    /// Terminal state; outcome aggregation is legal here.
    Final,
}

/// Immutable audit-trail entry appended once per completed month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRecord {
    pub month: u16,
    pub net_worth: i64,
    pub event: String,
}

/// Result returned when a pending event is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthOutcome {
    pub finished: bool,
    pub record: MonthRecord,
}

/// Constructor-time simulation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Total simulated months; a run ends after resolving this month's event.
    #[serde(default = "SimConfig::default_total_months")]
    pub total_months: u16,
    #[serde(default)]
    pub expenses: FixedExpenses,
    #[serde(default)]
    pub rates: RateTable,
}

impl SimConfig {
    #[must_use]
    pub const fn default_total_months() -> u16 {
        12
    }

    /// Validate configuration invariants before a session is built.
    ///
    /// # Errors
    ///
    /// Returns `SimConfigError` when any field violates the documented bounds.
    pub fn validate(&self) -> Result<(), SimConfigError> {
        const MIN_MONTHS: u16 = 1;
        const MAX_MONTHS: u16 = 240;
        if !(MIN_MONTHS..=MAX_MONTHS).contains(&self.total_months) {
            return Err(SimConfigError::RangeViolation {
                field: "total_months",
                min: f64::from(MIN_MONTHS),
                max: f64::from(MAX_MONTHS),
                value: f64::from(self.total_months),
            });
        }
        for (field, rate) in self.rates.rates() {
            if !(0.0..=1.0).contains(&rate) {
                return Err(SimConfigError::RangeViolation {
                    field,
                    min: 0.0,
                    max: 1.0,
                    value: rate,
                });
            }
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            total_months: Self::default_total_months(),
            expenses: FixedExpenses::default(),
            rates: RateTable::default(),
        }
    }
}

/// Invalid constructor-time configuration.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SimConfigError {
    #[error("{field} must be within {min}..={max}, got {value}")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
}

/// The root aggregate: everything one running game owns.
///
/// Serializable so UI layers can snapshot, persist, and diff it. Use
/// [`GameSession::fingerprint`] for cheap change detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    pub step: GameStep,
    /// One-based month counter.
    pub month: u16,
    pub total_months: u16,
    pub stream: Option<Stream>,
    pub portfolio: Portfolio,
    #[serde(default)]
    pub decision: MonthlyDecision,
    #[serde(default)]
    pub pending_event: Option<LifeEvent>,
    pub total_wants_spent: u32,
    pub negative_cash_months: u16,
    pub invested_every_month: bool,
    pub history: Vec<MonthRecord>,
}

impl GameSession {
    /// A pristine session at the idle step.
    #[must_use]
    pub fn fresh(total_months: u16) -> Self {
        Self {
            step: GameStep::Hero,
            month: 1,
            total_months,
            stream: None,
            portfolio: Portfolio::default(),
            decision: MonthlyDecision::default(),
            pending_event: None,
            total_wants_spent: 0,
            negative_cash_months: 0,
            invested_every_month: true,
            history: Vec::new(),
        }
    }

    /// Current net worth across all buckets.
    #[must_use]
    pub fn net_worth(&self) -> f64 {
        self.portfolio.net_worth()
    }

    /// Stable hash of the serialized session, for change detection and
    /// state-unchanged assertions.
    ///
    /// # Panics
    ///
    /// Panics if the session cannot be serialized, which plain state structs
    /// never are.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let bytes = serde_json::to_vec(self).expect("session state serializes");
        let mut hasher = XxHash64::with_seed(0);
        hasher.write(&bytes);
        hasher.finish()
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::fresh(SimConfig::default_total_months())
    }
}

/// A session controller binding config, catalogs, an event source, and the
/// mutable [`GameSession`] state.
///
/// Exclusively owned by one player; transitions are serialized by design.
#[derive(Debug, Clone)]
pub struct SimSession<E: EventSource> {
    cfg: SimConfig,
    streams: StreamsList,
    catalog: EventCatalog,
    events: E,
    state: GameSession,
}

impl SimSession<SeededEvents> {
    /// Construct a session whose event stream derives deterministically from
    /// `seed`.
    ///
    /// # Errors
    ///
    /// Returns `SimConfigError` when the configuration is out of bounds.
    ///
    /// # Panics
    ///
    /// Panics when the event catalog is empty.
    pub fn seeded(
        cfg: SimConfig,
        streams: StreamsList,
        catalog: EventCatalog,
        seed: u64,
    ) -> Result<Self, SimConfigError> {
        Self::with_source(cfg, streams, catalog, SeededEvents::from_user_seed(seed))
    }

    /// Number of event draws performed so far.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.events.draws()
    }
}

impl<E: EventSource> SimSession<E> {
    /// Construct a session around an explicit event source.
    ///
    /// # Errors
    ///
    /// Returns `SimConfigError` when the configuration is out of bounds.
    ///
    /// # Panics
    ///
    /// Panics when the event catalog is empty; event draws must be total.
    pub fn with_source(
        cfg: SimConfig,
        streams: StreamsList,
        catalog: EventCatalog,
        events: E,
    ) -> Result<Self, SimConfigError> {
        cfg.validate()?;
        assert!(!catalog.is_empty(), "event catalog must not be empty");
        let state = GameSession::fresh(cfg.total_months);
        Ok(Self {
            cfg,
            streams,
            catalog,
            events,
            state,
        })
    }

    /// Borrow the underlying session state.
    #[must_use]
    pub const fn state(&self) -> &GameSession {
        &self.state
    }

    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.cfg
    }

    #[must_use]
    pub const fn streams(&self) -> &StreamsList {
        &self.streams
    }

    #[must_use]
    pub const fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    /// Consume the controller, returning the final session state.
    #[must_use]
    pub fn into_state(self) -> GameSession {
        self.state
    }

    /// Disposable coins after fixed expenses; zero before a stream is picked.
    #[must_use]
    pub fn money_after_needs(&self) -> i64 {
        self.state.stream.as_ref().map_or(0, |stream| {
            i64::from(stream.salary) - i64::from(self.cfg.expenses.total())
        })
    }

    /// Signed leftover a decision would leave this month.
    ///
    /// # Panics
    ///
    /// Panics before a stream is selected.
    #[must_use]
    pub fn unallocated(&self, decision: &MonthlyDecision) -> i64 {
        let stream = self.selected_stream();
        crate::budget::unallocated(stream, &self.cfg.expenses, decision)
    }

    /// `hero -> stream`: explicit start action, no data change.
    ///
    /// # Panics
    ///
    /// Panics outside the hero step.
    pub fn start(&mut self) {
        assert_eq!(self.state.step, GameStep::Hero, "start is legal only at hero");
        self.state.step = GameStep::Stream;
    }

    /// `stream -> setup`: fix the career stream for this run.
    ///
    /// # Panics
    ///
    /// Panics outside the stream step, or when `id` is not in the catalog —
    /// an unknown stream id is a caller bug, not a runtime condition.
    pub fn select_stream(&mut self, id: &str) {
        assert_eq!(
            self.state.step,
            GameStep::Stream,
            "select_stream is legal only at stream selection"
        );
        let stream = self
            .streams
            .get_by_id(id)
            .unwrap_or_else(|| panic!("unknown stream id: {id}"))
            .clone();
        self.state.stream = Some(stream);
        self.state.step = GameStep::Setup;
    }

    /// `setup -> monthly`: zero the portfolio, reset month one and all running
    /// totals, clear history.
    ///
    /// # Panics
    ///
    /// Panics outside the setup step.
    pub fn confirm_setup(&mut self) {
        assert_eq!(
            self.state.step,
            GameStep::Setup,
            "confirm_setup is legal only at setup"
        );
        let stream = self.state.stream.take();
        self.state = GameSession {
            stream,
            step: GameStep::Monthly,
            ..GameSession::fresh(self.cfg.total_months)
        };
    }

    /// `monthly -> event`: validate and commit the month's decision, accrue
    /// returns on year boundaries, and draw exactly one life event.
    ///
    /// On `Err` the session is byte-for-byte unchanged and the player may
    /// re-adjust the decision.
    ///
    /// # Errors
    ///
    /// Returns `SimError::OverAllocation` when the decision overspends the
    /// month's disposable income.
    ///
    /// # Panics
    ///
    /// Panics outside the monthly step.
    pub fn lock_month(&mut self, decision: MonthlyDecision) -> Result<LifeEvent, SimError> {
        assert_eq!(
            self.state.step,
            GameStep::Monthly,
            "lock_month is legal only at monthly"
        );
        let stream = self.selected_stream();
        let leftover = validate_allocation(stream, &self.cfg.expenses, &decision)?;

        if decision.invest_total() == 0 {
            self.state.invested_every_month = false;
        }
        self.state.total_wants_spent = self
            .state
            .total_wants_spent
            .saturating_add(decision.wants_total());
        self.state
            .portfolio
            .apply_contributions(&decision.investments, i64_to_f64(leftover));
        if self.state.month % MONTHS_PER_YEAR == 0 {
            self.state.portfolio.apply_annual_growth(&self.cfg.rates);
        }

        let event = self.events.next_event(&self.catalog);
        self.state.pending_event = Some(event.clone());
        self.state.decision = decision;
        self.state.step = GameStep::Event;
        Ok(event)
    }

    /// `event -> monthly | final`: apply the pending event's cash impact,
    /// append the month record, and advance or finalize.
    ///
    /// # Panics
    ///
    /// Panics outside the event step.
    pub fn resolve_event(&mut self) -> MonthOutcome {
        assert_eq!(
            self.state.step,
            GameStep::Event,
            "resolve_event is legal only at event"
        );
        let event = self
            .state
            .pending_event
            .take()
            .expect("event step holds a pending event");

        if self.state.portfolio.apply_event_impact(event.impact) {
            self.state.negative_cash_months = self.state.negative_cash_months.saturating_add(1);
        }
        let record = MonthRecord {
            month: self.state.month,
            net_worth: round_f64_to_i64(self.state.portfolio.net_worth()),
            event: event.name,
        };
        self.state.history.push(record.clone());
        self.state.decision = MonthlyDecision::default();

        let finished = self.state.month >= self.state.total_months;
        if finished {
            self.state.step = GameStep::Final;
        } else {
            self.state.month += 1;
            self.state.step = GameStep::Monthly;
        }
        MonthOutcome { finished, record }
    }

    /// `final -> setup`: replay with the same stream, discarding the run.
    ///
    /// # Panics
    ///
    /// Panics outside the final step.
    pub fn play_again(&mut self) {
        assert_eq!(
            self.state.step,
            GameStep::Final,
            "play_again is legal only at final"
        );
        let stream = self.state.stream.take();
        self.state = GameSession {
            stream,
            step: GameStep::Setup,
            ..GameSession::fresh(self.cfg.total_months)
        };
    }

    /// `final -> stream`: discard the run and the stream choice.
    ///
    /// # Panics
    ///
    /// Panics outside the final step.
    pub fn change_stream(&mut self) {
        assert_eq!(
            self.state.step,
            GameStep::Final,
            "change_stream is legal only at final"
        );
        self.state = GameSession {
            step: GameStep::Stream,
            ..GameSession::fresh(self.cfg.total_months)
        };
    }

    fn selected_stream(&self) -> &Stream {
        self.state
            .stream
            .as_ref()
            .expect("stream is selected before monthly play")
    }
}
