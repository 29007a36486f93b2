//! MoneyPath Game Engine
//!
//! Platform-agnostic core game logic for the MoneyPath financial literacy
//! simulation. This crate provides the month-by-month budgeting game without
//! UI or platform-specific dependencies: catalogs, the turn state machine,
//! return accrual, event draws, and outcome scoring.

pub mod budget;
pub mod events;
pub mod numbers;
pub mod portfolio;
pub mod progress;
pub mod score;
pub mod seed;
pub mod session;
pub mod streams;

// Re-export commonly used types
pub use budget::{
    DecisionLimits, FixedExpenses, InvestAllocation, MonthlyDecision, SimError, WantAllocation,
    unallocated, validate_allocation,
};
pub use events::{
    EventCatalog, EventPolarity, EventSource, LifeEvent, ScriptedEvents, SeededEvents,
};
pub use portfolio::{Portfolio, RateTable};
pub use progress::{BadgeRecord, ProgressRecord};
pub use score::{
    InsightList, OutcomeSummary, ScoreConfig, health_score, insights, outcome_summary,
};
pub use seed::{decode_replay_code, encode_replay_code, generate_code_from_entropy};
pub use session::{
    GameSession, GameStep, MonthOutcome, MonthRecord, SimConfig, SimConfigError, SimSession,
};
pub use streams::{Difficulty, Stream, StreamsList};

/// Badge granted for finishing a run at or above the score threshold.
pub const BADGE_MONEY_HEALTH_PRO: &str = "money-health-pro";

/// Trait for abstracting catalog loading operations
/// Platform-specific implementations should provide this
pub trait CatalogLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the career stream catalog from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the stream catalog cannot be loaded.
    fn load_streams(&self) -> Result<StreamsList, Self::Error>;

    /// Load the life-event catalog from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the event catalog cannot be loaded.
    fn load_events(&self) -> Result<EventCatalog, Self::Error>;
}

/// Loader serving the built-in stream and event tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalogs;

impl CatalogLoader for BuiltinCatalogs {
    type Error = std::convert::Infallible;

    fn load_streams(&self) -> Result<StreamsList, Self::Error> {
        Ok(StreamsList::builtin())
    }

    fn load_events(&self) -> Result<EventCatalog, Self::Error> {
        Ok(EventCatalog::builtin())
    }
}

/// Trait for abstracting the hosted progress/achievement collaborator
/// Platform-specific implementations should provide this
pub trait ProgressStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Upsert a completion mark; idempotent per `(user_id, scenario_id)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be stored.
    fn upsert_progress(&self, record: &ProgressRecord) -> Result<(), Self::Error>;

    /// Grant an achievement badge.
    ///
    /// # Errors
    ///
    /// Returns an error if the badge cannot be stored.
    fn award_badge(&self, record: &BadgeRecord) -> Result<(), Self::Error>;
}

/// Main game engine for managing simulation sessions and reporting outcomes
pub struct GameEngine<L, P>
where
    L: CatalogLoader,
    P: ProgressStore,
{
    loader: L,
    progress: P,
    score_cfg: ScoreConfig,
}

impl<L, P> GameEngine<L, P>
where
    L: CatalogLoader,
    P: ProgressStore,
{
    /// Create a new game engine with the provided loader and progress store
    pub fn new(loader: L, progress: P) -> Self {
        Self::with_score_config(loader, progress, ScoreConfig::default())
    }

    /// Create a new game engine with explicit scoring weights
    pub const fn with_score_config(loader: L, progress: P, score_cfg: ScoreConfig) -> Self {
        Self {
            loader,
            progress,
            score_cfg,
        }
    }

    #[must_use]
    pub const fn score_config(&self) -> &ScoreConfig {
        &self.score_cfg
    }

    /// Construct a seeded session from the loaded catalogs.
    ///
    /// # Errors
    ///
    /// Returns an error if a catalog cannot be loaded or the configuration is
    /// out of bounds.
    pub fn create_session(
        &self,
        cfg: SimConfig,
        seed: u64,
    ) -> Result<SimSession<SeededEvents>, anyhow::Error> {
        let streams = self.loader.load_streams()?;
        let catalog = self.loader.load_events()?;
        Ok(SimSession::seeded(cfg, streams, catalog, seed)?)
    }

    /// Aggregate a finished session for the result screen.
    #[must_use]
    pub fn summarize(&self, state: &GameSession) -> OutcomeSummary {
        outcome_summary(state, &self.score_cfg)
    }

    /// Report a finished run to the progress collaborator, awarding the
    /// health-pro badge at or above the configured threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if the progress store rejects a record.
    pub fn record_outcome(
        &self,
        user_id: &str,
        scenario_id: &str,
        summary: &OutcomeSummary,
        completed_at: i64,
    ) -> Result<(), P::Error> {
        self.progress.upsert_progress(&ProgressRecord {
            user_id: user_id.to_string(),
            scenario_id: scenario_id.to_string(),
            completed: true,
            completed_at,
        })?;
        if summary.score >= self.score_cfg.badge_threshold {
            self.progress.award_badge(&BadgeRecord {
                user_id: user_id.to_string(),
                badge_id: BADGE_MONEY_HEALTH_PRO.to_string(),
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::convert::Infallible;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct MemoryProgress {
        marks: Rc<RefCell<HashMap<(String, String), ProgressRecord>>>,
        badges: Rc<RefCell<Vec<BadgeRecord>>>,
    }

    impl ProgressStore for MemoryProgress {
        type Error = Infallible;

        fn upsert_progress(&self, record: &ProgressRecord) -> Result<(), Self::Error> {
            self.marks.borrow_mut().insert(
                (record.user_id.clone(), record.scenario_id.clone()),
                record.clone(),
            );
            Ok(())
        }

        fn award_badge(&self, record: &BadgeRecord) -> Result<(), Self::Error> {
            self.badges.borrow_mut().push(record.clone());
            Ok(())
        }
    }

    fn play_full_run(session: &mut SimSession<SeededEvents>) {
        session.start();
        session.select_stream("science");
        session.confirm_setup();
        let decision = MonthlyDecision {
            wants: WantAllocation {
                eating_out: 100,
                shopping: 100,
                ..WantAllocation::default()
            },
            investments: InvestAllocation {
                fd: 200,
                sip: 200,
                ..InvestAllocation::default()
            },
        };
        loop {
            session.lock_month(decision).unwrap();
            if session.resolve_event().finished {
                break;
            }
        }
    }

    #[test]
    fn engine_runs_a_session_and_records_the_outcome() {
        let progress = MemoryProgress::default();
        let engine = GameEngine::new(BuiltinCatalogs, progress.clone());
        let mut session = engine.create_session(SimConfig::default(), 77).unwrap();
        play_full_run(&mut session);

        let state = session.into_state();
        assert_eq!(state.step, GameStep::Final);
        let summary = engine.summarize(&state);
        assert!(summary.score <= 100);
        assert!(summary.invested_every_month);

        engine
            .record_outcome("u-1", "life-money-game", &summary, 1_754_000_000)
            .unwrap();
        engine
            .record_outcome("u-1", "life-money-game", &summary, 1_754_000_500)
            .unwrap();

        let marks = progress.marks.borrow();
        assert_eq!(marks.len(), 1, "upserts stay idempotent per (user, scenario)");
        let mark = marks
            .get(&("u-1".to_string(), "life-money-game".to_string()))
            .unwrap();
        assert!(mark.completed);
        assert_eq!(mark.completed_at, 1_754_000_500);
    }

    #[test]
    fn badge_requires_the_score_threshold() {
        let progress = MemoryProgress::default();
        let engine = GameEngine::new(BuiltinCatalogs, progress.clone());

        let mut weak = engine.summarize(&GameSession::fresh(12));
        weak.score = 79;
        engine.record_outcome("u-2", "s", &weak, 0).unwrap();
        assert!(progress.badges.borrow().is_empty());

        let mut strong = weak.clone();
        strong.score = 80;
        engine.record_outcome("u-2", "s", &strong, 0).unwrap();
        let badges = progress.badges.borrow();
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].badge_id, BADGE_MONEY_HEALTH_PRO);
    }

    #[test]
    fn config_errors_surface_through_the_engine() {
        let engine = GameEngine::new(BuiltinCatalogs, MemoryProgress::default());
        let cfg = SimConfig {
            total_months: 0,
            ..SimConfig::default()
        };
        assert!(engine.create_session(cfg, 1).is_err());
    }
}
