//! End-of-run outcome aggregation: the money health score and reflection
//! insights derived from a finished session.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::numbers::round_f64_to_i64;
use crate::session::GameSession;

/// Insight strings kept inline; the list is capped at five entries.
pub type InsightList = SmallVec<[String; 5]>;

const MAX_INSIGHTS: usize = 5;
const SIP_INSIGHT_THRESHOLD: f64 = 500.0;
const WANTS_INSIGHT_RATIO: f64 = 0.30;

/// Scoring weights for the four independent health-score awards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreConfig {
    pub invest_every_month_points: u16,
    pub no_negative_cash_points: u16,
    pub wants_discipline_points: u16,
    pub positive_net_worth_points: u16,
    /// Wants spending below this share of total income earns the discipline
    /// award.
    pub wants_ratio_cap: f64,
    /// Minimum score for the achievement badge.
    pub badge_threshold: u16,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            invest_every_month_points: 30,
            no_negative_cash_points: 30,
            wants_discipline_points: 20,
            positive_net_worth_points: 20,
            wants_ratio_cap: 0.40,
            badge_threshold: 80,
        }
    }
}

/// Aggregated outcome handed to the UI at the final step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    pub score: u16,
    pub final_net_worth: i64,
    pub months: u16,
    pub negative_cash_months: u16,
    pub invested_every_month: bool,
    pub total_wants_spent: u32,
    pub insights: InsightList,
}

fn total_income(state: &GameSession) -> i64 {
    state.stream.as_ref().map_or(0, |stream| {
        i64::from(stream.salary) * i64::from(state.total_months)
    })
}

fn wants_share(state: &GameSession) -> Option<f64> {
    let income = total_income(state);
    if income == 0 {
        return None;
    }
    Some(f64::from(state.total_wants_spent) / crate::numbers::i64_to_f64(income))
}

/// Compute the bounded money health score for a session.
///
/// A deterministic pure function of the session state: four independent
/// awards, clamped to `0..=100`.
#[must_use]
pub fn health_score(state: &GameSession, cfg: &ScoreConfig) -> u16 {
    let mut score: u16 = 0;
    if state.invested_every_month {
        score = score.saturating_add(cfg.invest_every_month_points);
    }
    if state.negative_cash_months == 0 {
        score = score.saturating_add(cfg.no_negative_cash_points);
    }
    if wants_share(state).is_some_and(|share| share < cfg.wants_ratio_cap) {
        score = score.saturating_add(cfg.wants_discipline_points);
    }
    if state.portfolio.net_worth() > 0.0 {
        score = score.saturating_add(cfg.positive_net_worth_points);
    }
    score.min(100)
}

/// Derive the qualitative reflection insights for a finished run.
///
/// Order-stable and deterministic for identical input state; at most five
/// entries.
#[must_use]
pub fn insights(state: &GameSession) -> InsightList {
    let mut out = InsightList::new();
    if state.portfolio.sip > SIP_INSIGHT_THRESHOLD {
        out.push(
            "Consistent SIP contributions increased your long-term growth potential.".to_string(),
        );
    }
    if state.negative_cash_months > 0 {
        out.push(format!(
            "You faced {} month(s) with negative cash. Building an emergency fund helps!",
            state.negative_cash_months
        ));
    }
    if state.invested_every_month {
        out.push(
            "Great job investing every month! Consistency is key to wealth building.".to_string(),
        );
    }
    if state.portfolio.index_fund > state.portfolio.fd {
        out.push(
            "Index funds grew faster than FDs, showing the power of market returns.".to_string(),
        );
    }
    if wants_share(state).is_some_and(|share| share > WANTS_INSIGHT_RATIO) {
        out.push(
            "You spent over 30% on wants. Consider reducing discretionary spending.".to_string(),
        );
    }
    out.truncate(MAX_INSIGHTS);
    out
}

/// Package score, final balances, and insights for the result screen.
#[must_use]
pub fn outcome_summary(state: &GameSession, cfg: &ScoreConfig) -> OutcomeSummary {
    OutcomeSummary {
        score: health_score(state, cfg),
        final_net_worth: round_f64_to_i64(state.portfolio.net_worth()),
        months: state.total_months,
        negative_cash_months: state.negative_cash_months,
        invested_every_month: state.invested_every_month,
        total_wants_spent: state.total_wants_spent,
        insights: insights(state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::Portfolio;
    use crate::streams::StreamsList;

    fn finished_state() -> GameSession {
        let mut state = GameSession::fresh(12);
        state.stream = Some(StreamsList::builtin().get_by_id("science").unwrap().clone());
        state.month = 12;
        state.portfolio = Portfolio {
            cash: 2000.0,
            fd: 630.0,
            sip: 600.0,
            index_fund: 700.0,
            gold: 0.0,
        };
        state.total_wants_spent = 2400;
        state
    }

    #[test]
    fn perfect_run_scores_full_marks() {
        let state = finished_state();
        assert_eq!(health_score(&state, &ScoreConfig::default()), 100);
    }

    #[test]
    fn each_award_is_independent() {
        let cfg = ScoreConfig::default();

        let mut state = finished_state();
        state.invested_every_month = false;
        assert_eq!(health_score(&state, &cfg), 70);

        let mut state = finished_state();
        state.negative_cash_months = 2;
        assert_eq!(health_score(&state, &cfg), 70);

        let mut state = finished_state();
        // 40% of 36_000 total income
        state.total_wants_spent = 14_400;
        assert_eq!(health_score(&state, &cfg), 80);

        let mut state = finished_state();
        state.portfolio = Portfolio::default();
        assert_eq!(health_score(&state, &cfg), 80);
    }

    #[test]
    fn score_is_deterministic_and_bounded() {
        let state = finished_state();
        let cfg = ScoreConfig::default();
        assert_eq!(health_score(&state, &cfg), health_score(&state, &cfg));

        let inflated = ScoreConfig {
            invest_every_month_points: 90,
            no_negative_cash_points: 90,
            ..cfg
        };
        assert_eq!(health_score(&state, &inflated), 100);
    }

    #[test]
    fn no_stream_means_no_wants_award() {
        let mut state = finished_state();
        state.stream = None;
        state.total_wants_spent = 0;
        assert_eq!(health_score(&state, &ScoreConfig::default()), 80);
    }

    #[test]
    fn insights_follow_thresholds() {
        let state = finished_state();
        let list = insights(&state);
        assert!(list.iter().any(|s| s.contains("SIP contributions")));
        assert!(list.iter().any(|s| s.contains("investing every month")));
        assert!(list.iter().any(|s| s.contains("Index funds grew faster")));
        assert!(!list.iter().any(|s| s.contains("negative cash")));
        assert!(list.len() <= 5);

        let mut bumpy = finished_state();
        bumpy.negative_cash_months = 3;
        let list = insights(&bumpy);
        assert!(list.iter().any(|s| s.contains("3 month(s) with negative cash")));
    }

    #[test]
    fn summary_mirrors_the_session() {
        let state = finished_state();
        let summary = outcome_summary(&state, &ScoreConfig::default());
        assert_eq!(summary.score, 100);
        assert_eq!(summary.final_net_worth, 3930);
        assert_eq!(summary.months, 12);
        assert!(summary.invested_every_month);
        assert_eq!(summary.insights, insights(&state));
    }
}
