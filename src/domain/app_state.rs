use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::access::SessionState;
use super::entities::{AssessmentRecord, ConditionTier, User};

/// Per account; its oldest entries are dropped past this many.
pub const HISTORY_LIMIT: usize = 100;

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub session: SessionState,
    /// Saved assessments for every account that used this install, newest first.
    pub history: Vec<AssessmentRecord>,
    /// Condition preselected when a new assessment starts.
    pub default_condition: ConditionTier,
}

impl AppState {
    pub fn current_user(&self) -> Option<&User> {
        self.session.user()
    }

    pub fn sign_in(&mut self, user: User) {
        self.session = SessionState::SignedIn(user);
    }

    pub fn sign_out(&mut self) {
        self.session = SessionState::SignedOut;
    }

    pub fn record_assessment(&mut self, record: AssessmentRecord) {
        let owner = record.owner_id.clone();
        self.history.insert(0, record);
        let mut kept = 0;
        self.history.retain(|entry| {
            if entry.owner_id != owner {
                return true;
            }
            kept += 1;
            kept <= HISTORY_LIMIT
        });
    }

    pub fn history_for(&self, user_id: &str) -> Vec<AssessmentRecord> {
        self.history
            .iter()
            .filter(|record| record.owner_id == user_id)
            .cloned()
            .collect()
    }

    pub fn stats_for(&self, user_id: &str) -> HistoryStats {
        let records = self.history_for(user_id);
        let devices: HashSet<_> = records.iter().map(|r| r.device_id.as_str()).collect();
        HistoryStats {
            assessments: records.len(),
            devices_assessed: devices.len(),
            parts_selected: records.iter().map(|r| r.parts.len()).sum(),
            total_profit: records.iter().map(|r| r.profit).sum(),
        }
    }

    pub fn apply_persisted(&mut self, persisted: PersistedState) {
        self.history = persisted.history;
        self.default_condition = persisted.default_condition;
    }

    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            history: self.history.clone(),
            default_condition: self.default_condition,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HistoryStats {
    pub assessments: usize,
    pub devices_assessed: usize,
    pub parts_selected: usize,
    pub total_profit: f64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub history: Vec<AssessmentRecord>,
    #[serde(default)]
    pub default_condition: ConditionTier,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Role;

    fn record(id: &str, owner: &str, device: &str, profit: f64) -> AssessmentRecord {
        AssessmentRecord {
            id: id.to_string(),
            owner_id: owner.to_string(),
            device_id: device.to_string(),
            device_name: format!("Device {device}"),
            condition: ConditionTier::Good,
            defects: Vec::new(),
            parts: Vec::new(),
            valuation: 0,
            repair_cost: 0.0,
            profit,
            assessed_at: 0,
        }
    }

    #[test]
    fn history_is_newest_first_and_per_user() {
        let mut state = AppState::default();
        state.record_assessment(record("a", "u1", "1", 100.0));
        state.record_assessment(record("b", "u2", "1", 50.0));
        state.record_assessment(record("c", "u1", "2", 25.5));

        let mine = state.history_for("u1");
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].id, "c");

        let stats = state.stats_for("u1");
        assert_eq!(stats.assessments, 2);
        assert_eq!(stats.devices_assessed, 2);
        assert_eq!(stats.total_profit, 125.5);
    }

    #[test]
    fn history_is_capped() {
        let mut state = AppState::default();
        for i in 0..HISTORY_LIMIT + 5 {
            state.record_assessment(record(&i.to_string(), "u1", "1", 1.0));
        }
        assert_eq!(state.history.len(), HISTORY_LIMIT);
        assert_eq!(state.history[0].id, (HISTORY_LIMIT + 4).to_string());
    }

    #[test]
    fn one_account_filling_its_history_keeps_the_others() {
        let mut state = AppState::default();
        state.record_assessment(record("alice-1", "alice", "1", 10.0));
        for i in 0..HISTORY_LIMIT + 3 {
            state.record_assessment(record(&format!("bob-{i}"), "bob", "2", 1.0));
        }

        let alice = state.history_for("alice");
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].id, "alice-1");

        let bob = state.history_for("bob");
        assert_eq!(bob.len(), HISTORY_LIMIT);
        assert_eq!(bob[0].id, format!("bob-{}", HISTORY_LIMIT + 2));
        assert_eq!(bob[HISTORY_LIMIT - 1].id, "bob-3");
    }

    #[test]
    fn sign_out_clears_the_session_only() {
        let mut state = AppState::default();
        state.sign_in(User {
            id: "u1".to_string(),
            email: "a@b.c".to_string(),
            full_name: "A".to_string(),
            role: Role::Admin,
        });
        state.record_assessment(record("a", "u1", "1", 1.0));

        state.sign_out();

        assert_eq!(state.session, SessionState::SignedOut);
        assert_eq!(state.history.len(), 1);
    }
}
