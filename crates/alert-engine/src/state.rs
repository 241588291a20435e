//! Tracking which alerts have already been notified.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// How the dispatched-id set evolves between polling cycles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchPolicy {
    /// Replace the set with the ids shown this cycle. An alert that drops
    /// out of the feed for one cycle is notified again when it returns.
    #[default]
    Replace,
    /// Only ever add ids; the set is cleared by an explicit reset.
    Union,
}

impl FromStr for DispatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(DispatchPolicy::Replace),
            "union" => Ok(DispatchPolicy::Union),
            other => Err(format!("unknown dispatch policy: {}", other)),
        }
    }
}

impl fmt::Display for DispatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchPolicy::Replace => f.write_str("replace"),
            DispatchPolicy::Union => f.write_str("union"),
        }
    }
}

/// Ids of alerts already surfaced through a notification.
#[derive(Debug, Clone, Default)]
pub struct DispatchState {
    dispatched: HashSet<i64>,
    policy: DispatchPolicy,
}

impl DispatchState {
    pub fn new(policy: DispatchPolicy) -> Self {
        Self {
            dispatched: HashSet::new(),
            policy,
        }
    }

    pub fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    /// Ids in `current` that have not been dispatched, in order, without
    /// duplicates.
    pub fn new_ids(&self, current: &[i64]) -> Vec<i64> {
        let mut seen = HashSet::new();
        current
            .iter()
            .copied()
            .filter(|id| !self.dispatched.contains(id) && seen.insert(*id))
            .collect()
    }

    /// Fold the ids shown this cycle into the state according to the policy.
    pub fn record(&mut self, current: &[i64]) {
        match self.policy {
            DispatchPolicy::Replace => {
                self.dispatched = current.iter().copied().collect();
            }
            DispatchPolicy::Union => {
                self.dispatched.extend(current.iter().copied());
            }
        }
    }

    pub fn contains(&self, id: i64) -> bool {
        self.dispatched.contains(&id)
    }

    pub fn ids(&self) -> &HashSet<i64> {
        &self.dispatched
    }

    pub fn len(&self) -> usize {
        self.dispatched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dispatched.is_empty()
    }

    /// Forget everything, as on a fresh session.
    pub fn reset(&mut self) {
        self.dispatched.clear();
    }
}
