//! Interaction state shared across reruns.

use serde::Serialize;

use crate::domain::LoanCondition;

/// The only state that survives between reruns: the selected loan condition.
///
/// It scopes the bottom section of the dashboard (amount histogram and box
/// plot); every other aggregate ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardState {
    pub condition: LoanCondition,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            condition: LoanCondition::Good,
        }
    }
}

impl DashboardState {
    pub fn with_condition(condition: LoanCondition) -> Self {
        Self { condition }
    }

    pub fn select(&mut self, condition: LoanCondition) {
        self.condition = condition;
    }

    pub fn toggle_condition(&mut self) {
        self.condition = self.condition.other();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_good_loans() {
        assert_eq!(DashboardState::default().condition, LoanCondition::Good);
    }

    #[test]
    fn toggle_twice_restores() {
        let mut s = DashboardState::default();
        s.toggle_condition();
        assert_eq!(s.condition, LoanCondition::Bad);
        s.toggle_condition();
        assert_eq!(s, DashboardState::default());
    }
}
