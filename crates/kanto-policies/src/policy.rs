//! The policy capability trait and its constructor registry.

use kanto_types::{Button, GameState, PolicyKind, Role};

use crate::history::ActionHistory;
use crate::scout::ScoutPolicy;
use crate::strategist::StrategistPolicy;

/// One decision: the button to press and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// The button the policy chose.
    pub action: Button,
    /// Unattributed rationale in the policy's own voice. The dispatch
    /// layer prepends the attribution prefix.
    pub rationale: String,
}

/// A source of button decisions.
///
/// Implementations decide from whatever they find useful: the state
/// snapshot, the current screen, their own action history. The dispatch
/// layer invokes [`decide`], then records the chosen action via
/// [`record_action`] -- policies never record their own decisions, which
/// keeps history bookkeeping in one place.
///
/// [`decide`]: Policy::decide
/// [`record_action`]: Policy::record_action
pub trait Policy: Send {
    /// Which registered kind this instance is.
    fn kind(&self) -> PolicyKind;

    /// Chooses the next button for `role` given the current snapshot and
    /// optionally the encoded screen.
    fn decide(&mut self, state: &GameState, screen: Option<&[u8]>, role: Role) -> Decision;

    /// Records an executed action into this instance's history.
    fn record_action(&mut self, action: Button);

    /// This instance's bounded action history.
    fn history(&self) -> &ActionHistory;
}

/// Constructs a fresh policy instance of the given kind.
///
/// `seed` fixes the instance's random stream, so a configured seed
/// replays the same decisions over the same inputs.
pub fn build_policy(kind: PolicyKind, seed: u64) -> Box<dyn Policy> {
    match kind {
        PolicyKind::Scout => Box::new(ScoutPolicy::new(seed)),
        PolicyKind::Strategist => Box::new(StrategistPolicy::new(seed)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn registry_builds_the_requested_kind() {
        assert_eq!(build_policy(PolicyKind::Scout, 7).kind(), PolicyKind::Scout);
        assert_eq!(
            build_policy(PolicyKind::Strategist, 7).kind(),
            PolicyKind::Strategist
        );
    }

    #[test]
    fn fresh_instances_start_with_empty_histories() {
        let policy = build_policy(PolicyKind::Scout, 7);
        assert!(policy.history().is_empty());
    }
}
