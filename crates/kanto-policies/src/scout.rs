//! The impulsive explorer policy.

use kanto_types::{Button, GameState, PolicyKind, Role};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::history::ActionHistory;
use crate::policy::{Decision, Policy};

/// Chance (percent) of interacting instead of moving in the overworld.
const INTERACT_CHANCE_PCT: u32 = 30;
/// Lead HP threshold (percent) below which the scout reaches for items.
const LOW_HP_PCT: u32 = 30;

/// Impulsive explorer: interacts often, wanders wherever the dice point,
/// and never second-guesses itself.
pub struct ScoutPolicy {
    rng: StdRng,
    history: ActionHistory,
}

impl ScoutPolicy {
    /// Creates a scout with a fixed random stream.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            history: ActionHistory::new(),
        }
    }

    fn decide_as_player(&mut self, state: &GameState) -> Decision {
        if state.team.is_empty() {
            return Decision {
                action: Button::A,
                rationale: "Fresh session, mashing A until something happens.".to_string(),
            };
        }
        let roll: u32 = self.rng.random_range(0..100);
        if roll < INTERACT_CHANCE_PCT {
            return Decision {
                action: Button::A,
                rationale: "Something might be right here, poking it with A.".to_string(),
            };
        }
        let idx: usize = self.rng.random_range(0..Button::DIRECTIONS.len());
        let direction = Button::DIRECTIONS.get(idx).copied().unwrap_or(Button::Up);
        Decision {
            action: direction,
            rationale: format!("Wandering {direction} to see what's out there."),
        }
    }

    fn decide_in_battle(&mut self, state: &GameState) -> Decision {
        let Some(lead) = state.lead() else {
            return Decision {
                action: Button::A,
                rationale: "No party data yet, pressing on with A.".to_string(),
            };
        };
        if lead.hp_below_percent(LOW_HP_PCT) {
            return Decision {
                action: Button::B,
                rationale: format!("{} is hurting, backing out to grab a potion.", lead.name),
            };
        }
        Decision {
            action: Button::A,
            rationale: "Leading with the first attack.".to_string(),
        }
    }
}

impl Policy for ScoutPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Scout
    }

    fn decide(&mut self, state: &GameState, _screen: Option<&[u8]>, role: Role) -> Decision {
        match role {
            Role::Player => self.decide_as_player(state),
            Role::Pokemon => self.decide_in_battle(state),
        }
    }

    fn record_action(&mut self, action: Button) {
        self.history.push(action);
    }

    fn history(&self) -> &ActionHistory {
        &self.history
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use kanto_types::{ItemSlot, ScreenContext, TeamMember};

    use super::*;

    fn state_with_lead(hp: u32, max_hp: u32) -> GameState {
        GameState {
            location: "ROUTE 1".to_string(),
            badges: 0,
            money: 3000,
            team: vec![TeamMember {
                name: "SQUIRTLE".to_string(),
                level: 5,
                hp,
                max_hp,
            }],
            items: vec![ItemSlot {
                name: "POTION".to_string(),
                count: 1,
            }],
            context: ScreenContext::Overworld,
        }
    }

    fn empty_state() -> GameState {
        GameState {
            team: vec![],
            ..state_with_lead(20, 20)
        }
    }

    #[test]
    fn empty_team_presses_a_in_either_role() {
        let mut scout = ScoutPolicy::new(42);
        let state = empty_state();
        assert_eq!(
            scout.decide(&state, None, Role::Player).action,
            Button::A
        );
        assert_eq!(
            scout.decide(&state, None, Role::Pokemon).action,
            Button::A
        );
    }

    #[test]
    fn low_lead_hp_backs_out_for_items() {
        let mut scout = ScoutPolicy::new(42);
        let state = state_with_lead(5, 20);
        let decision = scout.decide(&state, None, Role::Pokemon);
        assert_eq!(decision.action, Button::B);
        assert!(decision.rationale.contains("SQUIRTLE"));
    }

    #[test]
    fn healthy_lead_attacks() {
        let mut scout = ScoutPolicy::new(42);
        let state = state_with_lead(20, 20);
        assert_eq!(scout.decide(&state, None, Role::Pokemon).action, Button::A);
    }

    #[test]
    fn overworld_play_mixes_interaction_and_movement() {
        let mut scout = ScoutPolicy::new(42);
        let state = state_with_lead(20, 20);

        let mut pressed_a = false;
        let mut moved = false;
        for _ in 0..100 {
            let decision = scout.decide(&state, None, Role::Player);
            if decision.action == Button::A {
                pressed_a = true;
            }
            if decision.action.is_direction() {
                moved = true;
            }
        }
        assert!(pressed_a);
        assert!(moved);
    }

    #[test]
    fn same_seed_replays_the_same_decisions() {
        let state = state_with_lead(20, 20);
        let mut first = ScoutPolicy::new(7);
        let mut second = ScoutPolicy::new(7);
        for _ in 0..20 {
            assert_eq!(
                first.decide(&state, None, Role::Player).action,
                second.decide(&state, None, Role::Player).action
            );
        }
    }

    #[test]
    fn record_action_feeds_the_history() {
        let mut scout = ScoutPolicy::new(42);
        scout.record_action(Button::Up);
        scout.record_action(Button::A);
        assert_eq!(scout.history().len(), 2);
        assert_eq!(scout.history().last(), Some(Button::A));
    }
}
