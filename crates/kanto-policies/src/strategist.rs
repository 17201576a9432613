//! The methodical, history-aware policy.

use kanto_types::{Button, GameState, PolicyKind, Role};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::history::ActionHistory;
use crate::policy::{Decision, Policy};

/// Chance (percent) of a deliberate interaction in the overworld.
const INTERACT_CHANCE_PCT: u32 = 25;
/// Lead HP threshold (percent) below which a switch is considered.
const SWITCH_HP_PCT: u32 = 20;
/// Chance (percent) of browsing the move list before committing.
const BROWSE_MOVES_PCT: u32 = 40;

/// Methodical navigator: keeps moving with purpose, never immediately
/// retraces its last directional move, and weighs retreats in battle
/// against the state of the bench.
pub struct StrategistPolicy {
    rng: StdRng,
    history: ActionHistory,
}

impl StrategistPolicy {
    /// Creates a strategist with a fixed random stream.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            history: ActionHistory::new(),
        }
    }

    /// Directions minus the one that would undo the last recorded move.
    fn forward_directions(&self) -> Vec<Button> {
        let backtrack = self.history.last().and_then(Button::opposite);
        Button::DIRECTIONS
            .iter()
            .copied()
            .filter(|&direction| Some(direction) != backtrack)
            .collect()
    }

    fn decide_as_player(&mut self, state: &GameState) -> Decision {
        if state.team.is_empty() {
            return Decision {
                action: Button::A,
                rationale: "Opening the session and confirming through the intro.".to_string(),
            };
        }
        let roll: u32 = self.rng.random_range(0..100);
        if roll < INTERACT_CHANCE_PCT {
            return Decision {
                action: Button::A,
                rationale: "Checking this spot before moving on.".to_string(),
            };
        }
        let candidates = self.forward_directions();
        let idx: usize = self.rng.random_range(0..candidates.len());
        let direction = candidates.get(idx).copied().unwrap_or(Button::Up);
        Decision {
            action: direction,
            rationale: format!("Heading {direction}; no point retracing the last step."),
        }
    }

    fn decide_in_battle(&mut self, state: &GameState) -> Decision {
        let Some(lead) = state.lead() else {
            return Decision {
                action: Button::A,
                rationale: "No party data to plan around, confirming with A.".to_string(),
            };
        };
        if lead.hp_below_percent(SWITCH_HP_PCT) && state.has_healthy_reserve() {
            return Decision {
                action: Button::B,
                rationale: format!(
                    "{} is fading and the bench is healthy, lining up a switch.",
                    lead.name
                ),
            };
        }
        let roll: u32 = self.rng.random_range(0..100);
        if roll < BROWSE_MOVES_PCT {
            return Decision {
                action: Button::Down,
                rationale: "Scanning the move list for the right answer.".to_string(),
            };
        }
        Decision {
            action: Button::A,
            rationale: "Committing to the strongest move.".to_string(),
        }
    }
}

impl Policy for StrategistPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Strategist
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
    use kanto_types::{ScreenContext, TeamMember};

    use super::*;

    fn member(name: &str, hp: u32, max_hp: u32) -> TeamMember {
        TeamMember {
            name: name.to_string(),
            level: 10,
            hp,
            max_hp,
        }
    }

    fn state_with_team(team: Vec<TeamMember>) -> GameState {
        GameState {
            location: "VIRIDIAN FOREST".to_string(),
            badges: 0,
            money: 2500,
            team,
            items: vec![],
            context: ScreenContext::Overworld,
        }
    }

    #[test]
    fn directional_moves_never_immediately_reverse() {
        let mut strategist = StrategistPolicy::new(42);
        let state = state_with_team(vec![member("SQUIRTLE", 20, 20)]);

        let mut previous: Option<Button> = None;
        for _ in 0..200 {
            let decision = strategist.decide(&state, None, Role::Player);
            strategist.record_action(decision.action);

            if let Some(reverse) = previous.and_then(Button::opposite) {
                assert_ne!(
                    decision.action, reverse,
                    "undid the previous move with {}",
                    decision.action
                );
            }
            previous = Some(decision.action);
        }
    }

    #[test]
    fn fading_lead_with_healthy_bench_lines_up_a_switch() {
        let mut strategist = StrategistPolicy::new(42);
        let state = state_with_team(vec![
            member("SQUIRTLE", 3, 20),
            member("PIDGEY", 18, 20),
        ]);
        let decision = strategist.decide(&state, None, Role::Pokemon);
        assert_eq!(decision.action, Button::B);
        assert!(decision.rationale.contains("SQUIRTLE"));
    }

    #[test]
    fn fading_lead_without_a_bench_fights_on() {
        let mut strategist = StrategistPolicy::new(42);
        let state = state_with_team(vec![member("SQUIRTLE", 3, 20)]);
        for _ in 0..50 {
            let decision = strategist.decide(&state, None, Role::Pokemon);
            assert_ne!(decision.action, Button::B);
        }
    }

    #[test]
    fn battle_play_mixes_browsing_and_attacking() {
        let mut strategist = StrategistPolicy::new(42);
        let state = state_with_team(vec![member("SQUIRTLE", 20, 20)]);

        let mut browsed = false;
        let mut attacked = false;
        for _ in 0..100 {
            let action = strategist.decide(&state, None, Role::Pokemon).action;
            assert!(
                matches!(action, Button::Down | Button::A),
                "unexpected battle action {action}"
            );
            if action == Button::Down {
                browsed = true;
            } else {
                attacked = true;
            }
        }
        assert!(browsed);
        assert!(attacked);
    }

    #[test]
    fn empty_team_confirms_through_the_intro() {
        let mut strategist = StrategistPolicy::new(42);
        let state = state_with_team(vec![]);
        assert_eq!(
            strategist.decide(&state, None, Role::Player).action,
            Button::A
        );
    }
}
