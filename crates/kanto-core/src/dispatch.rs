//! Mode and role dispatch.
//!
//! The [`ControlBoard`] decides which policy answers a given request.
//! Resolution is a pure function of the configured mode and the screen
//! context of the state snapshot, evaluated fresh on every decision and
//! never cached:
//!
//! - dual mode routes battles to the pokemon slot and everything else to
//!   the player slot
//! - single mode routes everything to the player slot, with the role
//!   still tracking whether a battle is on screen
//!
//! One instance exists per registered policy kind. When both slots name
//! the same kind they alias the same instance and therefore the same
//! action history. All board state sits behind a single async mutex, so
//! a decision can never observe a half-applied reconfiguration.

use std::collections::BTreeMap;

use kanto_policies::{Policy, build_policy};
use kanto_types::{Button, EffectiveControls, GameState, Mode, PolicyKind, Role, ScreenContext};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// A decision with its attribution, ready for execution and commentary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributedDecision {
    /// The button to press.
    pub action: Button,
    /// Rationale with the attribution prefix applied.
    pub commentary: String,
    /// The policy kind that decided.
    pub policy: PolicyKind,
    /// The role the policy acted under.
    pub role: Role,
}

/// Partial controls change applied atomically by
/// [`ControlBoard::apply`]. `None` fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlsUpdate {
    /// New player slot assignment, if changing.
    pub player_policy: Option<PolicyKind>,
    /// New pokemon slot assignment, if changing.
    pub pokemon_policy: Option<PolicyKind>,
    /// New control mode, if changing.
    pub mode: Option<Mode>,
}

struct BoardInner {
    mode: Mode,
    player_slot: PolicyKind,
    pokemon_slot: PolicyKind,
    instances: BTreeMap<PolicyKind, Box<dyn Policy>>,
    active_label: String,
    seed: u64,
}

impl BoardInner {
    /// Which slot and role handle a request in this configuration.
    const fn resolve(&self, context: ScreenContext) -> (PolicyKind, Role) {
        let in_battle = context.is_battle();
        match self.mode {
            Mode::Dual => {
                if in_battle {
                    (self.pokemon_slot, Role::Pokemon)
                } else {
                    (self.player_slot, Role::Player)
                }
            }
            Mode::Single => {
                if in_battle {
                    (self.player_slot, Role::Pokemon)
                } else {
                    (self.player_slot, Role::Player)
                }
            }
        }
    }

    /// Attribution prefix for a decision made by `kind` under `role`.
    fn prefix(&self, kind: PolicyKind, role: Role) -> String {
        let name = kind.display_name();
        match (self.mode, role) {
            (Mode::Dual, Role::Pokemon) => format!("[{name} as Pok\u{e9}mon] "),
            (Mode::Dual, Role::Player) => format!("[{name} as Trainer] "),
            (Mode::Single, Role::Pokemon) => format!("[{name} in Battle] "),
            (Mode::Single, Role::Player) => format!("[{name}] "),
        }
    }

    /// Registers an instance for `kind` if none exists yet.
    fn ensure_registered(&mut self, kind: PolicyKind) {
        let seed = self.seed;
        self.instances
            .entry(kind)
            .or_insert_with(|| build_policy(kind, seed));
    }

    fn controls(&self) -> EffectiveControls {
        EffectiveControls {
            mode: self.mode,
            player_policy: self.player_slot,
            pokemon_policy: self.pokemon_slot,
            active_policy: self.active_label.clone(),
        }
    }
}

/// Serialized policy dispatch state.
///
/// Every operation takes the same internal mutex, so decisions,
/// reconfigurations, and readbacks are totally ordered with respect to
/// each other.
pub struct ControlBoard {
    inner: Mutex<BoardInner>,
}

impl ControlBoard {
    /// Creates a board with both slots assigned and their instances
    /// registered. `seed` fixes every instance's random stream.
    pub fn new(player: PolicyKind, pokemon: PolicyKind, mode: Mode, seed: u64) -> Self {
        let mut inner = BoardInner {
            mode,
            player_slot: player,
            pokemon_slot: pokemon,
            instances: BTreeMap::new(),
            active_label: String::new(),
            seed,
        };
        inner.ensure_registered(player);
        inner.ensure_registered(pokemon);
        Self {
            inner: Mutex::new(inner),
        }
    }

    // -----------------------------------------------------------------------
    // Decisions
    // -----------------------------------------------------------------------

    /// Resolves the active policy for `state`, asks it to decide, and
    /// records the chosen action into that instance's history.
    ///
    /// The returned commentary carries the attribution prefix for the
    /// mode and role the decision was made under.
    pub async fn decide(&self, state: &GameState, screen: Option<&[u8]>) -> AttributedDecision {
        let mut inner = self.inner.lock().await;
        let (kind, role) = inner.resolve(state.context);
        let prefix = inner.prefix(kind, role);
        inner.active_label = active_label(kind, role);

        let seed = inner.seed;
        let decision = {
            let instance = inner
                .instances
                .entry(kind)
                .or_insert_with(|| build_policy(kind, seed));
            let decision = instance.decide(state, screen, role);
            instance.record_action(decision.action);
            decision
        };

        debug!(
            policy = %kind,
            role = %role,
            action = %decision.action,
            context = %state.context,
            "Decision dispatched"
        );

        AttributedDecision {
            action: decision.action,
            commentary: format!("{prefix}{}", decision.rationale),
            policy: kind,
            role,
        }
    }

    /// Recomputes and stores the active-policy label for `context`.
    ///
    /// The simulation loop calls this on every state refresh so
    /// broadcast payloads carry the label that would answer a request
    /// right now.
    pub async fn resolve_label(&self, context: ScreenContext) -> String {
        let mut inner = self.inner.lock().await;
        let (kind, role) = inner.resolve(context);
        inner.active_label = active_label(kind, role);
        inner.active_label.clone()
    }

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------

    /// Assigns the player slot. Effective from the next decision.
    pub async fn set_player_policy(&self, kind: PolicyKind) {
        let mut inner = self.inner.lock().await;
        inner.ensure_registered(kind);
        inner.player_slot = kind;
        info!(policy = %kind, "Player slot assigned");
    }

    /// Assigns the pokemon slot. Effective from the next decision.
    pub async fn set_pokemon_policy(&self, kind: PolicyKind) {
        let mut inner = self.inner.lock().await;
        inner.ensure_registered(kind);
        inner.pokemon_slot = kind;
        info!(policy = %kind, "Pokemon slot assigned");
    }

    /// Switches the control mode. Effective from the next decision.
    pub async fn set_mode(&self, mode: Mode) {
        let mut inner = self.inner.lock().await;
        inner.mode = mode;
        info!(mode = %mode, "Control mode set");
    }

    /// Applies a partial update under one lock hold and returns the
    /// effective configuration.
    ///
    /// A concurrent decision observes either the configuration from
    /// before this call or the one after it, never a mixture.
    pub async fn apply(&self, update: ControlsUpdate) -> EffectiveControls {
        let mut inner = self.inner.lock().await;
        if let Some(kind) = update.player_policy {
            inner.ensure_registered(kind);
            inner.player_slot = kind;
        }
        if let Some(kind) = update.pokemon_policy {
            inner.ensure_registered(kind);
            inner.pokemon_slot = kind;
        }
        if let Some(mode) = update.mode {
            inner.mode = mode;
        }
        let controls = inner.controls();
        info!(
            mode = %controls.mode,
            player = %controls.player_policy,
            pokemon = %controls.pokemon_policy,
            "Controls updated"
        );
        controls
    }

    /// Consistent snapshot of the current configuration.
    pub async fn controls(&self) -> EffectiveControls {
        self.inner.lock().await.controls()
    }

    /// History length of the instance registered for `kind`, 0 when the
    /// kind has never been registered.
    pub async fn history_len(&self, kind: PolicyKind) -> usize {
        let inner = self.inner.lock().await;
        inner
            .instances
            .get(&kind)
            .map_or(0, |instance| instance.history().len())
    }
}

/// Broadcast label for the resolved policy, e.g. `"Scout (player)"`.
fn active_label(kind: PolicyKind, role: Role) -> String {
    format!("{} ({})", kind.display_name(), role.label())
}
