#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Rule behaviours that mutate the entity collection while a turn settles.
//!
//! Every rule is a `(subject, behaviour)` pair evaluated against the whole
//! entity collection. Rules report whether they caused a change that should
//! keep the fixed-point loop running; [`run_to_fixed_point`] drives a rule set
//! until a full pass reports nothing, and refuses to run past a pass limit.

mod catalog;

pub use catalog::{permanent_rules, RuleCatalog};

use thiserror::Error;
use wordgrid_core::{Effect, Entity, EntityKind, GridSize, Position, RuleTarget, Sentence};

/// What a rule does to the entities of its subject kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Behavior {
    /// Hands player control to the subject kind.
    You,
    /// Reverts anything that moved into a subject's cell.
    Stop,
    /// Propagates motion into subject entities, or reverts the mover.
    Push,
    /// Ends the game when a player entity shares a cell with the subject.
    Win,
    /// Removes every other kind sharing a cell with the subject.
    Kill,
    /// Removes every other kind sharing a cell with the subject, and the subject.
    Sink,
    /// Turns every subject entity into the provided kind.
    Become(EntityKind),
}

/// A behaviour bound to the kind it applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rule {
    subject: EntityKind,
    behavior: Behavior,
}

impl Rule {
    /// Creates a rule from its parts.
    #[must_use]
    pub const fn new(subject: EntityKind, behavior: Behavior) -> Self {
        Self { subject, behavior }
    }

    /// Builds the rule a sentence stands for.
    #[must_use]
    pub const fn for_sentence(sentence: Sentence) -> Self {
        let behavior = match sentence.target {
            RuleTarget::Effect(effect) => match effect {
                Effect::You => Behavior::You,
                Effect::Stop => Behavior::Stop,
                Effect::Push => Behavior::Push,
                Effect::Win => Behavior::Win,
                Effect::Kill => Behavior::Kill,
                Effect::Sink => Behavior::Sink,
            },
            RuleTarget::Become(kind) => Behavior::Become(kind),
        };
        Self::new(sentence.subject, behavior)
    }

    /// Kind the rule applies to.
    #[must_use]
    pub const fn subject(&self) -> EntityKind {
        self.subject
    }

    /// Behaviour the rule performs.
    #[must_use]
    pub const fn behavior(&self) -> Behavior {
        self.behavior
    }

    /// Applies the rule once over every entity.
    ///
    /// Returns `true` when the rule caused a change that other rules may need
    /// to react to. Stop, Kill, Sink, Win and Become never report; their
    /// effects are still visible to every later application.
    pub fn apply(&self, entities: &mut Vec<Entity>, size: GridSize, state: &mut PlayState) -> bool {
        match self.behavior {
            Behavior::You => state.claim_player(self.subject),
            Behavior::Stop => stop(self.subject, entities),
            Behavior::Push => push(self.subject, entities, size),
            Behavior::Win => win(self.subject, entities, state),
            Behavior::Kill => kill(self.subject, entities),
            Behavior::Sink => sink(self.subject, entities),
            Behavior::Become(target) => transform(self.subject, target, entities),
        }
    }
}

/// Player identity and game-over flag shared by every rule of a world.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayState {
    player: Option<EntityKind>,
    game_over: bool,
    claims: Vec<EntityKind>,
}

impl PlayState {
    /// Creates a state with no player and the game running.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Kind currently controlled by the player.
    #[must_use]
    pub const fn player(&self) -> Option<EntityKind> {
        self.player
    }

    /// Reports whether the game reached its terminal state.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Forgets the player identity and the claims made during the previous turn.
    pub fn begin_turn(&mut self) {
        self.player = None;
        self.claims.clear();
    }

    /// Moves the game into its terminal state.
    pub fn end_game(&mut self) {
        self.game_over = true;
    }

    /// Hands player control to `kind`.
    ///
    /// Returns `true` only the first time `kind` takes control during a turn,
    /// so competing `You` rules settle instead of trading control forever.
    pub fn claim_player(&mut self, kind: EntityKind) -> bool {
        if self.player == Some(kind) {
            return false;
        }
        self.player = Some(kind);
        if self.claims.contains(&kind) {
            return false;
        }
        self.claims.push(kind);
        true
    }
}

/// Error returned when a rule set keeps reporting changes past its pass limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("rules did not settle within {limit} passes")]
pub struct PassLimitExceeded {
    /// Number of passes that were allowed.
    pub limit: usize,
}

/// Pass limit used when none is configured.
///
/// Every reporting pass either moves an entity that had not moved this turn,
/// reverts an entity that was not yet held, or records a first `You` claim,
/// so a settled turn never needs more than `2 * entities + rules + 1` passes.
#[must_use]
pub fn default_pass_limit(entity_count: usize, rule_count: usize) -> usize {
    entity_count
        .saturating_add(rule_count)
        .saturating_mul(2)
        .saturating_add(2)
}

/// Applies every rule in order, pass after pass, until a pass reports no change.
///
/// Returns the number of passes run. A `limit` of zero rejects every rule set.
pub fn run_to_fixed_point(
    rules: &[Rule],
    entities: &mut Vec<Entity>,
    size: GridSize,
    state: &mut PlayState,
    limit: usize,
) -> Result<usize, PassLimitExceeded> {
    let mut passes = 0;
    loop {
        if passes == limit {
            return Err(PassLimitExceeded { limit });
        }
        passes += 1;

        let mut changed = false;
        for rule in rules {
            changed |= rule.apply(entities, size, state);
        }
        if !changed {
            return Ok(passes);
        }
    }
}

fn cells_of(subject: EntityKind, entities: &[Entity]) -> Vec<Position> {
    entities
        .iter()
        .filter(|entity| entity.kind() == subject)
        .map(Entity::position)
        .collect()
}

fn stop(subject: EntityKind, entities: &mut [Entity]) -> bool {
    for cell in cells_of(subject, entities) {
        for entity in entities.iter_mut() {
            if entity.position() == cell && entity.kind() != subject && entity.is_entering() {
                log::trace!("{} stopped by {subject} at {cell}", entity.kind());
                entity.revert();
            }
        }
    }
    false
}

fn push(subject: EntityKind, entities: &mut [Entity], size: GridSize) -> bool {
    let mut changed = false;
    for index in 0..entities.len() {
        if entities[index].kind() != subject {
            continue;
        }
        let cell = entities[index].position();
        let Some(mover) = entities
            .iter()
            .enumerate()
            .position(|(other, entity)| {
                other != index && entity.position() == cell && entity.is_entering()
            })
        else {
            continue;
        };

        let direction = entities[mover].direction();
        let pushed = &mut entities[index];
        if !pushed.has_moved() && pushed.can_move(direction, size) {
            log::trace!("{subject} at {cell} pushed {direction:?}");
            pushed.step(direction);
        } else {
            log::trace!("{subject} at {cell} blocked {}", entities[mover].kind());
            entities[mover].revert();
        }
        changed = true;
    }
    changed
}

fn win(subject: EntityKind, entities: &[Entity], state: &mut PlayState) -> bool {
    let Some(player) = state.player() else {
        return false;
    };
    let reached = entities
        .iter()
        .filter(|entity| entity.kind() == player)
        .any(|avatar| {
            entities
                .iter()
                .any(|goal| goal.kind() == subject && goal.position() == avatar.position())
        });
    if reached && !state.is_game_over() {
        log::info!("{player} reached {subject}");
        state.end_game();
    }
    false
}

fn kill(subject: EntityKind, entities: &mut Vec<Entity>) -> bool {
    let deadly = cells_of(subject, entities);
    if deadly.is_empty() {
        return false;
    }

    let before = entities.len();
    entities.retain(|entity| entity.kind() == subject || !deadly.contains(&entity.position()));
    if entities.len() != before {
        log::trace!("{subject} killed {} entities", before - entities.len());
    }
    false
}

fn sink(subject: EntityKind, entities: &mut Vec<Entity>) -> bool {
    let mut doomed = vec![false; entities.len()];
    for (index, sinker) in entities.iter().enumerate() {
        if sinker.kind() != subject {
            continue;
        }
        for (other, victim) in entities.iter().enumerate() {
            if victim.kind() != subject && victim.position() == sinker.position() {
                doomed[other] = true;
                doomed[index] = true;
            }
        }
    }

    let removed = doomed.iter().filter(|flag| **flag).count();
    if removed > 0 {
        log::trace!("{subject} sank {removed} entities");
        let mut verdicts = doomed.into_iter();
        entities.retain(|_| !verdicts.next().unwrap_or(false));
    }
    false
}

fn transform(subject: EntityKind, target: EntityKind, entities: &mut [Entity]) -> bool {
    for entity in entities.iter_mut().filter(|entity| entity.kind() == subject) {
        entity.set_kind(target);
    }
    false
}
