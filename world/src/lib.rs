#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative engine state for a word grid level.
//!
//! Adapters feed [`Command`]s through [`apply`], then call [`settle`] to run
//! the turn: permanent rules to a fixed point, sentence derivation, and the
//! derived rules to a fixed point. Everything an adapter may read lives in
//! [`query`].

use std::fmt;

use thiserror::Error;
use wordgrid_core::{Command, EntityKind, Event, Grid, RuleTarget, Sentence};
use wordgrid_system_rules::{
    default_pass_limit, permanent_rules, run_to_fixed_point, PassLimitExceeded, PlayState, Rule,
    RuleCatalog,
};

/// Tunables for the per-turn fixed-point loops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SettleConfig {
    /// Maximum passes per fixed point; derived from the grid when `None`.
    pub pass_limit: Option<usize>,
}

impl SettleConfig {
    fn limit_for(&self, entity_count: usize, rule_count: usize) -> usize {
        self.pass_limit
            .unwrap_or_else(|| default_pass_limit(entity_count, rule_count))
    }
}

/// Fixed point a turn was running when it failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Rules in force regardless of the grid's sentences.
    Permanent,
    /// Rules derived from the grid's sentences this turn.
    Active,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Permanent => "permanent",
            Self::Active => "active",
        })
    }
}

/// Invariant violations that abort a turn.
///
/// Neither can happen with a well-formed catalog; callers treat both as fatal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SettleError {
    /// A derived sentence had no counterpart in the rule catalog.
    #[error("no catalog rule for derived sentence `{subject} is {target}`")]
    MissingRule {
        /// Subject of the sentence.
        subject: EntityKind,
        /// Target of the sentence.
        target: RuleTarget,
    },
    /// A fixed point kept reporting changes past its pass limit.
    #[error("{phase} rules did not settle within {passes} passes")]
    FixedPointDiverged {
        /// Fixed point that diverged.
        phase: Phase,
        /// Passes run before giving up.
        passes: usize,
    },
}

/// Represents the state of a loaded level.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    initial: Grid,
    catalog: RuleCatalog,
    permanent: Vec<Rule>,
    active: Vec<Rule>,
    sentences: Vec<Sentence>,
    play: PlayState,
    config: SettleConfig,
}

impl World {
    /// Creates a world from a loaded grid, remembering it as the reset snapshot.
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        Self::with_config(grid, SettleConfig::default())
    }

    /// Creates a world with explicit settle tunables.
    #[must_use]
    pub fn with_config(grid: Grid, config: SettleConfig) -> Self {
        log::debug!(
            "world for `{}` ({}) holds {} entities",
            grid.level_name(),
            grid.size(),
            grid.entities().len()
        );
        Self {
            initial: grid.clone(),
            grid,
            catalog: RuleCatalog::build(),
            permanent: permanent_rules(),
            active: Vec::new(),
            sentences: Vec::new(),
            play: PlayState::new(),
            config,
        }
    }
}

/// Applies the provided command to the world.
///
/// Commands arriving after the game ended are ignored.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.play.is_game_over() {
        log::debug!("ignoring {command:?}: game over");
        return;
    }

    world.grid.reset_directions();
    match command {
        Command::Up | Command::Down | Command::Left | Command::Right => {
            let Some(direction) = command.direction() else {
                return;
            };
            let Some(kind) = world.play.player() else {
                log::debug!("ignoring {command:?}: nobody is you");
                return;
            };

            let size = world.grid.size();
            let mut moved = 0;
            for entity in world.grid.entities_mut().iter_mut() {
                if entity.kind() == kind && entity.can_move(direction, size) {
                    entity.step(direction);
                    moved += 1;
                }
            }
            out_events.push(Event::PlayerMoved {
                kind,
                direction,
                moved,
            });
        }
        Command::Reset => {
            world.grid = world.initial.clone();
            log::info!("reset `{}`", world.grid.level_name());
            out_events.push(Event::GridReset);
        }
        Command::Save => out_events.push(Event::SaveRequested),
        Command::Quit => {
            world.play.end_game();
            out_events.push(Event::QuitRequested);
        }
        Command::None => {}
    }
}

/// Runs one turn until the grid is stable.
///
/// Emits the sentences derived this turn, [`Event::GameWon`] when a win
/// condition was met, and finally [`Event::Settled`]. Once the game is over
/// the grid is left untouched and only the settled event is emitted.
pub fn settle(world: &mut World, out_events: &mut Vec<Event>) -> Result<(), SettleError> {
    let World {
        grid,
        catalog,
        permanent,
        active,
        sentences,
        play,
        config,
        ..
    } = world;

    if !play.is_game_over() {
        play.begin_turn();
        let size = grid.size();

        let limit = config.limit_for(grid.entities().len(), permanent.len());
        let passes = run_to_fixed_point(permanent, grid.entities_mut(), size, play, limit)
            .map_err(|exceeded| diverged(Phase::Permanent, exceeded))?;
        log::trace!("permanent rules settled after {passes} passes");

        sentences.clear();
        wordgrid_system_derivation::derive(grid.entities(), sentences);
        active.clear();
        for sentence in sentences.iter() {
            let Some(rule) = catalog.lookup(*sentence) else {
                log::error!("derived `{sentence}` is missing from the rule catalog");
                return Err(SettleError::MissingRule {
                    subject: sentence.subject,
                    target: sentence.target,
                });
            };
            active.push(rule);
        }
        out_events.push(Event::RulesDerived {
            sentences: sentences.clone(),
        });

        // Word pushes stay in force so a blocked chain of words unwinds.
        let in_force: Vec<Rule> = active.iter().chain(permanent.iter()).copied().collect();
        let limit = config.limit_for(grid.entities().len(), in_force.len());
        let passes = run_to_fixed_point(&in_force, grid.entities_mut(), size, play, limit)
            .map_err(|exceeded| diverged(Phase::Active, exceeded))?;
        log::debug!(
            "turn settled: {} rules, {passes} passes, player {:?}",
            in_force.len(),
            play.player()
        );

        if play.is_game_over() {
            out_events.push(Event::GameWon);
        }
    }

    out_events.push(Event::Settled {
        player: play.player(),
        game_over: play.is_game_over(),
    });
    Ok(())
}

fn diverged(phase: Phase, exceeded: PassLimitExceeded) -> SettleError {
    log::error!("{phase} fixed point diverged: {exceeded}");
    SettleError::FixedPointDiverged {
        phase,
        passes: exceeded.limit,
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use wordgrid_core::{Entity, EntityKind, Grid, GridSize, Position, Sentence};
    use wordgrid_system_rules::Rule;

    /// Provides read-only access to the current grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Entities in load order.
    #[must_use]
    pub fn entities(world: &World) -> &[Entity] {
        world.grid.entities()
    }

    /// Entities occupying `position`, in load order.
    pub fn entities_at(world: &World, position: Position) -> impl Iterator<Item = &Entity> + '_ {
        world
            .grid
            .entities()
            .iter()
            .filter(move |entity| entity.position() == position)
    }

    /// Dimensions of the grid.
    #[must_use]
    pub fn size(world: &World) -> GridSize {
        world.grid.size()
    }

    /// Name of the level the world was loaded from.
    #[must_use]
    pub fn level_name(world: &World) -> &str {
        world.grid.level_name()
    }

    /// Kind controlled by the player after the last turn.
    #[must_use]
    pub fn player(world: &World) -> Option<EntityKind> {
        world.play.player()
    }

    /// Reports whether the game reached its terminal state.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.play.is_game_over()
    }

    /// Sentences derived during the last turn, in scan order.
    #[must_use]
    pub fn sentences(world: &World) -> &[Sentence] {
        &world.sentences
    }

    /// Rules derived during the last turn, in the order they are applied.
    #[must_use]
    pub fn active_rules(world: &World) -> &[Rule] {
        &world.active
    }
}
