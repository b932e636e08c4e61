#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn controller that drives a world and broadcasts every settled turn.

use std::fmt;

use wordgrid_core::{Command, Event};
use wordgrid_world::{self as world, query, SettleError, World};

/// Receives the settled grid after every turn.
pub trait Observer {
    /// Called once per completed turn with read-only access to the world.
    fn settled(&mut self, world: &World);
}

impl<F> Observer for F
where
    F: FnMut(&World),
{
    fn settled(&mut self, world: &World) {
        self(world);
    }
}

/// Owns a world and the observers interested in it.
pub struct Session {
    world: World,
    observers: Vec<Box<dyn Observer>>,
}

impl Session {
    /// Wraps a freshly loaded world. No turn runs until [`Session::start`].
    #[must_use]
    pub fn new(world: World) -> Self {
        Self {
            world,
            observers: Vec::new(),
        }
    }

    /// Adds an observer; observers are notified in registration order.
    pub fn register(&mut self, observer: impl Observer + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Settles the loaded grid once so its sentences take effect.
    pub fn start(&mut self) -> Result<Vec<Event>, SettleError> {
        log::info!("starting `{}`", query::level_name(&self.world));
        let mut events = Vec::new();
        self.settle(&mut events)?;
        Ok(events)
    }

    /// Applies one command, settles the turn and notifies every observer.
    ///
    /// Returns the events emitted during the turn so adapters can act on
    /// delegated requests such as saving.
    pub fn manage_input(&mut self, command: Command) -> Result<Vec<Event>, SettleError> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.settle(&mut events)?;
        Ok(events)
    }

    /// Read-only access to the driven world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Reports whether the game reached its terminal state.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        query::is_game_over(&self.world)
    }

    fn settle(&mut self, events: &mut Vec<Event>) -> Result<(), SettleError> {
        world::settle(&mut self.world, events)?;
        for observer in &mut self.observers {
            observer.settled(&self.world);
        }
        Ok(())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("world", &self.world)
            .field("observers", &self.observers.len())
            .finish()
    }
}
