//! Driver facade that pairs a [`World`] with an [`EventBus`].

use std::time::Duration;

use lane_defence_core::{Command, ConfigError, Event, EventBus, GameConfig, ListenerId};

use crate::{apply, query, World};

/// Owns a world and forwards every event it reports to subscribed listeners.
///
/// Events are published after the command that produced them has been fully
/// applied, so listeners always observe a settled world.
pub struct Simulation<'a> {
    world: World,
    bus: EventBus<'a>,
    events: Vec<Event>,
}

impl<'a> Simulation<'a> {
    /// Builds a simulation for the provided configuration.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            world: World::new(config)?,
            bus: EventBus::new(),
            events: Vec::new(),
        })
    }

    /// Registers a listener for every event published from now on.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&Event) + 'a,
    {
        self.bus.subscribe(listener)
    }

    /// Detaches a listener; returns `false` when it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Applies `command` and publishes the resulting events.
    ///
    /// The returned slice holds the events of this command only.
    pub fn submit(&mut self, command: Command) -> &[Event] {
        self.events.clear();
        apply(&mut self.world, command, &mut self.events);
        self.bus.publish_all(&self.events);
        &self.events
    }

    /// Advances the simulation by `dt`, clamped to the maximum tick length.
    pub fn advance(&mut self, dt: Duration) -> &[Event] {
        self.submit(Command::Tick { dt })
    }

    /// Whether the game has neither been won nor lost.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !query::phase(&self.world).is_terminal()
    }

    /// Read-only access to the simulated world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }
}

impl std::fmt::Debug for Simulation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("world", &self.world)
            .field("listeners", &self.bus.listener_count())
            .finish()
    }
}
