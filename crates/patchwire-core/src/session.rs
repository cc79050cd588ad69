//! One editing session: modules, connections, playback, and UI intents.
//!
//! [`GraphSession`] bundles the [`ModuleRegistry`], [`ConnectionGraph`], and
//! [`PlaybackController`] so their invariants hold together: removing a
//! module severs its edges first, connecting while playing realizes the
//! route, and loading a document can start playback only after every edge
//! exists. UI and persistence code borrow the session; there is no global
//! instance.

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

use crate::error::{GraphError, PartialStartFailure};
use crate::graph::{Connection, ConnectionGraph};
use crate::module::{Module, ModuleFactory, ModuleId, Position};
use crate::note::Note;
use crate::param::ParamValue;
use crate::playback::{PlaybackController, PlaybackState};
use crate::registry::ModuleRegistry;
use crate::signal::{Direction, SignalEvent, SignalKind};

/// The loose end of a wire being dragged on the canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingWire {
    /// Module the drag started on.
    pub module: ModuleId,
    /// Port index the drag started on.
    pub port: usize,
    /// Side of the module the port is on.
    pub direction: Direction,
}

/// A live editing session.
#[derive(Debug)]
pub struct GraphSession {
    registry: ModuleRegistry,
    graph: ConnectionGraph,
    playback: PlaybackController,
    pending_wire: Option<PendingWire>,
}

impl GraphSession {
    /// Opens an empty, stopped session whose modules come from `factory`.
    pub fn open(factory: impl ModuleFactory + 'static) -> Self {
        Self {
            registry: ModuleRegistry::new(factory),
            graph: ConnectionGraph::new(),
            playback: PlaybackController::new(),
            pending_wire: None,
        }
    }

    /// Stops playback and drops every module.
    pub fn close(mut self) {
        self.clear();
    }

    /// Stops playback and removes every module and connection. Identifiers
    /// allocated later still never repeat earlier ones.
    pub fn clear(&mut self) {
        self.playback.stop(&mut self.registry, &mut self.graph);
        self.graph.clear();
        self.registry.clear();
        self.pending_wire = None;
    }

    // --- modules ---

    /// Creates a module of `kind` at `(x, y)`.
    ///
    /// New modules stay stopped until the next [`start`](Self::start), even
    /// while the session is playing.
    pub fn create_module(&mut self, kind: &str, x: f64, y: f64) -> Result<ModuleId, GraphError> {
        self.registry.create(kind, x, y)
    }

    /// Creates a module under a caller-chosen identifier.
    pub fn restore_module(
        &mut self,
        id: ModuleId,
        kind: &str,
        x: f64,
        y: f64,
    ) -> Result<(), GraphError> {
        self.registry.restore(id, kind, x, y)
    }

    /// Registers an already constructed module.
    pub fn insert_module(&mut self, module: Box<dyn Module>, x: f64, y: f64) -> ModuleId {
        self.registry.insert(module, x, y)
    }

    /// Removes a module after severing every edge touching it. Returns the
    /// severed edges; removing an absent module returns none.
    pub fn remove_module(&mut self, id: &ModuleId) -> Vec<Connection> {
        if !self.registry.contains(id) {
            return Vec::new();
        }
        let severed = self.graph.remove_module(&mut self.registry, id);
        if let Some(mut module) = self.registry.remove(id) {
            module.stop();
        }
        if self
            .pending_wire
            .as_ref()
            .is_some_and(|wire| wire.module == *id)
        {
            self.pending_wire = None;
        }
        severed
    }

    /// Looks up a module.
    pub fn module(&self, id: &ModuleId) -> Result<&dyn Module, GraphError> {
        self.registry.get(id)
    }

    /// Validates and applies a parameter value.
    pub fn set_parameter(
        &mut self,
        id: &ModuleId,
        name: &str,
        value: ParamValue,
    ) -> Result<(), GraphError> {
        self.registry
            .get_mut(id)?
            .set_parameter(name, value)
            .map_err(|error| GraphError::InvalidParameter {
                module: id.clone(),
                error,
            })
    }

    /// Moves a module on the canvas.
    pub fn move_module(&mut self, id: &ModuleId, x: f64, y: f64) -> Result<(), GraphError> {
        self.registry.set_position(id, x, y)
    }

    /// Canvas position of a module.
    pub fn position(&self, id: &ModuleId) -> Result<Position, GraphError> {
        self.registry.position(id)
    }

    // --- connections ---

    /// Validates and stores an edge; realizes it at once when playing.
    pub fn connect(&mut self, connection: Connection) -> Result<Connection, GraphError> {
        let playing = self.playback.is_playing();
        self.graph.connect(&mut self.registry, connection, playing)
    }

    /// Removes an edge. Returns `false` if it did not exist.
    pub fn disconnect(&mut self, connection: &Connection) -> bool {
        self.graph.disconnect(&mut self.registry, connection)
    }

    /// Edges with `id` at either end.
    pub fn edges_touching(&self, id: &ModuleId) -> Vec<Connection> {
        self.graph.edges_touching(id)
    }

    /// All edges in insertion order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.graph.edges()
    }

    /// Whether an edge's route is live.
    pub fn is_realized(&self, connection: &Connection) -> bool {
        self.graph.is_realized(connection)
    }

    // --- playback ---

    /// Starts every module and realizes every edge.
    pub fn start(&mut self) -> Result<(), PartialStartFailure> {
        self.playback.start(&mut self.registry, &mut self.graph)
    }

    /// Tears down every route and stops every module.
    pub fn stop(&mut self) {
        self.playback.stop(&mut self.registry, &mut self.graph);
    }

    /// Flips between playing and stopped.
    pub fn toggle(&mut self) -> Result<PlaybackState, PartialStartFailure> {
        self.playback.toggle(&mut self.registry, &mut self.graph)
    }

    /// Returns `true` while playing.
    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    /// Current playback state.
    pub fn state(&self) -> PlaybackState {
        self.playback.state()
    }

    /// Advances every started module's clock by `seconds` and delivers what
    /// they emit. Does nothing while stopped. Returns the number of event
    /// deliveries.
    pub fn advance(&mut self, seconds: f64) -> usize {
        if !self.is_playing() {
            return 0;
        }
        let ids: Vec<ModuleId> = self.registry.ids().cloned().collect();
        let mut delivered = 0;
        for id in ids {
            let Ok(module) = self.registry.get_mut(&id) else {
                continue;
            };
            if !module.is_playing() {
                continue;
            }
            let emissions = module.advance(seconds);
            delivered += self.graph.dispatch(&mut self.registry, &id, emissions);
        }
        delivered
    }

    // --- UI intents ---

    /// Presses `note` on a module's first trigger input.
    pub fn press_key(&mut self, id: &ModuleId, note: Note) -> Result<usize, GraphError> {
        self.trigger(
            id,
            SignalEvent::NoteOn {
                note,
                octave_shift: 0,
            },
        )
    }

    /// Releases whatever key is held on a module's first trigger input.
    pub fn release_key(&mut self, id: &ModuleId) -> Result<usize, GraphError> {
        self.trigger(id, SignalEvent::NoteOff)
    }

    fn trigger(&mut self, id: &ModuleId, event: SignalEvent) -> Result<usize, GraphError> {
        let module = self.registry.get_mut(id)?;
        let port = module
            .inputs()
            .iter()
            .position(|p| p.signal == SignalKind::Trigger)
            .ok_or_else(|| GraphError::NoTriggerInput(id.clone()))?;
        let emissions = module.receive(port, event);
        Ok(self.graph.dispatch(&mut self.registry, id, emissions))
    }

    /// Starts dragging a wire from a port.
    pub fn begin_wire(
        &mut self,
        id: &ModuleId,
        port: usize,
        direction: Direction,
    ) -> Result<(), GraphError> {
        self.registry.get(id)?;
        self.pending_wire = Some(PendingWire {
            module: id.clone(),
            port,
            direction,
        });
        Ok(())
    }

    /// Drops the dragged wire on a port of the opposite side and connects.
    ///
    /// The drag may start on either end; the edge always runs output to
    /// input. Returns `Ok(None)` when no drag was in progress.
    pub fn end_wire(&mut self, id: &ModuleId, port: usize) -> Result<Option<Connection>, GraphError> {
        let Some(wire) = self.pending_wire.take() else {
            return Ok(None);
        };
        let connection = match wire.direction {
            Direction::Output => Connection::new(wire.module, wire.port, id, port),
            Direction::Input => Connection::new(id, port, wire.module, wire.port),
        };
        self.connect(connection).map(Some)
    }

    /// Abandons the dragged wire.
    pub fn cancel_wire(&mut self) {
        self.pending_wire = None;
    }

    /// The wire being dragged, if any.
    pub fn pending_wire(&self) -> Option<&PendingWire> {
        self.pending_wire.as_ref()
    }

    // --- collaborators ---

    /// Read access to the modules.
    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Read access to the edges.
    pub fn graph(&self) -> &ConnectionGraph {
        &self.graph
    }
}
