//! Edge storage, legality checks, route realization, and event delivery.

#[cfg(not(feature = "std"))]
use alloc::{collections::VecDeque, vec::Vec};
#[cfg(feature = "std")]
use std::collections::VecDeque;

use super::edge::Connection;
use crate::error::{GraphError, PortMismatch};
use crate::module::ModuleId;
use crate::registry::ModuleRegistry;
use crate::signal::{Emission, SignalKind};

/// Longest chain of module-to-module forwarding one emission may cause.
///
/// Feedback loops (A drives B drives A) are legal topology; this bound keeps
/// event delivery through them finite.
pub const MAX_EVENT_HOPS: usize = 64;

#[derive(Debug, Clone)]
struct EdgeEntry {
    connection: Connection,
    /// Signal kind of the destination input.
    signal: SignalKind,
    /// Signal kind of the source output.
    source: SignalKind,
    realized: bool,
}

/// The set of directed edges between module ports.
///
/// Holds module identifiers only; modules are looked up in the
/// [`ModuleRegistry`] passed to each operation. Edges keep insertion order,
/// which is also the order events fan out in.
#[derive(Debug, Default)]
pub struct ConnectionGraph {
    edges: Vec<EdgeEntry>,
}

impl ConnectionGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks that `connection` could be stored, returning the destination
    /// input's signal kind.
    ///
    /// Order of checks: both modules exist, no self-loop, output port
    /// exists, input port exists, signal kinds compatible.
    pub fn validate(
        registry: &ModuleRegistry,
        connection: &Connection,
    ) -> Result<SignalKind, GraphError> {
        Self::port_kinds(registry, connection).map(|(_, input)| input)
    }

    /// Output and input signal kinds of a legal connection.
    fn port_kinds(
        registry: &ModuleRegistry,
        connection: &Connection,
    ) -> Result<(SignalKind, SignalKind), GraphError> {
        let src = registry.get(&connection.from)?;
        let dst = registry.get(&connection.to)?;
        if connection.from == connection.to {
            return Err(GraphError::SelfConnection(connection.from.clone()));
        }

        let mismatch = |reason: PortMismatch| GraphError::PortTypeMismatch {
            connection: connection.clone(),
            reason,
        };
        let output = src
            .output_signal(connection.from_port)
            .ok_or_else(|| {
                mismatch(PortMismatch::MissingOutput {
                    port: connection.from_port,
                    available: src.outputs().len(),
                })
            })?;
        let input = dst.input_signal(connection.to_port).ok_or_else(|| {
            mismatch(PortMismatch::MissingInput {
                port: connection.to_port,
                available: dst.inputs().len(),
            })
        })?;
        if !output.can_drive(input) {
            return Err(mismatch(PortMismatch::Incompatible { output, input }));
        }
        Ok((output, input))
    }

    /// Stores an edge, realizing it immediately when `playing`.
    ///
    /// Connecting an edge that already exists is a no-op returning the
    /// stored descriptor.
    pub fn connect(
        &mut self,
        registry: &mut ModuleRegistry,
        connection: Connection,
        playing: bool,
    ) -> Result<Connection, GraphError> {
        let (source, signal) = Self::port_kinds(registry, &connection)?;
        if let Some(existing) = self.find(&connection) {
            return Ok(self.edges[existing].connection.clone());
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("graph_connect: {connection} ({signal})");

        self.edges.push(EdgeEntry {
            connection: connection.clone(),
            signal,
            source,
            realized: false,
        });
        if playing {
            self.realize(registry, self.edges.len() - 1);
        }
        Ok(connection)
    }

    /// Removes an edge. Returns `false` if it was not stored.
    ///
    /// A realized route is torn down first. Afterwards the destination's
    /// [`release_input`](crate::Module::release_input) runs whether or not
    /// the edge was ever realized, and whatever it emits is delivered.
    /// Release is skipped while another stored edge still feeds the same
    /// input with the same signal kind.
    pub fn disconnect(&mut self, registry: &mut ModuleRegistry, connection: &Connection) -> bool {
        let Some(index) = self.find(connection) else {
            return false;
        };
        if self.edges[index].realized {
            self.unrealize(registry, index);
        }
        let entry = self.edges.remove(index);

        #[cfg(feature = "tracing")]
        tracing::debug!("graph_disconnect: {}", entry.connection);

        let to = entry.connection.to;
        let to_port = entry.connection.to_port;
        let still_fed = self.edges.iter().any(|e| {
            e.connection.to == to && e.connection.to_port == to_port && e.source == entry.source
        });
        if !still_fed && let Ok(dst) = registry.get_mut(&to) {
            let emissions = dst.release_input(to_port, entry.source);
            self.dispatch(registry, &to, emissions);
        }
        true
    }

    /// Disconnects every edge touching `id` and returns them.
    pub fn remove_module(&mut self, registry: &mut ModuleRegistry, id: &ModuleId) -> Vec<Connection> {
        let touching = self.edges_touching(id);
        for connection in &touching {
            self.disconnect(registry, connection);
        }
        touching
    }

    /// Edges with `id` as source or destination, in insertion order.
    pub fn edges_touching(&self, id: &ModuleId) -> Vec<Connection> {
        self.edges
            .iter()
            .filter(|e| e.connection.touches(id))
            .map(|e| e.connection.clone())
            .collect()
    }

    /// Realizes every stored edge that is not yet live. Returns how many
    /// routes were realized.
    pub fn realize_all(&mut self, registry: &mut ModuleRegistry) -> usize {
        let mut count = 0;
        for index in 0..self.edges.len() {
            if !self.edges[index].realized && self.realize(registry, index) {
                count += 1;
            }
        }
        count
    }

    /// Tears down every realized route. Topology is untouched.
    pub fn unrealize_all(&mut self, registry: &mut ModuleRegistry) {
        for index in 0..self.edges.len() {
            if self.edges[index].realized {
                self.unrealize(registry, index);
            }
        }
    }

    fn realize(&mut self, registry: &mut ModuleRegistry, index: usize) -> bool {
        let connection = self.edges[index].connection.clone();
        let Ok((src, dst)) = registry.pair_mut(&connection.from, &connection.to) else {
            #[cfg(feature = "tracing")]
            tracing::warn!("cannot realize {connection}: endpoint missing");
            return false;
        };
        let priming = src.connect_to(dst, connection.from_port, connection.to_port);
        let emissions = match priming {
            Some(event) => dst.receive(connection.to_port, event),
            None => Vec::new(),
        };
        self.edges[index].realized = true;

        #[cfg(feature = "tracing")]
        tracing::debug!("graph_realize: {connection}");

        self.dispatch(registry, &connection.to, emissions);
        true
    }

    fn unrealize(&mut self, registry: &mut ModuleRegistry, index: usize) {
        let entry = &mut self.edges[index];
        entry.realized = false;
        let connection = &entry.connection;
        if let Ok((src, dst)) = registry.pair_mut(&connection.from, &connection.to) {
            src.disconnect_from(dst, connection.from_port, connection.to_port);
        }
    }

    /// Delivers `emissions` produced by `source` along realized edges.
    ///
    /// Delivery is breadth first: every edge leaving the emitting port gets
    /// the event, in edge insertion order, and whatever the receivers emit
    /// in turn is queued behind. Returns the number of deliveries made.
    pub fn dispatch(
        &self,
        registry: &mut ModuleRegistry,
        source: &ModuleId,
        emissions: Vec<Emission>,
    ) -> usize {
        let mut queue: VecDeque<(ModuleId, Emission, usize)> = emissions
            .into_iter()
            .map(|e| (source.clone(), e, 0))
            .collect();
        let mut delivered = 0;

        while let Some((from, emission, hops)) = queue.pop_front() {
            if hops >= MAX_EVENT_HOPS {
                #[cfg(feature = "tracing")]
                tracing::warn!("event from {from} dropped after {hops} hops");
                continue;
            }
            let routes = self.edges.iter().filter(|e| {
                e.realized && e.connection.from == from && e.connection.from_port == emission.port
            });
            for entry in routes {
                let Ok(dst) = registry.get_mut(&entry.connection.to) else {
                    continue;
                };
                let produced = dst.receive(entry.connection.to_port, emission.event);
                delivered += 1;
                queue.extend(
                    produced
                        .into_iter()
                        .map(|e| (entry.connection.to.clone(), e, hops + 1)),
                );
            }
        }
        delivered
    }

    fn find(&self, connection: &Connection) -> Option<usize> {
        self.edges.iter().position(|e| e.connection == *connection)
    }

    /// Returns `true` if the edge is stored.
    pub fn contains(&self, connection: &Connection) -> bool {
        self.find(connection).is_some()
    }

    /// Returns `true` if the edge is stored and its route is live.
    pub fn is_realized(&self, connection: &Connection) -> bool {
        self.find(connection)
            .is_some_and(|index| self.edges[index].realized)
    }

    /// Signal kind carried into the edge's destination, if stored.
    pub fn signal(&self, connection: &Connection) -> Option<SignalKind> {
        self.find(connection).map(|index| self.edges[index].signal)
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Connection> {
        self.edges.iter().map(|e| &e.connection)
    }

    /// Number of realized routes.
    pub fn realized_count(&self) -> usize {
        self.edges.iter().filter(|e| e.realized).count()
    }

    /// Number of stored edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if no edges are stored.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Forgets every edge without touching modules.
    pub fn clear(&mut self) {
        self.edges.clear();
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::signal::SignalEvent;
    use crate::testing::{Probe, ProbeHandle, probe_factory};

    fn setup() -> (ModuleRegistry, ConnectionGraph) {
        (ModuleRegistry::new(probe_factory), ConnectionGraph::new())
    }

    fn probe(reg: &mut ModuleRegistry) -> (ModuleId, ProbeHandle) {
        let p = Probe::new("probe");
        let handle = p.handle();
        (reg.insert(Box::new(p), 0.0, 0.0), handle)
    }

    #[test]
    fn self_connection_rejected() {
        let (mut reg, mut graph) = setup();
        let (a, _) = probe(&mut reg);
        let result = graph.connect(&mut reg, Connection::new(&a, 0, &a, 0), false);
        assert_eq!(result, Err(GraphError::SelfConnection(a)));
        assert!(graph.is_empty());
    }

    #[test]
    fn missing_endpoint_rejected() {
        let (mut reg, mut graph) = setup();
        let (a, _) = probe(&mut reg);
        let ghost = ModuleId::new("ghost");
        assert_eq!(
            graph.connect(&mut reg, Connection::new(&a, 0, &ghost, 0), false),
            Err(GraphError::ModuleNotFound(ghost.clone()))
        );
        assert_eq!(
            graph.connect(&mut reg, Connection::new(&ghost, 0, &a, 0), false),
            Err(GraphError::ModuleNotFound(ghost))
        );
    }

    #[test]
    fn port_checks() {
        let (mut reg, mut graph) = setup();
        let (a, _) = probe(&mut reg);
        let (b, _) = probe(&mut reg);

        let err = graph
            .connect(&mut reg, Connection::new(&a, 5, &b, 0), false)
            .unwrap_err();
        assert!(matches!(
            err,
            GraphError::PortTypeMismatch {
                reason: PortMismatch::MissingOutput {
                    port: 5,
                    available: 3
                },
                ..
            }
        ));

        let err = graph
            .connect(&mut reg, Connection::new(&a, 0, &b, 7), false)
            .unwrap_err();
        assert!(matches!(
            err,
            GraphError::PortTypeMismatch {
                reason: PortMismatch::MissingInput { port: 7, .. },
                ..
            }
        ));

        // audio out -> trigger in
        let err = graph
            .connect(&mut reg, Connection::new(&a, 0, &b, 1), false)
            .unwrap_err();
        assert!(matches!(
            err,
            GraphError::PortTypeMismatch {
                reason: PortMismatch::Incompatible {
                    output: SignalKind::Audio,
                    input: SignalKind::Trigger
                },
                ..
            }
        ));
        assert!(graph.is_empty());
    }

    #[test]
    fn duplicate_connect_is_noop() {
        let (mut reg, mut graph) = setup();
        let (a, _) = probe(&mut reg);
        let (b, _) = probe(&mut reg);
        let c = Connection::new(&a, 0, &b, 0);
        assert_eq!(graph.connect(&mut reg, c.clone(), false), Ok(c.clone()));
        assert_eq!(graph.connect(&mut reg, c.clone(), false), Ok(c));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn connect_while_playing_realizes() {
        let (mut reg, mut graph) = setup();
        let (a, ha) = probe(&mut reg);
        let (b, _) = probe(&mut reg);
        let c = Connection::new(&a, 0, &b, 0);
        graph.connect(&mut reg, c.clone(), true).unwrap();
        assert!(graph.is_realized(&c));
        assert_eq!(ha.log().connects, vec![(0, 0)]);
    }

    #[test]
    fn disconnect_twice_is_noop() {
        let (mut reg, mut graph) = setup();
        let (a, _) = probe(&mut reg);
        let (b, _) = probe(&mut reg);
        let c = Connection::new(&a, 0, &b, 0);
        graph.connect(&mut reg, c.clone(), false).unwrap();
        assert!(graph.disconnect(&mut reg, &c));
        assert!(!graph.disconnect(&mut reg, &c));
        assert!(graph.is_empty());
    }

    #[test]
    fn disconnect_tears_down_then_releases() {
        let (mut reg, mut graph) = setup();
        let (a, ha) = probe(&mut reg);
        let (b, hb) = probe(&mut reg);
        let c = Connection::new(&a, 1, &b, 1);
        graph.connect(&mut reg, c.clone(), true).unwrap();
        graph.disconnect(&mut reg, &c);
        assert_eq!(ha.log().disconnects, vec![(1, 1)]);
        assert_eq!(hb.log().released, vec![(1, SignalKind::Trigger)]);
    }

    #[test]
    fn unrealized_disconnect_still_releases() {
        let (mut reg, mut graph) = setup();
        let (a, ha) = probe(&mut reg);
        let (b, hb) = probe(&mut reg);
        let c = Connection::new(&a, 1, &b, 1);
        graph.connect(&mut reg, c.clone(), false).unwrap();
        graph.disconnect(&mut reg, &c);
        assert!(ha.log().disconnects.is_empty());
        assert_eq!(hb.log().released, vec![(1, SignalKind::Trigger)]);
    }

    #[test]
    fn remove_module_cascades() {
        let (mut reg, mut graph) = setup();
        let (a, _) = probe(&mut reg);
        let (b, _) = probe(&mut reg);
        let (c, _) = probe(&mut reg);
        graph.connect(&mut reg, Connection::new(&a, 0, &b, 0), false).unwrap();
        graph.connect(&mut reg, Connection::new(&b, 0, &c, 0), false).unwrap();
        graph.connect(&mut reg, Connection::new(&a, 0, &c, 0), false).unwrap();

        let removed = graph.remove_module(&mut reg, &b);
        assert_eq!(removed.len(), 2);
        assert!(graph.edges_touching(&b).is_empty());
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn fan_in_edges_all_realized() {
        let (mut reg, mut graph) = setup();
        let (a, _) = probe(&mut reg);
        let (b, _) = probe(&mut reg);
        let (sink, hs) = probe(&mut reg);
        let ca = Connection::new(&a, 1, &sink, 1);
        let cb = Connection::new(&b, 1, &sink, 1);
        graph.connect(&mut reg, ca.clone(), false).unwrap();
        graph.connect(&mut reg, cb.clone(), false).unwrap();
        assert_eq!(graph.realize_all(&mut reg), 2);
        assert!(graph.is_realized(&ca));
        assert!(graph.is_realized(&cb));

        graph.dispatch(&mut reg, &a, vec![Emission::new(1, SignalEvent::NoteOff)]);
        graph.dispatch(&mut reg, &b, vec![Emission::new(1, SignalEvent::NoteOff)]);
        assert_eq!(hs.log().received.len(), 2);
    }

    #[test]
    fn dispatch_skips_unrealized_edges() {
        let (mut reg, mut graph) = setup();
        let (a, _) = probe(&mut reg);
        let (b, hb) = probe(&mut reg);
        graph
            .connect(&mut reg, Connection::new(&a, 1, &b, 1), false)
            .unwrap();
        let delivered = graph.dispatch(&mut reg, &a, vec![Emission::new(1, SignalEvent::NoteOff)]);
        assert_eq!(delivered, 0);
        assert!(hb.log().received.is_empty());
    }

    #[test]
    fn feedback_loop_is_bounded() {
        let (mut reg, mut graph) = setup();
        let (a, _) = probe(&mut reg);
        let (b, _) = probe(&mut reg);
        graph.connect(&mut reg, Connection::new(&a, 1, &b, 1), true).unwrap();
        graph.connect(&mut reg, Connection::new(&b, 1, &a, 1), true).unwrap();
        let delivered = graph.dispatch(&mut reg, &a, vec![Emission::new(1, SignalEvent::NoteOff)]);
        assert_eq!(delivered, MAX_EVENT_HOPS);
    }

    #[test]
    fn unrealize_all_keeps_topology() {
        let (mut reg, mut graph) = setup();
        let (a, _) = probe(&mut reg);
        let (b, _) = probe(&mut reg);
        let c = Connection::new(&a, 0, &b, 0);
        graph.connect(&mut reg, c.clone(), true).unwrap();
        graph.unrealize_all(&mut reg);
        assert!(graph.contains(&c));
        assert!(!graph.is_realized(&c));
        assert_eq!(graph.realized_count(), 0);
    }
}
