//! Property-based tests for graph invariants.
//!
//! Random sequences of edits and playback toggles are applied to a session;
//! after every step the topology must stay well formed and realization must
//! track playback state.

use proptest::prelude::*;
use patchwire_core::{
    Connection, GraphError, GraphSession, Module, ModuleError, ModuleId, ParamDescriptor,
    ParamValue, PortDescriptor,
};

const INPUTS: &[PortDescriptor] = &[
    PortDescriptor::audio("audio"),
    PortDescriptor::control("frequency"),
];
const OUTPUTS: &[PortDescriptor] = &[
    PortDescriptor::audio("audio"),
    PortDescriptor::modulation("modulation"),
];

/// Minimal module: two inputs, two outputs, no parameters.
struct Node {
    playing: bool,
}

impl Module for Node {
    fn kind(&self) -> &'static str {
        "node"
    }

    fn inputs(&self) -> &'static [PortDescriptor] {
        INPUTS
    }

    fn outputs(&self) -> &'static [PortDescriptor] {
        OUTPUTS
    }

    fn param_count(&self) -> usize {
        0
    }

    fn param_info(&self, _index: usize) -> Option<ParamDescriptor> {
        None
    }

    fn get_param(&self, _index: usize) -> Option<ParamValue> {
        None
    }

    fn apply_param(&mut self, _index: usize, _value: ParamValue) {}

    fn start(&mut self) -> Result<(), ModuleError> {
        self.playing = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

fn factory(kind: &str) -> Option<Box<dyn Module>> {
    (kind == "node").then(|| Box::new(Node { playing: false }) as Box<dyn Module>)
}

#[derive(Debug, Clone)]
enum Op {
    Create,
    Remove(usize),
    Connect(usize, usize, usize, usize),
    Disconnect(usize),
    Start,
    Stop,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Create),
        1 => (0usize..16).prop_map(Op::Remove),
        6 => (0usize..16, 0usize..3, 0usize..16, 0usize..3)
            .prop_map(|(a, ap, b, bp)| Op::Connect(a, ap, b, bp)),
        2 => (0usize..32).prop_map(Op::Disconnect),
        1 => Just(Op::Start),
        1 => Just(Op::Stop),
    ]
}

fn pick(ids: &[ModuleId], index: usize) -> ModuleId {
    if ids.is_empty() {
        ModuleId::new("missing")
    } else {
        ids[index % ids.len()].clone()
    }
}

fn apply(session: &mut GraphSession, op: &Op) {
    let ids: Vec<ModuleId> = session.registry().ids().cloned().collect();
    match *op {
        Op::Create => {
            session.create_module("node", 0.0, 0.0).unwrap();
        }
        Op::Remove(i) => {
            let id = pick(&ids, i);
            session.remove_module(&id);
        }
        Op::Connect(a, ap, b, bp) => {
            let _ = session.connect(Connection::new(pick(&ids, a), ap, pick(&ids, b), bp));
        }
        Op::Disconnect(i) => {
            let edges: Vec<Connection> = session.connections().cloned().collect();
            if !edges.is_empty() {
                session.disconnect(&edges[i % edges.len()]);
            }
        }
        Op::Start => {
            session.start().unwrap();
        }
        Op::Stop => session.stop(),
    }
}

fn check_invariants(session: &GraphSession) -> Result<(), TestCaseError> {
    let edges: Vec<Connection> = session.connections().cloned().collect();
    for (i, edge) in edges.iter().enumerate() {
        prop_assert!(session.registry().contains(&edge.from), "dangling source in {edge}");
        prop_assert!(session.registry().contains(&edge.to), "dangling destination in {edge}");
        prop_assert_ne!(&edge.from, &edge.to);
        prop_assert!(edge.from_port < OUTPUTS.len());
        prop_assert!(edge.to_port < INPUTS.len());
        prop_assert!(!edges[..i].contains(edge), "duplicate edge {edge}");
        prop_assert_eq!(session.is_realized(edge), session.is_playing());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any sequence of edits leaves a well-formed graph whose realization
    /// state matches playback.
    #[test]
    fn random_edits_keep_graph_well_formed(ops in prop::collection::vec(op(), 1..60)) {
        let mut session = GraphSession::open(factory);
        for op in &ops {
            apply(&mut session, op);
            check_invariants(&session)?;
        }
    }

    /// Connecting the same edge twice stores it once.
    #[test]
    fn connect_is_idempotent(ap in 0usize..2, bp in 0usize..2, repeats in 2usize..5) {
        let mut session = GraphSession::open(factory);
        let a = session.create_module("node", 0.0, 0.0).unwrap();
        let b = session.create_module("node", 0.0, 0.0).unwrap();
        let edge = Connection::new(&a, ap, &b, bp);
        let first = session.connect(edge.clone());
        for _ in 1..repeats {
            prop_assert_eq!(session.connect(edge.clone()), first.clone());
        }
        prop_assert!(session.connections().count() <= 1);
    }

    /// No module may be connected to itself, whatever the ports.
    #[test]
    fn self_connection_always_rejected(ap in 0usize..4, bp in 0usize..4) {
        let mut session = GraphSession::open(factory);
        let a = session.create_module("node", 0.0, 0.0).unwrap();
        let result = session.connect(Connection::new(&a, ap, &a, bp));
        prop_assert_eq!(result, Err(GraphError::SelfConnection(a)));
    }

    /// Removing a module leaves no edge touching it.
    #[test]
    fn removal_cascades(
        edges in prop::collection::vec((0usize..6, 0usize..2, 0usize..6, 0usize..2), 0..20),
        victim in 0usize..6,
    ) {
        let mut session = GraphSession::open(factory);
        let ids: Vec<ModuleId> = (0..6)
            .map(|_| session.create_module("node", 0.0, 0.0).unwrap())
            .collect();
        for (a, ap, b, bp) in edges {
            let _ = session.connect(Connection::new(&ids[a], ap, &ids[b], bp));
        }
        session.remove_module(&ids[victim]);
        prop_assert!(session.edges_touching(&ids[victim]).is_empty());
        prop_assert!(session.connections().all(|e| !e.touches(&ids[victim])));
    }

    /// start / stop / start leaves the edge set unchanged.
    #[test]
    fn playback_preserves_topology(
        edges in prop::collection::vec((0usize..5, 0usize..2, 0usize..5, 0usize..2), 0..15),
    ) {
        let mut session = GraphSession::open(factory);
        let ids: Vec<ModuleId> = (0..5)
            .map(|_| session.create_module("node", 0.0, 0.0).unwrap())
            .collect();
        for (a, ap, b, bp) in edges {
            let _ = session.connect(Connection::new(&ids[a], ap, &ids[b], bp));
        }
        let before: Vec<Connection> = session.connections().cloned().collect();
        session.start().unwrap();
        session.stop();
        session.start().unwrap();
        let after: Vec<Connection> = session.connections().cloned().collect();
        prop_assert_eq!(before, after);
    }
}
