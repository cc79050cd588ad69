//! Connection topology and route realization.
//!
//! The graph stores directed edges from output ports to input ports and
//! nothing else: modules live in the [`ModuleRegistry`](crate::ModuleRegistry)
//! and are looked up by identifier whenever an edge needs them.
//!
//! # Realization
//!
//! An edge is either *stored* (pure topology) or *realized* (a live route).
//! While playback is stopped every edge is merely stored. Starting playback
//! realizes them all; stopping tears them down again. Edges added while
//! playing are realized on the spot.
//!
//! Audio routes and event routes are handled the same way. An event route
//! (a keyboard's frequency output, a sequencer's trigger output) carries
//! [`SignalEvent`](crate::SignalEvent)s, delivered by
//! [`ConnectionGraph::dispatch`].
//!
//! # Example
//!
//! ```rust,ignore
//! use patchwire_core::{Connection, ConnectionGraph, ModuleRegistry};
//!
//! let mut registry = ModuleRegistry::new(factory);
//! let mut graph = ConnectionGraph::new();
//! let osc = registry.create("oscillator", 0.0, 0.0)?;
//! let out = registry.create("destination", 300.0, 0.0)?;
//!
//! graph.connect(&mut registry, Connection::new(&osc, 0, &out, 0), false)?;
//! assert_eq!(graph.realize_all(&mut registry), 1);
//! ```

pub mod connection;
pub mod edge;

pub use connection::{ConnectionGraph, MAX_EVENT_HOPS};
pub use edge::Connection;
