//! Patchwire Core - the signal-graph engine behind the patchwire modular editor
//!
//! This crate models a modular synthesizer patch as a graph: modules with
//! typed ports, directed connections between them, and a global play / stop
//! switch that turns stored connections into live routes.
//!
//! # Core Abstractions
//!
//! ## Modules
//!
//! - [`Module`] - Object-safe capability interface every module kind implements
//! - [`ModuleFactory`] - Builds modules by kind name
//! - [`ModuleRegistry`] - Owns live modules, hands out never-reused identifiers
//!
//! ## Ports and Signals
//!
//! - [`PortDescriptor`] / [`SignalKind`] - Typed connection points
//! - [`SignalEvent`] / [`Emission`] - Note and pitch events carried by event routes
//! - [`Note`] - The thirteen keyboard notes
//!
//! ## Parameters
//!
//! - [`ParamDescriptor`] - Name, range, unit, and flags of a module setting
//! - [`ParamValue`] - Number, flag, text, or step list
//!
//! ## Graph and Playback
//!
//! - [`ConnectionGraph`] - Edge storage, legality checks, realization, event delivery
//! - [`PlaybackController`] - Fail-soft start, unconditional stop
//! - [`GraphSession`] - Everything above for one editing session, plus UI intents
//!
//! # no_std Support
//!
//! The crate builds without `std` (it needs `alloc`). Disable the default
//! feature:
//!
//! ```toml
//! [dependencies]
//! patchwire-core = { version = "0.1", default-features = false }
//! ```
//!
//! Enable the `tracing` feature for debug events on graph mutations.
//!
//! # Example
//!
//! ```rust,ignore
//! use patchwire_core::{Connection, GraphSession};
//!
//! let mut session = GraphSession::open(kinds);
//! let osc = session.create_module("oscillator", 0.0, 0.0)?;
//! let out = session.create_module("destination", 400.0, 0.0)?;
//! session.connect(Connection::new(&osc, 0, &out, 0))?;
//!
//! session.start()?;
//! assert!(session.module(&osc)?.is_playing());
//! session.stop();
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod error;
pub mod graph;
pub mod module;
pub mod note;
pub mod param;
pub mod playback;
pub mod registry;
pub mod session;
pub mod signal;

#[cfg(all(test, feature = "std"))]
mod testing;

pub use error::{GraphError, PartialStartFailure, PortMismatch};
pub use graph::{Connection, ConnectionGraph, MAX_EVENT_HOPS};
pub use module::{Module, ModuleError, ModuleFactory, ModuleId, Position};
pub use note::Note;
pub use param::{
    ParamDescriptor, ParamError, ParamFlags, ParamKind, ParamUnit, ParamValue, StepKind,
};
pub use playback::{PlaybackController, PlaybackState};
pub use registry::ModuleRegistry;
pub use session::{GraphSession, PendingWire};
pub use signal::{Direction, Emission, PortDescriptor, SignalEvent, SignalKind};
