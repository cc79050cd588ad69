//! Module kind catalog and factory for patchwire.
//!
//! This crate lists every module kind the editor can place on the canvas
//! and builds instances by kind name. It is the [`ModuleFactory`] handed
//! to a [`GraphSession`](patchwire_core::GraphSession).
//!
//! # Features
//!
//! - **Kind Discovery**: List all kinds with display metadata
//! - **Factory Pattern**: Create modules by kind name at runtime
//! - **Category System**: Kinds grouped as sources, effects, controllers, outputs
//! - **Legacy Names**: Older documents' kind names resolve to current ones
//!
//! # Example
//!
//! ```rust
//! use patchwire_core::{Connection, GraphSession};
//! use patchwire_registry::{KindCategory, KindRegistry};
//!
//! let registry = KindRegistry::new();
//! for kind in registry.kinds_in_category(KindCategory::Source) {
//!     println!("{}: {}", kind.id, kind.description);
//! }
//!
//! let mut session = GraphSession::open(registry);
//! let osc = session.create_module("oscillator", 0.0, 0.0).unwrap();
//! let out = session.create_module("destination", 300.0, 0.0).unwrap();
//! session.connect(Connection::new(&osc, 0, &out, 0)).unwrap();
//! ```
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! patchwire-registry = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

use patchwire_core::{Module, ModuleFactory};
use patchwire_modules::{Keyboard, Lfo, Oscillator, Processor, Sampler, Sequencer, Slicer};

/// Palette group of a module kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindCategory {
    /// Tone and modulation generators (oscillator, lfo, sampler)
    Source,
    /// Audio processors (gain, delay, reverb, slicer)
    Effect,
    /// Note and pitch controllers (keyboard, sequencer)
    Controller,
    /// Endpoints and displays (destination, visualizer, spectrum)
    Output,
}

impl KindCategory {
    /// Every category in palette order.
    pub const ALL: [KindCategory; 4] = [
        KindCategory::Source,
        KindCategory::Effect,
        KindCategory::Controller,
        KindCategory::Output,
    ];

    /// Returns a human-readable name for the category.
    pub const fn name(&self) -> &'static str {
        match self {
            KindCategory::Source => "Sources",
            KindCategory::Effect => "Effects",
            KindCategory::Controller => "Controllers",
            KindCategory::Output => "Outputs",
        }
    }
}

/// Describes a module kind in the registry.
#[derive(Debug, Clone)]
pub struct KindDescriptor {
    /// Kind tag as stored in documents (lowercase, no spaces).
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Brief description.
    pub description: &'static str,
    /// Palette group.
    pub category: KindCategory,
}

type KindFactory = fn() -> Box<dyn Module>;

struct RegistryEntry {
    descriptor: KindDescriptor,
    factory: KindFactory,
}

/// Kind names written by older versions of the editor.
const ALIASES: &[(&str, &str)] = &[
    ("soundwavevisualizer", "visualizer"),
    ("spectrumvisualizer", "spectrum"),
];

/// Registry of all module kinds.
pub struct KindRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for KindRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for KindRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| e.descriptor.id))
            .finish()
    }
}

impl KindRegistry {
    /// Create a new registry with all built-in kinds registered.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::with_capacity(12),
        };
        registry.register_builtin_kinds();
        registry
    }

    fn register_builtin_kinds(&mut self) {
        // Sources
        self.register(
            KindDescriptor {
                id: "oscillator",
                name: "Oscillator",
                description: "Tone generator with a pitch-controlled frequency input",
                category: KindCategory::Source,
            },
            || Box::new(Oscillator::new()),
        );
        self.register(
            KindDescriptor {
                id: "lfo",
                name: "LFO",
                description: "Low-frequency modulation for vibrato and tremolo",
                category: KindCategory::Source,
            },
            || Box::new(Lfo::new()),
        );
        self.register(
            KindDescriptor {
                id: "sampler",
                name: "Sampler",
                description: "Plays an audio sample pitched by incoming notes",
                category: KindCategory::Source,
            },
            || Box::new(Sampler::new()),
        );

        // Effects
        self.register(
            KindDescriptor {
                id: "gain",
                name: "Gain",
                description: "Output level",
                category: KindCategory::Effect,
            },
            || Box::new(Processor::gain()),
        );
        self.register(
            KindDescriptor {
                id: "delay",
                name: "Delay",
                description: "Feedback delay with wet/dry mix",
                category: KindCategory::Effect,
            },
            || Box::new(Processor::delay()),
        );
        self.register(
            KindDescriptor {
                id: "reverb",
                name: "Reverb",
                description: "Room reverb with adjustable decay",
                category: KindCategory::Effect,
            },
            || Box::new(Processor::reverb()),
        );
        self.register(
            KindDescriptor {
                id: "slicer",
                name: "Slicer",
                description: "Eight-step rhythmic audio gate",
                category: KindCategory::Effect,
            },
            || Box::new(Slicer::new()),
        );

        // Controllers
        self.register(
            KindDescriptor {
                id: "keyboard",
                name: "Keyboard",
                description: "One-octave keyboard with sustain",
                category: KindCategory::Controller,
            },
            || Box::new(Keyboard::new()),
        );
        self.register(
            KindDescriptor {
                id: "sequencer",
                name: "Sequencer",
                description: "Eight-step note sequencer with per-step octaves",
                category: KindCategory::Controller,
            },
            || Box::new(Sequencer::new()),
        );

        // Outputs
        self.register(
            KindDescriptor {
                id: "destination",
                name: "Output",
                description: "Speakers",
                category: KindCategory::Output,
            },
            || Box::new(Processor::destination()),
        );
        self.register(
            KindDescriptor {
                id: "visualizer",
                name: "Waveform",
                description: "Oscilloscope display, passes audio through",
                category: KindCategory::Output,
            },
            || Box::new(Processor::visualizer()),
        );
        self.register(
            KindDescriptor {
                id: "spectrum",
                name: "Spectrum",
                description: "Frequency spectrum display, passes audio through",
                category: KindCategory::Output,
            },
            || Box::new(Processor::spectrum()),
        );
    }

    /// Adds a kind. Lookups return the first entry with a matching id.
    pub fn register(&mut self, descriptor: KindDescriptor, factory: KindFactory) {
        self.entries.push(RegistryEntry {
            descriptor,
            factory,
        });
    }

    /// Resolves legacy names to the current kind id.
    ///
    /// Returns `None` for names that are neither registered nor aliases.
    pub fn canonical<'a>(&'a self, kind: &'a str) -> Option<&'a str> {
        let resolved = ALIASES
            .iter()
            .find(|(legacy, _)| *legacy == kind)
            .map_or(kind, |(_, current)| *current);
        self.entry(resolved).map(|e| e.descriptor.id)
    }

    /// Returns descriptors for all registered kinds.
    pub fn all_kinds(&self) -> Vec<&KindDescriptor> {
        self.entries.iter().map(|e| &e.descriptor).collect()
    }

    /// Returns descriptors for kinds in a specific category.
    pub fn kinds_in_category(&self, category: KindCategory) -> Vec<&KindDescriptor> {
        self.entries
            .iter()
            .filter(|e| e.descriptor.category == category)
            .map(|e| &e.descriptor)
            .collect()
    }

    /// Get a descriptor by kind id or legacy name.
    pub fn get(&self, kind: &str) -> Option<&KindDescriptor> {
        self.lookup(kind).map(|e| &e.descriptor)
    }

    /// Create a module by kind id or legacy name.
    pub fn create(&self, kind: &str) -> Option<Box<dyn Module>> {
        self.lookup(kind).map(|e| (e.factory)())
    }

    /// Returns the number of registered kinds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no kinds are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, id: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.descriptor.id == id)
    }

    fn lookup(&self, kind: &str) -> Option<&RegistryEntry> {
        self.canonical(kind).and_then(|id| self.entry(id))
    }
}

impl ModuleFactory for KindRegistry {
    fn create(&self, kind: &str) -> Option<Box<dyn Module>> {
        KindRegistry::create(self, kind)
    }
}
