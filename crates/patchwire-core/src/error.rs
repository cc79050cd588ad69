//! Graph error taxonomy.

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

use crate::graph::Connection;
use crate::module::{ModuleError, ModuleId};
use crate::param::ParamError;
use crate::signal::SignalKind;

/// Why a connection's ports do not fit together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortMismatch {
    /// The source module has no output with this index.
    MissingOutput {
        /// Requested output index.
        port: usize,
        /// Number of outputs the source declares.
        available: usize,
    },
    /// The destination module has no input with this index.
    MissingInput {
        /// Requested input index.
        port: usize,
        /// Number of inputs the destination declares.
        available: usize,
    },
    /// The output's signal cannot drive the input.
    Incompatible {
        /// Signal carried by the output.
        output: SignalKind,
        /// Signal expected by the input.
        input: SignalKind,
    },
}

impl core::fmt::Display for PortMismatch {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingOutput { port, available } => {
                write!(f, "output {port} does not exist ({available} outputs)")
            }
            Self::MissingInput { port, available } => {
                write!(f, "input {port} does not exist ({available} inputs)")
            }
            Self::Incompatible { output, input } => {
                write!(f, "{output} output cannot drive {input} input")
            }
        }
    }
}

/// Errors from graph mutations.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// No module with this identifier is registered.
    ModuleNotFound(ModuleId),
    /// The factory does not know this module kind.
    UnknownKind(String),
    /// Source and destination are the same module.
    SelfConnection(ModuleId),
    /// The connection's ports are missing or incompatible.
    PortTypeMismatch {
        /// Rejected connection.
        connection: Connection,
        /// What is wrong with it.
        reason: PortMismatch,
    },
    /// A parameter value was rejected.
    InvalidParameter {
        /// Module the value was meant for.
        module: ModuleId,
        /// Validation failure.
        error: ParamError,
    },
    /// Restoring an identifier that is already registered.
    DuplicateModule(ModuleId),
    /// A key press went to a module without a trigger input.
    NoTriggerInput(ModuleId),
}

impl core::fmt::Display for GraphError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ModuleNotFound(id) => write!(f, "module not found: {id}"),
            Self::UnknownKind(kind) => write!(f, "unknown module kind: {kind}"),
            Self::SelfConnection(id) => write!(f, "cannot connect {id} to itself"),
            Self::PortTypeMismatch { connection, reason } => {
                write!(f, "cannot connect {connection}: {reason}")
            }
            Self::InvalidParameter { module, error } => write!(f, "{module}: {error}"),
            Self::DuplicateModule(id) => write!(f, "module already exists: {id}"),
            Self::NoTriggerInput(id) => write!(f, "{id} has no trigger input"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GraphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidParameter { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Some modules failed to start; the rest are playing.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialStartFailure {
    /// Modules that refused to start, in registry order.
    pub failures: Vec<(ModuleId, ModuleError)>,
    /// Number of modules a start was attempted on.
    pub attempted: usize,
}

impl core::fmt::Display for PartialStartFailure {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} of {} modules failed to start",
            self.failures.len(),
            self.attempted
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PartialStartFailure {}
