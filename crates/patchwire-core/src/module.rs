//! The module capability interface.
//!
//! A [`Module`] is one node of the signal graph. The graph never inspects a
//! module's concrete type: everything it needs (ports, parameters, start /
//! stop, route realization, event handling) goes through this trait.
//!
//! # Events
//!
//! Modules do not hold references to each other. Whenever a module has
//! something to say downstream it returns [`Emission`]s, and the
//! [`ConnectionGraph`](crate::ConnectionGraph) forwards them along realized
//! connections leaving that output port.

#[cfg(not(feature = "std"))]
use alloc::{
    boxed::Box,
    format,
    string::{String, ToString},
    vec::Vec,
};

use crate::param::{ParamDescriptor, ParamError, ParamValue};
use crate::signal::{Emission, PortDescriptor, SignalEvent, SignalKind};

/// Unique identifier of a module within a registry.
///
/// Freshly created modules get `module-{n}` from a monotonic counter.
/// Restored modules keep whatever identifier their document recorded.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(String);

impl ModuleId {
    const PREFIX: &'static str = "module-";

    /// Wraps an arbitrary identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier allocated from counter value `n`.
    pub fn from_counter(n: u64) -> Self {
        Self(format!("{}{n}", Self::PREFIX))
    }

    /// The counter value this identifier was allocated from, if it has the
    /// `module-{n}` form.
    pub fn counter(&self) -> Option<u64> {
        self.0.strip_prefix(Self::PREFIX)?.parse().ok()
    }

    /// Borrows the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ModuleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&ModuleId> for ModuleId {
    fn from(id: &ModuleId) -> Self {
        id.clone()
    }
}

/// Canvas position. UI only; the graph never reads it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Creates a position.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A module failed to start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModuleError {
    /// A resource the module needs has not been assigned.
    MissingResource {
        /// Module kind.
        kind: &'static str,
        /// What is missing.
        resource: &'static str,
    },
    /// The processing backend refused to start.
    Backend(String),
}

impl core::fmt::Display for ModuleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingResource { kind, resource } => {
                write!(f, "{kind} has no {resource} assigned")
            }
            Self::Backend(reason) => write!(f, "backend error: {reason}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ModuleError {}

/// Object-safe capability interface implemented by every module kind.
///
/// Required methods describe the module (kind, ports, parameters) and its
/// run state. The provided methods cover parameter validation and the
/// connection hooks, which most kinds leave at their defaults.
///
/// # Contract
///
/// - `inputs()` and `outputs()` return the same slices for the module's
///   whole lifetime.
/// - `start()` on a started module and `stop()` on a stopped module are
///   no-ops.
/// - `is_playing()` is `true` only between a successful `start()` and the
///   next `stop()`.
/// - `apply_param` receives values that already passed
///   [`ParamDescriptor::validate`].
pub trait Module: Send {
    /// Kind tag, e.g. `"oscillator"`.
    fn kind(&self) -> &'static str;

    /// Declared input ports, addressed by index.
    fn inputs(&self) -> &'static [PortDescriptor];

    /// Declared output ports, addressed by index.
    fn outputs(&self) -> &'static [PortDescriptor];

    /// Number of parameters, read-only ones included.
    fn param_count(&self) -> usize;

    /// Descriptor of parameter `index`.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current value of parameter `index`.
    fn get_param(&self, index: usize) -> Option<ParamValue>;

    /// Stores a validated value for parameter `index`, applying it live when
    /// playing.
    fn apply_param(&mut self, index: usize, value: ParamValue);

    /// Begins producing or consuming signal.
    fn start(&mut self) -> Result<(), ModuleError>;

    /// Stops producing or consuming signal.
    fn stop(&mut self);

    /// Whether the module is currently started.
    fn is_playing(&self) -> bool;

    /// Index of the parameter called `name`.
    fn find_param(&self, name: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.name == name))
    }

    /// Current value of the parameter called `name`.
    fn parameter(&self, name: &str) -> Option<ParamValue> {
        self.find_param(name).and_then(|i| self.get_param(i))
    }

    /// Validates `value` and applies it to the parameter called `name`.
    fn set_parameter(&mut self, name: &str, value: ParamValue) -> Result<(), ParamError> {
        let index = self.find_param(name).ok_or_else(|| ParamError::Unknown {
            name: name.to_string(),
        })?;
        let descriptor = self
            .param_info(index)
            .ok_or_else(|| ParamError::Unknown {
                name: name.to_string(),
            })?;
        descriptor.validate(&value)?;
        self.apply_param(index, value);
        Ok(())
    }

    /// Signal kind of output `port`.
    fn output_signal(&self, port: usize) -> Option<SignalKind> {
        self.outputs().get(port).map(|p| p.signal)
    }

    /// Signal kind of input `port`.
    fn input_signal(&self, port: usize) -> Option<SignalKind> {
        self.inputs().get(port).map(|p| p.signal)
    }

    /// Whether `port` is a valid output index.
    fn exposes_output(&self, port: usize) -> bool {
        port < self.outputs().len()
    }

    /// Whether `port` is a valid input index.
    fn exposes_input(&self, port: usize) -> bool {
        port < self.inputs().len()
    }

    /// Realizes a route from output `from_port` into `target`'s input
    /// `to_port`.
    ///
    /// Returns an event to deliver to the target once the route is live,
    /// e.g. an initial pitch for a frequency input.
    fn connect_to(
        &mut self,
        target: &mut dyn Module,
        from_port: usize,
        to_port: usize,
    ) -> Option<SignalEvent> {
        let _ = (target, from_port, to_port);
        None
    }

    /// Tears down a route previously realized with [`connect_to`](Self::connect_to).
    fn disconnect_from(&mut self, target: &mut dyn Module, from_port: usize, to_port: usize) {
        let _ = (target, from_port, to_port);
    }

    /// Called on the destination after a connection into input `port` is
    /// removed, realized or not. `signal` is the kind the removed
    /// connection's source output carried.
    ///
    /// Not called while another connection of that kind still feeds `port`.
    fn release_input(&mut self, port: usize, signal: SignalKind) -> Vec<Emission> {
        let _ = (port, signal);
        Vec::new()
    }

    /// Handles an event arriving on input `port`.
    fn receive(&mut self, port: usize, event: SignalEvent) -> Vec<Emission> {
        let _ = (port, event);
        Vec::new()
    }

    /// Advances the module's internal clock by `seconds`.
    fn advance(&mut self, seconds: f64) -> Vec<Emission> {
        let _ = seconds;
        Vec::new()
    }
}

/// Creates modules by kind name.
pub trait ModuleFactory: Send {
    /// Returns a new module of `kind` with default ports and parameters, or
    /// `None` if the kind is unknown.
    fn create(&self, kind: &str) -> Option<Box<dyn Module>>;
}

impl<F> ModuleFactory for F
where
    F: Fn(&str) -> Option<Box<dyn Module>> + Send,
{
    fn create(&self, kind: &str) -> Option<Box<dyn Module>> {
        self(kind)
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::testing::Probe;

    #[test]
    fn id_counter_parsing() {
        assert_eq!(ModuleId::from_counter(7).as_str(), "module-7");
        assert_eq!(ModuleId::from_counter(7).counter(), Some(7));
        assert_eq!(ModuleId::new("osc").counter(), None);
        assert_eq!(ModuleId::new("module-x").counter(), None);
    }

    #[test]
    fn set_parameter_validates_before_applying() {
        let mut probe = Probe::new("probe");
        assert!(probe.set_parameter("level", ParamValue::Number(0.25)).is_ok());
        assert_eq!(probe.parameter("level"), Some(ParamValue::Number(0.25)));

        let err = probe
            .set_parameter("level", ParamValue::Number(3.0))
            .unwrap_err();
        assert!(matches!(err, ParamError::OutOfRange { .. }));
        assert_eq!(probe.parameter("level"), Some(ParamValue::Number(0.25)));
    }

    #[test]
    fn unknown_and_read_only_parameters() {
        let mut probe = Probe::new("probe");
        assert_eq!(
            probe.set_parameter("volume", ParamValue::Number(0.5)),
            Err(ParamError::Unknown {
                name: "volume".to_string()
            })
        );
        assert!(matches!(
            probe.set_parameter("received", ParamValue::Number(1.0)),
            Err(ParamError::ReadOnly { .. })
        ));
    }

    #[test]
    fn port_queries() {
        let probe = Probe::new("probe");
        assert!(probe.exposes_output(0));
        assert!(!probe.exposes_output(3));
        assert!(probe.exposes_input(1));
        assert_eq!(probe.input_signal(1), Some(SignalKind::Trigger));
        assert_eq!(probe.output_signal(9), None);
    }

    #[test]
    fn closures_are_factories() {
        let factory = |kind: &str| -> Option<Box<dyn Module>> {
            (kind == "probe").then(|| Box::new(Probe::new("probe")) as Box<dyn Module>)
        };
        assert!(factory.create("probe").is_some());
        assert!(factory.create("nope").is_none());
    }
}
