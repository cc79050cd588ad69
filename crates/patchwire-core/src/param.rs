//! Parameter introspection for module settings.
//!
//! Each module kind declares its parameters through [`ParamDescriptor`]s:
//! a name, a value shape ([`ParamKind`]), a display unit, and capability
//! flags. Values travel as [`ParamValue`]. Validation happens once, in
//! [`ParamDescriptor::validate`], before a module ever sees the value; values
//! outside the declared range are rejected rather than clamped.
//!
//! # Example
//!
//! ```rust
//! use patchwire_core::{ParamDescriptor, ParamUnit, ParamValue};
//!
//! let freq = ParamDescriptor::number("frequency", "Frequency", ParamUnit::Hertz, 20.0, 2000.0);
//! assert!(freq.validate(&ParamValue::Number(440.0)).is_ok());
//! assert!(freq.validate(&ParamValue::Number(5000.0)).is_err());
//! ```

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

use crate::note::Note;

/// A parameter value.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    /// Continuous or integer number.
    Number(f64),
    /// On / off switch.
    Flag(bool),
    /// Free text or one of a fixed set of choices.
    Text(String),
    /// Per-step values of a step sequencer.
    List(Vec<ParamValue>),
}

impl ParamValue {
    /// Convenience constructor for text values.
    pub fn text(value: impl Into<String>) -> Self {
        ParamValue::Text(value.into())
    }

    /// Returns the number, if this is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the flag, if this is a flag.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            ParamValue::Flag(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the list items, if this is a list.
    pub fn as_list(&self) -> Option<&[ParamValue]> {
        match self {
            ParamValue::List(v) => Some(v),
            _ => None,
        }
    }

    const fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Number(_) => "number",
            ParamValue::Flag(_) => "flag",
            ParamValue::Text(_) => "text",
            ParamValue::List(_) => "list",
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Flag(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.into())
    }
}

/// Shape of a single sequencer step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepKind {
    /// One of the thirteen note names, or empty for a rest.
    Note,
    /// Whole octave number, 0 through 8.
    Octave,
    /// Gate: `0` (muted) or `1` (open).
    Gate,
}

/// Shape and range of a parameter value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamKind {
    /// Number within `[min, max]`.
    Number {
        /// Smallest accepted value.
        min: f64,
        /// Largest accepted value.
        max: f64,
    },
    /// Text restricted to a fixed set of options.
    Choice(&'static [&'static str]),
    /// On / off switch.
    Flag,
    /// Free text.
    Text,
    /// Fixed-length list of steps.
    Steps {
        /// Number of steps.
        len: usize,
        /// Shape of each step.
        item: StepKind,
    },
}

/// Display unit for a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ParamUnit {
    /// Hertz (Hz).
    Hertz,
    /// Seconds (s).
    Seconds,
    /// Percentage (%).
    Percent,
    /// Beats per minute.
    Bpm,
    /// Dimensionless.
    #[default]
    None,
}

impl ParamUnit {
    /// Returns the unit suffix string for display.
    ///
    /// ```rust
    /// use patchwire_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Hertz.suffix(), " Hz");
    /// assert_eq!(ParamUnit::None.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Hertz => " Hz",
            ParamUnit::Seconds => " s",
            ParamUnit::Percent => "%",
            ParamUnit::Bpm => " bpm",
            ParamUnit::None => "",
        }
    }
}

/// Parameter capability flags.
///
/// Bitflag type. Use [`union`](Self::union) to combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Reported for display only; never set from outside and never persisted.
    pub const READ_ONLY: Self = Self(1 << 0);
    /// Changing the value while playing takes effect on the next start only.
    pub const RESTART: Self = Self(1 << 1);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::NONE
    }
}

/// Metadata describing one module parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Stable name used by `set_parameter` and in persisted settings.
    pub name: &'static str,
    /// Label for display.
    pub label: &'static str,
    /// Accepted value shape.
    pub kind: ParamKind,
    /// Display unit.
    pub unit: ParamUnit,
    /// Capability flags.
    pub flags: ParamFlags,
}

impl ParamDescriptor {
    /// Numeric parameter accepting `[min, max]`.
    pub const fn number(
        name: &'static str,
        label: &'static str,
        unit: ParamUnit,
        min: f64,
        max: f64,
    ) -> Self {
        Self {
            name,
            label,
            kind: ParamKind::Number { min, max },
            unit,
            flags: ParamFlags::NONE,
        }
    }

    /// Parameter restricted to one of `options`.
    pub const fn choice(
        name: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            label,
            kind: ParamKind::Choice(options),
            unit: ParamUnit::None,
            flags: ParamFlags::NONE,
        }
    }

    /// On / off parameter.
    pub const fn flag(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: ParamKind::Flag,
            unit: ParamUnit::None,
            flags: ParamFlags::NONE,
        }
    }

    /// Free text parameter.
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: ParamKind::Text,
            unit: ParamUnit::None,
            flags: ParamFlags::NONE,
        }
    }

    /// Fixed-length step list.
    pub const fn steps(name: &'static str, label: &'static str, len: usize, item: StepKind) -> Self {
        Self {
            name,
            label,
            kind: ParamKind::Steps { len, item },
            unit: ParamUnit::None,
            flags: ParamFlags::NONE,
        }
    }

    /// Sets the capability flags.
    ///
    /// Builder pattern: call after a constructor.
    pub const fn with_flags(mut self, flags: ParamFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Marks the parameter read-only.
    pub const fn read_only(self) -> Self {
        let flags = self.flags.union(ParamFlags::READ_ONLY);
        self.with_flags(flags)
    }

    /// Returns `true` if the parameter may be set and persisted.
    pub const fn is_writable(&self) -> bool {
        !self.flags.contains(ParamFlags::READ_ONLY)
    }

    /// Checks `value` against this descriptor's shape and range.
    ///
    /// Read-only parameters reject every value.
    pub fn validate(&self, value: &ParamValue) -> Result<(), ParamError> {
        if !self.is_writable() {
            return Err(ParamError::ReadOnly { name: self.name });
        }
        self.check_shape(value)
    }

    fn check_shape(&self, value: &ParamValue) -> Result<(), ParamError> {
        let wrong_type = |expected: &'static str| ParamError::WrongType {
            name: self.name,
            expected,
            found: value.type_name(),
        };
        match (self.kind, value) {
            (ParamKind::Number { min, max }, ParamValue::Number(v)) => {
                if v.is_finite() && *v >= min && *v <= max {
                    Ok(())
                } else {
                    Err(ParamError::OutOfRange {
                        name: self.name,
                        value: *v,
                        min,
                        max,
                    })
                }
            }
            (ParamKind::Number { .. }, _) => Err(wrong_type("number")),
            (ParamKind::Choice(options), ParamValue::Text(v)) => {
                if options.contains(&v.as_str()) {
                    Ok(())
                } else {
                    Err(ParamError::UnknownChoice {
                        name: self.name,
                        value: v.clone(),
                    })
                }
            }
            (ParamKind::Choice(_), _) => Err(wrong_type("text")),
            (ParamKind::Flag, ParamValue::Flag(_)) => Ok(()),
            (ParamKind::Flag, _) => Err(wrong_type("flag")),
            (ParamKind::Text, ParamValue::Text(_)) => Ok(()),
            (ParamKind::Text, _) => Err(wrong_type("text")),
            (ParamKind::Steps { len, item }, ParamValue::List(steps)) => {
                if steps.len() != len {
                    return Err(ParamError::WrongLength {
                        name: self.name,
                        expected: len,
                        found: steps.len(),
                    });
                }
                match steps.iter().position(|step| !step_is_valid(item, step)) {
                    Some(index) => Err(ParamError::InvalidStep {
                        name: self.name,
                        index,
                    }),
                    None => Ok(()),
                }
            }
            (ParamKind::Steps { .. }, _) => Err(wrong_type("list")),
        }
    }
}

fn step_is_valid(kind: StepKind, step: &ParamValue) -> bool {
    match (kind, step) {
        (StepKind::Note, ParamValue::Text(name)) => name.is_empty() || Note::from_name(name).is_some(),
        (StepKind::Octave, ParamValue::Number(v)) => {
            (0.0..=8.0).contains(v) && libm::floor(*v) == *v
        }
        (StepKind::Gate, ParamValue::Number(v)) => *v == 0.0 || *v == 1.0,
        _ => false,
    }
}

/// Errors produced while validating or applying a parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// The module kind has no parameter with this name.
    Unknown {
        /// Requested name.
        name: String,
    },
    /// The parameter is display-only.
    ReadOnly {
        /// Parameter name.
        name: &'static str,
    },
    /// The value has the wrong type.
    WrongType {
        /// Parameter name.
        name: &'static str,
        /// Expected value type.
        expected: &'static str,
        /// Type that was supplied.
        found: &'static str,
    },
    /// A number outside the declared range.
    OutOfRange {
        /// Parameter name.
        name: &'static str,
        /// Supplied value.
        value: f64,
        /// Smallest accepted value.
        min: f64,
        /// Largest accepted value.
        max: f64,
    },
    /// Text that is not one of the declared options.
    UnknownChoice {
        /// Parameter name.
        name: &'static str,
        /// Supplied value.
        value: String,
    },
    /// A step list of the wrong length.
    WrongLength {
        /// Parameter name.
        name: &'static str,
        /// Declared number of steps.
        expected: usize,
        /// Supplied number of steps.
        found: usize,
    },
    /// A step list with an invalid entry.
    InvalidStep {
        /// Parameter name.
        name: &'static str,
        /// Index of the first invalid step.
        index: usize,
    },
}

impl core::fmt::Display for ParamError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unknown { name } => write!(f, "unknown parameter '{name}'"),
            Self::ReadOnly { name } => write!(f, "parameter '{name}' is read-only"),
            Self::WrongType {
                name,
                expected,
                found,
            } => write!(f, "parameter '{name}' expects a {expected}, got a {found}"),
            Self::OutOfRange {
                name,
                value,
                min,
                max,
            } => write!(f, "parameter '{name}' value {value} out of range [{min}, {max}]"),
            Self::UnknownChoice { name, value } => {
                write!(f, "parameter '{name}' has no option '{value}'")
            }
            Self::WrongLength {
                name,
                expected,
                found,
            } => write!(f, "parameter '{name}' expects {expected} steps, got {found}"),
            Self::InvalidStep { name, index } => {
                write!(f, "parameter '{name}' has an invalid value at step {index}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParamError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "std"))]
    use alloc::{string::ToString, vec};

    const WAVES: &[&str] = &["sine", "square"];

    #[test]
    fn number_range_is_inclusive() {
        let d = ParamDescriptor::number("gain", "Gain", ParamUnit::None, 0.0, 1.0);
        assert!(d.validate(&ParamValue::Number(0.0)).is_ok());
        assert!(d.validate(&ParamValue::Number(1.0)).is_ok());
        assert!(matches!(
            d.validate(&ParamValue::Number(1.01)),
            Err(ParamError::OutOfRange { name: "gain", .. })
        ));
        assert!(d.validate(&ParamValue::Number(f64::NAN)).is_err());
    }

    #[test]
    fn wrong_type_reports_both_types() {
        let d = ParamDescriptor::number("gain", "Gain", ParamUnit::None, 0.0, 1.0);
        let err = d.validate(&ParamValue::text("loud")).unwrap_err();
        assert_eq!(
            err,
            ParamError::WrongType {
                name: "gain",
                expected: "number",
                found: "text"
            }
        );
        assert_eq!(err.to_string(), "parameter 'gain' expects a number, got a text");
    }

    #[test]
    fn choice_membership() {
        let d = ParamDescriptor::choice("waveform", "Wave", WAVES);
        assert!(d.validate(&ParamValue::text("sine")).is_ok());
        assert!(matches!(
            d.validate(&ParamValue::text("noise")),
            Err(ParamError::UnknownChoice { .. })
        ));
    }

    #[test]
    fn read_only_rejects_everything() {
        let d = ParamDescriptor::number("level", "Level", ParamUnit::None, 0.0, 1.0).read_only();
        assert!(!d.is_writable());
        assert_eq!(
            d.validate(&ParamValue::Number(0.5)),
            Err(ParamError::ReadOnly { name: "level" })
        );
    }

    #[test]
    fn note_steps() {
        let d = ParamDescriptor::steps("sequence", "Sequence", 3, StepKind::Note);
        let ok = ParamValue::List(vec!["C".into(), "".into(), "C5".into()]);
        assert!(d.validate(&ok).is_ok());

        let bad = ParamValue::List(vec!["C".into(), "H".into(), "C5".into()]);
        assert_eq!(
            d.validate(&bad),
            Err(ParamError::InvalidStep {
                name: "sequence",
                index: 1
            })
        );

        let short = ParamValue::List(vec!["C".into()]);
        assert!(matches!(
            d.validate(&short),
            Err(ParamError::WrongLength {
                expected: 3,
                found: 1,
                ..
            })
        ));
    }

    #[test]
    fn octave_and_gate_steps() {
        let octaves = ParamDescriptor::steps("octaves", "Octaves", 2, StepKind::Octave);
        assert!(octaves.validate(&ParamValue::List(vec![0.0.into(), 8.0.into()])).is_ok());
        assert!(octaves.validate(&ParamValue::List(vec![4.5.into(), 4.0.into()])).is_err());
        assert!(octaves.validate(&ParamValue::List(vec![9.0.into(), 4.0.into()])).is_err());

        let gates = ParamDescriptor::steps("sequence", "Steps", 2, StepKind::Gate);
        assert!(gates.validate(&ParamValue::List(vec![0.0.into(), 1.0.into()])).is_ok());
        assert!(gates.validate(&ParamValue::List(vec![0.5.into(), 1.0.into()])).is_err());
    }

    #[test]
    fn flags_compose() {
        let flags = ParamFlags::READ_ONLY.union(ParamFlags::RESTART);
        assert!(flags.contains(ParamFlags::READ_ONLY));
        assert!(flags.contains(ParamFlags::RESTART));
        assert!(!ParamFlags::NONE.contains(ParamFlags::READ_ONLY));
    }
}
