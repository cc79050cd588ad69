//! Parameter storage shared by every module kind.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use patchwire_core::{ParamDescriptor, ParamValue};

/// Current values for a fixed list of descriptors.
///
/// Values are stored as given; validation already happened in
/// [`Module::set_parameter`](patchwire_core::Module::set_parameter).
/// Typed getters fall back to a neutral value if a slot holds an
/// unexpected type, which only a bug in a module could cause.
#[derive(Debug, Clone)]
pub struct ParamSet {
    descriptors: &'static [ParamDescriptor],
    values: Vec<ParamValue>,
}

impl ParamSet {
    /// Creates a set with one default per descriptor.
    pub fn new(descriptors: &'static [ParamDescriptor], defaults: Vec<ParamValue>) -> Self {
        debug_assert_eq!(descriptors.len(), defaults.len());
        Self {
            descriptors,
            values: defaults,
        }
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` for kinds without parameters.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptor at `index`.
    pub fn descriptor(&self, index: usize) -> Option<ParamDescriptor> {
        self.descriptors.get(index).copied()
    }

    /// Value at `index`.
    pub fn get(&self, index: usize) -> Option<ParamValue> {
        self.values.get(index).cloned()
    }

    /// Replaces the value at `index`. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, value: ParamValue) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value;
        }
    }

    /// Number at `index`, or `0.0`.
    pub fn number(&self, index: usize) -> f64 {
        self.values
            .get(index)
            .and_then(ParamValue::as_number)
            .unwrap_or(0.0)
    }

    /// Flag at `index`, or `false`.
    pub fn flag(&self, index: usize) -> bool {
        self.values
            .get(index)
            .and_then(ParamValue::as_flag)
            .unwrap_or(false)
    }

    /// Text at `index`, or `""`.
    pub fn text(&self, index: usize) -> &str {
        self.values
            .get(index)
            .and_then(ParamValue::as_text)
            .unwrap_or("")
    }

    /// Step list at `index`, or empty.
    pub fn steps(&self, index: usize) -> &[ParamValue] {
        self.values
            .get(index)
            .and_then(ParamValue::as_list)
            .unwrap_or(&[])
    }
}

/// Implements the parameter half of [`Module`](patchwire_core::Module) by
/// delegating to a `params: ParamSet` field.
macro_rules! delegate_params {
    () => {
        fn param_count(&self) -> usize {
            self.params.len()
        }

        fn param_info(&self, index: usize) -> Option<patchwire_core::ParamDescriptor> {
            self.params.descriptor(index)
        }

        fn get_param(&self, index: usize) -> Option<patchwire_core::ParamValue> {
            self.params.get(index)
        }
    };
}

pub(crate) use delegate_params;
