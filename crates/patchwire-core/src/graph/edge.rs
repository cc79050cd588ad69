//! Connection descriptors.

use crate::module::ModuleId;

/// A directed edge from one module's output port to another module's input
/// port.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Connection {
    /// Source module.
    pub from: ModuleId,
    /// Output port index on the source.
    pub from_port: usize,
    /// Destination module.
    pub to: ModuleId,
    /// Input port index on the destination.
    pub to_port: usize,
}

impl Connection {
    /// Creates a connection descriptor.
    pub fn new(
        from: impl Into<ModuleId>,
        from_port: usize,
        to: impl Into<ModuleId>,
        to_port: usize,
    ) -> Self {
        Self {
            from: from.into(),
            from_port,
            to: to.into(),
            to_port,
        }
    }

    /// Returns `true` if `id` is either endpoint.
    pub fn touches(&self, id: &ModuleId) -> bool {
        self.from == *id || self.to == *id
    }
}

impl core::fmt::Display for Connection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}:{} -> {}:{}",
            self.from, self.from_port, self.to, self.to_port
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "std"))]
    use alloc::string::ToString;

    #[test]
    fn touches_both_ends() {
        let c = Connection::new("a", 0, "b", 1);
        assert!(c.touches(&ModuleId::new("a")));
        assert!(c.touches(&ModuleId::new("b")));
        assert!(!c.touches(&ModuleId::new("c")));
    }

    #[test]
    fn display() {
        assert_eq!(Connection::new("a", 0, "b", 1).to_string(), "a:0 -> b:1");
    }
}
