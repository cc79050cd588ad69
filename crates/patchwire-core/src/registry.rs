//! Live module storage.
//!
//! [`ModuleRegistry`] exclusively owns every module of a session. Lookup is
//! by [`ModuleId`]; iteration follows insertion order so that serialization
//! is reproducible. Identifiers come from a monotonic counter that is never
//! rewound, not even by [`clear`](ModuleRegistry::clear).

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

use crate::error::GraphError;
use crate::module::{Module, ModuleFactory, ModuleId, Position};

struct Slot {
    id: ModuleId,
    position: Position,
    module: Box<dyn Module>,
}

/// Owns the live set of modules, keyed by identifier.
pub struct ModuleRegistry {
    slots: Vec<Slot>,
    next_id: u64,
    factory: Box<dyn ModuleFactory>,
}

impl ModuleRegistry {
    /// Creates an empty registry that builds modules with `factory`.
    pub fn new(factory: impl ModuleFactory + 'static) -> Self {
        Self::with_factory(Box::new(factory))
    }

    /// Creates an empty registry from a boxed factory.
    pub fn with_factory(factory: Box<dyn ModuleFactory>) -> Self {
        Self {
            slots: Vec::new(),
            next_id: 0,
            factory,
        }
    }

    /// Creates a module of `kind` at `(x, y)` under a fresh identifier.
    pub fn create(&mut self, kind: &str, x: f64, y: f64) -> Result<ModuleId, GraphError> {
        let module = self
            .factory
            .create(kind)
            .ok_or_else(|| GraphError::UnknownKind(kind.into()))?;
        Ok(self.insert(module, x, y))
    }

    /// Registers an already constructed module under a fresh identifier.
    pub fn insert(&mut self, module: Box<dyn Module>, x: f64, y: f64) -> ModuleId {
        let mut id = ModuleId::from_counter(self.next_id);
        while self.contains(&id) {
            self.next_id = self.next_id.wrapping_add(1);
            id = ModuleId::from_counter(self.next_id);
        }
        self.next_id = self.next_id.wrapping_add(1);
        self.push(id.clone(), module, Position::new(x, y));
        id
    }

    /// Creates a module of `kind` under a caller-chosen identifier.
    ///
    /// Used when replaying a saved document. A `module-{n}` identifier moves
    /// the counter past `n` so later [`create`](Self::create) calls cannot
    /// collide with it. At the top of the `u64` range the counter stays put
    /// and `create` skips identifiers already taken.
    pub fn restore(
        &mut self,
        id: ModuleId,
        kind: &str,
        x: f64,
        y: f64,
    ) -> Result<(), GraphError> {
        if self.contains(&id) {
            return Err(GraphError::DuplicateModule(id));
        }
        let module = self
            .factory
            .create(kind)
            .ok_or_else(|| GraphError::UnknownKind(kind.into()))?;
        if let Some(next) = id.counter().and_then(|n| n.checked_add(1)) {
            self.next_id = self.next_id.max(next);
        }
        self.push(id, module, Position::new(x, y));
        Ok(())
    }

    fn push(&mut self, id: ModuleId, module: Box<dyn Module>, position: Position) {
        #[cfg(feature = "tracing")]
        tracing::debug!(id = %id, kind = module.kind(), "module_create");

        self.slots.push(Slot {
            id,
            position,
            module,
        });
    }

    fn index_of(&self, id: &ModuleId) -> Result<usize, GraphError> {
        self.slots
            .iter()
            .position(|s| s.id == *id)
            .ok_or_else(|| GraphError::ModuleNotFound(id.clone()))
    }

    /// Returns `true` if `id` is registered.
    pub fn contains(&self, id: &ModuleId) -> bool {
        self.slots.iter().any(|s| s.id == *id)
    }

    /// Looks up a module.
    pub fn get(&self, id: &ModuleId) -> Result<&dyn Module, GraphError> {
        let index = self.index_of(id)?;
        Ok(self.slots[index].module.as_ref())
    }

    /// Looks up a module mutably.
    pub fn get_mut(&mut self, id: &ModuleId) -> Result<&mut dyn Module, GraphError> {
        let index = self.index_of(id)?;
        Ok(self.slots[index].module.as_mut())
    }

    /// Borrows two distinct modules mutably at once.
    pub fn pair_mut(
        &mut self,
        a: &ModuleId,
        b: &ModuleId,
    ) -> Result<(&mut dyn Module, &mut dyn Module), GraphError> {
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;
        if ia == ib {
            return Err(GraphError::SelfConnection(a.clone()));
        }
        let (left, right) = self.slots.split_at_mut(ia.max(ib));
        let low: &mut dyn Module = left[ia.min(ib)].module.as_mut();
        let high: &mut dyn Module = right[0].module.as_mut();
        Ok(if ia < ib { (low, high) } else { (high, low) })
    }

    /// Removes a module and returns it. Removing an absent id is a no-op.
    ///
    /// Connections are not this type's concern: callers sever them first
    /// (see [`GraphSession::remove_module`](crate::GraphSession::remove_module)).
    pub fn remove(&mut self, id: &ModuleId) -> Option<Box<dyn Module>> {
        let index = self.index_of(id).ok()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(id = %id, "module_remove");

        Some(self.slots.remove(index).module)
    }

    /// Canvas position of a module.
    pub fn position(&self, id: &ModuleId) -> Result<Position, GraphError> {
        let index = self.index_of(id)?;
        Ok(self.slots[index].position)
    }

    /// Moves a module on the canvas.
    pub fn set_position(&mut self, id: &ModuleId, x: f64, y: f64) -> Result<(), GraphError> {
        let index = self.index_of(id)?;
        self.slots[index].position = Position::new(x, y);
        Ok(())
    }

    /// Iterates modules in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&ModuleId, Position, &dyn Module)> {
        self.slots
            .iter()
            .map(|s| (&s.id, s.position, s.module.as_ref() as &dyn Module))
    }

    /// Iterates modules mutably in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&ModuleId, &mut dyn Module)> {
        self.slots
            .iter_mut()
            .map(|s| (&s.id, s.module.as_mut() as &mut dyn Module))
    }

    /// Identifiers in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &ModuleId> {
        self.slots.iter().map(|s| &s.id)
    }

    /// Number of registered modules.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no modules are registered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drops every module. The identifier counter keeps counting.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl core::fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("modules", &self.slots.iter().map(|s| &s.id).collect::<Vec<_>>())
            .field("next_id", &self.next_id)
            .finish()
    }
}
