//! Global play / stop state.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::error::PartialStartFailure;
use crate::graph::ConnectionGraph;
use crate::registry::ModuleRegistry;

/// Whether routes are live.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// Initial state. Edges are topology only.
    #[default]
    Stopped,
    /// Every module started, every edge realized.
    Playing,
}

/// Starts and stops the whole graph.
#[derive(Debug, Default)]
pub struct PlaybackController {
    state: PlaybackState,
}

impl PlaybackController {
    /// A stopped controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Returns `true` while playing.
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Starts every module in registry order, then realizes every edge.
    ///
    /// Fail-soft: a module that refuses to start is recorded and the rest
    /// keep going. The controller is `Playing` afterwards either way; the
    /// error lists the modules that stayed silent. Calling `start` while
    /// playing does nothing.
    pub fn start(
        &mut self,
        registry: &mut ModuleRegistry,
        graph: &mut ConnectionGraph,
    ) -> Result<(), PartialStartFailure> {
        if self.is_playing() {
            return Ok(());
        }

        let mut failures = Vec::new();
        let mut attempted = 0;
        for (id, module) in registry.iter_mut() {
            attempted += 1;
            if let Err(err) = module.start() {
                #[cfg(feature = "tracing")]
                tracing::warn!(id = %id, kind = module.kind(), "module failed to start: {err}");
                failures.push((id.clone(), err));
            }
        }
        let _realized = graph.realize_all(registry);
        self.state = PlaybackState::Playing;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            modules = attempted,
            failed = failures.len(),
            routes = _realized,
            "playback_start"
        );

        if failures.is_empty() {
            Ok(())
        } else {
            Err(PartialStartFailure {
                failures,
                attempted,
            })
        }
    }

    /// Tears down every route, then stops every module in registry order.
    ///
    /// Unconditional: modules are stopped even if the controller already
    /// thinks it is stopped.
    pub fn stop(&mut self, registry: &mut ModuleRegistry, graph: &mut ConnectionGraph) {
        graph.unrealize_all(registry);
        for (_, module) in registry.iter_mut() {
            module.stop();
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(was_playing = self.is_playing(), "playback_stop");

        self.state = PlaybackState::Stopped;
    }

    /// Stops when playing, starts otherwise. Returns the new state.
    pub fn toggle(
        &mut self,
        registry: &mut ModuleRegistry,
        graph: &mut ConnectionGraph,
    ) -> Result<PlaybackState, PartialStartFailure> {
        if self.is_playing() {
            self.stop(registry, graph);
        } else {
            self.start(registry, graph)?;
        }
        Ok(self.state)
    }
}
