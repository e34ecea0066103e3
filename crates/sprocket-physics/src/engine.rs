//! The vanilla physics engine: integrate every body, then resolve collisions.
//!
//! # Step Order
//!
//! ```text
//! apply_laws_of_physics(delta_ms)
//!   1. every member of every managed layer: update(delta_ms)
//!   2. every registered handler, in registration order:
//!        find_and_reconcile_collisions()
//! ```
//!
//! There is a single pass per step; no relaxation or re-checking after
//! resolution. A failing handler stops the step and later handlers do not
//! run.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::body::{Body, BodyState};
use crate::collision::{CollisionHandler, ScanReport};
use crate::layer::{BodyLayer, LayerHandle, ManagedLayer};
use crate::PhysicsError;

/// Diagnostics for one [`VanillaPhysicsEngine::apply_laws_of_physics`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Bodies whose `update` ran.
    pub bodies_updated: usize,
    /// Handlers that completed their pass.
    pub handlers_run: usize,
    /// Sum of the handlers' scan reports.
    pub scan: ScanReport,
}

/// Holds registrations, never ownership: layers stay with the application.
#[derive(Default)]
pub struct VanillaPhysicsEngine {
    layers: Vec<Rc<RefCell<dyn ManagedLayer>>>,
    handlers: Vec<Box<dyn CollisionHandler>>,
}

impl VanillaPhysicsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a layer whose members are integrated every step.
    pub fn manage_viewable_set<B: Body + 'static>(&mut self, layer: LayerHandle<B>) {
        let layer: Rc<RefCell<dyn ManagedLayer>> = layer;
        self.layers.push(layer);
        debug!(layers = self.layers.len(), "layer registered with physics");
    }

    /// Wrap `layer` in a handle, register it, and return the handle.
    pub fn manage_new_layer<B: Body + 'static>(&mut self, layer: BodyLayer<B>) -> LayerHandle<B> {
        let handle = layer.into_handle();
        self.manage_viewable_set(Rc::clone(&handle));
        handle
    }

    /// Register a handler; handlers run in registration order.
    pub fn register_collision_handler<H: CollisionHandler + 'static>(&mut self, handler: H) {
        debug!(handler = handler.name(), "collision handler registered");
        self.handlers.push(Box::new(handler));
    }

    /// Drop every layer and handler registration.
    pub fn clear(&mut self) {
        self.layers.clear();
        self.handlers.clear();
        debug!("physics registrations cleared");
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Total members across all managed layers.
    pub fn body_count(&self) -> usize {
        self.layers
            .iter()
            .filter_map(|l| l.try_borrow().ok().map(|l| l.member_count()))
            .sum()
    }

    /// Kinematic state of every managed body, grouped by layer in
    /// registration order.
    pub fn body_states(&self) -> Result<Vec<Vec<BodyState>>, PhysicsError> {
        self.layers
            .iter()
            .map(|layer| {
                layer
                    .try_borrow()
                    .map(|l| l.states())
                    .map_err(|_| PhysicsError::LayerBusy {
                        context: "state capture".to_owned(),
                    })
            })
            .collect()
    }

    /// Advance the simulation by `delta_ms` milliseconds.
    ///
    /// Every body is updated exactly once before any handler runs. The first
    /// handler error aborts the step and is returned unchanged.
    pub fn apply_laws_of_physics(&mut self, delta_ms: i64) -> Result<StepReport, PhysicsError> {
        let mut report = StepReport::default();

        for layer in &self.layers {
            let mut layer = layer.try_borrow_mut().map_err(|_| {
                warn!("managed layer already borrowed during integration");
                PhysicsError::LayerBusy {
                    context: "integration".to_owned(),
                }
            })?;
            report.bodies_updated += layer.integrate(delta_ms);
        }

        for handler in &mut self.handlers {
            let scan = handler.find_and_reconcile_collisions()?;
            report.scan.merge(&scan);
            report.handlers_run += 1;
        }

        trace!(
            delta_ms,
            bodies = report.bodies_updated,
            handlers = report.handlers_run,
            collisions = report.scan.collisions,
            "physics step"
        );
        Ok(report)
    }
}
