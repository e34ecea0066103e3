//! Broad-phase collision handling between two layers.
//!
//! A [`RectangleCollisionHandler`] scans every active body of its first layer
//! against every active body of its second, and hands each pair whose bounding
//! boxes overlap to a [`CollisionRule`]. Rules may mutate both bodies but must
//! not touch the layers directly; new bodies go through [`StagedAdditions`]
//! and are committed once the scan is over, mirroring a deferred command
//! buffer.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::layer::LayerHandle;
use crate::rectangle::RectangleBody;
use crate::PhysicsError;

// ---------------------------------------------------------------------------
// Handler trait and reports
// ---------------------------------------------------------------------------

/// Something the physics engine runs after the integration step.
pub trait CollisionHandler {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Run one full detection and resolution pass.
    fn find_and_reconcile_collisions(&mut self) -> Result<ScanReport, PhysicsError>;
}

/// Diagnostics for one handler pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Active pairs whose bounding boxes were compared.
    pub pairs_tested: usize,
    /// Pairs handed to the collision rule.
    pub collisions: usize,
    /// Bodies committed to the first layer after the scan.
    pub layer1_added: usize,
    /// Bodies committed to the second layer after the scan.
    pub layer2_added: usize,
}

impl ScanReport {
    /// Fold another report into this one.
    pub fn merge(&mut self, other: &ScanReport) {
        self.pairs_tested += other.pairs_tested;
        self.collisions += other.collisions;
        self.layer1_added += other.layer1_added;
        self.layer2_added += other.layer2_added;
    }
}

// ---------------------------------------------------------------------------
// Staged additions
// ---------------------------------------------------------------------------

/// Bodies a collision rule wants added to either layer.
///
/// Nothing here reaches a layer until the scan that staged it has finished.
#[derive(Debug)]
pub struct StagedAdditions<A, B> {
    first: Vec<A>,
    second: Vec<B>,
}

impl<A, B> Default for StagedAdditions<A, B> {
    fn default() -> Self {
        Self {
            first: Vec::new(),
            second: Vec::new(),
        }
    }
}

impl<A, B> StagedAdditions<A, B> {
    /// Stage a body for the handler's first layer.
    pub fn add_to_first(&mut self, body: A) {
        self.first.push(body);
    }

    /// Stage a body for the handler's second layer.
    pub fn add_to_second(&mut self, body: B) {
        self.second.push(body);
    }

    /// Bodies staged for either layer.
    pub fn len(&self) -> usize {
        self.first.len() + self.second.len()
    }

    /// Nothing staged for either layer.
    pub fn is_empty(&self) -> bool {
        self.first.is_empty() && self.second.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Collision rules
// ---------------------------------------------------------------------------

/// Game-specific response to an overlapping pair.
///
/// Implemented for any `FnMut(&mut A, &mut B, &mut StagedAdditions<A, B>) ->
/// anyhow::Result<()>`, so most rules are closures.
pub trait CollisionRule<A, B> {
    /// Respond to `a` overlapping `b`. Bodies to spawn go into `staged`.
    ///
    /// An error aborts the rest of the scan and surfaces as
    /// [`PhysicsError::CollisionRule`].
    fn collide(
        &mut self,
        a: &mut A,
        b: &mut B,
        staged: &mut StagedAdditions<A, B>,
    ) -> anyhow::Result<()>;
}

impl<A, B, F> CollisionRule<A, B> for F
where
    F: FnMut(&mut A, &mut B, &mut StagedAdditions<A, B>) -> anyhow::Result<()>,
{
    fn collide(
        &mut self,
        a: &mut A,
        b: &mut B,
        staged: &mut StagedAdditions<A, B>,
    ) -> anyhow::Result<()> {
        self(a, b, staged)
    }
}

// ---------------------------------------------------------------------------
// Rectangle handler
// ---------------------------------------------------------------------------

/// Pairwise bounding-box scan between two distinct layers.
pub struct RectangleCollisionHandler<A, B, R> {
    name: String,
    layer1: LayerHandle<A>,
    layer2: LayerHandle<B>,
    rule: R,
    staged: StagedAdditions<A, B>,
}

impl<A, B, R> RectangleCollisionHandler<A, B, R>
where
    A: RectangleBody,
    B: RectangleBody,
    R: CollisionRule<A, B>,
{
    /// Build a handler over two layers.
    ///
    /// Fails with [`PhysicsError::AliasedLayers`] if both handles point at the
    /// same layer.
    pub fn new(
        name: impl Into<String>,
        layer1: LayerHandle<A>,
        layer2: LayerHandle<B>,
        rule: R,
    ) -> Result<Self, PhysicsError> {
        let name = name.into();
        let p1 = Rc::as_ptr(&layer1) as *const ();
        let p2 = Rc::as_ptr(&layer2) as *const ();
        if p1 == p2 {
            return Err(PhysicsError::AliasedLayers { handler: name });
        }
        Ok(Self {
            name,
            layer1,
            layer2,
            rule,
            staged: StagedAdditions::default(),
        })
    }

    /// Bodies staged but not yet committed (non-zero only after a failed pass).
    pub fn pending(&self) -> usize {
        self.staged.len()
    }

    /// The rule this handler applies to each overlapping pair.
    pub fn rule(&self) -> &R {
        &self.rule
    }

    /// Mutable access to the rule, e.g. to reset per-level state.
    pub fn rule_mut(&mut self) -> &mut R {
        &mut self.rule
    }
}

impl<A, B, R> CollisionHandler for RectangleCollisionHandler<A, B, R>
where
    A: RectangleBody,
    B: RectangleBody,
    R: CollisionRule<A, B>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn find_and_reconcile_collisions(&mut self) -> Result<ScanReport, PhysicsError> {
        let mut first = self
            .layer1
            .try_borrow_mut()
            .map_err(|_| layer_busy(&self.name))?;
        let mut second = self
            .layer2
            .try_borrow_mut()
            .map_err(|_| layer_busy(&self.name))?;
        let mut report = ScanReport::default();

        // Sizes are fixed for the whole scan.
        let n1 = first.len();
        let n2 = second.len();

        for i in 0..n1 {
            let Some(a) = first.get_mut(i) else { break };
            if !a.is_active() {
                continue;
            }
            for j in 0..n2 {
                let Some(b) = second.get_mut(j) else { break };
                if !b.is_active() {
                    continue;
                }
                report.pairs_tested += 1;
                if !a.bounding_box().intersects(&b.bounding_box()) {
                    continue;
                }
                report.collisions += 1;
                if let Err(source) = self.rule.collide(a, b, &mut self.staged) {
                    warn!(
                        handler = %self.name,
                        first_index = i,
                        second_index = j,
                        error = %source,
                        "collision rule failed, aborting scan"
                    );
                    return Err(PhysicsError::CollisionRule {
                        handler: self.name.clone(),
                        source,
                    });
                }
            }
        }

        report.layer1_added = self.staged.first.len();
        report.layer2_added = self.staged.second.len();
        first.extend(self.staged.first.drain(..));
        second.extend(self.staged.second.drain(..));

        trace!(
            handler = %self.name,
            pairs = report.pairs_tested,
            collisions = report.collisions,
            added_first = report.layer1_added,
            added_second = report.layer2_added,
            "collision scan committed"
        );
        Ok(report)
    }
}

fn layer_busy(handler: &str) -> PhysicsError {
    warn!(handler, "collision layer already borrowed");
    PhysicsError::LayerBusy {
        context: format!("collision handler `{handler}`"),
    }
}
