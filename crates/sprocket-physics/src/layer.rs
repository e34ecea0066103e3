//! Ordered groups of bodies.
//!
//! A [`BodyLayer`] is owned by the application and shared with the physics
//! engine and collision handlers through a [`LayerHandle`]
//! (`Rc<RefCell<BodyLayer<B>>>`). The engine never owns a layer; dropping the
//! application's handles after [`VanillaPhysicsEngine::clear`] frees it.
//!
//! [`VanillaPhysicsEngine::clear`]: crate::engine::VanillaPhysicsEngine::clear

use std::cell::RefCell;
use std::rc::Rc;

use crate::body::{Body, BodyState};

/// Shared, application-owned layer.
pub type LayerHandle<B> = Rc<RefCell<BodyLayer<B>>>;

/// What [`BodyLayer::update`] does with its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePolicy {
    /// Members are never updated by the layer (scenery, backgrounds).
    NoUpdate,
    /// Every member is updated, whether or not it is active.
    Iterative,
}

/// Receives bodies to draw. Implemented by whatever rendering backend the
/// application uses.
pub trait BodyRenderer<B: ?Sized> {
    /// Draw one active body.
    fn render_body(&mut self, body: &B);
}

impl<B: ?Sized, F: FnMut(&B)> BodyRenderer<B> for F {
    fn render_body(&mut self, body: &B) {
        self(body)
    }
}

/// An ordered sequence of bodies plus an activation flag.
#[derive(Debug, Clone)]
pub struct BodyLayer<B> {
    members: Vec<B>,
    active: bool,
    policy: UpdatePolicy,
}

impl<B: Body> BodyLayer<B> {
    /// A layer whose `update` does nothing.
    pub fn no_update() -> Self {
        Self::with_policy(UpdatePolicy::NoUpdate)
    }

    /// A layer whose `update` advances every member.
    pub fn iterative_update() -> Self {
        Self::with_policy(UpdatePolicy::Iterative)
    }

    /// An empty, active layer with the given update policy.
    pub fn with_policy(policy: UpdatePolicy) -> Self {
        Self {
            members: Vec::new(),
            active: true,
            policy,
        }
    }

    /// Like [`with_policy`](Self::with_policy), preallocating room for
    /// `capacity` members.
    pub fn with_capacity(policy: UpdatePolicy, capacity: usize) -> Self {
        Self {
            members: Vec::with_capacity(capacity),
            active: true,
            policy,
        }
    }

    /// Wrap the layer in a shareable handle.
    pub fn into_handle(self) -> LayerHandle<B> {
        Rc::new(RefCell::new(self))
    }

    /// How [`update`](Self::update) treats the members.
    pub fn policy(&self) -> UpdatePolicy {
        self.policy
    }

    /// Append a body; it is updated and rendered after the existing members.
    pub fn add(&mut self, body: B) {
        self.members.push(body);
    }

    /// Member at `index` in insertion order.
    pub fn get(&self, index: usize) -> Option<&B> {
        self.members.get(index)
    }

    /// Mutable member at `index` in insertion order.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut B> {
        self.members.get_mut(index)
    }

    /// Member count, active or not.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// No members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Remove every member. The layer stays usable.
    pub fn clear(&mut self) {
        self.members.clear();
    }

    /// Members in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, B> {
        self.members.iter()
    }

    /// Mutable members in insertion order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, B> {
        self.members.iter_mut()
    }

    /// All members as a slice.
    pub fn members(&self) -> &[B] {
        &self.members
    }

    /// Activate or deactivate the layer. An inactive layer renders nothing;
    /// updates and collision scans still see its members.
    pub fn set_activation(&mut self, active: bool) {
        self.active = active;
    }

    /// Whether [`render`](Self::render) draws anything.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Apply the layer's update policy. Returns the number of members updated.
    pub fn update(&mut self, delta_ms: i64) -> usize {
        match self.policy {
            UpdatePolicy::NoUpdate => 0,
            UpdatePolicy::Iterative => self.update_all(delta_ms),
        }
    }

    /// Update every member regardless of policy or activation.
    pub fn update_all(&mut self, delta_ms: i64) -> usize {
        for body in &mut self.members {
            body.update(delta_ms);
        }
        self.members.len()
    }

    /// Hand each active member to `renderer`, in order.
    ///
    /// An inactive layer renders nothing. Returns the number of bodies drawn.
    pub fn render(&self, renderer: &mut dyn BodyRenderer<B>) -> usize {
        if !self.active {
            return 0;
        }
        let mut drawn = 0;
        for body in self.members.iter().filter(|b| b.is_active()) {
            renderer.render_body(body);
            drawn += 1;
        }
        drawn
    }
}

impl<B: Body> Extend<B> for BodyLayer<B> {
    fn extend<I: IntoIterator<Item = B>>(&mut self, iter: I) {
        self.members.extend(iter);
    }
}

impl<'a, B> IntoIterator for &'a BodyLayer<B> {
    type Item = &'a B;
    type IntoIter = std::slice::Iter<'a, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

// ---------------------------------------------------------------------------
// Type-erased view used by the physics engine
// ---------------------------------------------------------------------------

/// Object-safe view of a layer, letting the engine hold layers of different
/// body types side by side.
pub trait ManagedLayer {
    /// Update every member, ignoring the layer's policy and the members'
    /// activation. Returns the number of members updated.
    fn integrate(&mut self, delta_ms: i64) -> usize;

    fn member_count(&self) -> usize;

    /// Copy of every member's kinematic state, in order.
    fn states(&self) -> Vec<BodyState>;
}

impl<B: Body> ManagedLayer for BodyLayer<B> {
    fn integrate(&mut self, delta_ms: i64) -> usize {
        self.update_all(delta_ms)
    }

    fn member_count(&self) -> usize {
        self.len()
    }

    fn states(&self) -> Vec<BodyState> {
        self.members.iter().map(|b| *b.state()).collect()
    }
}
