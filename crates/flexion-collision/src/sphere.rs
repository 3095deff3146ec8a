//! Sphere collision elements.
//!
//! A [`SphereCollisionModel`] turns every coordinate of a motion state into
//! a sphere. Collision pipelines never hold the spheres themselves: they ask
//! the model for a [`Sphere`] proxy by index, and the proxy reads the
//! model's state on every query.
//!
//! The proxy borrows the model, so the model cannot be resized while a
//! proxy is alive. The state is shared, though; [`Sphere::is_stale`]
//! reports whether it was resized behind the proxy's back.

use std::ops::{Mul, Sub};

use flexion_math::{DataTypes, Rigid3Types, Vec3, Vec3Types};
use flexion_mechanics::{NodeContext, StateHandle};
use flexion_types::{ElementId, FlexionError, FlexionResult, NodeId, Scalar};
use tracing::{debug, warn};

use crate::bounding::{Aabb, BoundingTreeBuilder};
use crate::config::SphereModelConfig;

/// Contact-point geometry of a sphere in one representation.
pub trait SphereGeometry: DataTypes {
    /// Point on the sphere surface opposite to `normal`.
    fn contact_point_by_normal(center: Self::CPos, normal: Self::CPos, radius: Scalar) -> Self::CPos;

    /// Contact point given a point already on the surface.
    fn contact_point_with_surface_point(surface_point: Self::CPos) -> Self::CPos {
        surface_point
    }
}

/// `center - normal * radius`.
pub fn surface_point_along<P>(center: P, normal: P, radius: Scalar) -> P
where
    P: Sub<Output = P> + Mul<Scalar, Output = P>,
{
    center - normal * radius
}

impl SphereGeometry for Vec3Types {
    fn contact_point_by_normal(center: Vec3, normal: Vec3, radius: Scalar) -> Vec3 {
        surface_point_along(center, normal, radius)
    }
}

impl SphereGeometry for Rigid3Types {
    fn contact_point_by_normal(center: Vec3, normal: Vec3, radius: Scalar) -> Vec3 {
        surface_point_along(center, normal, radius)
    }
}

// ─── Model ────────────────────────────────────────────────────

/// Collection of spheres centered on the coordinates of a motion state.
#[derive(Debug)]
pub struct SphereCollisionModel<T: SphereGeometry> {
    name: String,
    owner: NodeId,
    state: StateHandle<T>,
    config: SphereModelConfig,
}

impl<T: SphereGeometry> SphereCollisionModel<T> {
    /// Creates a model over `state`, owned by scene node `owner`.
    pub fn new(owner: NodeId, state: StateHandle<T>, config: SphereModelConfig) -> FlexionResult<Self> {
        config.validate()?;
        Ok(Self {
            name: String::from("spheres"),
            owner,
            state,
            config,
        })
    }

    /// Creates a model over the motion state of `ctx`.
    pub fn from_context(ctx: &NodeContext<T>, config: SphereModelConfig) -> FlexionResult<Self> {
        let state = ctx
            .mechanical_state()
            .ok_or_else(|| FlexionError::MissingState(ctx.name().to_string()))?;
        Self::new(ctx.id(), state, config)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Reconciles the radius array with the state size.
    ///
    /// A per-element array whose length differs from the state is dropped
    /// in favor of the default radius.
    pub fn init(&mut self) {
        let n = self.size();
        let given = self.config.radius.len();
        if given != 0 && given != n {
            warn!(
                model = %self.name,
                radii = given,
                elements = n,
                default_radius = self.config.default_radius,
                "radius count does not match element count, using default radius"
            );
            self.config.radius.clear();
        }
        debug!(model = %self.name, representation = T::name(), elements = n, "sphere model initialized");
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> NodeId {
        self.owner
    }

    pub fn config(&self) -> &SphereModelConfig {
        &self.config
    }

    pub fn state(&self) -> &StateHandle<T> {
        &self.state
    }

    /// Number of spheres (the state size).
    pub fn size(&self) -> usize {
        self.state.borrow().size()
    }

    /// Resizes the state and, if per-element radii are set, the radius array.
    pub fn resize(&mut self, n: usize) {
        self.state.borrow_mut().resize(n);
        if !self.config.radius.is_empty() {
            self.config.radius.resize(n, self.config.default_radius);
        }
    }

    /// Radius of sphere `index`.
    ///
    /// The per-element array applies only while its length matches the
    /// current element count; otherwise every sphere has the default radius.
    pub fn radius_of(&self, index: usize) -> Scalar {
        self.radius_for(index, self.size())
    }

    fn radius_for(&self, index: usize, size: usize) -> Scalar {
        let radius = &self.config.radius;
        if radius.len() != size {
            return self.config.default_radius;
        }
        radius.get(index).copied().unwrap_or(self.config.default_radius)
    }

    /// Linear velocity of sphere `index`.
    pub fn velocity_of(&self, index: usize) -> FlexionResult<T::DPos> {
        let state = self.state.borrow();
        state
            .velocities()
            .get(index)
            .map(T::dpos)
            .ok_or_else(|| FlexionError::out_of_bounds(index, state.size()))
    }

    /// Accessor for sphere `index`.
    pub fn element(&self, index: usize) -> FlexionResult<Sphere<'_, T>> {
        let state = self.state.borrow();
        if index >= state.size() {
            return Err(FlexionError::out_of_bounds(index, state.size()));
        }
        Ok(Sphere {
            model: self,
            index,
            generation: state.generation(),
        })
    }

    /// Accessors for every sphere, in index order.
    pub fn elements(&self) -> impl Iterator<Item = Sphere<'_, T>> + '_ {
        let generation = self.state.borrow().generation();
        (0..self.size()).map(move |index| Sphere {
            model: self,
            index,
            generation,
        })
    }

    // ─── Flags ───

    pub fn is_active(&self) -> bool {
        self.config.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.config.active = active;
    }

    pub fn is_moving(&self) -> bool {
        self.config.moving
    }

    pub fn is_simulated(&self) -> bool {
        self.config.simulated
    }

    pub fn proximity(&self) -> Scalar {
        self.config.proximity
    }

    pub fn contact_stiffness(&self) -> Scalar {
        self.config.contact_stiffness
    }

    /// Models on the same scene node never collide with each other.
    pub fn can_collide_with<U: SphereGeometry>(&self, other: &SphereCollisionModel<U>) -> bool {
        self.owner != other.owner
    }
}

impl<T> SphereCollisionModel<T>
where
    T: SphereGeometry<CPos = Vec3, DPos = Vec3>,
{
    /// Box around every sphere, inflated by the proximity.
    ///
    /// `None` for an empty model.
    pub fn compute_bbox(&self) -> Option<Aabb> {
        let leaves = self.leaf_boxes(None);
        if leaves.is_empty() {
            return None;
        }
        let mut bbox = Aabb::empty();
        for leaf in &leaves {
            bbox.expand(leaf);
        }
        Some(bbox)
    }

    /// Rebuilds `builder` over the current sphere boxes.
    ///
    /// Static models skip the rebuild once the builder holds a tree.
    pub fn compute_bounding_tree<B: BoundingTreeBuilder + ?Sized>(&self, builder: &mut B, max_depth: usize) {
        if !self.config.moving && !builder.is_empty() {
            return;
        }
        let leaves = self.leaf_boxes(None);
        builder.build(&leaves, max_depth);
        debug!(model = %self.name, leaves = leaves.len(), max_depth, "bounding tree rebuilt");
    }

    /// Rebuilds `builder` over boxes swept from each center to `center + v·dt`.
    pub fn compute_continuous_bounding_tree<B: BoundingTreeBuilder + ?Sized>(
        &self,
        builder: &mut B,
        dt: Scalar,
        max_depth: usize,
    ) {
        if !self.config.moving && !builder.is_empty() {
            return;
        }
        let leaves = self.leaf_boxes(Some(dt));
        builder.build(&leaves, max_depth);
        debug!(model = %self.name, leaves = leaves.len(), max_depth, dt, "continuous bounding tree rebuilt");
    }

    fn leaf_boxes(&self, sweep: Option<Scalar>) -> Vec<Aabb> {
        let state = self.state.borrow();
        let size = state.size();
        state
            .positions()
            .iter()
            .zip(state.velocities())
            .enumerate()
            .map(|(i, (x, v))| {
                let center = T::cpos(x);
                let reach = self.radius_for(i, size) + self.config.proximity;
                let bbox = Aabb::around(center, reach);
                match sweep {
                    Some(dt) => bbox.union(&Aabb::around(center + T::dpos(v) * dt, reach)),
                    None => bbox,
                }
            })
            .collect()
    }
}

// ─── Element proxy ────────────────────────────────────────────

/// One sphere of a [`SphereCollisionModel`], addressed by index.
///
/// Every query reads the model's state. Queries panic if the state was
/// shrunk below the index after the proxy was created; check
/// [`is_stale`](Self::is_stale) when the state may be resized externally.
#[derive(Debug, Clone, Copy)]
pub struct Sphere<'a, T: SphereGeometry> {
    model: &'a SphereCollisionModel<T>,
    index: usize,
    generation: u64,
}

impl<'a, T: SphereGeometry> Sphere<'a, T> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Element id, `None` if the index does not fit in 32 bits.
    pub fn id(&self) -> Option<ElementId> {
        u32::try_from(self.index).ok().map(ElementId)
    }

    pub fn model(&self) -> &'a SphereCollisionModel<T> {
        self.model
    }

    /// True if the state was resized since this proxy was handed out.
    pub fn is_stale(&self) -> bool {
        self.model.state.borrow().generation() != self.generation
    }

    /// Center position.
    pub fn center(&self) -> T::CPos {
        T::cpos(&self.model.state.borrow().positions()[self.index])
    }

    /// Full coordinate, including orientation for rigid frames.
    pub fn rigid_center(&self) -> T::Coord {
        self.model.state.borrow().positions()[self.index]
    }

    /// Center at the free (predicted) position.
    pub fn predicted_position(&self) -> FlexionResult<T::CPos> {
        let state = self.model.state.borrow();
        let free = state.free_positions().ok_or(FlexionError::NoFreePosition)?;
        Ok(T::cpos(&free[self.index]))
    }

    pub fn has_free_position(&self) -> bool {
        self.model.state.borrow().is_free_position_set()
    }

    /// Linear velocity.
    pub fn velocity(&self) -> T::DPos {
        T::dpos(&self.model.state.borrow().velocities()[self.index])
    }

    pub fn radius(&self) -> Scalar {
        self.model.radius_of(self.index)
    }

    /// Surface point facing away from `normal`: `center - normal * radius`.
    pub fn contact_point_by_normal(&self, normal: T::CPos) -> T::CPos {
        T::contact_point_by_normal(self.center(), normal, self.radius())
    }

    /// Contact point for a point already on the surface.
    pub fn contact_point_with_surface_point(&self, surface_point: T::CPos) -> T::CPos {
        T::contact_point_with_surface_point(surface_point)
    }
}

impl<T> Sphere<'_, T>
where
    T: SphereGeometry<CPos = Vec3, DPos = Vec3>,
{
    /// Box around this sphere, inflated by the model's proximity.
    pub fn bounds(&self) -> Aabb {
        Aabb::around(self.center(), self.radius() + self.model.config.proximity)
    }
}
