//! Motion state: the shared per-element buffers.
//!
//! Positions, velocities, and the optional free-motion (predicted)
//! positions of every element. The state is owned by the caller and
//! shared with force fields and collision models through a
//! [`StateHandle`]; components only ever take read scopes on it.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use flexion_math::DataTypes;
use flexion_types::{FlexionError, FlexionResult};

/// Shared, single-threaded handle to a motion state.
pub type StateHandle<T> = Rc<RefCell<MotionState<T>>>;

/// Per-element buffers of one representation.
///
/// All buffers have length [`size`](Self::size). The free position buffer
/// is absent until an integration scheme populates it.
#[derive(Debug, Clone)]
pub struct MotionState<T: DataTypes> {
    positions: Vec<T::Coord>,
    velocities: Vec<T::Deriv>,
    free_positions: Option<Vec<T::Coord>>,
    /// Incremented on every resize; proxies use it to detect stale indices.
    generation: u64,
}

impl<T: DataTypes> MotionState<T> {
    /// Creates a state at rest at the given positions.
    pub fn new(positions: Vec<T::Coord>) -> Self {
        let n = positions.len();
        Self {
            positions,
            velocities: vec![T::Deriv::default(); n],
            free_positions: None,
            generation: 0,
        }
    }

    /// Creates a state with explicit velocities.
    pub fn with_velocities(positions: Vec<T::Coord>, velocities: Vec<T::Deriv>) -> FlexionResult<Self> {
        if positions.len() != velocities.len() {
            return Err(FlexionError::InvalidConfig(format!(
                "velocity count ({}) != position count ({})",
                velocities.len(),
                positions.len()
            )));
        }
        Ok(Self {
            positions,
            velocities,
            free_positions: None,
            generation: 0,
        })
    }

    /// Wraps the state in a shared handle.
    pub fn into_handle(self) -> StateHandle<T> {
        Rc::new(RefCell::new(self))
    }

    /// Number of elements.
    pub fn size(&self) -> usize {
        self.positions.len()
    }

    /// Resizes every buffer. New elements are at the default coordinate, at rest.
    pub fn resize(&mut self, n: usize) {
        self.positions.resize(n, T::Coord::default());
        self.velocities.resize(n, T::Deriv::default());
        if let Some(free) = self.free_positions.as_mut() {
            free.resize(n, T::Coord::default());
        }
        self.generation += 1;
    }

    /// Resize counter.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ─── Position ───

    pub fn positions(&self) -> &[T::Coord] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [T::Coord] {
        &mut self.positions
    }

    // ─── Velocity ───

    pub fn velocities(&self) -> &[T::Deriv] {
        &self.velocities
    }

    pub fn velocities_mut(&mut self) -> &mut [T::Deriv] {
        &mut self.velocities
    }

    // ─── Free (predicted) position ───

    /// True once a free position buffer has been populated.
    pub fn is_free_position_set(&self) -> bool {
        self.free_positions.is_some()
    }

    /// Free positions, if populated.
    pub fn free_positions(&self) -> Option<&[T::Coord]> {
        self.free_positions.as_deref()
    }

    /// Populates the free position buffer. Its length must match the state.
    pub fn set_free_positions(&mut self, free: Vec<T::Coord>) -> FlexionResult<()> {
        if free.len() != self.positions.len() {
            return Err(FlexionError::InvalidConfig(format!(
                "free position count ({}) != position count ({})",
                free.len(),
                self.positions.len()
            )));
        }
        self.free_positions = Some(free);
        Ok(())
    }

    /// Free positions predicted by explicit motion: `x_free = x + v·dt`.
    pub fn predict_free_positions(&mut self, dt: f32)
    where
        T: DataTypes<Coord = flexion_math::Vec3, Deriv = flexion_math::Vec3>,
    {
        let free = self
            .positions
            .iter()
            .zip(&self.velocities)
            .map(|(x, v)| *x + *v * dt)
            .collect();
        self.free_positions = Some(free);
    }

    /// Drops the free position buffer.
    pub fn clear_free_positions(&mut self) {
        self.free_positions = None;
    }
}

/// Read scope on the positions of a shared state.
pub fn read_positions<T: DataTypes>(handle: &StateHandle<T>) -> Ref<'_, [T::Coord]> {
    Ref::map(handle.borrow(), |s| s.positions())
}

/// Read scope on the velocities of a shared state.
pub fn read_velocities<T: DataTypes>(handle: &StateHandle<T>) -> Ref<'_, [T::Deriv]> {
    Ref::map(handle.borrow(), |s| s.velocities())
}
