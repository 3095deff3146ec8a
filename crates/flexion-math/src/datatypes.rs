//! Representation descriptors for coordinates and derivatives.
//!
//! A representation (plain 3D point, rigid frame) is a zero-sized type
//! implementing [`DataTypes`]. Force fields and collision elements are
//! generic over it, so the projections from a full coordinate to its
//! center position, and from a full derivative to its linear part, are
//! resolved statically and inline into the per-element loops.

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use flexion_types::Scalar;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Static description of a state representation.
pub trait DataTypes: Debug + Clone + Copy + Default + Send + Sync + 'static {
    /// Full coordinate stored in the position buffers.
    type Coord: Copy + Debug + Default + PartialEq;

    /// Full derivative stored in velocity, force, and delta buffers.
    type Deriv: Copy
        + Debug
        + Default
        + PartialEq
        + Add<Output = Self::Deriv>
        + AddAssign
        + Sub<Output = Self::Deriv>
        + Neg<Output = Self::Deriv>
        + Mul<Scalar, Output = Self::Deriv>;

    /// Center position extracted from a coordinate.
    type CPos: Copy + Debug + PartialEq;

    /// Linear part extracted from a derivative.
    type DPos: Copy + Debug + PartialEq;

    /// Number of scalars in one derivative (the operator block size).
    const DERIV_DIM: usize;

    /// Short representation name, used in logs.
    fn name() -> &'static str;

    /// Extract the center position of a coordinate.
    fn cpos(x: &Self::Coord) -> Self::CPos;

    /// Extract the linear part of a derivative.
    fn dpos(v: &Self::Deriv) -> Self::DPos;

    /// Write the components of `v` into `out[..DERIV_DIM]`.
    fn write_deriv(v: &Self::Deriv, out: &mut [Scalar]);

    /// Read a derivative from `src[..DERIV_DIM]`.
    fn read_deriv(src: &[Scalar]) -> Self::Deriv;
}

// ─── Plain 3D vectors ─────────────────────────────────────────

/// Points in 3D space. Coordinates and derivatives are both `Vec3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Vec3Types;

impl DataTypes for Vec3Types {
    type Coord = Vec3;
    type Deriv = Vec3;
    type CPos = Vec3;
    type DPos = Vec3;

    const DERIV_DIM: usize = 3;

    fn name() -> &'static str {
        "Vec3"
    }

    #[inline]
    fn cpos(x: &Vec3) -> Vec3 {
        *x
    }

    #[inline]
    fn dpos(v: &Vec3) -> Vec3 {
        *v
    }

    #[inline]
    fn write_deriv(v: &Vec3, out: &mut [Scalar]) {
        out[..3].copy_from_slice(&v.to_array());
    }

    #[inline]
    fn read_deriv(src: &[Scalar]) -> Vec3 {
        Vec3::new(src[0], src[1], src[2])
    }
}

// ─── Rigid frames ─────────────────────────────────────────────

/// Rigid body coordinate: center of the frame plus its orientation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RigidCoord {
    pub center: Vec3,
    pub orientation: Quat,
}

impl RigidCoord {
    pub fn new(center: Vec3, orientation: Quat) -> Self {
        Self { center, orientation }
    }

    /// Frame at `center` with identity orientation.
    pub fn from_center(center: Vec3) -> Self {
        Self {
            center,
            orientation: Quat::IDENTITY,
        }
    }
}

/// Rigid body derivative: linear and angular components.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RigidDeriv {
    pub linear: Vec3,
    pub angular: Vec3,
}

impl RigidDeriv {
    pub fn new(linear: Vec3, angular: Vec3) -> Self {
        Self { linear, angular }
    }
}

impl Add for RigidDeriv {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            linear: self.linear + rhs.linear,
            angular: self.angular + rhs.angular,
        }
    }
}

impl AddAssign for RigidDeriv {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.linear += rhs.linear;
        self.angular += rhs.angular;
    }
}

impl Sub for RigidDeriv {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            linear: self.linear - rhs.linear,
            angular: self.angular - rhs.angular,
        }
    }
}

impl Neg for RigidDeriv {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self {
            linear: -self.linear,
            angular: -self.angular,
        }
    }
}

impl Mul<Scalar> for RigidDeriv {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Scalar) -> Self {
        Self {
            linear: self.linear * rhs,
            angular: self.angular * rhs,
        }
    }
}

/// Rigid frames in 3D space (6 degrees of freedom per element).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rigid3Types;

impl DataTypes for Rigid3Types {
    type Coord = RigidCoord;
    type Deriv = RigidDeriv;
    type CPos = Vec3;
    type DPos = Vec3;

    const DERIV_DIM: usize = 6;

    fn name() -> &'static str {
        "Rigid3"
    }

    #[inline]
    fn cpos(x: &RigidCoord) -> Vec3 {
        x.center
    }

    #[inline]
    fn dpos(v: &RigidDeriv) -> Vec3 {
        v.linear
    }

    #[inline]
    fn write_deriv(v: &RigidDeriv, out: &mut [Scalar]) {
        out[..3].copy_from_slice(&v.linear.to_array());
        out[3..6].copy_from_slice(&v.angular.to_array());
    }

    #[inline]
    fn read_deriv(src: &[Scalar]) -> RigidDeriv {
        RigidDeriv {
            linear: Vec3::new(src[0], src[1], src[2]),
            angular: Vec3::new(src[3], src[4], src[5]),
        }
    }
}
