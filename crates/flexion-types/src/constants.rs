//! Engine-wide defaults.

/// Volume used by a material block that has no quadrature weight bound.
pub const UNIT_VOLUME: f32 = 1.0;

/// Radius broadcast to every sphere when no per-element radius is given.
pub const DEFAULT_SPHERE_RADIUS: f32 = 1.0;

/// Default contact stiffness reported by collision models.
pub const DEFAULT_CONTACT_STIFFNESS: f32 = 10.0;

/// Default distance between a collision model and the actual surface.
pub const DEFAULT_PROXIMITY: f32 = 0.0;

/// Determinant below which a material block is treated as singular
/// when inverting it into a compliance block.
pub const SINGULAR_DETERMINANT: f32 = 1.0e-12;
