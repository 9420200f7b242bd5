//! Common ECS components read by the steering system

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Transform component for position, rotation, and scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,
    /// Rotation as a quaternion
    pub rotation: Quat,
    /// Scale factor
    pub scale: Vec3,
}

impl Transform {
    /// Create a new transform at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transform with just a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Build a transform from an orthonormal forward/up frame.
    ///
    /// `forward` and `up` must be unit length and perpendicular.
    pub fn from_basis(position: Vec3, forward: Vec3, up: Vec3, scale: Vec3) -> Self {
        let right = forward.cross(up);
        let rotation = Quat::from_mat3(&Mat3::from_cols(right, up, -forward)).normalize();
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Get the forward direction (negative Z in local space)
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Get the right direction (positive X in local space)
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the up direction (positive Y in local space)
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Map a point from local space to world space
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * (local * self.scale)
    }

    /// Largest axis of the scale, used to grow bounding spheres
    pub fn max_scale(&self) -> f32 {
        self.scale.abs().max_element()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// Velocity component, written back by agents every frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity {
    pub linear: Vec3,
    pub angular: Vec3,
}

/// Top speed an entity is capable of, used to predict its motion
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MaxSpeed(pub f32);

/// Run-time type tag used by context filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Agent,
    Player,
    Vehicle,
    Obstacle,
    Wall,
    Prop,
    /// Application-defined tag
    Custom(u32),
}
