//! Common components

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Transform component for position and orientation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Transform {
    /// Position in world space.
    pub position: Vec3,
    /// Rotation as a quaternion.
    pub rotation: Quat,
}

impl Transform {
    /// Create a transform with just a position.
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Get the forward direction (negative Z in local space).
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Point the forward axis along a horizontal heading.
    ///
    /// A degenerate heading leaves the rotation unchanged.
    pub fn face(&mut self, heading: Vec3) {
        let mut flat = heading;
        flat.y = 0.0;
        if flat.length_squared() > f32::EPSILON {
            let flat = flat.normalize();
            self.rotation = Quat::from_rotation_y((-flat.x).atan2(-flat.z));
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Name component for debugging.
#[derive(Debug, Clone)]
pub struct Name(pub String);

impl Name {
    /// Create a name component.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Marker component for the player entity.
#[derive(Debug, Clone, Copy)]
pub struct Player;

/// Marker component for the enemy entity.
#[derive(Debug, Clone, Copy)]
pub struct Enemy;

/// Marker component for collectible entities.
#[derive(Debug, Clone, Copy)]
pub struct Collectible;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_points_forward_along_heading() {
        let mut transform = Transform::default();

        transform.face(Vec3::NEG_Z);
        assert!(transform.forward().angle_between(Vec3::NEG_Z) < 1e-5);

        transform.face(Vec3::X);
        assert!(transform.forward().angle_between(Vec3::X) < 1e-5);

        transform.face(Vec3::new(1.0, 0.0, 1.0));
        assert!(
            transform
                .forward()
                .angle_between(Vec3::new(1.0, 0.0, 1.0).normalize())
                < 1e-5
        );
    }

    #[test]
    fn test_face_ignores_degenerate_heading() {
        let mut transform = Transform::default();
        transform.face(Vec3::X);
        let before = transform.rotation;

        transform.face(Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(transform.rotation, before);
    }
}
