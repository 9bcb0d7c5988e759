//! Camera, lights, and ground grid.

use omnilab_math::{Color, Point3, Vec3};

/// Perspective camera pose and projection parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye position.
    pub position: Point3,
    /// Point the camera looks at.
    pub target: Point3,
    /// Vertical field of view in degrees.
    pub fov_y_deg: f64,
    /// Viewport aspect ratio (width / height).
    pub aspect: f64,
    /// Near clip distance.
    pub near: f64,
    /// Far clip distance.
    pub far: f64,
}

impl Camera {
    /// The boot-time eye position.
    pub const DEFAULT_POSITION: Point3 = Point3::new(5.0, 5.0, 10.0);
    /// The boot-time aim point.
    pub const DEFAULT_TARGET: Point3 = Point3::new(0.0, 0.0, 0.0);

    /// Camera at the default pose looking at the origin.
    pub fn new() -> Self {
        Self {
            position: Self::DEFAULT_POSITION,
            target: Self::DEFAULT_TARGET,
            fov_y_deg: 45.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Direction from the eye toward the aim point (not normalized).
    pub fn view_direction(&self) -> Vec3 {
        self.target - self.position
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// A scene light.
#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    /// Non-directional fill light.
    Ambient {
        /// Light color.
        color: Color,
        /// Intensity multiplier.
        intensity: f64,
    },
    /// Parallel-ray key light.
    Directional {
        /// Light color.
        color: Color,
        /// Intensity multiplier.
        intensity: f64,
        /// Ray direction (toward the scene).
        direction: Vec3,
    },
}

/// Ground-reference grid description.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Side length of the grid square.
    pub size: f64,
    /// Number of divisions per side.
    pub divisions: u32,
    /// Color of the center lines.
    pub major_color: Color,
    /// Color of the regular lines.
    pub minor_color: Color,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            size: 50.0,
            divisions: 50,
            major_color: Color::new(0.0, 0.27, 0.27),
            minor_color: Color::new(0.0, 0.07, 0.07),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_looks_at_origin() {
        let camera = Camera::new();
        assert_eq!(camera.target, Camera::DEFAULT_TARGET);
        let dir = camera.view_direction();
        // Pointing back toward the origin from (5, 5, 10).
        assert!(dir.x < 0.0 && dir.y < 0.0 && dir.z < 0.0);
    }
}
