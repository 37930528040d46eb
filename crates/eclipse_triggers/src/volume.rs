//! Trigger volume shapes and placed regions

use serde::{Deserialize, Serialize};

/// Trigger volume shapes, centered on the local origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum TriggerVolume {
    /// Axis-aligned box
    Box {
        /// Half-extents (width/2, height/2, depth/2)
        half_extents: [f32; 3],
    },
    /// Sphere
    Sphere {
        /// Radius
        radius: f32,
    },
    /// Capsule (cylinder with hemisphere caps)
    Capsule {
        /// Radius
        radius: f32,
        /// Half-height (cylinder portion only)
        half_height: f32,
        /// Axis (0 = X, 1 = Y, 2 = Z)
        axis: u8,
    },
    /// Cylinder
    Cylinder {
        /// Radius
        radius: f32,
        /// Half-height
        half_height: f32,
        /// Axis (0 = X, 1 = Y, 2 = Z)
        axis: u8,
    },
}

impl TriggerVolume {
    /// Create a box trigger volume
    pub fn box_shape(width: f32, height: f32, depth: f32) -> Self {
        Self::Box {
            half_extents: [width / 2.0, height / 2.0, depth / 2.0],
        }
    }

    /// Create a cube trigger volume
    pub fn cube(size: f32) -> Self {
        Self::box_shape(size, size, size)
    }

    /// Create a sphere trigger volume
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere { radius }
    }

    /// Create a capsule trigger volume (Y-axis aligned)
    pub fn capsule(radius: f32, height: f32) -> Self {
        Self::Capsule {
            radius,
            half_height: height / 2.0,
            axis: 1,
        }
    }

    /// Create a cylinder trigger volume (Y-axis aligned)
    pub fn cylinder(radius: f32, height: f32) -> Self {
        Self::Cylinder {
            radius,
            half_height: height / 2.0,
            axis: 1,
        }
    }

    /// Check if a point is inside this volume (at origin)
    pub fn contains_point(&self, point: [f32; 3]) -> bool {
        match self {
            Self::Box { half_extents } => {
                point[0].abs() <= half_extents[0]
                    && point[1].abs() <= half_extents[1]
                    && point[2].abs() <= half_extents[2]
            }
            Self::Sphere { radius } => {
                let dist_sq = point[0] * point[0] + point[1] * point[1] + point[2] * point[2];
                dist_sq <= radius * radius
            }
            Self::Capsule {
                radius,
                half_height,
                axis,
            } => {
                let axis = (*axis as usize).min(2);
                // Closest point on the capsule's segment
                let mut closest = [0.0f32; 3];
                closest[axis] = point[axis].clamp(-*half_height, *half_height);

                let dx = point[0] - closest[0];
                let dy = point[1] - closest[1];
                let dz = point[2] - closest[2];
                dx * dx + dy * dy + dz * dz <= radius * radius
            }
            Self::Cylinder {
                radius,
                half_height,
                axis,
            } => {
                let axis = (*axis as usize).min(2);
                if point[axis].abs() > *half_height {
                    return false;
                }
                let dist_sq: f32 = (0..3)
                    .filter(|&i| i != axis)
                    .map(|i| point[i] * point[i])
                    .sum();
                dist_sq <= radius * radius
            }
        }
    }

    /// Get axis-aligned bounding box (min, max)
    pub fn bounding_box(&self) -> ([f32; 3], [f32; 3]) {
        match self {
            Self::Box { half_extents } => (
                [-half_extents[0], -half_extents[1], -half_extents[2]],
                *half_extents,
            ),
            Self::Sphere { radius } => ([-*radius; 3], [*radius; 3]),
            Self::Capsule {
                radius,
                half_height,
                axis,
            } => {
                let axis = (*axis as usize).min(2);
                let mut min = [-*radius; 3];
                let mut max = [*radius; 3];
                min[axis] = -*half_height - *radius;
                max[axis] = *half_height + *radius;
                (min, max)
            }
            Self::Cylinder {
                radius,
                half_height,
                axis,
            } => {
                let axis = (*axis as usize).min(2);
                let mut min = [-*radius; 3];
                let mut max = [*radius; 3];
                min[axis] = -*half_height;
                max[axis] = *half_height;
                (min, max)
            }
        }
    }
}

impl Default for TriggerVolume {
    fn default() -> Self {
        Self::box_shape(1.0, 1.0, 1.0)
    }
}

/// A volume placed in the world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerRegion {
    /// Shape
    pub volume: TriggerVolume,
    /// World position of the volume's origin
    #[serde(default)]
    pub position: [f32; 3],
    /// Per-axis scale
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl TriggerRegion {
    /// Place a volume at the origin
    pub fn new(volume: TriggerVolume) -> Self {
        Self {
            volume,
            position: [0.0, 0.0, 0.0],
            scale: unit_scale(),
        }
    }

    /// Set position
    pub fn at(mut self, position: [f32; 3]) -> Self {
        self.position = position;
        self
    }

    /// Set scale
    pub fn scaled(mut self, scale: [f32; 3]) -> Self {
        self.scale = scale;
        self
    }

    /// Check if a world-space point is inside. Regions are axis-aligned.
    pub fn contains(&self, point: [f32; 3]) -> bool {
        if self.scale.iter().any(|s| *s == 0.0) {
            return false;
        }
        let local = [
            (point[0] - self.position[0]) / self.scale[0],
            (point[1] - self.position[1]) / self.scale[1],
            (point[2] - self.position[2]) / self.scale[2],
        ];
        self.volume.contains_point(local)
    }
}

impl Default for TriggerRegion {
    fn default() -> Self {
        Self::new(TriggerVolume::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_contains() {
        let volume = TriggerVolume::box_shape(2.0, 2.0, 2.0);

        assert!(volume.contains_point([0.0, 0.0, 0.0]));
        assert!(volume.contains_point([0.9, 0.9, 0.9]));
        assert!(!volume.contains_point([1.5, 0.0, 0.0]));
    }

    #[test]
    fn test_sphere_contains() {
        let volume = TriggerVolume::sphere(1.0);

        assert!(volume.contains_point([0.5, 0.5, 0.5]));
        assert!(!volume.contains_point([1.0, 1.0, 0.0]));
    }

    #[test]
    fn test_capsule_contains() {
        let volume = TriggerVolume::capsule(0.5, 2.0);

        assert!(volume.contains_point([0.0, 1.0, 0.0]));
        assert!(volume.contains_point([0.0, 1.4, 0.0])); // Top hemisphere
        assert!(!volume.contains_point([0.0, 2.0, 0.0]));
    }

    #[test]
    fn test_cylinder_contains() {
        let volume = TriggerVolume::cylinder(1.0, 2.0);

        assert!(volume.contains_point([0.5, 0.9, 0.5]));
        assert!(!volume.contains_point([0.0, 1.1, 0.0]));
        assert!(!volume.contains_point([1.0, 0.0, 1.0]));
    }

    #[test]
    fn test_bounding_box() {
        let volume = TriggerVolume::box_shape(2.0, 4.0, 2.0);
        let (min, max) = volume.bounding_box();

        assert_eq!(min, [-1.0, -2.0, -1.0]);
        assert_eq!(max, [1.0, 2.0, 1.0]);
    }

    #[test]
    fn test_region_transform() {
        let region = TriggerRegion::new(TriggerVolume::cube(2.0))
            .at([10.0, 0.0, 0.0])
            .scaled([2.0, 1.0, 1.0]);

        assert!(region.contains([11.5, 0.0, 0.0]));
        assert!(!region.contains([12.5, 0.0, 0.0]));
        assert!(!region.contains([0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_zero_scale_contains_nothing() {
        let region = TriggerRegion::new(TriggerVolume::cube(2.0)).scaled([0.0, 1.0, 1.0]);
        assert!(!region.contains([0.0, 0.0, 0.0]));
    }
}
