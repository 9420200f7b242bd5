//! Bounding volumes and ray intersection

use glam::Vec3;

use super::Transform;

/// Sphere used for proximity queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    #[must_use]
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check whether two spheres overlap (touching counts)
    #[must_use]
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        let reach = self.radius + other.radius;
        self.center.distance_squared(other.center) <= reach * reach
    }

    /// Check whether a point lies inside the sphere
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }

    /// Closest forward hit of a ray against the sphere surface
    #[must_use]
    pub fn intersect_ray(&self, ray: &Ray) -> Option<RayHit> {
        let offset = ray.origin - self.center;
        let b = offset.dot(ray.direction);
        let c = offset.length_squared() - self.radius * self.radius;

        // Origin outside and pointing away
        if c > 0.0 && b > 0.0 {
            return None;
        }

        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let distance = (-b - discriminant.sqrt()).max(0.0);
        if distance > ray.length {
            return None;
        }

        let point = ray.at(distance);
        Some(RayHit {
            distance,
            point,
            normal: (point - self.center).normalize_or_zero(),
        })
    }
}

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[must_use]
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Create from a center and half extents
    #[must_use]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[must_use]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Smallest sphere enclosing the box
    #[must_use]
    pub fn bounding_sphere(&self) -> BoundingSphere {
        BoundingSphere::new(self.center(), self.half_extents().length())
    }

    /// Entry hit of a ray against the box.
    ///
    /// Rays starting inside the box report no hit.
    #[must_use]
    pub fn intersect_ray(&self, ray: &Ray) -> Option<RayHit> {
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut normal = Vec3::ZERO;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];

            if direction.abs() < f32::EPSILON {
                if origin < self.min[axis] || origin > self.max[axis] {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let mut t0 = (self.min[axis] - origin) * inv;
            let mut t1 = (self.max[axis] - origin) * inv;
            let mut face = -1.0;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
                face = 1.0;
            }

            if t0 > t_enter {
                t_enter = t0;
                normal = Vec3::ZERO;
                normal[axis] = face;
            }
            t_exit = t_exit.min(t1);

            if t_enter > t_exit {
                return None;
            }
        }

        if t_enter < 0.0 || t_enter > ray.length {
            return None;
        }

        Some(RayHit {
            distance: t_enter,
            point: ray.at(t_enter),
            normal,
        })
    }
}

/// Local-space bounding volume attached to an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounds {
    Sphere(BoundingSphere),
    Box(Aabb),
}

impl Bounds {
    /// Sphere of the given radius around the local origin
    #[must_use]
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere(BoundingSphere::new(Vec3::ZERO, radius))
    }

    /// Box of the given half extents around the local origin
    #[must_use]
    pub fn cuboid(half_extents: Vec3) -> Self {
        Self::Box(Aabb::from_center_half_extents(Vec3::ZERO, half_extents))
    }

    /// Move the volume into world space.
    ///
    /// Boxes stay axis aligned: rotation is not applied to them.
    #[must_use]
    pub fn to_world(&self, transform: &Transform) -> Bounds {
        match self {
            Bounds::Sphere(sphere) => Bounds::Sphere(BoundingSphere::new(
                transform.transform_point(sphere.center),
                sphere.radius * transform.max_scale(),
            )),
            Bounds::Box(aabb) => Bounds::Box(Aabb::from_center_half_extents(
                transform.position + aabb.center() * transform.scale,
                aabb.half_extents() * transform.scale,
            )),
        }
    }

    /// Enclosing sphere of the volume
    #[must_use]
    pub fn bounding_sphere(&self) -> BoundingSphere {
        match self {
            Bounds::Sphere(sphere) => *sphere,
            Bounds::Box(aabb) => aabb.bounding_sphere(),
        }
    }

    /// Radius of the enclosing sphere
    #[must_use]
    pub fn radius(&self) -> f32 {
        self.bounding_sphere().radius
    }

    #[must_use]
    pub fn intersect_ray(&self, ray: &Ray) -> Option<RayHit> {
        match self {
            Bounds::Sphere(sphere) => sphere.intersect_ray(ray),
            Bounds::Box(aabb) => aabb.intersect_ray(ray),
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::sphere(0.5)
    }
}

/// Finite ray with a normalized direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub length: f32,
}

impl Ray {
    /// Create a ray; the direction is normalized
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3, length: f32) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            length,
        }
    }

    /// Point at distance `t` along the ray
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Result of a ray intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin
    pub distance: f32,
    /// World-space point of intersection
    pub point: Vec3,
    /// Surface normal at the hit
    pub normal: Vec3,
}
