use std::sync::Arc;

use crate::vector::Vector3;
use crate::light::Material;

/// A sphere with a shared material.
///
/// Several spheres may point at the same `Material`; none of them can change
/// it once the scene is built.
#[derive(Clone, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vector3,
    pub radius: f64,
    pub material: Arc<Material>,
}

impl Sphere {
    pub fn new(center: Vector3, radius: f64, material: Arc<Material>)
        -> Sphere {
        Sphere { center, radius, material }
    }

    /// Creates a unit sphere at the origin with the default material.
    pub fn unit() -> Sphere {
        Sphere {
            center: Vector3::zero(),
            radius: 1.0,
            material: Default::default(),
        }
    }

    /// Checks whether a ray intersects the sphere.
    ///
    /// `dir` must be normalized. Returns the distance along the ray to the
    /// nearest intersection in front of `origin`, or `None` if the ray misses
    /// or the sphere lies entirely behind it. A ray starting inside the
    /// sphere reports the far wall.
    ///
    /// # Examples
    ///
    /// ```
    /// # use whitted_tracer::geometry::Sphere;
    /// # use whitted_tracer::vector::Vector3;
    /// let s = Sphere::unit();
    /// let origin = Vector3::new(0.0, 0.0, -5.0);
    /// let dir = Vector3::new(0.0, 0.0, 1.0);
    /// assert_eq!(s.ray_intersect(origin, dir), Some(4.0));
    /// ```
    pub fn ray_intersect(&self, origin: Vector3, dir: Vector3) -> Option<f64> {
        let l = self.center - origin;
        let tca = l.dot(&dir);
        let d2 = l.dot(&l) - tca * tca;
        let r2 = self.radius * self.radius;

        if d2 > r2 {
            return None;
        }

        let thc = (r2 - d2).sqrt();
        let t0 = tca - thc;
        let t1 = tca + thc;

        let t = if t0 < 0.0 { t1 } else { t0 };
        if t < 0.0 {
            None
        } else {
            Some(t)
        }
    }

    /// Returns the outward unit normal at a point on the sphere's surface.
    pub fn normal_at(&self, at: Vector3) -> Vector3 {
        (at - self.center).normalize()
    }
}

#[test]
fn ray_pierces_sphere() {
    let s = Sphere::unit();
    let t = s.ray_intersect(Vector3::new(0.0, 0.0, -5.0),
        Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(t, Some(4.0));
}

#[test]
fn ray_through_center_hits_at_distance_minus_radius() {
    let s = Sphere::new(Vector3::new(-3.0, 0.0, -16.0), 2.0,
        Default::default());
    let origin = Vector3::new(1.0, 2.0, 3.0);
    let dir = (s.center - origin).normalize();

    let t = s.ray_intersect(origin, dir).expect("ray should hit sphere");
    assert!(crate::feq(t, (origin - s.center).norm() - s.radius));
}

#[test]
fn ray_is_tangent_to_sphere() {
    let s = Sphere::unit();
    let t = s.ray_intersect(Vector3::new(0.0, 1.0, -5.0),
        Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(t, Some(5.0));
}

#[test]
fn ray_misses_sphere() {
    let s = Sphere::unit();
    let t = s.ray_intersect(Vector3::new(0.0, 2.0, -5.0),
        Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(t, None);
}

#[test]
fn ray_is_inside_sphere() {
    let s = Sphere::unit();
    let t = s.ray_intersect(Vector3::zero(), Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(t, Some(1.0));
}

#[test]
fn sphere_is_behind_ray() {
    let s = Sphere::unit();
    let t = s.ray_intersect(Vector3::new(0.0, 0.0, 5.0),
        Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(t, None);
}

#[test]
fn normal_on_translated_sphere() {
    let s = Sphere::new(Vector3::new(0.0, 1.0, 0.0), 1.0, Default::default());
    let n = s.normal_at(Vector3::new(0.0, 1.70711, -0.70711));

    assert_eq!(n, Vector3::new(0.0, 0.70711, -0.70711));
}
