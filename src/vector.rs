use std::ops::{ Add, Sub, Neg, Mul };

use crate::feq;

/// A three-component vector, used for points and directions alike.
///
/// Every operation returns a new value; a `Vector3` is never modified in
/// place once built.
#[derive(Debug, Default, Copy, Clone, PartialOrd)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PartialEq for Vector3 {
    fn eq(&self, other: &Vector3) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(v: [f64; 3]) -> Vector3 {
        Vector3 { x: v[0], y: v[1], z: v[2] }
    }
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3 { x, y, z }
    }

    pub fn zero() -> Vector3 {
        Vector3 { x: 0.0, y: 0.0, z: 0.0 }
    }

    pub fn dot(&self, other: &Vector3) -> f64 {
        self.x * other.x
            + self.y * other.y
            + self.z * other.z
    }

    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Scales the vector to unit length.
    ///
    /// A zero vector has no direction; normalizing one yields non-finite
    /// components rather than an error.
    pub fn normalize(&self) -> Vector3 {
        *self * (1.0 / self.norm())
    }

    /// Reflects a vector across a normal.
    pub fn reflect(&self, normal: &Vector3) -> Vector3 {
        *self - (*normal * 2.0 * self.dot(normal))
    }

    /// Refracts a direction through a surface using Snell's law.
    ///
    /// `eta_t` is the refractive index on the far side of the surface (the
    /// one `normal` points away from) and `eta_i` the index the ray travels
    /// in. A ray meeting the surface from the inside is handled by flipping
    /// the normal and swapping the indices.
    ///
    /// On total internal reflection the direction `(1, 0, 0)` is returned in
    /// place of a refracted ray.
    ///
    /// # Examples
    ///
    /// A ray hitting glass head-on passes straight through:
    ///
    /// ```
    /// # use whitted_tracer::vector::Vector3;
    /// let d = Vector3::new(0.0, 0.0, -1.0);
    /// let n = Vector3::new(0.0, 0.0, 1.0);
    /// assert_eq!(d.refract(&n, 1.5, 1.0), d);
    /// ```
    pub fn refract(&self, normal: &Vector3, eta_t: f64, eta_i: f64)
        -> Vector3 {
        let cosi = -self.dot(normal).clamp(-1.0, 1.0);

        // The ray is inside the object; swap the media
        if cosi < 0.0 {
            return self.refract(&-*normal, eta_i, eta_t);
        }

        let eta = eta_i / eta_t;
        let k = 1.0 - eta * eta * (1.0 - cosi * cosi);
        if k < 0.0 {
            Vector3::new(1.0, 0.0, 0.0)
        } else {
            *self * eta + *normal * (eta * cosi - k.sqrt())
        }
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

/// Implements scalar right-multiplication for a vector.
///
/// ```
/// use whitted_tracer::vector::Vector3;
///
/// let v = Vector3::new(1.0, 2.0, 3.0);
/// assert_eq!(v * 5.0, Vector3::new(5.0, 10.0, 15.0));
/// ```
impl Mul<f64> for Vector3 {
    type Output = Self;

    fn mul(self, other: f64) -> Self {
        Self {
            x: self.x * other,
            y: self.y * other,
            z: self.z * other,
        }
    }
}

/// Implements scalar left-multiplication for a vector.
impl Mul<Vector3> for f64 {
    type Output = Vector3;

    fn mul(self, other: Vector3) -> Vector3 {
        other * self
    }
}

/* Tests */

#[test]
fn add_vectors() {
    let a1 = Vector3::new(3.0, -2.0, 5.0);
    let a2 = Vector3::new(-2.0, 3.0, 1.0);

    assert_eq!(a1 + a2, Vector3::new(1.0, 1.0, 6.0));
}

#[test]
fn sub_vectors() {
    let p1 = Vector3::new(3.0, 2.0, 1.0);
    let p2 = Vector3::new(5.0, 6.0, 7.0);

    assert_eq!(p1 - p2, Vector3::new(-2.0, -4.0, -6.0));
}

#[test]
fn neg_vector() {
    let a = Vector3::new(1.0, -2.0, 3.0);

    assert_eq!(-a, Vector3::new(-1.0, 2.0, -3.0));
}

#[test]
fn mul_scalar_both_sides() {
    let a = Vector3::new(1.0, -2.0, 3.0);

    assert_eq!(a * 3.5, Vector3::new(3.5, -7.0, 10.5));
    assert_eq!(0.5 * a, Vector3::new(0.5, -1.0, 1.5));
}

#[test]
fn norm_pos_and_neg() {
    assert_eq!(Vector3::new(1.0, 2.0, 3.0).norm(), f64::sqrt(14.0));
    assert_eq!(Vector3::new(-1.0, -2.0, -3.0).norm(), f64::sqrt(14.0));
}

#[test]
fn normalize_clean() {
    let v = Vector3::new(4.0, 0.0, 0.0);

    assert_eq!(v.normalize(), Vector3::new(1.0, 0.0, 0.0));
}

#[test]
fn normalize_dirty() {
    let v = Vector3::new(1.0, 2.0, 3.0);
    let e = Vector3::new(
        1.0 / f64::sqrt(14.0),
        2.0 / f64::sqrt(14.0),
        3.0 / f64::sqrt(14.0)
    );

    assert_eq!(v.normalize(), e);
    assert!(crate::feq(v.normalize().norm(), 1.0));
}

#[test]
fn normalize_zero_is_not_finite() {
    let n = Vector3::zero().normalize();

    assert!(!n.x.is_finite());
    assert!(!n.y.is_finite());
    assert!(!n.z.is_finite());
}

#[test]
fn dot_vectors() {
    let a = Vector3::new(1.0, 2.0, 3.0);
    let b = Vector3::new(2.0, 3.0, 4.0);

    assert_eq!(a.dot(&b), 20.0);
}

#[test]
fn reflect_45() {
    let v = Vector3::new(1.0, -1.0, 0.0);
    let n = Vector3::new(0.0, 1.0, 0.0);

    assert_eq!(v.reflect(&n), Vector3::new(1.0, 1.0, 0.0));
}

#[test]
fn refract_into_denser_medium_bends_toward_normal() {
    let d = Vector3::new(1.0, -1.0, 0.0).normalize();
    let n = Vector3::new(0.0, 1.0, 0.0);
    let t = d.refract(&n, 1.5, 1.0);

    // sin(theta_t) = sin(45 deg) / 1.5
    let sin_t = (2.0f64.sqrt() / 2.0) / 1.5;
    assert!(crate::feq(t.normalize().x, sin_t));
    assert!(t.y < 0.0);
}

#[test]
fn refract_from_inside_swaps_media() {
    // Leaving glass head-on, the ray is still undeviated.
    let d = Vector3::new(0.0, 0.0, 1.0);
    let n = Vector3::new(0.0, 0.0, 1.0);

    assert_eq!(d.refract(&n, 1.5, 1.0).normalize(), d);
}

#[test]
fn refract_total_internal_reflection() {
    // Leaving glass at a grazing angle past the critical angle.
    let d = Vector3::new(0.9, 0.0, 0.19f64.sqrt());
    let n = Vector3::new(0.0, 0.0, 1.0);

    assert_eq!(d.refract(&n, 1.5, 1.0), Vector3::new(1.0, 0.0, 0.0));
}
