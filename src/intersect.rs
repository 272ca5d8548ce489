use std::borrow::Cow;

use crate::vector::Vector3;
use crate::light::Material;

/// A record of the nearest surface a ray hit.
///
/// Sphere hits borrow the sphere's shared material. The floor has no stored
/// material, so its hits own a freshly built one.
#[derive(Clone, Debug, PartialEq)]
pub struct Hit<'a> {
    /// The distance along the ray to the hit.
    pub t: f64,

    /// The point where the intersection occurs.
    pub point: Vector3,

    /// The outward unit normal of the surface at `point`.
    pub normalv: Vector3,

    /// The material to shade `point` with.
    pub material: Cow<'a, Material>,
}

impl<'a> Hit<'a> {
    pub fn borrowed(t: f64, point: Vector3, normalv: Vector3,
        material: &'a Material) -> Hit<'a> {
        Hit { t, point, normalv, material: Cow::Borrowed(material) }
    }

    pub fn owned(t: f64, point: Vector3, normalv: Vector3,
        material: Material) -> Hit<'a> {
        Hit { t, point, normalv, material: Cow::Owned(material) }
    }
}

#[test]
fn borrowed_hit_shares_material() {
    let m = Material::default();
    let h = Hit::borrowed(1.0, Vector3::zero(), Vector3::new(0.0, 1.0, 0.0), &m);

    match h.material {
        Cow::Borrowed(b) => assert!(std::ptr::eq(b, &m)),
        Cow::Owned(_) => panic!("Sphere hits should borrow their material."),
    }
}

#[test]
fn owned_hit_keeps_its_material() {
    let h = Hit::owned(1.0, Vector3::zero(), Vector3::new(0.0, 1.0, 0.0),
        Material::default());

    assert!(matches!(h.material, Cow::Owned(_)));
    assert_eq!(*h.material, Material::default());
}
