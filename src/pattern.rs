use crate::color::Color;
use crate::light::Material;
use crate::vector::Vector3;
use crate::consts::FLOOR_PARALLEL_EPSILON;

/// A finite checkerboard floor, lying flat at a fixed height.
///
/// The floor only covers `x` in `[-x_extent, x_extent]` and `z` strictly
/// between `z_far` and `z_near`. Tiles alternate between `even` and `odd`,
/// both dimmed by `dim` so the floor stays darker than the objects on it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Checkerboard {
    pub height: f64,
    pub x_extent: f64,
    pub z_near: f64,
    pub z_far: f64,

    pub even: Color,
    pub odd: Color,
    pub dim: f64,
}

impl Default for Checkerboard {
    fn default() -> Checkerboard {
        Checkerboard {
            height: -4.0,
            x_extent: 10.0,
            z_near: -10.0,
            z_far: -30.0,

            even: Color::rgb(1.0, 0.7, 0.3),
            odd: Color::white(),
            dim: 0.3,
        }
    }
}

impl Checkerboard {
    /// Intersects a ray with the floor.
    ///
    /// Rays running (nearly) parallel to the floor never hit it. Returns the
    /// distance to the hit, if it lies in front of the origin and within the
    /// floor's bounds.
    pub fn ray_intersect(&self, origin: Vector3, dir: Vector3) -> Option<f64> {
        if dir.y.abs() <= FLOOR_PARALLEL_EPSILON {
            return None;
        }

        let d = -(origin.y - self.height) / dir.y;
        if d <= 0.0 {
            return None;
        }

        let p = origin + dir * d;
        if p.x.abs() > self.x_extent || p.z >= self.z_near || p.z <= self.z_far {
            return None;
        }

        Some(d)
    }

    /// The undimmed tile color at a point on the floor.
    ///
    /// Tiles are one unit wide along X and two units deep along Z.
    pub fn checker_at(&self, p: Vector3) -> Color {
        let parity = ((0.5 + p.x + 1000.0).floor() + (0.5 * p.z).floor())
            as i64;

        if parity.rem_euclid(2) == 0 {
            self.even
        } else {
            self.odd
        }
    }

    /// Builds the material for a point on the floor.
    ///
    /// A new purely diffuse material is made for every hit; the floor has no
    /// material of its own to share or modify.
    pub fn material_at(&self, p: Vector3) -> Material {
        Material::diffuse(self.checker_at(p) * self.dim)
    }
}

#[test]
fn floor_hit_from_above() {
    let floor = Checkerboard::default();
    let d = floor.ray_intersect(Vector3::new(0.0, 0.0, -20.0),
        Vector3::new(0.0, -1.0, 0.0));

    assert_eq!(d, Some(4.0));
}

#[test]
fn floor_ignores_parallel_rays() {
    let floor = Checkerboard::default();
    let d = floor.ray_intersect(Vector3::new(0.0, -3.0, 0.0),
        Vector3::new(0.0, -0.0005, -1.0).normalize());

    assert_eq!(d, None);
}

#[test]
fn floor_ignores_hits_behind_origin() {
    let floor = Checkerboard::default();
    let d = floor.ray_intersect(Vector3::new(0.0, 0.0, -20.0),
        Vector3::new(0.0, 1.0, 0.0));

    assert_eq!(d, None);
}

#[test]
fn floor_is_bounded() {
    let floor = Checkerboard::default();
    let down = Vector3::new(0.0, -1.0, 0.0);

    assert!(floor.ray_intersect(Vector3::new(10.0, 0.0, -20.0), down).is_some());
    assert!(floor.ray_intersect(Vector3::new(10.5, 0.0, -20.0), down).is_none());
    assert!(floor.ray_intersect(Vector3::new(0.0, 0.0, -10.0), down).is_none());
    assert!(floor.ray_intersect(Vector3::new(0.0, 0.0, -30.0), down).is_none());
    assert!(floor.ray_intersect(Vector3::new(0.0, 0.0, -29.9), down).is_some());
}

#[test]
fn checker_alternates_along_x() {
    let floor = Checkerboard::default();

    for i in -9..9 {
        let x = i as f64 + 0.25;
        let a = floor.checker_at(Vector3::new(x, -4.0, -15.3));
        let b = floor.checker_at(Vector3::new(x + 1.0, -4.0, -15.3));

        assert_ne!(a, b);
        assert!(a == floor.even || a == floor.odd);
        assert!(b == floor.even || b == floor.odd);
    }
}

#[test]
fn floor_material_is_dimmed_and_diffuse() {
    let floor = Checkerboard::default();
    let p = Vector3::new(0.0, -4.0, -20.0);
    let m = floor.material_at(p);

    assert_eq!(m.diffuse_color, floor.checker_at(p) * 0.3);
    assert_eq!(m.albedo, Default::default());
    assert_eq!(m.refractive_index, 1.0);
}
