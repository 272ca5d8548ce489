use crate::vector::Vector3;
use crate::consts::SURFACE_OFFSET;

/// A ray with an origin and a (unit) direction.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray {
    pub origin: Vector3,
    pub direction: Vector3,
}

impl Ray {
    pub fn new(origin: Vector3, direction: Vector3) -> Ray {
        Ray { origin, direction }
    }

    /// Builds a ray leaving a surface at `point`.
    ///
    /// The origin is pushed `SURFACE_OFFSET` along the normal, onto whichever
    /// side of the surface `direction` heads toward, so the new ray does not
    /// immediately hit the surface it starts on ("acne").
    pub fn leaving(point: Vector3, normal: Vector3, direction: Vector3)
        -> Ray {
        let origin = if direction.dot(&normal) < 0.0 {
            point - normal * SURFACE_OFFSET
        } else {
            point + normal * SURFACE_OFFSET
        };

        Ray { origin, direction }
    }

    pub fn position(&self, t: f64) -> Vector3 {
        self.origin + (t * self.direction)
    }
}

#[test]
fn ray_position() {
    let r = Ray::new(
                Vector3::new(2.0, 3.0, 4.0),
                Vector3::new(1.0, 0.0, 0.0)
            );

    assert_eq!(r.position(0.0), Vector3::new(2.0, 3.0, 4.0));
    assert_eq!(r.position(1.0), Vector3::new(3.0, 3.0, 4.0));
    assert_eq!(r.position(-1.0), Vector3::new(1.0, 3.0, 4.0));
    assert_eq!(r.position(2.5), Vector3::new(4.5, 3.0, 4.0));
}

#[test]
fn leaving_ray_offsets_outward() {
    let p = Vector3::new(0.0, 0.0, 0.0);
    let n = Vector3::new(0.0, 1.0, 0.0);
    let r = Ray::leaving(p, n, Vector3::new(1.0, 1.0, 0.0).normalize());

    assert!(r.origin.y > 0.0);
    assert!(crate::feq(r.origin.y, SURFACE_OFFSET));
}

#[test]
fn leaving_ray_offsets_inward() {
    let p = Vector3::new(0.0, 0.0, 0.0);
    let n = Vector3::new(0.0, 1.0, 0.0);
    let r = Ray::leaving(p, n, Vector3::new(0.0, -1.0, 0.0));

    assert!(r.origin.y < 0.0);
    assert_eq!(r.direction, Vector3::new(0.0, -1.0, 0.0));
}
