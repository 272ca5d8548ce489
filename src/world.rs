use std::sync::Arc;

use crate::ray::Ray;
use crate::vector::Vector3;
use crate::color::Color;
use crate::light::{ Light, Material, Albedo, lighting };
use crate::geometry::Sphere;
use crate::pattern::Checkerboard;
use crate::intersect::Hit;
use crate::consts::{ MAX_DEPTH, MAX_DISTANCE, VACUUM_RI, GLASS_RI };

/// A world with objects and light.
///
/// Spheres are tested in order, so their order only matters when two of them
/// are hit at exactly the same distance (the first one wins). The optional
/// floor is a fixed checkerboard rather than a list of objects.
///
/// A world is never modified while it is rendered; every pixel only reads
/// from it.
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    pub spheres: Vec<Sphere>,
    pub lights: Vec<Light>,
    pub floor: Option<Checkerboard>,
}

/// The reference world: four spheres and three lights over the checkerboard.
impl Default for World {
    fn default() -> World {
        let ivory = Arc::new(Material::new(VACUUM_RI,
            Albedo::new(0.6, 0.3, 0.1, 0.0), Color::rgb(0.4, 0.4, 0.3), 50.0));
        let glass = Arc::new(Material::new(GLASS_RI,
            Albedo::new(0.0, 0.5, 0.1, 0.8), Color::rgb(0.6, 0.7, 0.8), 125.0));
        let red_rubber = Arc::new(Material::new(VACUUM_RI,
            Albedo::new(0.9, 0.1, 0.0, 0.0), Color::rgb(0.3, 0.1, 0.1), 10.0));
        let mirror = Arc::new(Material::new(VACUUM_RI,
            Albedo::new(0.0, 10.0, 0.8, 0.0), Color::rgb(1.0, 1.0, 1.0), 1425.0));

        let spheres = vec![
            Sphere::new(Vector3::new(-3.0, 0.0, -16.0), 2.0, ivory),
            Sphere::new(Vector3::new(-1.0, -1.5, -12.0), 2.0, glass),
            Sphere::new(Vector3::new(1.5, -0.5, -18.0), 3.0, red_rubber),
            Sphere::new(Vector3::new(7.0, 5.0, -18.0), 4.0, mirror),
        ];

        let lights = vec![
            Light::new(Vector3::new(-20.0, 20.0, 20.0), 1.5),
            Light::new(Vector3::new(30.0, 50.0, -25.0), 1.8),
            Light::new(Vector3::new(30.0, 20.0, 30.0), 1.7),
        ];

        World { spheres, lights, floor: Some(Default::default()) }
    }
}

impl World {
    /// Creates the reference world.
    pub fn new() -> World {
        Default::default()
    }

    /// Creates an empty world with no spheres, no lights and no floor.
    pub fn empty() -> World {
        World { spheres: Vec::new(), lights: Vec::new(), floor: None }
    }

    /// Finds the nearest surface hit by a ray.
    ///
    /// Every sphere is tested, then the floor; the floor only wins if it is
    /// strictly nearer than the nearest sphere. Anything at or beyond
    /// `MAX_DISTANCE` counts as a miss.
    pub fn intersect(&self, r: &Ray) -> Option<Hit<'_>> {
        let mut best_sphere_dist = f64::MAX;
        let mut nearest: Option<&Sphere> = None;

        for sphere in self.spheres.iter() {
            if let Some(t) = sphere.ray_intersect(r.origin, r.direction) {
                if t < best_sphere_dist {
                    best_sphere_dist = t;
                    nearest = Some(sphere);
                }
            }
        }

        let floor_hit = self.floor.as_ref().and_then(|floor| {
            floor.ray_intersect(r.origin, r.direction)
                .filter(|&d| d < best_sphere_dist)
                .map(|d| (floor, d))
        });

        let hit = match (floor_hit, nearest) {
            (Some((floor, d)), _) => {
                let point = r.position(d);
                Hit::owned(d, point, Vector3::new(0.0, 1.0, 0.0),
                    floor.material_at(point))
            },
            (None, Some(sphere)) => {
                let point = r.position(best_sphere_dist);
                Hit::borrowed(best_sphere_dist, point, sphere.normal_at(point),
                    &sphere.material)
            },
            (None, None) => return None,
        };

        if hit.t < MAX_DISTANCE {
            Some(hit)
        } else {
            None
        }
    }

    /// Determines whether `light` is blocked from a point on a surface.
    ///
    /// The shadow ray starts just off the surface, on the side facing the
    /// light; only hits nearer than the light itself occlude it.
    pub fn is_shadowed(&self, point: Vector3, normalv: Vector3, light: &Light)
        -> bool {
        let v = light.position - point;
        let distance = v.norm();
        let shadow_ray = Ray::leaving(point, normalv, v.normalize());

        match self.intersect(&shadow_ray) {
            Some(h) => h.t < distance,
            None => false,
        }
    }

    /// Calculates the color for a hit.
    ///
    /// Reflection and refraction rays are always cast, whatever the
    /// material's weights; the result combines them with the direct diffuse
    /// and specular light of every unshadowed light source.
    pub fn shade_hit(&self, r: &Ray, hit: &Hit, depth: usize) -> Color {
        let m: &Material = &hit.material;
        let point = hit.point;
        let normalv = hit.normalv;

        let reflectv = r.direction.reflect(&normalv).normalize();
        let reflect_color = self.cast_ray(
            &Ray::leaving(point, normalv, reflectv), depth + 1);

        let refractv = r.direction
            .refract(&normalv, m.refractive_index, VACUUM_RI)
            .normalize();
        let refract_color = self.cast_ray(
            &Ray::leaving(point, normalv, refractv), depth + 1);

        let mut diffuse = 0.0;
        let mut specular = 0.0;
        for light in self.lights.iter() {
            if self.is_shadowed(point, normalv, light) {
                continue;
            }

            let (d, s) = lighting(light, point, normalv, r.direction,
                m.specular_exponent);
            diffuse += d;
            specular += s;
        }

        m.diffuse_color * diffuse * m.albedo.diffuse
            + Color::white() * specular * m.albedo.specular
            + reflect_color * m.albedo.reflect
            + refract_color * m.albedo.refract
    }

    /// Determines the color seen along a ray.
    ///
    /// Rays which hit nothing, and rays recursed past `MAX_DEPTH`, see the
    /// background. The result is not clamped.
    pub fn cast_ray(&self, r: &Ray, depth: usize) -> Color {
        if depth > MAX_DEPTH {
            return Color::background();
        }

        match self.intersect(r) {
            None => Color::background(),
            Some(hit) => self.shade_hit(r, &hit, depth),
        }
    }
}

#[cfg(test)]
fn matte(color: Color) -> Arc<Material> {
    Arc::new(Material::diffuse(color))
}

#[test]
fn intersect_reference_world_picks_nearest_sphere() {
    let w = World::new();
    let r = Ray::new(Vector3::zero(),
        (Vector3::new(-1.0, -1.5, -12.0)).normalize());

    let hit = w.intersect(&r).expect("ray should hit the glass sphere");
    let glass = &w.spheres[1];
    assert!(crate::feq(hit.t, Vector3::new(-1.0, -1.5, -12.0).norm() - 2.0));
    assert_eq!(*hit.material, *glass.material);
    assert_eq!(hit.normalv, glass.normal_at(hit.point));
}

#[test]
fn sphere_hit_borrows_shared_material() {
    use std::borrow::Cow;

    let mut w = World::empty();
    let m = matte(Color::white());
    w.spheres.push(Sphere::new(Vector3::new(0.0, 0.0, -5.0), 1.0,
        Arc::clone(&m)));
    w.spheres.push(Sphere::new(Vector3::new(3.0, 0.0, -5.0), 1.0,
        Arc::clone(&m)));

    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));
    let hit = w.intersect(&r).unwrap();

    match hit.material {
        Cow::Borrowed(b) => assert!(std::ptr::eq(b, &*m)),
        Cow::Owned(_) => panic!("Sphere hits should borrow their material."),
    }
}

#[test]
fn floor_wins_only_when_nearer() {
    let mut w = World::empty();
    w.floor = Some(Default::default());
    w.spheres.push(Sphere::new(Vector3::new(0.0, -2.0, -20.0), 1.0,
        matte(Color::white())));

    let down = Vector3::new(0.0, -1.0, 0.0);

    // The sphere sits between the origin and the floor.
    let hit = w.intersect(&Ray::new(Vector3::new(0.0, 0.0, -20.0), down))
        .unwrap();
    assert!(crate::feq(hit.t, 1.0));

    // Beside the sphere only the floor is hit.
    let hit = w.intersect(&Ray::new(Vector3::new(5.0, 0.0, -20.0), down))
        .unwrap();
    assert!(crate::feq(hit.t, 4.0));
    assert_eq!(hit.normalv, Vector3::new(0.0, 1.0, 0.0));
}

#[test]
fn hits_beyond_max_distance_are_misses() {
    let mut w = World::empty();
    w.spheres.push(Sphere::new(Vector3::new(0.0, 0.0, -2000.0), 1.0,
        matte(Color::white())));

    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));
    assert!(w.intersect(&r).is_none());
}

#[test]
fn floor_tiles_alternate_along_x() {
    let mut w = World::empty();
    w.floor = Some(Default::default());
    let down = Vector3::new(0.0, -1.0, 0.0);

    let a = w.intersect(&Ray::new(Vector3::new(2.25, 0.0, -15.5), down))
        .unwrap();
    let b = w.intersect(&Ray::new(Vector3::new(3.25, 0.0, -15.5), down))
        .unwrap();

    let floor = Checkerboard::default();
    let even = floor.even * floor.dim;
    let odd = floor.odd * floor.dim;
    assert_ne!(a.material.diffuse_color, b.material.diffuse_color);
    assert!(a.material.diffuse_color == even || a.material.diffuse_color == odd);
    assert!(b.material.diffuse_color == even || b.material.diffuse_color == odd);
}

#[test]
fn ray_escaping_upward_sees_background() {
    let w = World::new();
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 1.0, 0.0));

    let c = w.cast_ray(&r, 0);
    assert_eq!(c.r, 55.0 / 255.0);
    assert_eq!(c.g, 176.0 / 255.0);
    assert_eq!(c.b, 202.0 / 255.0);
}

#[test]
fn diffuse_surface_without_lights_is_black() {
    let mut w = World::empty();
    w.spheres.push(Sphere::new(Vector3::new(0.0, 0.0, -5.0), 1.0,
        matte(Color::rgb(0.4, 0.4, 0.3))));

    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));
    let c = w.cast_ray(&r, 0);

    assert_eq!(c.r, 0.0);
    assert_eq!(c.g, 0.0);
    assert_eq!(c.b, 0.0);
}

#[test]
fn lit_diffuse_surface_facing_light() {
    let mut w = World::empty();
    w.spheres.push(Sphere::new(Vector3::new(0.0, 0.0, -10.0), 1.0,
        matte(Color::white())));
    w.lights.push(Light::new(Vector3::new(0.0, 10.0, -10.0), 1.0));

    let r = Ray::new(Vector3::new(0.0, 3.0, -10.0), Vector3::new(0.0, -1.0, 0.0));
    assert_eq!(w.cast_ray(&r, 0), Color::white());
}

#[test]
fn occluder_removes_light_contribution() {
    let mut w = World::empty();
    w.spheres.push(Sphere::new(Vector3::new(0.0, 0.0, -10.0), 1.0,
        matte(Color::white())));
    w.lights.push(Light::new(Vector3::new(0.0, 10.0, -10.0), 1.0));

    let r = Ray::new(Vector3::new(0.0, 3.0, -10.0), Vector3::new(0.0, -1.0, 0.0));
    let lit = w.cast_ray(&r, 0);

    w.spheres.push(Sphere::new(Vector3::new(0.0, 6.0, -10.0), 1.0,
        matte(Color::white())));
    let shadowed = w.cast_ray(&r, 0);

    assert!(lit.r > shadowed.r);
    assert_eq!(shadowed, Color::black());
}

#[test]
fn shadow_object_between_point_and_light() {
    let mut w = World::empty();
    w.spheres.push(Sphere::new(Vector3::new(0.0, 5.0, 0.0), 1.0,
        matte(Color::white())));
    let light = Light::new(Vector3::new(0.0, 10.0, 0.0), 1.0);
    let up = Vector3::new(0.0, 1.0, 0.0);

    assert!(w.is_shadowed(Vector3::zero(), up, &light));
}

#[test]
fn shadow_object_behind_light() {
    let mut w = World::empty();
    w.spheres.push(Sphere::new(Vector3::new(0.0, 20.0, 0.0), 1.0,
        matte(Color::white())));
    let light = Light::new(Vector3::new(0.0, 10.0, 0.0), 1.0);
    let up = Vector3::new(0.0, 1.0, 0.0);

    assert!(!w.is_shadowed(Vector3::zero(), up, &light));
}

#[test]
fn shadow_object_behind_point() {
    let mut w = World::empty();
    w.spheres.push(Sphere::new(Vector3::new(0.0, -5.0, 0.0), 1.0,
        matte(Color::white())));
    let light = Light::new(Vector3::new(0.0, 10.0, 0.0), 1.0);
    let up = Vector3::new(0.0, 1.0, 0.0);

    assert!(!w.is_shadowed(Vector3::zero(), up, &light));
}

#[test]
fn recursion_stops_past_max_depth() {
    let mut w = World::empty();
    w.spheres.push(Sphere::new(Vector3::new(0.0, 0.0, -5.0), 1.0,
        matte(Color::white())));

    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));

    assert!(w.intersect(&r).is_some());
    assert_eq!(w.cast_ray(&r, MAX_DEPTH), Color::black());
    assert_eq!(w.cast_ray(&r, MAX_DEPTH + 1), Color::background());
}

#[test]
fn mirror_reflects_what_is_in_front_of_it() {
    // A perfect mirror facing a lightless world reflects the sky.
    let mut w = World::empty();
    let mirror = Arc::new(Material::new(1.0, Albedo::new(0.0, 0.0, 1.0, 0.0),
        Color::black(), 0.0));
    w.spheres.push(Sphere::new(Vector3::new(0.0, 0.0, -5.0), 1.0, mirror));

    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));
    assert_eq!(w.cast_ray(&r, 0), Color::background());
}

#[test]
fn clear_glass_shows_what_is_behind_it() {
    let mut w = World::empty();
    let glass = Arc::new(Material::new(1.5, Albedo::new(0.0, 0.0, 0.0, 1.0),
        Color::black(), 0.0));
    w.spheres.push(Sphere::new(Vector3::new(0.0, 0.0, -5.0), 1.0, glass));
    w.spheres.push(Sphere::new(Vector3::new(0.0, 0.0, -20.0), 2.0,
        matte(Color::white())));
    w.lights.push(Light::new(Vector3::new(0.0, 0.0, -12.0), 1.0));

    // Head-on, the refracted ray passes straight through the glass and
    // lands on the lit face of the white sphere.
    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));
    assert_eq!(w.cast_ray(&r, 0), Color::white());

    w.spheres.remove(1);
    assert_eq!(w.cast_ray(&r, 0), Color::background());
}

#[test]
fn strong_specular_is_not_clamped() {
    // Light sits at the eye, so the highlight peaks at the hit point.
    let mut w = World::empty();
    let shiny = Arc::new(Material::new(1.0, Albedo::new(0.0, 10.0, 0.0, 0.0),
        Color::black(), 1.0));
    w.spheres.push(Sphere::new(Vector3::new(0.0, 0.0, -5.0), 1.0, shiny));
    w.lights.push(Light::new(Vector3::zero(), 1.0));

    let r = Ray::new(Vector3::zero(), Vector3::new(0.0, 0.0, -1.0));
    let c = w.cast_ray(&r, 0);

    assert!(c.r > 1.0);
    assert_eq!(c, Color::rgb(10.0, 10.0, 10.0));
    assert_eq!(c.to_rgb8(), [255, 255, 255]);
}

#[test]
fn total_internal_reflection_follows_fixed_direction() {
    // Starting inside the glass and heading straight up, the ray meets the
    // surface at (1.6, 1.2) with normal (0.8, 0.6), beyond the critical
    // angle. The refracted ray then runs along +X.
    let mut w = World::empty();
    let glass = Arc::new(Material::new(1.5, Albedo::new(0.0, 0.0, 0.0, 1.0),
        Color::black(), 0.0));
    w.spheres.push(Sphere::new(Vector3::new(0.0, 0.0, -10.0), 2.0, glass));

    let r = Ray::new(Vector3::new(1.6, 0.0, -10.0), Vector3::new(0.0, 1.0, 0.0));
    let hit = w.intersect(&r).unwrap();
    assert_eq!(hit.normalv, Vector3::new(0.8, 0.6, 0.0));
    assert_eq!(r.direction.refract(&hit.normalv, 1.5, VACUUM_RI),
        Vector3::new(1.0, 0.0, 0.0));

    // Nothing lies along +X, so the sky shows through.
    assert_eq!(w.cast_ray(&r, 0), Color::background());

    // An unlit sphere placed along +X blocks it.
    w.spheres.push(Sphere::new(Vector3::new(10.0, 1.2, -10.0), 2.0,
        matte(Color::white())));
    assert_eq!(w.cast_ray(&r, 0), Color::black());
}
