use crate::color::Color;
use crate::vector::Vector3;
use crate::consts::VACUUM_RI;

/// A point light.
///
/// A very simple light source. Provides a scalar intensity and a position
/// where light is produced from; lights are white.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Light {
    pub position: Vector3,
    pub intensity: f64,
}

impl Light {
    pub fn new(position: Vector3, intensity: f64) -> Light {
        Light { position, intensity }
    }
}

/// Blend weights for the four contributions to a shaded color.
///
/// These are not reflectance fractions; they need not sum to one, and a
/// mirror may well carry a specular weight of ten.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Albedo {
    pub diffuse: f64,
    pub specular: f64,
    pub reflect: f64,
    pub refract: f64,
}

impl Albedo {
    pub fn new(diffuse: f64, specular: f64, reflect: f64, refract: f64)
        -> Albedo {
        Albedo { diffuse, specular, reflect, refract }
    }
}

impl Default for Albedo {
    fn default() -> Albedo {
        Albedo { diffuse: 1.0, specular: 0.0, reflect: 0.0, refract: 0.0 }
    }
}

/// A material record.
///
/// Materials use attributes from the Phong reflection model (diffuse color
/// and specular exponent), weighted against mirror reflection and refraction
/// by an `Albedo`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    pub diffuse_color: Color,
    pub specular_exponent: f64,
    pub albedo: Albedo,
    pub refractive_index: f64,
}

/// The default material is purely diffuse and black.
impl Default for Material {
    fn default() -> Material {
        Material {
            diffuse_color: Color::black(),
            specular_exponent: 0.0,
            albedo: Default::default(),
            refractive_index: VACUUM_RI,
        }
    }
}

impl Material {
    pub fn new(refractive_index: f64, albedo: Albedo, diffuse_color: Color,
        specular_exponent: f64) -> Material {
        Material { diffuse_color, specular_exponent, albedo, refractive_index }
    }

    /// A material identical to the default one, with another diffuse color.
    pub fn diffuse(diffuse_color: Color) -> Material {
        Material { diffuse_color, ..Default::default() }
    }
}

/// Calculates the diffuse and specular light one unoccluded light casts on a
/// point.
///
/// `normalv` is the surface normal at `point` and `dir` the direction of the
/// ray which hit it. The returned pair is `(diffuse, specular)`, both
/// already scaled by the light's intensity.
pub fn lighting(light: &Light, point: Vector3, normalv: Vector3,
    dir: Vector3, specular_exponent: f64) -> (f64, f64) {
    let lightv = (light.position - point).normalize();

    let diffuse = light.intensity * lightv.dot(&normalv).max(0.0);

    let reflectv = -(-lightv).reflect(&normalv);
    let specular = light.intensity
        * reflectv.dot(&dir).max(0.0).powf(specular_exponent);

    (diffuse, specular)
}

#[test]
fn default_material_is_purely_diffuse() {
    let m: Material = Default::default();

    assert_eq!(m.albedo, Albedo::new(1.0, 0.0, 0.0, 0.0));
    assert_eq!(m.refractive_index, 1.0);
    assert_eq!(m.diffuse_color, Color::black());
}

#[test]
fn light_straight_above_surface() {
    let light = Light::new(Vector3::new(0.0, 10.0, 0.0), 1.5);
    let point = Vector3::zero();
    let normalv = Vector3::new(0.0, 1.0, 0.0);
    let dir = Vector3::new(0.0, -1.0, 0.0);

    let (diffuse, specular) = lighting(&light, point, normalv, dir, 50.0);
    assert!(crate::feq(diffuse, 1.5));
    assert!(crate::feq(specular, 1.5));
}

#[test]
fn eye_off_the_mirror_direction() {
    let light = Light::new(Vector3::new(0.0, 10.0, 0.0), 1.0);
    let point = Vector3::zero();
    let normalv = Vector3::new(0.0, 1.0, 0.0);
    let dir = Vector3::new(1.0, -1.0, 0.0).normalize();

    let (diffuse, specular) = lighting(&light, point, normalv, dir, 2.0);
    assert!(crate::feq(diffuse, 1.0));

    // cos(45 deg) squared
    assert!(crate::feq(specular, 0.5));
}

#[test]
fn light_behind_surface() {
    let light = Light::new(Vector3::new(0.0, -10.0, 0.0), 1.0);
    let point = Vector3::zero();
    let normalv = Vector3::new(0.0, 1.0, 0.0);
    let dir = Vector3::new(0.0, -1.0, 0.0);

    let (diffuse, specular) = lighting(&light, point, normalv, dir, 10.0);
    assert_eq!(diffuse, 0.0);
    assert_eq!(specular, 0.0);
}
