use log::{ debug, info };

use crate::ray::Ray;
use crate::vector::Vector3;
use crate::color::Color;
use crate::world::World;
use crate::canvas::Canvas;
use crate::error::{ Error, Result };
use crate::consts::{ CANVAS_WIDTH, CANVAS_HEIGHT, FIELD_OF_VIEW };

/// A pinhole camera for generating a canvas.
///
/// The camera sits at the origin and looks down the negative Z axis. Only
/// the image size and the vertical field of view can change.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    /// The horizontal size of the resultant canvas.
    pub hsize: usize,

    /// The vertical size of the resultant canvas.
    pub vsize: usize,

    /// The vertical angle, in radians, the camera can see.
    pub field_of_view: f64,
}

impl Default for Camera {
    fn default() -> Camera {
        Camera::new(CANVAS_WIDTH, CANVAS_HEIGHT, FIELD_OF_VIEW)
    }
}

impl Camera {
    pub fn new(hsize: usize, vsize: usize, field_of_view: f64) -> Camera {
        Camera { hsize, vsize, field_of_view }
    }

    /// Checks that the camera can produce an image.
    ///
    /// The canvas must not be empty, and the field of view must lie strictly
    /// between 0 and pi; wider angles would flip the image.
    pub fn validate(&self) -> Result<()> {
        if self.hsize == 0 || self.vsize == 0 {
            return Err(Error::InvalidScene(format!(
                "canvas size {}x{} is empty", self.hsize, self.vsize)));
        }

        let fov = self.field_of_view;
        if !(fov > 0.0 && fov < std::f64::consts::PI) {
            return Err(Error::InvalidScene(format!(
                "field of view {} is outside (0, pi)", fov)));
        }

        Ok(())
    }

    /// Builds the primary ray through the center of pixel `(px, py)`.
    ///
    /// Pixel rows count downward from the top of the image.
    pub fn ray_for_pixel(&self, px: usize, py: usize) -> Ray {
        let half_view = (self.field_of_view / 2.0).tan();
        let aspect = self.hsize as f64 / self.vsize as f64;

        let x = (2.0 * (px as f64 + 0.5) / self.hsize as f64 - 1.0)
            * half_view * aspect;
        let y = -(2.0 * (py as f64 + 0.5) / self.vsize as f64 - 1.0)
            * half_view;

        let direction = Vector3::new(x, y, -1.0);
        debug_assert!(direction.norm() > 0.0);

        Ray::new(Vector3::zero(), direction.normalize())
    }

    /// Shades one row of pixels, left to right.
    pub fn render_row(&self, w: &World, y: usize) -> Vec<Color> {
        (0..self.hsize)
            .map(|x| w.cast_ray(&self.ray_for_pixel(x, y), 0))
            .collect()
    }

    /// Renders the world on the calling thread.
    pub fn render(&self, w: &World) -> Canvas {
        info!("Rendering {}x{} on one thread...", self.hsize, self.vsize);
        let mut image = Canvas::new(self.hsize, self.vsize);

        for y in 0..self.vsize {
            image.write_row(y, &self.render_row(w, y));
            debug!("Row {} done.", y);
        }

        image
    }
}

#[test]
fn ray_through_center() {
    let c = Camera::new(201, 101, std::f64::consts::PI / 2.0);
    let r = c.ray_for_pixel(100, 50);

    assert_eq!(r.origin, Vector3::zero());
    assert_eq!(r.direction, Vector3::new(0.0, 0.0, -1.0));
}

#[test]
fn ray_through_top_left_corner() {
    let c = Camera::new(2, 2, std::f64::consts::PI / 2.0);
    let r = c.ray_for_pixel(0, 0);

    // tan(pi / 4) = 1, so the pixel center sits at (-0.5, 0.5, -1).
    assert_eq!(r.direction, Vector3::new(-0.5, 0.5, -1.0).normalize());
}

#[test]
fn wide_image_stretches_x() {
    let c = Camera::new(4, 2, std::f64::consts::PI / 2.0);
    let r = c.ray_for_pixel(3, 1);

    assert_eq!(r.direction, Vector3::new(1.5, -0.5, -1.0).normalize());
}

#[test]
fn default_camera_matches_reference_view() {
    let c = Camera::default();

    assert_eq!(c.hsize, 1024);
    assert_eq!(c.vsize, 768);
    assert_eq!(c.field_of_view, 1.0);
}

#[test]
fn validate_rejects_unusable_cameras() {
    assert!(Camera::default().validate().is_ok());

    let bad = [
        Camera::new(0, 48, 1.0),
        Camera::new(64, 0, 1.0),
        Camera::new(64, 48, 0.0),
        Camera::new(64, 48, 4.0),
        Camera::new(64, 48, std::f64::consts::PI),
        Camera::new(64, 48, f64::NAN),
    ];

    for c in bad.iter() {
        assert!(matches!(c.validate(), Err(Error::InvalidScene(_))),
            "accepted {:?}", c);
    }
}

#[test]
fn render_reference_world_top_left_is_sky() {
    let w = World::new();
    let c = Camera::new(64, 48, 1.0);
    let image = c.render(&w);

    assert_eq!(image.read_pixel(0, 0).unwrap(), Color::background());
    assert_ne!(image.read_pixel(32, 24).unwrap(), Color::background());
}

#[test]
fn reflective_and_refractive_spheres_differ_from_diffuse() {
    use std::sync::Arc;
    use crate::light::Material;

    let w = World::new();
    let mut flat = World::new();
    for s in flat.spheres.iter_mut() {
        let albedo = s.material.albedo;
        if albedo.reflect > 0.0 || albedo.refract > 0.0 {
            s.material = Arc::new(Material::diffuse(s.material.diffuse_color));
        }
    }

    let c = Camera::new(64, 48, 1.0);
    let image = c.render(&w);
    let flat_image = c.render(&flat);

    // The centers of the glass and mirror spheres project near these pixels.
    let glass = (28, 29);
    let mirror = (48, 11);
    for &(x, y) in [glass, mirror].iter() {
        assert_ne!(image.read_pixel(x, y).unwrap(),
            flat_image.read_pixel(x, y).unwrap(), "pixel ({}, {})", x, y);
    }
}
