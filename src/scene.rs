use std::collections::BTreeMap;
use std::convert::TryFrom;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use log::{ debug, info };
use serde::Deserialize;

use crate::color::Color;
use crate::vector::Vector3;
use crate::light::{ Light, Material, Albedo };
use crate::geometry::Sphere;
use crate::world::World;
use crate::camera::Camera;
use crate::error::{ Error, Result };
use crate::consts::{ CANVAS_WIDTH, CANVAS_HEIGHT, FIELD_OF_VIEW, VACUUM_RI };

/// A world together with the camera looking at it.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub world: World,
    pub camera: Camera,
}

impl Scene {
    /// The reference scene: four spheres and three lights over the
    /// checkerboard, seen at 1024x768.
    pub fn reference() -> Scene {
        Scene { world: World::new(), camera: Camera::default() }
    }

    /// Parses and validates a JSON scene description.
    pub fn from_json_str(json: &str) -> Result<Scene> {
        let scene_json: SceneJson = serde_json::from_str(json)?;
        Scene::try_from(scene_json)
    }

    /// Loads a JSON scene description from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Scene> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let scene_json: SceneJson = serde_json::from_reader(reader)?;
        let scene = Scene::try_from(scene_json)?;

        info!("Loaded scene {} ({} spheres, {} lights).", path.display(),
            scene.world.spheres.len(), scene.world.lights.len());
        Ok(scene)
    }
}

/// A scene description, as read from JSON.
///
/// Materials are named once and shared by every sphere naming them:
///
/// ```json
/// {
///   "camera": { "width": 640, "height": 480, "field_of_view": 1.0 },
///   "materials": {
///     "ivory": {
///       "diffuse_color": [0.4, 0.4, 0.3],
///       "specular_exponent": 50.0,
///       "albedo": [0.6, 0.3, 0.1, 0.0]
///     }
///   },
///   "spheres": [
///     { "center": [-3.0, 0.0, -16.0], "radius": 2.0, "material": "ivory" }
///   ],
///   "lights": [ { "position": [-20.0, 20.0, 20.0], "intensity": 1.5 } ],
///   "floor": true
/// }
/// ```
///
/// Every section is optional. A missing camera uses the default view, and
/// the floor is on unless disabled.
#[derive(Clone, Debug, Deserialize)]
pub struct SceneJson {
    #[serde(default)]
    camera: CameraJson,

    #[serde(default)]
    materials: BTreeMap<String, MaterialJson>,

    #[serde(default)]
    spheres: Vec<SphereJson>,

    #[serde(default)]
    lights: Vec<LightJson>,

    #[serde(default = "floor_enabled")]
    floor: bool,
}

fn floor_enabled() -> bool {
    true
}

#[derive(Clone, Debug, Deserialize)]
struct CameraJson {
    width: usize,
    height: usize,
    field_of_view: f64,
}

impl Default for CameraJson {
    fn default() -> CameraJson {
        CameraJson {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            field_of_view: FIELD_OF_VIEW,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
struct MaterialJson {
    diffuse_color: [f64; 3],
    specular_exponent: f64,
    albedo: [f64; 4],
    refractive_index: f64,
}

/// Missing material fields fall back to the purely diffuse default.
impl Default for MaterialJson {
    fn default() -> MaterialJson {
        MaterialJson {
            diffuse_color: [0.0, 0.0, 0.0],
            specular_exponent: 0.0,
            albedo: [1.0, 0.0, 0.0, 0.0],
            refractive_index: VACUUM_RI,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
struct SphereJson {
    center: [f64; 3],
    radius: f64,
    material: String,
}

#[derive(Clone, Debug, Deserialize)]
struct LightJson {
    position: [f64; 3],
    intensity: f64,
}

fn invalid(what: String) -> Error {
    Error::InvalidScene(what)
}

impl CameraJson {
    fn to_camera(&self) -> Result<Camera> {
        let camera = Camera::new(self.width, self.height, self.field_of_view);
        camera.validate()?;
        Ok(camera)
    }
}

impl MaterialJson {
    fn to_material(&self, name: &str) -> Result<Material> {
        if !(self.refractive_index > 0.0) {
            return Err(invalid(format!(
                "material \"{}\" has refractive index {}", name,
                self.refractive_index)));
        }

        if !(self.specular_exponent >= 0.0) {
            return Err(invalid(format!(
                "material \"{}\" has specular exponent {}", name,
                self.specular_exponent)));
        }

        if self.albedo.iter().any(|w| !(*w >= 0.0)) {
            return Err(invalid(format!(
                "material \"{}\" has a negative albedo weight", name)));
        }

        let [d, s, rl, rr] = self.albedo;
        Ok(Material::new(
            self.refractive_index,
            Albedo::new(d, s, rl, rr),
            Color::from(&self.diffuse_color[..]),
            self.specular_exponent,
        ))
    }
}

impl TryFrom<SceneJson> for Scene {
    type Error = Error;

    fn try_from(scene_json: SceneJson) -> Result<Scene> {
        let camera = scene_json.camera.to_camera()?;

        // Build every material once; spheres share them.
        let mut materials: BTreeMap<&str, Arc<Material>> = BTreeMap::new();
        for (name, m) in scene_json.materials.iter() {
            materials.insert(name, Arc::new(m.to_material(name)?));
        }

        let mut world = World::empty();
        for (index, s) in scene_json.spheres.iter().enumerate() {
            if !(s.radius > 0.0) {
                return Err(invalid(format!("sphere {} has radius {}", index,
                    s.radius)));
            }

            let material = materials.get(s.material.as_str())
                .ok_or_else(|| Error::UnknownMaterial {
                    index,
                    name: s.material.clone(),
                })?;

            world.spheres.push(Sphere::new(Vector3::from(s.center), s.radius,
                Arc::clone(material)));
        }

        for (index, l) in scene_json.lights.iter().enumerate() {
            if !(l.intensity >= 0.0) {
                return Err(invalid(format!("light {} has intensity {}", index,
                    l.intensity)));
            }

            world.lights.push(Light::new(Vector3::from(l.position),
                l.intensity));
        }

        if scene_json.floor {
            world.floor = Some(Default::default());
        }

        debug!("Built scene with {} shared materials.", materials.len());
        Ok(Scene { world, camera })
    }
}

#[test]
fn reference_scene_file_matches_builtin() {
    let scene = Scene::from_json_str(
        include_str!("../scenes/reference.json")).unwrap();

    assert_eq!(scene, Scene::reference());
}

#[test]
fn empty_description_uses_defaults() {
    let scene = Scene::from_json_str("{}").unwrap();

    assert_eq!(scene.camera, Camera::default());
    assert!(scene.world.spheres.is_empty());
    assert!(scene.world.lights.is_empty());
    assert!(scene.world.floor.is_some());
}

#[test]
fn spheres_share_named_materials() {
    let scene = Scene::from_json_str(r#"{
        "materials": { "rubber": { "diffuse_color": [0.3, 0.1, 0.1] } },
        "spheres": [
            { "center": [0, 0, -10], "radius": 1, "material": "rubber" },
            { "center": [3, 0, -10], "radius": 1, "material": "rubber" }
        ],
        "floor": false
    }"#).unwrap();

    let s = &scene.world.spheres;
    assert!(Arc::ptr_eq(&s[0].material, &s[1].material));
    assert_eq!(s[0].material.diffuse_color, Color::rgb(0.3, 0.1, 0.1));
    assert_eq!(s[0].material.albedo, Albedo::new(1.0, 0.0, 0.0, 0.0));
    assert!(scene.world.floor.is_none());
}

#[test]
fn undefined_material_is_rejected() {
    let res = Scene::from_json_str(r#"{
        "spheres": [ { "center": [0, 0, -10], "radius": 1, "material": "gold" } ]
    }"#);

    match res {
        Err(Error::UnknownMaterial { index, name }) => {
            assert_eq!(index, 0);
            assert_eq!(name, "gold");
        },
        other => panic!("Expected an unknown material error, got {:?}.",
            other),
    }
}

#[test]
fn invalid_values_are_rejected() {
    let bad = [
        r#"{ "camera": { "width": 0, "height": 10, "field_of_view": 1.0 } }"#,
        r#"{ "camera": { "width": 10, "height": 10, "field_of_view": 4.0 } }"#,
        r#"{ "materials": { "m": { "refractive_index": 0.0 } } }"#,
        r#"{ "materials": { "m": { "specular_exponent": -1.0 } } }"#,
        r#"{ "materials": { "m": { "albedo": [1.0, -0.5, 0.0, 0.0] } } }"#,
        r#"{ "materials": { "m": {} },
             "spheres": [ { "center": [0, 0, 0], "radius": 0, "material": "m" } ] }"#,
        r#"{ "lights": [ { "position": [0, 0, 0], "intensity": -1 } ] }"#,
    ];

    for json in bad.iter() {
        assert!(matches!(Scene::from_json_str(json),
            Err(Error::InvalidScene(_))), "accepted {}", json);
    }
}

#[test]
fn malformed_json_is_rejected() {
    assert!(matches!(Scene::from_json_str("{ \"spheres\": 3 }"),
        Err(Error::Json(_))));
}

#[test]
fn missing_scene_file_is_an_io_error() {
    let path = std::env::temp_dir().join("whitted_tracer_no_such_scene.json");

    assert!(matches!(Scene::load(&path), Err(Error::Io(_))));
}
