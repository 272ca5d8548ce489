use std::path::PathBuf;
use std::process;
use std::thread;

use clap::Parser;
use log::{ error, info };

use whitted_tracer::scene::Scene;
use whitted_tracer::parallel::parallel_render;
use whitted_tracer::error::Result;
use whitted_tracer::consts::OUT_FILE;

/// Renders spheres over a checkerboard with a Whitted-style ray tracer.
#[derive(Parser, Debug)]
#[clap(version, about)]
struct Args {
    /// JSON scene description; the built-in reference scene if omitted
    #[clap(short, long)]
    scene: Option<PathBuf>,

    /// Output image, .png or .ppm
    #[clap(short, long, default_value = OUT_FILE)]
    output: PathBuf,

    /// Overrides the scene's image width
    #[clap(short = 'W', long)]
    width: Option<usize>,

    /// Overrides the scene's image height
    #[clap(short = 'H', long)]
    height: Option<usize>,

    /// Overrides the scene's vertical field of view, in radians
    #[clap(long)]
    fov: Option<f64>,

    /// Worker threads; 1 renders on the main thread
    #[clap(short, long)]
    threads: Option<usize>,
}

fn run(args: Args) -> Result<()> {
    let mut scene = match args.scene {
        Some(ref path) => Scene::load(path)?,
        None => {
            info!("Using the reference scene.");
            Scene::reference()
        },
    };

    if let Some(width) = args.width {
        scene.camera.hsize = width;
    }
    if let Some(height) = args.height {
        scene.camera.vsize = height;
    }
    if let Some(fov) = args.fov {
        scene.camera.field_of_view = fov;
    }
    scene.camera.validate()?;

    let threads = args.threads
        .or_else(|| thread::available_parallelism().ok().map(|n| n.get()))
        .unwrap_or(1)
        .max(1);

    let Scene { world, camera } = scene;
    let canvas = if threads == 1 {
        camera.render(&world)
    } else {
        parallel_render(world, camera, threads)?
    };

    canvas.save(&args.output)
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    if let Err(e) = run(Args::parse()) {
        error!("{}", e);
        process::exit(1);
    }
}

#[cfg(test)]
fn overriding(width: Option<usize>, height: Option<usize>, fov: Option<f64>,
    output: &str) -> Args {
    Args {
        scene: None,
        output: std::env::temp_dir().join(output),
        width,
        height,
        fov,
        threads: Some(1),
    }
}

#[test]
fn field_of_view_override_is_validated() {
    use whitted_tracer::error::Error;

    let args = overriding(Some(8), Some(6), Some(4.0),
        "whitted_tracer_wide_fov.png");
    let output = args.output.clone();
    let _ = std::fs::remove_file(&output);

    assert!(matches!(run(args), Err(Error::InvalidScene(_))));
    assert!(!output.exists());
}

#[test]
fn empty_canvas_override_is_rejected_before_rendering() {
    use whitted_tracer::error::Error;

    let args = overriding(Some(0), Some(6), None,
        "whitted_tracer_zero_width.png");
    let output = args.output.clone();
    let _ = std::fs::remove_file(&output);

    assert!(matches!(run(args), Err(Error::InvalidScene(_))));
    assert!(!output.exists());
}

#[test]
fn valid_overrides_render_small_image() {
    let args = overriding(Some(8), Some(6), Some(1.2),
        "whitted_tracer_small_override.ppm");
    let output = args.output.clone();

    run(args).unwrap();
    assert!(output.exists());
    let _ = std::fs::remove_file(output);
}
