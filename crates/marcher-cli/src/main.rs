//! Marcher CLI - headless rendering of raymarched shape scenes

mod scene_file;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use marcher_render::{FrameOutcome, RaymarchEffect, init_headless, wgpu};
use marcher_scene::SharedShapeRegistry;
use scene_file::SceneFile;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Evaluator used when none is given on the command line
const DEMO_EVALUATOR: &str = include_str!("../shaders/demo_evaluator.wgsl");

#[derive(Parser)]
#[command(name = "marcher")]
#[command(about = "Raymarch SDF shape scenes over a full-screen pass", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a scene to an image file (headless)
    Render {
        /// Scene file to render (optional, uses demo if not provided)
        #[arg(short, long)]
        scene: Option<PathBuf>,

        /// Output image file (.png)
        #[arg(short, long, default_value = "render.png")]
        output: PathBuf,

        /// Image width
        #[arg(long, default_value = "1280")]
        width: u32,

        /// Image height
        #[arg(long, default_value = "720")]
        height: u32,

        /// WGSL fragment stage to evaluate (defaults to the bundled demo)
        #[arg(short, long)]
        evaluator: Option<PathBuf>,

        /// Render without an evaluator (source is copied through)
        #[arg(long, conflicts_with = "evaluator")]
        no_evaluator: bool,

        /// Number of turntable frames to render around the camera target
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        orbit_frames: u32,
    },

    /// Write the demo scene to a file as a starting point
    DemoScene {
        /// Output scene file
        #[arg(short, long, default_value = "scene.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            scene,
            output,
            width,
            height,
            evaluator,
            no_evaluator,
            orbit_frames,
        } => {
            let evaluator = if no_evaluator {
                None
            } else {
                Some(load_evaluator(evaluator.as_deref())?)
            };
            run_render(
                scene.as_deref(),
                &output,
                width,
                height,
                evaluator.as_deref(),
                orbit_frames,
            )?;
        }
        Commands::DemoScene { output } => {
            SceneFile::demo().save(&output)?;
            println!("Wrote demo scene to {}", output.display());
        }
    }

    Ok(())
}

fn load_evaluator(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read evaluator {}", path.display())),
        None => Ok(DEMO_EVALUATOR.to_string()),
    }
}

fn frame_path(output: &Path, frame: u32, frame_count: u32) -> PathBuf {
    if frame_count == 1 {
        return output.to_path_buf();
    }

    let stem = output
        .file_stem()
        .map_or_else(|| "render".to_string(), |s| s.to_string_lossy().to_string());
    let extension = output
        .extension()
        .map_or_else(|| "png".to_string(), |e| e.to_string_lossy().to_string());
    output.with_file_name(format!("{}_{:03}.{}", stem, frame, extension))
}

/// Create the effect for `scene`, failing if `evaluator` does not compile
fn build_effect(
    scene: &SceneFile,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    evaluator: Option<&str>,
) -> Result<RaymarchEffect> {
    let mut effect = RaymarchEffect::with_registry(
        device,
        queue,
        wgpu::TextureFormat::Rgba8UnormSrgb,
        SharedShapeRegistry::new(),
        scene.effect.clone(),
    );
    effect.set_light(scene.light());

    if let Some(source) = evaluator {
        effect
            .set_evaluator(source)
            .context("Evaluator failed to compile")?;
    }

    Ok(effect)
}

fn run_render(
    scene_path: Option<&Path>,
    output: &Path,
    width: u32,
    height: u32,
    evaluator: Option<&str>,
    orbit_frames: u32,
) -> Result<()> {
    let scene = match scene_path {
        Some(path) => {
            println!("Loading scene: {}", path.display());
            SceneFile::load(path)?
        }
        None => SceneFile::demo(),
    };

    println!(
        "Rendering {} shape(s) to {} ({}x{})...",
        scene.shapes.len(),
        output.display(),
        width,
        height
    );

    let (device, queue) =
        pollster::block_on(init_headless()).context("Failed to initialize GPU")?;
    let effect = build_effect(&scene, device, queue, evaluator)?;

    let nodes = scene.attach_shapes(effect.registry());

    let mut camera = scene.camera(width as f32 / height as f32);
    let background = scene.background_image(width, height);
    let orbit_step = std::f32::consts::TAU / orbit_frames as f32;

    for frame in 0..orbit_frames {
        let (image, outcome) = effect.render_to_image(&background, &camera.state())?;

        let path = frame_path(output, frame, orbit_frames);
        image
            .save(&path)
            .with_context(|| format!("Failed to save {}", path.display()))?;

        match outcome {
            FrameOutcome::Raymarched { shape_count } => {
                tracing::info!("Frame {}: raymarched {} shape(s)", frame, shape_count);
            }
            FrameOutcome::Copied(reason) => {
                tracing::warn!("Frame {}: copied background ({:?})", frame, reason);
            }
        }
        println!("Saved to: {}", path.display());

        camera.orbit(orbit_step, 0.0);
    }

    for node in &nodes {
        node.detach(effect.registry());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_path_numbering() {
        let output = Path::new("out/render.png");

        assert_eq!(frame_path(output, 0, 1), PathBuf::from("out/render.png"));
        assert_eq!(frame_path(output, 7, 12), PathBuf::from("out/render_007.png"));
    }

    #[test]
    fn test_cli_parses_render_flags() {
        let cli = Cli::try_parse_from([
            "marcher",
            "render",
            "--no-evaluator",
            "--orbit-frames",
            "4",
            "--width",
            "64",
        ]);

        match cli.map(|c| c.command) {
            Ok(Commands::Render {
                no_evaluator,
                orbit_frames,
                width,
                height,
                ..
            }) => {
                assert!(no_evaluator);
                assert_eq!(orbit_frames, 4);
                assert_eq!(width, 64);
                assert_eq!(height, 720);
            }
            _ => panic!("Expected render command"),
        }
    }

    #[test]
    fn test_zero_orbit_frames_rejected() {
        assert!(Cli::try_parse_from(["marcher", "render", "--orbit-frames", "0"]).is_err());
    }

    #[test]
    fn test_broken_evaluator_is_an_error() {
        let Ok((device, queue)) = pollster::block_on(init_headless()) else {
            eprintln!("Skipping GPU test: no adapter");
            return;
        };

        let result = build_effect(&SceneFile::demo(), device, queue, Some("fn fs_main("));
        let error = result.err().map(|e| e.root_cause().to_string());
        assert!(error.is_some_and(|e| e.starts_with("Evaluator rejected")));
    }

    #[test]
    fn test_bundled_evaluator_compiles() {
        let Ok((device, queue)) = pollster::block_on(init_headless()) else {
            eprintln!("Skipping GPU test: no adapter");
            return;
        };

        let effect = build_effect(&SceneFile::demo(), device, queue, Some(DEMO_EVALUATOR));
        assert!(effect.is_ok_and(|e| e.has_evaluator()));
    }
}
