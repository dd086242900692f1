//! Line-oriented scene description loader
//!
//! ```text
//! # comment
//! Bounds 40
//! Camera Position 0 2 -10
//! Camera FOV 60
//! Color 0.9 0.8 0.6
//! MengerSponge 0 0 0 6 3
//! Light -10 10 -10 1 1 1
//! ```
//!
//! `Color` sets the color of every body that follows. Box and Cross sizes
//! are full edge lengths. Malformed lines are skipped with a warning.

use anyhow::{Context, Result, anyhow, bail};
use glam::Vec3;
use sdtrace_core::camera::Camera;
use sdtrace_core::scene::{Light, Scene};
use sdtrace_core::sdf::{
    Aabb, Box3, Cross, MAX_MENGER_DEPTH, Sphere, death_star, menger_sponge,
};
use std::fs;
use std::path::Path;
use std::str::SplitWhitespace;
use tracing::{info, warn};

/// Load a scene file. A missing or unreadable file yields an empty scene.
pub fn load(path: &Path) -> Scene {
    match fs::read_to_string(path) {
        Ok(source) => {
            let scene = parse(&source);
            info!(
                path = %path.display(),
                bodies = scene.root().leaf_count(),
                lights = scene.lights().len(),
                "Loaded scene"
            );
            scene
        }
        Err(e) => {
            warn!("Cannot read scene {}: {}; rendering an empty scene", path.display(), e);
            parse("")
        }
    }
}

/// Parse scene source text
pub fn parse(source: &str) -> Scene {
    let mut builder = SceneBuilder::default();
    for (number, line) in source.lines().enumerate() {
        if let Err(e) = builder.line(line) {
            warn!(line = number + 1, "Skipping `{}`: {:#}", line.trim(), e);
        }
    }
    builder.finish()
}

struct Args<'a> {
    words: SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn word(&mut self) -> Result<&'a str> {
        self.words.next().ok_or_else(|| anyhow!("missing argument"))
    }

    fn f32(&mut self) -> Result<f32> {
        let word = self.word()?;
        let value: f32 = word
            .parse()
            .with_context(|| format!("`{word}` is not a number"))?;
        if !value.is_finite() {
            bail!("`{word}` is not finite");
        }
        Ok(value)
    }

    fn u32(&mut self) -> Result<u32> {
        let word = self.word()?;
        word.parse()
            .with_context(|| format!("`{word}` is not a non-negative integer"))
    }

    fn vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3::new(self.f32()?, self.f32()?, self.f32()?))
    }

    fn is_empty(&mut self) -> bool {
        self.words.clone().next().is_none()
    }
}

struct SceneBuilder {
    scene: Scene,
    camera: Camera,
    color: Vec3,
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self {
            scene: Scene::default(),
            camera: Camera::default(),
            color: Vec3::ONE,
        }
    }
}

impl SceneBuilder {
    fn line(&mut self, line: &str) -> Result<()> {
        let line = line.split('#').next().unwrap_or_default();
        let mut args = Args {
            words: line.split_whitespace(),
        };
        let Some(command) = args.words.next() else {
            return Ok(());
        };

        match command {
            "Color" => self.color = args.vec3()?,
            "Sphere" => {
                let center = args.vec3()?;
                let radius = args.f32()?;
                self.scene.append(Sphere::new(center, radius, self.color));
            }
            "Box" => {
                let center = args.vec3()?;
                let size = args.vec3()?;
                self.scene.append(Box3::from_size(center, size, self.color));
            }
            "Cross" => {
                let center = args.vec3()?;
                let size = args.vec3()?;
                self.scene.append(Cross::from_size(center, size, self.color));
            }
            "DeathStar" => {
                let center = args.vec3()?;
                let radius = args.f32()?;
                self.scene.append(death_star(center, radius, self.color));
            }
            "MengerSponge" => {
                let center = args.vec3()?;
                let size = args.f32()?;
                let depth = args.u32()?;
                if depth > MAX_MENGER_DEPTH {
                    bail!("sponge depth {depth} exceeds the maximum of {MAX_MENGER_DEPTH}");
                }
                self.scene
                    .append(menger_sponge(center, size, depth, self.color));
            }
            "Light" => {
                let position = args.vec3()?;
                let color = if args.is_empty() {
                    Vec3::ONE
                } else {
                    args.vec3()?
                };
                self.scene.add_light(Light::new(position, color));
            }
            "Bounds" => {
                let size = args.f32()?;
                if size <= 0.0 {
                    bail!("bounds must be positive");
                }
                self.scene.set_bounds(Aabb::cube(size * 0.5));
            }
            "Camera" => match args.word()? {
                "Position" => self.camera.position = args.vec3()?,
                "Direction" => self.camera.direction = args.vec3()?,
                "Up" => self.camera.up = args.vec3()?,
                "FOV" => self.camera.fov = args.f32()?.to_radians(),
                other => bail!("unknown camera property `{other}`"),
            },
            other => bail!("unknown command `{other}`"),
        }
        Ok(())
    }

    fn finish(mut self) -> Scene {
        self.scene.set_camera(self.camera);
        if self.scene.lights().is_empty() {
            self.scene.add_light(Light::white(self.camera.position));
        }
        self.scene
    }
}
