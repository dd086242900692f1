//! Integration tests for scene construction through CPU rendering

// Tests are allowed to use expect/unwrap for cleaner error messages
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use approx::assert_relative_eq;
use sdtrace_core::prelude::*;

fn gallery() -> Scene {
    let mut scene = Scene::new(Aabb::cube(30.0));
    scene.set_camera(Camera::look_at(Vec3::new(0.0, 2.0, -8.0), Vec3::new(0.0, 0.0, 6.0)));

    scene.append(Box3::from_size(Vec3::new(0.0, -3.0, 6.0), Vec3::new(20.0, 1.0, 20.0), Vec3::splat(0.6)));
    scene.append(menger_sponge(Vec3::new(-3.0, 0.0, 6.0), 3.0, 2, Vec3::new(0.9, 0.8, 0.5)));
    scene.append(death_star(Vec3::new(3.0, 0.0, 7.0), 1.5, Vec3::new(0.5, 0.6, 0.9)));

    scene.add_light(Light::white(Vec3::new(-8.0, 10.0, -4.0)));
    scene.add_light(Light::new(Vec3::new(8.0, 4.0, -6.0), Vec3::new(0.3, 0.3, 0.4)));
    scene
}

#[test]
fn lone_sphere_distances() {
    let mut scene = Scene::default();
    scene.append(Sphere::new(Vec3::ZERO, 2.0, Vec3::ONE));

    assert_relative_eq!(scene.distance(Vec3::ZERO), -2.0);
    for d in [0.5_f32, 2.0, 7.0] {
        assert_relative_eq!(scene.distance(Vec3::new(0.0, d, 0.0)), d - 2.0, epsilon = 1e-6);
    }
}

#[test]
fn scene_sdf_is_idempotent() {
    let scene = gallery();
    let p = Vec3::new(-2.7, 0.3, 5.1);
    let a = scene.sdf(p);
    let b = scene.sdf(p);
    assert_eq!(a.distance.to_bits(), b.distance.to_bits());
    assert_eq!(a.color, b.color);
}

#[test]
fn sequential_and_parallel_frames_are_identical() {
    let scene = gallery();
    for threads in [1, 7] {
        let settings = RenderSettings {
            width: 32,
            height: 24,
            antialiasing: 2,
            threads,
            ..RenderSettings::default()
        };
        let ctx = RenderContext::new(&scene, &settings);
        assert_eq!(render_sequential(&ctx), render_parallel(&ctx).unwrap());
    }
}

#[test]
fn rendered_frame_shows_geometry_and_background() {
    let scene = gallery();
    let settings = RenderSettings {
        width: 40,
        height: 30,
        background: [0.0, 0.0, 1.0],
        ..RenderSettings::default()
    };
    let frame = render_parallel(&RenderContext::new(&scene, &settings)).unwrap();

    // Top row looks over everything at the sky
    assert_eq!(frame.get(20, 0), Some(Vec3::Z));
    // Bottom row looks down at the lit floor
    let floor = frame.get(20, 29).unwrap();
    assert_ne!(floor, Vec3::Z);
    assert!(floor.min_element() >= settings.ambient * 0.6 - 1e-6);
}

#[test]
fn frame_saves_as_png() {
    let scene = gallery();
    let settings = RenderSettings {
        width: 16,
        height: 12,
        ..RenderSettings::default()
    };
    let frame = render_sequential(&RenderContext::new(&scene, &settings));

    let path = std::env::temp_dir().join(format!("sdtrace-test-{}.png", std::process::id()));
    frame.save(&path, settings.gamma).unwrap();
    let img = image::open(&path).unwrap();
    assert_eq!((img.width(), img.height()), (16, 12));
    let _ = std::fs::remove_file(&path);
}
