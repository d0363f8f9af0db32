//! Benchmarks for frame synthesis.

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use cinecam::easing::{ease, Easing};
use cinecam::prelude::*;
use nalgebra::Point3;

fn program(shots: usize) -> Vec<Instruction> {
    let movements = [
        Movement::new().with_rotation(RotationKind::ArcLeft, MovementScale::Full),
        Movement::new()
            .with_distance(DistanceKind::DollyIn, MovementScale::Medium)
            .with_tilt(TiltKind::TiltUp, MovementScale::Short),
        Movement::new().with_rig(RigKind::DroneShot, MovementScale::Medium),
        Movement::new().with_rig(RigKind::Handheld, MovementScale::Full),
    ];
    (0..shots)
        .map(|i| {
            Instruction::new(100)
                .with_subject(i % 3)
                .with_easing(Easing::ALL[i % Easing::ALL.len()])
                .with_shot_type(ShotType::SIZES[i % ShotType::SIZES.len()])
                .with_camera_angle(CameraAngle::ALL[i % CameraAngle::ALL.len()])
                .with_movement(movements[i % movements.len()])
        })
        .collect()
}

fn bench_easing(c: &mut Criterion) {
    c.bench_function("ease_all_curves_1000", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for curve in Easing::ALL {
                for i in 0..1000 {
                    sum += ease(black_box(i as f64 / 999.0), curve);
                }
            }
            sum
        })
    });
}

fn bench_synthesis(c: &mut Criterion) {
    let subjects = Subject::default_set();
    let instructions = program(12);
    let initial = CameraPose::default();

    c.bench_function("synthesize_12_shots", |b| {
        b.iter(|| synthesize(black_box(&subjects), black_box(&instructions), &initial).unwrap())
    });

    let blended = SynthesisOptions::default().blended(20);
    c.bench_function("synthesize_12_shots_blended", |b| {
        b.iter(|| {
            synthesize_with_options(black_box(&subjects), black_box(&instructions), &initial, &blended)
                .unwrap()
        })
    });
}

fn bench_batch(c: &mut Criterion) {
    let scenes: Vec<Scene> = (0..32)
        .map(|i| {
            Scene::new(Subject::default_set(), program(4)).with_initial_pose(CameraPose::looking_at(
                Point3::new(i as f64 - 16.0, 2.0, 12.0),
                &Point3::origin(),
                35.0,
            ))
        })
        .collect();

    let mut group = c.benchmark_group("batch_32_scenes");
    group.bench_function("parallel", |b| {
        b.iter(|| synthesize_batch(black_box(&scenes), &SynthesisOptions::default()))
    });
    group.bench_function("sequential", |b| {
        b.iter(|| synthesize_batch(black_box(&scenes), &SynthesisOptions::default().sequential()))
    });
    group.finish();
}

criterion_group!(benches, bench_easing, bench_synthesis, bench_batch);
criterion_main!(benches);
