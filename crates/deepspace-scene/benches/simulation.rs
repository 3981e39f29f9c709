use criterion::{Criterion, black_box, criterion_group, criterion_main};
use deepspace_config::SceneConfig;
use deepspace_scene::palette::NebulaPalette;
use deepspace_scene::{ShootingStarPool, Simulation, StarField};
use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench_star_field_advance(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut field = StarField::generate(12_000, &mut rng);
    c.bench_function("star_field_advance_12k", |bencher| {
        bencher.iter(|| black_box(field.advance(black_box(1.0 / 60.0), 1.0, &mut rng)))
    });
}

fn bench_star_field_generate(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    c.bench_function("star_field_generate_12k", |bencher| {
        bencher.iter(|| black_box(StarField::generate(12_000, &mut rng)))
    });
}

fn bench_shooting_pool_update(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let palette = NebulaPalette::new(true);
    let camera = Vec3::new(0.0, 0.0, 100.0);
    let mut pool = ShootingStarPool::new(45, 40, 0.0, 1.0);
    c.bench_function("shooting_pool_45x40", |bencher| {
        bencher.iter(|| {
            pool.maybe_trigger(1.0 / 60.0, camera, &palette, &mut rng);
            pool.update(black_box(1.0 / 60.0), camera);
        })
    });
}

fn bench_full_frame(c: &mut Criterion) {
    for (name, config) in [
        ("frame_backdrop", SceneConfig::backdrop()),
        ("frame_planet", SceneConfig::planet()),
    ] {
        let mut sim = Simulation::new(&SceneConfig {
            seed: Some(4),
            ..config
        });
        c.bench_function(name, |bencher| {
            bencher.iter(|| black_box(sim.advance(black_box(1.0 / 60.0))))
        });
    }
}

criterion_group!(
    benches,
    bench_star_field_advance,
    bench_star_field_generate,
    bench_shooting_pool_update,
    bench_full_frame
);
criterion_main!(benches);
