use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

use terrane_blocks::{Block, BlockRegistry, BlockTextures, BrightnessRange};
use terrane_chunk::{Chunk, NoDetail, Voxels};
use terrane_mesh_cpu::{MeshContext, Neighbor, NeighborRing, RenderConfig, build_chunk_mesh};
use terrane_world::{ChunkCoord, HeightSamples, NoiseHeightField, WorldGenParams};

fn hilly_chunk(coord: ChunkCoord) -> Chunk {
    let params = WorldGenParams::default().with_water_level(40);
    let field = NoiseHeightField::new(1337, 40, 20.0, 0.05);
    let heights = HeightSamples::sample(&field, coord);
    Chunk::build(
        coord,
        Voxels::boxed(Block::AIR, 0),
        &heights,
        &params,
        &NoDetail,
        true,
    )
}

fn bench_build_chunk_mesh(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_chunk_mesh");
    group.measurement_time(Duration::from_secs(5));
    let reg = BlockRegistry::builtin();
    let tex = BlockTextures::builtin();
    let coord = ChunkCoord::new(0, 2, 0);
    let chunks: Vec<Chunk> = coord.ring().map(hilly_chunk).collect();
    let ring = NeighborRing::from_fn(coord, |n| {
        chunks
            .iter()
            .find(|ch| ch.coord() == n)
            .map(|ch| Neighbor::Loaded(ch.voxels()))
            .unwrap_or(Neighbor::KnownEmpty)
    });

    for (name, render) in [
        ("merged_smooth", RenderConfig::default()),
        (
            "merged_flat",
            RenderConfig {
                smooth_lighting: false,
                ..RenderConfig::default()
            },
        ),
        (
            "per_block",
            RenderConfig {
                merge_faces: false,
                ..RenderConfig::default()
            },
        ),
    ] {
        let ctx = MeshContext {
            reg: &reg,
            atlas: &tex,
            render,
            brightness: BrightnessRange::default(),
        };
        group.bench_function(name, |b| {
            b.iter(|| black_box(build_chunk_mesh(&ring, &ctx)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build_chunk_mesh);
criterion_main!(benches);
