use std::sync::Arc;
use std::time::Duration;

use terrane_blocks::{Block, BlockRegistry, BlockTextures, BrightnessRange};
use terrane_io::MemoryStore;
use terrane_mesh_cpu::RenderConfig;
use terrane_runtime::{
    ChunkStreamer, CountingUploader, GenCtx, MeshEnv, Region, Runtime, RuntimeConfig,
};
use terrane_world::{ChunkCoord, FlatHeightField, WorldGenParams};

const WAIT: Duration = Duration::from_millis(20);

fn streamer(store: &Arc<MemoryStore>) -> ChunkStreamer {
    let params = WorldGenParams::default().with_water_level(62);
    let gen_ctx = GenCtx::new(params, Arc::new(FlatHeightField(70)), store.clone(), 64, 32);
    let mesh_env = MeshEnv::new(
        BlockRegistry::builtin(),
        Arc::new(BlockTextures::builtin()),
        RenderConfig::default(),
        BrightnessRange::default(),
    );
    let cfg = RuntimeConfig {
        gen_workers: 2,
        mesh_workers: 2,
    };
    ChunkStreamer::new(Runtime::new(cfg, gen_ctx, mesh_env))
}

fn center() -> ChunkCoord {
    ChunkCoord::new(0, 4, 0)
}

#[test]
fn region_loads_and_meshes_the_resolvable_centre() {
    let store = Arc::new(MemoryStore::new());
    let mut s = streamer(&store);
    let mut gpu = CountingUploader::default();
    assert_eq!(s.set_region(Region::new(center(), 1)), 27);
    let report = s.settle(&mut gpu, WAIT);

    // cy = 5 is above the ceiling
    assert_eq!(report.known_empty, 9);
    assert_eq!(report.generated, 18);
    assert_eq!(report.restored, 0);
    assert_eq!(report.meshed, 1);
    assert!(report.quads > 0);
    assert!(gpu.uploads >= 1);
    assert_eq!(s.pending_meshes(), 17);

    assert_eq!(s.block_at(3, 70, 3), Block::GRASS);
    assert_eq!(s.block_at(3, 69, 3), Block::DIRT);
    assert_eq!(s.block_at(3, 71, 3), Block::AIR);
    assert_eq!(s.block_at(3, 50, 3), Block::ROCK);
    let chunk = s.map().chunk(center()).unwrap();
    let g = chunk.read().unwrap();
    assert!(g.is_render_built());
    assert!(!g.needs_rebuild());
}

#[test]
fn unmodified_chunks_are_never_written() {
    let store = Arc::new(MemoryStore::new());
    let mut s = streamer(&store);
    let mut gpu = CountingUploader::default();
    s.set_region(Region::new(center(), 1));
    s.settle(&mut gpu, WAIT);
    let q = s.runtime().queue_debug_counts();
    assert_eq!((q.gen_queued, q.mesh_queued), (0, 0));
    assert!(s.runtime().gen_ctx().heights.stats().entries > 0);

    assert_eq!(s.shutdown(&mut gpu, WAIT).unwrap(), 27);
    assert_eq!(s.runtime().gen_ctx().heights.stats().entries, 0);
    assert!(store.is_empty());
    assert!(s.map().is_empty());
    assert_eq!(gpu.live, 0);
}

#[test]
fn edits_survive_unload_and_reload() {
    let store = Arc::new(MemoryStore::new());
    {
        let mut s = streamer(&store);
        let mut gpu = CountingUploader::default();
        s.set_region(Region::new(center(), 1));
        s.settle(&mut gpu, WAIT);
        assert!(s.set_block(3, 74, 3, Block::STONE));
        s.shutdown(&mut gpu, WAIT).unwrap();
    }
    assert_eq!(store.len(), 1);
    assert!(store.contains(center()));

    let mut s = streamer(&store);
    let mut gpu = CountingUploader::default();
    s.set_region(Region::new(center(), 1));
    let report = s.settle(&mut gpu, WAIT);
    assert_eq!(report.restored, 1);
    assert_eq!(s.block_at(3, 74, 3), Block::STONE);
    assert_eq!(s.block_at(3, 70, 3), Block::GRASS);
}

#[test]
fn moving_the_region_unloads_and_releases_buffers() {
    let store = Arc::new(MemoryStore::new());
    let mut s = streamer(&store);
    let mut gpu = CountingUploader::default();
    s.set_region(Region::new(center(), 1));
    s.settle(&mut gpu, WAIT);
    assert!(gpu.live >= 1);
    assert!(s.buffers(center()).is_some());

    s.set_region(Region::new(ChunkCoord::new(10, 4, 10), 0));
    let report = s.settle(&mut gpu, WAIT);
    assert_eq!(report.unloaded, 27);
    assert!(!s.map().is_resolved(center()));
    assert!(s.buffers(center()).is_none());
    assert_eq!(s.map().len(), 1);
    assert_eq!(gpu.live, 0);
    assert_eq!(gpu.releases, gpu.uploads);
}

#[test]
fn loads_finishing_outside_the_new_region_are_discarded() {
    let store = Arc::new(MemoryStore::new());
    let mut s = streamer(&store);
    let mut gpu = CountingUploader::default();
    s.set_region(Region::new(center(), 1));
    let far = ChunkCoord::new(10, 4, 10);
    s.set_region(Region::new(far, 0));
    let report = s.settle(&mut gpu, WAIT);

    assert_eq!(report.generated, 1);
    assert_eq!(report.known_empty, 0);
    assert_eq!(s.map().len(), 1);
    assert!(s.map().is_loaded(far));
    assert!(!s.map().is_resolved(center()));
    assert!(store.is_empty());
}

#[test]
fn border_edit_rebuilds_the_neighbour() {
    let store = Arc::new(MemoryStore::new());
    let mut s = streamer(&store);
    let mut gpu = CountingUploader::default();
    s.set_region(Region::new(center(), 2));
    s.settle(&mut gpu, WAIT);

    let east = ChunkCoord::new(1, 4, 0);
    assert!(s.set_block(15, 70, 5, Block::STONE));
    for c in [center(), east] {
        let chunk = s.map().chunk(c).unwrap();
        assert!(chunk.read().unwrap().needs_rebuild());
    }
    let west = ChunkCoord::new(-1, 4, 0);
    assert!(!s.map().chunk(west).unwrap().read().unwrap().needs_rebuild());

    let report = s.settle(&mut gpu, WAIT);
    assert_eq!(report.meshed, 2);
    for c in [center(), east] {
        let chunk = s.map().chunk(c).unwrap();
        assert!(!chunk.read().unwrap().needs_rebuild());
    }
    // the replaced buffers went through the release queue
    assert!(gpu.releases >= 1);
}

#[test]
fn corner_edit_rebuilds_the_diagonal_neighbour() {
    let store = Arc::new(MemoryStore::new());
    let mut s = streamer(&store);
    let mut gpu = CountingUploader::default();
    s.set_region(Region::new(center(), 2));
    s.settle(&mut gpu, WAIT);

    assert!(s.set_block(15, 70, 15, Block::STONE));
    let touched = [
        center(),
        ChunkCoord::new(1, 4, 0),
        ChunkCoord::new(0, 4, 1),
        ChunkCoord::new(1, 4, 1),
    ];
    for c in touched {
        let chunk = s.map().chunk(c).unwrap();
        assert!(chunk.read().unwrap().needs_rebuild(), "{c:?} not marked");
    }
    let far = ChunkCoord::new(-1, 4, -1);
    assert!(!s.map().chunk(far).unwrap().read().unwrap().needs_rebuild());

    let report = s.settle(&mut gpu, WAIT);
    assert_eq!(report.meshed, 4);
}

#[test]
fn editing_a_known_empty_cell_creates_a_chunk() {
    let store = Arc::new(MemoryStore::new());
    let mut s = streamer(&store);
    let mut gpu = CountingUploader::default();
    s.set_region(Region::new(center(), 1));
    s.settle(&mut gpu, WAIT);

    let above = ChunkCoord::new(0, 5, 0);
    assert!(s.map().is_resolved(above));
    assert!(!s.map().is_loaded(above));
    assert!(s.set_block(2, 85, 2, Block::STONE));
    assert!(s.map().is_loaded(above));
    assert_eq!(s.block_at(2, 85, 2), Block::STONE);
    assert_eq!(s.block_at(2, 86, 2), Block::AIR);

    s.shutdown(&mut gpu, WAIT).unwrap();
    assert!(store.contains(above));
}

#[test]
fn unloaded_cells_refuse_edits() {
    let store = Arc::new(MemoryStore::new());
    let mut s = streamer(&store);
    assert!(!s.set_block(1000, 70, 0, Block::STONE));
    assert_eq!(s.block_at(1000, 70, 0), Block::AIR);
    assert!(s.is_settled());
}
