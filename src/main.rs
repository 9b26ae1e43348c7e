//! Generates a cube of chunks around a centre, meshes what can be meshed
//! and reports the result. Modified chunks are flushed on exit.

mod config;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use terrane_io::{ChunkStore, DirStore, NullStore};
use terrane_runtime::{
    ChunkStreamer, CountingUploader, GenCtx, MeshEnv, Region, Runtime, RuntimeConfig,
};
use terrane_world::{ChunkCoord, WorldGenParams};

use crate::config::EngineConfig;

const HEIGHT_CACHE_COLUMNS: usize = 1024;
const VOXEL_POOL_RETAIN: usize = 256;
const WAIT: Duration = Duration::from_millis(10);

#[derive(Parser, Debug)]
#[command(name = "terrane", version, about = "Generate and mesh a region of chunks")]
struct Args {
    /// TOML file with [worldgen], [render], [brightness] and [assets] tables
    #[arg(long)]
    config: Option<PathBuf>,
    /// Chunks loaded on each side of the centre
    #[arg(long, default_value_t = 2)]
    radius: i32,
    /// Centre chunk as cx,cy,cz
    #[arg(long, value_parser = parse_coord, default_value = "0,1,0")]
    center: ChunkCoord,
    /// Directory for chunk files; without it nothing is persisted
    #[arg(long)]
    save_dir: Option<PathBuf>,
    /// Constant terrain height instead of noise
    #[arg(long)]
    flat: Option<i32>,
    #[arg(long)]
    seed: Option<i32>,
    /// One quad per visible face
    #[arg(long)]
    no_merge: bool,
    /// Flat per-face lighting
    #[arg(long)]
    no_smooth: bool,
    /// Also build the depth-only mesh
    #[arg(long)]
    depth: bool,
    /// Threads per worker lane
    #[arg(long)]
    workers: Option<usize>,
}

impl Args {
    fn apply(&self, cfg: &mut EngineConfig) {
        if let Some(h) = self.flat {
            cfg.set_flat(h);
        }
        if let Some(seed) = self.seed {
            cfg.worldgen.seed = seed;
        }
        if self.no_merge {
            cfg.render.merge_faces = false;
        }
        if self.no_smooth {
            cfg.render.smooth_lighting = false;
        }
        if self.depth {
            cfg.render.depth_model = true;
        }
    }
}

fn parse_coord(s: &str) -> Result<ChunkCoord, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected cx,cy,cz, got '{s}'"));
    };
    let n = |v: &str| v.parse::<i32>().map_err(|e| format!("'{v}': {e}"));
    Ok(ChunkCoord::new(n(*x)?, n(*y)?, n(*z)?))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    args.apply(&mut cfg);

    let reg = cfg.registry()?;
    let atlas = cfg.textures(&reg)?;
    let params = WorldGenParams::from_config(&cfg.worldgen, cfg.brightness);
    let field = cfg.worldgen.height.build(cfg.worldgen.seed);
    let store: Arc<dyn ChunkStore> = match &args.save_dir {
        Some(dir) => {
            let store = DirStore::open(dir)?;
            log::info!("chunk files in {}", store.root().display());
            Arc::new(store)
        }
        None => Arc::new(NullStore),
    };

    let runtime_cfg = match args.workers {
        Some(n) => RuntimeConfig {
            gen_workers: n,
            mesh_workers: n,
        },
        None => RuntimeConfig::default(),
    };
    let gen_ctx = GenCtx::new(params, field, store, HEIGHT_CACHE_COLUMNS, VOXEL_POOL_RETAIN);
    let mesh_env = MeshEnv::new(reg, Arc::new(atlas), cfg.render, cfg.brightness);
    let mut streamer = ChunkStreamer::new(Runtime::new(runtime_cfg, gen_ctx, mesh_env));
    let mut gpu = CountingUploader::default();

    let region = Region::new(args.center, args.radius);
    let t0 = Instant::now();
    let requested = streamer.set_region(region);
    let report = streamer.settle(&mut gpu, WAIT);
    let elapsed = t0.elapsed();

    let heights = streamer.runtime().gen_ctx().heights.stats();
    let pool = &streamer.runtime().gen_ctx().pool;
    println!("region        {:?} radius {}", region.center, region.radius);
    println!("requested     {requested}");
    println!(
        "loaded        {} ({} restored, {} generated), {} known empty",
        report.restored + report.generated,
        report.restored,
        report.generated,
        report.known_empty
    );
    println!(
        "meshed        {} chunks, {} quads, {} vertices",
        report.meshed, report.quads, gpu.vertices
    );
    println!("deferred      {} chunks at the region edge", streamer.pending_meshes());
    println!("buffers       {} uploaded", report.uploaded);
    println!(
        "height cache  {} hits, {} misses, {} columns held",
        heights.hits, heights.misses, heights.entries
    );
    println!("voxel pool    {} allocated", pool.allocated());
    println!("elapsed       {:.1} ms", elapsed.as_secs_f64() * 1000.0);

    let unloaded = streamer.shutdown(&mut gpu, WAIT)?;
    log::info!(
        "unloaded {} cells, {} buffers released",
        unloaded,
        gpu.releases
    );
    Ok(())
}
