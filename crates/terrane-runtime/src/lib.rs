//! Chunk streaming runtime: spatial index, lifecycle and worker lanes.
#![forbid(unsafe_code)]

pub mod chunk_map;
pub mod gpu;
pub mod height_cache;
pub mod lifecycle;
pub mod stream;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLockReadGuard};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, unbounded};
use rayon::{ThreadPool, ThreadPoolBuilder};
use terrane_blocks::{BlockRegistry, BrightnessRange, TextureAtlas};
use terrane_chunk::Chunk;
use terrane_mesh_cpu::{
    ChunkMeshCPU, MeshContext, Neighbor, NeighborRing, RenderConfig, build_chunk_mesh,
};
use terrane_world::ChunkCoord;

pub use chunk_map::{ChunkMap, SharedChunk, Slot, split_world};
pub use gpu::{BufferId, ChunkBuffers, CountingUploader, GpuUploader, ReleaseQueue, upload_mesh};
pub use height_cache::{HeightCache, HeightCacheStats};
pub use lifecycle::{GenCtx, LoadSource, Loaded, load_chunk, materialize_empty, unload_chunk};
pub use stream::{ChunkStreamer, Region, TickReport};

/// Read-only state shared by mesh workers.
pub struct MeshEnv {
    pub reg: BlockRegistry,
    pub atlas: Arc<dyn TextureAtlas>,
    pub render: RenderConfig,
    pub brightness: BrightnessRange,
}

impl MeshEnv {
    pub fn new(
        reg: BlockRegistry,
        atlas: Arc<dyn TextureAtlas>,
        render: RenderConfig,
        brightness: BrightnessRange,
    ) -> Self {
        Self {
            reg,
            atlas,
            render,
            brightness,
        }
    }

    pub fn context(&self) -> MeshContext<'_> {
        MeshContext {
            reg: &self.reg,
            atlas: self.atlas.as_ref(),
            render: self.render,
            brightness: self.brightness,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RuntimeConfig {
    pub gen_workers: usize,
    pub mesh_workers: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let n = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self {
            gen_workers: (n / 2).max(1),
            mesh_workers: (n / 2).max(1),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct GenJob {
    pub coord: ChunkCoord,
}

/// Ring snapshot for one mesh build, in ring order. `None` is unloaded.
#[derive(Clone, Debug)]
pub struct MeshJob {
    pub coord: ChunkCoord,
    pub rev: u64,
    pub ring: Vec<Option<Slot>>,
}

pub struct GenOut {
    pub coord: ChunkCoord,
    pub loaded: Loaded,
    pub t_ms: u32,
}

pub struct MeshOut {
    pub coord: ChunkCoord,
    pub rev: u64,
    pub mesh: Option<ChunkMeshCPU>,
    pub t_ms: u32,
}

pub enum JobOut {
    Gen(GenOut),
    Mesh(MeshOut),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueueCounts {
    pub gen_queued: usize,
    pub gen_inflight: usize,
    pub mesh_queued: usize,
    pub mesh_inflight: usize,
}

fn elapsed_ms(t0: Instant) -> u32 {
    t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

fn process_gen_job(job: GenJob, ctx: &GenCtx, tx: &Sender<JobOut>) {
    let t0 = Instant::now();
    let loaded = load_chunk(job.coord, ctx);
    let _ = tx.send(JobOut::Gen(GenOut {
        coord: job.coord,
        loaded,
        t_ms: elapsed_ms(t0),
    }));
}

#[inline]
fn ring_index(center: ChunkCoord, c: ChunkCoord) -> usize {
    ((c.cx - center.cx + 1) * 9 + (c.cy - center.cy + 1) * 3 + (c.cz - center.cz + 1)) as usize
}

fn process_mesh_job(job: MeshJob, env: &MeshEnv, tx: &Sender<JobOut>) {
    let t0 = Instant::now();
    let MeshJob { coord, rev, ring } = job;
    // Read snapshot of every loaded chunk in the ring for the whole build.
    let guards: Vec<Option<RwLockReadGuard<'_, Chunk>>> = ring
        .iter()
        .map(|slot| match slot {
            Some(Slot::Loaded(c)) => Some(c.read().unwrap_or_else(PoisonError::into_inner)),
            _ => None,
        })
        .collect();
    let neighbors = NeighborRing::from_fn(coord, |c| {
        let i = ring_index(coord, c);
        match (&ring[i], &guards[i]) {
            (Some(Slot::Loaded(_)), Some(g)) => Neighbor::Loaded(g.voxels()),
            (Some(Slot::KnownEmpty), _) => Neighbor::KnownEmpty,
            _ => Neighbor::Unloaded,
        }
    });
    let mesh = build_chunk_mesh(&neighbors, &env.context());
    // no chunk handle may outlive the result
    drop(neighbors);
    drop(guards);
    drop(ring);
    let _ = tx.send(JobOut::Mesh(MeshOut {
        coord,
        rev,
        mesh,
        t_ms: elapsed_ms(t0),
    }));
}

/// Generation and mesh lanes, each a rayon pool of long-lived workers
/// pulling from a crossbeam queue. Results come back on one channel.
pub struct Runtime {
    gen_ctx: Arc<GenCtx>,
    mesh_env: Arc<MeshEnv>,
    gen_tx: Sender<GenJob>,
    mesh_tx: Sender<MeshJob>,
    res_rx: Receiver<JobOut>,
    _gen_pool: Arc<ThreadPool>,
    _mesh_pool: Arc<ThreadPool>,
    q_gen: Arc<AtomicUsize>,
    inflight_gen: Arc<AtomicUsize>,
    q_mesh: Arc<AtomicUsize>,
    inflight_mesh: Arc<AtomicUsize>,
}

impl Runtime {
    pub fn new(cfg: RuntimeConfig, gen_ctx: GenCtx, mesh_env: MeshEnv) -> Self {
        let gen_ctx = Arc::new(gen_ctx);
        let mesh_env = Arc::new(mesh_env);
        let (gen_tx, gen_rx) = unbounded::<GenJob>();
        let (mesh_tx, mesh_rx) = unbounded::<MeshJob>();
        let (res_tx, res_rx) = unbounded::<JobOut>();

        let q_gen = Arc::new(AtomicUsize::new(0));
        let inflight_gen = Arc::new(AtomicUsize::new(0));
        let q_mesh = Arc::new(AtomicUsize::new(0));
        let inflight_mesh = Arc::new(AtomicUsize::new(0));

        let w_gen = cfg.gen_workers.max(1);
        let gen_pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(w_gen)
                .thread_name(|i| format!("terrane-gen-{i}"))
                .build()
                .expect("gen pool"),
        );
        for _ in 0..w_gen {
            let rx = gen_rx.clone();
            let tx = res_tx.clone();
            let ctx = Arc::clone(&gen_ctx);
            let q = Arc::clone(&q_gen);
            let inflight = Arc::clone(&inflight_gen);
            gen_pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    q.fetch_sub(1, Ordering::Relaxed);
                    inflight.fetch_add(1, Ordering::Relaxed);
                    process_gen_job(job, ctx.as_ref(), &tx);
                    inflight.fetch_sub(1, Ordering::Relaxed);
                }
            });
        }

        let w_mesh = cfg.mesh_workers.max(1);
        let mesh_pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(w_mesh)
                .thread_name(|i| format!("terrane-mesh-{i}"))
                .build()
                .expect("mesh pool"),
        );
        for _ in 0..w_mesh {
            let rx = mesh_rx.clone();
            let tx = res_tx.clone();
            let env = Arc::clone(&mesh_env);
            let q = Arc::clone(&q_mesh);
            let inflight = Arc::clone(&inflight_mesh);
            mesh_pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    q.fetch_sub(1, Ordering::Relaxed);
                    inflight.fetch_add(1, Ordering::Relaxed);
                    process_mesh_job(job, env.as_ref(), &tx);
                    inflight.fetch_sub(1, Ordering::Relaxed);
                }
            });
        }
        log::info!("runtime started: {} gen workers, {} mesh workers", w_gen, w_mesh);

        Self {
            gen_ctx,
            mesh_env,
            gen_tx,
            mesh_tx,
            res_rx,
            _gen_pool: gen_pool,
            _mesh_pool: mesh_pool,
            q_gen,
            inflight_gen,
            q_mesh,
            inflight_mesh,
        }
    }

    pub fn gen_ctx(&self) -> &GenCtx {
        &self.gen_ctx
    }

    pub fn mesh_env(&self) -> &MeshEnv {
        &self.mesh_env
    }

    pub fn submit_gen_job(&self, job: GenJob) -> bool {
        self.q_gen.fetch_add(1, Ordering::Relaxed);
        if self.gen_tx.send(job).is_err() {
            self.q_gen.fetch_sub(1, Ordering::Relaxed);
            return false;
        }
        true
    }

    pub fn submit_mesh_job(&self, job: MeshJob) -> bool {
        self.q_mesh.fetch_add(1, Ordering::Relaxed);
        if self.mesh_tx.send(job).is_err() {
            self.q_mesh.fetch_sub(1, Ordering::Relaxed);
            return false;
        }
        true
    }

    pub fn drain_worker_results(&self) -> Vec<JobOut> {
        self.res_rx.try_iter().collect()
    }

    /// Blocks up to `timeout` for the next result.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<JobOut> {
        self.res_rx.recv_timeout(timeout).ok()
    }

    pub fn queue_debug_counts(&self) -> QueueCounts {
        QueueCounts {
            gen_queued: self.q_gen.load(Ordering::Relaxed),
            gen_inflight: self.inflight_gen.load(Ordering::Relaxed),
            mesh_queued: self.q_mesh.load(Ordering::Relaxed),
            mesh_inflight: self.inflight_mesh.load(Ordering::Relaxed),
        }
    }
}
