//! Per-frame driver: keeps a region of chunks loaded and meshed.

use std::ops::AddAssign;
use std::sync::{Arc, PoisonError};
use std::time::Duration;

use hashbrown::{HashMap, HashSet};
use terrane_blocks::Block;
use terrane_chunk::edge_neighbors;
use terrane_io::StoreError;
use terrane_mesh_cpu::ring_resolvable;
use terrane_world::ChunkCoord;

use crate::chunk_map::{ChunkMap, Slot, split_world};
use crate::gpu::{ChunkBuffers, GpuUploader, ReleaseQueue, upload_mesh};
use crate::lifecycle::{LoadSource, Loaded, materialize_empty, unload_chunk};
use crate::{GenJob, GenOut, JobOut, MeshJob, MeshOut, Runtime};

/// Cube of lattice cells within `radius` of `center` on every axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub center: ChunkCoord,
    pub radius: i32,
}

impl Region {
    pub fn new(center: ChunkCoord, radius: i32) -> Self {
        Self {
            center,
            radius: radius.max(0),
        }
    }

    pub fn contains(&self, c: ChunkCoord) -> bool {
        (c.cx - self.center.cx).abs() <= self.radius
            && (c.cy - self.center.cy).abs() <= self.radius
            && (c.cz - self.center.cz).abs() <= self.radius
    }

    /// Cells nearest the centre first.
    pub fn coords(&self) -> Vec<ChunkCoord> {
        let r = self.radius;
        let mut out = Vec::with_capacity(((2 * r + 1) as usize).pow(3));
        for dx in -r..=r {
            for dy in -r..=r {
                for dz in -r..=r {
                    out.push(self.center.offset(dx, dy, dz));
                }
            }
        }
        out.sort_by_key(|c| c.distance_sq(self.center));
        out
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub restored: usize,
    pub generated: usize,
    pub known_empty: usize,
    pub meshed: usize,
    pub quads: usize,
    pub uploaded: usize,
    pub released: usize,
    pub unloaded: usize,
    pub save_failures: usize,
}

impl AddAssign for TickReport {
    fn add_assign(&mut self, rhs: Self) {
        self.restored += rhs.restored;
        self.generated += rhs.generated;
        self.known_empty += rhs.known_empty;
        self.meshed += rhs.meshed;
        self.quads += rhs.quads;
        self.uploaded += rhs.uploaded;
        self.released += rhs.released;
        self.unloaded += rhs.unloaded;
        self.save_failures += rhs.save_failures;
    }
}

/// Owns the spatial index and moves chunks through load, mesh and unload.
/// Runs on the render thread; heavy work goes to the runtime's lanes.
pub struct ChunkStreamer {
    runtime: Runtime,
    map: ChunkMap,
    region: Option<Region>,
    loading: HashSet<ChunkCoord>,
    meshing: HashMap<ChunkCoord, u64>,
    revs: HashMap<ChunkCoord, u64>,
    buffers: HashMap<ChunkCoord, ChunkBuffers>,
    release: ReleaseQueue,
}

impl ChunkStreamer {
    pub fn new(runtime: Runtime) -> Self {
        Self {
            runtime,
            map: ChunkMap::new(),
            region: None,
            loading: HashSet::new(),
            meshing: HashMap::new(),
            revs: HashMap::new(),
            buffers: HashMap::new(),
            release: ReleaseQueue::new(),
        }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn map(&self) -> &ChunkMap {
        &self.map
    }

    pub fn region(&self) -> Option<Region> {
        self.region
    }

    pub fn buffers(&self, coord: ChunkCoord) -> Option<ChunkBuffers> {
        self.buffers.get(&coord).copied()
    }

    pub fn block_at(&self, wx: i32, wy: i32, wz: i32) -> Block {
        self.map.block_at(wx, wy, wz)
    }

    /// No generation or mesh job outstanding.
    pub fn is_settled(&self) -> bool {
        self.loading.is_empty() && self.meshing.is_empty()
    }

    /// Loaded chunks still waiting on a neighbour before they can mesh.
    pub fn pending_meshes(&self) -> usize {
        self.map
            .coords()
            .filter(|c| !self.meshing.contains_key(c))
            .filter_map(|c| self.map.chunk(c))
            .filter(|c| {
                let g = c.read().unwrap_or_else(PoisonError::into_inner);
                !g.is_empty() && g.needs_rebuild()
            })
            .count()
    }

    /// Requests every cell of `region`; cells outside it unload on later ticks.
    pub fn set_region(&mut self, region: Region) -> usize {
        self.region = Some(region);
        let mut requested = 0;
        for c in region.coords() {
            if self.request_load(c) {
                requested += 1;
            }
        }
        log::debug!(target: "chunk", "region {:?}: {} loads requested", region, requested);
        requested
    }

    pub fn request_load(&mut self, coord: ChunkCoord) -> bool {
        if self.map.is_resolved(coord) || self.loading.contains(&coord) {
            return false;
        }
        if !self.runtime.submit_gen_job(GenJob { coord }) {
            return false;
        }
        self.loading.insert(coord);
        true
    }

    /// One frame: apply finished jobs, evict, schedule mesh builds and
    /// drain the buffer release queue.
    pub fn tick(&mut self, gpu: &mut dyn GpuUploader) -> TickReport {
        let mut report = TickReport::default();
        for out in self.runtime.drain_worker_results() {
            self.accept(out, gpu, &mut report);
        }
        self.evict_outside_region(&mut report);
        self.schedule_meshes();
        report.released += self.release.drain(gpu);
        report
    }

    /// Ticks until every outstanding job has finished.
    pub fn settle(&mut self, gpu: &mut dyn GpuUploader, wait: Duration) -> TickReport {
        let mut total = TickReport::default();
        loop {
            total += self.tick(gpu);
            if self.is_settled() {
                break;
            }
            match self.runtime.recv_timeout(wait) {
                Some(out) => self.accept(out, gpu, &mut total),
                None => log::debug!(
                    target: "chunk",
                    "waiting: {:?}",
                    self.runtime.queue_debug_counts()
                ),
            }
        }
        total
    }

    fn accept(&mut self, out: JobOut, gpu: &mut dyn GpuUploader, report: &mut TickReport) {
        match out {
            JobOut::Gen(out) => self.accept_gen(out, report),
            JobOut::Mesh(out) => self.accept_mesh(out, gpu, report),
        }
    }

    fn accept_gen(&mut self, out: GenOut, report: &mut TickReport) {
        let GenOut { coord, loaded, t_ms } = out;
        self.loading.remove(&coord);
        let wanted = self.region.is_none_or(|r| r.contains(coord));
        match loaded {
            Loaded::Chunk(chunk, source) => {
                if !wanted {
                    let ctx = self.runtime.gen_ctx();
                    if let Err(e) = unload_chunk(chunk, None, ctx, &self.release) {
                        log::warn!(target: "store", "{}", e);
                    }
                    return;
                }
                match source {
                    LoadSource::Restored => report.restored += 1,
                    LoadSource::Generated => report.generated += 1,
                }
                log::trace!(target: "chunk", "loaded {:?} ({:?}, {} ms)", coord, source, t_ms);
                self.map.insert_loaded(chunk);
            }
            Loaded::KnownEmpty => {
                if wanted {
                    report.known_empty += 1;
                    self.map.insert_known_empty(coord);
                }
            }
        }
    }

    fn accept_mesh(&mut self, out: MeshOut, gpu: &mut dyn GpuUploader, report: &mut TickReport) {
        let MeshOut {
            coord,
            rev,
            mesh,
            t_ms,
        } = out;
        self.meshing.remove(&coord);
        let Some(chunk) = self.map.chunk(coord) else {
            return;
        };
        let Some(mesh) = mesh else {
            log::trace!(target: "mesh", "build for {:?} aborted", coord);
            return;
        };
        let buffers = upload_mesh(gpu, &mesh);
        report.meshed += 1;
        report.quads += mesh.quad_count();
        report.uploaded += buffers.ids().count();
        if let Some(old) = self.buffers.insert(coord, buffers) {
            self.release.push(&old);
        }
        let mut g = chunk.write().unwrap_or_else(PoisonError::into_inner);
        g.mark_render_built();
        if self.rev(coord) != rev {
            // edited while the build ran
            g.request_rebuild();
        }
        log::trace!(
            target: "mesh",
            "meshed {:?}: {} quads in {} ms",
            coord,
            mesh.quad_count(),
            t_ms
        );
    }

    fn rev(&self, coord: ChunkCoord) -> u64 {
        self.revs.get(&coord).copied().unwrap_or(0)
    }

    fn bump(&mut self, coord: ChunkCoord) {
        *self.revs.entry(coord).or_insert(0) += 1;
    }

    fn schedule_meshes(&mut self) {
        let mut ready = Vec::new();
        for coord in self.map.coords() {
            if self.meshing.contains_key(&coord) {
                continue;
            }
            let Some(chunk) = self.map.chunk(coord) else {
                continue;
            };
            {
                let g = chunk.read().unwrap_or_else(PoisonError::into_inner);
                if g.is_empty() || !g.needs_rebuild() {
                    continue;
                }
            }
            if !ring_resolvable(coord, |c| self.map.is_resolved(c)) {
                log::trace!(target: "mesh", "deferred {:?}: neighbour not loaded", coord);
                continue;
            }
            ready.push(coord);
        }
        for coord in ready {
            let rev = self.rev(coord);
            let job = MeshJob {
                coord,
                rev,
                ring: self.map.ring_slots(coord),
            };
            if self.runtime.submit_mesh_job(job) {
                self.meshing.insert(coord, rev);
            }
        }
    }

    fn evict_outside_region(&mut self, report: &mut TickReport) {
        let Some(region) = self.region else {
            return;
        };
        let outside: Vec<ChunkCoord> = self
            .map
            .coords()
            .filter(|c| !region.contains(*c))
            .collect();
        for coord in outside {
            match self.unload(coord) {
                Ok(true) => report.unloaded += 1,
                Ok(false) => {}
                Err(e) => {
                    log::warn!(target: "store", "{}", e);
                    report.unloaded += 1;
                    report.save_failures += 1;
                }
            }
        }
    }

    /// Removes `coord` from the index. Returns `Ok(false)` when a job still
    /// holds the chunk; the caller tries again later. A failed save still
    /// unloads the chunk.
    pub fn unload(&mut self, coord: ChunkCoord) -> Result<bool, StoreError> {
        if self.loading.contains(&coord) || self.meshing.contains_key(&coord) {
            return Ok(false);
        }
        let shared = match self.map.remove(coord) {
            None => return Ok(false),
            Some(Slot::KnownEmpty) => return Ok(true),
            Some(Slot::Loaded(shared)) => shared,
        };
        let lock = match Arc::try_unwrap(shared) {
            Ok(lock) => lock,
            Err(shared) => {
                // a neighbour's mesh job still reads it
                self.map.insert(coord, Slot::Loaded(shared));
                return Ok(false);
            }
        };
        let chunk = lock.into_inner().unwrap_or_else(PoisonError::into_inner);
        self.revs.remove(&coord);
        let buffers = self.buffers.remove(&coord);
        unload_chunk(chunk, buffers, self.runtime.gen_ctx(), &self.release)?;
        Ok(true)
    }

    /// Sets a block at a world position. Known-empty cells become real
    /// chunks; unloaded cells are refused. Border edits also mark every
    /// face, edge and corner neighbour that samples the voxel for rebuild.
    pub fn set_block(&mut self, wx: i32, wy: i32, wz: i32, block: Block) -> bool {
        let (coord, (x, y, z)) = split_world(wx, wy, wz);
        let chunk = match self.map.get(coord).cloned() {
            None => return false,
            Some(Slot::Loaded(c)) => c,
            Some(Slot::KnownEmpty) => {
                let fresh = materialize_empty(coord, self.runtime.gen_ctx());
                self.map.insert_loaded(fresh)
            }
        };
        chunk
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_block(x, y, z, block);
        self.bump(coord);
        for (dx, dy, dz) in edge_neighbors(x, y, z) {
            let n = coord.offset(dx, dy, dz);
            if let Some(nc) = self.map.chunk(n) {
                nc.write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .request_rebuild();
                self.bump(n);
            }
        }
        true
    }

    /// Waits for outstanding jobs, then unloads every chunk, flushing
    /// modified ones and dropping cached height columns. Returns how many
    /// cells were unloaded.
    pub fn shutdown(
        &mut self,
        gpu: &mut dyn GpuUploader,
        wait: Duration,
    ) -> Result<usize, StoreError> {
        self.region = None;
        self.settle(gpu, wait);
        let coords: Vec<ChunkCoord> = self.map.coords().collect();
        let mut unloaded = 0;
        let mut first_err = None;
        for coord in coords {
            match self.unload(coord) {
                Ok(true) => unloaded += 1,
                Ok(false) => {}
                Err(e) => {
                    log::warn!(target: "store", "{}", e);
                    unloaded += 1;
                    first_err.get_or_insert(e);
                }
            }
        }
        self.release.drain(gpu);
        self.runtime.gen_ctx().heights.clear();
        match first_err {
            Some(e) => Err(e),
            None => Ok(unloaded),
        }
    }
}
