use crossbeam_channel::{Receiver, Sender, unbounded};
use terrane_mesh_cpu::{ChunkMeshCPU, MeshBuild, VertexFormat};

/// Handle of a vertex buffer owned by the graphics context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BufferId(pub u64);

/// Vertex buffer submission. Implementations live on the render thread.
pub trait GpuUploader {
    /// `data` holds `vertex_count` interleaved vertices laid out by `format`.
    fn upload(&mut self, format: VertexFormat, data: &[f32], vertex_count: usize) -> BufferId;
    fn release(&mut self, id: BufferId);
}

/// GPU buffers of one chunk: three passes plus the optional depth buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChunkBuffers {
    pub passes: [Option<BufferId>; 3],
    pub depth: Option<BufferId>,
}

impl ChunkBuffers {
    pub fn ids(&self) -> impl Iterator<Item = BufferId> + '_ {
        self.passes.iter().chain(std::iter::once(&self.depth)).flatten().copied()
    }
}

fn upload_build(gpu: &mut dyn GpuUploader, build: &MeshBuild) -> Option<BufferId> {
    if build.is_empty() {
        return None;
    }
    Some(gpu.upload(build.format(), build.data(), build.vertex_count()))
}

/// One upload per non-empty buffer.
pub fn upload_mesh(gpu: &mut dyn GpuUploader, mesh: &ChunkMeshCPU) -> ChunkBuffers {
    let mut out = ChunkBuffers::default();
    for (slot, build) in out.passes.iter_mut().zip(mesh.passes.iter()) {
        *slot = upload_build(gpu, build);
    }
    out.depth = mesh.depth.as_ref().and_then(|d| upload_build(gpu, d));
    out
}

/// Buffers waiting for deletion. Any thread may push; only the render thread drains.
#[derive(Clone)]
pub struct ReleaseQueue {
    tx: Sender<BufferId>,
    rx: Receiver<BufferId>,
}

impl Default for ReleaseQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ReleaseQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn push(&self, buffers: &ChunkBuffers) {
        for id in buffers.ids() {
            // both ends live in self, so the channel cannot be disconnected
            let _ = self.tx.send(id);
        }
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    pub fn drain(&self, gpu: &mut dyn GpuUploader) -> usize {
        let mut n = 0;
        for id in self.rx.try_iter() {
            gpu.release(id);
            n += 1;
        }
        n
    }
}

/// Uploader without a graphics context: hands out ids and tallies what it saw.
#[derive(Debug, Default)]
pub struct CountingUploader {
    next: u64,
    pub live: usize,
    pub uploads: usize,
    pub releases: usize,
    pub vertices: usize,
    pub floats: usize,
}

impl GpuUploader for CountingUploader {
    fn upload(&mut self, format: VertexFormat, data: &[f32], vertex_count: usize) -> BufferId {
        debug_assert_eq!(data.len(), vertex_count * format.stride());
        self.next += 1;
        self.live += 1;
        self.uploads += 1;
        self.vertices += vertex_count;
        self.floats += data.len();
        BufferId(self.next)
    }

    fn release(&mut self, _id: BufferId) {
        self.live = self.live.saturating_sub(1);
        self.releases += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_queue_drains_every_buffer_once() {
        let mut gpu = CountingUploader::default();
        let a = gpu.upload(VertexFormat::DEPTH, &[0.0; 12], 4);
        let b = gpu.upload(VertexFormat::DEPTH, &[0.0; 12], 4);
        let q = ReleaseQueue::new();
        q.push(&ChunkBuffers {
            passes: [Some(a), None, None],
            depth: Some(b),
        });
        assert_eq!(q.pending(), 2);
        assert_eq!(q.drain(&mut gpu), 2);
        assert_eq!(q.drain(&mut gpu), 0);
        assert_eq!(gpu.live, 0);
        assert_eq!(gpu.releases, 2);
    }
}
