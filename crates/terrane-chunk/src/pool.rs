use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_channel::{Receiver, Sender, bounded};
use terrane_blocks::Block;

use crate::voxels::Voxels;

/// Free list of voxel buffers. A buffer is owned by exactly one loaded chunk
/// and comes back here when that chunk unloads.
pub struct VoxelPool {
    free_tx: Sender<Box<Voxels>>,
    free_rx: Receiver<Box<Voxels>>,
    allocated: AtomicUsize,
}

impl VoxelPool {
    /// `retain` bounds how many idle buffers are kept; extra releases are dropped.
    pub fn new(retain: usize) -> Self {
        let (tx, rx) = bounded(retain.max(1));
        Self {
            free_tx: tx,
            free_rx: rx,
            allocated: AtomicUsize::new(0),
        }
    }

    /// Buffer contents are unspecified; generation or decode overwrites them.
    pub fn acquire(&self) -> Box<Voxels> {
        if let Ok(v) = self.free_rx.try_recv() {
            return v;
        }
        self.allocated.fetch_add(1, Ordering::Relaxed);
        Voxels::boxed(Block::AIR, 0)
    }

    pub fn release(&self, voxels: Box<Voxels>) {
        if self.free_tx.try_send(voxels).is_err() {
            self.allocated.fetch_sub(1, Ordering::Relaxed);
        }
    }

    pub fn idle(&self) -> usize {
        self.free_rx.len()
    }

    /// Buffers created and not yet dropped, idle ones included.
    pub fn allocated(&self) -> usize {
        self.allocated.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn released_buffers_are_reused() {
        let pool = VoxelPool::new(2);
        let a = pool.acquire();
        let b = pool.acquire();
        assert_eq!(pool.allocated(), 2);
        pool.release(a);
        pool.release(b);
        assert_eq!(pool.idle(), 2);
        let _c = pool.acquire();
        assert_eq!(pool.allocated(), 2);
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn overflow_is_dropped() {
        let pool = VoxelPool::new(1);
        let a = pool.acquire();
        let b = pool.acquire();
        pool.release(a);
        pool.release(b);
        assert_eq!(pool.idle(), 1);
        assert_eq!(pool.allocated(), 1);
    }
}
