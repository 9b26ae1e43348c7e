use std::sync::{Arc, PoisonError, RwLock};

use hashbrown::HashMap;
use terrane_blocks::Block;
use terrane_chunk::Chunk;
use terrane_world::{CHUNK_SIZE, ChunkCoord};

pub type SharedChunk = Arc<RwLock<Chunk>>;

/// A resolved lattice cell. Cells absent from the map are unloaded.
#[derive(Clone, Debug)]
pub enum Slot {
    KnownEmpty,
    Loaded(SharedChunk),
}

/// Spatial index from lattice coordinate to chunk.
#[derive(Default)]
pub struct ChunkMap {
    slots: HashMap<ChunkCoord, Slot>,
}

impl ChunkMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn loaded_count(&self) -> usize {
        self.slots
            .values()
            .filter(|s| matches!(s, Slot::Loaded(_)))
            .count()
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<&Slot> {
        self.slots.get(&coord)
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<SharedChunk> {
        match self.slots.get(&coord) {
            Some(Slot::Loaded(c)) => Some(Arc::clone(c)),
            _ => None,
        }
    }

    /// Loaded or known empty.
    pub fn is_resolved(&self, coord: ChunkCoord) -> bool {
        self.slots.contains_key(&coord)
    }

    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        matches!(self.slots.get(&coord), Some(Slot::Loaded(_)))
    }

    pub fn insert_loaded(&mut self, chunk: Chunk) -> SharedChunk {
        let coord = chunk.coord();
        let shared = Arc::new(RwLock::new(chunk));
        self.slots.insert(coord, Slot::Loaded(Arc::clone(&shared)));
        shared
    }

    pub fn insert_known_empty(&mut self, coord: ChunkCoord) {
        self.slots.insert(coord, Slot::KnownEmpty);
    }

    pub fn insert(&mut self, coord: ChunkCoord, slot: Slot) {
        self.slots.insert(coord, slot);
    }

    pub fn remove(&mut self, coord: ChunkCoord) -> Option<Slot> {
        self.slots.remove(&coord)
    }

    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.slots.keys().copied()
    }

    /// Slots of the 3x3x3 ring around `coord`, in ring order; `None` is unloaded.
    pub fn ring_slots(&self, coord: ChunkCoord) -> Vec<Option<Slot>> {
        coord.ring().map(|c| self.slots.get(&c).cloned()).collect()
    }

    /// Block at a world position; AIR for known-empty or unloaded cells.
    pub fn block_at(&self, wx: i32, wy: i32, wz: i32) -> Block {
        let (coord, (x, y, z)) = split_world(wx, wy, wz);
        let Some(Slot::Loaded(chunk)) = self.slots.get(&coord) else {
            return Block::AIR;
        };
        let guard = chunk.read().unwrap_or_else(PoisonError::into_inner);
        guard.block(x, y, z)
    }
}

/// Splits a world position into its chunk and the local voxel inside it.
pub fn split_world(wx: i32, wy: i32, wz: i32) -> (ChunkCoord, (usize, usize, usize)) {
    let coord = ChunkCoord::containing(wx, wy, wz);
    (
        coord,
        (
            wx.rem_euclid(CHUNK_SIZE) as usize,
            wy.rem_euclid(CHUNK_SIZE) as usize,
            wz.rem_euclid(CHUNK_SIZE) as usize,
        ),
    )
}
