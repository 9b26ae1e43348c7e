use terrane_chunk::Voxels;
use terrane_world::ChunkCoord;

/// What the spatial index knows about one lattice cell.
#[derive(Clone, Copy, Debug)]
pub enum Neighbor<'a> {
    Unloaded,
    KnownEmpty,
    Loaded(&'a Voxels),
}

impl Neighbor<'_> {
    #[inline]
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Neighbor::Unloaded)
    }
}

#[inline]
pub(crate) fn ring_slot(dx: i32, dy: i32, dz: i32) -> usize {
    ((dx + 1) * 9 + (dy + 1) * 3 + (dz + 1)) as usize
}

/// The 3x3x3 cells around a chunk, in the order of [`ChunkCoord::ring`].
pub struct NeighborRing<'a> {
    coord: ChunkCoord,
    slots: [Neighbor<'a>; 27],
}

impl<'a> NeighborRing<'a> {
    pub fn from_fn(coord: ChunkCoord, mut f: impl FnMut(ChunkCoord) -> Neighbor<'a>) -> Self {
        let mut slots = [Neighbor::Unloaded; 27];
        for (slot, c) in slots.iter_mut().zip(coord.ring()) {
            *slot = f(c);
        }
        Self { coord, slots }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    #[inline]
    pub fn get(&self, dx: i32, dy: i32, dz: i32) -> Neighbor<'a> {
        self.slots[ring_slot(dx, dy, dz)]
    }

    pub fn center(&self) -> Neighbor<'a> {
        self.get(0, 0, 0)
    }

    pub fn is_resolvable(&self) -> bool {
        self.slots.iter().all(Neighbor::is_resolved)
    }
}

/// True when every one of the 26 neighbours of `coord` is loaded or known empty.
/// Checked once before committing to a mesh build.
pub fn ring_resolvable(coord: ChunkCoord, mut resolved: impl FnMut(ChunkCoord) -> bool) -> bool {
    coord.ring().filter(|c| *c != coord).all(|c| resolved(c))
}
