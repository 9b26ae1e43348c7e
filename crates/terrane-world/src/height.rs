use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::coord::{CHUNK_SIZE, ChunkCoord};

/// Terrain surface height per world column. Implementations must be pure.
pub trait HeightField: Send + Sync {
    fn height(&self, wx: i32, wz: i32) -> i32;
}

impl<T: HeightField + ?Sized> HeightField for std::sync::Arc<T> {
    fn height(&self, wx: i32, wz: i32) -> i32 {
        (**self).height(wx, wz)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FlatHeightField(pub i32);

impl HeightField for FlatHeightField {
    #[inline]
    fn height(&self, _wx: i32, _wz: i32) -> i32 {
        self.0
    }
}

/// OpenSimplex2 surface: `base + noise * amplitude`.
pub struct NoiseHeightField {
    noise: FastNoiseLite,
    base: i32,
    amplitude: f32,
}

impl NoiseHeightField {
    pub fn new(seed: i32, base: i32, amplitude: f32, frequency: f32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(frequency));
        Self {
            noise,
            base,
            amplitude,
        }
    }
}

impl HeightField for NoiseHeightField {
    fn height(&self, wx: i32, wz: i32) -> i32 {
        let n = self.noise.get_noise_2d(wx as f32, wz as f32);
        self.base + (n * self.amplitude).floor() as i32
    }
}

const COLS: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;

/// Height samples for the 16x16 columns of one chunk column, indexed `x*16 + z`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeightSamples {
    h: [i32; COLS],
    min: i32,
    max: i32,
}

impl HeightSamples {
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> i32) -> Self {
        let mut h = [0i32; COLS];
        let mut min = i32::MAX;
        let mut max = i32::MIN;
        for x in 0..16 {
            for z in 0..16 {
                let v = f(x, z);
                h[x * 16 + z] = v;
                min = min.min(v);
                max = max.max(v);
            }
        }
        Self { h, min, max }
    }

    pub fn uniform(height: i32) -> Self {
        Self::from_fn(|_, _| height)
    }

    /// Samples the column under `(cx, cz)`; `cy` is ignored.
    pub fn sample(field: &dyn HeightField, coord: ChunkCoord) -> Self {
        let (bx, _, bz) = coord.base();
        Self::from_fn(|x, z| field.height(bx + x as i32, bz + z as i32))
    }

    #[inline]
    pub fn get(&self, x: usize, z: usize) -> i32 {
        self.h[x * 16 + z]
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Lattice layers `(low, high)`: everything below `low` is solid rock and
    /// everything above `high` is empty. Floor division throughout.
    pub fn lattice_bounds(&self, water_level: i32, low_margin: i32, high_margin: i32) -> (i32, i32) {
        let low = (self.min - low_margin).div_euclid(CHUNK_SIZE);
        let high = (self.max.max(water_level) + high_margin).div_euclid(CHUNK_SIZE);
        (low, high)
    }
}
