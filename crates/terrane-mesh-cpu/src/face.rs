use terrane_blocks::FaceRole;

/// The six face directions. The discriminant is written into vertices.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    PosX = 0,
    NegX = 1,
    PosY = 2,
    NegY = 3,
    PosZ = 4,
    NegZ = 5,
}

/// One quad corner: two tangent unit steps and its `v` texture coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Corner {
    pub t1: (i32, i32, i32),
    pub t2: (i32, i32, i32),
    pub v: f32,
}

const fn corner(t1: (i32, i32, i32), t2: (i32, i32, i32), v: f32) -> Corner {
    Corner { t1, t2, v }
}

// Corners 0 and 1 sit at the run start, 2 and 3 at the run end.
const POS_X_CORNERS: [Corner; 4] = [
    corner((0, -1, 0), (0, 0, -1), 0.0),
    corner((0, 1, 0), (0, 0, -1), 1.0),
    corner((0, 1, 0), (0, 0, 1), 1.0),
    corner((0, -1, 0), (0, 0, 1), 0.0),
];
const NEG_X_CORNERS: [Corner; 4] = [
    corner((0, 1, 0), (0, 0, -1), 1.0),
    corner((0, -1, 0), (0, 0, -1), 0.0),
    corner((0, -1, 0), (0, 0, 1), 0.0),
    corner((0, 1, 0), (0, 0, 1), 1.0),
];
const POS_Y_CORNERS: [Corner; 4] = [
    corner((1, 0, 0), (0, 0, -1), 0.0),
    corner((-1, 0, 0), (0, 0, -1), 1.0),
    corner((-1, 0, 0), (0, 0, 1), 1.0),
    corner((1, 0, 0), (0, 0, 1), 0.0),
];
const NEG_Y_CORNERS: [Corner; 4] = [
    corner((-1, 0, 0), (0, 0, -1), 0.0),
    corner((1, 0, 0), (0, 0, -1), 1.0),
    corner((1, 0, 0), (0, 0, 1), 1.0),
    corner((-1, 0, 0), (0, 0, 1), 0.0),
];
const POS_Z_CORNERS: [Corner; 4] = [
    corner((-1, 0, 0), (0, 1, 0), 1.0),
    corner((-1, 0, 0), (0, -1, 0), 0.0),
    corner((1, 0, 0), (0, -1, 0), 0.0),
    corner((1, 0, 0), (0, 1, 0), 1.0),
];
const NEG_Z_CORNERS: [Corner; 4] = [
    corner((-1, 0, 0), (0, -1, 0), 0.0),
    corner((-1, 0, 0), (0, 1, 0), 1.0),
    corner((1, 0, 0), (0, 1, 0), 1.0),
    corner((1, 0, 0), (0, -1, 0), 0.0),
];

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosX,
        Face::NegX,
        Face::PosY,
        Face::NegY,
        Face::PosZ,
        Face::NegZ,
    ];

    /// Returns the `[0..6)` index of this face.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the integer grid delta `(dx,dy,dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    /// Voxel for sweep indices `(i, j, k)`; `k` walks the merge axis.
    #[inline]
    pub fn cell(self, i: i32, j: i32, k: i32) -> (i32, i32, i32) {
        match self {
            Face::PosX | Face::NegX => (i, j, k),
            Face::PosY | Face::NegY => (j, i, k),
            Face::PosZ | Face::NegZ => (k, j, i),
        }
    }

    /// Unit step along the merge axis.
    #[inline]
    pub fn run_axis(self) -> (i32, i32, i32) {
        match self {
            Face::PosZ | Face::NegZ => (1, 0, 0),
            _ => (0, 0, 1),
        }
    }

    #[inline]
    pub fn corners(self) -> &'static [Corner; 4] {
        match self {
            Face::PosX => &POS_X_CORNERS,
            Face::NegX => &NEG_X_CORNERS,
            Face::PosY => &POS_Y_CORNERS,
            Face::NegY => &NEG_Y_CORNERS,
            Face::PosZ => &POS_Z_CORNERS,
            Face::NegZ => &NEG_Z_CORNERS,
        }
    }

    /// Directional light multiplier.
    #[inline]
    pub fn ambient(self) -> f32 {
        match self {
            Face::PosX | Face::NegX => 0.7,
            Face::PosY | Face::NegY => 1.0,
            Face::PosZ | Face::NegZ => 0.5,
        }
    }

    /// Directional light multiplier of the per-block renderer. Bottoms are
    /// darker and +Z is fully lit.
    #[inline]
    pub fn block_ambient(self) -> f32 {
        match self {
            Face::PosX | Face::NegX => 0.7,
            Face::PosY | Face::PosZ => 1.0,
            Face::NegY => 0.2,
            Face::NegZ => 0.5,
        }
    }

    /// Classifies the face into top/bottom/side role for texture lookup.
    #[inline]
    pub fn role(self) -> FaceRole {
        match self {
            Face::PosY => FaceRole::Top,
            Face::NegY => FaceRole::Bottom,
            _ => FaceRole::Side,
        }
    }

    #[inline]
    pub fn is_side(self) -> bool {
        self.role() == FaceRole::Side
    }
}

#[inline]
pub(crate) fn add3(a: (i32, i32, i32), b: (i32, i32, i32)) -> (i32, i32, i32) {
    (a.0 + b.0, a.1 + b.1, a.2 + b.2)
}
