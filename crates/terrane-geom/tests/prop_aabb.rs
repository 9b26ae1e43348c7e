use proptest::prelude::*;
use terrane_geom::{Aabb, Vec3};

fn lattice() -> impl Strategy<Value = (i32, i32, i32)> {
    (-4096i32..4096, -64i32..64, -4096i32..4096)
}

fn cell_box(cx: i32, cy: i32, cz: i32) -> Aabb {
    let min = Vec3::from_ints(cx * 16, cy * 16, cz * 16) - Vec3::splat(0.5);
    Aabb::new(min, min + Vec3::splat(16.0))
}

proptest! {
    // Lattice boxes have a constant 16-unit extent
    #[test]
    fn lattice_box_extent_is_constant((cx, cy, cz) in lattice()) {
        let b = cell_box(cx, cy, cz);
        prop_assert_eq!(b.max - b.min, Vec3::splat(16.0));
    }

    // Neighbouring cells share a face exactly
    #[test]
    fn neighbouring_boxes_share_faces((cx, cy, cz) in lattice()) {
        let a = cell_box(cx, cy, cz);
        prop_assert_eq!(a.max.x, cell_box(cx + 1, cy, cz).min.x);
        prop_assert_eq!(a.max.y, cell_box(cx, cy + 1, cz).min.y);
        prop_assert_eq!(a.max.z, cell_box(cx, cy, cz + 1).min.z);
    }
}

#[test]
fn origin_cell_is_centred_on_voxel_centres() {
    let b = cell_box(0, 0, 0);
    assert_eq!(b.min, Vec3::splat(-0.5));
    assert_eq!(b.max, Vec3::splat(15.5));
}
