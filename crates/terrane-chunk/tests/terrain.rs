use proptest::prelude::*;
use terrane_blocks::Block;
use terrane_chunk::{Chunk, NoDetail, Voxels, generate_terrain};
use terrane_world::{ChunkCoord, HeightSamples, WorldGenParams};

fn params(water: i32) -> WorldGenParams {
    WorldGenParams::default().with_water_level(water)
}

fn gen_chunk(cy: i32, heights: &HeightSamples, water: i32) -> (Box<Voxels>, bool) {
    let mut v = Voxels::boxed(Block::IRON, 9);
    let empty = generate_terrain(ChunkCoord::new(0, cy, 0), &mut v, heights, &params(water), true);
    (v, empty)
}

#[test]
fn dry_land_column_layers() {
    let (v, empty) = gen_chunk(4, &HeightSamples::uniform(70), 62);
    assert!(!empty);
    for x in 0..16 {
        for z in 0..16 {
            assert_eq!(v.block(x, 0, z), Block::ROCK);
            for y in 1..=5 {
                assert_eq!(v.block(x, y, z), Block::DIRT, "y={y}");
            }
            assert_eq!(v.block(x, 6, z), Block::GRASS);
            for y in 7..16 {
                assert_eq!(v.block(x, y, z), Block::AIR);
                assert_eq!(v.brightness(x, y, z), 15);
            }
        }
    }
    assert!(!v.blocks().contains(&Block::WATER));
}

#[test]
fn chunk_above_submerged_surface_is_empty_air() {
    let (v, empty) = gen_chunk(4, &HeightSamples::uniform(60), 62);
    assert!(empty);
    assert!(v.blocks().iter().all(|b| *b == Block::AIR));
    assert!(v.brightness_slice().iter().all(|b| *b == 15));
}

#[test]
fn shore_column_has_sand_then_water() {
    // base 48: h = 12, wh = 14
    let (v, empty) = gen_chunk(3, &HeightSamples::uniform(60), 62);
    assert!(!empty);
    for y in 0..7 {
        assert_eq!(v.block(4, y, 4), Block::ROCK, "y={y}");
    }
    for y in 7..=12 {
        assert_eq!(v.block(4, y, 4), Block::SAND, "y={y}");
    }
    assert_eq!(v.block(4, 13, 4), Block::WATER);
    assert_eq!(v.block(4, 14, 4), Block::WATER);
    assert_eq!(v.brightness(4, 14, 4), 15);
    assert_eq!(v.brightness(4, 13, 4), 13);
    assert_eq!(v.block(4, 15, 4), Block::AIR);
    assert_eq!(v.brightness(4, 15, 4), 15);
}

#[test]
fn deep_chunk_is_unlit_rock_with_bedrock_floor() {
    let (v, empty) = gen_chunk(0, &HeightSamples::uniform(100), 30);
    assert!(!empty);
    for x in 0..16 {
        for z in 0..16 {
            assert_eq!(v.block(x, 0, z), Block::BEDROCK);
            assert_eq!(v.block(x, 1, z), Block::ROCK);
            assert_eq!(v.brightness(x, 9, z), 0);
        }
    }
}

#[test]
fn uninitialized_empty_chunk_is_untouched() {
    let mut v = Voxels::boxed(Block::IRON, 9);
    let empty = generate_terrain(
        ChunkCoord::new(0, 9, 0),
        &mut v,
        &HeightSamples::uniform(40),
        &params(30),
        false,
    );
    assert!(empty);
    assert!(v.blocks().iter().all(|b| *b == Block::IRON));
}

#[test]
fn build_skips_detail_on_empty_chunks() {
    let p = params(62);
    let c = Chunk::build(
        ChunkCoord::new(0, 4, 0),
        Voxels::boxed(Block::AIR, 0),
        &HeightSamples::uniform(60),
        &p,
        &NoDetail,
        true,
    );
    assert!(c.is_empty());
    assert!(!c.is_detail_generated());
    assert!(!c.is_modified());
    assert!(!c.should_save());
}

fn heights() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(-20i32..120, 256)
}

proptest! {
    #[test]
    fn out_of_range_layers_are_uniform_air(cy in prop_oneof![5i32..40, -40i32..0], hs in heights()) {
        let samples = HeightSamples::from_fn(|x, z| hs[x * 16 + z]);
        let (v, empty) = gen_chunk(cy, &samples, 30);
        prop_assert!(empty);
        let want = if cy < 0 { 2 } else { 15 };
        prop_assert!(v.blocks().iter().all(|b| *b == Block::AIR));
        prop_assert!(v.brightness_slice().iter().all(|b| *b == want));
    }

    #[test]
    fn floor_layer_is_bedrock(hs in heights(), water in 0i32..90) {
        let samples = HeightSamples::from_fn(|x, z| hs[x * 16 + z]);
        let (v, _) = gen_chunk(0, &samples, water);
        for x in 0..16 {
            for z in 0..16 {
                prop_assert_eq!(v.block(x, 0, z), Block::BEDROCK);
            }
        }
    }

    #[test]
    fn water_darkens_with_depth(hs in heights(), water in 0i32..90, cy in 0i32..=4) {
        let samples = HeightSamples::from_fn(|x, z| hs[x * 16 + z]);
        let (v, _) = gen_chunk(cy, &samples, water);
        for x in 0..16 {
            for z in 0..16 {
                let mut above: Option<u8> = None;
                for y in (0..16).rev() {
                    if v.block(x, y, z) != Block::WATER {
                        above = None;
                        continue;
                    }
                    let b = v.brightness(x, y, z);
                    prop_assert!((2..=15).contains(&b));
                    if let Some(a) = above {
                        prop_assert!(b <= a);
                    }
                    above = Some(b);
                }
            }
        }
    }

    #[test]
    fn columns_above_ground_and_water_hold_no_water(
        (cy, h, water) in (0i32..=4).prop_flat_map(|cy| {
            let base = cy * 16;
            (Just(cy), -20..base, -20..base)
        })
    ) {
        let (v, _) = gen_chunk(cy, &HeightSamples::uniform(h), water);
        prop_assert!(!v.blocks().contains(&Block::WATER));
        for x in 0..16 {
            for z in 0..16 {
                for y in 1..16 {
                    prop_assert_eq!(v.block(x, y, z), Block::AIR);
                }
            }
        }
    }
}
