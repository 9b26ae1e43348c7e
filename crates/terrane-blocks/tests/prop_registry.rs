use proptest::prelude::*;
use terrane_blocks::{Block, BlockRegistry, BlockTextures, ConfigError, FaceRole, TextureAtlas};

#[test]
fn builtin_material_flags() {
    let reg = BlockRegistry::builtin();
    assert!(!reg.is_solid(Block::AIR) && !reg.is_opaque(Block::AIR));
    assert!(reg.is_solid(Block::LEAF) && !reg.is_opaque(Block::LEAF));
    assert!(reg.is_translucent(Block::GLASS) && reg.is_solid(Block::GLASS));
    assert!(reg.is_translucent(Block::WATER) && !reg.is_solid(Block::WATER));
    assert!(reg.is_opaque(Block::ROCK));
    assert_eq!(reg.pass_of(Block::ROCK), 0);
    assert_eq!(reg.pass_of(Block::LEAF), 0);
    assert_eq!(reg.pass_of(Block::ICE), 1);
    assert_eq!(reg.pass_of(Block::LAVA), 2);
}

#[test]
fn toml_overrides_and_extends() {
    let reg = BlockRegistry::from_toml_str(
        r#"
        [[blocks]]
        name = "leaf"
        id = 8
        opaque = true

        [[blocks]]
        name = "slime"
        id = 40
        solid = true
        opaque = false
        translucent = true
    "#,
    )
    .unwrap();
    assert!(reg.is_opaque(Block::LEAF));
    let slime = reg.id_by_name("slime").unwrap();
    assert_eq!(slime, Block(40));
    assert_eq!(reg.pass_of(slime), 1);
    // ids between the builtin table and 40 stay unknown
    assert_eq!(reg.get(Block(30)), reg.unknown());
}

#[test]
fn duplicate_ids_are_rejected() {
    let err = BlockRegistry::from_toml_str(
        r#"
        [[blocks]]
        name = "a"
        id = 50
        [[blocks]]
        name = "b"
        id = 50
    "#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateId(50)));
}

#[test]
fn texture_overrides_by_name() {
    let reg = BlockRegistry::builtin();
    let tex = BlockTextures::from_toml_str(
        r#"
        [textures]
        rock = 30
        grass = { top = 31, side = 32, bottom = 33 }
    "#,
        &reg,
    )
    .unwrap();
    assert_eq!(tex.texture_index(Block::ROCK, FaceRole::Side), 30);
    assert_eq!(tex.texture_index(Block::GRASS, FaceRole::Top), 31);
    assert_eq!(tex.texture_index(Block::GRASS, FaceRole::Bottom), 33);
    assert_eq!(tex.texture_index(Block::DIRT, FaceRole::Top), 4);

    let err = BlockTextures::from_toml_str("[textures]\nmarble = 3\n", &reg).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownBlock(ref n) if n == "marble"));
}

#[test]
fn grass_faces_differ_by_role() {
    let tex = BlockTextures::builtin();
    let top = tex.texture_index(Block::GRASS, FaceRole::Top);
    let side = tex.texture_index(Block::GRASS, FaceRole::Side);
    assert_ne!(top, side);
    assert_eq!(tex.tex_coord(Block::GRASS, FaceRole::Side), (3.0 / 8.0, 0.0));
}

proptest! {
    #[test]
    fn unknown_ids_read_as_walls(id in (Block::BUILTIN_COUNT as u16)..u16::MAX) {
        let reg = BlockRegistry::builtin();
        prop_assert!(reg.is_solid(Block(id)));
        prop_assert!(reg.is_opaque(Block(id)));
        prop_assert!(!reg.is_translucent(Block(id)));
    }

    #[test]
    fn layer_stays_inside_array(id in 0u16..40, role in prop_oneof![
        Just(FaceRole::Top), Just(FaceRole::Side), Just(FaceRole::Bottom)
    ]) {
        let tex = BlockTextures::builtin();
        let l = tex.layer(Block(id), role);
        prop_assert!(l > 0.0 && l < 1.0);
    }
}
