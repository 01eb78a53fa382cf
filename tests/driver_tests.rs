//! Headless frame loop and configuration tests.

use cursor_trails::{
    ChainConfig, ConfigError, Driver, EffectKind, Glyph, GlyphSource, HostRegion, TrailConfig,
    TrailError, Vec2,
};

fn lit_pixels(driver: &Driver) -> usize {
    driver
        .surface()
        .as_raw()
        .chunks(4)
        .filter(|px| px[3] > 0)
        .count()
}

// ============================================================================
// Driver
// ============================================================================

#[test]
fn test_springy_frames_follow_pointer() {
    let mut driver = Driver::new(&TrailConfig::default(), (400, 300)).unwrap();
    driver.frame();
    assert!(lit_pixels(&driver) > 0);

    driver.input_mut().pointer_moved(Vec2::new(40.0, 40.0));
    for _ in 0..200 {
        driver.frame();
    }

    // The chain has swung over to hang below the pointer
    let surface = driver.surface();
    let near: usize = (40..80)
        .flat_map(|y| (20..60).map(move |x| (x, y)))
        .filter(|&(x, y)| surface.pixel(x, y)[3] > 0)
        .count();
    assert!(near > 0);
    assert_eq!(surface.pixel(399, 0)[3], 0);
}

#[test]
fn test_surface_cleared_every_frame() {
    let config = TrailConfig::default().with_effect(EffectKind::Fade);
    let mut driver = Driver::new(&config, (200, 200)).unwrap();

    driver.input_mut().pointer_moved(Vec2::new(100.0, 100.0));
    driver.frame();
    assert!(lit_pixels(&driver) > 0);

    // Longest lifetime is 139 frames, then only cleared pixels remain
    for _ in 0..160 {
        driver.frame();
    }
    assert_eq!(lit_pixels(&driver), 0);
}

#[test]
fn test_host_region_translates_pointer() {
    let config = TrailConfig::default()
        .with_effect(EffectKind::Fade)
        .with_host_surface(HostRegion::new(200, 100, 64, 64));
    let mut driver = Driver::new(&config, (800, 600)).unwrap();

    driver.input_mut().pointer_moved(Vec2::new(232.0, 132.0));
    assert_eq!(driver.input().pointer(), Some(Vec2::new(32.0, 32.0)));

    driver.frame();
    assert_eq!(driver.surface().width(), 64);
    assert!(driver.surface().pixel(32, 32)[3] > 0);
}

#[test]
fn test_resize_keeps_simulating() {
    let mut driver = Driver::new(&TrailConfig::default(), (640, 480)).unwrap();
    for _ in 0..10 {
        driver.frame();
    }
    driver.resize(100, 100);
    for _ in 0..10 {
        driver.frame();
    }
    assert_eq!(driver.surface().width(), 100);
    assert_eq!(driver.clock().steps(), 20);
}

#[test]
fn test_invalid_config_rejected() {
    let config = TrailConfig::default().with_chain(ChainConfig::default().with_mass(-1.0));
    match Driver::new(&config, (100, 100)) {
        Err(TrailError::Config(ConfigError::NonPositiveMass(m))) => assert_eq!(m, -1.0),
        Err(e) => panic!("unexpected error: {}", e),
        Ok(_) => panic!("negative mass accepted"),
    }
}

// ============================================================================
// Configuration files
// ============================================================================

#[test]
fn test_config_json_round_trip() {
    let config = TrailConfig::default()
        .with_effect(EffectKind::Fade)
        .with_glyphs(vec![GlyphSource::emoji(Glyph::Joy)])
        .with_glyph_size(24)
        .with_host_surface(HostRegion::new(1, 2, 3, 4))
        .with_seed(7);

    let json = config.to_json().unwrap();
    let back = TrailConfig::from_json(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_config_save_and_load() {
    let path = std::env::temp_dir().join(format!("cursor-trails-{}.json", std::process::id()));
    let config = TrailConfig::default().with_chain(ChainConfig::default().with_nodes(12));
    config.save(&path).unwrap();

    let loaded = TrailConfig::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded.chain.nodes, 12);
    assert_eq!(loaded, config);
}

#[test]
fn test_config_load_errors() {
    let missing = TrailConfig::load("/definitely/not/here.json");
    assert!(matches!(missing, Err(TrailError::Io(_))));

    let bad = TrailConfig::from_json(r#"{"effect": "Sparkle"}"#);
    assert!(matches!(bad, Err(TrailError::Json(_))));
}
