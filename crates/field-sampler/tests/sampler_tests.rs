//! Tests for classification, colorization and batching.

use field_sampler::{build, classify, partition, SampleKind, SamplerConfig};
use nalgebra::{Point3, Vector3};
use seaview_common::{Color, ColorStop, DecodedField, GradientConfig, GridShape, Interpolation};
use test_utils::{
    create_gyre_field, create_gyre_field_with_land, ramp_field, single_eastward_cell, still_field,
    uniform_field,
};

fn black_to_white() -> GradientConfig {
    GradientConfig {
        stops: vec![
            ColorStop::new(0.0, Color::rgb(0, 0, 0)),
            ColorStop::new(1.0, Color::rgb(255, 255, 255)),
        ],
        interpolation: Interpolation::Linear,
    }
}

fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
    assert!((a - b).norm() < 1e-5, "{:?} != {:?}", a, b);
}

// ============================================================================
// reference scenario
// ============================================================================

#[test]
fn test_single_eastward_cell_scenario() {
    let config = SamplerConfig::default();
    let classified = classify(&single_eastward_cell(), &config);

    assert_eq!(classified.moving.len(), 1);
    assert_eq!(classified.still.len(), 3);
    assert_eq!(classified.max_magnitude, 1.0);

    let arrow = &classified.moving[0];
    assert_eq!(arrow.cell, [0, 0, 0]);
    assert_eq!(arrow.magnitude, 1.0);
    assert_eq!(arrow.kind, SampleKind::Moving);
    assert_close(arrow.pose(1.0).forward(), Vector3::x());
}

#[test]
fn test_single_eastward_cell_batches() {
    let batches = build(
        single_eastward_cell(),
        &SamplerConfig::default(),
        &black_to_white(),
    );

    assert_eq!(batches.arrow_batches.len(), 1);
    assert_eq!(batches.land_batches.len(), 1);
    assert_eq!(batches.arrow_count(), 1);
    assert_eq!(batches.land_count(), 3);
    assert_eq!(batches.max_magnitude, 1.0);
    // Only moving cell is the fastest: t = 1.
    assert_eq!(batches.arrow_colors, vec![vec![Color::rgb(255, 255, 255)]]);
}

#[test]
fn test_still_cells_are_unrotated() {
    let batches = build(
        single_eastward_cell(),
        &SamplerConfig::default(),
        &black_to_white(),
    );
    for pose in &batches.land_batches[0] {
        assert_close(pose.forward(), Vector3::z());
    }
}

// ============================================================================
// world mapping
// ============================================================================

#[test]
fn test_positions_use_spacing_and_depth_as_height() {
    let config = SamplerConfig {
        spacing: 3.0,
        ..Default::default()
    };
    let field = still_field(GridShape::new(2, 2, 2));
    let classified = classify(&field, &config);

    let sample = classified
        .still
        .iter()
        .find(|s| s.cell == [1, 0, 1])
        .unwrap();
    assert_eq!(sample.position, Point3::new(3.0, 3.0, 0.0));
}

#[test]
fn test_vertical_flow_points_up() {
    let field = uniform_field(GridShape::new(1, 1, 1), [0.0, 0.0, 2.0]);
    let batches = build(field, &SamplerConfig::default(), &black_to_white());
    assert_close(batches.arrow_batches[0][0].forward(), Vector3::y());
}

#[test]
fn test_northward_flow_points_along_world_z() {
    let field = uniform_field(GridShape::new(1, 1, 1), [0.0, 0.5, 0.0]);
    let batches = build(field, &SamplerConfig::default(), &black_to_white());
    assert_close(batches.arrow_batches[0][0].forward(), Vector3::z());
}

#[test]
fn test_slow_southward_flow_points_along_negative_world_z() {
    let field = uniform_field(GridShape::new(1, 1, 1), [0.0, -5e-7, 0.0]);
    let batches = build(field, &SamplerConfig::default(), &black_to_white());
    assert_close(batches.arrow_batches[0][0].forward(), -Vector3::z());
}

#[test]
fn test_glyph_scale_applied() {
    let config = SamplerConfig {
        glyph_scale: 0.25,
        ..Default::default()
    };
    let batches = build(single_eastward_cell(), &config, &black_to_white());
    assert_eq!(batches.arrow_batches[0][0].scale, Vector3::repeat(0.25));
    assert_eq!(batches.land_batches[0][0].scale, Vector3::repeat(0.25));
}

// ============================================================================
// normalization
// ============================================================================

#[test]
fn test_all_still_field_has_no_arrows() {
    let batches = build(
        still_field(GridShape::new(3, 4, 5)),
        &SamplerConfig::default(),
        &black_to_white(),
    );

    assert_eq!(batches.arrow_count(), 0);
    assert!(batches.arrow_colors.is_empty());
    assert_eq!(batches.max_magnitude, 0.0);
    assert_eq!(batches.land_count(), 60);
}

#[test]
fn test_max_magnitude_is_global_across_batches() {
    let config = SamplerConfig {
        instance_cap: 4,
        ..Default::default()
    };
    let shape = GridShape::new(1, 1, 10);
    let batches = build(ramp_field(shape), &config, &|t: f32| {
        Color::rgb((t * 100.0).round() as u8, 0, 0)
    });

    assert_eq!(batches.max_magnitude, 10.0);
    let reds: Vec<u8> = batches.arrow_colors.iter().flatten().map(|c| c.r).collect();
    assert_eq!(reds, vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
}

#[test]
fn test_fill_sized_speed_keeps_normalization_finite() {
    let field = DecodedField::new(
        GridShape::new(1, 1, 2),
        vec![1e20, 1.0],
        vec![0.0, 0.0],
        vec![0.0, 0.0],
    )
    .unwrap();
    let batches = build(field, &SamplerConfig::default(), &black_to_white());

    assert_eq!(batches.max_magnitude, 1e20);
    assert_eq!(
        batches.arrow_colors,
        vec![vec![Color::rgb(255, 255, 255), Color::rgb(0, 0, 0)]]
    );
    let forward = batches.arrow_batches[0][0].forward();
    assert!(forward.iter().all(|c| c.is_finite()));
    assert_close(forward, Vector3::x());
}

#[test]
fn test_colors_align_with_pose_batches() {
    let config = SamplerConfig {
        instance_cap: 7,
        ..Default::default()
    };
    let batches = build(
        create_gyre_field_with_land(GridShape::new(3, 6, 6), 11),
        &config,
        &GradientConfig::ocean(),
    );

    assert_eq!(batches.arrow_colors.len(), batches.arrow_batches.len());
    for (poses, colors) in batches.arrow_batches.iter().zip(&batches.arrow_colors) {
        assert_eq!(poses.len(), colors.len());
    }
}

// ============================================================================
// batching
// ============================================================================

#[test]
fn test_batch_counts_follow_ceiling_division() {
    let items: Vec<usize> = (0..2500).collect();
    let batches = partition(&items, 1023);

    assert_eq!(batches.len(), 3);
    assert_eq!(batches[0].len(), 1023);
    assert_eq!(batches[1].len(), 1023);
    assert_eq!(batches[2].len(), 454);

    let flattened: Vec<usize> = batches.into_iter().flatten().collect();
    assert_eq!(flattened, items);
}

#[test]
fn test_large_field_respects_instance_cap() {
    let shape = GridShape::new(4, 30, 30);
    let batches = build(
        create_gyre_field(shape),
        &SamplerConfig::default(),
        &GradientConfig::ocean(),
    );

    assert_eq!(batches.arrow_count() + batches.land_count(), shape.len());
    for batch in batches.arrow_batches.iter().chain(&batches.land_batches) {
        assert!(batch.len() <= 1023);
    }
    let expected_arrow_batches = (batches.arrow_count() + 1022) / 1023;
    assert_eq!(batches.arrow_batches.len(), expected_arrow_batches);
}

#[test]
fn test_batches_preserve_sweep_order() {
    let config = SamplerConfig {
        instance_cap: 5,
        spacing: 1.0,
        ..Default::default()
    };
    let shape = GridShape::new(2, 3, 4);
    let field = ramp_field(shape);
    let expected: Vec<Point3<f32>> = classify(&field, &config)
        .moving
        .iter()
        .map(|s| s.position)
        .collect();

    let batches = build(field, &config, &black_to_white());
    let positions: Vec<Point3<f32>> = batches
        .arrow_batches
        .iter()
        .flatten()
        .map(|p| p.position)
        .collect();

    assert_eq!(positions, expected);
    assert_eq!(batches.arrow_batches.len(), 5);
}

#[test]
fn test_empty_field_gives_empty_batch_set() {
    let batches = build(
        still_field(GridShape::new(0, 4, 4)),
        &SamplerConfig::default(),
        &black_to_white(),
    );
    assert!(batches.is_empty());
    assert_eq!(batches.max_magnitude, 0.0);
}

#[test]
fn test_summary() {
    let summary = build(
        single_eastward_cell(),
        &SamplerConfig::default(),
        &black_to_white(),
    )
    .summary();

    assert_eq!(summary.arrow_instances, 1);
    assert_eq!(summary.land_instances, 3);
    assert_eq!(summary.arrow_batches, 1);
    assert_eq!(summary.land_batches, 1);
}
