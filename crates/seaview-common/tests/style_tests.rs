//! Tests for gradient configuration and sampling.

use std::io::Write;

use seaview_common::{Color, ColorRamp, ColorStop, FieldError, GradientConfig, Interpolation};

fn two_stop() -> GradientConfig {
    GradientConfig {
        stops: vec![
            ColorStop::new(0.0, Color::rgb(0, 0, 0)),
            ColorStop::new(1.0, Color::rgb(255, 255, 255)),
        ],
        interpolation: Interpolation::Linear,
    }
}

// ============================================================================
// sampling
// ============================================================================

#[test]
fn test_sample_endpoints() {
    let gradient = two_stop();
    assert_eq!(gradient.sample(0.0), Color::rgb(0, 0, 0));
    assert_eq!(gradient.sample(1.0), Color::rgb(255, 255, 255));
}

#[test]
fn test_sample_midpoint_linear() {
    let gradient = two_stop();
    let mid = gradient.sample(0.5);
    assert_eq!(mid.r, 128);
    assert_eq!(mid.a, 255);
}

#[test]
fn test_sample_clamps_out_of_range() {
    let gradient = two_stop();
    assert_eq!(gradient.sample(-3.0), Color::rgb(0, 0, 0));
    assert_eq!(gradient.sample(7.5), Color::rgb(255, 255, 255));
    assert_eq!(gradient.sample(f32::NAN), Color::rgb(0, 0, 0));
}

#[test]
fn test_sample_step_interpolation() {
    let gradient = GradientConfig {
        interpolation: Interpolation::Step,
        ..two_stop()
    };
    assert_eq!(gradient.sample(0.4), Color::rgb(0, 0, 0));
    assert_eq!(gradient.sample(0.6), Color::rgb(255, 255, 255));
}

#[test]
fn test_ocean_default_is_valid() {
    let gradient = GradientConfig::default();
    assert!(gradient.validate().is_ok());
    assert_eq!(gradient.color_at(0.0), Color::rgb(8, 48, 107));
    assert_eq!(gradient.color_at(1.0), Color::rgb(220, 40, 30));
}

#[test]
fn test_closure_is_a_color_ramp() {
    let ramp = |t: f32| Color::rgb((t * 255.0) as u8, 0, 0);
    assert_eq!(ramp.color_at(1.0), Color::rgb(255, 0, 0));
}

// ============================================================================
// JSON loading
// ============================================================================

#[test]
fn test_from_json_accepts_all_color_forms() {
    let json = r##"{
        "stops": [
            { "position": 0.0, "color": "#102030" },
            { "position": 0.5, "color": [1, 2, 3, 4] },
            { "position": 1.0, "color": { "r": 9, "g": 8, "b": 7 } }
        ],
        "interpolation": "step"
    }"##;

    let gradient = GradientConfig::from_json(json).unwrap();
    assert_eq!(gradient.stops[0].color, Color::rgb(16, 32, 48));
    assert_eq!(gradient.stops[1].color, Color::new(1, 2, 3, 4));
    assert_eq!(gradient.stops[2].color, Color::rgb(9, 8, 7));
    assert_eq!(gradient.interpolation, Interpolation::Step);
}

#[test]
fn test_from_json_rejects_bad_hex() {
    let json = r##"{ "stops": [
        { "position": 0.0, "color": "#12" },
        { "position": 1.0, "color": "#ffffff" }
    ] }"##;
    assert!(matches!(
        GradientConfig::from_json(json),
        Err(FieldError::Config(_))
    ));
}

#[test]
fn test_from_json_rejects_unordered_stops() {
    let json = r##"{ "stops": [
        { "position": 0.8, "color": "#000000" },
        { "position": 0.2, "color": "#ffffff" }
    ] }"##;
    let err = GradientConfig::from_json(json).unwrap_err();
    assert!(err.to_string().contains("ascending"));
}

#[test]
fn test_validate_single_stop() {
    let gradient = GradientConfig {
        stops: vec![ColorStop::new(0.0, Color::rgb(0, 0, 0))],
        interpolation: Interpolation::Linear,
    };
    assert!(gradient.validate().is_err());
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let json = serde_json::to_string(&two_stop()).unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let loaded = GradientConfig::from_file(file.path()).unwrap();
    assert_eq!(loaded, two_stop());
}

// ============================================================================
// legend
// ============================================================================

#[test]
fn test_legend_spans_zero_to_max() {
    let legend = two_stop().legend(2.0, 5);
    assert_eq!(legend.len(), 5);
    assert_eq!(legend[0].value, 0.0);
    assert_eq!(legend[4].value, 2.0);
    assert_eq!(legend[4].color, Color::rgb(255, 255, 255));
    assert_eq!(legend[2].label, "1.00 m/s");
}

#[test]
fn test_legend_too_few_steps() {
    assert!(two_stop().legend(1.0, 1).is_empty());
}
