use super::{reversal_fixture, reversal_fixture_with_trailing_duplicate};
use crate::geom::{LinearScalarMapper, PipeError, PipeGeometryConfig, PipeGeometryGenerator, Point3};

fn straight_generator() -> PipeGeometryGenerator {
    let mut generator = PipeGeometryGenerator::new();
    generator
        .set_center_line(&[Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 10.0)])
        .expect("center line");
    generator
}

#[test]
fn generator_straight_line_scenario() {
    let mut generator = straight_generator();
    generator.set_radius(1.0).unwrap();
    generator.set_cross_section_vertex_count(8).unwrap();

    let mesh = generator.build_surface().expect("surface").expect("mesh");
    assert_eq!(mesh.quad_count(), 8);
    assert_eq!(mesh.vertex_count(), 32);
    assert_eq!(mesh.normals.len(), 32);
    for (i, p) in mesh.positions.iter().enumerate() {
        let nearest_z = if i % 4 < 2 { 0.0 } else { 10.0 };
        let d = (f64::from(p[0]).powi(2) + f64::from(p[1]).powi(2) + (f64::from(p[2]) - nearest_z).powi(2)).sqrt();
        assert!((d - 1.0).abs() < 1e-6);
    }
}

#[test]
fn generator_reversal_fixture_produces_clean_surface() {
    let mut generator = PipeGeometryGenerator::new();
    generator.set_center_line(&reversal_fixture()).unwrap();
    generator.set_radius(2.0).unwrap();

    let mesh = generator
        .build_surface()
        .expect("fixture must not hit a degenerate miter")
        .expect("fixture must produce geometry");
    assert!(!mesh.has_invalid_vertices());
    assert!(mesh.validate().is_ok());

    let filtered = generator.filtered_center_line().expect("clean after build");
    assert_eq!(mesh.vertex_count(), 4 * 8 * (filtered.points.len() - 1));
    assert_eq!(generator.diagnostics().bend_count, 1);
}

#[test]
fn generator_duplicates_at_both_ends_produce_surface() {
    let fixture = reversal_fixture_with_trailing_duplicate();
    let mut generator = PipeGeometryGenerator::new();
    generator.set_center_line(&fixture).unwrap();

    let mesh = generator
        .build_surface()
        .expect("trailing duplicate must not hit a degenerate miter")
        .expect("surface");
    assert!(!mesh.has_invalid_vertices());
    assert!(mesh.validate().is_ok());

    let filtered = generator.filtered_center_line().expect("clean after build");
    assert_eq!(filtered.points.len(), 10);
    assert_eq!(filtered.dropped_point_count, 3);
    assert_eq!(filtered.segment_index_map, vec![1, 2, 2, 4, 4, 5, 6, 7, 8]);
    assert_eq!(mesh.vertex_count(), 4 * 8 * (filtered.points.len() - 1));

    let last_triangle = mesh.triangle_count() - 1;
    assert_eq!(generator.segment_index_from_triangle_index(last_triangle), Some(8));
}

#[test]
fn generator_coincident_points_give_no_surface() {
    let mut generator = PipeGeometryGenerator::new();
    generator
        .set_center_line(&[
            Point3::new(3.0, 3.0, 3.0),
            Point3::new(3.0, 3.0, 3.0),
            Point3::new(3.0, 3.0, 3.0 + 1.0e-7),
        ])
        .unwrap();
    assert!(generator.build_surface().unwrap().is_none());
    assert!(generator.update_filtered_center_line().is_none());
}

#[test]
fn generator_build_is_idempotent() {
    let mut generator = PipeGeometryGenerator::new();
    generator.set_center_line(&reversal_fixture()).unwrap();

    let first = generator.build_surface().unwrap().expect("mesh");
    let filtered_before = generator.filtered_center_line().cloned();
    let second = generator.build_surface().unwrap().expect("mesh");

    assert_eq!(first, second);
    assert_eq!(filtered_before.as_ref(), generator.filtered_center_line());
}

#[test]
fn generator_config_change_invalidates() {
    let mut generator = straight_generator();
    let small = generator.build_surface().unwrap().expect("mesh");

    generator.set_radius(3.0).unwrap();
    assert!(generator.is_dirty());
    let large = generator.build_surface().unwrap().expect("mesh");
    assert_ne!(small, large);

    generator.set_cross_section_vertex_count(5).unwrap();
    let coarse = generator.build_surface().unwrap().expect("mesh");
    assert_eq!(coarse.vertex_count(), 20);
}

#[test]
fn generator_bend_settings_reach_the_filter() {
    let mut generator = PipeGeometryGenerator::new();
    generator.set_center_line(&reversal_fixture()).unwrap();
    assert_eq!(generator.update_filtered_center_line().expect("filtered").bend_count, 1);

    generator.set_minimum_bend_angle(0.0).unwrap();
    assert_eq!(generator.update_filtered_center_line().expect("filtered").bend_count, 0);

    generator.set_minimum_bend_angle(180.0).unwrap();
    generator.set_bend_scaling_factor(0.1).unwrap();
    let filtered = generator.update_filtered_center_line().expect("filtered");
    assert_eq!(filtered.bend_count, 5);
    let offset = filtered.points[1].distance_to(filtered.points[2]);
    assert!((offset - 0.1).abs() < 1e-9);
}

#[test]
fn generator_replacing_center_line_invalidates() {
    let mut generator = straight_generator();
    generator.build_surface().unwrap();
    assert!(!generator.is_dirty());

    generator.set_center_line(&reversal_fixture()).unwrap();
    assert!(generator.is_dirty());
    assert!(generator.filtered_center_line().is_none());
    let filtered = generator.update_filtered_center_line().expect("filtered");
    assert_eq!(filtered.points.len(), 10);
}

#[test]
fn generator_center_line_uses_unfiltered_points() {
    let mut generator = PipeGeometryGenerator::new();
    let fixture = reversal_fixture();
    generator.set_center_line(&fixture).unwrap();

    let line = generator.build_center_line().unwrap().expect("line");
    assert_eq!(line.vertex_count(), 2 * (fixture.len() - 1));
    assert_eq!(line.positions[0], fixture[0].to_f32_array());
    assert_eq!(line.positions[1], fixture[1].to_f32_array());
    assert_eq!(line.positions[2], fixture[1].to_f32_array());

    let mut empty = PipeGeometryGenerator::new();
    assert!(empty.build_center_line().unwrap().is_none());
}

#[test]
fn generator_surface_texture_coordinates() {
    let mut generator = PipeGeometryGenerator::new();
    let fixture = reversal_fixture();
    generator.set_center_line(&fixture).unwrap();
    let values: Vec<f64> = (0..fixture.len() - 1).map(|i| i as f64).collect();
    let mapper = LinearScalarMapper::new(0.0, 8.0);

    let coords = generator.compute_surface_texture_coordinates(&values, &mapper).unwrap();
    let mesh = generator.build_surface().unwrap().expect("mesh");
    assert_eq!(coords.len(), mesh.vertex_count());

    let filtered = generator.filtered_center_line().expect("filtered");
    let per_segment = 8 * 4;
    for (seg, chunk) in coords.chunks(per_segment).enumerate() {
        let original = filtered.segment_index_map[seg];
        let expected = [(original as f32) / 8.0, 0.5];
        assert!(chunk.iter().all(|tc| *tc == expected));
    }
}

#[test]
fn generator_texture_count_mismatch_is_an_error() {
    let mut generator = straight_generator();
    let mapper = LinearScalarMapper::new(0.0, 1.0);

    assert_eq!(
        generator.compute_surface_texture_coordinates(&[1.0, 2.0], &mapper),
        Err(PipeError::ScalarCountMismatch { expected: 1, actual: 2 })
    );
    assert_eq!(
        generator.compute_center_line_texture_coordinates(&[], &mapper),
        Err(PipeError::ScalarCountMismatch { expected: 1, actual: 0 })
    );
}

#[test]
fn generator_center_line_texture_coordinates() {
    let mut generator = PipeGeometryGenerator::new();
    generator.set_center_line(&reversal_fixture()).unwrap();
    let values = [0.0, 1.0, f64::NAN, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
    let mapper = LinearScalarMapper::new(0.0, 8.0);

    let coords = generator.compute_center_line_texture_coordinates(&values, &mapper).unwrap();
    assert_eq!(coords.len(), 18);
    assert_eq!(coords[4], [0.5, 1.0]);
    assert_eq!(coords[5], [0.5, 1.0]);
    assert_eq!(coords[17], [1.0, 0.5]);
}

#[test]
fn generator_picking_maps_back_to_original_segments() {
    let config = PipeGeometryConfig { cross_section_vertex_count: 6, ..Default::default() };
    let mut generator = PipeGeometryGenerator::with_config(config).unwrap();
    generator.set_center_line(&reversal_fixture()).unwrap();
    let mesh = generator.build_surface().unwrap().expect("mesh");
    let map = generator.filtered_center_line().expect("filtered").segment_index_map.clone();

    for triangle in 0..mesh.triangle_count() {
        let segment = generator.segment_index_from_triangle_index(triangle).expect("segment");
        assert_eq!(segment, map[triangle / 12]);
    }
    assert!(generator.segment_index_from_triangle_index(mesh.triangle_count()).is_none());

    generator.set_first_visible_segment_index(40);
    assert!(!generator.is_dirty());
    assert_eq!(generator.segment_index_from_triangle_index(0), Some(map[0] + 40));
}
