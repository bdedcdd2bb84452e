use pipe_geometry::PipeEngine;
use pipe_geometry::geom::{
    BendFilterOptions, Color3, LinearScalarMapper, PartGeometry, PipeGeometryConfig,
    PipeGeometryGenerator, Point3, clip_polyline_start_above_z, cylinder_with_center_line_parts,
    extrude_variable_radius_tube, filter_center_line,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_polyline(rng: &mut StdRng, len: usize) -> Vec<Point3> {
    let mut points = Vec::with_capacity(len);
    let mut current = Point3::new(0.0, 0.0, 0.0);
    for _ in 0..len {
        points.push(current);
        // Duplicates and near reversals on purpose.
        match rng.random_range(0..6) {
            0 => {}
            1 => {
                let back = points[points.len().saturating_sub(2)];
                current = back.lerp(current, rng.random_range(-0.01..0.01));
            }
            _ => {
                current = Point3::new(
                    current.x + rng.random_range(-50.0..50.0),
                    current.y + rng.random_range(-50.0..50.0),
                    current.z + rng.random_range(-80.0..10.0),
                );
            }
        }
    }
    points
}

#[test]
fn engine_initializes_and_reports_diagnostics() {
    let mut engine = PipeEngine::new();
    assert!(engine.set_center_line(&[0.0, 0.0, 0.0, 0.0, 0.0, -10.0]).is_ok());
    assert!(engine.set_radius(0.5).is_ok());
    assert!(engine.set_cross_section_vertex_count(16).is_ok());
    assert!(engine.set_cross_section_vertex_count(2).is_err());
    assert_eq!(engine.segment_index_from_triangle_index(31), Some(0));
    assert!(engine.diagnostics_summary().starts_with("P:2->2"));
}

#[test]
fn random_polylines_never_produce_nan() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for case in 0..200 {
        let len = rng.random_range(0..24);
        let points = random_polyline(&mut rng, len);
        let config = PipeGeometryConfig {
            radius: rng.random_range(0.01..5.0),
            cross_section_vertex_count: rng.random_range(3..24),
            ..Default::default()
        };
        let mut generator = PipeGeometryGenerator::with_config(config).expect("config");
        generator.set_center_line(&points).expect("finite points");

        match generator.build_surface() {
            Ok(Some(mesh)) => {
                assert!(mesh.validate().is_ok(), "case {case}: {:?}", mesh.validate());
                let filtered = generator.filtered_center_line().expect("clean after build");
                assert_eq!(
                    mesh.vertex_count(),
                    4 * config.cross_section_vertex_count * (filtered.points.len() - 1)
                );
            }
            Ok(None) => {}
            Err(err) => panic!("case {case}: unexpected {err} for {points:?}"),
        }
    }
}

#[test]
fn random_polylines_keep_index_map_valid() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let len = rng.random_range(2..40);
        let points = random_polyline(&mut rng, len);
        let options = BendFilterOptions {
            minimum_bend_angle_degrees: rng.random_range(0.0..=180.0),
            ..Default::default()
        };
        let Some(filtered) = filter_center_line(&points, options) else {
            continue;
        };
        assert_eq!(filtered.points.len() - 1, filtered.segment_index_map.len());
        assert!(filtered.segment_index_map.iter().all(|&i| i < points.len() - 1));
    }
}

#[test]
fn well_path_pipeline() {
    let path = vec![
        Point3::new(100.0, 200.0, 25.0),
        Point3::new(100.0, 200.0, -500.0),
        Point3::new(150.0, 260.0, -1200.0),
        Point3::new(400.0, 500.0, -1600.0),
        Point3::new(900.0, 900.0, -1650.0),
    ];
    let clipped = clip_polyline_start_above_z(&path, 0.0);
    let first_visible = clipped.first_visible_segment_index.expect("visible");

    let mut generator = PipeGeometryGenerator::new();
    generator.set_radius(5.0).unwrap();
    generator.set_cross_section_vertex_count(12).unwrap();
    generator.set_center_line(&clipped.points).unwrap();
    generator.set_first_visible_segment_index(first_visible);

    let surface = generator.build_surface().unwrap().expect("surface");
    let line = generator.build_center_line().unwrap().expect("line");
    assert_eq!(line.segment_count(), clipped.points.len() - 1);

    let values: Vec<f64> = (0..clipped.points.len() - 1).map(|i| i as f64 * 10.0).collect();
    let mapper = LinearScalarMapper::from_values(&values).expect("range");
    let surface_coords = generator.compute_surface_texture_coordinates(&values, &mapper).unwrap();
    let line_coords = generator.compute_center_line_texture_coordinates(&values, &mapper).unwrap();
    assert_eq!(surface_coords.len(), surface.vertex_count());
    assert_eq!(line_coords.len(), line.vertex_count());

    let last_triangle = surface.triangle_count() - 1;
    assert_eq!(
        generator.segment_index_from_triangle_index(last_triangle),
        Some(path.len() - 2)
    );
}

#[test]
fn decoration_parts_build_for_attribute_shapes() {
    let r = 0.3;
    let shoe = vec![
        Point3::new(0.0, 0.0, -300.0),
        Point3::new(0.0, 0.0, -300.3),
        Point3::new(0.0, 0.0, -300.3),
    ];
    let mesh = extrude_variable_radius_tube(&[r, r * 2.5, r * 1.1], 12, &shoe)
        .expect("shoe")
        .expect("mesh");
    assert!(mesh.validate().is_ok());

    let marker = vec![Point3::new(0.0, 0.0, -100.0), Point3::new(0.0, 0.0, -101.0)];
    let parts = cylinder_with_center_line_parts(&marker, Color3::new(0.0, 0.6, 0.2), r).expect("parts");
    assert!(matches!(parts[0].geometry, PartGeometry::Surface(_)));
    assert!(matches!(parts[1].geometry, PartGeometry::Lines(_)));
}
