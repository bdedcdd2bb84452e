use crate::geom::{BendFilterOptions, PipeError, Point3, Vec3, extrude_pipe, filter_center_line};

fn to_point(p: [f32; 3]) -> Point3 {
    Point3::new(f64::from(p[0]), f64::from(p[1]), f64::from(p[2]))
}

#[test]
fn extrusion_vertex_count_matches_ring_pairs() {
    let points = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 0.0, -10.0),
        Point3::new(2.0, 0.0, -20.0),
        Point3::new(8.0, 3.0, -25.0),
    ];
    for count in [3, 8, 13, 32] {
        let mesh = extrude_pipe(0.5, count, &points)
            .expect("extrusion should succeed")
            .expect("mesh");
        assert_eq!(mesh.vertex_count(), 4 * count * (points.len() - 1));
        assert_eq!(mesh.normals.len(), mesh.vertex_count());
        assert!(mesh.validate().is_ok());
    }
}

#[test]
fn extrusion_keeps_radius_around_each_segment_axis() {
    let points = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 0.0, -10.0),
        Point3::new(5.0, 0.0, -15.0),
        Point3::new(5.0, 5.0, -20.0),
    ];
    let count = 10;
    let radius = 0.75;
    let mesh = extrude_pipe(radius, count, &points).expect("extrusion").expect("mesh");

    for seg in 0..points.len() - 1 {
        let axis = points[seg + 1].sub_point(points[seg]).normalized().expect("axis");
        let quads = &mesh.positions[seg * count * 4..(seg + 1) * count * 4];
        for p in quads {
            let off_axis = to_point(*p).sub_point(points[seg]).reject_from(axis);
            assert!(
                (off_axis.length() - radius).abs() < 1e-4,
                "segment {seg}: distance {} from axis",
                off_axis.length()
            );
        }
    }
}

#[test]
fn straight_pipe_rings_sit_at_radius_from_their_vertex() {
    let points = vec![
        Point3::new(1.0, 2.0, 3.0),
        Point3::new(1.0, 2.0, 8.0),
        Point3::new(1.0, 2.0, 13.0),
    ];
    let mesh = extrude_pipe(2.0, 8, &points).expect("extrusion").expect("mesh");

    for (quad, chunk) in mesh.positions.chunks(4).enumerate() {
        let seg = quad / 8;
        let near = [points[seg], points[seg], points[seg + 1], points[seg + 1]];
        for (p, center) in chunk.iter().zip(near) {
            assert!((to_point(*p).distance_to(center) - 2.0).abs() < 1e-5);
        }
    }
}

#[test]
fn quads_wind_outward() {
    let points = vec![Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, 5.0)];
    let mesh = extrude_pipe(1.0, 12, &points).expect("extrusion").expect("mesh");

    for chunk in mesh.positions.chunks(4) {
        let a = to_point(chunk[0]);
        let b = to_point(chunk[1]);
        let c = to_point(chunk[2]);
        let face_normal = b.sub_point(a).cross(c.sub_point(a));
        let center = Vec3::new(a.x + c.x, a.y + c.y, 0.0);
        assert!(face_normal.dot(center) > 0.0);
    }
}

#[test]
fn filtered_reversal_extrudes_cleanly() {
    let points = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 0.0, -50.0),
        Point3::new(0.0, 0.0, 0.0),
    ];
    assert_eq!(
        extrude_pipe(1.0, 8, &points),
        Err(PipeError::DegenerateMiter { segment: 1 })
    );

    let filtered = filter_center_line(&points, BendFilterOptions::default()).expect("filtered");
    let mesh = extrude_pipe(1.0, 8, &filtered.points)
        .expect("bend points remove the reversal")
        .expect("mesh");
    assert!(!mesh.has_invalid_vertices());
}
