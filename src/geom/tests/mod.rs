mod test_extrusion_basic;
mod test_generator_basic;

use crate::geom::Point3;

/// Ten-point path with a duplicated start (0-1), a duplicated turning point
/// (3-4) and a near reversal around indices 2..5.
pub(super) fn reversal_fixture() -> Vec<Point3> {
    vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 0.0, -100.0),
        Point3::new(0.0, 0.5, -200.0),
        Point3::new(0.0, 0.5, -200.0),
        Point3::new(0.0, 1.0, -100.0),
        Point3::new(0.0, 1.0, -50.0),
        Point3::new(10.0, 1.0, -40.0),
        Point3::new(20.0, 1.0, -40.0),
        Point3::new(30.0, 1.0, -40.0),
    ]
}

/// [`reversal_fixture`] with its last point repeated, so the path is
/// duplicated at both ends.
pub(super) fn reversal_fixture_with_trailing_duplicate() -> Vec<Point3> {
    let mut points = reversal_fixture();
    if let Some(&last) = points.last() {
        points.push(last);
    }
    points
}
