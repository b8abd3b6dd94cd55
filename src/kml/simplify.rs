use geo::Simplify;

/// Round every coordinate of a ring to `precision` decimal digits.
///
/// Each coordinate is rounded independently; the vertex count is unchanged.
pub fn reduce_ring_precision(ring: &geo::LineString, precision: u32) -> geo::LineString {
    let factor = 10f64.powi(precision as i32);
    ring.coords()
        .map(|coord| geo::Coord {
            x: (coord.x * factor).round() / factor,
            y: (coord.y * factor).round() / factor,
        })
        .collect()
}

/// Exterior rings of a polygonal geometry, one per constituent polygon.
///
/// Interior rings are dropped; only the exterior boundary survives into the
/// output. With a tolerance, each ring is Douglas-Peucker simplified so that
/// no removed vertex deviates more than the tolerance from the new boundary.
/// Non-polygon geometries yield no rings.
pub fn exterior_rings(geometry: &geo::Geometry, tolerance: Option<f64>) -> Vec<geo::LineString> {
    let rings: Vec<geo::LineString> = match geometry {
        geo::Geometry::Polygon(polygon) => vec![polygon.exterior().clone()],
        geo::Geometry::MultiPolygon(multi_polygon) => multi_polygon
            .0
            .iter()
            .map(|polygon| polygon.exterior().clone())
            .collect(),
        _ => Vec::new(),
    };
    match tolerance {
        Some(tolerance) => rings.iter().map(|ring| ring.simplify(&tolerance)).collect(),
        None => rings,
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::rstest;

    use super::{exterior_rings, reduce_ring_precision};

    fn ring() -> geo::LineString {
        geo::LineString::from(vec![
            (139.81338523, 35.70731812),
            (139.81449311, 35.70731812),
            (139.81449311, 35.70832766),
            (139.81338523, 35.70731812),
        ])
    }

    fn polygon(offset: f64) -> geo::Polygon {
        geo::Polygon::new(
            geo::LineString::from(vec![
                (offset, 0.0),
                (offset + 1.0, 0.0),
                (offset + 1.0, 1.0),
                (offset, 0.0),
            ]),
            vec![],
        )
    }

    #[rstest]
    #[case(7, 139.8133852, 35.7073181)]
    #[case(5, 139.81339, 35.70732)]
    #[case(2, 139.81, 35.71)]
    fn test_reduce_ring_precision_rounds_each_coordinate(
        #[case] precision: u32,
        #[case] expected_x: f64,
        #[case] expected_y: f64,
    ) {
        let reduced = reduce_ring_precision(&ring(), precision);
        let first = reduced.coords().next().unwrap();
        assert_relative_eq!(first.x, expected_x);
        assert_relative_eq!(first.y, expected_y);
    }

    #[rstest]
    fn test_reduce_ring_precision_keeps_vertex_count() {
        let original = ring();
        let reduced = reduce_ring_precision(&original, 3);
        assert_eq!(reduced.coords().count(), original.coords().count());
    }

    #[rstest]
    fn test_exterior_rings_of_polygon() {
        let geometry = geo::Geometry::Polygon(polygon(0.0));
        let rings = exterior_rings(&geometry, None);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].coords().count(), 4);
    }

    #[rstest]
    fn test_exterior_rings_of_multi_polygon_yield_one_ring_per_member() {
        let geometry =
            geo::Geometry::MultiPolygon(geo::MultiPolygon(vec![polygon(0.0), polygon(10.0), polygon(20.0)]));
        let rings = exterior_rings(&geometry, None);
        assert_eq!(rings.len(), 3);
    }

    #[rstest]
    fn test_exterior_rings_drop_holes() {
        let shell = geo::LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 0.0)]);
        let hole = geo::LineString::from(vec![(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 1.0)]);
        let geometry = geo::Geometry::Polygon(geo::Polygon::new(shell.clone(), vec![hole]));
        let rings = exterior_rings(&geometry, None);
        assert_eq!(rings, vec![shell]);
    }

    #[rstest]
    fn test_exterior_rings_of_non_polygon_geometry_are_empty() {
        let geometry = geo::Geometry::Point(geo::Point::new(1.0, 2.0));
        assert!(exterior_rings(&geometry, None).is_empty());
    }

    #[rstest]
    fn test_simplification_removes_near_collinear_vertices() {
        let geometry = geo::Geometry::Polygon(geo::Polygon::new(
            geo::LineString::from(vec![
                (0.0, 0.0),
                (5.0, 0.000001),
                (10.0, 0.0),
                (10.0, 10.0),
                (0.0, 0.0),
            ]),
            vec![],
        ));
        let rings = exterior_rings(&geometry, Some(0.00001));
        assert_eq!(rings[0].coords().count(), 4);
    }
}
