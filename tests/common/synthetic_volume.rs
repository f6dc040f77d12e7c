use cubical_persistence::DenseGrid;

/// Straight line of vertices.
pub fn line(values: &[f64], threshold: f64) -> DenseGrid {
    DenseGrid::from_values(values.len(), 1, 1, threshold, values.to_vec()).unwrap()
}

/// 2D grid from rows (y index first), x fastest in each row.
pub fn plane(rows: &[&[f64]], threshold: f64) -> DenseGrid {
    let ay = rows.len();
    let ax = rows[0].len();
    let mut values = Vec::with_capacity(ax * ay);
    for row in rows {
        assert_eq!(row.len(), ax);
        values.extend_from_slice(row);
    }
    DenseGrid::from_values(ax, ay, 1, threshold, values).unwrap()
}

/// 3x3 ring of `low` values around a `high` centre.
pub fn annulus(low: f64, high: f64, threshold: f64) -> DenseGrid {
    plane(
        &[
            &[low, low, low],
            &[low, high, low],
            &[low, low, low],
        ],
        threshold,
    )
}

/// Cubic volume filled with a constant.
pub fn constant_volume(extent: usize, value: f64, threshold: f64) -> DenseGrid {
    DenseGrid::from_values(
        extent,
        extent,
        extent,
        threshold,
        vec![value; extent * extent * extent],
    )
    .unwrap()
}

/// 3x3x3 shell of `low` values enclosing a `high` centre voxel.
pub fn hollow_cube(low: f64, high: f64, threshold: f64) -> DenseGrid {
    let mut values = vec![low; 27];
    values[13] = high; // centre of the 3x3x3 block
    DenseGrid::from_values(3, 3, 3, threshold, values).unwrap()
}
