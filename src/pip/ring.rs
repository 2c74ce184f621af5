//! Ray-casting test for a single ring.

use geo_types::Coord;

/// Returns true if `point` lies inside the closed ring described by `ring`.
///
/// A horizontal ray is cast from the point towards +x and every edge it
/// crosses flips the result. The edge `(ring[i], ring[j])` counts as a
/// crossing when exactly one endpoint lies strictly above the point's y
/// and the edge meets the ray to the right of the point. The half-open
/// comparison makes a vertex sitting exactly at the ray's height count
/// for only one of its two edges.
///
/// Rings with fewer than three vertices enclose nothing and always return
/// false. A repeated closing vertex is harmless (the zero-length edge it
/// forms never straddles the ray).
///
/// Points exactly on an edge or vertex may land on either side. That is
/// inherent to ray casting and callers must not rely on it.
pub fn point_in_ring(point: Coord<f64>, ring: &[Coord<f64>]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let vi = ring[i];
        let vj = ring[j];

        if (vi.y > point.y) != (vj.y > point.y) {
            let x_cross = vi.x + (point.y - vi.y) / (vj.y - vi.y) * (vj.x - vi.x);
            if point.x < x_cross {
                inside = !inside;
            }
        }

        j = i;
    }

    inside
}
