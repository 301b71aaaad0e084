//! Closed Catmull-Rom curves expressed as cubic Bézier segments.

use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicSegment {
    pub c1: Vec2,
    pub c2: Vec2,
    pub to: Vec2,
}

/// Smooth closed path through every point of a ring.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClosedPath {
    pub start: Vec2,
    pub segments: Vec<CubicSegment>,
}

/// Fit a closed uniform Catmull-Rom spline through `points`. Neighbors wrap
/// around the ring, so the last segment returns to the first point without a
/// seam. Fewer than three points yield a straight polygon.
pub fn closed_path(points: &[Vec2]) -> ClosedPath {
    let n = points.len();
    if n == 0 {
        return ClosedPath::default();
    }
    if n < 3 {
        let segments = (1..=n)
            .map(|i| {
                let a = points[i - 1];
                let b = points[i % n];
                CubicSegment { c1: a, c2: b, to: b }
            })
            .collect();
        return ClosedPath {
            start: points[0],
            segments,
        };
    }
    let at = |i: usize| points[i % n];
    let segments = (0..n)
        .map(|i| {
            let p0 = at(i + n - 1);
            let p1 = at(i);
            let p2 = at(i + 1);
            let p3 = at(i + 2);
            CubicSegment {
                c1: p1 + (p2 - p0) / 6.0,
                c2: p2 - (p3 - p1) / 6.0,
                to: p2,
            }
        })
        .collect();
    ClosedPath {
        start: points[0],
        segments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_visits_every_point_and_closes() {
        let pts: Vec<Vec2> = (0..12)
            .map(|i| {
                let a = i as f32 / 12.0 * std::f32::consts::TAU;
                Vec2::new(a.cos(), a.sin()) * 10.0
            })
            .collect();
        let path = closed_path(&pts);
        assert_eq!(path.segments.len(), pts.len());
        assert_eq!(path.start, pts[0]);
        for (i, seg) in path.segments.iter().enumerate() {
            assert_eq!(seg.to, pts[(i + 1) % pts.len()]);
        }
        assert_eq!(path.segments.last().map(|s| s.to), Some(pts[0]));
    }

    #[test]
    fn tangents_are_continuous_at_joins() {
        let pts = [
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 1.0),
            Vec2::new(5.0, 5.0),
            Vec2::new(1.0, 4.0),
        ];
        let path = closed_path(&pts);
        for i in 0..pts.len() {
            let seg = path.segments[i];
            let next = path.segments[(i + 1) % pts.len()];
            let incoming = seg.to - seg.c2;
            let outgoing = next.c1 - seg.to;
            assert!((incoming - outgoing).length() < 1e-5);
        }
    }

    #[test]
    fn empty_ring_is_empty_path() {
        assert!(closed_path(&[]).segments.is_empty());
    }
}
