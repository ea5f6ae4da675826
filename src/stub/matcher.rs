//! Pairwise compatibility metrics between stub candidates.
//!
//! Each metric is reported on its own; thresholds belong to the caller.

use super::types::StubInfo;
use crate::error::GeometryError;
use crate::geometry::{DetectorClocks, DetectorProperties};
use nalgebra::Point3;

/// Distance (cm) within which a point counts as lying on another stub.
pub const CONTAIN_TOLERANCE_CM: f64 = 0.5;

const EPS: f64 = 1e-9;

/// True when both ends of `b` lie on `a`'s start→end segment, within
/// [`CONTAIN_TOLERANCE_CM`].
///
/// Not symmetric: a long stub contains a short one lying on it, never the
/// other way around. Test both orders for mutual containment.
pub fn stub_contains(a: &StubInfo, b: &StubInfo) -> bool {
    if a.plane().volume != b.plane().volume {
        return false;
    }
    let a0 = a.stub.start.position;
    let a1 = a.stub.end.position;
    [b.stub.start.position, b.stub.end.position]
        .iter()
        .all(|p| on_segment(&a0, &a1, p, CONTAIN_TOLERANCE_CM))
}

fn on_segment(a0: &Point3<f64>, a1: &Point3<f64>, p: &Point3<f64>, tol: f64) -> bool {
    let span = a1 - a0;
    let offset = p - a0;
    let len = span.norm();
    if len <= EPS {
        return offset.norm() <= tol;
    }
    let u = span / len;
    let along = offset.dot(&u);
    if along < -tol || along > len + tol {
        return false;
    }
    (offset - u * along).norm() <= tol
}

/// Cosine of the angle between the start→end directions of two stubs.
pub fn stub_direction_dot(a: &StubInfo, b: &StubInfo) -> Result<f64, GeometryError> {
    let da = a.stub.span();
    let db = b.stub.span();
    let (na, nb) = (da.norm(), db.norm());
    if na <= EPS || nb <= EPS {
        return Err(GeometryError::CoincidentEndpoints);
    }
    Ok((da.dot(&db) / (na * nb)).clamp(-1.0, 1.0))
}

/// Signed difference (µs, A minus B) between the end-hit times of two stubs
/// after removing each plane's readout offset.
pub fn stub_time_offset(
    a: &StubInfo,
    b: &StubInfo,
    clocks: &DetectorClocks,
    props: &DetectorProperties,
) -> f64 {
    let time = |s: &StubInfo| clocks.ticks_to_us(s.stub.end.tick - props.tick_offset(s.plane()));
    time(a) - time(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PlaneTickOffset;
    use crate::stub::types::{ChargeSample, HitId, StubCandidate, StubEndpoint, VertexHitId};
    use crate::types::{PlaneId, ViewId, VolumeId};

    fn stub(view: u8, start: [f64; 3], end: [f64; 3], end_tick: f64) -> StubInfo {
        let start = Point3::from(start);
        let end = Point3::from(end);
        let candidate = StubCandidate::new(
            PlaneId::new(VolumeId(0), ViewId(view)),
            StubEndpoint {
                position: start,
                tick: 0.0,
            },
            StubEndpoint {
                position: end,
                tick: end_tick,
            },
            vec![ChargeSample {
                position: end,
                charge: 1.0,
            }],
        )
        .unwrap();
        StubInfo {
            stub: candidate,
            particle: None,
            hits: vec![HitId(1)],
            vertex_hit: VertexHitId(0),
            vertex_hit_hit: HitId(0),
        }
    }

    #[test]
    fn containment_is_asymmetric() {
        let long = stub(2, [0.0, 0.0, 0.0], [0.0, 0.0, 10.0], 0.0);
        let short = stub(2, [0.0, 0.1, 2.0], [0.0, -0.1, 6.0], 0.0);
        assert!(stub_contains(&long, &short));
        assert!(!stub_contains(&short, &long));
        assert!(stub_contains(&long, &long));
    }

    #[test]
    fn containment_respects_tolerance() {
        let long = stub(2, [0.0, 0.0, 0.0], [0.0, 0.0, 10.0], 0.0);
        let off_axis = stub(2, [0.0, 1.0, 2.0], [0.0, 1.0, 6.0], 0.0);
        let overhang = stub(2, [0.0, 0.0, 8.0], [0.0, 0.0, 12.0], 0.0);
        let slight = stub(2, [0.0, 0.0, -0.4], [0.0, 0.0, 10.4], 0.0);
        assert!(!stub_contains(&long, &off_axis));
        assert!(!stub_contains(&long, &overhang));
        assert!(stub_contains(&long, &slight));
    }

    #[test]
    fn point_stub_contains_only_nearby_points() {
        let point = stub(1, [1.0, 1.0, 1.0], [1.0, 1.0, 1.0], 0.0);
        let near = stub(1, [1.0, 1.2, 1.0], [1.0, 1.0, 1.3], 0.0);
        let far = stub(1, [1.0, 1.0, 1.0], [1.0, 1.0, 3.0], 0.0);
        assert!(stub_contains(&point, &near));
        assert!(!stub_contains(&point, &far));
    }

    #[test]
    fn direction_dot_of_stub_with_itself_is_one() {
        let a = stub(0, [1.0, -2.0, 3.0], [4.0, 5.0, 6.5], 0.0);
        let dot = stub_direction_dot(&a, &a).unwrap();
        assert!((dot - 1.0).abs() < 1e-12);

        let reversed = stub(1, [4.0, 5.0, 6.5], [1.0, -2.0, 3.0], 0.0);
        assert!((stub_direction_dot(&a, &reversed).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn direction_dot_rejects_zero_length_stub() {
        let a = stub(0, [0.0, 0.0, 0.0], [0.0, 0.0, 5.0], 0.0);
        let point = stub(1, [0.0, 0.0, 0.0], [0.0, 0.0, 0.0], 0.0);
        assert_eq!(
            stub_direction_dot(&a, &point),
            Err(GeometryError::CoincidentEndpoints)
        );
    }

    #[test]
    fn time_offset_removes_plane_offsets() {
        let a = stub(0, [0.0; 3], [0.0, 0.0, 5.0], 110.0);
        let b = stub(2, [0.0; 3], [0.0, 0.0, 5.0], 100.0);
        let clocks = DetectorClocks { tick_period_us: 0.5 };
        let mut props = DetectorProperties::default();
        assert!((stub_time_offset(&a, &b, &clocks, &props) - 5.0).abs() < 1e-12);
        assert!((stub_time_offset(&b, &a, &clocks, &props) + 5.0).abs() < 1e-12);

        props.tick_offsets.push(PlaneTickOffset {
            plane: a.plane(),
            ticks: 10.0,
        });
        assert!(stub_time_offset(&a, &b, &clocks, &props).abs() < 1e-12);
    }
}
