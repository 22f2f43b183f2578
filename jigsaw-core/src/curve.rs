//! Randomised tab curve for one tile edge.
//!
//! Curves live in a unit frame: they run from [`UNIT_START`] `(0, 0)` to
//! [`UNIT_END`] `(1, 0)`, `x` is the position along the edge and `y` the bulge
//! away from the edge in units of the tile size perpendicular to it. A
//! positive `y` bulges out of the tile that owns the edge.

use kurbo::{CubicBez, ParamCurve};
use rand::Rng;

use crate::geometry::{Point, clamp_span};

pub const DEFAULT_SAMPLES: usize = 100;
pub const UNIT_START: Point = Point { x: 0.0, y: 0.0 };
pub const UNIT_END: Point = Point { x: 1.0, y: 0.0 };

/// Hard limit on the bulge. Two opposite tabs of one tile never meet.
pub const MAX_DEPTH: f64 = 0.35;
pub const MAX_WAYPOINTS: usize = 3;
/// Minimum spacing along the edge between consecutive waypoints.
const MIN_GAP: f64 = 0.04;
/// Lower end of a waypoint's depth corridor, relative to its upper end.
const DEPTH_FLOOR: f64 = 0.7;
/// Depth corridors never shrink below this fraction of the hump depth.
const MIN_SPREAD: f64 = 0.3;

/// The two hump families a curve is biased towards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hump {
    /// Deep, narrow knob near the middle of the edge.
    Tall,
    /// Shallow bump spread over most of the edge.
    Broad,
}

impl Hump {
    pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Hump::Tall
        } else {
            Hump::Broad
        }
    }

    fn span(self) -> (f64, f64) {
        match self {
            Hump::Tall => (0.35, 0.65),
            Hump::Broad => (0.25, 0.75),
        }
    }

    fn depth(self) -> f64 {
        match self {
            Hump::Tall => 0.30,
            Hump::Broad => 0.22,
        }
    }

    fn center(self) -> f64 {
        let (lo, hi) = self.span();
        (lo + hi) * 0.5
    }
}

/// Pick 1..=3 waypoints left to right. Each waypoint's slot along the edge is
/// an even share of whatever room the previous one left, and its depth
/// corridor narrows with distance from the hump centre.
///
/// Never zero: a curve with no waypoint is a straight line, which would make
/// an interior edge look like a border.
pub fn waypoints<R: Rng + ?Sized>(rng: &mut R, hump: Hump) -> Vec<Point> {
    let (u_min, u_max) = hump.span();
    let count = rng.random_range(1..=MAX_WAYPOINTS);
    let half = (u_max - u_min) * 0.5;
    let mut lo = u_min;
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let remaining = (count - i) as f64;
        let hi = (lo + (u_max - lo) / remaining).max(lo);
        let u = if hi > lo { rng.random_range(lo..=hi) } else { lo };
        let spread = (1.0 - (u - hump.center()).abs() / half).clamp(MIN_SPREAD, 1.0);
        let v_hi = (hump.depth() * spread).min(MAX_DEPTH);
        let v = rng.random_range(v_hi * DEPTH_FLOOR..=v_hi);
        out.push(Point::new(u, v));
        lo = (u + MIN_GAP).min(u_max);
    }
    out
}

/// Catmull-Rom spline through `knots` as cubic Bézier segments. End knots are
/// duplicated so the curve starts and ends exactly on them.
///
/// Control points are pinned between their segment's knots along `x`. For
/// knots with ascending `x` every segment is then strictly increasing in `x`,
/// so the chain is a graph over the edge and cannot loop back on itself.
pub fn catmull_rom(knots: &[Point]) -> Vec<CubicBez> {
    if knots.len() < 2 {
        return Vec::new();
    }
    let at = |i: isize| -> kurbo::Point {
        let i = i.clamp(0, knots.len() as isize - 1) as usize;
        knots[i].into()
    };
    (0..knots.len() as isize - 1)
        .map(|i| {
            let (p0, p1, p2, p3) = (at(i - 1), at(i), at(i + 1), at(i + 2));
            let c1 = p1 + (p2 - p0) / 6.0;
            let c2 = p2 - (p3 - p1) / 6.0;
            let c1 = kurbo::Point::new(clamp_span(c1.x, p1.x, p2.x), c1.y);
            let c2 = kurbo::Point::new(clamp_span(c2.x, c1.x, p2.x), c2.y);
            CubicBez::new(p1, c1, c2, p2)
        })
        .collect()
}

/// Evaluate a piecewise curve at `samples` evenly spaced parameters over the
/// whole chain.
pub fn sample_segments(segments: &[CubicBez], samples: usize) -> Vec<Point> {
    if segments.is_empty() || samples == 0 {
        return Vec::new();
    }
    if samples == 1 {
        return vec![segments[0].p0.into()];
    }
    let n = segments.len();
    (0..samples)
        .map(|k| {
            let t = k as f64 / (samples - 1) as f64 * n as f64;
            let seg = (t.floor() as usize).min(n - 1);
            segments[seg].eval(t - seg as f64).into()
        })
        .collect()
}

/// Build one random tab curve and return its lookup table of `samples`
/// points from [`UNIT_START`] to [`UNIT_END`].
pub fn sample_curve<R: Rng + ?Sized>(rng: &mut R, samples: usize) -> Vec<Point> {
    let hump = Hump::pick(rng);
    let mut knots = vec![UNIT_START];
    knots.extend(waypoints(rng, hump));
    knots.push(UNIT_END);
    let mut lut: Vec<Point> = sample_segments(&catmull_rom(&knots), samples)
        .into_iter()
        .map(|p| Point::new(p.x.clamp(0.0, 1.0), p.y.clamp(-MAX_DEPTH, MAX_DEPTH)))
        .collect();
    if let Some(first) = lut.first_mut() {
        *first = UNIT_START;
    }
    if let Some(last) = lut.last_mut() {
        *last = UNIT_END;
    }
    tracing::trace!(?hump, waypoints = knots.len() - 2, samples, "sampled tab curve");
    lut
}
