use std::ops::{Add, Sub};

use geo::{BoundingRect, Contains};
use geo_types::{LineString, MultiPoint, Polygon, Rect};
use serde::{Deserialize, Serialize};

/// Basic two dimensional point used for geometry operations.
/// Canvas convention: x grows to the right, y grows downwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

impl From<Point> for kurbo::Point {
    fn from(p: Point) -> Self {
        kurbo::Point::new(p.x, p.y)
    }
}

impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Point { x: p.x, y: p.y }
    }
}

impl From<Point> for geo_types::Point<f64> {
    fn from(p: Point) -> Self {
        geo_types::Point::new(p.x, p.y)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

/// Minimal path-building surface a drawing context has to offer.
///
/// Piece silhouettes only ever use straight segments, so this is all the
/// renderer needs to implement.
pub trait PathSink {
    fn begin_path(&mut self) {}
    fn move_to(&mut self, p: Point);
    fn line_to(&mut self, p: Point);
    fn close_path(&mut self);
}

impl PathSink for kurbo::BezPath {
    fn move_to(&mut self, p: Point) {
        kurbo::BezPath::move_to(self, p);
    }
    fn line_to(&mut self, p: Point) {
        kurbo::BezPath::line_to(self, p);
    }
    fn close_path(&mut self) {
        kurbo::BezPath::close_path(self);
    }
}

/// Axis-aligned rectangle anchored at `origin` with the given size.
pub fn rect_at(origin: Point, w: f64, h: f64) -> Rect<f64> {
    Rect::new((origin.x, origin.y), (origin.x + w, origin.y + h))
}

/// Union bounding rectangle of a set of rectangles, `None` when empty.
pub fn bounding_rect<I>(rects: I) -> Option<Rect<f64>>
where
    I: IntoIterator<Item = Rect<f64>>,
{
    let corners: Vec<geo_types::Point<f64>> = rects
        .into_iter()
        .flat_map(|r| [geo_types::Point::from(r.min()), geo_types::Point::from(r.max())])
        .collect();
    MultiPoint::from(corners).bounding_rect()
}

/// Point-in-polygon test on an open ring (the closing edge is implied).
pub fn polygon_contains(ring: &[Point], p: Point) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let exterior: LineString<f64> = ring.iter().map(|q| (q.x, q.y)).collect();
    Polygon::new(exterior, Vec::new()).contains(&geo_types::Point::from(p))
}

/// Clamp `v` into `[lo, hi]` without panicking on an inverted range.
/// When the range is inverted the lower bound wins.
pub fn clamp_span(v: f64, lo: f64, hi: f64) -> f64 {
    v.min(hi).max(lo)
}
