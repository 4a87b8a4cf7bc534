//! Geographic and planar coordinate types, and 2-D vector math.
//!
//! Two position types are provided because the engine spans two coordinate
//! systems:
//!
//! - [`GeoPoint`] — WGS-84 latitude/longitude, used only at the road-network
//!   *ingestion* boundary (§6's "consumed" road-network model and config).
//! - [`Point2D`] — a planar `(x, y)` position in metres, used for everything
//!   on the simulation hot path: agent positions, segment poly-lines,
//!   distance/intersection math.  Keeping the hot-path type a flat planar
//!   point (rather than re-deriving great-circle distances every tick) is
//!   what makes [`DoubleBuffered<Point2D>`](https://docs.rs/dt-buffer)
//!   cheap to copy and the spatial index's rectangle queries exact.

/// A WGS-84 geographic coordinate stored as single-precision floats.
///
/// Only used when talking to the outside world (loaders, config): once a
/// node has been placed on the simulated plane it is addressed as a
/// [`Point2D`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f32,
    pub lon: f32,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f32, lon: f32) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    ///
    /// Accuracy: ±0.5 % (f32 rounding); suitable for routing and contact
    /// detection at city scale. Use f64 Vincenty if sub-metre fidelity is
    /// ever required.
    pub fn distance_m(self, other: GeoPoint) -> f32 {
        const R: f32 = 6_371_000.0; // mean Earth radius, metres

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        R * c
    }

    /// Approximate bounding-box check — much cheaper than `distance_m` for
    /// quick rejection before contact detection.
    #[inline]
    pub fn within_bbox(self, center: GeoPoint, half_deg: f32) -> bool {
        (self.lat - center.lat).abs() <= half_deg
            && (self.lon - center.lon).abs() <= half_deg
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

// ── Point2D ───────────────────────────────────────────────────────────────────

/// A planar position/displacement in metres.
///
/// Doubles as both a point (an agent's location) and a vector (a
/// displacement or direction), following the source engine's own
/// `Vector2D` convention — the distinction is purely in how the caller uses
/// the value, not in the type.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub const ZERO: Point2D = Point2D { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    #[inline]
    pub fn distance(self, other: Point2D) -> f32 {
        (self - other).length()
    }

    /// Squared Euclidean distance — avoids the `sqrt` when only comparing
    /// distances (e.g. nearest-neighbor candidate screening).
    #[inline]
    pub fn distance_sq(self, other: Point2D) -> f32 {
        let d = self - other;
        d.x * d.x + d.y * d.y
    }

    /// Length of this value treated as a vector from the origin.
    #[inline]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Dot product, treating both values as vectors.
    #[inline]
    pub fn dot(self, other: Point2D) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// 2-D "cross product" (z-component of the 3-D cross product).  Positive
    /// when `other` is counter-clockwise from `self`.
    #[inline]
    pub fn cross(self, other: Point2D) -> f32 {
        self.x * other.y - self.y * other.x
    }

    /// A unit vector in the same direction, or `self` unchanged if it is the
    /// zero vector (avoids dividing by zero for a stationary agent).
    #[inline]
    pub fn normalize(self) -> Point2D {
        let len = self.length();
        if len <= f32::EPSILON {
            self
        } else {
            self / len
        }
    }

    /// `true` if `point` lies on the closed segment `[a, b]` (used to test
    /// whether an agent's projected position is still within its segment).
    pub fn line_contains(a: Point2D, b: Point2D, point: Point2D) -> bool {
        let ab = b - a;
        let ap = point - a;
        let dot_prod = ap.dot(ab);
        let sq_len = ab.dot(ab);
        dot_prod >= 0.0 && dot_prod <= sq_len
    }

    /// `true` if `point` is left of the directed line from `a` to `b`.
    pub fn is_left_of(a: Point2D, b: Point2D, point: Point2D) -> bool {
        (b - a).cross(point - a) > 0.0
    }

    /// Intersection of the infinite lines through (`p1`,`p2`) and (`p3`,`p4`).
    ///
    /// Returns `None` if the lines are parallel (determinant is zero).
    pub fn line_line_intersect(
        p1: Point2D,
        p2: Point2D,
        p3: Point2D,
        p4: Point2D,
    ) -> Option<Point2D> {
        let denom = (p1.x - p2.x) * (p3.y - p4.y) - (p1.y - p2.y) * (p3.x - p4.x);
        if denom == 0.0 {
            return None;
        }
        let co1 = p1.x * p2.y - p1.y * p2.x;
        let co2 = p3.x * p4.y - p3.y * p4.x;
        let x = (co1 * (p3.x - p4.x) - co2 * (p1.x - p2.x)) / denom;
        let y = (co1 * (p3.y - p4.y) - co2 * (p1.y - p2.y)) / denom;
        Some(Point2D::new(x, y))
    }

    /// Project `point` onto the infinite line through `a` and `b`.
    pub fn project_onto_line(point: Point2D, a: Point2D, b: Point2D) -> Point2D {
        let ab = b - a;
        let ratio = (point - a).dot(ab) / ab.dot(ab);
        a + ab * ratio
    }

    /// The point obtained by offsetting `origin` perpendicular to the
    /// direction from `origin` to `towards`, by `magnitude` (positive =
    /// left of the vector).  Used to compute lane centerlines from a
    /// segment's reference poly-line.
    pub fn perpendicular_offset(origin: Point2D, towards: Point2D, magnitude: f32) -> Point2D {
        let dir = (towards - origin).normalize();
        // Rotate the direction 90° counter-clockwise, then scale.
        let normal = Point2D::new(-dir.y, dir.x);
        origin + normal * magnitude
    }
}

impl std::ops::Add for Point2D {
    type Output = Point2D;
    #[inline]
    fn add(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point2D {
    type Output = Point2D;
    #[inline]
    fn sub(self, rhs: Point2D) -> Point2D {
        Point2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Neg for Point2D {
    type Output = Point2D;
    #[inline]
    fn neg(self) -> Point2D {
        Point2D::new(-self.x, -self.y)
    }
}

impl std::ops::Mul<f32> for Point2D {
    type Output = Point2D;
    #[inline]
    fn mul(self, rhs: f32) -> Point2D {
        Point2D::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::Div<f32> for Point2D {
    type Output = Point2D;
    #[inline]
    fn div(self, rhs: f32) -> Point2D {
        Point2D::new(self.x / rhs, self.y / rhs)
    }
}

impl std::ops::AddAssign for Point2D {
    #[inline]
    fn add_assign(&mut self, rhs: Point2D) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::fmt::Display for Point2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}
