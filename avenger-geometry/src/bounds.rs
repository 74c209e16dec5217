/// Mutable axis-aligned bounding box.
///
/// A cleared box uses the `(+MAX, +MAX, -MAX, -MAX)` sentinel so that the first
/// `add` or `union` establishes the extent. All predicates are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}

impl Bounds {
    /// Create an empty box
    pub fn new() -> Self {
        Self {
            x1: f64::MAX,
            y1: f64::MAX,
            x2: -f64::MAX,
            y2: -f64::MAX,
        }
    }

    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let mut b = Self::new();
        b.set(x1, y1, x2, y2);
        b
    }

    pub fn clear(&mut self) -> &mut Self {
        *self = Self::new();
        self
    }

    pub fn empty(&self) -> bool {
        self.x1 == f64::MAX && self.y1 == f64::MAX && self.x2 == -f64::MAX && self.y2 == -f64::MAX
    }

    pub fn equals(&self, b: &Bounds) -> bool {
        self.x1 == b.x1 && self.y1 == b.y1 && self.x2 == b.x2 && self.y2 == b.y2
    }

    /// Set the extent, swapping reversed coordinates
    pub fn set(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> &mut Self {
        if x2 < x1 {
            self.x1 = x2;
            self.x2 = x1;
        } else {
            self.x1 = x1;
            self.x2 = x2;
        }
        if y2 < y1 {
            self.y1 = y2;
            self.y2 = y1;
        } else {
            self.y1 = y1;
            self.y2 = y2;
        }
        self
    }

    pub fn add(&mut self, x: f64, y: f64) -> &mut Self {
        if x < self.x1 {
            self.x1 = x;
        }
        if y < self.y1 {
            self.y1 = y;
        }
        if x > self.x2 {
            self.x2 = x;
        }
        if y > self.y2 {
            self.y2 = y;
        }
        self
    }

    pub fn expand(&mut self, d: f64) -> &mut Self {
        self.x1 -= d;
        self.y1 -= d;
        self.x2 += d;
        self.y2 += d;
        self
    }

    /// Snap outward to integer coordinates
    pub fn round(&mut self) -> &mut Self {
        self.x1 = self.x1.floor();
        self.y1 = self.y1.floor();
        self.x2 = self.x2.ceil();
        self.y2 = self.y2.ceil();
        self
    }

    pub fn scale(&mut self, s: f64) -> &mut Self {
        self.x1 *= s;
        self.y1 *= s;
        self.x2 *= s;
        self.y2 *= s;
        self
    }

    pub fn translate(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.x1 += dx;
        self.x2 += dx;
        self.y1 += dy;
        self.y2 += dy;
        self
    }

    /// Replace the box with the bounding box of its four corners rotated by
    /// `angle` radians about `(x, y)`.
    pub fn rotate(&mut self, angle: f64, x: f64, y: f64) -> &mut Self {
        let points = self.rotated_points(angle, x, y);
        self.clear();
        for [px, py] in points {
            self.add(px, py);
        }
        self
    }

    /// The four corners rotated by `angle` radians about `(x, y)`
    pub fn rotated_points(&self, angle: f64, x: f64, y: f64) -> [[f64; 2]; 4] {
        let (sin, cos) = angle.sin_cos();
        let cx = x - x * cos + y * sin;
        let cy = y - x * sin - y * cos;
        let (x1, y1, x2, y2) = (self.x1, self.y1, self.x2, self.y2);
        [
            [cos * x1 - sin * y1 + cx, sin * x1 + cos * y1 + cy],
            [cos * x1 - sin * y2 + cx, sin * x1 + cos * y2 + cy],
            [cos * x2 - sin * y1 + cx, sin * x2 + cos * y1 + cy],
            [cos * x2 - sin * y2 + cx, sin * x2 + cos * y2 + cy],
        ]
    }

    pub fn union(&mut self, b: &Bounds) -> &mut Self {
        if b.x1 < self.x1 {
            self.x1 = b.x1;
        }
        if b.y1 < self.y1 {
            self.y1 = b.y1;
        }
        if b.x2 > self.x2 {
            self.x2 = b.x2;
        }
        if b.y2 > self.y2 {
            self.y2 = b.y2;
        }
        self
    }

    pub fn intersect(&mut self, b: &Bounds) -> &mut Self {
        if b.x1 > self.x1 {
            self.x1 = b.x1;
        }
        if b.y1 > self.y1 {
            self.y1 = b.y1;
        }
        if b.x2 < self.x2 {
            self.x2 = b.x2;
        }
        if b.y2 < self.y2 {
            self.y2 = b.y2;
        }
        self
    }

    pub fn encloses(&self, b: &Bounds) -> bool {
        self.x1 <= b.x1 && self.x2 >= b.x2 && self.y1 <= b.y1 && self.y2 >= b.y2
    }

    pub fn aligns_with(&self, b: &Bounds) -> bool {
        self.x1 == b.x1 || self.x2 == b.x2 || self.y1 == b.y1 || self.y2 == b.y2
    }

    pub fn intersects(&self, b: &Bounds) -> bool {
        !(self.x2 < b.x1 || self.x1 > b.x2 || self.y2 < b.y1 || self.y1 > b.y2)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        !(x < self.x1 || x > self.x2 || y < self.y1 || y > self.y2)
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}
