use std::fmt;

/// Integer axis-aligned region, `[left, right) x [top, bottom)`
///
/// Fields are not canonicalized: while a rectangle is being built `left` may
/// transiently exceed `right`, so `width()` and `height()` report absolute
/// spans. Rectangles returned by the slicer always satisfy `left < right` and
/// `top < bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rectangle {
    /// Left edge (inclusive)
    pub left: i32,
    /// Right edge (exclusive)
    pub right: i32,
    /// Top edge (inclusive)
    pub top: i32,
    /// Bottom edge (exclusive)
    pub bottom: i32,
}

impl Rectangle {
    /// Create a new rectangle
    pub fn new(left: i32, right: i32, top: i32, bottom: i32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Rectangle covering a whole `width x height` buffer
    pub fn full(width: usize, height: usize) -> Self {
        Self::new(0, width as i32, 0, height as i32)
    }

    /// Horizontal span
    pub fn width(&self) -> i32 {
        (self.right - self.left).abs()
    }

    /// Vertical span
    pub fn height(&self) -> i32 {
        (self.top - self.bottom).abs()
    }

    /// Number of pixels covered
    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    /// True when the rectangle covers no pixels or is inverted
    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Multiply every edge by `factor` (maps between resolutions)
    pub fn scale(&self, factor: i32) -> Self {
        Self {
            left: self.left * factor,
            right: self.right * factor,
            top: self.top * factor,
            bottom: self.bottom * factor,
        }
    }

    /// Translate every edge by `(dx, dy)` (maps a sub-image frame into its parent)
    pub fn expand(&self, dx: i32, dy: i32) -> Self {
        Self {
            left: self.left + dx,
            right: self.right + dx,
            top: self.top + dy,
            bottom: self.bottom + dy,
        }
    }

    /// Whether `other` lies entirely inside `self`
    pub fn contains_rect(&self, other: &Rectangle) -> bool {
        other.left >= self.left
            && other.right <= self.right
            && other.top >= self.top
            && other.bottom <= self.bottom
    }

    /// Whether the two rectangles share at least one pixel
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{})x[{},{})",
            self.left, self.right, self.top, self.bottom
        )
    }
}
