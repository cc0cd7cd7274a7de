//! Intervals of validity.
//!
//! An [`Iov`] is the half-open range `[since, until)` during which a payload
//! is the right answer for a key. Intervals are computed per resolution and
//! never stored.

use std::fmt;

/// A point in logical time.
pub type TimePoint = u64;

/// Half-open interval of validity `[since, until)`.
///
/// The default value spans the whole representable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Iov {
    pub since: TimePoint,
    pub until: TimePoint,
}

impl Default for Iov {
    fn default() -> Self {
        Self {
            since: Self::MIN,
            until: Self::MAX,
        }
    }
}

impl Iov {
    /// Smallest representable time point.
    pub const MIN: TimePoint = TimePoint::MIN;
    /// Largest representable time point, used as "unbounded above".
    pub const MAX: TimePoint = TimePoint::MAX;

    pub const fn new(since: TimePoint, until: TimePoint) -> Self {
        Self { since, until }
    }

    /// The zero-length interval `[0, 0)` used as the "out of range" signal.
    pub const fn invalid() -> Self {
        Self { since: 0, until: 0 }
    }

    pub fn valid(&self) -> bool {
        self.since < self.until
    }

    pub fn contains(&self, point: TimePoint) -> bool {
        self.since <= point && point < self.until
    }

    /// Whether `other` is a valid interval lying entirely inside `self`.
    pub fn contains_iov(&self, other: &Iov) -> bool {
        other.valid()
            && self.contains(other.since)
            && other.until > self.since
            && other.until <= self.until
    }

    /// Restrict `self` to `boundary` in place.
    ///
    /// The result may be invalid when the two intervals do not intersect.
    pub fn cut(&mut self, boundary: &Iov) -> &mut Self {
        self.since = self.since.max(boundary.since);
        self.until = self.until.min(boundary.until);
        self
    }

    /// Intersection of `self` and `other` as a new value.
    pub fn intersection(mut self, other: &Iov) -> Iov {
        self.cut(other);
        self
    }

    pub fn overlaps(&self, other: &Iov) -> bool {
        other.intersection(self).valid()
    }
}

impl fmt::Display for Iov {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.until == Self::MAX {
            write!(f, "[{}, MAX)", self.since)
        } else {
            write!(f, "[{}, {})", self.since, self.until)
        }
    }
}
