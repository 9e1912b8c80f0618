//! Inclusive value ranges with optional bounds.

use serde::Deserialize;

/// An inclusive range where either end may be open.
///
/// An unset bound accepts everything on that side, so the default range
/// accepts every value.
///
/// # Examples
///
/// ```
/// use railpath::filter::ValueRange;
///
/// let range = ValueRange::new(Some(10), Some(20));
/// assert!(range.contains(&10));
/// assert!(range.contains(&20));
/// assert!(!range.contains(&21));
///
/// assert!(ValueRange::<i64>::default().contains(&-5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValueRange<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> Default for ValueRange<T> {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
        }
    }
}

impl<T: PartialOrd> ValueRange<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    /// Range with only a lower bound.
    pub fn at_least(min: T) -> Self {
        Self::new(Some(min), None)
    }

    /// Range with only an upper bound.
    pub fn at_most(max: T) -> Self {
        Self::new(None, Some(max))
    }

    pub fn contains(&self, value: &T) -> bool {
        self.min.as_ref().is_none_or(|min| value >= min)
            && self.max.as_ref().is_none_or(|max| value <= max)
    }

    /// Whether neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}
