//! Array dimensions (axes).

use serde::{Deserialize, Serialize};

/// Value the backend reports for a dimension without a populated bound.
pub const UNBOUNDED: i64 = 4_611_686_018_427_387_903;

/// One axis of an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    /// Declared lower bound.
    pub min: i64,
    /// Declared upper bound.
    pub max: i64,
    /// Lowest index holding data, or [`UNBOUNDED`].
    pub cur_min: i64,
    /// Highest index holding data, or [`UNBOUNDED`].
    pub cur_max: i64,
    pub chunk_size: i64,
    pub overlap: i64,
}

impl Dimension {
    /// A dimension whose populated bounds equal its declared bounds.
    pub fn new(name: impl Into<String>, min: i64, max: i64) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            cur_min: min,
            cur_max: max,
            chunk_size: (max - min).saturating_add(1).max(1),
            overlap: 0,
        }
    }

    pub fn with_current(mut self, cur_min: i64, cur_max: i64) -> Self {
        self.cur_min = cur_min;
        self.cur_max = cur_max;
        self
    }

    pub fn with_chunking(mut self, chunk_size: i64, overlap: i64) -> Self {
        self.chunk_size = chunk_size;
        self.overlap = overlap;
        self
    }

    pub fn true_min(&self) -> i64 {
        if is_unbounded(self.cur_min) {
            self.min
        } else {
            self.cur_min
        }
    }

    pub fn true_max(&self) -> i64 {
        if is_unbounded(self.cur_max) {
            self.max
        } else {
            self.cur_max
        }
    }

    /// Number of populated cells along this axis.
    pub fn true_length(&self) -> i64 {
        self.true_max() - self.true_min() + 1
    }

    pub fn contains(&self, index: i64) -> bool {
        index >= self.true_min() && index <= self.true_max()
    }
}

/// The sentinel shows up with either sign.
fn is_unbounded(v: i64) -> bool {
    v.unsigned_abs() == UNBOUNDED as u64
}
