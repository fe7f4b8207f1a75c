//! The polymorphic container layer: a single 48-bit high key owns one container,
//! which self-converts between array, bitmap, and run forms as its contents change.

pub mod array;
pub mod bitmap;
pub mod run;

use core::ops::RangeInclusive;

use array::ArrayContainer;
use bitmap::BitmapArray;
use run::RunContainer;

/// Cardinality above which an array container converts to a bitmap.
pub const ARRAY_LIMIT: u64 = 4096;

/// Run count above which a run-union no longer prefers staying a run.
pub const MAX_RUNS_BEFORE_CONVERT: usize = 2047;

#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Container {
    Array(ArrayContainer),
    Bitmap(BitmapArray),
    Run(RunContainer),
}

impl Container {
    pub fn new() -> Self {
        Container::Array(ArrayContainer::new())
    }

    pub fn len(&self) -> u64 {
        match self {
            Container::Array(c) => c.len(),
            Container::Bitmap(c) => c.len(),
            Container::Run(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, index: u16) -> bool {
        match self {
            Container::Array(c) => c.contains(index),
            Container::Bitmap(c) => c.contains(index),
            Container::Run(c) => c.contains(index),
        }
    }

    pub fn contains_range(&self, range: RangeInclusive<u16>) -> bool {
        match self {
            Container::Array(c) => c.contains_range(range),
            Container::Bitmap(c) => c.contains_range(range),
            Container::Run(c) => c.contains_range(range),
        }
    }

    /// After the array grows past [`ARRAY_LIMIT`], upgrade to a bitmap.
    fn ensure_correct_store(self) -> Self {
        match self {
            Container::Array(c) if c.len() > ARRAY_LIMIT => Container::Bitmap(c.to_bitmap()),
            Container::Bitmap(c) if c.len() <= ARRAY_LIMIT => Container::Array(c.to_array()),
            other => other,
        }
    }

    pub fn insert(&mut self, index: u16) -> bool {
        let inserted = match self {
            Container::Array(c) => c.insert(index),
            Container::Bitmap(c) => c.insert(index),
            Container::Run(c) => c.insert(index),
        };
        if inserted {
            self.convert_in_place();
        }
        inserted
    }

    pub fn remove(&mut self, index: u16) -> bool {
        let removed = match self {
            Container::Array(c) => c.remove(index),
            Container::Bitmap(c) => c.remove(index),
            Container::Run(c) => c.remove(index),
        };
        if removed {
            self.convert_in_place();
        }
        removed
    }

    /// Apply `ensure_correct_store` in place, replacing `self` with a temporary
    /// empty value only for the instant of the conversion (the container is
    /// never observably empty between the two halves of the swap).
    fn convert_in_place(&mut self) {
        let taken = core::mem::replace(self, Container::Array(ArrayContainer::new()));
        *self = taken.ensure_correct_store();
    }

    pub fn insert_range(&mut self, range: RangeInclusive<u16>) -> u64 {
        let n = match self {
            Container::Array(c) => c.insert_range(range),
            Container::Bitmap(c) => c.insert_range(range),
            Container::Run(c) => c.insert_range(range),
        };
        if n > 0 {
            self.convert_in_place();
        }
        n
    }

    pub fn remove_range(&mut self, range: RangeInclusive<u16>) -> u64 {
        let n = match self {
            Container::Array(c) => c.remove_range(range),
            Container::Bitmap(c) => c.remove_range(range),
            Container::Run(c) => c.remove_range(range),
        };
        if n > 0 {
            self.convert_in_place();
        }
        n
    }

    pub fn flip_range(&mut self, range: RangeInclusive<u16>) {
        match self {
            Container::Array(c) => c.flip_range(range),
            Container::Bitmap(c) => c.flip_range(range),
            Container::Run(c) => c.flip_range(range),
        }
        self.convert_in_place();
    }

    /// A full [0, 0xFFFF] container, used as the seed for `flip` over an
    /// absent high key.
    pub fn full() -> Self {
        Container::Run(RunContainer::from_runs_unchecked(vec![run::Interval::new(0, u16::MAX)]))
    }

    pub fn rank(&self, index: u16) -> u64 {
        match self {
            Container::Array(c) => c.rank(index),
            Container::Bitmap(c) => c.rank(index),
            Container::Run(c) => c.rank(index),
        }
    }

    pub fn select(&self, n: u16) -> Option<u16> {
        match self {
            Container::Array(c) => c.select(n),
            Container::Bitmap(c) => c.select(n),
            Container::Run(c) => c.select(n),
        }
    }

    pub fn min(&self) -> Option<u16> {
        match self {
            Container::Array(c) => c.min(),
            Container::Bitmap(c) => c.min(),
            Container::Run(c) => c.min(),
        }
    }

    pub fn max(&self) -> Option<u16> {
        match self {
            Container::Array(c) => c.max(),
            Container::Bitmap(c) => c.max(),
            Container::Run(c) => c.max(),
        }
    }

    pub fn iter(&self) -> ContainerIter<'_> {
        match self {
            Container::Array(c) => ContainerIter::Array(c.as_slice().iter()),
            Container::Bitmap(c) => ContainerIter::Bitmap(Box::new(c.iter())),
            Container::Run(c) => ContainerIter::Run(Box::new(c.iter())),
        }
    }

    fn to_array(&self) -> ArrayContainer {
        match self {
            Container::Array(c) => c.clone(),
            Container::Bitmap(c) => c.to_array(),
            Container::Run(c) => c.to_array(),
        }
    }

    fn to_bitmap(&self) -> BitmapArray {
        match self {
            Container::Array(c) => c.to_bitmap(),
            Container::Bitmap(c) => c.clone(),
            Container::Run(c) => c.to_bitmap(),
        }
    }

    fn to_run(&self) -> RunContainer {
        match self {
            Container::Run(c) => c.clone(),
            Container::Array(c) => {
                let mut runs = Vec::new();
                let mut it = c.as_slice().iter().peekable();
                while let Some(&start) = it.next() {
                    let mut end = start;
                    while it.peek() == Some(&&(end + 1)) {
                        end += 1;
                        it.next();
                    }
                    runs.push(run::Interval::new(start, end));
                }
                RunContainer::from_runs_unchecked(runs)
            }
            Container::Bitmap(c) => {
                let mut runs = Vec::new();
                let mut it = c.iter().peekable();
                while let Some(start) = it.next() {
                    let mut end = start;
                    while it.peek() == Some(&(end + 1)) {
                        end += 1;
                        it.next();
                    }
                    runs.push(run::Interval::new(start, end));
                }
                RunContainer::from_runs_unchecked(runs)
            }
        }
    }

    /// `Array ∪ Array → Array`; any pairing touching `Bitmap` converges on
    /// `Bitmap`; `Run ∪ Run` stays `Run` below [`MAX_RUNS_BEFORE_CONVERT`] runs.
    pub fn or(&self, rhs: &Self) -> Self {
        let result = match (self, rhs) {
            (Container::Array(a), Container::Array(b)) => Container::Array(a.or(b)),
            (Container::Run(a), Container::Run(b)) => {
                let merged = a.or(b);
                if merged.run_count() <= MAX_RUNS_BEFORE_CONVERT {
                    Container::Run(merged)
                } else {
                    Container::Bitmap(merged.to_bitmap())
                }
            }
            (Container::Bitmap(_), _) | (_, Container::Bitmap(_)) => {
                Container::Bitmap(self.to_bitmap().or(&rhs.to_bitmap()))
            }
            _ => Container::Array(self.to_array().or(&rhs.to_array())),
        };
        result.ensure_correct_store()
    }

    pub fn and(&self, rhs: &Self) -> Self {
        let result = match (self, rhs) {
            (Container::Array(a), Container::Array(b)) => Container::Array(a.and(b)),
            (Container::Run(a), Container::Run(b)) => {
                let merged = a.and(b);
                if merged.run_count() <= MAX_RUNS_BEFORE_CONVERT {
                    Container::Run(merged)
                } else {
                    Container::Bitmap(merged.to_bitmap())
                }
            }
            (Container::Bitmap(a), Container::Bitmap(b)) => Container::Bitmap(a.and(b)),
            _ => Container::Array(self.to_array().and(&rhs.to_array())),
        };
        result.ensure_correct_store()
    }

    pub fn sub(&self, rhs: &Self) -> Self {
        let result = match (self, rhs) {
            (Container::Array(a), Container::Array(b)) => Container::Array(a.sub(b)),
            (Container::Run(a), Container::Run(b)) => {
                let merged = a.sub(b);
                if merged.run_count() <= MAX_RUNS_BEFORE_CONVERT {
                    Container::Run(merged)
                } else {
                    Container::Bitmap(merged.to_bitmap())
                }
            }
            (Container::Bitmap(a), Container::Bitmap(b)) => Container::Bitmap(a.sub(b)),
            _ => Container::Array(self.to_array().sub(&rhs.to_array())),
        };
        result.ensure_correct_store()
    }

    pub fn xor(&self, rhs: &Self) -> Self {
        let result = match (self, rhs) {
            (Container::Array(a), Container::Array(b)) => Container::Array(a.xor(b)),
            (Container::Run(a), Container::Run(b)) => {
                let merged = a.xor(b);
                if merged.run_count() <= MAX_RUNS_BEFORE_CONVERT {
                    Container::Run(merged)
                } else {
                    Container::Bitmap(merged.to_bitmap())
                }
            }
            (Container::Bitmap(a), Container::Bitmap(b)) => Container::Bitmap(a.xor(b)),
            _ => Container::Array(self.to_array().xor(&rhs.to_array())),
        };
        result.ensure_correct_store()
    }

    pub fn ior(&mut self, rhs: &Self) {
        *self = self.or(rhs);
    }

    pub fn iand(&mut self, rhs: &Self) {
        *self = self.and(rhs);
    }

    pub fn isub(&mut self, rhs: &Self) {
        *self = self.sub(rhs);
    }

    pub fn ixor(&mut self, rhs: &Self) {
        *self = self.xor(rhs);
    }

    /// Estimated serialized byte size, used both as the wire-size and as the
    /// documented proxy for in-memory footprint (see DESIGN.md).
    pub fn serialized_byte_size(&self) -> usize {
        match self {
            Container::Array(c) => c.byte_size(),
            Container::Bitmap(c) => c.byte_size(),
            Container::Run(c) => c.byte_size(),
        }
    }

    fn run_count(&self) -> u64 {
        match self {
            Container::Array(c) => c.count_runs(),
            Container::Bitmap(c) => c.count_runs(),
            Container::Run(c) => c.run_count() as u64,
        }
    }

    /// `2 + 4·r < size(current_form)` ⇒ convert to run form.
    pub fn run_optimize(&mut self) -> bool {
        if matches!(self, Container::Run(_)) {
            return false;
        }
        let r = self.run_count();
        let run_size = RunContainer::serialized_byte_size(r as usize);
        if run_size < self.serialized_byte_size() {
            *self = Container::Run(self.to_run());
            true
        } else {
            false
        }
    }

    pub fn trim(&mut self) {
        match self {
            Container::Array(c) => c.trim(),
            Container::Bitmap(c) => c.trim(),
            Container::Run(c) => c.trim(),
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Container::new()
    }
}

pub enum ContainerIter<'a> {
    Array(core::slice::Iter<'a, u16>),
    Bitmap(Box<dyn Iterator<Item = u16> + 'a>),
    Run(Box<dyn Iterator<Item = u16> + 'a>),
}

impl Iterator for ContainerIter<'_> {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        match self {
            ContainerIter::Array(it) => it.next().copied(),
            ContainerIter::Bitmap(it) => it.next(),
            ContainerIter::Run(it) => it.next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_upgrades_to_bitmap_past_limit() {
        let mut c = Container::new();
        for v in 0..=ARRAY_LIMIT as u16 {
            c.insert(v);
        }
        assert!(matches!(c, Container::Bitmap(_)));
    }

    #[test]
    fn bitmap_downgrades_to_array() {
        let mut c = Container::Bitmap(BitmapArray::new());
        c.insert_range(0..=10);
        assert!(matches!(c, Container::Array(_)));
    }

    #[test]
    fn run_run_and_sub_downgrade_past_run_limit() {
        use run::Interval;

        let run_count = MAX_RUNS_BEFORE_CONVERT + 1;
        let spread: Vec<Interval> =
            (0..run_count as u16).map(|i| Interval::new(2 * i, 2 * i)).collect();
        let covering = Container::Run(RunContainer::from_runs_unchecked(vec![Interval::new(
            0,
            2 * run_count as u16,
        )]));
        let scattered = Container::Run(RunContainer::from_runs_unchecked(spread));

        let anded = covering.and(&scattered);
        assert!(matches!(anded, Container::Bitmap(_)), "and() left an oversized Run container");
        assert_eq!(anded.len(), run_count as u64);

        let subbed = covering.sub(&scattered);
        assert!(matches!(subbed, Container::Bitmap(_)), "sub() left an oversized Run container");
    }

    #[test]
    fn run_optimize_converts_dense_array() {
        let mut c = Container::new();
        c.insert_range(1000..=1999);
        assert!(matches!(c, Container::Array(_)));
        assert!(c.run_optimize());
        assert!(matches!(c, Container::Run(_)));
        assert_eq!(c.len(), 1000);
    }

    #[test]
    fn self_alias_laws() {
        let mut c = Container::new();
        for v in [1u16, 2, 3] {
            c.insert(v);
        }
        let orig = c.clone();
        assert_eq!(c.or(&orig), orig);
        assert_eq!(c.and(&orig), orig);
        assert_eq!(c.xor(&orig).len(), 0);
        assert_eq!(c.sub(&orig).len(), 0);
    }
}
