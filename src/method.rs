//! # Method Table
//!
//! Static row data for the plain course of Plain Bob Doubles.
//!
//! ## Rows
//! A row is one complete striking sequence: each of the five working bells
//! struck once. The tenor (bell 6) covers behind every row, so the striking
//! order the scheduler sees always has six places with the cover last.
//!
//! ## The Plain Course
//! Forty changes take rounds back to rounds:
//! - Four leads of ten changes each
//! - Each lead is `5.1.5.1.5.1.5.1.5.125` in place notation
//! - Row 0 and row 40 are both rounds (`12345`)
//!
//! The table is pre-validated data. Nothing in the simulator derives rows
//! from place notation; the tests below only check the data is a true
//! course.
//!
//! ## Example
//! ```rust
//! use belfry::method::{Row, PLAIN_BOB_DOUBLES};
//!
//! let table = &PLAIN_BOB_DOUBLES;
//! assert_eq!(table.len(), 41);
//! assert_eq!(table.row_at(0)?, Row::ROUNDS);
//! assert_eq!(table.row_at(1)?.with_cover(), [2, 1, 4, 3, 5, 6]);
//! # Ok::<(), belfry::BelfryError>(())
//! ```

use serde::Serialize;

use crate::error::BelfryError;

/// Bell identifier: 1 is the treble, 6 the tenor.
pub type Bell = u8;

/// Number of bells that change places.
pub const WORKING_BELLS: usize = 5;

/// The tenor, ringing behind in every row.
pub const COVER: Bell = 6;

/// Places in a covered row.
pub const STAGE: usize = WORKING_BELLS + 1;

/// One row of the working bells, cover excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Row([Bell; WORKING_BELLS]);

impl Row {
    pub const ROUNDS: Row = Row([1, 2, 3, 4, 5]);

    pub const fn new(bells: [Bell; WORKING_BELLS]) -> Self {
        Row(bells)
    }

    pub fn bells(&self) -> &[Bell] {
        &self.0
    }

    /// The striking order with the tenor appended in last place.
    pub fn with_cover(&self) -> [Bell; STAGE] {
        let mut covered = [COVER; STAGE];
        covered[..WORKING_BELLS].copy_from_slice(&self.0);
        covered
    }

    /// Zero-based place of `bell` in the covered row.
    pub fn place_of(&self, bell: Bell) -> Option<usize> {
        self.with_cover().iter().position(|&b| b == bell)
    }

    /// True when every working bell appears exactly once.
    pub fn is_permutation(&self) -> bool {
        let mut seen = [false; WORKING_BELLS];
        for &bell in &self.0 {
            let idx = match (bell as usize).checked_sub(1) {
                Some(i) if i < WORKING_BELLS => i,
                _ => return false,
            };
            if seen[idx] {
                return false;
            }
            seen[idx] = true;
        }
        true
    }

    /// True when `self` follows `previous` by swapping one or more
    /// disjoint pairs of adjacent places, with everything else fixed.
    pub fn is_change_from(&self, previous: &Row) -> bool {
        if self == previous {
            return false;
        }
        let mut place = 0;
        while place < WORKING_BELLS {
            if self.0[place] == previous.0[place] {
                place += 1;
                continue;
            }
            let swapped = place + 1 < WORKING_BELLS
                && self.0[place] == previous.0[place + 1]
                && self.0[place + 1] == previous.0[place];
            if !swapped {
                return false;
            }
            place += 2;
        }
        true
    }
}

impl std::fmt::Display for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for bell in self.with_cover() {
            write!(f, "{}", bell)?;
        }
        Ok(())
    }
}

/// An immutable sequence of rows making up one plain course.
#[derive(Debug, Clone, Copy)]
pub struct MethodTable {
    name: &'static str,
    rows: &'static [Row],
}

impl MethodTable {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row at `index`, or [`BelfryError::OutOfRange`] outside `0..len`.
    pub fn row_at(&self, index: usize) -> Result<Row, BelfryError> {
        self.rows.get(index).copied().ok_or(BelfryError::OutOfRange {
            index,
            len: self.rows.len(),
        })
    }

    /// Row lookup for the scheduler, which never asks outside the course.
    /// Asserts in debug builds and clamps to the last row in release.
    pub fn row_clamped(&self, index: usize) -> Row {
        debug_assert!(
            index < self.rows.len(),
            "row {} outside method table of {} rows",
            index,
            self.rows.len()
        );
        match self.row_at(index) {
            Ok(row) => row,
            Err(_) => self.rows.last().copied().unwrap_or(Row::ROUNDS),
        }
    }

    /// Index of the last change before the course comes round.
    ///
    /// The final row of the table is rounds again; the wind-down rings it
    /// as fixed rounds, so method ringing stops one row short of it.
    pub fn last_change_index(&self) -> usize {
        self.rows.len().saturating_sub(2)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }
}

/// Plain Bob Doubles, plain course.
pub const PLAIN_BOB_DOUBLES: MethodTable = MethodTable {
    name: "Plain Bob Doubles",
    rows: &PLAIN_COURSE,
};

const PLAIN_COURSE: [Row; 41] = [
    Row([1, 2, 3, 4, 5]),
    // Lead 1
    Row([2, 1, 4, 3, 5]),
    Row([2, 4, 1, 5, 3]),
    Row([4, 2, 5, 1, 3]),
    Row([4, 5, 2, 3, 1]),
    Row([5, 4, 3, 2, 1]),
    Row([5, 3, 4, 1, 2]),
    Row([3, 5, 1, 4, 2]),
    Row([3, 1, 5, 2, 4]),
    Row([1, 3, 2, 5, 4]),
    Row([1, 3, 5, 2, 4]), // lead end
    // Lead 2
    Row([3, 1, 2, 5, 4]),
    Row([3, 2, 1, 4, 5]),
    Row([2, 3, 4, 1, 5]),
    Row([2, 4, 3, 5, 1]),
    Row([4, 2, 5, 3, 1]),
    Row([4, 5, 2, 1, 3]),
    Row([5, 4, 1, 2, 3]),
    Row([5, 1, 4, 3, 2]),
    Row([1, 5, 3, 4, 2]),
    Row([1, 5, 4, 3, 2]), // lead end
    // Lead 3
    Row([5, 1, 3, 4, 2]),
    Row([5, 3, 1, 2, 4]),
    Row([3, 5, 2, 1, 4]),
    Row([3, 2, 5, 4, 1]),
    Row([2, 3, 4, 5, 1]),
    Row([2, 4, 3, 1, 5]),
    Row([4, 2, 1, 3, 5]),
    Row([4, 1, 2, 5, 3]),
    Row([1, 4, 5, 2, 3]),
    Row([1, 4, 2, 5, 3]), // lead end
    // Lead 4
    Row([4, 1, 5, 2, 3]),
    Row([4, 5, 1, 3, 2]),
    Row([5, 4, 3, 1, 2]),
    Row([5, 3, 4, 2, 1]),
    Row([3, 5, 2, 4, 1]),
    Row([3, 2, 5, 1, 4]),
    Row([2, 3, 1, 5, 4]),
    Row([2, 1, 3, 4, 5]),
    Row([1, 2, 4, 3, 5]),
    Row([1, 2, 3, 4, 5]), // rounds
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_length() {
        assert_eq!(PLAIN_BOB_DOUBLES.len(), 41);
        assert!(!PLAIN_BOB_DOUBLES.is_empty());
        assert_eq!(PLAIN_BOB_DOUBLES.last_change_index(), 39);
    }

    #[test]
    fn test_course_comes_round() {
        let first = PLAIN_BOB_DOUBLES.row_at(0).unwrap();
        let last = PLAIN_BOB_DOUBLES.row_at(40).unwrap();
        assert_eq!(first, Row::ROUNDS);
        assert_eq!(first, last);
    }

    #[test]
    fn test_every_row_is_a_permutation() {
        for (i, row) in PLAIN_BOB_DOUBLES.iter().enumerate() {
            assert!(row.is_permutation(), "row {} ({}) repeats a bell", i, row);
        }
    }

    #[test]
    fn test_adjacent_rows_are_legal_changes() {
        for i in 0..PLAIN_BOB_DOUBLES.len() - 1 {
            let a = PLAIN_BOB_DOUBLES.row_at(i).unwrap();
            let b = PLAIN_BOB_DOUBLES.row_at(i + 1).unwrap();
            assert!(b.is_change_from(&a), "row {} ({}) -> {} ({}) is not a change", i, a, i + 1, b);
        }
    }

    #[test]
    fn test_no_row_repeats_within_the_course() {
        let rows: Vec<Row> = PLAIN_BOB_DOUBLES.iter().copied().take(40).collect();
        for (i, a) in rows.iter().enumerate() {
            for b in &rows[i + 1..] {
                assert_ne!(a, b, "row {} repeats", a);
            }
        }
    }

    #[test]
    fn test_row_at_out_of_range() {
        let err = PLAIN_BOB_DOUBLES.row_at(41).unwrap_err();
        assert!(matches!(err, BelfryError::OutOfRange { index: 41, len: 41 }));
    }

    #[test]
    fn test_with_cover_and_place_of() {
        let row = Row::new([2, 4, 1, 5, 3]);
        assert_eq!(row.with_cover(), [2, 4, 1, 5, 3, 6]);
        assert_eq!(row.place_of(1), Some(2));
        assert_eq!(row.place_of(COVER), Some(5));
        assert_eq!(row.place_of(7), None);
        assert_eq!(row.to_string(), "241536");
    }

    #[test]
    fn test_is_change_from_rejects_jumps() {
        // 3 and 5 are not adjacent
        let a = Row::new([1, 2, 5, 4, 3]);
        let b = Row::new([1, 2, 3, 4, 5]);
        assert!(!b.is_change_from(&a));
        // rotation of three bells
        let c = Row::new([1, 3, 4, 2, 5]);
        let d = Row::new([1, 4, 2, 3, 5]);
        assert!(!d.is_change_from(&c));
        // identical rows are not a change
        assert!(!a.is_change_from(&a));
    }
}
