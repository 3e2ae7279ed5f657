//! One-axis domain decomposition.
//!
//! The X axis is split into contiguous, near-equal [`Partition`]s, one per
//! participant. Y is never split, so every partition spans the full grid
//! height and the top and bottom boundaries stay local.

use std::ops::Range;

use crate::error::ConfigError;
use crate::id::Rank;

/// Half-open interval `[start, end)` of global X columns owned by one rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Partition {
    start: usize,
    end: usize,
}

impl Partition {
    /// Compute the partition of `rank` when `grid_x` columns are split
    /// across `participants`.
    ///
    /// `start = ⌊r·Gx/n⌋`, `end = ⌊(r+1)·Gx/n⌋`, and the last rank always
    /// ends at `Gx`. Widths differ by at most one. With `n > Gx` some
    /// ranks receive an empty partition.
    ///
    /// # Examples
    ///
    /// ```
    /// use heatgrid_core::{Partition, Rank};
    ///
    /// let p = Partition::for_rank(10, 3, Rank(1)).unwrap();
    /// assert_eq!(p.range(), 3..6);
    /// let last = Partition::for_rank(10, 3, Rank(2)).unwrap();
    /// assert_eq!(last.range(), 6..10);
    /// ```
    pub fn for_rank(grid_x: usize, participants: usize, rank: Rank) -> Result<Self, ConfigError> {
        if participants == 0 {
            return Err(ConfigError::ZeroParticipants);
        }
        let r = rank.index();
        if r >= participants {
            return Err(ConfigError::RankOutOfRange { rank, participants });
        }
        let overflow = ConfigError::PartitionOverflow {
            grid_x,
            participants,
        };
        let start = r.checked_mul(grid_x).ok_or(overflow.clone())? / participants;
        let end = if r + 1 == participants {
            grid_x
        } else {
            (r + 1).checked_mul(grid_x).ok_or(overflow)? / participants
        };
        Ok(Self { start, end })
    }

    /// First owned global column.
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last owned global column.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of owned columns (`local_x`).
    pub fn width(&self) -> usize {
        self.end - self.start
    }

    /// Whether the partition owns no columns.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Owned columns as a range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Partitions of every rank for one `(grid_x, participants)` pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decomposition {
    grid_x: usize,
    partitions: Vec<Partition>,
}

impl Decomposition {
    /// Split `grid_x` columns across `participants`.
    pub fn new(grid_x: usize, participants: usize) -> Result<Self, ConfigError> {
        if participants == 0 {
            return Err(ConfigError::ZeroParticipants);
        }
        let partitions = (0..participants)
            .map(|r| Partition::for_rank(grid_x, participants, Rank(r)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { grid_x, partitions })
    }

    /// Global X extent.
    pub fn grid_x(&self) -> usize {
        self.grid_x
    }

    /// Number of participants.
    pub fn participants(&self) -> usize {
        self.partitions.len()
    }

    /// Partition of `rank`, if it exists.
    pub fn partition(&self, rank: Rank) -> Option<Partition> {
        self.partitions.get(rank.index()).copied()
    }

    /// All partitions in rank order.
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// Per-rank element counts for gathering halo-stripped slices of
    /// `height` rows: `width_i · height`.
    pub fn gather_counts(&self, height: usize) -> Vec<usize> {
        self.partitions.iter().map(|p| p.width() * height).collect()
    }

    /// Per-rank displacements in the flat gather buffer: `start_i · height`.
    pub fn gather_displacements(&self, height: usize) -> Vec<usize> {
        self.partitions.iter().map(|p| p.start() * height).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn single_participant_owns_everything() {
        let p = Partition::for_rank(20, 1, Rank(0)).unwrap();
        assert_eq!(p.range(), 0..20);
    }

    #[test]
    fn more_participants_than_columns() {
        let d = Decomposition::new(3, 5).unwrap();
        let widths: Vec<usize> = d.partitions().iter().map(Partition::width).collect();
        assert_eq!(widths, vec![0, 1, 0, 1, 1]);
        assert!(d.partition(Rank(0)).unwrap().is_empty());
        assert!(!d.partition(Rank(4)).unwrap().is_empty());
    }

    #[test]
    fn invalid_inputs_rejected() {
        assert_eq!(
            Partition::for_rank(10, 0, Rank(0)),
            Err(ConfigError::ZeroParticipants)
        );
        assert_eq!(
            Partition::for_rank(10, 2, Rank(2)),
            Err(ConfigError::RankOutOfRange {
                rank: Rank(2),
                participants: 2
            })
        );
        assert!(matches!(
            Partition::for_rank(usize::MAX, 4, Rank(3)),
            Err(ConfigError::PartitionOverflow { .. })
        ));
    }

    #[test]
    fn gather_layout_matches_partitions() {
        let d = Decomposition::new(10, 3).unwrap();
        assert_eq!(d.gather_counts(4), vec![12, 12, 16]);
        assert_eq!(d.gather_displacements(4), vec![0, 12, 24]);
    }

    proptest! {
        #[test]
        fn partitions_cover_grid_exactly(grid_x in 0usize..2000, n in 1usize..64) {
            let d = Decomposition::new(grid_x, n).unwrap();
            let parts = d.partitions();
            prop_assert_eq!(parts.len(), n);
            prop_assert_eq!(parts[0].start(), 0);
            prop_assert_eq!(parts[n - 1].end(), grid_x);
            for pair in parts.windows(2) {
                prop_assert_eq!(pair[0].end(), pair[1].start());
            }
            let widths: Vec<usize> = parts.iter().map(Partition::width).collect();
            let max = *widths.iter().max().unwrap();
            let min = *widths.iter().min().unwrap();
            prop_assert!(max - min <= 1);
            prop_assert_eq!(widths.iter().sum::<usize>(), grid_x);
        }

        #[test]
        fn partition_is_pure(grid_x in 1usize..500, n in 1usize..32, r in 0usize..32) {
            prop_assume!(r < n);
            let a = Partition::for_rank(grid_x, n, Rank(r)).unwrap();
            let b = Partition::for_rank(grid_x, n, Rank(r)).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
