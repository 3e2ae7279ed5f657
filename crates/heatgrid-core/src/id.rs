//! Strongly-typed identifiers for participants and message tags.

use std::fmt;

/// Ordinal of one participant in the decomposition, in `[0, size)`.
///
/// Rank 0 is the coordinator: it owns the timing report and receives the
/// gathered field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(pub usize);

impl Rank {
    /// The coordinator rank.
    pub const ROOT: Rank = Rank(0);

    /// Rank as a plain index.
    pub fn index(self) -> usize {
        self.0
    }

    /// Left (X−) neighbour, if any.
    pub fn left(self) -> Option<Rank> {
        self.0.checked_sub(1).map(Rank)
    }

    /// Right (X+) neighbour within a world of `size` participants, if any.
    pub fn right(self, size: usize) -> Option<Rank> {
        let next = self.0 + 1;
        (next < size).then_some(Rank(next))
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for Rank {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

/// Message tag used to match sends with receives.
///
/// User traffic uses small tags such as [`Tag::HALO`]. Tags at or above
/// [`Tag::RESERVED`] belong to the transport's own collectives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(pub u32);

impl Tag {
    /// Halo column traffic between X-neighbours.
    pub const HALO: Tag = Tag(0);
    /// First tag reserved for transport collectives.
    pub const RESERVED: Tag = Tag(0xFFFF_0000);
    /// Variable-count gather payloads.
    pub const GATHER: Tag = Tag(0xFFFF_0001);
    /// Barrier arrival and release tokens.
    pub const BARRIER: Tag = Tag(0xFFFF_0002);
    /// Max-reduction partials and broadcast.
    pub const REDUCE: Tag = Tag(0xFFFF_0003);

    /// Whether the tag belongs to the transport's collectives.
    pub fn is_reserved(self) -> bool {
        self >= Self::RESERVED
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
