//! Strongly typed identifiers.

use std::fmt;

/// Position of an occupant in the generated population, in arrival order.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OccupantId(pub u32);

impl OccupantId {
    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for OccupantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OccupantId({})", self.0)
    }
}

impl TryFrom<usize> for OccupantId {
    type Error = std::num::TryFromIntError;
    fn try_from(n: usize) -> Result<OccupantId, Self::Error> {
        u32::try_from(n).map(OccupantId)
    }
}
