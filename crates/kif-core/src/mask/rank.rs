//! Masks over statement ranks.

use crate::{ArgSite, KifError, Rank};

flag_mask! {
    /// A set of statement ranks.
    RankMask {
        PREFERRED = 1 << 0,
        NORMAL = 1 << 1,
        DEPRECATED = 1 << 2,
    }
}

/// Anything [`RankMask::check`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankMaskArg {
    Mask(RankMask),
    Bits(u32),
    Rank(Rank),
    /// The abstract rank: every rank.
    AnyRank,
}

impl From<RankMask> for RankMaskArg {
    fn from(mask: RankMask) -> Self {
        Self::Mask(mask)
    }
}

impl From<u32> for RankMaskArg {
    fn from(bits: u32) -> Self {
        Self::Bits(bits)
    }
}

impl From<Rank> for RankMaskArg {
    fn from(rank: Rank) -> Self {
        Self::Rank(rank)
    }
}

impl From<Rank> for RankMask {
    fn from(rank: Rank) -> Self {
        match rank {
            Rank::Preferred => Self::PREFERRED,
            Rank::Normal => Self::NORMAL,
            Rank::Deprecated => Self::DEPRECATED,
        }
    }
}

impl RankMask {
    /// Coerce `arg` into a mask.
    pub fn check(arg: impl Into<RankMaskArg>) -> Result<Self, KifError> {
        Self::check_at(arg, ArgSite::new("RankMask::check", "arg", 1))
    }

    /// Coerce `arg` into a mask, reporting failures at `site`.
    pub fn check_at(arg: impl Into<RankMaskArg>, site: ArgSite) -> Result<Self, KifError> {
        match arg.into() {
            RankMaskArg::Mask(mask) => Ok(mask),
            RankMaskArg::Bits(bits) => Self::check_bits(bits, site),
            RankMaskArg::Rank(rank) => Ok(Self::from(rank)),
            RankMaskArg::AnyRank => Ok(Self::ALL),
        }
    }

    /// Check whether `arg` shares a rank with this mask.
    pub fn matches(self, arg: impl Into<RankMaskArg>) -> Result<bool, KifError> {
        Ok(self.intersects(Self::check_at(
            arg,
            ArgSite::new("RankMask::matches", "arg", 1),
        )?))
    }
}
