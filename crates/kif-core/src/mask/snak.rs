//! Masks over snak variants.

use crate::{ArgSite, KifError, Snak, SnakKind};

flag_mask! {
    /// A set of snak variants.
    SnakMask {
        VALUE_SNAK = 1 << 0,
        SOME_VALUE_SNAK = 1 << 1,
        NO_VALUE_SNAK = 1 << 2,
    }
}

/// Anything [`SnakMask::check`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnakMaskArg {
    Mask(SnakMask),
    Bits(u32),
    Kind(SnakKind),
    /// The abstract snak: every variant.
    AnySnak,
}

impl From<SnakMask> for SnakMaskArg {
    fn from(mask: SnakMask) -> Self {
        Self::Mask(mask)
    }
}

impl From<u32> for SnakMaskArg {
    fn from(bits: u32) -> Self {
        Self::Bits(bits)
    }
}

impl From<SnakKind> for SnakMaskArg {
    fn from(kind: SnakKind) -> Self {
        Self::Kind(kind)
    }
}

impl From<&Snak> for SnakMaskArg {
    fn from(snak: &Snak) -> Self {
        Self::Kind(snak.kind())
    }
}

impl From<SnakKind> for SnakMask {
    fn from(kind: SnakKind) -> Self {
        match kind {
            SnakKind::Value => Self::VALUE_SNAK,
            SnakKind::SomeValue => Self::SOME_VALUE_SNAK,
            SnakKind::NoValue => Self::NO_VALUE_SNAK,
        }
    }
}

impl SnakMask {
    /// Coerce `arg` into a mask.
    pub fn check(arg: impl Into<SnakMaskArg>) -> Result<Self, KifError> {
        Self::check_at(arg, ArgSite::new("SnakMask::check", "arg", 1))
    }

    /// Coerce `arg` into a mask, reporting failures at `site`.
    pub fn check_at(arg: impl Into<SnakMaskArg>, site: ArgSite) -> Result<Self, KifError> {
        match arg.into() {
            SnakMaskArg::Mask(mask) => Ok(mask),
            SnakMaskArg::Bits(bits) => Self::check_bits(bits, site),
            SnakMaskArg::Kind(kind) => Ok(Self::from(kind)),
            SnakMaskArg::AnySnak => Ok(Self::ALL),
        }
    }

    /// Check whether `arg` shares a variant with this mask.
    pub fn matches(self, arg: impl Into<SnakMaskArg>) -> Result<bool, KifError> {
        Ok(self.intersects(Self::check_at(
            arg,
            ArgSite::new("SnakMask::matches", "arg", 1),
        )?))
    }
}
