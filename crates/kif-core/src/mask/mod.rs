//! # Mask Module
//!
//! Bit-flag sets over the closed runtime type hierarchies:
//! - `DatatypeMask`: the nine value datatypes
//! - `RankMask`: the three statement ranks
//! - `SnakMask`: the three snak variants
//!
//! Every mask offers `check` (coerce a mask, raw bits, class or instance into
//! a mask) and `matches` (flag overlap, not containment).

/// Define a mask type over a fixed list of flags.
///
/// Generates the flag constants, `EMPTY`/`ALL`, bit accessors, the bitwise
/// operators (negation is clamped to `ALL`), `Display` as `A|B`, and serde as
/// the raw integer checked against `ALL`.
macro_rules! flag_mask {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$flag_meta:meta])* $flag:ident = $bit:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(try_from = "u32", into = "u32")]
        pub struct $name(u32);

        impl $name {
            $( $(#[$flag_meta])* pub const $flag: Self = Self($bit); )+

            /// No flags.
            pub const EMPTY: Self = Self(0);

            /// Every flag.
            pub const ALL: Self = Self(0 $( | $bit )+);

            const NAMES: &'static [(&'static str, Self)] = &[ $( (stringify!($flag), Self::$flag) ),+ ];

            /// The raw bits.
            #[must_use]
            pub const fn bits(self) -> u32 {
                self.0
            }

            /// Check if no flag is set.
            #[must_use]
            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }

            /// Check if every flag of `other` is set in `self`.
            #[must_use]
            pub const fn contains(self, other: Self) -> bool {
                self.0 & other.0 == other.0
            }

            /// Check if `self` and `other` share a flag.
            #[must_use]
            pub const fn intersects(self, other: Self) -> bool {
                self.0 & other.0 != 0
            }

            /// Accept raw bits, rejecting any bit outside `ALL`.
            fn check_bits(bits: u32, site: $crate::ArgSite) -> Result<Self, $crate::KifError> {
                if bits & !Self::ALL.0 != 0 {
                    return Err($crate::KifError::coercion(bits, stringify!($name), site));
                }
                Ok(Self(bits))
            }
        }

        impl std::ops::BitAnd for $name {
            type Output = Self;
            fn bitand(self, rhs: Self) -> Self {
                Self(self.0 & rhs.0)
            }
        }

        impl std::ops::BitOr for $name {
            type Output = Self;
            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl std::ops::BitXor for $name {
            type Output = Self;
            fn bitxor(self, rhs: Self) -> Self {
                Self(self.0 ^ rhs.0)
            }
        }

        impl std::ops::Not for $name {
            type Output = Self;
            fn not(self) -> Self {
                Self(!self.0 & Self::ALL.0)
            }
        }

        impl std::ops::BitAndAssign for $name {
            fn bitand_assign(&mut self, rhs: Self) {
                self.0 &= rhs.0;
            }
        }

        impl std::ops::BitOrAssign for $name {
            fn bitor_assign(&mut self, rhs: Self) {
                self.0 |= rhs.0;
            }
        }

        impl TryFrom<u32> for $name {
            type Error = $crate::KifError;

            fn try_from(bits: u32) -> Result<Self, Self::Error> {
                Self::check_bits(
                    bits,
                    $crate::ArgSite::new(concat!(stringify!($name), "::try_from"), "bits", 1),
                )
            }
        }

        impl From<$name> for u32 {
            fn from(mask: $name) -> Self {
                mask.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                if self.is_empty() {
                    return f.write_str("0");
                }
                let mut first = true;
                for (name, flag) in Self::NAMES {
                    if self.contains(*flag) {
                        if !first {
                            f.write_str("|")?;
                        }
                        f.write_str(name)?;
                        first = false;
                    }
                }
                Ok(())
            }
        }
    };
}

mod datatype;
mod rank;
mod snak;

pub use datatype::{DatatypeMask, DatatypeMaskArg};
pub use rank::{RankMask, RankMaskArg};
pub use snak::{SnakMask, SnakMaskArg};
