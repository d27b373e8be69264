extern crate alloc;

use alloc::vec::Vec;
use bytes::Bytes;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::util;

/// Fragment unit of the length determinant (X.691 §11.9.3.8)
pub const SIXTEEN_K: usize = 16384;
/// Bound above which lengths are no longer encoded as constrained whole numbers
pub const SIXTY_FOUR_K: usize = 65536;

/// Variant of the Packed Encoding Rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Alignment {
    /// Aligned PER (APER), padding to octet boundaries where X.691 requires it
    #[default]
    Aligned,
    /// Unaligned PER (UPER), never any padding
    Unaligned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CodecOptions {
    pub alignment: Alignment,
}

impl CodecOptions {
    pub const fn aligned() -> Self {
        Self {
            alignment: Alignment::Aligned,
        }
    }

    pub const fn unaligned() -> Self {
        Self {
            alignment: Alignment::Unaligned,
        }
    }

    /// E1AP is specified in Aligned PER (TS 37.483 §9.4.1)
    pub const fn e1ap() -> Self {
        Self::aligned()
    }

    pub fn is_aligned(&self) -> bool {
        self.alignment == Alignment::Aligned
    }
}

/// Value constraint of an INTEGER type
///
/// Bounds are kept as `i128` so that the full `u64` and `i64` ranges fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegerConstraint {
    pub min: Option<i128>,
    pub max: Option<i128>,
    pub extensible: bool,
}

impl IntegerConstraint {
    /// `INTEGER (min..max)`
    pub const fn constrained(min: i128, max: i128) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            extensible: false,
        }
    }

    /// `INTEGER (min..max, ...)`
    pub const fn extensible(min: i128, max: i128) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            extensible: true,
        }
    }

    /// `INTEGER (min..MAX)`
    pub const fn semi_constrained(min: i128) -> Self {
        Self {
            min: Some(min),
            max: None,
            extensible: false,
        }
    }

    /// `INTEGER`
    pub const fn unconstrained() -> Self {
        Self {
            min: None,
            max: None,
            extensible: false,
        }
    }

    /// Number of values in the root range, if both bounds are set
    pub fn range(&self) -> Option<u128> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if max >= min => Some((max - min) as u128 + 1),
            _ => None,
        }
    }

    /// Width of the unaligned bit field of a constrained whole number
    pub fn bit_width(&self) -> Option<usize> {
        self.range().map(util::bit_width)
    }

    /// Whether `value` lies in the extension root
    pub fn contains(&self, value: i128) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// Size constraint of a string, SEQUENCE OF or container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeConstraint {
    pub min: usize,
    pub max: Option<usize>,
    pub extensible: bool,
}

impl SizeConstraint {
    pub const fn fixed(size: usize) -> Self {
        Self {
            min: size,
            max: Some(size),
            extensible: false,
        }
    }

    pub const fn range(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
            extensible: false,
        }
    }

    pub const fn extensible(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
            extensible: true,
        }
    }

    pub const fn unbounded(min: usize) -> Self {
        Self {
            min,
            max: None,
            extensible: false,
        }
    }

    pub fn fixed_size(&self) -> Option<usize> {
        self.max.filter(|max| *max == self.min)
    }

    /// Lengths below 64K upper bound are encoded as constrained whole numbers
    pub(crate) fn is_constrained_length(&self) -> bool {
        self.max.is_some_and(|max| max < SIXTY_FOUR_K)
    }

    pub fn permits(&self, length: usize) -> bool {
        length >= self.min && self.max.map_or(true, |max| length <= max)
    }
}

/// Known-multiplier character string types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterSet {
    Printable,
    Visible,
    Ia5,
}

impl CharacterSet {
    pub fn contains(&self, c: char) -> bool {
        match self {
            CharacterSet::Printable => {
                c.is_ascii_alphanumeric() || " '()+,-./:=?".contains(c)
            }
            CharacterSet::Visible => (' '..='~').contains(&c),
            CharacterSet::Ia5 => c.is_ascii(),
        }
    }

    /// Bits per character, X.691 §30.5.2. All three alphabets fit 7 bits, so character
    /// codes are used unchanged.
    pub fn bits_per_char(&self, options: CodecOptions) -> usize {
        if options.is_aligned() {
            8
        } else {
            7
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CharacterSet::Printable => "PrintableString",
            CharacterSet::Visible => "VisibleString",
            CharacterSet::Ia5 => "IA5String",
        }
    }
}

/// Index of an ENUMERATED value or CHOICE alternative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ChoiceIndex {
    /// Index into the extension root
    Root(u32),
    /// Index into the extension additions
    Extension(u32),
}

/// Leading bits of a SEQUENCE encoding
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SequencePreamble {
    pub extended: bool,
    pub present: Vec<bool>,
}

impl SequencePreamble {
    pub fn is_present(&self, index: usize) -> bool {
        self.present.get(index).copied().unwrap_or(false)
    }
}

/// Extension additions of a SEQUENCE kept as their open-type encodings
///
/// Absent additions are `None`. The number of entries is the bitmap length found on the
/// wire, so a decoded value re-encodes identically.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ExtensionAdditions(pub Vec<Option<Bytes>>);

impl ExtensionAdditions {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn present(&self) -> impl Iterator<Item = (usize, &Bytes)> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(index, addition)| addition.as_ref().map(|bytes| (index, bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_constraint_width() {
        assert_eq!(Some(8), IntegerConstraint::constrained(0, 255).bit_width());
        assert_eq!(Some(0), IntegerConstraint::constrained(7, 7).bit_width());
        assert_eq!(Some(32), IntegerConstraint::constrained(0, 4_294_967_295).bit_width());
        assert_eq!(Some(36), IntegerConstraint::constrained(0, 68_719_476_735).bit_width());
        assert_eq!(None, IntegerConstraint::semi_constrained(0).bit_width());
        assert!(IntegerConstraint::extensible(1, 7200).contains(1));
        assert!(!IntegerConstraint::extensible(1, 7200).contains(7201));
    }

    #[test]
    fn size_constraint_classification() {
        assert!(SizeConstraint::range(0, 65535).is_constrained_length());
        assert!(!SizeConstraint::range(1, 65536).is_constrained_length());
        assert!(!SizeConstraint::unbounded(0).is_constrained_length());
        assert_eq!(Some(3), SizeConstraint::fixed(3).fixed_size());
        assert!(!SizeConstraint::range(1, 65535).permits(0));
    }

    #[test]
    fn printable_alphabet() {
        assert!(CharacterSet::Printable.contains('Z'));
        assert!(CharacterSet::Printable.contains('?'));
        assert!(!CharacterSet::Printable.contains('_'));
        assert!(CharacterSet::Visible.contains('_'));
        assert!(!CharacterSet::Visible.contains('\n'));
        assert!(CharacterSet::Ia5.contains('\n'));
    }
}
