extern crate alloc;

use alloc::vec::Vec;
use bitvec::prelude::*;
use core::fmt::{self, Display};
use num_traits::ToPrimitive;

#[cfg(feature = "json")]
use serde::Serialize;

use crate::{
    per::{
        CharacterSet, ChoiceIndex, CodecOptions, ExtensionAdditions, IntegerConstraint,
        SizeConstraint, SIXTEEN_K, SIXTY_FOUR_K,
    },
    util,
};

#[derive(Debug, Clone, PartialEq)]
pub enum EncodeError {
    /// Value or size outside of the PER-visible constraint
    ConstraintViolation(alloc::string::String),
    Unsupported(alloc::string::String),
    Common(alloc::string::String),
    #[cfg(feature = "json")]
    Json(alloc::string::String),
}

impl EncodeError {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::ConstraintViolation(message) => message,
            Self::Unsupported(message) => message,
            Self::Common(message) => message,
            #[cfg(feature = "json")]
            Self::Json(message) => message,
        }
    }
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Bit writer producing PER encodings
#[derive(Debug, Default)]
pub struct Encoder {
    bits: BitVec<u8, Msb0>,
    options: CodecOptions,
}

impl Encoder {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(CodecOptions::e1ap())
    }

    #[must_use]
    pub fn with_options(options: CodecOptions) -> Self {
        Self {
            bits: bitvec![u8, Msb0;],
            options,
        }
    }

    pub fn options(&self) -> CodecOptions {
        self.options
    }

    /// Number of bits written so far
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Pads with zero bits to the octet boundary; a complete encoding is never empty
    /// (X.691 §11.1.3)
    #[must_use]
    pub fn into_complete_encoding(self) -> Vec<u8> {
        let mut octets: Vec<u8> = self.into();
        if octets.is_empty() {
            octets.push(0);
        }
        octets
    }

    pub fn write_bit(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Writes the `bit_count` least significant bits of `value`, MSB first
    pub fn write_bits(&mut self, value: u64, bit_count: usize) -> Result<(), EncodeError> {
        if bit_count > 64 || (bit_count < 64 && value >> bit_count != 0) {
            return Err(EncodeError::Common(alloc::format!(
                "Value {value} does not fit into {bit_count} bits!"
            )));
        }
        let bytes = value.to_be_bytes();
        let bits = bytes.view_bits::<Msb0>();
        self.bits
            .extend_from_bitslice(&bits[(bits.len() - bit_count)..bits.len()]);
        Ok(())
    }

    /// Pads with zero bits to the next octet boundary (Aligned PER only)
    pub fn align(&mut self) {
        if self.options.is_aligned() {
            let padding = util::padding_bits(self.bits.len());
            self.bits.resize(self.bits.len() + padding, false);
        }
    }

    pub fn write_octets(&mut self, octets: &[u8]) {
        self.bits.extend_from_bitslice(octets.view_bits::<Msb0>());
    }

    fn write_minimal_octets(&mut self, value: u128, octets: usize) {
        let bytes = value.to_be_bytes();
        self.write_octets(&bytes[(bytes.len() - octets)..]);
    }

    pub fn boolean(&mut self, value: bool) {
        self.write_bit(value);
    }

    /// Constrained whole number (X.691 §11.5.7) given as offset from the lower bound
    pub fn constrained_whole_number(&mut self, offset: u128, range: u128) -> Result<(), EncodeError> {
        if offset >= range.max(1) {
            return Err(EncodeError::ConstraintViolation(alloc::format!(
                "Offset {offset} exceeds range of {range} values!"
            )));
        }
        if range <= 1 {
            return Ok(());
        }
        if !self.options.is_aligned() || range <= 255 {
            self.write_u128_bits(offset, util::bit_width(range))
        } else if range == 256 {
            self.align();
            self.write_u128_bits(offset, 8)
        } else if range <= SIXTY_FOUR_K as u128 {
            self.align();
            self.write_u128_bits(offset, 16)
        } else {
            let max_octets = util::octet_width(range - 1);
            let octets = util::octet_width(offset);
            self.constrained_whole_number(octets as u128 - 1, max_octets as u128)?;
            self.align();
            self.write_minimal_octets(offset, octets);
            Ok(())
        }
    }

    fn write_u128_bits(&mut self, value: u128, bit_count: usize) -> Result<(), EncodeError> {
        let value = u64::try_from(value).map_err(|_| {
            EncodeError::Unsupported(alloc::format!("Bit field value {value} exceeds 64 bits!"))
        })?;
        self.write_bits(value, bit_count)
    }

    /// Semi-constrained whole number (X.691 §11.7) given as offset from the lower bound
    pub fn semi_constrained_whole_number(&mut self, offset: u128) -> Result<(), EncodeError> {
        let octets = util::octet_width(offset);
        self.length_determinant(octets)?;
        self.align();
        self.write_minimal_octets(offset, octets);
        Ok(())
    }

    /// Unconstrained whole number (X.691 §11.8), 2's-complement
    pub fn unconstrained_whole_number(&mut self, value: i128) -> Result<(), EncodeError> {
        let octets = util::signed_octet_width(value);
        self.length_determinant(octets)?;
        self.align();
        let bytes = value.to_be_bytes();
        self.write_octets(&bytes[(bytes.len() - octets)..]);
        Ok(())
    }

    /// INTEGER with the given constraint
    pub fn integer<I: ToPrimitive + Display>(
        &mut self,
        value: &I,
        constraint: IntegerConstraint,
    ) -> Result<(), EncodeError> {
        let value = value.to_i128().ok_or_else(|| {
            EncodeError::Unsupported(alloc::format!("Integer {value} exceeds 128 bits!"))
        })?;
        let in_root = constraint.contains(value);
        if constraint.extensible {
            self.write_bit(!in_root);
            if !in_root {
                return self.unconstrained_whole_number(value);
            }
        } else if !in_root {
            return Err(EncodeError::ConstraintViolation(alloc::format!(
                "Integer {value} outside of {:?}..{:?}!",
                constraint.min,
                constraint.max
            )));
        }
        match (constraint.min, constraint.range()) {
            (Some(min), Some(range)) => self.constrained_whole_number((value - min) as u128, range),
            (Some(min), None) => self.semi_constrained_whole_number((value - min) as u128),
            _ => self.unconstrained_whole_number(value),
        }
    }

    /// Normally small non-negative whole number (X.691 §11.6)
    pub fn normally_small_number(&mut self, value: u32) -> Result<(), EncodeError> {
        if value < 64 {
            self.write_bit(false);
            self.write_bits(u64::from(value), 6)
        } else {
            self.write_bit(true);
            self.semi_constrained_whole_number(u128::from(value))
        }
    }

    /// Normally small length (X.691 §11.9.3.4), used for extension bitmaps
    pub fn normally_small_length(&mut self, length: usize) -> Result<(), EncodeError> {
        if length == 0 {
            return Err(EncodeError::ConstraintViolation(
                "Normally small length must be positive!".into(),
            ));
        }
        if length <= 64 {
            self.write_bit(false);
            self.write_bits(length as u64 - 1, 6)
        } else {
            self.write_bit(true);
            self.length_determinant(length)
        }
    }

    /// Unconstrained length determinant (X.691 §11.9.3.6-7) for lengths below 16K
    pub fn length_determinant(&mut self, length: usize) -> Result<(), EncodeError> {
        self.align();
        if length < 128 {
            self.write_bits(length as u64, 8)
        } else if length < SIXTEEN_K {
            self.write_bits(0x8000 | length as u64, 16)
        } else {
            Err(EncodeError::Unsupported(alloc::format!(
                "Length {length} needs fragmentation!"
            )))
        }
    }

    fn size_extension(&mut self, size: &SizeConstraint, length: usize) -> Result<bool, EncodeError> {
        let in_root = size.permits(length);
        if size.extensible {
            self.write_bit(!in_root);
        } else if !in_root {
            return Err(EncodeError::ConstraintViolation(alloc::format!(
                "Size {length} outside of SIZE({}..{:?})!",
                size.min,
                size.max
            )));
        }
        Ok(!in_root)
    }

    /// Writes `items` with their lengths, splitting into 16K fragments where X.691 requires
    fn fragmented<T>(
        &mut self,
        items: &[T],
        size: &SizeConstraint,
        extended: bool,
        align_content: bool,
        mut write: impl FnMut(&mut Self, &[T]) -> Result<(), EncodeError>,
    ) -> Result<(), EncodeError> {
        if !extended && size.is_constrained_length() {
            let max = size.max.unwrap_or(size.min);
            self.constrained_whole_number(
                (items.len() - size.min) as u128,
                (max - size.min) as u128 + 1,
            )?;
            if !items.is_empty() {
                if align_content {
                    self.align();
                }
                write(self, items)?;
            }
            return Ok(());
        }
        let mut rest = items;
        loop {
            if rest.len() >= SIXTEEN_K {
                let multiplier = (rest.len() / SIXTEEN_K).min(4);
                self.align();
                self.write_bits(0xc0 | multiplier as u64, 8)?;
                let (fragment, tail) = rest.split_at(multiplier * SIXTEEN_K);
                if align_content {
                    self.align();
                }
                write(self, fragment)?;
                rest = tail;
            } else {
                self.length_determinant(rest.len())?;
                if !rest.is_empty() {
                    if align_content {
                        self.align();
                    }
                    write(self, rest)?;
                }
                return Ok(());
            }
        }
    }

    /// OCTET STRING with the given size constraint (X.691 §17)
    pub fn octet_string(&mut self, octets: &[u8], size: SizeConstraint) -> Result<(), EncodeError> {
        let extended = self.size_extension(&size, octets.len())?;
        match size.fixed_size().filter(|_| !extended) {
            Some(fixed) if fixed <= 2 => {
                self.write_octets(octets);
                Ok(())
            }
            Some(fixed) if fixed < SIXTY_FOUR_K => {
                self.align();
                self.write_octets(octets);
                Ok(())
            }
            _ => self.fragmented(octets, &size, extended, true, |encoder, part| {
                encoder.write_octets(part);
                Ok(())
            }),
        }
    }

    /// BIT STRING with the given size constraint (X.691 §16)
    pub fn bit_string(
        &mut self,
        bits: &BitSlice<u8, Msb0>,
        size: SizeConstraint,
    ) -> Result<(), EncodeError> {
        let extended = self.size_extension(&size, bits.len())?;
        match size.fixed_size().filter(|_| !extended) {
            Some(fixed) if fixed <= 16 => {
                self.bits.extend_from_bitslice(bits);
                Ok(())
            }
            Some(fixed) if fixed < SIXTY_FOUR_K => {
                self.align();
                self.bits.extend_from_bitslice(bits);
                Ok(())
            }
            _ => {
                let bools: Vec<bool> = bits.iter().by_vals().collect();
                self.fragmented(&bools, &size, extended, true, |encoder, part| {
                    encoder.bits.extend(part.iter().copied());
                    Ok(())
                })
            }
        }
    }

    /// Known-multiplier character string (X.691 §30)
    pub fn character_string(
        &mut self,
        value: &str,
        charset: CharacterSet,
        size: SizeConstraint,
    ) -> Result<(), EncodeError> {
        let chars: Vec<char> = value.chars().collect();
        if let Some(invalid) = chars.iter().find(|c| !charset.contains(**c)) {
            return Err(EncodeError::ConstraintViolation(alloc::format!(
                "Character {invalid:?} is not part of {}!",
                charset.name()
            )));
        }
        let bits_per_char = charset.bits_per_char(self.options);
        let extended = self.size_extension(&size, chars.len())?;
        let align_content = match size.max.filter(|_| !extended) {
            Some(max) => max * bits_per_char > 16,
            None => true,
        };
        let write_chars = |encoder: &mut Self, part: &[char]| {
            part.iter()
                .try_for_each(|c| encoder.write_bits(u64::from(u32::from(*c)), bits_per_char))
        };
        match size.fixed_size().filter(|_| !extended) {
            Some(fixed) if fixed < SIXTY_FOUR_K => {
                if align_content {
                    self.align();
                }
                write_chars(self, &chars)
            }
            _ => self.fragmented(&chars, &size, extended, align_content, write_chars),
        }
    }

    /// Index of an ENUMERATED value (X.691 §14)
    pub fn enumerated(
        &mut self,
        index: ChoiceIndex,
        root_count: u32,
        extensible: bool,
    ) -> Result<(), EncodeError> {
        match (index, extensible) {
            (ChoiceIndex::Root(index), _) => {
                if extensible {
                    self.write_bit(false);
                }
                self.constrained_whole_number(u128::from(index), u128::from(root_count))
            }
            (ChoiceIndex::Extension(index), true) => {
                self.write_bit(true);
                self.normally_small_number(index)
            }
            (ChoiceIndex::Extension(_), false) => Err(EncodeError::ConstraintViolation(
                "Extension index on a type without extension marker!".into(),
            )),
        }
    }

    /// Index of a CHOICE alternative (X.691 §23)
    ///
    /// The content of an extension alternative must follow as an open type.
    pub fn choice_index(
        &mut self,
        index: ChoiceIndex,
        root_count: u32,
        extensible: bool,
    ) -> Result<(), EncodeError> {
        self.enumerated(index, root_count, extensible)
    }

    /// Extension bit and presence bitmap of a SEQUENCE (X.691 §19.1-3)
    pub fn sequence_preamble(&mut self, extensible: bool, extended: bool, present: &[bool]) {
        if extensible {
            self.write_bit(extended);
        }
        for bit in present {
            self.write_bit(*bit);
        }
    }

    /// Extension additions of a SEQUENCE whose extension bit was set (X.691 §19.7-9)
    pub fn extension_additions(&mut self, additions: &ExtensionAdditions) -> Result<(), EncodeError> {
        if additions.is_empty() {
            return Ok(());
        }
        self.normally_small_length(additions.0.len())?;
        for addition in &additions.0 {
            self.write_bit(addition.is_some());
        }
        for (_, content) in additions.present() {
            self.open_type_bytes(content)?;
        }
        Ok(())
    }

    /// SEQUENCE OF with the given size constraint (X.691 §20)
    pub fn sequence_of<T>(
        &mut self,
        items: &[T],
        size: SizeConstraint,
        mut item: impl FnMut(&mut Self, &T) -> Result<(), EncodeError>,
    ) -> Result<(), EncodeError> {
        let extended = self.size_extension(&size, items.len())?;
        let mut write_items = |encoder: &mut Self, part: &[T]| {
            part.iter().try_for_each(|value| item(encoder, value))
        };
        match size.fixed_size().filter(|_| !extended) {
            Some(fixed) if fixed < SIXTY_FOUR_K => write_items(self, items),
            _ => self.fragmented(items, &size, extended, false, write_items),
        }
    }

    /// Open type (X.691 §11.2) holding the given complete encoding
    pub fn open_type_bytes(&mut self, content: &[u8]) -> Result<(), EncodeError> {
        self.fragmented(
            content,
            &SizeConstraint::unbounded(0),
            false,
            true,
            |encoder, part| {
                encoder.write_octets(part);
                Ok(())
            },
        )
    }

    /// Open type holding the complete encoding of `value`
    pub fn open_type<T: Encode + ?Sized>(&mut self, value: &T) -> Result<(), EncodeError> {
        let mut inner = Encoder::with_options(self.options);
        value.encode(&mut inner)?;
        self.open_type_bytes(&inner.into_complete_encoding())
    }
}

impl From<Encoder> for alloc::vec::Vec<u8> {
    fn from(mut val: Encoder) -> Self {
        let padding = util::padding_bits(val.bits.len());
        val.bits.resize(val.bits.len() + padding, false);
        val.bits.into_vec()
    }
}

impl From<Encoder> for bytes::Bytes {
    fn from(val: Encoder) -> Self {
        <Encoder as core::convert::Into<alloc::vec::Vec<u8>>>::into(val).into()
    }
}

impl From<Encoder> for BitVec<u8, Msb0> {
    fn from(val: Encoder) -> Self {
        val.bits
    }
}

pub trait Encode {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError>;

    /// Complete Aligned PER encoding of `self`
    fn encode_to_vec(&self) -> Result<Vec<u8>, EncodeError> {
        let mut encoder = Encoder::new();
        self.encode(&mut encoder)?;
        Ok(encoder.into_complete_encoding())
    }

    #[cfg(feature = "json")]
    fn encode_to_json(&self) -> Result<alloc::string::String, EncodeError>
    where
        Self: Sized + Serialize,
    {
        serde_json::to_string(self)
            .map_err(|e| EncodeError::Json(alloc::format!("Error encoding JSON: {e:?}")))
    }
}

impl Encode for bool {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        output.boolean(*self);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::PerDecoder;
    use pretty_assertions::assert_eq;

    fn aligned() -> Encoder {
        Encoder::with_options(CodecOptions::aligned())
    }

    fn unaligned() -> Encoder {
        Encoder::with_options(CodecOptions::unaligned())
    }

    #[test]
    fn pads_complete_encoding() {
        let mut encoder = unaligned();
        encoder.write_bits(0b101, 3).unwrap();
        assert_eq!(vec![0b1010_0000], encoder.into_complete_encoding());
        assert_eq!(vec![0x00], unaligned().into_complete_encoding());
        let empty: Vec<u8> = unaligned().into();
        assert!(empty.is_empty());
    }

    #[test]
    fn rejects_values_wider_than_field() {
        let mut encoder = unaligned();
        assert!(encoder.write_bits(4, 2).is_err());
        assert!(encoder.is_empty());
    }

    #[test]
    fn integer_0_255_uses_exactly_eight_bits() {
        for options in [CodecOptions::aligned(), CodecOptions::unaligned()] {
            let mut encoder = Encoder::with_options(options);
            encoder
                .integer(&255u8, IntegerConstraint::constrained(0, 255))
                .unwrap();
            assert_eq!(8, encoder.len());
            let encoded = encoder.into_complete_encoding();
            assert_eq!(vec![0xff], encoded);
            let mut decoder = PerDecoder::new(&encoded, options);
            assert_eq!(
                255u8,
                decoder
                    .integer::<u8>(IntegerConstraint::constrained(0, 255))
                    .unwrap()
            );
            assert_eq!(8, decoder.position());
        }
    }

    #[test]
    fn encodes_minimum_bit_width() {
        let mut encoder = unaligned();
        encoder
            .integer(&7u8, IntegerConstraint::constrained(0, 7))
            .unwrap();
        assert_eq!(3, encoder.len());
        let mut encoder = unaligned();
        encoder
            .integer(&0u64, IntegerConstraint::constrained(0, 68_719_476_735))
            .unwrap();
        assert_eq!(36, encoder.len());
        let mut encoder = unaligned();
        encoder
            .integer(&5u8, IntegerConstraint::constrained(5, 5))
            .unwrap();
        assert_eq!(0, encoder.len());
    }

    #[test]
    fn encodes_large_aligned_ranges_with_octet_count() {
        let mut encoder = aligned();
        encoder
            .integer(&0x1234_5678u32, IntegerConstraint::constrained(0, 4_294_967_295))
            .unwrap();
        assert_eq!(
            vec![0b1100_0000, 0x12, 0x34, 0x56, 0x78],
            encoder.into_complete_encoding()
        );
        let mut encoder = aligned();
        encoder
            .integer(&1u32, IntegerConstraint::constrained(0, 4_294_967_295))
            .unwrap();
        assert_eq!(vec![0x00, 0x01], encoder.into_complete_encoding());
    }

    #[test]
    fn extensible_integers() {
        let constraint = IntegerConstraint::extensible(1, 7200);
        let mut encoder = aligned();
        encoder.integer(&7201u16, constraint).unwrap();
        let encoded = encoder.into_complete_encoding();
        assert_eq!(vec![0x80, 0x02, 0x1c, 0x21], encoded);
        let mut decoder = PerDecoder::new(&encoded, CodecOptions::aligned());
        assert_eq!(7201u16, decoder.integer::<u16>(constraint).unwrap());

        let mut encoder = aligned();
        assert!(matches!(
            encoder.integer(&7201u16, IntegerConstraint::constrained(1, 7200)),
            Err(EncodeError::ConstraintViolation(_))
        ));
    }

    #[test]
    fn signed_and_semi_constrained_integers() {
        for (value, constraint) in [
            (-2i64, IntegerConstraint::unconstrained()),
            (-129, IntegerConstraint::unconstrained()),
            (1_000_000, IntegerConstraint::semi_constrained(-5)),
            (i64::MAX, IntegerConstraint::unconstrained()),
        ] {
            let mut encoder = aligned();
            encoder.integer(&value, constraint).unwrap();
            let encoded = encoder.into_complete_encoding();
            let mut decoder = PerDecoder::new(&encoded, CodecOptions::aligned());
            assert_eq!(value, decoder.integer::<i64>(constraint).unwrap());
        }
    }

    #[test]
    fn length_determinant_forms() {
        let mut encoder = aligned();
        encoder.length_determinant(5).unwrap();
        encoder.length_determinant(300).unwrap();
        assert_eq!(vec![0x05, 0x81, 0x2c], encoder.into_complete_encoding());
        assert!(aligned().length_determinant(SIXTEEN_K).is_err());
    }

    #[test]
    fn fragments_long_open_types() {
        let content = vec![0x5a; 2 * SIXTEEN_K + 10];
        let mut encoder = aligned();
        encoder.open_type_bytes(&content).unwrap();
        let encoded = encoder.into_complete_encoding();
        assert_eq!(0xc2, encoded[0]);
        assert_eq!(10, encoded[1 + 2 * SIXTEEN_K]);
        assert_eq!(content.len() + 2, encoded.len());
        let mut decoder = PerDecoder::new(&encoded, CodecOptions::aligned());
        assert_eq!(content, decoder.open_type_bytes().unwrap().to_vec());
    }

    #[test]
    fn fragment_multiple_of_16k_ends_with_empty_length() {
        let content = vec![0x01; SIXTEEN_K];
        let mut encoder = aligned();
        encoder.open_type_bytes(&content).unwrap();
        let encoded = encoder.into_complete_encoding();
        assert_eq!(0xc1, encoded[0]);
        assert_eq!(Some(&0x00), encoded.last());
        let mut decoder = PerDecoder::new(&encoded, CodecOptions::aligned());
        assert_eq!(SIXTEEN_K, decoder.open_type_bytes().unwrap().len());
        assert_eq!(0, decoder.remaining());
    }

    #[test]
    fn strings_round_trip() {
        for options in [CodecOptions::aligned(), CodecOptions::unaligned()] {
            let mut encoder = Encoder::with_options(options);
            encoder
                .character_string(
                    "gNB-CU-UP 1",
                    CharacterSet::Printable,
                    SizeConstraint::extensible(1, 150),
                )
                .unwrap();
            encoder
                .octet_string(&[1, 2, 3], SizeConstraint::fixed(3))
                .unwrap();
            encoder
                .bit_string(bits![u8, Msb0; 1, 0, 1], SizeConstraint::range(1, 8))
                .unwrap();
            let encoded = encoder.into_complete_encoding();
            let mut decoder = PerDecoder::new(&encoded, options);
            assert_eq!(
                "gNB-CU-UP 1",
                decoder
                    .character_string(CharacterSet::Printable, SizeConstraint::extensible(1, 150))
                    .unwrap()
            );
            assert_eq!(
                vec![1, 2, 3],
                decoder.octet_string(SizeConstraint::fixed(3)).unwrap()
            );
            assert_eq!(
                bits![u8, Msb0; 1, 0, 1],
                decoder
                    .bit_string(SizeConstraint::range(1, 8))
                    .unwrap()
                    .as_bitslice()
            );
        }
    }

    #[test]
    fn unaligned_printable_uses_seven_bits_per_char() {
        let mut encoder = unaligned();
        encoder
            .character_string("AB", CharacterSet::Printable, SizeConstraint::fixed(2))
            .unwrap();
        assert_eq!(14, encoder.len());
        let mut encoder = aligned();
        assert!(matches!(
            encoder.character_string("a_b", CharacterSet::Printable, SizeConstraint::unbounded(0)),
            Err(EncodeError::ConstraintViolation(_))
        ));
    }

    #[test]
    fn size_outside_root_is_a_violation() {
        let mut encoder = aligned();
        assert!(matches!(
            encoder.sequence_of(&[] as &[u8], SizeConstraint::range(1, 65535), |_, _| Ok(())),
            Err(EncodeError::ConstraintViolation(_))
        ));
        // the extensible form carries it as an extension instead
        let mut encoder = aligned();
        encoder
            .octet_string(&[0; 4], SizeConstraint::extensible(1, 3))
            .unwrap();
        let encoded = encoder.into_complete_encoding();
        assert_eq!(vec![0x80, 0x04, 0, 0, 0, 0], encoded);
    }

    #[test]
    fn extension_additions_round_trip() {
        let additions = ExtensionAdditions(vec![
            None,
            Some(bytes::Bytes::from_static(&[0xaa])),
            None,
        ]);
        let mut encoder = aligned();
        encoder.sequence_preamble(true, true, &[false]);
        encoder.extension_additions(&additions).unwrap();
        let encoded = encoder.into_complete_encoding();
        let mut decoder = PerDecoder::new(&encoded, CodecOptions::aligned());
        let preamble = decoder.sequence_preamble(true, 1).unwrap();
        assert!(preamble.extended);
        assert!(!preamble.is_present(0));
        assert_eq!(additions, decoder.extension_additions().unwrap());
    }

    #[test]
    fn choice_indices_round_trip() {
        for index in [ChoiceIndex::Root(0), ChoiceIndex::Root(2), ChoiceIndex::Extension(70)] {
            let mut encoder = unaligned();
            encoder.choice_index(index, 3, true).unwrap();
            let encoded = encoder.into_complete_encoding();
            let mut decoder = PerDecoder::new(&encoded, CodecOptions::unaligned());
            assert_eq!(index, decoder.choice_index(3, true).unwrap());
        }
        assert!(unaligned()
            .enumerated(ChoiceIndex::Extension(0), 3, false)
            .is_err());
    }

    #[test]
    fn open_type_wraps_complete_encoding() {
        let mut encoder = aligned();
        encoder.write_bit(true);
        encoder.open_type(&false).unwrap();
        assert_eq!(vec![0x80, 0x01, 0x00], encoder.into_complete_encoding());
    }
}
