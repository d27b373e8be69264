extern crate alloc;

use alloc::{string::String, vec::Vec};
use bitvec::prelude::*;
use bytes::Bytes;
use core::fmt::{self, Debug, Display};
use nom::{
    bytes::streaming::take,
    combinator::{map, map_res},
    error::{ErrorKind, FromExternalError, ParseError},
    Needed,
};
use nom_bitvec::BSlice;
use num::{FromPrimitive, Integer};

use crate::{
    per::{
        CharacterSet, ChoiceIndex, CodecOptions, ExtensionAdditions, IntegerConstraint,
        SequencePreamble, SizeConstraint, SIXTEEN_K, SIXTY_FOUR_K,
    },
    util,
};

pub(crate) type DecodeIn<'input> = BSlice<'input, u8, Msb0>;

/// Returns the value of a decoding attempt
#[derive(Debug, PartialEq)]
pub struct Decoded<T: Debug + PartialEq> {
    /// indicates the number of bytes that were consumed by the decoder
    pub bytes_consumed: usize,
    /// the decoded return value
    pub decoded: T,
}

pub trait Decode: Sized + Debug + PartialEq {
    /// Decodes a complete Aligned PER encoding of `Self`.
    /// The `Decode` trait is implemented for `E1apPdu`, `ProtocolIeContainer`
    /// and the larger typed information elements.
    /// Information elements nested in containers are resolved through
    /// the default E1AP `Registry`.
    /// ### Usage
    /// ```rust
    /// # use e1ap_per::*;
    /// // initiatingMessage, id-reset, criticality reject, one IE: TransactionID = 5
    /// let data: &'static [u8] = &[
    ///     0x00, 0x00, 0x00, 0x09, 0x00, 0x00, 0x01, 0x00, 0x39, 0x00, 0x02, 0x00, 0x05,
    /// ];
    /// let pdu = E1apPdu::decode(data).unwrap();
    /// assert_eq!(pdu.bytes_consumed, 13);
    /// ```
    fn decode<'input, I: Into<&'input [u8]>>(input: I) -> Result<Decoded<Self>, DecodeError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Value or size outside of the PER-visible constraint
    ConstraintViolation(alloc::string::String),
    IntegerError(alloc::string::String),
    EnumError(alloc::string::String),
    StringError(alloc::string::String),
    /// Input ended before the encoding was complete
    Truncated(alloc::string::String),
    /// Transport framing does not match the payload
    FramingError(alloc::string::String),
    ParserError(alloc::string::String),
    Nom(ErrorKind),
}

impl DecodeError {
    pub fn message(&self) -> &str {
        match self {
            DecodeError::ConstraintViolation(s)
            | DecodeError::IntegerError(s)
            | DecodeError::EnumError(s)
            | DecodeError::StringError(s)
            | DecodeError::Truncated(s)
            | DecodeError::FramingError(s)
            | DecodeError::ParserError(s) => s,
            DecodeError::Nom(kind) => kind.description(),
        }
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            DecodeError::ConstraintViolation(_) => "constraint violation",
            DecodeError::IntegerError(_) => "integer error",
            DecodeError::EnumError(_) => "enumeration error",
            DecodeError::StringError(_) => "string error",
            DecodeError::Truncated(_) => "truncated input",
            DecodeError::FramingError(_) => "framing error",
            DecodeError::ParserError(_) | DecodeError::Nom(_) => "parser error",
        };
        write!(f, "{kind}: {}", self.message())
    }
}

impl From<nom::Err<DecodeError>> for DecodeError {
    fn from(value: nom::Err<DecodeError>) -> Self {
        match value {
            nom::Err::Incomplete(Needed::Size(n)) => DecodeError::Truncated(alloc::format!(
                "Unexpected end of input: Needs at least other {n} units!"
            )),
            nom::Err::Incomplete(_) => DecodeError::Truncated("Unexpected end of input!".into()),
            nom::Err::Error(e) | nom::Err::Failure(e) => e,
        }
    }
}

impl<I> ParseError<I> for DecodeError {
    fn from_error_kind(_: I, kind: ErrorKind) -> Self {
        DecodeError::Nom(kind)
    }

    fn append(_: I, _: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<I, E: Into<DecodeError>> FromExternalError<I, E> for DecodeError {
    fn from_external_error(_: I, _: ErrorKind, e: E) -> Self {
        e.into()
    }
}

pub type IResult<I, T> = nom::IResult<I, T, DecodeError>;

fn read_bit(input: DecodeIn<'_>) -> IResult<DecodeIn<'_>, bool> {
    map(take(1usize), |bits: DecodeIn<'_>| bits.0[0])(input)
}

fn read_as_uint<'input, I: Integer + FromPrimitive>(
    bit_count: usize,
) -> impl FnMut(DecodeIn<'input>) -> IResult<DecodeIn<'input>, I> {
    map_res(take(bit_count), move |bits: DecodeIn<'_>| {
        if bits.0.len() > 64 {
            return Err(DecodeError::IntegerError(alloc::format!(
                "Cannot read {bit_count} bits into a single integer!"
            )));
        }
        let value = if bits.0.is_empty() {
            0u64
        } else {
            bits.0.load_be::<u64>()
        };
        I::from_u64(value).ok_or_else(|| {
            DecodeError::IntegerError(alloc::format!(
                "Integer value does not fit into {bit_count} bits!"
            ))
        })
    })
}

fn read_octets<'input>(
    count: usize,
) -> impl FnMut(DecodeIn<'input>) -> IResult<DecodeIn<'input>, Vec<u8>> {
    map(take(count * 8), |bits: DecodeIn<'_>| {
        bits.0
            .chunks(8)
            .map(bitvec::field::BitField::load_be::<u8>)
            .collect()
    })
}

fn read_bit_string<'input>(
    count: usize,
) -> impl FnMut(DecodeIn<'input>) -> IResult<DecodeIn<'input>, BitVec<u8, Msb0>> {
    map(take(count), |bits: DecodeIn<'_>| bits.0.to_bitvec())
}

/// Result of reading a length determinant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    /// Final part, holding the given number of units
    Complete(usize),
    /// Fragment of the given number of units, another length determinant follows
    Fragment(usize),
}

/// Cursor over a PER encoding
///
/// The input is never modified; decoding only moves the bit position. Alignment is
/// measured from the first bit of the input, so an open type gets a fresh decoder
/// over its own octets.
#[derive(Debug, Clone)]
pub struct PerDecoder<'input> {
    bits: &'input BitSlice<u8, Msb0>,
    position: usize,
    options: CodecOptions,
}

impl<'input> PerDecoder<'input> {
    pub fn new(input: &'input [u8], options: CodecOptions) -> Self {
        Self {
            bits: BitSlice::<u8, Msb0>::from_slice(input),
            position: 0,
            options,
        }
    }

    pub fn options(&self) -> CodecOptions {
        self.options
    }

    /// Current position in bits from the start of the input
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bits left to read
    pub fn remaining(&self) -> usize {
        self.bits.len() - self.position
    }

    /// Number of octets touched so far
    pub fn consumed_octets(&self) -> usize {
        Integer::div_ceil(&self.position, &8usize)
    }

    fn parse<T>(
        &mut self,
        mut parser: impl FnMut(DecodeIn<'input>) -> IResult<DecodeIn<'input>, T>,
    ) -> Result<T, DecodeError> {
        let bits: &'input BitSlice<u8, Msb0> = self.bits;
        match parser(DecodeIn::from(&bits[self.position..])) {
            Ok((remaining, value)) => {
                self.position = bits.len() - remaining.0.len();
                Ok(value)
            }
            Err(nom::Err::Incomplete(needed)) => {
                let missing = match needed {
                    Needed::Size(n) => alloc::format!("{n} more bits"),
                    Needed::Unknown => "more bits".into(),
                };
                Err(DecodeError::Truncated(alloc::format!(
                    "Unexpected end of input at bit {}: needs {missing}!",
                    self.position
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn bit(&mut self) -> Result<bool, DecodeError> {
        self.parse(read_bit)
    }

    /// Reads an unsigned MSB-first bit field of at most 64 bits
    pub fn bits(&mut self, count: usize) -> Result<u64, DecodeError> {
        self.parse(read_as_uint::<u64>(count))
    }

    pub fn skip_bits(&mut self, count: usize) -> Result<(), DecodeError> {
        self.parse(map(take(count), |_| ()))
    }

    /// Skips padding up to the next octet boundary (Aligned PER only)
    pub fn align(&mut self) -> Result<(), DecodeError> {
        if self.options.is_aligned() {
            self.skip_bits(util::padding_bits(self.position))?;
        }
        Ok(())
    }

    /// Reads `count` octets starting at the current bit position
    pub fn octets(&mut self, count: usize) -> Result<Vec<u8>, DecodeError> {
        self.parse(read_octets(count))
    }

    pub fn boolean(&mut self) -> Result<bool, DecodeError> {
        self.bit()
    }

    /// Constrained whole number (X.691 §11.5.7), returned as offset from the lower bound
    pub fn constrained_whole_number(&mut self, range: u128) -> Result<u128, DecodeError> {
        if range <= 1 {
            return Ok(0);
        }
        let value = if !self.options.is_aligned() || range <= 255 {
            u128::from(self.bits(util::bit_width(range))?)
        } else if range == 256 {
            self.align()?;
            u128::from(self.bits(8)?)
        } else if range <= SIXTY_FOUR_K as u128 {
            self.align()?;
            u128::from(self.bits(16)?)
        } else {
            let max_octets = util::octet_width(range - 1);
            let octets = self.constrained_whole_number(max_octets as u128)? as usize + 1;
            self.align()?;
            util::from_be_octets(&self.octets(octets)?)
        };
        if value >= range {
            return Err(DecodeError::ConstraintViolation(alloc::format!(
                "Constrained whole number offset {value} exceeds range of {range} values!"
            )));
        }
        Ok(value)
    }

    /// Semi-constrained whole number (X.691 §11.7), returned as offset from the lower bound
    pub fn semi_constrained_whole_number(&mut self) -> Result<u128, DecodeError> {
        let octets = self.integer_octets()?;
        if octets.len() > 16 {
            return Err(DecodeError::IntegerError(alloc::format!(
                "Semi-constrained whole number of {} octets is too large!",
                octets.len()
            )));
        }
        Ok(util::from_be_octets(&octets))
    }

    /// Unconstrained whole number (X.691 §11.8), 2's-complement
    pub fn unconstrained_whole_number(&mut self) -> Result<i128, DecodeError> {
        let octets = self.integer_octets()?;
        if octets.len() > 16 {
            return Err(DecodeError::IntegerError(alloc::format!(
                "Unconstrained whole number of {} octets is too large!",
                octets.len()
            )));
        }
        Ok(util::from_be_octets_signed(&octets))
    }

    fn integer_octets(&mut self) -> Result<Vec<u8>, DecodeError> {
        match self.length_determinant()? {
            Length::Complete(length) => {
                self.align()?;
                self.octets(length)
            }
            Length::Fragment(_) => Err(DecodeError::IntegerError(
                "Fragmented integer encodings are not supported!".into(),
            )),
        }
    }

    /// INTEGER with the given constraint
    pub fn integer<I: FromPrimitive>(
        &mut self,
        constraint: IntegerConstraint,
    ) -> Result<I, DecodeError> {
        let value = self.integer_i128(constraint)?;
        I::from_i128(value).ok_or_else(|| {
            DecodeError::IntegerError(alloc::format!(
                "Integer value {value} does not fit the target type!"
            ))
        })
    }

    fn integer_i128(&mut self, constraint: IntegerConstraint) -> Result<i128, DecodeError> {
        if constraint.extensible && self.bit()? {
            return self.unconstrained_whole_number();
        }
        match (constraint.min, constraint.range()) {
            (Some(min), Some(range)) => {
                let offset = self.constrained_whole_number(range)?;
                i128::try_from(offset)
                    .ok()
                    .and_then(|offset| min.checked_add(offset))
                    .ok_or_else(|| {
                        DecodeError::IntegerError("Integer value out of bounds!".into())
                    })
            }
            (Some(min), None) => {
                let offset = self.semi_constrained_whole_number()?;
                i128::try_from(offset)
                    .ok()
                    .and_then(|offset| min.checked_add(offset))
                    .ok_or_else(|| {
                        DecodeError::IntegerError("Integer value out of bounds!".into())
                    })
            }
            _ => self.unconstrained_whole_number(),
        }
    }

    /// Normally small non-negative whole number (X.691 §11.6)
    pub fn normally_small_number(&mut self) -> Result<u32, DecodeError> {
        if self.bit()? {
            let value = self.semi_constrained_whole_number()?;
            u32::try_from(value).map_err(|_| {
                DecodeError::IntegerError(alloc::format!(
                    "Normally small number {value} is too large!"
                ))
            })
        } else {
            self.parse(read_as_uint::<u32>(6))
        }
    }

    /// Normally small length (X.691 §11.9.3.4), used for extension bitmaps
    pub fn normally_small_length(&mut self) -> Result<usize, DecodeError> {
        if self.bit()? {
            match self.length_determinant()? {
                Length::Complete(length) => Ok(length),
                Length::Fragment(_) => Err(DecodeError::ParserError(
                    "Fragmented extension bitmap!".into(),
                )),
            }
        } else {
            Ok(self.parse(read_as_uint::<usize>(6))? + 1)
        }
    }

    /// Unconstrained length determinant (X.691 §11.9.3.6-8)
    pub fn length_determinant(&mut self) -> Result<Length, DecodeError> {
        self.align()?;
        let first = self.bits(8)?;
        if first & 0x80 == 0 {
            Ok(Length::Complete(first as usize))
        } else if first & 0x40 == 0 {
            let second = self.bits(8)?;
            Ok(Length::Complete((((first & 0x3f) << 8) | second) as usize))
        } else {
            match first & 0x3f {
                m @ 1..=4 => Ok(Length::Fragment(m as usize * SIXTEEN_K)),
                m => Err(DecodeError::ParserError(alloc::format!(
                    "Invalid fragment multiplier {m} in length determinant!"
                ))),
            }
        }
    }

    fn size_extended(&mut self, size: &SizeConstraint) -> Result<bool, DecodeError> {
        if size.extensible {
            self.bit()
        } else {
            Ok(false)
        }
    }

    /// Length of a size-constrained type, after its extension bit has been read
    fn constrained_length(
        &mut self,
        size: &SizeConstraint,
        extended: bool,
    ) -> Result<Length, DecodeError> {
        if !extended && size.is_constrained_length() {
            let max = size.max.unwrap_or(size.min);
            if max < size.min {
                return Err(DecodeError::ConstraintViolation(
                    "Empty size constraint!".into(),
                ));
            }
            let offset = self.constrained_whole_number((max - size.min) as u128 + 1)?;
            Ok(Length::Complete(size.min + offset as usize))
        } else {
            self.length_determinant()
        }
    }

    fn check_size(
        size: &SizeConstraint,
        extended: bool,
        length: usize,
    ) -> Result<(), DecodeError> {
        if extended || size.permits(length) {
            Ok(())
        } else {
            Err(DecodeError::ConstraintViolation(alloc::format!(
                "Size {length} outside of SIZE({}..{})!",
                size.min,
                size.max
                    .map_or_else(|| String::from("MAX"), |max| alloc::format!("{max}"))
            )))
        }
    }

    fn fragmented<T>(
        &mut self,
        size: &SizeConstraint,
        extended: bool,
        align_content: bool,
        mut read: impl FnMut(&mut Self, usize) -> Result<Vec<T>, DecodeError>,
    ) -> Result<Vec<T>, DecodeError> {
        let mut content = Vec::new();
        loop {
            let (length, last) = match self.constrained_length(size, extended)? {
                Length::Complete(length) => (length, true),
                Length::Fragment(length) => (length, false),
            };
            if length > 0 {
                if align_content {
                    self.align()?;
                }
                content.extend(read(self, length)?);
            }
            if last {
                break;
            }
        }
        Self::check_size(size, extended, content.len())?;
        Ok(content)
    }

    /// OCTET STRING with the given size constraint (X.691 §17)
    pub fn octet_string(&mut self, size: SizeConstraint) -> Result<Vec<u8>, DecodeError> {
        let extended = self.size_extended(&size)?;
        match size.fixed_size().filter(|_| !extended) {
            Some(0) => Ok(Vec::new()),
            Some(fixed) if fixed <= 2 => self.octets(fixed),
            Some(fixed) if fixed < SIXTY_FOUR_K => {
                self.align()?;
                self.octets(fixed)
            }
            _ => self.fragmented(&size, extended, true, |decoder, length| {
                decoder.octets(length)
            }),
        }
    }

    /// BIT STRING with the given size constraint (X.691 §16)
    pub fn bit_string(&mut self, size: SizeConstraint) -> Result<BitVec<u8, Msb0>, DecodeError> {
        let extended = self.size_extended(&size)?;
        match size.fixed_size().filter(|_| !extended) {
            Some(0) => Ok(BitVec::new()),
            Some(fixed) if fixed <= 16 => self.parse(read_bit_string(fixed)),
            Some(fixed) if fixed < SIXTY_FOUR_K => {
                self.align()?;
                self.parse(read_bit_string(fixed))
            }
            _ => {
                let bits = self.fragmented(&size, extended, true, |decoder, length| {
                    decoder
                        .parse(read_bit_string(length))
                        .map(|bits| bits.into_iter().collect::<Vec<bool>>())
                })?;
                Ok(bits.into_iter().collect())
            }
        }
    }

    /// Known-multiplier character string (X.691 §30)
    pub fn character_string(
        &mut self,
        charset: CharacterSet,
        size: SizeConstraint,
    ) -> Result<String, DecodeError> {
        let bits_per_char = charset.bits_per_char(self.options);
        let extended = self.size_extended(&size)?;
        let align_content = match size.max.filter(|_| !extended) {
            Some(max) => max * bits_per_char > 16,
            None => true,
        };
        let read_chars = |decoder: &mut Self, count: usize| {
            (0..count)
                .map(|_| {
                    let code = decoder.parse(read_as_uint::<u32>(bits_per_char))?;
                    char::from_u32(code)
                        .filter(|c| charset.contains(*c))
                        .ok_or_else(|| {
                            DecodeError::StringError(alloc::format!(
                                "Character code {code:#04x} is not part of {}!",
                                charset.name()
                            ))
                        })
                })
                .collect::<Result<Vec<char>, DecodeError>>()
        };
        let chars = match size.fixed_size().filter(|_| !extended) {
            Some(fixed) if fixed < SIXTY_FOUR_K => {
                if align_content {
                    self.align()?;
                }
                read_chars(self, fixed)?
            }
            _ => self.fragmented(&size, extended, align_content, read_chars)?,
        };
        Ok(chars.into_iter().collect())
    }

    /// Index of an ENUMERATED value (X.691 §14)
    pub fn enumerated(
        &mut self,
        root_count: u32,
        extensible: bool,
    ) -> Result<ChoiceIndex, DecodeError> {
        if extensible && self.bit()? {
            return Ok(ChoiceIndex::Extension(self.normally_small_number()?));
        }
        let index = self.constrained_whole_number(u128::from(root_count))?;
        Ok(ChoiceIndex::Root(index as u32))
    }

    /// Index of a CHOICE alternative (X.691 §23)
    ///
    /// The content of an extension alternative follows as an open type.
    pub fn choice_index(
        &mut self,
        root_count: u32,
        extensible: bool,
    ) -> Result<ChoiceIndex, DecodeError> {
        self.enumerated(root_count, extensible)
    }

    /// Extension bit and presence bitmap of a SEQUENCE (X.691 §19.1-3)
    pub fn sequence_preamble(
        &mut self,
        extensible: bool,
        optional_count: usize,
    ) -> Result<SequencePreamble, DecodeError> {
        let extended = extensible && self.bit()?;
        let present = (0..optional_count)
            .map(|_| self.bit())
            .collect::<Result<Vec<bool>, DecodeError>>()?;
        Ok(SequencePreamble { extended, present })
    }

    /// Extension additions of a SEQUENCE whose extension bit was set (X.691 §19.7-9)
    pub fn extension_additions(&mut self) -> Result<ExtensionAdditions, DecodeError> {
        let count = self.normally_small_length()?;
        let bitmap = (0..count)
            .map(|_| self.bit())
            .collect::<Result<Vec<bool>, DecodeError>>()?;
        let additions = bitmap
            .into_iter()
            .map(|present| present.then(|| self.open_type_bytes()).transpose())
            .collect::<Result<Vec<Option<Bytes>>, DecodeError>>()?;
        Ok(ExtensionAdditions(additions))
    }

    /// SEQUENCE OF with the given size constraint (X.691 §20)
    pub fn sequence_of<T>(
        &mut self,
        size: SizeConstraint,
        mut item: impl FnMut(&mut Self) -> Result<T, DecodeError>,
    ) -> Result<Vec<T>, DecodeError> {
        let extended = self.size_extended(&size)?;
        let mut items = Vec::new();
        loop {
            let (count, last) = match size.fixed_size().filter(|_| !extended) {
                Some(fixed) if fixed < SIXTY_FOUR_K => (fixed, true),
                _ => match self.constrained_length(&size, extended)? {
                    Length::Complete(count) => (count, true),
                    Length::Fragment(count) => (count, false),
                },
            };
            if last {
                Self::check_size(&size, extended, items.len() + count)?;
            }
            for _ in 0..count {
                items.push(item(self)?);
            }
            if last {
                break;
            }
        }
        Ok(items)
    }

    /// Contents of an open type (X.691 §11.2) as raw octets
    pub fn open_type_bytes(&mut self) -> Result<Bytes, DecodeError> {
        let content = self.fragmented(
            &SizeConstraint::unbounded(0),
            false,
            true,
            |decoder, length| decoder.octets(length),
        )?;
        Ok(Bytes::from(content))
    }

    /// Open type decoded by `decode` on a decoder over exactly the open-type octets
    ///
    /// The position of `self` advances by the declared length whatever `decode` does.
    pub fn open_type<T>(
        &mut self,
        decode: impl FnOnce(&mut PerDecoder<'_>) -> Result<T, DecodeError>,
    ) -> Result<T, DecodeError> {
        let content = self.open_type_bytes()?;
        let mut inner = PerDecoder::new(&content, self.options);
        decode(&mut inner)
    }
}
