use num::Integer;

/// Number of bits needed to tell `range` distinct values apart, i.e. `ceil(log2(range))`
pub(crate) fn bit_width(range: u128) -> usize {
    if range <= 1 {
        0
    } else {
        (128 - (range - 1).leading_zeros()) as usize
    }
}

/// Minimal number of octets holding the non-negative binary integer `value` (at least one)
pub(crate) fn octet_width(value: u128) -> usize {
    let bits = (128 - value.leading_zeros()) as usize;
    Integer::div_ceil(&bits, &8usize).max(1)
}

/// Minimal number of octets holding the 2's-complement binary integer `value`
pub(crate) fn signed_octet_width(value: i128) -> usize {
    (1..16)
        .find(|octets| {
            let bits = octets * 8 - 1;
            value >= -(1i128 << bits) && value < (1i128 << bits)
        })
        .unwrap_or(16)
}

/// Padding bits between `position` and the next octet boundary
pub(crate) fn padding_bits(position: usize) -> usize {
    (8 - position % 8) % 8
}

/// Reassembles a big-endian non-negative integer
pub(crate) fn from_be_octets(octets: &[u8]) -> u128 {
    octets
        .iter()
        .fold(0u128, |acc, octet| (acc << 8) | u128::from(*octet))
}

/// Reassembles a big-endian 2's-complement integer
pub(crate) fn from_be_octets_signed(octets: &[u8]) -> i128 {
    let init = match octets.first() {
        Some(first) if first & 0x80 != 0 => -1i128,
        _ => 0,
    };
    octets
        .iter()
        .fold(init, |acc, octet| (acc << 8) | i128::from(*octet))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_bit_width() {
        assert_eq!(0, bit_width(1));
        assert_eq!(1, bit_width(2));
        assert_eq!(2, bit_width(3));
        assert_eq!(8, bit_width(256));
        assert_eq!(9, bit_width(257));
        assert_eq!(32, bit_width(1 << 32));
        assert_eq!(64, bit_width(1 << 64));
    }

    #[test]
    fn computes_octet_width() {
        assert_eq!(1, octet_width(0));
        assert_eq!(1, octet_width(255));
        assert_eq!(2, octet_width(256));
        assert_eq!(5, octet_width(68_719_476_735));
        assert_eq!(1, signed_octet_width(-128));
        assert_eq!(2, signed_octet_width(128));
        assert_eq!(2, signed_octet_width(-129));
    }

    #[test]
    fn reassembles_integers() {
        assert_eq!(0x0102, from_be_octets(&[0x01, 0x02]));
        assert_eq!(-1, from_be_octets_signed(&[0xff]));
        assert_eq!(-256, from_be_octets_signed(&[0xff, 0x00]));
        assert_eq!(127, from_be_octets_signed(&[0x7f]));
        assert_eq!(3, padding_bits(5));
        assert_eq!(0, padding_bits(16));
    }
}
