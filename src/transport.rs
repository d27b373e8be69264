//! SCTP and TCP transport of E1AP PDUs
//!
//! On SCTP every DATA chunk carries exactly one PDU. Over TCP each PDU is
//! prefixed with its size as a 4-octet big-endian integer.
extern crate alloc;

use nom::{bytes::streaming::take, number::streaming::be_u32, Needed};

use crate::decode::{DecodeError, IResult};

/// IANA-registered SCTP port of the E1 interface
pub const E1AP_SCTP_PORT: u16 = 38462;
/// SCTP payload protocol identifier of E1AP
pub const E1AP_PROTOCOL_ID: u32 = 64;

const LENGTH_PREFIX: usize = 4;

/// Size of the TCP frame starting with `header`, length prefix included
///
/// Returns `None` until the complete prefix is available.
pub fn tcp_pdu_len(header: &[u8]) -> Option<usize> {
    let prefix: [u8; LENGTH_PREFIX] = header.get(..LENGTH_PREFIX)?.try_into().ok()?;
    Some(LENGTH_PREFIX + u32::from_be_bytes(prefix) as usize)
}

/// Splits one length-prefixed PDU off a TCP stream
pub fn split_tcp_frame(input: &[u8]) -> IResult<&[u8], &[u8]> {
    let (input, length) = be_u32(input)?;
    take(length)(input)
}

/// PDU of a single TCP frame whose length prefix must cover exactly the rest of the frame
pub fn decode_tcp_pdu(frame: &[u8]) -> Result<&[u8], DecodeError> {
    let expected = tcp_pdu_len(frame).ok_or_else(|| {
        DecodeError::FramingError(alloc::format!(
            "TCP frame of {} octets lacks the length prefix!",
            frame.len()
        ))
    })?;
    if expected != frame.len() {
        return Err(DecodeError::FramingError(alloc::format!(
            "Length prefix announces {} octets, frame holds {}!",
            expected - LENGTH_PREFIX,
            frame.len() - LENGTH_PREFIX
        )));
    }
    Ok(&frame[LENGTH_PREFIX..])
}

/// Iterator over the PDUs of a TCP stream
///
/// An incomplete trailing frame is reported once as a `FramingError`, then
/// iteration stops.
#[derive(Debug, Clone)]
pub struct TcpFrames<'input> {
    rest: &'input [u8],
    failed: bool,
}

impl<'input> TcpFrames<'input> {
    pub fn new(stream: &'input [u8]) -> Self {
        Self {
            rest: stream,
            failed: false,
        }
    }

    /// Octets not yet handed out
    pub fn remaining(&self) -> &'input [u8] {
        self.rest
    }
}

impl<'input> Iterator for TcpFrames<'input> {
    type Item = Result<&'input [u8], DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.rest.is_empty() {
            return None;
        }
        match split_tcp_frame(self.rest) {
            Ok((rest, pdu)) => {
                self.rest = rest;
                Some(Ok(pdu))
            }
            Err(nom::Err::Incomplete(needed)) => {
                self.failed = true;
                let missing = match needed {
                    Needed::Size(size) => alloc::format!("{size} more octets"),
                    Needed::Unknown => "more octets".into(),
                };
                Some(Err(DecodeError::FramingError(alloc::format!(
                    "Incomplete TCP frame, {missing} needed!"
                ))))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pdu_len_from_prefix() {
        assert_eq!(Some(9), tcp_pdu_len(&[0, 0, 0, 5, 0xaa]));
        assert_eq!(Some(4), tcp_pdu_len(&[0, 0, 0, 0]));
        assert_eq!(None, tcp_pdu_len(&[0, 0, 1]));
    }

    #[test]
    fn split_frames() {
        let stream = [0, 0, 0, 2, 0xaa, 0xbb, 0, 0, 0, 1, 0xcc];
        let frames: Vec<_> = TcpFrames::new(&stream).collect();
        assert_eq!(vec![Ok(&[0xaa, 0xbb][..]), Ok(&[0xcc][..])], frames);
    }

    #[test]
    fn incomplete_trailing_frame() {
        let stream = [0, 0, 0, 1, 0xaa, 0, 0, 0, 3, 0xbb];
        let mut frames = TcpFrames::new(&stream);
        assert_eq!(Some(Ok(&[0xaa][..])), frames.next());
        assert_eq!(
            Some(Err(DecodeError::FramingError(
                "Incomplete TCP frame, 2 more octets needed!".into()
            ))),
            frames.next()
        );
        assert_eq!(None, frames.next());
        assert_eq!(&[0, 0, 0, 3, 0xbb][..], frames.remaining());
    }

    #[test]
    fn length_prefix_must_match() {
        assert_eq!(Ok(&[0xaa, 0xbb][..]), decode_tcp_pdu(&[0, 0, 0, 2, 0xaa, 0xbb]));
        assert!(matches!(
            decode_tcp_pdu(&[0, 0, 0, 3, 0xaa, 0xbb]),
            Err(DecodeError::FramingError(_))
        ));
        assert!(matches!(
            decode_tcp_pdu(&[0, 0, 0, 1, 0xaa, 0xbb]),
            Err(DecodeError::FramingError(_))
        ));
        assert!(matches!(
            decode_tcp_pdu(&[0, 0]),
            Err(DecodeError::FramingError(_))
        ));
    }
}
