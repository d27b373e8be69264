#![doc = include_str!("../README.md")]
#![cfg(not(doctest))]
#![cfg_attr(not(test), no_std)]
extern crate alloc;

mod decode;
pub mod e1ap;
mod encode;
pub mod per;
pub mod transport;
pub(crate) mod util;

pub use decode::{Decode, DecodeError, Decoded, IResult, Length, PerDecoder};
pub use e1ap::{E1apConfig, E1apDissector, E1apPdu, Registry};
pub use encode::{Encode, EncodeError, Encoder};
pub use per::{Alignment, CodecOptions};
