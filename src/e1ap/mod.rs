//! E1 Application Protocol (3GPP TS 37.483) on top of the PER runtime
mod containers;
mod context;
mod dissector;
mod ids;
mod ies;
mod pdu;
mod registry;

pub use containers::{
    IeValue, ProtocolExtensionContainer, ProtocolExtensionField, ProtocolIeContainer,
    ProtocolIeField,
};
pub use context::{DecodePer, PacketContext};
pub use dissector::{E1apConfig, E1apDissector};
pub use ids::{
    MessageType, Procedure, ProcedureCode, ProtocolIeId, MAXNOOF_DRBS, MAXNOOF_ERRORS,
    MAXNOOF_INDIVIDUAL_E1_CONNECTIONS_TO_RESET, MAXNOOF_PDU_SESSION_RESOURCE, MAX_PRIVATE_IES,
    MAX_PROTOCOL_EXTENSIONS, MAX_PROTOCOL_IES, PROCEDURES,
};
pub use ies::*;
pub use pdu::{
    E1apPdu, IeMessage, Message, MessageValue, PrivateIeField, PrivateIeId, PrivateMessage,
};
pub use registry::{IeDecodeFn, MessageDecodeFn, MessageEntry, Registry};

use crate::{
    decode::{Decode, DecodeError, Decoded, PerDecoder},
    per::CodecOptions,
};

macro_rules! decode {
    ($typ:ty) => {
        impl Decode for $typ {
            fn decode<'input, I: Into<&'input [u8]>>(
                input: I,
            ) -> Result<Decoded<Self>, DecodeError> {
                let input = input.into();
                let registry = Registry::e1ap();
                let mut context = PacketContext::new(&registry);
                let mut decoder = PerDecoder::new(input, CodecOptions::e1ap());
                let decoded = <$typ>::decode_per(&mut decoder, &mut context)?;
                Ok(Decoded {
                    bytes_consumed: decoder.consumed_octets(),
                    decoded,
                })
            }
        }
    };
}

decode!(E1apPdu);
decode!(ProtocolIeContainer);
decode!(Cause);
decode!(CriticalityDiagnostics);
decode!(ResetType);
decode!(SecurityInformation);
decode!(ActivityInformation);
