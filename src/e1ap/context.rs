extern crate alloc;

use alloc::string::ToString;
use bytes::Bytes;

use crate::{
    decode::{DecodeError, PerDecoder},
    e1ap::{
        ids::{MessageType, ProcedureCode, ProtocolIeId},
        registry::{IeDecodeFn, Registry},
        IeValue,
    },
    per::CodecOptions,
};

const MAX_NESTING: usize = 32;

/// Decoding of an E1AP type from Aligned PER
///
/// Decoders get the per-packet context so that they can resolve nested
/// information elements through the registry.
pub trait DecodePer: Sized {
    fn decode_per(
        decoder: &mut PerDecoder<'_>,
        context: &mut PacketContext<'_>,
    ) -> Result<Self, DecodeError>;
}

/// State shared by all decoders of a single PDU
///
/// A fresh context is created for every decoded PDU and dropped with it.
#[derive(Debug, Clone)]
pub struct PacketContext<'r> {
    registry: &'r Registry,
    pub message_type: Option<MessageType>,
    pub procedure_code: Option<ProcedureCode>,
    pub protocol_ie_id: Option<ProtocolIeId>,
    pub protocol_extension_id: Option<ProtocolIeId>,
    depth: usize,
}

impl<'r> PacketContext<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            message_type: None,
            procedure_code: None,
            protocol_ie_id: None,
            protocol_extension_id: None,
            depth: 0,
        }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Number of open types currently being decoded
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn ie_decoder(&self, id: ProtocolIeId) -> Option<IeDecodeFn> {
        self.registry
            .ie_decoder(self.procedure_code, self.message_type, id)
    }

    pub(crate) fn extension_decoder(&self, id: ProtocolIeId) -> Option<IeDecodeFn> {
        self.registry.extension_decoder(id)
    }

    /// Runs `decode` on the contents of an open type
    ///
    /// A missing decoder or an empty payload yields `IeValue::Unparsed`, a failing
    /// decoder yields `IeValue::Malformed`. Either way the caller's cursor has already
    /// moved past the open type.
    pub(crate) fn dispatch(
        &mut self,
        decode: Option<IeDecodeFn>,
        raw: Bytes,
        options: CodecOptions,
    ) -> Result<IeValue, DecodeError> {
        let Some(decode) = decode else {
            return Ok(IeValue::Unparsed(raw));
        };
        if raw.is_empty() {
            return Ok(IeValue::Unparsed(raw));
        }
        if self.depth >= MAX_NESTING {
            return Err(DecodeError::ParserError(alloc::format!(
                "Open types nested deeper than {MAX_NESTING} levels!"
            )));
        }
        self.depth += 1;
        let mut inner = PerDecoder::new(&raw, options);
        let result = decode(&mut inner, self);
        self.depth -= 1;
        match result {
            Ok(value) => Ok(value),
            Err(error) => {
                log::warn!("malformed IE content: {error}");
                Ok(IeValue::Malformed {
                    reason: error.to_string(),
                    raw,
                })
            }
        }
    }
}
