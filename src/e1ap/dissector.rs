extern crate alloc;

use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    decode::{DecodeError, Decoded, PerDecoder},
    e1ap::{
        context::{DecodePer, PacketContext},
        pdu::E1apPdu,
        registry::Registry,
    },
    per::CodecOptions,
    transport::{decode_tcp_pdu, TcpFrames, E1AP_PROTOCOL_ID, E1AP_SCTP_PORT},
};

/// Transport parameters and codec variant of an E1 association
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct E1apConfig {
    pub sctp_port: u16,
    pub sctp_ppid: u32,
    /// E1AP over TCP has no registered port
    pub tcp_port: Option<u16>,
    pub options: CodecOptions,
}

impl Default for E1apConfig {
    fn default() -> Self {
        Self {
            sctp_port: E1AP_SCTP_PORT,
            sctp_ppid: E1AP_PROTOCOL_ID,
            tcp_port: None,
            options: CodecOptions::e1ap(),
        }
    }
}

/// Decodes E1AP PDUs against a fixed registry
///
/// The dissector keeps no state between calls, so a single instance can serve
/// any number of associations and threads.
#[derive(Debug, Clone)]
pub struct E1apDissector {
    config: E1apConfig,
    registry: Registry,
}

impl Default for E1apDissector {
    fn default() -> Self {
        Self::new(E1apConfig::default())
    }
}

impl E1apDissector {
    pub fn new(config: E1apConfig) -> Self {
        Self::with_registry(config, Registry::e1ap())
    }

    pub fn with_registry(config: E1apConfig, registry: Registry) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &E1apConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Decodes one PDU from the start of `input`
    ///
    /// Octets after the PDU are left alone; `bytes_consumed` tells where it ended.
    pub fn dissect(&self, input: &[u8]) -> Result<Decoded<E1apPdu>, DecodeError> {
        let mut context = PacketContext::new(&self.registry);
        let mut decoder = PerDecoder::new(input, self.config.options);
        let pdu = E1apPdu::decode_per(&mut decoder, &mut context)?;
        let bytes_consumed = decoder.consumed_octets();
        if bytes_consumed < input.len() {
            log::debug!(
                "{} trailing octets after {pdu}",
                input.len() - bytes_consumed
            );
        }
        Ok(Decoded {
            bytes_consumed,
            decoded: pdu,
        })
    }

    /// Decodes the payload of an SCTP DATA chunk
    pub fn dissect_sctp(&self, ppid: u32, payload: &[u8]) -> Result<Decoded<E1apPdu>, DecodeError> {
        if ppid != self.config.sctp_ppid {
            return Err(DecodeError::FramingError(alloc::format!(
                "SCTP payload protocol identifier {ppid} is not E1AP ({})!",
                self.config.sctp_ppid
            )));
        }
        self.dissect(payload)
    }

    /// Decodes a single length-prefixed TCP frame
    pub fn dissect_tcp_frame(&self, frame: &[u8]) -> Result<Decoded<E1apPdu>, DecodeError> {
        self.dissect(decode_tcp_pdu(frame)?)
    }

    /// Decodes every PDU of a TCP stream
    pub fn dissect_tcp(&self, stream: &[u8]) -> Vec<Result<Decoded<E1apPdu>, DecodeError>> {
        TcpFrames::new(stream)
            .map(|frame| frame.and_then(|pdu| self.dissect(pdu)))
            .collect()
    }
}
