//! `E1AP-PDU` and the elementary procedure messages (TS 37.483 §9.4.2-9.4.4)
extern crate alloc;

use alloc::{string::String, string::ToString, vec::Vec};
use bytes::Bytes;
use core::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    decode::{DecodeError, PerDecoder},
    e1ap::{
        containers::ProtocolIeContainer,
        context::{DecodePer, PacketContext},
        ids::{MessageType, ProcedureCode, MAX_PRIVATE_IES},
        ies::Criticality,
    },
    encode::{Encode, EncodeError, Encoder},
    per::{ChoiceIndex, ExtensionAdditions, IntegerConstraint, SizeConstraint},
};

/// `E1AP-PDU ::= CHOICE { initiatingMessage, successfulOutcome, unsuccessfulOutcome, ... }`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum E1apPdu {
    InitiatingMessage(Message),
    SuccessfulOutcome(Message),
    UnsuccessfulOutcome(Message),
    /// Alternative added in a later release, kept as its open-type content
    Extension { index: u32, value: Bytes },
}

impl E1apPdu {
    pub fn message_type(&self) -> Option<MessageType> {
        match self {
            E1apPdu::InitiatingMessage(_) => Some(MessageType::InitiatingMessage),
            E1apPdu::SuccessfulOutcome(_) => Some(MessageType::SuccessfulOutcome),
            E1apPdu::UnsuccessfulOutcome(_) => Some(MessageType::UnsuccessfulOutcome),
            E1apPdu::Extension { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&Message> {
        match self {
            E1apPdu::InitiatingMessage(message)
            | E1apPdu::SuccessfulOutcome(message)
            | E1apPdu::UnsuccessfulOutcome(message) => Some(message),
            E1apPdu::Extension { .. } => None,
        }
    }
}

impl DecodePer for E1apPdu {
    fn decode_per(
        decoder: &mut PerDecoder<'_>,
        context: &mut PacketContext<'_>,
    ) -> Result<Self, DecodeError> {
        match decoder.choice_index(3, true)? {
            ChoiceIndex::Root(0) => {
                Message::decode_as(MessageType::InitiatingMessage, decoder, context)
                    .map(Self::InitiatingMessage)
            }
            ChoiceIndex::Root(1) => {
                Message::decode_as(MessageType::SuccessfulOutcome, decoder, context)
                    .map(Self::SuccessfulOutcome)
            }
            ChoiceIndex::Root(2) => {
                Message::decode_as(MessageType::UnsuccessfulOutcome, decoder, context)
                    .map(Self::UnsuccessfulOutcome)
            }
            ChoiceIndex::Root(index) => Err(DecodeError::EnumError(alloc::format!(
                "Invalid E1AP-PDU choice index {index}!"
            ))),
            ChoiceIndex::Extension(index) => {
                let value = decoder.open_type_bytes()?;
                log::debug!("Unknown E1AP-PDU extension {index}, {} octets", value.len());
                Ok(Self::Extension { index, value })
            }
        }
    }
}

impl Encode for E1apPdu {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        let (index, message) = match self {
            E1apPdu::InitiatingMessage(message) => (0, message),
            E1apPdu::SuccessfulOutcome(message) => (1, message),
            E1apPdu::UnsuccessfulOutcome(message) => (2, message),
            E1apPdu::Extension { index, value } => {
                output.choice_index(ChoiceIndex::Extension(*index), 3, true)?;
                return output.open_type_bytes(value);
            }
        };
        output.choice_index(ChoiceIndex::Root(index), 3, true)?;
        message.encode(output)
    }
}

impl Display for E1apPdu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.message_type(), self.message()) {
            (Some(message_type), Some(message)) => match message.name() {
                Some(name) => write!(f, "{name}"),
                None => write!(f, "{} of {}", message_type.name(), message.procedure_code),
            },
            _ => write!(f, "E1AP-PDU extension"),
        }
    }
}

/// `InitiatingMessage`, `SuccessfulOutcome` and `UnsuccessfulOutcome` share this layout
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Message {
    pub procedure_code: ProcedureCode,
    pub criticality: Criticality,
    pub value: MessageValue,
}

impl Message {
    /// Decodes a message and resolves its value through the procedure table
    pub fn decode_as(
        message_type: MessageType,
        decoder: &mut PerDecoder<'_>,
        context: &mut PacketContext<'_>,
    ) -> Result<Self, DecodeError> {
        context.message_type = Some(message_type);
        let procedure_code = ProcedureCode::decode_per(decoder, context)?;
        context.procedure_code = Some(procedure_code);
        let criticality = Criticality::decode_per(decoder, context)?;
        let raw = decoder.open_type_bytes()?;
        let value = match context.registry().message(message_type, procedure_code) {
            Some(entry) => {
                log::trace!("{} ({} octets)", entry.name, raw.len());
                let mut inner = PerDecoder::new(&raw, decoder.options());
                match (entry.decode)(&mut inner, context, entry.name) {
                    Ok(value) => value,
                    Err(error) => {
                        log::warn!("malformed {}: {error}", entry.name);
                        MessageValue::Malformed {
                            reason: error.to_string(),
                            raw,
                        }
                    }
                }
            }
            None => {
                log::debug!("No {} registered for {procedure_code}", message_type.name());
                MessageValue::Unknown(raw)
            }
        };
        Ok(Self {
            procedure_code,
            criticality,
            value,
        })
    }

    pub fn name(&self) -> Option<&'static str> {
        match &self.value {
            MessageValue::Ies(message) => Some(message.name),
            MessageValue::Private(_) => Some("PrivateMessage"),
            MessageValue::Unknown(_) | MessageValue::Malformed { .. } => None,
        }
    }

    /// Protocol IEs of the message body, if it has been decoded
    pub fn protocol_ies(&self) -> Option<&ProtocolIeContainer> {
        match &self.value {
            MessageValue::Ies(message) => Some(&message.protocol_ies),
            _ => None,
        }
    }
}

impl Encode for Message {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        self.procedure_code.encode(output)?;
        self.criticality.encode(output)?;
        match &self.value {
            MessageValue::Ies(message) => output.open_type(message),
            MessageValue::Private(message) => output.open_type(message),
            MessageValue::Unknown(raw) | MessageValue::Malformed { raw, .. } => {
                output.open_type_bytes(raw)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum MessageValue {
    Ies(IeMessage),
    Private(PrivateMessage),
    /// Procedure code without a table entry for the message type
    Unknown(Bytes),
    Malformed { reason: String, raw: Bytes },
}

/// Message body `SEQUENCE { protocolIEs ProtocolIE-Container, ... }`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct IeMessage {
    pub name: &'static str,
    pub protocol_ies: ProtocolIeContainer,
    pub extension_additions: ExtensionAdditions,
}

impl IeMessage {
    pub fn new(name: &'static str, protocol_ies: ProtocolIeContainer) -> Self {
        Self {
            name,
            protocol_ies,
            extension_additions: ExtensionAdditions::default(),
        }
    }
}

impl Encode for IeMessage {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        output.sequence_preamble(true, !self.extension_additions.is_empty(), &[]);
        self.protocol_ies.encode(output)?;
        output.extension_additions(&self.extension_additions)
    }
}

pub(crate) fn decode_ie_message(
    decoder: &mut PerDecoder<'_>,
    context: &mut PacketContext<'_>,
    name: &'static str,
) -> Result<MessageValue, DecodeError> {
    let preamble = decoder.sequence_preamble(true, 0)?;
    let protocol_ies = ProtocolIeContainer::decode_per(decoder, context)?;
    let extension_additions = if preamble.extended {
        decoder.extension_additions()?
    } else {
        ExtensionAdditions::default()
    };
    Ok(MessageValue::Ies(IeMessage {
        name,
        protocol_ies,
        extension_additions,
    }))
}

/// `PrivateIE-ID ::= CHOICE { local INTEGER (0..65535), global OBJECT IDENTIFIER }`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum PrivateIeId {
    Local(u16),
    /// Contents octets of the object identifier
    Global(Bytes),
}

impl DecodePer for PrivateIeId {
    fn decode_per(
        decoder: &mut PerDecoder<'_>,
        _: &mut PacketContext<'_>,
    ) -> Result<Self, DecodeError> {
        match decoder.choice_index(2, false)? {
            ChoiceIndex::Root(0) => decoder
                .integer(IntegerConstraint::constrained(0, 65535))
                .map(Self::Local),
            _ => decoder
                .octet_string(SizeConstraint::unbounded(0))
                .map(|oid| Self::Global(Bytes::from(oid))),
        }
    }
}

impl Encode for PrivateIeId {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        match self {
            Self::Local(id) => {
                output.choice_index(ChoiceIndex::Root(0), 2, false)?;
                output.integer(id, IntegerConstraint::constrained(0, 65535))
            }
            Self::Global(oid) => {
                output.choice_index(ChoiceIndex::Root(1), 2, false)?;
                output.octet_string(oid, SizeConstraint::unbounded(0))
            }
        }
    }
}

/// `PrivateIE-Field`, the value stays opaque
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PrivateIeField {
    pub id: PrivateIeId,
    pub criticality: Criticality,
    pub value: Bytes,
}

impl DecodePer for PrivateIeField {
    fn decode_per(
        decoder: &mut PerDecoder<'_>,
        context: &mut PacketContext<'_>,
    ) -> Result<Self, DecodeError> {
        Ok(Self {
            id: PrivateIeId::decode_per(decoder, context)?,
            criticality: Criticality::decode_per(decoder, context)?,
            value: decoder.open_type_bytes()?,
        })
    }
}

impl Encode for PrivateIeField {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        self.id.encode(output)?;
        self.criticality.encode(output)?;
        output.open_type_bytes(&self.value)
    }
}

/// `PrivateMessage ::= SEQUENCE { privateIEs PrivateIE-Container, ... }`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PrivateMessage {
    pub private_ies: Vec<PrivateIeField>,
    pub extension_additions: ExtensionAdditions,
}

impl PrivateMessage {
    const SIZE: SizeConstraint = SizeConstraint::range(1, MAX_PRIVATE_IES);
}

impl Encode for PrivateMessage {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        output.sequence_preamble(true, !self.extension_additions.is_empty(), &[]);
        output.sequence_of(&self.private_ies, Self::SIZE, |output, field| {
            field.encode(output)
        })?;
        output.extension_additions(&self.extension_additions)
    }
}

pub(crate) fn decode_private_message(
    decoder: &mut PerDecoder<'_>,
    context: &mut PacketContext<'_>,
    _: &'static str,
) -> Result<MessageValue, DecodeError> {
    let preamble = decoder.sequence_preamble(true, 0)?;
    let private_ies = decoder.sequence_of(PrivateMessage::SIZE, |decoder| {
        PrivateIeField::decode_per(decoder, context)
    })?;
    let extension_additions = if preamble.extended {
        decoder.extension_additions()?
    } else {
        ExtensionAdditions::default()
    };
    Ok(MessageValue::Private(PrivateMessage {
        private_ies,
        extension_additions,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        decode::Decode,
        e1ap::{
            containers::{IeValue, ProtocolIeField},
            ids::ProtocolIeId,
            ies::*,
        },
    };
    use pretty_assertions::assert_eq;

    const RESET: [u8; 13] = [
        0x00, 0x00, 0x00, 0x09, 0x00, 0x00, 0x01, 0x00, 0x39, 0x00, 0x02, 0x00, 0x05,
    ];

    fn reset() -> E1apPdu {
        E1apPdu::InitiatingMessage(Message {
            procedure_code: ProcedureCode::RESET,
            criticality: Criticality::Reject,
            value: MessageValue::Ies(IeMessage::new(
                "Reset",
                ProtocolIeContainer(vec![ProtocolIeField::new(
                    ProtocolIeId::TRANSACTION_ID,
                    Criticality::Reject,
                    TransactionId(5),
                )]),
            )),
        })
    }

    #[test]
    fn decode_reset() {
        let decoded = E1apPdu::decode(&RESET[..]).unwrap();
        assert_eq!(13, decoded.bytes_consumed);
        assert_eq!(reset(), decoded.decoded);
        assert_eq!("Reset", alloc::format!("{}", decoded.decoded));
    }

    #[test]
    fn encode_reset() {
        assert_eq!(RESET.to_vec(), reset().encode_to_vec().unwrap());
    }

    #[cfg(feature = "json")]
    #[test]
    fn reset_as_json() {
        let decoded = E1apPdu::decode(&RESET[..]).unwrap().decoded;
        assert_eq!(
            concat!(
                r#"{"InitiatingMessage":{"procedure_code":0,"criticality":"Reject","#,
                r#""value":{"Ies":{"name":"Reset","protocol_ies":[{"id":57,"#,
                r#""criticality":"Reject","value":{"TransactionId":5}}],"#,
                r#""extension_additions":[]}}}}"#
            ),
            decoded.encode_to_json().unwrap()
        );
    }

    #[test]
    fn setup_failure_with_cause() {
        let pdu = E1apPdu::UnsuccessfulOutcome(Message {
            procedure_code: ProcedureCode::GNB_CU_UP_E1_SETUP,
            criticality: Criticality::Reject,
            value: MessageValue::Ies(IeMessage::new(
                "GNB-CU-UP-E1SetupFailure",
                ProtocolIeContainer(vec![
                    ProtocolIeField::new(
                        ProtocolIeId::TRANSACTION_ID,
                        Criticality::Reject,
                        TransactionId(1),
                    ),
                    ProtocolIeField::new(
                        ProtocolIeId::CAUSE,
                        Criticality::Ignore,
                        Cause::Misc(CauseMisc::Unspecified),
                    ),
                    ProtocolIeField::new(
                        ProtocolIeId::TIME_TO_WAIT,
                        Criticality::Ignore,
                        TimeToWait::V10s,
                    ),
                ]),
            )),
        });
        let encoded = pdu.encode_to_vec().unwrap();
        let decoded = E1apPdu::decode(encoded.as_slice()).unwrap();
        assert_eq!(encoded.len(), decoded.bytes_consumed);
        assert_eq!(pdu, decoded.decoded);
    }

    #[test]
    fn unknown_procedure_is_kept_raw() {
        // initiatingMessage, procedure 200, ignore, two opaque octets
        let input = [0x00, 0xc8, 0x40, 0x02, 0xab, 0xcd];
        let decoded = E1apPdu::decode(&input[..]).unwrap();
        assert_eq!(
            E1apPdu::InitiatingMessage(Message {
                procedure_code: ProcedureCode(200),
                criticality: Criticality::Ignore,
                value: MessageValue::Unknown(Bytes::from_static(&[0xab, 0xcd])),
            }),
            decoded.decoded
        );
        assert_eq!(input.to_vec(), decoded.decoded.encode_to_vec().unwrap());
    }

    #[test]
    fn pdu_extension_alternative() {
        // extension bit, normally small number 0, open type of one octet
        let input = [0x80, 0x01, 0x42];
        let decoded = E1apPdu::decode(&input[..]).unwrap();
        assert_eq!(
            E1apPdu::Extension {
                index: 0,
                value: Bytes::from_static(&[0x42])
            },
            decoded.decoded
        );
        assert_eq!(3, decoded.bytes_consumed);
        assert_eq!(None, decoded.decoded.message_type());
        assert_eq!(input.to_vec(), decoded.decoded.encode_to_vec().unwrap());
    }

    #[test]
    fn message_extension_additions_are_skipped() {
        // Reset body with the extension bit set and one unknown addition
        let input = [
            0x00, 0x00, 0x00, 0x0c, // header, 12 octets of value
            0x80, 0x00, 0x01, 0x00, 0x39, 0x00, 0x02, 0x00, 0x05, // extended, TransactionID 5
            0x01, 0x01, 0x07, // one addition, present, 1 octet
        ];
        let decoded = E1apPdu::decode(&input[..]).unwrap();
        assert_eq!(input.len(), decoded.bytes_consumed);
        let message = decoded.decoded.message().unwrap();
        assert_eq!(
            Some(&IeValue::TransactionId(TransactionId(5))),
            message
                .protocol_ies()
                .and_then(|ies| ies.get(ProtocolIeId::TRANSACTION_ID))
        );
        match &message.value {
            MessageValue::Ies(body) => assert_eq!(
                ExtensionAdditions(vec![Some(Bytes::from_static(&[0x07]))]),
                body.extension_additions
            ),
            other => panic!("unexpected message value {other:?}"),
        }
        assert_eq!(input.to_vec(), decoded.decoded.encode_to_vec().unwrap());
    }

    #[test]
    fn private_message() {
        let pdu = E1apPdu::InitiatingMessage(Message {
            procedure_code: ProcedureCode::PRIVATE_MESSAGE,
            criticality: Criticality::Ignore,
            value: MessageValue::Private(PrivateMessage {
                private_ies: vec![
                    PrivateIeField {
                        id: PrivateIeId::Local(17),
                        criticality: Criticality::Ignore,
                        value: Bytes::from_static(&[1, 2, 3]),
                    },
                    PrivateIeField {
                        id: PrivateIeId::Global(Bytes::from_static(&[0x2a, 0x86, 0x48])),
                        criticality: Criticality::Notify,
                        value: Bytes::from_static(&[0xff]),
                    },
                ],
                extension_additions: ExtensionAdditions::default(),
            }),
        });
        let encoded = pdu.encode_to_vec().unwrap();
        let decoded = E1apPdu::decode(encoded.as_slice()).unwrap();
        assert_eq!(pdu, decoded.decoded);
        assert_eq!(Some("PrivateMessage"), decoded.decoded.message().unwrap().name());
    }

    #[test]
    fn truncated_pdu_is_an_error() {
        assert!(matches!(
            E1apPdu::decode(&RESET[..6]),
            Err(DecodeError::Truncated(_))
        ));
    }
}
