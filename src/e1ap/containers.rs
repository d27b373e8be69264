//! Protocol IE and protocol extension containers (TS 37.483 §9.4.7)
extern crate alloc;

use alloc::{string::String, vec::Vec};
use bytes::Bytes;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    decode::{DecodeError, PerDecoder},
    e1ap::{
        context::{DecodePer, PacketContext},
        ids::{ProtocolIeId, MAX_PROTOCOL_EXTENSIONS, MAX_PROTOCOL_IES},
        ies::*,
    },
    encode::{Encode, EncodeError, Encoder},
    per::SizeConstraint,
};

macro_rules! ie_value {
    ($($variant:ident($typ:ty)),+ $(,)?) => {
        /// Value of a protocol IE or protocol extension
        ///
        /// IEs without a registered decoder stay `Unparsed`, IEs whose decoder failed
        /// are `Malformed`. Both keep the raw open-type content.
        #[derive(Debug, Clone, PartialEq)]
        #[cfg_attr(feature = "serde", derive(Serialize))]
        pub enum IeValue {
            $($variant($typ),)+
            Unparsed(Bytes),
            Malformed { reason: String, raw: Bytes },
        }

        $(
            impl From<$typ> for IeValue {
                fn from(value: $typ) -> Self {
                    IeValue::$variant(value)
                }
            }
        )+

        impl Encode for IeValue {
            fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
                match self {
                    $(IeValue::$variant(value) => value.encode(output),)+
                    IeValue::Unparsed(raw) | IeValue::Malformed { raw, .. } => {
                        output.write_octets(raw);
                        Ok(())
                    }
                }
            }
        }
    };
}

ie_value!(
    Cause(Cause),
    CriticalityDiagnostics(CriticalityDiagnostics),
    GnbCuCpUeE1apId(GnbCuCpUeE1apId),
    GnbCuUpUeE1apId(GnbCuUpUeE1apId),
    ResetType(ResetType),
    UeAssociatedLogicalE1ConnectionItem(UeAssociatedLogicalE1ConnectionItem),
    GnbCuUpId(GnbCuUpId),
    GnbCuUpName(GnbCuUpName),
    GnbCuCpName(GnbCuCpName),
    CnSupport(CnSupport),
    TimeToWait(TimeToWait),
    SecurityInformation(SecurityInformation),
    BitRate(BitRate),
    SystemBearerContext(SystemBearerContext),
    ActivityNotificationLevel(ActivityNotificationLevel),
    ActivityInformation(ActivityInformation),
    TransactionId(TransactionId),
    PlmnIdentity(PlmnIdentity),
    InactivityTimer(InactivityTimer),
    Ppi(Ppi),
    GnbCuUpCapacity(GnbCuUpCapacity),
    DataDiscardRequired(DataDiscardRequired),
    GnbDuId(GnbDuId),
    RanUeId(RanUeId),
);

impl IeValue {
    pub fn is_unparsed(&self) -> bool {
        matches!(self, IeValue::Unparsed(_))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, IeValue::Malformed { .. })
    }

    fn encode_open_type(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        match self {
            IeValue::Unparsed(raw) | IeValue::Malformed { raw, .. } => output.open_type_bytes(raw),
            value => output.open_type(value),
        }
    }
}

/// `ProtocolIE-Field`, also the content of a `ProtocolIE-SingleContainer`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ProtocolIeField {
    pub id: ProtocolIeId,
    pub criticality: Criticality,
    pub value: IeValue,
}

impl ProtocolIeField {
    pub fn new(id: ProtocolIeId, criticality: Criticality, value: impl Into<IeValue>) -> Self {
        Self {
            id,
            criticality,
            value: value.into(),
        }
    }
}

impl DecodePer for ProtocolIeField {
    fn decode_per(
        decoder: &mut PerDecoder<'_>,
        context: &mut PacketContext<'_>,
    ) -> Result<Self, DecodeError> {
        let id = ProtocolIeId::decode_per(decoder, context)?;
        let criticality = Criticality::decode_per(decoder, context)?;
        let raw = decoder.open_type_bytes()?;
        log::trace!("{id}, criticality {}, {} octets", criticality.label(), raw.len());
        let outer = context.protocol_ie_id.replace(id);
        let decode = context.ie_decoder(id);
        if decode.is_none() {
            log::debug!("No decoder for {id}, keeping raw value");
        }
        let value = context.dispatch(decode, raw, decoder.options());
        context.protocol_ie_id = outer;
        Ok(Self {
            id,
            criticality,
            value: value?,
        })
    }
}

impl Encode for ProtocolIeField {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        self.id.encode(output)?;
        self.criticality.encode(output)?;
        self.value.encode_open_type(output)
    }
}

/// `ProtocolIE-Container`
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ProtocolIeContainer(pub Vec<ProtocolIeField>);

impl ProtocolIeContainer {
    pub const SIZE: SizeConstraint = SizeConstraint::range(0, MAX_PROTOCOL_IES);

    /// Container whose instantiation narrows the number of fields
    pub fn decode_bounded(
        decoder: &mut PerDecoder<'_>,
        context: &mut PacketContext<'_>,
        size: SizeConstraint,
    ) -> Result<Self, DecodeError> {
        decoder
            .sequence_of(size, |decoder| ProtocolIeField::decode_per(decoder, context))
            .map(Self)
    }

    pub fn encode_bounded(
        &self,
        output: &mut Encoder,
        size: SizeConstraint,
    ) -> Result<(), EncodeError> {
        output.sequence_of(&self.0, size, |output, field| field.encode(output))
    }

    /// Value of the first field with the given id
    pub fn get(&self, id: ProtocolIeId) -> Option<&IeValue> {
        self.0
            .iter()
            .find(|field| field.id == id)
            .map(|field| &field.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProtocolIeField> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl DecodePer for ProtocolIeContainer {
    fn decode_per(
        decoder: &mut PerDecoder<'_>,
        context: &mut PacketContext<'_>,
    ) -> Result<Self, DecodeError> {
        Self::decode_bounded(decoder, context, Self::SIZE)
    }
}

impl Encode for ProtocolIeContainer {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        self.encode_bounded(output, Self::SIZE)
    }
}

/// `ProtocolExtensionField`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ProtocolExtensionField {
    pub id: ProtocolIeId,
    pub criticality: Criticality,
    pub extension_value: IeValue,
}

impl DecodePer for ProtocolExtensionField {
    fn decode_per(
        decoder: &mut PerDecoder<'_>,
        context: &mut PacketContext<'_>,
    ) -> Result<Self, DecodeError> {
        let id = ProtocolIeId::decode_per(decoder, context)?;
        let criticality = Criticality::decode_per(decoder, context)?;
        let raw = decoder.open_type_bytes()?;
        log::trace!("extension {id}, {} octets", raw.len());
        let outer = context.protocol_extension_id.replace(id);
        let decode = context.extension_decoder(id);
        let value = context.dispatch(decode, raw, decoder.options());
        context.protocol_extension_id = outer;
        Ok(Self {
            id,
            criticality,
            extension_value: value?,
        })
    }
}

impl Encode for ProtocolExtensionField {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        self.id.encode(output)?;
        self.criticality.encode(output)?;
        self.extension_value.encode_open_type(output)
    }
}

/// `ProtocolExtensionContainer`, at least one field
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ProtocolExtensionContainer(pub Vec<ProtocolExtensionField>);

impl ProtocolExtensionContainer {
    pub const SIZE: SizeConstraint = SizeConstraint::range(1, MAX_PROTOCOL_EXTENSIONS);
}

impl DecodePer for ProtocolExtensionContainer {
    fn decode_per(
        decoder: &mut PerDecoder<'_>,
        context: &mut PacketContext<'_>,
    ) -> Result<Self, DecodeError> {
        decoder
            .sequence_of(Self::SIZE, |decoder| {
                ProtocolExtensionField::decode_per(decoder, context)
            })
            .map(Self)
    }
}

impl Encode for ProtocolExtensionContainer {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        output.sequence_of(&self.0, Self::SIZE, |output, field| field.encode(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        e1ap::{registry::Registry, MessageType, ProcedureCode},
        per::CodecOptions,
    };
    use pretty_assertions::assert_eq;

    fn decode<T: DecodePer>(input: &[u8]) -> Result<(T, usize), DecodeError> {
        decode_with(&Registry::e1ap(), input)
    }

    fn decode_with<T: DecodePer>(
        registry: &Registry,
        input: &[u8],
    ) -> Result<(T, usize), DecodeError> {
        let mut context = PacketContext::new(registry);
        context.message_type = Some(MessageType::InitiatingMessage);
        context.procedure_code = Some(ProcedureCode::RESET);
        let mut decoder = PerDecoder::new(input, CodecOptions::e1ap());
        let value = T::decode_per(&mut decoder, &mut context)?;
        Ok((value, decoder.consumed_octets()))
    }

    fn cause(
        decoder: &mut PerDecoder<'_>,
        context: &mut PacketContext<'_>,
    ) -> Result<IeValue, DecodeError> {
        Cause::decode_per(decoder, context).map(IeValue::from)
    }

    fn with_cause_extension() -> Registry {
        let mut registry = Registry::e1ap();
        registry.register_extension(ProtocolIeId(200), cause);
        registry
    }

    #[test]
    fn transaction_id_field() {
        // id 57, reject, open type holding TransactionID 5
        let input = [0x00, 0x39, 0x00, 0x02, 0x00, 0x05];
        let (field, consumed) = decode::<ProtocolIeField>(&input).unwrap();
        assert_eq!(
            ProtocolIeField::new(ProtocolIeId::TRANSACTION_ID, Criticality::Reject, TransactionId(5)),
            field
        );
        assert_eq!(6, consumed);
        assert_eq!(input.to_vec(), field.encode_to_vec().unwrap());
    }

    #[test]
    fn unknown_ie_is_kept_raw() {
        let input = [0x01, 0x2c, 0x40, 0x03, 0xde, 0xad, 0xbe];
        let (field, consumed) = decode::<ProtocolIeField>(&input).unwrap();
        assert_eq!(ProtocolIeId(300), field.id);
        assert_eq!(Criticality::Ignore, field.criticality);
        assert_eq!(
            IeValue::Unparsed(Bytes::from_static(&[0xde, 0xad, 0xbe])),
            field.value
        );
        assert_eq!(7, consumed);
        assert_eq!(input.to_vec(), field.encode_to_vec().unwrap());
    }

    #[test]
    fn unparsed_ies_do_not_break_container() {
        // empty GNB-CU-UP-Capacity and an unknown IE stay unparsed
        let input = [
            0x00, 0x03, // three fields
            0x00, 0x40, 0x40, 0x00, // id 64, ignore, empty
            0x00, 0x0b, 0x40, 0x01, 0x70, // id 11 unknown, ignore
            0x00, 0x39, 0x00, 0x02, 0x00, 0x05, // TransactionID 5
        ];
        let (container, consumed) = decode::<ProtocolIeContainer>(&input).unwrap();
        assert_eq!(input.len(), consumed);
        assert_eq!(3, container.len());
        assert!(container.0[0].value.is_unparsed());
        assert!(container.0[1].value.is_unparsed());
        assert_eq!(
            Some(&IeValue::TransactionId(TransactionId(5))),
            container.get(ProtocolIeId::TRANSACTION_ID)
        );
    }

    #[test]
    fn failing_decoder_yields_malformed() {
        // Cause choice-extension without its nested field
        let input = [0x00, 0x00, 0x00, 0x01, 0x80];
        let (field, consumed) = decode::<ProtocolIeField>(&input).unwrap();
        assert_eq!(5, consumed);
        assert!(field.value.is_malformed());
        assert_eq!(input.to_vec(), field.encode_to_vec().unwrap());
    }

    #[test]
    fn container_sizes() {
        let (empty, consumed) = decode::<ProtocolIeContainer>(&[0x00, 0x00]).unwrap();
        assert!(empty.is_empty());
        assert_eq!(2, consumed);
        assert_eq!(vec![0x00, 0x00], empty.encode_to_vec().unwrap());

        assert!(decode::<ProtocolExtensionContainer>(&[0x00, 0x00]).is_err());
        assert!(ProtocolExtensionContainer(vec![]).encode_to_vec().is_err());
    }

    #[test]
    fn extension_container_dispatches_by_extension_id() {
        let diagnostics = CriticalityDiagnostics {
            procedure_code: Some(ProcedureCode::RESET),
            ie_extensions: Some(ProtocolExtensionContainer(vec![
                ProtocolExtensionField {
                    id: ProtocolIeId(200),
                    criticality: Criticality::Ignore,
                    extension_value: IeValue::Cause(Cause::Misc(CauseMisc::OmIntervention)),
                },
                ProtocolExtensionField {
                    id: ProtocolIeId(201),
                    criticality: Criticality::Ignore,
                    extension_value: IeValue::Unparsed(Bytes::from_static(&[0x01, 0x02])),
                },
            ])),
            ..CriticalityDiagnostics::default()
        };
        let encoded = diagnostics.encode_to_vec().unwrap();

        let (decoded, consumed) =
            decode_with::<CriticalityDiagnostics>(&with_cause_extension(), &encoded).unwrap();
        assert_eq!(diagnostics, decoded);
        assert_eq!(encoded.len(), consumed);
        assert_eq!(encoded, decoded.encode_to_vec().unwrap());

        // same octets, no extension decoders
        let (decoded, _) = decode::<CriticalityDiagnostics>(&encoded).unwrap();
        let extensions = decoded.ie_extensions.unwrap();
        assert_eq!(2, extensions.0.len());
        assert_eq!(
            IeValue::Unparsed(Bytes::from_static(&[0b0110_0110])),
            extensions.0[0].extension_value
        );
        assert!(extensions.0[1].extension_value.is_unparsed());
    }

    #[test]
    fn failing_extension_decoder_yields_malformed() {
        // one field: id 200, ignore, Cause choice-extension without its nested field
        let input = [0x00, 0x00, 0x00, 0xc8, 0x40, 0x01, 0x80];
        let (container, consumed) =
            decode_with::<ProtocolExtensionContainer>(&with_cause_extension(), &input).unwrap();
        assert_eq!(7, consumed);
        assert_eq!(1, container.0.len());
        assert_eq!(ProtocolIeId(200), container.0[0].id);
        assert!(container.0[0].extension_value.is_malformed());
        assert_eq!(input.to_vec(), container.encode_to_vec().unwrap());
    }
}
