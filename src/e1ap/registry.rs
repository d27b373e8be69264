//! Decoder tables for protocol IEs, protocol extensions and elementary procedures
extern crate alloc;

use alloc::collections::BTreeMap;

use crate::{
    decode::{DecodeError, PerDecoder},
    e1ap::{
        containers::IeValue,
        context::{DecodePer, PacketContext},
        ids::{MessageType, ProcedureCode, ProtocolIeId, PROCEDURES},
        ies::*,
        pdu::{decode_ie_message, decode_private_message, MessageValue},
    },
};

/// Decoder for the open-type content of a protocol IE or protocol extension
pub type IeDecodeFn =
    fn(&mut PerDecoder<'_>, &mut PacketContext<'_>) -> Result<IeValue, DecodeError>;

/// Decoder for the value of an initiating, successful or unsuccessful message
///
/// The third argument is the message name from the procedure table.
pub type MessageDecodeFn = fn(
    &mut PerDecoder<'_>,
    &mut PacketContext<'_>,
    &'static str,
) -> Result<MessageValue, DecodeError>;

#[derive(Debug, Clone, Copy)]
pub struct MessageEntry {
    pub name: &'static str,
    pub decode: MessageDecodeFn,
}

/// Lookup tables consulted while decoding open types
///
/// A registry is built once and only read during decoding.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    ies: BTreeMap<ProtocolIeId, IeDecodeFn>,
    scoped_ies: BTreeMap<(ProcedureCode, MessageType, ProtocolIeId), IeDecodeFn>,
    extensions: BTreeMap<ProtocolIeId, IeDecodeFn>,
    initiating: BTreeMap<ProcedureCode, MessageEntry>,
    successful: BTreeMap<ProcedureCode, MessageEntry>,
    unsuccessful: BTreeMap<ProcedureCode, MessageEntry>,
}

fn typed<T: DecodePer + Into<IeValue>>(
    decoder: &mut PerDecoder<'_>,
    context: &mut PacketContext<'_>,
) -> Result<IeValue, DecodeError> {
    T::decode_per(decoder, context).map(Into::into)
}

impl Registry {
    /// Registry without any entries, every IE stays unparsed
    pub fn empty() -> Self {
        Self::default()
    }

    /// All E1AP procedures and the typed information elements
    pub fn e1ap() -> Self {
        let mut registry = Self::empty();
        registry
            .register_ie(ProtocolIeId::CAUSE, typed::<Cause>)
            .register_ie(ProtocolIeId::CRITICALITY_DIAGNOSTICS, typed::<CriticalityDiagnostics>)
            .register_ie(ProtocolIeId::GNB_CU_CP_UE_E1AP_ID, typed::<GnbCuCpUeE1apId>)
            .register_ie(ProtocolIeId::GNB_CU_UP_UE_E1AP_ID, typed::<GnbCuUpUeE1apId>)
            .register_ie(ProtocolIeId::RESET_TYPE, typed::<ResetType>)
            .register_ie(
                ProtocolIeId::UE_ASSOCIATED_LOGICAL_E1_CONNECTION_ITEM,
                typed::<UeAssociatedLogicalE1ConnectionItem>,
            )
            .register_ie(ProtocolIeId::GNB_CU_UP_ID, typed::<GnbCuUpId>)
            .register_ie(ProtocolIeId::GNB_CU_UP_NAME, typed::<GnbCuUpName>)
            .register_ie(ProtocolIeId::GNB_CU_CP_NAME, typed::<GnbCuCpName>)
            .register_ie(ProtocolIeId::CN_SUPPORT, typed::<CnSupport>)
            .register_ie(ProtocolIeId::TIME_TO_WAIT, typed::<TimeToWait>)
            .register_ie(ProtocolIeId::SECURITY_INFORMATION, typed::<SecurityInformation>)
            .register_ie(ProtocolIeId::UE_DL_AGGREGATE_MAXIMUM_BIT_RATE, typed::<BitRate>)
            .register_ie(
                ProtocolIeId::UE_DL_MAXIMUM_INTEGRITY_PROTECTED_DATA_RATE,
                typed::<BitRate>,
            )
            .register_ie(ProtocolIeId::ACTIVITY_NOTIFICATION_LEVEL, typed::<ActivityNotificationLevel>)
            .register_ie(ProtocolIeId::ACTIVITY_INFORMATION, typed::<ActivityInformation>)
            .register_ie(ProtocolIeId::TRANSACTION_ID, typed::<TransactionId>)
            .register_ie(ProtocolIeId::SERVING_PLMN, typed::<PlmnIdentity>)
            .register_ie(ProtocolIeId::UE_INACTIVITY_TIMER, typed::<InactivityTimer>)
            .register_ie(ProtocolIeId::PPI, typed::<Ppi>)
            .register_ie(ProtocolIeId::GNB_CU_UP_CAPACITY, typed::<GnbCuUpCapacity>)
            .register_ie(ProtocolIeId::DATA_DISCARD_REQUIRED, typed::<DataDiscardRequired>)
            .register_ie(ProtocolIeId::RAN_UE_ID, typed::<RanUeId>)
            .register_ie(ProtocolIeId::GNB_DU_ID, typed::<GnbDuId>);
        for id in [
            ProtocolIeId::SYSTEM_BEARER_CONTEXT_SETUP_REQUEST,
            ProtocolIeId::SYSTEM_BEARER_CONTEXT_SETUP_RESPONSE,
            ProtocolIeId::SYSTEM_BEARER_CONTEXT_MODIFICATION_REQUEST,
            ProtocolIeId::SYSTEM_BEARER_CONTEXT_MODIFICATION_RESPONSE,
            ProtocolIeId::SYSTEM_BEARER_CONTEXT_MODIFICATION_CONFIRM,
            ProtocolIeId::SYSTEM_BEARER_CONTEXT_MODIFICATION_REQUIRED,
            ProtocolIeId::SYSTEM_GNB_CU_UP_COUNTER_CHECK_REQUEST,
        ] {
            registry.register_ie(id, typed::<SystemBearerContext>);
        }
        for procedure in PROCEDURES.iter() {
            let decode: MessageDecodeFn = if procedure.code == ProcedureCode::PRIVATE_MESSAGE {
                decode_private_message
            } else {
                decode_ie_message
            };
            for message_type in [
                MessageType::InitiatingMessage,
                MessageType::SuccessfulOutcome,
                MessageType::UnsuccessfulOutcome,
            ] {
                if let Some(name) = procedure.message_name(message_type) {
                    registry.register_message(message_type, procedure.code, name, decode);
                }
            }
        }
        registry
    }

    pub fn register_ie(&mut self, id: ProtocolIeId, decode: IeDecodeFn) -> &mut Self {
        self.ies.insert(id, decode);
        self
    }

    /// Decoder used for `id` only inside the given procedure and message type
    pub fn register_scoped_ie(
        &mut self,
        procedure_code: ProcedureCode,
        message_type: MessageType,
        id: ProtocolIeId,
        decode: IeDecodeFn,
    ) -> &mut Self {
        self.scoped_ies
            .insert((procedure_code, message_type, id), decode);
        self
    }

    pub fn register_extension(&mut self, id: ProtocolIeId, decode: IeDecodeFn) -> &mut Self {
        self.extensions.insert(id, decode);
        self
    }

    pub fn register_message(
        &mut self,
        message_type: MessageType,
        procedure_code: ProcedureCode,
        name: &'static str,
        decode: MessageDecodeFn,
    ) -> &mut Self {
        self.messages_mut(message_type)
            .insert(procedure_code, MessageEntry { name, decode });
        self
    }

    /// Scoped decoder for the current procedure if there is one, the plain one otherwise
    pub fn ie_decoder(
        &self,
        procedure_code: Option<ProcedureCode>,
        message_type: Option<MessageType>,
        id: ProtocolIeId,
    ) -> Option<IeDecodeFn> {
        procedure_code
            .zip(message_type)
            .and_then(|(code, message_type)| self.scoped_ies.get(&(code, message_type, id)))
            .or_else(|| self.ies.get(&id))
            .copied()
    }

    pub fn extension_decoder(&self, id: ProtocolIeId) -> Option<IeDecodeFn> {
        self.extensions.get(&id).copied()
    }

    pub fn message(
        &self,
        message_type: MessageType,
        procedure_code: ProcedureCode,
    ) -> Option<&MessageEntry> {
        self.messages(message_type).get(&procedure_code)
    }

    fn messages(&self, message_type: MessageType) -> &BTreeMap<ProcedureCode, MessageEntry> {
        match message_type {
            MessageType::InitiatingMessage => &self.initiating,
            MessageType::SuccessfulOutcome => &self.successful,
            MessageType::UnsuccessfulOutcome => &self.unsuccessful,
        }
    }

    fn messages_mut(
        &mut self,
        message_type: MessageType,
    ) -> &mut BTreeMap<ProcedureCode, MessageEntry> {
        match message_type {
            MessageType::InitiatingMessage => &mut self.initiating,
            MessageType::SuccessfulOutcome => &mut self.successful,
            MessageType::UnsuccessfulOutcome => &mut self.unsuccessful,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::per::CodecOptions;
    use pretty_assertions::assert_eq;

    fn capacity_as_ppi(
        decoder: &mut PerDecoder<'_>,
        context: &mut PacketContext<'_>,
    ) -> Result<IeValue, DecodeError> {
        Ppi::decode_per(decoder, context).map(Into::into)
    }

    fn run(decode: IeDecodeFn, input: &[u8]) -> IeValue {
        let registry = Registry::empty();
        let mut context = PacketContext::new(&registry);
        let mut decoder = PerDecoder::new(input, CodecOptions::e1ap());
        decode(&mut decoder, &mut context).unwrap()
    }

    #[test]
    fn procedure_tables() {
        let registry = Registry::e1ap();
        let entry = registry
            .message(MessageType::UnsuccessfulOutcome, ProcedureCode::GNB_CU_UP_E1_SETUP)
            .unwrap();
        assert_eq!("GNB-CU-UP-E1SetupFailure", entry.name);
        assert!(registry
            .message(MessageType::SuccessfulOutcome, ProcedureCode::ERROR_INDICATION)
            .is_none());
        assert!(registry
            .message(MessageType::InitiatingMessage, ProcedureCode(40))
            .is_none());
        assert_eq!(
            "MCBearerNotification",
            registry
                .message(MessageType::InitiatingMessage, ProcedureCode::MC_BEARER_NOTIFICATION)
                .unwrap()
                .name
        );
    }

    #[test]
    fn scoped_decoder_wins() {
        let mut registry = Registry::e1ap();
        registry.register_scoped_ie(
            ProcedureCode::GNB_CU_UP_STATUS_INDICATION,
            MessageType::InitiatingMessage,
            ProtocolIeId::GNB_CU_UP_CAPACITY,
            capacity_as_ppi,
        );
        let scoped = registry
            .ie_decoder(
                Some(ProcedureCode::GNB_CU_UP_STATUS_INDICATION),
                Some(MessageType::InitiatingMessage),
                ProtocolIeId::GNB_CU_UP_CAPACITY,
            )
            .unwrap();
        assert_eq!(IeValue::Ppi(Ppi(3)), run(scoped, &[0b0011_0000]));

        let plain = registry
            .ie_decoder(None, None, ProtocolIeId::GNB_CU_UP_CAPACITY)
            .unwrap();
        assert_eq!(IeValue::GnbCuUpCapacity(GnbCuUpCapacity(48)), run(plain, &[0b0011_0000]));
    }

    #[test]
    fn empty_registry_knows_nothing() {
        let registry = Registry::empty();
        assert!(registry.ie_decoder(None, None, ProtocolIeId::CAUSE).is_none());
        assert!(registry.extension_decoder(ProtocolIeId(100)).is_none());
        assert!(registry
            .message(MessageType::InitiatingMessage, ProcedureCode::RESET)
            .is_none());
    }
}
