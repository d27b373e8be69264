//! Typed information elements of TS 37.483 §9.3
extern crate alloc;

use alloc::{boxed::Box, string::String, vec::Vec};
use bytes::Bytes;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    decode::{DecodeError, PerDecoder},
    e1ap::{
        containers::{ProtocolExtensionContainer, ProtocolIeContainer, ProtocolIeField},
        context::{DecodePer, PacketContext},
        ids::{
            ProcedureCode, ProtocolIeId, MAXNOOF_DRBS, MAXNOOF_ERRORS,
            MAXNOOF_INDIVIDUAL_E1_CONNECTIONS_TO_RESET, MAXNOOF_PDU_SESSION_RESOURCE,
        },
    },
    encode::{Encode, EncodeError, Encoder},
    per::{
        CharacterSet, ChoiceIndex, ExtensionAdditions, IntegerConstraint, SequencePreamble,
        SizeConstraint,
    },
};

macro_rules! enumerated {
    (
        $(#[$meta:meta])*
        extensible $name:ident {
            $($variant:ident => $label:literal),+ $(,)?
        }
        $(additions {
            $($addition:ident => $addition_label:literal),+ $(,)?
        })?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[cfg_attr(feature = "serde", derive(Serialize))]
        pub enum $name {
            $($variant,)+
            $($($addition,)+)?
            /// Extension value unknown to this decoder
            Extension(u32),
        }

        impl $name {
            const ROOT: &'static [Self] = &[$(Self::$variant),+];
            const ADDITIONS: &'static [Self] = &[$($(Self::$addition),+)?];

            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                    $($(Self::$addition => $addition_label,)+)?
                    Self::Extension(_) => "extension",
                }
            }
        }

        impl DecodePer for $name {
            fn decode_per(
                decoder: &mut PerDecoder<'_>,
                _: &mut PacketContext<'_>,
            ) -> Result<Self, DecodeError> {
                match decoder.enumerated(Self::ROOT.len() as u32, true)? {
                    ChoiceIndex::Root(index) => {
                        Self::ROOT.get(index as usize).copied().ok_or_else(|| {
                            DecodeError::EnumError(alloc::format!(
                                "Invalid {} index {index}!",
                                stringify!($name)
                            ))
                        })
                    }
                    ChoiceIndex::Extension(index) => Ok(Self::ADDITIONS
                        .get(index as usize)
                        .copied()
                        .unwrap_or(Self::Extension(index))),
                }
            }
        }

        impl Encode for $name {
            fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
                let index = if let Self::Extension(index) = self {
                    ChoiceIndex::Extension(*index)
                } else if let Some(index) = Self::ADDITIONS.iter().position(|value| value == self) {
                    ChoiceIndex::Extension(index as u32)
                } else {
                    let index = Self::ROOT.iter().position(|value| value == self).unwrap_or(0);
                    ChoiceIndex::Root(index as u32)
                };
                output.enumerated(index, Self::ROOT.len() as u32, true)
            }
        }
    };
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[cfg_attr(feature = "serde", derive(Serialize))]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            const ROOT: &'static [Self] = &[$(Self::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl DecodePer for $name {
            fn decode_per(
                decoder: &mut PerDecoder<'_>,
                _: &mut PacketContext<'_>,
            ) -> Result<Self, DecodeError> {
                let value = match decoder.enumerated(Self::ROOT.len() as u32, false)? {
                    ChoiceIndex::Root(index) => Self::ROOT.get(index as usize).copied(),
                    ChoiceIndex::Extension(_) => None,
                };
                value.ok_or_else(|| {
                    DecodeError::EnumError(alloc::format!("Invalid {} value!", stringify!($name)))
                })
            }
        }

        impl Encode for $name {
            fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
                let index = Self::ROOT.iter().position(|value| value == self).unwrap_or(0);
                output.enumerated(ChoiceIndex::Root(index as u32), Self::ROOT.len() as u32, false)
            }
        }
    };
}

macro_rules! integer {
    ($(#[$meta:meta])* $name:ident($inner:ty), $constraint:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize))]
        pub struct $name(pub $inner);

        impl $name {
            pub const CONSTRAINT: IntegerConstraint = $constraint;
        }

        impl DecodePer for $name {
            fn decode_per(
                decoder: &mut PerDecoder<'_>,
                _: &mut PacketContext<'_>,
            ) -> Result<Self, DecodeError> {
                decoder.integer(Self::CONSTRAINT).map(Self)
            }
        }

        impl Encode for $name {
            fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
                output.integer(&self.0, Self::CONSTRAINT)
            }
        }
    };
}

macro_rules! fixed_octets {
    ($(#[$meta:meta])* $name:ident, $size:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize))]
        pub struct $name(pub [u8; $size]);

        impl DecodePer for $name {
            fn decode_per(
                decoder: &mut PerDecoder<'_>,
                _: &mut PacketContext<'_>,
            ) -> Result<Self, DecodeError> {
                let octets = decoder.octet_string(SizeConstraint::fixed($size))?;
                <[u8; $size]>::try_from(octets.as_slice())
                    .map(Self)
                    .map_err(|_| {
                        DecodeError::ConstraintViolation(alloc::format!(
                            "{} needs exactly {} octets!",
                            stringify!($name),
                            $size
                        ))
                    })
            }
        }

        impl Encode for $name {
            fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
                output.octet_string(&self.0, SizeConstraint::fixed($size))
            }
        }
    };
}

macro_rules! printable_name {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize))]
        pub struct $name(pub String);

        impl $name {
            pub const SIZE: SizeConstraint = SizeConstraint::extensible(1, 150);
        }

        impl DecodePer for $name {
            fn decode_per(
                decoder: &mut PerDecoder<'_>,
                _: &mut PacketContext<'_>,
            ) -> Result<Self, DecodeError> {
                decoder
                    .character_string(CharacterSet::Printable, Self::SIZE)
                    .map(Self)
            }
        }

        impl Encode for $name {
            fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
                output.character_string(&self.0, CharacterSet::Printable, Self::SIZE)
            }
        }
    };
}

fn invalid_choice(name: &str, index: ChoiceIndex) -> DecodeError {
    DecodeError::EnumError(alloc::format!("Invalid choice index {index:?} for {name}!"))
}

fn decode_choice_extension(
    decoder: &mut PerDecoder<'_>,
    context: &mut PacketContext<'_>,
) -> Result<Box<ProtocolIeField>, DecodeError> {
    ProtocolIeField::decode_per(decoder, context).map(Box::new)
}

fn decode_optional<T: DecodePer>(
    present: bool,
    decoder: &mut PerDecoder<'_>,
    context: &mut PacketContext<'_>,
) -> Result<Option<T>, DecodeError> {
    if present {
        T::decode_per(decoder, context).map(Some)
    } else {
        Ok(None)
    }
}

fn decode_additions(
    preamble: &SequencePreamble,
    decoder: &mut PerDecoder<'_>,
) -> Result<ExtensionAdditions, DecodeError> {
    if preamble.extended {
        decoder.extension_additions()
    } else {
        Ok(ExtensionAdditions::default())
    }
}

fn encode_optional<T: Encode>(value: &Option<T>, output: &mut Encoder) -> Result<(), EncodeError> {
    match value {
        Some(value) => value.encode(output),
        None => Ok(()),
    }
}

impl DecodePer for ProcedureCode {
    fn decode_per(
        decoder: &mut PerDecoder<'_>,
        _: &mut PacketContext<'_>,
    ) -> Result<Self, DecodeError> {
        decoder
            .integer(IntegerConstraint::constrained(0, 255))
            .map(Self)
    }
}

impl Encode for ProcedureCode {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        output.integer(&self.0, IntegerConstraint::constrained(0, 255))
    }
}

impl DecodePer for ProtocolIeId {
    fn decode_per(
        decoder: &mut PerDecoder<'_>,
        _: &mut PacketContext<'_>,
    ) -> Result<Self, DecodeError> {
        decoder
            .integer(IntegerConstraint::constrained(0, 65535))
            .map(Self)
    }
}

impl Encode for ProtocolIeId {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        output.integer(&self.0, IntegerConstraint::constrained(0, 65535))
    }
}

enumerated!(
    Criticality {
        Reject => "reject",
        Ignore => "ignore",
        Notify => "notify",
    }
);

enumerated!(
    TriggeringMessage {
        InitiatingMessage => "initiating-message",
        SuccessfulOutcome => "successful-outcome",
        UnsuccessfulOutcome => "unsuccessful-outcome",
    }
);

enumerated!(
    extensible TypeOfError {
        NotUnderstood => "not-understood",
        Missing => "missing",
    }
);

enumerated!(
    extensible CauseRadioNetwork {
        Unspecified => "unspecified",
        UnknownOrAlreadyAllocatedGnbCuCpUeE1apId => "unknown-or-already-allocated-gnb-cu-cp-ue-e1ap-id",
        UnknownOrAlreadyAllocatedGnbCuUpUeE1apId => "unknown-or-already-allocated-gnb-cu-up-ue-e1ap-id",
        UnknownOrInconsistentPairOfUeE1apId => "unknown-or-inconsistent-pair-of-ue-e1ap-id",
        InteractionWithOtherProcedure => "interaction-with-other-procedure",
        PpdcpCountWrapAround => "pPDCP-Count-wrap-around",
        NotSupportedQciValue => "not-supported-QCI-value",
        NotSupported5qiValue => "not-supported-5QI-value",
        EncryptionAlgorithmsNotSupported => "encryption-algorithms-not-supported",
        IntegrityProtectionAlgorithmsNotSupported => "integrity-protection-algorithms-not-supported",
        UpIntegrityProtectionNotPossible => "uP-integrity-protection-not-possible",
        UpConfidentialityProtectionNotPossible => "uP-confidentiality-protection-not-possible",
        MultiplePduSessionIdInstances => "multiple-PDU-Session-ID-Instances",
        UnknownPduSessionId => "unknown-PDU-Session-ID",
        MultipleQosFlowIdInstances => "multiple-QoS-Flow-ID-Instances",
        UnknownQosFlowId => "unknown-QoS-Flow-ID",
        MultipleDrbIdInstances => "multiple-DRB-ID-Instances",
        UnknownDrbId => "unknown-DRB-ID",
        InvalidQosCombination => "invalid-QoS-combination",
        ProcedureCancelled => "procedure-cancelled",
        NormalRelease => "normal-release",
        NoRadioResourcesAvailable => "no-radio-resources-available",
        ActionDesirableForRadioReasons => "action-desirable-for-radio-reasons",
        ResourcesNotAvailableForTheSlice => "resources-not-available-for-the-slice",
        PdcpConfigurationNotSupported => "pDCP-configuration-not-supported",
    }
    additions {
        UeDlMaxIpDataRateReason => "ue-dl-max-IP-data-rate-reason",
        UpIntegrityProtectionFailure => "uP-integrity-protection-failure",
        ReleaseDueToPreEmption => "release-due-to-pre-emption",
        RsnNotAvailableForTheUp => "rsn-not-available-for-the-up",
        NpnNotSupported => "npn-not-supported",
        ReportCharacteristicEmpty => "report-characteristic-empty",
        ExistingMeasurementId => "existing-measurement-ID",
        MeasurementTemporarilyNotAvailable => "measurement-temporarily-not-available",
        MeasurementNotSupportedForTheObject => "measurement-not-supported-for-the-object",
        ScgActivationDeactivationFailure => "scg-activation-deactivation-failure",
        ScgDeactivationFailureDueToDataTransmission => "scg-deactivation-failure-due-to-data-transmission",
        UnknownOrAlreadyAllocatedGnbCuCpMbsE1apId => "unknown-or-already-allocated-gNB-CU-CP-MBS-E1AP-ID",
        UnknownOrAlreadyAllocatedGnbCuUpMbsE1apId => "unknown-or-already-allocated-gNB-CU-UP-MBS-E1AP-ID",
        UnknownOrInconsistentPairOfMbsE1apId => "unknown-or-inconsistent-pair-of-MBS-E1AP-ID",
        UnknownOrInconsistentMrbId => "unknown-or-inconsistent-MRB-ID",
    }
);

enumerated!(
    extensible CauseTransport {
        Unspecified => "unspecified",
        TransportResourceUnavailable => "transport-resource-unavailable",
    }
    additions {
        UnknownTnlAddressForIab => "unknown-TNL-address-for-IAB",
        UnknownUpTnlInformationForIab => "unknown-UP-TNL-information-for-IAB",
    }
);

enumerated!(
    extensible CauseProtocol {
        TransferSyntaxError => "transfer-syntax-error",
        AbstractSyntaxErrorReject => "abstract-syntax-error-reject",
        AbstractSyntaxErrorIgnoreAndNotify => "abstract-syntax-error-ignore-and-notify",
        MessageNotCompatibleWithReceiverState => "message-not-compatible-with-receiver-state",
        SemanticError => "semantic-error",
        AbstractSyntaxErrorFalselyConstructedMessage => "abstract-syntax-error-falsely-constructed-message",
        Unspecified => "unspecified",
    }
);

enumerated!(
    extensible CauseMisc {
        ControlProcessingOverload => "control-processing-overload",
        NotEnoughUserPlaneProcessingResources => "not-enough-user-plane-processing-resources",
        HardwareFailure => "hardware-failure",
        OmIntervention => "om-intervention",
        Unspecified => "unspecified",
    }
);

enumerated!(
    extensible ResetAll {
        ResetAll => "reset-all",
    }
);

enumerated!(
    extensible CnSupport {
        CEpc => "c-epc",
        C5gc => "c-5gc",
        Both => "both",
    }
);

enumerated!(
    extensible TimeToWait {
        V1s => "v1s",
        V2s => "v2s",
        V5s => "v5s",
        V10s => "v10s",
        V20s => "v20s",
        V60s => "v60s",
    }
);

enumerated!(
    extensible CipheringAlgorithm {
        Nea0 => "nEA0",
        Nea1 => "c-128-NEA1",
        Nea2 => "c-128-NEA2",
        Nea3 => "c-128-NEA3",
    }
);

enumerated!(
    extensible IntegrityProtectionAlgorithm {
        Nia0 => "nIA0",
        Nia1 => "i-128-NIA1",
        Nia2 => "i-128-NIA2",
        Nia3 => "i-128-NIA3",
    }
);

enumerated!(
    extensible ActivityNotificationLevel {
        Drb => "drb",
        PduSession => "pdu-session",
        Ue => "ue",
    }
);

enumerated!(
    /// `DRB-Activity`, `PDU-Session-Resource-Activity` and `UE-Activity`
    Activity {
        Active => "active",
        NotActive => "not-active",
    }
);

enumerated!(
    extensible DataDiscardRequired {
        Required => "required",
    }
);

integer!(GnbCuCpUeE1apId(u32), IntegerConstraint::constrained(0, 4_294_967_295));
integer!(GnbCuUpUeE1apId(u32), IntegerConstraint::constrained(0, 4_294_967_295));
integer!(GnbCuUpId(u64), IntegerConstraint::constrained(0, 68_719_476_735));
integer!(GnbDuId(u64), IntegerConstraint::constrained(0, 68_719_476_735));
integer!(
    /// Bit rate in bit/s
    BitRate(u64),
    IntegerConstraint::extensible(0, 4_000_000_000_000)
);
integer!(TransactionId(u8), IntegerConstraint::extensible(0, 255));
integer!(
    /// UE inactivity timer in seconds
    InactivityTimer(u16),
    IntegerConstraint::extensible(1, 7200)
);
integer!(
    /// Paging policy indicator
    Ppi(u8),
    IntegerConstraint::extensible(0, 7)
);
integer!(GnbCuUpCapacity(u8), IntegerConstraint::constrained(0, 255));
integer!(DrbId(u8), IntegerConstraint::extensible(1, 32));
integer!(PduSessionId(u8), IntegerConstraint::constrained(0, 255));

fixed_octets!(
    /// MCC and MNC in TBCD, TS 38.413 §9.3.3.5
    PlmnIdentity,
    3
);
fixed_octets!(RanUeId, 8);

printable_name!(GnbCuUpName);
printable_name!(GnbCuCpName);

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Cause {
    RadioNetwork(CauseRadioNetwork),
    Transport(CauseTransport),
    Protocol(CauseProtocol),
    Misc(CauseMisc),
    ChoiceExtension(Box<ProtocolIeField>),
}

impl DecodePer for Cause {
    fn decode_per(
        decoder: &mut PerDecoder<'_>,
        context: &mut PacketContext<'_>,
    ) -> Result<Self, DecodeError> {
        match decoder.choice_index(5, false)? {
            ChoiceIndex::Root(0) => CauseRadioNetwork::decode_per(decoder, context).map(Self::RadioNetwork),
            ChoiceIndex::Root(1) => CauseTransport::decode_per(decoder, context).map(Self::Transport),
            ChoiceIndex::Root(2) => CauseProtocol::decode_per(decoder, context).map(Self::Protocol),
            ChoiceIndex::Root(3) => CauseMisc::decode_per(decoder, context).map(Self::Misc),
            ChoiceIndex::Root(4) => {
                decode_choice_extension(decoder, context).map(Self::ChoiceExtension)
            }
            index => Err(invalid_choice("Cause", index)),
        }
    }
}

impl Encode for Cause {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        let (index, value): (u32, &dyn Encode) = match self {
            Self::RadioNetwork(value) => (0, value),
            Self::Transport(value) => (1, value),
            Self::Protocol(value) => (2, value),
            Self::Misc(value) => (3, value),
            Self::ChoiceExtension(field) => (4, &**field),
        };
        output.choice_index(ChoiceIndex::Root(index), 5, false)?;
        value.encode(output)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CriticalityDiagnosticsIeItem {
    pub ie_criticality: Criticality,
    pub ie_id: ProtocolIeId,
    pub type_of_error: TypeOfError,
    pub ie_extensions: Option<ProtocolExtensionContainer>,
    pub extension_additions: ExtensionAdditions,
}

impl DecodePer for CriticalityDiagnosticsIeItem {
    fn decode_per(
        decoder: &mut PerDecoder<'_>,
        context: &mut PacketContext<'_>,
    ) -> Result<Self, DecodeError> {
        let preamble = decoder.sequence_preamble(true, 1)?;
        Ok(Self {
            ie_criticality: Criticality::decode_per(decoder, context)?,
            ie_id: ProtocolIeId::decode_per(decoder, context)?,
            type_of_error: TypeOfError::decode_per(decoder, context)?,
            ie_extensions: decode_optional(preamble.is_present(0), decoder, context)?,
            extension_additions: decode_additions(&preamble, decoder)?,
        })
    }
}

impl Encode for CriticalityDiagnosticsIeItem {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        output.sequence_preamble(
            true,
            !self.extension_additions.is_empty(),
            &[self.ie_extensions.is_some()],
        );
        self.ie_criticality.encode(output)?;
        self.ie_id.encode(output)?;
        self.type_of_error.encode(output)?;
        encode_optional(&self.ie_extensions, output)?;
        output.extension_additions(&self.extension_additions)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CriticalityDiagnostics {
    pub procedure_code: Option<ProcedureCode>,
    pub triggering_message: Option<TriggeringMessage>,
    pub procedure_criticality: Option<Criticality>,
    pub transaction_id: Option<TransactionId>,
    pub ies_criticality_diagnostics: Option<Vec<CriticalityDiagnosticsIeItem>>,
    pub ie_extensions: Option<ProtocolExtensionContainer>,
    pub extension_additions: ExtensionAdditions,
}

impl CriticalityDiagnostics {
    const IE_LIST_SIZE: SizeConstraint = SizeConstraint::range(1, MAXNOOF_ERRORS);
}

impl DecodePer for CriticalityDiagnostics {
    fn decode_per(
        decoder: &mut PerDecoder<'_>,
        context: &mut PacketContext<'_>,
    ) -> Result<Self, DecodeError> {
        let preamble = decoder.sequence_preamble(true, 6)?;
        Ok(Self {
            procedure_code: decode_optional(preamble.is_present(0), decoder, context)?,
            triggering_message: decode_optional(preamble.is_present(1), decoder, context)?,
            procedure_criticality: decode_optional(preamble.is_present(2), decoder, context)?,
            transaction_id: decode_optional(preamble.is_present(3), decoder, context)?,
            ies_criticality_diagnostics: if preamble.is_present(4) {
                Some(decoder.sequence_of(Self::IE_LIST_SIZE, |decoder| {
                    CriticalityDiagnosticsIeItem::decode_per(decoder, context)
                })?)
            } else {
                None
            },
            ie_extensions: decode_optional(preamble.is_present(5), decoder, context)?,
            extension_additions: decode_additions(&preamble, decoder)?,
        })
    }
}

impl Encode for CriticalityDiagnostics {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        output.sequence_preamble(
            true,
            !self.extension_additions.is_empty(),
            &[
                self.procedure_code.is_some(),
                self.triggering_message.is_some(),
                self.procedure_criticality.is_some(),
                self.transaction_id.is_some(),
                self.ies_criticality_diagnostics.is_some(),
                self.ie_extensions.is_some(),
            ],
        );
        encode_optional(&self.procedure_code, output)?;
        encode_optional(&self.triggering_message, output)?;
        encode_optional(&self.procedure_criticality, output)?;
        encode_optional(&self.transaction_id, output)?;
        if let Some(items) = &self.ies_criticality_diagnostics {
            output.sequence_of(items, Self::IE_LIST_SIZE, |output, item| item.encode(output))?;
        }
        encode_optional(&self.ie_extensions, output)?;
        output.extension_additions(&self.extension_additions)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ResetType {
    E1Interface(ResetAll),
    /// `UE-associatedLogicalE1-ConnectionListRes`, one single container per connection
    PartOfE1Interface(Vec<ProtocolIeField>),
    ChoiceExtension(Box<ProtocolIeField>),
}

impl ResetType {
    const CONNECTION_LIST_SIZE: SizeConstraint =
        SizeConstraint::range(1, MAXNOOF_INDIVIDUAL_E1_CONNECTIONS_TO_RESET);
}

impl DecodePer for ResetType {
    fn decode_per(
        decoder: &mut PerDecoder<'_>,
        context: &mut PacketContext<'_>,
    ) -> Result<Self, DecodeError> {
        match decoder.choice_index(3, false)? {
            ChoiceIndex::Root(0) => ResetAll::decode_per(decoder, context).map(Self::E1Interface),
            ChoiceIndex::Root(1) => decoder
                .sequence_of(Self::CONNECTION_LIST_SIZE, |decoder| {
                    ProtocolIeField::decode_per(decoder, context)
                })
                .map(Self::PartOfE1Interface),
            ChoiceIndex::Root(2) => {
                decode_choice_extension(decoder, context).map(Self::ChoiceExtension)
            }
            index => Err(invalid_choice("ResetType", index)),
        }
    }
}

impl Encode for ResetType {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        match self {
            Self::E1Interface(value) => {
                output.choice_index(ChoiceIndex::Root(0), 3, false)?;
                value.encode(output)
            }
            Self::PartOfE1Interface(connections) => {
                output.choice_index(ChoiceIndex::Root(1), 3, false)?;
                output.sequence_of(connections, Self::CONNECTION_LIST_SIZE, |output, field| {
                    field.encode(output)
                })
            }
            Self::ChoiceExtension(field) => {
                output.choice_index(ChoiceIndex::Root(2), 3, false)?;
                field.encode(output)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct UeAssociatedLogicalE1ConnectionItem {
    pub gnb_cu_cp_ue_e1ap_id: Option<GnbCuCpUeE1apId>,
    pub gnb_cu_up_ue_e1ap_id: Option<GnbCuUpUeE1apId>,
    pub ie_extensions: Option<ProtocolExtensionContainer>,
    pub extension_additions: ExtensionAdditions,
}

impl DecodePer for UeAssociatedLogicalE1ConnectionItem {
    fn decode_per(
        decoder: &mut PerDecoder<'_>,
        context: &mut PacketContext<'_>,
    ) -> Result<Self, DecodeError> {
        let preamble = decoder.sequence_preamble(true, 3)?;
        Ok(Self {
            gnb_cu_cp_ue_e1ap_id: decode_optional(preamble.is_present(0), decoder, context)?,
            gnb_cu_up_ue_e1ap_id: decode_optional(preamble.is_present(1), decoder, context)?,
            ie_extensions: decode_optional(preamble.is_present(2), decoder, context)?,
            extension_additions: decode_additions(&preamble, decoder)?,
        })
    }
}

impl Encode for UeAssociatedLogicalE1ConnectionItem {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        output.sequence_preamble(
            true,
            !self.extension_additions.is_empty(),
            &[
                self.gnb_cu_cp_ue_e1ap_id.is_some(),
                self.gnb_cu_up_ue_e1ap_id.is_some(),
                self.ie_extensions.is_some(),
            ],
        );
        encode_optional(&self.gnb_cu_cp_ue_e1ap_id, output)?;
        encode_optional(&self.gnb_cu_up_ue_e1ap_id, output)?;
        encode_optional(&self.ie_extensions, output)?;
        output.extension_additions(&self.extension_additions)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SecurityAlgorithm {
    pub ciphering_algorithm: CipheringAlgorithm,
    pub integrity_protection_algorithm: Option<IntegrityProtectionAlgorithm>,
    pub ie_extensions: Option<ProtocolExtensionContainer>,
    pub extension_additions: ExtensionAdditions,
}

impl DecodePer for SecurityAlgorithm {
    fn decode_per(
        decoder: &mut PerDecoder<'_>,
        context: &mut PacketContext<'_>,
    ) -> Result<Self, DecodeError> {
        let preamble = decoder.sequence_preamble(true, 2)?;
        Ok(Self {
            ciphering_algorithm: CipheringAlgorithm::decode_per(decoder, context)?,
            integrity_protection_algorithm: decode_optional(
                preamble.is_present(0),
                decoder,
                context,
            )?,
            ie_extensions: decode_optional(preamble.is_present(1), decoder, context)?,
            extension_additions: decode_additions(&preamble, decoder)?,
        })
    }
}

impl Encode for SecurityAlgorithm {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        output.sequence_preamble(
            true,
            !self.extension_additions.is_empty(),
            &[
                self.integrity_protection_algorithm.is_some(),
                self.ie_extensions.is_some(),
            ],
        );
        self.ciphering_algorithm.encode(output)?;
        encode_optional(&self.integrity_protection_algorithm, output)?;
        encode_optional(&self.ie_extensions, output)?;
        output.extension_additions(&self.extension_additions)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct UpSecurityKey {
    pub encryption_key: Bytes,
    pub integrity_protection_key: Option<Bytes>,
    pub ie_extensions: Option<ProtocolExtensionContainer>,
    pub extension_additions: ExtensionAdditions,
}

impl DecodePer for UpSecurityKey {
    fn decode_per(
        decoder: &mut PerDecoder<'_>,
        context: &mut PacketContext<'_>,
    ) -> Result<Self, DecodeError> {
        let preamble = decoder.sequence_preamble(true, 2)?;
        let encryption_key = Bytes::from(decoder.octet_string(SizeConstraint::unbounded(0))?);
        let integrity_protection_key = if preamble.is_present(0) {
            Some(Bytes::from(decoder.octet_string(SizeConstraint::unbounded(0))?))
        } else {
            None
        };
        Ok(Self {
            encryption_key,
            integrity_protection_key,
            ie_extensions: decode_optional(preamble.is_present(1), decoder, context)?,
            extension_additions: decode_additions(&preamble, decoder)?,
        })
    }
}

impl Encode for UpSecurityKey {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        output.sequence_preamble(
            true,
            !self.extension_additions.is_empty(),
            &[
                self.integrity_protection_key.is_some(),
                self.ie_extensions.is_some(),
            ],
        );
        output.octet_string(&self.encryption_key, SizeConstraint::unbounded(0))?;
        if let Some(key) = &self.integrity_protection_key {
            output.octet_string(key, SizeConstraint::unbounded(0))?;
        }
        encode_optional(&self.ie_extensions, output)?;
        output.extension_additions(&self.extension_additions)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SecurityInformation {
    pub security_algorithm: SecurityAlgorithm,
    pub up_security_key: UpSecurityKey,
    pub ie_extensions: Option<ProtocolExtensionContainer>,
    pub extension_additions: ExtensionAdditions,
}

impl DecodePer for SecurityInformation {
    fn decode_per(
        decoder: &mut PerDecoder<'_>,
        context: &mut PacketContext<'_>,
    ) -> Result<Self, DecodeError> {
        let preamble = decoder.sequence_preamble(true, 1)?;
        Ok(Self {
            security_algorithm: SecurityAlgorithm::decode_per(decoder, context)?,
            up_security_key: UpSecurityKey::decode_per(decoder, context)?,
            ie_extensions: decode_optional(preamble.is_present(0), decoder, context)?,
            extension_additions: decode_additions(&preamble, decoder)?,
        })
    }
}

impl Encode for SecurityInformation {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        output.sequence_preamble(
            true,
            !self.extension_additions.is_empty(),
            &[self.ie_extensions.is_some()],
        );
        self.security_algorithm.encode(output)?;
        self.up_security_key.encode(output)?;
        encode_optional(&self.ie_extensions, output)?;
        output.extension_additions(&self.extension_additions)
    }
}

/// `System-BearerContext*` and `System-GNB-CU-UP-CounterCheckRequest`: the IEs of the
/// E-UTRAN or NG-RAN variant of a bearer context message
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum SystemBearerContext {
    EUtran(ProtocolIeContainer),
    NgRan(ProtocolIeContainer),
    ChoiceExtension(Box<ProtocolIeField>),
}

impl DecodePer for SystemBearerContext {
    fn decode_per(
        decoder: &mut PerDecoder<'_>,
        context: &mut PacketContext<'_>,
    ) -> Result<Self, DecodeError> {
        match decoder.choice_index(3, false)? {
            ChoiceIndex::Root(0) => ProtocolIeContainer::decode_per(decoder, context).map(Self::EUtran),
            ChoiceIndex::Root(1) => ProtocolIeContainer::decode_per(decoder, context).map(Self::NgRan),
            ChoiceIndex::Root(2) => {
                decode_choice_extension(decoder, context).map(Self::ChoiceExtension)
            }
            index => Err(invalid_choice("System-BearerContext", index)),
        }
    }
}

impl Encode for SystemBearerContext {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        let (index, value): (u32, &dyn Encode) = match self {
            Self::EUtran(container) => (0, container),
            Self::NgRan(container) => (1, container),
            Self::ChoiceExtension(field) => (2, &**field),
        };
        output.choice_index(ChoiceIndex::Root(index), 3, false)?;
        value.encode(output)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DrbActivityItem {
    pub drb_id: DrbId,
    pub drb_activity: Activity,
    pub ie_extensions: Option<ProtocolExtensionContainer>,
    pub extension_additions: ExtensionAdditions,
}

impl DecodePer for DrbActivityItem {
    fn decode_per(
        decoder: &mut PerDecoder<'_>,
        context: &mut PacketContext<'_>,
    ) -> Result<Self, DecodeError> {
        let preamble = decoder.sequence_preamble(true, 1)?;
        Ok(Self {
            drb_id: DrbId::decode_per(decoder, context)?,
            drb_activity: Activity::decode_per(decoder, context)?,
            ie_extensions: decode_optional(preamble.is_present(0), decoder, context)?,
            extension_additions: decode_additions(&preamble, decoder)?,
        })
    }
}

impl Encode for DrbActivityItem {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        output.sequence_preamble(
            true,
            !self.extension_additions.is_empty(),
            &[self.ie_extensions.is_some()],
        );
        self.drb_id.encode(output)?;
        self.drb_activity.encode(output)?;
        encode_optional(&self.ie_extensions, output)?;
        output.extension_additions(&self.extension_additions)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PduSessionResourceActivityItem {
    pub pdu_session_id: PduSessionId,
    pub pdu_session_resource_activity: Activity,
    pub ie_extensions: Option<ProtocolExtensionContainer>,
    pub extension_additions: ExtensionAdditions,
}

impl DecodePer for PduSessionResourceActivityItem {
    fn decode_per(
        decoder: &mut PerDecoder<'_>,
        context: &mut PacketContext<'_>,
    ) -> Result<Self, DecodeError> {
        let preamble = decoder.sequence_preamble(true, 1)?;
        Ok(Self {
            pdu_session_id: PduSessionId::decode_per(decoder, context)?,
            pdu_session_resource_activity: Activity::decode_per(decoder, context)?,
            ie_extensions: decode_optional(preamble.is_present(0), decoder, context)?,
            extension_additions: decode_additions(&preamble, decoder)?,
        })
    }
}

impl Encode for PduSessionResourceActivityItem {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        output.sequence_preamble(
            true,
            !self.extension_additions.is_empty(),
            &[self.ie_extensions.is_some()],
        );
        self.pdu_session_id.encode(output)?;
        self.pdu_session_resource_activity.encode(output)?;
        encode_optional(&self.ie_extensions, output)?;
        output.extension_additions(&self.extension_additions)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum ActivityInformation {
    DrbActivityList(Vec<DrbActivityItem>),
    PduSessionResourceActivityList(Vec<PduSessionResourceActivityItem>),
    UeActivity(Activity),
    ChoiceExtension(Box<ProtocolIeField>),
}

impl ActivityInformation {
    const DRB_LIST_SIZE: SizeConstraint = SizeConstraint::range(1, MAXNOOF_DRBS);
    const PDU_SESSION_LIST_SIZE: SizeConstraint =
        SizeConstraint::range(1, MAXNOOF_PDU_SESSION_RESOURCE);
}

impl DecodePer for ActivityInformation {
    fn decode_per(
        decoder: &mut PerDecoder<'_>,
        context: &mut PacketContext<'_>,
    ) -> Result<Self, DecodeError> {
        match decoder.choice_index(4, false)? {
            ChoiceIndex::Root(0) => decoder
                .sequence_of(Self::DRB_LIST_SIZE, |decoder| {
                    DrbActivityItem::decode_per(decoder, context)
                })
                .map(Self::DrbActivityList),
            ChoiceIndex::Root(1) => decoder
                .sequence_of(Self::PDU_SESSION_LIST_SIZE, |decoder| {
                    PduSessionResourceActivityItem::decode_per(decoder, context)
                })
                .map(Self::PduSessionResourceActivityList),
            ChoiceIndex::Root(2) => Activity::decode_per(decoder, context).map(Self::UeActivity),
            ChoiceIndex::Root(3) => {
                decode_choice_extension(decoder, context).map(Self::ChoiceExtension)
            }
            index => Err(invalid_choice("ActivityInformation", index)),
        }
    }
}

impl Encode for ActivityInformation {
    fn encode(&self, output: &mut Encoder) -> Result<(), EncodeError> {
        match self {
            Self::DrbActivityList(items) => {
                output.choice_index(ChoiceIndex::Root(0), 4, false)?;
                output.sequence_of(items, Self::DRB_LIST_SIZE, |output, item| item.encode(output))
            }
            Self::PduSessionResourceActivityList(items) => {
                output.choice_index(ChoiceIndex::Root(1), 4, false)?;
                output.sequence_of(items, Self::PDU_SESSION_LIST_SIZE, |output, item| {
                    item.encode(output)
                })
            }
            Self::UeActivity(activity) => {
                output.choice_index(ChoiceIndex::Root(2), 4, false)?;
                activity.encode(output)
            }
            Self::ChoiceExtension(field) => {
                output.choice_index(ChoiceIndex::Root(3), 4, false)?;
                field.encode(output)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{e1ap::Registry, per::CodecOptions};
    use pretty_assertions::assert_eq;

    fn round_trip<T: DecodePer + Encode + PartialEq + core::fmt::Debug>(value: &T) -> Vec<u8> {
        let encoded = value.encode_to_vec().unwrap();
        let registry = Registry::e1ap();
        let mut context = PacketContext::new(&registry);
        let mut decoder = PerDecoder::new(&encoded, CodecOptions::e1ap());
        let decoded = T::decode_per(&mut decoder, &mut context).unwrap();
        assert_eq!(value, &decoded);
        assert_eq!(encoded.len(), decoder.consumed_octets());
        encoded
    }

    #[test]
    fn cause_is_three_bit_choice() {
        let encoded = round_trip(&Cause::Misc(CauseMisc::OmIntervention));
        // choice index 3 (3 bits), extension bit 0, enumerated index 3 (3 bits)
        assert_eq!(vec![0b0110_0110], encoded);
        round_trip(&Cause::RadioNetwork(CauseRadioNetwork::NormalRelease));
        round_trip(&Cause::RadioNetwork(CauseRadioNetwork::NpnNotSupported));
    }

    #[test]
    fn unknown_enumeration_extension_is_kept() {
        // Cause radioNetwork, extension bit set, normally small number 40
        let input = [0b0001_0101, 0b0000_0000];
        let registry = Registry::e1ap();
        let mut context = PacketContext::new(&registry);
        let mut decoder = PerDecoder::new(&input, CodecOptions::e1ap());
        let cause = Cause::decode_per(&mut decoder, &mut context).unwrap();
        assert_eq!(Cause::RadioNetwork(CauseRadioNetwork::Extension(40)), cause);
        assert_eq!("extension", CauseRadioNetwork::Extension(40).label());
        assert_eq!(input.to_vec(), cause.encode_to_vec().unwrap());
    }

    #[test]
    fn empty_choice_extension_payload() {
        // choice-extension, id 100, ignore, zero-length open type
        let input = [0x80, 0x00, 0x64, 0x40, 0x00];
        let registry = Registry::e1ap();
        let mut context = PacketContext::new(&registry);
        let mut decoder = PerDecoder::new(&input, CodecOptions::e1ap());
        let cause = Cause::decode_per(&mut decoder, &mut context).unwrap();
        assert_eq!(
            Cause::ChoiceExtension(Box::new(ProtocolIeField {
                id: ProtocolIeId(100),
                criticality: Criticality::Ignore,
                value: crate::e1ap::IeValue::Unparsed(Bytes::new()),
            })),
            cause
        );
        assert_eq!(5, decoder.consumed_octets());
        assert_eq!(input.to_vec(), cause.encode_to_vec().unwrap());
    }

    #[test]
    fn nested_choice_extensions_stop_at_depth_limit() {
        let mut cause = Cause::Misc(CauseMisc::OmIntervention);
        for _ in 0..40 {
            cause = Cause::ChoiceExtension(Box::new(ProtocolIeField::new(
                ProtocolIeId::CAUSE,
                Criticality::Ignore,
                cause,
            )));
        }
        let encoded = cause.encode_to_vec().unwrap();
        let registry = Registry::e1ap();
        let mut context = PacketContext::new(&registry);
        let mut decoder = PerDecoder::new(&encoded, CodecOptions::e1ap());
        let decoded = Cause::decode_per(&mut decoder, &mut context).unwrap();
        assert_eq!(encoded.len(), decoder.consumed_octets());
        assert_eq!(0, context.depth());

        let mut level = 0;
        let mut current = &decoded;
        while let Cause::ChoiceExtension(field) = current {
            match &field.value {
                crate::e1ap::IeValue::Cause(inner) => {
                    current = inner;
                    level += 1;
                }
                value => {
                    assert!(value.is_malformed());
                    break;
                }
            }
        }
        assert_eq!(31, level);
        assert_eq!(encoded, decoded.encode_to_vec().unwrap());
    }

    #[test]
    fn criticality_diagnostics_round_trip() {
        round_trip(&CriticalityDiagnostics {
            procedure_code: Some(ProcedureCode::BEARER_CONTEXT_SETUP),
            triggering_message: Some(TriggeringMessage::InitiatingMessage),
            procedure_criticality: Some(Criticality::Reject),
            transaction_id: Some(TransactionId(7)),
            ies_criticality_diagnostics: Some(vec![CriticalityDiagnosticsIeItem {
                ie_criticality: Criticality::Ignore,
                ie_id: ProtocolIeId::SECURITY_INFORMATION,
                type_of_error: TypeOfError::Missing,
                ie_extensions: None,
                extension_additions: ExtensionAdditions::default(),
            }]),
            ie_extensions: None,
            extension_additions: ExtensionAdditions::default(),
        });
        round_trip(&CriticalityDiagnostics::default());
    }

    #[test]
    fn identifiers_use_full_constraint_range() {
        let encoded = round_trip(&GnbCuUpId(68_719_476_735));
        // 3-bit octet count (5 octets), padding, then 5 octets
        assert_eq!(vec![0b1000_0000, 0x0f, 0xff, 0xff, 0xff, 0xff], encoded);
        round_trip(&GnbCuCpUeE1apId(u32::MAX));
        round_trip(&BitRate(4_000_000_000_000));
        round_trip(&BitRate(5_000_000_000_000));
        round_trip(&InactivityTimer(7200));
    }

    #[test]
    fn names_and_octet_strings_round_trip() {
        round_trip(&GnbCuUpName("gNB-CU-UP (lab)".into()));
        round_trip(&PlmnIdentity([0x02, 0xf8, 0x39]));
        round_trip(&RanUeId([1, 2, 3, 4, 5, 6, 7, 8]));
        assert!(GnbCuCpName("gNB-CU-CP é".into()).encode_to_vec().is_err());
    }

    #[test]
    fn security_information_round_trip() {
        round_trip(&SecurityInformation {
            security_algorithm: SecurityAlgorithm {
                ciphering_algorithm: CipheringAlgorithm::Nea2,
                integrity_protection_algorithm: Some(IntegrityProtectionAlgorithm::Nia2),
                ie_extensions: None,
                extension_additions: ExtensionAdditions::default(),
            },
            up_security_key: UpSecurityKey {
                encryption_key: Bytes::from_static(&[0x11; 16]),
                integrity_protection_key: Some(Bytes::from_static(&[0x22; 16])),
                ie_extensions: None,
                extension_additions: ExtensionAdditions::default(),
            },
            ie_extensions: None,
            extension_additions: ExtensionAdditions::default(),
        });
    }

    #[test]
    fn activity_information_round_trip() {
        round_trip(&ActivityInformation::DrbActivityList(vec![
            DrbActivityItem {
                drb_id: DrbId(1),
                drb_activity: Activity::Active,
                ie_extensions: None,
                extension_additions: ExtensionAdditions::default(),
            },
            DrbActivityItem {
                drb_id: DrbId(32),
                drb_activity: Activity::NotActive,
                ie_extensions: None,
                extension_additions: ExtensionAdditions::default(),
            },
        ]));
        round_trip(&ActivityInformation::UeActivity(Activity::NotActive));
        assert!(ActivityInformation::DrbActivityList(vec![])
            .encode_to_vec()
            .is_err());
    }

    #[test]
    fn reset_type_round_trip() {
        round_trip(&ResetType::E1Interface(ResetAll::ResetAll));
        round_trip(&ResetType::PartOfE1Interface(vec![ProtocolIeField::new(
            ProtocolIeId::UE_ASSOCIATED_LOGICAL_E1_CONNECTION_ITEM,
            Criticality::Reject,
            UeAssociatedLogicalE1ConnectionItem {
                gnb_cu_cp_ue_e1ap_id: Some(GnbCuCpUeE1apId(12)),
                gnb_cu_up_ue_e1ap_id: None,
                ie_extensions: None,
                extension_additions: ExtensionAdditions::default(),
            },
        )]));
    }
}
