use core::fmt::{self, Display};

#[cfg(feature = "serde")]
use serde::Serialize;

pub const MAX_PRIVATE_IES: usize = 65535;
pub const MAX_PROTOCOL_EXTENSIONS: usize = 65535;
pub const MAX_PROTOCOL_IES: usize = 65535;
pub const MAXNOOF_ERRORS: usize = 256;
pub const MAXNOOF_INDIVIDUAL_E1_CONNECTIONS_TO_RESET: usize = 65536;
pub const MAXNOOF_DRBS: usize = 32;
pub const MAXNOOF_PDU_SESSION_RESOURCE: usize = 256;

/// Kind of E1AP-PDU carrying a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum MessageType {
    InitiatingMessage,
    SuccessfulOutcome,
    UnsuccessfulOutcome,
}

impl MessageType {
    pub fn name(&self) -> &'static str {
        match self {
            MessageType::InitiatingMessage => "initiatingMessage",
            MessageType::SuccessfulOutcome => "successfulOutcome",
            MessageType::UnsuccessfulOutcome => "unsuccessfulOutcome",
        }
    }
}

/// `ProcedureCode ::= INTEGER (0..255)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ProcedureCode(pub u8);

impl ProcedureCode {
    pub const RESET: Self = Self(0);
    pub const ERROR_INDICATION: Self = Self(1);
    pub const PRIVATE_MESSAGE: Self = Self(2);
    pub const GNB_CU_UP_E1_SETUP: Self = Self(3);
    pub const GNB_CU_CP_E1_SETUP: Self = Self(4);
    pub const GNB_CU_UP_CONFIGURATION_UPDATE: Self = Self(5);
    pub const GNB_CU_CP_CONFIGURATION_UPDATE: Self = Self(6);
    pub const E1_RELEASE: Self = Self(7);
    pub const BEARER_CONTEXT_SETUP: Self = Self(8);
    pub const BEARER_CONTEXT_MODIFICATION: Self = Self(9);
    pub const BEARER_CONTEXT_MODIFICATION_REQUIRED: Self = Self(10);
    pub const BEARER_CONTEXT_RELEASE: Self = Self(11);
    pub const BEARER_CONTEXT_RELEASE_REQUEST: Self = Self(12);
    pub const BEARER_CONTEXT_INACTIVITY_NOTIFICATION: Self = Self(13);
    pub const DL_DATA_NOTIFICATION: Self = Self(14);
    pub const DATA_USAGE_REPORT: Self = Self(15);
    pub const GNB_CU_UP_COUNTER_CHECK: Self = Self(16);
    pub const GNB_CU_UP_STATUS_INDICATION: Self = Self(17);
    pub const UL_DATA_NOTIFICATION: Self = Self(18);
    pub const MRDC_DATA_USAGE_REPORT: Self = Self(19);
    pub const TRACE_START: Self = Self(20);
    pub const DEACTIVATE_TRACE: Self = Self(21);
    pub const RESOURCE_STATUS_REPORTING_INITIATION: Self = Self(22);
    pub const RESOURCE_STATUS_REPORTING: Self = Self(23);
    pub const IAB_UP_TNL_ADDRESS_UPDATE: Self = Self(24);
    pub const CELL_TRAFFIC_TRACE: Self = Self(25);
    pub const EARLY_FORWARDING_SN_TRANSFER: Self = Self(26);
    pub const GNB_CU_CP_MEASUREMENT_RESULTS_INFORMATION: Self = Self(27);
    pub const IAB_PSK_NOTIFICATION: Self = Self(28);
    pub const BC_BEARER_CONTEXT_SETUP: Self = Self(29);
    pub const BC_BEARER_CONTEXT_MODIFICATION: Self = Self(30);
    pub const BC_BEARER_CONTEXT_MODIFICATION_REQUIRED: Self = Self(31);
    pub const BC_BEARER_CONTEXT_RELEASE: Self = Self(32);
    pub const BC_BEARER_CONTEXT_RELEASE_REQUEST: Self = Self(33);
    pub const MC_BEARER_CONTEXT_SETUP: Self = Self(34);
    pub const MC_BEARER_CONTEXT_MODIFICATION: Self = Self(35);
    pub const MC_BEARER_CONTEXT_MODIFICATION_REQUIRED: Self = Self(36);
    pub const MC_BEARER_CONTEXT_RELEASE: Self = Self(37);
    pub const MC_BEARER_CONTEXT_RELEASE_REQUEST: Self = Self(38);
    pub const MC_BEARER_NOTIFICATION: Self = Self(39);

    pub fn name(&self) -> Option<&'static str> {
        PROCEDURES.get(usize::from(self.0)).map(|procedure| procedure.name)
    }

    pub fn procedure(&self) -> Option<&'static Procedure> {
        PROCEDURES.get(usize::from(self.0))
    }
}

impl Display for ProcedureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} ({})", self.0),
            None => write!(f, "unknown procedure ({})", self.0),
        }
    }
}

/// Elementary procedure with the names of its messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Procedure {
    pub code: ProcedureCode,
    pub name: &'static str,
    pub initiating: &'static str,
    pub successful: Option<&'static str>,
    pub unsuccessful: Option<&'static str>,
}

impl Procedure {
    pub fn message_name(&self, message_type: MessageType) -> Option<&'static str> {
        match message_type {
            MessageType::InitiatingMessage => Some(self.initiating),
            MessageType::SuccessfulOutcome => self.successful,
            MessageType::UnsuccessfulOutcome => self.unsuccessful,
        }
    }
}

const fn class1(
    code: u8,
    name: &'static str,
    initiating: &'static str,
    successful: &'static str,
    unsuccessful: Option<&'static str>,
) -> Procedure {
    Procedure {
        code: ProcedureCode(code),
        name,
        initiating,
        successful: Some(successful),
        unsuccessful,
    }
}

const fn class2(code: u8, name: &'static str, initiating: &'static str) -> Procedure {
    Procedure {
        code: ProcedureCode(code),
        name,
        initiating,
        successful: None,
        unsuccessful: None,
    }
}

/// E1AP elementary procedures (TS 37.483 §8.1), indexed by procedure code
pub static PROCEDURES: [Procedure; 40] = [
    class1(0, "id-reset", "Reset", "ResetAcknowledge", None),
    class2(1, "id-errorIndication", "ErrorIndication"),
    class2(2, "id-privateMessage", "PrivateMessage"),
    class1(
        3,
        "id-gNB-CU-UP-E1Setup",
        "GNB-CU-UP-E1SetupRequest",
        "GNB-CU-UP-E1SetupResponse",
        Some("GNB-CU-UP-E1SetupFailure"),
    ),
    class1(
        4,
        "id-gNB-CU-CP-E1Setup",
        "GNB-CU-CP-E1SetupRequest",
        "GNB-CU-CP-E1SetupResponse",
        Some("GNB-CU-CP-E1SetupFailure"),
    ),
    class1(
        5,
        "id-gNB-CU-UP-ConfigurationUpdate",
        "GNB-CU-UP-ConfigurationUpdate",
        "GNB-CU-UP-ConfigurationUpdateAcknowledge",
        Some("GNB-CU-UP-ConfigurationUpdateFailure"),
    ),
    class1(
        6,
        "id-gNB-CU-CP-ConfigurationUpdate",
        "GNB-CU-CP-ConfigurationUpdate",
        "GNB-CU-CP-ConfigurationUpdateAcknowledge",
        Some("GNB-CU-CP-ConfigurationUpdateFailure"),
    ),
    class1(7, "id-e1Release", "E1ReleaseRequest", "E1ReleaseResponse", None),
    class1(
        8,
        "id-bearerContextSetup",
        "BearerContextSetupRequest",
        "BearerContextSetupResponse",
        Some("BearerContextSetupFailure"),
    ),
    class1(
        9,
        "id-bearerContextModification",
        "BearerContextModificationRequest",
        "BearerContextModificationResponse",
        Some("BearerContextModificationFailure"),
    ),
    class1(
        10,
        "id-bearerContextModificationRequired",
        "BearerContextModificationRequired",
        "BearerContextModificationConfirm",
        None,
    ),
    class1(
        11,
        "id-bearerContextRelease",
        "BearerContextReleaseCommand",
        "BearerContextReleaseComplete",
        None,
    ),
    class2(
        12,
        "id-bearerContextReleaseRequest",
        "BearerContextReleaseRequest",
    ),
    class2(
        13,
        "id-bearerContextInactivityNotification",
        "BearerContextInactivityNotification",
    ),
    class2(14, "id-dLDataNotification", "DLDataNotification"),
    class2(15, "id-dataUsageReport", "DataUsageReport"),
    class2(
        16,
        "id-gNB-CU-UP-CounterCheck",
        "GNB-CU-UP-CounterCheckRequest",
    ),
    class2(
        17,
        "id-gNB-CU-UP-StatusIndication",
        "GNB-CU-UP-StatusIndication",
    ),
    class2(18, "id-uLDataNotification", "ULDataNotification"),
    class2(19, "id-mRDC-DataUsageReport", "MRDC-DataUsageReport"),
    class2(20, "id-TraceStart", "TraceStart"),
    class2(21, "id-DeactivateTrace", "DeactivateTrace"),
    class1(
        22,
        "id-resourceStatusReportingInitiation",
        "ResourceStatusRequest",
        "ResourceStatusResponse",
        Some("ResourceStatusFailure"),
    ),
    class2(23, "id-resourceStatusReporting", "ResourceStatusUpdate"),
    class1(
        24,
        "id-iAB-UPTNLAddressUpdate",
        "IAB-UPTNLAddressUpdate",
        "IAB-UPTNLAddressUpdateAcknowledge",
        Some("IAB-UPTNLAddressUpdateFailure"),
    ),
    class2(25, "id-CellTrafficTrace", "CellTrafficTrace"),
    class2(
        26,
        "id-earlyForwardingSNTransfer",
        "EarlyForwardingSNTransfer",
    ),
    class2(
        27,
        "id-gNB-CU-CPMeasurementResultsInformation",
        "GNB-CU-CPMeasurementResultsInformation",
    ),
    class2(28, "id-iABPSKNotification", "IABPSKNotification"),
    class1(
        29,
        "id-BCBearerContextSetup",
        "BCBearerContextSetupRequest",
        "BCBearerContextSetupResponse",
        Some("BCBearerContextSetupFailure"),
    ),
    class1(
        30,
        "id-BCBearerContextModification",
        "BCBearerContextModificationRequest",
        "BCBearerContextModificationResponse",
        Some("BCBearerContextModificationFailure"),
    ),
    class1(
        31,
        "id-BCBearerContextModificationRequired",
        "BCBearerContextModificationRequired",
        "BCBearerContextModificationConfirm",
        None,
    ),
    class1(
        32,
        "id-BCBearerContextRelease",
        "BCBearerContextReleaseCommand",
        "BCBearerContextReleaseComplete",
        None,
    ),
    class2(
        33,
        "id-BCBearerContextReleaseRequest",
        "BCBearerContextReleaseRequest",
    ),
    class1(
        34,
        "id-MCBearerContextSetup",
        "MCBearerContextSetupRequest",
        "MCBearerContextSetupResponse",
        Some("MCBearerContextSetupFailure"),
    ),
    class1(
        35,
        "id-MCBearerContextModification",
        "MCBearerContextModificationRequest",
        "MCBearerContextModificationResponse",
        Some("MCBearerContextModificationFailure"),
    ),
    class1(
        36,
        "id-MCBearerContextModificationRequired",
        "MCBearerContextModificationRequired",
        "MCBearerContextModificationConfirm",
        None,
    ),
    class1(
        37,
        "id-MCBearerContextRelease",
        "MCBearerContextReleaseCommand",
        "MCBearerContextReleaseComplete",
        None,
    ),
    class2(
        38,
        "id-MCBearerContextReleaseRequest",
        "MCBearerContextReleaseRequest",
    ),
    class2(39, "id-MCBearerNotification", "MCBearerNotification"),
];

/// `ProtocolIE-ID ::= INTEGER (0..65535)`, also used for protocol extension ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ProtocolIeId(pub u16);

macro_rules! protocol_ie_ids {
    ($($constant:ident = $id:literal => $name:literal,)*) => {
        impl ProtocolIeId {
            $(pub const $constant: Self = Self($id);)*

            pub fn name(&self) -> Option<&'static str> {
                match self.0 {
                    $($id => Some($name),)*
                    _ => None,
                }
            }
        }
    };
}

// ProtocolIE-IDs of TS 37.483 §9.4.7, ids 56 and 138 have no entry
protocol_ie_ids! {
    CAUSE = 0 => "id-Cause",
    CRITICALITY_DIAGNOSTICS = 1 => "id-CriticalityDiagnostics",
    GNB_CU_CP_UE_E1AP_ID = 2 => "id-gNB-CU-CP-UE-E1AP-ID",
    GNB_CU_UP_UE_E1AP_ID = 3 => "id-gNB-CU-UP-UE-E1AP-ID",
    RESET_TYPE = 4 => "id-ResetType",
    UE_ASSOCIATED_LOGICAL_E1_CONNECTION_ITEM = 5 => "id-UE-associatedLogicalE1-ConnectionItem",
    DATA_USAGE_REPORT_LIST = 6 => "id-Data-Usage-Report-List",
    GNB_CU_UP_ID = 7 => "id-gNB-CU-UP-ID",
    GNB_CU_UP_NAME = 8 => "id-gNB-CU-UP-Name",
    GNB_CU_CP_NAME = 9 => "id-gNB-CU-CP-Name",
    CN_SUPPORT = 10 => "id-CNSupport",
    SUPPORTED_PLMNS = 11 => "id-SupportedPLMNs",
    TIME_TO_WAIT = 12 => "id-TimeToWait",
    SECURITY_INFORMATION = 13 => "id-SecurityInformation",
    UE_DL_AGGREGATE_MAXIMUM_BIT_RATE = 14 => "id-UEDLAggregateMaximumBitRate",
    SYSTEM_BEARER_CONTEXT_SETUP_REQUEST = 15 => "id-System-BearerContextSetupRequest",
    SYSTEM_BEARER_CONTEXT_SETUP_RESPONSE = 16 => "id-System-BearerContextSetupResponse",
    BEARER_CONTEXT_STATUS_CHANGE = 17 => "id-BearerContextStatusChange",
    SYSTEM_BEARER_CONTEXT_MODIFICATION_REQUEST = 18 => "id-System-BearerContextModificationRequest",
    SYSTEM_BEARER_CONTEXT_MODIFICATION_RESPONSE = 19 => "id-System-BearerContextModificationResponse",
    SYSTEM_BEARER_CONTEXT_MODIFICATION_CONFIRM = 20 => "id-System-BearerContextModificationConfirm",
    SYSTEM_BEARER_CONTEXT_MODIFICATION_REQUIRED = 21 => "id-System-BearerContextModificationRequired",
    DRB_STATUS_LIST = 22 => "id-DRB-Status-List",
    ACTIVITY_NOTIFICATION_LEVEL = 23 => "id-ActivityNotificationLevel",
    ACTIVITY_INFORMATION = 24 => "id-ActivityInformation",
    DRB_TO_SETUP_LIST_EUTRAN = 25 => "id-DRB-To-Setup-List-EUTRAN",
    DRB_TO_MODIFY_LIST_EUTRAN = 26 => "id-DRB-To-Modify-List-EUTRAN",
    DRB_TO_REMOVE_LIST_EUTRAN = 27 => "id-DRB-To-Remove-List-EUTRAN",
    DRB_REQUIRED_TO_MODIFY_LIST_EUTRAN = 28 => "id-DRB-Required-To-Modify-List-EUTRAN",
    DRB_REQUIRED_TO_REMOVE_LIST_EUTRAN = 29 => "id-DRB-Required-To-Remove-List-EUTRAN",
    DRB_SETUP_LIST_EUTRAN = 30 => "id-DRB-Setup-List-EUTRAN",
    DRB_FAILED_LIST_EUTRAN = 31 => "id-DRB-Failed-List-EUTRAN",
    DRB_MODIFIED_LIST_EUTRAN = 32 => "id-DRB-Modified-List-EUTRAN",
    DRB_FAILED_TO_MODIFY_LIST_EUTRAN = 33 => "id-DRB-Failed-To-Modify-List-EUTRAN",
    DRB_CONFIRM_MODIFIED_LIST_EUTRAN = 34 => "id-DRB-Confirm-Modified-List-EUTRAN",
    PDU_SESSION_RESOURCE_TO_SETUP_LIST = 35 => "id-PDU-Session-Resource-To-Setup-List",
    PDU_SESSION_RESOURCE_TO_MODIFY_LIST = 36 => "id-PDU-Session-Resource-To-Modify-List",
    PDU_SESSION_RESOURCE_TO_REMOVE_LIST = 37 => "id-PDU-Session-Resource-To-Remove-List",
    PDU_SESSION_RESOURCE_REQUIRED_TO_MODIFY_LIST = 38 => "id-PDU-Session-Resource-Required-To-Modify-List",
    PDU_SESSION_RESOURCE_SETUP_LIST = 39 => "id-PDU-Session-Resource-Setup-List",
    PDU_SESSION_RESOURCE_FAILED_LIST = 40 => "id-PDU-Session-Resource-Failed-List",
    PDU_SESSION_RESOURCE_MODIFIED_LIST = 41 => "id-PDU-Session-Resource-Modified-List",
    PDU_SESSION_RESOURCE_FAILED_TO_MODIFY_LIST = 42 => "id-PDU-Session-Resource-Failed-To-Modify-List",
    PDU_SESSION_RESOURCE_CONFIRM_MODIFIED_LIST = 43 => "id-PDU-Session-Resource-Confirm-Modified-List",
    DRB_TO_SETUP_MOD_LIST_EUTRAN = 44 => "id-DRB-To-Setup-Mod-List-EUTRAN",
    DRB_SETUP_MOD_LIST_EUTRAN = 45 => "id-DRB-Setup-Mod-List-EUTRAN",
    DRB_FAILED_MOD_LIST_EUTRAN = 46 => "id-DRB-Failed-Mod-List-EUTRAN",
    PDU_SESSION_RESOURCE_SETUP_MOD_LIST = 47 => "id-PDU-Session-Resource-Setup-Mod-List",
    PDU_SESSION_RESOURCE_FAILED_MOD_LIST = 48 => "id-PDU-Session-Resource-Failed-Mod-List",
    PDU_SESSION_RESOURCE_TO_SETUP_MOD_LIST = 49 => "id-PDU-Session-Resource-To-Setup-Mod-List",
    NEW_UL_TNL_INFORMATION_REQUIRED = 50 => "id-New-UL-TNL-Information-Required",
    GNB_CU_CP_TNLA_TO_ADD_LIST = 51 => "id-GNB-CU-CP-TNLA-To-Add-List",
    GNB_CU_CP_TNLA_TO_REMOVE_LIST = 52 => "id-GNB-CU-CP-TNLA-To-Remove-List",
    GNB_CU_CP_TNLA_TO_UPDATE_LIST = 53 => "id-GNB-CU-CP-TNLA-To-Update-List",
    GNB_CU_CP_TNLA_SETUP_LIST = 54 => "id-GNB-CU-CP-TNLA-Setup-List",
    GNB_CU_CP_TNLA_FAILED_TO_SETUP_LIST = 55 => "id-GNB-CU-CP-TNLA-Failed-To-Setup-List",
    TRANSACTION_ID = 57 => "id-TransactionID",
    SERVING_PLMN = 58 => "id-Serving-PLMN",
    UE_INACTIVITY_TIMER = 59 => "id-UE-Inactivity-Timer",
    SYSTEM_GNB_CU_UP_COUNTER_CHECK_REQUEST = 60 => "id-System-GNB-CU-UP-CounterCheckRequest",
    DRBS_SUBJECT_TO_COUNTER_CHECK_LIST_EUTRAN = 61 => "id-DRBs-Subject-To-Counter-Check-List-EUTRAN",
    DRBS_SUBJECT_TO_COUNTER_CHECK_LIST_NG_RAN = 62 => "id-DRBs-Subject-To-Counter-Check-List-NG-RAN",
    PPI = 63 => "id-PPI",
    GNB_CU_UP_CAPACITY = 64 => "id-gNB-CU-UP-Capacity",
    GNB_CU_UP_OVERLOAD_INFORMATION = 65 => "id-GNB-CU-UP-OverloadInformation",
    UE_DL_MAXIMUM_INTEGRITY_PROTECTED_DATA_RATE = 66 => "id-UEDLMaximumIntegrityProtectedDataRate",
    PDU_SESSION_TO_NOTIFY_LIST = 67 => "id-PDU-Session-To-Notify-List",
    PDU_SESSION_RESOURCE_DATA_USAGE_LIST = 68 => "id-PDU-Session-Resource-Data-Usage-List",
    SNSSAI = 69 => "id-SNSSAI",
    DATA_DISCARD_REQUIRED = 70 => "id-DataDiscardRequired",
    OLD_QOS_FLOW_MAP_UL_ENDMARKER_EXPECTED = 71 => "id-OldQoSFlowMap-ULendmarkerexpected",
    DRB_QOS = 72 => "id-DRB-QoS",
    GNB_CU_UP_TNLA_TO_REMOVE_LIST = 73 => "id-GNB-CU-UP-TNLA-To-Remove-List",
    ENDPOINT_IP_ADDRESS_AND_PORT = 74 => "id-endpoint-IP-Address-and-Port",
    TNL_ASSOCIATION_TRANSPORT_LAYER_ADDRESS_GNB_CU_UP = 75 => "id-TNLAssociationTransportLayerAddressgNBCUUP",
    RAN_UE_ID = 76 => "id-RANUEID",
    GNB_DU_ID = 77 => "id-GNB-DU-ID",
    COMMON_NETWORK_INSTANCE = 78 => "id-CommonNetworkInstance",
    NETWORK_INSTANCE = 79 => "id-NetworkInstance",
    QOS_FLOW_MAPPING_INDICATION = 80 => "id-QoSFlowMappingIndication",
    TRACE_ACTIVATION = 81 => "id-TraceActivation",
    TRACE_ID = 82 => "id-TraceID",
    SUBSCRIBER_PROFILE_ID_FOR_RFP = 83 => "id-SubscriberProfileIDforRFP",
    ADDITIONAL_RRM_PRIORITY_INDEX = 84 => "id-AdditionalRRMPriorityIndex",
    RETAINABILITY_MEASUREMENTS_INFO = 85 => "id-RetainabilityMeasurementsInfo",
    TRANSPORT_LAYER_ADDRESS_INFO = 86 => "id-Transport-Layer-Address-Info",
    QOS_MONITORING_REQUEST = 87 => "id-QoSMonitoringRequest",
    PDCP_STATUS_REPORT_INDICATION = 88 => "id-PDCP-StatusReportIndication",
    GNB_CU_CP_MEASUREMENT_ID = 89 => "id-gNB-CU-CP-Measurement-ID",
    GNB_CU_UP_MEASUREMENT_ID = 90 => "id-gNB-CU-UP-Measurement-ID",
    REGISTRATION_REQUEST = 91 => "id-RegistrationRequest",
    REPORT_CHARACTERISTICS = 92 => "id-ReportCharacteristics",
    REPORTING_PERIODICITY = 93 => "id-ReportingPeriodicity",
    TNL_AVAILABLE_CAPACITY_INDICATOR = 94 => "id-TNL-AvailableCapacityIndicator",
    HW_CAPACITY_INDICATOR = 95 => "id-HW-CapacityIndicator",
    REDUNDANT_COMMON_NETWORK_INSTANCE = 96 => "id-RedundantCommonNetworkInstance",
    REDUNDANT_NG_UL_UP_TNL_INFORMATION = 97 => "id-redundant-nG-UL-UP-TNL-Information",
    REDUNDANT_NG_DL_UP_TNL_INFORMATION = 98 => "id-redundant-nG-DL-UP-TNL-Information",
    REDUNDANT_QOS_FLOW_INDICATOR = 99 => "id-RedundantQosFlowIndicator",
    TSC_TRAFFIC_CHARACTERISTICS = 100 => "id-TSCTrafficCharacteristics",
    CN_PACKET_DELAY_BUDGET_DOWNLINK = 101 => "id-CNPacketDelayBudgetDownlink",
    CN_PACKET_DELAY_BUDGET_UPLINK = 102 => "id-CNPacketDelayBudgetUplink",
    EXTENDED_PACKET_DELAY_BUDGET = 103 => "id-ExtendedPacketDelayBudget",
    ADDITIONAL_PDCP_DUPLICATION_INFORMATION = 104 => "id-AdditionalPDCPduplicationInformation",
    REDUNDANT_PDU_SESSION_INFORMATION = 105 => "id-RedundantPDUSessionInformation",
    REDUNDANT_PDU_SESSION_INFORMATION_USED = 106 => "id-RedundantPDUSessionInformation-used",
    QOS_MAPPING_INFORMATION = 107 => "id-QoS-Mapping-Information",
    DL_UP_TNL_ADDRESS_TO_UPDATE_LIST = 108 => "id-DLUPTNLAddressToUpdateList",
    UL_UP_TNL_ADDRESS_TO_UPDATE_LIST = 109 => "id-ULUPTNLAddressToUpdateList",
    NPN_SUPPORT_INFO = 110 => "id-NPNSupportInfo",
    NPN_CONTEXT_INFO = 111 => "id-NPNContextInfo",
    MDT_CONFIGURATION = 112 => "id-MDTConfiguration",
    MANAGEMENT_BASED_MDT_PLMN_LIST = 113 => "id-ManagementBasedMDTPLMNList",
    TRACE_COLLECTION_ENTITY_IP_ADDRESS = 114 => "id-TraceCollectionEntityIPAddress",
    PRIVACY_INDICATOR = 115 => "id-PrivacyIndicator",
    TRACE_COLLECTION_ENTITY_URI = 116 => "id-TraceCollectionEntityURI",
    URI_ADDRESS = 117 => "id-URIaddress",
    EHC_PARAMETERS = 118 => "id-EHC-Parameters",
    DRBS_SUBJECT_TO_EARLY_FORWARDING_LIST = 119 => "id-DRBs-Subject-To-Early-Forwarding-List",
    DRB_MEASUREMENT_RESULTS_INFORMATION_LIST = 120 => "id-DRB-Measurement-Results-Information-List",
    EARLY_FORWARDING_COUNT_REQ = 121 => "id-EarlyForwardingCOUNTReq",
    EARLY_FORWARDING_COUNT_INFO = 122 => "id-EarlyForwardingCOUNTInfo",
    DAPS_REQUEST_INFO = 123 => "id-DAPSRequestInfo",
    EARLY_DATA_FORWARDING_INDICATOR = 124 => "id-EarlyDataForwardingIndicator",
    ALTERNATIVE_QOS_PARA_SET_LIST = 125 => "id-AlternativeQoSParaSetList",
    EXTENDED_SLICE_SUPPORT_LIST = 126 => "id-ExtendedSliceSupportList",
    MCG_OFFERED_GBR_QOS_FLOW_INFO = 127 => "id-MCG-OfferedGBRQoSFlowInfo",
    NUMBER_OF_TUNNELS = 128 => "id-Number-of-tunnels",
    DATA_FORWARDING_TO_EUTRAN_INFORMATION_LIST = 129 => "id-DataForwardingtoE-UTRANInformationList",
    QOS_MONITORING_REPORTING_FREQUENCY = 130 => "id-QosMonitoringReportingFrequency",
    QOS_MONITORING_DISABLED = 131 => "id-QoSMonitoringDisabled",
    ADDITIONAL_HANDOVER_INFO = 132 => "id-AdditionalHandoverInfo",
    EXTENDED_NR_CGI_SUPPORT_LIST = 133 => "id-Extended-NR-CGI-Support-List",
    DATA_FORWARDING_TO_NG_RAN_QOS_FLOW_INFORMATION_LIST = 134 => "id-DataForwardingtoNG-RANQoSFlowInformationList",
    MAX_CID_EHC_DL = 135 => "id-MaxCIDEHCDL",
    IGNORE_MAPPING_RULE_INDICATION = 136 => "id-ignoreMappingRuleIndication",
    DIRECT_FORWARDING_PATH_AVAILABILITY = 137 => "id-DirectForwardingPathAvailability",
    QOS_FLOWS_DRB_REMAPPING = 139 => "id-QoSFlowsDRBRemapping",
    DATA_FORWARDING_SOURCE_IP_ADDRESS = 140 => "id-DataForwardingSourceIPAddress",
    SECURITY_INDICATION_MODIFY = 141 => "id-SecurityIndicationModify",
    IAB_DONOR_CU_UP_PSK_INFO = 142 => "id-IAB-Donor-CU-UPPSKInfo",
    ECGI_SUPPORT_LIST = 143 => "id-ECGI-Support-List",
    MDT_POLLUTED_MEASUREMENT_INDICATOR = 144 => "id-MDTPollutedMeasurementIndicator",
    M4_REPORT_AMOUNT = 145 => "id-M4ReportAmount",
    M6_REPORT_AMOUNT = 146 => "id-M6ReportAmount",
    M7_REPORT_AMOUNT = 147 => "id-M7ReportAmount",
    UE_SLICE_MAXIMUM_BIT_RATE_LIST = 148 => "id-UESliceMaximumBitRateList",
    PDU_SESSION_PAIR_ID = 149 => "id-PDUSession-PairID",
    SURVIVAL_TIME = 150 => "id-SurvivalTime",
    UDC_PARAMETERS = 151 => "id-UDC-Parameters",
    SCG_ACTIVATION_STATUS = 152 => "id-SCGActivationStatus",
    GNB_CU_CP_MBS_E1AP_ID = 153 => "id-GNB-CU-CP-MBS-E1AP-ID",
    GNB_CU_UP_MBS_E1AP_ID = 154 => "id-GNB-CU-UP-MBS-E1AP-ID",
    GLOBAL_MBS_SESSION_ID = 155 => "id-GlobalMBSSessionID",
    BC_BEARER_CONTEXT_TO_SETUP = 156 => "id-BCBearerContextToSetup",
    BC_BEARER_CONTEXT_TO_SETUP_RESPONSE = 157 => "id-BCBearerContextToSetupResponse",
    BC_BEARER_CONTEXT_TO_MODIFY = 158 => "id-BCBearerContextToModify",
    BC_BEARER_CONTEXT_TO_MODIFY_RESPONSE = 159 => "id-BCBearerContextToModifyResponse",
    BC_BEARER_CONTEXT_TO_MODIFY_REQUIRED = 160 => "id-BCBearerContextToModifyRequired",
    BC_BEARER_CONTEXT_TO_MODIFY_CONFIRM = 161 => "id-BCBearerContextToModifyConfirm",
    MC_BEARER_CONTEXT_TO_SETUP = 162 => "id-MCBearerContextToSetup",
    MC_BEARER_CONTEXT_TO_SETUP_RESPONSE = 163 => "id-MCBearerContextToSetupResponse",
    MC_BEARER_CONTEXT_TO_MODIFY = 164 => "id-MCBearerContextToModify",
    MC_BEARER_CONTEXT_TO_MODIFY_RESPONSE = 165 => "id-MCBearerContextToModifyResponse",
    MC_BEARER_CONTEXT_TO_MODIFY_REQUIRED = 166 => "id-MCBearerContextToModifyRequired",
    MC_BEARER_CONTEXT_TO_MODIFY_CONFIRM = 167 => "id-MCBearerContextToModifyConfirm",
    MBS_MULTICAST_F1U_CONTEXT_DESCRIPTOR = 168 => "id-MBSMulticastF1UContextDescriptor",
    GNB_CU_UP_MBS_SUPPORT_INFO = 169 => "id-gNB-CU-UP-MBS-Support-Info",
    SECURITY_INDICATION = 170 => "id-SecurityIndication",
    SECURITY_RESULT = 171 => "id-SecurityResult",
    SDT_CONTINUE_ROHC = 172 => "id-SDTContinueROHC",
    SDT_INDICATOR_SETUP = 173 => "id-SDTindicatorSetup",
    SDT_INDICATOR_MOD = 174 => "id-SDTindicatorMod",
    DISCARD_TIMER_EXTENDED = 175 => "id-DiscardTimerExtended",
    MANAGEMENT_BASED_MDT_PLMN_MODIFICATION_LIST = 176 => "id-ManagementBasedMDTPLMNModificationList",
    MC_FORWARDING_RESOURCE_REQUEST = 177 => "id-MCForwardingResourceRequest",
    MC_FORWARDING_RESOURCE_INDICATION = 178 => "id-MCForwardingResourceIndication",
    MC_FORWARDING_RESOURCE_RESPONSE = 179 => "id-MCForwardingResourceResponse",
    MC_FORWARDING_RESOURCE_RELEASE = 180 => "id-MCForwardingResourceRelease",
    MC_FORWARDING_RESOURCE_RELEASE_INDICATION = 181 => "id-MCForwardingResourceReleaseIndication",
    PDCP_COUNT_RESET = 182 => "id-PDCP-COUNT-Reset",
    MBS_SESSION_ASSOCIATED_INFO_NON_SUPPORT_TO_SUPPORT = 183 => "id-MBSSessionAssociatedInfoNonSupportToSupport",
    VERSION_ID = 184 => "id-VersionID",
    INACTIVITY_INFORMATION_REQUEST = 185 => "id-InactivityInformationRequest",
    UE_INACTIVITY_INFORMATION = 186 => "id-UEInactivityInformation",
    MBS_AREA_SESSION_ID = 187 => "id-MBSAreaSessionID",
    SECONDARY_PDU_SESSION_DATA_FORWARDING_INFORMATION = 188 => "id-Secondary-PDU-Session-Data-Forwarding-Information",
    MBS_SESSION_RESOURCE_NOTIFICATION = 189 => "id-MBSSessionResourceNotification",
    MC_BEARER_CONTEXT_INACTIVITY_TIMER = 190 => "id-MCBearerContextInactivityTimer",
    MC_BEARER_CONTEXT_STATUS_CHANGE = 191 => "id-MCBearerContextStatusChange",
    MT_SDT_INFORMATION = 192 => "id-MT-SDT-Information",
    MT_SDT_INFORMATION_REQUEST = 193 => "id-MT-SDT-Information-Request",
    SDT_DATA_SIZE_THRESHOLD = 194 => "id-SDT-data-size-threshold",
    SDT_DATA_SIZE_THRESHOLD_CROSSED = 195 => "id-SDT-data-size-threshold-Crossed",
    SPECIAL_TRIGGERING_PURPOSE = 196 => "id-SpecialTriggeringPurpose",
    ASSOCIATED_SESSION_ID = 197 => "id-AssociatedSessionID",
    MBS_SERVICE_AREA = 198 => "id-MBS-ServiceArea",
    PDU_SET_QOS_PARAMETERS = 199 => "id-PDUSetQoSParameters",
    N6_JITTER_INFORMATION = 200 => "id-N6JitterInformation",
    ECN_MARKING_OR_CONGESTION_INFORMATION_REPORTING_REQUEST = 201 => "id-ECNMarkingorCongestionInformationReportingRequest",
    ECN_MARKING_OR_CONGESTION_INFORMATION_REPORTING_STATUS = 202 => "id-ECNMarkingorCongestionInformationReportingStatus",
    PDU_SET_BASED_HANDLING_INDICATOR = 203 => "id-PDUSetbasedHandlingIndicator",
    INDIRECT_PATH_INDICATION = 204 => "id-IndirectPathIndication",
    F1U_TUNNEL_NOT_ESTABLISHED = 205 => "id-F1UTunnelNotEstablished",
    F1U_TNL_INFO_TO_ADD_LIST = 206 => "id-F1U-TNL-InfoToAdd-List",
    F1U_TNL_INFO_ADDED_LIST = 207 => "id-F1U-TNL-InfoAdded-List",
    F1U_TNL_INFO_TO_ADD_OR_MODIFY_LIST = 208 => "id-F1U-TNL-InfoToAddOrModify-List",
    F1U_TNL_INFO_ADDED_OR_MODIFIED_LIST = 209 => "id-F1U-TNL-InfoAddedOrModified-List",
    F1U_TNL_INFO_TO_RELEASE_LIST = 210 => "id-F1U-TNL-InfoToRelease-List",
    BROADCAST_F1U_CONTEXT_REFERENCE_E1 = 211 => "id-BroadcastF1U-ContextReferenceE1",
    PSI_BASED_DISCARD_TIMER = 212 => "id-PSIbasedDiscardTimer",
    USER_PLANE_ERROR_INDICATOR = 213 => "id-UserPlaneErrorIndicator",
    MAXIMUM_DATA_BURST_VOLUME = 214 => "id-MaximumDataBurstVolume",
    BC_BEARER_CONTEXT_NGU_TNL_INFO_AT_NG_RAN_REQUEST = 215 => "id-BCBearerContextNGU-TNLInfoatNGRAN-Request",
    PDCP_SN_GAP_REPORT = 216 => "id-PDCPSNGapReport",
    USER_PLANE_FAILURE_INDICATION = 217 => "id-UserPlaneFailureIndication",
}

impl Display for ProtocolIeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name} ({})", self.0),
            None => write!(f, "unknown IE ({})", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procedure_table_is_indexed_by_code() {
        for (index, procedure) in PROCEDURES.iter().enumerate() {
            assert_eq!(index, usize::from(procedure.code.0));
        }
        assert_eq!(Some("id-bearerContextSetup"), ProcedureCode::BEARER_CONTEXT_SETUP.name());
        assert_eq!(None, ProcedureCode(40).name());
    }

    #[test]
    fn message_names_per_outcome() {
        let setup = ProcedureCode::GNB_CU_UP_E1_SETUP.procedure().unwrap();
        assert_eq!(
            Some("GNB-CU-UP-E1SetupFailure"),
            setup.message_name(MessageType::UnsuccessfulOutcome)
        );
        let reset = ProcedureCode::RESET.procedure().unwrap();
        assert_eq!(None, reset.message_name(MessageType::UnsuccessfulOutcome));
        let error = ProcedureCode::ERROR_INDICATION.procedure().unwrap();
        assert_eq!(None, error.message_name(MessageType::SuccessfulOutcome));
    }

    #[test]
    fn ie_catalogue_covers_later_releases() {
        assert_eq!(
            Some("id-GNB-CU-CP-TNLA-To-Add-List"),
            ProtocolIeId::GNB_CU_CP_TNLA_TO_ADD_LIST.name()
        );
        assert_eq!(Some("id-TraceActivation"), ProtocolIeId(81).name());
        assert_eq!(
            Some("id-DRB-Measurement-Results-Information-List"),
            ProtocolIeId::DRB_MEASUREMENT_RESULTS_INFORMATION_LIST.name()
        );
        assert_eq!(Some("id-UserPlaneFailureIndication"), ProtocolIeId(217).name());
        assert_eq!(None, ProtocolIeId(218).name());
        let named = (0..=217u16).filter(|id| ProtocolIeId(*id).name().is_some()).count();
        assert_eq!(216, named);
    }

    #[test]
    fn ie_names_render_numerically_when_unknown() {
        assert_eq!("id-TransactionID (57)", alloc::format!("{}", ProtocolIeId::TRANSACTION_ID));
        assert_eq!("unknown IE (1000)", alloc::format!("{}", ProtocolIeId(1000)));
        assert_eq!("unknown procedure (200)", alloc::format!("{}", ProcedureCode(200)));
    }
}
