use uuid::Uuid;

/// Profile family a discovered or local record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordType {
    /// Record without profile-specific interpretation
    #[default]
    Raw,
    /// Message Access Server
    MapMas,
    /// Message Notification Server
    MapMns,
    /// Phonebook Access server
    PbapPse,
    /// Phonebook Access client
    PbapPce,
    /// Object Push server
    Ops,
    /// SIM Access
    Sap,
    /// Device Identification
    Dip,
    /// Multi Profile Specification
    Mps,
}

/// One entry of a protocol descriptor list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProtocolDescriptor {
    L2cap { psm: u16 },
    Rfcomm { channel: u8 },
    Other(Uuid),
}

/// Handle the local record store assigns to a created record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordHandle(pub u32);

/// Attribute set describing one service, copied by value into results.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordDescriptor {
    pub record_type: RecordType,
    pub service_name: String,
    pub service_classes: Vec<Uuid>,
    pub protocols: Vec<ProtocolDescriptor>,
    pub profile_version: u16,
}

impl RecordDescriptor {
    pub fn new(record_type: RecordType, service_class: Uuid) -> Self {
        RecordDescriptor {
            record_type,
            service_classes: vec![service_class],
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    pub fn with_class(mut self, class: Uuid) -> Self {
        self.service_classes.push(class);
        self
    }

    pub fn with_protocol(mut self, protocol: ProtocolDescriptor) -> Self {
        self.protocols.push(protocol);
        self
    }

    pub fn with_profile_version(mut self, version: u16) -> Self {
        self.profile_version = version;
        self
    }

    /// True if `uuid` is one of the record's service classes.
    pub fn matches(&self, uuid: &Uuid) -> bool {
        self.service_classes.contains(uuid)
    }

    pub fn rfcomm_channel(&self) -> Option<u8> {
        self.protocols.iter().find_map(|p| match p {
            ProtocolDescriptor::Rfcomm { channel } => Some(*channel),
            _ => None,
        })
    }

    pub fn l2cap_psm(&self) -> Option<u16> {
        self.protocols.iter().find_map(|p| match p {
            ProtocolDescriptor::L2cap { psm } => Some(*psm),
            _ => None,
        })
    }
}
