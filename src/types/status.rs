use std::fmt;

/// Outcome codes shared by synchronous returns and completion events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Status {
    /// Successful operation.
    Success = 0,
    /// Generic failure.
    Failure = 1,
    /// Temporarily cannot handle this request. Only ever returned synchronously.
    Busy = 2,
}

impl Status {
    pub fn is_success(&self) -> bool {
        matches!(self, Status::Success)
    }

    /// Collapse a collaborator-reported status into a completion status.
    /// Anything other than `Success` becomes `Failure`.
    pub fn completion(self) -> Status {
        match self {
            Status::Success => Status::Success,
            Status::Failure | Status::Busy => Status::Failure,
        }
    }
}

impl TryFrom<u8> for Status {
    type Error = u8;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Status::Success),
            1 => Ok(Status::Failure),
            2 => Ok(Status::Busy),
            other => Err(other),
        }
    }
}

impl From<Status> for u8 {
    fn from(s: Status) -> u8 {
        s as u8
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Status::Success => "SUCCESS",
            Status::Failure => "FAILURE",
            Status::Busy => "BUSY",
        };
        f.write_str(text)
    }
}

/// Text for a raw status code, including codes outside the known set.
pub fn status_text(raw: u8) -> String {
    match Status::try_from(raw) {
        Ok(status) => status.to_string(),
        Err(code) => format!("UNKNOWN[{}]", code),
    }
}

/// Callback event kinds with their stable raw codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum EventKind {
    /// Service interface enabled
    Enabled = 0,
    /// Search accepted and handed to the engine
    SearchStarted = 1,
    /// Search finished (successfully or not)
    SearchCompleted = 2,
    /// Record creation finished
    RecordCreated = 3,
    /// Record removal finished
    RecordRemoved = 4,
}

impl EventKind {
    pub const COUNT: usize = 5;

    pub const ALL: [EventKind; Self::COUNT] = [
        EventKind::Enabled,
        EventKind::SearchStarted,
        EventKind::SearchCompleted,
        EventKind::RecordCreated,
        EventKind::RecordRemoved,
    ];
}

impl TryFrom<u16> for EventKind {
    type Error = u16;

    fn try_from(v: u16) -> Result<Self, Self::Error> {
        EventKind::ALL
            .iter()
            .copied()
            .find(|kind| *kind as u16 == v)
            .ok_or(v)
    }
}

impl From<EventKind> for u16 {
    fn from(k: EventKind) -> u16 {
        k as u16
    }
}
