//! Domain types shared by the stores and the screens.
//!
//! Rows are immutable snapshots: created fresh on every store query, handed
//! to a screen, and dropped when the screen unmounts or re-queries. Nothing
//! here is persisted by the app.

/// Direction/outcome class of a logged call.
///
/// The platform store records this as a raw integer; [`CallType::from_raw`]
/// maps it. Unrecognised values map to [`CallType::Unknown`] rather than
/// failing the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallType {
    /// An answered inbound call.
    Incoming,
    /// An outbound call.
    Outgoing,
    /// An unanswered inbound call.
    Missed,
    /// Any value the store uses that this app does not model.
    Unknown,
}

impl CallType {
    /// Map the raw integer stored in the call-log `type` column.
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            1 => Self::Incoming,
            2 => Self::Outgoing,
            3 => Self::Missed,
            _ => Self::Unknown,
        }
    }

    /// Short label shown in the recents list.
    pub fn label(self) -> &'static str {
        match self {
            Self::Incoming => "Incoming",
            Self::Outgoing => "Outgoing",
            Self::Missed => "Missed",
            Self::Unknown => "Unknown",
        }
    }
}

/// One row of the platform call-log store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallLogEntry {
    /// Dialed or calling number as the store recorded it.
    pub number: String,
    /// Display name cached by the store at call time, if any.
    pub name: Option<String>,
    /// Call duration in seconds.
    pub duration_seconds: u64,
    /// Direction/outcome of the call.
    pub call_type: CallType,
    /// Call timestamp, epoch milliseconds.
    pub date_ms: i64,
}

impl CallLogEntry {
    /// Name to show for this entry: the cached name when present and
    /// non-blank, otherwise the number.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.number,
        }
    }

    /// First character of the display name, uppercased.
    pub fn initial(&self) -> String {
        initial_of(self.display_name())
    }
}

/// One row of the platform contacts store (one per phone number; a contact
/// without any number appears once with `phone_number` unset).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    /// Opaque identifier assigned by the source store.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Phone number; when present it is non-empty text suitable for a
    /// `tel:` URI (the reader normalizes blank values to `None`).
    pub phone_number: Option<String>,
}

impl Contact {
    /// First character of the name, uppercased.
    pub fn initial(&self) -> String {
        initial_of(&self.name)
    }
}

/// First character of `text`, uppercased; empty input yields an empty string.
fn initial_of(text: &str) -> String {
    text.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}
