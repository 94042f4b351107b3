use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Fixed timezone used when showing timestamps to users.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayZone {
    pub offset: FixedOffset,
    pub name: String,
}

impl DisplayZone {
    /// `hours` is the offset east of UTC; `None` if out of range.
    pub fn from_hours(hours: i32, name: impl Into<String>) -> Option<Self> {
        let offset = FixedOffset::east_opt(hours.checked_mul(3600)?)?;
        Some(Self {
            offset,
            name: name.into(),
        })
    }

    pub fn format(&self, at: DateTime<Utc>) -> String {
        let local = at.with_timezone(&self.offset);
        format!("{} ({})", local.format("%a, %b %-d @ %H:%M:%S"), self.name)
    }
}

/// An accepted sensor activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleComplete {
    pub at: DateTime<Utc>,
}

impl CycleComplete {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { at }
    }

    pub fn message(&self, zone: &DisplayZone) -> String {
        format!("Washing cycle complete on `{}`", zone.format(self.at))
    }
}
