use std::fmt::{Display, Formatter};

/// Opaque Google Drive file or folder id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DriveId(String);

impl DriveId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for DriveId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DriveId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<DriveId> for String {
    fn from(value: DriveId) -> Self {
        value.0
    }
}
impl From<String> for DriveId {
    fn from(value: String) -> Self {
        DriveId(value)
    }
}
impl From<&str> for DriveId {
    fn from(s: &str) -> Self {
        DriveId(s.to_string())
    }
}
