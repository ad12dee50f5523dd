use serde::{Deserialize, Serialize};

/// One profile to collect a photo for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileEntry {
    /// Human-readable name, used only for progress output
    pub display_name: String,
    /// Handle of the profile on the remote service
    pub external_handle: String,
    /// Local identifier; the stem of the saved file
    pub local_id: String,
    /// Organization the profile is listed under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<String>,
}

impl ProfileEntry {
    pub fn new(
        display_name: impl Into<String>,
        external_handle: impl Into<String>,
        local_id: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            external_handle: external_handle.into(),
            local_id: local_id.into(),
            org: None,
        }
    }

    pub fn with_org(mut self, org: impl Into<String>) -> Self {
        self.org = Some(org.into());
        self
    }
}

/// Ordered list of profiles, processed front to back
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    pub entries: Vec<ProfileEntry>,
}

impl Registry {
    pub fn new(entries: Vec<ProfileEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProfileEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a ProfileEntry;
    type IntoIter = std::slice::Iter<'a, ProfileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<ProfileEntry> for Registry {
    fn from_iter<I: IntoIterator<Item = ProfileEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
