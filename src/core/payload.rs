// Request bodies as clients send them.
//
// Everything is optional here so that missing fields turn into our own
// validation messages instead of serde errors. Dates and statuses stay as
// strings until the tracker checks them.

use serde::{Deserialize, Deserializer};

/// Body of `POST /api/followups`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateFollowUp {
    pub person_name: Option<String>,
    pub context: Option<String>,
    pub followup_date: Option<String>,
    pub notes: Option<String>,
}

/// Body of `PUT /api/followups/{id}`
///
/// Outer `None` means the key was absent, `Some(None)` means it was `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFollowUp {
    #[serde(default, deserialize_with = "present")]
    pub person_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub context: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub followup_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub status: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

// Only called when the key exists, so wrap whatever was there in Some.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
