use serde::Serialize;
use serde_json::{Map, Value};

/// Every key of the response object, in serialization order.
#[cfg(test)]
pub const RESUME_FIELDS: [&str; 10] = [
    "name", "email", "phone", "location", "company", "position", "title", "bio", "website",
    "linkedin",
];

/// The structured resume returned to the caller. Every field is optional and
/// always serialized (`null` when absent).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResumeRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub title: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
}

/// Which path produced a record. Logged, never part of the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSource {
    Llm,
    Heuristic,
}

impl ResumeRecord {
    /// Maps a recovered JSON object onto the record. Unknown keys are ignored,
    /// missing keys stay `None`.
    pub fn from_json_map(map: &Map<String, Value>) -> Self {
        let field = |key: &str| map.get(key).and_then(field_value);
        Self {
            name: field("name"),
            email: field("email"),
            phone: field("phone"),
            location: field("location"),
            company: field("company"),
            position: field("position"),
            title: field("title"),
            bio: field("bio"),
            website: field("website"),
            linkedin: field("linkedin"),
        }
    }

    pub fn filled_fields(&self) -> usize {
        [
            &self.name,
            &self.email,
            &self.phone,
            &self.location,
            &self.company,
            &self.position,
            &self.title,
            &self.bio,
            &self.website,
            &self.linkedin,
        ]
        .iter()
        .filter(|f| f.is_some())
        .count()
    }
}

/// Strings are trimmed (blank means absent); numbers and booleans are
/// stringified, since models sometimes emit a phone number unquoted.
fn field_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
