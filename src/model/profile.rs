//! Typed view over a free-form profile document.
//!
//! Profiles come from an external store as loosely shaped JSON. [`Profile`]
//! keeps the original document untouched (it is what gets returned to the
//! caller) and extracts the handful of fields the engine reads, tolerating
//! alternate key spellings and malformed values.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::id::UserId;

const ID_KEYS: [&str; 4] = ["id", "_id", "user_id", "userId"];
const NAME_KEYS: [&str; 2] = ["name", "full_name"];
const STARTUP_KEYS: [&str; 2] = ["startupIdea", "startup_idea"];
const BIO_KEYS: [&str; 2] = ["bio", "accomplishments"];
const LOOKING_FOR_KEYS: [&str; 3] = ["looking_for", "what_im_looking_for", "what I'm looking for"];

/// A co-founder profile.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Profile {
    raw: Value,
    id: Option<UserId>,
    name: Option<String>,
    skills: Vec<String>,
    startup_idea: Option<String>,
    role: Option<String>,
    location: Option<Location>,
    experience: Entries<Experience>,
    education: Entries<Education>,
    projects: Entries<Project>,
    bio: Entries<BioEntry>,
    looking_for: Option<String>,
}

impl Profile {
    /// Builds a profile from any JSON value. Non-object values yield an empty
    /// profile that still serializes back to the original value.
    pub fn from_value(raw: Value) -> Self {
        let Some(map) = raw.as_object() else {
            return Self {
                raw,
                ..Self::default()
            };
        };

        let id = ID_KEYS
            .iter()
            .filter_map(|key| map.get(*key))
            .find_map(UserId::from_value);

        Self {
            id,
            name: first_text(map, &NAME_KEYS),
            skills: skill_list(map.get("skills")),
            startup_idea: first_text(map, &STARTUP_KEYS),
            role: first_text(map, &["role"]),
            location: map.get("location").and_then(Location::from_value),
            experience: Entries::from_value(map.get("experience")),
            education: Entries::from_value(map.get("education")),
            projects: Entries::from_value(map.get("projects")),
            bio: Entries::from_value(first_present(map, &BIO_KEYS)),
            looking_for: first_text(map, &LOOKING_FOR_KEYS),
            raw,
        }
    }

    /// The original document, unchanged.
    pub fn as_value(&self) -> &Value {
        &self.raw
    }

    pub fn into_value(self) -> Value {
        self.raw
    }

    /// True unless the document is a JSON object with at least one key.
    pub fn is_empty(&self) -> bool {
        !matches!(&self.raw, Value::Object(map) if !map.is_empty())
    }

    pub fn id(&self) -> Option<&UserId> {
        self.id.as_ref()
    }

    /// Display name (`name`, falling back to `full_name`).
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn startup_idea(&self) -> Option<&str> {
        self.startup_idea.as_deref()
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn experience(&self) -> &Entries<Experience> {
        &self.experience
    }

    pub fn education(&self) -> &Entries<Education> {
        &self.education
    }

    pub fn projects(&self) -> &Entries<Project> {
        &self.projects
    }

    pub fn bio(&self) -> &Entries<BioEntry> {
        &self.bio
    }

    pub fn looking_for(&self) -> Option<&str> {
        self.looking_for.as_deref()
    }
}

impl From<Value> for Profile {
    fn from(raw: Value) -> Self {
        Self::from_value(raw)
    }
}

impl Serialize for Profile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Profile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

/// A location given either as free text or as a `{city, state}` object.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Text(String),
    Place { city: String, state: String },
}

impl Location {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Object(map) if map.contains_key("city") || map.contains_key("state") => {
                Some(Self::Place {
                    city: map.get("city").map(value_text).unwrap_or_default(),
                    state: map.get("state").map(value_text).unwrap_or_default(),
                })
            }
            other => Some(Self::Text(value_text(other))),
        }
    }

    /// Renders the location as `"city, state"` or the free text as given.
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Place { city, state } => format!("{city}, {state}"),
        }
    }
}

/// A list of structured entries, or the stringified value when the list was
/// malformed.
#[derive(Debug, Clone, PartialEq)]
pub enum Entries<T> {
    List(Vec<T>),
    Text(String),
}

impl<T> Default for Entries<T> {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl<T: DeserializeOwned> Entries<T> {
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::default(),
            Some(array @ Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::Object(_) => serde_json::from_value(item.clone()).ok(),
                    _ => None,
                })
                .collect::<Option<Vec<T>>>()
                .map(Self::List)
                .unwrap_or_else(|| Self::Text(value_text(array))),
            Some(other) => Self::Text(value_text(other)),
        }
    }
}

impl<T: EntryText> Entries<T> {
    /// Joins `"{a} {b}"` per entry with single spaces.
    pub fn text(&self) -> String {
        match self {
            Self::List(items) => items
                .iter()
                .map(EntryText::entry_text)
                .collect::<Vec<_>>()
                .join(" "),
            Self::Text(text) => text.clone(),
        }
    }
}

/// Two-part text rendering of one list entry.
pub trait EntryText {
    fn entry_text(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Experience {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
}

impl EntryText for Experience {
    fn entry_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Education {
    #[serde(default, deserialize_with = "lenient_text")]
    pub degree: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub school: String,
}

impl EntryText for Education {
    fn entry_text(&self) -> String {
        format!("{} {}", self.degree, self.school)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
}

impl EntryText for Project {
    fn entry_text(&self) -> String {
        format!("{} {}", self.name, self.description)
    }
}

/// One bio item (an accomplishment or similar highlight).
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct BioEntry {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
}

impl EntryText for BioEntry {
    fn entry_text(&self) -> String {
        format!("{} {}", self.name, self.description)
    }
}

/// Strings as-is, `null` as empty, anything else as its JSON text.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Value::deserialize(deserializer).map(|v| value_text(&v))
}

fn first_present<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !value.is_null())
}

fn first_text(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    first_present(map, keys).map(value_text)
}

fn skill_list(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().map(value_text).collect(),
        Some(other) => vec![value_text(other)],
    }
}
