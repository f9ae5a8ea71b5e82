use super::field::{Field, FieldMap};
use crate::model::{Location, Profile};

/// Builds the text embedded for each field. Missing inputs become `""`.
pub fn field_texts(profile: &Profile) -> FieldMap<String> {
    FieldMap::from_fn(|field| field_text(profile, field))
}

pub fn field_text(profile: &Profile, field: Field) -> String {
    match field {
        Field::Skills => profile.skills().join(" "),
        Field::Startup => profile.startup_idea().unwrap_or_default().to_string(),
        Field::RoleLocation => format!(
            "{} {}",
            profile.role().unwrap_or_default(),
            profile.location().map(Location::text).unwrap_or_default()
        ),
        Field::Experience => profile.experience().text(),
        Field::Education => profile.education().text(),
        Field::Projects => profile.projects().text(),
        Field::Bio => profile.bio().text(),
        Field::LookingFor => profile.looking_for().unwrap_or_default().to_string(),
    }
}
