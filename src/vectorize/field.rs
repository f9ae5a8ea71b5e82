use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::FIELD_COUNT;

/// The semantic profile fields that carry an embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Skills,
    Startup,
    RoleLocation,
    Experience,
    Education,
    Projects,
    Bio,
    LookingFor,
}

impl Field {
    /// All fields, in slot order.
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::Skills,
        Field::Startup,
        Field::RoleLocation,
        Field::Experience,
        Field::Education,
        Field::Projects,
        Field::Bio,
        Field::LookingFor,
    ];

    /// Stable name used in logs and persisted weight maps.
    pub const fn name(self) -> &'static str {
        match self {
            Field::Skills => "skills",
            Field::Startup => "startup",
            Field::RoleLocation => "role_location",
            Field::Experience => "experience",
            Field::Education => "education",
            Field::Projects => "projects",
            Field::Bio => "bio",
            Field::LookingFor => "looking_for",
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown field name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown profile field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// One value per [`Field`], indexed by field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldMap<T>([T; FIELD_COUNT]);

impl<T> FieldMap<T> {
    pub fn from_fn(mut f: impl FnMut(Field) -> T) -> Self {
        Self(std::array::from_fn(|i| f(Field::ALL[i])))
    }

    #[inline]
    pub fn get(&self, field: Field) -> &T {
        &self.0[field.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, field: Field) -> &mut T {
        &mut self.0[field.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &T)> {
        Field::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    pub fn map<U>(self, mut f: impl FnMut(Field, T) -> U) -> FieldMap<U> {
        let mut slot = 0;
        FieldMap(self.0.map(|value| {
            let field = Field::ALL[slot];
            slot += 1;
            f(field, value)
        }))
    }
}

impl<T> Index<Field> for FieldMap<T> {
    type Output = T;

    fn index(&self, field: Field) -> &T {
        self.get(field)
    }
}

impl<T> IndexMut<Field> for FieldMap<T> {
    fn index_mut(&mut self, field: Field) -> &mut T {
        self.get_mut(field)
    }
}
