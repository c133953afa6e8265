//! Scholarship query — the explicit, typed input of the recommendation engine.
//!
//! Required-attribute validation happens here, at the boundary, so the engine
//! itself never rejects a query.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::errors::AppError;
use crate::models::user::ProfileAttributes;

/// Profile attributes the engine knows how to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Race,
    Gender,
    State,
    University,
    Major,
    Religion,
    Hobbies,
    Gpa,
}

impl ProfileField {
    pub fn default_required() -> &'static [ProfileField] {
        &[ProfileField::University, ProfileField::Race, ProfileField::Gender]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileField::Race => "race",
            ProfileField::Gender => "gender",
            ProfileField::State => "state",
            ProfileField::University => "university",
            ProfileField::Major => "major",
            ProfileField::Religion => "religion",
            ProfileField::Hobbies => "hobbies",
            ProfileField::Gpa => "gpa",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "race" | "ethnicity" => Ok(ProfileField::Race),
            "gender" => Ok(ProfileField::Gender),
            "state" | "location" | "region" => Ok(ProfileField::State),
            "university" | "institution" => Ok(ProfileField::University),
            "major" | "field_of_study" => Ok(ProfileField::Major),
            "religion" => Ok(ProfileField::Religion),
            "hobbies" => Ok(ProfileField::Hobbies),
            "gpa" | "min_gpa" => Ok(ProfileField::Gpa),
            other => Err(format!("unknown profile field '{other}'")),
        }
    }
}

/// Everything the engine may embed in its prompt. Blank strings are stored as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScholarshipQuery {
    pub race: Option<String>,
    pub gender: Option<String>,
    pub state: Option<String>,
    pub university: Option<String>,
    pub major: Option<String>,
    pub religion: Option<String>,
    pub hobbies: Option<String>,
    pub min_gpa: Option<String>,
    /// Free-form `(label, value)` pairs appended to the attribute list.
    pub extra: Vec<(String, String)>,
}

impl ScholarshipQuery {
    /// Builds a query from stored profile attributes, failing with a
    /// validation error on the first required attribute that is missing or blank.
    pub fn from_profile(
        attrs: &ProfileAttributes,
        required: &[ProfileField],
    ) -> Result<Self, AppError> {
        let query = Self {
            race: non_blank(&attrs.race),
            gender: non_blank(&attrs.gender),
            state: non_blank(&attrs.state),
            university: non_blank(&attrs.university),
            major: non_blank(&attrs.major),
            religion: non_blank(&attrs.religion),
            hobbies: non_blank(&attrs.hobbies),
            min_gpa: non_blank(&attrs.gpa),
            extra: Vec::new(),
        };

        if let Some(missing) = required.iter().find(|f| query.get(**f).is_none()) {
            return Err(AppError::Validation(format!(
                "Profile is missing required field '{missing}'. Update your profile first."
            )));
        }

        Ok(query)
    }

    pub fn get(&self, field: ProfileField) -> Option<&str> {
        match field {
            ProfileField::Race => self.race.as_deref(),
            ProfileField::Gender => self.gender.as_deref(),
            ProfileField::State => self.state.as_deref(),
            ProfileField::University => self.university.as_deref(),
            ProfileField::Major => self.major.as_deref(),
            ProfileField::Religion => self.religion.as_deref(),
            ProfileField::Hobbies => self.hobbies.as_deref(),
            ProfileField::Gpa => self.min_gpa.as_deref(),
        }
    }

    /// Human-readable `(label, value)` pairs for every attribute that is set,
    /// in prompt order.
    pub fn attribute_lines(&self) -> Vec<(String, String)> {
        let labelled = [
            ("Race/Ethnicity", &self.race),
            ("Gender", &self.gender),
            ("State of residence", &self.state),
            ("Attending", &self.university),
            ("Field of study", &self.major),
            ("Religion", &self.religion),
            ("Hobbies", &self.hobbies),
            ("GPA", &self.min_gpa),
        ];

        labelled
            .into_iter()
            .filter_map(|(label, value)| value.as_ref().map(|v| (label.to_string(), v.clone())))
            .chain(self.extra.iter().cloned())
            .collect()
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
