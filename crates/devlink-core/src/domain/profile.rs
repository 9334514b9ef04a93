use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Entity, next_timestamp};
use crate::error::{DomainError, ValidationErrors};

/// Profile entity - one per user, keyed by the owner's user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub status: String,
    pub skills: Vec<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub social: SocialLinks,
    /// Newest first.
    pub experience_ids: Vec<Uuid>,
    /// Newest first.
    pub education_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(user_id: Uuid, status: String, skills: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            company: None,
            website: None,
            location: None,
            status,
            skills,
            bio: None,
            github_username: None,
            social: SocialLinks::default(),
            experience_ids: Vec::new(),
            education_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = next_timestamp(self.updated_at);
    }
}

impl Entity for Profile {
    const COLLECTION: &'static str = "profiles";
    const KIND: &'static str = "profile";

    fn id(&self) -> Uuid {
        self.user_id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

/// Split a comma separated skill list, dropping blanks.
pub fn parse_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|skill| !skill.is_empty())
        .map(String::from)
        .collect()
}

/// Period covered by an experience or education entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
    pub current: bool,
}

impl DateRange {
    /// A current range never keeps an end date.
    pub fn new(from: NaiveDate, to: Option<NaiveDate>, current: bool) -> Self {
        Self {
            from,
            to: if current { None } else { to },
            current,
        }
    }

    pub fn check(&self, errors: &mut ValidationErrors) {
        match self.to {
            None if !self.current => errors.push("to", "to is required unless current"),
            Some(to) if to < self.from => errors.push("to", "to must not precede from"),
            _ => {}
        }
    }
}

/// Experience entry - lives in its own collection, owned by a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub period: DateRange,
    pub description: Option<String>,
}

impl Entity for Experience {
    const COLLECTION: &'static str = "experiences";
    const KIND: &'static str = "experience";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Education entry - lives in its own collection, owned by a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub school: String,
    pub degree: String,
    pub field_of_study: String,
    pub period: DateRange,
    pub description: Option<String>,
}

impl Entity for Education {
    const COLLECTION: &'static str = "educations";
    const KIND: &'static str = "education";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Child entries a profile keeps an ordered id list of.
pub trait ProfileEntry: Entity {
    fn profile_id(&self) -> Uuid;

    fn validate(&self) -> Result<(), DomainError>;

    fn ids(profile: &Profile) -> &[Uuid];

    fn ids_mut(profile: &mut Profile) -> &mut Vec<Uuid>;
}

impl ProfileEntry for Experience {
    fn profile_id(&self) -> Uuid {
        self.profile_id
    }

    fn validate(&self) -> Result<(), DomainError> {
        let mut errors = ValidationErrors::new();
        errors.require("title", &self.title);
        errors.require("company", &self.company);
        self.period.check(&mut errors);
        errors.into_result()
    }

    fn ids(profile: &Profile) -> &[Uuid] {
        &profile.experience_ids
    }

    fn ids_mut(profile: &mut Profile) -> &mut Vec<Uuid> {
        &mut profile.experience_ids
    }
}

impl ProfileEntry for Education {
    fn profile_id(&self) -> Uuid {
        self.profile_id
    }

    fn validate(&self) -> Result<(), DomainError> {
        let mut errors = ValidationErrors::new();
        errors.require("school", &self.school);
        errors.require("degree", &self.degree);
        errors.require("field_of_study", &self.field_of_study);
        self.period.check(&mut errors);
        errors.into_result()
    }

    fn ids(profile: &Profile) -> &[Uuid] {
        &profile.education_ids
    }

    fn ids_mut(profile: &mut Profile) -> &mut Vec<Uuid> {
        &mut profile.education_ids
    }
}
