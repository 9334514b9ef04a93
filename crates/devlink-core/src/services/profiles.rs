use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use super::ignore_missing;
use crate::domain::{
    Caller, DateRange, Education, Entity, Experience, Profile, ProfileEntry, parse_skills,
};
use crate::error::{DomainError, RepoError, ValidationErrors};
use crate::ports::{EntityStore, Stores};

/// A profile with its experience and education entries, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub profile: Profile,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
}

/// Profile fields as submitted. `None` leaves a field as it is; a blank
/// string clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct ProfileInput {
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    /// Comma separated.
    pub skills: Option<String>,
    pub bio: Option<String>,
    pub github_username: Option<String>,
    pub youtube: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

impl ProfileInput {
    fn validate(&self, creating: bool) -> Result<(), DomainError> {
        let mut errors = ValidationErrors::new();
        match &self.status {
            Some(status) => errors.require("status", status),
            None if creating => errors.push("status", "status is required"),
            None => {}
        }
        match &self.skills {
            Some(skills) if parse_skills(skills).is_empty() => {
                errors.push("skills", "skills is required")
            }
            None if creating => errors.push("skills", "skills is required"),
            _ => {}
        }
        errors.into_result()
    }

    fn apply(self, profile: &mut Profile) {
        if let Some(status) = self.status {
            profile.status = status.trim().to_string();
        }
        if let Some(skills) = self.skills {
            profile.skills = parse_skills(&skills);
        }
        set_optional(&mut profile.company, self.company);
        set_optional(&mut profile.website, self.website);
        set_optional(&mut profile.location, self.location);
        set_optional(&mut profile.bio, self.bio);
        set_optional(&mut profile.github_username, self.github_username);
        set_optional(&mut profile.social.youtube, self.youtube);
        set_optional(&mut profile.social.twitter, self.twitter);
        set_optional(&mut profile.social.facebook, self.facebook);
        set_optional(&mut profile.social.linkedin, self.linkedin);
        set_optional(&mut profile.social.instagram, self.instagram);
    }
}

fn set_optional(field: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        let value = value.trim();
        *field = (!value.is_empty()).then(|| value.to_string());
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExperienceInput {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

impl ExperienceInput {
    fn into_entry(self, profile_id: Uuid) -> Result<Experience, DomainError> {
        let Some(from) = self.from else {
            let mut errors = ValidationErrors::new();
            errors.require("title", &self.title);
            errors.require("company", &self.company);
            errors.push("from", "from is required");
            return Err(DomainError::Validation(errors));
        };

        let mut entry = Experience {
            id: Uuid::new_v4(),
            profile_id,
            title: self.title.trim().to_string(),
            company: self.company.trim().to_string(),
            location: None,
            period: DateRange::new(from, self.to, self.current),
            description: None,
        };
        set_optional(&mut entry.location, self.location);
        set_optional(&mut entry.description, self.description);
        entry.validate()?;
        Ok(entry)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExperiencePatch {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

impl ExperiencePatch {
    fn apply(self, entry: &mut Experience) {
        if let Some(title) = self.title {
            entry.title = title.trim().to_string();
        }
        if let Some(company) = self.company {
            entry.company = company.trim().to_string();
        }
        set_optional(&mut entry.location, self.location);
        set_optional(&mut entry.description, self.description);
        entry.period = patch_period(entry.period, self.from, self.to, self.current);
    }
}

#[derive(Debug, Clone, Default)]
pub struct EducationInput {
    pub school: String,
    pub degree: String,
    pub field_of_study: String,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
}

impl EducationInput {
    fn into_entry(self, profile_id: Uuid) -> Result<Education, DomainError> {
        let Some(from) = self.from else {
            let mut errors = ValidationErrors::new();
            errors.require("school", &self.school);
            errors.require("degree", &self.degree);
            errors.require("field_of_study", &self.field_of_study);
            errors.push("from", "from is required");
            return Err(DomainError::Validation(errors));
        };

        let mut entry = Education {
            id: Uuid::new_v4(),
            profile_id,
            school: self.school.trim().to_string(),
            degree: self.degree.trim().to_string(),
            field_of_study: self.field_of_study.trim().to_string(),
            period: DateRange::new(from, self.to, self.current),
            description: None,
        };
        set_optional(&mut entry.description, self.description);
        entry.validate()?;
        Ok(entry)
    }
}

#[derive(Debug, Clone, Default)]
pub struct EducationPatch {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub current: Option<bool>,
    pub description: Option<String>,
}

impl EducationPatch {
    fn apply(self, entry: &mut Education) {
        if let Some(school) = self.school {
            entry.school = school.trim().to_string();
        }
        if let Some(degree) = self.degree {
            entry.degree = degree.trim().to_string();
        }
        if let Some(field_of_study) = self.field_of_study {
            entry.field_of_study = field_of_study.trim().to_string();
        }
        set_optional(&mut entry.description, self.description);
        entry.period = patch_period(entry.period, self.from, self.to, self.current);
    }
}

fn patch_period(
    period: DateRange,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    current: Option<bool>,
) -> DateRange {
    let current = current.unwrap_or(period.current);
    DateRange::new(from.unwrap_or(period.from), to.or(period.to), current)
}

/// Profiles and their experience/education entries.
#[derive(Clone)]
pub struct ProfileService {
    profiles: Arc<dyn EntityStore<Profile>>,
    experiences: Arc<dyn EntityStore<Experience>>,
    educations: Arc<dyn EntityStore<Education>>,
}

impl ProfileService {
    pub fn new(stores: &Stores) -> Self {
        Self {
            profiles: stores.profiles.clone(),
            experiences: stores.experiences.clone(),
            educations: stores.educations.clone(),
        }
    }

    /// Create the caller's profile on first save, patch it afterwards.
    pub async fn save(
        &self,
        caller: &Caller,
        input: ProfileInput,
    ) -> Result<ProfileView, DomainError> {
        let profile = match self.profiles.get(caller.id).await? {
            None => {
                input.validate(true)?;
                let mut profile = Profile::new(caller.id, String::new(), Vec::new());
                input.apply(&mut profile);
                let profile = self.profiles.upsert(profile).await?;
                tracing::debug!(user_id = %caller.id, "Profile created");
                profile
            }
            Some(_) => {
                input.validate(false)?;
                self.profiles
                    .update(
                        caller.id,
                        Box::new(move |profile: &mut Profile| {
                            input.apply(profile);
                            profile.touch();
                            Ok(())
                        }),
                    )
                    .await?
            }
        };
        self.view(profile).await
    }

    pub async fn get_by_user(&self, user_id: Uuid) -> Result<ProfileView, DomainError> {
        let profile = self.find(user_id).await?;
        self.view(profile).await
    }

    pub async fn get_mine(&self, caller: &Caller) -> Result<ProfileView, DomainError> {
        self.get_by_user(caller.id).await
    }

    /// All profiles, oldest first.
    pub async fn list(&self) -> Result<Vec<ProfileView>, DomainError> {
        let mut profiles = self
            .profiles
            .find_where(Box::new(|_: &Profile| true))
            .await?;
        profiles.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.user_id.cmp(&b.user_id)));

        let mut views = Vec::with_capacity(profiles.len());
        for profile in profiles {
            views.push(self.view(profile).await?);
        }
        Ok(views)
    }

    /// Remove the caller's profile and all of its entries.
    pub async fn delete(&self, caller: &Caller) -> Result<(), DomainError> {
        let profile = self.find(caller.id).await?;
        delete_entries(self.experiences.as_ref(), &profile).await?;
        delete_entries(self.educations.as_ref(), &profile).await?;

        match self.profiles.delete(caller.id).await {
            Ok(()) => Ok(()),
            Err(RepoError::NotFound) => Err(DomainError::not_found(Profile::KIND, caller.id)),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn add_experience(
        &self,
        caller: &Caller,
        input: ExperienceInput,
    ) -> Result<ProfileView, DomainError> {
        let entry = input.into_entry(caller.id)?;
        self.add_entry(self.experiences.as_ref(), caller.id, entry)
            .await
    }

    pub async fn update_experience(
        &self,
        caller: &Caller,
        experience_id: Uuid,
        patch: ExperiencePatch,
    ) -> Result<ProfileView, DomainError> {
        self.update_entry(
            self.experiences.as_ref(),
            caller.id,
            experience_id,
            move |entry: &mut Experience| patch.apply(entry),
        )
        .await
    }

    pub async fn remove_experience(
        &self,
        caller: &Caller,
        experience_id: Uuid,
    ) -> Result<ProfileView, DomainError> {
        self.remove_entry(self.experiences.as_ref(), caller.id, experience_id)
            .await
    }

    pub async fn add_education(
        &self,
        caller: &Caller,
        input: EducationInput,
    ) -> Result<ProfileView, DomainError> {
        let entry = input.into_entry(caller.id)?;
        self.add_entry(self.educations.as_ref(), caller.id, entry)
            .await
    }

    pub async fn update_education(
        &self,
        caller: &Caller,
        education_id: Uuid,
        patch: EducationPatch,
    ) -> Result<ProfileView, DomainError> {
        self.update_entry(
            self.educations.as_ref(),
            caller.id,
            education_id,
            move |entry: &mut Education| patch.apply(entry),
        )
        .await
    }

    pub async fn remove_education(
        &self,
        caller: &Caller,
        education_id: Uuid,
    ) -> Result<ProfileView, DomainError> {
        self.remove_entry(self.educations.as_ref(), caller.id, education_id)
            .await
    }

    async fn find(&self, user_id: Uuid) -> Result<Profile, DomainError> {
        self.profiles
            .get(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found(Profile::KIND, user_id))
    }

    async fn view(&self, profile: Profile) -> Result<ProfileView, DomainError> {
        let experience = load_entries(self.experiences.as_ref(), &profile).await?;
        let education = load_entries(self.educations.as_ref(), &profile).await?;
        Ok(ProfileView {
            profile,
            experience,
            education,
        })
    }

    async fn add_entry<E: ProfileEntry>(
        &self,
        store: &dyn EntityStore<E>,
        owner: Uuid,
        entry: E,
    ) -> Result<ProfileView, DomainError> {
        self.find(owner).await?;
        let entry_id = store.upsert(entry).await?.id();

        let attached = self
            .profiles
            .update(
                owner,
                Box::new(move |profile: &mut Profile| {
                    E::ids_mut(profile).insert(0, entry_id);
                    profile.touch();
                    Ok(())
                }),
            )
            .await;

        match attached {
            Ok(profile) => {
                tracing::debug!(user_id = %owner, entry = E::KIND, entry_id = %entry_id, "Profile entry added");
                self.view(profile).await
            }
            Err(e) => {
                if let Err(cleanup) = ignore_missing(store.delete(entry_id).await) {
                    tracing::warn!(entry_id = %entry_id, error = %cleanup, "Orphan profile entry left behind");
                }
                Err(e)
            }
        }
    }

    async fn update_entry<E, F>(
        &self,
        store: &dyn EntityStore<E>,
        owner: Uuid,
        entry_id: Uuid,
        patch: F,
    ) -> Result<ProfileView, DomainError>
    where
        E: ProfileEntry,
        F: FnOnce(&mut E) + Send + 'static,
    {
        store
            .update(
                entry_id,
                Box::new(move |entry: &mut E| {
                    if entry.profile_id() != owner {
                        return Err(DomainError::Forbidden {
                            entity_type: E::KIND,
                        });
                    }
                    patch(entry);
                    entry.validate()
                }),
            )
            .await?;
        self.get_by_user(owner).await
    }

    async fn remove_entry<E: ProfileEntry>(
        &self,
        store: &dyn EntityStore<E>,
        owner: Uuid,
        entry_id: Uuid,
    ) -> Result<ProfileView, DomainError> {
        let entry = store
            .get(entry_id)
            .await?
            .ok_or_else(|| DomainError::not_found(E::KIND, entry_id))?;
        if entry.profile_id() != owner {
            return Err(DomainError::Forbidden {
                entity_type: E::KIND,
            });
        }

        let profile = self
            .profiles
            .update(
                owner,
                Box::new(move |profile: &mut Profile| {
                    let ids = E::ids_mut(profile);
                    let position = ids
                        .iter()
                        .position(|id| *id == entry_id)
                        .ok_or_else(|| DomainError::not_found(E::KIND, entry_id))?;
                    ids.remove(position);
                    profile.touch();
                    Ok(())
                }),
            )
            .await?;
        ignore_missing(store.delete(entry_id).await)?;

        tracing::debug!(user_id = %owner, entry = E::KIND, entry_id = %entry_id, "Profile entry removed");
        self.view(profile).await
    }
}

/// Entries listed on `profile`, in its order.
async fn load_entries<E: ProfileEntry>(
    store: &dyn EntityStore<E>,
    profile: &Profile,
) -> Result<Vec<E>, DomainError> {
    let ids = E::ids(profile);
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let owner = profile.user_id;
    let mut by_id: HashMap<Uuid, E> = store
        .get_many(ids)
        .await?
        .into_iter()
        .filter(|e| e.profile_id() == owner)
        .map(|e| (e.id(), e))
        .collect();
    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
}

async fn delete_entries<E: ProfileEntry>(
    store: &dyn EntityStore<E>,
    profile: &Profile,
) -> Result<(), DomainError> {
    let owner = profile.user_id;
    let mut ids: HashSet<Uuid> = E::ids(profile).iter().copied().collect();
    let stored = store
        .find_where(Box::new(move |e: &E| e.profile_id() == owner))
        .await?;
    ids.extend(stored.iter().map(|e| e.id()));

    for id in ids {
        ignore_missing(store.delete(id).await)?;
    }
    Ok(())
}
