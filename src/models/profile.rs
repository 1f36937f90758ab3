use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Links to a developer's social accounts. Every platform is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Social {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

impl Social {
    /// Overwrite only the links present in `other`
    pub fn merge(&mut self, other: Social) {
        merge_field(&mut self.youtube, other.youtube);
        merge_field(&mut self.twitter, other.twitter);
        merge_field(&mut self.facebook, other.facebook);
        merge_field(&mut self.linkedin, other.linkedin);
        merge_field(&mut self.instagram, other.instagram);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    pub from: NaiveDate,
    #[serde(default)]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub id: Uuid,
    pub school: String,
    pub degree: String,
    pub fieldofstudy: String,
    pub from: NaiveDate,
    #[serde(default)]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial profile change. `None` means "leave as is", never "clear".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: Option<String>,
    pub githubusername: Option<String>,
    pub skills: Option<Vec<String>>,
    pub social: Social,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    /// Owning user; at most one profile per user
    pub user: Uuid,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: String,
    pub githubusername: Option<String>,
    pub skills: Vec<String>,
    pub social: Social,
    /// Newest first
    pub experiences: Vec<Experience>,
    /// Newest first
    pub education: Vec<Education>,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// A blank profile for `user`, to be filled by [`Profile::apply`]
    pub fn new(user: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            company: None,
            website: None,
            location: None,
            bio: None,
            status: String::new(),
            githubusername: None,
            skills: Vec::new(),
            social: Social::default(),
            experiences: Vec::new(),
            education: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Merge `update` field by field
    pub fn apply(&mut self, update: ProfileUpdate) {
        merge_field(&mut self.company, update.company);
        merge_field(&mut self.website, update.website);
        merge_field(&mut self.location, update.location);
        merge_field(&mut self.bio, update.bio);
        merge_field(&mut self.githubusername, update.githubusername);
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(skills) = update.skills {
            self.skills = skills;
        }
        self.social.merge(update.social);
    }

    pub fn add_experience(&mut self, entry: Experience) {
        self.experiences.insert(0, entry);
    }

    /// Remove the experience with `id`. `None` (and an untouched list) when absent.
    pub fn remove_experience(&mut self, id: Uuid) -> Option<Experience> {
        let index = self.experiences.iter().position(|e| e.id == id)?;
        Some(self.experiences.remove(index))
    }

    pub fn add_education(&mut self, entry: Education) {
        self.education.insert(0, entry);
    }

    /// Remove the education entry with `id`. `None` (and an untouched list) when absent.
    pub fn remove_education(&mut self, id: Uuid) -> Option<Education> {
        let index = self.education.iter().position(|e| e.id == id)?;
        Some(self.education.remove(index))
    }
}

/// Public owner details joined into profile reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileOwner {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
}

/// A profile as returned by read endpoints: `user` is the owner's
/// name and avatar rather than a bare id.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub id: Uuid,
    pub user: Option<ProfileOwner>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub status: String,
    pub githubusername: Option<String>,
    pub skills: Vec<String>,
    pub social: Social,
    pub experiences: Vec<Experience>,
    pub education: Vec<Education>,
    pub created_at: DateTime<Utc>,
}

impl ProfileView {
    pub fn new(profile: Profile, owner: Option<ProfileOwner>) -> Self {
        Self {
            id: profile.id,
            user: owner,
            company: profile.company,
            website: profile.website,
            location: profile.location,
            bio: profile.bio,
            status: profile.status,
            githubusername: profile.githubusername,
            skills: profile.skills,
            social: profile.social,
            experiences: profile.experiences,
            education: profile.education,
            created_at: profile.created_at,
        }
    }
}

fn merge_field(target: &mut Option<String>, incoming: Option<String>) {
    if incoming.is_some() {
        *target = incoming;
    }
}
