use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::models::{Post, Profile, ProfileOwner, ProfileView, User};

#[derive(Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    /// Keyed by owning user id
    profiles: HashMap<Uuid, Profile>,
    posts: HashMap<Uuid, Post>,
}

impl Collections {
    fn owner(&self, user: Uuid) -> Option<ProfileOwner> {
        self.users.get(&user).map(|u| ProfileOwner {
            id: u.id,
            name: u.name.clone(),
            avatar: u.avatar.clone(),
        })
    }
}

/// Process-local store used when no database is configured
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut data = self.inner.write().await;
        if data.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("email"));
        }
        data.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = email.to_lowercase();
        let data = self.inner.read().await;
        Ok(data.users.values().find(|u| u.email == email).cloned())
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.users.remove(&id).is_some())
    }

    async fn find_profile(&self, user: Uuid) -> Result<Option<Profile>, StoreError> {
        Ok(self.inner.read().await.profiles.get(&user).cloned())
    }

    async fn find_profile_view(&self, user: Uuid) -> Result<Option<ProfileView>, StoreError> {
        let data = self.inner.read().await;
        Ok(data
            .profiles
            .get(&user)
            .map(|p| ProfileView::new(p.clone(), data.owner(p.user))))
    }

    async fn list_profile_views(&self) -> Result<Vec<ProfileView>, StoreError> {
        let data = self.inner.read().await;
        let mut profiles: Vec<&Profile> = data.profiles.values().collect();
        profiles.sort_by_key(|p| p.created_at);
        Ok(profiles
            .into_iter()
            .map(|p| ProfileView::new(p.clone(), data.owner(p.user)))
            .collect())
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        let mut data = self.inner.write().await;
        if !data.users.contains_key(&profile.user) {
            return Err(StoreError::NotFound(format!("User {} not found", profile.user)));
        }
        data.profiles.insert(profile.user, profile.clone());
        Ok(())
    }

    async fn delete_profile(&self, user: Uuid) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.profiles.remove(&user).is_some())
    }

    async fn insert_post(&self, post: &Post) -> Result<(), StoreError> {
        let mut data = self.inner.write().await;
        if !data.users.contains_key(&post.user) {
            return Err(StoreError::NotFound(format!("User {} not found", post.user)));
        }
        data.posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        Ok(self.inner.read().await.posts.get(&id).cloned())
    }

    async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        let data = self.inner.read().await;
        let mut posts: Vec<Post> = data.posts.values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.posts.remove(&id).is_some())
    }

    async fn delete_posts_by_user(&self, user: Uuid) -> Result<u64, StoreError> {
        let mut data = self.inner.write().await;
        let before = data.posts.len();
        data.posts.retain(|_, post| post.user != user);
        Ok((before - data.posts.len()) as u64)
    }
}
