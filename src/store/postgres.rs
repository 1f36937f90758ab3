use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, types::Json, FromRow, PgPool};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use super::{Store, StoreError};
use crate::config::DatabaseConfig;
use crate::models::{Comment, Education, Experience, Post, Profile, ProfileOwner, ProfileView, Social, User};

const PROFILE_COLUMNS: &str = "p.id, p.user_id, p.company, p.website, p.location, p.bio, p.status, \
     p.githubusername, p.skills, p.social, p.experiences, p.education, p.created_at";

#[derive(Debug, FromRow)]
struct ProfileRow {
    id: Uuid,
    user_id: Uuid,
    company: Option<String>,
    website: Option<String>,
    location: Option<String>,
    bio: Option<String>,
    status: String,
    githubusername: Option<String>,
    skills: Json<Vec<String>>,
    social: Json<Social>,
    experiences: Json<Vec<Experience>>,
    education: Json<Vec<Education>>,
    created_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            user: row.user_id,
            company: row.company,
            website: row.website,
            location: row.location,
            bio: row.bio,
            status: row.status,
            githubusername: row.githubusername,
            skills: row.skills.0,
            social: row.social.0,
            experiences: row.experiences.0,
            education: row.education.0,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ProfileViewRow {
    #[sqlx(flatten)]
    profile: ProfileRow,
    owner_name: Option<String>,
    owner_avatar: Option<String>,
}

impl From<ProfileViewRow> for ProfileView {
    fn from(row: ProfileViewRow) -> Self {
        let owner = match (row.owner_name, row.owner_avatar) {
            (Some(name), Some(avatar)) => Some(ProfileOwner {
                id: row.profile.user_id,
                name,
                avatar,
            }),
            _ => None,
        };
        ProfileView::new(row.profile.into(), owner)
    }
}

#[derive(Debug, FromRow)]
struct PostRow {
    id: Uuid,
    user_id: Uuid,
    text: String,
    name: String,
    avatar: String,
    likes: Json<Vec<Uuid>>,
    comments: Json<Vec<Comment>>,
    created_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            user: row.user_id,
            text: row.text,
            name: row.name,
            avatar: row.avatar,
            likes: row.likes.0,
            comments: row.comments.0,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL-backed store. Profiles keep their nested lists as JSONB documents.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Created database pool (max {} connections)", config.max_connections);
        Ok(Self { pool })
    }

    /// Apply the embedded schema migrations
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

fn unique_violation(err: sqlx::Error, field: &'static str) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate(field),
        _ => StoreError::Sqlx(err),
    }
}

/// Writes that reference a deleted user trip the `user_id` foreign key
fn missing_owner(err: sqlx::Error, owner: Uuid) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            StoreError::NotFound(format!("User {} not found", owner))
        }
        _ => StoreError::Sqlx(err),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO users (id, name, email, password, avatar, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.avatar)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "email"))?;
        Ok(())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, avatar, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, avatar, created_at FROM users WHERE email = $1",
        )
        .bind(email.to_lowercase())
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_profile(&self, user: Uuid) -> Result<Option<Profile>, StoreError> {
        let sql = format!("SELECT {} FROM profiles p WHERE p.user_id = $1", PROFILE_COLUMNS);
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(user)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Profile::from))
    }

    async fn find_profile_view(&self, user: Uuid) -> Result<Option<ProfileView>, StoreError> {
        let sql = format!(
            "SELECT {}, u.name AS owner_name, u.avatar AS owner_avatar
             FROM profiles p LEFT JOIN users u ON u.id = p.user_id
             WHERE p.user_id = $1",
            PROFILE_COLUMNS
        );
        let row = sqlx::query_as::<_, ProfileViewRow>(&sql)
            .bind(user)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(ProfileView::from))
    }

    async fn list_profile_views(&self) -> Result<Vec<ProfileView>, StoreError> {
        let sql = format!(
            "SELECT {}, u.name AS owner_name, u.avatar AS owner_avatar
             FROM profiles p LEFT JOIN users u ON u.id = p.user_id
             ORDER BY p.created_at",
            PROFILE_COLUMNS
        );
        let rows = sqlx::query_as::<_, ProfileViewRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(ProfileView::from).collect())
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (
                id, user_id, company, website, location, bio, status, githubusername,
                skills, social, experiences, education, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (user_id) DO UPDATE SET
                company = EXCLUDED.company,
                website = EXCLUDED.website,
                location = EXCLUDED.location,
                bio = EXCLUDED.bio,
                status = EXCLUDED.status,
                githubusername = EXCLUDED.githubusername,
                skills = EXCLUDED.skills,
                social = EXCLUDED.social,
                experiences = EXCLUDED.experiences,
                education = EXCLUDED.education
            "#,
        )
        .bind(profile.id)
        .bind(profile.user)
        .bind(&profile.company)
        .bind(&profile.website)
        .bind(&profile.location)
        .bind(&profile.bio)
        .bind(&profile.status)
        .bind(&profile.githubusername)
        .bind(Json(&profile.skills))
        .bind(Json(&profile.social))
        .bind(Json(&profile.experiences))
        .bind(Json(&profile.education))
        .bind(profile.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| missing_owner(e, profile.user))?;
        Ok(())
    }

    async fn delete_profile(&self, user: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM profiles WHERE user_id = $1")
            .bind(user)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_post(&self, post: &Post) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO posts (id, user_id, text, name, avatar, likes, comments, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(post.id)
        .bind(post.user)
        .bind(&post.text)
        .bind(&post.name)
        .bind(&post.avatar)
        .bind(Json(&post.likes))
        .bind(Json(&post.comments))
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| missing_owner(e, post.user))?;
        Ok(())
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        let row = sqlx::query_as::<_, PostRow>(
            "SELECT id, user_id, text, name, avatar, likes, comments, created_at
             FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Post::from))
    }

    async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        let rows = sqlx::query_as::<_, PostRow>(
            "SELECT id, user_id, text, name, avatar, likes, comments, created_at
             FROM posts ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_posts_by_user(&self, user: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE user_id = $1")
            .bind(user)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
