use crate::{
    api::error,
    modules::profile::{
        model::{InsertProfile, UpdateProfileModel},
        repository::ProfileRepository,
        schema::ProfileEntity,
    },
};

#[derive(Clone)]
pub struct ProfileRepositoryPg {
    pool: sqlx::PgPool,
}

impl ProfileRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProfileRepository for ProfileRepositoryPg {
    async fn find_by_id(&self, id: &str) -> Result<Option<ProfileEntity>, error::SystemError> {
        let profile =
            sqlx::query_as::<_, ProfileEntity>("SELECT * FROM profiles WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(profile)
    }

    async fn find_by_ids(
        &self,
        ids: &[String],
    ) -> Result<Vec<ProfileEntity>, error::SystemError> {
        let profiles =
            sqlx::query_as::<_, ProfileEntity>("SELECT * FROM profiles WHERE id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;
        Ok(profiles)
    }

    async fn find_by_friend_code(
        &self,
        code: &str,
    ) -> Result<Option<ProfileEntity>, error::SystemError> {
        let profile = sqlx::query_as::<_, ProfileEntity>(
            "SELECT * FROM profiles WHERE friend_code = upper($1)",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    async fn insert(
        &self,
        profile: &InsertProfile,
    ) -> Result<ProfileEntity, error::SystemError> {
        let created = sqlx::query_as::<_, ProfileEntity>(
            r#"
            INSERT INTO profiles (id, username, display_name, avatar_url, friend_code)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.username)
        .bind(&profile.display_name)
        .bind(&profile.avatar_url)
        .bind(&profile.friend_code)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update(
        &self,
        id: &str,
        update: &UpdateProfileModel,
    ) -> Result<ProfileEntity, error::SystemError> {
        let profile = sqlx::query_as::<_, ProfileEntity>(
            r#"
            UPDATE profiles
            SET
                username     = COALESCE($2, username),
                display_name = COALESCE($3, display_name),
                avatar_url   = COALESCE($4, avatar_url)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.username)
        .bind(&update.display_name)
        .bind(&update.avatar_url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| error::SystemError::not_found("Profile not found"))?;

        Ok(profile)
    }
}
