use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    application::repos::{NewUserParams, RepoError, UsersRepo, UsersWriteRepo},
    domain::entities::UserRecord,
};

use super::PostgresRepositories;

#[derive(sqlx::FromRow)]
#[sqlx(rename_all = "camelCase")]
struct UserRow {
    id: String,
    email: String,
    name: String,
    image: String,
    favorite: Vec<String>,
    created_at: OffsetDateTime,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            image: row.image,
            favorite: row.favorite,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl UsersRepo for PostgresRepositories {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepoError> {
        let row = self
            .bounded(
                "users.find_by_email",
                sqlx::query_as::<_, UserRow>(
                    r#"
                    SELECT id, email, name, image, favorite, "createdAt"
                    FROM "User"
                    WHERE email = $1
                    "#,
                )
                .bind(email)
                .fetch_optional(self.pool()),
            )
            .await?;

        Ok(row.map(UserRecord::from))
    }
}

#[async_trait]
impl UsersWriteRepo for PostgresRepositories {
    async fn insert_user(&self, params: NewUserParams) -> Result<UserRecord, RepoError> {
        let row = self
            .bounded(
                "users.insert_user",
                sqlx::query_as::<_, UserRow>(
                    r#"
                    INSERT INTO "User" (id, email, name, image)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id, email, name, image, favorite, "createdAt"
                    "#,
                )
                .bind(&params.id)
                .bind(&params.email)
                .bind(&params.name)
                .bind(&params.image)
                .fetch_one(self.pool()),
            )
            .await?;

        Ok(row.into())
    }

    async fn add_favorite(&self, email: &str, manga_name: &str) -> Result<(), RepoError> {
        let result = self
            .bounded(
                "users.add_favorite",
                sqlx::query(
                    r#"
                    UPDATE "User"
                    SET favorite = CASE
                        WHEN $2 = ANY(favorite) THEN favorite
                        ELSE array_append(favorite, $2)
                    END
                    WHERE email = $1
                    "#,
                )
                .bind(email)
                .bind(manga_name)
                .execute(self.pool()),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn remove_favorite(&self, email: &str, manga_name: &str) -> Result<(), RepoError> {
        let result = self
            .bounded(
                "users.remove_favorite",
                sqlx::query(r#"UPDATE "User" SET favorite = array_remove(favorite, $2) WHERE email = $1"#)
                    .bind(email)
                    .bind(manga_name)
                    .execute(self.pool()),
            )
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn delete_by_email(&self, email: &str) -> Result<u64, RepoError> {
        let result = self
            .bounded(
                "users.delete_by_email",
                sqlx::query(r#"DELETE FROM "User" WHERE email = $1"#)
                    .bind(email)
                    .execute(self.pool()),
            )
            .await?;

        Ok(result.rows_affected())
    }
}
