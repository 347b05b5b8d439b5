//! Users and their favorite manga.

use std::sync::Arc;

use metrics::counter;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::error::ServiceError;
use crate::application::repos::{
    MangasRepo, MangasWriteRepo, NewUserParams, RepoError, UsersRepo, UsersWriteRepo,
};
use crate::domain::entities::{MangaRecord, UserRecord};
use crate::domain::error::DomainError;
use crate::domain::types::ToggleOutcome;

/// Profile supplied by the identity provider on first sign-in.
#[derive(Debug, Clone)]
pub struct UserDraft {
    /// Provider-assigned identifier; a random one is generated when absent.
    pub id: Option<String>,
    pub email: String,
    pub name: String,
    pub image: String,
}

#[derive(Clone)]
pub struct FavoritesService {
    users: Arc<dyn UsersRepo>,
    users_writer: Arc<dyn UsersWriteRepo>,
    mangas: Arc<dyn MangasRepo>,
    mangas_writer: Arc<dyn MangasWriteRepo>,
}

impl FavoritesService {
    pub fn new(
        users: Arc<dyn UsersRepo>,
        users_writer: Arc<dyn UsersWriteRepo>,
        mangas: Arc<dyn MangasRepo>,
        mangas_writer: Arc<dyn MangasWriteRepo>,
    ) -> Self {
        Self {
            users,
            users_writer,
            mangas,
            mangas_writer,
        }
    }

    pub async fn get_user(&self, email: &str) -> Result<UserRecord, ServiceError> {
        ensure_non_empty(email, "email")?;
        self.require_user(email).await
    }

    /// Returns the stored user, inserting the draft first if none exists.
    ///
    /// Two concurrent first sign-ins race on the unique email; the loser
    /// re-reads the winner's row.
    pub async fn create_user_if_not_exists(
        &self,
        draft: UserDraft,
    ) -> Result<UserRecord, ServiceError> {
        let email = draft.email.trim().to_string();
        ensure_non_empty(&email, "email")?;

        if let Some(existing) = self.find_user(&email).await? {
            return Ok(existing);
        }

        let params = NewUserParams {
            id: draft
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            email: email.clone(),
            name: draft.name,
            image: draft.image,
        };

        match self.users_writer.insert_user(params).await {
            Ok(user) => {
                info!(target = "manka::favorites", email = %user.email, "user created");
                Ok(user)
            }
            Err(RepoError::Duplicate { constraint }) => {
                info!(
                    target = "manka::favorites",
                    email = %email,
                    constraint = %constraint,
                    "user created concurrently, re-reading"
                );
                self.require_user(&email).await
            }
            Err(err) => Err(ServiceError::from_repo("user", err)),
        }
    }

    pub async fn list_favorite_mangas(&self, email: &str) -> Result<Vec<MangaRecord>, ServiceError> {
        ensure_non_empty(email, "email")?;
        let user = self.require_user(email).await?;
        if user.favorite.is_empty() {
            return Ok(Vec::new());
        }

        self.mangas
            .list_by_names(&user.favorite)
            .await
            .map_err(|err| ServiceError::from_repo("manga", err))
    }

    pub async fn is_favorite(&self, email: &str, manga_name: &str) -> Result<bool, ServiceError> {
        ensure_non_empty(email, "email")?;
        let user = self.require_user(email).await?;
        Ok(user.is_favorite(manga_name))
    }

    /// Adds the manga to the user's favorites, or removes it if already present.
    ///
    /// Adding bumps the manga's popularity first; removing never decrements it.
    /// The set is changed element-wise in the store, so concurrent toggles of
    /// different mangas for one user do not overwrite each other. The increment
    /// and the favorites update are not atomic: if the update fails after the
    /// increment, popularity stays raised and the error is returned.
    pub async fn toggle_favorite(
        &self,
        email: &str,
        manga_name: &str,
    ) -> Result<ToggleOutcome, ServiceError> {
        ensure_non_empty(email, "email")?;
        ensure_non_empty(manga_name, "manga name")?;

        let user = self.require_user(email).await?;

        let outcome = if user.is_favorite(manga_name) {
            self.users_writer
                .remove_favorite(email, manga_name)
                .await
                .map_err(|err| ServiceError::from_repo("user", err))?;
            ToggleOutcome::Removed
        } else {
            let affected = self
                .mangas_writer
                .increment_popularity(manga_name)
                .await
                .map_err(|err| ServiceError::from_repo("manga", err))?;
            if affected == 0 {
                warn!(
                    target = "manka::favorites",
                    manga = manga_name,
                    "favoriting a manga that is not in the catalog"
                );
            }

            if let Err(err) = self
                .users_writer
                .add_favorite(email, manga_name)
                .await
                .map_err(|err| ServiceError::from_repo("user", err))
            {
                warn!(
                    target = "manka::favorites",
                    email,
                    manga = manga_name,
                    error = %err,
                    "popularity incremented but favorites update failed"
                );
                return Err(err);
            }
            ToggleOutcome::Added
        };

        counter!("manka_favorite_toggle_total", "outcome" => outcome.as_str()).increment(1);
        info!(
            target = "manka::favorites",
            email,
            manga = manga_name,
            outcome = outcome.as_str(),
            "favorite toggled"
        );
        Ok(outcome)
    }

    /// Removes the user, returning the number of deleted rows.
    pub async fn delete_user(&self, email: &str) -> Result<u64, ServiceError> {
        ensure_non_empty(email, "email")?;
        let deleted = self
            .users_writer
            .delete_by_email(email)
            .await
            .map_err(|err| ServiceError::from_repo("user", err))?;

        if deleted == 0 {
            return Err(ServiceError::NotFound { entity: "user" });
        }
        info!(target = "manka::favorites", email, "user deleted");
        Ok(deleted)
    }

    async fn find_user(&self, email: &str) -> Result<Option<UserRecord>, ServiceError> {
        self.users
            .find_by_email(email)
            .await
            .map_err(|err| ServiceError::from_repo("user", err))
    }

    async fn require_user(&self, email: &str) -> Result<UserRecord, ServiceError> {
        self.find_user(email)
            .await?
            .ok_or(ServiceError::NotFound { entity: "user" })
    }
}

fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Blank { field });
    }
    Ok(())
}
