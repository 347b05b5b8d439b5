//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::application::pagination::PageWindow;
use crate::domain::entities::{ChapterRecord, MangaRecord, UserRecord};
use crate::domain::types::{SortDirection, SortField};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Validated ordering for a filter query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MangaOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Catalog filter with every predicate already normalised.
///
/// `None`/empty members are omitted from the query entirely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MangaQueryFilter {
    pub name: Option<String>,
    pub genres: Vec<String>,
    pub status: Option<String>,
    pub country: Option<String>,
    pub order: Option<MangaOrder>,
    pub window: Option<PageWindow>,
}

impl MangaQueryFilter {
    pub fn has_predicates(&self) -> bool {
        self.name.is_some()
            || self.status.is_some()
            || self.country.is_some()
            || !self.genres.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct NewUserParams {
    pub id: String,
    pub email: String,
    pub name: String,
    pub image: String,
}

#[async_trait]
pub trait MangasRepo: Send + Sync {
    async fn list_all(&self) -> Result<Vec<MangaRecord>, RepoError>;

    async fn list_popular(&self, limit: u32) -> Result<Vec<MangaRecord>, RepoError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<MangaRecord>, RepoError>;

    async fn filter(&self, filter: &MangaQueryFilter) -> Result<Vec<MangaRecord>, RepoError>;

    async fn list_by_names(&self, names: &[String]) -> Result<Vec<MangaRecord>, RepoError>;
}

#[async_trait]
pub trait MangasWriteRepo: Send + Sync {
    /// Atomically adds one to the popularity counter, returning affected rows.
    async fn increment_popularity(&self, name: &str) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait ChaptersRepo: Send + Sync {
    async fn list_for_manga(&self, manga_name: &str) -> Result<Vec<ChapterRecord>, RepoError>;

    async fn find_chapter(
        &self,
        manga_name: &str,
        chapter: i32,
    ) -> Result<Option<ChapterRecord>, RepoError>;
}

#[async_trait]
pub trait UsersRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepoError>;
}

#[async_trait]
pub trait UsersWriteRepo: Send + Sync {
    async fn insert_user(&self, params: NewUserParams) -> Result<UserRecord, RepoError>;

    /// Appends `manga_name` unless already present. `NotFound` when no user matches.
    async fn add_favorite(&self, email: &str, manga_name: &str) -> Result<(), RepoError>;

    /// Removes every occurrence of `manga_name`. `NotFound` when no user matches.
    async fn remove_favorite(&self, email: &str, manga_name: &str) -> Result<(), RepoError>;

    async fn delete_by_email(&self, email: &str) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait HealthRepo: Send + Sync {
    /// Round-trips a trivial statement to prove the store is reachable.
    async fn ping(&self) -> Result<(), RepoError>;
}
