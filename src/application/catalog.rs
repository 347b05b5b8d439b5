//! Read side of the catalog: single-manga lookups through the cache, listings,
//! filtering and chapter retrieval.

use std::{sync::Arc, time::Duration};

use bytes::Bytes;
use metrics::counter;
use tracing::{debug, warn};

use crate::application::error::ServiceError;
use crate::application::pagination::PageWindow;
use crate::application::repos::{ChaptersRepo, MangaOrder, MangaQueryFilter, MangasRepo};
use crate::cache::{CacheLookup, CacheStore, manga_key};
use crate::domain::entities::{ChapterRecord, MangaRecord};
use crate::domain::error::DomainError;
use crate::domain::types::{CacheOutcome, SortDirection, SortField};

/// Number of entries returned by the popularity listing.
pub const POPULAR_LIMIT: u32 = 14;

/// Filter criteria as supplied by a caller, before validation.
#[derive(Debug, Clone, Default)]
pub struct FilterParams {
    pub name: Option<String>,
    pub genres: Vec<String>,
    pub status: Option<String>,
    pub country: Option<String>,
    pub order_field: Option<String>,
    pub order_sort: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl FilterParams {
    /// Normalises the criteria and validates ordering against the allow-list.
    ///
    /// Blank values are dropped. Ordering applies only when both the field and
    /// the direction are present, but either one is rejected if malformed.
    pub fn into_query(self) -> Result<MangaQueryFilter, DomainError> {
        let field = non_blank(self.order_field)
            .map(|value| value.parse::<SortField>())
            .transpose()?;
        let direction = non_blank(self.order_sort)
            .map(|value| value.parse::<SortDirection>())
            .transpose()?;

        let order = match (field, direction) {
            (Some(field), Some(direction)) => Some(MangaOrder { field, direction }),
            _ => None,
        };

        let genres = self
            .genres
            .into_iter()
            .filter_map(|genre| non_blank(Some(genre)))
            .collect();

        Ok(MangaQueryFilter {
            name: non_blank(self.name),
            genres,
            status: non_blank(self.status),
            country: non_blank(self.country),
            order,
            window: PageWindow::from_params(self.page, self.per_page),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

#[derive(Clone)]
pub struct CatalogService {
    mangas: Arc<dyn MangasRepo>,
    chapters: Arc<dyn ChaptersRepo>,
    cache: Arc<dyn CacheStore>,
    entry_ttl: Duration,
}

impl CatalogService {
    pub fn new(
        mangas: Arc<dyn MangasRepo>,
        chapters: Arc<dyn ChaptersRepo>,
        cache: Arc<dyn CacheStore>,
        entry_ttl: Duration,
    ) -> Self {
        Self {
            mangas,
            chapters,
            cache,
            entry_ttl,
        }
    }

    /// Returns one manga with its chapters, serving from the cache when possible.
    ///
    /// Cache failures never fail the lookup; they are logged and the database
    /// answers instead.
    pub async fn get_manga(&self, name: &str) -> Result<(MangaRecord, CacheOutcome), ServiceError> {
        let key = manga_key(name);

        if let Some(manga) = self.read_cached(&key).await {
            counter!("manka_cache_hit_total").increment(1);
            debug!(target = "manka::catalog", manga = name, "cache hit");
            return Ok((manga, CacheOutcome::Hit));
        }

        counter!("manka_cache_miss_total").increment(1);
        debug!(target = "manka::catalog", manga = name, "cache miss");

        let manga = self.load_manga(name).await?;
        self.write_cached(&key, &manga).await;

        Ok((manga, CacheOutcome::Miss))
    }

    pub async fn list_mangas(&self) -> Result<Vec<MangaRecord>, ServiceError> {
        self.mangas
            .list_all()
            .await
            .map_err(|err| ServiceError::from_repo("manga", err))
    }

    pub async fn list_popular(&self) -> Result<Vec<MangaRecord>, ServiceError> {
        self.mangas
            .list_popular(POPULAR_LIMIT)
            .await
            .map_err(|err| ServiceError::from_repo("manga", err))
    }

    pub async fn filter_mangas(
        &self,
        params: FilterParams,
    ) -> Result<Vec<MangaRecord>, ServiceError> {
        let filter = params.into_query()?;
        debug!(
            target = "manka::catalog",
            unfiltered = !filter.has_predicates(),
            ordered = filter.order.is_some(),
            paged = filter.window.is_some(),
            "filtering catalog"
        );
        self.mangas
            .filter(&filter)
            .await
            .map_err(|err| ServiceError::from_repo("manga", err))
    }

    pub async fn get_chapter(
        &self,
        manga_name: &str,
        chapter: i32,
    ) -> Result<ChapterRecord, ServiceError> {
        self.chapters
            .find_chapter(manga_name, chapter)
            .await
            .map_err(|err| ServiceError::from_repo("chapter", err))?
            .ok_or(ServiceError::NotFound { entity: "chapter" })
    }

    async fn load_manga(&self, name: &str) -> Result<MangaRecord, ServiceError> {
        let manga = self
            .mangas
            .find_by_name(name)
            .await
            .map_err(|err| ServiceError::from_repo("manga", err))?
            .ok_or(ServiceError::NotFound { entity: "manga" })?;

        let chapters = self
            .chapters
            .list_for_manga(name)
            .await
            .map_err(|err| ServiceError::from_repo("chapter", err))?;

        Ok(MangaRecord { chapters, ..manga })
    }

    async fn read_cached(&self, key: &str) -> Option<MangaRecord> {
        match self.cache.get(key).await {
            Ok(CacheLookup::Hit(payload)) => match serde_json::from_slice(&payload) {
                Ok(manga) => Some(manga),
                Err(err) => {
                    counter!("manka_cache_error_total").increment(1);
                    warn!(
                        target = "manka::catalog",
                        key,
                        error = %err,
                        "discarding unreadable cache entry"
                    );
                    None
                }
            },
            Ok(CacheLookup::Miss) => None,
            Err(err) => {
                counter!("manka_cache_error_total").increment(1);
                warn!(
                    target = "manka::catalog",
                    key,
                    store = self.cache.name(),
                    error = %err,
                    "cache read failed, using database"
                );
                None
            }
        }
    }

    async fn write_cached(&self, key: &str, manga: &MangaRecord) {
        let payload = match serde_json::to_vec(manga) {
            Ok(payload) => Bytes::from(payload),
            Err(err) => {
                counter!("manka_cache_error_total").increment(1);
                warn!(target = "manka::catalog", key, error = %err, "failed to encode cache entry");
                return;
            }
        };

        if let Err(err) = self.cache.set(key, payload, self.entry_ttl).await {
            counter!("manka_cache_error_total").increment(1);
            warn!(
                target = "manka::catalog",
                key,
                store = self.cache.name(),
                error = %err,
                "cache write failed"
            );
        }
    }
}
