#![allow(dead_code)]

use std::cmp::Ordering as CmpOrdering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use http_body_util::BodyExt;
use manka::application::catalog::CatalogService;
use manka::application::favorites::FavoritesService;
use manka::application::repos::{
    ChaptersRepo, HealthRepo, MangaQueryFilter, MangasRepo, MangasWriteRepo, NewUserParams,
    RepoError, UsersRepo, UsersWriteRepo,
};
use manka::cache::MemoryCacheStore;
use manka::domain::entities::{ChapterRecord, MangaRecord, UserRecord};
use manka::domain::types::{SortDirection, SortField};
use manka::infra::http::{HttpState, build_router};
use time::OffsetDateTime;
use time::macros::datetime;
use tower::ServiceExt;

/// Catalog size after seeding; every fifth manga is `completed`, the rest `ongoing`.
pub const SEEDED_MANGAS: i32 = 25;

/// In-memory stand-in for the Postgres repositories.
#[derive(Default)]
pub struct MemoryBackend {
    mangas: Mutex<Vec<MangaRecord>>,
    chapters: Mutex<Vec<ChapterRecord>>,
    users: Mutex<HashMap<String, UserRecord>>,
    pub find_calls: AtomicUsize,
    pub offline: AtomicBool,
}

impl MemoryBackend {
    pub fn seeded() -> Self {
        let backend = Self::default();
        {
            let mut mangas = backend.mangas.lock().unwrap();
            mangas.push(manga(1, "Berserk", &["Action", "Horror"], "Japan", 1200));
            mangas.push(manga(2, "Solo Leveling", &["Action", "Fantasy"], "Korea", 3400));
            mangas.push(manga(3, "Yotsuba&!", &["Comedy"], "Japan", 800));
            for id in 4..=SEEDED_MANGAS {
                let name = format!("Filler {id:02}");
                let mut filler = manga(id, &name, &["Drama"], "Taiwan", 100 - id);
                if id % 5 == 0 {
                    filler.status = "completed".to_string();
                }
                mangas.push(filler);
            }
        }
        backend.chapters.lock().unwrap().push(ChapterRecord {
            chapter: 1,
            img: vec!["b1-1.jpg".into(), "b1-2.jpg".into()],
            name: "The Black Swordsman".into(),
            anime_name: "Berserk".into(),
            created_at: datetime!(2024-03-01 12:00 UTC),
        });
        backend
    }

    pub fn popularity_of(&self, name: &str) -> i32 {
        self.mangas
            .lock()
            .unwrap()
            .iter()
            .find(|manga| manga.name == name)
            .map(|manga| manga.popularity)
            .unwrap_or_default()
    }

    fn check_online(&self) -> Result<(), RepoError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(RepoError::Timeout)
        } else {
            Ok(())
        }
    }
}

pub fn manga(id: i32, name: &str, genres: &[&str], country: &str, rating_count: i32) -> MangaRecord {
    MangaRecord {
        id,
        name: name.to_string(),
        img: format!("{id}.jpg"),
        img_header: format!("{id}-header.jpg"),
        describe: format!("About {name}"),
        genres: genres.iter().map(|genre| genre.to_string()).collect(),
        author: "Someone".to_string(),
        country: country.to_string(),
        published: 2000 + id,
        average_rating: 8.0,
        rating_count,
        status: "ongoing".to_string(),
        popularity: 0,
        chapters: Vec::new(),
    }
}

#[async_trait]
impl MangasRepo for MemoryBackend {
    async fn list_all(&self) -> Result<Vec<MangaRecord>, RepoError> {
        self.check_online()?;
        Ok(self.mangas.lock().unwrap().clone())
    }

    async fn list_popular(&self, limit: u32) -> Result<Vec<MangaRecord>, RepoError> {
        self.check_online()?;
        let mut mangas = self.mangas.lock().unwrap().clone();
        mangas.sort_by(|a, b| b.rating_count.cmp(&a.rating_count).then(a.id.cmp(&b.id)));
        mangas.truncate(limit as usize);
        Ok(mangas)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<MangaRecord>, RepoError> {
        self.check_online()?;
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .mangas
            .lock()
            .unwrap()
            .iter()
            .find(|manga| manga.name == name)
            .cloned())
    }

    async fn filter(&self, filter: &MangaQueryFilter) -> Result<Vec<MangaRecord>, RepoError> {
        self.check_online()?;
        let needle = filter.name.as_ref().map(|name| name.to_lowercase());
        let mut rows: Vec<MangaRecord> = self
            .mangas
            .lock()
            .unwrap()
            .iter()
            .filter(|manga| {
                needle
                    .as_ref()
                    .is_none_or(|needle| manga.name.to_lowercase().contains(needle))
                    && filter.status.as_ref().is_none_or(|s| &manga.status == s)
                    && filter.country.as_ref().is_none_or(|c| &manga.country == c)
                    && manga.has_all_genres(&filter.genres)
            })
            .cloned()
            .collect();

        match filter.order {
            Some(order) => rows.sort_by(|a, b| {
                let ordering = compare_by(order.field, a, b);
                let ordering = match order.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                };
                ordering.then(a.id.cmp(&b.id))
            }),
            None => rows.sort_by_key(|manga| manga.id),
        }

        Ok(match filter.window {
            Some(window) => window.slice(&rows).to_vec(),
            None => rows,
        })
    }

    async fn list_by_names(&self, names: &[String]) -> Result<Vec<MangaRecord>, RepoError> {
        self.check_online()?;
        Ok(self
            .mangas
            .lock()
            .unwrap()
            .iter()
            .filter(|manga| names.contains(&manga.name))
            .cloned()
            .collect())
    }
}

fn compare_by(field: SortField, a: &MangaRecord, b: &MangaRecord) -> CmpOrdering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Name => a.name.cmp(&b.name),
        SortField::Author => a.author.cmp(&b.author),
        SortField::Country => a.country.cmp(&b.country),
        SortField::Status => a.status.cmp(&b.status),
        SortField::Published => a.published.cmp(&b.published),
        SortField::AverageRating => a.average_rating.total_cmp(&b.average_rating),
        SortField::RatingCount => a.rating_count.cmp(&b.rating_count),
        SortField::Popularity => a.popularity.cmp(&b.popularity),
    }
}

#[async_trait]
impl MangasWriteRepo for MemoryBackend {
    async fn increment_popularity(&self, name: &str) -> Result<u64, RepoError> {
        self.check_online()?;
        let mut mangas = self.mangas.lock().unwrap();
        match mangas.iter_mut().find(|manga| manga.name == name) {
            Some(manga) => {
                manga.popularity += 1;
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[async_trait]
impl ChaptersRepo for MemoryBackend {
    async fn list_for_manga(&self, manga_name: &str) -> Result<Vec<ChapterRecord>, RepoError> {
        self.check_online()?;
        Ok(self
            .chapters
            .lock()
            .unwrap()
            .iter()
            .filter(|chapter| chapter.anime_name == manga_name)
            .cloned()
            .collect())
    }

    async fn find_chapter(
        &self,
        manga_name: &str,
        chapter: i32,
    ) -> Result<Option<ChapterRecord>, RepoError> {
        self.check_online()?;
        Ok(self
            .chapters
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.anime_name == manga_name && row.chapter == chapter)
            .cloned())
    }
}

#[async_trait]
impl UsersRepo for MemoryBackend {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepoError> {
        self.check_online()?;
        Ok(self.users.lock().unwrap().get(email).cloned())
    }
}

#[async_trait]
impl UsersWriteRepo for MemoryBackend {
    async fn insert_user(&self, params: NewUserParams) -> Result<UserRecord, RepoError> {
        self.check_online()?;
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&params.email) {
            return Err(RepoError::Duplicate {
                constraint: "User_email_key".into(),
            });
        }
        let user = UserRecord {
            id: params.id,
            email: params.email.clone(),
            name: params.name,
            image: params.image,
            favorite: Vec::new(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(params.email, user.clone());
        Ok(user)
    }

    async fn add_favorite(&self, email: &str, manga_name: &str) -> Result<(), RepoError> {
        self.check_online()?;
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(email).ok_or(RepoError::NotFound)?;
        if !user.is_favorite(manga_name) {
            user.favorite.push(manga_name.to_string());
        }
        Ok(())
    }

    async fn remove_favorite(&self, email: &str, manga_name: &str) -> Result<(), RepoError> {
        self.check_online()?;
        let mut users = self.users.lock().unwrap();
        let user = users.get_mut(email).ok_or(RepoError::NotFound)?;
        user.favorite.retain(|favorite| favorite != manga_name);
        Ok(())
    }

    async fn delete_by_email(&self, email: &str) -> Result<u64, RepoError> {
        self.check_online()?;
        Ok(u64::from(self.users.lock().unwrap().remove(email).is_some()))
    }
}

#[async_trait]
impl HealthRepo for MemoryBackend {
    async fn ping(&self) -> Result<(), RepoError> {
        self.check_online()
    }
}

pub struct TestApp {
    pub router: Router,
    pub backend: Arc<MemoryBackend>,
    pub cache: Arc<MemoryCacheStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let backend = Arc::new(MemoryBackend::seeded());
        let cache = Arc::new(MemoryCacheStore::new());

        let catalog = CatalogService::new(
            backend.clone(),
            backend.clone(),
            cache.clone(),
            Duration::from_secs(60),
        );
        let favorites = FavoritesService::new(
            backend.clone(),
            backend.clone(),
            backend.clone(),
            backend.clone(),
        );
        let state = HttpState {
            catalog: Arc::new(catalog),
            favorites: Arc::new(favorites),
            health: backend.clone(),
        };

        Self {
            router: build_router(state),
            backend,
            cache,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post(&self, uri: &str) -> Response<Body> {
        self.send(Request::post(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> Response<Body> {
        self.send(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn delete(&self, uri: &str) -> Response<Body> {
        self.send(Request::delete(uri).body(Body::empty()).unwrap())
            .await
    }
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read response body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("response body is JSON")
}
