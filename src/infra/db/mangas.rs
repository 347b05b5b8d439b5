use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use crate::{
    application::repos::{MangaQueryFilter, MangasRepo, MangasWriteRepo, RepoError},
    domain::{entities::MangaRecord, types::SortField},
};

use super::{PostgresRepositories, util::escape_like};

const MANGA_COLUMNS: &str = r#"id, name, img, "imgHeader", describe, genres, author, country, published, "averageRating", "ratingCount", status, popularity"#;

#[derive(sqlx::FromRow)]
#[sqlx(rename_all = "camelCase")]
struct MangaRow {
    id: i32,
    name: String,
    img: String,
    img_header: String,
    describe: String,
    genres: Vec<String>,
    author: String,
    country: String,
    published: i32,
    average_rating: f64,
    rating_count: i32,
    status: String,
    popularity: i32,
}

impl From<MangaRow> for MangaRecord {
    fn from(row: MangaRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            img: row.img,
            img_header: row.img_header,
            describe: row.describe,
            genres: row.genres,
            author: row.author,
            country: row.country,
            published: row.published,
            average_rating: row.average_rating,
            rating_count: row.rating_count,
            status: row.status,
            popularity: row.popularity,
            chapters: Vec::new(),
        }
    }
}

/// Builds the catalog filter statement. Every caller value is bound; only
/// allow-listed identifiers are written into the SQL text.
pub(super) fn build_filter_query(filter: &MangaQueryFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(r#"SELECT {MANGA_COLUMNS} FROM "Anime""#));
    let mut joiner = " WHERE ";

    if let Some(name) = filter.name.as_ref() {
        qb.push(joiner)
            .push(r#""name" ILIKE "#)
            .push_bind(format!("%{}%", escape_like(name)));
        joiner = " AND ";
    }

    if let Some(status) = filter.status.as_ref() {
        qb.push(joiner).push(r#""status" = "#).push_bind(status.clone());
        joiner = " AND ";
    }

    if let Some(country) = filter.country.as_ref() {
        qb.push(joiner).push(r#""country" = "#).push_bind(country.clone());
        joiner = " AND ";
    }

    if !filter.genres.is_empty() {
        qb.push(joiner)
            .push(r#""genres" @> "#)
            .push_bind(filter.genres.clone());
    }

    match filter.order {
        Some(order) => {
            qb.push(" ORDER BY ")
                .push(order.field.column())
                .push(" ")
                .push(order.direction.as_sql());
            if order.field != SortField::Id {
                qb.push(r#", "id" ASC"#);
            }
        }
        None if filter.window.is_some() => {
            qb.push(r#" ORDER BY "id" ASC"#);
        }
        None => {}
    }

    if let Some(window) = filter.window {
        qb.push(" LIMIT ")
            .push_bind(window.limit())
            .push(" OFFSET ")
            .push_bind(window.offset());
    }

    qb
}

#[async_trait]
impl MangasRepo for PostgresRepositories {
    async fn list_all(&self) -> Result<Vec<MangaRecord>, RepoError> {
        let sql = format!(r#"SELECT {MANGA_COLUMNS} FROM "Anime" ORDER BY "id" ASC"#);
        let rows = self
            .bounded(
                "mangas.list_all",
                sqlx::query_as::<_, MangaRow>(&sql).fetch_all(self.pool()),
            )
            .await?;

        Ok(rows.into_iter().map(MangaRecord::from).collect())
    }

    async fn list_popular(&self, limit: u32) -> Result<Vec<MangaRecord>, RepoError> {
        let sql = format!(
            r#"SELECT {MANGA_COLUMNS} FROM "Anime" ORDER BY "ratingCount" DESC, "id" ASC LIMIT $1"#
        );
        let rows = self
            .bounded(
                "mangas.list_popular",
                sqlx::query_as::<_, MangaRow>(&sql)
                    .bind(i64::from(limit))
                    .fetch_all(self.pool()),
            )
            .await?;

        Ok(rows.into_iter().map(MangaRecord::from).collect())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<MangaRecord>, RepoError> {
        let sql = format!(r#"SELECT {MANGA_COLUMNS} FROM "Anime" WHERE "name" = $1"#);
        let row = self
            .bounded(
                "mangas.find_by_name",
                sqlx::query_as::<_, MangaRow>(&sql)
                    .bind(name)
                    .fetch_optional(self.pool()),
            )
            .await?;

        Ok(row.map(MangaRecord::from))
    }

    async fn filter(&self, filter: &MangaQueryFilter) -> Result<Vec<MangaRecord>, RepoError> {
        let mut qb = build_filter_query(filter);
        let rows = self
            .bounded(
                "mangas.filter",
                qb.build_query_as::<MangaRow>().fetch_all(self.pool()),
            )
            .await?;

        Ok(rows.into_iter().map(MangaRecord::from).collect())
    }

    async fn list_by_names(&self, names: &[String]) -> Result<Vec<MangaRecord>, RepoError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(r#"SELECT {MANGA_COLUMNS} FROM "Anime" WHERE "name" = ANY($1)"#);
        let rows = self
            .bounded(
                "mangas.list_by_names",
                sqlx::query_as::<_, MangaRow>(&sql)
                    .bind(names)
                    .fetch_all(self.pool()),
            )
            .await?;

        Ok(rows.into_iter().map(MangaRecord::from).collect())
    }
}

#[async_trait]
impl MangasWriteRepo for PostgresRepositories {
    async fn increment_popularity(&self, name: &str) -> Result<u64, RepoError> {
        let result = self
            .bounded(
                "mangas.increment_popularity",
                sqlx::query(r#"UPDATE "Anime" SET "popularity" = "popularity" + 1 WHERE "name" = $1"#)
                    .bind(name)
                    .execute(self.pool()),
            )
            .await?;

        Ok(result.rows_affected())
    }
}
