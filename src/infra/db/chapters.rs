use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    application::repos::{ChaptersRepo, RepoError},
    domain::entities::ChapterRecord,
};

use super::PostgresRepositories;

#[derive(sqlx::FromRow)]
#[sqlx(rename_all = "camelCase")]
struct ChapterRow {
    chapter: i32,
    img: Vec<String>,
    name: String,
    anime_name: String,
    created_at: OffsetDateTime,
}

impl From<ChapterRow> for ChapterRecord {
    fn from(row: ChapterRow) -> Self {
        Self {
            chapter: row.chapter,
            img: row.img,
            name: row.name,
            anime_name: row.anime_name,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl ChaptersRepo for PostgresRepositories {
    async fn list_for_manga(&self, manga_name: &str) -> Result<Vec<ChapterRecord>, RepoError> {
        let rows = self
            .bounded(
                "chapters.list_for_manga",
                sqlx::query_as::<_, ChapterRow>(
                    r#"
                    SELECT chapter, img, name, "animeName", "createdAt"
                    FROM "Chapter"
                    WHERE "animeName" = $1
                    ORDER BY chapter ASC
                    "#,
                )
                .bind(manga_name)
                .fetch_all(self.pool()),
            )
            .await?;

        Ok(rows.into_iter().map(ChapterRecord::from).collect())
    }

    async fn find_chapter(
        &self,
        manga_name: &str,
        chapter: i32,
    ) -> Result<Option<ChapterRecord>, RepoError> {
        let row = self
            .bounded(
                "chapters.find_chapter",
                sqlx::query_as::<_, ChapterRow>(
                    r#"
                    SELECT chapter, img, name, "animeName", "createdAt"
                    FROM "Chapter"
                    WHERE "animeName" = $1 AND chapter = $2
                    "#,
                )
                .bind(manga_name)
                .bind(chapter)
                .fetch_optional(self.pool()),
            )
            .await?;

        Ok(row.map(ChapterRecord::from))
    }
}
