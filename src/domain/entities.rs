//! Domain entities mirrored from persistent storage.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A catalog entry. `chapters` is only populated by single-manga lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MangaRecord {
    pub id: i32,
    pub name: String,
    pub img: String,
    pub img_header: String,
    pub describe: String,
    pub genres: Vec<String>,
    pub author: String,
    pub country: String,
    pub published: i32,
    pub average_rating: f64,
    pub rating_count: i32,
    pub status: String,
    pub popularity: i32,
    #[serde(default)]
    pub chapters: Vec<ChapterRecord>,
}

impl MangaRecord {
    pub fn has_all_genres<S: AsRef<str>>(&self, wanted: &[S]) -> bool {
        wanted
            .iter()
            .all(|genre| self.genres.iter().any(|owned| owned == genre.as_ref()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterRecord {
    pub chapter: i32,
    pub img: Vec<String>,
    pub name: String,
    pub anime_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub name: String,
    pub image: String,
    pub favorite: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl UserRecord {
    pub fn is_favorite(&self, name: &str) -> bool {
        self.favorite.iter().any(|favorite| favorite == name)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn sample_manga() -> MangaRecord {
        MangaRecord {
            id: 7,
            name: "Berserk".into(),
            img: "berserk.jpg".into(),
            img_header: "berserk-header.jpg".into(),
            describe: "Dark fantasy".into(),
            genres: vec!["Action".into(), "Drama".into(), "Horror".into()],
            author: "Kentaro Miura".into(),
            country: "Japan".into(),
            published: 1989,
            average_rating: 9.4,
            rating_count: 1200,
            status: "ongoing".into(),
            popularity: 31,
            chapters: vec![ChapterRecord {
                chapter: 1,
                img: vec!["p1.jpg".into(), "p2.jpg".into()],
                name: "The Black Swordsman".into(),
                anime_name: "Berserk".into(),
                created_at: datetime!(2024-03-01 12:00 UTC),
            }],
        }
    }

    #[test]
    fn manga_serializes_with_camel_case_fields() {
        let value = serde_json::to_value(sample_manga()).expect("serialize manga");

        assert_eq!(value["imgHeader"], "berserk-header.jpg");
        assert_eq!(value["ratingCount"], 1200);
        assert_eq!(value["averageRating"], 9.4);
        assert_eq!(value["chapters"][0]["animeName"], "Berserk");
        assert_eq!(value["chapters"][0]["createdAt"], "2024-03-01T12:00:00Z");
    }

    #[test]
    fn manga_without_chapters_field_decodes_to_empty_list() {
        let mut value = serde_json::to_value(sample_manga()).expect("serialize manga");
        value
            .as_object_mut()
            .expect("manga object")
            .remove("chapters");

        let decoded: MangaRecord = serde_json::from_value(value).expect("decode manga");
        assert!(decoded.chapters.is_empty());
    }

    #[test]
    fn genre_match_is_conjunctive() {
        let manga = sample_manga();
        assert!(manga.has_all_genres(&["Action", "Drama"]));
        assert!(!manga.has_all_genres(&["Action", "Romance"]));
        assert!(manga.has_all_genres::<&str>(&[]));
    }
}
