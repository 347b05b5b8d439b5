mod catalog;
mod health;
mod users;

pub use catalog::{CACHE_HEADER, filter_mangas, get_chapter, get_manga, list_mangas, list_popular};
pub use health::health;
pub use users::{create_user, delete_user, get_user, is_favorite, list_favorites, toggle_favorite};
