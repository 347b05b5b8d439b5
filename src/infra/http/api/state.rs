use std::sync::Arc;

use crate::application::catalog::CatalogService;
use crate::application::favorites::FavoritesService;
use crate::application::repos::HealthRepo;

#[derive(Clone)]
pub struct HttpState {
    pub catalog: Arc<CatalogService>,
    pub favorites: Arc<FavoritesService>,
    pub health: Arc<dyn HealthRepo>,
}
