use std::sync::Arc;

use crate::application::catalog::CatalogService;
use crate::infra::db::PostgresRepositories;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub db: Arc<PostgresRepositories>,
}
