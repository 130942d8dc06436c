use std::sync::Arc;

use trove_service::TroveService;
use trove_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<TroveService>,
}
impl AppState {
	pub async fn new(config: trove_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema(config.storage.postgres.vector_dim).await?;

		let service = TroveService::new(config, db);

		Ok(Self { service: Arc::new(service) })
	}
}
