use crate::{config::Config, db::Database, storage::FileStorage};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Config,
    pub storage: FileStorage,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        let storage = FileStorage::new(&config.storage.root);
        Self { db, config, storage }
    }
}
