pub mod config;
pub mod db;
pub mod model;
pub mod web;

pub use db::DbPool;

use config::Config;
use model::CropModel;

pub struct AppState {
    pub config: Config,
    pub db: DbPool,
    /// Read-only after load; safe to share across requests without locking.
    pub model: CropModel,
}

impl AppState {
    pub fn new(config: Config, db: DbPool, model: CropModel) -> Self {
        Self { config, db, model }
    }
}
