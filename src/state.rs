use sea_orm::DatabaseConnection;

use crate::{config::AppConfig, repository::OrderRepository};

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub orders: OrderRepository,
    pub strict_existence: bool,
}

impl AppState {
    pub fn new(orm: DatabaseConnection, config: &AppConfig) -> Self {
        Self {
            orders: OrderRepository::new(orm.clone()),
            orm,
            strict_existence: config.strict_existence,
        }
    }
}
