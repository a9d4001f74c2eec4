use std::time::Duration;

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};

use crate::config::AppConfig;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

pub fn create_pool(config: &AppConfig) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(&config.database_url);
    Pool::builder()
        .max_size(config.db_max_connections)
        .connection_timeout(Duration::from_secs(config.db_connection_timeout_secs))
        .build(manager)
}
