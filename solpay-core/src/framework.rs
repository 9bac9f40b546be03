use sqlx::PgPool;

/// Runs entity queries against the connection pool.
///
/// Every query object implements `kanau::processor::Processor<Query>` for
/// this type; see [`crate::entities`].
#[derive(Debug, Clone)]
pub struct DatabaseProcessor {
    pub pool: PgPool,
}

impl DatabaseProcessor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
