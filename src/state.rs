use crate::{
    config::AppConfig,
    db::{DbPool, OrmConn},
    session::SessionStore,
};

/// Shared handles, built once in `main` and injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub sessions: SessionStore,
    pub config: AppConfig,
}
