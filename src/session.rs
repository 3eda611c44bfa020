use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::{
    domain::cart::Cart,
    error::{AppError, AppResult},
};

pub const SESSION_HEADER: &str = "x-session-token";

/// Per-visitor state: the bound table (set after the QR scan) and the cart.
#[derive(Debug, Default)]
pub struct SessionData {
    pub table: Option<i32>,
    pub cart: Cart,
}

/// In-process session map keyed by an opaque token. The token travels in
/// the `x-session-token` header; how the frontend persists it (cookie,
/// local storage) is not this layer's concern. Access is last-write-wins
/// per session, guarded only by the map lock.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, SessionData>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, table: Option<i32>) -> AppResult<Uuid> {
        let token = Uuid::new_v4();
        let mut sessions = self.write()?;
        sessions.insert(
            token,
            SessionData {
                table,
                cart: Cart::default(),
            },
        );
        Ok(token)
    }

    pub fn bind_table(&self, token: Uuid, table: i32) -> AppResult<()> {
        let mut sessions = self.write()?;
        let session = sessions.get_mut(&token).ok_or(AppError::NotFound)?;
        session.table = Some(table);
        Ok(())
    }

    pub fn table(&self, token: Uuid) -> AppResult<Option<i32>> {
        let sessions = self.read()?;
        let session = sessions.get(&token).ok_or(AppError::NotFound)?;
        Ok(session.table)
    }

    /// Run a closure against the session's cart under the map lock.
    pub fn with_cart<R>(&self, token: Uuid, f: impl FnOnce(&mut Cart) -> R) -> AppResult<R> {
        let mut sessions = self.write()?;
        let session = sessions.get_mut(&token).ok_or(AppError::NotFound)?;
        Ok(f(&mut session.cart))
    }

    /// Clone the cart out for read-only use (views, checkout snapshot).
    pub fn cart(&self, token: Uuid) -> AppResult<Cart> {
        let sessions = self.read()?;
        let session = sessions.get(&token).ok_or(AppError::NotFound)?;
        Ok(session.cart.clone())
    }

    fn read(&self) -> AppResult<std::sync::RwLockReadGuard<'_, HashMap<Uuid, SessionData>>> {
        self.inner
            .read()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("session store lock poisoned")))
    }

    fn write(&self) -> AppResult<std::sync::RwLockWriteGuard<'_, HashMap<Uuid, SessionData>>> {
        self.inner
            .write()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("session store lock poisoned")))
    }
}

/// Extracts the visitor's session token from the `x-session-token` header.
#[derive(Debug, Clone, Copy)]
pub struct SessionToken(pub Uuid);

impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(SESSION_HEADER)
            .ok_or_else(|| AppError::Validation(format!("missing {SESSION_HEADER} header")))?;

        let value = header.to_str().map_err(|_| AppError::InvalidIdentity)?;
        let token = Uuid::parse_str(value).map_err(|_| AppError::InvalidIdentity)?;

        Ok(SessionToken(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn bind_table_on_unknown_session_fails() {
        let store = SessionStore::new();
        let err = store.bind_table(Uuid::new_v4(), 3).unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[test]
    fn cart_mutations_are_visible_on_next_read() {
        let store = SessionStore::new();
        let token = store.create(Some(5)).unwrap();
        let product = Uuid::new_v4();

        let count = store
            .with_cart(token, |cart| {
                cart.add(product, "Refresco", None, 2, Decimal::new(20, 0))
            })
            .unwrap();
        assert_eq!(count, 2);

        let cart = store.cart(token).unwrap();
        assert_eq!(cart.total(), Decimal::new(40, 0));
        assert_eq!(store.table(token).unwrap(), Some(5));
    }
}
