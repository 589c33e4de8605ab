//! Sessions and the explicit transaction context.
//!
//! A [`Session`] owns one database transaction. DAO calls receive a
//! [`SessionContext`] that is either bound to a caller-managed session or
//! standalone, in which case each mutating call runs in its own session.

use crate::DatabasePoolInterface;
use productsearch_core::{ProductSearchError, ProductSearchResult};
use sqlx::{Any, AnyConnection, AnyPool, Transaction};
use std::sync::Arc;
use tracing::debug;

/// Opens sessions on the shared pool.
#[derive(Clone)]
pub struct SessionFactory {
    pool: Arc<dyn DatabasePoolInterface>,
}

impl SessionFactory {
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }

    /// Opens a session with a fresh transaction.
    ///
    /// # Errors
    ///
    /// Fails when no connection can be acquired within the pool timeout.
    pub async fn open_session(&self) -> ProductSearchResult<Session> {
        Session::begin(self.pool.inner()).await
    }
}

/// A unit of work over one transaction with manual flush control.
///
/// Dropping a session that was neither closed nor discarded rolls its
/// pending writes back.
pub struct Session {
    tx: Option<Transaction<'static, Any>>,
}

impl Session {
    async fn begin(pool: &AnyPool) -> ProductSearchResult<Self> {
        let tx = pool.begin().await?;
        debug!("Session opened");
        Ok(Self { tx: Some(tx) })
    }

    /// Returns the connection of the open transaction.
    ///
    /// # Errors
    ///
    /// Fails once the session has been closed or discarded.
    pub fn connection(&mut self) -> ProductSearchResult<&mut AnyConnection> {
        self.tx
            .as_deref_mut()
            .ok_or_else(|| ProductSearchError::internal("Session has no open transaction"))
    }

    /// Round-trips on the transaction's connection without ending it.
    ///
    /// Statements run as they are issued, so nothing is buffered; this
    /// surfaces a broken connection before the caller commits.
    ///
    /// # Errors
    ///
    /// Fails when the connection no longer answers.
    pub async fn flush(&mut self) -> ProductSearchResult<()> {
        sqlx::query("SELECT 1").execute(self.connection()?).await?;
        debug!("Session flushed");
        Ok(())
    }

    /// Commits pending writes and releases the connection.
    ///
    /// # Errors
    ///
    /// Fails when the commit fails.
    pub async fn close(mut self) -> ProductSearchResult<()> {
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
        }
        debug!("Session closed");
        Ok(())
    }

    /// Rolls pending writes back and releases the connection.
    pub async fn discard(mut self) {
        if let Some(tx) = self.tx.take() {
            if let Err(e) = tx.rollback().await {
                debug!("Rollback failed: {}", e);
            }
        }
        debug!("Session discarded");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.tx.is_some() {
            debug!("Session dropped while open, rolling back");
        }
    }
}

/// The transaction context passed to every DAO call.
#[derive(Default)]
pub struct SessionContext {
    session: Option<Session>,
}

impl SessionContext {
    /// A context without a bound session.
    #[must_use]
    pub fn standalone() -> Self {
        Self::default()
    }

    /// A context bound to an open session.
    #[must_use]
    pub fn bound(session: Session) -> Self {
        Self {
            session: Some(session),
        }
    }

    /// Opens a session and binds it.
    ///
    /// # Errors
    ///
    /// See [`SessionFactory::open_session`].
    pub async fn begin(factory: &SessionFactory) -> ProductSearchResult<Self> {
        Ok(Self::bound(factory.open_session().await?))
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.session.is_some()
    }

    /// Returns the bound session, if any.
    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// Commits the bound session; no-op when standalone.
    ///
    /// # Errors
    ///
    /// Fails when the commit fails.
    pub async fn commit(mut self) -> ProductSearchResult<()> {
        match self.session.take() {
            Some(session) => session.close().await,
            None => Ok(()),
        }
    }

    /// Rolls the bound session back; no-op when standalone.
    pub async fn rollback(mut self) {
        if let Some(session) = self.session.take() {
            session.discard().await;
        }
    }
}
