//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing short links.
///
/// Every mutation is a single atomic store operation; callers never
/// read-modify-write a record, so concurrent requests for the same code
/// cannot lose updates.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a new short link.
    ///
    /// This is the authoritative uniqueness check: the unique index on
    /// `code` (plus the retired-code tombstones) decides, not any earlier
    /// advisory lookup.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code already exists or has been
    /// retired by a hard delete. Returns [`AppError::Internal`] on database
    /// errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code.
    ///
    /// Soft-deleted links are returned too; redirect eligibility is decided
    /// by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Reports whether a code is unavailable for allocation.
    ///
    /// Covers both live links (active or soft-deleted) and codes retired by
    /// a hard delete. Advisory only; see [`LinkRepository::create`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn code_in_use(&self, code: &str) -> Result<bool, AppError>;

    /// Lists all links, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self) -> Result<Vec<Link>, AppError>;

    /// Sets the `is_active` flag on a link.
    ///
    /// Returns the updated link, or `None` if no link owns `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn update_active(&self, code: &str, is_active: bool)
    -> Result<Option<Link>, AppError>;

    /// Atomically adds one click and stamps `last_clicked_at`.
    ///
    /// Implemented as a single conditional update; the prior count is never
    /// read back. A missing code is not an error: the link may have been
    /// deleted after the redirect was served.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn increment_clicks(&self, code: &str) -> Result<(), AppError>;

    /// Hard-deletes a link and retires its code.
    ///
    /// Returns `true` if a record was removed, `false` if the code was
    /// absent. A retired code is never reissued.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, code: &str) -> Result<bool, AppError>;

    /// Read-only connectivity probe with no side effects.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when the store is unreachable.
    async fn ping(&self) -> Result<(), AppError>;
}
