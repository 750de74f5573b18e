//! Link creation, resolution, and administration service.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{DeleteMode, Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, validate_custom_code};
use crate::utils::url_normalizer::{ensure_scheme, normalize_url};

/// Attempts at drawing a fresh random code before giving up.
const MAX_GENERATION_ATTEMPTS: usize = 5;

/// Service for creating, resolving, and administering shortened links.
///
/// Owns URL normalization and code allocation on the write path and
/// redirect-eligibility rules on the read path. All persistence goes through
/// the [`LinkRepository`] trait; candidate codes come from the pluggable
/// [`CodeGenerator`].
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
    codes: Arc<dyn CodeGenerator>,
    base_url: String,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// `base_url` is the public origin short URLs are composed from,
    /// e.g. `https://sho.rt`.
    pub fn new(
        links: Arc<dyn LinkRepository>,
        codes: Arc<dyn CodeGenerator>,
        base_url: String,
    ) -> Self {
        Self {
            links,
            codes,
            base_url,
        }
    }

    /// Creates a short link.
    ///
    /// # Code Allocation
    ///
    /// - With `custom_code`: validates format (3-8 alphanumeric, not
    ///   reserved) and availability. The availability lookup is advisory:
    ///   two concurrent requests can both pass it, and the loser surfaces
    ///   the store's conflict instead.
    /// - Without: draws random codes, retrying up to 5 times on collision
    ///   before failing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an invalid URL or code,
    /// [`AppError::Conflict`] if the code is taken or retired, and
    /// [`AppError::Internal`] when the code space yields no free candidate.
    pub async fn create_short_link(
        &self,
        url: String,
        custom_code: Option<String>,
    ) -> Result<Link, AppError> {
        let normalized_url = normalize_url(&url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        let code = if let Some(custom) = custom_code {
            validate_custom_code(&custom)?;

            if self.links.code_in_use(&custom).await? {
                return Err(AppError::conflict(
                    "This code is already in use",
                    json!({ "code": custom }),
                ));
            }

            custom
        } else {
            self.generate_unique_code().await?
        };

        let new_link = NewLink {
            code,
            url: normalized_url,
        };

        self.links.create(new_link).await
    }

    /// Resolves a short code to its redirect target.
    ///
    /// Returns `Ok(None)` when the code is absent or the link is
    /// soft-deleted: both degrade to the same not-found page, and neither
    /// mutates anything. The returned URL always carries an explicit scheme.
    pub async fn resolve_redirect(&self, code: &str) -> Result<Option<String>, AppError> {
        match self.links.find_by_code(code).await? {
            Some(link) if link.is_active => Ok(Some(ensure_scheme(&link.url))),
            _ => Ok(None),
        }
    }

    /// Retrieves a link by its short code.
    ///
    /// Soft-deleted links are returned too.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link owns the code.
    pub async fn get_link(&self, code: &str) -> Result<Link, AppError> {
        self.links.find_by_code(code).await?.ok_or_else(|| {
            AppError::not_found("Link not found", json!({ "code": code }))
        })
    }

    /// Lists all links, newest first.
    pub async fn list_links(&self) -> Result<Vec<Link>, AppError> {
        self.links.list().await
    }

    /// Sets the visibility flag on a link.
    ///
    /// Only touches `is_active`; clicks and the target URL are unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link owns the code.
    pub async fn set_active(&self, code: &str, is_active: bool) -> Result<Link, AppError> {
        self.links
            .update_active(code, is_active)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "code": code })))
    }

    /// Deletes a link in the requested mode.
    ///
    /// [`DeleteMode::Soft`] deactivates the record (reversible);
    /// [`DeleteMode::Hard`] removes it and retires the code for good.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link owns the code.
    pub async fn delete_link(&self, code: &str, mode: DeleteMode) -> Result<(), AppError> {
        let found = match mode {
            DeleteMode::Soft => self.links.update_active(code, false).await?.is_some(),
            DeleteMode::Hard => self.links.delete(code).await?,
        };

        if found {
            Ok(())
        } else {
            Err(AppError::not_found(
                "Link not found",
                json!({ "code": code }),
            ))
        }
    }

    /// Constructs the full short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), code)
    }

    /// Read-only store liveness probe.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.links.ping().await
    }

    /// Draws random codes until one is free, bounded by
    /// [`MAX_GENERATION_ATTEMPTS`].
    ///
    /// Exhausting every attempt means the code space is badly crowded; the
    /// caller gets an internal error rather than an unbounded loop.
    async fn generate_unique_code(&self) -> Result<String, AppError> {
        for _ in 0..MAX_GENERATION_ATTEMPTS {
            let code = self.codes.next();

            if !self.links.code_in_use(&code).await? {
                return Ok(code);
            }
        }

        Err(AppError::internal(
            "Failed to allocate a short code",
            json!({ "attempts": MAX_GENERATION_ATTEMPTS }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::utils::code_generator::MockCodeGenerator;
    use chrono::Utc;

    fn create_test_link(id: i64, code: &str, url: &str) -> Link {
        Link::new(id, code.to_string(), url.to_string(), 0, true, Utc::now(), None)
    }

    fn service(links: MockLinkRepository, codes: MockCodeGenerator) -> LinkService {
        LinkService::new(
            Arc::new(links),
            Arc::new(codes),
            "https://sho.rt".to_string(),
        )
    }

    #[tokio::test]
    async fn test_create_short_link_with_generated_code() {
        let mut links = MockLinkRepository::new();
        let mut codes = MockCodeGenerator::new();

        codes.expect_next().times(1).returning(|| "r4nd0m".to_string());

        links
            .expect_code_in_use()
            .withf(|code| code == "r4nd0m")
            .times(1)
            .returning(|_| Ok(false));

        let created = create_test_link(10, "r4nd0m", "https://example.com");
        links
            .expect_create()
            .withf(|new_link| new_link.code == "r4nd0m" && new_link.url == "https://example.com")
            .times(1)
            .returning(move |_| Ok(created.clone()));

        let result = service(links, codes)
            .create_short_link("https://example.com".to_string(), None)
            .await;

        assert_eq!(result.unwrap().code, "r4nd0m");
    }

    #[tokio::test]
    async fn test_create_short_link_normalizes_scheme() {
        let mut links = MockLinkRepository::new();
        let mut codes = MockCodeGenerator::new();

        codes.expect_next().times(1).returning(|| "abc123".to_string());
        links.expect_code_in_use().times(1).returning(|_| Ok(false));

        let created = create_test_link(10, "abc123", "https://example.com");
        links
            .expect_create()
            .withf(|new_link| new_link.url == "https://example.com")
            .times(1)
            .returning(move |_| Ok(created.clone()));

        let result = service(links, codes)
            .create_short_link("example.com".to_string(), None)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_short_link_invalid_url() {
        let links = MockLinkRepository::new();
        let codes = MockCodeGenerator::new();

        let result = service(links, codes)
            .create_short_link("not a url".to_string(), None)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_short_link_with_custom_code() {
        let mut links = MockLinkRepository::new();
        let codes = MockCodeGenerator::new();

        links
            .expect_code_in_use()
            .withf(|code| code == "promo1")
            .times(1)
            .returning(|_| Ok(false));

        let created = create_test_link(10, "promo1", "https://example.com");
        links
            .expect_create()
            .withf(|new_link| new_link.code == "promo1")
            .times(1)
            .returning(move |_| Ok(created.clone()));

        let result = service(links, codes)
            .create_short_link("https://example.com".to_string(), Some("promo1".to_string()))
            .await;

        assert_eq!(result.unwrap().code, "promo1");
    }

    #[tokio::test]
    async fn test_create_short_link_custom_code_invalid_format() {
        let links = MockLinkRepository::new();
        let codes = MockCodeGenerator::new();

        let result = service(links, codes)
            .create_short_link("https://example.com".to_string(), Some("ab".to_string()))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_short_link_custom_code_conflict() {
        let mut links = MockLinkRepository::new();
        let codes = MockCodeGenerator::new();

        links
            .expect_code_in_use()
            .withf(|code| code == "taken1")
            .times(1)
            .returning(|_| Ok(true));

        let result = service(links, codes)
            .create_short_link("https://example.com".to_string(), Some("taken1".to_string()))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_generated_code_retries_on_collision() {
        let mut links = MockLinkRepository::new();
        let mut codes = MockCodeGenerator::new();

        let mut draws = vec!["fresh1".to_string(), "dup111".to_string()];
        codes
            .expect_next()
            .times(2)
            .returning(move || draws.pop().unwrap());

        links
            .expect_code_in_use()
            .times(2)
            .returning(|code| Ok(code == "dup111"));

        let created = create_test_link(10, "fresh1", "https://example.com");
        links
            .expect_create()
            .withf(|new_link| new_link.code == "fresh1")
            .times(1)
            .returning(move |_| Ok(created.clone()));

        let result = service(links, codes)
            .create_short_link("https://example.com".to_string(), None)
            .await;

        assert_eq!(result.unwrap().code, "fresh1");
    }

    #[tokio::test]
    async fn test_generated_code_exhausts_after_five_attempts() {
        let mut links = MockLinkRepository::new();
        let mut codes = MockCodeGenerator::new();

        codes.expect_next().times(5).returning(|| "dup111".to_string());
        links.expect_code_in_use().times(5).returning(|_| Ok(true));
        links.expect_create().times(0);

        let result = service(links, codes)
            .create_short_link("https://example.com".to_string(), None)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_resolve_redirect_active_link() {
        let mut links = MockLinkRepository::new();
        let codes = MockCodeGenerator::new();

        let link = create_test_link(1, "abc123", "https://example.com/page");
        links
            .expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));

        let result = service(links, codes).resolve_redirect("abc123").await;

        assert_eq!(result.unwrap(), Some("https://example.com/page".to_string()));
    }

    #[tokio::test]
    async fn test_resolve_redirect_defaults_scheme() {
        let mut links = MockLinkRepository::new();
        let codes = MockCodeGenerator::new();

        let link = create_test_link(1, "abc123", "example.com/page");
        links
            .expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));

        let result = service(links, codes).resolve_redirect("abc123").await;

        assert_eq!(
            result.unwrap(),
            Some("https://example.com/page".to_string())
        );
    }

    #[tokio::test]
    async fn test_resolve_redirect_missing_code() {
        let mut links = MockLinkRepository::new();
        let codes = MockCodeGenerator::new();

        links.expect_find_by_code().times(1).returning(|_| Ok(None));

        let result = service(links, codes).resolve_redirect("ghost1").await;

        assert_eq!(result.unwrap(), None);
    }

    #[tokio::test]
    async fn test_resolve_redirect_inactive_link() {
        let mut links = MockLinkRepository::new();
        let codes = MockCodeGenerator::new();

        let mut link = create_test_link(1, "abc123", "https://example.com");
        link.is_active = false;
        links
            .expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));

        let result = service(links, codes).resolve_redirect("abc123").await;

        assert_eq!(result.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_link_not_found() {
        let mut links = MockLinkRepository::new();
        let codes = MockCodeGenerator::new();

        links.expect_find_by_code().times(1).returning(|_| Ok(None));

        let result = service(links, codes).get_link("ghost1").await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_set_active_not_found() {
        let mut links = MockLinkRepository::new();
        let codes = MockCodeGenerator::new();

        links
            .expect_update_active()
            .times(1)
            .returning(|_, _| Ok(None));

        let result = service(links, codes).set_active("ghost1", false).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_link_soft_uses_update_active() {
        let mut links = MockLinkRepository::new();
        let codes = MockCodeGenerator::new();

        let link = create_test_link(1, "abc123", "https://example.com");
        links
            .expect_update_active()
            .withf(|code, is_active| code == "abc123" && !is_active)
            .times(1)
            .returning(move |_, _| Ok(Some(link.clone())));
        links.expect_delete().times(0);

        let result = service(links, codes)
            .delete_link("abc123", DeleteMode::Soft)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_link_hard_removes_record() {
        let mut links = MockLinkRepository::new();
        let codes = MockCodeGenerator::new();

        links
            .expect_delete()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|_| Ok(true));
        links.expect_update_active().times(0);

        let result = service(links, codes)
            .delete_link("abc123", DeleteMode::Hard)
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_delete_link_hard_not_found() {
        let mut links = MockLinkRepository::new();
        let codes = MockCodeGenerator::new();

        links.expect_delete().times(1).returning(|_| Ok(false));

        let result = service(links, codes)
            .delete_link("ghost1", DeleteMode::Hard)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[test]
    fn test_short_url_composition() {
        let service = LinkService::new(
            Arc::new(MockLinkRepository::new()),
            Arc::new(MockCodeGenerator::new()),
            "https://sho.rt/".to_string(),
        );

        assert_eq!(service.short_url("abc123"), "https://sho.rt/abc123");
    }
}
