#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use shortly::application::services::LinkService;
use shortly::domain::click_event::ClickEvent;
use shortly::domain::entities::{Link, NewLink};
use shortly::domain::repositories::LinkRepository;
use shortly::error::AppError;
use shortly::infrastructure::cache::NullCache;
use shortly::state::AppState;
use shortly::utils::code_generator::RandomCodeGenerator;

#[derive(Default)]
struct Store {
    links: Vec<Link>,
    retired: HashSet<String>,
    next_id: i64,
}

/// In-memory [`LinkRepository`] used to drive handlers without a database.
///
/// Mirrors the Postgres repository's contract: unique codes across live
/// links and tombstones, atomic increments, hard delete retiring the code.
/// `set_failing(true)` makes every operation return an internal error, for
/// exercising the 500 paths.
pub struct InMemoryLinkRepository {
    store: Mutex<Store>,
    failing: AtomicBool,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self {
            store: Mutex::new(Store::default()),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn clicks(&self, code: &str) -> Option<i64> {
        self.store
            .lock()
            .unwrap()
            .links
            .iter()
            .find(|l| l.code == code)
            .map(|l| l.clicks)
    }

    pub fn len(&self) -> usize {
        self.store.lock().unwrap().links.len()
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(AppError::internal("Store unavailable", json!({})))
        } else {
            Ok(())
        }
    }
}

impl Default for InMemoryLinkRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        self.check_available()?;
        let mut store = self.store.lock().unwrap();

        let taken = store.retired.contains(&new_link.code)
            || store.links.iter().any(|l| l.code == new_link.code);
        if taken {
            return Err(AppError::conflict(
                "Short code is already in use",
                json!({ "code": new_link.code }),
            ));
        }

        store.next_id += 1;
        let link = Link::new(
            store.next_id,
            new_link.code,
            new_link.url,
            0,
            true,
            Utc::now(),
            None,
        );
        store.links.push(link.clone());

        Ok(link)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        self.check_available()?;
        let store = self.store.lock().unwrap();

        Ok(store.links.iter().find(|l| l.code == code).cloned())
    }

    async fn code_in_use(&self, code: &str) -> Result<bool, AppError> {
        self.check_available()?;
        let store = self.store.lock().unwrap();

        Ok(store.retired.contains(code) || store.links.iter().any(|l| l.code == code))
    }

    async fn list(&self) -> Result<Vec<Link>, AppError> {
        self.check_available()?;
        let store = self.store.lock().unwrap();

        let mut links = store.links.clone();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(links)
    }

    async fn update_active(&self, code: &str, is_active: bool) -> Result<Option<Link>, AppError> {
        self.check_available()?;
        let mut store = self.store.lock().unwrap();

        match store.links.iter_mut().find(|l| l.code == code) {
            Some(link) => {
                link.is_active = is_active;
                Ok(Some(link.clone()))
            }
            None => Ok(None),
        }
    }

    async fn increment_clicks(&self, code: &str) -> Result<(), AppError> {
        self.check_available()?;
        let mut store = self.store.lock().unwrap();

        if let Some(link) = store.links.iter_mut().find(|l| l.code == code) {
            link.clicks += 1;
            link.last_clicked_at = Some(Utc::now());
        }

        Ok(())
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        self.check_available()?;
        let mut store = self.store.lock().unwrap();

        let Some(pos) = store.links.iter().position(|l| l.code == code) else {
            return Ok(false);
        };

        let link = store.links.remove(pos);
        store.retired.insert(link.code);

        Ok(true)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_available()
    }
}

/// Builds an [`AppState`] over the in-memory repository.
///
/// Returns the receiving side of the click channel so tests can either
/// inspect events directly or feed them to a real click worker.
pub fn create_test_state() -> (
    AppState,
    mpsc::Receiver<ClickEvent>,
    Arc<InMemoryLinkRepository>,
) {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let generator = Arc::new(RandomCodeGenerator::default());

    let link_service = Arc::new(LinkService::new(
        repo.clone(),
        generator,
        "https://sho.rt".to_string(),
    ));

    let (tx, rx) = mpsc::channel(100);

    let state = AppState {
        link_service,
        cache: Arc::new(NullCache::new()),
        click_sender: tx,
    };

    (state, rx, repo)
}

pub async fn seed_link(repo: &InMemoryLinkRepository, code: &str, url: &str) {
    repo.create(NewLink {
        code: code.to_string(),
        url: url.to_string(),
    })
    .await
    .unwrap();
}

pub async fn seed_inactive_link(repo: &InMemoryLinkRepository, code: &str, url: &str) {
    seed_link(repo, code, url).await;
    repo.update_active(code, false).await.unwrap();
}
