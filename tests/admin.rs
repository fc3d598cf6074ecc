//! Admin desk flows with a scripted assistant.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use blogfront::error::{AppError, Result};
use blogfront::models::{Config, PostDraft, Translation};
use blogfront::pipeline::{AdminCredentials, AdminDesk, NewPost};
use blogfront::services::PostAssistant;
use blogfront::storage::{KeyValueStore, LocalStore, MemoryStore, PostRepository};
use tempfile::TempDir;

/// Assistant that records calls and fails for selected languages.
#[derive(Default)]
struct Scripted {
    failing: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl Scripted {
    fn failing_on(language: &str) -> Self {
        Self {
            failing: vec![language.to_string()],
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PostAssistant for Scripted {
    async fn generate_draft(&self, topic: &str) -> Result<PostDraft> {
        self.calls.lock().unwrap().push(format!("draft:{topic}"));
        Ok(PostDraft {
            title: format!("All about {topic}"),
            excerpt: "Short excerpt".into(),
            description: None,
            content: "word ".repeat(450),
        })
    }

    async fn translate(&self, text: &Translation, language: &str) -> Result<Translation> {
        self.calls.lock().unwrap().push(language.to_string());
        if self.failing.iter().any(|l| l == language) {
            return Err(AppError::translation(language, "scripted failure"));
        }
        Ok(Translation {
            title: format!("[{language}] {}", text.title),
            excerpt: format!("[{language}] {}", text.excerpt),
            content: format!("[{language}] {}", text.content),
        })
    }
}

/// Memory store whose writes can be switched to fail.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    failing: AtomicBool,
}

impl FlakyStore {
    fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::Io(std::io::Error::other("disk full")));
        }
        self.inner.set(key, value).await
    }
}

async fn open_desk(repo: PostRepository, assistant: Arc<dyn PostAssistant>) -> AdminDesk {
    let config = Config::default();
    let session = AdminCredentials::from_config(&config.admin)
        .login("admin", "admin123")
        .unwrap();
    AdminDesk::open(session, &config, repo, assistant).await.unwrap()
}

#[test]
fn test_login_rejects_wrong_password() {
    let config = Config::default();
    let creds = AdminCredentials::from_config(&config.admin);
    assert!(matches!(
        creds.login("admin", "nope"),
        Err(AppError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_create_and_delete() {
    let repo = PostRepository::new(Arc::new(MemoryStore::new()));
    let mut desk = open_desk(repo.clone(), Arc::new(Scripted::default())).await;

    let first = desk
        .create_post(NewPost {
            title: "First".into(),
            content: "one two three".into(),
            ..NewPost::default()
        })
        .await
        .unwrap();
    let second = desk
        .create_post(NewPost {
            title: "Second".into(),
            author: Some("Ann".into()),
            ..NewPost::default()
        })
        .await
        .unwrap();

    assert_ne!(first.id, second.id);
    assert!(first.id.starts_with("post-"));
    assert_eq!(first.author, "Admin");
    assert_eq!(first.read_time_minutes, 1);
    assert_eq!(desk.posts()[0].id, second.id, "newest first");

    let stored = repo.load_posts().await.unwrap().unwrap();
    assert_eq!(stored.len(), 2);

    desk.delete_post(&first.id).await.unwrap();
    assert!(matches!(
        desk.delete_post(&first.id).await,
        Err(AppError::NotFound(_))
    ));
    assert_eq!(repo.load_posts().await.unwrap().unwrap().len(), 1);

    assert!(desk
        .create_post(NewPost {
            title: "  ".into(),
            ..NewPost::default()
        })
        .await
        .is_err());
}

#[tokio::test]
async fn test_draft_becomes_post() {
    let repo = PostRepository::new(Arc::new(MemoryStore::new()));
    let assistant = Arc::new(Scripted::default());
    let mut desk = open_desk(repo, assistant.clone()).await;

    let post = desk.draft_post("  tokio  ").await.unwrap();
    assert_eq!(post.title, "All about tokio");
    assert_eq!(post.description, "Short excerpt");
    assert_eq!(post.read_time_minutes, 3);
    assert_eq!(assistant.calls(), vec!["draft:tokio".to_string()]);

    assert!(desk.draft_post("   ").await.is_err());
}

#[tokio::test]
async fn test_translate_all_missing_languages() {
    let repo = PostRepository::new(Arc::new(MemoryStore::new()));
    let assistant = Arc::new(Scripted::default());
    let mut desk = open_desk(repo.clone(), assistant.clone()).await;

    let post = desk
        .create_post(NewPost {
            title: "Hello".into(),
            description: "Intro".into(),
            content: "Body".into(),
            ..NewPost::default()
        })
        .await
        .unwrap();

    let report = desk.translate_post(&post.id).await.unwrap();
    assert_eq!(report.added, vec!["fr", "es", "de"]);
    assert!(report.skipped.is_empty());
    assert_eq!(assistant.calls(), vec!["fr", "es", "de"]);

    let stored = repo.load_posts().await.unwrap().unwrap();
    assert_eq!(stored[0].translations["fr"].title, "[fr] Hello");
    assert_eq!(stored[0].translations["de"].excerpt, "[de] Intro");

    // A second run has nothing left to do.
    let report = desk.translate_post(&post.id).await.unwrap();
    assert!(report.added.is_empty());
    assert_eq!(report.skipped, vec!["fr", "es", "de"]);
    assert_eq!(assistant.calls().len(), 3);
}

#[tokio::test]
async fn test_translate_failure_keeps_earlier_languages() {
    let repo = PostRepository::new(Arc::new(MemoryStore::new()));
    let assistant = Arc::new(Scripted::failing_on("es"));
    let mut desk = open_desk(repo.clone(), assistant.clone()).await;

    let post = desk
        .create_post(NewPost {
            title: "Hello".into(),
            ..NewPost::default()
        })
        .await
        .unwrap();

    let err = desk.translate_post(&post.id).await.unwrap_err();
    assert!(matches!(err, AppError::Translation { ref language, .. } if language == "es"));
    assert_eq!(assistant.calls(), vec!["fr", "es"], "stops at the first failure");

    let stored = repo.load_posts().await.unwrap().unwrap();
    let languages: Vec<&String> = stored[0].translations.keys().collect();
    assert_eq!(languages, vec!["fr"]);

    assert!(matches!(
        desk.translate_post("missing").await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_state_survives_reopen() {
    let tmp = TempDir::new().unwrap();
    let repo = || PostRepository::new(Arc::new(LocalStore::new(tmp.path())));

    let mut desk = open_desk(repo(), Arc::new(Scripted::default())).await;
    assert_eq!(desk.language(), "en");
    desk.set_language("fr").await.unwrap();
    assert!(desk.set_language("xx").await.is_err());
    desk.create_post(NewPost {
        title: "Persisted".into(),
        ..NewPost::default()
    })
    .await
    .unwrap();
    drop(desk);

    let desk = open_desk(repo(), Arc::new(Scripted::default())).await;
    assert_eq!(desk.language(), "fr");
    assert_eq!(desk.posts().len(), 1);
    assert_eq!(desk.posts()[0].title, "Persisted");
}

#[tokio::test]
async fn test_update_post() {
    let repo = PostRepository::new(Arc::new(MemoryStore::new()));
    let mut desk = open_desk(repo.clone(), Arc::new(Scripted::default())).await;
    let created = desk
        .create_post(NewPost {
            title: "Draft title".into(),
            ..NewPost::default()
        })
        .await
        .unwrap();

    let mut edited = created.clone();
    edited.title = "Final title".into();
    edited.read_time_minutes = 0;
    desk.update_post(edited).await.unwrap();

    let post = desk.get(&created.id).unwrap();
    assert_eq!(post.title, "Final title");
    assert_eq!(post.read_time_minutes, 1, "read time is clamped to 1");

    let stored = repo.load_posts().await.unwrap().unwrap();
    assert_eq!(stored[0].title, "Final title");
    assert_eq!(stored[0].read_time_minutes, 1);

    let mut unknown = created;
    unknown.id = "missing".into();
    assert!(matches!(
        desk.update_post(unknown).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_failed_save_leaves_desk_unchanged() {
    let store = Arc::new(FlakyStore::default());
    let repo = PostRepository::new(store.clone());
    let mut desk = open_desk(repo.clone(), Arc::new(Scripted::default())).await;
    let kept = desk
        .create_post(NewPost {
            title: "Kept".into(),
            ..NewPost::default()
        })
        .await
        .unwrap();

    store.fail_writes(true);

    let created = desk
        .create_post(NewPost {
            title: "Ghost".into(),
            ..NewPost::default()
        })
        .await;
    assert!(matches!(created, Err(AppError::Io(_))));
    assert_eq!(desk.posts().len(), 1);

    let mut edited = kept.clone();
    edited.title = "Changed".into();
    assert!(desk.update_post(edited).await.is_err());
    assert_eq!(desk.posts()[0].title, "Kept");

    assert!(desk.delete_post(&kept.id).await.is_err());
    assert_eq!(desk.posts().len(), 1);

    assert!(desk.set_language("fr").await.is_err());
    assert_eq!(desk.language(), "en");

    store.fail_writes(false);
    let stored = repo.load_posts().await.unwrap().unwrap();
    assert_eq!(stored, desk.posts());
    assert!(repo.load_language().await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_save_drops_translations() {
    let store = Arc::new(FlakyStore::default());
    let repo = PostRepository::new(store.clone());
    let mut desk = open_desk(repo, Arc::new(Scripted::default())).await;
    let post = desk
        .create_post(NewPost {
            title: "Hello".into(),
            ..NewPost::default()
        })
        .await
        .unwrap();

    store.fail_writes(true);
    assert!(desk.translate_post(&post.id).await.is_err());
    assert!(desk.get(&post.id).unwrap().translations.is_empty());
}
