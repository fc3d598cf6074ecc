// src/pipeline/admin.rs

//! Admin desk: login, local post management and AI-assisted authoring.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{AdminConfig, Config, Post, PostDraft, Translation};
use crate::services::assistant::PostAssistant;
use crate::storage::PostRepository;
use crate::utils::estimate_read_time;

/// Credentials the login form is checked against.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_config(config: &AdminConfig) -> Self {
        Self::new(config.username.clone(), config.password.clone())
    }

    /// Check a login attempt.
    pub fn login(&self, username: &str, password: &str) -> Result<AdminSession> {
        if username.trim() == self.username && password == self.password {
            log::info!("Admin '{}' logged in", self.username);
            Ok(AdminSession { _private: () })
        } else {
            log::warn!("Rejected admin login for '{}'", username.trim());
            Err(AppError::InvalidCredentials)
        }
    }
}

/// Proof of a successful login, required to open the desk.
#[derive(Debug)]
pub struct AdminSession {
    _private: (),
}

/// Fields supplied when creating a post by hand.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub description: String,
    pub content: String,
    pub author: Option<String>,
    pub image_url: Option<String>,
}

impl From<PostDraft> for NewPost {
    fn from(draft: PostDraft) -> Self {
        let description = draft
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(draft.excerpt);
        Self {
            title: draft.title,
            description,
            content: draft.content,
            author: None,
            image_url: None,
        }
    }
}

/// Languages added by a translation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationReport {
    pub added: Vec<String>,
    /// Languages that already had a translation
    pub skipped: Vec<String>,
}

/// Admin-managed post collection, persisted on every change.
///
/// Every mutation is saved first and only then applied in memory, so a
/// failed save leaves the desk exactly as it was.
pub struct AdminDesk {
    posts: Vec<Post>,
    language: String,
    languages: Vec<String>,
    default_language: String,
    default_author: String,
    repo: PostRepository,
    assistant: Arc<dyn PostAssistant>,
}

impl AdminDesk {
    /// Open the desk, reading persisted state once.
    pub async fn open(
        _session: AdminSession,
        config: &Config,
        repo: PostRepository,
        assistant: Arc<dyn PostAssistant>,
    ) -> Result<Self> {
        let posts = repo.load_posts().await?.unwrap_or_default();
        let language = repo
            .load_language()
            .await?
            .filter(|l| config.locale.supports(l))
            .unwrap_or_else(|| config.locale.default_language.clone());

        log::info!("Admin desk opened with {} posts", posts.len());
        Ok(Self {
            posts,
            language,
            languages: config.locale.languages.clone(),
            default_language: config.locale.default_language.clone(),
            default_author: config.listing.default_author.clone(),
            repo,
            assistant,
        })
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn get(&self, id: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == id)
    }

    /// Select and persist the working language.
    pub async fn set_language(&mut self, language: &str) -> Result<()> {
        if !self.languages.iter().any(|l| l == language) {
            return Err(AppError::validation(format!(
                "unsupported language '{language}'"
            )));
        }
        self.repo.save_language(language).await?;
        self.language = language.to_string();
        Ok(())
    }

    /// Create a post dated today and put it first.
    pub async fn create_post(&mut self, new: NewPost) -> Result<Post> {
        if new.title.trim().is_empty() {
            return Err(AppError::validation("title is required"));
        }
        let post = Post {
            id: self.next_id(),
            author: new
                .author
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| self.default_author.clone()),
            publication_date: Utc::now().format("%Y-%m-%d").to_string(),
            read_time_minutes: estimate_read_time(&new.content),
            title: new.title,
            description: new.description,
            content: new.content,
            image_url: new.image_url.filter(|u| !u.trim().is_empty()),
            translations: BTreeMap::new(),
            localized: BTreeMap::new(),
        };
        let mut posts = Vec::with_capacity(self.posts.len() + 1);
        posts.push(post.clone());
        posts.extend(self.posts.iter().cloned());
        self.commit(posts).await?;
        log::info!("Created post {}", post.id);
        Ok(post)
    }

    /// Replace the post with the same id.
    pub async fn update_post(&mut self, post: Post) -> Result<()> {
        let index = self
            .position(&post.id)
            .ok_or_else(|| AppError::not_found(&post.id))?;
        let mut posts = self.posts.clone();
        posts[index] = Post {
            read_time_minutes: post.read_time_minutes.max(1),
            ..post
        };
        self.commit(posts).await
    }

    pub async fn delete_post(&mut self, id: &str) -> Result<Post> {
        let index = self.position(id).ok_or_else(|| AppError::not_found(id))?;
        let mut posts = self.posts.clone();
        let removed = posts.remove(index);
        self.commit(posts).await?;
        log::info!("Deleted post {}", id);
        Ok(removed)
    }

    /// Ask the assistant for a draft and store it as a new post.
    pub async fn draft_post(&mut self, topic: &str) -> Result<Post> {
        if topic.trim().is_empty() {
            return Err(AppError::validation("topic is required"));
        }
        let draft = self.assistant.generate_draft(topic.trim()).await?;
        self.create_post(NewPost::from(draft)).await
    }

    /// Translate a post into every configured language it still lacks.
    ///
    /// Languages are processed one at a time. The first failure stops the
    /// run; translations merged before it are kept and persisted.
    pub async fn translate_post(&mut self, id: &str) -> Result<TranslationReport> {
        let post = self.get(id).ok_or_else(|| AppError::not_found(id))?;
        let source = Translation {
            title: post.title.clone(),
            excerpt: post.description.clone(),
            content: post.content.clone(),
        };

        let mut report = TranslationReport::default();
        let mut pending = Vec::new();
        for language in &self.languages {
            if *language == self.default_language {
                continue;
            }
            if post.translations.contains_key(language) {
                report.skipped.push(language.clone());
            } else {
                pending.push(language.clone());
            }
        }

        let mut failure = None;
        let mut merged = BTreeMap::new();
        for language in pending {
            match self.assistant.translate(&source, &language).await {
                Ok(translation) => {
                    log::info!("Translated {} into {}", id, language);
                    merged.insert(language.clone(), translation);
                    report.added.push(language);
                }
                Err(e) => {
                    log::warn!("Translation of {} into {} failed: {}", id, language, e);
                    failure = Some(e);
                    break;
                }
            }
        }

        if !merged.is_empty() {
            let mut posts = self.posts.clone();
            if let Some(index) = self.position(id) {
                posts[index].translations.extend(merged);
            }
            self.commit(posts).await?;
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }

    /// Save `posts`, then adopt them as the desk's state.
    async fn commit(&mut self, posts: Vec<Post>) -> Result<()> {
        self.repo.save_posts(&posts).await?;
        self.posts = posts;
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.posts.iter().position(|p| p.id == id)
    }

    fn next_id(&self) -> String {
        let mut stamp = Utc::now().timestamp_millis();
        loop {
            let id = format!("post-{stamp}");
            if self.get(&id).is_none() {
                return id;
            }
            stamp += 1;
        }
    }
}
