//! Blog listing, search, and the admin-side post manager.
//!
//! Listings are ordered pinned-first, then newest-first. The public list is
//! fetched per request and searched in memory over the fetched rows. The
//! admin manager keeps a process-held snapshot: mutations are written to the
//! store and then applied directly to the snapshot, with a periodic
//! reconciliation re-fetch instead of a full reload per action.

use std::{sync::Arc, time::Duration};

use serde::Deserialize;
use serde_json::{Map, Value, json};
use tokio::sync::RwLock;
use tracing::warn;

use crate::{
    error::AppError,
    models::{BlogPost, NewBlogPost},
    state::AppState,
    store::{Store, StoreError},
    utils::split_keywords,
};

const RECONCILE_INTERVAL: Duration = Duration::from_secs(60);

/// Pinned posts first, then newest first; ties among pinned posts break on
/// creation time.
pub fn sort_pinned(posts: &mut [BlogPost]) {
    posts.sort_by(|a, b| {
        b.pinned
            .cmp(&a.pinned)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

/// Case-insensitive substring search across title, description, content,
/// slug, category, and keywords.
pub fn matches_search(post: &BlogPost, needle: &str) -> bool {
    let needle = needle.to_lowercase();

    let haystacks = [
        Some(&post.title),
        post.description.as_ref(),
        post.content.as_ref(),
        Some(&post.slug),
        post.category.as_ref(),
    ];

    haystacks
        .into_iter()
        .flatten()
        .any(|text| text.to_lowercase().contains(&needle))
        || post
            .keywords
            .iter()
            .any(|k| k.to_lowercase().contains(&needle))
}

pub fn filter_posts(posts: Vec<BlogPost>, search: Option<&str>) -> Vec<BlogPost> {
    match search {
        Some(needle) if !needle.trim().is_empty() => posts
            .into_iter()
            .filter(|p| matches_search(p, needle.trim()))
            .collect(),
        _ => posts,
    }
}

/// Distinct categories with how many posts carry each, in first-seen order.
pub fn category_counts(posts: &[BlogPost]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();

    for post in posts {
        let Some(category) = post.category.as_ref().filter(|c| !c.is_empty()) else {
            continue;
        };

        match counts.iter_mut().find(|(c, _)| c == category) {
            Some((_, n)) => *n += 1,
            None => counts.push((category.clone(), 1)),
        }
    }

    counts
}

/// Inline-editable fields. Keywords arrive as comma-separated text and are
/// normalized to a set, possibly of size one, before the write.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub category: Option<String>,
    pub read_time: Option<String>,
    pub content: Option<String>,
    pub slug: Option<String>,
    pub keywords: Option<String>,
}

impl BlogPatch {
    fn to_store_patch(&self) -> Value {
        let mut fields = Map::new();

        if let Some(title) = &self.title {
            fields.insert("title".to_string(), json!(title));
        }
        if let Some(category) = &self.category {
            fields.insert("category".to_string(), json!(category));
        }
        if let Some(read_time) = &self.read_time {
            fields.insert("read_time".to_string(), json!(read_time));
        }
        if let Some(content) = &self.content {
            fields.insert("content".to_string(), json!(content));
        }
        if let Some(slug) = &self.slug {
            fields.insert("slug".to_string(), json!(slug));
        }
        if let Some(keywords) = &self.keywords {
            fields.insert("keywords".to_string(), json!(split_keywords(keywords)));
        }

        Value::Object(fields)
    }

    fn apply_to(&self, post: &mut BlogPost) {
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(category) = &self.category {
            post.category = Some(category.clone());
        }
        if let Some(read_time) = &self.read_time {
            post.read_time = Some(read_time.clone());
        }
        if let Some(content) = &self.content {
            post.content = Some(content.clone());
        }
        if let Some(slug) = &self.slug {
            post.slug = slug.clone();
        }
        if let Some(keywords) = &self.keywords {
            post.keywords = split_keywords(keywords);
        }
    }
}

pub struct BlogAdmin {
    posts: RwLock<Vec<BlogPost>>,
}

impl BlogAdmin {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(Vec::new()),
        }
    }

    /// Full re-fetch, replacing the snapshot. Used at boot and by the
    /// reconciliation loop.
    pub async fn refresh(&self, store: &Store) -> Result<(), StoreError> {
        let mut posts: Vec<BlogPost> = store
            .table("blogs")
            .order("pinned", true)
            .order("created_at", true)
            .fetch()
            .await?;
        sort_pinned(&mut posts);

        *self.posts.write().await = posts;

        Ok(())
    }

    pub async fn list(&self) -> Vec<BlogPost> {
        self.posts.read().await.clone()
    }

    pub async fn create(&self, store: &Store, new: NewBlogPost) -> Result<BlogPost, AppError> {
        if new.title.trim().is_empty() || new.slug.trim().is_empty() {
            return Err(AppError::validation("Title and Slug are required"));
        }

        let stored: Vec<BlogPost> = store.insert_returning("blogs", &[new]).await?;
        let post = stored
            .into_iter()
            .next()
            .ok_or_else(|| AppError::internal("store returned no representation".to_string()))?;

        let mut posts = self.posts.write().await;
        posts.push(post.clone());
        sort_pinned(&mut posts);

        Ok(post)
    }

    pub async fn apply_patch(
        &self,
        store: &Store,
        id: i64,
        patch: BlogPatch,
    ) -> Result<(), AppError> {
        store
            .update("blogs", &id.to_string(), &patch.to_store_patch())
            .await?;

        let mut posts = self.posts.write().await;
        if let Some(post) = posts.iter_mut().find(|p| p.id == id) {
            patch.apply_to(post);
        }

        Ok(())
    }

    pub async fn remove(&self, store: &Store, id: i64) -> Result<(), AppError> {
        store.delete("blogs", &id.to_string()).await?;

        self.posts.write().await.retain(|p| p.id != id);

        Ok(())
    }

    /// Flip the pinned flag and re-sort the snapshot. Returns the new value.
    pub async fn toggle_pin(&self, store: &Store, id: i64) -> Result<bool, AppError> {
        let pinned = {
            self.posts
                .read()
                .await
                .iter()
                .find(|p| p.id == id)
                .map(|p| p.pinned)
        };
        let Some(pinned) = pinned else {
            return Err(AppError::validation("No such blog post"));
        };

        store
            .update("blogs", &id.to_string(), &json!({ "pinned": !pinned }))
            .await?;

        let mut posts = self.posts.write().await;
        if let Some(post) = posts.iter_mut().find(|p| p.id == id) {
            post.pinned = !pinned;
        }
        sort_pinned(&mut posts);

        Ok(!pinned)
    }
}

impl Default for BlogAdmin {
    fn default() -> Self {
        Self::new()
    }
}

/// Periodic reconciliation of the admin snapshot against the store.
pub fn watch_posts(state: Arc<AppState>) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(RECONCILE_INTERVAL).await;

            if let Err(e) = state.blog_admin.refresh(&state.store).await {
                warn!("Blog reconciliation failed: {e}");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn post(id: i64, title: &str, pinned: bool, minute: u32) -> BlogPost {
        BlogPost {
            id,
            title: title.to_string(),
            slug: title.to_lowercase().replace(' ', "-"),
            category: Some("Hiring".to_string()),
            description: None,
            content: None,
            read_time: None,
            image: None,
            keywords: vec!["workers".to_string()],
            views: 0,
            pinned,
            created_at: Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, minute, 0).unwrap()),
        }
    }

    #[test]
    fn test_sort_pinned_first_then_newest() {
        let mut posts = vec![
            post(1, "Old", false, 0),
            post(2, "New", false, 30),
            post(3, "Pinned Old", true, 10),
            post(4, "Pinned New", true, 20),
        ];

        sort_pinned(&mut posts);

        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_pinned_beats_creation_time() {
        let mut posts = vec![post(1, "Newest", false, 50), post(2, "Pinned", true, 0)];

        sort_pinned(&mut posts);
        assert_eq!(posts[0].id, 2);
    }

    #[test]
    fn test_search_matches_keywords_and_title() {
        let p = post(1, "Hiring Verified Workers", false, 0);

        assert!(matches_search(&p, "VERIFIED"));
        assert!(matches_search(&p, "workers"));
        assert!(!matches_search(&p, "plumbing"));
    }

    #[test]
    fn test_filter_posts_blank_search_is_identity() {
        let posts = vec![post(1, "A", false, 0), post(2, "B", false, 1)];

        assert_eq!(filter_posts(posts.clone(), None).len(), 2);
        assert_eq!(filter_posts(posts, Some("  ")).len(), 2);
    }

    #[test]
    fn test_category_counts() {
        let mut posts = vec![
            post(1, "A", false, 0),
            post(2, "B", false, 1),
            post(3, "C", false, 2),
        ];
        posts[2].category = Some("Safety".to_string());

        let counts = category_counts(&posts);
        assert_eq!(
            counts,
            vec![("Hiring".to_string(), 2), ("Safety".to_string(), 1)]
        );
    }

    #[test]
    fn test_patch_normalizes_keywords() {
        let patch = BlogPatch {
            keywords: Some("hire plumber, daily wage".to_string()),
            ..BlogPatch::default()
        };

        let value = patch.to_store_patch();
        assert_eq!(value["keywords"], json!(["hire plumber", "daily wage"]));

        let single = BlogPatch {
            keywords: Some("worker safety".to_string()),
            ..BlogPatch::default()
        };
        assert_eq!(single.to_store_patch()["keywords"], json!(["worker safety"]));
    }

    #[test]
    fn test_patch_applies_only_present_fields() {
        let mut p = post(1, "Before", false, 0);
        let patch = BlogPatch {
            title: Some("After".to_string()),
            ..BlogPatch::default()
        };

        patch.apply_to(&mut p);

        assert_eq!(p.title, "After");
        assert_eq!(p.category.as_deref(), Some("Hiring"));
        assert_eq!(p.keywords, vec!["workers"]);
    }
}
