//! In-memory snapshots of the remote tables. Rows live in the hosted
//! datastore; these types only hold what a request or a cached view fetched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::{empty_if_null, keyword_set};

/// One respondent's answers to the eleven-question intake survey.
/// Insert-only; duplicates are possible and accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub id: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub q3: Option<String>,
    #[serde(default)]
    pub q4: Option<String>,
    #[serde(default)]
    pub q5: Option<String>,
    #[serde(default)]
    pub q6: Option<Vec<String>>,
    #[serde(default)]
    pub q7: Option<Vec<String>>,
    #[serde(default)]
    pub q8: Option<String>,
    #[serde(default)]
    pub q9: Option<String>,
    #[serde(default)]
    pub q10: Option<String>,
    #[serde(default)]
    pub q11: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewSurveyResponse {
    pub full_name: String,
    pub phone: String,
    pub q3: Option<String>,
    pub q4: Option<String>,
    pub q5: Option<String>,
    pub q6: Option<Vec<String>>,
    pub q7: Option<Vec<String>>,
    pub q8: Option<String>,
    pub q9: Option<String>,
    pub q10: Option<String>,
    pub q11: Option<String>,
}

/// A registered service provider. Created only by the onboarding flow,
/// never deleted by the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    pub id: String,
    pub worker_code: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "empty_if_null")]
    pub categories: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// The single complete row the onboarding wizard yields once every required
/// field, including the skill set, is present.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewWorker {
    pub worker_code: String,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: String,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub read_time: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "keyword_set")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Create payload and insert row for a blog post. Keywords accept either a
/// set or legacy comma-separated text and normalize to a set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBlogPost {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub read_time: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "keyword_set")]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub pinned: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub id: i64,
    pub rating: i32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewRating {
    pub rating: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewContactMessage {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub message: String,
    pub category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blog_keywords_from_set() {
        let post: BlogPost = serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "t",
            "slug": "t",
            "keywords": ["a", "b"],
        }))
        .unwrap();

        assert_eq!(post.keywords, vec!["a", "b"]);
    }

    #[test]
    fn test_blog_keywords_from_legacy_string() {
        let post: BlogPost = serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "t",
            "slug": "t",
            "keywords": "hire plumber, daily wage",
        }))
        .unwrap();

        assert_eq!(post.keywords, vec!["hire plumber", "daily wage"]);
    }

    #[test]
    fn test_blog_keywords_null_or_missing() {
        let with_null: BlogPost = serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "t",
            "slug": "t",
            "keywords": null,
        }))
        .unwrap();
        let missing: BlogPost = serde_json::from_value(serde_json::json!({
            "id": 2,
            "title": "t",
            "slug": "t",
        }))
        .unwrap();

        assert!(with_null.keywords.is_empty());
        assert!(missing.keywords.is_empty());
    }

    #[test]
    fn test_worker_categories_null() {
        let worker: Worker = serde_json::from_value(serde_json::json!({
            "id": "w1",
            "worker_code": "WrkAAAA1111",
            "phone": "9876543210",
            "categories": null,
        }))
        .unwrap();

        assert!(worker.categories.is_empty());
    }
}
