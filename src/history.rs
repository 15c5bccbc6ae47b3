//! history.rs: bounded in-memory record of finished analyses, per user.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Mutex;

use crate::analyze::anon_hash;
use crate::model::{AnalysisResult, Article};

pub const DEFAULT_HISTORY_CAPACITY: usize = 1_000;
const MAX_HISTORY_CAPACITY: usize = 10_000;

/// Persistence collaborator for finished analyses.
pub trait ResultStore: Send + Sync {
    /// `false` when the result could not be stored; the analysis itself is unaffected.
    fn save(&self, user_id: &str, article: &Article, result: &AnalysisResult) -> bool;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub user_id: String,
    /// Short content hash; the article body itself is not kept.
    pub article_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
    pub result: AnalysisResult,
}

#[derive(Debug)]
pub struct History {
    inner: Mutex<Vec<HistoryEntry>>,
    cap: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl History {
    pub fn with_capacity(cap: usize) -> Self {
        let cap = cap.clamp(1, MAX_HISTORY_CAPACITY);
        Self {
            inner: Mutex::new(Vec::with_capacity(cap.min(64))),
            cap,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The user's latest `n` entries, newest first.
    pub fn recent_for_user(&self, user_id: &str, n: usize) -> Vec<HistoryEntry> {
        let Ok(v) = self.inner.lock() else {
            return Vec::new();
        };
        v.iter()
            .rev()
            .filter(|e| e.user_id == user_id)
            .take(n)
            .cloned()
            .collect()
    }
}

impl ResultStore for History {
    fn save(&self, user_id: &str, article: &Article, result: &AnalysisResult) -> bool {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return false;
        }
        let entry = HistoryEntry {
            user_id: user_id.to_string(),
            article_id: anon_hash(&format!("{}\n{}", article.title, article.content)),
            title: article.title.clone(),
            source: article.source.clone(),
            created_at: Utc::now(),
            result: result.clone(),
        };

        let Ok(mut v) = self.inner.lock() else {
            return false;
        };
        // Re-analysing the same article replaces the older entry.
        v.retain(|e| !(e.user_id == entry.user_id && e.article_id == entry.article_id));
        v.push(entry);
        if v.len() > self.cap {
            let excess = v.len() - self.cap;
            v.drain(0..excess);
        }
        true
    }
}
