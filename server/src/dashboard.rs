//! Admin dashboard snapshot and aggregation.
//!
//! The dashboard holds full, unpaginated copies of the survey and worker
//! tables and recomputes its aggregates from those copies on demand.
//! Filtering is a server-side re-query that replaces the survey snapshot;
//! change events trigger a full reload of the affected table, re-applying the
//! stored filter for surveys.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::warn;

use crate::{
    models::{SurveyResponse, Worker},
    state::AppState,
    store::{Select, Store, StoreError},
};

pub const DAILY_SENTINEL: &str = "daily";
pub const NEED_TRAINING_SENTINEL: &str = "need-training";

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SurveyStats {
    pub total: usize,
    pub daily: usize,
    pub need_training: usize,
}

pub fn survey_stats(rows: &[SurveyResponse]) -> SurveyStats {
    SurveyStats {
        total: rows.len(),
        daily: rows
            .iter()
            .filter(|r| r.q4.as_deref() == Some(DAILY_SENTINEL))
            .count(),
        need_training: rows
            .iter()
            .filter(|r| r.q10.as_deref() == Some(NEED_TRAINING_SENTINEL))
            .count(),
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: String,
    pub label: String,
    pub count: usize,
}

/// One counter per (worker, skill) pair, keyed by skill identifier and
/// sorted highest count first. Ties break on the identifier so the order is
/// deterministic.
pub fn category_histogram(workers: &[Worker]) -> Vec<CategoryCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for worker in workers {
        for category in &worker.categories {
            *counts.entry(category.as_str()).or_default() += 1;
        }
    }

    let mut histogram: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            label: catalog::label_for(category).to_string(),
            count,
        })
        .collect();

    histogram.sort_by(|a, b| b.count.cmp(&a.count).then(a.category.cmp(&b.category)));

    histogram
}

/// Cardinality of the union of all workers' skill sets.
pub fn unique_categories(workers: &[Worker]) -> usize {
    workers
        .iter()
        .flat_map(|w| w.categories.iter())
        .collect::<HashSet<_>>()
        .len()
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct WorkerStats {
    pub total: usize,
    pub unique_categories: usize,
    pub latest_onboard: Option<String>,
}

pub fn worker_stats(workers: &[Worker]) -> WorkerStats {
    WorkerStats {
        total: workers.len(),
        unique_categories: unique_categories(workers),
        latest_onboard: workers.first().and_then(|w| w.full_name.clone()),
    }
}

#[derive(Serialize)]
pub struct DashboardSummary {
    pub surveys: SurveyStats,
    pub workers: WorkerStats,
    pub categories: Vec<CategoryCount>,
}

/// Substring and date-range bounds applied server-side when re-querying the
/// survey table. The `to` bound is inclusive of its whole day.
#[derive(Debug, Default, Clone)]
pub struct SurveyFilter {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl SurveyFilter {
    pub fn apply<'a>(&self, mut query: Select<'a>) -> Select<'a> {
        if let Some(name) = &self.name {
            query = query.ilike("full_name", name);
        }
        if let Some(phone) = &self.phone {
            query = query.ilike("phone", phone);
        }
        if let Some(from) = &self.from {
            query = query.gte("created_at", &from.format("%Y-%m-%d").to_string());
        }
        if let Some(to) = &self.to {
            query = query.lte("created_at", &format!("{}T23:59:59", to.format("%Y-%m-%d")));
        }

        query
    }
}

pub struct Dashboard {
    surveys: RwLock<Vec<SurveyResponse>>,
    workers: RwLock<Vec<Worker>>,
    filter: RwLock<SurveyFilter>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            surveys: RwLock::new(Vec::new()),
            workers: RwLock::new(Vec::new()),
            filter: RwLock::new(SurveyFilter::default()),
        }
    }

    /// Re-query the survey table with the given filter and replace the
    /// snapshot. The filter is kept so change-triggered reloads re-apply it.
    pub async fn refresh_surveys(
        &self,
        store: &Store,
        filter: SurveyFilter,
    ) -> Result<Vec<SurveyResponse>, StoreError> {
        let query = filter.apply(store.table("surveys").order("created_at", true));
        let rows: Vec<SurveyResponse> = query.fetch().await?;

        *self.filter.write().await = filter;
        *self.surveys.write().await = rows.clone();

        Ok(rows)
    }

    /// Full reload with the currently stored filter, no diffing.
    pub async fn reload_surveys(&self, store: &Store) -> Result<(), StoreError> {
        let filter = self.filter.read().await.clone();
        self.refresh_surveys(store, filter).await?;

        Ok(())
    }

    pub async fn refresh_workers(&self, store: &Store) -> Result<Vec<Worker>, StoreError> {
        let rows: Vec<Worker> = store.table("workers").order("id", true).fetch().await?;

        *self.workers.write().await = rows.clone();

        Ok(rows)
    }

    /// The currently loaded (possibly filtered) survey rows.
    pub async fn surveys(&self) -> Vec<SurveyResponse> {
        self.surveys.read().await.clone()
    }

    pub async fn workers(&self) -> Vec<Worker> {
        self.workers.read().await.clone()
    }

    pub async fn summary(&self) -> DashboardSummary {
        let surveys = self.surveys.read().await;
        let workers = self.workers.read().await;

        DashboardSummary {
            surveys: survey_stats(&surveys),
            workers: worker_stats(&workers),
            categories: category_histogram(&workers),
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscribe to change events and reload the affected table. Runs for the
/// life of the process; missed events while lagging are dropped, the next
/// event triggers a full reload anyway.
pub fn watch_tables(state: Arc<AppState>) {
    let mut rx = state.store.changes();

    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(change) => {
                    let result = match change.table.as_str() {
                        "surveys" => state.dashboard.reload_surveys(&state.store).await,
                        "workers" => state
                            .dashboard
                            .refresh_workers(&state.store)
                            .await
                            .map(|_| ()),
                        _ => Ok(()),
                    };

                    if let Err(e) = result {
                        warn!("Reload after {:?} on {} failed: {e}", change.kind, change.table);
                    }
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn survey(q4: Option<&str>, q10: Option<&str>) -> SurveyResponse {
        SurveyResponse {
            id: 0,
            created_at: None,
            full_name: None,
            phone: None,
            q3: None,
            q4: q4.map(String::from),
            q5: None,
            q6: None,
            q7: None,
            q8: None,
            q9: None,
            q10: q10.map(String::from),
            q11: None,
        }
    }

    fn worker(categories: &[&str]) -> Worker {
        Worker {
            id: "w".to_string(),
            worker_code: "WrkTEST0000".to_string(),
            full_name: Some("Test Worker".to_string()),
            phone: "9876543210".to_string(),
            email: None,
            address: None,
            categories: categories.iter().map(|c| c.to_string()).collect(),
            created_at: None,
        }
    }

    #[test]
    fn test_survey_stats_sentinels() {
        let rows = vec![
            survey(Some("daily"), Some("yes")),
            survey(Some("3-4"), Some("need-training")),
            survey(Some("daily"), Some("need-training")),
            survey(None, None),
        ];

        let stats = survey_stats(&rows);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.daily, 2);
        assert_eq!(stats.need_training, 2);
        assert!(stats.daily <= stats.total);
    }

    #[test]
    fn test_histogram_counts_worker_skill_pairs() {
        let workers = vec![
            worker(&["plumber", "driver"]),
            worker(&["plumber"]),
            worker(&["cook", "driver", "plumber"]),
        ];

        let histogram = category_histogram(&workers);

        let pair_count: usize = histogram.iter().map(|c| c.count).sum();
        assert_eq!(pair_count, 6);

        assert_eq!(histogram[0].category, "plumber");
        assert_eq!(histogram[0].count, 3);
        assert_eq!(histogram[0].label, "Plumber");
    }

    #[test]
    fn test_histogram_tie_breaks_on_identifier() {
        let workers = vec![worker(&["driver"]), worker(&["cook"])];

        let histogram = category_histogram(&workers);
        assert_eq!(histogram[0].category, "cook");
        assert_eq!(histogram[1].category, "driver");
    }

    #[test]
    fn test_unique_categories_is_union_cardinality() {
        let workers = vec![
            worker(&["plumber", "driver"]),
            worker(&["plumber"]),
            worker(&[]),
            worker(&["cook"]),
        ];

        assert_eq!(unique_categories(&workers), 3);
    }

    #[test]
    fn test_unknown_category_label_degrades() {
        let workers = vec![worker(&["blacksmith"])];

        let histogram = category_histogram(&workers);
        assert_eq!(histogram[0].label, "blacksmith");
    }

    #[test]
    fn test_worker_stats_latest_onboard() {
        let workers = vec![worker(&["cook"]), worker(&["driver"])];

        let stats = worker_stats(&workers);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.latest_onboard.as_deref(), Some("Test Worker"));

        assert_eq!(worker_stats(&[]).latest_onboard, None);
    }
}
