// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Metrics payload returned by the backend.
//!
//! Every number here is computed server-side. The helpers in this module only
//! pick values out of the payload for display.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentiment label for positive comments.
pub const POSITIVE: &str = "positive";
/// Sentiment label for neutral comments.
pub const NEUTRAL: &str = "neutral";
/// Sentiment label for negative comments.
pub const NEGATIVE: &str = "negative";
/// Label for comments the backend has not classified yet.
pub const NOT_ANALYZED: &str = "not_analyzed";

/// Category keys in the order the dashboard renders them.
pub const CATEGORY_ORDER: [&str; 3] = ["calidad_didactica", "empatia", "metodo_evaluacion"];

/// Count of comments for one sentiment label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCount {
    /// The sentiment label (`positive`, `neutral`, `negative`).
    pub sentiment: String,
    /// Number of comments with this label.
    pub count: u64,
}

/// Sentiment breakdown of a single evaluation category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryDistribution {
    /// Positive comments.
    pub positive: u64,
    /// Neutral comments.
    pub neutral: u64,
    /// Negative comments.
    pub negative: u64,
    /// Comments not yet analyzed.
    #[serde(default)]
    pub not_analyzed: u64,
    /// All comments in the category, as reported by the backend.
    #[serde(default)]
    pub total: u64,
}

impl CategoryDistribution {
    /// Number of comments that carry a sentiment.
    #[must_use]
    pub const fn analyzed_total(&self) -> u64 {
        self.positive + self.neutral + self.negative
    }

    /// Percentage of analyzed comments carrying `label`.
    ///
    /// Returns `None` for an unknown label or when nothing has been analyzed.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn share(&self, label: &str) -> Option<f64> {
        let analyzed: u64 = self.analyzed_total();
        if analyzed == 0 {
            return None;
        }
        let count: u64 = match label {
            POSITIVE => self.positive,
            NEUTRAL => self.neutral,
            NEGATIVE => self.negative,
            _ => return None,
        };
        Some(count as f64 * 100.0 / analyzed as f64)
    }
}

/// One point of the sentiment time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    /// Average sentiment score for the day.
    pub sentiment_score: f64,
    /// Number of comments that day.
    pub count: u64,
}

/// A word and how often it appears across the scoped comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordFrequency {
    /// The word.
    #[serde(alias = "text")]
    pub word: String,
    /// Occurrences.
    #[serde(alias = "value")]
    pub frequency: u64,
}

/// Metrics for one scope (or for everything when unscoped).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    /// Total number of comments.
    pub total_comments: u64,
    /// Mean sentiment score.
    pub average_sentiment_score: f64,
    /// Counts per sentiment label.
    #[serde(default)]
    pub sentiment_distribution: Vec<SentimentCount>,
    /// Per-category breakdowns, when the backend computes them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<BTreeMap<String, CategoryDistribution>>,
    /// Time-ordered trend points.
    #[serde(default)]
    pub sentiment_trends: Vec<TrendPoint>,
    /// Words ranked by frequency.
    #[serde(default)]
    pub top_words: Vec<WordFrequency>,
}

impl DashboardMetrics {
    /// Count reported for `label`, or 0 when the label is absent.
    #[must_use]
    pub fn sentiment_count(&self, label: &str) -> u64 {
        self.sentiment_distribution
            .iter()
            .find(|s| s.sentiment == label)
            .map_or(0, |s| s.count)
    }

    /// Categories in rendering order: known keys first, then the rest by key.
    #[must_use]
    pub fn ordered_categories(&self) -> Vec<(&str, &CategoryDistribution)> {
        let Some(categories) = &self.categories else {
            return Vec::new();
        };
        let mut ordered: Vec<(&str, &CategoryDistribution)> = CATEGORY_ORDER
            .iter()
            .filter_map(|key| categories.get_key_value(*key))
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        ordered.extend(
            categories
                .iter()
                .filter(|(k, _)| !CATEGORY_ORDER.contains(&k.as_str()))
                .map(|(k, v)| (k.as_str(), v)),
        );
        ordered
    }

    /// Whether the scope has no comments at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_comments == 0
    }
}

/// Values shown in the KPI cards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    /// Total comments.
    pub total_comments: u64,
    /// Mean sentiment score.
    pub average_sentiment_score: f64,
    /// Positive comments.
    pub positive: u64,
    /// Neutral comments.
    pub neutral: u64,
    /// Negative comments.
    pub negative: u64,
}

impl KpiSummary {
    /// Extracts the KPI values from a metrics payload.
    #[must_use]
    pub fn from_metrics(metrics: &DashboardMetrics) -> Self {
        Self {
            total_comments: metrics.total_comments,
            average_sentiment_score: metrics.average_sentiment_score,
            positive: metrics.sentiment_count(POSITIVE),
            neutral: metrics.sentiment_count(NEUTRAL),
            negative: metrics.sentiment_count(NEGATIVE),
        }
    }
}
