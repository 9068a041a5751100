//! LLM trend summarization collaborator.
//!
//! Condenses selected products' derived histories into a compact JSON
//! summary, wraps it in an analyst prompt, and asks an OpenAI-compatible
//! chat-completions API for free-text insights. Failures here are isolated:
//! they surface as distinct errors and never touch ingestion or chart data.

use crate::{
    config::settings::InsightsSettings,
    core::catalog::ProductDetail,
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

const SYSTEM_PROMPT: &str = "You are a professional retail business analyst specializing in \
    inventory and sales analysis. Provide clear, actionable insights.";

/// Compact per-product summary fed to the analyst prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTrend {
    /// Display name
    pub name: String,
    /// Product identifier
    pub id: String,
    /// Inventory on hand before day 1
    pub opening_inventory: i64,
    /// Inventory after the last day
    pub final_inventory: i64,
    /// Total sales revenue over the window, 2-decimal string
    pub total_sales: String,
    /// Total procurement spend over the window, 2-decimal string
    pub total_procurement: String,
    /// Daily inventory levels
    pub inventory_trend: Vec<i64>,
    /// Daily sales revenue
    pub sales_trend: Vec<f64>,
    /// Daily procurement spend
    pub procurement_trend: Vec<f64>,
}

/// The collaborator's answer, passed through to the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsReport {
    /// Free-text insights from the model
    pub insights: String,
    /// Total tokens the completion consumed (0 if not reported)
    pub tokens_used: u64,
}

/// Builds the per-product trend summaries from derived histories.
#[must_use]
pub fn summarize_trends(products: &[ProductDetail]) -> Vec<ProductTrend> {
    products
        .iter()
        .map(|product| {
            let total_sales: f64 = product.history.iter().map(|h| h.sales_amount).sum();
            let total_procurement: f64 =
                product.history.iter().map(|h| h.procurement_amount).sum();
            let inventory_trend: Vec<i64> =
                product.history.iter().map(|h| h.inventory).collect();

            ProductTrend {
                name: product.name.clone(),
                id: product.id.clone(),
                opening_inventory: product.opening_inventory,
                final_inventory: inventory_trend.last().copied().unwrap_or(0),
                total_sales: format!("{total_sales:.2}"),
                total_procurement: format!("{total_procurement:.2}"),
                inventory_trend,
                sales_trend: product.history.iter().map(|h| h.sales_amount).collect(),
                procurement_trend: product
                    .history
                    .iter()
                    .map(|h| h.procurement_amount)
                    .collect(),
            }
        })
        .collect()
}

/// Renders the analyst prompt around the JSON-serialized trend summary.
pub fn build_prompt(trends: &[ProductTrend]) -> Result<String> {
    let data = serde_json::to_string_pretty(trends).map_err(|e| Error::InsightsUnavailable {
        message: format!("failed to serialize trend summary: {e}"),
    })?;

    Ok(format!(
        "You are a retail business analyst. Analyze the following product data and provide \
         concise, actionable insights.\n\nProduct Data:\n{data}\n\nPlease provide:\n\
         1. Key trends and patterns (2-3 bullet points)\n\
         2. Notable findings or anomalies (1-2 bullet points)\n\
         3. Business recommendations (2-3 bullet points)\n\n\
         Keep the response professional, concise, and under 200 words. Use bullet points for \
         clarity."
    ))
}

/// Handle to the external completions API. Constructed once at startup and
/// injected into the request state; holds no per-request state itself.
#[derive(Debug, Clone)]
pub struct InsightsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    #[serde(default)]
    total_tokens: u64,
}

impl InsightsClient {
    /// Creates a client against the configured endpoint.
    #[must_use]
    pub fn new(settings: &InsightsSettings, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: settings.model.clone(),
        }
    }

    /// Builds a client from `INSIGHTS_API_KEY`, or `None` when unset so the
    /// endpoint can report itself unconfigured instead of failing mid-call.
    #[must_use]
    pub fn from_env(settings: &InsightsSettings) -> Option<Self> {
        std::env::var("INSIGHTS_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(|key| Self::new(settings, key))
    }

    /// Requests free-text insights for the given products.
    ///
    /// # Errors
    /// - [`Error::InsightsAuth`] when the API rejects our key
    /// - [`Error::InsightsRateLimited`] when the API rate limits us
    /// - [`Error::InsightsUnavailable`] for every other failure
    pub async fn generate(&self, products: &[ProductDetail]) -> Result<InsightsReport> {
        let trends = summarize_trends(products);
        let prompt = build_prompt(&trends)?;

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
            "temperature": 0.7,
            "max_tokens": 500,
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "insights API unreachable");
                Error::InsightsUnavailable {
                    message: e.to_string(),
                }
            })?;

        match response.status() {
            status if status.is_success() => {}
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                return Err(Error::InsightsAuth);
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => {
                return Err(Error::InsightsRateLimited);
            }
            status => {
                return Err(Error::InsightsUnavailable {
                    message: format!("completions API returned {status}"),
                });
            }
        }

        let completion: ChatCompletion =
            response
                .json()
                .await
                .map_err(|e| Error::InsightsUnavailable {
                    message: format!("malformed completions response: {e}"),
                })?;

        let insights = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_else(|| "Unable to generate insights.".to_string());
        let tokens_used = completion.usage.map_or(0, |usage| usage.total_tokens);

        Ok(InsightsReport {
            insights,
            tokens_used,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::catalog::HistoryPoint;

    fn detail() -> ProductDetail {
        let point = |day, inventory, sales_amount, procurement_amount| HistoryPoint {
            day,
            inventory,
            procurement_amount,
            sales_amount,
            procurement_qty: 0,
            procurement_price: 0.0,
            sales_qty: 0,
            sales_price: 0.0,
        };
        ProductDetail {
            id: "P001".to_string(),
            name: "Widget".to_string(),
            opening_inventory: 100,
            history: vec![
                point(1, 90, 99.80, 25.0),
                point(2, 85, 24.95, 0.0),
                point(3, 90, 0.0, 12.0),
            ],
        }
    }

    #[test]
    fn test_summarize_trends_totals_and_trends() {
        let trends = summarize_trends(&[detail()]);
        assert_eq!(trends.len(), 1);
        let trend = &trends[0];
        assert_eq!(trend.opening_inventory, 100);
        assert_eq!(trend.final_inventory, 90);
        assert_eq!(trend.total_sales, "124.75");
        assert_eq!(trend.total_procurement, "37.00");
        assert_eq!(trend.inventory_trend, vec![90, 85, 90]);
        assert_eq!(trend.sales_trend, vec![99.80, 24.95, 0.0]);
    }

    #[test]
    fn test_summarize_trends_empty_history() {
        let empty = ProductDetail {
            id: "P0".to_string(),
            name: "Empty".to_string(),
            opening_inventory: 3,
            history: vec![],
        };
        let trends = summarize_trends(&[empty]);
        assert_eq!(trends[0].final_inventory, 0);
        assert_eq!(trends[0].total_sales, "0.00");
    }

    #[test]
    fn test_build_prompt_embeds_summary_json() {
        let trends = summarize_trends(&[detail()]);
        let prompt = build_prompt(&trends).unwrap();
        assert!(prompt.contains("\"name\": \"Widget\""));
        assert!(prompt.contains("\"totalSales\": \"124.75\""));
        assert!(prompt.contains("Business recommendations"));
    }

    #[test]
    fn test_from_env_requires_key() {
        if std::env::var("INSIGHTS_API_KEY").is_err() {
            assert!(InsightsClient::from_env(&InsightsSettings::default()).is_none());
        }
    }
}
