//! Measures Query
//!
//! Reads numeric measures for a component from the service. Used for
//! incidental checks after a run; the result never decides pass or fail.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::services::environment::ServiceHandle;
use crate::utils::error::{HarnessError, HarnessResult};
use crate::utils::http::{http_client, REQUEST_TIMEOUT};

pub const MEASURES_ENDPOINT: &str = "api/measures/component";

/// Coverage metrics the ruling run reports on.
pub const COVERAGE_METRICS: [&str; 7] = [
    "line_coverage",
    "lines_to_cover",
    "uncovered_lines",
    "branch_coverage",
    "conditions_to_cover",
    "uncovered_conditions",
    "coverage",
];

/// Client for the measures endpoint.
pub struct MeasuresClient {
    client: reqwest::Client,
}

impl MeasuresClient {
    pub fn new() -> Self {
        Self {
            client: http_client(REQUEST_TIMEOUT),
        }
    }

    /// Fetch `metrics` for `component`. Metrics the service has no value for
    /// are absent from the result.
    pub async fn component_measures(
        &self,
        handle: &ServiceHandle,
        component: &str,
        metrics: &[&str],
    ) -> HarnessResult<BTreeMap<String, f64>> {
        let metric_keys = metrics.join(",");
        let response = self
            .client
            .get(handle.url(MEASURES_ENDPOINT))
            .query(&[("component", component), ("metricKeys", metric_keys.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HarnessError::internal(format!(
                "measures query for {} failed: HTTP {} {}",
                component, status, body
            )));
        }

        let body: Value = response.json().await?;
        let measures = parse_measures(&body)?;
        debug!("[Measures] {} -> {:?}", component, measures);
        Ok(measures)
    }
}

impl Default for MeasuresClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull `metric -> value` pairs out of a measures response body.
pub fn parse_measures(body: &Value) -> HarnessResult<BTreeMap<String, f64>> {
    let measures = body
        .get("component")
        .and_then(|c| c.get("measures"))
        .and_then(Value::as_array)
        .ok_or_else(|| HarnessError::internal("measures response has no component.measures"))?;

    let mut out = BTreeMap::new();
    for measure in measures {
        let Some(metric) = measure.get("metric").and_then(Value::as_str) else {
            continue;
        };
        let value = match measure.get("value") {
            Some(Value::String(s)) => s.parse::<f64>().ok(),
            Some(Value::Number(n)) => n.as_f64(),
            _ => None,
        };
        if let Some(value) = value {
            out.insert(metric.to_string(), value);
        }
    }
    Ok(out)
}
