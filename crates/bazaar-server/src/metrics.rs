// SPDX-License-Identifier: Apache-2.0

use axum::http::StatusCode;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;

/// Per-route request counters and latency samples, rendered by `/metrics`.
#[derive(Default)]
pub struct RequestMetrics {
    counts: Mutex<HashMap<(String, u16), u64>>,
    latency_ns: Mutex<HashMap<String, Vec<u64>>>,
}

impl RequestMetrics {
    pub async fn observe_request(&self, route: &str, status: StatusCode, latency: Duration) {
        let mut counts = self.counts.lock().await;
        *counts
            .entry((route.to_string(), status.as_u16()))
            .or_insert(0) += 1;
        drop(counts);
        let mut latency_map = self.latency_ns.lock().await;
        latency_map
            .entry(route.to_string())
            .or_default()
            .push(latency.as_nanos() as u64);
    }

    /// Plain-text exposition: request counts per route/status and latency
    /// p50/p95 per route.
    pub async fn render_text(&self) -> String {
        let mut body = String::new();
        let counts = self.counts.lock().await;
        let mut count_rows: Vec<_> = counts
            .iter()
            .map(|((route, status), n)| (route.clone(), *status, *n))
            .collect();
        drop(counts);
        count_rows.sort();
        for (route, status, n) in count_rows {
            body.push_str(&format!(
                "bazaar_requests_total{{route=\"{route}\",status=\"{status}\"}} {n}\n"
            ));
        }

        let latency = self.latency_ns.lock().await;
        let mut latency_rows: Vec<_> = latency
            .iter()
            .map(|(route, samples)| (route.clone(), samples.clone()))
            .collect();
        drop(latency);
        latency_rows.sort_by(|a, b| a.0.cmp(&b.0));
        for (route, samples) in latency_rows {
            body.push_str(&format!(
                "bazaar_request_latency_ns{{route=\"{route}\",quantile=\"0.5\"}} {}\n",
                percentile_ns(&samples, 0.50)
            ));
            body.push_str(&format!(
                "bazaar_request_latency_ns{{route=\"{route}\",quantile=\"0.95\"}} {}\n",
                percentile_ns(&samples, 0.95)
            ));
        }
        body
    }
}

pub(crate) fn percentile_ns(samples: &[u64], pct: f64) -> u64 {
    if samples.is_empty() {
        return 0;
    }
    let mut v = samples.to_vec();
    v.sort_unstable();
    let idx = ((v.len() as f64) * pct).ceil() as usize;
    v[idx.saturating_sub(1).min(v.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_of_empty_is_zero() {
        assert_eq!(percentile_ns(&[], 0.95), 0);
    }

    #[test]
    fn percentile_picks_the_right_rank() {
        let samples: Vec<u64> = (1..=100).collect();
        assert_eq!(percentile_ns(&samples, 0.50), 50);
        assert_eq!(percentile_ns(&samples, 0.95), 95);
    }

    #[tokio::test]
    async fn rendered_text_carries_counts_and_latency() {
        let metrics = RequestMetrics::default();
        metrics
            .observe_request("/orders", StatusCode::OK, Duration::from_millis(3))
            .await;
        metrics
            .observe_request("/orders", StatusCode::OK, Duration::from_millis(5))
            .await;
        metrics
            .observe_request("/orders/cart", StatusCode::NOT_FOUND, Duration::from_millis(1))
            .await;

        let body = metrics.render_text().await;
        assert!(body.contains("bazaar_requests_total{route=\"/orders\",status=\"200\"} 2"));
        assert!(body.contains("bazaar_requests_total{route=\"/orders/cart\",status=\"404\"} 1"));
        assert!(body.contains("bazaar_request_latency_ns{route=\"/orders\",quantile=\"0.95\"}"));
    }
}
