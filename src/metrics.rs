use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{info, warn};

use crate::constants::METRICS_JOB;

/// Install the Prometheus recorder. Returns `None` if another recorder is
/// already installed (tests, or a second call).
pub fn init_recorder() -> Option<PrometheusHandle> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Prometheus recorder install failed (possibly already installed): {}", e);
            None
        }
    }
}

/// Push the rendered registry to a Pushgateway once, at the end of a batch.
pub async fn push_to_gateway(handle: &PrometheusHandle, base_url: &str, instance: &str) {
    let push_url = format!(
        "{}/metrics/job/{}/instance/{}",
        base_url.trim_end_matches('/'),
        METRICS_JOB,
        instance
    );
    let body = handle.render();

    let client = reqwest::Client::new();
    let push_res = client
        .post(&push_url)
        .header("Content-Type", "text/plain; version=0.0.4")
        .body(body)
        .send()
        .await;

    match push_res {
        Ok(r) if r.status().is_success() => {
            info!("Pushed metrics to Pushgateway for instance={}", instance);
        }
        Ok(r) => {
            warn!("Pushgateway push responded with status {} for instance={}", r.status().as_u16(), instance);
        }
        Err(e) => {
            warn!("Failed to push metrics to Pushgateway for instance={}: {}", instance, e);
        }
    }
}

pub mod pipeline {
    use metrics::{counter, histogram};

    pub fn match_finished(status: &'static str, duration_secs: f64) {
        counter!("cs2_matches_total", "status" => status).increment(1);
        histogram!("cs2_match_duration_seconds").record(duration_secs);
    }

    pub fn records_written(count: usize) {
        counter!("cs2_flat_records_written_total").increment(count as u64);
    }

    pub fn notification_failed() {
        counter!("cs2_notifications_failed_total").increment(1);
    }
}
