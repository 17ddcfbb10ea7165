use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    // Pre-register counters so they appear even before the first increment.
    counter!("credit_predictions_total", "method" => "model").absolute(0);
    counter!("credit_predictions_total", "method" => "heuristic").absolute(0);
    counter!("model_fallbacks_total").absolute(0);
    counter!("applications_submitted_total").absolute(0);
    counter!("applications_decided_total", "decision" => "approved").absolute(0);
    counter!("applications_decided_total", "decision" => "rejected").absolute(0);

    // Histogram is lazily created on first record; force creation.
    histogram!("scoring_latency_seconds").record(0.0);

    Ok(handle)
}
