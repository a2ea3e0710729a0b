//! Metrics collection for spends-frontend.
//!
//! HTTP request metrics come from the shared middleware through the
//! `metrics` recorder; workflow and backend counters live in a Prometheus
//! registry and are appended to the same scrape output.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::{Once, OnceLock};

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
pub static PROMETHEUS_REGISTRY: OnceLock<Registry> = OnceLock::new();
pub static WORKFLOW_ACTIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static BACKEND_CALLS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

static INIT: Once = Once::new();

/// Install the recorder and register the custom counters.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_metrics() {
    INIT.call_once(|| {
        match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                let _ = METRICS_HANDLE.set(handle);
            }
            Err(e) => tracing::warn!(error = %e, "Prometheus recorder not installed"),
        }

        let registry = Registry::new();

        let workflow_actions = IntCounterVec::new(
            Opts::new(
                "workflow_actions_total",
                "Workflow actions by action and outcome",
            ),
            &["action", "outcome"],
        );
        let backend_calls = IntCounterVec::new(
            Opts::new(
                "backend_calls_total",
                "Calls to the workflow backend by method and outcome",
            ),
            &["method", "outcome"],
        );

        match (workflow_actions, backend_calls) {
            (Ok(workflow_actions), Ok(backend_calls)) => {
                let registered = registry
                    .register(Box::new(workflow_actions.clone()))
                    .and_then(|_| registry.register(Box::new(backend_calls.clone())));

                if let Err(e) = registered {
                    tracing::warn!(error = %e, "Failed to register workflow metrics");
                    return;
                }

                let _ = WORKFLOW_ACTIONS_TOTAL.set(workflow_actions);
                let _ = BACKEND_CALLS_TOTAL.set(backend_calls);
                let _ = PROMETHEUS_REGISTRY.set(registry);
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(error = %e, "Failed to create workflow metrics");
            }
        }
    });
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string());

    if let Some(registry) = PROMETHEUS_REGISTRY.get() {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&registry.gather(), &mut buffer).ok();
        if let Ok(custom_metrics) = String::from_utf8(buffer) {
            output.push_str(&custom_metrics);
        }
    }

    output
}

pub fn record_workflow_action(action: &str, outcome: &str) {
    if let Some(counter) = WORKFLOW_ACTIONS_TOTAL.get() {
        counter.with_label_values(&[action, outcome]).inc();
    }
}

pub fn record_backend_call(method: &str, outcome: &str) {
    if let Some(counter) = BACKEND_CALLS_TOTAL.get() {
        counter.with_label_values(&[method, outcome]).inc();
    }
}
