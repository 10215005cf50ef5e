/// Prometheus metrics for the analysis pipeline.
///
/// Metrics live in a process-wide registry under the `idss` namespace and are
/// exported in text format by the `/metrics` endpoint.
///
/// # Example
/// ```no_run
/// use idss_backend::metrics::{self, ANALYSES_TOTAL};
///
/// metrics::init_metrics().ok();
/// ANALYSES_TOTAL.with_label_values(&["success"]).inc();
/// println!("{}", metrics::gather_metrics());
/// ```

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, GaugeVec, Histogram, HistogramOpts, Opts, Registry};
use std::sync::Once;

const NAMESPACE: &str = "idss";

lazy_static! {
    /// Global Prometheus registry for all metrics
    pub static ref PROMETHEUS_REGISTRY: Registry = Registry::new();

    /// Completed analysis runs
    ///
    /// Labels: outcome (success, degraded, failed)
    pub static ref ANALYSES_TOTAL: CounterVec = CounterVec::new(
        Opts::new("analyses_total", "Total number of analysis runs")
            .namespace(NAMESPACE),
        &["outcome"]
    ).expect("Failed to create ANALYSES_TOTAL metric");

    /// End-to-end analysis duration in seconds
    pub static ref ANALYSIS_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new("analysis_duration_seconds", "Analysis run duration in seconds")
            .namespace(NAMESPACE)
            .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
    ).expect("Failed to create ANALYSIS_DURATION_SECONDS metric");

    /// Vessels classified per risk tier
    ///
    /// Labels: risk_level
    pub static ref VESSELS_CLASSIFIED_TOTAL: CounterVec = CounterVec::new(
        Opts::new("vessels_classified_total", "Total number of vessels classified")
            .namespace(NAMESPACE),
        &["risk_level"]
    ).expect("Failed to create VESSELS_CLASSIFIED_TOTAL metric");

    /// Enrichment calls by outcome
    ///
    /// Labels: outcome (success, unconfigured, parse_error, service_error)
    pub static ref ENRICHMENT_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("enrichment_requests_total", "Total number of enrichment attempts")
            .namespace(NAMESPACE),
        &["outcome"]
    ).expect("Failed to create ENRICHMENT_REQUESTS_TOTAL metric");

    /// Runs that fell back to seed-only scenarios
    pub static ref ENRICHMENT_FALLBACKS_TOTAL: Counter = Counter::with_opts(
        Opts::new("enrichment_fallbacks_total", "Total number of seed-only fallbacks")
            .namespace(NAMESPACE),
    ).expect("Failed to create ENRICHMENT_FALLBACKS_TOTAL metric");

    /// Build information
    ///
    /// Labels: version
    pub static ref BUILD_INFO: GaugeVec = GaugeVec::new(
        Opts::new("build_info", "Build information").namespace(NAMESPACE),
        &["version"]
    ).expect("Failed to create BUILD_INFO metric");
}

static INIT: Once = Once::new();

/// Register all metrics with the global registry.
///
/// Safe to call more than once; only the first call registers.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    let mut result = Ok(());
    INIT.call_once(|| {
        result = register_all();
    });
    result
}

fn register_all() -> Result<(), prometheus::Error> {
    PROMETHEUS_REGISTRY.register(Box::new(ANALYSES_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(ANALYSIS_DURATION_SECONDS.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(VESSELS_CLASSIFIED_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(ENRICHMENT_REQUESTS_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(ENRICHMENT_FALLBACKS_TOTAL.clone()))?;
    PROMETHEUS_REGISTRY.register(Box::new(BUILD_INFO.clone()))?;

    BUILD_INFO
        .with_label_values(&[env!("CARGO_PKG_VERSION")])
        .set(1.0);

    tracing::info!("Prometheus metrics initialized successfully");
    Ok(())
}

/// Generate Prometheus text format metrics
pub fn gather_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = PROMETHEUS_REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::from("# Error encoding metrics\n");
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Failed to convert metrics to string: {}", e);
        String::from("# Error converting metrics\n")
    })
}
