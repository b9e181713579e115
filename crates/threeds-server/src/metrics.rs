use prometheus::{
    core::Collector, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts,
    Registry,
};
use std::sync::LazyLock;

use threeds::constants::{
    AUTHENTICATE_ENDPOINT, RESULT_ENDPOINT, TEST_CARDS_ENDPOINT, VERSION_ENDPOINT,
};
use threeds::wire::{
    AuthenticateRequest, AuthenticateResponseData, ResultRequest, ResultResponseData, TestCard,
    VersionRequest, VersionResponseData,
};
use threeds::{AuthenticationService, ThreeDsError};

pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// Flow steps by outcome
pub static STEP_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new("threeds_step_total", "3DS flow steps handled, by outcome"),
        &["step", "result"],
    )
    .unwrap()
});

pub static UPSTREAM_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "threeds_upstream_duration_seconds",
            "Latency of calls to the 3DS server",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["endpoint"],
    )
    .unwrap()
});

pub static TRACKED_TRANSACTIONS: LazyLock<IntGauge> = LazyLock::new(|| {
    IntGauge::new(
        "threeds_tracked_transactions",
        "Transactions currently held in the transaction store",
    )
    .unwrap()
});

/// Register all metrics with the registry. Safe to call more than once.
pub fn register_metrics() {
    let collectors: Vec<Box<dyn Collector>> = vec![
        Box::new(STEP_TOTAL.clone()),
        Box::new(UPSTREAM_DURATION.clone()),
        Box::new(TRACKED_TRANSACTIONS.clone()),
    ];
    for collector in collectors {
        if let Err(e) = REGISTRY.register(collector) {
            tracing::debug!("metric not registered: {}", e);
        }
    }
}

/// Count one handled step. `result` is `"ok"` or the error label.
pub fn record_step(step: &str, result: &str) {
    STEP_TOTAL.with_label_values(&[step, result]).inc();
}

/// Stable label for an error outcome.
pub fn error_label(err: &ThreeDsError) -> &'static str {
    match err {
        ThreeDsError::InvalidRequest(_) | ThreeDsError::InvalidColorDepth(_) => "invalid_request",
        ThreeDsError::NotFound(_) => "not_found",
        ThreeDsError::Unauthorized => "unauthorized",
        ThreeDsError::CardRangeNotFound => "card_range_not_found",
        ThreeDsError::Upstream(_) => "upstream",
        ThreeDsError::UnrecognizedOutcome { .. } => "unrecognized_outcome",
    }
}

/// Render the registry in the Prometheus text format.
pub fn metrics_output() -> Result<String, String> {
    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&REGISTRY.gather(), &mut buffer)
        .map_err(|e| e.to_string())?;
    String::from_utf8(buffer).map_err(|e| e.to_string())
}

/// Wraps an [`AuthenticationService`] and times every call into
/// `threeds_upstream_duration_seconds`.
#[derive(Debug, Clone)]
pub struct MeteredService<S> {
    inner: S,
}

impl<S> MeteredService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S: AuthenticationService> AuthenticationService for MeteredService<S> {
    async fn version(&self, request: &VersionRequest) -> Result<VersionResponseData, ThreeDsError> {
        let timer = UPSTREAM_DURATION
            .with_label_values(&[VERSION_ENDPOINT])
            .start_timer();
        let result = self.inner.version(request).await;
        timer.observe_duration();
        result
    }

    async fn authenticate(
        &self,
        request: &AuthenticateRequest,
    ) -> Result<AuthenticateResponseData, ThreeDsError> {
        let timer = UPSTREAM_DURATION
            .with_label_values(&[AUTHENTICATE_ENDPOINT])
            .start_timer();
        let result = self.inner.authenticate(request).await;
        timer.observe_duration();
        result
    }

    async fn result(&self, request: &ResultRequest) -> Result<ResultResponseData, ThreeDsError> {
        let timer = UPSTREAM_DURATION
            .with_label_values(&[RESULT_ENDPOINT])
            .start_timer();
        let result = self.inner.result(request).await;
        timer.observe_duration();
        result
    }

    async fn test_cards(&self) -> Result<Vec<TestCard>, ThreeDsError> {
        let timer = UPSTREAM_DURATION
            .with_label_values(&[TEST_CARDS_ENDPOINT])
            .start_timer();
        let result = self.inner.test_cards().await;
        timer.observe_duration();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_twice_is_harmless() {
        register_metrics();
        register_metrics();
        record_step("checkout", "ok");
        let output = metrics_output().unwrap();
        assert!(output.contains("threeds_step_total"));
    }

    #[test]
    fn test_error_labels() {
        assert_eq!(error_label(&ThreeDsError::CardRangeNotFound), "card_range_not_found");
        assert_eq!(
            error_label(&ThreeDsError::InvalidColorDepth(0)),
            "invalid_request"
        );
        assert_eq!(
            error_label(&ThreeDsError::Upstream("timeout".into())),
            "upstream"
        );
    }
}
