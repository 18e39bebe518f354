use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "blog_likes_toggled_total",
            Unit::Count,
            "Like toggles, labelled by the resulting state."
        );
        describe_counter!(
            "blog_views_recorded_total",
            Unit::Count,
            "Page views counted."
        );
        describe_counter!(
            "blog_view_rows_reconciled_total",
            Unit::Count,
            "Legacy locale-prefixed view rows folded into canonical rows."
        );
        describe_counter!(
            "blog_comments_created_total",
            Unit::Count,
            "Visitor comments stored."
        );
        describe_counter!(
            "blog_locale_redirects_total",
            Unit::Count,
            "Entry-page redirects to a localized path, labelled by the signal that chose the locale."
        );
        describe_counter!(
            "blog_rate_limited_total",
            Unit::Count,
            "API requests rejected by the per-client throttle."
        );
    });
}
