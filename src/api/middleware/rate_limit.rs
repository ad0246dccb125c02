//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Creates a per-IP rate limiter for report endpoints.
///
/// Each client IP (socket peer address) refills `per_second` tokens per
/// second up to `burst`. Requests exceeding the limit receive
/// `429 Too Many Requests`.
///
/// Returns `None` when `per_second` is zero or above 1000, or `burst` is zero.
///
/// # Example
///
/// ```rust,ignore
/// let api = Router::new()
///     .route("/aggregate/paginated", post(aggregate_handler))
///     .layer(rate_limit::layer(10, 50).expect("valid limits"));
/// ```
pub fn layer(
    per_second: u64,
    burst: u32,
) -> Option<GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>> {
    if per_second == 0 || per_second > 1000 {
        return None;
    }

    // The builder takes the interval between replenished tokens.
    let governor_conf = GovernorConfigBuilder::default()
        .per_millisecond(1000 / per_second)
        .burst_size(burst)
        .finish()?;

    Some(GovernorLayer::new(Arc::new(governor_conf)))
}
