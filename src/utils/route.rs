//! Route label extraction for metrics.

use actix_web::HttpRequest;

/// Label used for requests that matched no registered route
pub const UNMATCHED_ROUTE: &str = "/unmatched";

/// Metrics label for a request: the matched route pattern, so unknown paths
/// do not create unbounded label values.
pub fn extract_route_pattern(req: &HttpRequest) -> String {
    req.match_pattern()
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}
