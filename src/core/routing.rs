//! Routing categories and the per-turn metadata fragment.
//!
//! The server reports which provider answered a prompt in `routed_to`. The
//! client only distinguishes two presentation categories: the literal
//! `"local"` is [`RoutingCategory::Local`], and every other value, including
//! providers it has never heard of and a missing field, falls back to
//! [`RoutingCategory::Remote`].

/// A successful `/generate` answer, reduced to what a turn needs.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub text: String,
    pub routed_to: Option<String>,
    pub cost: f64,
    /// Seconds, as measured by the server.
    pub latency: f64,
    pub cached: bool,
}

pub const LOCAL_ROUTE: &str = "local";

/// Label shown when the server omitted `routed_to`.
pub const UNKNOWN_ROUTE_LABEL: &str = "UNKNOWN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutingCategory {
    Local,
    /// Default for anything that is not exactly `"local"`.
    Remote,
}

impl RoutingCategory {
    pub fn from_routed_to(routed_to: Option<&str>) -> Self {
        match routed_to {
            Some(LOCAL_ROUTE) => RoutingCategory::Local,
            _ => RoutingCategory::Remote,
        }
    }

    /// Presentation class name. Remote answers are styled as `huggingface`.
    pub fn as_str(self) -> &'static str {
        match self {
            RoutingCategory::Local => "local",
            RoutingCategory::Remote => "huggingface",
        }
    }
}

/// Everything rendered after an answer: where it was routed, what it cost,
/// and how long the server spent on it.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnMetadata {
    pub category: RoutingCategory,
    pub route_label: String,
    pub cost: f64,
    pub latency: f64,
    pub cached: bool,
}

impl TurnMetadata {
    pub fn from_result(result: &GenerationResult) -> Self {
        let route_label = result
            .routed_to
            .as_deref()
            .map(str::to_uppercase)
            .unwrap_or_else(|| UNKNOWN_ROUTE_LABEL.to_string());

        Self {
            category: RoutingCategory::from_routed_to(result.routed_to.as_deref()),
            route_label,
            cost: result.cost,
            latency: result.latency,
            cached: result.cached,
        }
    }

    pub fn cost_text(&self) -> String {
        format_cost(self.cost)
    }

    pub fn latency_text(&self) -> String {
        format_latency_ms(self.latency)
    }

    /// `LOCAL | $0.000020 | 150ms`, with ` | cached` appended for cache hits.
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} | {} | {}",
            self.route_label,
            self.cost_text(),
            self.latency_text()
        );
        if self.cached {
            summary.push_str(" | cached");
        }
        summary
    }
}

/// Dollar amount with six decimals, e.g. `$0.000123`.
pub fn format_cost(cost: f64) -> String {
    format!("${cost:.6}")
}

/// Converts seconds to whole milliseconds, rounding half away from zero.
pub fn latency_millis(latency_secs: f64) -> i64 {
    (latency_secs * 1000.0).round() as i64
}

/// Seconds rendered as whole milliseconds, e.g. `427ms`.
pub fn format_latency_ms(latency_secs: f64) -> String {
    format!("{}ms", latency_millis(latency_secs))
}
