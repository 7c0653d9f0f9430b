use crate::metrics::RouteOption;
use serde::{Deserialize, Serialize};

/// Which candidate route to run, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSelection {
    pub selected_route_name: String,
    #[serde(default)]
    pub reasoning: String,
}

/// Highest-scored option; the earliest wins a tie.
pub fn best_scored_route(options: &[RouteOption]) -> Option<&RouteOption> {
    options
        .iter()
        .rev()
        .max_by_key(|option| option.score)
}
