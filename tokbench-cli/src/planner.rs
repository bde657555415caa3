//! Scenario Planner
//!
//! Selects which configured scenarios run. Filtering is a regex match on the
//! scenario name; configuration order is preserved so reports list scenarios
//! the way the config file does.

use tokbench_core::Scenario;

/// Ordered scenarios for one run
pub struct ExecutionPlan {
    /// Scenarios to run, in configuration order
    pub scenarios: Vec<Scenario>,
}

/// Build execution plan from configured scenarios
pub fn build_plan<'a>(
    scenarios: impl IntoIterator<Item = &'a Scenario>,
    filter: Option<&regex::Regex>,
) -> ExecutionPlan {
    let selected = scenarios
        .into_iter()
        .filter(|s| filter.is_none_or(|re| re.is_match(s.name())))
        .cloned()
        .collect();

    ExecutionPlan {
        scenarios: selected,
    }
}
