//! Choosing which alerts are shown.

use alert_core::{Alert, AlertCategory};

use crate::config::Scope;

/// Display order of categories in the ward view.
const CATEGORY_ORDER: [AlertCategory; 2] = [AlertCategory::Fall, AlertCategory::Environmental];

/// Pick the most recently observed alert.
///
/// Undated alerts rank below every dated one. On equal timestamps the
/// earliest alert in iteration order wins.
pub fn latest<'a, I>(alerts: I) -> Option<&'a Alert>
where
    I: IntoIterator<Item = &'a Alert>,
{
    let mut best: Option<&Alert> = None;
    for alert in alerts {
        match best {
            Some(current) if alert.observed_at <= current.observed_at => {}
            _ => best = Some(alert),
        }
    }
    best
}

/// At most one alert per category, fall first.
pub fn latest_per_category(alerts: &[Alert]) -> Vec<Alert> {
    CATEGORY_ORDER
        .iter()
        .filter_map(|category| {
            latest(alerts.iter().filter(|alert| alert.category == *category)).cloned()
        })
        .collect()
}

/// The single latest alert, of either category, for one room.
pub fn latest_for_location(alerts: &[Alert], location_id: &str) -> Option<Alert> {
    latest(alerts.iter().filter(|alert| alert.is_at(location_id))).cloned()
}

/// Build the view for a scope.
pub fn select_view(alerts: &[Alert], scope: &Scope) -> Vec<Alert> {
    match scope {
        Scope::Ward => latest_per_category(alerts),
        Scope::Location(location_id) => latest_for_location(alerts, location_id)
            .into_iter()
            .collect(),
    }
}
