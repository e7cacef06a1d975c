use crate::domain::finance::margin::{net_margin, net_profit};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One closed job order as it appears on the profitability report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOrderSummary {
    pub jo_number: String,
    pub customer: String,
    pub completed_on: Option<NaiveDate>,
    pub revenue: f64,
    pub direct_cost: f64,
    pub overhead: f64,
    pub distance_km: Option<f64>,
}

impl JobOrderSummary {
    pub fn net_profit(&self) -> f64 {
        net_profit(self.revenue, self.direct_cost, self.overhead)
    }

    pub fn net_margin(&self) -> f64 {
        net_margin(self.revenue, self.net_profit())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Both bounds are inclusive; a missing bound is open.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MarginRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl MarginRange {
    pub fn contains(&self, margin: f64) -> bool {
        self.min.is_none_or(|min| margin >= min) && self.max.is_none_or(|max| margin <= max)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Items without a date never match.
pub fn filter_by_date_range<T, F>(items: &[T], range: DateRange, date_of: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> Option<NaiveDate>,
{
    items
        .iter()
        .filter(|item| date_of(item).is_some_and(|date| range.contains(date)))
        .cloned()
        .collect()
}

pub fn filter_by_margin_range(items: &[JobOrderSummary], range: MarginRange) -> Vec<JobOrderSummary> {
    items
        .iter()
        .filter(|item| range.contains(item.net_margin()))
        .cloned()
        .collect()
}

pub fn filter_by_max_distance(items: &[JobOrderSummary], max_km: f64) -> Vec<JobOrderSummary> {
    items
        .iter()
        .filter(|item| item.distance_km.is_some_and(|km| km <= max_km))
        .cloned()
        .collect()
}

/// Undated items sort after dated ones regardless of order.
pub fn sort_by_date<T, F>(items: &[T], order: SortOrder, date_of: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> Option<NaiveDate>,
{
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| match (date_of(a), date_of(b)) {
        (Some(x), Some(y)) => order.apply(x.cmp(&y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    sorted
}

pub fn sort_by_margin(items: &[JobOrderSummary], order: SortOrder) -> Vec<JobOrderSummary> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| order.apply(a.net_margin().total_cmp(&b.net_margin())));
    sorted
}

/// Items with no recorded distance go last.
pub fn sort_by_distance(items: &[JobOrderSummary], order: SortOrder) -> Vec<JobOrderSummary> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| match (a.distance_km, b.distance_km) {
        (Some(x), Some(y)) => order.apply(x.total_cmp(&y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    sorted
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ReportTotals {
    pub count: usize,
    pub revenue: f64,
    pub direct_cost: f64,
    pub overhead: f64,
    pub net_profit: f64,
    pub net_margin: f64,
}

pub fn summarize_report(items: &[JobOrderSummary]) -> ReportTotals {
    let mut totals = items.iter().fold(ReportTotals::default(), |mut acc, item| {
        acc.count += 1;
        acc.revenue += item.revenue;
        acc.direct_cost += item.direct_cost;
        acc.overhead += item.overhead;
        acc
    });
    totals.net_profit = net_profit(totals.revenue, totals.direct_cost, totals.overhead);
    totals.net_margin = net_margin(totals.revenue, totals.net_profit);
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn jo(number: &str, completed: Option<&str>, revenue: f64, cost: f64, km: Option<f64>) -> JobOrderSummary {
        JobOrderSummary {
            jo_number: number.to_string(),
            customer: "PT Samudera".to_string(),
            completed_on: completed.map(date),
            revenue,
            direct_cost: cost,
            overhead: 0.0,
            distance_km: km,
        }
    }

    fn sample() -> Vec<JobOrderSummary> {
        vec![
            jo("JO-001", Some("2026-01-05"), 1_000.0, 900.0, Some(120.0)),
            jo("JO-002", Some("2026-01-20"), 1_000.0, 500.0, None),
            jo("JO-003", None, 2_000.0, 1_000.0, Some(45.5)),
            jo("JO-004", Some("2026-02-01"), 0.0, 100.0, Some(120.0)),
            jo("JO-005", Some("2026-01-20"), 500.0, 250.0, Some(300.0)),
        ]
    }

    fn numbers(items: &[JobOrderSummary]) -> Vec<&str> {
        items.iter().map(|i| i.jo_number.as_str()).collect()
    }

    #[test]
    fn test_filter_by_date_range_inclusive() {
        let items = sample();
        let range = DateRange::new(Some(date("2026-01-05")), Some(date("2026-01-20")));
        let filtered = filter_by_date_range(&items, range, |i| i.completed_on);
        assert_eq!(numbers(&filtered), vec!["JO-001", "JO-002", "JO-005"]);
        assert_eq!(items.len(), 5);
    }

    #[test]
    fn test_filter_partition_is_exact() {
        let items = sample();
        let range = DateRange::new(Some(date("2026-01-10")), None);
        let kept = filter_by_date_range(&items, range, |i| i.completed_on);
        assert!(kept.len() <= items.len());
        for item in &items {
            let retained = kept.iter().any(|k| k.jo_number == item.jo_number);
            let satisfies = item.completed_on.is_some_and(|d| range.contains(d));
            assert_eq!(retained, satisfies, "{}", item.jo_number);
        }
    }

    #[test]
    fn test_filter_by_margin_range() {
        let items = sample();
        let range = MarginRange {
            min: Some(40.0),
            max: Some(60.0),
        };
        let filtered = filter_by_margin_range(&items, range);
        assert_eq!(numbers(&filtered), vec!["JO-002", "JO-003", "JO-005"]);
    }

    #[test]
    fn test_zero_revenue_has_zero_margin() {
        let items = sample();
        let range = MarginRange {
            min: Some(0.0),
            max: Some(0.0),
        };
        assert_eq!(numbers(&filter_by_margin_range(&items, range)), vec!["JO-004"]);
    }

    #[test]
    fn test_filter_by_max_distance_excludes_unknown() {
        let items = sample();
        let filtered = filter_by_max_distance(&items, 120.0);
        assert_eq!(numbers(&filtered), vec!["JO-001", "JO-003", "JO-004"]);
    }

    #[test]
    fn test_sort_by_distance_is_stable() {
        let items = sample();
        let asc = sort_by_distance(&items, SortOrder::Asc);
        assert_eq!(numbers(&asc), vec!["JO-003", "JO-001", "JO-004", "JO-005", "JO-002"]);
        let desc = sort_by_distance(&items, SortOrder::Desc);
        assert_eq!(numbers(&desc), vec!["JO-005", "JO-001", "JO-004", "JO-003", "JO-002"]);
        assert_eq!(numbers(&items), vec!["JO-001", "JO-002", "JO-003", "JO-004", "JO-005"]);
    }

    #[test]
    fn test_sort_by_date_ties_keep_input_order() {
        let items = sample();
        let sorted = sort_by_date(&items, SortOrder::Asc, |i| i.completed_on);
        assert_eq!(numbers(&sorted), vec!["JO-001", "JO-002", "JO-005", "JO-004", "JO-003"]);
    }

    #[test]
    fn test_sort_by_margin_desc() {
        let items = sample();
        let sorted = sort_by_margin(&items, SortOrder::Desc);
        assert_eq!(numbers(&sorted), vec!["JO-002", "JO-003", "JO-005", "JO-001", "JO-004"]);
    }

    #[test]
    fn test_summarize_report() {
        let totals = summarize_report(&sample());
        assert_eq!(totals.count, 5);
        assert_eq!(totals.revenue, 4_500.0);
        assert_eq!(totals.direct_cost, 2_750.0);
        assert_eq!(totals.net_profit, 1_750.0);

        let empty = summarize_report(&[]);
        assert_eq!(empty.count, 0);
        assert_eq!(empty.net_margin, 0.0);
    }
}
