use erp_rules::domain::finance::margin::{net_margin, net_profit, ProfitBreakdown};
use erp_rules::domain::finance::report::{
    filter_by_margin_range, sort_by_margin, summarize_report, JobOrderSummary, MarginRange,
    SortOrder,
};
use erp_rules::domain::hse::{assess_risk, Consequence, Likelihood, RiskLevel};
use erp_rules::domain::notifications::backoff_delay_minutes;
use erp_rules::domain::workflow::{
    ensure_transition, BillOfLadingStatus, DocumentKind, DocumentStatus, JmpStatus,
};
use erp_rules::ErpError;

fn job(number: &str, revenue: f64, direct_cost: f64, overhead: f64) -> JobOrderSummary {
    JobOrderSummary {
        jo_number: number.to_string(),
        customer: "PT Gama".to_string(),
        completed_on: None,
        revenue,
        direct_cost,
        overhead,
        distance_km: None,
    }
}

#[test]
fn test_job_margin_agrees_with_breakdown() {
    let jo = job("JO-0001", 12_500_000.0, 8_000_000.0, 1_250_000.0);
    let breakdown = ProfitBreakdown::new(jo.revenue, jo.direct_cost, jo.overhead);

    assert_eq!(jo.net_profit(), breakdown.net_profit());
    assert_eq!(jo.net_profit(), net_profit(12_500_000.0, 8_000_000.0, 1_250_000.0));
    assert_eq!(jo.net_margin(), net_margin(jo.revenue, jo.net_profit()));
    assert!((jo.net_margin() - 26.0).abs() < 1e-9);
}

#[test]
fn test_margin_report_pipeline() {
    let jobs = vec![
        job("JO-1", 1_000.0, 950.0, 0.0),
        job("JO-2", 1_000.0, 600.0, 100.0),
        job("JO-3", 0.0, 0.0, 0.0),
        job("JO-4", 4_000.0, 2_000.0, 0.0),
    ];

    let healthy = filter_by_margin_range(
        &jobs,
        MarginRange {
            min: Some(20.0),
            max: None,
        },
    );
    let ranked = sort_by_margin(&healthy, SortOrder::Desc);
    let numbers: Vec<&str> = ranked.iter().map(|j| j.jo_number.as_str()).collect();
    assert_eq!(numbers, vec!["JO-4", "JO-2"]);

    let totals = summarize_report(&jobs);
    assert_eq!(totals.count, 4);
    assert_eq!(totals.net_profit, 2_350.0);
}

#[test]
fn test_risk_levels_cover_all_bands() {
    let mut seen = std::collections::BTreeSet::new();
    for l in Likelihood::ALL {
        for c in Consequence::ALL {
            seen.insert(assess_risk(l, c).level);
        }
    }
    assert_eq!(
        seen.into_iter().collect::<Vec<_>>(),
        vec![RiskLevel::Low, RiskLevel::Medium, RiskLevel::High, RiskLevel::Extreme]
    );
}

#[test]
fn test_bill_of_lading_happy_path() {
    let mut status = BillOfLadingStatus::Draft;
    for next in [
        BillOfLadingStatus::Submitted,
        BillOfLadingStatus::Issued,
        BillOfLadingStatus::Surrendered,
    ] {
        status = ensure_transition(status, next).unwrap();
    }
    assert!(status.is_terminal());
    assert!(matches!(
        ensure_transition(status, BillOfLadingStatus::Released),
        Err(ErpError::InvalidTransition { .. })
    ));
}

#[test]
fn test_jmp_terminal_statuses_from_strings() {
    for terminal in ["completed", "cancelled"] {
        let status: JmpStatus = terminal.parse().unwrap();
        assert!(status.is_terminal());
        assert!(DocumentKind::Jmp.allowed_next_str(terminal).unwrap().is_empty());
    }
    assert_eq!(DocumentKind::Jmp.document_name(), "journey_management_plan");
}

#[test]
fn test_backoff_schedule() {
    let schedule: Vec<u64> = (-2..13).map(backoff_delay_minutes).collect();
    assert_eq!(
        schedule,
        vec![1, 1, 1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024, 1024, 1024]
    );
}
