//! End-to-end examples through `compute`.
//!
//! Tests:
//! 1. Scarcity override raises an underpriced, nearly sold-out date
//! 2. Overpriced date with abundant inventory is lowered
//! 3. Missing reference prices produce an indeterminate date, no price
//! 4. Small changes are auto-approvable
//! 5. Rationale explains the decision without recomputation
//! 6. Out-of-range rates clamp to the same bound whether held or moved
//! 7. A missing competitor price does not dilute the remaining pressure

use chrono::NaiveDate;
use ratelab_core::{
    compute, Action, DecisionRule, GuardWarning, IndeterminateReason, RateSignal, RmsConfig,
    Strategy, ValidatedConfig,
};

/// A Wednesday, so no weekend premium applies.
fn wednesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 11).unwrap()
}

fn balanced() -> ValidatedConfig {
    RmsConfig {
        strategy: Strategy::Balanced,
        ..RmsConfig::default()
    }
    .validate()
    .unwrap()
}

#[test]
fn scarce_inventory_forces_raise() {
    let signal = RateSignal::new(wednesday(), 150.0, 180.0)
        .with_demand(8)
        .with_rooms(2);
    let out = compute(&[signal], &balanced());
    let rec = &out.recommendations[0];

    assert_eq!(rec.action, Action::Up);
    assert_eq!(rec.rationale.rule, DecisionRule::ScarcityOverride);
    assert!(rec.rationale.scarcity_override);
    assert!(rec.suggested_price > 150.0);
    assert_eq!(rec.suggested_price % 5.0, 0.0);
}

#[test]
fn overpriced_with_abundant_inventory_lowers() {
    let signal = RateSignal::new(wednesday(), 150.0, 120.0)
        .with_demand(2)
        .with_rooms(25);
    let out = compute(&[signal], &balanced());
    let rec = &out.recommendations[0];

    assert_eq!(rec.action, Action::Down);
    assert!(rec.rationale.abundance_override);
    assert!(rec.rationale.competitor_gap_pct.unwrap() > 0.0);
    assert!(rec.rationale.pressure.net < 0.0);
    assert!(rec.suggested_price < 150.0);
    assert!(rec.magnitude_pct < 0.0);
}

#[test]
fn missing_reference_prices_are_indeterminate() {
    let mut signal = RateSignal::new(wednesday(), 0.0, 0.0).with_demand(7);
    signal.current_rate = None;
    signal.competitor_median_rate = None;

    let out = compute(&[signal], &balanced());
    assert!(out.recommendations.is_empty());
    assert_eq!(out.indeterminate.len(), 1);
    assert_eq!(out.indeterminate[0].date, wednesday());
    assert_eq!(
        out.indeterminate[0].reason,
        IndeterminateReason::MissingReferencePrices
    );
}

#[test]
fn small_change_is_auto_approvable() {
    // Step 3: a one-step scarcity raise from 125 lands on 129, a 3.2% move.
    let config = RmsConfig {
        price_step: 3.0,
        auto_approve_threshold_pct: 5.0,
        ..RmsConfig::default()
    }
    .validate()
    .unwrap();
    let signal = RateSignal::new(wednesday(), 125.0, 125.0)
        .with_demand(2)
        .with_rooms(2);

    let out = compute(&[signal], &config);
    let rec = &out.recommendations[0];
    assert_eq!(rec.action, Action::Up);
    assert_eq!(rec.suggested_price, 129.0);
    assert!((rec.magnitude_pct - 3.2).abs() < 1e-9);
    assert!(rec.auto_approvable);
}

#[test]
fn large_change_is_not_auto_approvable() {
    // P = 0.4 * -0.4 + 0.3 * -0.5 = -0.31; 300 - 0.31 * 210 * 0.3 = 280.47 -> 280
    let signal = RateSignal::new(wednesday(), 300.0, 200.0)
        .with_demand(1)
        .with_rooms(25);
    let out = compute(&[signal], &balanced());
    let rec = &out.recommendations[0];
    assert_eq!(rec.action, Action::Down);
    assert_eq!(rec.suggested_price, 280.0);
    assert!(rec.magnitude_pct < -5.0);
    assert!(!rec.auto_approvable);
}

#[test]
fn negative_inventory_is_flagged_but_not_fatal() {
    let signal = RateSignal::new(wednesday(), 150.0, 150.0).with_rooms(-3);
    let out = compute(&[signal], &balanced());
    let rec = &out.recommendations[0];
    assert_eq!(rec.rationale.available_rooms, 0);
    assert!(rec.rationale.warnings.contains(&GuardWarning::NegativeInventory));
    // Zero rooms is at the scarcity floor.
    assert_eq!(rec.action, Action::Up);
}

#[test]
fn strategy_changes_the_outcome_for_the_same_signal() {
    let signal = RateSignal::new(wednesday(), 150.0, 180.0)
        .with_demand(7)
        .with_rooms(8);
    let run = |strategy| {
        let cfg = RmsConfig {
            strategy,
            ..RmsConfig::default()
        }
        .validate()
        .unwrap();
        compute(std::slice::from_ref(&signal), &cfg).recommendations[0].action
    };
    // P = 0.4 * 0.2 + 0.3 * (30 / 180) = 0.13
    assert_eq!(run(Strategy::Aggressive), Action::Hold);
    assert_eq!(run(Strategy::Balanced), Action::Hold);

    let hot = signal.clone().with_demand(10).with_event(8);
    let cfg = RmsConfig {
        strategy: Strategy::Aggressive,
        ..RmsConfig::default()
    }
    .validate()
    .unwrap();
    let rec = &compute(&[hot], &cfg).recommendations[0];
    assert_eq!(rec.action, Action::Up);
    assert_eq!(rec.rationale.rule, DecisionRule::ThresholdUp);
}

#[test]
fn rationale_serializes_as_structured_fields() {
    let signal = RateSignal::new(wednesday(), 150.0, 180.0)
        .with_demand(8)
        .with_event(6)
        .with_pickup(300.0);
    let out = compute(&[signal], &balanced());
    let value = serde_json::to_value(&out.recommendations[0]).unwrap();
    let rationale = &value["rationale"];
    assert_eq!(rationale["demand_index"], 8);
    assert_eq!(rationale["event_present"], true);
    assert_eq!(rationale["rule"], "threshold_up");
    assert!(rationale["pressure"]["competitor"]["weight"].is_number());
    assert_eq!(value["action"], "up");
}

#[test]
fn out_of_range_rates_clamp_consistently_across_actions() {
    // Bounds off the 5-step grid; the usable range is 95..=595.
    let cfg = RmsConfig {
        strategy: Strategy::Balanced,
        min_price: 92.0,
        max_price: 598.0,
        ..RmsConfig::default()
    }
    .validate()
    .unwrap();
    let run = |signal: RateSignal| compute(&[signal], &cfg).recommendations[0].clone();

    let cheap = RateSignal::new(wednesday(), 50.0, 25.0).with_rooms(12);
    let slow = run(cheap.clone().with_demand(0));
    let busy = run(cheap.with_demand(10));
    assert_eq!((slow.action, busy.action), (Action::Down, Action::Hold));
    assert_eq!(slow.suggested_price, 95.0);
    assert_eq!(busy.suggested_price, 95.0);

    let dear = RateSignal::new(wednesday(), 700.0, 1400.0)
        .with_rooms(12)
        .with_event(10);
    let slow = run(dear.clone().with_demand(0));
    let busy = run(dear.with_demand(10));
    assert_eq!((slow.action, busy.action), (Action::Hold, Action::Up));
    assert_eq!(slow.suggested_price, 595.0);
    assert_eq!(busy.suggested_price, 595.0);
    assert!(busy.suggested_price >= slow.suggested_price);
}

#[test]
fn missing_competitor_price_leaves_demand_to_decide() {
    let mut signal = RateSignal::new(wednesday(), 150.0, 0.0).with_demand(10);
    signal.competitor_median_rate = None;

    let rec = &compute(&[signal], &balanced()).recommendations[0];
    assert_eq!(rec.rationale.competitor_gap_pct, None);
    assert_eq!(rec.rationale.pressure.competitor.value, None);
    assert!(rec.rationale.pressure.net > 0.25);
    assert_eq!(rec.action, Action::Up);
    assert_eq!(rec.rationale.rule, DecisionRule::ThresholdUp);
}
