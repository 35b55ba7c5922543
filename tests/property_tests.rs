//! Property tests for metrics and session invariants.
//!
//! 1. Profit factor is the plain ratio and moves the right way
//! 2. The composite score stays in [0, 1000]
//! 3. Badge evaluation on unchanged state adds nothing
//! 4. Saving then loading gives back the same session
//! 5. Extreme magnitudes never leave a non-finite figure behind

mod common;

use proptest::prelude::*;

use backlogger::metrics::{composite_score, profit_factor, ProfitFactor};
use backlogger::models::{Stats, TradeInput};
use backlogger::session::Session;
use backlogger::store::{MemoryStore, SessionStore};
use backlogger::trading::{evaluate_badges, BadgeEvent};

use common::{now, wednesday};

// ── Strategies ───────────────────────────────────────────────────────

fn arb_money() -> impl Strategy<Value = f64> {
    (0.0..100_000.0_f64).prop_map(|m| m.round())
}

#[derive(Debug, Clone)]
enum Action {
    Start,
    Trade { entry: f64, stop: f64, exit: f64, risk: f64, stars: u8 },
    Advance,
    NoTrade,
    End,
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        1 => Just(Action::Start),
        6 => (90.0..110.0_f64, 85.0..115.0_f64, 80.0..120.0_f64, 0.25..3.0_f64, 1u8..=5)
            .prop_map(|(entry, stop, exit, risk, stars)| Action::Trade {
                entry: (entry * 100.0).round() / 100.0,
                stop: (stop * 100.0).round() / 100.0,
                exit: (exit * 100.0).round() / 100.0,
                risk: (risk * 100.0).round() / 100.0,
                stars,
            }),
        2 => Just(Action::Advance),
        1 => Just(Action::NoTrade),
        1 => Just(Action::End),
    ]
}

fn play(actions: &[Action]) -> Session {
    let mut session = Session::default();
    for (i, action) in actions.iter().enumerate() {
        match action {
            Action::Start => {
                session.start_challenge_with_id("ICT", "EURUSD", wednesday(), 1000 + i as u16);
            }
            Action::Trade { entry, stop, exit, risk, stars } => {
                let input = TradeInput::new(entry, stop, exit)
                    .with_risk(risk)
                    .with_stars(*stars, *stars, 5, *stars);
                session.record_trade(&input, now()).unwrap();
            }
            Action::Advance => {
                session.advance_day();
            }
            Action::NoTrade => {
                session.mark_no_trade();
            }
            Action::End => {
                session.end_week(now());
            }
        }
    }
    session
}

// ── 1. Profit factor ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn profit_factor_is_ratio_and_monotonic(
        profit in arb_money(),
        loss in 1.0..100_000.0_f64,
        bump in 1.0..1000.0_f64,
    ) {
        let pf = profit_factor(profit, loss);
        prop_assert_eq!(pf, ProfitFactor::Finite(profit / loss));

        let more_profit = profit_factor(profit + bump, loss).as_f64().unwrap();
        let more_loss = profit_factor(profit, loss + bump).as_f64().unwrap();
        prop_assert!(more_profit >= profit / loss);
        prop_assert!(more_loss <= profit / loss);
    }
}

// ── 2. Score bounds ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn composite_score_is_bounded(
        wins in 0u32..500,
        losses in 0u32..500,
        sum_profit in arb_money(),
        sum_loss_abs in arb_money(),
        high_water in 0.0..1_000_000.0_f64,
        dd_frac in 0.0..=1.0_f64,
    ) {
        let stats = Stats {
            wins,
            losses,
            sum_profit,
            sum_loss_abs,
            max_drawdown: high_water * dd_frac,
            mpi: 0,
        };
        let score = composite_score(&stats, high_water);
        prop_assert!(score <= 1000);
    }
}

// ── 3. Badge idempotence ─────────────────────────────────────────────

proptest! {
    #[test]
    fn badges_are_stable_on_unchanged_state(actions in prop::collection::vec(arb_action(), 1..40)) {
        let mut session = play(&actions);
        let before = session.badges.clone();

        let event = BadgeEvent::WeekFinalized {
            week_pl: 0.0,
            prior_best_week: session.account.best_week,
        };
        let first = evaluate_badges(&session.badges, &session.account, &session.stats, &event);
        session.badges.merge(first.clone());
        let second = evaluate_badges(&session.badges, &session.account, &session.stats, &event);

        prop_assert!(second.is_empty());
        prop_assert!(session.badges.merge(first).is_empty());
        // nothing that was unlocked disappeared
        prop_assert!(before.iter().all(|b| session.badges.contains(*b)));
    }
}

// ── 4. Snapshot round-trip ───────────────────────────────────────────

proptest! {
    #[test]
    fn save_then_load_is_identity(actions in prop::collection::vec(arb_action(), 0..40)) {
        let session = play(&actions);
        let store = MemoryStore::new();
        store.save(&session).unwrap();
        prop_assert_eq!(store.load().unwrap(), Some(session));
    }

    #[test]
    fn account_invariants_hold(actions in prop::collection::vec(arb_action(), 0..60)) {
        let session = play(&actions);
        let account = &session.account;
        prop_assert!(account.high_water >= account.balance);
        prop_assert!(account.biggest_profit >= 0.0);
        prop_assert!(account.biggest_loss <= 0.0);
        prop_assert_eq!(account.equity, account.balance);
        prop_assert!(session.stats.max_drawdown >= account.high_water - account.balance);
        prop_assert!(session.stats.mpi <= 1000);
        prop_assert!(session.current_challenge.iter().all(|c| c.day_index < 5));
    }
}

// ── 5. Extreme magnitudes ────────────────────────────────────────────

fn arb_extreme() -> impl Strategy<Value = f64> {
    prop_oneof![
        -1e308..1e308_f64,
        -1e3..1e3_f64,
        Just(f64::MAX),
        Just(f64::MIN),
        Just(0.0),
    ]
}

proptest! {
    #[test]
    fn extreme_trades_keep_the_profile_finite(
        trades in prop::collection::vec(
            (arb_extreme(), arb_extreme(), arb_extreme(), 0.0..1e308_f64),
            1..12,
        ),
    ) {
        let mut session = Session::default();
        session.start_challenge_with_id("ICT", "EURUSD", wednesday(), 7777);

        for (entry, stop, exit, risk) in &trades {
            let before = session.clone();
            let input = TradeInput::new(entry, stop, exit).with_risk(risk);
            if session.record_trade(&input, now()).is_err() {
                prop_assert_eq!(&session, &before);
            }
        }

        let account = &session.account;
        let figures = [
            account.balance,
            account.equity,
            account.high_water,
            account.daily_pl,
            account.weekly_pl,
            account.biggest_profit,
            account.biggest_loss,
            session.stats.sum_profit,
            session.stats.sum_loss_abs,
            session.stats.max_drawdown,
        ];
        prop_assert!(figures.iter().all(|v| v.is_finite()));
        prop_assert!(session
            .current_trades()
            .iter()
            .all(|t| t.pl.is_finite() && t.r_multiple.is_finite()));

        session.end_week(now());
        let store = MemoryStore::new();
        store.save(&session).unwrap();
        prop_assert_eq!(store.load().unwrap(), Some(session));
    }
}
