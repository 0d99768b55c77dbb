mod support;

use std::sync::Arc;
use std::thread;

use betslip::application::{selectors, BetSlipStore, StoreChange};
use betslip::domain::{is_valid_odds, OddsPulse, OddsUpdate};
use betslip::testkit::catalogue::{outcome_id, single_event_snapshot};

use support::store::{ids, sample_store, store_with};

#[test]
fn applying_one_update_moves_only_that_outcome() {
    let store = store_with(single_event_snapshot());

    store.apply_odds_updates(&[OddsUpdate::new("outcome-1", 2.2)]);

    let state = store.state();
    assert_eq!(state.live_odds(&outcome_id("outcome-1")), Some(2.2));
    assert_eq!(state.pulse(&outcome_id("outcome-1")), Some(OddsPulse::Up));
    assert_eq!(state.live_odds(&outcome_id("outcome-2")), Some(3.0));
    assert_eq!(state.live_odds(&outcome_id("outcome-3")), Some(4.0));
    assert_eq!(state.pulse(&outcome_id("outcome-2")), None);
    assert_eq!(state.pulse(&outcome_id("outcome-3")), None);
}

#[test]
fn sample_payload_slip_flow() {
    let store = sample_store();
    let (arsenal, arsenal_home) = ids("1", "101");
    let (_, arsenal_away) = ids("1", "103");
    let (barca, barca_home) = ids("2", "201");

    assert!(store.select_outcome(&arsenal, &arsenal_home));
    assert!(store.select_outcome(&barca, &barca_home));
    assert!(store.select_outcome(&arsenal, &arsenal_away));
    store.set_stake(20.0);

    let state = store.state();
    assert_eq!(state.selection_count(), 2);
    assert_eq!(state.last_replaced_event_id(), Some(&arsenal));
    let expected_total = 3.6 * 1.45;
    assert!((selectors::total_odds(&state) - expected_total).abs() < 1e-9);
    assert!((selectors::potential_win(&state) - expected_total * 20.0).abs() < 1e-9);
    assert!(selectors::can_place_bet(&state));

    store.apply_odds_updates(&[OddsUpdate::new("201", 1.5)]);
    assert!(store.read(selectors::has_odds_changes));
    assert!(store.place_bet().is_none());

    store.accept_all_changes();
    let bet = store.place_bet().expect("slip is placeable after accepting");
    assert_eq!(bet.selections.len(), 2);
    assert!((bet.total_odds - 3.6 * 1.5).abs() < 1e-9);
    assert_eq!(store.state().selection_count(), 0);
}

#[test]
fn cross_event_outcome_is_rejected() {
    let store = sample_store();
    let (arsenal, _) = ids("1", "101");
    let (_, barca_home) = ids("2", "201");

    assert!(!store.select_outcome(&arsenal, &barca_home));
    assert!(!store.toggle_outcome(&arsenal, &barca_home));
    assert_eq!(store.state().selection_count(), 0);
}

#[test]
fn locked_outcome_cannot_be_picked_until_update_lands() {
    let store = sample_store();
    let (arsenal, home) = ids("1", "101");

    store.set_outcome_lock(&home, true);
    assert!(!store.select_outcome(&arsenal, &home));

    store.apply_odds_updates(&[OddsUpdate::new("101", 2.3)]);
    assert!(!store.state().is_locked(&home));
    assert!(store.select_outcome(&arsenal, &home));
    assert_eq!(
        store.state().selection(&arsenal).unwrap().selected_odds_snapshot,
        2.3
    );
}

#[test]
fn change_notifications_follow_actions() {
    let store = sample_store();
    let mut rx = store.subscribe();
    let (arsenal, home) = ids("1", "101");

    store.set_outcome_lock(&home, true);
    store.apply_odds_updates(&[OddsUpdate::new("101", 2.0)]);
    store.clear_outcome_pulse(&home);
    store.select_outcome(&arsenal, &home);

    let changes: Vec<StoreChange> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
    assert_eq!(changes.len(), 4, "{changes:?}");
    assert!(matches!(
        &changes[0],
        StoreChange::LocksChanged { locked: true, outcome_ids } if outcome_ids == &vec![home.clone()]
    ));
    match &changes[1] {
        StoreChange::OddsUpdated { movements } => {
            assert_eq!(movements.len(), 1);
            assert_eq!(movements[0].previous, Some(2.1));
            assert_eq!(movements[0].pulse, Some(OddsPulse::Down));
            assert!(movements[0].unlocked);
        }
        other => panic!("expected odds update, got {other:?}"),
    }
    assert_eq!(changes[2], StoreChange::PulseCleared { outcome_id: home });
    assert_eq!(changes[3], StoreChange::SelectionsChanged { count: 1 });
}

#[test]
fn concurrent_actions_keep_slip_consistent() {
    let store = sample_store();
    let outcomes = [("1", "101"), ("1", "102"), ("1", "103"), ("2", "201"), ("2", "202")];

    let users: Vec<_> = (0..4)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for round in 0..500 {
                    let (event, outcome) = outcomes[(worker + round) % outcomes.len()];
                    let (event, outcome) = ids(event, outcome);
                    if round % 3 == 0 {
                        store.toggle_outcome(&event, &outcome);
                    } else {
                        store.select_outcome(&event, &outcome);
                    }
                    if round % 7 == 0 {
                        store.accept_all_changes();
                    }
                }
            })
        })
        .collect();

    let feed = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for round in 0..500 {
                let (_, outcome) = outcomes[round % outcomes.len()];
                let id = betslip::domain::OutcomeId::from(outcome);
                store.set_outcome_lock(&id, true);
                let odds = 1.5 + (round % 10) as f64 / 10.0;
                store.apply_odds_updates(&[OddsUpdate::new(outcome, odds)]);
            }
        })
    };

    for handle in users {
        handle.join().expect("user thread");
    }
    feed.join().expect("feed thread");

    store.read(|state| {
        assert!(state.selection_count() <= 2);
        assert!(state.locked_outcomes().is_empty());
        for selection in state.selections() {
            assert!(state
                .catalogue()
                .outcome_belongs_to_event(&selection.event_id, &selection.outcome_id));
            assert!(is_valid_odds(selection.selected_odds_snapshot));
        }
    });
}

#[test]
fn store_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<BetSlipStore>();
}
