//! End-to-end tests for the wallet ledger.
//!
//! Each test opens its own store, drives it only through the public
//! `Ledger` API, and checks the balance rules hold across a full
//! sequence of operations, across restarts, and under concurrency.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use wallet_ledger::config::DEFAULT_WALLET_TREE;
use wallet_ledger::wallet::OperationPayload;
use wallet_ledger::{Ledger, OperationRequest, WalletDb, WalletError};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn setup() -> Ledger {
    Ledger::new(WalletDb::open_temporary(DEFAULT_WALLET_TREE).expect("temp db"))
}

/// Opens a persistent ledger at `path` with sled's background flusher off,
/// retrying while a previous instance still holds the directory lock.
fn open_persistent(path: &Path) -> Ledger {
    for _ in 0..50 {
        let config = sled::Config::new().path(path).flush_every_ms(None);
        if let Ok(db) = WalletDb::open_with_config(config, DEFAULT_WALLET_TREE) {
            return Ledger::new(db);
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    panic!("could not open ledger at {}", path.display());
}

fn request(id: Uuid, operation_type: &str, amount: f64) -> Result<OperationRequest, WalletError> {
    OperationRequest::try_from(OperationPayload {
        wallet_id: id.to_string(),
        operation_type: operation_type.into(),
        amount,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn deposit_withdraw_read_overdraw_scenario() {
    let ledger = setup();
    let id = Uuid::new_v4();

    let created = ledger.apply(&request(id, "DEPOSIT", 100.0).unwrap()).unwrap();
    assert!(created.created());
    assert_eq!(created.balance, 100.0);

    let after_withdraw = ledger.apply(&request(id, "WITHDRAW", 30.0).unwrap()).unwrap();
    assert_eq!(after_withdraw.balance, 70.0);

    let wallet = ledger.balance(&id).unwrap();
    assert_eq!(wallet.wallet_id, id);
    assert_eq!(wallet.balance, 70.0);

    let err = ledger
        .apply(&request(id, "WITHDRAW", 1000.0).unwrap())
        .unwrap_err();
    assert!(matches!(err, WalletError::InsufficientFunds { .. }));
    assert_eq!(ledger.balance(&id).unwrap().balance, 70.0);
}

#[test]
fn invalid_operation_type_performs_no_mutation() {
    let ledger = setup();
    let id = Uuid::new_v4();
    ledger.apply(&request(id, "DEPOSIT", 10.0).unwrap()).unwrap();

    let err = request(id, "TRANSFER", 5.0).unwrap_err();
    assert!(matches!(err, WalletError::InvalidRequest(_)));
    assert_eq!(ledger.balance(&id).unwrap().balance, 10.0);
}

#[test]
fn negative_amount_is_rejected_before_touching_the_store() {
    let ledger = setup();
    let id = Uuid::new_v4();
    ledger.apply(&request(id, "DEPOSIT", 10.0).unwrap()).unwrap();

    assert!(matches!(
        request(id, "DEPOSIT", -50.0),
        Err(WalletError::InvalidRequest(_))
    ));
    assert_eq!(ledger.balance(&id).unwrap().balance, 10.0);
}

#[test]
fn balances_persist_across_restarts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let id = Uuid::new_v4();

    {
        let ledger = open_persistent(dir.path());
        ledger.apply(&OperationRequest::deposit(id, 12.5).unwrap()).unwrap();
    }

    let ledger = open_persistent(dir.path());
    assert_eq!(ledger.balance(&id).unwrap().balance, 12.5);
}

#[test]
fn concurrent_deposits_sum_exactly() {
    let ledger = Arc::new(setup());
    let id = Uuid::new_v4();
    let workers = 16;
    let deposits_each = 20;

    std::thread::scope(|s| {
        for _ in 0..workers {
            let ledger = Arc::clone(&ledger);
            s.spawn(move || {
                for _ in 0..deposits_each {
                    ledger.apply(&OperationRequest::deposit(id, 2.0).unwrap()).unwrap();
                }
            });
        }
    });

    let expected = (workers * deposits_each) as f64 * 2.0;
    assert_eq!(ledger.balance(&id).unwrap().balance, expected);
}

#[test]
fn concurrent_withdrawals_never_overdraw() {
    let ledger = Arc::new(setup());
    let id = Uuid::new_v4();
    ledger.apply(&OperationRequest::deposit(id, 50.0).unwrap()).unwrap();

    let successes: usize = std::thread::scope(|s| {
        let handles: Vec<_> = (0..100)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                s.spawn(move || ledger.apply(&OperationRequest::withdraw(id, 1.0).unwrap()).is_ok())
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap() as usize)
            .sum()
    });

    assert_eq!(successes, 50);
    assert_eq!(ledger.balance(&id).unwrap().balance, 0.0);
}

#[test]
fn different_wallets_are_independent() {
    let ledger = setup();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    ledger.apply(&OperationRequest::deposit(alice, 40.0).unwrap()).unwrap();
    ledger.apply(&OperationRequest::deposit(bob, 5.0).unwrap()).unwrap();
    ledger.apply(&OperationRequest::withdraw(alice, 15.0).unwrap()).unwrap();

    assert_eq!(ledger.balance(&alice).unwrap().balance, 25.0);
    assert_eq!(ledger.balance(&bob).unwrap().balance, 5.0);
    assert_eq!(ledger.db().wallet_count(), 2);
}
