
use std::sync::Arc;
use std::thread;

use statefold::{Dispatcher, DispatcherBuilder, UnmatchedCase};
use strategies::{
    AccountEvent, AccountState, Active, Closed, Deposited, Frozen, FundsMoved, Open, Withdrawn,
};

fn ledger() -> Dispatcher<AccountState, AccountEvent> {
    DispatcherBuilder::<AccountState, AccountEvent>::new()
        .add_by_event_and_state_type::<Deposited, Open, _>(|open, deposited| {
            AccountState::Active(Active::Open(Open {
                balance: open.balance + deposited.amount,
                stamp: Some(0),
            }))
        })
        .add_by_event_and_state_type::<Withdrawn, Open, _>(|open, withdrawn| {
            AccountState::Active(Active::Open(Open {
                balance: open.balance - withdrawn.amount,
                stamp: Some(1),
            }))
        })
        .add_by_event_and_state_type::<Closed, Open, _>(|open, _| {
            AccountState::Active(Active::Frozen(Frozen {
                balance: open.balance,
                stamp: Some(2),
            }))
        })
        .build()
}

fn open(balance: i64) -> AccountState {
    AccountState::open(balance)
}

fn frozen(balance: i64) -> AccountState {
    AccountState::frozen(balance)
}

fn deposited(amount: i64) -> AccountEvent {
    AccountEvent::Funds(FundsMoved::Deposited(Deposited { amount }))
}

fn withdrawn(amount: i64) -> AccountEvent {
    AccountEvent::Funds(FundsMoved::Withdrawn(Withdrawn { amount }))
}

#[test]
fn apply_across_threads() {
    let dispatcher = Arc::new(ledger());

    let mut handles = vec![];

    // Thread 1: deposit into an open account
    let d = Arc::clone(&dispatcher);
    handles.push(thread::spawn(move || d.apply(&open(10), &deposited(5))));

    // Thread 2: withdraw from an open account
    let d = Arc::clone(&dispatcher);
    handles.push(thread::spawn(move || d.apply(&open(10), &withdrawn(3))));

    // Thread 3: closing freezes the account
    let d = Arc::clone(&dispatcher);
    handles.push(thread::spawn(move || {
        d.apply(&open(10), &AccountEvent::Closed(Closed))
    }));

    // Thread 4: frozen accounts accept nothing
    let d = Arc::clone(&dispatcher);
    handles.push(thread::spawn(move || d.apply(&frozen(10), &deposited(5))));

    let results: Vec<Result<AccountState, UnmatchedCase>> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(
        results[0],
        Ok(AccountState::Active(Active::Open(Open {
            balance: 15,
            stamp: Some(0)
        })))
    );
    assert_eq!(
        results[1],
        Ok(AccountState::Active(Active::Open(Open {
            balance: 7,
            stamp: Some(1)
        })))
    );
    assert_eq!(
        results[2],
        Ok(AccountState::Active(Active::Frozen(Frozen {
            balance: 10,
            stamp: Some(2)
        })))
    );
    assert_eq!(results[3], Err(UnmatchedCase::new("Deposited", "Frozen")));
}

#[test]
fn replay_histories_in_parallel() {
    let dispatcher = ledger();

    let histories: Vec<Vec<AccountEvent>> = (0..8_i64)
        .map(|n| {
            let mut history: Vec<AccountEvent> = (0..n).map(|i| deposited(i + 1)).collect();
            history.push(withdrawn(1));
            history
        })
        .collect();

    let balances: Vec<i64> = thread::scope(|scope| {
        let handles: Vec<_> = histories
            .iter()
            .map(|history| {
                let dispatcher = &dispatcher;
                scope.spawn(move || match dispatcher.fold(open(0), history) {
                    Ok(AccountState::Active(Active::Open(open))) => open.balance,
                    other => panic!("unexpected replay result: {other:?}"),
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (n, balance) in balances.into_iter().enumerate() {
        let n = n as i64;
        assert_eq!(balance, n * (n + 1) / 2 - 1);
    }
}

#[test]
fn cloned_dispatchers_share_rules_across_threads() {
    let dispatcher = ledger();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let d = dispatcher.clone();
            thread::spawn(move || d.apply(&open(i), &deposited(1)))
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(
            handle.join().unwrap(),
            Ok(AccountState::Active(Active::Open(Open {
                balance: i as i64 + 1,
                stamp: Some(0)
            })))
        );
    }
}
