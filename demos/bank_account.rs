use statefold::{Case, DispatcherBuilder, Kind};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq)]
enum Account {
    Open(Open),
    Closed { balance: i64 },
}

#[derive(Debug, Clone, PartialEq)]
struct Open {
    balance: i64,
}

enum AccountEvent {
    Deposited(Deposited),
    Withdrawn(Withdrawn),
    Closed,
}

struct Deposited {
    amount: i64,
}

struct Withdrawn {
    amount: i64,
}

impl Case<AccountEvent> for Deposited {
    fn narrow(event: &AccountEvent) -> Option<&Self> {
        match event {
            AccountEvent::Deposited(deposited) => Some(deposited),
            _ => None,
        }
    }
}

impl Case<AccountEvent> for Withdrawn {
    fn narrow(event: &AccountEvent) -> Option<&Self> {
        match event {
            AccountEvent::Withdrawn(withdrawn) => Some(withdrawn),
            _ => None,
        }
    }
}

impl Case<Account> for Open {
    fn narrow(account: &Account) -> Option<&Self> {
        match account {
            Account::Open(open) => Some(open),
            Account::Closed { .. } => None,
        }
    }
}

impl Kind for Account {
    fn kind(&self) -> &'static str {
        match self {
            Account::Open(_) => "Open",
            Account::Closed { .. } => "Closed",
        }
    }
}

impl Kind for AccountEvent {
    fn kind(&self) -> &'static str {
        match self {
            AccountEvent::Deposited(_) => "Deposited",
            AccountEvent::Withdrawn(_) => "Withdrawn",
            AccountEvent::Closed => "Closed",
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let dispatcher = DispatcherBuilder::<Account, AccountEvent>::new()
        .add_by_event_type::<Deposited, _>(|account, deposited| match account {
            Account::Open(open) => Account::Open(Open {
                balance: open.balance + deposited.amount,
            }),
            closed => closed.clone(),
        })
        .add_by_event_type::<Withdrawn, _>(|account, withdrawn| match account {
            Account::Open(open) => Account::Open(Open {
                balance: open.balance - withdrawn.amount,
            }),
            closed => closed.clone(),
        })
        .add_catch_all(|account, event| match (account, event) {
            (Account::Open(open), AccountEvent::Closed) => Account::Closed {
                balance: open.balance,
            },
            (other, _) => other.clone(),
        });

    println!("{dispatcher}");

    let history = [
        AccountEvent::Deposited(Deposited { amount: 100 }),
        AccountEvent::Withdrawn(Withdrawn { amount: 30 }),
        AccountEvent::Deposited(Deposited { amount: 5 }),
        AccountEvent::Closed,
        AccountEvent::Deposited(Deposited { amount: 1_000 }),
    ];

    match dispatcher.fold(Account::Open(Open { balance: 0 }), &history) {
        Ok(account) => println!("Replayed account: {account:?}"),
        Err(err) => println!("Replay failed: {err}"),
    }

    // Without a catch-all, a state-specific table rejects unknown pairs.
    let strict = DispatcherBuilder::<Account, AccountEvent>::new()
        .add_by_event_and_state_type::<Deposited, Open, _>(|open, deposited| {
            Account::Open(Open {
                balance: open.balance + deposited.amount,
            })
        })
        .build();

    let closed = Account::Closed { balance: 75 };
    let event = AccountEvent::Deposited(Deposited { amount: 10 });
    match strict.apply(&closed, &event) {
        Ok(account) => println!("Applied: {account:?}"),
        Err(err) => println!("Rejected: {err}"),
    }
}
