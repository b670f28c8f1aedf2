use statefold::{Case, DispatcherBuilder, Kind};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, PartialEq)]
struct Cart {
    items: u32,
    checked_out: bool,
}

enum CartEvent {
    Added(Added),
    Removed(Removed),
    CheckedOut,
}

struct Added {
    count: u32,
}

struct Removed {
    count: u32,
}

impl Case<CartEvent> for Added {
    fn narrow(event: &CartEvent) -> Option<&Self> {
        match event {
            CartEvent::Added(added) => Some(added),
            _ => None,
        }
    }
}

impl Case<CartEvent> for Removed {
    fn narrow(event: &CartEvent) -> Option<&Self> {
        match event {
            CartEvent::Removed(removed) => Some(removed),
            _ => None,
        }
    }
}

impl Kind for Cart {
    fn kind(&self) -> &'static str {
        "Cart"
    }
}

impl Kind for CartEvent {
    fn kind(&self) -> &'static str {
        match self {
            CartEvent::Added(_) => "Added",
            CartEvent::Removed(_) => "Removed",
            CartEvent::CheckedOut => "CheckedOut",
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(
            "statefold=debug".parse().expect("valid directive"),
        ))
        .init();

    let items = DispatcherBuilder::<Cart, CartEvent>::new()
        .add_by_event_type::<Added, _>(|cart, added| Cart {
            items: cart.items + added.count,
            ..cart.clone()
        })
        .add_by_event_type::<Removed, _>(|cart, removed| Cart {
            items: cart.items.saturating_sub(removed.count),
            ..cart.clone()
        });

    // An overriding table placed first wins for every event it handles.
    let frozen_once_checked_out = DispatcherBuilder::<Cart, CartEvent>::new()
        .add_by_event_type::<CartEvent, _>(|cart, event| match event {
            CartEvent::CheckedOut => Cart {
                checked_out: true,
                ..cart.clone()
            },
            _ if cart.checked_out => cart.clone(),
            CartEvent::Added(added) => Cart {
                items: cart.items + added.count,
                ..cart.clone()
            },
            CartEvent::Removed(removed) => Cart {
                items: cart.items.saturating_sub(removed.count),
                ..cart.clone()
            },
        });

    let plain = items.build();
    let composed = frozen_once_checked_out.compose(items).build();

    println!("plain:    {plain}");
    println!("composed: {composed}");
    for (i, rule) in composed.rule_order().iter().enumerate() {
        println!("  #{i}: {rule}");
    }
    println!("unreachable rules: {}", composed.unreachable_rules());

    let history = [
        CartEvent::Added(Added { count: 3 }),
        CartEvent::CheckedOut,
        CartEvent::Added(Added { count: 2 }),
    ];
    let empty = Cart {
        items: 0,
        checked_out: false,
    };

    println!("plain replay:    {:?}", plain.fold(empty.clone(), &history));
    println!("composed replay: {:?}", composed.fold(empty, &history));

    // Runtime fallback chaining of two finished dispatchers.
    let ignore_rest =
        DispatcherBuilder::<Cart, CartEvent>::new().add_catch_all(|cart, _| cart.clone());
    let lenient = plain.or_else(&ignore_rest);
    println!("lenient: {lenient}");
    println!(
        "lenient checkout: {:?}",
        lenient.apply(
            &Cart {
                items: 1,
                checked_out: false
            },
            &CartEvent::CheckedOut
        )
    );
}
