use std::sync::Arc;
use std::thread;

use statefold::{Case, DispatcherBuilder, Kind};

#[derive(Debug, Clone, PartialEq)]
struct Gauge {
    reading: i64,
}

enum GaugeEvent {
    Raised(Raised),
    Lowered(Lowered),
}

struct Raised(i64);

struct Lowered(i64);

impl Case<GaugeEvent> for Raised {
    fn narrow(event: &GaugeEvent) -> Option<&Self> {
        match event {
            GaugeEvent::Raised(raised) => Some(raised),
            GaugeEvent::Lowered(_) => None,
        }
    }
}

impl Case<GaugeEvent> for Lowered {
    fn narrow(event: &GaugeEvent) -> Option<&Self> {
        match event {
            GaugeEvent::Lowered(lowered) => Some(lowered),
            GaugeEvent::Raised(_) => None,
        }
    }
}

impl Kind for Gauge {
    fn kind(&self) -> &'static str {
        "Gauge"
    }
}

impl Kind for GaugeEvent {
    fn kind(&self) -> &'static str {
        match self {
            GaugeEvent::Raised(_) => "Raised",
            GaugeEvent::Lowered(_) => "Lowered",
        }
    }
}

fn main() {
    let dispatcher = Arc::new(
        DispatcherBuilder::<Gauge, GaugeEvent>::new()
            .add_by_event_type::<Raised, _>(|gauge, raised| Gauge {
                reading: gauge.reading + raised.0,
            })
            .add_by_event_type::<Lowered, _>(|gauge, lowered| Gauge {
                reading: gauge.reading - lowered.0,
            })
            .build(),
    );

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let d = Arc::clone(&dispatcher);
            thread::spawn(move || {
                let history: Vec<GaugeEvent> = (0..=i)
                    .map(|n| {
                        if n % 2 == 0 {
                            GaugeEvent::Raised(Raised(n + 1))
                        } else {
                            GaugeEvent::Lowered(Lowered(n))
                        }
                    })
                    .collect();

                let result = d.fold(Gauge { reading: 0 }, &history);
                println!("Thread {i}: {result:?}");
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
