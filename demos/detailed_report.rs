use statefold::{Case, DispatcherBuilder, Kind};

#[derive(Debug, Clone, PartialEq)]
enum Light {
    Off,
    On(On),
}

#[derive(Debug, Clone, PartialEq)]
struct On {
    level: u8,
}

enum Switch {
    Toggle,
    Dim(Dim),
}

struct Dim {
    to: u8,
}

impl Case<Light> for On {
    fn narrow(light: &Light) -> Option<&Self> {
        match light {
            Light::On(on) => Some(on),
            Light::Off => None,
        }
    }
}

impl Case<Switch> for Dim {
    fn narrow(switch: &Switch) -> Option<&Self> {
        match switch {
            Switch::Dim(dim) => Some(dim),
            Switch::Toggle => None,
        }
    }
}

impl Kind for Light {
    fn kind(&self) -> &'static str {
        match self {
            Light::Off => "Off",
            Light::On(_) => "On",
        }
    }
}

impl Kind for Switch {
    fn kind(&self) -> &'static str {
        match self {
            Switch::Toggle => "Toggle",
            Switch::Dim(_) => "Dim",
        }
    }
}

fn main() {
    let dispatcher = DispatcherBuilder::<Light, Switch>::new()
        .add_by_event_and_state_type::<Dim, On, _>(|_, dim| Light::On(On { level: dim.to }))
        .add_by_event_type::<Switch, _>(|light, switch| match (light, switch) {
            (Light::Off, Switch::Toggle) => Light::On(On { level: 100 }),
            (Light::On(_), Switch::Toggle) => Light::Off,
            (other, Switch::Dim(_)) => other.clone(),
        })
        .build();

    let report =
        dispatcher.apply_detailed(&Light::On(On { level: 100 }), &Switch::Dim(Dim { to: 40 }));

    println!("{report}");
    println!();
    println!("Rule order: {:?}", dispatcher.rule_order());
    println!("Fired rule: {:?}", report.rule());
    println!("Rules examined: {}", report.examined());
    println!("Duration: {:?}", report.duration());

    let empty = DispatcherBuilder::<Light, Switch>::new().build();
    let report = empty.apply_detailed(&Light::Off, &Switch::Toggle);
    println!();
    println!("{report}");
}
