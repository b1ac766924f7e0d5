//! Reference flowsheets shared by the system tests.
#![allow(dead_code)]

use std::collections::HashMap;

use fs_core::units::k;
use fs_core::{Real, StreamId};
use fs_graph::{Flowsheet, FlowsheetBuilder, Unit};
use fs_sim::System;
use fs_units::{HeatExchanger, Mixer, Pump, Splitter};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Flowsheet builder addressing streams by name.
pub struct Sheet {
    builder: FlowsheetBuilder,
    streams: HashMap<String, StreamId>,
}

impl Sheet {
    pub fn new(name: &str) -> Self {
        Self {
            builder: FlowsheetBuilder::new(name, 1),
            streams: HashMap::new(),
        }
    }

    pub fn feed(&mut self, name: &str, flow: Real, temperature: Real) {
        let id = self.builder.add_feed(name, &[flow]);
        self.builder.set_temperature(id, k(temperature));
        self.streams.insert(name.to_string(), id);
    }

    fn stream(&mut self, name: &str) -> StreamId {
        if let Some(&id) = self.streams.get(name) {
            return id;
        }
        let id = self.builder.add_stream(name);
        self.streams.insert(name.to_string(), id);
        id
    }

    pub fn unit(&mut self, name: &str, model: impl Unit + 'static, ins: &[&str], outs: &[&str]) {
        let ins: Vec<StreamId> = ins.iter().map(|s| self.stream(s)).collect();
        let outs: Vec<StreamId> = outs.iter().map(|s| self.stream(s)).collect();
        self.builder.add_unit(name, model, &ins, &outs);
    }

    pub fn pump(&mut self, name: &str, inlet: &str, outlet: &str) {
        self.unit(name, Pump::new(), &[inlet], &[outlet]);
    }

    pub fn mixer(&mut self, name: &str, ins: &[&str], outlet: &str) {
        self.unit(name, Mixer::new(), ins, &[outlet]);
    }

    pub fn splitter(&mut self, name: &str, inlet: &str, outs: [&str; 2]) {
        self.unit(name, half(), &[inlet], &outs);
    }

    pub fn exchanger(&mut self, name: &str, ins: [&str; 2], outs: [&str; 2]) {
        let hx = HeatExchanger::new(0.5).unwrap();
        self.unit(name, hx, &ins, &outs);
    }

    pub fn build(self) -> Flowsheet {
        self.builder.build().unwrap()
    }
}

fn half() -> Splitter {
    Splitter::new(0.5).unwrap()
}

pub fn system(flowsheet: Flowsheet) -> System {
    System::new(flowsheet).unwrap()
}

/// Mixer with a recycle from the splitter right after it.
pub fn single_loop() -> Flowsheet {
    let mut s = Sheet::new("single_loop");
    s.feed("feedstock", 1000.0, 298.15);
    s.feed("water", 10.0, 298.15);
    s.mixer("M1", &["feedstock", "water", "recycle"], "mixed");
    s.splitter("S1", "mixed", ["product", "recycle"]);
    s.build()
}

/// `single_loop` with a pump on each feed.
pub fn pumped_loop() -> Flowsheet {
    let mut s = Sheet::new("pumped_loop");
    s.feed("feedstock", 1000.0, 298.15);
    s.feed("water", 10.0, 298.15);
    s.pump("P1", "feedstock", "p1");
    s.pump("P2", "water", "p2");
    s.mixer("M1", &["p1", "p2", "recycle"], "mixed");
    s.splitter("S1", "mixed", ["product", "recycle"]);
    s.build()
}

/// Inner splitter loop inside an outer mixer/splitter loop.
pub fn nested_loops() -> Flowsheet {
    let mut s = Sheet::new("nested_loops");
    s.feed("feedstock", 1000.0, 350.0);
    s.feed("water", 10.0, 298.15);
    s.feed("inner_water", 10.0, 320.0);
    s.pump("P1", "feedstock", "p1");
    s.pump("P2", "water", "p2");
    s.pump("P3", "inner_water", "p3");
    s.mixer("M1", &["p1", "p2", "recycle"], "m1");
    s.mixer("M2", &["m1", "p3", "inner"], "m2");
    s.splitter("S2", "m2", ["s2", "inner"]);
    s.splitter("S1", "s2", ["product", "recycle"]);
    s.build()
}

/// Two loops with nothing in common.
pub fn independent_loops() -> Flowsheet {
    let mut s = Sheet::new("independent_loops");
    s.feed("feed_a", 100.0, 300.0);
    s.feed("feed_b", 50.0, 340.0);
    s.pump("P1", "feed_a", "a");
    s.mixer("M1", &["a", "r1"], "m1");
    s.splitter("S1", "m1", ["product_a", "r1"]);
    s.pump("P2", "feed_b", "b");
    s.mixer("M2", &["b", "r2"], "m2");
    s.splitter("S2", "m2", ["product_b", "r2"]);
    s.build()
}

/// The inner loop closes through a second splitter after the shared mixer.
pub fn partial_overlap() -> Flowsheet {
    let mut s = Sheet::new("partial_overlap");
    s.feed("feedstock", 1000.0, 298.15);
    s.feed("water", 10.0, 298.15);
    s.feed("inner_water", 10.0, 298.15);
    s.pump("P1", "feedstock", "p1");
    s.pump("P2", "water", "p2");
    s.pump("P3", "inner_water", "p3");
    s.mixer("M1", &["p1", "p2", "recycle"], "m1");
    s.mixer("M2", &["m1", "p3", "inner"], "m2");
    s.splitter("S2", "m2", ["a", "b"]);
    s.splitter("S3", "a", ["coproduct", "inner"]);
    s.splitter("S1", "b", ["product", "recycle"]);
    s.build()
}

/// Two loops entering at the same mixer.
pub fn feed_forward() -> Flowsheet {
    let mut s = Sheet::new("feed_forward");
    s.feed("feedstock", 1000.0, 298.15);
    s.feed("water", 10.0, 298.15);
    s.pump("P1", "feedstock", "p1");
    s.pump("P2", "water", "p2");
    s.mixer("M1", &["p1", "recycle", "inner"], "m1");
    s.splitter("S1", "m1", ["s1", "recycle"]);
    s.mixer("M2", &["p2", "s1"], "m2");
    s.splitter("S2", "m2", ["inner", "product"]);
    s.pump("P3", "product", "p3");
    s.build()
}

/// Five recycles three levels deep, with process heat exchangers.
pub fn deep_nesting() -> Flowsheet {
    let mut s = Sheet::new("deep_nesting");
    s.feed("feedstock", 1000.0, 360.0);
    for f in ["feed_1", "feed_2", "feed_3", "feed_4"] {
        s.feed(f, 10.0, 300.0);
    }
    s.pump("P1", "feedstock", "x1");
    s.mixer("M1", &["x1", "r1"], "x2");
    s.pump("P2", "x2", "x3");
    s.exchanger("H1", ["x3", "r2"], ["h10", "h11"]);
    s.pump("P3", "feed_1", "x4");
    s.mixer("M3", &["h10", "x4"], "r2");
    s.pump("P4", "h11", "x5");
    s.mixer("M4", &["x5", "r3"], "x6");
    s.pump("P5", "feed_2", "x7");
    s.pump("P6", "feed_3", "x8");
    s.mixer("M5", &["x6", "x7", "x8"], "x9");
    s.exchanger("H2", ["x9", "r4"], ["h20", "h21"]);
    s.pump("P7", "feed_4", "x10");
    s.mixer("M6", &["h20", "x10"], "x11");
    s.splitter("S1", "x11", ["r4", "s11"]);
    s.splitter("S2", "h21", ["s20", "s21"]);
    s.pump("P8", "s21", "x12");
    s.splitter("S3", "x12", ["s30", "s31"]);
    s.exchanger("H3", ["s20", "r5"], ["h30", "r3"]);
    s.mixer("M7", &["h30", "s30"], "x13");
    s.splitter("S4", "x13", ["s40", "r5"]);
    s.splitter("S5", "s40", ["s50", "r1"]);
    s.mixer("M8", &["s31", "s11", "s50"], "product");
    s.build()
}

/// Converged state of every stream, by name.
pub fn snapshot(system: &System) -> Vec<(String, Real, Real)> {
    system
        .flowsheet()
        .streams()
        .iter()
        .map(|s| (s.name().to_string(), s.total_flow(), s.temperature().value))
        .collect()
}

/// Assert two snapshots agree within `rtol`.
pub fn assert_close(a: &[(String, Real, Real)], b: &[(String, Real, Real)], rtol: Real) {
    assert_eq!(a.len(), b.len());
    for ((name, fa, ta), (_, fb, tb)) in a.iter().zip(b) {
        assert!(
            (fa - fb).abs() <= rtol * fb.abs() + 1e-6,
            "flow of {name}: {fa} vs {fb}"
        );
        assert!(
            (ta - tb).abs() <= rtol * tb.abs() + 1e-6,
            "temperature of {name}: {ta} vs {tb}"
        );
    }
}
