//! Material balance holds at the fixed point for arbitrary loop parameters.

mod common;

use common::Sheet;
use fs_units::Splitter;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn product_carries_every_feed(
        feed in 1.0f64..5000.0,
        water in 0.0f64..100.0,
        fraction in 0.1f64..0.9,
    ) {
        let mut s = Sheet::new("balance");
        s.feed("feed", feed, 330.0);
        s.feed("water", water, 290.0);
        s.mixer("M1", &["feed", "water", "recycle"], "mixed");
        s.unit("S1", Splitter::new(fraction).unwrap(), &["mixed"], &["product", "recycle"]);
        let mut system = fs_sim::System::new(s.build()).unwrap();
        system.simulate().unwrap();

        let total = feed + water;
        let product = system.stream("product").unwrap().total_flow();
        let recycle = system.stream("recycle").unwrap().total_flow();
        prop_assert!((product - total).abs() <= 1e-2 * total);
        prop_assert!((recycle - total * (1.0 - fraction) / fraction).abs() <= 1e-2 * total / fraction);

        let t = system.stream("product").unwrap().temperature().value;
        let t_mix = (feed * 330.0 + water * 290.0) / total;
        prop_assert!((t - t_mix).abs() <= 1e-2 * t_mix);
    }
}
