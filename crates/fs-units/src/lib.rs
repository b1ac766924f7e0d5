//! fs-units: reference unit models for flowsheets.
//!
//! Provides:
//! - Pumps (pass-through with optional discharge pressure)
//! - Mixers (flow-weighted temperature)
//! - Splitters (uniform or per-component fractions)
//! - Process heat exchangers (effectiveness model)
//!
//! All models implement [`fs_graph::Unit`] and are deterministic functions
//! of their inlet streams, suitable for recycle convergence.
//!
//! # Example
//!
//! ```
//! use fs_graph::FlowsheetBuilder;
//! use fs_units::{Mixer, Splitter};
//!
//! let mut builder = FlowsheetBuilder::new("loop", 1);
//! let feed = builder.add_feed("feed", &[100.0]);
//! let recycle = builder.add_stream("recycle");
//! let mixed = builder.add_stream("mixed");
//! let product = builder.add_stream("product");
//! let m1 = builder.add_unit("M1", Mixer::new(), &[feed, recycle], &[mixed]);
//! builder.add_unit("S1", Splitter::new(0.5).unwrap(), &[mixed], &[product, recycle]);
//! let mut flowsheet = builder.build().unwrap();
//!
//! flowsheet.evaluate(m1).unwrap();
//! assert_eq!(flowsheet.stream(mixed).unwrap().total_flow(), 100.0);
//! ```

pub mod common;
pub mod heat_exchanger;
pub mod mixer;
pub mod pump;
pub mod splitter;

pub use heat_exchanger::HeatExchanger;
pub use mixer::Mixer;
pub use pump::Pump;
pub use splitter::{Split, Splitter};
