//! fs-sim: flowsheet systems.
//!
//! A [`System`] owns a flowsheet and the nested network derived from it,
//! and exposes the operations callers use: `simulate`, `flatten`,
//! `empty_recycles` and the read-only `path`.
//!
//! # Example
//!
//! ```
//! use fs_graph::FlowsheetBuilder;
//! use fs_sim::System;
//! use fs_units::{Mixer, Splitter};
//!
//! let mut builder = FlowsheetBuilder::new("loop", 1);
//! let feed = builder.add_feed("feed", &[100.0]);
//! let recycle = builder.add_stream("recycle");
//! let mixed = builder.add_stream("mixed");
//! let product = builder.add_stream("product");
//! builder.add_unit("M1", Mixer::new(), &[feed, recycle], &[mixed]);
//! builder.add_unit("S1", Splitter::new(0.5).unwrap(), &[mixed], &[product, recycle]);
//!
//! let mut system = System::new(builder.build().unwrap()).unwrap();
//! system.simulate().unwrap();
//!
//! let product = system.stream("product").unwrap();
//! assert!((product.total_flow() - 100.0).abs() < 0.1);
//! assert_eq!(system.path_names(), ["M1", "S1"]);
//! ```

pub mod error;
pub mod system;

pub use error::{SimError, SimResult};
pub use system::System;
