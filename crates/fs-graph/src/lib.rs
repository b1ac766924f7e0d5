//! fs-graph: flowsheet model and network decomposition.
//!
//! Provides:
//! - Material streams and the [`Unit`] contract
//! - Incremental flowsheet builder with wiring validation
//! - Recycle-aware decomposition of a flowsheet into a nested [`Network`]
//!
//! # Example
//!
//! ```
//! use fs_graph::{FlowsheetBuilder, NetworkBuilder, Stream, Unit, UnitResult};
//!
//! struct Mix;
//!
//! impl Unit for Mix {
//!     fn kind(&self) -> &'static str {
//!         "Mix"
//!     }
//!
//!     fn evaluate(&mut self, ins: &[Stream], outs: &mut [Stream]) -> UnitResult<()> {
//!         let total = ins.iter().fold(ins[0].mol() * 0.0, |acc, s| acc + s.mol());
//!         *outs[0].mol_mut() = total;
//!         Ok(())
//!     }
//! }
//!
//! let mut builder = FlowsheetBuilder::new("loop", 1);
//! let feed = builder.add_feed("feed", &[10.0]);
//! let recycle = builder.add_stream("recycle");
//! let mixed = builder.add_stream("mixed");
//! let product = builder.add_stream("product");
//! let m1 = builder.add_unit("M1", Mix, &[feed, recycle], &[mixed]);
//! let m2 = builder.add_unit("M2", Mix, &[mixed], &[product, recycle]);
//! let flowsheet = builder.build().unwrap();
//!
//! let network = NetworkBuilder::new(&flowsheet).build().unwrap();
//! assert_eq!(network.path(), vec![m1, m2]);
//! assert!(network.recycle().contains(&recycle));
//! ```

pub mod builder;
pub mod decompose;
pub mod error;
pub mod flowsheet;
pub mod network;
pub mod stream;
pub mod unit;
pub(crate) mod validate;

pub use builder::FlowsheetBuilder;
pub use decompose::{NetworkBuilder, build_network};
pub use error::{GraphError, GraphResult};
pub use flowsheet::{Flowsheet, UnitNode};
pub use network::{Element, Network};
pub use stream::Stream;
pub use unit::{Unit, UnitError, UnitResult};
