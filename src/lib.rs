//! colframe - Immutable in-memory columnar tables
//!
//! Typed, nullable columns combined into tables, with the usual verbs
//! (select, filter, mutate, sort, summarize), grouping, sort-merge joins and
//! reshaping between long and wide layouts. Every operation returns a new
//! table and leaves its inputs untouched.
//!
//! ```
//! use colframe::{formula, table_of, Frame};
//!
//! let sleep = table_of!("order", "hours"; "Carnivora", 12.1, "Primates", 17.0, "Carnivora", 10.1)?;
//! let summary = sleep
//!     .group_by(&["order"])?
//!     .summarize(&[formula("n", |t: &colframe::Table| Ok(t.nrow()))])?;
//! assert_eq!(summary.nrow(), 2);
//! # Ok::<(), colframe::FrameError>(())
//! ```

pub mod config;
pub mod error;
pub mod group;
pub mod io;
pub mod join;
pub mod model;
pub mod output;
pub mod reshape;
pub mod select;
pub mod verbs;

pub use config::Config;
pub use error::{FrameError, Result};
pub use group::{DataGroup, GroupedTable};
pub use join::{JoinOptions, JoinType};
pub use model::{Column, ColumnData, ColumnKind, GroupKey, Object, Row, Table, TableBuilder, Value};
pub use select::Selector;
pub use verbs::{asc, desc, formula, Computed, Formula, Frame, SortKey};
