//! ACES Hub is the data layer of an administrative dashboard for a student
//! organization: its member directory, events, announcements and budget.
//!
//! Each page's data is a [`Collection`] of [`Record`]s, seeded at startup
//! either from built-in data or from files named in a [`Config`]. Pages narrow
//! their collections down through a [`View`], which applies a [`Query`] (free
//! text plus facet selections) as a pure, order-preserving filter. For the
//! command line interface, see the `aceshub-cli` crate.

pub mod budget;
mod collection;
mod config;
pub mod dashboard;
mod datetime;
mod error;
mod hub;
mod query;
mod record;
pub mod seed;
mod source;
mod template;
mod value;
mod view;

pub use budget::{Budget, TransactionTotals};
pub use collection::Collection;
pub use config::{CollectionConfig, Config};
pub use datetime::{Date, DateTime};
pub use error::Error;
pub use hub::Hub;
pub use query::{Query, ALL};
pub use record::Record;
pub use source::{Source, SourceIter};
pub use template::Templates;
pub use value::{Map, SupportedFormat, Value, ValueType};
pub use view::{Facet, FacetKind, View};
