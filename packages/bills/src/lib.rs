//! Parlamento Bills - bill records and legislative stage inference.
//!
//! Takes the intermediate records produced by the chamber search-page
//! scraper and turns them into Popolo bill documents with an inferred
//! lifecycle stage.
//!
//! # Architecture
//!
//! - [`raw`]: scraper output ([`RawBill`], dictums, procedures)
//! - [`models`]: Popolo output records ([`Bill`], [`Paperwork`], [`Directive`], [`Stage`])
//! - [`dates`]: date parsing for the site's formats
//! - [`normalize`]: structural mapping from raw to output records
//! - [`stage`]: the rule-based stage classifier
//! - [`error`]: error types and Result alias

pub mod dates;
pub mod error;
pub mod models;
pub mod normalize;
pub mod raw;
pub mod stage;

pub use error::{BillError, Result};
pub use models::{Bill, ChamberRelation, Directive, Paperwork, Stage};
pub use raw::{Dictum, Procedure, RawBill, Subscriber};
pub use stage::{classify, ClassifyContext};
