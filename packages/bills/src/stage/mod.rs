//! Legislative stage inference.
//!
//! [`classify`] turns a [`RawBill`] into a Popolo [`Bill`] with its current
//! [`Stage`]. It never fails: malformed events are logged and skipped.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use parlamento_bills::{classify, ClassifyContext, RawBill, Stage};
//!
//! let raw = RawBill::from_json(r#"{
//!     "file": "0001-D-2016",
//!     "type": "PROYECTO DE LEY",
//!     "source": "Diputados",
//!     "creationTime": "01/03/2016",
//!     "lawNumber": "27300"
//! }"#).unwrap();
//!
//! let today = NaiveDate::from_ymd_opt(2017, 6, 1).unwrap();
//! let bill = classify(raw, &ClassifyContext::at(today));
//! assert_eq!(bill.stage, Stage::Approved);
//! ```

mod rules;
pub mod table;

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{Bill, Stage};
use crate::normalize::normalize;
use crate::raw::RawBill;

pub use rules::{
    dictum_rule, directive_outcome, directive_rule, expiry_rule, law_rule, legislative_year,
    project_duration, DirectiveOutcome, Rule, EXTENDED_PROJECT_DURATION, PROJECT_DURATION, RULES,
};

/// External inputs to classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifyContext {
    /// Date the expiry rule measures parliamentary periods against.
    pub today: NaiveDate,
}

impl ClassifyContext {
    /// Context for the current local date.
    pub fn today() -> Self {
        Self {
            today: chrono::Local::now().date_naive(),
        }
    }

    /// Context pinned to a fixed date.
    pub fn at(today: NaiveDate) -> Self {
        Self { today }
    }
}

/// Normalize a raw bill and infer its stage.
pub fn classify(raw: RawBill, ctx: &ClassifyContext) -> Bill {
    let mut bill = normalize(&raw);
    bill.stage = infer_stage(&bill, &raw, ctx);
    bill
}

/// Run [`RULES`] over a normalized bill, starting from [`Stage::Submitted`].
pub fn infer_stage(bill: &Bill, raw: &RawBill, ctx: &ClassifyContext) -> Stage {
    RULES
        .iter()
        .fold(Stage::Submitted, |stage, (name, rule)| match rule(bill, raw, ctx) {
            Some(next) => {
                debug!(uid = %bill.uid, rule = name, from = %stage, to = %next, "stage rule applied");
                next
            }
            None => stage,
        })
}
