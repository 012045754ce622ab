//! Ordered stage rules.
//!
//! Each rule looks at the normalized bill and the raw record and either
//! proposes a stage or abstains. Rules run in [`RULES`] order and the last
//! proposal wins.

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use super::table::{self, StepClass};
use super::ClassifyContext;
use crate::models::{Bill, ChamberRelation, Directive, Stage};
use crate::raw::RawBill;

/// A single stage rule.
pub type Rule = fn(&Bill, &RawBill, &ClassifyContext) -> Option<Stage>;

/// Rules in application order. Later rules override earlier ones.
///
/// The law rule runs before the expiry rule, so an enacted bill older than
/// its parliamentary period still ends up [`Stage::ParliamentaryStatusLost`].
pub const RULES: [(&str, Rule); 4] = [
    ("dictum", dictum_rule),
    ("directive", directive_rule),
    ("law", law_rule),
    ("expiry", expiry_rule),
];

/// Years a bill keeps parliamentary status.
pub const PROJECT_DURATION: i32 = 2;

/// Duration once a half sanction lands in a later year than the bill's creation.
pub const EXTENDED_PROJECT_DURATION: i32 = 3;

/// First month in which a bill reaching the end of its period is considered lapsed.
const EXPIRY_MONTH: u32 = 4;

/// Bills created in January or February belong to the previous period.
const PERIOD_START_MONTH: u32 = 3;

/// Interpretation of one directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveOutcome {
    Stage(Stage),
    Ignored,
    UnknownStep,
    UnknownStage,
}

/// Last committee dictum decides between origin and revisory dictum.
pub fn dictum_rule(bill: &Bill, _raw: &RawBill, _ctx: &ClassifyContext) -> Option<Stage> {
    bill.paperworks
        .last()
        .map(|paperwork| match paperwork.timeline_status {
            ChamberRelation::Origin => Stage::DictumOrigin,
            ChamberRelation::Revisory => Stage::DictumRevisory,
        })
}

/// Floor procedures, last recognized one wins.
pub fn directive_rule(bill: &Bill, _raw: &RawBill, _ctx: &ClassifyContext) -> Option<Stage> {
    let mut stage = None;

    for directive in &bill.directives {
        match directive_outcome(bill, directive) {
            DirectiveOutcome::Stage(next) => stage = Some(next),
            DirectiveOutcome::Ignored => {}
            DirectiveOutcome::UnknownStep => {
                warn!(
                    uid = %bill.uid,
                    step = directive.step.as_deref().unwrap_or_default(),
                    "unrecognized directive step"
                );
            }
            DirectiveOutcome::UnknownStage => {
                warn!(
                    uid = %bill.uid,
                    step = directive.step.as_deref().unwrap_or_default(),
                    stage = ?directive.stage,
                    "unrecognized directive stage"
                );
            }
        }
    }

    stage
}

/// A law number means the bill was enacted, whatever the procedures say.
pub fn law_rule(_bill: &Bill, raw: &RawBill, _ctx: &ClassifyContext) -> Option<Stage> {
    raw.has_law_number().then_some(Stage::Approved)
}

/// Bills past their parliamentary period lose status.
pub fn expiry_rule(bill: &Bill, raw: &RawBill, ctx: &ClassifyContext) -> Option<Stage> {
    let created = bill.creation_date?;
    let end_year = legislative_year(created) + project_duration(bill);
    let today = ctx.today;

    let lapsed = end_year < today.year()
        || (end_year == today.year() && today.month() >= EXPIRY_MONTH);

    if lapsed && raw.has_law_number() {
        warn!(
            uid = %bill.uid,
            law_number = raw.law_number.as_deref().unwrap_or_default(),
            "enacted bill is past its parliamentary period, marking as lost"
        );
    }

    lapsed.then_some(Stage::ParliamentaryStatusLost)
}

/// Interpret one directive relative to the bill's origin chamber.
pub fn directive_outcome(bill: &Bill, directive: &Directive) -> DirectiveOutcome {
    let relation = ChamberRelation::between(&bill.source, &directive.source);
    let step = directive.step.as_deref().unwrap_or_default();

    match table::gate(relation).classify(step) {
        StepClass::Relevant => match table::lookup(relation, directive.stage.as_deref()) {
            Some(stage) => DirectiveOutcome::Stage(stage),
            None => DirectiveOutcome::UnknownStage,
        },
        StepClass::Ignored => DirectiveOutcome::Ignored,
        StepClass::Unknown => DirectiveOutcome::UnknownStep,
    }
}

/// Parliamentary period length for a bill, in years.
///
/// Extended when the origin chamber gave a half sanction in a calendar year
/// after the bill's creation.
pub fn project_duration(bill: &Bill) -> i32 {
    let Some(created) = bill.creation_date else {
        return PROJECT_DURATION;
    };

    let extended = bill.directives.iter().any(|directive| {
        ChamberRelation::between(&bill.source, &directive.source) == ChamberRelation::Origin
            && directive_outcome(bill, directive) == DirectiveOutcome::Stage(Stage::HalfSanction)
            && directive.date.is_some_and(|d| d.year() > created.year())
    });

    if extended {
        EXTENDED_PROJECT_DURATION
    } else {
        PROJECT_DURATION
    }
}

/// Legislative year a creation date belongs to.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use parlamento_bills::stage::legislative_year;
///
/// let feb = NaiveDate::from_ymd_opt(2016, 2, 28).unwrap();
/// let mar = NaiveDate::from_ymd_opt(2016, 3, 1).unwrap();
/// assert_eq!(legislative_year(feb), 2015);
/// assert_eq!(legislative_year(mar), 2016);
/// ```
pub fn legislative_year(created: NaiveDate) -> i32 {
    if created.month() < PERIOD_START_MONTH {
        created.year() - 1
    } else {
        created.year()
    }
}
