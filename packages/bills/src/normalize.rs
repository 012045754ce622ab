//! Structural mapping from [`RawBill`] to the Popolo [`Bill`] record.
//!
//! No stage inference happens here; the returned bill is always
//! [`Stage::Submitted`] until the classifier runs over it.

use chrono::NaiveDate;
use tracing::{debug, error, info, warn};

use crate::dates::{communicated_date, parse_date};
use crate::models::{Bill, ChamberRelation, Directive, Paperwork, Stage};
use crate::raw::{Dictum, Procedure, RawBill};

/// Stage label carried by every committee record.
pub const DICTUM_STAGE: &str = "DICTAMENES DE COMISION";

/// Chamber whose untitled procedures are roll-call votes.
pub const SENATE: &str = "Senado";

/// Topic assigned to untitled Senate procedures.
pub const SENATE_DEFAULT_TOPIC: &str = "Votación";

/// Prefix stripped from the bill type to get the project type.
pub const PROJECT_TYPE_PREFIX: &str = "PROYECTO DE ";

/// Title used when the scraper found no summary.
pub const MISSING_TITLE: &str = "ERROR: proyecto sin sumario";

/// Dictum results mentioning an article routinely come without a date.
const UNDATED_DICTUM_MARKER: &str = "ARTICULO";

/// Map a raw bill onto the output record, leaving the stage at its initial value.
pub fn normalize(raw: &RawBill) -> Bill {
    let creation_date = creation_date(raw);

    Bill {
        uid: raw.file.clone(),
        title: title(raw),
        creation_date,
        source: raw.source.clone(),
        initial_chamber: raw.source.clone(),
        bill_draft_link: raw.text_url.clone(),
        subject_areas: raw.committees.clone(),
        authors: raw.subscribers.iter().map(|s| s.name.clone()).collect(),
        paperworks: raw
            .dictums
            .iter()
            .map(|d| paperwork(raw, d, creation_date))
            .collect(),
        directives: raw
            .procedures
            .iter()
            .map(|p| directive(raw, p, creation_date))
            .collect(),
        law_number: raw.law_number.clone(),
        stage: Stage::Submitted,
        project_type: project_type(&raw.bill_type),
        current_priority: None,
        priorities: Vec::new(),
        reports: Vec::new(),
        documents: Vec::new(),
        remarks: Vec::new(),
        revisions: Vec::new(),
    }
}

/// Parse the bill's creation date, logging when the scraper sent garbage.
pub fn creation_date(raw: &RawBill) -> Option<NaiveDate> {
    match parse_date(&raw.creation_time) {
        Ok(date) => Some(date),
        Err(e) => {
            error!(uid = %raw.file, error = %e, "unparseable creation date");
            None
        }
    }
}

/// Bill title from the summary, with `%` escaped for the store's formatter.
pub fn title(raw: &RawBill) -> String {
    match raw.summary.as_deref() {
        Some(summary) => escape_percent(summary),
        None => {
            warn!(uid = %raw.file, "bill has no summary");
            MISSING_TITLE.to_string()
        }
    }
}

/// Escape literal `%` characters as `%%`.
pub fn escape_percent(text: &str) -> String {
    text.replace('%', "%%")
}

/// Strip the `PROYECTO DE ` prefix from a bill type.
///
/// # Examples
/// ```
/// use parlamento_bills::normalize::project_type;
///
/// assert_eq!(project_type("PROYECTO DE LEY"), "LEY");
/// assert_eq!(project_type("MENSAJE"), "MENSAJE");
/// ```
pub fn project_type(bill_type: &str) -> String {
    bill_type
        .strip_prefix(PROJECT_TYPE_PREFIX)
        .unwrap_or(bill_type)
        .to_string()
}

fn paperwork(raw: &RawBill, dictum: &Dictum, creation_date: Option<NaiveDate>) -> Paperwork {
    let date = match dictum.date.as_deref().map(parse_date) {
        Some(Ok(date)) => Some(date),
        parsed => {
            if let Some(Err(e)) = parsed {
                warn!(uid = %raw.file, error = %e, "unparseable dictum date");
            }
            if dictum.result.contains(UNDATED_DICTUM_MARKER) {
                None
            } else {
                info!(
                    uid = %raw.file,
                    result = %dictum.result,
                    "dictum without date, using bill creation date"
                );
                creation_date
            }
        }
    };

    Paperwork {
        session: dictum.order_paper.clone(),
        date,
        step: dictum.result.clone(),
        stage: DICTUM_STAGE.to_string(),
        chamber: dictum.source.clone(),
        bill_id: raw.file.clone(),
        bill_uid: raw.file.clone(),
        timeline_status: ChamberRelation::between(&raw.source, &dictum.source),
    }
}

fn directive(raw: &RawBill, procedure: &Procedure, creation_date: Option<NaiveDate>) -> Directive {
    let step = match &procedure.topic {
        Some(topic) => Some(topic.clone()),
        None if procedure.source == SENATE => Some(SENATE_DEFAULT_TOPIC.to_string()),
        None => {
            error!(uid = %raw.file, source = %procedure.source, "procedure without topic");
            None
        }
    };

    let date = procedure
        .date
        .as_deref()
        .and_then(|d| match parse_date(d) {
            Ok(date) => Some(date),
            Err(e) => {
                warn!(uid = %raw.file, error = %e, "unparseable procedure date");
                None
            }
        })
        .or_else(|| procedure.topic.as_deref().and_then(communicated_date))
        .or_else(|| {
            debug!(uid = %raw.file, "procedure without date, using bill creation date");
            creation_date
        });

    Directive {
        date,
        step,
        stage: procedure.result.clone(),
        link: procedure.link.clone(),
        bill_uid: raw.file.clone(),
        bill_id: raw.file.clone(),
        source: procedure.source.clone(),
    }
}
