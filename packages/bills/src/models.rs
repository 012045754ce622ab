//! Popolo-style output records pushed to the bill store.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical legislative lifecycle stage of a bill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    #[default]
    Submitted,
    Considering,
    DictumOrigin,
    DictumRevisory,
    HalfSanction,
    Approved,
    Rejected,
    ParliamentaryStatusLost,
}

impl Stage {
    pub const ALL: [Stage; 8] = [
        Stage::Submitted,
        Stage::Considering,
        Stage::DictumOrigin,
        Stage::DictumRevisory,
        Stage::HalfSanction,
        Stage::Approved,
        Stage::Rejected,
        Stage::ParliamentaryStatusLost,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Submitted => "SUBMITTED",
            Stage::Considering => "CONSIDERING",
            Stage::DictumOrigin => "DICTUM_ORIGIN",
            Stage::DictumRevisory => "DICTUM_REVISORY",
            Stage::HalfSanction => "HALF_SANCTION",
            Stage::Approved => "APPROVED",
            Stage::Rejected => "REJECTED",
            Stage::ParliamentaryStatusLost => "PARLIAMENTARY_STATUS_LOST",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an event happened in the chamber the bill was introduced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChamberRelation {
    Origin,
    Revisory,
}

impl ChamberRelation {
    pub fn between(origin_chamber: &str, event_chamber: &str) -> Self {
        if origin_chamber == event_chamber {
            ChamberRelation::Origin
        } else {
            ChamberRelation::Revisory
        }
    }
}

/// Committee-stage record derived from a dictum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paperwork {
    pub session: Option<String>,
    pub date: Option<NaiveDate>,
    pub step: String,
    pub stage: String,
    pub chamber: String,
    pub bill_id: String,
    pub bill_uid: String,
    pub timeline_status: ChamberRelation,
}

/// Floor-stage record derived from a procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    pub date: Option<NaiveDate>,
    pub step: Option<String>,
    pub stage: Option<String>,
    pub link: Option<String>,
    pub bill_uid: String,
    pub bill_id: String,
    pub source: String,
}

/// Bill record as stored downstream.
///
/// `priorities`, `reports`, `documents`, `remarks` and `revisions` are never
/// populated by this importer; they are always serialized as empty arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub uid: String,
    pub title: String,
    pub creation_date: Option<NaiveDate>,
    pub source: String,
    pub initial_chamber: String,
    pub bill_draft_link: Option<String>,
    pub subject_areas: Vec<String>,
    pub authors: Vec<String>,
    pub paperworks: Vec<Paperwork>,
    pub directives: Vec<Directive>,
    #[serde(rename = "lawNumber")]
    pub law_number: Option<String>,
    pub stage: Stage,
    pub project_type: String,
    pub current_priority: Option<String>,
    pub priorities: Vec<serde_json::Value>,
    pub reports: Vec<serde_json::Value>,
    pub documents: Vec<serde_json::Value>,
    pub remarks: Vec<serde_json::Value>,
    pub revisions: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_wire_names_match_display() {
        for stage in Stage::ALL {
            let json = serde_json::to_value(stage).unwrap();
            assert_eq!(json, stage.as_str());
        }
    }

    #[test]
    fn test_chamber_relation() {
        assert_eq!(
            ChamberRelation::between("Diputados", "Diputados"),
            ChamberRelation::Origin
        );
        assert_eq!(
            ChamberRelation::between("Diputados", "Senado"),
            ChamberRelation::Revisory
        );
    }
}
