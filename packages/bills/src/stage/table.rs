//! Keyword tables driving directive interpretation.
//!
//! Floor procedures are free text. Which of them move a bill forward, and to
//! which stage, is kept here as data so the matching rules can be audited in
//! one place.

use crate::models::{ChamberRelation, Stage};

/// How a directive step relates to stage inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepClass {
    /// The directive's stage text decides the bill stage.
    Relevant,
    /// Known procedural noise.
    Ignored,
    /// Matches none of the known patterns.
    Unknown,
}

/// Step keywords considered for one chamber relation.
#[derive(Debug)]
pub struct StepGate {
    pub relevant: &'static [&'static str],
    pub ignored: &'static [&'static str],
    /// Whether steps outside both lists are reported as unknown.
    pub report_unknown: bool,
}

impl StepGate {
    pub fn classify(&self, step: &str) -> StepClass {
        if self.relevant.iter().any(|k| step.contains(k)) {
            StepClass::Relevant
        } else if self.ignored.iter().any(|k| step.contains(k)) || !self.report_unknown {
            StepClass::Ignored
        } else {
            StepClass::Unknown
        }
    }
}

pub static ORIGIN_GATE: StepGate = StepGate {
    relevant: &["CONSIDERACION", "ARTICULO 114", "ARTICULO 204"],
    ignored: &["SOLICITUD DE SER COFIRMANTE", "TABLAS", "SESION ESPECIAL"],
    report_unknown: true,
};

pub static REVISORY_GATE: StepGate = StepGate {
    relevant: &["CONSIDERACION"],
    ignored: &[],
    report_unknown: false,
};

pub fn gate(relation: ChamberRelation) -> &'static StepGate {
    match relation {
        ChamberRelation::Origin => &ORIGIN_GATE,
        ChamberRelation::Revisory => &REVISORY_GATE,
    }
}

/// Pattern over a directive's stage text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageText {
    /// The procedure row had no result at all.
    Null,
    /// The result was present but blank.
    Empty,
    Exact(&'static str),
}

impl StageText {
    fn matches(self, text: Option<&str>) -> bool {
        match (self, text) {
            (StageText::Null, None) => true,
            (StageText::Empty, Some(t)) => t.trim().is_empty(),
            (StageText::Exact(expected), Some(t)) => t.trim() == expected,
            _ => false,
        }
    }
}

#[derive(Debug)]
pub struct StageMapping {
    pub relations: &'static [ChamberRelation],
    pub text: StageText,
    pub stage: Stage,
}

const BOTH: &[ChamberRelation] = &[ChamberRelation::Origin, ChamberRelation::Revisory];
const REVISORY_ONLY: &[ChamberRelation] = &[ChamberRelation::Revisory];

pub const STAGE_TABLE: &[StageMapping] = &[
    StageMapping {
        relations: BOTH,
        text: StageText::Exact("MEDIA SANCION"),
        stage: Stage::HalfSanction,
    },
    StageMapping {
        relations: BOTH,
        text: StageText::Exact("SANCIONADO"),
        stage: Stage::Approved,
    },
    StageMapping {
        relations: BOTH,
        text: StageText::Exact("APROBADO"),
        stage: Stage::Approved,
    },
    StageMapping {
        relations: BOTH,
        text: StageText::Exact("RECHAZADO"),
        stage: Stage::Rejected,
    },
    StageMapping {
        relations: BOTH,
        text: StageText::Empty,
        stage: Stage::Considering,
    },
    // An archived resolution in the revisory chamber closes the bill as approved.
    StageMapping {
        relations: REVISORY_ONLY,
        text: StageText::Exact("ARCHIVADO"),
        stage: Stage::Approved,
    },
    StageMapping {
        relations: REVISORY_ONLY,
        text: StageText::Null,
        stage: Stage::Considering,
    },
];

/// Look up the stage a relevant directive implies.
pub fn lookup(relation: ChamberRelation, text: Option<&str>) -> Option<Stage> {
    STAGE_TABLE
        .iter()
        .find(|m| m.relations.contains(&relation) && m.text.matches(text))
        .map(|m| m.stage)
}
