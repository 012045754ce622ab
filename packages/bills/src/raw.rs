//! Intermediate bill records as handed over by the page scraper.
//!
//! Field names follow the scraper's JSON (`creationTime`, `lawNumber`, ...)
//! so records can be decoded straight from its output.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A bill as extracted from one search-result page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBill {
    /// Bill file identifier, e.g. `0123-D-2016`. Used as the store uid.
    pub file: String,
    /// Bill type, e.g. `PROYECTO DE LEY`.
    #[serde(rename = "type")]
    pub bill_type: String,
    /// Origin chamber (`Diputados` or `Senado`).
    pub source: String,
    pub creation_time: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub law_number: Option<String>,
    #[serde(default)]
    pub text_url: Option<String>,
    #[serde(default)]
    pub committees: Vec<String>,
    #[serde(default)]
    pub subscribers: Vec<Subscriber>,
    #[serde(default)]
    pub dictums: Vec<Dictum>,
    #[serde(default)]
    pub procedures: Vec<Procedure>,
}

/// A bill signatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub name: String,
    #[serde(default)]
    pub party: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
}

/// Committee-stage event ("DICTAMENES DE COMISION").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dictum {
    pub source: String,
    #[serde(default)]
    pub order_paper: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub result: String,
}

/// Floor-stage event ("TRAMITE").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procedure {
    pub source: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    /// Resolution text. `None` when the row carries no result column at all,
    /// `Some("")` when it is present but blank.
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl RawBill {
    /// Decode a single raw bill from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode a batch of raw bills, either a JSON array or one object per line.
    pub fn batch_from_json(input: &str) -> Result<Vec<Self>> {
        let trimmed = input.trim_start();
        if trimmed.starts_with('[') {
            return Ok(serde_json::from_str(trimmed)?);
        }

        trimmed
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(Self::from_json)
            .collect()
    }

    /// Whether a law number has been assigned, i.e. the bill was enacted.
    pub fn has_law_number(&self) -> bool {
        self.law_number
            .as_deref()
            .is_some_and(|n| !n.trim().is_empty())
    }
}
