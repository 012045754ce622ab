#![allow(dead_code)]

use chrono::NaiveDate;
use parlamento_bills::{ClassifyContext, Dictum, Procedure, RawBill, Subscriber};

pub const FILE: &str = "3021-D-2016";

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32) -> ClassifyContext {
    ClassifyContext::at(ymd(y, m, d))
}

/// Builder for raw bills used across classifier tests.
pub struct RawBillBuilder {
    bill: RawBill,
}

impl RawBillBuilder {
    pub fn new(source: &str, creation_time: &str) -> Self {
        Self {
            bill: RawBill {
                file: FILE.into(),
                bill_type: "PROYECTO DE LEY".into(),
                source: source.into(),
                creation_time: creation_time.into(),
                summary: Some("MODIFICACION DE LA LEY 24.240 DE DEFENSA DEL CONSUMIDOR".into()),
                law_number: None,
                text_url: None,
                committees: vec!["DEFENSA DEL CONSUMIDOR".into()],
                subscribers: vec![Subscriber {
                    name: "GOMEZ, ANA".into(),
                    party: Some("FRENTE".into()),
                    province: Some("MENDOZA".into()),
                }],
                dictums: Vec::new(),
                procedures: Vec::new(),
            },
        }
    }

    pub fn law_number(mut self, number: &str) -> Self {
        self.bill.law_number = Some(number.into());
        self
    }

    pub fn dictum(mut self, source: &str, date: Option<&str>, result: &str) -> Self {
        self.bill.dictums.push(Dictum {
            source: source.into(),
            order_paper: Some("1020/2016".into()),
            date: date.map(str::to_string),
            result: result.into(),
        });
        self
    }

    pub fn procedure(mut self, source: &str, topic: &str, result: Option<&str>, date: &str) -> Self {
        self.bill.procedures.push(Procedure {
            source: source.into(),
            topic: Some(topic.into()),
            date: Some(date.into()),
            result: result.map(str::to_string),
            link: None,
        });
        self
    }

    pub fn build(self) -> RawBill {
        self.bill
    }
}
