#![allow(dead_code)]

use chrono::NaiveDate;
use parlamento_bills::{classify, Bill, ClassifyContext, RawBill};

pub fn raw_bill(file: &str) -> RawBill {
    RawBill::from_json(&format!(
        r#"{{
            "file": "{file}",
            "type": "PROYECTO DE LEY",
            "source": "Diputados",
            "creationTime": "10/05/2016",
            "summary": "CREACION DEL PROGRAMA NACIONAL DE ALFABETIZACION",
            "subscribers": [{{"name": "LOPEZ, MARIA"}}],
            "procedures": [
                {{"source": "Diputados", "topic": "CONSIDERACION EN GENERAL", "date": "03/08/2016", "result": "MEDIA SANCION"}}
            ]
        }}"#
    ))
    .unwrap()
}

pub fn bill(file: &str) -> Bill {
    let today = NaiveDate::from_ymd_opt(2017, 1, 1).unwrap();
    classify(raw_bill(file), &ClassifyContext::at(today))
}

/// A local address nothing listens on.
pub fn closed_store_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
