use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::pii::Masked;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passenger {
    #[serde(default)]
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<Masked<String>>,
    #[serde(default)]
    pub passport_number: Option<Masked<String>>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
}

impl Passenger {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: None,
            passport_number: None,
            date_of_birth: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_contact_and_travel_documents() {
        let mut passenger = Passenger::new("Ada", "Lovelace");
        passenger.email = Some(Masked("ada@example.com".to_string()));
        passenger.passport_number = Some(Masked("P0012345".to_string()));

        let logged = format!("{:?}", passenger);
        assert!(logged.contains("Ada"));
        assert!(!logged.contains("ada@example.com"));
        assert!(!logged.contains("P0012345"));
    }

    #[test]
    fn json_keeps_real_values() {
        let mut passenger = Passenger::new("Ada", "Lovelace");
        passenger.passport_number = Some(Masked("P0012345".to_string()));

        let value = serde_json::to_value(&passenger).unwrap();
        assert_eq!(value["passport_number"], "P0012345");
        assert_eq!(value["id"], serde_json::Value::Null);
    }
}
