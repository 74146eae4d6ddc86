use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A travel deal offered to customers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    /// Price in neutral units of construction (minor units).
    #[serde(default)]
    pub price_nuc: Option<i32>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
}

impl Deal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: None,
            destination: None,
            price_nuc: None,
            currency: None,
            valid_until: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_minimal_payload_with_null_id() {
        let deal: Deal = serde_json::from_str(r#"{"id": null, "name": "Trip A"}"#).unwrap();
        assert_eq!(deal.id, None);
        assert_eq!(deal.name, "Trip A");
        assert!(deal.valid_until.is_none());
    }

    #[test]
    fn valid_until_uses_iso_dates() {
        let deal: Deal = serde_json::from_str(
            r#"{"id": 3, "name": "Lisbon", "valid_until": "2026-12-31", "price_nuc": 19900}"#,
        )
        .unwrap();
        assert_eq!(deal.id, Some(3));
        assert_eq!(deal.valid_until, NaiveDate::from_ymd_opt(2026, 12, 31));
        assert_eq!(deal.price_nuc, Some(19900));
    }
}
