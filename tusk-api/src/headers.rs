//! Alert headers read by the web client to show notifications.
//!
//! Every alert is a pair of headers: `X-<app>-alert` (or `X-<app>-error` for
//! failures) with either an i18n key or an English message, and
//! `X-<app>-params` with the entity id or name to interpolate.

use axum::http::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderName, InvalidHeaderValue};

#[derive(Debug, Clone)]
pub struct AlertHeaders {
    application_name: String,
    translate: bool,
    alert: HeaderName,
    error: HeaderName,
    params: HeaderName,
}

impl AlertHeaders {
    pub fn new(application_name: &str, translate: bool) -> Result<Self, InvalidHeaderName> {
        Ok(Self {
            application_name: application_name.to_string(),
            translate,
            alert: HeaderName::try_from(format!("x-{}-alert", application_name))?,
            error: HeaderName::try_from(format!("x-{}-error", application_name))?,
            params: HeaderName::try_from(format!("x-{}-params", application_name))?,
        })
    }

    /// Header names browsers must be allowed to read.
    pub fn header_names(&self) -> [HeaderName; 3] {
        [self.alert.clone(), self.error.clone(), self.params.clone()]
    }

    pub fn entity_creation(&self, entity: &str, id: &str) -> Result<HeaderMap, InvalidHeaderValue> {
        let message = if self.translate {
            format!("{}.{}.created", self.application_name, entity)
        } else {
            format!("A new {} is created with identifier {}", entity, id)
        };
        self.alert(&message, id)
    }

    pub fn entity_update(&self, entity: &str, id: &str) -> Result<HeaderMap, InvalidHeaderValue> {
        let message = if self.translate {
            format!("{}.{}.updated", self.application_name, entity)
        } else {
            format!("A {} is updated with identifier {}", entity, id)
        };
        self.alert(&message, id)
    }

    pub fn entity_deletion(&self, entity: &str, id: &str) -> Result<HeaderMap, InvalidHeaderValue> {
        let message = if self.translate {
            format!("{}.{}.deleted", self.application_name, entity)
        } else {
            format!("A {} is deleted with identifier {}", entity, id)
        };
        self.alert(&message, id)
    }

    pub fn failure(
        &self,
        entity: &str,
        error_key: &str,
        default_message: &str,
    ) -> Result<HeaderMap, InvalidHeaderValue> {
        tracing::error!("Entity processing failed, {}", default_message);
        let error = if self.translate {
            format!("error.{}", error_key)
        } else {
            default_message.to_string()
        };

        let mut headers = HeaderMap::new();
        headers.insert(self.error.clone(), HeaderValue::from_str(&error)?);
        headers.insert(self.params.clone(), HeaderValue::from_str(entity)?);
        Ok(headers)
    }

    fn alert(&self, message: &str, param: &str) -> Result<HeaderMap, InvalidHeaderValue> {
        let mut headers = HeaderMap::new();
        headers.insert(self.alert.clone(), HeaderValue::from_str(message)?);
        headers.insert(self.params.clone(), HeaderValue::from_str(param)?);
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translated_alerts_carry_i18n_keys() {
        let alerts = AlertHeaders::new("tuskApp", true).unwrap();

        let headers = alerts.entity_creation("deal", "1").unwrap();
        assert_eq!(headers["x-tuskapp-alert"], "tuskApp.deal.created");
        assert_eq!(headers["x-tuskapp-params"], "1");

        let headers = alerts.entity_deletion("passenger", "4").unwrap();
        assert_eq!(headers["x-tuskapp-alert"], "tuskApp.passenger.deleted");
    }

    #[test]
    fn plain_alerts_carry_messages() {
        let alerts = AlertHeaders::new("tuskApp", false).unwrap();

        let headers = alerts.entity_update("deal", "7").unwrap();
        assert_eq!(headers["x-tuskapp-alert"], "A deal is updated with identifier 7");
        assert_eq!(headers["x-tuskapp-params"], "7");
    }

    #[test]
    fn failure_alert_names_the_entity() {
        let translated = AlertHeaders::new("tuskApp", true).unwrap();
        let headers = translated
            .failure("deal", "idexists", "A new deal cannot already have an ID")
            .unwrap();
        assert_eq!(headers["x-tuskapp-error"], "error.idexists");
        assert_eq!(headers["x-tuskapp-params"], "deal");
        assert!(headers.get("x-tuskapp-alert").is_none());

        let plain = AlertHeaders::new("tuskApp", false).unwrap();
        let headers = plain
            .failure("deal", "idexists", "A new deal cannot already have an ID")
            .unwrap();
        assert_eq!(headers["x-tuskapp-error"], "A new deal cannot already have an ID");
    }

    #[test]
    fn invalid_application_name_is_rejected() {
        assert!(AlertHeaders::new("tusk app", true).is_err());
    }
}
