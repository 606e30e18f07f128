//! Client, site and split domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{QuoteError, ValidationError};
use crate::Result;

/// A customer of the firm. `margin_rate` seeds the margin of its new quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// 4-digit zero padded, e.g. `0042`
    pub id: String,
    pub name: String,
    pub margin_rate: Decimal,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// Input model for creating a new client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub name: String,
    pub margin_rate: Decimal,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl NewClient {
    /// Validates the new client data.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        if self.margin_rate < Decimal::ZERO || self.margin_rate >= Decimal::ONE {
            return Err(QuoteError::InvalidMarginRate(self.margin_rate.to_string()).into());
        }
        Ok(())
    }

    /// Attaches the identifier chosen by the service.
    pub fn into_client(self, id: String) -> Client {
        Client {
            id,
            name: self.name.trim().to_string(),
            margin_rate: self.margin_rate,
            email: self.email,
            phone: self.phone,
            address: self.address,
        }
    }
}

/// A physical location belonging to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    pub client_id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSite {
    pub client_id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

impl NewSite {
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(ValidationError::MissingField("clientId".to_string()).into());
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        Ok(())
    }
}

/// A sub-zone of a site (floor, wing, technical room).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Split {
    pub id: String,
    pub site_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSplit {
    pub site_id: String,
    pub name: String,
}

impl NewSplit {
    pub fn validate(&self) -> Result<()> {
        if self.site_id.trim().is_empty() {
            return Err(ValidationError::MissingField("siteId".to_string()).into());
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use rust_decimal_macros::dec;

    fn new_client(name: &str, margin_rate: Decimal) -> NewClient {
        NewClient {
            name: name.to_string(),
            margin_rate,
            email: None,
            phone: None,
            address: None,
        }
    }

    #[test]
    fn test_new_client_validation() {
        assert!(new_client("STEG", dec!(0.2)).validate().is_ok());
        assert!(matches!(
            new_client("  ", dec!(0.2)).validate(),
            Err(Error::Validation(ValidationError::MissingField(_)))
        ));
        assert!(matches!(
            new_client("STEG", dec!(1)).validate(),
            Err(Error::Quote(QuoteError::InvalidMarginRate(_)))
        ));
    }

    #[test]
    fn test_into_client_trims_name() {
        let client = new_client(" Groupe Poulina ", dec!(0.15)).into_client("0012".to_string());
        assert_eq!(client.id, "0012");
        assert_eq!(client.name, "Groupe Poulina");
    }

    #[test]
    fn test_site_and_split_validation() {
        let site = NewSite {
            client_id: "0001".to_string(),
            name: "Entrepôt Rades".to_string(),
            address: None,
        };
        assert!(site.validate().is_ok());
        assert!(NewSite {
            client_id: String::new(),
            ..site
        }
        .validate()
        .is_err());

        let split = NewSplit {
            site_id: "s-1".to_string(),
            name: String::new(),
        };
        assert!(split.validate().is_err());
    }
}
