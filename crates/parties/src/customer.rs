use serde::{Deserialize, Serialize};

use werkbank_core::{CustomerId, DomainError, DomainResult, Entity};

/// Contact information for a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// A customer (Kunde). Documents and projects reference it by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    /// Human-facing customer number (e.g. "K-1024").
    pub customer_number: String,
    pub name: String,
    #[serde(default)]
    pub contact: ContactInfo,
}

impl Customer {
    pub fn new(
        id: CustomerId,
        customer_number: impl Into<String>,
        name: impl Into<String>,
        contact: ContactInfo,
    ) -> DomainResult<Self> {
        let customer = Self {
            id,
            customer_number: customer_number.into(),
            name: name.into(),
            contact,
        };
        customer.validate()?;
        Ok(customer)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.customer_number.trim().is_empty() {
            return Err(DomainError::validation("customer_number cannot be empty"));
        }
        if let Some(email) = &self.contact.email {
            if !email.contains('@') {
                return Err(DomainError::validation(format!("invalid email: {email}")));
            }
        }
        Ok(())
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_customer_is_validated() {
        let customer = Customer::new(
            CustomerId::new(),
            "K-1001",
            "Malerbetrieb Schulz",
            ContactInfo {
                email: Some("info@schulz.example".into()),
                ..ContactInfo::default()
            },
        )
        .unwrap();
        assert_eq!(customer.name, "Malerbetrieb Schulz");
    }

    #[test]
    fn empty_name_is_rejected() {
        let err =
            Customer::new(CustomerId::new(), "K-1", "  ", ContactInfo::default()).unwrap_err();
        assert_eq!(err, DomainError::validation("name cannot be empty"));
    }

    #[test]
    fn malformed_email_is_rejected() {
        let err = Customer::new(
            CustomerId::new(),
            "K-1",
            "Bau GmbH",
            ContactInfo {
                email: Some("bau.example".into()),
                ..ContactInfo::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("email")));
    }

    #[test]
    fn contact_defaults_when_missing_from_record() {
        let id = CustomerId::new();
        let json = serde_json::json!({
            "id": id,
            "customer_number": "K-7",
            "name": "Dachdeckerei Wolf",
        });
        let customer: Customer = serde_json::from_value(json).unwrap();
        assert_eq!(customer.contact, ContactInfo::default());
    }
}
