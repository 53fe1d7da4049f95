use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use werkbank_core::{DomainError, DomainResult, EmployeeId, Entity};

/// An employee (Mitarbeiter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    /// Trade or position, e.g. "Geselle", "Meister", "Azubi".
    pub role: String,
    /// Internal hourly rate used for costing.
    pub hourly_rate: Decimal,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Employee {
    pub fn new(
        id: EmployeeId,
        name: impl Into<String>,
        role: impl Into<String>,
        hourly_rate: Decimal,
    ) -> DomainResult<Self> {
        let employee = Self {
            id,
            name: name.into(),
            role: role.into(),
            hourly_rate,
            active: true,
        };
        employee.validate()?;
        Ok(employee)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.hourly_rate < Decimal::ZERO {
            return Err(DomainError::validation("hourly_rate must not be negative"));
        }
        Ok(())
    }
}

impl Entity for Employee {
    type Id = EmployeeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn new_employee_is_active() {
        let employee =
            Employee::new(EmployeeId::new(), "Jonas Becker", "Geselle", dec!(42.50)).unwrap();
        assert!(employee.active);
    }

    #[test]
    fn negative_rate_is_rejected() {
        let err =
            Employee::new(EmployeeId::new(), "Jonas Becker", "Geselle", dec!(-1)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
