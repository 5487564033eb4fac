use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use visionpoint_core::{CustomerId, DomainError, DomainResult, Entity};
use visionpoint_store::{FieldValue, Queryable};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

/// A shop customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub phone: String,
    pub gender: Gender,
    pub age: Option<u32>,
    pub dob: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Customer {
    pub fn new(
        id: CustomerId,
        name: impl Into<String>,
        phone: impl Into<String>,
        gender: Gender,
    ) -> DomainResult<Self> {
        let customer = Self {
            id,
            name: name.into().trim().to_string(),
            phone: phone.into().trim().to_string(),
            gender,
            age: None,
            dob: None,
            notes: None,
            created_at: None,
        };
        customer.validate()?;
        Ok(customer)
    }

    /// Name and phone are required.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("customer name is required"));
        }
        if !self.phone.chars().any(|c| c.is_ascii_digit()) {
            return Err(DomainError::validation("customer phone is required"));
        }
        Ok(())
    }

    /// Age on `date`, from the date of birth when known, else the recorded age.
    pub fn age_on(&self, date: NaiveDate) -> Option<u32> {
        match self.dob {
            Some(dob) => date.years_since(dob),
            None => self.age,
        }
    }

    /// Whether `date` is this customer's birthday.
    ///
    /// A 29 February birthday is observed on 28 February in non-leap years.
    pub fn has_birthday_on(&self, date: NaiveDate) -> bool {
        let Some(dob) = self.dob else {
            return false;
        };
        if dob.month() == date.month() && dob.day() == date.day() {
            return true;
        }
        let leap_day = dob.month() == 2 && dob.day() == 29;
        let is_leap = NaiveDate::from_ymd_opt(date.year(), 2, 29).is_some();
        leap_day && !is_leap && date.month() == 2 && date.day() == 28
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Queryable for Customer {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Id(self.id.get())),
            "name" => Some(FieldValue::Text(self.name.clone())),
            "phone" => Some(FieldValue::Text(self.phone.clone())),
            "gender" => Some(FieldValue::Text(self.gender.as_str().to_string())),
            "dob" => self.dob.map(FieldValue::Date),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn name_and_phone_are_required() {
        assert!(Customer::new(CustomerId::new(1), "  ", "9876543210", Gender::Male).is_err());
        assert!(Customer::new(CustomerId::new(1), "Asha", "", Gender::Female).is_err());
        let c = Customer::new(CustomerId::new(1), " Asha ", "98765 43210", Gender::Female).unwrap();
        assert_eq!(c.name, "Asha");
    }

    #[test]
    fn age_prefers_date_of_birth() {
        let mut c = Customer::new(CustomerId::new(1), "Ravi", "9000000000", Gender::Male).unwrap();
        c.age = Some(30);
        assert_eq!(c.age_on(date(2024, 6, 1)), Some(30));

        c.dob = Some(date(1990, 6, 2));
        assert_eq!(c.age_on(date(2024, 6, 1)), Some(33));
        assert_eq!(c.age_on(date(2024, 6, 2)), Some(34));
    }

    #[test]
    fn leap_day_birthdays_are_observed_on_feb_28() {
        let mut c = Customer::new(CustomerId::new(1), "Meera", "9000000000", Gender::Female).unwrap();
        c.dob = Some(date(2000, 2, 29));
        assert!(c.has_birthday_on(date(2023, 2, 28)));
        assert!(!c.has_birthday_on(date(2024, 2, 28)));
        assert!(c.has_birthday_on(date(2024, 2, 29)));
    }

    #[test]
    fn queryable_by_phone() {
        let c = Customer::new(CustomerId::new(4), "Asha", "9876543210", Gender::Female).unwrap();
        assert_eq!(c.field("phone"), Some(FieldValue::Text("9876543210".to_string())));
        assert_eq!(c.field("dob"), None);
    }
}
