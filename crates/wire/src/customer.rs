use serde::Deserialize;

use visionpoint_core::CustomerId;
use visionpoint_records::{Customer, Gender};

use crate::error::WireError;
use crate::value::{WireNumber, optional_date, parse_timestamp, present};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WireCustomer {
    #[serde(default)]
    pub id: Option<WireNumber>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub age: Option<WireNumber>,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, rename = "createdAt")]
    pub created_at_legacy: Option<String>,
}

fn parse_gender(raw: Option<&str>) -> Result<Gender, WireError> {
    match present(raw) {
        None => Ok(Gender::default()),
        Some(g) if g.eq_ignore_ascii_case("male") => Ok(Gender::Male),
        Some(g) if g.eq_ignore_ascii_case("female") => Ok(Gender::Female),
        Some(g) if g.eq_ignore_ascii_case("other") => Ok(Gender::Other),
        Some(other) => Err(WireError::invalid_field("gender", other)),
    }
}

pub fn normalize_customer(wire: WireCustomer) -> Result<Customer, WireError> {
    let id = wire
        .id
        .as_ref()
        .ok_or(WireError::MissingField("id"))?
        .to_id("id")?;

    let mut customer = Customer::new(
        CustomerId::new(id),
        wire.name.unwrap_or_default(),
        wire.phone.unwrap_or_default(),
        parse_gender(wire.gender.as_deref())?,
    )?;

    customer.age = wire
        .age
        .as_ref()
        .map(|raw| {
            let age = raw.to_integer("age")?;
            u32::try_from(age).map_err(|_| WireError::invalid_field("age", age.to_string()))
        })
        .transpose()?;
    customer.dob = optional_date("dob", wire.dob.as_deref())?;
    customer.notes = present(wire.notes.as_deref()).map(str::to_string);
    customer.created_at = present(wire.created_at.as_deref().or(wire.created_at_legacy.as_deref()))
        .map(|raw| parse_timestamp("created_at", raw))
        .transpose()?;
    Ok(customer)
}

pub fn parse_customer(json: &str) -> Result<Customer, WireError> {
    let wire: WireCustomer = serde_json::from_str(json)?;
    normalize_customer(wire)
}
