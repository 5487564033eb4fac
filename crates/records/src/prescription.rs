use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use visionpoint_core::{CustomerId, DomainError, DomainResult, Entity, PrescriptionId};
use visionpoint_store::{FieldValue, Queryable};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrescriptionKind {
    #[default]
    Specs,
    Contacts,
}

impl PrescriptionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PrescriptionKind::Specs => "Specs",
            PrescriptionKind::Contacts => "Contacts",
        }
    }
}

/// Refraction for one eye, distance (`*_d`) and near (`*_n`).
///
/// Values are kept exactly as written on the card (`-1.25`, `6/6`, `N6`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EyePower {
    pub sph_d: String,
    pub sph_n: String,
    pub cyl_d: String,
    pub cyl_n: String,
    pub axis_d: String,
    pub axis_n: String,
    pub vision_d: String,
    pub vision_n: String,
    pub add_d: String,
    pub add_n: String,
}

impl EyePower {
    pub fn is_blank(&self) -> bool {
        [
            &self.sph_d,
            &self.sph_n,
            &self.cyl_d,
            &self.cyl_n,
            &self.axis_d,
            &self.axis_n,
            &self.vision_d,
            &self.vision_n,
            &self.add_d,
            &self.add_n,
        ]
        .iter()
        .all(|v| v.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: PrescriptionId,
    pub customer_id: CustomerId,
    pub kind: PrescriptionKind,
    pub date: NaiveDate,
    pub doctor_name: Option<String>,
    pub left_eye: EyePower,
    pub right_eye: EyePower,
    pub psm: Option<String>,
    pub pd: Option<String>,
    pub fh: Option<String>,
}

impl Prescription {
    pub fn validate(&self) -> DomainResult<()> {
        if self.left_eye.is_blank() && self.right_eye.is_blank() {
            return Err(DomainError::validation(
                "prescription must record power for at least one eye",
            ));
        }
        Ok(())
    }
}

impl Entity for Prescription {
    type Id = PrescriptionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Queryable for Prescription {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(FieldValue::Id(self.id.get())),
            "customer_id" => Some(FieldValue::Id(self.customer_id.get())),
            "kind" => Some(FieldValue::Text(self.kind.as_str().to_string())),
            "date" => Some(FieldValue::Date(self.date)),
            _ => None,
        }
    }
}
