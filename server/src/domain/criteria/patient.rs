//! Patient criteria

use std::fmt;

use chrono::{DateTime, Utc};

use crate::data::criteria::params::apply_param;
use crate::data::criteria::{
    Criteria, EntityDef, EnumFilter, FieldFilter, FieldPath, FilterOp, FilterParamError,
    FromFilterParams, RangeFilter, StringFilter, describe, push_filter,
};
use crate::data::sqlite::schema::{PATIENT, PATIENT_PROVIDER};
use crate::data::types::{PatientRow, Sex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientField {
    Id,
    Name,
    DateOfBirth,
    Sex,
    ProviderId,
}

impl PatientField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "dateOfBirth" => Some(Self::DateOfBirth),
            "sex" => Some(Self::Sex),
            "providerId" => Some(Self::ProviderId),
            _ => None,
        }
    }
}

/// Filters over patients, optionally through their provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientCriteria {
    pub id: Option<RangeFilter<i64>>,
    pub name: Option<StringFilter>,
    pub date_of_birth: Option<RangeFilter<DateTime<Utc>>>,
    pub sex: Option<EnumFilter<Sex>>,
    pub provider_id: Option<RangeFilter<i64>>,
    pub distinct: Option<bool>,
}

impl Criteria for PatientCriteria {
    type Field = PatientField;
    type Entity = PatientRow;

    fn entity() -> &'static EntityDef {
        &PATIENT
    }

    fn resolve(field: PatientField) -> FieldPath {
        match field {
            PatientField::Id => FieldPath::Direct { column: "id" },
            PatientField::Name => FieldPath::Direct { column: "name" },
            PatientField::DateOfBirth => FieldPath::Direct {
                column: "date_of_birth",
            },
            PatientField::Sex => FieldPath::Direct { column: "sex" },
            PatientField::ProviderId => FieldPath::Relation {
                relation: &PATIENT_PROVIDER,
                column: "id",
            },
        }
    }

    fn filters(&self) -> Vec<(PatientField, FieldFilter)> {
        let mut out = Vec::new();
        push_filter(&mut out, PatientField::Id, &self.id);
        push_filter(&mut out, PatientField::Name, &self.name);
        push_filter(&mut out, PatientField::DateOfBirth, &self.date_of_birth);
        push_filter(&mut out, PatientField::Sex, &self.sex);
        push_filter(&mut out, PatientField::ProviderId, &self.provider_id);
        out
    }

    fn distinct(&self) -> Option<bool> {
        self.distinct
    }
}

impl FromFilterParams for PatientCriteria {
    fn with_param(self, field: &str, op: FilterOp, raw: &str) -> Result<Self, FilterParamError> {
        let resolved = PatientField::from_name(field)
            .ok_or_else(|| FilterParamError::UnknownField(field.to_string()))?;
        Ok(match resolved {
            PatientField::Id => Self {
                id: apply_param(self.id, field, op, raw)?,
                ..self
            },
            PatientField::Name => Self {
                name: apply_param(self.name, field, op, raw)?,
                ..self
            },
            PatientField::DateOfBirth => Self {
                date_of_birth: apply_param(self.date_of_birth, field, op, raw)?,
                ..self
            },
            PatientField::Sex => Self {
                sex: apply_param(self.sex, field, op, raw)?,
                ..self
            },
            PatientField::ProviderId => Self {
                provider_id: apply_param(self.provider_id, field, op, raw)?,
                ..self
            },
        })
    }

    fn with_distinct(self, distinct: bool) -> Self {
        Self {
            distinct: Some(distinct),
            ..self
        }
    }
}

impl fmt::Display for PatientCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&describe(
            "PatientCriteria",
            &[
                ("id", self.id.as_ref().map(ToString::to_string)),
                ("name", self.name.as_ref().map(ToString::to_string)),
                (
                    "dateOfBirth",
                    self.date_of_birth.as_ref().map(ToString::to_string),
                ),
                ("sex", self.sex.as_ref().map(ToString::to_string)),
                (
                    "providerId",
                    self.provider_id.as_ref().map(ToString::to_string),
                ),
            ],
            self.distinct,
        ))
    }
}
