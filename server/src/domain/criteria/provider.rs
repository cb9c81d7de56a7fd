//! Provider criteria

use std::fmt;

use crate::data::criteria::params::apply_param;
use crate::data::criteria::{
    Criteria, EntityDef, FieldFilter, FieldPath, FilterOp, FilterParamError, FromFilterParams,
    RangeFilter, StringFilter, describe, push_filter,
};
use crate::data::sqlite::schema::{PROVIDER, PROVIDER_HOSPITAL, PROVIDER_PATIENTS};
use crate::data::types::ProviderRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderField {
    Id,
    Name,
    Specialty,
    PatientId,
    HospitalId,
}

impl ProviderField {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "specialty" => Some(Self::Specialty),
            "patientId" => Some(Self::PatientId),
            "hospitalId" => Some(Self::HospitalId),
            _ => None,
        }
    }
}

/// Filters over providers, optionally through their patients or hospital
///
/// `patientId` joins one-to-many, so a provider matching several patients is
/// returned once per patient unless `distinct` is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderCriteria {
    pub id: Option<RangeFilter<i64>>,
    pub name: Option<StringFilter>,
    pub specialty: Option<StringFilter>,
    pub patient_id: Option<RangeFilter<i64>>,
    pub hospital_id: Option<RangeFilter<i64>>,
    pub distinct: Option<bool>,
}

impl Criteria for ProviderCriteria {
    type Field = ProviderField;
    type Entity = ProviderRow;

    fn entity() -> &'static EntityDef {
        &PROVIDER
    }

    fn resolve(field: ProviderField) -> FieldPath {
        match field {
            ProviderField::Id => FieldPath::Direct { column: "id" },
            ProviderField::Name => FieldPath::Direct { column: "name" },
            ProviderField::Specialty => FieldPath::Direct {
                column: "specialty",
            },
            ProviderField::PatientId => FieldPath::Relation {
                relation: &PROVIDER_PATIENTS,
                column: "id",
            },
            ProviderField::HospitalId => FieldPath::Relation {
                relation: &PROVIDER_HOSPITAL,
                column: "id",
            },
        }
    }

    fn filters(&self) -> Vec<(ProviderField, FieldFilter)> {
        let mut out = Vec::new();
        push_filter(&mut out, ProviderField::Id, &self.id);
        push_filter(&mut out, ProviderField::Name, &self.name);
        push_filter(&mut out, ProviderField::Specialty, &self.specialty);
        push_filter(&mut out, ProviderField::PatientId, &self.patient_id);
        push_filter(&mut out, ProviderField::HospitalId, &self.hospital_id);
        out
    }

    fn distinct(&self) -> Option<bool> {
        self.distinct
    }
}

impl FromFilterParams for ProviderCriteria {
    fn with_param(self, field: &str, op: FilterOp, raw: &str) -> Result<Self, FilterParamError> {
        let resolved = ProviderField::from_name(field)
            .ok_or_else(|| FilterParamError::UnknownField(field.to_string()))?;
        Ok(match resolved {
            ProviderField::Id => Self {
                id: apply_param(self.id, field, op, raw)?,
                ..self
            },
            ProviderField::Name => Self {
                name: apply_param(self.name, field, op, raw)?,
                ..self
            },
            ProviderField::Specialty => Self {
                specialty: apply_param(self.specialty, field, op, raw)?,
                ..self
            },
            ProviderField::PatientId => Self {
                patient_id: apply_param(self.patient_id, field, op, raw)?,
                ..self
            },
            ProviderField::HospitalId => Self {
                hospital_id: apply_param(self.hospital_id, field, op, raw)?,
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

impl fmt::Display for ProviderCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&describe(
            "ProviderCriteria",
            &[
                ("id", self.id.as_ref().map(ToString::to_string)),
                ("name", self.name.as_ref().map(ToString::to_string)),
                ("specialty", self.specialty.as_ref().map(ToString::to_string)),
                ("patientId", self.patient_id.as_ref().map(ToString::to_string)),
                (
                    "hospitalId",
                    self.hospital_id.as_ref().map(ToString::to_string),
                ),
            ],
            self.distinct,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::criteria::{compile, parse_criteria};

    #[test]
    fn test_two_relations_get_separate_joins() {
        let criteria = ProviderCriteria {
            patient_id: Some(RangeFilter::new().in_values([1i64, 2])),
            hospital_id: Some(RangeFilter::new().equals(5i64)),
            distinct: Some(true),
            ..Default::default()
        };
        let query = compile(&criteria);
        assert!(query.is_distinct());
        assert_eq!(query.joins().len(), 2);
        assert_eq!(
            query.count_sql(),
            "SELECT COUNT(DISTINCT provider.id) FROM provider \
             LEFT JOIN patient AS patients_1 ON patients_1.provider_id = provider.id \
             LEFT JOIN hospital AS hospital_2 ON hospital_2.id = provider.hospital_id \
             WHERE patients_1.id IN (?, ?) AND hospital_2.id = ?"
        );
    }

    #[test]
    fn test_parse_specialty_and_hospital() {
        let pairs = vec![
            ("specialty.doesNotContain".to_string(), "derm".to_string()),
            ("hospitalId.specified".to_string(), "true".to_string()),
        ];
        let criteria: ProviderCriteria = parse_criteria(&pairs).unwrap();
        assert_eq!(
            criteria.specialty,
            Some(StringFilter::new().does_not_contain("derm"))
        );
        assert_eq!(
            criteria.hospital_id,
            Some(RangeFilter::new().specified(true))
        );
        assert_eq!(criteria.distinct, None);
    }

    #[test]
    fn test_display() {
        let criteria = ProviderCriteria {
            patient_id: Some(RangeFilter::new().equals(3i64)),
            ..Default::default()
        };
        assert_eq!(
            criteria.to_string(),
            "ProviderCriteria{patientId=RangeFilter [equals=3]}"
        );
    }
}
