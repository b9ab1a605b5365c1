//! Column contracts of the notification extract and the two dimension tables.

use super::{ColumnDef, SemanticType, TableSchema};

/// Entry type (1 new case, 2 recidivism, 3 re-entry after default, 4 unknown,
/// 5 transferred-in, 6 post-mortem)
pub const ENTRY_TYPE: &str = "tp_entrada";
/// Deprived-of-liberty flag
pub const CUSTODY_STATUS: &str = "tp_pop_liberdade";
/// Homelessness flag
pub const HOMELESS_STATUS: &str = "tp_pop_rua";
/// Clinical form (1 pulmonary, 2 extrapulmonary, 3 both)
pub const CLINICAL_FORM: &str = "tp_forma";
/// Closure status (8 is regimen change)
pub const CLOSURE_STATUS: &str = "tp_situacao_encerramento";
/// Residence state code
pub const RESIDENCE_STATE: &str = "co_uf_residencia_atual";
/// Residence municipality code
pub const RESIDENCE_MUNICIPALITY: &str = "co_municipio_residencia_atual";
/// Birth date
pub const BIRTH_DATE: &str = "dt_nascimento";
/// Symptom diagnosis date
pub const DIAGNOSIS_DATE: &str = "dt_diagnostico_sintoma";

/// Municipality IBGE code
pub const MUNICIPALITY_CODE: &str = "dmun_codibge";
/// State name of the municipality
pub const MUNICIPALITY_STATE: &str = "dmun_uf_nome";
/// Municipality name
pub const MUNICIPALITY_NAME: &str = "dmun_municipio";

/// English month name
pub const CALENDAR_MONTH: &str = "month_name";
/// Date rendered `dd/mm/yyyy`
pub const CALENDAR_DATE: &str = "date_medium";
/// Four-digit year
pub const CALENDAR_YEAR: &str = "year4";

/// Raw notification extract
#[must_use]
pub fn case_extract_schema() -> TableSchema {
    TableSchema {
        name: "case extract",
        columns: vec![
            ColumnDef::new(ENTRY_TYPE, SemanticType::Categorical),
            ColumnDef::new(CUSTODY_STATUS, SemanticType::Categorical),
            ColumnDef::new(HOMELESS_STATUS, SemanticType::Categorical),
            ColumnDef::new(CLINICAL_FORM, SemanticType::Categorical),
            ColumnDef::new(CLOSURE_STATUS, SemanticType::Categorical),
            ColumnDef::new(RESIDENCE_STATE, SemanticType::Text),
            ColumnDef::new(RESIDENCE_MUNICIPALITY, SemanticType::Text),
            ColumnDef::new(BIRTH_DATE, SemanticType::Date),
            ColumnDef::new(DIAGNOSIS_DATE, SemanticType::Date),
        ],
        date_format: "%Y-%m-%d",
        skip_leading_rows: 0,
    }
}

/// Municipality dimension; its first data row is a metadata artifact
#[must_use]
pub fn municipality_schema() -> TableSchema {
    TableSchema {
        name: "municipality table",
        columns: vec![
            ColumnDef::new(MUNICIPALITY_CODE, SemanticType::Text),
            ColumnDef::new(MUNICIPALITY_STATE, SemanticType::Text),
            ColumnDef::new(MUNICIPALITY_NAME, SemanticType::Text),
        ],
        date_format: "%d/%m/%Y",
        skip_leading_rows: 1,
    }
}

/// Calendar dimension
#[must_use]
pub fn calendar_schema() -> TableSchema {
    TableSchema {
        name: "calendar table",
        columns: vec![
            ColumnDef::new(CALENDAR_MONTH, SemanticType::Text),
            ColumnDef::new(CALENDAR_DATE, SemanticType::Date),
            ColumnDef::new(CALENDAR_YEAR, SemanticType::Text),
        ],
        date_format: "%d/%m/%Y",
        skip_leading_rows: 0,
    }
}
