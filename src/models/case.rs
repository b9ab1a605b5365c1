//! Case rows after cohort selection and enrichment

use chrono::NaiveDate;

/// A notification that satisfies the cohort predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredCase {
    /// Entry type code
    pub entry_type: Option<String>,
    /// Deprived-of-liberty flag
    pub custody_status: Option<String>,
    /// Homelessness flag
    pub homeless_status: Option<String>,
    /// Clinical form code
    pub clinical_form: Option<String>,
    /// Closure status code
    pub closure_status: Option<String>,
    /// Residence state code
    pub residence_state: Option<String>,
    /// Residence municipality code, coerced to an integer key
    pub municipality_code: i64,
    /// Birth date, if it parsed
    pub birth_date: Option<NaiveDate>,
    /// Symptom diagnosis date
    pub diagnosis_date: NaiveDate,
    /// Diagnosis date rendered `dd/mm/yyyy`, the calendar join key
    pub diagnosis_label: String,
}

/// A case joined to its municipality
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedCase {
    /// The underlying case
    pub case: FilteredCase,
    /// Municipality name (`municipio`)
    pub municipality: String,
    /// State name (`uf_nome`)
    pub state_name: String,
}

/// A case joined to its municipality and reporting month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedCase {
    /// The underlying case
    pub case: FilteredCase,
    /// Municipality name (`municipio`)
    pub municipality: String,
    /// State name (`uf_nome`)
    pub state_name: String,
    /// Period label (`mes`), e.g. `Janeiro de 2021`
    pub period: String,
}

impl EnrichedCase {
    /// Attach a period label to a located case
    #[must_use]
    pub fn new(located: LocatedCase, period: String) -> Self {
        Self {
            case: located.case,
            municipality: located.municipality,
            state_name: located.state_name,
            period,
        }
    }
}
