//! Aggregated counts and final report rows

/// Number of enriched cases sharing a (municipality, period) key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AggregatedCount {
    /// Municipality name
    pub municipality: String,
    /// Period label
    pub period: String,
    /// Number of cases
    pub count: u64,
}

/// One cell of the final municipality × period grid
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReportRow {
    /// `municipio`
    pub municipality: String,
    /// `mes`
    pub period: String,
    /// `quantidade`
    pub quantity: u64,
}

impl ReportRow {
    /// Create a report row
    pub fn new(municipality: impl Into<String>, period: impl Into<String>, quantity: u64) -> Self {
        Self {
            municipality: municipality.into(),
            period: period.into(),
            quantity,
        }
    }
}
