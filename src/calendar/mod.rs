//! Reporting periods
//!
//! Period labels have the form `<Mês> de <Ano>` in Brazilian Portuguese.
//! `chrono` only renders English month names, so labels are produced in
//! English and translated through a fixed table.

pub mod period;

pub use period::{MonthPeriod, PeriodUniverse, period_universe};

/// English month name to Portuguese month name
pub const MONTH_TRANSLATIONS: [(&str, &str); 12] = [
    ("January", "Janeiro"),
    ("February", "Fevereiro"),
    ("March", "Março"),
    ("April", "Abril"),
    ("May", "Maio"),
    ("June", "Junho"),
    ("July", "Julho"),
    ("August", "Agosto"),
    ("September", "Setembro"),
    ("October", "Outubro"),
    ("November", "Novembro"),
    ("December", "Dezembro"),
];

/// Connector between month and year in a period label
pub const LABEL_CONNECTOR: &str = " de ";

/// Why a label could not be translated
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslationError {
    /// The label is not `<month> de <year>`
    #[error("malformed period label '{0}'")]
    MalformedLabel(String),
    /// The month name is in neither column of the table
    #[error("unknown month name '{0}'")]
    UnknownMonth(String),
}

/// Translate an English month name; Portuguese names map to themselves
#[must_use]
pub fn translate_month(name: &str) -> Option<&'static str> {
    MONTH_TRANSLATIONS
        .iter()
        .find(|(en, pt)| *en == name || *pt == name)
        .map(|(_, pt)| *pt)
}

/// Join a month name and year into a period label
#[must_use]
pub fn period_label(month_name: &str, year: &str) -> String {
    format!("{month_name}{LABEL_CONNECTOR}{year}")
}

/// Translate a `<Month> de <Year>` label into Portuguese
pub fn translate_period_label(label: &str) -> Result<String, TranslationError> {
    let (month, year) = label
        .split_once(LABEL_CONNECTOR)
        .filter(|(m, y)| !m.is_empty() && !y.is_empty() && !y.contains(LABEL_CONNECTOR))
        .ok_or_else(|| TranslationError::MalformedLabel(label.to_string()))?;
    let month = translate_month(month)
        .ok_or_else(|| TranslationError::UnknownMonth(month.to_string()))?;
    Ok(period_label(month, year))
}

/// Translate a label, falling back to the raw label
///
/// Failures are logged and the raw label is pushed onto `untranslated`.
pub fn localize_label(label: &str, untranslated: &mut Vec<String>) -> String {
    match translate_period_label(label) {
        Ok(translated) => translated,
        Err(e) => {
            log::warn!("Keeping untranslated period label: {e}");
            if !untranslated.iter().any(|l| l == label) {
                untranslated.push(label.to_string());
            }
            label.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_every_month() {
        assert_eq!(translate_month("January"), Some("Janeiro"));
        assert_eq!(translate_month("March"), Some("Março"));
        assert_eq!(translate_month("December"), Some("Dezembro"));
        assert_eq!(translate_month("Março"), Some("Março"));
        assert_eq!(translate_month("january"), None);
    }

    #[test]
    fn test_translate_label() {
        assert_eq!(
            translate_period_label("February de 2021").unwrap(),
            "Fevereiro de 2021"
        );
        assert_eq!(
            translate_period_label("Fevereiro de 2021").unwrap(),
            "Fevereiro de 2021"
        );
        assert_eq!(
            translate_period_label("February 2021"),
            Err(TranslationError::MalformedLabel("February 2021".to_string()))
        );
        assert_eq!(
            translate_period_label("Febtember de 2021"),
            Err(TranslationError::UnknownMonth("Febtember".to_string()))
        );
    }

    #[test]
    fn test_localize_label_falls_back_to_raw() {
        let mut untranslated = Vec::new();
        assert_eq!(localize_label("Smarch de 2021", &mut untranslated), "Smarch de 2021");
        assert_eq!(localize_label("Smarch de 2021", &mut untranslated), "Smarch de 2021");
        assert_eq!(localize_label("May de 2022", &mut untranslated), "Maio de 2022");
        assert_eq!(untranslated, vec!["Smarch de 2021".to_string()]);
    }
}
