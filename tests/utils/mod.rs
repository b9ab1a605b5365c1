//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tb_monthly_report::{InputPaths, ReportConfig};
use tempfile::TempDir;

/// Header of the raw extract, with one column the pipeline ignores
pub const EXTRACT_HEADER: &str = "nu_notificacao,tp_entrada,tp_pop_liberdade,tp_pop_rua,tp_forma,tp_situacao_encerramento,co_uf_residencia_atual,co_municipio_residencia_atual,dt_nascimento,dt_diagnostico_sintoma";

pub const GOIANIA: i64 = 520_870;
pub const ANAPOLIS: i64 = 520_110;
pub const IGNORED: i64 = 520_000;
pub const BRASILIA: i64 = 530_010;

/// One notification record of the raw extract
#[derive(Debug, Clone)]
pub struct Notification {
    pub entry_type: String,
    pub clinical_form: String,
    pub closure_status: String,
    pub municipality: String,
    pub diagnosis_date: String,
}

impl Notification {
    /// A new pulmonary case in `municipality` diagnosed on `date` (`yyyy-mm-dd`)
    pub fn new_case(municipality: i64, date: &str) -> Self {
        Self {
            entry_type: "1".into(),
            clinical_form: "1".into(),
            closure_status: "1".into(),
            municipality: municipality.to_string(),
            diagnosis_date: date.into(),
        }
    }

    pub fn entry_type(mut self, code: &str) -> Self {
        self.entry_type = code.into();
        self
    }

    pub fn clinical_form(mut self, code: &str) -> Self {
        self.clinical_form = code.into();
        self
    }

    pub fn closure_status(mut self, code: &str) -> Self {
        self.closure_status = code.into();
        self
    }

    fn to_line(&self, id: usize) -> String {
        format!(
            "{id},{},2,2,{},{},52,{},1980-01-01,{}",
            self.entry_type,
            self.clinical_form,
            self.closure_status,
            self.municipality,
            self.diagnosis_date
        )
    }
}

/// Reference municipalities, preceded by the metadata row the loader drops
pub fn default_municipalities() -> Vec<(i64, &'static str, &'static str)> {
    vec![
        (GOIANIA, "Goiás", "Goiânia"),
        (ANAPOLIS, "Goiás", "Anápolis"),
        (IGNORED, "Goiás", "Município ignorado - GO"),
        (BRASILIA, "Distrito Federal", "Brasília"),
    ]
}

/// A data directory laid out like production inputs
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    /// Write an extract, the default municipality table and a calendar
    /// covering 2020-12-01 through 2021-03-31
    pub fn new(notifications: &[Notification]) -> Self {
        Self::with_municipalities(notifications, &default_municipalities())
    }

    pub fn with_municipalities(
        notifications: &[Notification],
        municipalities: &[(i64, &str, &str)],
    ) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let fixture = Self { dir };
        fixture.write_extract(notifications);
        fixture.write_municipalities(municipalities);
        fixture.write_calendar(
            NaiveDate::from_ymd_opt(2020, 12, 1).unwrap(),
            NaiveDate::from_ymd_opt(2021, 3, 31).unwrap(),
        );
        fixture
    }

    pub fn paths(&self) -> InputPaths {
        InputPaths::under(self.dir.path())
    }

    /// Production configuration over this directory, with a pinned run date
    pub fn config(&self, run_date: NaiveDate) -> ReportConfig {
        ReportConfig::default()
            .with_paths(self.paths())
            .with_run_date(run_date)
    }

    pub fn write_extract(&self, notifications: &[Notification]) {
        let mut content = format!("{EXTRACT_HEADER}\n");
        for (id, n) in notifications.iter().enumerate() {
            content.push_str(&n.to_line(id));
            content.push('\n');
        }
        write(&self.paths().cases, &content);
    }

    pub fn write_municipalities(&self, municipalities: &[(i64, &str, &str)]) {
        let mut content =
            String::from("dmun_codibge,dmun_uf_nome,dmun_municipio,dmun_regiao\n-1,-,-,-\n");
        for (code, state, name) in municipalities {
            content.push_str(&format!("{code},{state},{name},Centro-Oeste\n"));
        }
        write(&self.paths().municipalities, &content);
    }

    pub fn write_calendar(&self, from: NaiveDate, to: NaiveDate) {
        let mut content = String::from("date_key,month_name,date_medium,year4\n");
        for (key, day) in from.iter_days().take_while(|d| *d <= to).enumerate() {
            content.push_str(&format!(
                "{key},{},{},{}\n",
                day.format("%B"),
                day.format("%d/%m/%Y"),
                day.format("%Y")
            ));
        }
        write(&self.paths().calendar, &content);
    }

    pub fn output(&self) -> PathBuf {
        self.paths().output
    }

    /// Data lines of the written report, header excluded
    pub fn output_lines(&self) -> Vec<String> {
        let content = fs::read_to_string(self.output()).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("municipio,mes,quantidade"));
        lines.map(str::to_string).collect()
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
