// src/dataset/integrity.rs
// =============================================================================
// Cross-file consistency checks for the labor-market dataset.
//
// What gets checked:
// 1. wages:       Country and Sector are known values
// 2. resources:   sector keys, per-sector country keys, evidence providers
// 3. occupations: Country is known, and every (Master_Occ_ID, Country) pair
//                 has a wage record with the same (Occ_ID, Country)
//
// Every occupation without wage data is a "Data Gap". For each one we build
// a placeholder wage record with zeroed percentiles that can be pasted
// straight into wages.json.
// =============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt::{self, Write};

pub const EXPECTED_SECTORS: [&str; 3] = ["Agriculture", "Renewables", "Digital/AI"];

pub const EXPECTED_COUNTRIES: [&str; 8] = [
    "Burundi",
    "DRC",
    "Kenya",
    "Rwanda",
    "Somalia",
    "South Sudan",
    "Tanzania",
    "Uganda",
];

/// Top-level resource keys that are not sectors
const NON_SECTOR_RESOURCE_KEYS: [&str; 4] = [
    "regional_multipliers",
    "skills_credentials",
    "global_resources",
    "evidence_providers",
];

/// Evidence providers may span every sector
const MULTI_SECTOR: &str = "Multi";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    InvalidCountry,
    InvalidSector,
    InvalidSectorKey,
    InvalidCountryKey,
    NonCanonicalCountry,
    DataGap,
    UnexpectedShape,
}

/// One inconsistency, located precisely enough to fix by hand
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub kind: IssueKind,
    /// e.g. `Wages[3]`, `Resources[Digital/AI]`, `Occupations[0]`
    pub location: String,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// A wage row as stored in wages.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageRecord {
    #[serde(rename = "Occ_ID")]
    pub occ_id: String,
    #[serde(rename = "Occupation")]
    pub occupation: String,
    #[serde(rename = "Sector")]
    pub sector: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Avg_Monthly_Wage")]
    pub avg_monthly_wage: String,
    #[serde(rename = "P25_Monthly_Wage")]
    pub p25_monthly_wage: String,
    #[serde(rename = "P50_Monthly_Wage")]
    pub p50_monthly_wage: String,
    #[serde(rename = "P75_Monthly_Wage")]
    pub p75_monthly_wage: String,
    #[serde(rename = "OJA_Count")]
    pub oja_count: String,
}

impl WageRecord {
    /// Stand-in for a missing wage record: zeroed wages, unknown ad count.
    pub fn placeholder(occ_id: &str, occupation: &str, sector: &str, country: &str) -> Self {
        WageRecord {
            occ_id: occ_id.to_string(),
            occupation: occupation.to_string(),
            sector: sector.to_string(),
            country: country.to_string(),
            avg_monthly_wage: "0".to_string(),
            p25_monthly_wage: "0".to_string(),
            p50_monthly_wage: "0".to_string(),
            p75_monthly_wage: "0".to_string(),
            oja_count: "N/A".to_string(),
        }
    }
}

/// The loaded dataset. A file that failed to load is `None` and its checks
/// are skipped.
#[derive(Debug, Default)]
pub struct Dataset {
    pub wages: Option<Value>,
    pub resources: Option<Value>,
    pub skills: Option<Value>,
    pub occupations: Option<Value>,
}

#[derive(Debug, Default, Serialize)]
pub struct IntegrityReport {
    pub issues: Vec<Issue>,
    /// Placeholder records for every data gap, ready to append to wages.json
    pub missing_wages: Vec<WageRecord>,
}

impl IntegrityReport {
    pub fn is_consistent(&self) -> bool {
        self.issues.is_empty()
    }

    fn push(&mut self, kind: IssueKind, location: impl Into<String>, message: impl Into<String>) {
        self.issues.push(Issue {
            kind,
            location: location.into(),
            message: message.into(),
        });
    }

    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind == kind).count()
    }

    // Renders the verdict and the remediation JSON
    pub fn render(&self) -> anyhow::Result<String> {
        let mut out = String::new();
        for issue in &self.issues {
            writeln!(out, "  ⚠️ {}", issue)?;
        }
        writeln!(out, "{}", "-".repeat(30))?;
        if self.is_consistent() {
            writeln!(out, "✅ SUCCESS: Data is consistent.")?;
            return Ok(out);
        }

        writeln!(out, "❌ FAILED: Found {} inconsistencies.", self.issues.len())?;
        if !self.missing_wages.is_empty() {
            writeln!(out)?;
            writeln!(
                out,
                "💡 To fix missing wage data, append the following JSON to wages.json:"
            )?;
            writeln!(out, "{}", serde_json::to_string_pretty(&self.missing_wages)?)?;
        }
        Ok(out)
    }
}

// Runs every check the loaded files allow
pub fn validate(dataset: &Dataset) -> IntegrityReport {
    let mut report = IntegrityReport::default();

    let wage_lookup = dataset
        .wages
        .as_ref()
        .and_then(|wages| check_wages(wages, &mut report));

    if let Some(resources) = &dataset.resources {
        check_resources(resources, &mut report);
    }

    // Skills only have to load; nothing else references them yet
    if let Some(skills) = &dataset.skills {
        tracing::debug!(is_list = skills.is_array(), "skills file loaded");
    }

    if let Some(occupations) = &dataset.occupations {
        check_occupations(occupations, wage_lookup.as_ref(), &mut report);
    }

    report
}

// Checks wage records and returns the set of (Occ_ID, Country) pairs present
//
// None when the file isn't a list: there is no lookup to check gaps against.
fn check_wages(wages: &Value, report: &mut IntegrityReport) -> Option<HashSet<(String, String)>> {
    let Some(entries) = wages.as_array() else {
        report.push(IssueKind::UnexpectedShape, "Wages", "expected a list of wage records");
        return None;
    };
    let mut lookup = HashSet::new();
    tracing::info!(records = entries.len(), "checking wages");

    for (i, entry) in entries.iter().enumerate() {
        let location = format!("Wages[{}]", i);
        let country = str_field(entry, "Country");
        let sector = str_field(entry, "Sector");

        if !is_expected_country(country) {
            report.push(IssueKind::InvalidCountry, &location, invalid("Country", country));
        }
        if !is_expected_sector(sector) {
            report.push(IssueKind::InvalidSector, &location, invalid("Sector", sector));
        }

        if let (Some(occ_id), Some(country)) = (non_empty(str_field(entry, "Occ_ID")), non_empty(country)) {
            lookup.insert((occ_id.to_string(), country.to_string()));
        }
    }
    Some(lookup)
}

fn check_resources(resources: &Value, report: &mut IntegrityReport) {
    let Some(map) = resources.as_object() else {
        report.push(IssueKind::UnexpectedShape, "Resources", "expected an object keyed by sector");
        return;
    };
    tracing::info!("checking digital resources");

    for (key, section) in map {
        if NON_SECTOR_RESOURCE_KEYS.contains(&key.as_str()) {
            continue;
        }
        if !EXPECTED_SECTORS.contains(&key.as_str()) {
            report.push(
                IssueKind::InvalidSectorKey,
                "Resources",
                format!("Invalid Top-Level Sector Key '{}'", key),
            );
            continue;
        }

        let countries = section.get("country_resources").and_then(Value::as_object);
        for country in countries.into_iter().flat_map(|m| m.keys()) {
            if !EXPECTED_COUNTRIES.contains(&country.as_str()) {
                report.push(
                    IssueKind::InvalidCountryKey,
                    format!("Resources[{}]", key),
                    format!("Invalid Country Key '{}'", country),
                );
            }
        }
    }

    let providers = map.get("evidence_providers").and_then(Value::as_array);
    for (i, provider) in providers.into_iter().flatten().enumerate() {
        let location = format!("Resources[Evidence][{}]", i);
        let sector = str_field(provider, "sector");
        if !is_expected_sector(sector) && sector != Some(MULTI_SECTOR) {
            report.push(IssueKind::InvalidSector, &location, invalid("Sector", sector));
        }
        if str_field(provider, "country") == Some("DR Congo") {
            report.push(
                IssueKind::NonCanonicalCountry,
                &location,
                "Found 'DR Congo', expected 'DRC'",
            );
        }
    }
}

// Checks occupations; flags data gaps only when wages were available
fn check_occupations(
    occupations: &Value,
    wage_lookup: Option<&HashSet<(String, String)>>,
    report: &mut IntegrityReport,
) {
    let Some(entries) = occupations.as_array() else {
        report.push(IssueKind::UnexpectedShape, "Occupations", "expected a list of occupation records");
        return;
    };
    tracing::info!(records = entries.len(), "checking occupations");

    for (i, occ) in entries.iter().enumerate() {
        let country = str_field(occ, "Country");
        if !is_expected_country(country) {
            report.push(
                IssueKind::InvalidCountry,
                format!("Occupations[{}]", i),
                invalid("Country", country),
            );
        }

        let (Some(lookup), Some(master_id), Some(country)) =
            (wage_lookup, non_empty(str_field(occ, "Master_Occ_ID")), non_empty(country))
        else {
            continue;
        };
        if lookup.contains(&(master_id.to_string(), country.to_string())) {
            continue;
        }

        report.push(
            IssueKind::DataGap,
            "Data Gap",
            format!(
                "Occupation '{}' in '{}' has no matching entry in wages.json",
                master_id, country
            ),
        );
        report.missing_wages.push(WageRecord::placeholder(
            master_id,
            str_field(occ, "Occupation_Role").unwrap_or("Unknown"),
            str_field(occ, "Sector").unwrap_or("Unknown"),
            country,
        ));
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn is_expected_country(country: Option<&str>) -> bool {
    country.is_some_and(|c| EXPECTED_COUNTRIES.contains(&c))
}

fn is_expected_sector(sector: Option<&str>) -> bool {
    sector.is_some_and(|s| EXPECTED_SECTORS.contains(&s))
}

fn invalid(field: &str, value: Option<&str>) -> String {
    format!("Invalid {} '{}'", field, value.unwrap_or("<missing>"))
}
