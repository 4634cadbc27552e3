use crate::triage::domain::{JobRecord, LocationChips};
use serde::Deserialize;
use std::io::Read;

pub(crate) fn parse_csv<R: Read>(reader: R) -> Result<Vec<JobRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let mut records = Vec::new();

    for row in csv_reader.deserialize::<RecordRow>() {
        records.push(row?.into_record());
    }

    Ok(records)
}

pub(crate) fn parse_json<R: Read>(reader: R) -> Result<Vec<JobRecord>, serde_json::Error> {
    serde_json::from_reader(reader)
}

/// Flat CSV row. List-valued cells arrive as delimited text.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RecordRow {
    title: String,
    company: String,
    #[serde(rename = "jobURL", alias = "jobUrl")]
    job_url: String,
    job_key: String,
    us_rule: String,
    applicant_regions: String,
    remote_rule: String,
    location_chips: String,
    title_text: String,
    description_snippet: String,
    salary_status: String,
    posting_date: String,
    valid_through: String,
}

impl RecordRow {
    fn into_record(self) -> JobRecord {
        JobRecord {
            title: self.title,
            company: self.company,
            job_url: self.job_url,
            job_key: self.job_key,
            us_rule: self.us_rule.into(),
            applicant_regions: split_regions(&self.applicant_regions),
            remote_rule: self.remote_rule.into(),
            location_chips: LocationChips::Joined(self.location_chips),
            title_text: self.title_text,
            description_snippet: self.description_snippet,
            salary_status: self.salary_status.into(),
            posting_date: self.posting_date,
            valid_through: self.valid_through,
        }
    }
}

fn split_regions(value: &str) -> Vec<String> {
    value
        .split(['|', ';'])
        .map(str::trim)
        .filter(|region| !region.is_empty())
        .map(str::to_string)
        .collect()
}
