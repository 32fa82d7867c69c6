use std::sync::OnceLock;

use scraper::Selector;
use serde_json::Value;

use super::loader::RawDocument;
use super::lookup::{lookup, scalar_at, text_at};
use super::markup::strip_tags;
use super::SkipReason;
use crate::record::{AdditionalDetails, CanonicalJobRecord, NOT_FOUND};

const TITLE: &[&str] = &["title"];
const COMPANY: &[&str] = &["hiringOrganization", "name"];
const LOCATION: &[&str] = &["jobLocation", "address", "addressLocality"];
const DESCRIPTION: &[&str] = &["description"];
const SALARY: &[&str] = &["baseSalary", "value", "value"];
const EDUCATION: &[&str] = &["educationRequirements", "credentialCategory"];
const EXPERIENCE: &[&str] = &["experienceRequirements", "monthsOfExperience"];

fn ld_json() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap())
}

/// The first JSON-LD block on the page, parsed in a single attempt.
pub fn metadata_block(doc: &RawDocument) -> Result<Value, SkipReason> {
    let script = doc
        .html()
        .select(ld_json())
        .next()
        .ok_or(SkipReason::NoMetadataBlock)?;
    let text: String = script.text().collect();
    Ok(serde_json::from_str(text.trim())?)
}

/// Map a page's metadata into a record. Individual missing fields fall
/// back to [`NOT_FOUND`]; a missing role or company rejects the posting.
pub fn extract(doc: &RawDocument, role_code: &str) -> Result<CanonicalJobRecord, SkipReason> {
    let meta = metadata_block(doc)?;
    normalize(&meta, role_code)
}

pub fn normalize(meta: &Value, role_code: &str) -> Result<CanonicalJobRecord, SkipReason> {
    let role = text_at(meta, TITLE);
    let company = text_at(meta, COMPANY);

    match (role == NOT_FOUND, company == NOT_FOUND) {
        (true, true) => return Err(SkipReason::InvalidPosting("role and company")),
        (true, false) => return Err(SkipReason::InvalidPosting("role")),
        (false, true) => return Err(SkipReason::InvalidPosting("company")),
        (false, false) => {}
    }

    let description = match lookup(meta, DESCRIPTION) {
        Some(Value::String(raw)) => strip_tags(raw),
        _ => NOT_FOUND.to_string(),
    };

    Ok(CanonicalJobRecord {
        role,
        role_code: role_code.to_string(),
        company,
        location: text_at(meta, LOCATION),
        description,
        additional_details: AdditionalDetails {
            salary_estimate: scalar_at(meta, SALARY),
            education: text_at(meta, EDUCATION),
            years_experience: scalar_at(meta, EXPERIENCE),
        },
    })
}
