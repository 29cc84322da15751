//! Heuristic fallback — line-pattern extraction used when the LLM path is unusable.
//!
//! Pure and deterministic: no I/O, same input always yields the same record.
//! Each field takes the first line its own predicate matches, so a single line
//! may fill several fields (a "Jane Doe" header is both a name and a company).

use crate::extraction::links::LINKS_HEADER;
use crate::parsing::models::ResumeRecord;

const DEFAULT_TITLE: &str = "Professional";
const GENERIC_BIO: &str = "Experienced professional. Details could not be extracted automatically.";
const POSITION_KEYWORDS: &[&str] = &["engineer", "manager", "developer", "designer"];
const MIN_PHONE_LEN: usize = 10;

#[derive(Debug, Clone, Copy)]
enum Field {
    Email,
    Phone,
    Name,
    Location,
    Company,
    Position,
    Website,
    Linkedin,
}

/// One predicate per line-derived field. Fields are evaluated independently.
const RULES: &[(Field, fn(&str) -> bool)] = &[
    (Field::Email, looks_like_email),
    (Field::Phone, looks_like_phone),
    (Field::Name, looks_like_name),
    (Field::Location, looks_like_location),
    (Field::Company, looks_like_company),
    (Field::Position, looks_like_position),
    (Field::Website, looks_like_website),
    (Field::Linkedin, looks_like_linkedin),
];

fn slot(record: &mut ResumeRecord, field: Field) -> &mut Option<String> {
    match field {
        Field::Email => &mut record.email,
        Field::Phone => &mut record.phone,
        Field::Name => &mut record.name,
        Field::Location => &mut record.location,
        Field::Company => &mut record.company,
        Field::Position => &mut record.position,
        Field::Website => &mut record.website,
        Field::Linkedin => &mut record.linkedin,
    }
}

/// Builds a record from raw resume text without any external call.
pub fn heuristic_record(text: &str) -> ResumeRecord {
    let mut record = ResumeRecord::default();

    let lines = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && *l != LINKS_HEADER);
    for line in lines {
        for (field, matches) in RULES {
            let target = slot(&mut record, *field);
            if target.is_none() && matches(line) {
                *target = Some(line.to_string());
            }
        }
    }

    record.title = Some(
        record
            .position
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
    );
    record.bio = Some(synthesize_bio(&record));
    record
}

fn synthesize_bio(record: &ResumeRecord) -> String {
    let (name, position, company) = (
        record.name.as_deref(),
        record.position.as_deref(),
        record.company.as_deref(),
    );
    if name.is_none() && position.is_none() && company.is_none() {
        return GENERIC_BIO.to_string();
    }

    let mut bio = format!(
        "{} is a {}",
        name.unwrap_or("This candidate"),
        position.unwrap_or("professional")
    );
    if let Some(company) = company {
        bio.push_str(" at ");
        bio.push_str(company);
    }
    bio.push_str(", with experience in their field.");
    bio
}

fn looks_like_email(line: &str) -> bool {
    line.contains('@') && line.contains('.')
}

fn looks_like_phone(line: &str) -> bool {
    let has_digit = line.chars().any(|c| c.is_ascii_digit());
    let stripped_len = line
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .count();
    has_digit && stripped_len >= MIN_PHONE_LEN
}

fn looks_like_name(line: &str) -> bool {
    line.split_whitespace().count() <= 4
        && !line.contains('@')
        && !line.chars().any(|c| c.is_ascii_digit())
        && !line.contains("http")
}

fn looks_like_location(line: &str) -> bool {
    line.contains(',')
        && line
            .split_whitespace()
            .any(|token| token.chars().any(char::is_uppercase))
}

fn looks_like_company(line: &str) -> bool {
    line.split_whitespace().count() <= 3 && !line.contains('@') && !line.contains("http")
}

fn looks_like_position(line: &str) -> bool {
    let lower = line.to_lowercase();
    POSITION_KEYWORDS.iter().any(|k| lower.contains(k))
}

fn looks_like_website(line: &str) -> bool {
    line.contains("http") && !line.to_lowercase().contains("linkedin")
}

fn looks_like_linkedin(line: &str) -> bool {
    line.to_lowercase().contains("linkedin")
}
