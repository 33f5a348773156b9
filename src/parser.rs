use csv::Reader;
use std::io::Read;
use std::path::Path;
use log::debug;
use crate::schedule::TeacherEligibility;

/// Splits a comma-separated teacher list, dropping blanks
pub fn parse_teacher_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Loads the subject -> teachers mapping from a CSV file
///
/// Expects a `Subject` column and a `Teachers` column holding a comma-separated
/// list (quoted in the CSV). Header matching ignores case; the first two columns
/// are used when the headers are not found. A subject listed twice keeps its
/// last row.
pub fn load_teacher_mapping<P: AsRef<Path>>(csv_path: P) -> Result<TeacherEligibility, Box<dyn std::error::Error>> {
    let reader = Reader::from_path(csv_path)?;
    read_teacher_mapping(reader)
}

/// Same as [`load_teacher_mapping`], from any reader
pub fn read_teacher_mapping<R: Read>(mut reader: Reader<R>) -> Result<TeacherEligibility, Box<dyn std::error::Error>> {
    let headers = reader.headers()?;
    let subject_col = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case("subject"))
        .unwrap_or(0);
    let teachers_col = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case("teachers"))
        .unwrap_or(1);

    let mut eligibility = TeacherEligibility::new();
    for result in reader.records() {
        let record = result?;
        let subject = record.get(subject_col).unwrap_or("").trim();
        if subject.is_empty() {
            continue;
        }
        let teachers = parse_teacher_list(record.get(teachers_col).unwrap_or(""));
        if teachers.is_empty() {
            debug!("No teachers listed for {}", subject);
        }
        eligibility.insert(subject, teachers);
    }
    Ok(eligibility)
}
