use csv::ReaderBuilder;
use shared_types::OnboardingError;

/// The import endpoint requires the uploaded part to carry exactly this
/// filename, regardless of what the user's file was called.
pub const FORWARD_FILENAME: &str = "Connections.csv";

/// Size ceiling for an uploaded connections export.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// One row of a LinkedIn connections export.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ConnectionRecord {
    pub first_name: String,
    pub last_name: String,
    pub connected_on: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub email_address: Option<String>,
    pub url: Option<String>,
}

/// Validate an upload before any network call is attempted: must look like
/// a CSV (by declared content type or filename) and fit under the ceiling.
pub fn validate_upload(
    filename: &str,
    content_type: Option<&str>,
    size_bytes: usize,
) -> Result<(), OnboardingError> {
    let is_csv = content_type == Some("text/csv")
        || content_type == Some("application/vnd.ms-excel")
        || filename.to_lowercase().ends_with(".csv");

    if !is_csv {
        return Err(OnboardingError::Validation(format!(
            "Expected a CSV file, got {}",
            content_type.unwrap_or("unknown type")
        )));
    }

    if size_bytes == 0 {
        return Err(OnboardingError::Validation(
            "Uploaded file is empty".to_string(),
        ));
    }

    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(OnboardingError::Validation(format!(
            "File is too large ({} bytes, limit {})",
            size_bytes, MAX_UPLOAD_BYTES
        )));
    }

    Ok(())
}

/// Parse a connections export. LinkedIn prepends a few lines of prose notes
/// before the header row in some exports; rows that fail to parse are
/// skipped rather than failing the whole file.
pub fn parse_connections(content: &[u8]) -> Result<Vec<ConnectionRecord>, OnboardingError> {
    let body = skip_preamble(content);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body);

    let headers = reader
        .headers()
        .map_err(|e| OnboardingError::Parse(e.to_string()))?
        .clone();

    let index_of = |name: &str| headers.iter().position(|h| h == name);

    let first_name_idx = index_of("First Name")
        .ok_or_else(|| OnboardingError::Parse("Missing 'First Name' column".to_string()))?;
    let last_name_idx = index_of("Last Name")
        .ok_or_else(|| OnboardingError::Parse("Missing 'Last Name' column".to_string()))?;
    let connected_on_idx = index_of("Connected On");
    let company_idx = index_of("Company");
    let position_idx = index_of("Position");
    let email_idx = index_of("Email Address");
    let url_idx = index_of("URL");

    let field = |record: &csv::StringRecord, idx: Option<usize>| -> Option<String> {
        idx.and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let mut records = Vec::new();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                eprintln!("Failed to parse CSV row: {}", e);
                continue;
            }
        };

        let first_name = record.get(first_name_idx).unwrap_or("").trim().to_string();
        let last_name = record.get(last_name_idx).unwrap_or("").trim().to_string();
        if first_name.is_empty() && last_name.is_empty() {
            continue;
        }

        records.push(ConnectionRecord {
            first_name,
            last_name,
            connected_on: field(&record, connected_on_idx).unwrap_or_default(),
            company: field(&record, company_idx),
            position: field(&record, position_idx),
            email_address: field(&record, email_idx),
            url: field(&record, url_idx),
        });
    }

    Ok(records)
}

/// Drop anything before the "First Name" header line.
fn skip_preamble(content: &[u8]) -> &[u8] {
    let mut offset = 0;
    for line in content.split(|&b| b == b'\n') {
        if line.starts_with(b"First Name") {
            return &content[offset..];
        }
        offset += line.len() + 1;
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
First Name,Last Name,URL,Email Address,Company,Position,Connected On
Jane,Doe,https://www.linkedin.com/in/janedoe,,Acme,CEO,22 Jan 2024
John,Smith,,john@example.com,,,01 Feb 2024
,,,,,,
";

    #[test]
    fn test_forward_filename_is_fixed() {
        assert_eq!(FORWARD_FILENAME, "Connections.csv");
    }

    #[test]
    fn test_validate_accepts_csv_by_type() {
        assert!(validate_upload("myconnections.csv", Some("text/csv"), 100).is_ok());
    }

    #[test]
    fn test_validate_accepts_csv_by_extension() {
        assert!(validate_upload("Export.CSV", Some("application/octet-stream"), 100).is_ok());
    }

    #[test]
    fn test_validate_rejects_non_csv() {
        let err = validate_upload("photo.png", Some("image/png"), 100).unwrap_err();
        assert_eq!(err.code(), "validation");
    }

    #[test]
    fn test_validate_rejects_oversize_and_empty() {
        assert!(validate_upload("a.csv", Some("text/csv"), MAX_UPLOAD_BYTES + 1).is_err());
        assert!(validate_upload("a.csv", Some("text/csv"), 0).is_err());
    }

    #[test]
    fn test_parse_connections() {
        let records = parse_connections(SAMPLE.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].first_name, "Jane");
        assert_eq!(records[0].company.as_deref(), Some("Acme"));
        assert_eq!(records[1].email_address.as_deref(), Some("john@example.com"));
        assert!(records[1].company.is_none());
    }

    #[test]
    fn test_parse_skips_export_preamble() {
        let with_notes = format!("Notes:\n\"When exporting...\"\n\n{}", SAMPLE);
        let records = parse_connections(with_notes.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_parse_missing_columns_is_a_parse_error() {
        let err = parse_connections(b"Foo,Bar\n1,2\n").unwrap_err();
        assert_eq!(err.code(), "parse");
    }
}
