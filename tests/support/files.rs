use std::io::Write;

use tempfile::NamedTempFile;

use betslip::testkit::catalogue::sample_payload_json;

/// Write `contents` to a temporary file with the given extension.
///
/// The file is removed when the returned handle drops.
pub fn temp_file(contents: &str, extension: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("betslip-test-")
        .suffix(&format!(".{extension}"))
        .tempfile()
        .expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

pub fn temp_config(contents: &str) -> NamedTempFile {
    temp_file(contents, "toml")
}

/// Temporary JSON file holding the testkit sample payload.
pub fn sample_events_file() -> NamedTempFile {
    temp_file(&sample_payload_json(), "json")
}
