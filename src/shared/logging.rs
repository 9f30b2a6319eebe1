use std::fs;
use std::io::Write;
use std::path::Path;

pub fn append_log_line(path: &Path, line: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")
}

/// Appends one JSON object per line. Logging never fails the caller.
pub fn append_json_log(path: &Path, payload: &serde_json::Value) {
    let Ok(line) = serde_json::to_string(payload) else {
        return;
    };
    let _ = append_log_line(path, &line);
}
