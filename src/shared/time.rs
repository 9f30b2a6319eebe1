use chrono::{DateTime, Utc};

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| format!("invalid RFC 3339 timestamp `{raw}`: {err}"))
}

pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}
