/// All row identifiers are PostgreSQL UUIDs.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Parse an identifier carried as free text in a request payload.
///
/// Returns `None` when the value is absent or is not a UUID; callers treat
/// both as "lookup impossible".
pub fn parse_id(raw: Option<&str>) -> Option<DbId> {
    raw.and_then(|s| s.trim().parse().ok())
}
