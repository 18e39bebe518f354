use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::application::repos::RepoError;

/// Nine fractional digits in UTC, so stored timestamps sort as text.
const STORED_TIMESTAMP: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:9]Z"
);

pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        sqlx::Error::Database(db) if db.message().contains("UNIQUE constraint failed") => {
            RepoError::Duplicate {
                constraint: db
                    .message()
                    .trim_start_matches("UNIQUE constraint failed: ")
                    .to_string(),
            }
        }
        sqlx::Error::Database(db) if db.message().contains("constraint failed") => {
            RepoError::Integrity {
                message: db.message().to_string(),
            }
        }
        sqlx::Error::Database(db)
            if db.message().contains("database is locked")
                || db.message().contains("database is busy") =>
        {
            RepoError::Timeout
        }
        sqlx::Error::PoolTimedOut => RepoError::Timeout,
        other => RepoError::from_persistence(other),
    }
}

pub(super) fn stored_timestamp(at: OffsetDateTime) -> Result<String, RepoError> {
    at.to_offset(UtcOffset::UTC)
        .format(STORED_TIMESTAMP)
        .map_err(RepoError::from_persistence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn stored_timestamps_are_fixed_width() {
        let coarse = stored_timestamp(datetime!(2025-01-01 12:00:00.12 UTC)).expect("format");
        let fine = stored_timestamp(datetime!(2025-01-01 12:00:00.123 UTC)).expect("format");

        assert_eq!(coarse, "2025-01-01T12:00:00.120000000Z");
        assert_eq!(fine, "2025-01-01T12:00:00.123000000Z");
        assert!(coarse < fine);
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let stored = stored_timestamp(datetime!(2025-01-01 14:00:00 +2)).expect("format");
        assert_eq!(stored, "2025-01-01T12:00:00.000000000Z");
    }
}
