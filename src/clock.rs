use std::sync::Arc;

use time::OffsetDateTime;

use crate::date::ReferenceDate;

/// Supplies the reference date for a request.
pub type Today = dyn Fn() -> ReferenceDate + Send + Sync;

/// Reads the current local date, or the UTC date when the local offset
/// can't be determined.
pub fn system() -> Arc<Today> {
    Arc::new(|| {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        ReferenceDate::from(now.date())
    })
}

/// Always answers `date`.
pub fn pinned(date: ReferenceDate) -> Arc<Today> {
    Arc::new(move || date)
}
