use serde::Deserialize;

/// Query string for the upcoming birthdays listing.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpcomingQuery {
    /// How many days ahead to look. Defaults to the configured window.
    /// Kept as text so a bad value is reported by the handler instead of
    /// failing the route match.
    pub(crate) days: Option<String>,
}
