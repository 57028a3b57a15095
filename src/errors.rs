use thiserror::Error;

/// Enumerates errors returned when reading a date from text.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DateError {
    /// The text does not have the shape `YYYY-MM-DD`.
    #[error("birthDate must be in YYYY-MM-DD format")]
    Format { text: String },

    /// The text has the right shape but names a day that doesn't exist.
    #[error("Invalid birthDate")]
    InvalidDate { year: i32, month: u8, day: u8 },
}

/// Enumerates high-level errors returned by this library.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Represents a birth date that could not be read.
    #[error("{0}")]
    Date(#[from] DateError),

    /// Represents a birth date later than today.
    #[error("birthDate must not be in the future")]
    BirthDateInFuture,

    /// Represents a name that is empty once normalized.
    #[error("Name must not be blank")]
    BlankName,

    /// Represents a submission without a name or a birth date.
    #[error("Name and birthDate are required")]
    MissingFields,

    /// Represents a month outside 1 to 12.
    #[error("Month must be between 1 and 12")]
    InvalidMonth,

    /// Represents an upcoming-birthday window that isn't a day count.
    #[error("days must be a non-negative whole number")]
    InvalidWindow,

    /// Represents an ID that matches no student.
    #[error("Student not found")]
    StudentNotFound,

    /// Represents a store whose lock was poisoned by a panicking writer.
    #[error("Student store unavailable")]
    StoreUnavailable,
}
