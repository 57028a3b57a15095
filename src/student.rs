use serde::{Deserialize, Serialize};

use crate::date::{BirthDate, ReferenceDate};
use crate::errors::BackendError;
use crate::normalization;

/// A student ID, assigned by the store.
pub type Id = u32;

/// A single student in the roster.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// The ID of the student.
    id: Id,

    /// The display name, normalized.
    name: String,

    /// The date of birth.
    birth_date: BirthDate,
}

impl Student {
    pub fn new(id: Id, name: String, birth_date: BirthDate) -> Self {
        Self {
            id,
            name,
            birth_date,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn birth_date(&self) -> BirthDate {
        self.birth_date
    }

    /// Applies whichever fields `update` carries.
    pub(crate) fn apply(&mut self, update: StudentUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }

        if let Some(birth_date) = update.birth_date {
            self.birth_date = birth_date;
        }
    }
}

/// A validated student that has not been given an ID yet.
#[derive(Clone, Debug, PartialEq)]
pub struct NewStudent {
    pub(crate) name: String,
    pub(crate) birth_date: BirthDate,
}

impl NewStudent {
    pub fn new(name: String, birth_date: BirthDate) -> Self {
        Self { name, birth_date }
    }
}

/// A validated partial change to a student.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StudentUpdate {
    pub(crate) name: Option<String>,
    pub(crate) birth_date: Option<BirthDate>,
}

/// The body of a create or update request, before validation.
///
/// The birth date is kept as text so that a malformed value is
/// reported as a [`crate::errors::DateError`] rather than a generic
/// body error.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSubmission {
    #[serde(default)]
    #[serde(deserialize_with = "normalization::deserialize_option")]
    pub(crate) name: Option<String>,

    #[serde(default)]
    pub(crate) birth_date: Option<String>,
}

impl StudentSubmission {
    /// Validates a creation request. Both fields are required.
    pub fn into_new_student(self, today: ReferenceDate) -> Result<NewStudent, BackendError> {
        let name = self
            .name
            .filter(|name| !name.is_empty())
            .ok_or(BackendError::MissingFields)?;
        let birth_date = self.birth_date.ok_or(BackendError::MissingFields)?;

        Ok(NewStudent::new(name, validate_birth_date(&birth_date, today)?))
    }

    /// Validates an update request. Absent fields are left alone, but a
    /// field that is present must be as valid as on creation.
    pub fn into_update(self, today: ReferenceDate) -> Result<StudentUpdate, BackendError> {
        let name = match self.name {
            Some(name) if name.is_empty() => return Err(BackendError::BlankName),
            name => name,
        };

        let birth_date = self
            .birth_date
            .map(|text| validate_birth_date(&text, today))
            .transpose()?;

        Ok(StudentUpdate { name, birth_date })
    }
}

fn validate_birth_date(text: &str, today: ReferenceDate) -> Result<BirthDate, BackendError> {
    let birth_date = BirthDate::parse(text)?;

    if birth_date > today {
        return Err(BackendError::BirthDateInFuture);
    }

    Ok(birth_date)
}

/// A student along with their current age.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnrichedStudent {
    #[serde(flatten)]
    pub(crate) student: Student,

    pub(crate) age: i32,
}

impl EnrichedStudent {
    pub fn student(&self) -> &Student {
        &self.student
    }

    pub fn age(&self) -> i32 {
        self.age
    }
}

/// A student whose birthday falls inside the requested window.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingBirthday {
    #[serde(flatten)]
    pub(crate) student: Student,

    pub(crate) age: i32,

    /// The date the birthday is celebrated on.
    pub(crate) next_birthday: BirthDate,

    pub(crate) days_until_birthday: i64,

    /// The age reached on `next_birthday`.
    pub(crate) will_turn: i32,
}

impl UpcomingBirthday {
    pub fn student(&self) -> &Student {
        &self.student
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn next_birthday(&self) -> BirthDate {
        self.next_birthday
    }

    pub fn days_until_birthday(&self) -> i64 {
        self.days_until_birthday
    }

    pub fn will_turn(&self) -> i32 {
        self.will_turn
    }
}

#[cfg(test)]
mod tests {
    use super::{StudentSubmission, StudentUpdate};
    use crate::date::BirthDate;
    use crate::errors::{BackendError, DateError};

    fn today() -> BirthDate {
        BirthDate::from_ymd(2024, 3, 15).expect("build today")
    }

    fn submission(body: &str) -> StudentSubmission {
        serde_json::from_str(body).expect("parse submission")
    }

    #[test]
    fn creation_normalizes_the_name() {
        let student = submission(r#"{"name": "  Jeno ", "birthDate": "2000-04-23"}"#)
            .into_new_student(today())
            .expect("validate submission");

        assert_eq!(student.name, "Jeno");
        assert_eq!(student.birth_date.to_string(), "2000-04-23");
    }

    #[test]
    fn creation_requires_both_fields() {
        for body in &[
            r#"{"name": "Jeno"}"#,
            r#"{"birthDate": "2000-04-23"}"#,
            r#"{"name": "   ", "birthDate": "2000-04-23"}"#,
            r#"{"name": null, "birthDate": "2000-04-23"}"#,
            "{}",
        ] {
            assert!(
                matches!(submission(body).into_new_student(today()), Err(BackendError::MissingFields)),
                "{} should be missing fields",
                body
            );
        }
    }

    #[test]
    fn creation_reports_date_errors() {
        let result = submission(r#"{"name": "Jeno", "birthDate": "2000/04/23"}"#).into_new_student(today());
        assert!(matches!(result, Err(BackendError::Date(DateError::Format { .. }))));

        let result = submission(r#"{"name": "Jeno", "birthDate": "2021-02-30"}"#).into_new_student(today());
        assert!(matches!(result, Err(BackendError::Date(DateError::InvalidDate { .. }))));
    }

    #[test]
    fn births_after_today_are_rejected() {
        let result = submission(r#"{"name": "Jeno", "birthDate": "2024-03-16"}"#).into_new_student(today());
        assert!(matches!(result, Err(BackendError::BirthDateInFuture)));

        let result = submission(r#"{"name": "Jeno", "birthDate": "2024-03-15"}"#).into_new_student(today());
        assert!(result.is_ok());
    }

    #[test]
    fn updates_only_carry_present_fields() {
        let update = submission(r#"{"name": "Haechan"}"#)
            .into_update(today())
            .expect("validate update");

        assert_eq!(
            update,
            StudentUpdate {
                name: Some("Haechan".to_owned()),
                birth_date: None,
            }
        );

        let update = submission("{}").into_update(today()).expect("validate empty update");
        assert_eq!(update, StudentUpdate::default());
    }

    #[test]
    fn updates_validate_present_fields() {
        let result = submission(r#"{"name": ""}"#).into_update(today());
        assert!(matches!(result, Err(BackendError::BlankName)));

        let result = submission(r#"{"birthDate": "2023-02-29"}"#).into_update(today());
        assert!(matches!(result, Err(BackendError::Date(DateError::InvalidDate { .. }))));
    }
}
