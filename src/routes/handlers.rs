use std::time::{Duration, Instant};

use log::{debug, o, Logger};
use uuid::Uuid;
use warp::{
    http::StatusCode,
    reject,
    reply::{json, with_header, with_status, Reply},
};

use crate::enrichment;
use crate::environment::Environment;
use crate::errors::BackendError;
use crate::routes::{
    query::UpcomingQuery,
    rejection::{Context, Rejection},
    response::SuccessResponse,
};
use crate::student::{Id, StudentSubmission};

const SERVER_TIMING_HEADER: &str = "server-timing";
type RouteResult = Result<Box<dyn Reply>, reject::Rejection>;

macro_rules! timed {
    ($($expression:stmt);+) => {
        let start = Instant::now();

        let result = { $($expression)+ };

        Ok(Box::new(with_header(
            result,
            SERVER_TIMING_HEADER,
            format_server_timing(start.elapsed()),
        )) as Box<dyn Reply>)
    };
}

pub async fn list(environment: Environment) -> RouteResult {
    timed! {
        let today = (environment.today)();
        let students = environment
            .store
            .all()
            .map_err(|e: BackendError| Rejection::new(Context::list(), e))?;

        json(&enrichment::enrich_all(students, today))
    }
}

pub async fn retrieve(environment: Environment, id: String) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::retrieve(id.clone()), e);
        let logger = request_logger(&environment);

        let student_id = parse_id(&id).map_err(error_handler)?;
        debug!(logger, "Retrieving student..."; "id" => student_id);

        let student = environment
            .store
            .find(student_id)
            .map_err(error_handler)?
            .ok_or(BackendError::StudentNotFound)
            .map_err(error_handler)?;

        json(&enrichment::enrich(student, (environment.today)()))
    }
}

pub async fn create(environment: Environment, submission: StudentSubmission) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::create(), e);
        let logger = request_logger(&environment);
        let today = (environment.today)();

        debug!(logger, "Validating submission...");
        let new_student = submission.into_new_student(today).map_err(error_handler)?;

        debug!(logger, "Adding student..."; "name" => &new_student.name);
        let student = environment.store.insert(new_student).map_err(error_handler)?;
        let location = environment.urls.student(student.id()).to_string();
        debug!(logger, "Added student"; "id" => student.id());

        with_header(
            with_status(json(&enrichment::enrich(student, today)), StatusCode::CREATED),
            "location",
            location,
        )
    }
}

pub async fn update(
    environment: Environment,
    id: String,
    submission: StudentSubmission,
) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::update(id.clone()), e);
        let logger = request_logger(&environment);
        let today = (environment.today)();

        let student_id = parse_id(&id).map_err(error_handler)?;

        debug!(logger, "Validating update..."; "id" => student_id);
        let update = submission.into_update(today).map_err(error_handler)?;

        debug!(logger, "Updating student..."; "id" => student_id);
        let student = environment
            .store
            .update(student_id, update)
            .map_err(error_handler)?
            .ok_or(BackendError::StudentNotFound)
            .map_err(error_handler)?;

        json(&enrichment::enrich(student, today))
    }
}

pub async fn delete(environment: Environment, id: String) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::delete(id.clone()), e);
        let logger = request_logger(&environment);

        let student_id = parse_id(&id).map_err(error_handler)?;
        debug!(logger, "Deleting student..."; "id" => student_id);

        let student = environment
            .store
            .remove(student_id)
            .map_err(error_handler)?
            .ok_or(BackendError::StudentNotFound)
            .map_err(error_handler)?;

        json(&SuccessResponse::Deleted {
            message: "Student deleted",
            deleted_student: enrichment::enrich(student, (environment.today)()),
        })
    }
}

pub async fn birth_month(environment: Environment, month: String) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::birth_month(month.clone()), e);

        let month_number = parse_month(&month).map_err(error_handler)?;
        let students = environment.store.all().map_err(error_handler)?;
        let students = enrichment::born_in(students, month_number, (environment.today)());

        json(&SuccessResponse::BirthMonth {
            month: month_number,
            count: students.len(),
            students,
        })
    }
}

pub async fn upcoming(environment: Environment, query: UpcomingQuery) -> RouteResult {
    timed! {
        let UpcomingQuery { days } = query;
        let error_handler = |e: BackendError| Rejection::new(Context::upcoming(days.clone()), e);
        let logger = request_logger(&environment);

        let window_days = match &days {
            Some(text) => parse_window(text).map_err(error_handler)?,
            None => environment.config.upcoming_window_days,
        };

        let today = (environment.today)();
        debug!(logger, "Looking for upcoming birthdays..."; "today" => %today, "window_days" => window_days);

        let students = environment
            .store
            .all()
            .map_err(error_handler)?;
        let students = enrichment::upcoming(students, today, window_days);

        json(&SuccessResponse::Upcoming {
            count: students.len(),
            window_days,
            students,
        })
    }
}

fn request_logger(environment: &Environment) -> Logger {
    environment
        .logger
        .new(o!("request" => Uuid::new_v4().to_string()))
}

/// IDs that can't name a student are reported the same way as IDs
/// that don't.
fn parse_id(id: &str) -> Result<Id, BackendError> {
    id.parse().map_err(|_| BackendError::StudentNotFound)
}

fn parse_month(month: &str) -> Result<u8, BackendError> {
    month
        .parse::<u8>()
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or(BackendError::InvalidMonth)
}

fn parse_window(days: &str) -> Result<u32, BackendError> {
    days.parse().map_err(|_| BackendError::InvalidWindow)
}

fn format_server_timing(seconds: Duration) -> String {
    format!("handler;dur={}", seconds.as_secs_f64() * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::{parse_id, parse_month, parse_window};
    use crate::errors::BackendError;

    #[test]
    fn months_outside_the_year_are_rejected() {
        assert_eq!(parse_month("1").ok(), Some(1));
        assert_eq!(parse_month("08").ok(), Some(8));
        assert_eq!(parse_month("12").ok(), Some(12));

        for month in &["0", "13", "-1", "", "august", "8.5", "256"] {
            assert!(matches!(parse_month(month), Err(BackendError::InvalidMonth)), "{:?}", month);
        }
    }

    #[test]
    fn windows_must_be_day_counts() {
        assert_eq!(parse_window("0").ok(), Some(0));
        assert_eq!(parse_window("30").ok(), Some(30));

        for days in &["", "abc", "-1", "1.5", "99999999999"] {
            assert!(matches!(parse_window(days), Err(BackendError::InvalidWindow)), "{:?}", days);
        }
    }

    #[test]
    fn malformed_ids_are_not_found() {
        assert_eq!(parse_id("3").ok(), Some(3));
        assert!(matches!(parse_id("three"), Err(BackendError::StudentNotFound)));
        assert!(matches!(parse_id("-3"), Err(BackendError::StudentNotFound)));
    }
}
