use serde::Serialize;

use crate::student::{EnrichedStudent, UpcomingBirthday};

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SuccessResponse<'a> {
    BirthMonth {
        month: u8,
        count: usize,
        students: Vec<EnrichedStudent>,
    },
    #[serde(rename_all = "camelCase")]
    Deleted {
        message: &'a str,
        deleted_student: EnrichedStudent,
    },
    Healthz {
        revision: Option<&'a str>,
        timestamp: Option<&'a str>,
        version: &'a str,
    },
    #[serde(rename_all = "camelCase")]
    Upcoming {
        count: usize,
        window_days: u32,
        students: Vec<UpcomingBirthday>,
    },
}
