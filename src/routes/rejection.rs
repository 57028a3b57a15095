use serde::Serialize;
use warp::reject;

use crate::errors::BackendError;

#[derive(Debug)]
pub struct Rejection {
    pub(crate) context: Context,
    pub(crate) error: BackendError,
}

impl Rejection {
    pub fn new(context: Context, error: BackendError) -> Self {
        Rejection { context, error }
    }

    pub fn flatten(&self) -> FlattenedRejection {
        FlattenedRejection {
            context: self.context.clone(),
            message: format!("{}", self.error),
        }
    }
}

impl reject::Reject for Rejection {}

#[derive(Debug, Serialize)]
pub struct FlattenedRejection {
    #[serde(flatten)]
    pub(crate) context: Context,
    pub(crate) message: String,
}

/// What the failed request was about, echoed back next to the message.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Context {
    BirthMonth { month: String },
    Create,
    Delete { id: String },
    List,
    Retrieve { id: String },
    Upcoming { days: Option<String> },
    Update { id: String },
}

impl Context {
    pub fn birth_month(month: String) -> Context {
        Context::BirthMonth { month }
    }

    pub fn create() -> Context {
        Context::Create
    }

    pub fn delete(id: String) -> Context {
        Context::Delete { id }
    }

    pub fn list() -> Context {
        Context::List
    }

    pub fn retrieve(id: String) -> Context {
        Context::Retrieve { id }
    }

    pub fn upcoming(days: Option<String>) -> Context {
        Context::Upcoming { days }
    }

    pub fn update(id: String) -> Context {
        Context::Update { id }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use warp::reject;

    use super::{Context, Rejection};
    use crate::errors::BackendError;

    #[test]
    fn context_is_flattened_next_to_the_message() {
        let rejection = Rejection::new(Context::retrieve("42".to_owned()), BackendError::StudentNotFound);
        let value = serde_json::to_value(rejection.flatten()).expect("serialize rejection");

        assert_eq!(value, json!({ "id": "42", "message": "Student not found" }));
    }

    #[test]
    fn unit_contexts_only_carry_the_message() {
        let rejection = Rejection::new(Context::create(), BackendError::MissingFields);
        let value = serde_json::to_value(rejection.flatten()).expect("serialize rejection");

        assert_eq!(value, json!({ "message": "Name and birthDate are required" }));
    }

    #[test]
    fn rejections_convert_into_warp_rejections() {
        let rejection: reject::Rejection =
            Rejection::new(Context::upcoming(Some("abc".to_owned())), BackendError::InvalidWindow).into();
        let found = rejection.find::<Rejection>().expect("find backend rejection");

        assert!(matches!(found.error, BackendError::InvalidWindow));
        assert_eq!(
            serde_json::to_value(found.flatten()).expect("serialize rejection"),
            json!({ "days": "abc", "message": "days must be a non-negative whole number" })
        );
    }
}
