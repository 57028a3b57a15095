use std::sync::Arc;

use log::{error, Logger};
use warp::http::StatusCode;
use warp::reject;
use warp::reply::{json, with_status, Json, Reply, WithStatus};
use warp::Filter;

use crate::environment::Environment;
use crate::errors::BackendError;

pub mod admin;
mod handlers;
mod query;
mod rejection;
mod response;

pub use internal::*;

/// The largest JSON body accepted when creating or updating a student.
const MAX_CONTENT_LENGTH: u64 = 16 * 1024;

/// Combines every roster route, most specific first, and renders
/// backend errors as JSON.
pub fn make_api_routes(
    environment: Environment,
) -> impl Filter<Extract = (impl Reply,), Error = reject::Rejection> + Clone + Send + Sync + 'static
{
    let logger = environment.logger.clone();

    // the fixed paths must come before the ones that capture an ID
    make_upcoming_route(environment.clone())
        .or(make_birth_month_route(environment.clone()))
        .or(make_list_route(environment.clone()))
        .or(make_create_route(environment.clone()))
        .or(make_retrieve_route(environment.clone()))
        .or(make_update_route(environment.clone()))
        .or(make_delete_route(environment))
        .recover(move |r| format_rejection(logger.clone(), r))
}

pub async fn format_rejection(
    logger: Arc<Logger>,
    rej: reject::Rejection,
) -> Result<WithStatus<Json>, reject::Rejection> {
    if let Some(r) = rej.find::<rejection::Rejection>() {
        let e = &r.error;
        error!(logger, "Backend error"; "context" => ?r.context, "error" => ?r.error, "status" => %status_code_for(e), "message" => %r.error);
        let flattened = r.flatten();

        return Ok(with_status(json(&flattened), status_code_for(e)));
    }

    Err(rej)
}

fn status_code_for(e: &BackendError) -> StatusCode {
    use BackendError::*;

    match e {
        Date(..) | BirthDateInFuture | BlankName | MissingFields | InvalidMonth
        | InvalidWindow => StatusCode::BAD_REQUEST,
        StudentNotFound => StatusCode::NOT_FOUND,
        StoreUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

mod internal {
    use warp::body::{content_length_limit, json};
    use warp::filters::BoxedFilter;
    use warp::path::end;
    use warp::Filter;
    use warp::Reply;
    use warp::{delete, get as g, path as p, path::param as par, post, put, query};

    use super::{handlers, query as q, MAX_CONTENT_LENGTH};
    use crate::environment::Environment;

    type Route = BoxedFilter<(Box<dyn Reply>,)>;

    macro_rules! route_filter {
    ($route_variable:ident; $first:expr) => (let $route_variable = $route_variable.and($first););
    ($route_variable:ident; $first:expr, $($rest:expr),+) => (
        let $route_variable = $route_variable.and($first);
        route_filter!($route_variable; $($rest),+);
    )
}

    macro_rules! route {
    ($name:ident => $handler:ident, $route_variable:ident; $($filters:expr),+) => (
        pub fn $name(environment: Environment) -> Route {
            let r = environment.urls.students_path.clone();

            let $route_variable = warp::any()
                .map(move || environment.clone())
                .and(p(r));

            route_filter!($route_variable; $($filters),+);

            $route_variable.and_then(handlers::$handler)
                .boxed()
        }
    );
}

    route!(make_list_route => list, rt; end(), g());
    route!(make_create_route => create, rt; end(), post(), content_length_limit(MAX_CONTENT_LENGTH), json());
    route!(make_retrieve_route => retrieve, rt; par::<String>(), end(), g());
    route!(make_update_route => update, rt; par::<String>(), end(), put(), content_length_limit(MAX_CONTENT_LENGTH), json());
    route!(make_delete_route => delete, rt; par::<String>(), end(), delete());
    route!(make_birth_month_route => birth_month, rt; p("birth-month"), par::<String>(), end(), g());
    route!(make_upcoming_route => upcoming, rt; p("upcoming-birthdays"), end(), g(), query::<q::UpcomingQuery>());
}
