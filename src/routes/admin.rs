use std::convert::Infallible;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use log::{info, trace};
use warp::http::StatusCode;
use warp::reject;
use warp::reply::{json, Reply};
use warp::Filter;

use super::response::SuccessResponse;
use crate::environment::Environment;

pub fn make_healthz_route(
    environment: Environment,
) -> impl warp::Filter<Extract = (impl Reply,), Error = reject::Rejection> + Clone + Send + Sync + 'static
{
    warp::path("healthz")
        .and(warp::path::end())
        .and(warp::get())
        .map(move || {
            trace!(environment.logger, "Health check");

            json(&SuccessResponse::Healthz {
                revision: info::REVISION,
                timestamp: info::BUILD_TIMESTAMP,
                version: info::VERSION,
            })
        })
}

type TerminationFuture = BoxFuture<'static, ()>;

pub type TerminationFunctionWrapper = Arc<dyn Fn() -> TerminationFuture + Send + Sync>;

pub fn make_termination_route(
    environment: Environment,
    terminate: TerminationFunctionWrapper,
) -> impl warp::Filter<Extract = (impl Reply,), Error = reject::Rejection> + Clone + Send + Sync + 'static
{
    let handler = move || -> BoxFuture<'static, Result<StatusCode, Infallible>> {
        let terminate = terminate.clone();
        let logger = environment.logger.clone();

        async move {
            info!(logger, "Termination requested");
            terminate().await;
            Ok(StatusCode::NO_CONTENT)
        }
        .boxed()
    };

    warp::path("terminate")
        .and(warp::path::end())
        .and(warp::post())
        .and_then(handler)
}
