use std::error::Error;
use std::sync::Arc;

use futures::future::FutureExt;
use log::{info, initialize_logger, Level};
use tokio::sync::mpsc;
use warp::Filter;

use roster::clock;
use roster::config::{get_optional_variable, get_variable, parse_variable_or};
use roster::date::ReferenceDate;
use roster::environment::{Config, Environment, DEFAULT_UPCOMING_WINDOW_DAYS};
use roster::routes;
use roster::store::{MemoryStore, Store};
use roster::urls::Urls;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    let logger = initialize_logger(parse_variable_or("ROSTER_LOG_LEVEL", Level::Info));

    let main_port: u16 = get_variable("ROSTER_PORT")
        .parse()
        .expect("parse ROSTER_PORT as u16");
    let admin_port: u16 = get_variable("ROSTER_ADMIN_PORT")
        .parse()
        .expect("parse ROSTER_ADMIN_PORT as u16");

    info!(logger, "Starting..."; "main_port" => main_port, "admin_port" => admin_port);
    let logger = Arc::new(logger);

    let store: Arc<dyn Store> = if parse_variable_or("ROSTER_SEED_STUDENTS", 1u8) == 1 {
        info!(logger, "Seeding demo roster...");
        Arc::new(MemoryStore::seeded()?)
    } else {
        Arc::new(MemoryStore::new())
    };

    let today = match get_optional_variable("ROSTER_REFERENCE_DATE") {
        Some(text) => {
            let date: ReferenceDate = text.parse()?;
            info!(logger, "Pinning reference date"; "today" => %date);
            clock::pinned(date)
        }
        None => clock::system(),
    };

    let urls = Arc::new(Urls::new(
        get_variable("ROSTER_BASE_URL"),
        get_optional_variable("ROSTER_STUDENTS_PATH").unwrap_or_else(|| "students".to_owned()),
    ));

    let config = Config::new(parse_variable_or(
        "ROSTER_UPCOMING_WINDOW_DAYS",
        DEFAULT_UPCOMING_WINDOW_DAYS,
    ));
    let environment = Environment::new(logger.clone(), store, urls, today, config);

    let (termination_sender, mut termination_receiver) = mpsc::channel::<()>(1);

    let terminate: routes::admin::TerminationFunctionWrapper = Arc::new(move || {
        let termination_sender = termination_sender.clone();

        async move {
            // the receiver only goes away once shutdown has begun
            let _ = termination_sender.send(()).await;
        }
        .boxed()
    });

    let should_terminate = async move {
        termination_receiver.recv().await;
    }
    .shared();

    let ctrlc = {
        let should_terminate = should_terminate.clone();
        let terminate = terminate.clone();

        let signal = tokio::signal::ctrl_c();

        async move {
            tokio::select! {
                _ = should_terminate => {},
                _ = signal => {
                    terminate().await;
                }
            }
        }
    };

    let main_server = {
        let should_terminate = should_terminate.clone();

        let routes = routes::make_api_routes(environment.clone());

        let (_, main_server) =
            warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], main_port), async {
                should_terminate.await;
            });

        main_server
    };

    let admin_server = {
        let should_terminate = should_terminate.clone();

        let routes = routes::admin::make_healthz_route(environment.clone()).or(
            routes::admin::make_termination_route(environment.clone(), terminate),
        );

        let (_, admin_server) =
            warp::serve(routes).bind_with_graceful_shutdown(([0, 0, 0, 0], admin_port), async {
                should_terminate.await;
            });

        admin_server
    };

    tokio::join!(ctrlc, main_server, admin_server);

    info!(logger, "Exiting gracefully...");

    Ok(())
}
