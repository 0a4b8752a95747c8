use ::log::error;
use rocket::fairing::AdHoc;
use rocket::http::Status;
use rocket::serde::json::{json, Json, Value};
use rocket::*;

use crate::config::{Config, ConfigError};
use crate::database::{requests, ErrorDetail, RequestError, Store};

mod config;
mod cors;
mod database;

#[launch]
fn rocket() -> _ {
    build(Config::from_env)
}

/// Assembles the server. The store is opened while Rocket ignites,
/// so a bad configuration or unreachable database aborts launch.
pub fn build<F>(load_config: F) -> Rocket<Build>
where
    F: FnOnce() -> Result<Config, ConfigError> + Send + 'static,
{
    rocket::build()
        .attach(cors::Cors)
        .attach(AdHoc::try_on_ignite("Score Store", |rocket| async move {
            let config = match load_config() {
                Ok(config) => config,
                Err(err) => {
                    error!("invalid configuration: {}", err);
                    return Err(rocket);
                }
            };

            match Store::connect(&config).await {
                Ok(store) => Ok(rocket.manage(store)),
                Err(err) => {
                    error!("failed to open {}: {}", config.database_url, err);
                    Err(rocket)
                }
            }
        }))
        .attach(AdHoc::on_shutdown("Close Score Store", |rocket| {
            Box::pin(async move {
                if let Some(store) = rocket.state::<Store>() {
                    store.close().await;
                }
            })
        }))
        .mount(
            "/",
            routes![
                index,
                cors::preflight,
                requests::add_score,
                requests::get_scores,
                requests::get_score
            ],
        )
        .register("/", catchers![not_found, unprocessable, default_catcher])
}

#[get("/")]
fn index() -> Value {
    json!({ "message": "Tower of Hanoi API" })
}

#[catch(404)]
fn not_found(request: &Request<'_>) -> RequestError {
    RequestError::NoSuchRoute {
        path: request.uri().path().to_string(),
    }
}

#[catch(422)]
fn unprocessable(request: &Request<'_>) -> RequestError {
    RequestError::Validation(format!(
        "could not process {} {}",
        request.method(),
        request.uri()
    ))
}

#[catch(default)]
fn default_catcher(status: Status, _request: &Request<'_>) -> (Status, Json<ErrorDetail>) {
    let detail = status.reason().unwrap_or("unexpected error").to_owned();
    (status, Json(ErrorDetail { detail }))
}
