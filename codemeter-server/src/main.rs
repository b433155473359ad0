#![deny(missing_docs)]
//! CodeMeter server executable.
//!
//! Hosts HTTP endpoints for code analysis, history and the leaderboard.

mod db;
mod groq;
mod models;
mod openapi;
mod routes;
mod schema;
mod store;

#[cfg(not(test))]
use actix_cors::Cors;
#[cfg(not(test))]
use actix_web::{App, HttpServer, http::header, web};
#[cfg(not(test))]
use codemeter_core::Delegator;
#[cfg(not(test))]
use dotenvy::dotenv;

#[allow(unused_imports)]
use std::str::FromStr;

#[cfg(not(test))]
use crate::db::init_pool;
#[cfg(not(test))]
use crate::groq::GroqApiClient;
#[cfg(not(test))]
use crate::routes::{
    AppState, analysis_by_id, analyze, analyze_probe, leaderboard, openapi_json, user_analyses,
};

#[cfg(not(test))]
fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let pool = init_pool();

    // `reqwest::blocking::Client` must be built outside the Actix runtime.
    let groq = GroqApiClient::from_env();
    let delegator = if groq.is_configured() {
        log::info!("AI analysis enabled with model {}", groq.model());
        Delegator::new(groq)
    } else {
        log::warn!("GROQ_API_KEY not set; using heuristic analysis only");
        Delegator::heuristic_only()
    };

    let state = web::Data::new(AppState { pool, delegator });

    let origins = std::env::var("CODEMETER_UI_ORIGINS")
        .unwrap_or_else(|_| "http://127.0.0.1:3000,http://localhost:3000".to_string());
    let allowed_origins: Vec<String> = origins
        .split(',')
        .map(|value| value.trim())
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect();

    let listen_addr = std::env::var("CODEMETER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let listen_port =
        u16::from_str(&std::env::var("CODEMETER_PORT").unwrap_or_else(|_| "8080".to_string()))
            .expect("CODEMETER_PORT must be a u16 number");
    let err_msg = format!("Can't bind {}:{}", &listen_addr, listen_port);

    actix_web::rt::System::new().block_on(async move {
        HttpServer::new(move || {
            let mut cors = Cors::default()
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allowed_headers(vec![header::CONTENT_TYPE])
                .max_age(3600);
            for origin in &allowed_origins {
                cors = cors.allowed_origin(origin);
            }
            App::new()
                .wrap(actix_web::middleware::Logger::default())
                .wrap(cors)
                .app_data(state.clone())
                .service(analyze_probe)
                .service(analyze)
                .service(analysis_by_id)
                .service(user_analyses)
                .service(leaderboard)
                .service(openapi_json)
        })
        .bind((listen_addr, listen_port))
        .expect(&err_msg)
        .run()
        .await
    })
}

#[cfg(test)]
fn main() {}
