use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use quizdrill_server::{app_state::AppState, config::Config, handlers::quiz_handler};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let host = config.web_server_host.clone();
    let port = config.web_server_port;

    let state = AppState::new(config)
        .await
        .expect("failed to initialize application state");

    log::info!("starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .service(quiz_handler::list_subjects)
            .service(quiz_handler::configure_quiz)
            .service(quiz_handler::get_active_quiz)
            .service(quiz_handler::submit_quiz)
            .service(quiz_handler::get_results)
            .service(quiz_handler::user_progress)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
