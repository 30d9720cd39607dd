#[macro_use]
extern crate diesel;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;

pub mod schema;
pub mod models;
pub mod errors;
pub mod common;
pub mod db;
pub mod handlers;
pub mod cli;

use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;
use listenfd::ListenFd;

use cli::{Cli, Commands};
use errors::EngineError;

fn to_io_error(err: EngineError) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();    // pick up DATABASE_URL and friends from .env

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("orm_tutor=debug,actix_web=info,actix_server=info"),
    ).init();

    let cli = Cli::parse();

    let database_url = common::database_url();
    let pool = common::build_pool(&database_url);

    match cli.command() {
        Commands::InitDb => init_db(pool).await,
        Commands::Serve => serve(pool).await,
    }
}

async fn init_db(pool: common::Pool) -> std::io::Result<()> {
    web::block(move || {
        let mut conn = common::get_conn(&pool)?;
        db::init_db(&mut conn)
    })
        .await
        .map_err(|blocking_err| to_io_error(blocking_err.into()))?
        .map_err(to_io_error)
}

async fn serve(pool: common::Pool) -> std::io::Result<()> {
    let pool = web::Data::new(pool);

    // Reuse a socket handed over by systemfd/cargo-watch when there is one
    let mut listenfd = ListenFd::from_env();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())     // every request checks its own connection out of this pool
            .configure(handlers::configure)
            .default_service(web::to(handlers::not_found))
            .wrap(middleware::Logger::default())
    });

    let server = if let Some(listener) = listenfd.take_tcp_listener(0)? {
        info!("Listening on inherited socket {:?}", listener.local_addr()?);
        server.listen(listener)?
    } else {
        let bind = common::bind_address();
        info!("Starting server at: {}", bind);
        server.bind(bind)?
    };

    server.run().await
}
