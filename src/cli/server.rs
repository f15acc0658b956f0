use actix_web::{web, App as ActixApp, HttpServer};
use clap::Parser;
use error_stack::{Result, ResultExt};
use std::net::IpAddr;
use std::num::NonZeroUsize;
use thiserror::Error;
use tracing_actix_web::TracingLogger;

use scribe::config::Server as Config;
use scribe::http::controllers;
use scribe::App;

/// Expose the Scribe JSON API over HTTP
#[derive(Debug, Parser)]
pub struct ServerCommand {
    #[clap(long)]
    pub address: Option<IpAddr>,
    #[clap(long)]
    pub port: Option<u16>,
    #[clap(long)]
    pub workers: Option<NonZeroUsize>,
}

#[derive(Debug, Error)]
#[error("Failed to start the HTTP server")]
pub struct StartServerError;

pub fn run(args: ServerCommand) -> Result<(), StartServerError> {
    let mut config = Config::load().change_context(StartServerError)?;
    args.override_config(&mut config);

    scribe::telemetry::init(&config.logging).change_context(StartServerError)?;

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(workers) = config.workers {
        builder.worker_threads(workers.get());
    }

    builder
        .build()
        .change_context(StartServerError)
        .attach_printable("could not build tokio runtime")?
        .block_on(serve(config))
}

async fn serve(config: Config) -> Result<(), StartServerError> {
    let address = (config.ip, config.port);
    let workers = config.workers;

    let app = App::new(config).await.change_context(StartServerError)?;
    let mut server = HttpServer::new(move || {
        ActixApp::new()
            .app_data(web::Data::new(app.clone()))
            .wrap(TracingLogger::default())
            .configure(controllers::configure)
    });

    if let Some(workers) = workers {
        server = server.workers(workers.get());
    }

    let server = server
        .bind(address)
        .change_context(StartServerError)
        .attach_printable_lazy(|| format!("could not bind to {}:{}", address.0, address.1))?;

    tracing::info!("Listening on http://{}:{}", address.0, address.1);
    server.run().await.change_context(StartServerError)
}

impl ServerCommand {
    fn override_config(&self, config: &mut Config) {
        // override server configurations if set by the cli
        if let Some(address) = self.address {
            config.ip = address;
        }

        if let Some(port) = self.port {
            config.port = port;
        }

        if let Some(workers) = self.workers {
            config.workers = Some(workers);
        }
    }
}
