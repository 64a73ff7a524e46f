//! Inbound HTTP surface of the relay.
//!
//! `POST /generate_image` takes a form with `prompt`, `apikey` and an optional
//! `reference_image_url`, either urlencoded or as `multipart/form-data`, and answers with `{ image_url, message }` or
//! `{ detail }` on failure. `GET /` returns a plain-text banner.

pub mod handler;

use crate::{
    config::ServerConfig,
    error::RelayError,
    upstream::ImageUpstream,
};
use actix_web::{
    guard::{self, GuardContext},
    http::header,
    middleware, web, App, HttpServer,
};
use std::sync::Arc;

pub use handler::{generate_image, generate_image_multipart, index, relay_generation};

pub(crate) const FORM_LIMIT_BYTES: usize = 256 * 1024;

/// Everything a request needs, built once at startup.
#[derive(Clone)]
pub struct AppContext {
    upstream: Arc<dyn ImageUpstream>,
}

impl AppContext {
    pub fn new(upstream: Arc<dyn ImageUpstream>) -> Self {
        Self { upstream }
    }

    pub fn upstream(&self) -> &dyn ImageUpstream {
        self.upstream.as_ref()
    }
}

/// Registers the relay's routes and form handling on an app or scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::FormConfig::default()
            .limit(FORM_LIMIT_BYTES)
            .error_handler(|err, _req| RelayError::InvalidForm(err.to_string()).into()),
    )
    .route("/", web::get().to(index))
    .service(
        web::resource("/generate_image")
            .route(
                web::post()
                    .guard(guard::fn_guard(is_multipart))
                    .to(generate_image_multipart),
            )
            .route(web::post().to(generate_image)),
    );
}

fn is_multipart(ctx: &GuardContext<'_>) -> bool {
    ctx.head()
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map_or(false, |value| {
            value
                .trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
}

pub async fn run(config: ServerConfig, context: AppContext) -> std::io::Result<()> {
    let data = web::Data::new(context);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(middleware::Logger::new("%a \"%r\" %s %Dms"))
            .configure(configure)
    });

    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    server.bind(config.bind_address())?.run().await
}
