pub mod image_client;

use crate::{
    error::Result,
    models::{ContentPart, GeneratedImage, ReferenceImage},
};
use async_trait::async_trait;

pub use image_client::GeminiImageClient;

/// Outbound side of the relay. Both calls are single-shot.
#[async_trait]
pub trait ImageUpstream: Send + Sync {
    /// Downloads the image at `url` and reports its declared mime type.
    async fn fetch_reference_image(&self, url: &str) -> Result<ReferenceImage>;

    /// Sends the parts as one generation request and returns the first image in the reply.
    async fn generate(&self, parts: Vec<ContentPart>, credential: &str) -> Result<GeneratedImage>;
}

#[cfg(all(test, feature = "server"))]
pub(crate) mod fake {
    use actix_web::{web, App, HttpServer};

    /// Serves `routes` on an ephemeral local port and returns its base URL.
    pub(crate) fn spawn<F>(routes: F) -> String
    where
        F: Fn(&mut web::ServiceConfig) + Clone + Send + 'static,
    {
        let server = HttpServer::new(move || App::new().configure(routes.clone()))
            .workers(1)
            .disable_signals()
            .bind(("127.0.0.1", 0))
            .expect("bind fake upstream");
        let address = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{}", address)
    }
}
