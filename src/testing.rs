//! Local HTTP fixture for tests that need a real upstream.

use actix_web::{dev::ServerHandle, http::StatusCode, web, App, HttpResponse, HttpServer};

/// A server on an ephemeral port that answers every path with the same reply.
pub struct Fixture {
    pub base_url: String,
    handle: ServerHandle,
}

impl Fixture {
    /// Must be called from inside an actix runtime.
    pub fn start(status: u16, content_type: &'static str, body: &'static str) -> Self {
        let status = StatusCode::from_u16(status).unwrap();
        let server = HttpServer::new(move || {
            App::new().default_service(web::to(move || async move {
                HttpResponse::build(status).content_type(content_type).body(body)
            }))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            base_url: format!("http://{}", addr),
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}
