use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use aisearch_relevance::{RelevanceService, SearchError, SearchResponse};
use futures_util::StreamExt;
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Largest accepted request body; the whole catalog rides along with each query
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

pub struct RestApi;

impl RestApi {
    pub async fn start(
        service: Arc<RelevanceService>,
        host: &str,
        port: u16,
    ) -> std::io::Result<()> {
        info!(host, port, model = service.model(), "Binding AI search endpoint");
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(service.clone()))
                .configure(configure)
        })
        .bind((host, port))?
        .run()
        .await
    }

    /// Run the server on its own thread with its own actix system. The
    /// handle yields the bind or run error once the server stops.
    pub fn spawn(
        service: Arc<RelevanceService>,
        host: String,
        port: u16,
    ) -> JoinHandle<std::io::Result<()>> {
        std::thread::spawn(move || {
            actix_web::rt::System::new().block_on(Self::start(service, &host, port))
        })
    }
}

/// Route table, shared by the server and handler tests.
/// Expects `web::Data<Arc<RelevanceService>>` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/v1").route("/ai-search", web::post().to(ai_search)));
}

/// Collect the body up to `limit` bytes
async fn read_body(mut payload: web::Payload, limit: usize) -> Result<web::BytesMut, SearchError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|_| SearchError::invalid_request())?;
        if body.len() + chunk.len() > limit {
            return Err(SearchError::PayloadTooLarge(limit));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

fn failure(request_id: Uuid, e: &SearchError) -> HttpResponse {
    match e {
        SearchError::Validation(message) => {
            warn!(%request_id, message = message.as_str(), "Rejected AI search request")
        }
        SearchError::PayloadTooLarge(limit) => {
            warn!(%request_id, limit, "Rejected oversized AI search request")
        }
        _ => {}
    }
    let status = StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(SearchResponse::from(e))
}

async fn ai_search(
    service: web::Data<Arc<RelevanceService>>,
    payload: web::Payload,
) -> ActixResult<HttpResponse> {
    let request_id = Uuid::new_v4();
    let body = match read_body(payload, MAX_BODY_BYTES).await {
        Ok(body) => body,
        Err(e) => return Ok(failure(request_id, &e)),
    };

    let span = info_span!("ai_search", %request_id, body_len = body.len());
    match service.evaluate_body(&body).instrument(span).await {
        Ok(ids) => Ok(HttpResponse::Ok().json(SearchResponse::ok(ids))),
        Err(e) => Ok(failure(request_id, &e)),
    }
}
