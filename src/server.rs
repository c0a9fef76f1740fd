//! JSON front-end over a single [`InteractionController`].

use crate::{
    controller::{CopyTarget, InteractionController, Snapshot},
    error::PromptError,
    models::ModificationKind,
};
use actix_web::{
    error::ErrorConflict, http::StatusCode, web, App, HttpResponse, HttpServer, ResponseError,
};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::{watch, Mutex, MutexGuard};

pub struct ServerState {
    controller: Mutex<InteractionController>,
    snapshots: watch::Receiver<Snapshot>,
}

impl ServerState {
    pub fn new(controller: InteractionController) -> Self {
        let snapshots = controller.subscribe();
        Self {
            controller: Mutex::new(controller),
            snapshots,
        }
    }

    /// Latest published snapshot. Does not wait for a running action.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// A second action while one is in flight is refused rather than queued.
    fn acquire(&self) -> Result<MutexGuard<'_, InteractionController>, actix_web::Error> {
        self.controller
            .try_lock()
            .map_err(|_| ErrorConflict("A request is already in progress"))
    }
}

impl ResponseError for PromptError {
    fn status_code(&self) -> StatusCode {
        match self {
            PromptError::ValidationError(_) => StatusCode::BAD_REQUEST,
            PromptError::DecodeError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PromptError::ServiceError(_) | PromptError::RequestError(_) | PromptError::ResponseError(_) => {
                StatusCode::BAD_GATEWAY
            }
            PromptError::ConfigError(_) | PromptError::SerializationError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    pub theme: String,
}

#[derive(Debug, Deserialize)]
pub struct ModifyBody {
    pub kind: ModificationKind,
}

#[derive(Debug, Deserialize)]
pub struct CopyBody {
    pub target: CopyTarget,
}

async fn get_state(data: web::Data<ServerState>) -> HttpResponse {
    HttpResponse::Ok().json(data.snapshot())
}

async fn generate(
    data: web::Data<ServerState>,
    body: web::Json<GenerateBody>,
) -> Result<HttpResponse, actix_web::Error> {
    let mut controller = data.acquire()?;
    controller.generate(&body.theme).await?;
    Ok(HttpResponse::Ok().json(controller.snapshot()))
}

async fn modify(
    data: web::Data<ServerState>,
    body: web::Json<ModifyBody>,
) -> Result<HttpResponse, actix_web::Error> {
    let mut controller = data.acquire()?;
    let applied = controller.modify(body.kind).await?;
    Ok(HttpResponse::Ok().json(json!({
        "applied": applied,
        "snapshot": controller.snapshot(),
    })))
}

async fn copy(
    data: web::Data<ServerState>,
    body: web::Json<CopyBody>,
) -> Result<HttpResponse, actix_web::Error> {
    let mut controller = data.acquire()?;
    match controller.copy(body.target) {
        Some(text) => Ok(HttpResponse::Ok().json(json!({ "text": text }))),
        None => Ok(HttpResponse::NotFound().json(json!({ "error": "Nothing to copy yet" }))),
    }
}

async fn toggle_keyword_checker(
    data: web::Data<ServerState>,
) -> Result<HttpResponse, actix_web::Error> {
    let mut controller = data.acquire()?;
    controller.toggle_keyword_checker();
    Ok(HttpResponse::Ok().json(controller.snapshot()))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/state", web::get().to(get_state))
            .route("/generate", web::post().to(generate))
            .route("/modify", web::post().to(modify))
            .route("/copy", web::post().to(copy))
            .route("/keyword-checker/toggle", web::post().to(toggle_keyword_checker)),
    );
}

pub async fn run(controller: InteractionController, port: u16) -> std::io::Result<()> {
    let data = web::Data::new(ServerState::new(controller));

    log::info!("🌐 Server will run on http://127.0.0.1:{}", port);
    HttpServer::new(move || App::new().app_data(data.clone()).configure(routes))
        .bind(("127.0.0.1", port))?
        .run()
        .await
}
