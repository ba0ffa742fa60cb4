use actix_web::{web, HttpResponse, Responder};

use crate::AppState;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/health").route(web::get().to(health_check)));
}

/// Liveness plus the state of the notes directory. Reports 503 when the
/// storage root has gone missing, since no note can be saved then.
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let root = state.store.root();
    let storage_ok = root.is_dir();

    let mut resp = if storage_ok {
        HttpResponse::Ok()
    } else {
        log::warn!("[HEALTH] Notes directory missing: {}", root.display());
        HttpResponse::ServiceUnavailable()
    };

    resp.json(serde_json::json!({
        "status": if storage_ok { "ok" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "notes_dir": root.to_string_lossy(),
        "notes_dir_exists": storage_ok,
        "cli_raw_shim": state.config.cli_raw_shim,
        "uptime_secs": state.started_at.elapsed().as_secs()
    }))
}
