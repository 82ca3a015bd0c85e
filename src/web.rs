use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};

use crate::display::write_schedule_csv;
use crate::error::ScheduleError;
use crate::schedule::slot_utils::time_string;
use crate::schedule::types::{Day, SlotId};
use crate::schedule::ScheduleEngine;

/// One engine per process. The mutex serializes every operation, so no two
/// mutations ever interleave.
pub struct AppState {
    pub engine: Mutex<ScheduleEngine>,
}

impl AppState {
    pub fn new(engine: ScheduleEngine) -> Self {
        AppState {
            engine: Mutex::new(engine),
        }
    }
}

#[derive(Deserialize)]
pub struct AssignmentRequest {
    worker: String,
    day: Day,
    slot_id: SlotId,
}

#[derive(Deserialize)]
pub struct RequiredStaffRequest {
    count: u32,
}

#[derive(Deserialize)]
pub struct CapacityRequest {
    hours: u32,
}

#[derive(Deserialize, Serialize)]
pub struct ContiguityBody {
    enabled: bool,
}

#[derive(Serialize)]
pub struct SlotResponse {
    id: SlotId,
    start: String,
    end: String,
    required: u8,
}

#[derive(Serialize)]
pub struct TierResponse {
    hours: u32,
    workers: Vec<String>,
}

fn lock_engine(state: &web::Data<AppState>) -> Result<MutexGuard<'_, ScheduleEngine>> {
    state
        .engine
        .lock()
        .map_err(|_| actix_web::error::ErrorInternalServerError("Schedule engine unavailable"))
}

fn error_response(err: &ScheduleError) -> HttpResponse {
    let body = serde_json::json!({
        "success": false,
        "kind": err.kind(),
        "error": err.to_string(),
    });
    if err.is_not_found() {
        HttpResponse::NotFound().json(body)
    } else {
        HttpResponse::BadRequest().json(body)
    }
}

fn success() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"success": true}))
}

async fn list_slots(state: web::Data<AppState>) -> Result<HttpResponse> {
    let engine = lock_engine(&state)?;
    let slots: Vec<SlotResponse> = engine
        .list_slots()
        .iter()
        .map(|slot| SlotResponse {
            id: slot.id,
            start: time_string(slot.start),
            end: time_string(slot.end),
            required: engine.required_staff_table().get(slot.id),
        })
        .collect();
    Ok(HttpResponse::Ok().json(slots))
}

async fn get_required_staff(
    slot_id: web::Path<SlotId>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let engine = lock_engine(&state)?;
    match engine.required_staff(slot_id.into_inner()) {
        Ok(count) => Ok(HttpResponse::Ok().json(serde_json::json!({"count": count}))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn set_required_staff(
    slot_id: web::Path<SlotId>,
    req: web::Json<RequiredStaffRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let mut engine = lock_engine(&state)?;
    match engine.set_required_staff(slot_id.into_inner(), req.count) {
        Ok(()) => Ok(success()),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn list_workers(state: web::Data<AppState>) -> Result<HttpResponse> {
    let engine = lock_engine(&state)?;
    let tiers: Vec<TierResponse> = engine
        .worker_tiers()
        .into_iter()
        .map(|(hours, workers)| TierResponse {
            hours,
            workers: workers.into_iter().map(|w| w.name.clone()).collect(),
        })
        .collect();
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "workers": engine.list_workers(),
        "tiers": tiers,
    })))
}

async fn set_capacity(
    name: web::Path<String>,
    req: web::Json<CapacityRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let mut engine = lock_engine(&state)?;
    match engine.set_capacity(&name, req.hours) {
        Ok(()) => Ok(success()),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn assign(
    req: web::Json<AssignmentRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let mut engine = lock_engine(&state)?;
    match engine.assign(&req.worker, req.day, req.slot_id) {
        Ok(()) => Ok(success()),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn remove(
    req: web::Json<AssignmentRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let mut engine = lock_engine(&state)?;
    match engine.remove(&req.worker, req.day, req.slot_id) {
        Ok(removed) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "removed": removed,
        }))),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn auto_fill(state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut engine = lock_engine(&state)?;
    let report = engine.auto_fill();
    Ok(HttpResponse::Ok().json(report))
}

async fn reset_all(state: web::Data<AppState>) -> Result<HttpResponse> {
    let mut engine = lock_engine(&state)?;
    engine.reset_all();
    Ok(success())
}

async fn reset_day(day: web::Path<String>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let day: Day = match day.parse() {
        Ok(day) => day,
        Err(e) => return Ok(error_response(&e)),
    };
    let mut engine = lock_engine(&state)?;
    match engine.reset_day(day) {
        Ok(()) => Ok(success()),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn get_stats(state: web::Data<AppState>) -> Result<HttpResponse> {
    let engine = lock_engine(&state)?;
    Ok(HttpResponse::Ok().json(engine.stats()))
}

async fn get_contiguity(state: web::Data<AppState>) -> Result<HttpResponse> {
    let engine = lock_engine(&state)?;
    Ok(HttpResponse::Ok().json(ContiguityBody {
        enabled: engine.contiguity(),
    }))
}

async fn set_contiguity(
    req: web::Json<ContiguityBody>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let mut engine = lock_engine(&state)?;
    engine.set_contiguity(req.enabled);
    Ok(success())
}

async fn get_schedule(state: web::Data<AppState>) -> Result<HttpResponse> {
    let engine = lock_engine(&state)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "schedule": engine.schedule(),
        "coverage": engine.coverage(),
    })))
}

async fn export_schedule(state: web::Data<AppState>) -> Result<HttpResponse> {
    let engine = lock_engine(&state)?;
    let mut body = Vec::new();
    write_schedule_csv(&engine, &mut body)
        .map_err(|e| actix_web::error::ErrorInternalServerError(format!("Failed to export: {}", e)))?;
    Ok(HttpResponse::Ok().content_type("text/csv").body(body))
}

/// Registers the JSON API under `/api`.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/slots", web::get().to(list_slots))
        .service(
            web::resource("/api/required-staff/{slot_id}")
                .route(web::get().to(get_required_staff))
                .route(web::put().to(set_required_staff)),
        )
        .route("/api/workers", web::get().to(list_workers))
        .route("/api/workers/{name}/capacity", web::put().to(set_capacity))
        .route("/api/assign", web::post().to(assign))
        .route("/api/remove", web::post().to(remove))
        .route("/api/auto-fill", web::post().to(auto_fill))
        .route("/api/reset", web::post().to(reset_all))
        .service(web::resource("/api/reset/{day}").route(web::post().to(reset_day)))
        .route("/api/stats", web::get().to(get_stats))
        .service(
            web::resource("/api/contiguity")
                .route(web::get().to(get_contiguity))
                .route(web::put().to(set_contiguity)),
        )
        .route("/api/schedule", web::get().to(get_schedule))
        .route("/api/schedule.csv", web::get().to(export_schedule));
}

pub async fn start_server(port: u16, engine: ScheduleEngine) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new(engine));

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(routes)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;

    use crate::config::EngineConfig;
    use crate::schedule::types::WorkerSeed;

    fn state() -> web::Data<AppState> {
        let config = EngineConfig {
            roster: vec![WorkerSeed::new("Ana", 28), WorkerSeed::new("Ben", 8)],
            seed: Some(1),
            ..EngineConfig::default()
        };
        web::Data::new(AppState::new(ScheduleEngine::new(config).unwrap()))
    }

    #[actix_web::test]
    async fn test_assign_then_stats() {
        let state = state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/assign")
            .set_json(serde_json::json!({"worker": "Ana", "day": "Monday", "slot_id": 2}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/api/stats").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total_assigned_hours"], 2);
        assert_eq!(body["workers"][0]["remaining_hours"], 26);
        assert_eq!(body["daily_totals"]["Monday"], 2);
    }

    #[actix_web::test]
    async fn test_assign_accepts_short_day_name() {
        let state = state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(routes)).await;

        let req = test::TestRequest::post()
            .uri("/api/assign")
            .set_json(serde_json::json!({"worker": "Ana", "day": "tue", "slot_id": 4}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let engine = state.engine.lock().unwrap();
        assert_eq!(engine.schedule().assigned(Day::Tuesday, 4), ["Ana"]);
    }

    #[actix_web::test]
    async fn test_rule_violation_is_bad_request() {
        let state = state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(routes)).await;

        for slot_id in [1, 4] {
            let req = test::TestRequest::post()
                .uri("/api/assign")
                .set_json(serde_json::json!({"worker": "Ana", "day": "Tuesday", "slot_id": slot_id}))
                .to_request();
            let resp = test::call_service(&app, req).await;
            if slot_id == 4 {
                assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
                let body: serde_json::Value = test::read_body_json(resp).await;
                assert_eq!(body["kind"], "PatternViolation");
            }
        }

        let engine = state.engine.lock().unwrap();
        assert_eq!(engine.schedule().assigned_slots(Day::Tuesday, "Ana"), vec![1]);
    }

    #[actix_web::test]
    async fn test_unknown_worker_is_not_found() {
        let app = test::init_service(App::new().app_data(state()).configure(routes)).await;
        let req = test::TestRequest::put()
            .uri("/api/workers/Zed/capacity")
            .set_json(serde_json::json!({"hours": 10}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_reset_day_rejects_bad_day() {
        let app = test::init_service(App::new().app_data(state()).configure(routes)).await;
        let req = test::TestRequest::post().uri("/api/reset/caturday").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post().uri("/api/reset/fri").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_auto_fill_and_schedule() {
        let state = state();
        let app = test::init_service(App::new().app_data(state.clone()).configure(routes)).await;

        let req = test::TestRequest::post().uri("/api/auto-fill").to_request();
        let report: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(!report["added"].as_array().unwrap().is_empty());

        let req = test::TestRequest::get().uri("/api/schedule").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["coverage"].as_array().unwrap().len(), 49);
        assert!(body["schedule"]["days"]["Saturday"]["1"].as_array().unwrap().is_empty());
    }
}
