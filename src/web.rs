use actix_web::{web, App, HttpServer, HttpResponse, Result, middleware};
use log::{info, warn};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use crate::config::{CapacityReport, TimetableConfig};
use crate::display::write_class_csv;
use crate::schedule::{generate_versions, TimetableVersion};
use crate::store::{StoredSummary, VersionStore};

/// Generated timetables live here between requests
pub struct AppState {
    pub store: Mutex<VersionStore>,
}

impl AppState {
    pub fn new(capacity: usize) -> Self {
        Self {
            store: Mutex::new(VersionStore::new(capacity)),
        }
    }

    fn store(&self) -> Result<MutexGuard<'_, VersionStore>> {
        self.store
            .lock()
            .map_err(|_| actix_web::error::ErrorInternalServerError("Timetable store is unavailable"))
    }
}

#[derive(Serialize)]
pub struct GeneratedVersion {
    id: u64,
    #[serde(flatten)]
    version: TimetableVersion,
}

#[derive(Serialize)]
pub struct GenerateResponse {
    success: bool,
    capacity: CapacityReport,
    versions: Vec<GeneratedVersion>,
}

#[derive(Serialize)]
pub struct ListResponse {
    timetables: Vec<StoredSummary>,
}

// Generate endpoint
async fn generate_timetables(
    req: web::Json<TimetableConfig>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let mut config = req.into_inner();
    // Only inline teacher lists are accepted over HTTP
    if config.teacher_csv.take().is_some() {
        warn!("Ignoring teacher_csv in a web request");
    }

    let eligibility = match config.teacher_eligibility() {
        Ok(eligibility) => eligibility,
        Err(e) => return Ok(bad_request(e.to_string())),
    };
    let (prepared, capacity) = match config.prepare(eligibility) {
        Ok(prepared) => prepared,
        Err(e) => return Ok(bad_request(e.to_string())),
    };

    let versions = generate_versions(&prepared, config.versions, config.seed);
    let mut store = state.store()?;
    let versions: Vec<GeneratedVersion> = versions
        .into_iter()
        .map(|version| GeneratedVersion {
            id: store.push(&config.class_name, &config.section, capacity.clone(), version.clone()),
            version,
        })
        .collect();
    info!(
        "Generated {} timetable version(s) for {} {}",
        versions.len(),
        config.class_name,
        config.section
    );

    Ok(HttpResponse::Ok().json(GenerateResponse {
        success: true,
        capacity,
        versions,
    }))
}

// List endpoint
async fn list_timetables(state: web::Data<AppState>) -> Result<HttpResponse> {
    let store = state.store()?;
    Ok(HttpResponse::Ok().json(ListResponse {
        timetables: store.summaries(),
    }))
}

// Single timetable endpoint
async fn get_timetable(
    id: web::Path<u64>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let store = state.store()?;
    match store.get(*id) {
        Some(entry) => Ok(HttpResponse::Ok().json(entry)),
        None => Ok(not_found(*id)),
    }
}

// Class grid CSV download
async fn get_class_csv(
    id: web::Path<u64>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let store = state.store()?;
    let Some(entry) = store.get(*id) else {
        return Ok(not_found(*id));
    };
    let mut body = Vec::new();
    write_class_csv(&entry.version.timetable.class_grid, &mut body)
        .map_err(|e| actix_web::error::ErrorInternalServerError(format!("Failed to write CSV: {}", e)))?;
    let filename = format!(
        "{}_{}_Timetable_V{}.csv",
        entry.class_name, entry.section, entry.version.version
    );
    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header(("Content-Disposition", format!("attachment; filename=\"{}\"", filename)))
        .body(body))
}

fn bad_request(error: String) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({"success": false, "error": error}))
}

fn not_found(id: u64) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "success": false,
        "error": format!("No timetable with id {}", id)
    }))
}

/// Registers the API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/timetables", web::post().to(generate_timetables))
        .route("/api/timetables", web::get().to(list_timetables))
        .route("/api/timetables/{id}", web::get().to(get_timetable))
        .route("/api/timetables/{id}/class.csv", web::get().to(get_class_csv));
}

pub async fn start_server(port: u16, store_capacity: usize) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new(store_capacity));

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
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

    fn request_body() -> serde_json::Value {
        serde_json::json!({
            "class_name": "Class 8",
            "section": "B",
            "room": "Room 12",
            "subjects": [
                {"name": "Math", "theory": 3},
                {"name": "Science", "theory": 2, "practical": 2}
            ],
            "teachers": [
                {"subject": "Math", "teachers": ["A"]},
                {"subject": "Science", "teachers": ["B"]}
            ],
            "versions": 2,
            "seed": 5
        })
    }

    #[actix_web::test]
    async fn test_generate_then_fetch() {
        let state = web::Data::new(AppState::new(3));
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/api/timetables")
            .set_json(request_body())
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["versions"].as_array().unwrap().len(), 2);
        assert_eq!(body["capacity"]["periods_per_day"], 6);
        assert_eq!(body["versions"][0]["seed"], 5);

        let req = test::TestRequest::get().uri("/api/timetables").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["timetables"].as_array().unwrap().len(), 2);

        let req = test::TestRequest::get().uri("/api/timetables/1").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["section"], "B");

        let req = test::TestRequest::get().uri("/api/timetables/2/class.csv").to_request();
        let body = test::call_and_read_body(&app, req).await;
        let csv = String::from_utf8(body.to_vec()).unwrap();
        assert!(csv.starts_with("Day,07:45 - 08:45,"));
        assert!(csv.contains("Science (PR) (B) [Room 12]"));
    }

    #[actix_web::test]
    async fn test_invalid_config_and_unknown_id() {
        let state = web::Data::new(AppState::new(3));
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        let mut body = request_body();
        body["period_minutes"] = serde_json::json!(0);
        let req = test::TestRequest::post().uri("/api/timetables").set_json(body).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/api/timetables/99").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(state.store().unwrap().is_empty());
    }
}
