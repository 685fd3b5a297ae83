#![allow(dead_code)]

use alamos_panel::Config;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use reqwest::Url;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

const SESSION_COOKIE: &str = "sessionid=abc123";

/// What the fake backend saw and how it should misbehave.
#[derive(Default)]
pub struct MockState {
    requests: Mutex<Vec<String>>,
    csrf: Mutex<Vec<(String, Option<String>)>>,
    register_content_types: Mutex<Vec<String>>,
    services: Mutex<Vec<Value>>,
    next_id: AtomicU64,
    pub reject_sessions: AtomicBool,
    pub verify_unauthorized: AtomicBool,
    pub verify_delay_ms: AtomicU64,
    pub fail_logout: AtomicBool,
    pub services_unauthorized: AtomicBool,
    pub ignore_cancel: AtomicBool,
}

impl MockState {
    fn record(&self, method: &str, path: &str, headers: &HeaderMap) {
        self.requests.lock().unwrap().push(format!("{method} {path}"));
        if method == "POST" {
            let token = headers
                .get("x-csrftoken")
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);
            self.csrf.lock().unwrap().push((path.to_string(), token));
        }
    }

    pub fn set(&self, flag: &AtomicBool, value: bool) {
        flag.store(value, Ordering::SeqCst);
    }

    /// Holds every later session check for `delay` before answering.
    pub fn slow_session_checks(&self, delay: Duration) {
        self.verify_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }
}

/// In-process stand-in for the booking backend.
pub struct MockBackend {
    pub url: String,
    pub state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        *state.services.lock().unwrap() = seed_services();
        state.next_id.store(100, Ordering::SeqCst);

        let app = Router::new()
            .route("/api/auth/verificar-sesion/", get(verify))
            .route("/api/auth/login/", post(login))
            .route("/api/auth/logout/", post(logout))
            .route("/api/auth/registro/", post(register))
            .route("/api/servicios/mis-servicios/", get(list))
            .route("/api/servicios/agendar/", post(book))
            .route("/api/servicios/cancelar/", post(cancel))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend");
        });

        Self {
            url: format!("http://{addr}"),
            state,
            handle,
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn clear_requests(&self) {
        self.state.requests.lock().unwrap().clear();
    }

    pub fn saw(&self, request: &str) -> bool {
        self.requests().iter().any(|seen| seen == request)
    }

    /// CSRF header sent with each POST, by path.
    pub fn csrf_headers(&self) -> Vec<(String, Option<String>)> {
        self.state.csrf.lock().unwrap().clone()
    }

    pub fn register_content_types(&self) -> Vec<String> {
        self.state.register_content_types.lock().unwrap().clone()
    }

    pub fn service_status(&self, id: u64) -> Option<String> {
        self.state
            .services
            .lock()
            .unwrap()
            .iter()
            .find(|record| record["id"] == id)
            .and_then(|record| record["estado"].as_str().map(str::to_string))
    }

    /// Panel settings pointed at this backend with a throwaway session file.
    pub fn config(&self, name: &str) -> Config {
        let mut config = Config::new(Url::parse(&self.url).unwrap(), temp_path(name));
        config.login_settle = Duration::ZERO;
        config
    }
}

pub fn temp_path(name: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "alamos_panel_{name}_{}_{nanos}.json",
        std::process::id()
    ))
}

pub fn user() -> Value {
    json!({
        "id": 7,
        "username": "ana",
        "email": "ana@example.com",
        "first_name": "Ana",
        "last_name": "Pérez",
        "telefono": "3001234567",
        "direccion": "Calle 15 #23-45, Riohacha"
    })
}

pub fn seed_services() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "tipo_servicio": "residencial",
            "fecha_servicio": "2024-11-02T09:00:00",
            "direccion_servicio": "Calle 15 #23-45, Riohacha",
            "estado": "completado",
            "precio_estimado": "85000.00"
        }),
        json!({
            "id": 2,
            "tipo_servicio": "empresarial",
            "fecha_servicio": "2030-01-15T14:00:00",
            "direccion_servicio": "Carrera 7 #10-20, Riohacha",
            "estado": "programado",
            "precio_estimado": 120000
        }),
        json!({
            "id": 3,
            "tipo_servicio": "postobra",
            "fecha_servicio": "2024-12-20T08:30:00",
            "direccion_servicio": "Avenida La Marina 4",
            "estado": "en_proceso",
            "precio_estimado": null
        }),
    ]
}

fn has_session_cookie(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|cookies| cookies.contains(SESSION_COOKIE))
}

async fn verify(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.record("GET", "/api/auth/verificar-sesion/", &headers);
    let delay = state.verify_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    if state.verify_unauthorized.load(Ordering::SeqCst) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Sesión expirada" })),
        )
            .into_response();
    }
    let authenticated =
        has_session_cookie(&headers) && !state.reject_sessions.load(Ordering::SeqCst);
    let body = if authenticated {
        json!({ "success": true, "autenticado": true, "usuario": user() })
    } else {
        json!({ "success": true, "autenticado": false })
    };
    ([(header::SET_COOKIE, "csrftoken=mocktoken; Path=/")], Json(body)).into_response()
}

async fn login(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("POST", "/api/auth/login/", &headers);
    if body["username"] == "ana" && body["password"] == "secreto" {
        (
            [(header::SET_COOKIE, "sessionid=abc123; Path=/")],
            Json(json!({ "success": true, "message": "Login exitoso", "user": user() })),
        )
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Credenciales inválidas" })),
        )
            .into_response()
    }
}

async fn logout(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.record("POST", "/api/auth/logout/", &headers);
    if state.fail_logout.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "fallo interno" })),
        )
            .into_response();
    }
    (
        [(header::SET_COOKIE, "sessionid=; Max-Age=0; Path=/")],
        Json(json!({ "success": true })),
    )
        .into_response()
}

async fn register(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.record("POST", "/api/auth/registro/", &headers);
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    state.register_content_types.lock().unwrap().push(content_type);
    (StatusCode::CREATED, Json(json!({ "success": true }))).into_response()
}

async fn list(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.record("GET", "/api/servicios/mis-servicios/", &headers);
    if state.services_unauthorized.load(Ordering::SeqCst) || !has_session_cookie(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "No autenticado" })),
        )
            .into_response();
    }
    let servicios = state.services.lock().unwrap().clone();
    Json(json!({ "success": true, "servicios": servicios })).into_response()
}

async fn book(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("POST", "/api/servicios/agendar/", &headers);
    let id = state.next_id.fetch_add(1, Ordering::SeqCst);
    let fecha = body["fecha"].as_str().unwrap_or_default().to_string();
    let hora = body["hora"].as_str().unwrap_or_default().to_string();

    state.services.lock().unwrap().push(json!({
        "id": id,
        "tipo_servicio": body["tipo_servicio"],
        "fecha_servicio": format!("{fecha}T{hora}:00"),
        "direccion_servicio": body["direccion"],
        "estado": "programado",
        "precio_estimado": "85000.00"
    }));

    (
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "id": id,
            "tipo_servicio": body["tipo_servicio"],
            "fecha": fecha,
            "hora": hora,
            "direccion": body["direccion"],
            "estado": "programado",
            "precio_estimado": "85000.00"
        })),
    )
        .into_response()
}

async fn cancel(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record("POST", "/api/servicios/cancelar/", &headers);
    if !state.ignore_cancel.load(Ordering::SeqCst) {
        let mut services = state.services.lock().unwrap();
        if let Some(record) = services
            .iter_mut()
            .find(|record| record["id"] == body["servicio_id"])
        {
            record["estado"] = json!("cancelado");
        }
    }
    Json(json!({ "success": true, "message": "Servicio cancelado" })).into_response()
}
