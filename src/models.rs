use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Progress shown for in-progress services when the backend sends none.
pub const DEFAULT_IN_PROGRESS_PERCENT: u8 = 65;

pub const SERVICE_TYPES: [(&str, &str); 4] = [
    ("residencial", "Servicios Residenciales"),
    ("empresarial", "Servicios Empresariales"),
    ("especializado", "Servicios Especializados"),
    ("postobra", "Servicios Post-obra"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<u64>,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub foto_perfil: Option<String>,
}

impl User {
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if !full.is_empty() {
            full.to_string()
        } else if !self.username.is_empty() {
            self.username.clone()
        } else {
            "Usuario".to_string()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub telefono: String,
    #[serde(default)]
    pub direccion: String,
}

impl Registration {
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("username", &self.username),
            ("email", &self.email),
            ("password", &self.password),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingRequest {
    pub tipo_servicio: String,
    pub fecha: String,
    pub hora: String,
    pub direccion: String,
    pub area_metros: u32,
    pub numero_habitaciones: u32,
    #[serde(default)]
    pub notas_especiales: String,
    pub nombre_contacto: String,
    pub telefono_contacto: String,
    pub email_contacto: String,
}

/// Canonical service state. The backend has been seen sending several
/// spellings for the same state; all of them are accepted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Other(String),
}

impl ServiceStatus {
    pub fn parse(raw: &str) -> Self {
        let key: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c })
            .collect();

        match key.as_str() {
            "programado" | "agendado" | "pendiente" | "confirmado" => Self::Scheduled,
            "en_progreso" | "en_proceso" => Self::InProgress,
            "completado" | "finalizado" => Self::Completed,
            "cancelado" => Self::Cancelled,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Scheduled => "Programado",
            Self::InProgress => "En Progreso",
            Self::Completed => "Completado",
            Self::Cancelled => "Cancelado",
            Self::Other(raw) => raw,
        }
    }

    /// Still owed: scheduled or being worked on.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Scheduled | Self::InProgress)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub task: String,
    pub completed: bool,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Service {
    pub id: u64,
    pub service_type: String,
    pub date: String,
    pub time: String,
    pub address: String,
    pub status: ServiceStatus,
    pub cost: f64,
    pub progress: u8,
    pub team: Vec<String>,
    pub checklist: Vec<ChecklistItem>,
    pub description: Option<String>,
}

impl Service {
    pub fn shows_progress(&self) -> bool {
        self.status == ServiceStatus::InProgress
    }
}

/// One entry of `GET /api/servicios/mis-servicios/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiService {
    pub id: u64,
    #[serde(default)]
    pub tipo_servicio: String,
    #[serde(default)]
    pub fecha_servicio: String,
    #[serde(default)]
    pub direccion_servicio: String,
    #[serde(default)]
    pub estado: String,
    #[serde(default)]
    pub precio_estimado: Option<Value>,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default, alias = "progreso_porcentaje")]
    pub progreso: Option<f64>,
    #[serde(default)]
    pub equipo: Vec<String>,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
}

impl From<ApiService> for Service {
    fn from(api: ApiService) -> Self {
        let (date, time) = split_timestamp(&api.fecha_servicio);
        let status = ServiceStatus::parse(&api.estado);
        let progress = resolve_progress(&status, api.progreso);
        Self {
            id: api.id,
            service_type: api.tipo_servicio,
            date,
            time,
            address: api.direccion_servicio,
            cost: coerce_cost(api.precio_estimado.as_ref()),
            status,
            progress,
            team: api.equipo,
            checklist: api.checklist,
            description: api.descripcion,
        }
    }
}

/// Body of `POST /api/servicios/agendar/`. The created record comes back
/// either flat or nested under `servicio`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingResponse {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub tipo_servicio: Option<String>,
    #[serde(default)]
    pub fecha: Option<String>,
    #[serde(default)]
    pub hora: Option<String>,
    #[serde(default)]
    pub direccion: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub precio_estimado: Option<Value>,
    #[serde(default)]
    pub servicio: Option<ApiService>,
}

impl BookingResponse {
    pub fn into_service(self) -> Option<Service> {
        if let Some(nested) = self.servicio {
            return Some(nested.into());
        }

        let status = ServiceStatus::parse(self.estado.as_deref().unwrap_or("programado"));
        Some(Service {
            id: self.id?,
            service_type: self.tipo_servicio.unwrap_or_default(),
            date: self.fecha.unwrap_or_default(),
            time: self.hora.unwrap_or_default(),
            address: self.direccion.unwrap_or_default(),
            cost: coerce_cost(self.precio_estimado.as_ref()),
            progress: resolve_progress(&status, None),
            status,
            team: Vec::new(),
            checklist: Vec::new(),
            description: None,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionCheck {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub autenticado: bool,
    #[serde(default)]
    pub usuario: Option<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceList {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub servicios: Vec<ApiService>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Whatever the backend says went wrong; it uses `message` on most
/// endpoints and `error` on a few.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FailureBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl FailureBody {
    pub fn reason(self) -> Option<String> {
        self.message
            .or(self.error)
            .filter(|reason| !reason.trim().is_empty())
    }
}

/// Prices arrive as decimal strings, numbers or null.
pub fn coerce_cost(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(cost) if cost.is_finite() && cost >= 0.0 => cost,
        _ => 0.0,
    }
}

fn resolve_progress(status: &ServiceStatus, reported: Option<f64>) -> u8 {
    match reported {
        Some(value) if value.is_finite() => value.clamp(0.0, 100.0).round() as u8,
        _ if *status == ServiceStatus::InProgress => DEFAULT_IN_PROGRESS_PERCENT,
        _ => 0,
    }
}

fn split_timestamp(timestamp: &str) -> (String, String) {
    match timestamp.split_once('T') {
        Some((date, rest)) => {
            let time: String = rest.chars().take(5).collect();
            let time = if time.is_empty() { "00:00".to_string() } else { time };
            (date.to_string(), time)
        }
        None => (timestamp.to_string(), "00:00".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_synonyms_collapse_to_one_state() {
        assert_eq!(ServiceStatus::parse("en_progreso"), ServiceStatus::InProgress);
        assert_eq!(ServiceStatus::parse("en_proceso"), ServiceStatus::InProgress);
        assert_eq!(ServiceStatus::parse("En Proceso"), ServiceStatus::InProgress);
        assert_eq!(ServiceStatus::parse("programado"), ServiceStatus::Scheduled);
        assert_eq!(ServiceStatus::parse("agendado"), ServiceStatus::Scheduled);
        assert_eq!(ServiceStatus::parse("Pendiente"), ServiceStatus::Scheduled);
        assert_eq!(ServiceStatus::parse("completado"), ServiceStatus::Completed);
        assert_eq!(ServiceStatus::parse("finalizado"), ServiceStatus::Completed);
        assert_eq!(ServiceStatus::parse("Cancelado"), ServiceStatus::Cancelled);
        assert_eq!(
            ServiceStatus::parse("archivado"),
            ServiceStatus::Other("archivado".to_string())
        );
    }

    #[test]
    fn cost_is_coerced_to_finite_non_negative() {
        assert_eq!(coerce_cost(Some(&json!("85000.00"))), 85000.0);
        assert_eq!(coerce_cost(Some(&json!(120000))), 120000.0);
        assert_eq!(coerce_cost(Some(&json!("abc"))), 0.0);
        assert_eq!(coerce_cost(Some(&json!("-5"))), 0.0);
        assert_eq!(coerce_cost(Some(&Value::Null)), 0.0);
        assert_eq!(coerce_cost(None), 0.0);
    }

    #[test]
    fn api_record_maps_to_service() {
        let api: ApiService = serde_json::from_value(json!({
            "id": 7,
            "tipo_servicio": "Servicios Residenciales",
            "fecha_servicio": "2024-12-20T14:00:00+00:00",
            "direccion_servicio": "Calle 15 #23-45, Riohacha",
            "estado": "En Proceso",
            "precio_estimado": "85000.00",
            "descripcion": "Limpieza general"
        }))
        .unwrap();

        let service = Service::from(api);
        assert_eq!(service.date, "2024-12-20");
        assert_eq!(service.time, "14:00");
        assert_eq!(service.status, ServiceStatus::InProgress);
        assert_eq!(service.progress, DEFAULT_IN_PROGRESS_PERCENT);
        assert_eq!(service.cost, 85000.0);
        assert!(service.team.is_empty());
        assert!(service.shows_progress());
    }

    #[test]
    fn reported_progress_is_clamped() {
        let api: ApiService = serde_json::from_value(json!({
            "id": 1,
            "estado": "en_progreso",
            "progreso_porcentaje": 140
        }))
        .unwrap();
        assert_eq!(Service::from(api).progress, 100);
    }

    #[test]
    fn booking_response_accepts_flat_and_nested_records() {
        let flat: BookingResponse = serde_json::from_value(json!({
            "id": 9,
            "tipo_servicio": "residencial",
            "fecha": "2025-01-10",
            "hora": "09:30",
            "direccion": "Carrera 10",
            "estado": "agendado",
            "precio_estimado": null
        }))
        .unwrap();
        let service = flat.into_service().unwrap();
        assert_eq!(service.id, 9);
        assert_eq!(service.time, "09:30");
        assert_eq!(service.status, ServiceStatus::Scheduled);
        assert_eq!(service.cost, 0.0);

        let nested: BookingResponse = serde_json::from_value(json!({
            "success": true,
            "servicio": {
                "id": 10,
                "tipo_servicio": "Servicios Empresariales",
                "fecha_servicio": "2025-02-01T08:00:00",
                "direccion_servicio": "Oficina 3",
                "estado": "Pendiente",
                "precio_estimado": "200000"
            }
        }))
        .unwrap();
        let service = nested.into_service().unwrap();
        assert_eq!(service.id, 10);
        assert_eq!(service.date, "2025-02-01");
        assert_eq!(service.cost, 200000.0);

        assert!(BookingResponse::default().into_service().is_none());
    }

    #[test]
    fn display_name_falls_back_to_username() {
        let mut user: User = serde_json::from_value(json!({ "username": "ana" })).unwrap();
        assert_eq!(user.display_name(), "ana");
        user.first_name = "Ana".into();
        user.last_name = "Pérez".into();
        assert_eq!(user.display_name(), "Ana Pérez");
    }

    #[test]
    fn registration_reports_first_missing_field() {
        let registration = Registration {
            username: "ana".into(),
            email: "ana@example.com".into(),
            password: "secreto".into(),
            first_name: " ".into(),
            ..Registration::default()
        };
        assert_eq!(registration.missing_field(), Some("first_name"));
    }
}
