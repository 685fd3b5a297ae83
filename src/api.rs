use crate::errors::ClientError;
use crate::models::{
    ApiService, BookingRequest, BookingResponse, Credentials, FailureBody, LoginResponse,
    PhotoUpload, Registration, ServiceList, SessionCheck, User,
};
use reqwest::{
    Client, RequestBuilder, StatusCode, Url,
    cookie::{CookieStore, Jar},
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

const CSRF_COOKIE: &str = "csrftoken";
const CSRF_HEADER: &str = "X-CSRFToken";

pub const BOOK_PATH: &str = "/api/servicios/agendar/";
pub const SERVICES_PATH: &str = "/api/servicios/mis-servicios/";
pub const CANCEL_PATH: &str = "/api/servicios/cancelar/";
pub const LOGIN_PATH: &str = "/api/auth/login/";
pub const REGISTER_PATH: &str = "/api/auth/registro/";
pub const SESSION_PATH: &str = "/api/auth/verificar-sesion/";
pub const LOGOUT_PATH: &str = "/api/auth/logout/";

/// HTTP gateway to the booking backend. Cookies persist across calls in
/// one jar, so the backend's session and CSRF cookies ride along.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    jar: Arc<Jar>,
    base: Url,
}

impl ApiClient {
    pub fn new(base: Url) -> Result<Self, ClientError> {
        let jar = Arc::new(Jar::default());
        let http = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .build()?;
        Ok(Self { http, jar, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base
            .join(path)
            .map_err(|err| ClientError::Validation(format!("bad endpoint {path}: {err}")))
    }

    fn csrf_cookie(&self) -> Option<String> {
        let header = self.jar.cookies(&self.base)?;
        let raw = header.to_str().ok()?;
        raw.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == CSRF_COOKIE).then(|| value.to_string())
        })
    }

    /// Token for state-changing calls. When the cookie is missing the
    /// session endpoint is hit once to obtain it; an empty token is sent
    /// if that does not help either.
    pub async fn csrf_token(&self) -> String {
        if let Some(token) = self.csrf_cookie() {
            return token;
        }

        let url = match self.endpoint(SESSION_PATH) {
            Ok(url) => url,
            Err(err) => {
                warn!("csrf token lookup skipped: {err}");
                return String::new();
            }
        };
        match self.http.get(url).send().await {
            Ok(resp) if resp.status().is_success() => self.csrf_cookie().unwrap_or_default(),
            Ok(resp) => {
                debug!(status = %resp.status(), "csrf token request rejected");
                String::new()
            }
            Err(err) => {
                warn!("csrf token request failed: {err}");
                String::new()
            }
        }
    }

    async fn mutating(&self, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.endpoint(path)?;
        let token = self.csrf_token().await;
        Ok(self.http.post(url).header(CSRF_HEADER, token))
    }

    pub async fn verify_session(&self) -> Result<SessionCheck, ClientError> {
        let request = self
            .http
            .get(self.endpoint(SESSION_PATH)?)
            .header("X-Requested-With", "XMLHttpRequest");
        send(request, "Error de autenticación").await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<User, ClientError> {
        let request = self.mutating(LOGIN_PATH).await?.json(credentials);
        let body: LoginResponse = send(request, "Error al iniciar sesión").await?;
        body.user.ok_or_else(|| {
            ClientError::application(
                StatusCode::OK,
                body.message
                    .unwrap_or_else(|| "Respuesta de login sin usuario".to_string()),
            )
        })
    }

    /// JSON when there is no photo, multipart form data when there is.
    pub async fn register(
        &self,
        registration: &Registration,
        photo: Option<PhotoUpload>,
    ) -> Result<(), ClientError> {
        let request = self.mutating(REGISTER_PATH).await?;
        let request = match photo {
            None => request.json(registration),
            Some(photo) => {
                let part = Part::bytes(photo.bytes)
                    .file_name(photo.file_name)
                    .mime_str(&photo.content_type)?;
                let form = Form::new()
                    .text("username", registration.username.clone())
                    .text("email", registration.email.clone())
                    .text("password", registration.password.clone())
                    .text("first_name", registration.first_name.clone())
                    .text("last_name", registration.last_name.clone())
                    .text("telefono", registration.telefono.clone())
                    .text("direccion", registration.direccion.clone())
                    .part("profilePhoto", part);
                request.multipart(form)
            }
        };
        let _: serde_json::Value = send(request, "Error al crear la cuenta").await?;
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), ClientError> {
        let request = self.mutating(LOGOUT_PATH).await?;
        let _: serde_json::Value = send(request, "Error al cerrar sesión").await?;
        Ok(())
    }

    pub async fn book(&self, booking: &BookingRequest) -> Result<BookingResponse, ClientError> {
        let request = self.mutating(BOOK_PATH).await?.json(booking);
        send(request, "Error al agendar el servicio").await
    }

    pub async fn list_services(&self) -> Result<Vec<ApiService>, ClientError> {
        let token = self.csrf_token().await;
        let request = self
            .http
            .get(self.endpoint(SERVICES_PATH)?)
            .header(CSRF_HEADER, token)
            .header("X-Requested-With", "XMLHttpRequest");
        let body: ServiceList = send(request, "Error cargando servicios del usuario").await?;
        if !body.success {
            return Err(ClientError::application(
                StatusCode::OK,
                body.message.unwrap_or_else(|| "respuesta sin éxito".to_string()),
            ));
        }
        Ok(body.servicios)
    }

    pub async fn cancel(&self, service_id: u64) -> Result<(), ClientError> {
        let request = self
            .mutating(CANCEL_PATH)
            .await?
            .json(&json!({ "servicio_id": service_id }));
        let _: serde_json::Value = send(request, "Error al cancelar el servicio").await?;
        Ok(())
    }
}

/// Sends and normalizes: 401 becomes `Unauthorized`, any other non-2xx
/// becomes `Application` carrying the backend's reason or `fallback`.
async fn send<T: DeserializeOwned>(request: RequestBuilder, fallback: &str) -> Result<T, ClientError> {
    let response = request.send().await?;
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let reason = serde_json::from_slice::<FailureBody>(&bytes)
            .ok()
            .and_then(FailureBody::reason)
            .unwrap_or_else(|| fallback.to_string());
        debug!(%status, %reason, "backend rejected request");
        return Err(if status == StatusCode::UNAUTHORIZED {
            ClientError::Unauthorized(reason)
        } else {
            ClientError::application(status, reason)
        });
    }

    Ok(serde_json::from_slice(&bytes)?)
}
