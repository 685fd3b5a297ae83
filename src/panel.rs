use crate::api::ApiClient;
use crate::cache::{RefreshTicket, ServiceCache};
use crate::config::Config;
use crate::errors::ClientError;
use crate::models::{BookingRequest, Credentials, PhotoUpload, Registration, Service, User};
use crate::notify::{Modal, NoticeBoard};
use crate::renewal::{Renewal, RenewalLoop};
use crate::session::SessionStore;
use crate::stats::{BillingSummary, build_billing};
use crate::storage::SessionStorage;
use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const CONNECTION_ERROR: &str = "Error de conexión. Intente nuevamente.";
const INVALID_SESSION: &str = "Sesión no válida. Redirigiendo al login...";
const SESSION_EXPIRED: &str = "Sesión expirada. Por favor, inicie sesión nuevamente.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelOutcome {
    Declined,
    Cancelled,
}

#[derive(Debug, Clone, Serialize)]
pub struct PanelSnapshot {
    pub logged_in: bool,
    pub user: Option<User>,
    pub services: Vec<Service>,
    pub billing: BillingSummary,
    pub renewal_running: bool,
}

struct PanelInner {
    config: Config,
    api: ApiClient,
    session: SessionStore,
    cache: Mutex<ServiceCache>,
    board: NoticeBoard,
    renewal: RenewalLoop,
}

/// Owns the session, the service cache and the overlays, and runs every
/// user-facing operation against the backend.
#[derive(Clone)]
pub struct Panel {
    inner: Arc<PanelInner>,
}

impl Panel {
    pub fn new(config: Config) -> Result<Self, ClientError> {
        let api = ApiClient::new(config.api_base.clone())?;
        let session = SessionStore::new(SessionStorage::new(config.data_path.clone()));
        Ok(Self {
            inner: Arc::new(PanelInner {
                config,
                api,
                session,
                cache: Mutex::new(ServiceCache::default()),
                board: NoticeBoard::default(),
                renewal: RenewalLoop::default(),
            }),
        })
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn board(&self) -> &NoticeBoard {
        &self.inner.board
    }

    pub fn renewal(&self) -> &RenewalLoop {
        &self.inner.renewal
    }

    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    pub async fn user(&self) -> Option<User> {
        self.inner.session.user().await
    }

    pub async fn is_logged_in(&self) -> bool {
        self.inner.session.is_logged_in().await
    }

    pub async fn services(&self) -> Vec<Service> {
        self.inner.cache.lock().await.services().to_vec()
    }

    pub async fn service(&self, id: u64) -> Option<Service> {
        self.inner.cache.lock().await.find(id).cloned()
    }

    pub async fn snapshot(&self) -> PanelSnapshot {
        let user = self.user().await;
        let services = self.services().await;
        PanelSnapshot {
            logged_in: user.is_some(),
            billing: build_billing(&services),
            user,
            services,
            renewal_running: self.inner.renewal.is_running(),
        }
    }

    fn start_renewal(&self) {
        self.inner.renewal.start(
            self.inner.config.renewal_period,
            PanelRenewal(Arc::downgrade(&self.inner)),
        );
    }

    /// Startup check. Never fails: anything but a confirmed session
    /// leaves the panel logged out.
    pub async fn check_session(&self) {
        let check = match self.inner.api.verify_session().await {
            Ok(check) => check,
            Err(err) => {
                warn!("session check failed: {err}");
                self.drop_local_session().await;
                return;
            }
        };

        let user = match check.usuario {
            Some(user) if check.success && check.autenticado => user,
            _ => {
                debug!("no authenticated session on the backend");
                self.drop_local_session().await;
                return;
            }
        };

        if let Err(err) = self.inner.session.establish(user).await {
            warn!("could not persist session: {err}");
            self.drop_local_session().await;
            return;
        }
        self.start_renewal();
        if let Err(err) = self.refresh().await {
            debug!("initial refresh failed: {err}");
        }
    }

    pub async fn login(&self, credentials: Credentials) -> Result<User, ClientError> {
        if credentials.username.trim().is_empty() || credentials.password.is_empty() {
            self.inner.board.error("Username y password son requeridos");
            return Err(ClientError::Validation("username and password are required".into()));
        }

        let result = {
            let _loading = self.inner.board.loading("Iniciando sesión...");
            self.inner.api.login(&credentials).await
        };

        let user = match result {
            Ok(user) => user,
            Err(err) => {
                self.notify_failure(&err, "Error al iniciar sesión");
                return Err(err);
            }
        };

        self.inner.session.establish(user.clone()).await?;
        self.start_renewal();
        tokio::time::sleep(self.inner.config.login_settle).await;
        self.inner.board.success("¡Bienvenido de vuelta!");
        self.inner.board.close_modal();
        info!(username = %user.username, "logged in");

        if let Err(err) = self.refresh().await {
            debug!("post-login refresh failed: {err}");
        }
        Ok(user)
    }

    pub async fn register(
        &self,
        registration: Registration,
        photo: Option<PhotoUpload>,
    ) -> Result<(), ClientError> {
        if let Some(field) = registration.missing_field() {
            self.inner
                .board
                .error(format!("El campo {field} es requerido"));
            return Err(ClientError::Validation(format!("{field} is required")));
        }

        let result = {
            let _loading = self.inner.board.loading("Creando cuenta...");
            self.inner.api.register(&registration, photo).await
        };

        match result {
            Ok(()) => {
                self.inner
                    .board
                    .success("¡Cuenta creada exitosamente! Ya puedes iniciar sesión.");
                self.inner.board.show_modal(Modal::Login);
                info!(username = %registration.username, "account registered");
                Ok(())
            }
            Err(err) => {
                self.notify_failure(&err, "Error al crear la cuenta");
                Err(err)
            }
        }
    }

    /// Local state is cleared whatever the backend answers. Refreshes
    /// still in flight are retired before the backend is contacted.
    pub async fn logout(&self) {
        self.inner.renewal.stop();
        self.inner.cache.lock().await.invalidate();

        match self.inner.api.logout().await {
            Ok(()) => self.inner.board.success("Sesión cerrada exitosamente"),
            Err(err) => warn!("logout request failed: {err}"),
        }

        self.drop_local_session().await;
        info!("logged out");
    }

    pub async fn renew_session(&self) -> bool {
        match self.inner.api.verify_session().await {
            Ok(check) if check.success && check.autenticado => {
                debug!("session renewed");
                true
            }
            Ok(_) => false,
            Err(err) => {
                warn!("session renewal failed: {err}");
                false
            }
        }
    }

    /// Re-verifies the session, then replaces the cache with the
    /// backend's list. Returns the number of services loaded.
    ///
    /// The refresh is tied to the cache generation it started in. Once a
    /// logout or a newer refresh moves the generation on, every later step
    /// of this one is dropped and it ends with `Superseded`.
    pub async fn refresh(&self) -> Result<usize, ClientError> {
        let stored = self.inner.session.persisted().await;
        if !stored.has_session() {
            self.inner.board.error(INVALID_SESSION);
            return Err(ClientError::NoSession);
        }

        let ticket = self.inner.cache.lock().await.begin_refresh();
        let checked = self.inner.api.verify_session().await;
        self.ensure_current(ticket).await?;

        let check = match checked {
            Ok(check) => check,
            Err(ClientError::Network(err)) => {
                self.inner.board.error("Error de conexión al cargar servicios");
                return Err(ClientError::Network(err));
            }
            Err(ClientError::Unauthorized(reason)) => {
                self.inner.board.error(SESSION_EXPIRED);
                self.logout().await;
                return Err(ClientError::Unauthorized(reason));
            }
            Err(err) => {
                self.inner
                    .board
                    .error("Error de autenticación. Intente nuevamente.");
                return Err(err);
            }
        };

        if !check.success || !check.autenticado {
            self.drop_local_session().await;
            self.inner.board.error(INVALID_SESSION);
            return Err(ClientError::Unauthorized("session is no longer valid".into()));
        }

        if let Some(user) = check.usuario {
            if !self.inner.session.update(user).await? {
                debug!("session ended during refresh");
                return Err(ClientError::Superseded);
            }
        }

        let listed = self.inner.api.list_services().await;
        self.ensure_current(ticket).await?;

        match listed {
            Ok(records) => {
                let services: Vec<Service> = records.into_iter().map(Service::from).collect();
                let count = services.len();
                if !self.inner.cache.lock().await.commit(ticket, services) {
                    debug!("discarding services from a superseded refresh");
                    return Err(ClientError::Superseded);
                }
                debug!(count, "services loaded");
                Ok(count)
            }
            Err(ClientError::Unauthorized(reason)) => {
                self.inner.board.error(SESSION_EXPIRED);
                self.logout().await;
                Err(ClientError::Unauthorized(reason))
            }
            Err(ClientError::Application { status, message }) => {
                self.inner
                    .board
                    .error(format!("Error cargando servicios: {message}"));
                Err(ClientError::Application { status, message })
            }
            Err(err) => {
                self.inner.board.error("Error de conexión al cargar servicios");
                Err(err)
            }
        }
    }

    async fn ensure_current(&self, ticket: RefreshTicket) -> Result<(), ClientError> {
        if self.inner.cache.lock().await.is_current(ticket) {
            Ok(())
        } else {
            debug!("refresh superseded while waiting on the backend");
            Err(ClientError::Superseded)
        }
    }

    /// Cancels after an explicit confirmation. The local status change is
    /// only a hint; the refresh that follows decides.
    pub async fn cancel(&self, service_id: u64, confirmed: bool) -> Result<CancelOutcome, ClientError> {
        self.inner.board.close_modal();
        if !confirmed {
            return Ok(CancelOutcome::Declined);
        }

        let result = {
            let _loading = self.inner.board.loading("Cancelando servicio...");
            self.inner.api.cancel(service_id).await
        };

        match result {
            Ok(()) => {
                self.inner.cache.lock().await.mark_cancelled(service_id);
                self.inner.board.success("Servicio cancelado exitosamente.");
                info!(service_id, "service cancelled");
                if let Err(err) = self.refresh().await {
                    debug!("refresh after cancel failed: {err}");
                }
                Ok(CancelOutcome::Cancelled)
            }
            Err(err) => {
                self.fail_request(&err, "Error al cancelar el servicio").await;
                Err(err)
            }
        }
    }

    pub async fn book(&self, request: BookingRequest) -> Result<Option<Service>, ClientError> {
        if !self.is_logged_in().await {
            self.inner
                .board
                .error("Debe iniciar sesión para agendar un servicio.");
            self.inner.board.show_modal(Modal::Login);
            return Err(ClientError::NotAuthenticated);
        }

        if let Err(reason) = validate_booking(&request, Local::now().date_naive()) {
            self.inner.board.error(reason);
            return Err(ClientError::Validation(reason.to_string()));
        }

        let result = {
            let _loading = self.inner.board.loading("Procesando su solicitud...");
            self.inner.api.book(&request).await
        };

        match result {
            Ok(response) => {
                let created = response.into_service();
                match &created {
                    Some(service) => {
                        info!(service_id = service.id, "service booked");
                        self.inner.cache.lock().await.append(service.clone());
                    }
                    None => warn!("booking response carried no record"),
                }
                self.inner.board.success(
                    "¡Servicio agendado exitosamente! Recibirá una confirmación por email.",
                );
                self.inner.board.close_modal();
                Ok(created)
            }
            Err(err) => {
                self.fail_request(&err, "Error al agendar el servicio").await;
                Err(err)
            }
        }
    }

    pub async fn show_booking(&self, service_type: Option<String>) -> bool {
        if !self.is_logged_in().await {
            self.inner
                .board
                .error("Debe iniciar sesión para agendar un servicio.");
            self.inner.board.show_modal(Modal::Login);
            return false;
        }
        self.inner.board.show_modal(Modal::Booking { service_type });
        true
    }

    pub async fn show_client_panel(&self) -> bool {
        if !self.is_logged_in().await {
            self.inner
                .board
                .error("Debe iniciar sesión para acceder al Panel Cliente.");
            self.inner.board.show_modal(Modal::Login);
            return false;
        }
        self.inner.board.show_modal(Modal::ClientPanel);
        if let Err(err) = self.refresh().await {
            debug!("client panel refresh failed: {err}");
        }
        true
    }

    pub async fn show_report(&self, service_id: u64) -> bool {
        if self.service(service_id).await.is_none() {
            self.inner.board.error("Servicio no encontrado");
            return false;
        }
        self.inner.board.show_modal(Modal::Report(service_id));
        true
    }

    pub fn reschedule(&self, service_id: u64) {
        debug!(service_id, "reschedule requested");
        self.inner.board.success(
            "Función de reprogramación disponible próximamente. Por favor contacte al servicio al cliente.",
        );
    }

    async fn drop_local_session(&self) {
        self.inner.renewal.stop();
        if let Err(err) = self.inner.session.clear().await {
            warn!("could not clear stored session: {err}");
        }
        self.inner.cache.lock().await.clear();
    }

    /// 401 forces a logout; anything else becomes a notice.
    async fn fail_request(&self, err: &ClientError, fallback: &str) {
        if matches!(err, ClientError::Unauthorized(_)) {
            self.inner.board.error(SESSION_EXPIRED);
            self.logout().await;
        } else {
            self.notify_failure(err, fallback);
        }
    }

    fn notify_failure(&self, err: &ClientError, fallback: &str) {
        let message = match err {
            ClientError::Network(_) => CONNECTION_ERROR.to_string(),
            ClientError::Application { message, .. } | ClientError::Unauthorized(message) => {
                message.clone()
            }
            _ => fallback.to_string(),
        };
        self.inner.board.error(message);
    }
}

fn validate_booking(request: &BookingRequest, today: NaiveDate) -> Result<(), &'static str> {
    if request.tipo_servicio.trim().is_empty() {
        return Err("Seleccione el tipo de servicio.");
    }
    if request.direccion.trim().is_empty() {
        return Err("La dirección del servicio es requerida.");
    }
    let date = NaiveDate::parse_from_str(request.fecha.trim(), "%Y-%m-%d")
        .map_err(|_| "Formato de fecha inválido.")?;
    if date < today + Duration::days(1) {
        return Err("La fecha del servicio debe ser a partir de mañana.");
    }
    if request.area_metros == 0 || request.numero_habitaciones == 0 {
        return Err("Indique el área y el número de habitaciones.");
    }
    Ok(())
}

/// Handle the renewal task keeps; it must not keep the panel alive.
struct PanelRenewal(Weak<PanelInner>);

impl PanelRenewal {
    fn panel(&self) -> Option<Panel> {
        self.0.upgrade().map(|inner| Panel { inner })
    }
}

impl Renewal for PanelRenewal {
    async fn renew(&self) -> bool {
        match self.panel() {
            Some(panel) => panel.renew_session().await,
            None => false,
        }
    }

    async fn expire(&self) {
        if let Some(panel) = self.panel() {
            panel.logout().await;
        }
    }
}
