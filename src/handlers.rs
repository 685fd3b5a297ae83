use crate::errors::{AppError, ClientError};
use crate::models::{BookingRequest, Credentials, PhotoUpload, Registration};
use crate::notify::Modal;
use crate::panel::PanelSnapshot;
use crate::state::AppState;
use crate::ui::{PageView, Tab, render_page, render_tab};
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{Html, Redirect},
    Form, Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub tab: Option<String>,
    pub modal: Option<String>,
    pub service: Option<u64>,
    #[serde(rename = "type")]
    pub service_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CancelForm {
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub services: usize,
}

pub async fn index(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Html<String> {
    let panel = &state.panel;
    match query.modal.as_deref().map(str::trim) {
        Some("login") => panel.board().show_modal(Modal::Login),
        Some("register") => panel.board().show_modal(Modal::Register),
        Some("booking") => {
            panel.show_booking(query.service_type.clone()).await;
        }
        Some("client") => {
            panel.show_client_panel().await;
        }
        Some("report") => match query.service {
            Some(id) => {
                panel.show_report(id).await;
            }
            None => panel.board().error("Servicio no encontrado"),
        },
        Some("cancel") => match query.service {
            Some(id) => panel.board().show_modal(Modal::ConfirmCancel(id)),
            None => panel.board().error("Servicio no encontrado"),
        },
        Some("none") => panel.board().close_modal(),
        Some(other) => debug!(modal = other, "ignoring unknown modal"),
        None => {}
    }

    let tab = query
        .tab
        .as_deref()
        .and_then(Tab::from_name)
        .unwrap_or_default();

    let view = PageView {
        user: panel.user().await,
        services: panel.services().await,
        tab,
        modal: panel.board().modal(),
        notices: panel.board().visible(),
        today: Local::now().date_naive(),
    };
    Html(render_page(&view))
}

pub async fn tab(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Html<String>, AppError> {
    let tab = Tab::from_name(&name).ok_or_else(|| AppError::not_found(format!("unknown tab '{name}'")))?;
    let services = state.panel.services().await;
    Ok(Html(render_tab(tab, &services)))
}

pub async fn login(State(state): State<AppState>, Form(credentials): Form<Credentials>) -> Redirect {
    if let Err(err) = state.panel.login(credentials).await {
        debug!("login failed: {err}");
    }
    Redirect::to("/")
}

pub async fn register(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let mut registration = Registration::default();
    let mut photo = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::bad_request(err.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "profilePhoto" {
            let file_name = field.file_name().unwrap_or("foto.jpg").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|err| AppError::bad_request(err.body_text()))?;
            if !bytes.is_empty() {
                photo = Some(PhotoUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|err| AppError::bad_request(err.body_text()))?;
        match name.as_str() {
            "username" => registration.username = value,
            "email" => registration.email = value,
            "password" => registration.password = value,
            "first_name" => registration.first_name = value,
            "last_name" => registration.last_name = value,
            "telefono" => registration.telefono = value,
            "direccion" => registration.direccion = value,
            other => debug!(field = other, "ignoring registration field"),
        }
    }

    if let Err(err) = state.panel.register(registration, photo).await {
        debug!("registration failed: {err}");
    }
    Ok(Redirect::to("/"))
}

pub async fn logout(State(state): State<AppState>) -> Redirect {
    state.panel.logout().await;
    Redirect::to("/")
}

pub async fn book(State(state): State<AppState>, Form(request): Form<BookingRequest>) -> Redirect {
    if let Err(err) = state.panel.book(request).await {
        debug!("booking failed: {err}");
    }
    Redirect::to("/")
}

pub async fn refresh(State(state): State<AppState>) -> Redirect {
    match state.panel.refresh().await {
        Ok(_) => Redirect::to("/?modal=client"),
        Err(err) if err.requires_redirect() => Redirect::to("/?modal=login"),
        Err(err) => {
            debug!("refresh failed: {err}");
            Redirect::to("/?modal=client")
        }
    }
}

pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Form(form): Form<CancelForm>,
) -> Redirect {
    match state.panel.cancel(id, form.confirmed).await {
        Err(ClientError::Unauthorized(_)) => Redirect::to("/?modal=login"),
        Err(err) => {
            debug!(service_id = id, "cancel failed: {err}");
            Redirect::to("/")
        }
        Ok(_) => Redirect::to("/"),
    }
}

pub async fn reschedule(State(state): State<AppState>, Path(id): Path<u64>) -> Redirect {
    state.panel.reschedule(id);
    Redirect::to("/")
}

pub async fn panel_snapshot(State(state): State<AppState>) -> Json<PanelSnapshot> {
    Json(state.panel.snapshot().await)
}

pub async fn api_refresh(State(state): State<AppState>) -> Result<Json<RefreshResponse>, AppError> {
    let services = state.panel.refresh().await?;
    Ok(Json(RefreshResponse { services }))
}
