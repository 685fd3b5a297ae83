use crate::models::{SERVICE_TYPES, Service, User};
use crate::notify::{Modal, Notice, NoticeKind};
use crate::stats::{build_billing, checklist_for, current_task, group};
use chrono::{Datelike, NaiveDate};
use std::fmt::Write;

/// Client panel tabs. The tab always arrives explicitly from the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Services,
    Tracking,
    History,
    Billing,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Services, Tab::Tracking, Tab::History, Tab::Billing];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "services" => Some(Tab::Services),
            "tracking" => Some(Tab::Tracking),
            "history" => Some(Tab::History),
            "billing" => Some(Tab::Billing),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tab::Services => "services",
            Tab::Tracking => "tracking",
            Tab::History => "history",
            Tab::Billing => "billing",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Tab::Services => "Mis Servicios",
            Tab::Tracking => "Seguimiento",
            Tab::History => "Historial",
            Tab::Billing => "Facturación",
        }
    }
}

/// Everything one page render needs.
#[derive(Debug, Clone)]
pub struct PageView {
    pub user: Option<User>,
    pub services: Vec<Service>,
    pub tab: Tab,
    pub modal: Option<Modal>,
    pub notices: Vec<Notice>,
    pub today: NaiveDate,
}

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// "2024-12-20" → "20 de diciembre de 2024". Unparsable input is shown as is.
pub fn format_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
        Ok(date) => format!(
            "{} de {} de {}",
            date.day(),
            MONTHS[date.month0() as usize],
            date.year()
        ),
        Err(_) => date.to_string(),
    }
}

/// Whole pesos with dot separators: 85000 → "$85.000".
pub fn format_amount(amount: f64) -> String {
    let whole = if amount.is_finite() { amount.round().max(0.0) as u64 } else { 0 };
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    format!("${grouped}")
}

fn service_type_label(raw: &str) -> String {
    SERVICE_TYPES
        .iter()
        .find(|(key, _)| *key == raw)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn progress_bar(class: &str, progress: u8) -> String {
    format!(
        r#"<div class="{class}"><div class="progress" style="width: {progress}%"></div></div>"#
    )
}

fn book_button(label: &str) -> String {
    format!(r#"<a href="/?modal=booking" class="btn btn-primary">+ {}</a>"#, escape(label))
}

fn service_details(service: &Service, with_time: bool) -> String {
    let when = if with_time {
        format!("{} a las {}", format_date(&service.date), escape(&service.time))
    } else {
        format_date(&service.date)
    };
    format!(
        r#"<div class="service-details"><p>{}</p><p>{}</p><p>{}</p></div>"#,
        escape(&when),
        escape(&service.address),
        format_amount(service.cost)
    )
}

/// Overview of all groups: every active and scheduled service, plus the
/// three most recent completed ones.
pub fn render_summary(services: &[Service]) -> String {
    if services.is_empty() {
        return format!(
            r#"<div class="no-services"><p>No tienes servicios agendados</p>{}</div>"#,
            book_button("Agendar Servicio")
        );
    }

    let groups = group(services);
    let mut html = String::new();

    if !groups.active.is_empty() {
        html.push_str(r#"<div class="services-section"><h3>Servicios en Progreso</h3>"#);
        for service in &groups.active {
            let _ = write!(
                html,
                r#"<div class="service-card active" data-id="{id}"><div class="service-header"><h4>{kind}</h4><span class="service-status in-progress">En Progreso</span></div>{details}<div class="service-progress">{bar}<span class="progress-text">{progress}% Completado</span></div><div class="service-actions"><a href="/?modal=client&amp;tab=tracking" class="btn btn-secondary">Ver Seguimiento</a></div></div>"#,
                id = service.id,
                kind = escape(&service_type_label(&service.service_type)),
                details = service_details(service, true),
                bar = progress_bar("progress-bar", service.progress),
                progress = service.progress,
            );
        }
        html.push_str("</div>");
    }

    if !groups.scheduled.is_empty() {
        html.push_str(r#"<div class="services-section"><h3>Servicios Programados</h3>"#);
        for service in &groups.scheduled {
            let _ = write!(
                html,
                r#"<div class="service-card scheduled" data-id="{id}"><div class="service-header"><h4>{kind}</h4><span class="service-status scheduled">Programado</span></div>{details}<div class="service-actions"><form method="post" action="/services/{id}/reschedule"><button type="submit" class="btn btn-secondary">Reprogramar</button></form><a href="/?modal=cancel&amp;service={id}" class="btn btn-danger">Cancelar</a></div></div>"#,
                id = service.id,
                kind = escape(&service_type_label(&service.service_type)),
                details = service_details(service, true),
            );
        }
        html.push_str("</div>");
    }

    let recent = groups.recent_completed();
    if !recent.is_empty() {
        html.push_str(
            r#"<div class="services-section"><h3>Servicios Completados Recientes</h3>"#,
        );
        for service in recent {
            let _ = write!(
                html,
                r#"<div class="service-card completed" data-id="{id}"><div class="service-header"><h4>{kind}</h4><span class="service-status completed">Completado</span></div>{details}<div class="service-actions"><a href="/?modal=report&amp;service={id}" class="btn btn-secondary">Ver Reporte</a></div></div>"#,
                id = service.id,
                kind = escape(&service_type_label(&service.service_type)),
                details = service_details(service, false),
            );
        }
        html.push_str("</div>");
    }

    html
}

/// Status cards: the first in-progress and the first scheduled service.
pub fn render_services_tab(services: &[Service]) -> String {
    if services.is_empty() {
        return format!(
            r#"<div class="no-services-main"><h3>No tienes servicios agendados</h3><p>Agenda tu primer servicio de limpieza profesional</p>{}</div>"#,
            book_button("Agendar Servicio")
        );
    }

    let groups = group(services);
    if groups.active.is_empty() && groups.scheduled.is_empty() {
        return format!(
            r#"<div class="no-active-services"><h3>No hay servicios activos</h3><p>Todos tus servicios han sido completados</p>{}</div>"#,
            book_button("Agendar Nuevo Servicio")
        );
    }

    let mut html = String::new();
    if let Some(service) = groups.active.first() {
        let task = current_task(service.progress);
        let _ = write!(
            html,
            r#"<div class="status-card in-progress"><div class="status-header"><h3>Servicio en Progreso</h3><span class="status-badge in-progress">En Ejecución</span></div><div class="status-content"><p>{when}</p><p>{address}</p><p>Cuadrilla: {team}</p><div class="progress-container">{bar}<span class="progress-text">{progress}% Completado - {task}</span></div></div></div>"#,
            when = escape(&format!("{}, {}", format_date(&service.date), service.time)),
            address = escape(&service.address),
            team = escape(&team_line(service)),
            bar = progress_bar("progress-bar", service.progress),
            progress = service.progress,
            task = task.label(),
        );
    }
    if let Some(service) = groups.scheduled.first() {
        let _ = write!(
            html,
            r#"<div class="status-card scheduled"><div class="status-header"><h3>Próximo Servicio</h3><span class="status-badge scheduled">Programado</span></div><div class="status-content"><p>{when}</p><p>{kind}</p><p>Duración estimada: 3 horas</p></div></div>"#,
            when = escape(&format!("{}, {}", format_date(&service.date), service.time)),
            kind = escape(&service_type_label(&service.service_type)),
        );
    }
    html
}

fn team_line(service: &Service) -> String {
    if service.team.is_empty() {
        "Equipo Asignado".to_string()
    } else {
        service.team.join(", ")
    }
}

pub fn render_tracking(services: &[Service]) -> String {
    let Some(service) = group(services).active.first().copied() else {
        return r#"<div class="no-tracking"><p>No hay servicios en progreso para hacer seguimiento</p></div>"#
            .to_string();
    };

    let mut checklist = String::new();
    for item in checklist_for(service) {
        let _ = write!(
            checklist,
            r#"<div class="checklist-item{done}"><span class="task-status">{mark}</span><div class="task-info"><span class="task-name">{task}</span><span class="task-time">{time}</span></div></div>"#,
            done = if item.completed { " completed" } else { "" },
            mark = if item.completed { "&#10003;" } else { "&#9675;" },
            task = escape(&item.task),
            time = escape(&item.time),
        );
    }

    let team = if service.team.is_empty() {
        "<p>Equipo por asignar</p>".to_string()
    } else {
        service
            .team
            .iter()
            .map(|member| format!(r#"<div class="team-member"><span>{}</span></div>"#, escape(member)))
            .collect()
    };

    format!(
        r#"<div class="tracking-container"><div class="service-tracking-header"><h3>{kind}</h3><p>{address}</p><p>{when}</p></div><div class="progress-section"><h4>Progreso General</h4>{bar}<span class="progress-text-large">{progress}% Completado</span></div><div class="checklist-section"><h4>Lista de Tareas</h4><div class="checklist">{checklist}</div></div><div class="team-section"><h4>Equipo Asignado</h4><div class="team-info">{team}</div></div></div>"#,
        kind = escape(&service_type_label(&service.service_type)),
        address = escape(&service.address),
        when = escape(&format!("{} a las {}", format_date(&service.date), service.time)),
        bar = progress_bar("progress-bar-large", service.progress),
        progress = service.progress,
    )
}

pub fn render_history(services: &[Service]) -> String {
    let groups = group(services);
    if groups.completed.is_empty() {
        return r#"<div class="no-services"><p>No tienes servicios completados aún</p></div>"#
            .to_string();
    }

    let mut html = String::new();
    for service in &groups.completed {
        let _ = write!(
            html,
            r#"<div class="service-history-item" data-id="{id}"><div class="service-info"><h4>{kind}</h4><p>{date}</p><p>{address}</p><p>{cost}</p></div><div class="service-status completed">Completado</div></div>"#,
            id = service.id,
            kind = escape(&service_type_label(&service.service_type)),
            date = escape(&format_date(&service.date)),
            address = escape(&service.address),
            cost = format_amount(service.cost),
        );
    }
    html
}

pub fn render_billing(services: &[Service]) -> String {
    let billing = build_billing(services);
    let groups = group(services);

    let payments = if groups.completed.is_empty() {
        r#"<p class="no-payments">No hay pagos registrados</p>"#.to_string()
    } else {
        groups
            .completed
            .iter()
            .map(|service| {
                format!(
                    r#"<div class="payment-item"><div class="payment-info"><span class="service-type">{}</span><span class="payment-date">{}</span></div><div class="payment-amount">{}</div><div class="payment-status paid">Pagado</div></div>"#,
                    escape(&service_type_label(&service.service_type)),
                    escape(&format_date(&service.date)),
                    format_amount(service.cost),
                )
            })
            .collect()
    };

    format!(
        r#"<div class="billing-summary"><div class="billing-card"><h4>Resumen de Facturación</h4><div class="billing-item"><span>Total de servicios:</span><span id="billing-total">{total}</span></div><div class="billing-item"><span>Servicios completados:</span><span id="billing-completed">{completed}</span></div><div class="billing-item"><span>Total pagado:</span><span class="amount" id="billing-paid">{paid}</span></div><div class="billing-item"><span>Servicios pendientes:</span><span id="billing-pending">{pending}</span></div><div class="billing-item"><span>Monto pendiente:</span><span class="amount pending" id="billing-pending-amount">{pending_amount}</span></div></div></div><div class="billing-history"><h4>Historial de Pagos</h4>{payments}</div>"#,
        total = billing.total_services,
        completed = billing.completed_services,
        paid = format_amount(billing.completed_amount),
        pending = billing.pending_services,
        pending_amount = format_amount(billing.pending_amount),
    )
}

pub fn render_tab(tab: Tab, services: &[Service]) -> String {
    match tab {
        Tab::Services => render_summary(services),
        Tab::Tracking => render_tracking(services),
        Tab::History => render_history(services),
        Tab::Billing => render_billing(services),
    }
}

pub fn render_report(service: &Service) -> String {
    let tasks: String = checklist_for(service)
        .iter()
        .map(|item| format!("<li>&#10003; {}</li>", escape(&item.task)))
        .collect();
    let description = service
        .description
        .as_deref()
        .map(|text| format!("<p>{}</p>", escape(text)))
        .unwrap_or_default();
    let progress = if service.shows_progress() {
        format!("<p>Progreso: {}%</p>", service.progress)
    } else {
        String::new()
    };

    format!(
        r#"<h2>Reporte de Servicio</h2><div class="report-content"><div class="report-header"><h3>{kind}</h3><p>Fecha: {date}</p><p>Costo: {cost}</p><p>Estado: {status}</p>{progress}{description}</div><div class="report-checklist"><h4>Tareas Completadas</h4><ul>{tasks}</ul></div></div>"#,
        kind = escape(&service_type_label(&service.service_type)),
        date = escape(&format_date(&service.date)),
        cost = format_amount(service.cost),
        status = escape(service.status.label()),
    )
}

pub fn render_notices(notices: &[Notice]) -> String {
    notices
        .iter()
        .map(|notice| {
            let class = match notice.kind {
                NoticeKind::Loading => "loading-message",
                NoticeKind::Error => "error-message",
                NoticeKind::Success => "success-message",
            };
            format!(
                r#"<div class="{class}" data-notice="{}"><p>{}</p></div>"#,
                notice.id,
                escape(&notice.message)
            )
        })
        .collect()
}

fn render_nav(user: Option<&User>) -> String {
    match user {
        Some(user) => format!(
            r#"<span class="nav-user">{}</span><a href="/?modal=client" class="btn-login">Mi Cuenta</a><form method="post" action="/logout"><button type="submit" class="btn-register">Cerrar Sesión</button></form>"#,
            escape(&user.display_name())
        ),
        None => r#"<a href="/?modal=login" class="btn-login">Iniciar Sesión</a><a href="/?modal=register" class="btn-register">Registrarse</a>"#
            .to_string(),
    }
}

fn render_catalog() -> String {
    SERVICE_TYPES
        .iter()
        .map(|(key, label)| {
            format!(
                r#"<div class="catalog-card"><h3>{label}</h3><a href="/?modal=booking&amp;type={key}" class="btn btn-primary">Agendar</a></div>"#
            )
        })
        .collect()
}

fn modal_shell(id: &str, body: &str) -> String {
    format!(
        r#"<div class="modal" id="{id}"><a class="modal-backdrop" href="/?modal=none" aria-label="Cerrar"></a><div class="modal-content"><a class="close" href="/?modal=none">&times;</a>{body}</div></div>"#
    )
}

fn login_form() -> String {
    r#"<h2>Iniciar Sesión</h2><form method="post" action="/login"><input name="username" placeholder="Usuario" required><input name="password" type="password" placeholder="Contraseña" required><button type="submit" class="btn btn-primary">Entrar</button></form><p>¿No tienes cuenta? <a href="/?modal=register">Registrarse</a></p>"#
        .to_string()
}

fn register_form() -> String {
    r#"<h2>Crear Cuenta</h2><form method="post" action="/register" enctype="multipart/form-data"><input name="username" placeholder="Usuario" required><input name="email" type="email" placeholder="Email" required><input name="password" type="password" placeholder="Contraseña" required><input name="first_name" placeholder="Nombre" required><input name="last_name" placeholder="Apellido" required><input name="telefono" placeholder="Teléfono"><input name="direccion" placeholder="Dirección"><input name="profilePhoto" type="file" accept="image/*"><button type="submit" class="btn btn-primary">Registrarse</button></form><p>¿Ya tienes cuenta? <a href="/?modal=login">Iniciar Sesión</a></p>"#
        .to_string()
}

fn booking_form(service_type: Option<&str>, user: Option<&User>, today: NaiveDate) -> String {
    let min_date = today.succ_opt().unwrap_or(today);
    let options: String = SERVICE_TYPES
        .iter()
        .map(|(key, label)| {
            let selected = if Some(*key) == service_type { " selected" } else { "" };
            format!(r#"<option value="{key}"{selected}>{label}</option>"#)
        })
        .collect();
    let name = user.map(User::display_name).unwrap_or_default();
    let email = user.map(|user| user.email.clone()).unwrap_or_default();
    let phone = user.and_then(|user| user.telefono.clone()).unwrap_or_default();

    format!(
        r#"<h2>Agendar Servicio</h2><form method="post" action="/book"><select name="tipo_servicio" required>{options}</select><input name="fecha" type="date" min="{min_date}" required><input name="hora" type="time" required><input name="direccion" placeholder="Dirección" required><input name="area_metros" type="number" min="1" placeholder="Área (m²)" required><input name="numero_habitaciones" type="number" min="1" placeholder="Habitaciones" required><textarea name="notas_especiales" placeholder="Notas especiales"></textarea><input name="nombre_contacto" value="{name}" placeholder="Nombre de contacto" required><input name="telefono_contacto" value="{phone}" placeholder="Teléfono" required><input name="email_contacto" type="email" value="{email}" placeholder="Email" required><button type="submit" class="btn btn-primary">Agendar</button></form>"#,
        min_date = min_date.format("%Y-%m-%d"),
        name = escape(&name),
        phone = escape(&phone),
        email = escape(&email),
    )
}

fn client_panel(view: &PageView) -> String {
    let name = view
        .user
        .as_ref()
        .map(User::display_name)
        .unwrap_or_else(|| "Usuario".to_string());
    let photo = view
        .user
        .as_ref()
        .and_then(|user| user.foto_perfil.as_deref())
        .map(|url| format!(r#"<img id="clientPhoto" src="{}" alt="">"#, escape(url)))
        .unwrap_or_else(|| r#"<span id="clientIcon" class="client-icon">&#128100;</span>"#.to_string());

    let buttons: String = Tab::ALL
        .iter()
        .map(|tab| {
            format!(
                r#"<a href="/?modal=client&amp;tab={}" class="tab-btn{}">{}</a>"#,
                tab.name(),
                if *tab == view.tab { " active" } else { "" },
                tab.title()
            )
        })
        .collect();

    format!(
        r#"<div class="client-header">{photo}<h2 id="clientName">{name}</h2><form method="post" action="/refresh"><button type="submit" class="btn btn-secondary">Actualizar</button></form></div><div class="tabs">{buttons}</div><div class="tab-content active" id="{tab}Tab">{content}</div>"#,
        name = escape(&name),
        tab = view.tab.name(),
        content = render_tab(view.tab, &view.services),
    )
}

fn cancel_confirmation(service: Option<&Service>, id: u64) -> String {
    let what = service
        .map(|service| {
            format!(
                "{} del {}",
                service_type_label(&service.service_type),
                format_date(&service.date)
            )
        })
        .unwrap_or_else(|| format!("servicio #{id}"));
    format!(
        r#"<h2>Cancelar Servicio</h2><p>¿Está seguro de que desea cancelar este servicio? ({what})</p><form method="post" action="/services/{id}/cancel"><input type="hidden" name="confirmed" value="true"><button type="submit" class="btn btn-danger">Sí, cancelar</button></form><form method="post" action="/services/{id}/cancel"><input type="hidden" name="confirmed" value="false"><button type="submit" class="btn btn-secondary">No</button></form>"#,
        what = escape(&what),
    )
}

pub fn render_modal(view: &PageView) -> String {
    let Some(modal) = &view.modal else {
        return String::new();
    };
    let find = |id: u64| view.services.iter().find(|service| service.id == id);

    match modal {
        Modal::Login => modal_shell("loginModal", &login_form()),
        Modal::Register => modal_shell("registerModal", &register_form()),
        Modal::Booking { service_type } => modal_shell(
            "bookingModal",
            &booking_form(service_type.as_deref(), view.user.as_ref(), view.today),
        ),
        Modal::ClientPanel => modal_shell("clientModal", &client_panel(view)),
        Modal::Report(id) => match find(*id) {
            Some(service) => modal_shell("reportModal", &render_report(service)),
            None => String::new(),
        },
        Modal::ConfirmCancel(id) => {
            modal_shell("cancelModal", &cancel_confirmation(find(*id), *id))
        }
    }
}

pub fn render_page(view: &PageView) -> String {
    let status = match &view.user {
        Some(_) => format!(
            r#"<section id="estado" class="status-section"><h2>Estado de tus Servicios</h2><div id="servicesTab">{}</div></section><section id="mis-servicios" class="status-section"><h2>Mis Servicios</h2><div class="tab-content">{}</div></section>"#,
            render_services_tab(&view.services),
            render_summary(&view.services),
        ),
        None => String::new(),
    };

    INDEX_HTML
        .replace("{{NAV}}", &render_nav(view.user.as_ref()))
        .replace("{{CATALOG}}", &render_catalog())
        .replace("{{STATUS}}", &status)
        .replace("{{MODAL}}", &render_modal(view))
        .replace("{{NOTICES}}", &render_notices(&view.notices))
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Álamos J Clean</title>
  <style>
    :root {
      --ink: #1f2d3a;
      --muted: #5f6b76;
      --accent: #1e88e5;
      --accent-2: #43a047;
      --danger: #e53935;
      --card: #ffffff;
      --bg: #f3f7fa;
      --shadow: 0 12px 32px rgba(31, 45, 58, 0.12);
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Segoe UI", "Trebuchet MS", sans-serif;
    }

    nav {
      display: flex;
      align-items: center;
      justify-content: space-between;
      padding: 16px 32px;
      background: var(--card);
      box-shadow: var(--shadow);
    }

    nav .actions { display: flex; gap: 12px; align-items: center; }
    nav form { margin: 0; }

    .btn, .btn-login, .btn-register, button {
      display: inline-block;
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      font-weight: 600;
      cursor: pointer;
      text-decoration: none;
      color: white;
      background: var(--accent);
    }

    .btn-secondary { background: #546e7a; }
    .btn-danger { background: var(--danger); }
    .btn-register { background: var(--accent-2); }

    main { width: min(1040px, 100%); margin: 0 auto; padding: 32px 18px 48px; display: grid; gap: 32px; }

    .hero { text-align: center; }
    .catalog { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 16px; }
    .catalog-card, .status-card, .service-card, .billing-card, .service-history-item, .payment-item {
      background: var(--card);
      border-radius: 18px;
      padding: 18px;
      box-shadow: var(--shadow);
    }

    .status-section { display: grid; gap: 16px; }
    .services-section { display: grid; gap: 12px; margin-bottom: 16px; }
    .service-header, .status-header { display: flex; justify-content: space-between; align-items: center; }
    .service-status, .status-badge { font-size: 0.85rem; padding: 4px 10px; border-radius: 999px; background: #eceff1; }
    .in-progress { color: #ef6c00; }
    .scheduled { color: var(--accent); }
    .completed { color: var(--accent-2); }
    .service-actions { display: flex; gap: 10px; flex-wrap: wrap; }
    .service-actions form { margin: 0; }

    .progress-bar, .progress-bar-large { width: 100%; height: 10px; border-radius: 999px; background: #eceff1; overflow: hidden; }
    .progress-bar-large { height: 16px; }
    .progress { height: 100%; background: var(--accent-2); }

    .checklist-item { display: flex; gap: 12px; padding: 8px 0; }
    .checklist-item.completed .task-name { text-decoration: line-through; color: var(--muted); }
    .task-info { display: flex; flex-direction: column; }
    .task-time { font-size: 0.8rem; color: var(--muted); }

    .billing-item, .payment-item { display: flex; justify-content: space-between; gap: 12px; }
    .amount.pending { color: #ef6c00; }

    .modal { position: fixed; inset: 0; display: grid; place-items: center; z-index: 10; }
    .modal-backdrop { position: absolute; inset: 0; background: rgba(0, 0, 0, 0.45); }
    .modal-content {
      position: relative;
      width: min(720px, 94vw);
      max-height: 90vh;
      overflow: auto;
      background: var(--card);
      border-radius: 22px;
      padding: 28px;
    }
    .modal-content form { display: grid; gap: 10px; }
    .modal-content input, .modal-content select, .modal-content textarea { padding: 10px; border-radius: 10px; border: 1px solid #cfd8dc; }
    .close { position: absolute; top: 12px; right: 18px; font-size: 1.6rem; text-decoration: none; color: var(--muted); }
    .tabs { display: flex; gap: 8px; flex-wrap: wrap; margin: 16px 0; }
    .tab-btn { padding: 8px 14px; border-radius: 999px; background: #eceff1; color: var(--ink); text-decoration: none; }
    .tab-btn.active { background: var(--accent); color: white; }
    .client-header { display: flex; gap: 16px; align-items: center; }
    .client-header img { width: 56px; height: 56px; border-radius: 50%; object-fit: cover; }

    .notices { position: fixed; top: 20px; right: 20px; display: grid; gap: 10px; z-index: 20; }
    .loading-message, .error-message, .success-message {
      padding: 14px 18px;
      border-radius: 14px;
      color: white;
      box-shadow: var(--shadow);
      animation: slideIn 300ms ease;
    }
    .loading-message { background: #546e7a; }
    .error-message { background: var(--danger); }
    .success-message { background: var(--accent-2); }
    .loading-message p, .error-message p, .success-message p { margin: 0; }

    @keyframes slideIn {
      from { transform: translateX(40px); opacity: 0; }
      to { transform: translateX(0); opacity: 1; }
    }

    @media (max-width: 600px) {
      nav { flex-direction: column; gap: 12px; }
    }
  </style>
</head>
<body>
  <nav>
    <a href="/" class="brand"><strong>Álamos J Clean</strong></a>
    <div class="actions">{{NAV}}</div>
  </nav>

  <main>
    <section class="hero">
      <h1>Limpieza profesional en Riohacha</h1>
      <p>Agenda, sigue y paga tus servicios de limpieza en un solo lugar.</p>
      <a href="/?modal=booking" class="btn btn-primary">Agendar Servicio</a>
    </section>

    <section id="servicios" class="catalog">{{CATALOG}}</section>

    {{STATUS}}
  </main>

  {{MODAL}}

  <div class="notices">{{NOTICES}}</div>
</body>
</html>
"#;
