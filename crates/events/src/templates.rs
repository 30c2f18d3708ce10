//! Transactional email templates.
//!
//! [`render`] is an exhaustive match over [`NotificationPayload`]: every kind
//! has exactly one template and each template reads only its own variant's
//! fields. Every interpolated value is HTML-escaped. Missing fields render
//! as empty text.

use livix_core::notification::{
    ApplicationReceived, ApplicationStatusChanged, CustomNotice, NewMessage, NotificationPayload,
    ReviewPosted, StatusChange, VisitScheduled, DEFAULT_TITLE,
};

/// Subject and HTML fragment for one email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

const CONTAINER_OPEN: &str =
    r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">"#;
const CARD_OPEN: &str =
    r#"<div style="background: #f5f5f5; padding: 16px; border-radius: 8px; margin: 16px 0;">"#;
const HEADING_STYLE: &str = "color: #1a1a1a;";
const BUTTON_STYLE: &str = "display: inline-block; background: #000; color: #fff; \
                            padding: 12px 24px; text-decoration: none; border-radius: 6px;";

/// Render the subject and body fragment for a payload.
pub fn render(payload: &NotificationPayload) -> RenderedEmail {
    match payload {
        NotificationPayload::ApplicationReceived(p) => application_received(p),
        NotificationPayload::ApplicationStatus(p) => application_status(p),
        NotificationPayload::Message(p) => new_message(p),
        NotificationPayload::VisitScheduled(p) => visit_scheduled(p),
        NotificationPayload::Review(p) => review_posted(p),
        NotificationPayload::Custom(p) => custom(p),
    }
}

/// Wrap a rendered fragment in the full HTML document sent to recipients.
pub fn wrap_layout(fragment: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
  </head>
  <body style="margin: 0; padding: 20px; background: #f9f9f9;">
    {fragment}
    <div style="margin-top: 32px; padding-top: 16px; border-top: 1px solid #eee; color: #999; font-size: 12px;">
      <p>Este email fue enviado por Livix.</p>
      <p>Si no deseas recibir estos emails, puedes configurar tus preferencias en tu perfil.</p>
    </div>
  </body>
</html>"#
    )
}

/// Escape text for inclusion in HTML element content or a quoted attribute.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn text(value: &Option<String>) -> String {
    escape_html(value.as_deref().unwrap_or_default())
}

fn button(url: &Option<String>, label: &str, extra_style: &str) -> String {
    format!(
        r#"<a href="{}" style="{BUTTON_STYLE}{extra_style}">{label}</a>"#,
        text(url)
    )
}

fn application_received(p: &ApplicationReceived) -> RenderedEmail {
    let listing = text(&p.listing_title);
    RenderedEmail {
        subject: format!(
            "Nueva solicitud para {}",
            p.listing_title.as_deref().unwrap_or_default()
        ),
        html: format!(
            r#"{CONTAINER_OPEN}
  <h2 style="{HEADING_STYLE}">¡Nueva solicitud recibida!</h2>
  <p>Has recibido una nueva solicitud para tu anuncio:</p>
  {CARD_OPEN}
    <strong>{listing}</strong>
    <p style="margin: 8px 0 0 0; color: #666;">De: {student}</p>
    <p style="margin: 4px 0 0 0; color: #666;">Entrada: {move_in}</p>
  </div>
  {button}
</div>"#,
            student = text(&p.student_name),
            move_in = text(&p.move_in_date),
            button = button(&p.common.action_url, "Ver solicitud", ""),
        ),
    }
}

fn application_status(p: &ApplicationStatusChanged) -> RenderedEmail {
    let change = p.change();
    let subject = match change {
        StatusChange::Approved => "Tu solicitud ha sido aprobada",
        StatusChange::Rejected | StatusChange::Updated => "Tu solicitud ha sido actualizada",
    };
    let (verdict, follow_up) = match change {
        StatusChange::Approved => (
            "✅ aprobada",
            "<p>¡Enhorabuena! El siguiente paso es coordinar los detalles con el propietario.</p>",
        ),
        StatusChange::Rejected => (
            "❌ rechazada",
            "<p>No te desanimes, hay muchas más opciones disponibles en Livix.</p>",
        ),
        StatusChange::Updated => ("actualizada", ""),
    };

    RenderedEmail {
        subject: subject.to_string(),
        html: format!(
            r#"{CONTAINER_OPEN}
  <h2 style="{HEADING_STYLE}">Actualización de tu solicitud</h2>
  <p>Tu solicitud para <strong>{listing}</strong> ha sido {verdict}.</p>
  {follow_up}
  {button}
</div>"#,
            listing = text(&p.listing_title),
            button = button(&p.common.action_url, "Ver detalles", " margin-top: 16px;"),
        ),
    }
}

fn new_message(p: &NewMessage) -> RenderedEmail {
    let sender = text(&p.sender_name);
    RenderedEmail {
        subject: format!(
            "Nuevo mensaje de {}",
            p.sender_name.as_deref().unwrap_or_default()
        ),
        html: format!(
            r#"{CONTAINER_OPEN}
  <h2 style="{HEADING_STYLE}">Tienes un nuevo mensaje</h2>
  {CARD_OPEN}
    <p style="margin: 0;"><strong>{sender}</strong></p>
    <p style="margin: 8px 0 0 0; color: #666;">{preview}</p>
  </div>
  {button}
</div>"#,
            preview = text(&p.preview),
            button = button(&p.common.action_url, "Responder", ""),
        ),
    }
}

fn visit_scheduled(p: &VisitScheduled) -> RenderedEmail {
    RenderedEmail {
        subject: format!(
            "Visita programada: {}",
            p.listing_title.as_deref().unwrap_or_default()
        ),
        html: format!(
            r#"{CONTAINER_OPEN}
  <h2 style="{HEADING_STYLE}">Visita confirmada</h2>
  <p>Se ha programado una visita para:</p>
  {CARD_OPEN}
    <strong>{listing}</strong>
    <p style="margin: 8px 0 0 0;">📅 {date}</p>
    <p style="margin: 4px 0 0 0;">🕐 {time}</p>
    <p style="margin: 4px 0 0 0;">📍 {address}</p>
  </div>
  {button}
</div>"#,
            listing = text(&p.listing_title),
            date = text(&p.date),
            time = text(&p.time),
            address = text(&p.address),
            button = button(&p.common.action_url, "Ver detalles", ""),
        ),
    }
}

fn review_posted(p: &ReviewPosted) -> RenderedEmail {
    RenderedEmail {
        subject: format!(
            "Nueva reseña para {}",
            p.listing_title.as_deref().unwrap_or_default()
        ),
        html: format!(
            r#"{CONTAINER_OPEN}
  <h2 style="{HEADING_STYLE}">Has recibido una reseña</h2>
  {CARD_OPEN}
    <strong>{listing}</strong>
    <p style="margin: 8px 0 0 0;">⭐ {rating}/5</p>
    <p style="margin: 8px 0 0 0; color: #666;">"{comment}"</p>
  </div>
  {button}
</div>"#,
            listing = text(&p.listing_title),
            rating = text(&p.rating),
            comment = text(&p.comment),
            button = button(&p.common.action_url, "Responder", ""),
        ),
    }
}

fn custom(p: &CustomNotice) -> RenderedEmail {
    let subject = p
        .subject
        .as_deref()
        .or(p.title.as_deref())
        .unwrap_or(DEFAULT_TITLE)
        .to_string();
    let action = match &p.common.action_url {
        Some(_) => button(
            &p.common.action_url,
            &escape_html(p.action_text.as_deref().unwrap_or("Ver más")),
            " margin-top: 16px;",
        ),
        None => String::new(),
    };

    RenderedEmail {
        subject,
        html: format!(
            r#"{CONTAINER_OPEN}
  <h2 style="{HEADING_STYLE}">{title}</h2>
  <p>{message}</p>
  {action}
</div>"#,
            title = text(&p.title),
            message = text(&p.common.message),
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
