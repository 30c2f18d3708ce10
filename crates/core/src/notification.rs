//! Notification kinds, their typed payloads, and request validation.
//!
//! A send request is `{ userId, type, data }`. The `type` selects one
//! variant of [`NotificationPayload`], and `data` is deserialized into that
//! variant's own field set. After [`NotificationRequest::from_raw`] the rest
//! of the system never looks at untyped JSON again.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::text::lenient_text;
use crate::types::{parse_id, DbId};

/// Public message for a request missing `userId` or `type`.
pub const MSG_MISSING_FIELDS: &str = "Missing required fields";

/// Title stored when the payload does not carry `notificationTitle`.
pub const DEFAULT_TITLE: &str = "Nueva notificación";

// ---------------------------------------------------------------------------
// NotificationKind
// ---------------------------------------------------------------------------

/// The closed set of notification types accepted by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ApplicationReceived,
    ApplicationStatus,
    Message,
    VisitScheduled,
    Review,
    Custom,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 6] = [
        NotificationKind::ApplicationReceived,
        NotificationKind::ApplicationStatus,
        NotificationKind::Message,
        NotificationKind::VisitScheduled,
        NotificationKind::Review,
        NotificationKind::Custom,
    ];

    /// Wire name, also stored in `notifications.type`.
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::ApplicationReceived => "application_received",
            NotificationKind::ApplicationStatus => "application_status",
            NotificationKind::Message => "message",
            NotificationKind::VisitScheduled => "visit_scheduled",
            NotificationKind::Review => "review",
            NotificationKind::Custom => "custom",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a `type` string names no known kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown notification type: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for NotificationKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NotificationKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Payload fields
// ---------------------------------------------------------------------------

/// Fields every payload may carry, independent of its kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonFields {
    #[serde(default, deserialize_with = "lenient_text")]
    pub notification_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub notification_message: Option<String>,
    /// Free-form body text; fallback for the in-app message and the body of
    /// custom emails.
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub action_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub related_id: Option<String>,
}

impl CommonFields {
    /// Title for the in-app notification row.
    pub fn title(&self) -> &str {
        self.notification_title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    /// Message for the in-app notification row.
    pub fn body(&self) -> &str {
        self.notification_message
            .as_deref()
            .or(self.message.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationReceived {
    #[serde(default, deserialize_with = "lenient_text")]
    pub application_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub listing_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub student_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub move_in_date: Option<String>,
    #[serde(flatten)]
    pub common: CommonFields,
}

/// Outcome named by an `application_status` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Approved,
    Rejected,
    Updated,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStatusChanged {
    #[serde(default, deserialize_with = "lenient_text")]
    pub application_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub listing_title: Option<String>,
    #[serde(flatten)]
    pub common: CommonFields,
}

impl ApplicationStatusChanged {
    pub fn change(&self) -> StatusChange {
        match self.status.as_deref() {
            Some("approved") => StatusChange::Approved,
            Some("rejected") => StatusChange::Rejected,
            _ => StatusChange::Updated,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    #[serde(default, deserialize_with = "lenient_text")]
    pub conversation_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sender_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub preview: Option<String>,
    #[serde(flatten)]
    pub common: CommonFields,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitScheduled {
    #[serde(default, deserialize_with = "lenient_text")]
    pub application_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub listing_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub address: Option<String>,
    #[serde(flatten)]
    pub common: CommonFields,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPosted {
    #[serde(default, deserialize_with = "lenient_text")]
    pub review_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub listing_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub rating: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub comment: Option<String>,
    #[serde(flatten)]
    pub common: CommonFields,
}

/// Free-form notice. The body text lives in [`CommonFields::message`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomNotice {
    #[serde(default, deserialize_with = "lenient_text")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub action_text: Option<String>,
    #[serde(flatten)]
    pub common: CommonFields,
}

// ---------------------------------------------------------------------------
// NotificationPayload
// ---------------------------------------------------------------------------

/// A notification payload, one variant per [`NotificationKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationPayload {
    ApplicationReceived(ApplicationReceived),
    ApplicationStatus(ApplicationStatusChanged),
    Message(NewMessage),
    VisitScheduled(VisitScheduled),
    Review(ReviewPosted),
    Custom(CustomNotice),
}

/// The relationship row that can justify a notification between two users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipRef {
    /// An application; `None` when the payload names no usable id.
    Application(Option<DbId>),
    Conversation(Option<DbId>),
    Review(Option<DbId>),
    /// The kind has no relationship table.
    Unrelated,
}

impl NotificationPayload {
    /// Deserialize `data` into the field set of `kind`.
    ///
    /// `data` must be a JSON object or `null` (treated as `{}`).
    pub fn from_data(kind: NotificationKind, data: Value) -> Result<Self, serde_json::Error> {
        let data = match data {
            Value::Null => Value::Object(serde_json::Map::new()),
            other => other,
        };
        Ok(match kind {
            NotificationKind::ApplicationReceived => {
                Self::ApplicationReceived(serde_json::from_value(data)?)
            }
            NotificationKind::ApplicationStatus => {
                Self::ApplicationStatus(serde_json::from_value(data)?)
            }
            NotificationKind::Message => Self::Message(serde_json::from_value(data)?),
            NotificationKind::VisitScheduled => Self::VisitScheduled(serde_json::from_value(data)?),
            NotificationKind::Review => Self::Review(serde_json::from_value(data)?),
            NotificationKind::Custom => Self::Custom(serde_json::from_value(data)?),
        })
    }

    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::ApplicationReceived(_) => NotificationKind::ApplicationReceived,
            Self::ApplicationStatus(_) => NotificationKind::ApplicationStatus,
            Self::Message(_) => NotificationKind::Message,
            Self::VisitScheduled(_) => NotificationKind::VisitScheduled,
            Self::Review(_) => NotificationKind::Review,
            Self::Custom(_) => NotificationKind::Custom,
        }
    }

    pub fn common(&self) -> &CommonFields {
        match self {
            Self::ApplicationReceived(p) => &p.common,
            Self::ApplicationStatus(p) => &p.common,
            Self::Message(p) => &p.common,
            Self::VisitScheduled(p) => &p.common,
            Self::Review(p) => &p.common,
            Self::Custom(p) => &p.common,
        }
    }

    /// The relationship row the authorizer must consult for this payload.
    ///
    /// Application and review ids fall back to `relatedId`. The fallback
    /// only applies when the primary key is absent: a malformed
    /// `applicationId` is not rescued by a valid `relatedId`.
    pub fn relationship(&self) -> RelationshipRef {
        let related = self.common().related_id.as_deref();
        match self {
            Self::ApplicationReceived(p) => RelationshipRef::Application(parse_id(
                p.application_id.as_deref().or(related),
            )),
            Self::ApplicationStatus(p) => RelationshipRef::Application(parse_id(
                p.application_id.as_deref().or(related),
            )),
            Self::VisitScheduled(p) => RelationshipRef::Application(parse_id(
                p.application_id.as_deref().or(related),
            )),
            Self::Message(p) => {
                RelationshipRef::Conversation(parse_id(p.conversation_id.as_deref()))
            }
            Self::Review(p) => {
                RelationshipRef::Review(parse_id(p.review_id.as_deref().or(related)))
            }
            Self::Custom(_) => RelationshipRef::Unrelated,
        }
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// The request body exactly as it arrives on the wire.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNotificationRequest {
    #[serde(default, deserialize_with = "lenient_text")]
    pub user_id: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_text")]
    pub kind: Option<String>,
    #[serde(default)]
    pub data: Value,
}

/// A validated send request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub target: DbId,
    pub payload: NotificationPayload,
}

impl NotificationRequest {
    /// Validate a raw body. Fails with [`CoreError::Validation`] only; no
    /// store is consulted.
    pub fn from_raw(raw: RawNotificationRequest) -> Result<Self, CoreError> {
        let (Some(user_id), Some(kind)) = (raw.user_id, raw.kind) else {
            return Err(CoreError::Validation(MSG_MISSING_FIELDS.into()));
        };

        let target = parse_id(Some(&user_id))
            .ok_or_else(|| CoreError::Validation("Invalid userId".into()))?;

        let kind: NotificationKind = kind
            .parse()
            .map_err(|_| CoreError::Validation("Invalid notification type".into()))?;

        if !(raw.data.is_object() || raw.data.is_null()) {
            return Err(CoreError::Validation("Invalid notification data".into()));
        }

        let payload = NotificationPayload::from_data(kind, raw.data)
            .map_err(|e| CoreError::Validation(format!("Invalid notification data: {e}")))?;

        Ok(Self { target, payload })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;
    use uuid::Uuid;

    fn raw(value: Value) -> RawNotificationRequest {
        serde_json::from_value(value).expect("raw body should deserialize")
    }

    #[test]
    fn kind_round_trips_through_wire_name() {
        for kind in NotificationKind::ALL {
            assert_eq!(kind.as_str().parse::<NotificationKind>(), Ok(kind));
        }
        assert!("broadcast".parse::<NotificationKind>().is_err());
    }

    #[test]
    fn missing_user_id_or_type_is_rejected() {
        let err = NotificationRequest::from_raw(raw(json!({ "type": "message", "data": {} })))
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == MSG_MISSING_FIELDS);

        let err = NotificationRequest::from_raw(raw(json!({ "userId": Uuid::new_v4() })))
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == MSG_MISSING_FIELDS);

        let err =
            NotificationRequest::from_raw(raw(json!({ "userId": "", "type": "message" })))
                .unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == MSG_MISSING_FIELDS);
    }

    #[test]
    fn unknown_type_and_bad_user_id_are_rejected() {
        let err = NotificationRequest::from_raw(raw(
            json!({ "userId": Uuid::new_v4(), "type": "broadcast", "data": {} }),
        ))
        .unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == "Invalid notification type");

        let err = NotificationRequest::from_raw(raw(
            json!({ "userId": "user-1", "type": "message", "data": {} }),
        ))
        .unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == "Invalid userId");
    }

    #[test]
    fn data_must_be_an_object() {
        let err = NotificationRequest::from_raw(raw(
            json!({ "userId": Uuid::new_v4(), "type": "message", "data": [1, 2] }),
        ))
        .unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn missing_data_is_an_empty_payload() {
        let target = Uuid::new_v4();
        let request =
            NotificationRequest::from_raw(raw(json!({ "userId": target, "type": "custom" })))
                .unwrap();
        assert_eq!(request.target, target);
        assert_eq!(
            request.payload,
            NotificationPayload::Custom(CustomNotice::default())
        );
    }

    #[test]
    fn application_status_payload_is_typed() {
        let application = Uuid::new_v4();
        let request = NotificationRequest::from_raw(raw(json!({
            "userId": Uuid::new_v4(),
            "type": "application_status",
            "data": {
                "applicationId": application,
                "status": "approved",
                "listingTitle": "Room X",
                "actionUrl": "/x",
                "notificationTitle": "Solicitud aprobada"
            }
        })))
        .unwrap();

        assert_eq!(request.payload.kind(), NotificationKind::ApplicationStatus);
        assert_eq!(
            request.payload.relationship(),
            RelationshipRef::Application(Some(application))
        );
        let NotificationPayload::ApplicationStatus(status) = &request.payload else {
            panic!("expected application_status payload");
        };
        assert_eq!(status.change(), StatusChange::Approved);
        assert_eq!(status.listing_title.as_deref(), Some("Room X"));
        assert_eq!(status.common.action_url.as_deref(), Some("/x"));
        assert_eq!(status.common.title(), "Solicitud aprobada");
    }

    #[test]
    fn application_id_falls_back_to_related_id() {
        let related = Uuid::new_v4();
        let payload = NotificationPayload::from_data(
            NotificationKind::VisitScheduled,
            json!({ "relatedId": related }),
        )
        .unwrap();
        assert_eq!(
            payload.relationship(),
            RelationshipRef::Application(Some(related))
        );

        let payload = NotificationPayload::from_data(
            NotificationKind::ApplicationReceived,
            json!({ "applicationId": "A1", "relatedId": related }),
        )
        .unwrap();
        assert_eq!(payload.relationship(), RelationshipRef::Application(None));
    }

    #[test]
    fn message_ignores_related_id() {
        let payload = NotificationPayload::from_data(
            NotificationKind::Message,
            json!({ "relatedId": Uuid::new_v4() }),
        )
        .unwrap();
        assert_eq!(payload.relationship(), RelationshipRef::Conversation(None));
    }

    #[test]
    fn review_id_falls_back_to_related_id() {
        let related = Uuid::new_v4();
        let payload = NotificationPayload::from_data(
            NotificationKind::Review,
            json!({ "relatedId": related, "rating": 5 }),
        )
        .unwrap();
        assert_eq!(payload.relationship(), RelationshipRef::Review(Some(related)));
        let NotificationPayload::Review(review) = payload else {
            panic!("expected review payload");
        };
        assert_eq!(review.rating.as_deref(), Some("5"));
    }

    #[test]
    fn custom_is_unrelated() {
        let payload =
            NotificationPayload::from_data(NotificationKind::Custom, json!({})).unwrap();
        assert_eq!(payload.relationship(), RelationshipRef::Unrelated);
    }

    #[test]
    fn in_app_text_defaults() {
        let common = CommonFields::default();
        assert_eq!(common.title(), DEFAULT_TITLE);
        assert_eq!(common.body(), "");

        let common = CommonFields {
            message: Some("fallback".into()),
            ..Default::default()
        };
        assert_eq!(common.body(), "fallback");

        let common = CommonFields {
            notification_message: Some("primary".into()),
            message: Some("fallback".into()),
            ..Default::default()
        };
        assert_eq!(common.body(), "primary");
    }
}
