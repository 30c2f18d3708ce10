//! Integration tests for `POST /api/v1/send-notification`.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, build_test_app_with_identity, post_send, send_as, token_for,
    MemoryStore, RecordingGateway, UnreachableIdentity,
};
use livix_core::notification::NotificationKind;
use livix_core::ports::{ApplicationParties, ConversationParticipants, ReviewParties};
use serde_json::json;
use uuid::Uuid;

struct Parties {
    landlord: Uuid,
    student: Uuid,
    application: Uuid,
}

fn application_store() -> (MemoryStore, Parties) {
    let parties = Parties {
        landlord: Uuid::new_v4(),
        student: Uuid::new_v4(),
        application: Uuid::new_v4(),
    };
    let mut store = MemoryStore::default()
        .with_profile(parties.landlord, "landlord@livix.app")
        .with_profile(parties.student, "student@livix.app");
    store.applications.insert(
        parties.application,
        ApplicationParties {
            landlord_id: parties.landlord,
            student_id: parties.student,
        },
    );
    (store, parties)
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_authorization_header_is_401_before_any_store_call() {
    let store = Arc::new(MemoryStore::default());
    let app = build_test_app(store.clone(), None);

    let response = post_send(
        app,
        None,
        &json!({ "userId": Uuid::new_v4(), "type": "custom" }).to_string(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"], "Unauthorized");
    assert_eq!(store.call_count(), 0);
}

#[tokio::test]
async fn malformed_or_rejected_token_is_invalid_token() {
    for header in ["Basic abc", "Bearer ", "Bearer not-a-jwt"] {
        let store = Arc::new(MemoryStore::default());
        let app = build_test_app(store.clone(), None);

        let response = post_send(app, Some(header), "{}").await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{header}");
        let json = body_json(response).await;
        assert_eq!(json["error"], "Invalid token");
        assert_eq!(json["code"], "UNAUTHORIZED");
        assert_eq!(store.call_count(), 0);
    }
}

#[tokio::test]
async fn identity_provider_outage_is_invalid_token() {
    let store = Arc::new(MemoryStore::default());
    let caller = Uuid::new_v4();
    let app = build_test_app_with_identity(store.clone(), None, Arc::new(UnreachableIdentity));

    let response = post_send(
        app,
        Some(&format!("Bearer {}", token_for(caller))),
        &json!({ "userId": caller, "type": "custom" }).to_string(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid token");
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(store.call_count(), 0);
}

// ---------------------------------------------------------------------------
// Body validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_user_id_or_type_is_400_before_any_store_call() {
    let caller = Uuid::new_v4();
    for body in [
        json!({ "type": "custom" }),
        json!({ "userId": caller }),
        json!({ "userId": "", "type": "custom" }),
        json!({}),
    ] {
        let store = Arc::new(MemoryStore::default());
        let app = build_test_app(store.clone(), None);

        let response = send_as(app, caller, body.clone()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(body_json(response).await["error"], "Missing required fields");
        assert_eq!(store.call_count(), 0);
    }
}

#[tokio::test]
async fn malformed_input_is_400() {
    let caller = Uuid::new_v4();
    let cases = [
        (json!({ "userId": "abc", "type": "custom" }), "Invalid userId"),
        (
            json!({ "userId": caller, "type": "broadcast" }),
            "Invalid notification type",
        ),
    ];
    for (body, message) in cases {
        let store = Arc::new(MemoryStore::default());
        let app = build_test_app(store.clone(), None);

        let response = send_as(app, caller, body).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], message);
        assert_eq!(store.call_count(), 0);
    }
}

#[tokio::test]
async fn non_json_body_is_400() {
    let caller = Uuid::new_v4();
    let store = Arc::new(MemoryStore::default());
    let app = build_test_app(store.clone(), None);
    let auth = format!("Bearer {}", common::token_for(caller));

    let response = post_send(app, Some(&auth), "userId=1").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid request body");
    assert_eq!(store.call_count(), 0);
}

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

#[tokio::test]
async fn landlord_approves_student_application() {
    let (store, p) = application_store();
    let store = Arc::new(store);
    let gateway = Arc::new(RecordingGateway::default());
    let app = build_test_app(store.clone(), Some(gateway.clone()));

    let response = send_as(
        app,
        p.landlord,
        json!({
            "userId": p.student,
            "type": "application_status",
            "data": {
                "applicationId": p.application,
                "status": "approved",
                "listingTitle": "Room X",
                "actionUrl": "/x"
            }
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "success": true }));

    let rows = store.inserted();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].user_id, p.student);
    assert_eq!(rows[0].kind, NotificationKind::ApplicationStatus);
    assert_eq!(rows[0].link.as_deref(), Some("/x"));

    let sent = gateway.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "student@livix.app");
    assert_eq!(sent[0].subject, "Tu solicitud ha sido aprobada");
    assert!(sent[0].html.contains("Room X"));
}

#[tokio::test]
async fn application_notifications_flow_both_ways() {
    let (store, p) = application_store();
    let store = Arc::new(store);
    let app = build_test_app(store.clone(), None);

    let response = send_as(
        app,
        p.student,
        json!({
            "userId": p.landlord,
            "type": "visit_scheduled",
            "data": { "relatedId": p.application, "date": "2026-11-02" }
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(store.inserted().len(), 1);
}

#[tokio::test]
async fn outsider_to_conversation_is_forbidden_and_nothing_is_sent() {
    let (x, y, z, conversation) = (
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
        Uuid::new_v4(),
    );
    let mut store = MemoryStore::default().with_profile(y, "y@livix.app");
    store.conversations.insert(
        conversation,
        ConversationParticipants {
            participant_1_id: y,
            participant_2_id: z,
        },
    );
    let store = Arc::new(store);
    let gateway = Arc::new(RecordingGateway::default());
    let app = build_test_app(store.clone(), Some(gateway.clone()));

    let response = send_as(
        app,
        x,
        json!({
            "userId": y,
            "type": "message",
            "data": { "conversationId": conversation }
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Not authorized to send this notification");
    assert_eq!(json["code"], "FORBIDDEN");
    assert!(store.inserted().is_empty());
    assert!(gateway.sent().is_empty());
}

#[tokio::test]
async fn review_subject_cannot_notify_author() {
    let (student, landlord, review) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let mut store = MemoryStore::default()
        .with_profile(student, "student@livix.app")
        .with_profile(landlord, "landlord@livix.app");
    store.reviews.insert(
        review,
        ReviewParties {
            student_id: student,
            landlord_id: landlord,
        },
    );
    let store = Arc::new(store);

    let forward = send_as(
        build_test_app(store.clone(), None),
        student,
        json!({ "userId": landlord, "type": "review", "data": { "reviewId": review } }),
    )
    .await;
    assert_eq!(forward.status(), StatusCode::OK);

    let reverse = send_as(
        build_test_app(store.clone(), None),
        landlord,
        json!({ "userId": student, "type": "review", "data": { "reviewId": review } }),
    )
    .await;
    assert_eq!(reverse.status(), StatusCode::FORBIDDEN);

    assert_eq!(store.inserted().len(), 1);
}

#[tokio::test]
async fn custom_is_limited_to_self_and_admins() {
    let (user, other, admin) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let mut store = MemoryStore::default().with_profile(other, "other@livix.app");
    store.admins.insert(admin);
    let store = Arc::new(store);
    let body = json!({
        "userId": other,
        "type": "custom",
        "data": { "subject": "Aviso", "message": "Hola" }
    });

    let denied = send_as(build_test_app(store.clone(), None), user, body.clone()).await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let allowed = send_as(build_test_app(store.clone(), None), admin, body).await;
    assert_eq!(allowed.status(), StatusCode::OK);

    let rows = store.inserted();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].message, "Hola");
}

#[tokio::test]
async fn self_notification_needs_no_relationship() {
    let user = Uuid::new_v4();
    let store = Arc::new(MemoryStore::default().with_profile(user, "me@livix.app"));
    let app = build_test_app(store.clone(), None);

    let response = send_as(
        app,
        user,
        json!({ "userId": user, "type": "custom", "data": { "notificationTitle": "Recordatorio" } }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(store.inserted()[0].title, "Recordatorio");
}

#[tokio::test]
async fn relationship_store_outage_is_500_not_403() {
    let (store, p) = application_store();
    store.relationships_down.store(true, Ordering::SeqCst);
    let store = Arc::new(store);
    let app = build_test_app(store.clone(), None);

    let response = send_as(
        app,
        p.landlord,
        json!({
            "userId": p.student,
            "type": "application_received",
            "data": { "applicationId": p.application }
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Failed to send notification");
    assert!(store.inserted().is_empty());
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn email_failure_still_persists_and_succeeds() {
    let (store, p) = application_store();
    let store = Arc::new(store);
    let gateway = Arc::new(RecordingGateway::failing());
    let app = build_test_app(store.clone(), Some(gateway.clone()));

    let response = send_as(
        app,
        p.student,
        json!({
            "userId": p.landlord,
            "type": "application_received",
            "data": { "applicationId": p.application, "studentName": "Ana" }
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "success": true }));
    assert_eq!(store.inserted().len(), 1);
    assert_eq!(gateway.sent().len(), 1);
}

#[tokio::test]
async fn target_without_profile_is_404() {
    let caller = Uuid::new_v4();
    let store = Arc::new(MemoryStore::default());
    let app = build_test_app(store.clone(), None);

    // Self-notification skips relationship lookups; the profile is still missing.
    let response = send_as(app, caller, json!({ "userId": caller, "type": "custom" })).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "User not found");
    assert!(store.inserted().is_empty());
}

#[tokio::test]
async fn insert_failure_is_500() {
    let user = Uuid::new_v4();
    let store = MemoryStore::default().with_profile(user, "me@livix.app");
    store.insert_fails.store(true, Ordering::SeqCst);
    let store = Arc::new(store);
    let gateway = Arc::new(RecordingGateway::default());
    let app = build_test_app(store, Some(gateway.clone()));

    let response = send_as(app, user, json!({ "userId": user, "type": "custom" })).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "INTERNAL_ERROR");
    assert!(gateway.sent().is_empty());
}
