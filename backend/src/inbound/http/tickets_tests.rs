//! Handler tests for ticket endpoints using a mocked ticket port.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, test as actix_test, web};
use chrono::{TimeZone, Utc};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockAccountCommand, MockTicketAccess};
use crate::domain::{
    CommentAuthor, CommentId, DisplayName, EmailAddress, Error, TicketId, UserId,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};

const TICKET_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn sample_ticket() -> Ticket {
    Ticket {
        id: TicketId::parse(TICKET_ID).expect("fixture id"),
        title: "Printer".into(),
        description: "Paper jam again".into(),
        status: TicketStatus::Open,
        owner_id: UserId::random(),
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).single().expect("valid time"),
    }
}

fn sample_comment(ticket: &Ticket) -> Comment {
    Comment {
        id: CommentId::random(),
        ticket_id: ticket.id,
        author_id: ticket.owner_id,
        body: "Still broken".into(),
        created_at: ticket.created_at,
    }
}

fn test_app(
    tickets: MockTicketAccess,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(Arc::new(MockAccountCommand::new()), Arc::new(tickets));
    App::new()
        .app_data(web::Data::new(state))
        .app_data(crate::inbound::http::json_config())
        .wrap(test_session_middleware())
        .route(
            "/test/session",
            web::post().to(|session: SessionContext| async move {
                let email = EmailAddress::parse("ada@example.com").expect("fixture email");
                session.persist_email(&email)?;
                Ok::<_, Error>(HttpResponse::Ok())
            }),
        )
        .service(
            web::scope("/api")
                .service(list_tickets)
                .service(create_ticket)
                .service(get_ticket)
                .service(update_ticket)
                .service(add_comment),
        )
}

#[rstest]
#[actix_web::test]
async fn anonymous_list_is_unauthorized() {
    let mut tickets = MockTicketAccess::new();
    tickets
        .expect_list_tickets()
        .withf(|credentials| credentials.email().is_none())
        .returning(|_| Err(Error::unauthorized("login required")));
    let app = actix_test::init_service(test_app(tickets)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/tickets").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn session_email_is_forwarded_to_the_port() {
    let mut tickets = MockTicketAccess::new();
    tickets
        .expect_list_tickets()
        .withf(|credentials| credentials.email() == Some("ada@example.com"))
        .times(1)
        .returning(|_| Ok(vec![sample_ticket()]));
    let app = actix_test::init_service(test_app(tickets)).await;

    let login = actix_test::call_service(
        &app,
        actix_test::TestRequest::post().uri("/test/session").to_request(),
    )
    .await;
    let cookie = session_cookie(&login);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/tickets")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body[0]["id"], TICKET_ID);
    assert_eq!(body[0]["status"], "OPEN");
    assert!(body[0].get("ownerId").is_some());
    assert!(body[0].get("createdAt").is_some());
}

#[rstest]
#[actix_web::test]
async fn create_ticket_responds_created() {
    let mut tickets = MockTicketAccess::new();
    tickets
        .expect_create_ticket()
        .withf(|_, request| request.title == "Printer" && request.description == "Paper jam again")
        .returning(|_, _| Ok(sample_ticket()));
    let app = actix_test::init_service(test_app(tickets)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/tickets")
            .set_json(json!({ "title": "Printer", "description": "Paper jam again" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["title"], "Printer");
    assert_eq!(body["status"], "OPEN");
}

#[rstest]
#[actix_web::test]
async fn create_ticket_missing_field_is_bad_request() {
    let mut tickets = MockTicketAccess::new();
    tickets.expect_authenticate().times(1).returning(|_| Ok(()));
    tickets.expect_create_ticket().times(0);
    let app = actix_test::init_service(test_app(tickets)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/tickets")
            .set_json(json!({ "title": "Printer" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], "invalid JSON body");
}

#[rstest]
#[case::create("/api/tickets", json!({}))]
#[case::comment("/api/tickets/3fa85f64-5717-4562-b3fc-2c963f66afa6/comments", json!({ "body": 5 }))]
#[actix_web::test]
async fn malformed_body_from_unknown_caller_is_unauthorized(
    #[case] uri: &str,
    #[case] payload: Value,
) {
    let mut tickets = MockTicketAccess::new();
    tickets
        .expect_authenticate()
        .withf(|credentials| credentials.email().is_none())
        .times(1)
        .returning(|_| Err(Error::unauthorized("login required")));
    tickets.expect_create_ticket().times(0);
    tickets.expect_add_comment().times(0);
    let app = actix_test::init_service(test_app(tickets)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post().uri(uri).set_json(payload).to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn get_ticket_includes_comment_authors() {
    let mut tickets = MockTicketAccess::new();
    tickets
        .expect_get_ticket()
        .withf(|_, id| id == TICKET_ID)
        .returning(|_, _| {
            let ticket = sample_ticket();
            let comment = CommentWithAuthor {
                comment: sample_comment(&ticket),
                author: CommentAuthor {
                    email: EmailAddress::parse("ada@example.com").expect("email"),
                    display_name: Some(DisplayName::new("Ada").expect("name")),
                },
            };
            Ok(TicketDetail {
                ticket,
                comments: vec![comment],
            })
        });
    let app = actix_test::init_service(test_app(tickets)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/tickets/{TICKET_ID}"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["id"], TICKET_ID);
    assert_eq!(body["comments"][0]["body"], "Still broken");
    assert_eq!(
        body["comments"][0]["author"],
        json!({ "email": "ada@example.com", "name": "Ada" })
    );
}

#[rstest]
#[actix_web::test]
async fn missing_ticket_maps_to_404() {
    let mut tickets = MockTicketAccess::new();
    tickets
        .expect_get_ticket()
        .withf(|_, id| id == "not-a-uuid")
        .returning(|_, _| Err(Error::not_found("ticket not found")));
    let app = actix_test::init_service(test_app(tickets)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/tickets/not-a-uuid")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "not_found");
}

#[rstest]
#[actix_web::test]
async fn update_ticket_acknowledges() {
    let mut tickets = MockTicketAccess::new();
    tickets
        .expect_update_ticket_status()
        .withf(|_, id, status| id == TICKET_ID && status == "RESOLVED")
        .times(1)
        .returning(|_, _, _| Ok(()));
    let app = actix_test::init_service(test_app(tickets)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/tickets/{TICKET_ID}"))
            .set_json(json!({ "status": "RESOLVED" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, json!({ "ok": true }));
}

#[rstest]
#[actix_web::test]
async fn invalid_status_is_bad_request() {
    let mut tickets = MockTicketAccess::new();
    tickets
        .expect_update_ticket_status()
        .returning(|_, _, _| Err(Error::invalid_field("status", "unknown status")));
    let app = actix_test::init_service(test_app(tickets)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/tickets/{TICKET_ID}"))
            .set_json(json!({ "status": "CLOSED" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "status");
}

#[rstest]
#[actix_web::test]
async fn add_comment_responds_created() {
    let mut tickets = MockTicketAccess::new();
    tickets
        .expect_add_comment()
        .withf(|_, id, body| id == TICKET_ID && body == "Still broken")
        .returning(|_, _, _| Ok(sample_comment(&sample_ticket())));
    let app = actix_test::init_service(test_app(tickets)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/tickets/{TICKET_ID}/comments"))
            .set_json(json!({ "body": "Still broken" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["ticketId"], TICKET_ID);
    assert_eq!(body["body"], "Still broken");
}
