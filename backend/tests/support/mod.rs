//! Shared helpers for end-to-end HTTP tests over the in-memory store.

use std::sync::Arc;
use std::time::Duration;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test as actix_test, web};
use mockable::{Clock, DefaultClock};
use serde_json::{Value, json};
use ticketdesk::domain::ports::FixturePasswordHasher;
use ticketdesk::inbound::http::health::HealthState;
use ticketdesk::inbound::http::session_config::SessionSettings;
use ticketdesk::outbound::memory::InMemoryStore;
use ticketdesk::server::{AppDependencies, Storage, build_http_state};

/// Dependencies for an app backed by a fresh in-memory store.
pub fn memory_app_deps() -> AppDependencies {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let storage = Storage::Memory(InMemoryStore::new(clock.clone()));
    AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(build_http_state(
            &storage,
            &clock,
            Arc::new(FixturePasswordHasher),
        )),
        session: SessionSettings {
            key: Key::generate(),
            cookie_secure: false,
            same_site: SameSite::Lax,
            ttl: Duration::from_secs(3600),
        },
    }
}

/// Status and parsed JSON body of a response.
pub struct Reply {
    pub status: u16,
    pub trace_id: Option<String>,
    pub body: Value,
}

async fn into_reply(res: ServiceResponse<BoxBody>) -> Reply {
    let status = res.status().as_u16();
    let trace_id = res
        .headers()
        .get("trace-id")
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned);
    let bytes = actix_test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    Reply {
        status,
        trace_id,
        body,
    }
}

/// Send a request, optionally with a session cookie and JSON body.
pub async fn send<S>(
    app: &S,
    method: &str,
    uri: &str,
    cookie: Option<&Cookie<'static>>,
    body: Option<Value>,
) -> Reply
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let mut req = match method {
        "GET" => actix_test::TestRequest::get(),
        "POST" => actix_test::TestRequest::post(),
        "PATCH" => actix_test::TestRequest::patch(),
        other => panic!("unsupported method {other}"),
    }
    .uri(uri);
    if let Some(cookie) = cookie {
        req = req.cookie(cookie.clone());
    }
    if let Some(body) = body {
        req = req.set_json(body);
    }
    into_reply(actix_test::call_service(app, req.to_request()).await).await
}

/// Register an account and return a session cookie for it.
pub async fn sign_up<S>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let registered = send(
        app,
        "POST",
        "/api/register",
        None,
        Some(json!({ "name": "Tester", "email": email, "password": "hunter22" })),
    )
    .await;
    assert_eq!(registered.status, 200, "register {email}: {}", registered.body);

    let req = actix_test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({ "email": email, "password": "hunter22" }))
        .to_request();
    let res = actix_test::call_service(app, req).await;
    assert_eq!(res.status().as_u16(), 200, "login {email}");
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

/// Create a ticket and return its id.
pub async fn open_ticket<S>(app: &S, cookie: &Cookie<'static>, title: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let created = send(
        app,
        "POST",
        "/api/tickets",
        Some(cookie),
        Some(json!({ "title": title, "description": "Something is broken" })),
    )
    .await;
    assert_eq!(created.status, 201, "create ticket: {}", created.body);
    created.body["id"]
        .as_str()
        .map(ToOwned::to_owned)
        .expect("ticket id")
}
