// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use lms_console_api::{ApiError, Client, Token};
use lms_console_app::{
    ActiveFilter, CourseId, CreateAdminPayload, CriterionKind, FilterSet, FilterUpdate,
    UserId, UserRole,
};
use lms_console_testkit::Catalog;
use std::io::Read;
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Request, Response, Server};

fn mock_server() -> Result<(Server, String)> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/api", server.server_addr());
    Ok((server, addr))
}

fn respond_json(request: Request, status: u16, body: &str) {
    let response = Response::from_string(body)
        .with_status_code(status)
        .with_header(
            Header::from_bytes("Content-Type", "application/json")
                .expect("valid content type header"),
        );
    request.respond(response).expect("response should succeed");
}

fn authorization(request: &Request) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|header| header.field.equiv("Authorization"))
        .map(|header| header.value.as_str().to_owned())
}

fn token() -> Token {
    Token::new("test-token").expect("non-empty token")
}

#[test]
fn unreachable_server_names_the_base_url() {
    let client = Client::new("http://127.0.0.1:1/api", Duration::from_millis(50))
        .expect("client should initialize");

    let error = client
        .dashboard_stats(&token())
        .expect_err("dashboard should fail for unreachable endpoint");
    assert!(matches!(error, ApiError::Unreachable { .. }));
    assert!(error.to_string().contains("http://127.0.0.1:1/api"));
}

#[test]
fn dashboard_stats_sends_bearer_token() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/admin/dashboard");
        assert_eq!(authorization(&request).as_deref(), Some("Bearer test-token"));
        respond_json(
            request,
            200,
            r#"{"success":true,"stats":{"totalStudents":120,"totalInstructors":8,"totalCourses":40,"totalEnrollments":300}}"#,
        );
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let stats = client.dashboard_stats(&token())?;
    assert_eq!(stats.total_students, 120);
    assert_eq!(stats.average_enrollments_per_course(), Some(7.5));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn list_users_encodes_only_set_filters() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(
            request.url(),
            "/api/admin/users?page=1&limit=10&search=ada&role=Instructor&isActive=false"
        );
        respond_json(
            request,
            200,
            r#"{"data":[{"_id":"u1","name":"Ada","email":"ada@campus.edu","role":"Instructor","isActive":false,"createdAt":"2026-01-05T10:00:00.000Z"}],
                "pagination":{"currentPage":1,"totalPages":1,"hasNextPage":false,"hasPreviousPage":false}}"#,
        );
    });

    let mut filters = FilterSet::new(CriterionKind::Role, 10);
    filters.apply(FilterUpdate::Search("ada".to_owned()));
    filters.apply(FilterUpdate::Criterion("Instructor".to_owned()));
    filters.apply(FilterUpdate::Status(ActiveFilter::Inactive));

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let page = client.list_users(&token(), &filters)?;
    assert_eq!(page.records.len(), 1);
    assert_eq!(page.records[0].role, UserRole::Instructor);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn list_courses_decodes_a_catalog_page() -> Result<()> {
    let (server, addr) = mock_server()?;
    let catalog = Catalog::seeded(11, 4, 2, 25);
    let mut filters = FilterSet::new(CriterionKind::Category, 10);
    filters.apply(FilterUpdate::Page(2));
    let expected = catalog.list_courses(&filters);
    let body = serde_json::to_string(&expected)?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/admin/courses?page=2&limit=10");
        respond_json(request, 200, &body);
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let page = client.list_courses(&token(), &filters)?;
    assert_eq!(page, expected);
    assert!(page.pagination.has_previous_page);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn toggles_return_server_state_from_either_envelope() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("user toggle expected");
        assert_eq!(request.method().as_str(), "PATCH");
        assert_eq!(request.url(), "/api/admin/users/u7/toggle-status");
        respond_json(request, 200, r#"{"success":true,"data":{"isActive":false}}"#);

        let request = server.recv().expect("course toggle expected");
        assert_eq!(request.url(), "/api/admin/courses/c9/toggle-status");
        respond_json(request, 200, r#"{"isActive":true,"message":"Course activated"}"#);
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    assert!(!client.toggle_user_status(&token(), &UserId::new("u7"))?);
    assert!(client.toggle_course_status(&token(), &CourseId::new("c9"))?);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn create_admin_posts_normalized_payload() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("request expected");
        assert_eq!(request.method().as_str(), "POST");
        assert_eq!(request.url(), "/api/admin/users/create-admin");

        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .expect("read request body");
        let sent: serde_json::Value = serde_json::from_str(&body).expect("json body");
        assert_eq!(sent["name"], "Root");
        assert_eq!(sent["email"], "root@campus.edu");
        assert_eq!(sent["password"], "secret1");

        respond_json(
            request,
            201,
            r#"{"success":true,"data":{"_id":"a1","name":"Root","email":"root@campus.edu","role":"Admin","isActive":true,"createdAt":"2026-02-19T12:34:56Z"}}"#,
        );
    });

    let payload = CreateAdminPayload {
        name: " Root ".to_owned(),
        email: "Root@Campus.edu".to_owned(),
        password: "secret1".to_owned(),
    };
    let client = Client::new(&addr, Duration::from_secs(1))?;
    let admin = client.create_admin(&token(), &payload)?;
    assert_eq!(admin.role, UserRole::Admin);
    assert_eq!(admin.id, UserId::new("a1"));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn rejected_token_maps_to_unauthorized() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        respond_json(request, 401, r#"{"message":"Not authorized, token failed"}"#);
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client
        .dashboard_stats(&token())
        .expect_err("401 should fail");
    assert!(error.is_unauthorized());
    assert_eq!(error.user_message(), "Not authorized, token failed");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn server_error_message_is_surfaced() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        respond_json(request, 400, r#"{"success":false,"message":"User already exists"}"#);
    });

    let payload = CreateAdminPayload {
        name: "Root".to_owned(),
        email: "root@campus.edu".to_owned(),
        password: "secret1".to_owned(),
    };
    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client
        .create_admin(&token(), &payload)
        .expect_err("400 should fail");
    assert!(matches!(error, ApiError::Server { status: 400, .. }));
    assert_eq!(error.user_message(), "User already exists");

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn malformed_body_is_a_decode_error() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        respond_json(request, 200, r#"{"data":"not a list"}"#);
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let filters = FilterSet::new(CriterionKind::Category, 10);
    let error = client
        .list_courses(&token(), &filters)
        .expect_err("bad body should fail");
    assert!(matches!(error, ApiError::Decode { what: "course page", .. }));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn hung_server_times_out() -> Result<()> {
    let (server, addr) = mock_server()?;

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        thread::sleep(Duration::from_millis(400));
        let _ = request.respond(Response::from_string("{}"));
    });

    let client = Client::new(&addr, Duration::from_millis(100))?;
    let error = client
        .dashboard_stats(&token())
        .expect_err("slow server should time out");
    assert!(matches!(error, ApiError::Unreachable { .. }));

    handle.join().expect("server thread should join");
    Ok(())
}
