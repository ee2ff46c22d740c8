//! Repository and release lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every client
//! operation over real HTTP through `UreqTransport`, checking that request
//! building, status classification and body flattening agree with the server.

use std::io::{Read, Write};
use std::net::SocketAddr;

use gitea_core::{
    Endpoint, Entity, GiteaClient, GiteaError, GiteaService, HttpMethod,
};
use mock_server::MockConfig;
use serde_json::json;

const TOKEN: &str = "integration-token";
const LOGIN: &str = "integration";

/// Start the mock server on a random port and return its address.
fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            let config = MockConfig {
                token: TOKEN.to_string(),
                login: LOGIN.to_string(),
            };
            mock_server::run_with(listener, config).await
        })
        .unwrap();
    });

    addr
}

fn client(addr: SocketAddr, token: Option<&str>) -> GiteaClient {
    // Trailing slash on purpose: paths start with '/'.
    let endpoint = Endpoint::new(format!("http://{addr}/"), token.map(str::to_string)).unwrap();
    GiteaClient::new(endpoint)
}

#[test]
fn repository_and_release_lifecycle() {
    let addr = start_server();
    let client = client(addr, Some(TOKEN));

    // Step 1: who am I.
    let user = client.get_authenticated_user().unwrap();
    assert_eq!(user["login"], LOGIN);

    // Step 2: create a repository.
    let repo = client
        .create_repository("demo", Some("Integration test"), true, true)
        .unwrap();
    assert_eq!(repo["full_name"], format!("{LOGIN}/demo"));
    assert_eq!(repo["description"], "Integration test");
    assert_eq!(repo["private"], "true");
    assert!(repo["owner"].contains(&format!("\"login\":\"{LOGIN}\"")));

    // Step 3: creating it again is a conflict, reported as a transport error.
    let err = client
        .create_repository("demo", None, false, false)
        .unwrap_err();
    assert!(matches!(err, GiteaError::Transport { status: Some(409), .. }));

    // Step 4: no release yet.
    let release = client.get_release_by_tag(LOGIN, "demo", "v1.0.0").unwrap();
    assert!(release.is_none(), "expected no release before publishing");

    // Step 5: seed a release through the generic request path.
    let request = client
        .build_request(
            HttpMethod::Post,
            client.build_uri(&format!("/repos/{LOGIN}/demo/releases")),
            Some(json!({"tag_name": "v1.0.0", "name": "First", "body": "notes"})),
            true,
        )
        .unwrap();
    let response = client.dispatch(&request).unwrap();
    assert_eq!(response.status, 201);

    // Step 6: the release is found by tag.
    let release = client
        .get_release_by_tag(LOGIN, "demo", "v1.0.0")
        .unwrap()
        .expect("release should exist");
    assert_eq!(release["tag_name"], "v1.0.0");
    assert_eq!(release["name"], "First");
    assert_eq!(release["draft"], "false");

    // Step 7: deleting someone else's repository is forbidden.
    let err = client.delete_repository("someone-else/demo").unwrap_err();
    assert!(matches!(err, GiteaError::Authentication { status: Some(403), .. }));

    // Step 8: delete ours.
    client.delete_repository(&format!("{LOGIN}/demo")).unwrap();

    // Step 9: deleting again is a failure, not an absence.
    let err = client
        .delete_repository(&format!("{LOGIN}/demo"))
        .unwrap_err();
    assert!(matches!(err, GiteaError::Transport { status: Some(404), .. }));

    // Step 10: the release went with the repository.
    let release = client.get_release_by_tag(LOGIN, "demo", "v1.0.0").unwrap();
    assert!(release.is_none());
}

#[test]
fn wrong_token_is_authentication_error() {
    let addr = start_server();
    let client = client(addr, Some("not-the-token"));

    let err = client.get_authenticated_user().unwrap_err();
    assert!(matches!(err, GiteaError::Authentication { status: Some(401), .. }));

    let err = client.get_release_by_tag(LOGIN, "demo", "v1").unwrap_err();
    assert!(matches!(err, GiteaError::Authentication { status: Some(401), .. }));
}

#[test]
fn missing_token_fails_before_network() {
    // Nothing listens on this address; reaching the network would be a
    // transport error instead of an authentication error.
    let client = client("127.0.0.1:9".parse().unwrap(), None);
    let err = client.create_repository("demo", None, false, false).unwrap_err();
    assert!(matches!(err, GiteaError::Authentication { status: None, .. }));
}

#[test]
fn unreachable_server_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(addr, Some(TOKEN));
    let err = client.get_authenticated_user().unwrap_err();
    assert!(matches!(err, GiteaError::Transport { status: None, .. }));
}

#[test]
fn service_returns_entities() {
    let addr = start_server();
    let service = GiteaService::new(client(addr, Some(TOKEN)));

    let repo = service
        .create_git_repository("facade", None, false, false)
        .unwrap();
    assert_eq!(repo.name(), Some("facade"));
    assert_eq!(repo.description(), Some(""));
    assert!(repo.id().is_some());

    let user = service.get_authenticated_user().unwrap();
    assert_eq!(user.login(), Some(LOGIN));

    assert!(service
        .get_release_by_tag(LOGIN, "facade", "v0.1.0")
        .unwrap()
        .is_none());

    service
        .delete_git_repository(&format!("{LOGIN}/facade"))
        .unwrap();
}

/// Serve one canned raw HTTP response to a single connection.
fn serve_raw(status_line: &str, body: &'static [u8]) -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let head = format!(
        "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );

    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        stream.write_all(head.as_bytes()).unwrap();
        stream.write_all(body).unwrap();
        stream.flush().unwrap();
    });

    addr
}

#[test]
fn undecodable_body_keeps_unauthorized_status() {
    let addr = serve_raw("HTTP/1.1 401 Unauthorized", b"\xff\xfe denied");
    let err = client(addr, Some(TOKEN))
        .get_release_by_tag(LOGIN, "demo", "v1")
        .unwrap_err();
    assert!(matches!(err, GiteaError::Authentication { status: Some(401), .. }));
}

#[test]
fn undecodable_body_on_not_found_is_still_absent() {
    let addr = serve_raw("HTTP/1.1 404 Not Found", b"\xff\xfe missing");
    let release = client(addr, Some(TOKEN))
        .get_release_by_tag(LOGIN, "demo", "v1")
        .unwrap();
    assert!(release.is_none());
}

#[test]
fn undecodable_body_on_server_error_keeps_status() {
    let addr = serve_raw("HTTP/1.1 500 Internal Server Error", b"\xff oops");
    let err = client(addr, Some(TOKEN)).get_authenticated_user().unwrap_err();
    assert!(matches!(
        err,
        GiteaError::Transport { status: Some(500), ref message } if message.contains("oops")
    ));
}

#[test]
fn undecodable_body_on_success_is_parse_error() {
    let addr = serve_raw("HTTP/1.1 200 OK", b"{\"tag_name\":\"\xff");
    let err = client(addr, Some(TOKEN))
        .get_release_by_tag(LOGIN, "demo", "v1")
        .unwrap_err();
    assert!(matches!(err, GiteaError::Parse(_)));
}
