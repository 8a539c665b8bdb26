use activities_core::{ActivitiesApi, Activity, ApiError, HttpActivitiesApi};
use serde_json::json;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves exactly one canned HTTP response and returns the raw request.
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/api", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buffer = [0_u8; 1024];
        loop {
            if let Some(expected) = expected_request_len(&request) {
                if request.len() >= expected {
                    break;
                }
            }
            let read = socket.read(&mut buffer).await.unwrap();
            if read == 0 {
                break;
            }
            request.extend_from_slice(&buffer[..read]);
        }

        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&request).into_owned()
    });

    (base_url, handle)
}

/// Head length plus `content-length`, once the head has fully arrived.
fn expected_request_len(request: &[u8]) -> Option<usize> {
    let head_end = request.windows(4).position(|window| window == b"\r\n\r\n")? + 4;
    let head = String::from_utf8_lossy(&request[..head_end]).to_ascii_lowercase();
    let body_len = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    Some(head_end + body_len)
}

fn request_body(request: &str) -> serde_json::Value {
    let (_, body) = request.split_once("\r\n\r\n").unwrap();
    serde_json::from_str(body).unwrap()
}

fn quiz() -> Activity {
    let mut activity = Activity::with_id("a1", "Quiz", "2020-01-01T20:00:00").unwrap();
    activity.category = "drinks".to_string();
    activity.city = "London".to_string();
    activity.venue = "Pub".to_string();
    activity
}

fn client(base_url: &str) -> HttpActivitiesApi {
    HttpActivitiesApi::new(base_url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn list_decodes_activity_array() {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"[{"id":"a1","title":"Quiz","description":"","category":"drinks","date":"2020-01-01T20:00:00.000","city":"London","venue":"Pub"}]"#,
    )
    .await;

    let activities = client(&base_url).list().await.unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].id, "a1");
    assert_eq!(activities[0].date, "2020-01-01T20:00:00.000");

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/activities HTTP/1.1"), "{request}");
}

#[tokio::test]
async fn details_maps_404_to_not_found() {
    let (base_url, server) = serve_once("404 Not Found", "").await;

    let err = client(&base_url).details("a9").await.unwrap_err();
    assert_eq!(err, ApiError::NotFound("a9".to_string()));

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/activities/a9 HTTP/1.1"), "{request}");
}

#[tokio::test]
async fn delete_maps_server_error_to_status() {
    let (base_url, server) = serve_once("500 Internal Server Error", "").await;

    let err = client(&base_url).delete("a1").await.unwrap_err();
    assert!(
        matches!(err, ApiError::Status { status: 500, ref url } if url.ends_with("/api/activities/a1")),
        "unexpected error: {err}"
    );

    let request = server.await.unwrap();
    assert!(request.starts_with("DELETE /api/activities/a1 HTTP/1.1"), "{request}");
}

#[tokio::test]
async fn malformed_body_maps_to_decode_error() {
    let (base_url, server) = serve_once("200 OK", r#"{"not":"a list"}"#).await;

    let err = client(&base_url).list().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "unexpected error: {err}");
    server.await.unwrap();
}

#[tokio::test]
async fn unreachable_server_maps_to_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/api", listener.local_addr().unwrap());
    drop(listener);

    let err = client(&base_url).list().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn create_posts_activity_json_to_collection() {
    let (base_url, server) = serve_once("201 Created", "").await;

    client(&base_url).create(&quiz()).await.unwrap();

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /api/activities HTTP/1.1"), "{request}");
    assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
    assert_eq!(
        request_body(&request),
        json!({
            "id": "a1",
            "title": "Quiz",
            "description": "",
            "category": "drinks",
            "date": "2020-01-01T20:00:00",
            "city": "London",
            "venue": "Pub"
        })
    );
}

#[tokio::test]
async fn update_puts_activity_json_to_item() {
    let (base_url, server) = serve_once("200 OK", "").await;
    let mut activity = quiz();
    activity.title = "Big quiz".to_string();

    client(&base_url).update(&activity).await.unwrap();

    let request = server.await.unwrap();
    assert!(request.starts_with("PUT /api/activities/a1 HTTP/1.1"), "{request}");
    let body = request_body(&request);
    assert_eq!(body["id"], "a1");
    assert_eq!(body["title"], "Big quiz");
    assert_eq!(body["venue"], "Pub");
}

#[tokio::test]
async fn update_of_unknown_id_maps_to_not_found() {
    let (base_url, server) = serve_once("404 Not Found", "").await;

    let err = client(&base_url).update(&quiz()).await.unwrap_err();
    assert_eq!(err, ApiError::NotFound("a1".to_string()));
    server.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn request_delay_elapses_before_sending() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/api", listener.local_addr().unwrap());
    drop(listener);
    let api = client(&base_url).with_request_delay(Duration::from_millis(750));

    let started = tokio::time::Instant::now();
    let err = api.list().await.unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)), "unexpected error: {err}");
    assert!(started.elapsed() >= Duration::from_millis(750));
}
