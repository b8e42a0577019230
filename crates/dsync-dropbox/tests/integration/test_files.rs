//! RemoteStore behavior over the wire

use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{body_bytes, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dsync_core::domain::entry::WriteMode;
use dsync_core::domain::newtypes::{RemotePath, SessionId};
use dsync_core::ports::remote_store::{CommitInfo, RemoteStore};

use crate::common::{file_entry_json, folder_entry_json, setup, test_hash};

fn uploaded_file_json(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "size": 4,
        "content_hash": test_hash('d'),
        "client_modified": "2025-06-15T10:30:00Z",
        "rev": "0123456789abcdef0",
    })
}

async fn mount_list_folder(server: &MockServer, response: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/2/files/list_folder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(server)
        .await;
}

#[tokio::test]
async fn list_folder_builds_typed_listing() {
    let (server, client) = setup().await;
    mount_list_folder(
        &server,
        json!({
            "entries": [
                file_entry_json("a.txt", 100, &test_hash('a'), "2025-06-15T10:30:00Z"),
                folder_entry_json("photos"),
            ],
            "cursor": "cursor-1",
            "has_more": false,
        }),
    )
    .await;

    let listing = client
        .list_folder(&RemotePath::new("/dest").unwrap())
        .await
        .unwrap();

    assert_eq!(listing.len(), 2);
    let file = listing.get("a.txt").unwrap();
    assert!(file.is_file());
    assert!(!listing.get("photos").unwrap().is_file());
}

#[tokio::test]
async fn list_folder_follows_pagination() {
    let (server, client) = setup().await;
    mount_list_folder(
        &server,
        json!({
            "entries": [file_entry_json("p1.txt", 1, &test_hash('1'), "2025-01-01T00:00:00Z")],
            "cursor": "cursor-page-1",
            "has_more": true,
        }),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/2/files/list_folder/continue"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [file_entry_json("p2.txt", 2, &test_hash('2'), "2025-01-01T00:00:00Z")],
            "cursor": "cursor-page-2",
            "has_more": false,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let listing = client
        .list_folder(&RemotePath::new("/dest").unwrap())
        .await
        .unwrap();

    assert_eq!(listing.len(), 2);
    assert!(listing.get("p1.txt").is_some());
    assert!(listing.get("p2.txt").is_some());
}

#[tokio::test]
async fn list_folder_not_found_surfaces_the_summary() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/2/files/list_folder"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error_summary": "path/not_found/..",
            "error": {".tag": "path", "path": {".tag": "not_found"}},
        })))
        .mount(&server)
        .await;

    let err = client
        .list_folder(&RemotePath::new("/dest/missing").unwrap())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("not_found"));
}

#[tokio::test]
async fn upload_carries_api_arg_header_and_body() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/2/files/upload"))
        .and(header_exists("Dropbox-API-Arg"))
        .and(body_bytes(b"data".to_vec()))
        .respond_with(ResponseTemplate::new(200).set_body_json(uploaded_file_json("a.txt")))
        .expect(1)
        .mount(&server)
        .await;

    let commit = CommitInfo::new(
        RemotePath::new("/dest/a.txt").unwrap(),
        WriteMode::Add,
        Some(Utc.with_ymd_and_hms(2025, 6, 15, 10, 30, 0).unwrap()),
    );
    let entry = client.upload(b"data".to_vec(), &commit).await.unwrap();

    assert!(entry.is_file());
    assert_eq!(entry.name(), "a.txt");
}

#[tokio::test]
async fn upload_failure_reports_error_summary() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/2/files/upload"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error_summary": "path/insufficient_space/..",
        })))
        .mount(&server)
        .await;

    let commit = CommitInfo::new(
        RemotePath::new("/dest/big.bin").unwrap(),
        WriteMode::Add,
        None,
    );
    let err = client.upload(vec![0u8; 8], &commit).await.unwrap_err();
    assert!(err.to_string().contains("insufficient_space"));
}

#[tokio::test]
async fn session_start_append_finish_round_trip() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/2/files/upload_session/start"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"session_id": "sess-123"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/2/files/upload_session/append_v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/2/files/upload_session/finish"))
        .respond_with(ResponseTemplate::new(200).set_body_json(uploaded_file_json("big.bin")))
        .expect(1)
        .mount(&server)
        .await;

    let session_id = client.upload_session_start(vec![1u8; 16]).await.unwrap();
    assert_eq!(session_id, SessionId::new("sess-123").unwrap());

    client
        .upload_session_append(vec![2u8; 16], &session_id, 16)
        .await
        .unwrap();

    let commit = CommitInfo::new(
        RemotePath::new("/dest/big.bin").unwrap(),
        WriteMode::Overwrite,
        None,
    );
    let entry = client
        .upload_session_finish(vec![3u8; 8], &session_id, 32, &commit)
        .await
        .unwrap();
    assert_eq!(entry.name(), "big.bin");
}

#[tokio::test]
async fn download_returns_bytes_on_success() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/2/files/download"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"file body".to_vec()))
        .mount(&server)
        .await;

    let data = client
        .download(&RemotePath::new("/dest/a.txt").unwrap())
        .await
        .unwrap();
    assert_eq!(data.as_deref(), Some(b"file body".as_slice()));
}

#[tokio::test]
async fn download_missing_file_returns_none() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/2/files/download"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error_summary": "path/not_found/..",
        })))
        .mount(&server)
        .await;

    let data = client
        .download(&RemotePath::new("/dest/gone.txt").unwrap())
        .await
        .unwrap();
    assert!(data.is_none());
}
