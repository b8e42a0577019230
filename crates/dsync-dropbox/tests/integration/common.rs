//! Shared wiremock helpers for Dropbox adapter tests

use wiremock::MockServer;

use dsync_dropbox::DropboxClient;

/// Starts a mock server and a client whose RPC and content base URLs
/// both point at it
pub async fn setup() -> (MockServer, DropboxClient) {
    let server = MockServer::start().await;
    let client = DropboxClient::with_base_urls("test-access-token", server.uri(), server.uri());
    (server, client)
}

/// JSON for one file entry in a `list_folder` page
pub fn file_entry_json(name: &str, size: u64, hash: &str, client_modified: &str) -> serde_json::Value {
    serde_json::json!({
        ".tag": "file",
        "name": name,
        "size": size,
        "content_hash": hash,
        "client_modified": client_modified,
        "rev": "0123456789abcdef0",
        "path_lower": format!("/dest/{}", name.to_lowercase()),
    })
}

/// JSON for one folder entry
pub fn folder_entry_json(name: &str) -> serde_json::Value {
    serde_json::json!({
        ".tag": "folder",
        "name": name,
        "path_lower": format!("/dest/{}", name.to_lowercase()),
    })
}

/// A valid 64-hex content hash filled with `c`
pub fn test_hash(c: char) -> String {
    c.to_string().repeat(64)
}
