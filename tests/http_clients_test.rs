use artifact_bootstrap::engine::activation::SearchPathHost;
use artifact_bootstrap::engine::updater::{
    ArtifactFetcher, DownloadError, Downloader, HttpManifestClient, HttpOptions, ManifestSource,
    UpdateEngine, UpdateOutcome,
};
use artifact_bootstrap::engine::{BootstrapConfig, InstallLayout};
use httpmock::prelude::*;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::fs;
use std::net::TcpListener;

const USER_AGENT: &str = "Artifact-Bootstrap-Test";

fn plain_http() -> HttpOptions {
    HttpOptions::default()
        .with_user_agent(USER_AGENT)
        .allow_plain_http()
}

#[test]
fn test_downloader_streams_to_file() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/a.jar")
            .header("user-agent", USER_AGENT)
            .header("cache-control", "no-cache")
            .header("pragma", "no-cache");
        then.status(200).body("artifact bytes");
    });
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("a.jar.partial");

    let result = Downloader::new(&plain_http())
        .download(&server.url("/a.jar"), &dest)
        .unwrap();

    mock.assert_hits(1);
    assert_eq!(result.bytes_downloaded, 14);
    assert_eq!(result.path, dest);
    assert_eq!(fs::read(&dest).unwrap(), b"artifact bytes");
}

#[test]
fn test_downloader_rejects_error_status() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/a.jar");
        then.status(404);
    });
    let dir = tempfile::tempdir().unwrap();

    let result = Downloader::new(&plain_http()).download(&server.url("/a.jar"), &dir.path().join("a.jar"));

    mock.assert_hits(1);
    assert!(matches!(result, Err(DownloadError::Status(404))));
}

#[test]
fn test_downloader_connection_refused() {
    // bind then drop to get a port nothing listens on
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let dir = tempfile::tempdir().unwrap();

    let result = Downloader::new(&plain_http())
        .download(&format!("http://127.0.0.1:{}/a.jar", port), &dir.path().join("a.jar"));

    assert!(matches!(result, Err(DownloadError::Network(_))));
}

#[test]
fn test_manifest_client_parses_json() {
    let document = json!({ "release": { "url": "https://cdn.example/a.jar", "sha256": "00ff" } });
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/companion/1.8.9-forge")
            .header("user-agent", USER_AGENT);
        then.status(200)
            .header("content-type", "application/json")
            .body(document.to_string());
    });

    let fetched = HttpManifestClient::new(&plain_http()).fetch(&server.url("/companion/1.8.9-forge"));

    mock.assert_hits(1);
    assert_eq!(fetched, Some(document));
}

#[test]
fn test_manifest_client_soft_failures() {
    let client = HttpManifestClient::new(&plain_http());
    let server = MockServer::start();

    let failing = server.mock(|when, then| {
        when.method(GET).path("/error");
        then.status(500).body("{}");
    });
    assert_eq!(client.fetch(&server.url("/error")), None);
    failing.assert_hits(1);

    let html = server.mock(|when, then| {
        when.method(GET).path("/html");
        then.status(200).body("<html>maintenance</html>");
    });
    assert_eq!(client.fetch(&server.url("/html")), None);
    html.assert_hits(1);

    // a JSON scalar is still a document; the engine decides what to do with it
    let scalar = server.mock(|when, then| {
        when.method(GET).path("/scalar");
        then.status(200).body("42");
    });
    assert_eq!(client.fetch(&server.url("/scalar")), Some(json!(42)));
    scalar.assert_hits(1);
}

#[test]
fn test_engine_over_http() {
    let payload = b"companion artifact over the wire".to_vec();
    let digest = hex::encode(Sha256::digest(&payload));

    let server = MockServer::start();
    let manifest_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/companion/1.8.9-forge")
            .header("user-agent", USER_AGENT);
        then.status(200).body(
            json!({
                "release": { "url": server.url("/files/companion.jar"), "sha256": digest },
            })
            .to_string(),
        );
    });
    let artifact_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/files/companion.jar")
            .header("user-agent", USER_AGENT);
        then.status(200).body(&payload);
    });

    let dir = tempfile::tempdir().unwrap();
    let config = BootstrapConfig {
        install_dir: dir.path().join("Companion"),
        manifest_base_url: server.base_url(),
        ..BootstrapConfig::default()
    };
    let layout = InstallLayout::new(&config);
    let options = plain_http();
    let manifest_client = HttpManifestClient::new(&options);
    let downloader = Downloader::new(&options);
    let mut host = SearchPathHost::new();

    let report = UpdateEngine::new(&layout, config.manifest_url(), &manifest_client, &downloader)
        .run(&mut host)
        .unwrap();

    manifest_mock.assert_hits(1);
    artifact_mock.assert_hits(1);
    assert_eq!(report.outcome, UpdateOutcome::Updated);
    assert_eq!(fs::read(layout.artifact_path()).unwrap(), payload);
}
