//! /predict クライアントの統合テスト
//!
//! ローカルの axum サーバーをエンドポイントの代わりに使う

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use batikscan::acquisition::{PathPicker, RoutedPicker, StaticPermissions};
use batikscan::client::{Classifier, PredictClient};
use batikscan::error::BatikScanError;
use batikscan::screen::{ScreenController, SubmitReport};
use batikscan_common::{ImageSource, Notice, StagedImage};
use tempfile::tempdir;

const SAMPLE: &str = r#"{"predicted_class":"Batik_Kawung","confidence":87.5,"probabilities":{"Batik_Kawung":87.5,"Batik_Parang":12.5}}"#;

#[derive(Debug, Clone, Default)]
struct Upload {
    content_type: String,
    field: String,
    file_name: String,
    part_type: String,
    bytes: Vec<u8>,
}

#[derive(Clone)]
struct MockServer {
    status: StatusCode,
    body: &'static str,
    uploads: Arc<Mutex<Vec<Upload>>>,
}

async fn predict(State(server): State<MockServer>, headers: HeaderMap, mut multipart: Multipart) -> impl IntoResponse {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    while let Some(field) = multipart.next_field().await.unwrap() {
        let upload = Upload {
            content_type: content_type.clone(),
            field: field.name().unwrap_or_default().to_string(),
            file_name: field.file_name().unwrap_or_default().to_string(),
            part_type: field.content_type().unwrap_or_default().to_string(),
            bytes: field.bytes().await.unwrap().to_vec(),
        };
        server.uploads.lock().unwrap().push(upload);
    }

    (server.status, [(header::CONTENT_TYPE, "application/json")], server.body)
}

async fn spawn_server(status: StatusCode, body: &'static str) -> (SocketAddr, Arc<Mutex<Vec<Upload>>>) {
    let uploads = Arc::new(Mutex::new(Vec::new()));
    let state = MockServer {
        status,
        body,
        uploads: uploads.clone(),
    };
    let app = Router::new().route("/predict", post(predict)).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, uploads)
}

fn staged_file(dir: &std::path::Path, name: &str, bytes: &[u8]) -> StagedImage {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    StagedImage {
        uri: path.display().to_string(),
        extension: name.rsplit('.').next().unwrap().to_lowercase(),
    }
}

#[tokio::test]
async fn test_multipart_upload_and_parse() {
    let (addr, uploads) = spawn_server(StatusCode::OK, SAMPLE).await;
    let dir = tempdir().unwrap();
    // PNG でも image/jpeg として送る
    let image = staged_file(dir.path(), "motif.PNG", b"\x89PNG fake bytes");

    let client = PredictClient::new(format!("http://{}/predict", addr), None).unwrap();
    let result = client.classify(&image).await.unwrap();

    assert_eq!(result.predicted_class, "Batik_Kawung");
    assert_eq!(result.confidence, 87.5);

    let uploads = uploads.lock().unwrap();
    assert_eq!(uploads.len(), 1);
    let upload = &uploads[0];
    assert!(upload.content_type.starts_with("multipart/form-data"));
    assert_eq!(upload.field, "file");
    assert_eq!(upload.file_name, "image.jpg");
    assert_eq!(upload.part_type, "image/jpeg");
    assert_eq!(upload.bytes, b"\x89PNG fake bytes");
}

#[tokio::test]
async fn test_file_uri_is_read_from_local_path() {
    let (addr, uploads) = spawn_server(StatusCode::OK, SAMPLE).await;
    let dir = tempdir().unwrap();
    let mut image = staged_file(dir.path(), "kawung.jpg", b"jpeg");
    image.uri = format!("file://{}", image.uri);

    let client = PredictClient::new(format!("http://{}/predict", addr), None).unwrap();
    client.classify(&image).await.unwrap();
    assert_eq!(uploads.lock().unwrap()[0].bytes, b"jpeg");
}

#[tokio::test]
async fn test_non_2xx_is_error() {
    let (addr, _) = spawn_server(StatusCode::INTERNAL_SERVER_ERROR, r#"{"detail":"boom"}"#).await;
    let dir = tempdir().unwrap();
    let image = staged_file(dir.path(), "kawung.jpg", b"jpeg");

    let client = PredictClient::new(format!("http://{}/predict", addr), None).unwrap();
    let err = client.classify(&image).await.unwrap_err();
    assert!(matches!(err, BatikScanError::HttpStatus(500)));
}

#[tokio::test]
async fn test_schema_mismatch_is_error() {
    let (addr, _) = spawn_server(StatusCode::OK, r#"{"prediction":"Batik_Kawung"}"#).await;
    let dir = tempdir().unwrap();
    let image = staged_file(dir.path(), "kawung.jpg", b"jpeg");

    let client = PredictClient::new(format!("http://{}/predict", addr), None).unwrap();
    let err = client.classify(&image).await.unwrap_err();
    assert!(matches!(err, BatikScanError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_missing_image_file_is_error() {
    let (addr, uploads) = spawn_server(StatusCode::OK, SAMPLE).await;
    let image = StagedImage {
        uri: "/nonexistent/batikscan-12345.jpg".to_string(),
        extension: "jpg".to_string(),
    };

    let client = PredictClient::new(format!("http://{}/predict", addr), None).unwrap();
    let err = client.classify(&image).await.unwrap_err();
    assert!(matches!(err, BatikScanError::Io(_)));
    assert!(uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_connection_refused_is_error() {
    // 一度バインドしてすぐ閉じたポートに接続する
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = tempdir().unwrap();
    let image = staged_file(dir.path(), "kawung.jpg", b"jpeg");
    let client = PredictClient::new(format!("http://{}/predict", addr), None).unwrap();
    let err = client.classify(&image).await.unwrap_err();
    assert!(matches!(err, BatikScanError::Http(_)));
}

#[tokio::test]
async fn test_screen_end_to_end() {
    let (addr, _) = spawn_server(StatusCode::OK, SAMPLE).await;
    let dir = tempdir().unwrap();
    let path = dir.path().join("kawung.jpg");
    std::fs::write(&path, b"jpeg").unwrap();

    let picker = RoutedPicker::new(PathPicker::new(Some(path)), PathPicker::new(None));
    let client = PredictClient::new(format!("http://{}/predict", addr), None).unwrap();
    let mut screen = ScreenController::new(StaticPermissions::granted(), picker, client);

    screen.acquire(ImageSource::MediaLibrary).await;
    match screen.submit().await {
        SubmitReport::Completed(view) => {
            assert_eq!(view.headline, "Batik Kawung (87.50%)");
            assert_eq!(view.rows[1].label, "Batik Parang");
            assert_eq!(view.rows[1].percent, "12.50%");
        }
        other => panic!("unexpected report: {:?}", other),
    }
}

#[tokio::test]
async fn test_screen_server_error_notice() {
    let (addr, _) = spawn_server(StatusCode::BAD_GATEWAY, "bad gateway").await;
    let dir = tempdir().unwrap();
    let path = dir.path().join("kawung.jpeg");
    std::fs::write(&path, b"jpeg").unwrap();

    let picker = RoutedPicker::new(PathPicker::new(Some(path)), PathPicker::new(None));
    let client = PredictClient::new(format!("http://{}/predict", addr), None).unwrap();
    let mut screen = ScreenController::new(StaticPermissions::granted(), picker, client);

    screen.acquire(ImageSource::MediaLibrary).await;
    assert_eq!(screen.submit().await, SubmitReport::Notice(Notice::SubmissionFailed));
    assert!(!screen.state().is_busy());
    assert!(screen.result_view().is_none());
}
