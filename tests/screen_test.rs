//! 画面コントローラの統合テスト
//!
//! パーミッション・ピッカー・分類器はモックに差し替える

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use batikscan::acquisition::{ImagePicker, PermissionGate, PermissionStatus, StaticPermissions};
use batikscan::client::Classifier;
use batikscan::error::{BatikScanError, Result};
use batikscan::screen::{AcquireOutcome, ScreenController, SubmitReport};
use batikscan_common::{ClassificationResult, ImageSource, Notice, PickedAsset, PickerOptions, StagedImage};

const SAMPLE: &str = r#"{"predicted_class":"Batik_Kawung","confidence":87.5,"probabilities":{"Batik_Kawung":87.5,"Batik_Parang":12.5}}"#;

/// 呼び出しごとに次の URI を返すピッカー（None はキャンセル）
#[derive(Clone, Default)]
struct ScriptedPicker {
    uris: Arc<Mutex<Vec<Option<&'static str>>>>,
    calls: Arc<Mutex<Vec<(ImageSource, PickerOptions)>>>,
}

impl ScriptedPicker {
    fn new(uris: Vec<Option<&'static str>>) -> Self {
        let mut uris = uris;
        uris.reverse();
        Self {
            uris: Arc::new(Mutex::new(uris)),
            calls: Arc::default(),
        }
    }
}

#[async_trait]
impl ImagePicker for ScriptedPicker {
    async fn pick(&self, source: ImageSource, options: &PickerOptions) -> Result<Option<PickedAsset>> {
        self.calls.lock().unwrap().push((source, *options));
        let next = self.uris.lock().unwrap().pop().flatten();
        Ok(next.map(PickedAsset::new))
    }
}

struct FailingPicker;

#[async_trait]
impl ImagePicker for FailingPicker {
    async fn pick(&self, _source: ImageSource, _options: &PickerOptions) -> Result<Option<PickedAsset>> {
        Err(BatikScanError::Picker("device unavailable".into()))
    }
}

#[derive(Clone, Copy)]
enum Reply {
    Ok,
    NetworkError,
    Malformed,
}

/// 送信時点の busy 状態を記録する分類器
#[derive(Clone)]
struct MockClassifier {
    reply: Reply,
    events: Arc<Mutex<Vec<String>>>,
}

impl MockClassifier {
    fn new(reply: Reply, events: Arc<Mutex<Vec<String>>>) -> Self {
        Self { reply, events }
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, image: &StagedImage) -> Result<ClassificationResult> {
        self.events.lock().unwrap().push(format!("request:{}", image.uri));
        match self.reply {
            Reply::Ok => Ok(ClassificationResult::from_json(SAMPLE.as_bytes())?),
            Reply::NetworkError => Err(BatikScanError::HttpStatus(503)),
            Reply::Malformed => Err(ClassificationResult::from_json(b"{\"predicted_class\":1}").unwrap_err().into()),
        }
    }
}

fn controller(
    uris: Vec<Option<&'static str>>,
    reply: Reply,
) -> (
    ScreenController<StaticPermissions, ScriptedPicker, MockClassifier>,
    Arc<Mutex<Vec<String>>>,
) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let busy_events = events.clone();
    let controller = ScreenController::new(
        StaticPermissions::granted(),
        ScriptedPicker::new(uris),
        MockClassifier::new(reply, events.clone()),
    )
    .with_busy_listener(move |busy| busy_events.lock().unwrap().push(format!("busy:{}", busy)));
    (controller, events)
}

#[tokio::test]
async fn test_supported_image_is_staged() {
    let (mut screen, _) = controller(vec![Some("file:///DCIM/IMG_01.JPEG")], Reply::Ok);
    let outcome = screen.acquire(ImageSource::MediaLibrary).await;

    match outcome {
        AcquireOutcome::Staged(staged) => assert_eq!(staged.extension, "jpeg"),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(screen.state().staged().unwrap().uri, "file:///DCIM/IMG_01.JPEG");
}

#[tokio::test]
async fn test_unsupported_image_leaves_state_unchanged() {
    let (mut screen, _) = controller(vec![Some("first.png"), Some("anim.gif"), Some("noext")], Reply::Ok);
    screen.acquire(ImageSource::MediaLibrary).await;

    assert_eq!(
        screen.acquire(ImageSource::MediaLibrary).await,
        AcquireOutcome::Notice(Notice::UnsupportedFormat)
    );
    assert_eq!(
        screen.acquire(ImageSource::MediaLibrary).await,
        AcquireOutcome::Notice(Notice::UnsupportedFormat)
    );
    assert_eq!(screen.state().staged().unwrap().uri, "first.png");
}

#[tokio::test]
async fn test_permission_denied_skips_picker() {
    let picker = ScriptedPicker::new(vec![Some("a.jpg")]);
    let gate = StaticPermissions {
        media_library: PermissionStatus::Granted,
        camera: PermissionStatus::Denied,
    };
    let mut screen = ScreenController::new(gate, picker.clone(), MockClassifier::new(Reply::Ok, Arc::default()));

    assert_eq!(screen.acquire(ImageSource::Camera).await, AcquireOutcome::Notice(Notice::PermissionDenied));
    assert!(picker.calls.lock().unwrap().is_empty());
    assert!(screen.state().staged().is_none());
}

#[tokio::test]
async fn test_picker_receives_single_full_quality_options() {
    let picker = ScriptedPicker::new(vec![Some("a.jpg")]);
    let mut screen = ScreenController::new(
        StaticPermissions::granted(),
        picker.clone(),
        MockClassifier::new(Reply::Ok, Arc::default()),
    );
    screen.acquire(ImageSource::Camera).await;

    let calls = picker.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, ImageSource::Camera);
    assert!(calls[0].1.single);
    assert!(!calls[0].1.allow_editing);
    assert_eq!(calls[0].1.quality, 1.0);
}

#[tokio::test]
async fn test_cancel_and_picker_error_change_nothing() {
    let (mut screen, _) = controller(vec![None], Reply::Ok);
    assert_eq!(screen.acquire(ImageSource::MediaLibrary).await, AcquireOutcome::Cancelled);
    assert!(screen.state().staged().is_none());

    let mut failing = ScreenController::new(
        StaticPermissions::granted(),
        FailingPicker,
        MockClassifier::new(Reply::Ok, Arc::default()),
    );
    assert_eq!(failing.acquire(ImageSource::Camera).await, AcquireOutcome::Cancelled);
    assert!(failing.state().staged().is_none());
}

#[tokio::test]
async fn test_submit_without_image_is_noop() {
    let (mut screen, events) = controller(vec![], Reply::Ok);
    assert_eq!(screen.submit().await, SubmitReport::Skipped);
    assert!(events.lock().unwrap().is_empty());
    assert!(!screen.state().is_busy());
}

#[tokio::test]
async fn test_successful_submission_renders_result() {
    let (mut screen, events) = controller(vec![Some("kawung.jpg")], Reply::Ok);
    screen.acquire(ImageSource::MediaLibrary).await;

    let view = match screen.submit().await {
        SubmitReport::Completed(view) => view,
        other => panic!("unexpected report: {:?}", other),
    };
    assert_eq!(view.headline, "Batik Kawung (87.50%)");
    assert_eq!(view.rows.len(), 2);
    let total: f64 = view.rows.iter().map(|r| r.bar_width).sum();
    assert_eq!(total, 100.0);

    // busy は送信の直前に立ち、完了後に下りる
    assert_eq!(
        *events.lock().unwrap(),
        vec!["busy:true", "request:kawung.jpg", "busy:false"]
    );
    assert!(!screen.state().is_busy());
    assert!(screen.result_view().is_some());
}

#[tokio::test]
async fn test_network_failure_shows_notice_without_result() {
    let (mut screen, events) = controller(vec![Some("kawung.jpg")], Reply::NetworkError);
    screen.acquire(ImageSource::MediaLibrary).await;

    assert_eq!(screen.submit().await, SubmitReport::Notice(Notice::SubmissionFailed));
    assert!(!screen.state().is_busy());
    assert!(screen.result_view().is_none());
    assert_eq!(events.lock().unwrap().last().map(String::as_str), Some("busy:false"));
}

#[tokio::test]
async fn test_malformed_response_is_submission_failure() {
    let (mut screen, events) = controller(vec![Some("kawung.png")], Reply::Malformed);
    screen.acquire(ImageSource::MediaLibrary).await;

    assert_eq!(screen.submit().await, SubmitReport::Notice(Notice::SubmissionFailed));
    assert!(!screen.state().is_busy());
    assert!(screen.state().result().is_none());
    assert_eq!(
        *events.lock().unwrap(),
        vec!["busy:true", "request:kawung.png", "busy:false"]
    );
}

#[tokio::test]
async fn test_new_image_clears_previous_result() {
    let (mut screen, _) = controller(vec![Some("kawung.jpg"), Some("parang.png")], Reply::Ok);
    screen.acquire(ImageSource::MediaLibrary).await;
    screen.submit().await;
    assert!(screen.state().result().is_some());

    screen.acquire(ImageSource::Camera).await;
    assert!(screen.state().result().is_none());
    assert_eq!(screen.state().staged().unwrap().uri, "parang.png");
}

#[tokio::test]
async fn test_rejected_image_keeps_previous_result() {
    let (mut screen, _) = controller(vec![Some("kawung.jpg"), Some("scan.bmp")], Reply::Ok);
    screen.acquire(ImageSource::MediaLibrary).await;
    screen.submit().await;

    screen.acquire(ImageSource::MediaLibrary).await;
    assert!(screen.state().result().is_some());
}

#[tokio::test]
async fn test_boxed_permission_gate() {
    let gate: Box<dyn PermissionGate> = Box::new(StaticPermissions::granted());
    let mut screen = ScreenController::new(
        gate,
        ScriptedPicker::new(vec![Some("a.jpg")]),
        MockClassifier::new(Reply::Ok, Arc::default()),
    );
    assert!(matches!(screen.acquire(ImageSource::MediaLibrary).await, AcquireOutcome::Staged(_)));
}
