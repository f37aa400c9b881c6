//! End-to-end trust workflow against a mock server.

use async_trait::async_trait;
use serde_json::{json, Value};
use sslctx_client::{
    CertificateFile, Credentials, Refresh, SslContextClient, SslContextError, TrustActionExecutor,
    TrustStore,
};
use sslctx_core::{CertificateCollection, CertificateStatus, TrustAction};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_bytes, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INDEX: &str = "/scm/api/v2/";
const APPROVED: &str = "/scm/api/v2/ssl-context/approved";
const REJECTED: &str = "/scm/api/v2/ssl-context/rejected";
const UPLOAD: &str = "/scm/api/v2/ssl-context/upload";

fn certificate(fingerprint: &str, status: &str, links: Value) -> Value {
    let error = if status == "REJECTED" {
        json!("UNKNOWN")
    } else {
        Value::Null
    };
    json!({
        "fingerprint": fingerprint,
        "subjectDN": format!("CN={fingerprint}.example.com,O=Example,C=DE"),
        "issuerDN": "CN=Example CA,O=Example,C=DE",
        "notBefore": "2020-01-01T00:00:00Z",
        "notAfter": "2030-01-01T00:00:00Z",
        "signAlg": "SHA256withRSA",
        "timestamp": "2024-05-01T10:00:00Z",
        "status": status,
        "error": error,
        "_links": links,
        "_embedded": {"chain": []}
    })
}

fn collection(self_href: &str, certificates: Vec<Value>) -> Value {
    json!({
        "_links": {"self": {"href": self_href}},
        "_embedded": {"chain": certificates}
    })
}

fn index(with_upload: bool) -> Value {
    let mut links = vec![
        json!({"name": "rejected", "href": REJECTED}),
        json!({"name": "approved", "href": APPROVED}),
    ];
    if with_upload {
        links.push(json!({"name": "upload", "href": UPLOAD}));
    }
    json!({"_links": {"self": {"href": INDEX}, "sslContext": links}})
}

fn client(server: &MockServer) -> SslContextClient {
    SslContextClient::new(format!("{}/scm", server.uri())).unwrap()
}

async fn mount_index(server: &MockServer, with_upload: bool) {
    Mock::given(method("GET"))
        .and(path(INDEX))
        .respond_with(ResponseTemplate::new(200).set_body_json(index(with_upload)))
        .mount(server)
        .await;
}

async fn mount_collection(server: &MockServer, href: &str, body: Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(href))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn open(server: &MockServer) -> TrustStore {
    TrustStore::open(client(server)).await.unwrap().unwrap()
}

#[derive(Default)]
struct CountingRefresh(AtomicUsize);

#[async_trait]
impl Refresh for CountingRefresh {
    async fn refresh(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn inert_without_ssl_context_link() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(INDEX))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_links": {"self": {"href": INDEX}}
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_collection(&server, APPROVED, collection(APPROVED, vec![]), 0).await;
    mount_collection(&server, REJECTED, collection(REJECTED, vec![]), 0).await;

    let store = TrustStore::open(client(&server)).await.unwrap();
    assert!(store.is_none());
}

#[tokio::test]
async fn opens_and_loads_both_collections() {
    let server = MockServer::start().await;
    mount_index(&server, true).await;
    mount_collection(
        &server,
        APPROVED,
        collection(APPROVED, vec![certificate("a1", "APPROVED", json!({}))]),
        1,
    )
    .await;
    mount_collection(
        &server,
        REJECTED,
        collection(REJECTED, vec![certificate("r1", "REJECTED", json!({}))]),
        1,
    )
    .await;

    let store = open(&server).await;
    let snapshot = store.snapshot();

    assert!(snapshot.approved.data.as_ref().unwrap().contains("a1"));
    assert!(snapshot.rejected.data.as_ref().unwrap().contains("r1"));
    assert!(!snapshot.approved.loading);
    assert_eq!(snapshot.find("r1").unwrap().status, CertificateStatus::Rejected);
    assert!(store.uploader().is_some());
}

#[tokio::test]
async fn collection_failures_are_isolated() {
    let server = MockServer::start().await;
    mount_index(&server, false).await;
    Mock::given(method("GET"))
        .and(path(APPROVED))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "store broken"})))
        .mount(&server)
        .await;
    mount_collection(
        &server,
        REJECTED,
        collection(REJECTED, vec![certificate("r1", "REJECTED", json!({}))]),
        1,
    )
    .await;

    let store = open(&server).await;
    let snapshot = store.snapshot();

    assert!(snapshot.approved.data.is_none());
    let error = snapshot.approved.error.unwrap();
    assert!(error.is_request_failure());
    assert_eq!(error.status_code(), Some(500));

    assert!(snapshot.rejected.error.is_none());
    assert_eq!(snapshot.rejected.data.unwrap().len(), 1);
    assert!(store.uploader().is_none());
}

#[tokio::test]
async fn malformed_body_is_a_request_failure() {
    let server = MockServer::start().await;
    mount_index(&server, false).await;
    Mock::given(method("GET"))
        .and(path(APPROVED))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;
    mount_collection(&server, REJECTED, collection(REJECTED, vec![]), 1).await;

    let store = open(&server).await;
    let error = store.snapshot().approved.error.unwrap();

    assert!(matches!(*error, SslContextError::Json(_)));
    assert!(error.is_request_failure());
}

#[tokio::test]
async fn refresh_twice_yields_same_data() {
    let server = MockServer::start().await;
    mount_index(&server, false).await;
    mount_collection(
        &server,
        APPROVED,
        collection(APPROVED, vec![certificate("a1", "APPROVED", json!({}))]),
        3,
    )
    .await;
    mount_collection(&server, REJECTED, collection(REJECTED, vec![]), 3).await;

    let store = open(&server).await;
    let first = store.refresh_all().await;
    let second = store.refresh_all().await;

    assert_eq!(first.approved.data, second.approved.data);
    assert_eq!(first.rejected.data, second.rejected.data);
    assert!(!second.approved.loading);
}

#[tokio::test]
async fn reject_only_certificate_cannot_be_approved() {
    let server = MockServer::start().await;
    let reject_href = "/scm/api/v2/ssl-context/reject/a1/a1";
    let cert: sslctx_core::Certificate = serde_json::from_value(certificate(
        "a1",
        "APPROVED",
        json!({"reject": {"href": reject_href}}),
    ))
    .unwrap();

    Mock::given(method("POST"))
        .and(path(reject_href))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let refresher = Arc::new(CountingRefresh::default());
    let executor = TrustActionExecutor::new(client(&server), Arc::clone(&refresher));

    assert!(cert.action_href(TrustAction::Approve).is_none());
    let denied = executor.approve(&cert).await;
    assert!(matches!(
        denied.error(),
        Some(SslContextError::ActionNotPermitted(TrustAction::Approve))
    ));
    assert_eq!(refresher.0.load(Ordering::SeqCst), 0);
    assert!(!executor.is_loading());

    let outcome = executor.reject(&cert).await;
    assert!(outcome.is_success());
    assert_eq!(outcome.message(), Some("certificate rejected"));
    assert_eq!(refresher.0.load(Ordering::SeqCst), 1);
    assert!(!executor.state().loading);
}

#[tokio::test]
async fn reject_refreshes_both_collections_once() {
    let server = MockServer::start().await;
    let reject_href = "/scm/api/v2/ssl-context/reject/a1/a1";
    mount_index(&server, false).await;
    mount_collection(
        &server,
        APPROVED,
        collection(
            APPROVED,
            vec![certificate("a1", "APPROVED", json!({"reject": {"href": reject_href}}))],
        ),
        2,
    )
    .await;
    mount_collection(&server, REJECTED, collection(REJECTED, vec![]), 2).await;
    Mock::given(method("POST"))
        .and(path(reject_href))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = open(&server).await;
    let cert = store.approved().state().data.unwrap().get("a1").cloned().unwrap();

    let outcome = store.executor().reject(&cert).await;
    assert!(outcome.is_success());
}

#[tokio::test]
async fn approve_moves_certificate_between_collections() {
    let server = MockServer::start().await;
    let approve_href = "/scm/api/v2/ssl-context/approve/F1/F1";
    mount_index(&server, false).await;

    Mock::given(method("GET"))
        .and(path(REJECTED))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(
            REJECTED,
            vec![certificate(
                "F1",
                "REJECTED",
                json!({
                    "approve": {"href": approve_href},
                    "remove": {"href": "/scm/api/v2/ssl-context/rejected/F1"}
                }),
            )],
        )))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(REJECTED))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(REJECTED, vec![])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(APPROVED))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(APPROVED, vec![])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(APPROVED))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(
            APPROVED,
            vec![certificate("F1", "APPROVED", json!({"reject": {"href": "/scm/api/v2/ssl-context/reject/F1/F1"}}))],
        )))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(approve_href))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = open(&server).await;
    let before = store.snapshot();
    assert!(before.rejected.data.as_ref().unwrap().contains("F1"));
    assert!(!before.approved.data.as_ref().unwrap().contains("F1"));

    let cert = before.find("F1").cloned().unwrap();
    let outcome = store.executor().approve(&cert).await;
    assert_eq!(outcome.message(), Some("certificate approved"));

    let after = store.snapshot();
    assert!(!after.rejected.data.as_ref().unwrap().contains("F1"));
    let approved = after.approved.data.as_ref().unwrap().get("F1").unwrap();
    assert_eq!(approved.status, CertificateStatus::Approved);
    assert!(approved.error.is_none());
}

#[tokio::test]
async fn failed_action_does_not_refresh() {
    let server = MockServer::start().await;
    let approve_href = "/scm/api/v2/ssl-context/approve/r1/r1";
    let cert: sslctx_core::Certificate = serde_json::from_value(certificate(
        "r1",
        "REJECTED",
        json!({"approve": {"href": approve_href}}),
    ))
    .unwrap();
    Mock::given(method("POST"))
        .and(path(approve_href))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "store locked"})))
        .expect(1)
        .mount(&server)
        .await;

    let refresher = Arc::new(CountingRefresh::default());
    let executor = TrustActionExecutor::new(client(&server), Arc::clone(&refresher));

    let outcome = executor.approve(&cert).await;

    assert!(!outcome.is_success());
    assert!(outcome.message().is_none());
    assert_eq!(refresher.0.load(Ordering::SeqCst), 0);
    let state = executor.state();
    assert!(!state.loading);
    assert_eq!(state.error.unwrap().status_code(), Some(500));
}

#[tokio::test]
async fn remove_sends_delete() {
    let server = MockServer::start().await;
    let remove_href = "/scm/api/v2/ssl-context/rejected/r1";
    let cert: sslctx_core::Certificate = serde_json::from_value(certificate(
        "r1",
        "REJECTED",
        json!({"remove": {"href": remove_href}}),
    ))
    .unwrap();
    Mock::given(method("DELETE"))
        .and(path(remove_href))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let refresher = Arc::new(CountingRefresh::default());
    let executor = TrustActionExecutor::new(client(&server), Arc::clone(&refresher));

    let outcome = executor.remove(&cert).await;
    assert_eq!(outcome.message(), Some("certificate deleted"));
    assert_eq!(refresher.0.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn upload_below_limit_is_sent_as_octet_stream() {
    let server = MockServer::start().await;
    let payload = vec![0x30; 49_999];
    mount_index(&server, true).await;
    mount_collection(&server, APPROVED, collection(APPROVED, vec![]), 2).await;
    mount_collection(&server, REJECTED, collection(REJECTED, vec![]), 2).await;
    Mock::given(method("POST"))
        .and(path(UPLOAD))
        .and(header("content-type", "application/octet-stream"))
        .and(body_bytes(payload.clone()))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = open(&server).await;
    let uploader = store.uploader().unwrap();
    uploader.select(CertificateFile::new("server.der", payload));
    assert!(uploader.state().can_submit());

    let outcome = uploader.submit().await;

    assert!(outcome.is_success());
    let state = uploader.state();
    assert!(state.file.is_none());
    assert!(state.submitted);
    assert!(!state.submitting);
}

#[tokio::test]
async fn upload_at_limit_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOAD))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let refresher = Arc::new(CountingRefresh::default());
    let uploader =
        sslctx_client::UploadSubmitter::new(client(&server), UPLOAD, Arc::clone(&refresher));
    uploader.select(CertificateFile::new("huge.der", vec![0; 50_000]));
    assert!(uploader.state().is_oversized());

    let outcome = uploader.submit().await;

    assert!(matches!(
        outcome.error(),
        Some(SslContextError::UploadTooLarge { size: 50_000, .. })
    ));
    assert_eq!(refresher.0.load(Ordering::SeqCst), 0);
    assert!(uploader.state().file.is_some());
}

#[tokio::test]
async fn failed_upload_keeps_selection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOAD))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "File is not a valid certificate"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let refresher = Arc::new(CountingRefresh::default());
    let uploader =
        sslctx_client::UploadSubmitter::new(client(&server), UPLOAD, Arc::clone(&refresher));
    uploader.select(CertificateFile::new("notes.txt", b"hello".to_vec()));

    let outcome = uploader.submit().await;

    match outcome.error() {
        Some(SslContextError::Api { code, message }) => {
            assert_eq!(*code, 400);
            assert_eq!(message, "File is not a valid certificate");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    let state = uploader.state();
    assert_eq!(state.file.unwrap().name, "notes.txt");
    assert!(state.error.is_some());
    assert!(!state.submitted);
    assert_eq!(refresher.0.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn submit_without_file_fails_locally() {
    let server = MockServer::start().await;
    let uploader = sslctx_client::UploadSubmitter::new(
        client(&server),
        UPLOAD,
        Arc::new(CountingRefresh::default()),
    );

    let outcome = uploader.submit().await;
    assert!(matches!(outcome.error(), Some(SslContextError::NoFileSelected)));
}

#[tokio::test]
async fn credentials_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(APPROVED))
        .and(header("authorization", "Basic YWRtaW46c2VjcmV0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(collection(APPROVED, vec![])))
        .expect(1)
        .mount(&server)
        .await;

    let client = SslContextClient::builder(format!("{}/scm", server.uri()))
        .credentials(Credentials::basic("admin", "secret"))
        .build()
        .unwrap();

    let collection: CertificateCollection =
        client.certificates().collection(APPROVED).await.unwrap();
    assert!(collection.is_empty());
}

#[tokio::test]
async fn status_codes_map_to_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(APPROVED))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(REJECTED))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"message": "missing permission sslContext:read"})),
        )
        .mount(&server)
        .await;

    let client = client(&server);

    let unauthorized = client.certificates().collection(APPROVED).await.unwrap_err();
    assert!(matches!(unauthorized, SslContextError::Unauthorized));

    let forbidden = client.certificates().collection(REJECTED).await.unwrap_err();
    match forbidden {
        SslContextError::Forbidden(message) => {
            assert_eq!(message, "missing permission sslContext:read");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

fn approvable(fingerprint: &str) -> sslctx_core::Certificate {
    let href = format!("/scm/api/v2/ssl-context/approve/{fingerprint}/{fingerprint}");
    serde_json::from_value(certificate(
        fingerprint,
        "REJECTED",
        json!({"approve": {"href": href}}),
    ))
    .unwrap()
}

async fn mount_approve(server: &MockServer, fingerprint: &str, delay: Duration) {
    Mock::given(method("POST"))
        .and(path(format!("/scm/api/v2/ssl-context/approve/{fingerprint}/{fingerprint}")))
        .respond_with(ResponseTemplate::new(204).set_delay(delay))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn cancelled_action_releases_loading() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/scm/api/v2/ssl-context/approve/slow/slow"))
        .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_secs(2)))
        .expect(..=1)
        .mount(&server)
        .await;
    mount_approve(&server, "fast", Duration::ZERO).await;

    let refresher = Arc::new(CountingRefresh::default());
    let executor = TrustActionExecutor::new(client(&server), Arc::clone(&refresher));

    let cancelled =
        tokio::time::timeout(Duration::from_millis(50), executor.approve(&approvable("slow"))).await;
    assert!(cancelled.is_err());
    assert!(!executor.is_loading());

    let outcome = executor.approve(&approvable("fast")).await;
    assert!(outcome.is_success());
    assert!(!executor.is_loading());
    assert!(executor.state().error.is_none());
}

#[tokio::test]
async fn overlapping_actions_keep_loading_until_all_finish() {
    let server = MockServer::start().await;
    mount_approve(&server, "first", Duration::from_millis(200)).await;
    mount_approve(&server, "second", Duration::from_millis(400)).await;

    let refresher = Arc::new(CountingRefresh::default());
    let executor = TrustActionExecutor::new(client(&server), Arc::clone(&refresher));
    let (first, second) = (approvable("first"), approvable("second"));

    let observe = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        let both_running = executor.is_loading();
        tokio::time::sleep(Duration::from_millis(250)).await;
        let one_running = executor.is_loading();
        (both_running, one_running)
    };
    let (a, b, (both_running, one_running)) =
        tokio::join!(executor.approve(&first), executor.approve(&second), observe);

    assert!(a.is_success());
    assert!(b.is_success());
    assert!(both_running);
    assert!(one_running);
    assert!(!executor.is_loading());
    assert_eq!(refresher.0.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn upload_keeps_file_picked_while_in_flight() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(UPLOAD))
        .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_millis(200)))
        .expect(1)
        .mount(&server)
        .await;

    let refresher = Arc::new(CountingRefresh::default());
    let uploader =
        sslctx_client::UploadSubmitter::new(client(&server), UPLOAD, Arc::clone(&refresher));
    uploader.select(CertificateFile::new("first.der", vec![1; 16]));

    let pick_next = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        uploader.select(CertificateFile::new("second.der", vec![2; 16]));
    };
    let (outcome, ()) = tokio::join!(uploader.submit(), pick_next);

    assert!(outcome.is_success());
    let state = uploader.state();
    assert!(state.submitted);
    assert_eq!(state.file.unwrap().name, "second.der");
}
