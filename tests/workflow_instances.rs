mod common;

use helloworks::{CreateInstance, Error, Participant, USER_AGENT};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{ManualClock, START, client, mount_token};

async fn setup() -> (MockServer, helloworks::HelloWorksClient) {
    let server = MockServer::start().await;
    mount_token(&server, "abc", START + 3600, 1).await;
    let client = client(&server, ManualClock::new(START));
    (server, client)
}

#[tokio::test]
async fn create_instance_posts_multipart_form() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/v3/workflow_instances"))
        .and(header("Authorization", "Bearer abc"))
        .and(header("User-Agent", USER_AGENT))
        .and(body_string_contains("name=\"workflow_id\""))
        .and(body_string_contains("name=\"participants[prospectEmp][full_name]\""))
        .and(body_string_contains("Lauren Ipsum"))
        .and(body_string_contains("name=\"document_delivery\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "id": "AbCdEfGhIjKlMnOp", "workflow_id": "wf1", "status": "active" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let req = CreateInstance::new("wf1")
        .participant(
            "prospectEmp",
            Participant::email("lauren@example.com", "Lauren Ipsum"),
        )
        .merge_field("signerName_28XkWu", "Lauren Ipsum")
        .callback_url("https://example.com/callback")
        .document_delivery(true);
    let instance = client
        .workflow_instances
        .create_instance(&req)
        .await
        .expect("created");
    assert_eq!(instance.id, "AbCdEfGhIjKlMnOp");
    assert_eq!(instance.workflow_id, "wf1");
}

#[tokio::test]
async fn create_instance_without_workflow_id_reports_api_message() {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/v3/workflow_instances"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "error": "Required parameter: 'workflow_id'" })),
        )
        .mount(&server)
        .await;

    let req = CreateInstance::default()
        .participant("signer", Participant::email("lauren@example.com", "Lauren Ipsum"));
    let err = client
        .workflow_instances
        .create_instance(&req)
        .await
        .expect_err("should fail");
    assert_eq!(err.to_string(), "Required parameter: 'workflow_id'");
    assert!(!err.is_auth());
}

#[tokio::test]
async fn get_instance_strips_data_envelope() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/v3/workflow_instances/done1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "done1",
                "workflow_id": "wf1",
                "status": "completed",
                "document_hashes": { "doc9": "deadbeef" }
            }
        })))
        .mount(&server)
        .await;

    let instance = client
        .workflow_instances
        .get_instance("done1")
        .await
        .unwrap();
    assert!(instance.is_completed());
    assert_eq!(instance.document_ids().collect::<Vec<_>>(), vec!["doc9"]);
}

#[tokio::test]
async fn get_instance_steps_decodes_list() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/v3/workflow_instances/inst1/steps"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "step": "step1",
                "role": "prospectEmp",
                "participant": "Lauren Ipsum",
                "url": "https://example.com/step1"
            }]
        })))
        .mount(&server)
        .await;

    let steps = client
        .workflow_instances
        .get_instance_steps("inst1")
        .await
        .unwrap();
    assert_eq!(steps.len(), 1);
    assert_eq!(steps[0].participant, "Lauren Ipsum");
}

#[tokio::test]
async fn audit_trail_and_document_return_raw_bytes() {
    let (server, client) = setup().await;
    let pdf = b"%PDF-1.7\n...".to_vec();
    Mock::given(method("GET"))
        .and(path("/v3/workflow_instances/done1/audit_trail"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(pdf.clone(), "application/pdf"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/workflow_instances/done1/documents/doc9"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(pdf.clone(), "application/pdf"))
        .mount(&server)
        .await;

    let trail = client
        .workflow_instances
        .get_instance_audit_trail("done1")
        .await
        .unwrap();
    let doc = client
        .workflow_instances
        .get_instance_document("done1", "doc9")
        .await
        .unwrap();
    assert_eq!(trail, pdf);
    assert_eq!(doc, pdf);
}

#[tokio::test]
async fn binary_endpoint_failure_uses_same_error_shape() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/v3/workflow_instances/inst1/audit_trail"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "error": "Document not ready yet" })),
        )
        .mount(&server)
        .await;

    let err = client
        .workflow_instances
        .get_instance_audit_trail("inst1")
        .await
        .expect_err("should fail");
    match err {
        Error::Api { status, message } => {
            assert_eq!(status, StatusCode::CONFLICT);
            assert_eq!(message, "Document not ready yet");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn cancel_instance_uses_put_and_reports_repeat_cancel() {
    let (server, client) = setup().await;
    Mock::given(method("PUT"))
        .and(path("/v3/workflow_instances/inst1/cancel"))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/v3/workflow_instances/inst1/cancel"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "error": "Workflow instance has been cancelled" })),
        )
        .mount(&server)
        .await;

    client
        .workflow_instances
        .cancel_instance("inst1")
        .await
        .expect("first cancel");
    let err = client
        .workflow_instances
        .cancel_instance("inst1")
        .await
        .expect_err("second cancel");
    assert_eq!(err.message(), Some("Workflow instance has been cancelled"));
}

#[tokio::test]
async fn path_segments_are_percent_encoded() {
    let (server, client) = setup().await;
    Mock::given(method("GET"))
        .and(path("/v3/workflow_instances/a%2Fb"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = client
        .workflow_instances
        .get_instance("a/b")
        .await
        .expect_err("not found");
    assert_eq!(err.message(), Some("Not Found"));
}

#[tokio::test]
async fn empty_ids_are_rejected_before_any_request() {
    let server = MockServer::start().await;
    mount_token(&server, "abc", START + 3600, 0).await;
    let client = client(&server, ManualClock::new(START));

    let err = client
        .workflow_instances
        .get_instance("")
        .await
        .expect_err("empty instance id");
    match err {
        Error::Config(msg) => assert!(msg.contains("instance_id")),
        other => panic!("unexpected error: {:?}", other),
    }
    let err = client
        .workflow_instances
        .get_instance_document("done1", "")
        .await
        .expect_err("empty document id");
    assert!(matches!(err, Error::Config(_)), "got {:?}", err);

    let requests = server.received_requests().await.expect("recording on");
    assert!(requests.is_empty(), "no request may leave: {:?}", requests);
}
