use std::sync::Arc;

use reqwest::Method;
use tracing::info;

use crate::errors::Error;
use crate::request::{RequestBody, RequestOptions};
use crate::session::Session;
use crate::types::{CreateInstance, Step, WorkflowInstance};

const BASE_PATH: &str = "/workflow_instances";

fn segment<'a>(name: &str, id: &'a str) -> Result<std::borrow::Cow<'a, str>, Error> {
    if id.is_empty() {
        return Err(Error::Config(format!("{} must not be empty", name)));
    }
    Ok(urlencoding::encode(id))
}

fn instance_path(instance_id: &str, suffix: &str) -> Result<String, Error> {
    Ok(format!(
        "{}/{}{}",
        BASE_PATH,
        segment("instance_id", instance_id)?,
        suffix
    ))
}

#[derive(Clone)]
pub struct WorkflowInstancesApi {
    session: Arc<Session>,
}

impl WorkflowInstancesApi {
    pub(crate) fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    pub async fn create_instance(&self, req: &CreateInstance) -> Result<WorkflowInstance, Error> {
        let options = RequestOptions::new(Method::POST).body(RequestBody::Multipart(req.to_form()));
        let instance: WorkflowInstance = self
            .session
            .send_authenticated_request(BASE_PATH, options)
            .await?
            .data()
            .await?;
        info!(
            instance_id = %instance.id,
            workflow_id = %instance.workflow_id,
            "workflow instance created"
        );
        Ok(instance)
    }

    pub async fn get_instance(&self, instance_id: &str) -> Result<WorkflowInstance, Error> {
        self.session
            .send_authenticated_request(&instance_path(instance_id, "")?, RequestOptions::default())
            .await?
            .data()
            .await
    }

    pub async fn get_instance_steps(&self, instance_id: &str) -> Result<Vec<Step>, Error> {
        self.session
            .send_authenticated_request(
                &instance_path(instance_id, "/steps")?,
                RequestOptions::default(),
            )
            .await?
            .data()
            .await
    }

    /// Audit trail as PDF bytes.
    pub async fn get_instance_audit_trail(&self, instance_id: &str) -> Result<Vec<u8>, Error> {
        self.session
            .send_authenticated_request(
                &instance_path(instance_id, "/audit_trail")?,
                RequestOptions::default(),
            )
            .await?
            .bytes()
            .await
    }

    /// A generated document as PDF bytes.
    pub async fn get_instance_document(
        &self,
        instance_id: &str,
        document_id: &str,
    ) -> Result<Vec<u8>, Error> {
        let suffix = format!("/documents/{}", segment("document_id", document_id)?);
        self.session
            .send_authenticated_request(
                &instance_path(instance_id, &suffix)?,
                RequestOptions::default(),
            )
            .await?
            .bytes()
            .await
    }

    pub async fn cancel_instance(&self, instance_id: &str) -> Result<(), Error> {
        self.session
            .send_authenticated_request(
                &instance_path(instance_id, "/cancel")?,
                RequestOptions::new(Method::PUT),
            )
            .await?;
        info!(instance_id, "workflow instance cancelled");
        Ok(())
    }
}
