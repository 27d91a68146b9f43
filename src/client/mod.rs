use std::sync::Arc;

use crate::endpoints::{TokenApi, WorkflowInstancesApi};
use crate::session::Session;

mod impls;

/// HelloWorks API client. Clones share one session and therefore one token.
#[derive(Clone)]
pub struct HelloWorksClient {
    session: Arc<Session>,
    pub token: TokenApi,
    pub workflow_instances: WorkflowInstancesApi,
}
