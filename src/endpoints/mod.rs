pub mod token;
pub mod workflow_instances;

pub use token::TokenApi;
pub use workflow_instances::WorkflowInstancesApi;
