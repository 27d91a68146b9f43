use helloworks::{Config, ConfigLocation, CreateInstance, HelloWorksClient, Participant};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), helloworks::Error> {
    let config = Config::load(ConfigLocation::Env).await?;
    let client = HelloWorksClient::new(config)?;

    let workflow_id = std::env::var("HW_TEST_WORKFLOW_ID")
        .map_err(|_| helloworks::Error::Config("Missing HW_TEST_WORKFLOW_ID env var".into()))?;
    let req = CreateInstance::new(workflow_id)
        .participant("signer", Participant::email("lauren@example.com", "Lauren Ipsum"));
    let instance = client.workflow_instances.create_instance(&req).await?;
    println!("created instance {}", instance.id);

    for step in client.workflow_instances.get_instance_steps(&instance.id).await? {
        println!("{} ({}): {}", step.participant, step.role, step.url);
    }

    client.workflow_instances.cancel_instance(&instance.id).await?;
    Ok(())
}
