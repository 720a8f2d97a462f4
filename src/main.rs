use clap::Parser;

mod cli;
mod config;
mod deps;
mod errors;
mod exec;
mod log;
mod parse;
mod pipeline;
mod prompt;
mod provider;
mod retrieval;
mod scaffold;
mod ux;
mod wire;

use provider::openai::OpenAiProvider;
use retrieval::{OpenAiEmbedder, SqliteVectorIndex};
use wire::GenerationRequest;

/// The fixed demo sequence: an entity-management service and a mail-sending
/// service, generated one after the other.
fn example_requests() -> Vec<GenerationRequest> {
    vec![
        GenerationRequest {
            entity_name: "UserService".into(),
            method_list: "create,delete,update,read".into(),
            requirement: "Create a user management service. A user has a name, an email and an age.".into(),
            orm_name: "mongoose".into(),
            connection_url: "mongodb://localhost:27017/users".into(),
        },
        GenerationRequest {
            entity_name: "EmailService".into(),
            method_list: "sendMail".into(),
            requirement: "Create a service that sends an email with a subject and a text body to a given address.".into(),
            orm_name: String::new(),
            connection_url: String::new(),
        },
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    // Credential is a precondition: resolved and validated here, before any
    // network call or subprocess.
    let mut cfg = config::Config::from_env()?;
    args.apply(&mut cfg);

    let provider = Box::new(OpenAiProvider::new(&cfg));
    let embedder = OpenAiEmbedder::new(&cfg);
    let retriever = Box::new(SqliteVectorIndex::open(&cfg, embedder));

    let pipeline = pipeline::Pipeline::new(cfg, provider, retriever);

    // Strictly sequential: one entity's full pipeline, installs included,
    // completes before the next begins. The first failure stops the run.
    for req in example_requests() {
        match pipeline.create_project(&req).await {
            Ok(report) => ux::print_run_dashboard(&report),
            Err(err) => {
                ux::print_failure(&req.entity_name, &err);
                return Err(err);
            }
        }
    }

    Ok(())
}
