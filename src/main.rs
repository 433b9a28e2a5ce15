use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    wttr_gateway::infra::logging::init();
    wttr_gateway::cli::run().await
}
