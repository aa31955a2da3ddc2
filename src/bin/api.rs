pub use teams2go::api::handler;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    teams2go::setup_logging();
    lambda_runtime::run(lambda_runtime::service_fn(handler)).await
}
