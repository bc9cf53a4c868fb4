//! Movies API Gateway Lambda
//!
//! Handles requests from the HTTP API and writes one movie per invocation
//! to the table named by `TABLE_NAME`.

mod handler;

use handler::MovieHandler;
use lambda_http::{run, service_fn, Error as LambdaError};
use movies_core::{logging, Config, DynamoClient, TracingSecurityLog};

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    let config = Config::from_env()?;
    logging::init(config.log_format);

    let store = DynamoClient::from_config(&config).await;
    let handler = MovieHandler::new(config, store, TracingSecurityLog);

    run(service_fn(|event| handler.handle(event))).await
}
