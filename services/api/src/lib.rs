mod cli;
mod infra;
mod offline;
mod routes;
mod server;

use stroke_risk::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
