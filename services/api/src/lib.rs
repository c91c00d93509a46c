mod cli;
mod infra;
mod routes;
mod server;
mod simulate;

use mission17::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
