mod cli;
mod commands;
mod demo;
mod infra;

use freight_ops::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
