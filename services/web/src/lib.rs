mod cli;
mod commands;
mod infra;
mod pages;
mod routes;
mod server;
mod views;

use credium::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
