mod allocate;
mod cli;
mod infra;
mod routes;
mod server;

use bed_allocator::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
