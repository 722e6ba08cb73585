mod apply;
mod cli;
mod fields;
mod present;
mod prompt;
mod validate;

use credit_intake::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
