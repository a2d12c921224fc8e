//! One-shot pipeline commands

use std::sync::Arc;

use tracing::info;

use crate::infrastructure::http_client::{HttpClient, HttpClientTrait};

/// Train the model once and print the artifact path
pub async fn train() -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let http: Arc<dyn HttpClientTrait> = Arc::new(HttpClient::new());
    let services = crate::build_services(&config, http).await?;

    let model_path = services.pipeline.train().await?;
    info!(model_path = %model_path, "Training finished");
    println!("{}", model_path);

    Ok(())
}

/// Print the accuracy of the persisted model on the test partition
pub async fn evaluate() -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let http: Arc<dyn HttpClientTrait> = Arc::new(HttpClient::new());
    let services = crate::build_services(&config, http).await?;

    let evaluation = services.pipeline.evaluate().await?;
    println!(
        "accuracy: {:.4} ({} test rows)",
        evaluation.accuracy, evaluation.test_size
    );

    Ok(())
}
