use std::error::Error;

use crate::api::HttpGenerationBackend;

/// Probes `GET /health` and prints what the server reports.
pub async fn run_health(client: reqwest::Client, base_url: String) -> Result<(), Box<dyn Error>> {
    let backend = HttpGenerationBackend::new(client, base_url);
    match backend.check_health().await {
        Ok(status) => {
            println!("✅ {} is up (status: {status})", backend.base_url());
            Ok(())
        }
        Err(err) => {
            eprintln!("❌ {} is not reachable: {err}", backend.base_url());
            std::process::exit(1);
        }
    }
}
