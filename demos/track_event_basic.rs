//! Minimal example that records events locally without a reachable
//! ingestion server. Replace the placeholders with your Entrolytics site
//! details to dispatch for real.

use entrolytics_rs_sdk::analytics::{EntrolyticsConfig, EventData, PageViewOptions};
use entrolytics_rs_sdk::context::init_entrolytics;
use serde_json::json;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = EntrolyticsConfig::new(
        "your-website-id",
        "https://analytics.example.com",
    );
    let client = init_entrolytics(config, None)?;
    client.set_collection_enabled(false); // record locally, skip the network

    client
        .track_page_view(PageViewOptions::new("https://example.com/pricing"))
        .await?;

    let data = EventData::from([("plan".to_string(), json!("pro"))]);
    client.track_event("signup", Some(data), None).await?;

    for recorded in client.recorded_payloads() {
        println!(
            "Recorded {} payload: {}",
            recorded.envelope.payload_type.as_str(),
            recorded.envelope.payload
        );
    }

    Ok(())
}
