//! Walks the outbound-link click contract outside a browser: a recording
//! navigation surface stands in for `window.location`.

use std::sync::Arc;

use entrolytics_rs_sdk::analytics::{Entrolytics, EntrolyticsConfig, EventData};
use entrolytics_rs_sdk::outbound::{
    anchor_attributes, handle_outbound_click, LinkDescriptor, NavigationFrame, NavigationSurface,
    PointerClick,
};
use serde_json::json;

struct PrintSurface;

impl NavigationSurface for PrintSurface {
    fn has_top_frame(&self) -> bool {
        false
    }

    fn assign(&self, frame: NavigationFrame, href: &str) {
        println!("navigate ({frame:?}) -> {href}");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = EntrolyticsConfig::new("your-website-id", "https://analytics.example.com");
    let client = Entrolytics::new(config)?;
    client.connect()?;
    client.set_collection_enabled(false); // keep the demo offline

    let link = LinkDescriptor::new("https://stripe.com")
        .with_data(EventData::from([(
            "context".to_string(),
            json!("pricing"),
        )]))
        .with_on_click(Arc::new(|click| {
            println!("user on_click saw button {}", click.button);
        }));

    println!("anchor attributes:");
    for (name, value) in anchor_attributes(&link, client.config()) {
        println!("  {name}={value}");
    }

    let plain = PointerClick::primary();
    let outcome = handle_outbound_click(&client, &PrintSurface, &link, &plain).await;
    println!("plain click -> {outcome:?}");

    let new_tab = PointerClick::primary().with_ctrl();
    let outcome = handle_outbound_click(&client, &PrintSurface, &link, &new_tab).await;
    println!("ctrl click -> {outcome:?}");

    Ok(())
}
