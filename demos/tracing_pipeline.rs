//! Example: run the attribute processor with structured logging.
//!
//! The processor logs compilation at `info`, rejected configuration at
//! `warn` and every runtime no-op at `debug`. Install any `tracing`
//! subscriber to see them.
//!
//! To run:
//! ```bash
//! RUST_LOG=attrproc_core=debug cargo run --example tracing_pipeline
//! ```

use std::error::Error;

use attrproc_core::{AttributeProcessor, Attributes, ClientInfo};
use tracing_subscriber::EnvFilter;

const CONFIG: &str = r#"
{
    "actions": [
        { "key": "tenant", "action": "insert", "from_context": "auth.tenant" },
        { "key": "client", "action": "upsert", "from_context": "metadata.user-agent" },
        { "key": "http.target", "action": "extract",
          "pattern": "^/api/(?P<api.version>v[0-9]+)/(?P<api.resource>[a-z]+)/.*$" },
        { "key": "user.email", "action": "hash" },
        { "key": "http.status_code", "action": "convert", "converted_type": "string" },
        { "key": "db.statement", "action": "delete" }
    ]
}
"#;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let processor = AttributeProcessor::new_from_str(CONFIG)?;

    let ctx = ClientInfo::new()
        .with_metadata("User-Agent", "curl/8.5")
        .with_auth("tenant", "acme");

    let records = vec![
        Attributes::new()
            .with_attr("http.target", "/api/v2/orders/42")
            .with_attr("user.email", "alice@example.com")
            .with_attr("http.status_code", 200_i64)
            .with_attr("db.statement", "SELECT * FROM orders"),
        Attributes::new()
            .with_attr("tenant", "preset")
            .with_attr("http.target", "/healthz"),
    ];

    for mut attrs in records {
        let stats = processor.process_with_stats(&ctx, &mut attrs);
        println!(
            "{} (applied: {}, skipped: {})",
            serde_json::to_string_pretty(&attrs)?,
            stats.applied,
            stats.skipped
        );
    }

    Ok(())
}
