//! Image store demonstration
//!
//! Fetches the image list once and prints a few records.
//!
//! Run with:
//! ```bash
//! cargo run -p core-gallery --features desktop-shims --example gallery_demo
//!
//! # Look up a specific identifier, with JSON logs
//! cargo run -p core-gallery --features desktop-shims --example gallery_demo -- 10 json
//! ```

use bridge_traits::logging::LogLevel;
use core_gallery::ImageStore;
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let wanted = args.get(1).cloned().unwrap_or_else(|| "0".to_string());
    let format = match args.get(2).map(String::as_str) {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        _ => LogFormat::Pretty,
    };

    init_logging(
        LoggingConfig::default()
            .with_format(format)
            .with_level(LogLevel::Debug),
    )?;

    let store = ImageStore::with_defaults()?;
    let mut state = store.subscribe();

    let fetch = tokio::spawn(store.fetch_images());
    while state.changed().await.is_ok() {
        let current = state.borrow_and_update().clone();
        println!(
            "loading={} images={} error={:?}",
            current.loading,
            current.images.len(),
            current.error
        );
        if !current.loading {
            break;
        }
    }
    fetch.await?;

    for image in store.images().iter().take(5) {
        println!(
            "{:>4}  {:<24} {}x{}",
            image.id,
            image.author.as_deref().unwrap_or("-"),
            image.width.unwrap_or_default(),
            image.height.unwrap_or_default()
        );
    }

    match store.get_image_by_id(&wanted) {
        Some(image) => println!(
            "image {}: {}",
            wanted,
            image.download_url.as_deref().unwrap_or("(no download url)")
        ),
        None => println!("image {} not found", wanted),
    }

    Ok(())
}
