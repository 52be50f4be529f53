//! Fetch one random photo and one categorised photo, saving both.
//!
//! Needs `API_KEY=...` in `.env` (or `UNSPLASH_API_KEY` in the environment).
//!
//! ```bash
//! cargo run --example random_photo -- cats
//! ```

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use unsplash_random::{Config, RandomImageClient};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "unsplash_random=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let category = std::env::args().nth(1).unwrap_or_else(|| "nature".to_string());

    let config = Config::default();
    let credentials = config.credential_source();
    let mut client = RandomImageClient::new(config, credentials)?;

    client.init().await?;
    println!("{}", client);
    if let Some(dimension) = client.image_dimensions() {
        println!("Random photo is {}", dimension);
    }
    println!("JSON cached at {}", client.save_metadata_json()?.display());
    println!("Image saved to {}", client.save_image_jpeg(None).await?.display());

    client.reset();

    client.init_with_category(&category).await?;
    println!("{}", client);
    println!("Download link: {}", client.download_link().unwrap_or("<none>"));
    println!("Image saved to {}", client.save_image_jpeg(None).await?.display());

    Ok(())
}
