use crate::config::Config;
use crate::services::ImageService;

pub async fn cmd_image(config: &Config, prompt: &str) -> anyhow::Result<()> {
    let service = ImageService::from_config(&config.image)?;
    let response = service.generate(prompt).await;

    println!("Prompt: {}", response.prompt);
    println!("{:-<70}", "");

    for image in &response.images {
        if image.url.starts_with("data:") {
            println!("• [inline image, {} bytes] ({})", image.url.len(), image.meta.provider);
        } else {
            println!("• {} ({})", image.url, image.meta.provider);
        }
    }

    Ok(())
}
