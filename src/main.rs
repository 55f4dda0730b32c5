use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use snap_prep::presets::UploadPreset;

use nutri_snap::config::AnalyzeConfig;
use nutri_snap::inference::GeminiClient;
use nutri_snap::normalize::RawImage;
use nutri_snap::session::{AnalysisSession, SessionState};

/// Snap a food label, get a nutrition report:
/// - photos are shrunk and recompressed locally before upload
/// - the analysis itself runs on a generative vision model
#[derive(Parser, Debug)]
#[command(name = "nsnap")]
#[command(about = "🥗 Analyze packaged-food photos into a nutrition report")]
#[command(long_about = "Analyze photos of a packaged food product (front, nutrition table, \
ingredient list) into a nutrition report. Photos are resized and recompressed locally to keep \
uploads small while label text stays readable to the model.")]
struct Args {
    /// Photo files to analyze together (front + nutrition table + ingredients)
    #[arg(required = true, help = "Photo files analyzed together as one product")]
    images: Vec<PathBuf>,

    /// Upload budget preset
    #[arg(short, long, value_enum, default_value_t = UploadPreset::Balanced,
          help = "Upload budget: fast (small), balanced (production default), crisp (small print)")]
    preset: UploadPreset,

    /// Override the preset's width bound in pixels
    #[arg(long, help = "Width bound override in pixels")]
    max_width: Option<u32>,

    /// Override the preset's JPEG quality factor
    #[arg(long, help = "JPEG quality override, 0.0 < q <= 1.0")]
    quality: Option<f32>,

    /// Inference model identifier
    #[arg(short, long, help = "Inference model to use (default: gemini-2.5-flash)")]
    model: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long, default_value_t = 30, help = "Per-request timeout in seconds")]
    timeout: u64,

    /// API key (falls back to the GEMINI_API_KEY environment variable)
    #[arg(long, help = "API key; GEMINI_API_KEY is used when omitted")]
    api_key: Option<String>,

    /// Print the raw report JSON instead of the rendered card
    #[arg(long, help = "Print the raw report JSON")]
    json: bool,

    /// Also save the rendered card (or JSON with --json) to a file
    #[arg(short, long, help = "Save the output to this path as well")]
    save: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = AnalyzeConfig::from_preset(args.preset);
    if let Some(max_width) = args.max_width {
        config.normalize.max_width = max_width;
    }
    if let Some(quality) = args.quality {
        config.normalize.quality = quality;
    }
    if let Some(model) = args.model {
        config.model = model;
    }
    config.api_key = args.api_key;
    config.timeout_secs = args.timeout;
    config.validate()?;

    let client = Arc::new(GeminiClient::new(&config)?);

    let mut session = AnalysisSession::new(config)?;
    for path in &args.images {
        let bytes = std::fs::read(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
        session.add_image(RawImage::new(bytes, mime_for_path(path)))?;
    }

    println!("Analyzing {} photo(s) …", args.images.len());
    let task = session.start(client)?;
    let outcome = task.join().await;
    session.finish(outcome);

    let snapshot = session.snapshot();
    let report = match snapshot.state {
        SessionState::Done => snapshot
            .report
            .ok_or_else(|| anyhow::anyhow!("analysis finished without a report"))?,
        SessionState::Failed { message } => {
            eprintln!("✗ {}", message);
            std::process::exit(1);
        }
        other => anyhow::bail!("analysis ended in unexpected state: {:?}", other),
    };

    let output = if args.json {
        serde_json::to_string_pretty(&report)?
    } else {
        nutri_snap::report::render(&report)
    };

    println!("{}", output);

    if let Some(path) = args.save {
        std::fs::write(&path, &output)
            .map_err(|e| anyhow::anyhow!("cannot write {}: {}", path.display(), e))?;
        println!("✓ Saved report to {}", path.display());
    }

    Ok(())
}

/// Declared media type from the file extension. Informational only; the
/// normalizer sniffs the real format from the bytes.
fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}
