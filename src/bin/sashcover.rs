use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sashcover::{
    Compositor, DesignGenerator as _, EncodedImage, GeminiClient, GeminiConfig, GenerationRequest,
    ImageSource, SheetOpts,
};

#[derive(Parser, Debug)]
#[command(name = "sashcover", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the sample two-sash window as a JPEG.
    Sample(SampleArgs),
    /// Compose a before/after presentation sheet.
    Sheet(SheetArgs),
    /// Flatten the before/after slider at a given position.
    Reveal(RevealArgs),
    /// Restyle a window photo with the remote model (needs GEMINI_API_KEY).
    Generate(GenerateArgs),
    /// Print the texture and color catalogs as JSON.
    Catalog(CatalogArgs),
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Output JPEG path.
    #[arg(long, default_value = "sample-window.jpg")]
    out: PathBuf,

    /// Print the image as a data URI on stdout instead of writing a file.
    #[arg(long, default_value_t = false)]
    data_uri: bool,
}

#[derive(Parser, Debug)]
struct SheetArgs {
    /// Before image: path, URL or data URI.
    #[arg(long)]
    before: String,

    /// After image: path, URL or data URI.
    #[arg(long)]
    after: String,

    /// Texture id from the catalog, or a free-form label.
    #[arg(long)]
    texture: String,

    /// Color id from the catalog, or a free-form label.
    #[arg(long)]
    color: String,

    /// Output JPEG path. Defaults to the catalog download name.
    #[arg(long)]
    out: Option<PathBuf>,

    /// JSON file overriding sheet texts or JPEG quality.
    #[arg(long)]
    opts: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RevealArgs {
    #[arg(long)]
    before: String,

    #[arg(long)]
    after: String,

    /// Divider position in percent of the width; the after image is on the left.
    #[arg(long, default_value_t = 50.0)]
    position: f64,

    #[arg(long, default_value = "reveal.jpg")]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Window photo: path, URL or data URI. Uses the sample window when omitted.
    #[arg(long)]
    image: Option<String>,

    /// Color id from the catalog.
    #[arg(long)]
    color: String,

    /// Texture id from the catalog.
    #[arg(long)]
    texture: String,

    /// Output path for the generated design. Defaults to the catalog download name.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Also write a presentation sheet to this path.
    #[arg(long)]
    sheet: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CatalogArgs {
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Sample(args) => cmd_sample(args),
        Command::Sheet(args) => cmd_sheet(args).await,
        Command::Reveal(args) => cmd_reveal(args).await,
        Command::Generate(args) => cmd_generate(args).await,
        Command::Catalog(args) => cmd_catalog(args),
    }
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let img = sashcover::render_synthetic_window().context("render sample window")?;
    if args.data_uri {
        println!("{}", img.to_data_uri());
        return Ok(());
    }
    img.save(&args.out)
        .with_context(|| format!("write '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

async fn cmd_sheet(args: SheetArgs) -> anyhow::Result<()> {
    let opts = match &args.opts {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("read sheet options '{}'", path.display()))?;
            SheetOpts::from_json(&json)?
        }
        None => SheetOpts::default(),
    };
    let (texture_label, texture_id) = texture_label(&args.texture);
    let color = color_label(&args.color);

    let mut compositor = Compositor::new()?.with_opts(opts);
    let sheet = compositor
        .compose_sheet(
            &ImageSource::parse(&args.before),
            &ImageSource::parse(&args.after),
            &texture_label,
            &color,
        )
        .await
        .context("compose sheet")?;

    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(sashcover::sheet_file_name(&texture_id)));
    sheet
        .save(&out)
        .with_context(|| format!("write '{}'", out.display()))?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

async fn cmd_reveal(args: RevealArgs) -> anyhow::Result<()> {
    let http = sashcover::http_client()?;
    let (before, after) = sashcover::decode_pair(
        &http,
        &ImageSource::parse(&args.before),
        &ImageSource::parse(&args.after),
    )
    .await?;
    let img = sashcover::reveal_composite(&before, &after, args.position)?;
    img.save(&args.out)
        .with_context(|| format!("write '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

async fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let color = sashcover::color_by_id(&args.color)
        .with_context(|| format!("unknown color id '{}'", args.color))?;
    let texture = sashcover::texture_by_id(&args.texture)
        .with_context(|| format!("unknown texture id '{}'", args.texture))?;

    let http = sashcover::http_client()?;
    let (source, photo) = match &args.image {
        Some(s) => {
            let source = ImageSource::parse(s);
            let bytes = source.load_bytes(&http).await?;
            let mime = image::guess_format(&bytes)
                .map(|f| f.to_mime_type())
                .context("input is not a recognized image format")?;
            (source, EncodedImage::new(mime, bytes))
        }
        None => {
            let sample = sashcover::render_synthetic_window().context("render sample window")?;
            (
                ImageSource::Bytes(sample.encoded.bytes.clone()),
                sample.encoded,
            )
        }
    };

    let client = GeminiClient::new(GeminiConfig::from_env()?)?;
    let req = GenerationRequest::from_catalog(photo, color, texture);
    let design = client.generate(&req).await.context("generate design")?;

    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(sashcover::design_file_name(color.id, texture.id)));
    std::fs::write(&out, &design.bytes)
        .with_context(|| format!("write '{}'", out.display()))?;
    eprintln!("wrote {}", out.display());

    if let Some(sheet_path) = args.sheet {
        let mut compositor = Compositor::new()?.with_http_client(http);
        let sheet = compositor
            .compose_sheet(
                &source,
                &ImageSource::Bytes(design.bytes),
                texture.name,
                color.name,
            )
            .await
            .context("compose sheet")?;
        sheet
            .save(&sheet_path)
            .with_context(|| format!("write '{}'", sheet_path.display()))?;
        eprintln!("wrote {}", sheet_path.display());
    }
    Ok(())
}

fn cmd_catalog(args: CatalogArgs) -> anyhow::Result<()> {
    let doc = serde_json::json!({
        "textures": sashcover::TEXTURES,
        "colors": sashcover::COLORS,
    });
    let text = if args.pretty {
        serde_json::to_string_pretty(&doc)?
    } else {
        serde_json::to_string(&doc)?
    };
    println!("{text}");
    Ok(())
}

/// Catalog name and id for a texture argument; unknown values are used verbatim.
fn texture_label(arg: &str) -> (String, String) {
    match sashcover::texture_by_id(arg) {
        Some(t) => (t.name.to_string(), t.id.to_string()),
        None => (arg.to_string(), arg.to_string()),
    }
}

fn color_label(arg: &str) -> String {
    sashcover::color_by_id(arg)
        .map(|c| c.name.to_string())
        .unwrap_or_else(|| arg.to_string())
}
