use miette::{IntoDiagnostic, Result, miette};
use std::path::{Path, PathBuf};
use typewriter_common::{Config, FileStore};
use typewriter_common::telemetry::{self, TelemetryConfig};
use typewriter_core::{
    Alignment, ContentCodec, ContentFormat, Document, EditSession, EditorAction, FormatSelector,
    HeadingStyle, HtmlParser, HtmlWriter, Selection, SpanModel, import_document,
};

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(version, about = "Typewriter - rich text documents stored as HTML fragments", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to config file (.toml or .json)
    #[arg(long, global = true, env = "TYPEWRITER_CONFIG")]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a .txt, .rtf or .html file into a document
    Import {
        /// File to import
        source: PathBuf,

        /// Where to write the document JSON (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Serialize a document to the stored HTML fragment
    Render {
        /// Document JSON, or a file that can be imported
        source: PathBuf,

        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Show a document's text and attribute ranges
    Inspect {
        source: PathBuf,

        /// Report structured parse errors instead of falling back
        #[arg(long)]
        strict: bool,
    },
    /// Parse an HTML fragment and write it back out in canonical form
    Normalize {
        source: PathBuf,

        #[arg(short, long)]
        out: Option<PathBuf>,

        #[arg(long)]
        strict: bool,
    },
    /// Print the fragment a document embeds in a sharing page, and its fonts
    Fragment { source: PathBuf },
    /// Apply one formatting action to a span of a document
    Apply {
        source: PathBuf,

        /// Selection start (UTF-16 offset)
        #[arg(long)]
        start: usize,

        /// Selection end (UTF-16 offset)
        #[arg(long)]
        end: usize,

        #[arg(value_enum)]
        action: ActionArg,

        /// Font id, heading name, size factor or alignment, depending on the action
        value: Option<String>,

        /// Where to write the document JSON (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ActionArg {
    Bold,
    Italic,
    Font,
    Heading,
    Size,
    Align,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_miette();

    let cli = Cli::parse();

    let mut telemetry_config = TelemetryConfig::from_env("typewriter");
    if cli.verbose {
        telemetry_config = telemetry_config.with_level(tracing::Level::DEBUG);
    }
    telemetry::init(telemetry_config);

    let config = load_config(cli.config.as_deref()).await?;

    match cli.command {
        Some(Commands::Import { source, out }) => {
            let document = read_document(&source).await?;
            write_document(&document, out.as_deref()).await?;
        }
        Some(Commands::Render { source, out }) => {
            render(&config, &source, out.as_deref()).await?;
        }
        Some(Commands::Inspect { source, strict }) => {
            inspect(&config, &source, strict).await?;
        }
        Some(Commands::Normalize {
            source,
            out,
            strict,
        }) => {
            normalize(&config, &source, out.as_deref(), strict).await?;
        }
        Some(Commands::Fragment { source }) => {
            fragment(&config, &source).await?;
        }
        Some(Commands::Apply {
            source,
            start,
            end,
            action,
            value,
            out,
        }) => {
            let action = editor_action(action, value.as_deref())?;
            apply(&config, &source, Selection::new(start, end), action, out.as_deref()).await?;
        }
        None => {
            println!("Typewriter v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'typewriter --help' for usage");
        }
    }

    Ok(())
}

async fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path.map(Path::to_path_buf).or_else(Config::default_path) else {
        tracing::debug!("no config directory, using defaults");
        return Ok(Config::default());
    };
    Ok(Config::load(&FileStore::new(path)).await?)
}

/// Document JSON is read as-is; anything else goes through the importer.
async fn read_document(source: &Path) -> Result<Document> {
    let contents = tokio::fs::read_to_string(source)
        .await
        .into_diagnostic()?;
    let file_name = source
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| miette!("Not a file: {}", source.display()))?;

    if source.extension().and_then(|ext| ext.to_str()) == Some("json") {
        return serde_json::from_str(&contents).into_diagnostic();
    }
    Ok(import_document(file_name, &contents)?)
}

async fn write_output(contents: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await.into_diagnostic()?;
            }
            tokio::fs::write(path, contents).await.into_diagnostic()?;
            println!("✓ Output: {}", path.display());
        }
        None => println!("{contents}"),
    }
    Ok(())
}

async fn write_document(document: &Document, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(document).into_diagnostic()?;
    write_output(&json, out).await
}

fn open_model(config: &Config, document: &Document, strict: bool) -> Result<SpanModel> {
    if strict && document.has_formatting() {
        let model = HtmlParser::new(config.font_catalog())
            .with_indent_width(config.indent_width)
            .parse_structured(document.display_content())?;
        return Ok(model);
    }
    Ok(document.open(config.font_catalog(), config.indent_width))
}

async fn render(config: &Config, source: &Path, out: Option<&Path>) -> Result<()> {
    let document = read_document(source).await?;
    let model = open_model(config, &document, false)?;
    let html = HtmlWriter::new(&model, config.font_catalog())
        .with_image_resolver(config.image_resolver())
        .run();
    write_output(&html, out).await
}

async fn inspect(config: &Config, source: &Path, strict: bool) -> Result<()> {
    let document = read_document(source).await?;
    let model = open_model(config, &document, strict)?;

    println!("{} ({})", document.title, document.format);
    println!(
        "  {} words, {} characters, {} paragraphs",
        document.word_count(),
        document.char_count(),
        model.paragraphs().len()
    );
    println!("{:?}", model.text().to_string());
    for range in model.ranges() {
        println!(
            "  {:>6}..{:<6} {:?}",
            range.start, range.end, range.attribute
        );
    }
    Ok(())
}

async fn normalize(config: &Config, source: &Path, out: Option<&Path>, strict: bool) -> Result<()> {
    let html = tokio::fs::read_to_string(source).await.into_diagnostic()?;
    let mut document = Document::new("normalize", "");
    document.format = ContentFormat::Html;
    document.formatted_text = Some(html);

    let model = open_model(config, &document, strict)?;
    let codec = FormatSelector::new(config.font_catalog())
        .with_indent_width(config.indent_width)
        .codec(ContentFormat::Html);
    write_output(&codec.encode(&model), out).await
}

async fn fragment(config: &Config, source: &Path) -> Result<()> {
    let document = read_document(source).await?;
    let fonts = config.font_catalog();
    let codec = FormatSelector::new(fonts)
        .with_indent_width(config.indent_width)
        .codec(document.format);
    let fragment = codec.to_fragment(document.display_content());

    println!("{fragment}");
    for font in fonts.used_fonts(&fragment) {
        println!("→ font {} ({})", font.id, font.css_family());
    }
    Ok(())
}

fn editor_action(action: ActionArg, value: Option<&str>) -> Result<EditorAction> {
    let require = |what: &str| value.ok_or_else(|| miette!("The {what} action needs a value"));
    Ok(match action {
        ActionArg::Bold => EditorAction::ToggleBold,
        ActionArg::Italic => EditorAction::ToggleItalic,
        ActionArg::Font => EditorAction::SetFont(require("font")?.into()),
        ActionArg::Heading => {
            let name = require("heading")?;
            let style = HeadingStyle::from_name(name).ok_or_else(|| {
                miette!(
                    help = "one of: body, title, subtitle, chapter",
                    "Unknown heading style: {name}"
                )
            })?;
            EditorAction::SetHeading(style)
        }
        ActionArg::Size => {
            let factor: f32 = require("size")?.parse().into_diagnostic()?;
            EditorAction::SetSize(factor)
        }
        ActionArg::Align => {
            let name = require("align")?;
            let alignment = Alignment::from_attr(name).ok_or_else(|| {
                miette!(
                    help = "one of: left, center, right, justify",
                    "Unknown alignment: {name}"
                )
            })?;
            EditorAction::Align(alignment)
        }
    })
}

async fn apply(
    config: &Config,
    source: &Path,
    selection: Selection,
    action: EditorAction,
    out: Option<&Path>,
) -> Result<()> {
    let mut document = read_document(source).await?;

    let snapshot = {
        let mut session = EditSession::open(&document, config.font_catalog(), config.indent_width)
            .with_image_resolver(config.image_resolver())
            .with_heading_presets(config.headings);
        session.select(selection);
        session.execute(action)?;
        session.snapshot()
    };
    document.apply_snapshot(&snapshot);

    write_document(&document, out).await
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .expect("couldn't set the miette hook");
    miette::set_panic_hook();
}
