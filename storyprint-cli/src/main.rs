use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use storyprint::story::{portrait_prompt, story_prompt, STORY_USER_MESSAGE};
use storyprint::units::{cm, PageSize};
use storyprint::{
    paginate_with, Document, DocumentSink, ExportFormat, ExportOptions, HtmlSink, Page,
    PageGeometry, PdfSink, StandardFont, StoryRequest, WrapMode,
};
use std::fs;
use std::io::{self, BufWriter, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "storyprint",
    about = "Paginate plain text onto fixed-size pages and export it",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out a text file and print the resulting pages
    Paginate {
        /// Input text file ("-" for stdin)
        input: PathBuf,

        /// Print the pages as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        geometry: GeometryArgs,
    },

    /// Export a text file as PDF or HTML
    Export {
        /// Input text file ("-" for stdin)
        input: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Output format (defaults to the output file extension, else pdf)
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Document title
        #[arg(short, long)]
        title: Option<String>,

        /// Document author
        #[arg(long)]
        author: Option<String>,

        /// Font used for the text
        #[arg(long, value_enum, default_value = "helvetica")]
        font: FontArg,

        /// Font size in points
        #[arg(long, default_value = "12")]
        font_size: f64,

        /// Write uncompressed PDF content streams
        #[arg(long)]
        no_compress: bool,

        #[command(flatten)]
        geometry: GeometryArgs,
    },

    /// Print the generation prompts for a trip
    Prompt {
        /// Name of the student
        #[arg(short, long)]
        name: String,

        /// Date of the trip (DD.MM.YYYY)
        #[arg(short, long)]
        date: String,

        /// Place and country
        #[arg(short, long)]
        location: String,

        /// Ethnicity and social class of the narrator
        #[arg(long)]
        details: Option<String>,
    },
}

#[derive(Args)]
struct GeometryArgs {
    /// JSON file with page geometry
    #[arg(long)]
    config: Option<PathBuf>,

    /// Paper size (a4, a5, letter, legal)
    #[arg(long)]
    page_size: Option<String>,

    /// Maximum characters per rendered line
    #[arg(long)]
    max_chars: Option<usize>,

    /// Line height in centimetres
    #[arg(long)]
    line_height_cm: Option<f64>,

    /// Top, bottom and left margin in centimetres
    #[arg(long)]
    margin_cm: Option<f64>,

    /// Break long lines at whitespace instead of slicing mid-word
    #[arg(long)]
    word_wrap: bool,
}

impl GeometryArgs {
    fn resolve(&self) -> Result<(PageGeometry, WrapMode)> {
        let mut geometry = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                PageGeometry::from_json(&json)
                    .with_context(|| format!("Invalid config {}", path.display()))?
            }
            None => PageGeometry::default(),
        };

        if let Some(name) = &self.page_size {
            match PageSize::by_name(name) {
                Some(size) => geometry = geometry.with_page_size(size),
                None => bail!("Unknown page size '{name}', expected a4, a5, letter or legal"),
            }
        }
        if let Some(margin) = self.margin_cm {
            geometry = geometry.with_margins(cm(margin), cm(margin), cm(margin));
        }
        if let Some(line_height) = self.line_height_cm {
            geometry = geometry.with_line_height(cm(line_height));
        }
        if let Some(max_chars) = self.max_chars {
            geometry = geometry.with_max_chars_per_line(max_chars);
        }
        geometry.validate()?;

        let mode = if self.word_wrap {
            WrapMode::WordAware
        } else {
            WrapMode::Naive
        };
        Ok((geometry, mode))
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FontArg {
    Helvetica,
    Times,
    Courier,
}

impl From<FontArg> for StandardFont {
    fn from(font: FontArg) -> Self {
        match font {
            FontArg::Helvetica => StandardFont::Helvetica,
            FontArg::Times => StandardFont::TimesRoman,
            FontArg::Courier => StandardFont::Courier,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("storyprint=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Paginate {
            input,
            json,
            geometry,
        } => {
            let (geometry, mode) = geometry.resolve()?;
            let pages = layout(&input, &geometry, mode)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&pages)?);
            } else {
                print_pages(&pages);
            }
        }

        Commands::Export {
            input,
            output,
            format,
            title,
            author,
            font,
            font_size,
            no_compress,
            geometry,
        } => {
            let (geometry, mode) = geometry.resolve()?;
            let format = format.unwrap_or_else(|| format_for_path(&output));
            let options = ExportOptions {
                title,
                author,
                font: font.into(),
                font_size,
                compress: !no_compress,
                wrap_mode: mode,
                ..ExportOptions::default()
            };
            if !font_size.is_finite() || font_size <= 0.0 {
                bail!("Font size must be a positive number, got {font_size}");
            }

            let pages = layout(&input, &geometry, mode)?;
            write_document(&output, format, &pages, &geometry, options)?;

            println!(
                "Exported {} page(s) to {}",
                pages.len(),
                output.display()
            );
        }

        Commands::Prompt {
            name,
            date,
            location,
            details,
        } => {
            let mut request = StoryRequest::new(name, date, location);
            request.extra_details = details;
            let request = request.validated()?;

            println!("Story prompt:\n{}\n", story_prompt(&request));
            println!("User message:\n{STORY_USER_MESSAGE}\n");
            println!("Portrait prompt:\n{}\n", portrait_prompt(&request));
            println!("Title: {}", request.title());
            println!("File name: {}", request.download_file_name());
        }
    }

    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn layout(input: &Path, geometry: &PageGeometry, mode: WrapMode) -> Result<Vec<Page>> {
    let text = read_input(input)?;
    let document = Document::from_text(&text);
    let pages = paginate_with(&document, geometry, mode)?;
    info!(
        lines = document.len(),
        pages = pages.len(),
        "laid out {}",
        input.display()
    );
    Ok(pages)
}

fn format_for_path(path: &Path) -> ExportFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm") => {
            ExportFormat::Html
        }
        _ => ExportFormat::Pdf,
    }
}

fn write_document(
    output: &Path,
    format: ExportFormat,
    pages: &[Page],
    geometry: &PageGeometry,
    options: ExportOptions,
) -> Result<()> {
    debug!(?format, output = %output.display(), "writing document");
    match format {
        ExportFormat::Pdf => {
            let mut sink = PdfSink::create(output, options)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            sink.write_pages(pages, geometry)?;
        }
        ExportFormat::Html => {
            let file = fs::File::create(output)
                .with_context(|| format!("Failed to create {}", output.display()))?;
            let mut sink = HtmlSink::new(BufWriter::new(file), options);
            sink.write_pages(pages, geometry)?;
        }
    }
    Ok(())
}

fn print_pages(pages: &[Page]) {
    for page in pages {
        println!(
            "--- Page {} of {} ({} lines) ---",
            page.index() + 1,
            pages.len(),
            page.lines_used()
        );
        for line in page.text_lines() {
            println!("{line}");
        }
    }
}
