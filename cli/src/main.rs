//! resumekit CLI - resume structuring tool

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use resumekit::parser::markup;
use resumekit::rewrite::{Severity, Suggestions};
use resumekit::{
    detect_format_from_path, rewrite_with_fallback, Analyzer, DesignOptions, Error,
    ExtractorRegistry, JsonFormat, LintReport, ParseOptions, RemoteRewriter, RenderOptions,
    ResumeParser, RewriteMode, RewriteRequest, RewriteResponse, RuleEngine, TemplateDescriptor,
};

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "resumekit")]
#[command(version)]
#[command(about = "Structure, rewrite, lint and render resumes", long_about = None)]
struct Cli {
    /// Input resume file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a resume into a JSON document
    Parse {
        /// Input file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Rewrite bullets and summary with the rule engine
        #[arg(short, long)]
        rewrite: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print normalized text
    Normalize {
        /// Input file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print classified lines in marker encoding
    Segment {
        /// Input file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print tagged lines as JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Rewrite a single bullet or the bullet lines of a whole resume
    Rewrite {
        /// Input file ("-" for stdin)
        #[arg(value_name = "FILE", required_unless_present = "bullet")]
        input: Option<PathBuf>,

        /// Rewrite this bullet instead of a file
        #[arg(short, long, value_name = "TEXT", conflicts_with = "input")]
        bullet: Option<String>,

        /// Remote rewrite endpoint; the local rule engine is used without it
        #[arg(long, env = "RESUMEKIT_REWRITE_URL", value_name = "URL")]
        url: Option<String>,

        /// Remote rewrite timeout in seconds
        #[arg(long, env = "RESUMEKIT_REWRITE_TIMEOUT", default_value = "30")]
        timeout: u64,

        /// Job description file sent along to the remote tier
        #[arg(long, value_name = "FILE")]
        job: Option<PathBuf>,

        /// Print the full response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Score a resume and list what to improve
    Lint {
        /// Input file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a resume with a template and design
    Render {
        /// Input file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "markdown")]
        format: RenderFormat,

        /// Template preset name or JSON file
        #[arg(short, long, default_value = "single-column")]
        template: String,

        /// Design options JSON file
        #[arg(short, long, value_name = "FILE")]
        design: Option<PathBuf>,

        /// Include YAML frontmatter (Markdown)
        #[arg(long)]
        frontmatter: bool,

        /// Rewrite bullets before rendering
        #[arg(short, long)]
        rewrite: bool,
    },

    /// Write every output format to a directory
    Convert {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Rewrite bullets before rendering
        #[arg(short, long)]
        rewrite: bool,
    },

    /// Show format and structure information
    Info {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum RenderFormat {
    /// Plain text
    Text,
    /// Markdown
    Markdown,
    /// JSON render tree
    Json,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Parse {
            input,
            output,
            rewrite,
            compact,
        }) => cmd_parse(&input, output.as_deref(), rewrite, compact),
        Some(Commands::Normalize { input, output }) => cmd_normalize(&input, output.as_deref()),
        Some(Commands::Segment {
            input,
            output,
            json,
        }) => cmd_segment(&input, output.as_deref(), json),
        Some(Commands::Rewrite {
            input,
            bullet,
            url,
            timeout,
            job,
            json,
        }) => cmd_rewrite(
            input.as_deref(),
            bullet.as_deref(),
            url.as_deref(),
            timeout,
            job.as_deref(),
            json,
        ),
        Some(Commands::Lint { input, json }) => cmd_lint(&input, json),
        Some(Commands::Render {
            input,
            output,
            format,
            template,
            design,
            frontmatter,
            rewrite,
        }) => cmd_render(
            &input,
            output.as_deref(),
            format,
            &template,
            design.as_deref(),
            frontmatter,
            rewrite,
        ),
        Some(Commands::Convert {
            input,
            output,
            rewrite,
        }) => cmd_convert(&input, output.as_deref(), rewrite),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, cli.output.as_deref(), false)
            } else {
                println!("{}", "Usage: resumekit <FILE> [OUTPUT]".yellow());
                println!("       resumekit --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

// ==================== Input / output ====================

/// Read a resume as text: stdin for "-", otherwise detect and extract.
fn read_input(input: &Path) -> CliResult<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    Ok(ExtractorRegistry::with_defaults().extract_file(input)?)
}

fn write_output(output: Option<&Path>, content: &str) -> CliResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn parser(rewrite: bool) -> ResumeParser {
    ResumeParser::new(ParseOptions::new().with_rewrite(rewrite))
}

fn load_template(name: &str) -> CliResult<TemplateDescriptor> {
    if let Some(template) = TemplateDescriptor::preset(name) {
        return Ok(template);
    }
    let path = Path::new(name);
    if !path.exists() {
        return Err(format!("Unknown template '{}' (not a preset or file)", name).into());
    }
    let template: TemplateDescriptor = serde_json::from_str(&fs::read_to_string(path)?)?;
    Ok(template)
}

fn load_design(path: Option<&Path>) -> CliResult<DesignOptions> {
    let design = match path {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => DesignOptions::default(),
    };
    design.validate()?;
    Ok(design)
}

// ==================== Commands ====================

fn cmd_parse(input: &Path, output: Option<&Path>, rewrite: bool, compact: bool) -> CliResult {
    let text = read_input(input)?;
    let doc = parser(rewrite).parse(&text);

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    write_output(output, &resumekit::render::to_json(&doc, format)?)
}

fn cmd_normalize(input: &Path, output: Option<&Path>) -> CliResult {
    let text = read_input(input)?;
    write_output(output, &resumekit::normalize(&text))
}

fn cmd_segment(input: &Path, output: Option<&Path>, json: bool) -> CliResult {
    let text = read_input(input)?;
    let lines = parser(false).segment(&text);

    let content = if json {
        resumekit::render::to_json(&lines, JsonFormat::Pretty)?
    } else {
        markup::encode(&lines)
    };
    write_output(output, &content)
}

fn cmd_rewrite(
    input: Option<&Path>,
    bullet: Option<&str>,
    url: Option<&str>,
    timeout: u64,
    job: Option<&Path>,
    json: bool,
) -> CliResult {
    let engine = RuleEngine::default();

    if let Some(bullet) = bullet {
        println!("{}", engine.rewrite_bullet(bullet));
        return Ok(());
    }

    let input = input.ok_or("No input file given")?;
    let mut request = RewriteRequest::new(read_input(input)?);
    if let Some(job) = job {
        request = request.with_job_description(fs::read_to_string(job)?);
    }

    let remote = match url {
        Some(url) => Some(HttpRewriter::new(url, Duration::from_secs(timeout))?),
        None => None,
    };
    let analyzer = Analyzer::with_engine(engine.clone());
    let outcome = rewrite_with_fallback(
        remote.as_ref().map(|r| r as &dyn RemoteRewriter),
        &engine,
        &analyzer,
        &request,
    );

    if json {
        println!("{}", resumekit::render::to_json(&outcome, JsonFormat::Pretty)?);
        return Ok(());
    }

    match &outcome.mode {
        RewriteMode::Remote => eprintln!("{}", "Rewritten by remote service".green()),
        RewriteMode::Local => eprintln!("{}", "Rewritten by local rules".cyan()),
        RewriteMode::Degraded { reason } => eprintln!(
            "{} {}",
            "Remote rewrite unavailable, used local rules:".yellow().bold(),
            reason
        ),
    }
    eprintln!("{}: {:.0}", "Score".bold(), outcome.response.score);
    println!("{}", outcome.response.optimized);

    if let Some(suggestions) = &outcome.response.suggestions {
        print_suggestions(suggestions);
    }
    Ok(())
}

fn cmd_lint(input: &Path, json: bool) -> CliResult {
    let text = read_input(input)?;
    let report = Analyzer::default().analyze(&text);

    if json {
        println!("{}", resumekit::render::to_json(&report, JsonFormat::Pretty)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn cmd_render(
    input: &Path,
    output: Option<&Path>,
    format: RenderFormat,
    template: &str,
    design: Option<&Path>,
    frontmatter: bool,
    rewrite: bool,
) -> CliResult {
    let template = load_template(template)?;
    let design = load_design(design)?;
    let text = read_input(input)?;
    let doc = parser(rewrite).parse(&text);

    let options = RenderOptions::new().with_frontmatter(frontmatter);
    let content = match format {
        RenderFormat::Markdown => {
            resumekit::render::MarkdownRenderer::new(options)
                .render_document(&doc, &template, &design)
                .content
        }
        RenderFormat::Text => {
            resumekit::render::to_text(&resumekit::render(&doc, &template, &design), &options)
        }
        RenderFormat::Json => resumekit::render::to_json(
            &resumekit::render(&doc, &template, &design),
            JsonFormat::Pretty,
        )?,
    };
    write_output(output, &content)
}

fn cmd_convert(input: &Path, output: Option<&Path>, rewrite: bool) -> CliResult {
    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_resume", stem))
    });

    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(5);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Extracting text...");
    let text = read_input(input)?;
    pb.inc(1);

    pb.set_message("Segmenting...");
    let parser = parser(rewrite);
    fs::write(
        output_dir.join("segments.txt"),
        markup::encode(&parser.segment(&text)),
    )?;
    pb.inc(1);

    pb.set_message("Assembling document...");
    let (doc, stats) = parser.parse_with_stats(&text);
    fs::write(
        output_dir.join("resume.json"),
        resumekit::render::to_json(&doc, JsonFormat::Pretty)?,
    )?;
    pb.inc(1);

    pb.set_message("Rendering...");
    let template = TemplateDescriptor::default();
    let design = DesignOptions::default();
    let tree = resumekit::render(&doc, &template, &design);
    let options = RenderOptions::new().with_frontmatter(true);
    let markdown = resumekit::render::MarkdownRenderer::new(options.clone())
        .render_document(&doc, &template, &design)
        .content;
    fs::write(output_dir.join("resume.md"), markdown)?;
    fs::write(
        output_dir.join("resume.txt"),
        resumekit::render::to_text(&tree, &options),
    )?;
    fs::write(
        output_dir.join("layout.json"),
        resumekit::render::to_json(&tree, JsonFormat::Pretty)?,
    )?;
    pb.inc(1);

    pb.set_message("Linting...");
    let report = Analyzer::default().analyze(&text);
    fs::write(
        output_dir.join("lint.json"),
        resumekit::render::to_json(&report, JsonFormat::Pretty)?,
    )?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    println!("  {} segments.txt", "├─".dimmed());
    println!("  {} resume.json", "├─".dimmed());
    println!("  {} resume.md", "├─".dimmed());
    println!("  {} resume.txt", "├─".dimmed());
    println!("  {} layout.json", "├─".dimmed());
    println!("  {} lint.json", "└─".dimmed());
    println!(
        "\n{} {} entries, {} bullets, score {}",
        "Parsed".cyan(),
        stats.entry_count,
        stats.bullet_count,
        report.score
    );

    Ok(())
}

fn cmd_info(input: &Path) -> CliResult {
    let format = detect_format_from_path(input)?;
    let text = read_input(input)?;
    let (doc, stats) = parser(false).parse_with_stats(&text);

    println!("{}", "Resume Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);
    println!("{}: {}", "Name".bold(), doc.contact().name);
    for (label, value) in doc.contact().fields() {
        println!("{}: {}", capitalize(label).bold(), value);
    }

    println!();
    println!("{}", "Sections".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for id in doc.section_order() {
        let name = match id.section() {
            Some(section) => section.title().to_string(),
            None => match id {
                resumekit::SectionId::Additional(index) => doc
                    .additional_sections()
                    .get(*index)
                    .map(|s| s.title.clone())
                    .unwrap_or_default(),
                _ => String::new(),
            },
        };
        println!("  {} {}", "•".dimmed(), name);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Lines".bold(), stats.line_count);
    println!("{}: {}", "Headers".bold(), stats.header_count);
    println!("{}: {}", "Entries".bold(), stats.entry_count);
    println!("{}: {}", "Bullets".bold(), stats.bullet_count);
    println!("{}: {}", "Skill categories".bold(), doc.skills().len());
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "resumekit".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Resume structuring tool");
    println!();
    println!("License: MIT");
}

// ==================== Reporting ====================

fn print_report(report: &LintReport) {
    let score = format!("{}/100", report.score);
    let score = match report.score {
        90..=100 => score.green().bold(),
        75..=89 => score.yellow().bold(),
        _ => score.red().bold(),
    };
    println!("{}: {}", "Score".bold(), score);
    println!("{}", report.feedback);
    if report.is_already_optimized {
        println!("{}", "Already well optimized".green());
    }
    println!();

    for issue in &report.issues {
        let tag = match issue.severity {
            Severity::High => "high".red().bold(),
            Severity::Medium => "medium".yellow(),
            Severity::Low => "low".normal(),
            Severity::Positive => "strength".green(),
        };
        println!("  [{}] {}", tag, issue.message);
        if let Some(text) = &issue.text {
            println!("      {}", text.dimmed());
        }
        if !issue.alternatives.is_empty() {
            println!("      {} {}", "try:".dimmed(), issue.alternatives.join(", "));
        }
    }

    print_suggestions(&report.suggestions);
}

fn print_suggestions(suggestions: &Suggestions) {
    if suggestions.is_empty() {
        return;
    }
    let groups = [
        ("Weak verbs", &suggestions.weak_verbs),
        ("Formatting", &suggestions.formatting_issues),
        ("Content", &suggestions.content_improvements),
    ];
    eprintln!();
    for (title, items) in groups {
        if items.is_empty() {
            continue;
        }
        eprintln!("{}", title.cyan().bold());
        for item in items {
            eprintln!("  {} {}", "-".dimmed(), item);
        }
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ==================== Remote rewrite tier ====================

/// Remote rewrite service reached over HTTP.
struct HttpRewriter {
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    url: String,
}

impl HttpRewriter {
    fn new(url: &str, timeout: Duration) -> CliResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            runtime: tokio::runtime::Runtime::new()?,
            url: url.to_string(),
        })
    }
}

fn remote_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::RemoteTimeout
    } else if let Some(status) = err.status() {
        Error::RemoteStatus(status.as_u16())
    } else if err.is_decode() {
        Error::InvalidResponse(err.to_string())
    } else {
        Error::Remote(err.to_string())
    }
}

impl RemoteRewriter for HttpRewriter {
    fn name(&self) -> &str {
        "http"
    }

    fn rewrite(&self, request: &RewriteRequest) -> resumekit::Result<RewriteResponse> {
        self.runtime.block_on(async {
            log::debug!("POST {}", self.url);
            let response = self
                .client
                .post(&self.url)
                .json(request)
                .send()
                .await
                .map_err(remote_error)?;

            let status = response.status();
            if !status.is_success() {
                return Err(Error::RemoteStatus(status.as_u16()));
            }

            response
                .json::<RewriteResponse>()
                .await
                .map_err(remote_error)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_template_preset_and_file() {
        assert_eq!(load_template("two_column").unwrap().name, "two-column");

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"name": "custom", "skills": {"position": "sidebar"}}"#)
            .unwrap();
        let template = load_template(file.path().to_str().unwrap()).unwrap();
        assert_eq!(template.name, "custom");

        assert!(load_template("no-such-template").is_err());
    }

    #[test]
    fn test_load_design_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"line_spacing": 0}"#).unwrap();
        assert!(load_design(Some(file.path())).is_err());
        assert!(load_design(None).is_ok());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("linkedin"), "Linkedin");
        assert_eq!(capitalize(""), "");
    }
}
