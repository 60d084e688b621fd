//! SmartQR command line entrypoint

use clap::{Args, Parser, Subcommand};
use smartqr::output::{
    render_artifact, render_generation, render_history, render_message, render_stats,
};
use smartqr::prompt::{
    ContactTemplate, EXAMPLE_PROMPTS, EventTemplate, PromptTemplate, WifiSecurity, WifiTemplate,
};
use smartqr::{
    AnalyticsEntry, AnalyticsLog, Color, Error, FileStore, LogoSource, MemoryStore, PromptHandoff,
    QrCompositor, QrDecoder, RenderedArtifact, Result, SmartQr, SmartQrConfig, StylingOptions,
    logging,
};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "smartqr",
    version,
    about = "Describe a QR code in plain language and render it locally"
)]
struct Cli {
    /// Optional configuration file (toml/yaml). Defaults to smartqr.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Output results as formatted JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,

    /// Override the history directory
    #[arg(long, value_name = "DIR", global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a description with the completion service and render the result
    Generate {
        /// What the QR code should contain, in plain language
        prompt: String,
        #[command(flatten)]
        style: StyleArgs,
    },
    /// Render literal payload text without calling the completion service
    Render {
        /// Exact text to encode
        data: String,
        /// Record the render in history under this type label
        #[arg(long, value_name = "TYPE")]
        record: Option<String>,
        #[command(flatten)]
        style: StyleArgs,
    },
    /// Fill in a guided template and generate from it
    Template {
        #[command(subcommand)]
        template: TemplateCommand,
        /// Print the assembled prompt instead of generating
        #[arg(long, global = true)]
        print: bool,
    },
    /// Inspect or edit the generation history
    History {
        #[command(subcommand)]
        action: HistoryCommand,
    },
    /// Decode a QR image and print its contents
    Verify {
        /// Image file to decode
        image: PathBuf,
    },
    /// List sample prompts
    Examples,
}

#[derive(Subcommand, Debug)]
enum TemplateCommand {
    /// WiFi network credentials
    Wifi {
        /// Network name (SSID)
        #[arg(long)]
        ssid: String,
        /// Network password
        #[arg(long, default_value = "")]
        password: String,
        /// WPA, WEP or nopass
        #[arg(long, default_value = "WPA")]
        security: WifiSecurity,
        /// Network does not broadcast its SSID
        #[arg(long)]
        hidden: bool,
        #[command(flatten)]
        style: StyleArgs,
    },
    /// Contact card
    Contact {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        job_title: Option<String>,
        #[arg(long)]
        website: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[command(flatten)]
        style: StyleArgs,
    },
    /// Event pass
    Event {
        #[arg(long)]
        name: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        organizer: Option<String>,
        #[arg(long)]
        ticket_id: Option<String>,
        #[command(flatten)]
        style: StyleArgs,
    },
}

impl TemplateCommand {
    fn style(&self) -> &StyleArgs {
        match self {
            TemplateCommand::Wifi { style, .. }
            | TemplateCommand::Contact { style, .. }
            | TemplateCommand::Event { style, .. } => style,
        }
    }
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    /// Show all entries, newest first
    List,
    /// Delete one entry by id
    Remove {
        /// Entry id as shown by `history list`
        id: String,
    },
    /// Delete every entry
    Clear,
    /// Show per-type counters
    Stats,
}

#[derive(Args, Debug, Default)]
struct StyleArgs {
    /// Output size in pixels
    #[arg(long)]
    size: Option<u32>,
    /// Dark module color (#rrggbb)
    #[arg(long = "fg", value_name = "COLOR")]
    foreground: Option<String>,
    /// Light module color (#rrggbb)
    #[arg(long = "bg", value_name = "COLOR")]
    background: Option<String>,
    /// Logo image path or data URL
    #[arg(long, value_name = "PATH")]
    logo: Option<String>,
    /// Logo size as a percentage of the output size (capped at 25)
    #[arg(long, value_name = "PERCENT", value_parser = clap::value_parser!(u8).range(0..=100))]
    logo_size: Option<u8>,
    /// Write the PNG here instead of printing a data URL
    #[arg(long, short, value_name = "FILE")]
    out: Option<PathBuf>,
}

impl StyleArgs {
    fn apply(&self, mut styling: StylingOptions) -> Result<StylingOptions> {
        if let Some(size) = self.size {
            if size == 0 {
                return Err(Error::Config("--size must be positive".to_string()));
            }
            styling.size = size;
        }
        if let Some(ref fg) = self.foreground {
            styling.foreground = Color::parse(fg)?;
        }
        if let Some(ref bg) = self.background {
            styling.background = Color::parse(bg)?;
        }
        if let Some(ref logo) = self.logo {
            styling.logo = Some(LogoSource::parse(logo));
        }
        if let Some(percent) = self.logo_size {
            styling.logo_size_percent = percent;
        }
        Ok(styling)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = SmartQrConfig::load(cli.config.as_deref())?;
    if let Some(ref dir) = cli.data_dir {
        config.storage.data_dir = Some(dir.clone());
    }

    logging::init(&config.logging)?;

    match cli.command {
        Command::Examples => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&EXAMPLE_PROMPTS)?);
            } else {
                for example in EXAMPLE_PROMPTS {
                    println!("{example}");
                }
            }
            Ok(())
        }
        Command::Verify { ref image } => {
            let bytes = tokio::fs::read(image).await?;
            let text = QrDecoder::new().decode_bytes(&bytes)?;
            render_message("data", text).print(cli.json)
        }
        Command::History { ref action } => handle_history(&config, action, cli.json),
        Command::Render {
            ref data,
            ref record,
            ref style,
        } => {
            let styling = style.apply(config.render.to_styling()?)?;
            let artifact = render_literal(&config, data, record.as_deref(), &styling).await?;
            let saved = save_artifact(&artifact, style.out.as_deref()).await?;
            render_artifact(&artifact, saved).print(cli.json)
        }
        Command::Generate {
            ref prompt,
            ref style,
        } => {
            let styling = style.apply(config.render.to_styling()?)?;
            generate(&config, prompt, &styling, style.out.as_deref(), cli.json).await
        }
        Command::Template {
            ref template,
            print,
        } => {
            let prompt = build_template_prompt(template)?;

            // Same hop as the form pages: stash, then generation picks it up.
            let handoff = PromptHandoff::new(MemoryStore::new());
            handoff.stash(&prompt)?;

            if print {
                return render_message("prompt", prompt).print(cli.json);
            }

            let prompt = handoff
                .take()?
                .ok_or_else(|| Error::InvalidPrompt("no prompt was handed off".to_string()))?;
            let style = template.style();
            let styling = style.apply(config.render.to_styling()?)?;
            generate(&config, &prompt, &styling, style.out.as_deref(), cli.json).await
        }
    }
}

/// Render without the completion service; history is only touched when recording.
async fn render_literal(
    config: &SmartQrConfig,
    data: &str,
    record: Option<&str>,
    styling: &StylingOptions,
) -> Result<RenderedArtifact> {
    let artifact = QrCompositor::new().render(data, styling).await?;

    if let Some(kind) = record {
        let store = FileStore::open(config.storage.resolved_data_dir())?;
        AnalyticsLog::new(store).append(AnalyticsEntry::new(kind, data, data))?;
    }
    Ok(artifact)
}

async fn generate(
    config: &SmartQrConfig,
    prompt: &str,
    styling: &StylingOptions,
    out: Option<&Path>,
    json: bool,
) -> Result<()> {
    let app = SmartQr::from_config(config)?;
    info!(size = styling.size, "Generating QR from prompt");

    let generation = app.generate(prompt, styling).await?;
    let saved = save_artifact(&generation.artifact, out).await?;
    render_generation(&generation, saved).print(json)
}

async fn save_artifact<'a>(
    artifact: &RenderedArtifact,
    out: Option<&'a Path>,
) -> Result<Option<&'a Path>> {
    if let Some(path) = out {
        artifact.save(path).await?;
        info!(path = %path.display(), "Saved QR image");
    }
    Ok(out)
}

fn build_template_prompt(template: &TemplateCommand) -> Result<String> {
    match template {
        TemplateCommand::Wifi {
            ssid,
            password,
            security,
            hidden,
            ..
        } => WifiTemplate {
            network_name: ssid.clone(),
            password: password.clone(),
            security: *security,
            hidden: *hidden,
        }
        .build(),
        TemplateCommand::Contact {
            first_name,
            last_name,
            phone,
            email,
            company,
            job_title,
            website,
            address,
            ..
        } => ContactTemplate {
            first_name: first_name.clone(),
            last_name: last_name.clone(),
            phone: phone.clone(),
            email: email.clone(),
            company: company.clone(),
            job_title: job_title.clone(),
            website: website.clone(),
            address: address.clone(),
        }
        .build(),
        TemplateCommand::Event {
            name,
            date,
            time,
            location,
            description,
            organizer,
            ticket_id,
            ..
        } => EventTemplate {
            event_name: name.clone(),
            date: date.clone(),
            time: time.clone(),
            location: location.clone(),
            description: description.clone(),
            organizer: organizer.clone(),
            ticket_id: ticket_id.clone(),
        }
        .build(),
    }
}

fn handle_history(config: &SmartQrConfig, action: &HistoryCommand, json: bool) -> Result<()> {
    let store = FileStore::open(config.storage.resolved_data_dir())?;
    let log = AnalyticsLog::new(store);

    match action {
        HistoryCommand::List => render_history(&log.list_all()?).print(json),
        HistoryCommand::Remove { id } => {
            if log.remove(id)? {
                render_message("removed", id.clone()).print(json)
            } else {
                Err(Error::Storage(format!("No history entry with id '{id}'")))
            }
        }
        HistoryCommand::Clear => {
            log.clear()?;
            render_message("cleared", "History cleared").print(json)
        }
        HistoryCommand::Stats => render_stats(&log.stats()?).print(json),
    }
}
