use anyhow::{bail, Context, Result};
use chrono::{Duration, Local};
use clap::Parser;
use std::path::PathBuf;
use tubeflow::workflow::Stage;
use tubeflow::{
    ContentStudio, PromptBrief, PublishSlot, ScriptBrief, ScriptLength, StageUpdate, StudioConfig,
    VideoPlatform, VoiceCustomization, WorkflowSession, WorkflowState, PREBUILT_VOICES,
};

/// Runs a topic through all nine production stages, approving each result
#[derive(Parser, Debug)]
#[command(name = "tubeflow")]
#[command(about = "Idea to publish-ready YouTube package with Gemini")]
#[command(version)]
struct Args {
    /// What the video is about
    #[arg(required_unless_present = "list_voices")]
    topic: Option<String>,

    /// Feedback applied once to refine the first idea
    #[arg(long)]
    idea_feedback: Option<String>,

    /// Channel niche (defaults to the topic)
    #[arg(long)]
    niche: Option<String>,

    #[arg(long, default_value = "Engaging and Energetic")]
    tone: String,

    /// "Short (5 min)", "8-10 minutes" or "15+ minutes"
    #[arg(long, default_value = "8-10 minutes")]
    length: String,

    #[arg(long, default_value = "Kore", env = "TUBEFLOW_VOICE")]
    voice: String,

    #[arg(long, default_value = "Neutral")]
    accent: String,

    #[arg(long, default_value = "Default")]
    age: String,

    #[arg(long, default_value = "Normal")]
    pacing: String,

    /// Video model the visual prompts target (Veo, Sora, Wan, Grok, Midjourney, Runway)
    #[arg(long, default_value = "Veo")]
    platform: String,

    #[arg(long, default_value_t = 5)]
    prompt_count: u32,

    /// Which thumbnail concept to render (0-based)
    #[arg(long, default_value_t = 0)]
    concept: usize,

    /// Publish date, YYYY-MM-DD (defaults to a week from today)
    #[arg(long)]
    publish_date: Option<String>,

    /// Publish time, HH:MM
    #[arg(long, default_value = "18:00")]
    publish_time: String,

    #[arg(short, long, default_value = "tubeflow-output", env = "TUBEFLOW_OUTPUT_DIR")]
    output_dir: PathBuf,

    /// Print the prebuilt voices and exit
    #[arg(long)]
    list_voices: bool,
}

impl Args {
    /// User inputs to set when `stage` is entered
    fn inputs_for(&self, stage: Stage) -> Result<Vec<StageUpdate>> {
        let updates = match stage {
            Stage::ScriptWriting => vec![StageUpdate::ScriptBrief(ScriptBrief {
                niche: self.niche.clone().or_else(|| self.topic.clone()).unwrap_or_default(),
                tone: self.tone.clone(),
                length: ScriptLength::new(self.length.clone()),
            })],
            Stage::VoiceOver => vec![StageUpdate::Voice {
                voice: self.voice.clone(),
                customization: VoiceCustomization {
                    accent: self.accent.clone(),
                    age: self.age.clone(),
                    pacing: self.pacing.clone(),
                },
            }],
            Stage::PromptWriting => {
                let platform = VideoPlatform::parse(&self.platform)
                    .with_context(|| format!("Unknown video platform '{}'", self.platform))?;
                vec![StageUpdate::PromptBrief(PromptBrief { platform, count: self.prompt_count })]
            }
            Stage::ContentPlanning => {
                let date = match &self.publish_date {
                    Some(date) => date.clone(),
                    None => (Local::now().date_naive() + Duration::days(7)).format("%Y-%m-%d").to_string(),
                };
                let slot = PublishSlot::parse(&date, &self.publish_time)
                    .with_context(|| format!("Invalid publish slot '{} {}'", date, self.publish_time))?;
                vec![StageUpdate::PublishSlot(slot)]
            }
            _ => Vec::new(),
        };
        Ok(updates)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging()?;

    let args = Args::parse();

    if args.list_voices {
        for voice in PREBUILT_VOICES {
            println!("{:<8} {:<7} {}", voice.name, voice.gender, voice.style);
        }
        return Ok(());
    }

    let topic = args.topic.clone().context("A topic is required")?;
    let config = StudioConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(
        fast = %config.models.fast,
        complex = %config.models.complex,
        retries = config.retry.retries,
        "Configuration loaded"
    );

    let studio = ContentStudio::from_config(&config);
    let mut session = WorkflowSession::new(studio, WorkflowState::new(topic));

    run_all_stages(&mut session, &args).await?;

    let written = session
        .package()
        .write_to_dir(&args.output_dir)
        .await
        .with_context(|| format!("Failed to write assets to {}", args.output_dir.display()))?;

    println!("\nPackage ready:");
    for path in written {
        println!("  {}", path.display());
    }
    Ok(())
}

async fn run_all_stages(session: &mut WorkflowSession, args: &Args) -> Result<()> {
    while !session.current_stage().is_final() {
        let stage = session.current_stage();

        for update in args.inputs_for(stage)? {
            session.edit(update)?;
        }

        if !session.enter_stage().await? {
            session
                .generate(None)
                .await
                .with_context(|| format!("{} failed", stage))?;
        }

        match stage {
            Stage::IdeaGeneration => {
                if let Some(feedback) = args.idea_feedback.as_deref() {
                    session.generate(Some(feedback)).await.context("Idea refinement failed")?;
                }
                if let Some(idea) = &session.state().idea.result {
                    println!("Idea: {}\n  {}", idea.title, idea.concept);
                }
            }
            Stage::ThumbnailDesign => {
                let available = session.state().thumbnails.concepts.len();
                if available == 0 {
                    bail!("No thumbnail concepts were generated");
                }
                session.edit(StageUpdate::SelectConcept(args.concept.min(available - 1)))?;
            }
            Stage::ThumbnailGeneration => {
                if session.state().thumbnail_images.images.is_empty() {
                    bail!("No thumbnail images were produced; try again later");
                }
            }
            _ => {}
        }

        session.approve().with_context(|| format!("Could not approve {}", stage))?;
        println!("[{}/{}] {} approved", stage.index() + 1, Stage::ALL.len() - 1, stage);
    }
    Ok(())
}

fn init_logging() -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug,tubeflow=trace,reqwest=info,hyper=info".to_string()
        } else {
            "info,tubeflow=info,reqwest=warn,hyper=warn".to_string()
        }
    });

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log_level))?;

    let fmt_layer = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    tracing_subscriber::registry().with(env_filter).with(fmt_layer).init();

    tracing::info!("TubeFlow starting up");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Log level: {}", log_level);
    Ok(())
}
