use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tgmd_annotator::intent::load_script;
use tgmd_annotator::replay::write_export;
use tgmd_annotator::{ActionCatalog, AnnotationSession, AnnotatorIdentity, Config, KeyBindings, Replay};
use tgmd_core::UuidIdGenerator;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("TGMD Annotator")
        .version("0.1.0")
        .author("TigreRoll")
        .about("TGMD-3 video segment annotation and CSV export")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file (TOML)")
                .global(true)
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(clap::ArgAction::SetTrue)
                .global(true)
        )
        .subcommand(
            Command::new("actions")
                .about("List the action catalog")
        )
        .subcommand(
            Command::new("replay")
                .about("Replay a JSON intent script and export the annotations")
                .arg(
                    Arg::new("script")
                        .short('s')
                        .long("script")
                        .value_name("FILE")
                        .help("JSON array of intents")
                        .required(true)
                )
                .arg(
                    Arg::new("annotator")
                        .short('a')
                        .long("annotator")
                        .value_name("ID")
                        .help("Annotator identity recorded on new segments")
                )
                .arg(
                    Arg::new("output-dir")
                        .short('o')
                        .long("output-dir")
                        .value_name("DIR")
                        .help("Output directory for CSV exports")
                )
        )
        .subcommand_required(true)
        .get_matches();

    // Load configuration
    let (config, load_error) = match matches.get_one::<String>("config") {
        Some(path) => (Config::from_file(path)?, None),
        None => match Config::load() {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(e)),
        },
    };

    let level = if matches.get_flag("verbose") {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(format!("tgmd_annotator={level},tgmd_core={level},warn"))
        .init();

    if let Some(e) = load_error {
        warn!("Failed to load config, using defaults: {}", e);
    }

    config.validate()?;
    debug!("{}", config.summary());

    match matches.subcommand() {
        Some(("actions", _)) => list_actions(&config),
        Some(("replay", sub)) => replay(config, sub).await,
        _ => unreachable!("subcommand is required"),
    }
}

fn list_actions(config: &Config) -> Result<()> {
    let catalog = ActionCatalog::tgmd();
    for action in catalog.all() {
        let key = action.shortcut_key.map(String::from).unwrap_or_default();
        println!("{:<2} {:<18} {:<8} {}", key, action.id, action.color, action.label);
    }

    println!();
    for line in KeyBindings::from_config(&config.session).describe() {
        println!("{}", line);
    }
    Ok(())
}

async fn replay(mut config: Config, matches: &ArgMatches) -> Result<()> {
    let script = matches
        .get_one::<String>("script")
        .map(PathBuf::from)
        .ok_or_else(|| anyhow::anyhow!("--script is required"))?;

    if let Some(annotator) = matches.get_one::<String>("annotator") {
        config.session.annotator = Some(annotator.clone());
    }
    if let Some(dir) = matches.get_one::<String>("output-dir") {
        config.export.output_dir = PathBuf::from(dir);
    }

    info!("🚀 TGMD Annotator replay starting...");
    info!("📜 Script: {}", script.display());
    info!("📂 Output directory: {}", config.export.output_dir.display());

    if !script.exists() {
        error!("Script does not exist: {}", script.display());
        return Err(anyhow::anyhow!("Script not found"));
    }

    let intents = load_script(&script).await?;
    let user = config.session.annotator.clone().map(AnnotatorIdentity::new);
    let session = AnnotationSession::new(Arc::new(ActionCatalog::tgmd()), Box::new(UuidIdGenerator))
        .with_user(user);

    let start_time = std::time::Instant::now();
    let mut replay = Replay::new(session);
    let report = replay.run(intents)?;

    let mut exports = report.exports.clone();
    if replay.session().can_export() {
        // Final state always lands on disk
        let final_export = replay.session().export()?;
        if !exports.contains(&final_export) {
            exports.push(final_export);
        }
    } else if exports.is_empty() {
        warn!("Nothing to export: no video loaded or no segments saved");
    }

    for export in &exports {
        if let Some(path) = write_export(export, &config.export.output_dir, config.export.overwrite).await? {
            info!("💾 Wrote {} rows to {}", export.rows, path.display());
        }
    }

    let duration = start_time.elapsed();
    info!("🎉 Replay completed in {:.2}s", duration.as_secs_f64());
    info!("✅ Applied: {}", report.applied);
    info!("❌ Rejected: {}", report.rejected.len());
    info!("📊 Segments saved: {}", replay.session().segments().len());

    Ok(())
}
