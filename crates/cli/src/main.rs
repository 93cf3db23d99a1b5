use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{Context, Result, anyhow};
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use tokio_util::sync::CancellationToken;
use tracing::{Level, debug, warn};
use wfscript_engine::{DeclarationGenerator, DuplicateNamePolicy, GeneratorOptions, RenderingTypeDeclarations, parse_workflow_file};
use wfscript_registry::{ActivityManifest, ActivityTypeRegistry, RegistryConfig, TypeCatalog, load_manifest_from_path};
use wfscript_types::ActivityDescriptor;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let matches = build_cli().get_matches();

    let cancellation = CancellationToken::new();
    let trigger = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling");
            trigger.cancel();
        }
    });

    match matches.subcommand() {
        Some(("render", sub)) => run_render(sub, &cancellation).await,
        Some(("activities", sub)) => run_activities(sub, &cancellation).await,
        _ => anyhow::bail!("expected a subcommand: render or activities"),
    }
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .try_init();
}

fn manifest_arg() -> Arg {
    Arg::new("manifest")
        .long("manifest")
        .short('m')
        .action(ArgAction::Append)
        .value_parser(value_parser!(PathBuf))
        .help("Activity manifest (YAML or JSON); may be repeated")
}

fn build_cli() -> Command {
    Command::new("wfscript")
        .about("Generate script declarations for workflow definitions")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("render")
                .about("Render the declaration document for a workflow")
                .arg(
                    Arg::new("workflow")
                        .long("workflow")
                        .short('w')
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Path to the workflow YAML/JSON"),
                )
                .arg(Arg::new("name").long("name").action(ArgAction::Set).help("Workflow key within the file"))
                .arg(manifest_arg())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Write the document here instead of stdout"),
                )
                .arg(
                    Arg::new("allow-duplicate-names")
                        .long("allow-duplicate-names")
                        .action(ArgAction::SetTrue)
                        .help("Keep the first activity when names collide instead of failing"),
                ),
        )
        .subcommand(
            Command::new("activities")
                .about("List registered activity types")
                .arg(manifest_arg()),
        )
}

/// Config manifests first, then the ones given on the command line.
fn load_manifests(matches: &ArgMatches) -> Result<(Vec<ActivityManifest>, TypeCatalog)> {
    let config = RegistryConfig::load();
    let mut manifests = config.load_manifests();
    if let Some(paths) = matches.get_many::<PathBuf>("manifest") {
        for path in paths {
            manifests.push(load_manifest_from_path(path)?);
        }
    }

    let mut catalog = TypeCatalog::from_manifests(&manifests);
    catalog.extend(config.declared_types.iter().map(String::as_str));
    debug!(manifests = manifests.len(), "loaded activity manifests");
    Ok((manifests, catalog))
}

async fn run_render(matches: &ArgMatches, cancellation: &CancellationToken) -> Result<()> {
    let workflow_path = matches
        .get_one::<PathBuf>("workflow")
        .context("--workflow is required")?;
    let bundle = parse_workflow_file(workflow_path)?;
    let name = matches.get_one::<String>("name").map(String::as_str);
    let workflow = bundle.get_or_first(name).cloned().ok_or_else(|| match name {
        Some(name) => anyhow!("workflow '{}' not found in {}", name, workflow_path.display()),
        None => anyhow!("{} contains no workflows", workflow_path.display()),
    })?;

    let (manifests, catalog) = load_manifests(matches)?;
    let registry = ActivityTypeRegistry::from_manifests(&manifests);
    let duplicate_names = if matches.get_flag("allow-duplicate-names") {
        DuplicateNamePolicy::FirstSeenWins
    } else {
        DuplicateNamePolicy::Reject
    };
    let generator = DeclarationGenerator::new(Arc::new(registry))
        .with_catalog(catalog)
        .with_options(GeneratorOptions { duplicate_names });

    let mut request = RenderingTypeDeclarations::new(Some(workflow), generator.projector());
    generator
        .handle(&mut request, cancellation)
        .await
        .with_context(|| format!("failed to render declarations for {}", workflow_path.display()))?;

    match matches.get_one::<PathBuf>("output") {
        Some(output_path) => fs::write(output_path, request.output.as_str())
            .with_context(|| format!("failed to write {}", output_path.display()))?,
        None => print!("{}", request.output),
    }
    Ok(())
}

async fn run_activities(matches: &ArgMatches, cancellation: &CancellationToken) -> Result<()> {
    let (manifests, _) = load_manifests(matches)?;
    let registry = ActivityTypeRegistry::from_manifests(&manifests);

    let mut descriptors: Vec<ActivityDescriptor> = Vec::new();
    for name in registry.list_activity_types().await {
        let Some(activity_type) = registry.get(&name).await else {
            continue;
        };
        descriptors.push(activity_type.describe(cancellation).await?);
    }
    println!("{}", serde_json::to_string_pretty(&descriptors)?);
    Ok(())
}
