use anyhow::Context;
use clap::Parser;
use luainclude_core::config::{CliOverrides, ScriptOptions, CONFIG_FILE_NAME};
use luainclude_core::{Encoding, ScriptEngine};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// luainclude - expand #include directives in Lua scripts and print their SHA-1
#[derive(Parser, Debug, Clone)]
#[command(name = "luainclude")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Script names to load, relative to the root directory
    #[arg(value_name = "NAME")]
    names: Vec<String>,

    /// Path to a luainclude.yaml (or .json) configuration file
    #[arg(short, long, value_name = "FILE")]
    project: Option<PathBuf>,

    /// Root directory of all script files
    #[arg(short, long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Include directive to expand
    #[arg(long = "macro", value_name = "DIRECTIVE", conflicts_with = "no_macro")]
    macro_directive: Option<String>,

    /// Do not expand include directives
    #[arg(long)]
    no_macro: bool,

    /// Required script extension (empty allows any file)
    #[arg(short, long, value_name = "EXT")]
    extension: Option<String>,

    /// Script file encoding (utf8, utf8-lossy, latin1)
    #[arg(long, value_name = "ENCODING")]
    encoding: Option<String>,

    /// Load every script directly inside DIR (relative to the root)
    #[arg(short, long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Load every script directly inside the root directory
    #[arg(short, long, conflicts_with = "dir")]
    all: bool,

    /// Print "<sha1>  <name>" instead of the expanded code
    #[arg(long)]
    digest: bool,

    /// Write a default luainclude.yaml to the current directory
    #[arg(long)]
    init: bool,
}

fn main() -> anyhow::Result<()> {
    // Set RUST_LOG=debug for detailed logs
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .init();

    let cli = Cli::parse();

    if cli.init {
        init_project()?;
        return Ok(());
    }

    if cli.names.is_empty() && cli.dir.is_none() && !cli.all {
        anyhow::bail!("No scripts specified. Pass script names, --dir or --all (see --help).");
    }

    let options = load_options(&cli)?;
    let mut engine = ScriptEngine::new(options).context("Invalid configuration")?;
    info!("Script root: {}", engine.config().root().display());

    let mut loaded = Vec::new();
    if cli.all || cli.dir.is_some() {
        loaded.extend(
            engine
                .load_dir(cli.dir.as_deref())
                .context("Failed to load script directory")?,
        );
    }
    if !cli.names.is_empty() {
        loaded.extend(
            engine
                .load_all(&cli.names)
                .context("Failed to load scripts")?,
        );
    }
    debug!("Loaded: {:?}", loaded);

    for name in &loaded {
        if cli.digest {
            println!("{}  {}", engine.digest(name)?, name);
        } else {
            print!("{}", engine.code(name)?);
            if loaded.len() > 1 {
                println!();
            }
        }
    }

    Ok(())
}

/// Initialize a luainclude.yaml in the current directory
fn init_project() -> anyhow::Result<()> {
    let path = PathBuf::from(CONFIG_FILE_NAME);
    if path.exists() {
        anyhow::bail!("{} already exists", CONFIG_FILE_NAME);
    }
    ScriptOptions::init_file(&path)?;
    println!("Created {}", CONFIG_FILE_NAME);
    Ok(())
}

/// Load the config file (if any) and apply CLI overrides on top
fn load_options(cli: &Cli) -> anyhow::Result<ScriptOptions> {
    let mut options = if let Some(ref project_path) = cli.project {
        ScriptOptions::from_file(project_path)
            .with_context(|| format!("Failed to load config file {}", project_path.display()))?
    } else {
        let default_path = PathBuf::from(CONFIG_FILE_NAME);
        if default_path.exists() {
            debug!("Using {}", CONFIG_FILE_NAME);
            ScriptOptions::from_file(&default_path)
                .with_context(|| format!("Failed to load {}", CONFIG_FILE_NAME))?
        } else {
            ScriptOptions::default()
        }
    };

    let mut overrides = CliOverrides {
        root: cli.root.clone(),
        macro_directive: cli.macro_directive.clone(),
        extension: cli.extension.clone(),
        ..Default::default()
    };
    if cli.no_macro {
        overrides.macro_directive = Some(String::new());
    }
    if let Some(ref encoding) = cli.encoding {
        overrides.encoding = Some(encoding.parse::<Encoding>()?);
    }

    options.merge(&overrides);
    Ok(options)
}
