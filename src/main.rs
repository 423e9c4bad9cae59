//! Sasscade CLI - convention-driven SCSS to CSS build tool
//!
//! Usage: sasscade <COMMAND>
//!
//! Commands:
//!   compile  Compile every discovered sass directory into css
//!   list     Show the computed source-to-output mapping without compiling
//!   watch    Watch for changes and recompile continuously

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use sasscade::config::Config;
use sasscade::pipeline::BuildOptions;

/// Sasscade - convention-driven SCSS to CSS build tool
#[derive(Parser, Debug)]
#[command(name = "sasscade")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format for CI
    #[arg(long, default_value = "false")]
    json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile every discovered sass directory into css
    Compile {
        /// Source root scanned for sass directories
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Output root receiving mirrored css directories
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Base directory for log-relative paths
        #[arg(short, long)]
        base: Option<PathBuf>,
    },

    /// Show the computed source-to-output mapping without compiling
    List {
        /// Source root scanned for sass directories
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Output root receiving mirrored css directories
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Base directory for log-relative paths
        #[arg(short, long)]
        base: Option<PathBuf>,
    },

    /// Watch for changes and recompile continuously
    Watch {
        /// Source root scanned for sass directories
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Output root receiving mirrored css directories
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Base directory for log-relative paths
        #[arg(short, long)]
        base: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            source,
            output,
            base,
        } => cmd_compile(source, output, base, cli.json, cli.verbose),
        Commands::List {
            source,
            output,
            base,
        } => cmd_list(source, output, base, cli.json),
        Commands::Watch {
            source,
            output,
            base,
        } => cmd_watch(source, output, base, cli.json),
    }
}

/// Merge CLI flags over loaded configuration
fn resolve_build_options(
    source: Option<PathBuf>,
    output: Option<PathBuf>,
    base: Option<PathBuf>,
    config: &Config,
) -> BuildOptions {
    BuildOptions {
        source_root: source.unwrap_or_else(|| config.paths.source.clone()),
        output_root: output.unwrap_or_else(|| config.paths.output.clone()),
        base_dir: base.unwrap_or_else(|| config.paths.base.clone()),
    }
}

fn cmd_compile(
    source: Option<PathBuf>,
    output: Option<PathBuf>,
    base: Option<PathBuf>,
    json: bool,
    verbose: u8,
) -> Result<()> {
    use sasscade::compiler::GrassCompiler;
    use sasscade::pipeline::compile_all;
    use sasscade::scan::find_sass_dirs;

    let config = Config::load_or_default(Some(Path::new(".")));
    let options = resolve_build_options(source, output, base, &config);

    if !json {
        println!("🎨 Sasscade Compile");
        println!("Source: {}", options.source_root.display());
        println!("Output: {}", options.output_root.display());
    }

    if verbose > 0 && !json {
        let dirs = find_sass_dirs(&options.source_root)?;
        println!("Found {} sass directories", dirs.len());
    }

    if !json {
        println!();
    }

    let compiler = GrassCompiler::new();
    let summary = compile_all(&options, &compiler, |source, output| {
        if json {
            let line = serde_json::json!({
                "event": "compile",
                "source": source.display().to_string(),
                "output": output.display().to_string(),
            });
            println!("{line}");
        } else {
            println!(" {} => {}", source.display(), output.display());
        }
    })?;

    if json {
        let line = serde_json::json!({
            "event": "done",
            "compiled": summary.compiled,
        });
        println!("{line}");
    } else {
        println!();
        println!("✓ Compiled {} files", summary.compiled);
    }

    Ok(())
}

fn cmd_list(
    source: Option<PathBuf>,
    output: Option<PathBuf>,
    base: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    use sasscade::pipeline::{build_mapping, display_relative};

    let config = Config::load_or_default(Some(Path::new(".")));
    let options = resolve_build_options(source, output, base, &config);

    if !json {
        println!("🗺  Sasscade List");
        println!("Source: {}", options.source_root.display());
        println!();
    }

    let mapping = build_mapping(&options.source_root, &options.output_root)?;

    for pair in &mapping {
        let source = display_relative(&pair.source, &options.base_dir);
        let output = display_relative(&pair.output, &options.base_dir);
        if json {
            let line = serde_json::json!({
                "event": "pair",
                "source": source.display().to_string(),
                "output": output.display().to_string(),
            });
            println!("{line}");
        } else {
            println!(" {} => {}", source.display(), output.display());
        }
    }

    if json {
        let line = serde_json::json!({
            "event": "done",
            "pairs": mapping.len(),
        });
        println!("{line}");
    } else {
        println!();
        println!("Summary: {} mapped pairs", mapping.len());
    }

    Ok(())
}

fn cmd_watch(
    source: Option<PathBuf>,
    output: Option<PathBuf>,
    base: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    use sasscade::watcher::{watch, WatchEvent, WatchOptions};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    let config = Config::load_or_default(Some(Path::new(".")));
    let build = resolve_build_options(source, output, base, &config);

    let options = WatchOptions { build, json };

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();

    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })?;

    if !json {
        println!("👀 Sasscade Watch");
        println!("Source: {}", options.build.source_root.display());
        println!("Press Ctrl+C to stop\n");
    }

    watch(options, running, |event| {
        if json {
            println!("{}", event.to_json());
        } else {
            match event {
                WatchEvent::Started { source_root } => {
                    println!("📂 Watching: {}", source_root);
                }
                WatchEvent::FileChanged { path } => {
                    println!("📝 Changed: {}", path);
                }
                WatchEvent::BuildStarted => {
                    println!("🔄 Compiling...");
                }
                WatchEvent::BuildComplete { compiled } => {
                    println!("✓ Compiled {} files", compiled);
                }
                WatchEvent::BuildFailed { message } => {
                    eprintln!("✗ Error: {}", message);
                }
                WatchEvent::Shutdown => {
                    println!("\n👋 Shutting down...");
                }
            }
        }
    })?;

    Ok(())
}
