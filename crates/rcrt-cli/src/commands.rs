use anyhow::{bail, Context};
use colored::Colorize;
use rcrt_server::{RcrtServer, ServerConfig};
use rcrt_store::EntryStore;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Init(args) => cmd_init(args),
        Command::Serve(args) => cmd_serve(args),
        Command::List(args) => cmd_list(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn cmd_init(args: InitArgs) -> anyhow::Result<()> {
    let (store, seeded) = EntryStore::init(&args.db_path)
        .with_context(|| format!("initializing store at {}", args.db_path.display()))?;
    println!(
        "{} Initialized timeline store in {}",
        "✓".green().bold(),
        store.root().display().to_string().bold()
    );
    println!("  post:    #{}", seeded.post.to_string().yellow());
    println!("  link:    #{}", seeded.link.to_string().yellow());
    println!("  article: #{}", seeded.article.to_string().yellow());
    println!("  image:   #{}", seeded.image.to_string().yellow());
    Ok(())
}

/// Merge the optional config file with command-line overrides.
pub(crate) fn build_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    config.db_path = args.db_path.clone();
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(app_dir) = &args.app_dir {
        config.app_dir = app_dir.clone();
    }
    if let Some(prefix) = &args.prefix {
        config.prefix = prefix.clone();
    }
    if args.readonly {
        config.editable = false;
    }
    if args.init {
        config.init_if_missing = true;
    }
    config.validate()?;
    Ok(config)
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = build_config(&args)?;
    let server = RcrtServer::new(config)
        .with_context(|| format!("opening store at {}", args.db_path.display()))?;
    println!(
        "rcrt serving {} on {} ({})",
        args.db_path.display().to_string().bold(),
        format!("http://{}{}/", server.config().bind_addr, server.config().prefix).cyan(),
        server.config().mode()
    );
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_list(args: StoreArgs) -> anyhow::Result<()> {
    let store = EntryStore::open(&args.db_path)?;
    let meta = store.load()?;
    let mut entries: Vec<_> = meta.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    for (id, entry) in entries {
        println!("{} {}", format!("#{id}").yellow(), entry.kind());
    }
    Ok(())
}

fn cmd_check(args: StoreArgs) -> anyhow::Result<()> {
    let store = EntryStore::open(&args.db_path)?;
    let report = store.check()?;
    for (id, file) in &report.missing_content {
        println!("{} #{} is missing {}", "✗".red(), id, file.bold());
    }
    for d in &report.dangling {
        println!(
            "{} #{} links [{}] to unknown #{}",
            "✗".red(),
            d.article,
            d.label,
            d.target.yellow()
        );
    }
    if !report.is_clean() {
        bail!(
            "{} problem(s) in {} entries",
            report.missing_content.len() + report.dangling.len(),
            report.entries
        );
    }
    println!("{} {} entries, no issues.", "✓".green().bold(), report.entries);
    Ok(())
}
