mod cli;
mod config;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use loopcast_core::AssetId;
use loopcast_db::pool::{get_conn, init_pool};
use loopcast_db::queries::{assets, schedule};
use loopcast_server::ingest::measure_asset;
use loopcast_server::origin::HttpOrigin;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise pick defaults from the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "loopcast=trace,loopcast_server=trace,loopcast_media=trace,loopcast_db=debug,tower_http=debug"
                .to_string()
        } else {
            "loopcast=debug,loopcast_server=debug,loopcast_media=info,loopcast_db=info,tower_http=info"
                .to_string()
        }
    });

    tracing_subscriber::fmt().with_env_filter(&env_filter).init();

    match cli.command {
        Commands::Start { host, port } => {
            let mut config = config::load_config_or_default(cli.config.as_deref())?;
            config.server.host = host;
            config.server.port = port;

            tracing::info!(
                "Starting loopcast on {}:{}",
                config.server.host,
                config.server.port
            );

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(loopcast_server::serve(config))?;
            Ok(())
        }
        Commands::Ingest { master_url, name } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(ingest(&config, &master_url, name))
        }
        Commands::Schedule {
            asset_id,
            end_epoch_ms,
        } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            add_schedule_entry(&config, &asset_id, end_epoch_ms)
        }
        Commands::Catalog => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            print_catalog(&config)
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("loopcast {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn ingest(
    config: &loopcast_core::config::Config,
    master_url: &str,
    name: Option<String>,
) -> Result<()> {
    let origin = HttpOrigin::new(&config.origin)?;
    let asset = measure_asset(&origin, master_url, name).await?;

    let pool = init_pool(&config.database.path)?;
    let conn = get_conn(&pool)?;
    assets::create(&conn, &asset)?;

    println!("Ingested {} as {}", asset.name, asset.id);
    println!(
        "  duration: {:.3}s over {} segments",
        asset.duration_ms as f64 / 1000.0,
        asset.segment_count
    );
    Ok(())
}

fn add_schedule_entry(
    config: &loopcast_core::config::Config,
    asset_id: &str,
    end_epoch_ms: Option<i64>,
) -> Result<()> {
    let asset_id = AssetId::parse(asset_id)
        .ok_or_else(|| anyhow::anyhow!("Asset id {asset_id:?} is not a UUID"))?;

    let pool = init_pool(&config.database.path)?;
    let conn = get_conn(&pool)?;
    let asset = assets::get(&conn, asset_id)?;
    schedule::insert(&conn, asset_id, end_epoch_ms)?;

    match end_epoch_ms {
        Some(end) => println!("Scheduled {} until {end}", asset.name),
        None => println!("Scheduled {} as the now-playing entry", asset.name),
    }
    Ok(())
}

fn print_catalog(config: &loopcast_core::config::Config) -> Result<()> {
    let pool = init_pool(&config.database.path)?;
    let conn = get_conn(&pool)?;

    let all_assets = assets::list(&conn)?;
    println!("Assets: {}", all_assets.len());
    for asset in &all_assets {
        println!(
            "  {} {} ({:.3}s, {} segments)",
            asset.id,
            asset.name,
            asset.duration_ms as f64 / 1000.0,
            asset.segment_count
        );
    }

    let entries = schedule::scan(&conn)?;
    println!("Schedule: {}", entries.len());
    for entry in &entries {
        match entry.end_ms {
            Some(end) => println!("  {} until {end}", entry.asset.name),
            None => println!("  {} (now playing)", entry.asset.name),
        }
    }
    Ok(())
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!(
                "  Sliding window: {}s",
                config.stream.sliding_window_secs
            );
            println!(
                "  CDN base: {}",
                config.stream.cdn_base_url.as_deref().unwrap_or("(origin direct)")
            );
            println!("  Database: {}", config.database.path);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = loopcast_core::config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Sliding window: {}s", config.stream.sliding_window_secs);
        }
    }

    Ok(())
}
