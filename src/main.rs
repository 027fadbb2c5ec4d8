use search_cluster::barrel::BarrelStore;
use search_cluster::client::{BarrelClient, GatewayClient};
use search_cluster::downloader::Downloader;
use search_cluster::frontier::Frontier;
use search_cluster::gateway::handlers::FrontierSlot;
use search_cluster::gateway::protocol::BarrelHandle;
use search_cluster::gateway::registry::BarrelRegistry;
use search_cluster::gateway::stats::GatewayStats;
use search_cluster::{barrel, gateway};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let mut role: Option<String> = None;
    let mut bind_addr: Option<SocketAddr> = None;
    let mut gateway_url: Option<String> = None;
    let mut data_dir = PathBuf::from(".");
    let mut seed_urls: Vec<String> = vec![];

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--role" => {
                role = Some(args[i + 1].clone());
                i += 2;
            }
            "--bind" => {
                bind_addr = Some(args[i + 1].parse()?);
                i += 2;
            }
            "--gateway" => {
                gateway_url = Some(args[i + 1].clone());
                i += 2;
            }
            "--data-dir" => {
                data_dir = PathBuf::from(&args[i + 1]);
                i += 2;
            }
            "--seed-url" => {
                seed_urls.push(args[i + 1].clone());
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    let role = role.expect("--role is required");

    match role.as_str() {
        "gateway" => {
            let bind_addr = bind_addr.expect("--bind is required for the gateway role");
            run_gateway(bind_addr, seed_urls).await
        }
        "barrel" => {
            let bind_addr = bind_addr.expect("--bind is required for the barrel role");
            let gateway_url = gateway_url.expect("--gateway is required for the barrel role");
            run_barrel(bind_addr, &gateway_url, data_dir).await
        }
        "downloader" => {
            let gateway_url = gateway_url.expect("--gateway is required for the downloader role");
            run_downloader(&gateway_url).await
        }
        other => {
            eprintln!("Unknown role: {}", other);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {} --role <gateway|barrel|downloader> [options]",
        program
    );
    eprintln!(
        "Example: {} --role gateway --bind 127.0.0.1:5000 --seed-url https://example.org",
        program
    );
    eprintln!(
        "Example: {} --role barrel --bind 127.0.0.1:5001 --gateway http://127.0.0.1:5000 --data-dir ./data",
        program
    );
    eprintln!(
        "Example: {} --role downloader --gateway http://127.0.0.1:5000",
        program
    );
}

async fn run_gateway(bind_addr: SocketAddr, seed_urls: Vec<String>) -> anyhow::Result<()> {
    let registry = BarrelRegistry::new();
    let stats = GatewayStats::new();
    let frontier_slot = FrontierSlot::empty();
    let client = Arc::new(BarrelClient::new());

    let frontier = Frontier::new();
    for url in seed_urls {
        tracing::info!("Seeding frontier with {}", url);
        frontier.enqueue(url).await;
    }
    frontier_slot.init(frontier.clone()).await;

    let app = gateway::handlers::router(
        registry.clone(),
        stats.clone(),
        frontier_slot.clone(),
        client.clone(),
    );

    // Periodic cluster report.
    let report_registry = registry.clone();
    let report_frontier = frontier.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(5));
        loop {
            interval.tick().await;
            tracing::info!(
                "Cluster stats: {} registered barrels, {} frontier URLs",
                report_registry.len().await,
                report_frontier.len().await
            );
        }
    });

    tracing::info!("Gateway listening on {}", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn run_barrel(
    bind_addr: SocketAddr,
    gateway_url: &str,
    data_dir: PathBuf,
) -> anyhow::Result<()> {
    let gateway = Arc::new(GatewayClient::new(gateway_url));

    // Startup is fatal if the gateway is unreachable: the barrel cannot
    // exist without an identifier.
    let barrel_number = gateway.next_barrel_number().await?;
    let store = BarrelStore::new(barrel_number, data_dir);
    store.load_snapshot().await?;
    tracing::info!(
        "Barrel {} starting with {} indexed words",
        barrel_number,
        store.index_size().await
    );

    let app = barrel::handlers::router(store.clone());
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let local_addr = listener.local_addr()?;

    gateway
        .register_barrel(&BarrelHandle {
            barrel_number,
            base_url: format!("http://{}", local_addr),
        })
        .await?;

    tracing::info!("Barrel {} listening on {}", barrel_number, local_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    // On Ctrl+C: persist the snapshot, then deregister so the gateway stops
    // routing queries here before the socket closes.
    let shutdown_store = store.clone();
    let shutdown_gateway = gateway.clone();
    let shutdown = async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        tracing::info!("Barrel {} shutting down", barrel_number);
        if let Err(e) = shutdown_store.write_snapshot().await {
            tracing::error!("Snapshot on shutdown failed: {}", e);
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
        if let Err(e) = shutdown_gateway.remove_barrel(barrel_number).await {
            tracing::warn!("Deregistration on shutdown failed: {}", e);
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

async fn run_downloader(gateway_url: &str) -> anyhow::Result<()> {
    let downloader = Downloader::connect(gateway_url).await?;
    tracing::info!(
        "Downloader {} starting crawl loop",
        downloader.downloader_number()
    );
    downloader.spawn_barrel_refresh();
    downloader.run().await;
    Ok(())
}
