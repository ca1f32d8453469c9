use path_engine::web::server::{start_server, ServerConfig};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    let mut config = ServerConfig::from_env();

    // A port on the command line wins over the environment
    if let Some(arg) = env::args().nth(1) {
        match arg.parse() {
            Ok(port) => config.port = port,
            Err(_) => log::warn!("ignoring invalid port argument {:?}", arg),
        }
    }

    println!("🔧 Starting path engine web server...");
    println!("⚙️  Configuration:");
    println!("   📡 Address: {}", config.socket_addr());
    println!("   🌐 CORS enabled: {}", config.enable_cors);
    println!("   📦 Max body size: {} bytes", config.max_body_bytes);
    println!();

    start_server(config).await?;

    Ok(())
}
