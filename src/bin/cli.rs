use moneris_gateway::handler::cmd;
use moneris_gateway::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let subscriber = get_subscriber("moneris-cli".into(), "info".into(), std::io::stderr);
    init_subscriber(subscriber);

    let matches = cmd::command::command().get_matches();
    if let Err(e) = cmd::run(matches).await {
        tracing::error!("command failed: {}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
