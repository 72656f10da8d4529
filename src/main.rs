use lotusx_huobi::core::config::ExchangeConfig;
use lotusx_huobi::core::traits::{AccountInfo, ExchangeConnector, MarketDataSource};
use lotusx_huobi::exchanges::huobi::build_connector;
use lotusx_huobi::KlineInterval;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // Credentials are optional; without them only market data works
    let config = ExchangeConfig::from_env_file("HUOBI").unwrap_or_else(|e| {
        println!("No credentials loaded ({}), running read-only", e);
        ExchangeConfig::read_only()
    });
    let authenticated = config.has_credentials();

    let connector = build_connector(config)?;
    let symbol = connector.main_stock().to_string();

    println!("Fetching {} ticker...", symbol);
    match connector.get_ticker(&symbol, None).await {
        Ok(ticker) => println!(
            "Buy: {}  Sell: {}  Mid: {}  ({} bids / {} asks)",
            ticker.buy,
            ticker.sell,
            ticker.mid,
            ticker.bids.len(),
            ticker.asks.len()
        ),
        Err(e) => println!("Error fetching ticker: {}", e),
    }

    println!("Fetching {} 1m records...", symbol);
    for poll in 1..=2 {
        match connector
            .get_records(&symbol, KlineInterval::Minutes1, Some(60))
            .await
        {
            Ok(records) => {
                println!("Poll {}: window holds {} bars", poll, records.len());
                if let Some(last) = records.last() {
                    println!(
                        "  last bar t={} o={} h={} l={} c={} v={}",
                        last.time, last.open, last.high, last.low, last.close, last.volume
                    );
                }
            }
            Err(e) => println!("Error fetching records: {}", e),
        }
    }

    if authenticated {
        println!("Fetching account...");
        match connector.get_account().await {
            Ok(account) => println!(
                "Balance: {}  {}: {} (frozen {})",
                account.balance, symbol, account.stock, account.frozen_stock
            ),
            Err(e) => println!("Error fetching account: {}", e),
        }
    }

    Ok(())
}
