//! Walk through a few LN Markets calls.
//!
//! ```sh
//! LNMARKETS_API_KEY=... LNMARKETS_SECRET=... LNMARKETS_PASSPHRASE=... \
//!     RUST_LOG=info cargo run --example rest
//! ```

use lnmarkets::{ClientConfig, Credentials, LnMarketsClient, NewPositionRequest, OrderSide, OrderType};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let credentials = Credentials::from_env()?;
    log::info!("Using credentials {:?}", credentials);

    let client = LnMarketsClient::with_config(credentials, ClientConfig::from_env())?;

    let ticker = client.ticker().await?;
    log::info!("ticker: {:?}", ticker);

    let positions = client.positions().await?;
    log::info!("positions: {:?}", positions);

    let user = client.user().await?;
    log::info!("user: {:?}", user);

    let margin = client
        .add_margin(100, "99c470e1-2e03-4486-a37f-1255e08178b1")
        .await?;
    log::info!("add margin: {:?}", margin);

    let order = NewPositionRequest {
        order_type: OrderType::Market,
        side: OrderSide::Buy,
        price: 10000.0,
        margin: 0,
        stoploss: 0.0,
        takeprofit: 0.0,
        quantity: 0.0,
        leverage: 0.0,
    };
    match client.new_position(&order).await?.into_result() {
        Ok(position) => log::info!("new position: {:?}", position),
        Err(e) => log::warn!("order rejected: {}", e),
    }

    Ok(())
}
