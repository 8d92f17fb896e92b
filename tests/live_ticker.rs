// Hits the real API. Run with LIVE_API_TESTS=1 cargo test -- --ignored
use uphold::{Client, Config, Currency};

#[tokio::test]
#[ignore]
async fn live_ticker_usd() {
    if std::env::var("LIVE_API_TESTS").ok().as_deref() != Some("1") {
        return;
    }
    let client = Client::new(Config::from_env().unwrap()).unwrap();
    let (pairs, res) = client.ticker().for_currency(Currency::USD).await.unwrap();
    assert!(!pairs.is_empty());
    assert!(res.rate().limit > 0);
}
