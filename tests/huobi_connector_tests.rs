use async_trait::async_trait;
use lotusx_huobi::{
    core::{
        config::ExchangeConfig,
        journal::{EntryKind, MemoryJournal},
        kernel::RestClient,
        traits::{AccountInfo, ExchangeConnector, MarketDataSource, OrderPlacer},
    },
    exchanges::huobi::HuobiConnector,
    ExchangeError, KlineInterval, Price, Quantity, Stock, TradeType,
};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One request as seen by the transport
#[derive(Debug, Clone)]
struct Call {
    verb: &'static str,
    endpoint: String,
    params: Vec<(String, String)>,
    extra_params: Vec<(String, String)>,
    authenticated: bool,
}

impl Call {
    fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Transport that replays scripted bodies and records every request
#[derive(Clone, Default)]
struct ScriptedRest {
    responses: Arc<Mutex<VecDeque<Value>>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedRest {
    fn with_responses(responses: Vec<Value>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            calls: Arc::default(),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(
        &self,
        verb: &'static str,
        endpoint: &str,
        params: &[(&str, &str)],
        extra_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, ExchangeError> {
        let owned = |pairs: &[(&str, &str)]| -> Vec<(String, String)> {
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect()
        };
        self.calls.lock().unwrap().push(Call {
            verb,
            endpoint: endpoint.to_string(),
            params: owned(params),
            extra_params: owned(extra_params),
            authenticated,
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ExchangeError::NetworkError("no scripted response left".to_string()))
    }
}

#[async_trait]
impl RestClient for ScriptedRest {
    async fn get(
        &self,
        endpoint: &str,
        query_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, ExchangeError> {
        self.record("GET", endpoint, query_params, &[], authenticated)
    }

    async fn post_form(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        extra_params: &[(&str, &str)],
        authenticated: bool,
    ) -> Result<Value, ExchangeError> {
        self.record("POST", endpoint, params, extra_params, authenticated)
    }
}

fn connector_with(
    responses: Vec<Value>,
    config: ExchangeConfig,
) -> (HuobiConnector<ScriptedRest>, ScriptedRest, Arc<MemoryJournal>) {
    let rest = ScriptedRest::with_responses(responses);
    let journal = Arc::new(MemoryJournal::new());
    let connector = HuobiConnector::new(rest.clone(), &config, journal.clone());
    (connector, rest, journal)
}

fn connector(
    responses: Vec<Value>,
) -> (HuobiConnector<ScriptedRest>, ScriptedRest, Arc<MemoryJournal>) {
    connector_with(
        responses,
        ExchangeConfig::new("ak".to_string(), "sk".to_string()),
    )
}

fn price(s: &str) -> Price {
    s.parse().unwrap()
}

fn qty(s: &str) -> Quantity {
    s.parse().unwrap()
}

fn kline(datetime: &str, close: f64) -> Value {
    json!([datetime, close, close + 1.0, close - 1.0, close, 3.5])
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[tokio::test]
    async fn test_unsupported_symbol_makes_no_request() {
        let (connector, rest, journal) = connector(vec![]);

        let ticker = connector.get_ticker("DOGE", None).await;
        let buy = connector.buy("ETH", price("1"), qty("1")).await;
        let orders = connector.get_orders("XRP").await;
        let records = connector
            .get_records("DOGE", KlineInterval::Minutes1, None)
            .await;

        assert!(matches!(ticker, Err(ExchangeError::UnsupportedSymbol(_))));
        assert!(matches!(buy, Err(ExchangeError::UnsupportedSymbol(_))));
        assert!(matches!(orders, Err(ExchangeError::UnsupportedSymbol(_))));
        assert!(matches!(records, Err(ExchangeError::UnsupportedSymbol(_))));
        assert!(rest.calls().is_empty());
        assert_eq!(journal.entries_of(EntryKind::Error).len(), 4);
    }

    #[tokio::test]
    async fn test_unsupported_interval_makes_no_request() {
        let (connector, rest, journal) = connector(vec![]);

        let result = connector
            .get_records("BTC", KlineInterval::Minutes3, None)
            .await;

        assert!(matches!(
            result,
            Err(ExchangeError::UnsupportedInterval(KlineInterval::Minutes3))
        ));
        assert!(rest.calls().is_empty());
        let errors = journal.entries_of(EntryKind::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("get_records"));
    }

    #[tokio::test]
    async fn test_bad_order_inputs_make_no_request() {
        let (connector, rest, _journal) = connector(vec![]);

        let zero_amount = connector.buy("BTC", price("100"), Quantity::ZERO).await;
        let negative_price = connector.sell("BTC", price("-1"), qty("1")).await;
        let empty_id = connector.get_order("BTC", "").await;
        let zero_window = connector
            .get_records("BTC", KlineInterval::Minutes1, Some(0))
            .await;

        for result in [
            zero_amount.map(|_| ()),
            negative_price.map(|_| ()),
            empty_id.map(|_| ()),
            zero_window.map(|_| ()),
        ] {
            let err = result.unwrap_err();
            assert!(err.is_validation(), "unexpected error: {}", err);
        }
        assert!(rest.calls().is_empty());
    }
}

#[cfg(test)]
mod account_tests {
    use super::*;

    fn account_body() -> Value {
        json!({
            "total": "12000.50",
            "net_asset": "11800",
            "available_cny_display": "5000",
            "frozen_cny_display": "100",
            "available_btc_display": "1.25",
            "frozen_btc_display": "0.05",
            "available_ltc_display": "40",
            "frozen_ltc_display": "2.5"
        })
    }

    #[tokio::test]
    async fn test_account_request_shape() {
        let (connector, rest, _journal) = connector(vec![account_body()]);

        let account = connector.get_account().await.unwrap();

        let calls = rest.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].verb, "POST");
        assert_eq!(calls[0].endpoint, "/apiv3");
        assert!(calls[0].authenticated);
        assert_eq!(calls[0].param("method"), Some("get_account_info"));
        assert_eq!(
            calls[0].extra_params,
            vec![("market".to_string(), "cny".to_string())]
        );

        assert_eq!(account.stock, qty("1.25"));
        assert_eq!(account.frozen_stock, qty("0.05"));
        assert_eq!(account.balance, qty("5000"));
    }

    #[tokio::test]
    async fn test_account_for_ltc_uses_ltc_fields() {
        let config = ExchangeConfig::new("ak".to_string(), "sk".to_string()).main_stock("LTC");
        let (connector, _rest, _journal) = connector_with(vec![account_body()], config);

        assert_eq!(connector.main_stock(), Stock::Ltc);
        let account = connector.get_account().await.unwrap();

        assert_eq!(account.stock, qty("40"));
        assert_eq!(account.frozen_stock, qty("2.5"));
        assert_eq!(account.btc, qty("1.25"));
    }

    #[tokio::test]
    async fn test_switching_main_stock() {
        let (mut connector, _rest, journal) = connector(vec![account_body()]);

        assert_eq!(connector.set_main_stock("ltc"), Stock::Ltc);
        assert_eq!(connector.set_main_stock("DOGE"), Stock::Ltc);
        assert_eq!(journal.entries_of(EntryKind::Error).len(), 1);

        let account = connector.get_account().await.unwrap();
        assert_eq!(account.stock, qty("40"));
    }

    #[tokio::test]
    async fn test_log_writes_info_entry_without_request() {
        let (connector, rest, journal) = connector(vec![]);

        connector.log("strategy started");
        connector.log(format!("position {}", 3));

        assert!(rest.calls().is_empty());
        let infos = journal.entries_of(EntryKind::Info);
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].message, "strategy started");
        assert_eq!(infos[1].message, "position 3");
        assert_eq!(infos[0].price, Price::ZERO);
        assert_eq!(infos[0].amount, Quantity::ZERO);
    }

    #[tokio::test]
    async fn test_vendor_error_code_fails_whole_call() {
        let (connector, _rest, journal) = connector(vec![json!({
            "code": 65,
            "msg": "invalid signature",
            "total": "12000.50"
        })]);

        match connector.get_account().await {
            Err(ExchangeError::ApiError { code, message }) => {
                assert_eq!(code, 65);
                assert_eq!(message, "invalid signature");
            }
            other => panic!("expected api error, got {:?}", other),
        }

        let errors = journal.entries_of(EntryKind::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("get_account"));
        assert!(errors[0].message.contains("invalid signature"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported_once() {
        let (connector, rest, journal) = connector(vec![]);

        let result = connector.get_account().await;

        assert!(matches!(result, Err(ExchangeError::NetworkError(_))));
        assert_eq!(rest.calls().len(), 1);
        assert_eq!(journal.entries().len(), 1);
    }
}

#[cfg(test)]
mod trading_tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_buy() {
        let (connector, rest, journal) =
            connector(vec![json!({"result": "success", "id": 1_234_567_890_123_u64})]);

        let id = connector
            .buy("BTC", price("2450.50"), qty("0.500"))
            .await
            .unwrap();

        assert_eq!(id, "1234567890123");
        let call = &rest.calls()[0];
        assert!(call.authenticated);
        assert_eq!(call.param("method"), Some("buy"));
        assert_eq!(call.param("coin_type"), Some("1"));
        assert_eq!(call.param("price"), Some("2450.5"));
        assert_eq!(call.param("amount"), Some("0.5"));

        let buys = journal.entries_of(EntryKind::Buy);
        assert_eq!(buys.len(), 1);
        assert_eq!(buys[0].price, price("2450.5"));
        assert_eq!(buys[0].amount, qty("0.5"));
        assert!(journal.entries_of(EntryKind::Error).is_empty());
    }

    #[tokio::test]
    async fn test_zero_price_sells_at_market() {
        let (connector, rest, journal) = connector(vec![json!({"result": "success", "id": "s-9"})]);

        let id = connector.sell("LTC", Price::ZERO, qty("3")).await.unwrap();

        assert_eq!(id, "s-9");
        let call = &rest.calls()[0];
        assert_eq!(call.param("method"), Some("sell_market"));
        assert_eq!(call.param("coin_type"), Some("2"));
        assert_eq!(call.param("price"), None);
        assert_eq!(journal.entries_of(EntryKind::Sell).len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_buy_is_not_journaled_as_trade() {
        let (connector, _rest, journal) =
            connector(vec![json!({"code": 63, "msg": "insufficient balance"})]);

        let result = connector.buy("BTC", price("100"), qty("1")).await;

        assert!(result.unwrap_err().is_rejection());
        assert!(journal.entries_of(EntryKind::Buy).is_empty());
        assert_eq!(journal.entries_of(EntryKind::Error).len(), 1);
    }

    #[tokio::test]
    async fn test_get_order_keeps_id_and_maps_type() {
        let (connector, rest, _journal) = connector(vec![json!({
            "id": 42,
            "type": 3,
            "order_price": "0",
            "order_amount": "100",
            "processed_amount": "40"
        })]);

        let order = connector.get_order("BTC", "42").await.unwrap();

        assert_eq!(rest.calls()[0].param("method"), Some("order_info"));
        assert_eq!(rest.calls()[0].param("id"), Some("42"));
        assert_eq!(order.id, "42");
        assert_eq!(order.trade_type, Some(TradeType::BuyMarket));
        assert_eq!(order.deal_amount, qty("40"));
        assert_eq!(order.stock, Stock::Btc);
    }

    #[tokio::test]
    async fn test_get_order_keeps_ids_wider_than_u64() {
        let body = r#"{"id": 123456789012345678901234567890, "type": 1, "order_amount": "1"}"#;
        let (connector, _rest, _journal) = connector(vec![serde_json::from_str(body).unwrap()]);

        let order = connector
            .get_order("BTC", "123456789012345678901234567890")
            .await
            .unwrap();

        assert_eq!(order.id, "123456789012345678901234567890");
    }

    #[tokio::test]
    async fn test_notes_are_carried_into_trade_entries() {
        let (connector, _rest, journal) = connector(vec![
            json!({"result": "success", "id": 501}),
            json!({"result": "success", "id": 502}),
            json!({"result": "success", "id": 503}),
        ]);

        connector
            .buy_with_note("BTC", price("2400"), qty("1"), "grid level 3")
            .await
            .unwrap();
        connector
            .sell_with_note("LTC", Price::ZERO, qty("2"), "take profit")
            .await
            .unwrap();
        connector.buy("BTC", price("2300"), qty("1")).await.unwrap();

        let buys = journal.entries_of(EntryKind::Buy);
        let sells = journal.entries_of(EntryKind::Sell);
        assert_eq!(buys.len(), 2);
        assert_eq!(buys[0].message, "buy BTC order 501: grid level 3");
        assert_eq!(buys[1].message, "buy BTC order 503");
        assert_eq!(sells.len(), 1);
        assert_eq!(sells[0].message, "sell_market LTC order 502: take profit");
        assert_eq!(sells[0].amount, qty("2"));
    }

    #[tokio::test]
    async fn test_note_on_failed_order_is_not_journaled_as_trade() {
        let (connector, _rest, journal) =
            connector(vec![json!({"code": 63, "msg": "insufficient balance"})]);

        let result = connector
            .sell_with_note("BTC", price("2500"), qty("1"), "exit")
            .await;

        assert!(result.unwrap_err().is_rejection());
        assert!(journal.entries_of(EntryKind::Sell).is_empty());
        let errors = journal.entries_of(EntryKind::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with("sell(BTC"));
    }

    #[tokio::test]
    async fn test_cancel_success_and_refusal() {
        let (connector, rest, journal) = connector(vec![
            json!({"result": "success"}),
            json!({"result": "fail", "msg": "order already filled"}),
        ]);
        let order = lotusx_huobi::Order {
            id: "77".to_string(),
            price: price("2400"),
            amount: qty("1"),
            deal_amount: Quantity::ZERO,
            trade_type: Some(TradeType::BuyLimit),
            stock: Stock::Btc,
        };

        connector.cancel_order(&order).await.unwrap();
        let refused = connector.cancel_order(&order).await;

        assert_eq!(rest.calls()[0].param("method"), Some("cancel_order"));
        assert_eq!(rest.calls()[0].param("id"), Some("77"));
        assert!(matches!(refused, Err(ExchangeError::Rejected(_))));
        assert_eq!(journal.entries_of(EntryKind::Cancel).len(), 1);
        let errors = journal.entries_of(EntryKind::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("order already filled"));
    }

    #[tokio::test]
    async fn test_open_and_filled_order_lists() {
        let (connector, rest, _journal) = connector(vec![
            json!([
                {"id": 1, "type": 1, "order_price": "2400", "order_amount": "1", "processed_amount": "0"},
                {"id": 2, "type": 9, "order_price": "2500", "order_amount": "2", "processed_amount": "0"}
            ]),
            json!([]),
        ]);

        let open = connector.get_orders("BTC").await.unwrap();
        let filled = connector.get_trades("LTC").await.unwrap();

        assert_eq!(open.len(), 2);
        assert_eq!(open[0].trade_type, Some(TradeType::BuyLimit));
        assert_eq!(open[1].trade_type, None);
        assert!(filled.is_empty());

        let calls = rest.calls();
        assert_eq!(calls[0].param("method"), Some("get_orders"));
        assert_eq!(calls[1].param("method"), Some("get_new_deal_orders"));
        assert_eq!(calls[1].param("coin_type"), Some("2"));
    }
}

#[cfg(test)]
mod market_data_tests {
    use super::*;

    #[tokio::test]
    async fn test_ticker_depth_and_ordering() {
        let depth = json!({
            "bids": [[2440.0, 1.0], [2450.0, 0.5]],
            "asks": [[2470.0, 2.0], [2460.0, 0.1]]
        });
        let (connector, rest, _journal) = connector(vec![depth.clone(), depth]);

        let ticker = connector.get_ticker("BTC", None).await.unwrap();
        connector.get_ticker("btc", Some(50)).await.unwrap();

        assert_eq!(ticker.buy, price("2450"));
        assert_eq!(ticker.sell, price("2460"));
        assert_eq!(ticker.mid, price("2455"));
        assert_eq!(ticker.asks[1].price, price("2470"));

        let calls = rest.calls();
        assert_eq!(calls[0].verb, "GET");
        assert!(!calls[0].authenticated);
        assert_eq!(calls[0].endpoint, "/staticmarket/depth_btc_20.js");
        assert_eq!(calls[1].endpoint, "/staticmarket/depth_btc_50.js");
    }

    #[tokio::test]
    async fn test_empty_book_is_an_error() {
        let (connector, _rest, _journal) = connector(vec![json!({"bids": [], "asks": [[1, 1]]})]);

        let result = connector.get_ticker("LTC", Some(5)).await;
        assert!(matches!(result, Err(ExchangeError::DeserializationError(_))));
    }

    #[tokio::test]
    async fn test_records_reconcile_across_polls() {
        let (connector, rest, _journal) = connector(vec![
            json!([
                kline("20161010101200000", 12.0),
                kline("20161010101100000", 11.0),
                kline("20161010101000000", 10.0)
            ]),
            json!([
                kline("20161010101300000", 13.0),
                kline("20161010101200000", 12.5),
                kline("20161010101100000", 11.0)
            ]),
        ]);

        let first = connector
            .get_records("BTC", KlineInterval::Minutes1, None)
            .await
            .unwrap();
        let second = connector
            .get_records("BTC", KlineInterval::Minutes1, None)
            .await
            .unwrap();

        assert_eq!(rest.calls()[0].endpoint, "/staticmarket/btc_kline_001_json.js");
        assert_eq!(first.len(), 3);
        assert_eq!(first[0].time, 1_476_065_400);

        let times: Vec<i64> = second.iter().map(|r| r.time).collect();
        assert_eq!(
            times,
            vec![1_476_065_400, 1_476_065_460, 1_476_065_520, 1_476_065_580]
        );
        assert_eq!(second[2].close, price("12.5"));
        assert_eq!(second[3].close, price("13"));
    }

    #[tokio::test]
    async fn test_records_window_cap() {
        let (connector, rest, _journal) = connector(vec![
            json!([
                kline("20161010110000000", 3.0),
                kline("20161010100000000", 2.0),
                kline("20161010090000000", 1.0)
            ]),
            json!([kline("20161010120000000", 4.0)]),
        ]);

        let first = connector
            .get_records("LTC", KlineInterval::Hours1, Some(2))
            .await
            .unwrap();
        let second = connector
            .get_records("LTC", KlineInterval::Hours1, Some(2))
            .await
            .unwrap();

        assert_eq!(rest.calls()[0].endpoint, "/staticmarket/ltc_kline_060_json.js");
        assert_eq!(first.len(), 2);
        assert_eq!(first[1].close, price("3"));
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].close, price("3"));
        assert_eq!(second[1].close, price("4"));
    }

    #[tokio::test]
    async fn test_failed_poll_keeps_window() {
        let (connector, _rest, journal) = connector(vec![
            json!([kline("20161010101000000", 10.0)]),
            json!([["not-a-date", 1, 1, 1, 1, 1]]),
        ]);

        connector
            .get_records("BTC", KlineInterval::Minutes1, None)
            .await
            .unwrap();
        let broken = connector
            .get_records("BTC", KlineInterval::Minutes1, None)
            .await;

        assert!(matches!(broken, Err(ExchangeError::DeserializationError(_))));
        assert_eq!(
            connector
                .market
                .cached_records(Stock::Btc, KlineInterval::Minutes1)
                .len(),
            1
        );
        assert_eq!(journal.entries_of(EntryKind::Error).len(), 1);
    }
}
