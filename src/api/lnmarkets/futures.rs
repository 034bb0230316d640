use reqwest::Method;

use super::client::{LnMarketsClient, RequestDescriptor};
use super::types::*;
use crate::api::{error::ApiError, response::ApiResponse, signing::Params};

const FUTURES: &str = "futures";
const TICKER: &str = "futures/ticker";
const ADD_MARGIN: &str = "futures/add-margin";
const CANCEL: &str = "futures/cancel";
const CANCEL_ALL: &str = "futures/all/cancel";
const CLOSE_ALL: &str = "futures/all/close";
const CARRY_FEES: &str = "futures/carry-fees";
const CASH_IN: &str = "futures/cash-in";
const BID_OFFER_HISTORY: &str = "futures/history/bid-offer";
const INDEX_HISTORY: &str = "futures/history/index";
const FIXING_HISTORY: &str = "futures/history/fixing";

fn range_params(from: i64, to: i64, limit: i64) -> Params {
    Params::from([
        ("from".to_string(), from.to_string()),
        ("to".to_string(), to.to_string()),
        ("limit".to_string(), limit.to_string()),
    ])
}

impl LnMarketsClient {
    /// Futures ticker (public)
    pub async fn ticker(&self) -> Result<ApiResponse<TickerResponse>, ApiError> {
        self.request(RequestDescriptor::new(Method::GET, TICKER, false)).await
    }

    /// Every position of the user
    pub async fn positions(&self) -> Result<ApiResponse<PositionsResponse>, ApiError> {
        self.request(RequestDescriptor::new(Method::GET, FUTURES, true)).await
    }

    /// Add margin (in satoshis) to a running position
    pub async fn add_margin(
        &self,
        amount: i64,
        pid: &str,
    ) -> Result<ApiResponse<AddMarginResponse>, ApiError> {
        let body = AddMarginRequest {
            amount,
            pid: pid.to_string(),
        };
        self.request(RequestDescriptor::new(Method::POST, ADD_MARGIN, true).with_json(&body)?)
            .await
    }

    /// Cancel a position that is not filled yet
    pub async fn cancel(&self, pid: &str) -> Result<ApiResponse<CancelResponse>, ApiError> {
        let body = PidRequest { pid: pid.to_string() };
        self.request(RequestDescriptor::new(Method::POST, CANCEL, true).with_json(&body)?)
            .await
    }

    /// Cancel every open (unfilled) position
    pub async fn cancel_all(&self) -> Result<ApiResponse<CancelAllResponse>, ApiError> {
        self.request(RequestDescriptor::new(Method::DELETE, CANCEL_ALL, true)).await
    }

    /// Close a running position; PL is computed against the current bid or offer
    pub async fn close(&self, pid: &str) -> Result<ApiResponse<CloseResponse>, ApiError> {
        let params = Params::from([("pid".to_string(), pid.to_string())]);
        self.request(RequestDescriptor::new(Method::DELETE, FUTURES, true).with_params(params))
            .await
    }

    /// Close every running position
    pub async fn close_all(&self) -> Result<ApiResponse<CloseAllResponse>, ApiError> {
        self.request(RequestDescriptor::new(Method::DELETE, CLOSE_ALL, true)).await
    }

    /// Carry fees paid by the user between `from` and `to` (Unix ms)
    pub async fn carry_fees_history(
        &self,
        from: i64,
        to: i64,
        limit: i64,
    ) -> Result<ApiResponse<CarryFeesHistoryResponse>, ApiError> {
        self.request(
            RequestDescriptor::new(Method::GET, CARRY_FEES, true)
                .with_params(range_params(from, to, limit)),
        )
        .await
    }

    /// Withdraw `amount` satoshis of a running position's PL
    pub async fn cash_in(
        &self,
        amount: i64,
        pid: &str,
    ) -> Result<ApiResponse<CashInResponse>, ApiError> {
        let body = CashInRequest {
            amount,
            pid: pid.to_string(),
        };
        self.request(RequestDescriptor::new(Method::POST, CASH_IN, true).with_json(&body)?)
            .await
    }

    /// Open a new position from an order form
    pub async fn new_position(
        &self,
        order: &NewPositionRequest,
    ) -> Result<ApiResponse<NewPositionResponse>, ApiError> {
        self.request(RequestDescriptor::new(Method::POST, FUTURES, true).with_json(order)?)
            .await
    }

    /// Move the take profit or stop loss of a position
    pub async fn update_position(
        &self,
        pid: &str,
        update_type: UpdateType,
        value: f64,
    ) -> Result<ApiResponse<UpdateResponse>, ApiError> {
        let body = UpdatePositionRequest {
            pid: pid.to_string(),
            update_type,
            value,
        };
        self.request(RequestDescriptor::new(Method::PUT, FUTURES, true).with_json(&body)?)
            .await
    }

    pub async fn bid_offer_history(
        &self,
        from: i64,
        to: i64,
        limit: i64,
    ) -> Result<ApiResponse<BidOfferHistoryResponse>, ApiError> {
        self.request(
            RequestDescriptor::new(Method::GET, BID_OFFER_HISTORY, false)
                .with_params(range_params(from, to, limit)),
        )
        .await
    }

    pub async fn index_history(
        &self,
        from: i64,
        to: i64,
        limit: i64,
    ) -> Result<ApiResponse<IndexHistoryResponse>, ApiError> {
        self.request(
            RequestDescriptor::new(Method::GET, INDEX_HISTORY, false)
                .with_params(range_params(from, to, limit)),
        )
        .await
    }

    pub async fn fixing_history(
        &self,
        from: i64,
        to: i64,
        limit: i64,
    ) -> Result<ApiResponse<FixingHistoryResponse>, ApiError> {
        self.request(
            RequestDescriptor::new(Method::GET, FIXING_HISTORY, false)
                .with_params(range_params(from, to, limit)),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::lnmarkets::client::tests::{client_with, StubTransport, TS};
    use crate::api::lnmarkets::client::{
        HEADER_ACCESS_KEY, HEADER_ACCESS_SIGNATURE, HEADER_ACCESS_TIMESTAMP,
    };
    use crate::api::signing::compute_signature;
    use reqwest::header::CONTENT_TYPE;
    use reqwest::StatusCode;
    use std::sync::Arc;

    const PID: &str = "99c470e1-2e03-4486-a37f-1255e08178b1";

    #[tokio::test]
    async fn test_ticker_is_public_get() {
        let stub = Arc::new(StubTransport::new(
            StatusCode::OK,
            r#"{"bid":100.5,"offer":101.0,"index":100.8}"#,
        ));
        let client = client_with(Arc::clone(&stub));

        let ticker = client.ticker().await.unwrap().data().unwrap();
        assert_eq!(
            ticker,
            TickerResponse {
                bid: 100.5,
                offer: 101.0,
                index: 100.8
            }
        );

        let request = stub.last_request();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.path, "/v1/futures/ticker");
        assert!(request.headers.get(HEADER_ACCESS_KEY).is_none());
        assert!(request.headers.get(HEADER_ACCESS_TIMESTAMP).is_some());
    }

    #[tokio::test]
    async fn test_new_position_golden_signature() {
        let stub = Arc::new(StubTransport::new(
            StatusCode::OK,
            r#"{"pid":"abc","type":"m","side":"b","price":10000,"margin":100,"creation_ts":1609459200000}"#,
        ));
        let client = client_with(Arc::clone(&stub));

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
        let position = client.new_position(&order).await.unwrap().data().unwrap();
        assert_eq!(position.pid, "abc");
        assert_eq!(position.creation_ts, 1609459200000);

        let request = stub.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/v1/futures");
        assert_eq!(
            request.raw_body,
            br#"{"type":"m","side":"b","price":10000,"margin":0,"stoploss":0,"takeprofit":0,"quantity":0,"leverage":0}"#.to_vec()
        );
        assert_eq!(
            request.headers.get(HEADER_ACCESS_SIGNATURE).unwrap(),
            "GI2eDsLuw0NOZ0X1hqrCORHst1hOJ6DsR6uELUkWEhg="
        );
        assert_eq!(request.headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[tokio::test]
    async fn test_add_margin_sends_json_body() {
        let stub = Arc::new(StubTransport::new(StatusCode::OK, r#"{"pid":"x","margin":200}"#));
        let client = client_with(Arc::clone(&stub));

        let position = client.add_margin(100, PID).await.unwrap().data().unwrap();
        assert_eq!(position.margin, 200);

        let request = stub.last_request();
        assert_eq!(request.path, "/v1/futures/add-margin");
        assert_eq!(
            String::from_utf8(request.raw_body.clone()).unwrap(),
            format!(r#"{{"amount":100,"pid":"{}"}}"#, PID)
        );
        let expected = compute_signature(TS, "POST", "/v1/futures/add-margin", &request.raw_body, "secret");
        assert_eq!(request.headers.get(HEADER_ACCESS_SIGNATURE).unwrap(), expected.as_str());
    }

    #[tokio::test]
    async fn test_cancel_and_cash_in_send_pid() {
        let stub = Arc::new(StubTransport::new(StatusCode::OK, r#"{"pid":"x"}"#));
        let client = client_with(Arc::clone(&stub));

        client.cancel(PID).await.unwrap();
        let request = stub.last_request();
        assert_eq!((request.method, request.path.as_str()), (Method::POST, "/v1/futures/cancel"));
        assert_eq!(request.raw_body, format!(r#"{{"pid":"{}"}}"#, PID).into_bytes());

        client.cash_in(500, PID).await.unwrap();
        let request = stub.last_request();
        assert_eq!(request.path, "/v1/futures/cash-in");
        assert_eq!(request.raw_body, format!(r#"{{"amount":500,"pid":"{}"}}"#, PID).into_bytes());
    }

    #[tokio::test]
    async fn test_close_endpoints_use_delete() {
        let stub = Arc::new(StubTransport::new(StatusCode::OK, r#"{"data":[]}"#));
        let client = client_with(Arc::clone(&stub));

        client.close_all().await.unwrap();
        let request = stub.last_request();
        assert_eq!((request.method, request.path.as_str()), (Method::DELETE, "/v1/futures/all/close"));
        assert_eq!(
            request.headers.get(HEADER_ACCESS_SIGNATURE).unwrap(),
            "fdDif7t4dwSNJUJh4ek3ND/vr0V0WO1svMp4PZiAbI8="
        );

        client.cancel_all().await.unwrap();
        assert_eq!(stub.last_request().path, "/v1/futures/all/cancel");

        client.close(PID).await.unwrap();
        let request = stub.last_request();
        assert_eq!((request.method, request.path.as_str()), (Method::DELETE, "/v1/futures"));
        assert_eq!(request.raw_body, format!("pid={}", PID).into_bytes());
    }

    #[tokio::test]
    async fn test_carry_fees_history_params() {
        let stub = Arc::new(StubTransport::new(
            StatusCode::OK,
            r#"{"data":[{"fixing":"f-1","index":29000}]}"#,
        ));
        let client = client_with(Arc::clone(&stub));

        let fees = client.carry_fees_history(1, 2, 10).await.unwrap().data().unwrap();
        assert_eq!(fees.data.len(), 1);
        assert_eq!(fees.data[0].fixing, "f-1");

        let request = stub.last_request();
        assert_eq!(request.raw_body, b"from=1&limit=10&to=2".to_vec());
        assert_eq!(
            request.headers.get(HEADER_ACCESS_SIGNATURE).unwrap(),
            "z4Cg+JG8sTZheitsNy/FbnzjSLdLiMF6nywYyS8qrPs="
        );
    }

    #[tokio::test]
    async fn test_positions_no_data() {
        let stub = Arc::new(StubTransport::new(StatusCode::OK, "[]"));
        let client = client_with(Arc::clone(&stub));

        let positions = client.positions().await.unwrap();
        assert_eq!(positions, ApiResponse::NoData);
        assert_eq!(stub.last_request().path, "/v1/futures");
    }

    #[tokio::test]
    async fn test_rejected_order_is_surfaced() {
        let stub = Arc::new(StubTransport::new(StatusCode::BAD_REQUEST, r#"{"error":"invalid amount"}"#));
        let client = client_with(Arc::clone(&stub));

        let response = client.add_margin(-1, PID).await.unwrap();
        assert_eq!(response.error_message(), Some("invalid amount"));
        assert!(matches!(
            response.into_result(),
            Err(ApiError::Rejected { status: 400, .. })
        ));
    }

    #[tokio::test]
    async fn test_update_position_uses_put() {
        let stub = Arc::new(StubTransport::new(
            StatusCode::OK,
            r#"{"pid":"x","type":"stoploss","value":9000}"#,
        ));
        let client = client_with(Arc::clone(&stub));

        let update = client
            .update_position(PID, UpdateType::Stoploss, 9000.0)
            .await
            .unwrap()
            .data()
            .unwrap();
        assert_eq!(update.update_type, "stoploss");
        assert_eq!(update.value, 9000.0);

        let request = stub.last_request();
        assert_eq!(request.method, Method::PUT);
        assert_eq!(
            request.raw_body,
            format!(r#"{{"pid":"{}","type":"stoploss","value":9000}}"#, PID).into_bytes()
        );
    }

    #[tokio::test]
    async fn test_history_endpoints_are_public() {
        let stub = Arc::new(StubTransport::new(
            StatusCode::OK,
            r#"{"data":[{"time":1609459200000,"index":29000.5}]}"#,
        ));
        let client = client_with(Arc::clone(&stub));

        let history = client.index_history(1, 2, 3).await.unwrap().data().unwrap();
        assert_eq!(history.data[0].index, 29000.5);
        let request = stub.last_request();
        assert_eq!(request.path, "/v1/futures/history/index");
        assert!(request.headers.get(HEADER_ACCESS_SIGNATURE).is_none());
        assert_eq!(request.raw_body, b"from=1&limit=3&to=2".to_vec());

        client.bid_offer_history(1, 2, 3).await.unwrap();
        assert_eq!(stub.last_request().path, "/v1/futures/history/bid-offer");

        client.fixing_history(1, 2, 3).await.unwrap();
        assert_eq!(stub.last_request().path, "/v1/futures/history/fixing");
    }
}
