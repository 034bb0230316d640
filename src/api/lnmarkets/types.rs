use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    #[serde(rename = "b")]
    Buy,
    #[serde(rename = "s")]
    Sell,
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    #[serde(rename = "l")]
    Limit,
    #[serde(rename = "m")]
    Market,
}

/// Position attribute targeted by an update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateType {
    Takeprofit,
    Stoploss,
}

/// Write integral floats without a fraction (`10000`, not `10000.0`) so the
/// signed body matches what the exchange documents
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Accept timestamps sent either as JSON numbers or as numeric strings
fn deserialize_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
        Null(()),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(v) => Ok(v),
        Raw::Float(v) => Ok(v as i64),
        Raw::Text(s) if s.is_empty() => Ok(0),
        Raw::Text(s) => s
            .parse::<i64>()
            .map_err(|e| serde::de::Error::custom(format!("Invalid timestamp {:?}: {}", s, e))),
        Raw::Null(()) => Ok(0),
    }
}

// ---- requests ----

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddMarginRequest {
    pub amount: i64,
    pub pid: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PidRequest {
    pub pid: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashInRequest {
    pub amount: i64,
    pub pid: String,
}

/// Order form for a new position
///
/// With `type = Limit` the `price` is the fill trigger. Either `margin` or
/// `quantity` may be given; the exchange derives the other one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPositionRequest {
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub side: OrderSide,
    #[serde(serialize_with = "serialize_number")]
    pub price: f64,
    pub margin: i64,
    #[serde(serialize_with = "serialize_number")]
    pub stoploss: f64,
    #[serde(serialize_with = "serialize_number")]
    pub takeprofit: f64,
    #[serde(serialize_with = "serialize_number")]
    pub quantity: f64,
    #[serde(serialize_with = "serialize_number")]
    pub leverage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdatePositionRequest {
    pub pid: String,
    #[serde(rename = "type")]
    pub update_type: UpdateType,
    #[serde(serialize_with = "serialize_number")]
    pub value: f64,
}

// ---- responses ----

/// Futures ticker
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerResponse {
    pub bid: f64,
    pub offer: f64,
    pub index: f64,
}

/// Position as returned by add-margin and new-position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionResponse {
    pub pid: String,
    pub id: i64,
    #[serde(rename = "type")]
    pub order_type: String,
    pub takeprofit_wi: String,
    pub takeprofit: f64,
    pub stoploss_wi: String,
    pub stoploss: f64,
    pub side: String,
    pub quantity: f64,
    pub price: f64,
    pub pl: f64,
    pub market_wi: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub market_filled_ts: i64,
    pub margin_wi: String,
    pub margin: i64,
    pub liquidation: f64,
    pub leverage: f64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub creation_ts: i64,
}

pub type AddMarginResponse = PositionResponse;
pub type NewPositionResponse = PositionResponse;

/// Position entry of the positions listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub pid: String,
    pub id: i64,
    #[serde(rename = "type")]
    pub order_type: String,
    pub takeprofit_wi: String,
    pub takeprofit: f64,
    pub stoploss_wi: String,
    pub stoploss: f64,
    pub sign: i64,
    pub side: String,
    pub quantity: f64,
    pub price: f64,
    pub pl: f64,
    pub market_wi: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub market_filled_ts: i64,
    pub margin_wi: String,
    pub margin: i64,
    pub liquidation: f64,
    pub leverage: f64,
    pub exit_price: f64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub creation_ts: i64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub closed_ts: i64,
    pub closed: bool,
    pub canceled: bool,
    pub sum_carry_fees: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionsResponse {
    pub positions: Vec<Position>,
}

/// Result of closing one position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloseResponse {
    pub pid: String,
    pub exit_price: f64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub closed_ts: i64,
    pub closed: bool,
    pub pl: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloseAllResponse {
    pub data: Vec<CloseResponse>,
}

pub type CancelAllResponse = CloseAllResponse;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CancelResponse {
    pub pid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarryFee {
    pub fixing: String,
    pub index: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarryFeesHistoryResponse {
    pub data: Vec<CarryFee>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CashInResponse {
    pub amount: i64,
    pub pid: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateResponse {
    pub pid: String,
    #[serde(rename = "type")]
    pub update_type: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BidOffer {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub time: i64,
    pub bid: f64,
    pub offer: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BidOfferHistoryResponse {
    pub data: Vec<BidOffer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexPoint {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub time: i64,
    pub index: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexHistoryResponse {
    pub data: Vec<IndexPoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixing {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub ts: i64,
    pub id: String,
    pub fixing_price: f64,
    pub fee_percent_value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixingHistoryResponse {
    pub data: Vec<Fixing>,
}

/// Account information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserResponse {
    pub uid: String,
    /// Balance in satoshis
    pub balance: i64,
    pub account_type: String,
    pub username: String,
    pub linkingpublickey: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_position_body_bytes() {
        let request = NewPositionRequest {
            order_type: OrderType::Market,
            side: OrderSide::Buy,
            price: 10000.0,
            margin: 0,
            stoploss: 0.0,
            takeprofit: 0.0,
            quantity: 0.0,
            leverage: 0.0,
        };

        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"type":"m","side":"b","price":10000,"margin":0,"stoploss":0,"takeprofit":0,"quantity":0,"leverage":0}"#
        );
    }

    #[test]
    fn test_fractional_values_keep_fraction() {
        let request = UpdatePositionRequest {
            pid: "abc".to_string(),
            update_type: UpdateType::Takeprofit,
            value: 10500.5,
        };

        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"pid":"abc","type":"takeprofit","value":10500.5}"#
        );
    }

    #[test]
    fn test_positions_decode_with_mixed_timestamps() {
        let json = r#"{"positions":[{
            "pid":"99c470e1-2e03-4486-a37f-1255e08178b1",
            "type":"m","side":"b","price":10000,"margin":1000,"leverage":10,
            "creation_ts":1609459200000,"market_filled_ts":"1609459201000","closed_ts":null,
            "closed":false,"canceled":false,"sum_carry_fees":3
        }]}"#;

        let positions: PositionsResponse = serde_json::from_str(json).unwrap();
        let position = &positions.positions[0];
        assert_eq!(position.pid, "99c470e1-2e03-4486-a37f-1255e08178b1");
        assert_eq!(position.order_type, "m");
        assert_eq!(position.price, 10000.0);
        assert_eq!(position.margin, 1000);
        assert_eq!(position.creation_ts, 1609459200000);
        assert_eq!(position.market_filled_ts, 1609459201000);
        assert_eq!(position.closed_ts, 0);
        assert_eq!(position.sum_carry_fees, 3);
        assert_eq!(position.takeprofit_wi, "");
    }

    #[test]
    fn test_bad_timestamp_is_rejected() {
        let json = r#"{"pid":"x","closed_ts":"yesterday"}"#;
        assert!(serde_json::from_str::<CloseResponse>(json).is_err());
    }

    #[test]
    fn test_user_decodes() {
        let json = r#"{"uid":"u-1","balance":150000,"account_type":"lnurl","username":"satoshi","linkingpublickey":"02ab"}"#;
        let user: UserResponse = serde_json::from_str(json).unwrap();
        assert_eq!(user.balance, 150000);
        assert_eq!(user.username, "satoshi");
    }
}
