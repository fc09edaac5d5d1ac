use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ConsoleError, ConsoleResult};

/// A single geographic point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Rectangle given by its south-west and north-east corners.
///
/// Corner ordering is not enforced: the server accepts any pair of points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub sw: LatLng,
    pub ne: LatLng,
}

impl Bounds {
    pub fn new(sw: LatLng, ne: LatLng) -> Self {
        Self { sw, ne }
    }

    /// Parses four raw input fields and validates the result.
    pub fn parse(sw_lat: &str, sw_lng: &str, ne_lat: &str, ne_lng: &str) -> ConsoleResult<Self> {
        let bounds = Self {
            sw: LatLng::new(
                parse_number("sw.lat", sw_lat)?,
                parse_number("sw.lng", sw_lng)?,
            ),
            ne: LatLng::new(
                parse_number("ne.lat", ne_lat)?,
                parse_number("ne.lng", ne_lng)?,
            ),
        };
        bounds.validate()?;
        Ok(bounds)
    }

    /// Checks every coordinate is finite and within its range.
    pub fn validate(&self) -> ConsoleResult<()> {
        check_range("sw.lat", self.sw.lat, 90.0)?;
        check_range("sw.lng", self.sw.lng, 180.0)?;
        check_range("ne.lat", self.ne.lat, 90.0)?;
        check_range("ne.lng", self.ne.lng, 180.0)?;
        Ok(())
    }
}

fn parse_number(field: &'static str, raw: &str) -> ConsoleResult<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ConsoleError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

fn check_range(field: &'static str, value: f64, limit: f64) -> ConsoleResult<()> {
    // NaN fails both comparisons, so it lands here too
    if !(value >= -limit && value <= limit) {
        return Err(ConsoleError::OutOfRange {
            field,
            value,
            min: -limit,
            max: limit,
        });
    }
    Ok(())
}

/// Discriminator carried in the `type` field of every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    Bounds,
    PilotsFilter,
    AirportsFilter,
    SubscribeId,
    UnsubscribeId,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Bounds => "bounds",
            RequestType::PilotsFilter => "pilots_filter",
            RequestType::AirportsFilter => "airports_filter",
            RequestType::SubscribeId => "sub_id",
            RequestType::UnsubscribeId => "unsub_id",
        }
    }
}

impl std::fmt::Display for RequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for RequestType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RequestType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "bounds" => Ok(RequestType::Bounds),
            "pilots_filter" => Ok(RequestType::PilotsFilter),
            "airports_filter" => Ok(RequestType::AirportsFilter),
            "sub_id" => Ok(RequestType::SubscribeId),
            "unsub_id" => Ok(RequestType::UnsubscribeId),
            _ => Err(serde::de::Error::custom("invalid request type")),
        }
    }
}

/// Request body, serialized as the bare payload object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Bounds(Bounds),
    PilotFilter { query: String },
    AirportFilter { include_uncontrolled: bool },
    Subscribe { id: String },
    Unsubscribe { id: String },
}

impl Payload {
    pub fn request_type(&self) -> RequestType {
        match self {
            Payload::Bounds(_) => RequestType::Bounds,
            Payload::PilotFilter { .. } => RequestType::PilotsFilter,
            Payload::AirportFilter { .. } => RequestType::AirportsFilter,
            Payload::Subscribe { .. } => RequestType::SubscribeId,
            Payload::Unsubscribe { .. } => RequestType::UnsubscribeId,
        }
    }

    /// Local checks run before an id is assigned.
    pub fn validate(&self) -> ConsoleResult<()> {
        match self {
            Payload::Bounds(bounds) => bounds.validate(),
            Payload::Subscribe { id } | Payload::Unsubscribe { id } if id.trim().is_empty() => {
                Err(ConsoleError::Empty {
                    field: "subscription id",
                })
            }
            _ => Ok(()),
        }
    }
}

/// Parses command line request specs such as `bounds:-10,20,5,30`,
/// `pilots:N123AB`, `airports:true`, `sub:ID` and `unsub:ID`.
impl FromStr for Payload {
    type Err = ConsoleError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| ConsoleError::InvalidRequestSpec {
            spec: spec.to_string(),
            message: message.to_string(),
        };

        let (kind, value) = spec
            .split_once(':')
            .ok_or_else(|| invalid("expected <kind>:<value>"))?;

        match kind {
            "bounds" => {
                let parts: Vec<&str> = value.split(',').collect();
                if parts.len() != 4 {
                    return Err(invalid("bounds take SWLAT,SWLNG,NELAT,NELNG"));
                }
                Ok(Payload::Bounds(Bounds::parse(
                    parts[0], parts[1], parts[2], parts[3],
                )?))
            }
            "pilots" | "pilots_filter" => Ok(Payload::PilotFilter {
                query: value.to_string(),
            }),
            "airports" | "airports_filter" => {
                let include_uncontrolled = value
                    .trim()
                    .parse::<bool>()
                    .map_err(|_| invalid("airports take true or false"))?;
                Ok(Payload::AirportFilter {
                    include_uncontrolled,
                })
            }
            "sub" | "sub_id" => {
                let payload = Payload::Subscribe {
                    id: value.trim().to_string(),
                };
                payload.validate()?;
                Ok(payload)
            }
            "unsub" | "unsub_id" => {
                let payload = Payload::Unsubscribe {
                    id: value.trim().to_string(),
                };
                payload.validate()?;
                Ok(payload)
            }
            _ => Err(invalid("unknown request kind")),
        }
    }
}

/// Outgoing message: `{ "id": "...", "type": "...", "payload": {...} }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    pub id: String,
    #[serde(rename = "type")]
    pub request_type: RequestType,
    pub payload: Payload,
}

impl Request {
    pub fn to_json(&self) -> ConsoleResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Assigns session-local request ids.
///
/// Ids are read then incremented, so the first request of a session is `"0"`.
/// Payloads that fail validation never consume an id.
#[derive(Debug, Default)]
pub struct RequestBuilder {
    next_id: u64,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next accepted request will get.
    pub fn peek_id(&self) -> u64 {
        self.next_id
    }

    pub fn build(&mut self, payload: Payload) -> ConsoleResult<Request> {
        payload.validate()?;
        let id = self.next_id;
        self.next_id += 1;
        Ok(Request {
            id: id.to_string(),
            request_type: payload.request_type(),
            payload,
        })
    }

    pub fn bounds(&mut self, bounds: Bounds) -> ConsoleResult<Request> {
        self.build(Payload::Bounds(bounds))
    }

    pub fn pilot_filter(&mut self, query: impl Into<String>) -> ConsoleResult<Request> {
        self.build(Payload::PilotFilter {
            query: query.into(),
        })
    }

    pub fn airport_filter(&mut self, include_uncontrolled: bool) -> ConsoleResult<Request> {
        self.build(Payload::AirportFilter {
            include_uncontrolled,
        })
    }

    pub fn subscribe(&mut self, id: impl Into<String>) -> ConsoleResult<Request> {
        self.build(Payload::Subscribe { id: id.into() })
    }

    pub fn unsubscribe(&mut self, id: impl Into<String>) -> ConsoleResult<Request> {
        self.build(Payload::Unsubscribe { id: id.into() })
    }
}
