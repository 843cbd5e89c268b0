use crate::model::{Compare, Dates, Market, Meta, PricesResponse, Recommendation, Trend, VolatilityInfo};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use urlencoding::encode;

pub const DEFAULT_DATES_LIMIT: u32 = 7;
pub const DEFAULT_TREND_DAYS: u32 = 7;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-2xx answer. Displays as the fixed per-endpoint message.
    #[error("{message}")]
    Status { message: &'static str, status: u16 },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Failed to parse {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Meta,
    Dates,
    Prices,
    Recommend,
    Compare,
    Trend,
    Volatility,
}

impl Endpoint {
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Meta => "meta",
            Endpoint::Dates => "dates",
            Endpoint::Prices => "prices",
            Endpoint::Recommend => "recommend",
            Endpoint::Compare => "compare",
            Endpoint::Trend => "trend",
            Endpoint::Volatility => "volatility",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            Endpoint::Meta => "Failed to load meta",
            Endpoint::Dates => "Failed to load dates",
            Endpoint::Prices => "Failed to load prices",
            Endpoint::Recommend => "Failed to load recommendation",
            Endpoint::Compare => "Failed to load compare",
            Endpoint::Trend => "Failed to load trend",
            Endpoint::Volatility => "Failed to load volatility",
        }
    }
}

pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One blocking GET. Implemented by `reqwest::blocking::Client`; tests plug in
/// a recording fake.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse, ApiError>;
}

impl Transport for reqwest::blocking::Client {
    fn get(&self, url: &str) -> Result<HttpResponse, ApiError> {
        let response = reqwest::blocking::Client::get(self, url)
            .send()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}

pub struct ApiClient<T: Transport = reqwest::blocking::Client> {
    base: String,
    transport: T,
}

/// Requests wait for the backend however long it takes. reqwest's blocking
/// client would otherwise give up after 30 seconds.
pub const REQUEST_TIMEOUT: Option<Duration> = None;

pub fn http_client() -> Result<reqwest::blocking::Client, ApiError> {
    reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| ApiError::Transport(e.to_string()))
}

impl ApiClient {
    pub fn new(base: &str) -> Result<Self, ApiError> {
        Ok(Self::with_transport(base, http_client()?))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(base: &str, transport: T) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn meta_url(&self) -> String {
        format!("{}/api/meta", self.base)
    }

    pub fn dates_url(&self, limit: u32) -> String {
        format!("{}/api/dates?limit={}", self.base, limit)
    }

    /// `search` and `date` are only sent when non-empty.
    pub fn prices_latest_url(&self, market: Market, search: &str, date: &str) -> String {
        let mut url = format!("{}/api/prices/latest?market={}", self.base, encode(market.as_str()));
        if !search.is_empty() {
            url.push_str("&search=");
            url.push_str(&encode(search));
        }
        if !date.is_empty() {
            url.push_str("&date=");
            url.push_str(&encode(date));
        }
        url
    }

    pub fn recommend_url(&self, commodity: &str) -> String {
        format!("{}/api/recommend?commodity={}", self.base, encode(commodity))
    }

    pub fn compare_url(&self, commodity: &str, markets: &[Market]) -> String {
        let joined = markets
            .iter()
            .map(Market::as_str)
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{}/api/compare?commodity={}&markets={}",
            self.base,
            encode(commodity),
            encode(&joined)
        )
    }

    pub fn trend_url(&self, commodity: &str, market: Market, days: u32) -> String {
        format!(
            "{}/api/trend?commodity={}&market={}&days={}",
            self.base,
            encode(commodity),
            encode(market.as_str()),
            days
        )
    }

    pub fn volatility_url(&self, commodity: &str, market: Market) -> String {
        format!(
            "{}/api/volatility?commodity={}&market={}",
            self.base,
            encode(commodity),
            encode(market.as_str())
        )
    }

    pub fn fetch_meta(&self) -> Result<Meta, ApiError> {
        self.fetch(Endpoint::Meta, self.meta_url())
    }

    pub fn fetch_dates(&self, limit: u32) -> Result<Dates, ApiError> {
        self.fetch(Endpoint::Dates, self.dates_url(limit))
    }

    pub fn fetch_prices_latest(
        &self,
        market: Market,
        search: &str,
        date: &str,
    ) -> Result<PricesResponse, ApiError> {
        self.fetch(Endpoint::Prices, self.prices_latest_url(market, search, date))
    }

    pub fn fetch_recommend(&self, commodity: &str) -> Result<Recommendation, ApiError> {
        self.fetch(Endpoint::Recommend, self.recommend_url(commodity))
    }

    pub fn fetch_compare(&self, commodity: &str, markets: &[Market]) -> Result<Compare, ApiError> {
        self.fetch(Endpoint::Compare, self.compare_url(commodity, markets))
    }

    pub fn fetch_trend(&self, commodity: &str, market: Market, days: u32) -> Result<Trend, ApiError> {
        self.fetch(Endpoint::Trend, self.trend_url(commodity, market, days))
    }

    pub fn fetch_volatility(&self, commodity: &str, market: Market) -> Result<VolatilityInfo, ApiError> {
        self.fetch(Endpoint::Volatility, self.volatility_url(commodity, market))
    }

    fn fetch<R: DeserializeOwned>(&self, endpoint: Endpoint, url: String) -> Result<R, ApiError> {
        tracing::debug!(endpoint = endpoint.name(), %url, "GET");

        let response = self.transport.get(&url).inspect_err(|e| {
            tracing::error!(endpoint = endpoint.name(), %url, "{}", e);
        })?;

        if !response.is_success() {
            tracing::error!(
                endpoint = endpoint.name(),
                status = response.status,
                "{}",
                endpoint.failure_message()
            );
            return Err(ApiError::Status {
                message: endpoint.failure_message(),
                status: response.status,
            });
        }

        serde_json::from_str(&response.body).map_err(|source| {
            tracing::error!(endpoint = endpoint.name(), "undecodable body: {}", source);
            ApiError::Decode {
                endpoint: endpoint.name(),
                source,
            }
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Answers by URL path, records every requested URL.
    #[derive(Default)]
    pub struct FakeTransport {
        routes: HashMap<String, (u16, String)>,
        pub calls: Mutex<Vec<String>>,
    }

    impl FakeTransport {
        pub fn route(mut self, path: &str, status: u16, body: &str) -> Self {
            self.routes.insert(path.to_string(), (status, body.to_string()));
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Transport for FakeTransport {
        fn get(&self, url: &str) -> Result<HttpResponse, ApiError> {
            self.calls.lock().unwrap().push(url.to_string());
            let path = url
                .split("://")
                .nth(1)
                .and_then(|rest| rest.find('/').map(|i| &rest[i..]))
                .unwrap_or(url);
            let path = path.split('?').next().unwrap_or(path);
            match self.routes.get(path) {
                Some((status, body)) => Ok(HttpResponse {
                    status: *status,
                    body: body.clone(),
                }),
                None => Err(ApiError::Transport(format!("connection refused: {}", url))),
            }
        }
    }

    impl ApiClient<FakeTransport> {
        pub fn transport_calls(&self) -> Vec<String> {
            self.transport.calls()
        }
    }

    pub fn client(transport: FakeTransport) -> ApiClient<FakeTransport> {
        ApiClient::with_transport("http://localhost:8000", transport)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{client, FakeTransport};
    use super::*;

    const BASE: &str = "http://localhost:8000";

    #[test]
    fn meta_and_dates_urls() {
        let api = client(FakeTransport::default());
        assert_eq!(api.meta_url(), format!("{BASE}/api/meta"));
        assert_eq!(api.dates_url(DEFAULT_DATES_LIMIT), format!("{BASE}/api/dates?limit=7"));
        assert_eq!(api.dates_url(30), format!("{BASE}/api/dates?limit=30"));
    }

    #[test]
    fn prices_url_omits_empty_filters() {
        let api = client(FakeTransport::default());
        assert_eq!(
            api.prices_latest_url(Market::Dambulla, "", ""),
            format!("{BASE}/api/prices/latest?market=Dambulla")
        );
        assert_eq!(
            api.prices_latest_url(Market::NuwaraEliya, "big onion", "13-01-2026"),
            format!("{BASE}/api/prices/latest?market=Nuwara%20Eliya&search=big%20onion&date=13-01-2026")
        );
        assert_eq!(
            api.prices_latest_url(Market::Colombo, "", "12-01-2026"),
            format!("{BASE}/api/prices/latest?market=Colombo&date=12-01-2026")
        );
    }

    #[test]
    fn commodity_names_are_percent_encoded() {
        let api = client(FakeTransport::default());
        assert_eq!(
            api.recommend_url("Beans & Leeks"),
            format!("{BASE}/api/recommend?commodity=Beans%20%26%20Leeks")
        );
        assert_eq!(
            api.recommend_url("තක්කාලි"),
            format!("{BASE}/api/recommend?commodity={}", encode("තක්කාලි"))
        );
    }

    #[test]
    fn compare_joins_markets_before_encoding() {
        let api = client(FakeTransport::default());
        assert_eq!(
            api.compare_url("Green Chillies", &Market::ALL),
            format!(
                "{BASE}/api/compare?commodity=Green%20Chillies&markets=Colombo%2CDambulla%2CNuwara%20Eliya"
            )
        );
        assert_eq!(
            api.compare_url("Lime", &[]),
            format!("{BASE}/api/compare?commodity=Lime&markets=")
        );
    }

    #[test]
    fn trend_and_volatility_urls() {
        let api = client(FakeTransport::default());
        assert_eq!(
            api.trend_url("Carrot", Market::NuwaraEliya, DEFAULT_TREND_DAYS),
            format!("{BASE}/api/trend?commodity=Carrot&market=Nuwara%20Eliya&days=7")
        );
        assert_eq!(
            api.volatility_url("Carrot", Market::Dambulla),
            format!("{BASE}/api/volatility?commodity=Carrot&market=Dambulla")
        );
    }

    #[test]
    fn base_trailing_slash_is_dropped() {
        let api = ApiClient::with_transport("http://api.local:9000/", FakeTransport::default());
        assert_eq!(api.meta_url(), "http://api.local:9000/api/meta");
    }

    #[test]
    fn fetch_parses_successful_body() {
        let api = client(
            FakeTransport::default()
                .route("/api/meta", 200, r#"{"latest_date": "14-01-2026"}"#)
                .route("/api/dates", 200, r#"{"dates": ["14-01-2026", "13-01-2026"]}"#),
        );

        let meta = api.fetch_meta().unwrap();
        assert_eq!(meta.latest_date.as_deref(), Some("14-01-2026"));

        let dates = api.fetch_dates(7).unwrap();
        assert_eq!(dates.dates, vec!["14-01-2026", "13-01-2026"]);
    }

    #[test]
    fn requested_urls_match_builders() {
        let transport = FakeTransport::default()
            .route("/api/trend", 200, r#"{"points": []}"#)
            .route("/api/compare", 200, r#"{"markets": []}"#);
        let api = client(transport);

        api.fetch_trend("Pumpkin", Market::Colombo, 14).unwrap();
        api.fetch_compare("Pumpkin", &[Market::Colombo, Market::NuwaraEliya]).unwrap();

        assert_eq!(
            api.transport_calls(),
            vec![
                format!("{BASE}/api/trend?commodity=Pumpkin&market=Colombo&days=14"),
                format!("{BASE}/api/compare?commodity=Pumpkin&markets=Colombo%2CNuwara%20Eliya"),
            ]
        );
    }

    #[test]
    fn every_endpoint_rejects_non_success_status() {
        let transport = ["/api/meta", "/api/dates", "/api/prices/latest", "/api/recommend",
            "/api/compare", "/api/trend", "/api/volatility"]
            .into_iter()
            .fold(FakeTransport::default(), |t, path| t.route(path, 500, "oops"));
        let api = client(transport);

        let failures: Vec<String> = vec![
            api.fetch_meta().unwrap_err().to_string(),
            api.fetch_dates(7).unwrap_err().to_string(),
            api.fetch_prices_latest(Market::Dambulla, "", "").unwrap_err().to_string(),
            api.fetch_recommend("Tomato").unwrap_err().to_string(),
            api.fetch_compare("Tomato", &Market::ALL).unwrap_err().to_string(),
            api.fetch_trend("Tomato", Market::Dambulla, 7).unwrap_err().to_string(),
            api.fetch_volatility("Tomato", Market::Dambulla).unwrap_err().to_string(),
        ];

        assert_eq!(
            failures,
            vec![
                "Failed to load meta",
                "Failed to load dates",
                "Failed to load prices",
                "Failed to load recommendation",
                "Failed to load compare",
                "Failed to load trend",
                "Failed to load volatility",
            ]
        );
    }

    #[test]
    fn not_found_carries_status() {
        let api = client(FakeTransport::default().route("/api/volatility", 404, ""));
        match api.fetch_volatility("Okra", Market::Colombo) {
            Err(ApiError::Status { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "Failed to load volatility");
            }
            other => panic!("expected status error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn http_client_has_no_request_timeout() {
        assert_eq!(REQUEST_TIMEOUT, None);
    }

    #[test]
    fn real_client_waits_for_slow_backend() {
        use std::io::{Read, Write};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).unwrap();
            std::thread::sleep(Duration::from_millis(300));
            let body = r#"{"latest_date": "14-01-2026"}"#;
            write!(
                stream,
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            )
            .unwrap();
        });

        let api = ApiClient::new(&format!("http://{}", addr)).unwrap();
        let meta = api.fetch_meta().unwrap();
        assert_eq!(meta.latest_date.as_deref(), Some("14-01-2026"));
        server.join().unwrap();
    }

    #[test]
    fn transport_and_decode_failures_are_distinct() {
        let api = client(FakeTransport::default().route("/api/recommend", 200, "<html>"));

        assert!(matches!(api.fetch_meta(), Err(ApiError::Transport(_))));
        assert!(matches!(
            api.fetch_recommend("Leeks"),
            Err(ApiError::Decode { endpoint: "recommend", .. })
        ));
    }
}
