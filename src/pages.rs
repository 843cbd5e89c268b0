use crate::api::{ApiClient, ApiError, Transport, DEFAULT_DATES_LIMIT, DEFAULT_TREND_DAYS};
use crate::loader::Loader;
use crate::model::{
    Compare, Dates, Market, Meta, PriceItem, PricesResponse, Recommendation, Trend, VolatilityInfo,
};
use std::sync::Arc;

/// Date to show first: newest available, else the bulletin date from meta.
pub fn default_date(dates: &[String], meta: &Meta) -> Option<String> {
    dates
        .first()
        .cloned()
        .or_else(|| meta.latest_date.clone())
        .filter(|d| !d.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PricesQuery {
    market: Market,
    search: String,
    date: String,
}

pub struct PricesPage {
    pub market: Market,
    pub search: String,
    pub date: String,
    pub available_dates: Vec<String>,
    pub meta_latest: String,
    pub items: Vec<PriceItem>,
    pub loading: bool,

    started: bool,
    last_query: Option<PricesQuery>,
    init: Loader<(Meta, Dates)>,
    prices: Loader<PricesResponse>,
}

impl PricesPage {
    pub fn new(market: Market) -> Self {
        Self {
            market,
            search: String::new(),
            date: String::new(),
            available_dates: vec![],
            meta_latest: String::new(),
            items: vec![],
            loading: true,
            started: false,
            last_query: None,
            init: Loader::new(),
            prices: Loader::new(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.init.is_pending() || self.prices.is_pending()
    }

    /// Called every frame: applies finished loads and starts new ones when the
    /// filters changed since the last request.
    pub fn update<T: Transport + 'static>(&mut self, api: &Arc<ApiClient<T>>) {
        if !self.started {
            self.started = true;
            let api = Arc::clone(api);
            self.init.start(move || {
                let (meta, dates) = rayon::join(
                    || api.fetch_meta(),
                    || api.fetch_dates(DEFAULT_DATES_LIMIT),
                );
                Ok((meta?, dates?))
            });
        }

        match self.init.poll() {
            Some(Ok((meta, dates))) => self.apply_init(meta, dates),
            Some(Err(e)) => tracing::error!(status = ?e.status(), "Initialization error: {}", e),
            None => {}
        }

        self.maybe_fetch_prices(api);

        match self.prices.poll() {
            Some(Ok(res)) => {
                tracing::info!(market = %self.market, date = %self.date, items = res.items.len(), "prices loaded");
                self.items = res.items;
                self.loading = false;
            }
            Some(Err(e)) => {
                tracing::error!(status = ?e.status(), "Fetch prices error: {}", e);
                self.loading = false;
            }
            None => {}
        }
    }

    fn apply_init(&mut self, meta: Meta, dates: Dates) {
        self.meta_latest = meta.latest_date.clone().unwrap_or_default();
        if let Some(d) = default_date(&dates.dates, &meta) {
            self.date = d;
        }
        self.available_dates = dates.dates;
    }

    fn maybe_fetch_prices<T: Transport + 'static>(&mut self, api: &Arc<ApiClient<T>>) {
        // Dates are known but none picked yet: wait for the selection
        if !self.available_dates.is_empty() && self.date.is_empty() {
            return;
        }

        let query = PricesQuery {
            market: self.market,
            search: self.search.clone(),
            date: self.date.clone(),
        };
        if self.last_query.as_ref() == Some(&query) {
            return;
        }

        self.loading = true;
        self.last_query = Some(query.clone());
        let api = Arc::clone(api);
        if !self.prices.start(move || api.fetch_prices_latest(query.market, &query.search, &query.date)) {
            self.loading = false;
        }
    }

    pub fn subtitle(&self) -> String {
        let viewing = if self.date.is_empty() { "Loading..." } else { &self.date };
        format!("Latest bulletin: {} • Viewing: {}", self.meta_latest, viewing)
    }

    /// Cards to render; rows without a commodity name are skipped.
    pub fn visible_items(&self) -> impl Iterator<Item = &PriceItem> {
        self.items.iter().filter(|i| !i.commodity.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Insights {
    pub recommend: Option<Recommendation>,
    pub compare: Option<Compare>,
    pub trend: Option<Trend>,
    pub volatility: Option<VolatilityInfo>,
}

pub fn load_insights<T: Transport>(
    api: &ApiClient<T>,
    commodity: &str,
    market: Market,
) -> Result<Insights, ApiError> {
    let ((recommend, compare), (trend, volatility)) = rayon::join(
        || {
            rayon::join(
                || api.fetch_recommend(commodity),
                || api.fetch_compare(commodity, &Market::ALL),
            )
        },
        || {
            rayon::join(
                || api.fetch_trend(commodity, market, DEFAULT_TREND_DAYS),
                || api.fetch_volatility(commodity, market),
            )
        },
    );

    Ok(Insights {
        recommend: Some(recommend?),
        compare: Some(compare?),
        trend: Some(trend?),
        volatility: Some(volatility?),
    })
}

pub struct CommodityPage {
    pub commodity: String,
    pub market: Market,
    pub data: Insights,

    last_query: Option<(String, Market)>,
    loader: Loader<Insights>,
}

impl CommodityPage {
    pub fn new(commodity: &str, market: Market) -> Self {
        Self {
            commodity: commodity.to_string(),
            market,
            data: Insights::default(),
            last_query: None,
            loader: Loader::new(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.loader.is_pending()
    }

    pub fn update<T: Transport + 'static>(&mut self, api: &Arc<ApiClient<T>>) {
        let query = (self.commodity.clone(), self.market);
        if self.last_query.as_ref() != Some(&query) {
            self.last_query = Some(query.clone());
            let api = Arc::clone(api);
            self.loader.start(move || load_insights(&api, &query.0, query.1));
        }

        match self.loader.poll() {
            Some(Ok(data)) => {
                tracing::info!(commodity = %self.commodity, market = %self.market, "insights loaded");
                self.data = data;
            }
            Some(Err(e)) => tracing::error!(commodity = %self.commodity, status = ?e.status(), "{}", e),
            None => {}
        }
    }

    /// `(market, price)` bars, positive prices only.
    pub fn market_bars(&self) -> Vec<(String, f64)> {
        self.data
            .compare
            .as_ref()
            .map(market_bars)
            .unwrap_or_default()
    }

    pub fn trend_series(&self) -> Vec<(String, Option<f64>)> {
        self.data
            .trend
            .as_ref()
            .map(chronological)
            .unwrap_or_default()
    }
}

pub fn market_bars(compare: &Compare) -> Vec<(String, f64)> {
    compare
        .markets
        .iter()
        .map(|m| (m.market.clone(), m.price_avg.unwrap_or(0.0)))
        .filter(|(_, price)| *price > 0.0)
        .collect()
}

/// Points arrive newest first; charts read oldest to newest. Days without a
/// price stay in the series so they count toward the chart's minimum.
pub fn chronological(trend: &Trend) -> Vec<(String, Option<f64>)> {
    trend
        .points
        .iter()
        .rev()
        .map(|p| (p.date.clone(), p.price_avg))
        .collect()
}
