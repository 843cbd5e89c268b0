use crate::api::{ApiClient, ApiError};
use crate::config::Config;
use crate::images::veg_image;
use crate::model::Market;
use crate::pages::{CommodityPage, PricesPage};
use crate::widgets::{self, EMERALD, SLATE_MUTED, SLATE_TEXT};
use eframe::egui;
use egui::{
    Color32, Context, CornerRadius, FontFamily, FontId, Margin, RichText, Stroke, Vec2, Visuals
};
use std::sync::Arc;

pub fn set_custom_style(ctx: &Context) {
    // Light slate dashboard with emerald accents
    let mut visuals = Visuals::light();

    visuals.panel_fill = Color32::from_rgb(248, 250, 252);       // slate-50 page
    visuals.window_fill = Color32::WHITE;
    visuals.extreme_bg_color = Color32::from_rgb(241, 245, 249); // inputs
    visuals.faint_bg_color = Color32::from_rgb(248, 250, 252);

    visuals.widgets.inactive.bg_fill = Color32::from_rgb(248, 250, 252);
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, Color32::from_rgb(226, 232, 240));

    visuals.widgets.hovered.bg_fill = Color32::WHITE;
    visuals.widgets.hovered.bg_stroke = Stroke::new(2.0, EMERALD);

    visuals.widgets.active.bg_fill = Color32::from_rgb(236, 253, 245);
    visuals.widgets.active.bg_stroke = Stroke::new(2.0, EMERALD);

    visuals.selection.bg_fill = Color32::from_rgb(209, 250, 229);
    visuals.selection.stroke = Stroke::new(1.0, Color32::from_rgb(4, 120, 87));

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();

    style.spacing.item_spacing = egui::vec2(10.0, 8.0);
    style.spacing.window_margin = Margin::same(12);
    style.spacing.button_padding = egui::vec2(12.0, 8.0);

    style.text_styles.insert(
        egui::TextStyle::Body,
        FontId::new(15.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Heading,
        FontId::new(22.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Button,
        FontId::new(15.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Small,
        FontId::new(12.0, FontFamily::Proportional),
    );

    ctx.set_style(style);
}

enum View {
    Prices,
    Commodity(CommodityPage),
}

pub struct VeglyticsApp {
    api: Arc<ApiClient>,
    prices: PricesPage,
    view: View,
}

impl VeglyticsApp {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        tracing::info!(api = %config.api_base, market = %config.default_market, "starting dashboard");
        Ok(Self {
            api: Arc::new(ApiClient::new(&config.api_base)?),
            prices: PricesPage::new(config.default_market),
            view: View::Prices,
        })
    }
}

/// Returns the commodity whose card was clicked.
fn prices_view(page: &mut PricesPage, api_base: &str, ui: &mut egui::Ui) -> Option<String> {
    widgets::header(ui, None, Some(&page.subtitle()), |ui| {
        ui.label(RichText::new(format!("API {}", api_base)).small().color(Color32::from_rgb(148, 163, 184)));
    });
    ui.add_space(16.0);

    let total = page.items.len();
    widgets::controls(
        ui,
        &mut page.market,
        &mut page.date,
        &page.available_dates,
        &mut page.search,
        total,
    );
    ui.add_space(16.0);

    if page.loading {
        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            ui.spinner();
            ui.label(RichText::new("Loading market data...").color(SLATE_MUTED));
        });
        return None;
    }

    widgets::price_grid(ui, page.visible_items(), page.market)
}

fn commodity_view(page: &mut CommodityPage, ui: &mut egui::Ui) -> bool {
    let mut back = false;

    widgets::header(
        ui,
        None,
        Some("Commodity insights — trends, changes, and best-market recommendation"),
        |ui| {
            if ui.button("← Back to prices").clicked() {
                back = true;
            }
        },
    );
    ui.add_space(16.0);

    // Hero
    egui::Frame::new()
        .fill(Color32::WHITE)
        .stroke(Stroke::new(1.0, widgets::CARD_STROKE))
        .corner_radius(CornerRadius::same(16))
        .inner_margin(Margin::same(16))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.add(
                    egui::Image::new(veg_image(&page.commodity).uri())
                        .fit_to_exact_size(Vec2::new(160.0, 128.0))
                        .corner_radius(CornerRadius::same(12)),
                );
                ui.vertical(|ui| {
                    ui.label(RichText::new("COMMODITY ANALYSIS").small().strong().color(Color32::from_rgb(148, 163, 184)));
                    ui.label(RichText::new(&page.commodity).size(30.0).strong().color(SLATE_TEXT));
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("Analyzing Market:").color(SLATE_MUTED));
                        widgets::market_select(ui, "commodity_market", &Market::ALL, &mut page.market);
                    });
                });
            });
        });
    ui.add_space(16.0);

    let commodity = page.commodity.clone();
    let rec = page.data.recommend.clone().unwrap_or_default();

    ui.horizontal_wrapped(|ui| {
        let confidence = rec.confidence.clone().unwrap_or_default();
        widgets::kpi(
            ui,
            "Best market today",
            rec.best_market.as_deref().unwrap_or("—"),
            &if confidence.is_empty() { String::new() } else { format!("Confidence: {}", confidence) },
            &confidence,
        );
        widgets::kpi(
            ui,
            "Best price",
            &widgets::best_price_text(rec.best_price),
            &if rec.best_market.is_some() { format!("For {}", commodity) } else { String::new() },
            "",
        );
        widgets::kpi(
            ui,
            "Price gap",
            &rec.price_difference.map(widgets::rupees).unwrap_or_else(|| "—".to_string()),
            &rec.worst_market.as_deref().map(|m| format!("vs {}", m)).unwrap_or_default(),
            "",
        );
        widgets::volatility_card(ui, page.data.volatility.as_ref());
        widgets::prediction_card(ui, rec.advice.as_deref(), rec.advice_reason.as_deref());
    });
    ui.add_space(16.0);

    let bars = page.market_bars();
    let series = page.trend_series();
    ui.columns(2, |cols| {
        widgets::market_bar_chart(
            &mut cols[0],
            &format!("Market comparison: {}", commodity),
            &bars,
            "Not enough market data",
        );
        widgets::trend_line_chart(
            &mut cols[1],
            &format!("7-day trend: {} ({})", commodity, page.market),
            &series,
            "Not enough trend data",
        );
    });

    back
}

impl eframe::App for VeglyticsApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let busy = match &mut self.view {
            View::Prices => {
                self.prices.update(&self.api);
                self.prices.is_busy()
            }
            View::Commodity(page) => {
                page.update(&self.api);
                page.is_busy()
            }
        };

        let mut next = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                ui.add_space(8.0);
                match &mut self.view {
                    View::Prices => {
                        if let Some(commodity) = prices_view(&mut self.prices, self.api.base(), ui) {
                            let market = self.prices.market;
                            tracing::debug!(%commodity, %market, "open commodity");
                            next = Some(View::Commodity(CommodityPage::new(&commodity, market)));
                        }
                    }
                    View::Commodity(page) => {
                        if commodity_view(page, ui) {
                            next = Some(View::Prices);
                        }
                    }
                }
            });
        });
        if let Some(view) = next {
            self.view = view;
        }

        if busy {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
