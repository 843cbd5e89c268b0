use crate::images::veg_image;
use crate::model::{Advice, Direction, Market, PriceItem, RiskLevel, VolatilityInfo};
use eframe::egui;
use egui::{Color32, CornerRadius, Margin, RichText, Stroke, Vec2};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points};

pub const EMERALD: Color32 = Color32::from_rgb(16, 185, 129);
pub const SLATE_TEXT: Color32 = Color32::from_rgb(30, 41, 59);
pub const SLATE_MUTED: Color32 = Color32::from_rgb(100, 116, 139);
pub const CARD_FILL: Color32 = Color32::WHITE;
pub const CARD_STROKE: Color32 = Color32::from_rgb(241, 245, 249);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Green,
    Amber,
    Rose,
    Slate,
}

impl Tone {
    pub fn colors(&self) -> (Color32, Color32) {
        // (background, text)
        match self {
            Tone::Green => (Color32::from_rgb(236, 253, 245), Color32::from_rgb(4, 120, 87)),
            Tone::Amber => (Color32::from_rgb(255, 251, 235), Color32::from_rgb(180, 83, 9)),
            Tone::Rose => (Color32::from_rgb(255, 241, 242), Color32::from_rgb(190, 18, 60)),
            Tone::Slate => (Color32::from_rgb(241, 245, 249), Color32::from_rgb(51, 65, 85)),
        }
    }
}

pub fn kpi_badge_tone(badge: &str) -> Tone {
    match badge.to_uppercase().as_str() {
        "HIGH" | "UP" => Tone::Green,
        "MEDIUM" => Tone::Amber,
        "LOW" | "DOWN" => Tone::Rose,
        _ => Tone::Slate,
    }
}

pub fn risk_tone(level: RiskLevel) -> Tone {
    match level {
        RiskLevel::Low => Tone::Green,
        RiskLevel::Medium => Tone::Amber,
        RiskLevel::High => Tone::Rose,
    }
}

/// `STABLE`, or `UP 3.25%` / `DOWN 0.00%` with the absolute change.
pub fn direction_badge(item: &PriceItem) -> (String, Tone) {
    let pct = item.change_pct.map(f64::abs).unwrap_or(0.0);
    match item.direction {
        Direction::Same => ("STABLE".to_string(), Tone::Slate),
        Direction::Up => (format!("UP {:.2}%", pct), Tone::Green),
        Direction::Down => (format!("DOWN {:.2}%", pct), Tone::Rose),
    }
}

fn num(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| "—".to_string())
}

pub fn rupees(v: f64) -> String {
    format!("Rs. {}", v)
}

/// A zero best price reads as no recommendation.
pub fn best_price_text(best_price: Option<f64>) -> String {
    best_price
        .filter(|p| *p != 0.0 && !p.is_nan())
        .map(rupees)
        .unwrap_or_else(|| "—".to_string())
}

pub fn price_range(item: &PriceItem) -> String {
    format!("Rs. {} - {}", num(item.price_min), num(item.price_max))
}

/// `DD-MM` from a `DD-MM-YYYY` bulletin date.
pub fn short_date(date: &str) -> String {
    date.chars().take(5).collect()
}

fn card<R>(ui: &mut egui::Ui, fill: Color32, add: impl FnOnce(&mut egui::Ui) -> R) -> R {
    egui::Frame::new()
        .fill(fill)
        .stroke(Stroke::new(1.0, CARD_STROKE))
        .corner_radius(CornerRadius::same(14))
        .inner_margin(Margin::same(16))
        .show(ui, add)
        .inner
}

fn badge(ui: &mut egui::Ui, text: &str, tone: Tone) {
    let (bg, fg) = tone.colors();
    egui::Frame::new()
        .fill(bg)
        .corner_radius(CornerRadius::same(10))
        .inner_margin(Margin::symmetric(8, 2))
        .show(ui, |ui| {
            ui.label(RichText::new(text).color(fg).small().strong());
        });
}

pub const DEFAULT_TITLE: &str = "Sri Lanka Vegetable Price Dashboard";
pub const DEFAULT_SUBTITLE: &str =
    "Daily market insights (HARTI bulletin) — trends, changes, and best-market recommendations.";

pub fn header(
    ui: &mut egui::Ui,
    title: Option<&str>,
    subtitle: Option<&str>,
    right: impl FnOnce(&mut egui::Ui),
) {
    egui::Frame::new()
        .fill(Color32::from_rgb(15, 23, 42))
        .corner_radius(CornerRadius::same(20))
        .inner_margin(Margin::symmetric(28, 24))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("🥬").size(22.0));
                        ui.label(
                            RichText::new("VEGLYTICS DASHBOARD")
                                .color(Color32::from_rgb(52, 211, 153))
                                .small()
                                .strong(),
                        );
                    });
                    ui.add_space(6.0);
                    ui.label(
                        RichText::new(title.unwrap_or(DEFAULT_TITLE))
                            .color(Color32::WHITE)
                            .size(28.0)
                            .strong(),
                    );
                    ui.add_space(4.0);
                    ui.label(
                        RichText::new(subtitle.unwrap_or(DEFAULT_SUBTITLE))
                            .color(Color32::from_rgb(203, 213, 225)),
                    );
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Max), right);
            });
        });
}

pub fn kpi(ui: &mut egui::Ui, title: &str, value: &str, sub: &str, badge_text: &str) {
    card(ui, CARD_FILL, |ui| {
        ui.set_min_width(200.0);
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label(RichText::new(title).small().strong().color(SLATE_MUTED));
                ui.label(RichText::new(value).size(20.0).strong().color(SLATE_TEXT));
                if !sub.is_empty() {
                    ui.label(RichText::new(sub).small().color(SLATE_MUTED));
                }
            });
            if !badge_text.is_empty() {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                    badge(ui, badge_text, kpi_badge_tone(badge_text));
                });
            }
        });
    });
}

pub fn volatility_card(ui: &mut egui::Ui, data: Option<&VolatilityInfo>) {
    let level = data.and_then(|d| d.risk_level);
    card(ui, CARD_FILL, |ui| {
        ui.set_min_width(200.0);
        ui.label(RichText::new("MARKET RISK").small().strong().color(SLATE_MUTED));
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(level.map(|l| l.as_str()).unwrap_or("—"))
                    .size(22.0)
                    .strong()
                    .color(SLATE_TEXT),
            );
            if let Some(l) = level {
                let pct = num(data.and_then(|d| d.volatility_percent));
                badge(ui, &format!("{}% VOL", pct), risk_tone(l));
            }
        });
        ui.add_space(6.0);
        ui.label(RichText::new("Based on 7-day stability").small().color(SLATE_MUTED));
    });
}

pub fn prediction_card(ui: &mut egui::Ui, advice: Option<&str>, reason: Option<&str>) {
    let kind = advice.map(Advice::from_label).unwrap_or(Advice::Other);
    let (fill, text, icon) = match kind {
        Advice::Wait => (Color32::from_rgb(67, 56, 202), Color32::from_rgb(219, 234, 254), "⏳"),
        Advice::SellNow => (Color32::from_rgb(5, 150, 105), Color32::from_rgb(236, 253, 245), "💰"),
        Advice::SellOrWait => (Color32::from_rgb(51, 65, 85), Color32::from_rgb(203, 213, 225), "⚖"),
        Advice::Other => (CARD_FILL, SLATE_MUTED, "📊"),
    };
    let value_color = if kind == Advice::Other { SLATE_TEXT } else { Color32::WHITE };

    card(ui, fill, |ui| {
        ui.set_min_width(200.0);
        ui.horizontal(|ui| {
            ui.label(RichText::new("PREDICTION").small().strong().color(text));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                ui.label(RichText::new(icon).size(20.0));
            });
        });
        ui.label(
            RichText::new(advice.unwrap_or("Analyzing..."))
                .size(22.0)
                .strong()
                .color(value_color),
        );
        ui.add_space(6.0);
        ui.label(
            RichText::new(reason.unwrap_or("Check back with more data."))
                .small()
                .color(text),
        );
    });
}

/// Returns true when the card was clicked.
pub fn price_card(ui: &mut egui::Ui, item: &PriceItem, market: Market) -> bool {
    let (badge_text, tone) = direction_badge(item);
    let image = veg_image(&item.commodity);

    let response = egui::Frame::new()
        .fill(Color32::from_rgb(15, 23, 42))
        .corner_radius(CornerRadius::same(14))
        .inner_margin(Margin::same(0))
        .show(ui, |ui| {
            ui.set_width(240.0);
            ui.add(
                egui::Image::new(image.uri())
                    .fit_to_exact_size(Vec2::new(240.0, 130.0))
                    .corner_radius(CornerRadius { nw: 14, ne: 14, sw: 0, se: 0 }),
            );
            egui::Frame::new()
                .inner_margin(Margin::same(14))
                .show(ui, |ui| {
                    badge(ui, &badge_text, tone);
                    ui.label(
                        RichText::new(&item.commodity)
                            .size(18.0)
                            .strong()
                            .color(Color32::WHITE),
                    );
                    ui.label(RichText::new(market.as_str()).small().color(Color32::from_rgb(203, 213, 225)));
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(price_range(item)).strong().color(Color32::WHITE));
                        ui.label(RichText::new("/ kg").small().color(Color32::from_rgb(203, 213, 225)));
                    });
                    ui.label(
                        RichText::new("Tap to view insights →")
                            .small()
                            .color(Color32::from_rgb(52, 211, 153)),
                    );
                });
        })
        .response
        .interact(egui::Sense::click())
        .on_hover_cursor(egui::CursorIcon::PointingHand);

    response.clicked()
}

/// Returns the commodity whose card was clicked.
pub fn price_grid<'a>(
    ui: &mut egui::Ui,
    items: impl Iterator<Item = &'a PriceItem>,
    market: Market,
) -> Option<String> {
    let mut clicked = None;
    let mut any = false;

    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing = egui::vec2(18.0, 18.0);
        for item in items {
            any = true;
            if price_card(ui, item, market) {
                clicked = Some(item.commodity.clone());
            }
        }
    });

    if !any {
        ui.vertical_centered(|ui| {
            ui.add_space(30.0);
            ui.label(RichText::new("No prices found for this date.").color(SLATE_MUTED));
        });
    }

    clicked
}

fn empty_chart(ui: &mut egui::Ui, text: &str) {
    card(ui, CARD_FILL, |ui| {
        ui.set_min_height(220.0);
        ui.centered_and_justified(|ui| {
            ui.label(RichText::new(text).color(Color32::from_rgb(148, 163, 184)));
        });
    });
}

pub fn bar_axis_max(bars: &[(String, f64)]) -> f64 {
    bars.iter().map(|(_, p)| *p).fold(0.0, f64::max) * 1.2
}

pub fn market_bar_chart(ui: &mut egui::Ui, title: &str, bars: &[(String, f64)], empty_text: &str) {
    if bars.is_empty() {
        empty_chart(ui, empty_text);
        return;
    }

    let labels: Vec<String> = bars.iter().map(|(m, _)| m.clone()).collect();
    let chart = BarChart::new(
        "price",
        bars.iter()
            .enumerate()
            .map(|(i, (market, price))| {
                Bar::new(i as f64, *price)
                    .name(format!("{}: {}", market, rupees(*price)))
                    .width(0.6)
            })
            .collect(),
    )
    .horizontal()
    .color(EMERALD);

    card(ui, CARD_FILL, |ui| {
        ui.label(RichText::new(title).size(17.0).strong().color(SLATE_TEXT));
        ui.add_space(8.0);
        Plot::new(("market_bars", title))
            .height(220.0)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .show_x(false)
            .include_x(0.0)
            .include_x(bar_axis_max(bars))
            .y_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(chart);
            });
        ui.horizontal_wrapped(|ui| {
            for (market, price) in bars {
                ui.label(RichText::new(format!("{} {}", market, rupees(*price))).small().strong().color(SLATE_MUTED));
            }
        });
    });
}

/// Plot coordinates for a chronological series. Missing prices keep their
/// slot on the x axis but get no point.
pub fn trend_plot_points(points: &[(String, Option<f64>)]) -> Vec<[f64; 2]> {
    points
        .iter()
        .enumerate()
        .filter_map(|(i, (_, p))| p.map(|v| [i as f64, v]))
        .collect()
}

/// `points` must already be chronological. Needs at least two points,
/// counting days without a price.
pub fn trend_line_chart(ui: &mut egui::Ui, title: &str, points: &[(String, Option<f64>)], empty_text: &str) {
    if points.len() < 2 {
        empty_chart(ui, empty_text);
        return;
    }

    let labels: Vec<String> = points.iter().map(|(d, _)| short_date(d)).collect();
    let series = trend_plot_points(points);

    card(ui, CARD_FILL, |ui| {
        ui.label(RichText::new(title).size(17.0).strong().color(SLATE_TEXT));
        ui.add_space(8.0);
        Plot::new(("trend_line", title))
            .height(220.0)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_x(0.0)
            .include_x((labels.len() - 1) as f64)
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new("price_avg", PlotPoints::from(series.clone()))
                        .color(EMERALD)
                        .width(3.0),
                );
                plot_ui.points(
                    Points::new("price_avg", PlotPoints::from(series))
                        .color(EMERALD)
                        .radius(4.0),
                );
            });
    });
}

/// Market / date / search controls plus status badges. Edits the values in place.
pub fn controls(
    ui: &mut egui::Ui,
    market: &mut Market,
    date: &mut String,
    available_dates: &[String],
    search: &mut String,
    total_items: usize,
) {
    card(ui, CARD_FILL, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal_wrapped(|ui| {
            badge(ui, &format!("🌍 Market: {}", market), Tone::Green);
            let latest = available_dates.first().map(String::as_str).unwrap_or("...");
            badge(ui, &format!("📅 Latest date: {}", latest), Tone::Slate);
            badge(ui, &format!("📦 Items: {}", total_items), Tone::Slate);
        });
        ui.add_space(12.0);

        ui.columns(3, |cols| {
            cols[0].label(RichText::new("MARKET").small().strong().color(SLATE_MUTED));
            market_select(&mut cols[0], "prices_market", &Market::PRICES_PICKER, market);

            cols[1].label(RichText::new("DATE").small().strong().color(SLATE_MUTED));
            cols[1].add_enabled_ui(!available_dates.is_empty(), |ui| {
                egui::ComboBox::from_id_salt("prices_date")
                    .selected_text(date.as_str())
                    .width(ui.available_width())
                    .show_ui(ui, |ui| {
                        for d in available_dates {
                            ui.selectable_value(date, d.clone(), d.as_str());
                        }
                    });
            });
            cols[1].label(RichText::new("Last 7 available days").small().color(EMERALD));

            cols[2].label(RichText::new("SEARCH").small().strong().color(SLATE_MUTED));
            cols[2].add(
                egui::TextEdit::singleline(search)
                    .hint_text("Search vegetable...")
                    .desired_width(f32::INFINITY),
            );
        });
    });
}

pub fn market_select(ui: &mut egui::Ui, id: &str, options: &[Market], market: &mut Market) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(market.as_str())
        .show_ui(ui, |ui| {
            for &m in options {
                ui.selectable_value(market, m, m.as_str());
            }
        });
}
