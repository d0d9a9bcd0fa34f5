//! Draws the summary image with `plotters` onto an 800×600 bitmap.
//!
//! The bitmap backend only encodes PNG when writing to a path, so each render
//! goes through a scratch file that is read back and removed.

use std::sync::Once;

use num_format::{Locale, ToFormattedString};
use plotters::prelude::*;
use plotters::style::FontStyle;
use plotters_bitmap::BitMapBackend;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::warn;

use crate::domain::CountrySummary;
use crate::domain::ports::{SummaryRenderer, SummaryRendererError};

/// Image width in pixels.
pub const WIDTH: u32 = 800;
/// Image height in pixels.
pub const HEIGHT: u32 = 600;

const FONT_FAMILY: &str = "sans-serif";
const MARGIN: i32 = 40;
const BAR_ORIGIN: i32 = 260;
const BAR_MAX_WIDTH: u32 = 460;
const BAR_HEIGHT: i32 = 22;
const MAX_REGIONS: usize = 6;

const INK: RGBColor = RGBColor(33, 37, 41);
const MUTED: RGBColor = RGBColor(108, 117, 125);
const BAR: RGBColor = RGBColor(52, 120, 190);
const BACKGROUND: RGBColor = RGBColor(248, 249, 250);

static FONTS: Once = Once::new();

fn ensure_font_registered() {
    FONTS.call_once(|| {
        let registered = plotters::style::register_font(
            FONT_FAMILY,
            FontStyle::Normal,
            include_bytes!("../../../assets/DejaVuSans.ttf"),
        );
        if registered.is_err() {
            warn!("failed to register bundled font");
        }
    });
}

/// [`SummaryRenderer`] backed by `plotters-bitmap`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlottersSummaryRenderer;

impl PlottersSummaryRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl SummaryRenderer for PlottersSummaryRenderer {
    fn render(&self, summary: &CountrySummary) -> Result<Vec<u8>, SummaryRendererError> {
        ensure_font_registered();

        let scratch = tempfile::Builder::new()
            .prefix("countries-summary-")
            .suffix(".png")
            .tempfile()
            .map_err(|error| SummaryRendererError::encode(error.to_string()))?;

        {
            let root = BitMapBackend::new(scratch.path(), (WIDTH, HEIGHT)).into_drawing_area();
            draw(&root, summary).map_err(|error| SummaryRendererError::draw(error.to_string()))?;
            root.present()
                .map_err(|error| SummaryRendererError::encode(error.to_string()))?;
        }

        std::fs::read(scratch.path()).map_err(|error| SummaryRendererError::encode(error.to_string()))
    }
}

type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

fn text_style(size: u32, color: &RGBColor) -> TextStyle<'static> {
    (FONT_FAMILY, size).into_font().color(color)
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    summary: &CountrySummary,
) -> DrawResult<DB> {
    root.fill(&BACKGROUND)?;
    root.draw_text("Country Summary", &text_style(32, &INK), (MARGIN, 30))?;

    if summary.is_empty() {
        return draw_placeholder(root);
    }

    let total = summary.status.total_countries.to_formatted_string(&Locale::en);
    root.draw_text(
        &format!("Total countries: {total}"),
        &text_style(20, &INK),
        (MARGIN, 85),
    )?;
    let refreshed = summary.status.last_refreshed_at.map_or_else(
        || "never".to_owned(),
        |at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );
    root.draw_text(
        &format!("Last refreshed: {refreshed}"),
        &text_style(16, &MUTED),
        (MARGIN, 115),
    )?;

    draw_gdp_ranking(root, summary, 165)?;
    draw_regions(root, summary, 380)
}

fn draw_placeholder<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
) -> DrawResult<DB> {
    root.draw_text("No country data yet", &text_style(24, &INK), (MARGIN, 120))?;
    root.draw_text(
        "Run POST /countries/refresh to load data.",
        &text_style(16, &MUTED),
        (MARGIN, 160),
    )
}

fn draw_gdp_ranking<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    summary: &CountrySummary,
    top: i32,
) -> DrawResult<DB> {
    root.draw_text(
        &format!("Top {} by estimated GDP (USD)", summary.top_by_gdp.len()),
        &text_style(18, &INK),
        (MARGIN, top),
    )?;
    if summary.top_by_gdp.is_empty() {
        return root.draw_text(
            "No GDP estimates available",
            &text_style(14, &MUTED),
            (MARGIN, top + 32),
        );
    }

    let largest = summary
        .top_by_gdp
        .iter()
        .map(|rank| rank.estimated_gdp)
        .max()
        .unwrap_or(Decimal::ONE);
    let mut y = top + 32;
    for rank in &summary.top_by_gdp {
        root.draw_text(&rank.name, &text_style(14, &INK), (MARGIN, y + 4))?;
        let width = bar_width(rank.estimated_gdp, largest);
        root.draw(&Rectangle::new(
            [(BAR_ORIGIN, y), (BAR_ORIGIN + width, y + BAR_HEIGHT)],
            BAR.filled(),
        ))?;
        root.draw_text(
            &format_gdp(rank.estimated_gdp),
            &text_style(12, &MUTED),
            (BAR_ORIGIN + width + 8, y + 5),
        )?;
        y += BAR_HEIGHT + 12;
    }
    Ok(())
}

fn draw_regions<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    summary: &CountrySummary,
    top: i32,
) -> DrawResult<DB> {
    root.draw_text("Countries per region", &text_style(18, &INK), (MARGIN, top))?;
    let mut y = top + 32;
    for region in summary.regions.iter().take(MAX_REGIONS) {
        root.draw_text(
            &format!(
                "{}: {}",
                region.region,
                region.count.to_formatted_string(&Locale::en)
            ),
            &text_style(14, &INK),
            (MARGIN, y),
        )?;
        y += 24;
    }
    Ok(())
}

/// Bar length proportional to `value / largest`, at least one pixel.
fn bar_width(value: Decimal, largest: Decimal) -> i32 {
    value
        .checked_div(largest)
        .and_then(|ratio| ratio.checked_mul(Decimal::from(BAR_MAX_WIDTH)))
        .and_then(|scaled| scaled.trunc().to_i32())
        .unwrap_or(0)
        .max(1)
}

/// Whole dollars with thousands separators.
fn format_gdp(value: Decimal) -> String {
    value.trunc().to_u128().map_or_else(
        || value.to_string(),
        |whole| whole.to_formatted_string(&Locale::en),
    )
}
