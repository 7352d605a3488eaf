//! Canvas access: capturing the drawing and rasterizing cards.

use async_trait::async_trait;
use js_sys::{Function, Promise};
use promraw_core::gateway::{CardRasterizer, DrawingSurface};
use promraw_core::log;
use promraw_core::render::{CardLayout, RenderedCard, MOVE_ROW_HEIGHT};
use promraw_core::ImageBlob;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement};

const FONT: &str = "system-ui, sans-serif";
const PADDING: f64 = 12.0;

fn document() -> Result<Document, String> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| "no document available".to_string())
}

fn js_err(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

// ==========================================
// DRAWING SURFACE
// ==========================================

/// The drawing canvas, looked up by CSS selector at capture time since the
/// page may replace the element.
pub struct CanvasSurface {
    selector: String,
}

impl CanvasSurface {
    pub fn new(selector: &str) -> Self {
        Self {
            selector: selector.to_string(),
        }
    }

    fn canvas(&self) -> Option<HtmlCanvasElement> {
        document()
            .ok()?
            .query_selector(&self.selector)
            .ok()??
            .dyn_into::<HtmlCanvasElement>()
            .ok()
    }
}

impl DrawingSurface for CanvasSurface {
    fn capture(&self) -> Option<ImageBlob> {
        let url = self.canvas()?.to_data_url().ok()?;
        match ImageBlob::from_data_url(&url) {
            Ok(blob) => Some(blob),
            Err(e) => {
                log::debug("capture", &format!("canvas capture unusable: {e}"));
                None
            }
        }
    }
}

// ==========================================
// CARD EXPORT
// ==========================================

/// Draws a [`RenderedCard`] onto an offscreen canvas.
pub struct CanvasExporter {
    document: Document,
}

impl CanvasExporter {
    pub fn new() -> Result<Self, String> {
        Ok(Self {
            document: document()?,
        })
    }
}

#[async_trait(?Send)]
impl CardRasterizer for CanvasExporter {
    async fn rasterize(&self, card: &RenderedCard, scale: u32) -> Result<ImageBlob, String> {
        let layout = card.layout();
        let (width, height) = layout.scaled(scale);

        let canvas: HtmlCanvasElement = self
            .document
            .create_element("canvas")
            .map_err(js_err)?
            .dyn_into()
            .map_err(|_| "could not create canvas".to_string())?;
        canvas.set_width(width);
        canvas.set_height(height);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(js_err)?
            .ok_or_else(|| "2d context unavailable".to_string())?
            .dyn_into()
            .map_err(|_| "2d context unavailable".to_string())?;
        ctx.scale(f64::from(scale), f64::from(scale)).map_err(js_err)?;

        let image = load_image(&card.image).await?;
        draw_card(&ctx, card, &layout, &image)?;

        // Throws a SecurityError when the image tainted the canvas.
        let url = canvas.to_data_url_with_type("image/png").map_err(js_err)?;
        ImageBlob::from_data_url(&url).map_err(|e| e.to_string())
    }
}

async fn load_image(src: &str) -> Result<HtmlImageElement, String> {
    let image = HtmlImageElement::new().map_err(js_err)?;
    image.set_cross_origin(Some("anonymous"));

    let loaded = Promise::new(&mut |resolve: Function, reject: Function| {
        image.set_onload(Some(&resolve));
        image.set_onerror(Some(&reject));
    });
    image.set_src(src);
    let result = JsFuture::from(loaded).await;

    image.set_onload(None);
    image.set_onerror(None);
    result.map_err(|_| "could not load card image".to_string())?;
    Ok(image)
}

fn draw_card(
    ctx: &CanvasRenderingContext2d,
    card: &RenderedCard,
    layout: &CardLayout,
    image: &HtmlImageElement,
) -> Result<(), String> {
    let width = f64::from(layout.width);
    let palette = &card.palette;

    ctx.set_fill_style(&JsValue::from_str(palette.background));
    ctx.fill_rect(0.0, 0.0, width, f64::from(layout.height()));

    // Image with gradient overlay and overall badge
    let image_h = f64::from(layout.image_height);
    ctx.draw_image_with_html_image_element_and_dw_and_dh(image, 0.0, 0.0, width, image_h)
        .map_err(js_err)?;
    let gradient = ctx.create_linear_gradient(0.0, 0.0, width, image_h);
    for (stop, color) in [0.0f32, 0.5, 1.0].into_iter().zip(palette.gradient) {
        gradient.add_color_stop(stop, color).map_err(js_err)?;
    }
    ctx.set_global_alpha(0.2);
    ctx.set_fill_style(&gradient);
    ctx.fill_rect(0.0, 0.0, width, image_h);
    ctx.set_global_alpha(1.0);
    if let Some(overall) = &card.overall_badge {
        ctx.set_fill_style(&JsValue::from_str("rgba(0, 0, 0, 0.6)"));
        ctx.fill_rect(width - 56.0, PADDING, 44.0, 22.0);
        text(ctx, overall, width - 34.0, PADDING + 16.0, "bold 13px", "#FFFFFF", "center")?;
    }

    // Title and rarity badge
    let mut y = image_h;
    text(ctx, &card.title, PADDING, y + 28.0, "bold 16px", palette.text, "left")?;
    ctx.set_font(&format!("bold 12px {FONT}"));
    let badge_w = ctx.measure_text(&card.badge).map_err(js_err)?.width() + 12.0;
    ctx.set_fill_style(&JsValue::from_str(card.rarity_background));
    ctx.fill_rect(PADDING - 6.0, y + 38.0, badge_w, 20.0);
    text(ctx, &card.badge, PADDING, y + 52.0, "bold 12px", card.rarity_color, "left")?;
    let hp = format!("HP {}", card.hit_points);
    text(ctx, &hp, width - PADDING, y + 52.0, "bold 12px", "#EF4444", "right")?;
    y += f64::from(layout.title_height);

    if let Some(cells) = &card.score_panel {
        let cell_w = (width - PADDING * 3.0) / 2.0;
        let cell_h = f64::from(layout.score_panel_height) / 2.0 - PADDING;
        for (i, cell) in cells.iter().enumerate() {
            let x = PADDING + (i % 2) as f64 * (cell_w + PADDING);
            let top = y + (i / 2) as f64 * (cell_h + PADDING);
            ctx.set_fill_style(&JsValue::from_str("rgba(255, 255, 255, 0.1)"));
            ctx.fill_rect(x, top, cell_w, cell_h);
            text(ctx, &cell.label, x + 8.0, top + 20.0, "12px", palette.text, "left")?;
            text(ctx, &cell.value, x + 8.0, top + 42.0, "bold 18px", "#FFFFFF", "left")?;
        }
        y += f64::from(layout.score_panel_height);
    }

    for m in &card.moves {
        text(ctx, &m.name, PADDING, y + 16.0, "13px", "#FFFFFF", "left")?;
        let damage = m.damage.to_string();
        text(ctx, &damage, width - PADDING, y + 16.0, "bold 13px", palette.text, "right")?;
        y += f64::from(MOVE_ROW_HEIGHT);
    }

    ctx.set_stroke_style(&JsValue::from_str(palette.border));
    let achievement_h = f64::from(layout.achievement_height);
    ctx.stroke_rect(PADDING, y + 6.0, width - PADDING * 2.0, achievement_h - 12.0);
    text(ctx, &card.achievement, width / 2.0, y + 28.0, "bold 12px", palette.text, "center")?;

    ctx.set_line_width(4.0);
    ctx.stroke_rect(0.0, 0.0, width, f64::from(layout.height()));
    Ok(())
}

fn text(
    ctx: &CanvasRenderingContext2d,
    value: &str,
    x: f64,
    y: f64,
    font: &str,
    color: &str,
    align: &str,
) -> Result<(), String> {
    ctx.set_font(&format!("{font} {FONT}"));
    ctx.set_fill_style(&JsValue::from_str(color));
    ctx.set_text_align(align);
    ctx.fill_text(value, x, y).map_err(js_err)
}
