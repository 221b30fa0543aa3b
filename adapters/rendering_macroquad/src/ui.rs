//! HUD and modal overlays for the Macroquad rendering backend.
//!
//! Every use of `macroquad::ui` lives here so the rest of the adapter only
//! deals in presentation types.

use fish_survivor_rendering::{HudPresentation, OfferCard, Overlay};
use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    shapes::{draw_rectangle, draw_rectangle_lines},
    text::draw_text,
    ui::{hash, Ui},
};

use crate::to_macroquad_color;

const HUD_MARGIN: f32 = 16.0;
const HUD_BAR_WIDTH: f32 = 200.0;
const HUD_FONT: f32 = 20.0;
const EXPERIENCE: Color = Color::new(0.592, 0.459, 0.980, 1.0);
const SHADE: Color = Color::new(0.0, 0.0, 0.0, 0.5);
const DIM: Color = Color::new(0.0, 0.0, 0.0, 0.6);
const PANEL: Color = Color::new(0.06, 0.16, 0.26, 0.95);
const OVERLAY_WIDTH: f32 = 420.0;

/// Interactions captured while drawing an overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct OverlayActions {
    /// Index of the upgrade card whose button was pressed.
    pub(crate) choice: Option<usize>,
    /// Whether the restart button was pressed.
    pub(crate) restart: bool,
}

/// Draws health, experience and run statistics in the top-left corner.
pub(crate) fn draw_hud(hud: &HudPresentation) {
    let mut cursor = Vec2::new(HUD_MARGIN, HUD_MARGIN);

    draw_bar(
        cursor,
        Vec2::new(HUD_BAR_WIDTH, 20.0),
        hud.health_fraction,
        to_macroquad_color(hud.health_color),
    );
    cursor.y += 20.0 + HUD_FONT;
    line(&hud.health_label, &mut cursor);
    line(&hud.level_label, &mut cursor);

    draw_bar(
        cursor,
        Vec2::new(HUD_BAR_WIDTH, 10.0),
        hud.experience_fraction,
        EXPERIENCE,
    );
    cursor.y += 10.0 + HUD_FONT;
    line(&hud.experience_label, &mut cursor);
    line(&hud.clock, &mut cursor);
    line(&hud.defeated_label, &mut cursor);
}

fn draw_bar(origin: Vec2, size: Vec2, fraction: f32, fill: Color) {
    draw_rectangle(origin.x, origin.y, size.x, size.y, SHADE);
    draw_rectangle(origin.x, origin.y, size.x * fraction, size.y, fill);
    draw_rectangle_lines(origin.x, origin.y, size.x, size.y, 1.0, WHITE);
}

fn line(text: &str, cursor: &mut Vec2) {
    let _ = draw_text(text, cursor.x, cursor.y, HUD_FONT, WHITE);
    cursor.y += HUD_FONT;
}

/// Dims the play field and draws `overlay` centred on the screen.
pub(crate) fn draw_overlay(ui: &mut Ui, overlay: &Overlay, screen: Vec2) -> OverlayActions {
    draw_rectangle(0.0, 0.0, screen.x, screen.y, DIM);

    let mut skin = ui.default_skin();
    let window_style = ui
        .style_builder()
        .color(PANEL)
        .color_hovered(PANEL)
        .color_clicked(PANEL)
        .color_selected(PANEL)
        .color_selected_hovered(PANEL)
        .color_inactive(PANEL)
        .text_color(WHITE)
        .margin(RectOffset::new(16.0, 16.0, 16.0, 16.0))
        .build();
    skin.window_style = window_style;
    let label_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 4.0, 4.0))
        .build();
    skin.label_style = label_style;
    let button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(40, 110, 170, 255))
        .color_hovered(Color::from_rgba(60, 140, 210, 255))
        .color_clicked(Color::from_rgba(30, 90, 140, 255))
        .margin(RectOffset::new(8.0, 8.0, 8.0, 8.0))
        .build();
    skin.button_style = button_style;
    ui.push_skin(&skin);

    let mut actions = OverlayActions::default();
    match overlay {
        Overlay::LevelUp { title, cards } => {
            let size = Vec2::new(OVERLAY_WIDTH, 80.0 + 120.0 * cards.len() as f32);
            let _ = ui.window(hash!("level_up"), centred(size, screen), size, |ui| {
                ui.label(None, title);
                ui.label(None, "Choose an upgrade (keys 1-3)");
                for (index, card) in cards.iter().enumerate() {
                    if offer_card(ui, index, card) {
                        actions.choice = Some(index);
                    }
                }
            });
        }
        Overlay::GameOver {
            survival_label,
            defeated_label,
        } => {
            let size = Vec2::new(OVERLAY_WIDTH, 180.0);
            let _ = ui.window(hash!("game_over"), centred(size, screen), size, |ui| {
                ui.label(None, "GAME OVER");
                ui.label(None, survival_label);
                ui.label(None, defeated_label);
                actions.restart = ui.button(None, "Restart (R)");
            });
        }
    }

    ui.pop_skin();
    actions
}

fn offer_card(ui: &mut Ui, index: usize, card: &OfferCard) -> bool {
    ui.separator();
    ui.label(None, card.title);
    ui.label(None, card.description);
    ui.label(None, &card.level_label);
    ui.button(None, format!("[{}] {}", index + 1, card.title).as_str())
}

fn centred(size: Vec2, screen: Vec2) -> Vec2 {
    ((screen - size) / 2.0).max(Vec2::ZERO)
}
