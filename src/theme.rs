use egui::Color32;

// Buttons
pub const PRIMARY_BUTTON_BG: Color32 = Color32::from_rgb(229, 57, 53); // Convert / Download
pub const SECONDARY_BUTTON_BG: Color32 = Color32::from_rgb(235, 235, 240);
pub const TOGGLE_ACTIVE_BG: Color32 = Color32::from_rgb(76, 154, 255);
pub const TOGGLE_INACTIVE_BG: Color32 = Color32::from_rgb(245, 245, 247);

// Surfaces
pub const WHITE: Color32 = Color32::from_rgb(255, 255, 255);
pub const DARK_GRAY: Color32 = Color32::from_rgb(36, 36, 36);
pub const PANEL_BG: Color32 = Color32::from_rgb(248, 248, 248);

// Text
pub const BUTTON_MAIN_TEXT: Color32 = WHITE;
pub const SECONDARY_TEXT: Color32 = Color32::from_rgb(138, 138, 143);
pub const TEXT_SUCCESS: Color32 = Color32::from_rgb(46, 160, 67);

pub const INPUT_BG: Color32 = Color32::from_rgb(250, 250, 250);
pub const BORDER_COLOR: Color32 = Color32::from_rgba_premultiplied(60, 60, 67, 15);

// Sizing & Spacing
pub const ROUNDING_FRAME: f32 = 8.0;
pub const ROUNDING_BUTTON: f32 = 6.0;
pub const MIN_SIZE_BUTTON: egui::Vec2 = egui::Vec2::new(120.0, 40.0);
pub const MIN_SIZE_TOGGLE: egui::Vec2 = egui::Vec2::new(90.0, 32.0);

pub const BUTTON_FONT_SIZE: f32 = 16.0;
