use std::path::{Path, PathBuf};

use eframe::egui::{self, RichText, Stroke};
use rfd::FileDialog;

use crate::localizations::Localizations;
use crate::models::{AudioBitrate, AudioFormat, ConversionMode, VideoHeight};
use crate::theme::*;
use crate::view::ViewState;

/// What the user did this frame. Collected while drawing and handed to the
/// controller afterwards, so drawing only ever reads the view.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    UrlEdited(String),
    Paste,
    SetMode(ConversionMode),
    SelectHeight(VideoHeight),
    BitrateChanged(AudioBitrate),
    FormatChanged(AudioFormat),
    Convert,
    Download,
    ConvertAnother,
    DismissAlert,
}

fn primary_button(text: String) -> egui::Button<'static> {
    egui::Button::new(
        RichText::new(text)
            .size(BUTTON_FONT_SIZE)
            .color(BUTTON_MAIN_TEXT),
    )
    .min_size(MIN_SIZE_BUTTON)
    .fill(PRIMARY_BUTTON_BG)
    .rounding(ROUNDING_BUTTON)
    .stroke(Stroke::new(1.0, BORDER_COLOR))
}

fn secondary_button(text: String) -> egui::Button<'static> {
    egui::Button::new(RichText::new(text).size(BUTTON_FONT_SIZE).color(DARK_GRAY))
        .min_size(MIN_SIZE_BUTTON)
        .fill(SECONDARY_BUTTON_BG)
        .rounding(ROUNDING_BUTTON)
        .stroke(Stroke::new(1.0, BORDER_COLOR))
}

fn toggle_button(text: String, active: bool) -> egui::Button<'static> {
    let (fill, color) = if active {
        (TOGGLE_ACTIVE_BG, BUTTON_MAIN_TEXT)
    } else {
        (TOGGLE_INACTIVE_BG, DARK_GRAY)
    };
    egui::Button::new(RichText::new(text).color(color))
        .min_size(MIN_SIZE_TOGGLE)
        .fill(fill)
        .rounding(ROUNDING_BUTTON)
        .stroke(Stroke::new(1.0, BORDER_COLOR))
}

pub fn render_url_input(
    ui: &mut egui::Ui,
    view: &ViewState,
    localizer: &Localizations,
    focus: bool,
    events: &mut Vec<UiEvent>,
) {
    ui.label(localizer.text("url-label", "Video URL:"));

    ui.horizontal(|ui| {
        let mut url = view.url.clone();
        let response = egui::Frame::group(ui.style())
            .fill(INPUT_BG)
            .stroke(Stroke::new(1.0, egui::Color32::LIGHT_GRAY))
            .rounding(4.0)
            .show(ui, |ui| {
                ui.add_sized(
                    [ui.available_width() - 110.0, 40.0],
                    egui::TextEdit::singleline(&mut url)
                        .hint_text(localizer.text("url-placeholder", "Paste a YouTube link"))
                        .font(egui::FontId::proportional(16.0)),
                )
            })
            .inner;

        if focus {
            response.request_focus();
        }
        if response.changed() {
            events.push(UiEvent::UrlEdited(url));
        }
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            events.push(UiEvent::Convert);
        }

        if ui
            .add(secondary_button(localizer.text("paste-button", "Paste")))
            .clicked()
        {
            events.push(UiEvent::Paste);
        }
    });
}

pub fn render_mode_selector(
    ui: &mut egui::Ui,
    view: &ViewState,
    localizer: &Localizations,
    events: &mut Vec<UiEvent>,
) {
    ui.horizontal(|ui| {
        let audio = toggle_button(
            localizer.text("mode-audio", "Audio"),
            view.active_mode == ConversionMode::Audio,
        );
        if ui.add(audio).clicked() {
            events.push(UiEvent::SetMode(ConversionMode::Audio));
        }

        let video = toggle_button(
            localizer.text("mode-video", "Video"),
            view.active_mode == ConversionMode::Video,
        );
        if ui.add(video).clicked() {
            events.push(UiEvent::SetMode(ConversionMode::Video));
        }
    });
}

pub fn render_audio_options(
    ui: &mut egui::Ui,
    view: &ViewState,
    localizer: &Localizations,
    events: &mut Vec<UiEvent>,
) {
    if !view.audio_options_visible {
        return;
    }

    egui::Grid::new("audio_options").num_columns(2).show(ui, |ui| {
        ui.label(localizer.text("bitrate-label", "Bitrate:"));
        egui::ComboBox::from_id_source("bitrate_select")
            .selected_text(view.bitrate.to_string())
            .show_ui(ui, |ui| {
                for bitrate in AudioBitrate::ALL {
                    if ui
                        .selectable_label(view.bitrate == bitrate, bitrate.to_string())
                        .clicked()
                    {
                        events.push(UiEvent::BitrateChanged(bitrate));
                    }
                }
            });
        ui.end_row();

        ui.label(localizer.text("format-label", "Format:"));
        egui::ComboBox::from_id_source("audio_format_select")
            .selected_text(view.audio_format.to_string())
            .show_ui(ui, |ui| {
                for format in AudioFormat::ALL {
                    if ui
                        .selectable_label(view.audio_format == format, format.to_string())
                        .clicked()
                    {
                        events.push(UiEvent::FormatChanged(format));
                    }
                }
            });
        ui.end_row();
    });
}

pub fn render_video_options(ui: &mut egui::Ui, view: &ViewState, events: &mut Vec<UiEvent>) {
    if !view.video_options_visible {
        return;
    }

    ui.horizontal_wrapped(|ui| {
        for height in VideoHeight::ALL {
            let button = toggle_button(format!("{}p", height.pixels()), view.active_height == height);
            if ui.add(button).clicked() {
                events.push(UiEvent::SelectHeight(height));
            }
        }
    });
}

pub fn render_file_info(ui: &mut egui::Ui, view: &ViewState, localizer: &Localizations) {
    if !view.file_info_visible {
        return;
    }

    ui.horizontal(|ui| {
        ui.label(RichText::new(localizer.text("type-label", "Type:")).color(SECONDARY_TEXT));
        ui.label(RichText::new(&view.type_display).strong());
        ui.add_space(20.0);
        ui.label(RichText::new(localizer.text("quality-label", "Quality:")).color(SECONDARY_TEXT));
        ui.label(RichText::new(&view.quality_display).strong());
    });
}

pub fn render_convert_button(
    ui: &mut egui::Ui,
    view: &ViewState,
    localizer: &Localizations,
    events: &mut Vec<UiEvent>,
) {
    ui.horizontal(|ui| {
        if view.spinner_visible {
            ui.add_enabled(false, primary_button(String::new()));
            ui.add(egui::Spinner::new().size(BUTTON_FONT_SIZE));
        } else {
            let button = primary_button(localizer.text("convert-button", "Convert"));
            if ui.add_enabled(view.convert_enabled, button).clicked() {
                events.push(UiEvent::Convert);
            }
        }
    });
}

pub fn render_status(ui: &mut egui::Ui, view: &ViewState) {
    if !view.status_visible {
        return;
    }

    egui::Frame::group(ui.style())
        .fill(PANEL_BG)
        .rounding(ROUNDING_FRAME)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                ui.add(egui::ProgressBar::new(view.progress / 100.0).show_percentage());
                ui.add_space(6.0);
                ui.label(RichText::new(&view.status_text).color(DARK_GRAY));
            });
        });
}

pub fn render_result(
    ui: &mut egui::Ui,
    view: &ViewState,
    localizer: &Localizations,
    saved_path: Option<&Path>,
    is_saving: bool,
    events: &mut Vec<UiEvent>,
) {
    if !view.result_visible {
        return;
    }

    egui::Frame::group(ui.style())
        .fill(PANEL_BG)
        .rounding(ROUNDING_FRAME)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                ui.label(RichText::new(&view.result_text).color(TEXT_SUCCESS).strong());
                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    let download = primary_button(localizer.text("download-button", "Download"));
                    let can_download = view.download_target.is_some() && !is_saving;
                    if ui.add_enabled(can_download, download).clicked() {
                        events.push(UiEvent::Download);
                    }
                    if is_saving {
                        ui.add(egui::Spinner::new());
                        ui.label(localizer.text("status-saving", "Saving file..."));
                    }

                    let another = secondary_button(localizer.text("convert-another", "Convert another"));
                    if ui.add(another).clicked() {
                        events.push(UiEvent::ConvertAnother);
                    }
                });

                if let Some(path) = saved_path {
                    ui.add_space(10.0);
                    ui.label(format!(
                        "{} {}",
                        localizer.text("saved-to", "Saved to:"),
                        path.display()
                    ));
                }
            });
        });
}

pub fn render_download_dir_selector(ui: &mut egui::Ui, download_dir: &mut PathBuf, localizer: &Localizations) {
    ui.label(localizer.text("download-to", "Save to:"));

    ui.horizontal(|ui| {
        let mut shown = download_dir.to_string_lossy().to_string();
        egui::Frame::none()
            .fill(ui.visuals().extreme_bg_color)
            .rounding(4.0)
            .stroke(ui.visuals().widgets.noninteractive.bg_stroke)
            .show(ui, |ui| {
                ui.set_min_height(36.0);
                let response = ui.add_sized(
                    [ui.available_width() - 110.0, 36.0],
                    egui::TextEdit::singleline(&mut shown)
                        .frame(false)
                        .margin(egui::vec2(8.0, 8.0)),
                );
                if response.changed() {
                    *download_dir = PathBuf::from(&shown);
                }
            });

        let button = egui::Button::new(
            RichText::new(localizer.text("browse-button", "Browse...")).size(14.0),
        )
        .min_size(egui::vec2(100.0, 36.0))
        .fill(ui.visuals().widgets.inactive.bg_fill)
        .rounding(4.0);

        if ui.add(button).clicked() {
            if let Some(path) = FileDialog::new().set_directory(&*download_dir).pick_folder() {
                *download_dir = path;
            }
        }
    });
}

/// Modal stand-in for the browser's `alert()`.
pub fn render_alert(ctx: &egui::Context, message: &str, localizer: &Localizations, events: &mut Vec<UiEvent>) {
    egui::Window::new(localizer.text("app-title", "YouTube Converter"))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(message);
            ui.add_space(10.0);
            let ok = primary_button(localizer.text("alert-ok", "OK"));
            if ui.add(ok).clicked() || ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                events.push(UiEvent::DismissAlert);
            }
        });
}
