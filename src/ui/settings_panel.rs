use egui::RichText;
use egui_file_dialog::FileDialog;
use morse_trainer::config::AppSettings;

/// Tracks which file field triggered the file dialog
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum FileDialogTarget {
    WordList,
}

pub fn render_settings_panel(
    ui: &mut egui::Ui,
    settings: &mut AppSettings,
    settings_changed: &mut bool,
    file_dialog: &mut FileDialog,
    file_dialog_target: &mut Option<FileDialogTarget>,
) {
    egui::ScrollArea::vertical().show(ui, |ui| {
        // Keying
        egui::CollapsingHeader::new(RichText::new("Keying").strong())
            .default_open(true)
            .show(ui, |ui| {
                key_name_field(ui, "Dot Key:", &mut settings.user.dot_key, settings_changed);
                key_name_field(ui, "Dash Key:", &mut settings.user.dash_key, settings_changed);
                key_name_field(
                    ui,
                    "End Character Key:",
                    &mut settings.user.finalize_key,
                    settings_changed,
                );

                ui.horizontal(|ui| {
                    ui.label("Font Size:");
                    if ui
                        .add(
                            egui::Slider::new(&mut settings.user.font_size, 10.0..=32.0)
                                .fixed_decimals(0),
                        )
                        .changed()
                    {
                        *settings_changed = true;
                    }
                });
            });

        ui.add_space(8.0);

        // Timing
        egui::CollapsingHeader::new(RichText::new("Timing").strong())
            .default_open(true)
            .show(ui, |ui| {
                ms_slider(ui, "Dot Length:", &mut settings.timing.dit_ms, 20..=400, settings_changed);
                ms_slider(ui, "Dash Length:", &mut settings.timing.dah_ms, 60..=1200, settings_changed);
                ms_slider(
                    ui,
                    "Symbol Pause:",
                    &mut settings.timing.symbol_pause_ms,
                    0..=400,
                    settings_changed,
                );
                ms_slider(
                    ui,
                    "Character Timeout:",
                    &mut settings.timing.character_timeout_ms,
                    200..=4000,
                    settings_changed,
                );

                if ui.button("Restore Default Timing").clicked() {
                    settings.timing = Default::default();
                    *settings_changed = true;
                }
            });

        ui.add_space(8.0);

        // Audio
        egui::CollapsingHeader::new(RichText::new("Audio").strong())
            .default_open(true)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Tone Frequency:");
                    if ui
                        .add(
                            egui::Slider::new(&mut settings.audio.tone_frequency_hz, 300.0..=1200.0)
                                .suffix(" Hz")
                                .fixed_decimals(0),
                        )
                        .changed()
                    {
                        *settings_changed = true;
                    }
                });

                ui.horizontal(|ui| {
                    ui.label("Volume:");
                    if ui
                        .add(egui::Slider::new(&mut settings.audio.volume, 0.0..=1.0))
                        .changed()
                    {
                        *settings_changed = true;
                    }
                });
            });

        ui.add_space(8.0);

        // Training
        egui::CollapsingHeader::new(RichText::new("Training").strong())
            .default_open(true)
            .show(ui, |ui| {
                ui.label("Word List File:");
                ui.horizontal(|ui| {
                    let mut display = if settings.training.word_list_file.is_empty() {
                        "(built-in words)".to_string()
                    } else {
                        settings.training.word_list_file.clone()
                    };
                    ui.add(
                        egui::TextEdit::singleline(&mut display)
                            .interactive(false)
                            .desired_width(250.0),
                    );
                    if ui.button("Browse...").clicked() {
                        *file_dialog_target = Some(FileDialogTarget::WordList);
                        file_dialog.pick_file();
                    }
                    if !settings.training.word_list_file.is_empty() && ui.button("Clear").clicked()
                    {
                        settings.training.word_list_file.clear();
                        *settings_changed = true;
                    }
                });
            });
    });
}

fn key_name_field(ui: &mut egui::Ui, label: &str, value: &mut String, settings_changed: &mut bool) {
    ui.horizontal(|ui| {
        ui.label(label);
        let response = ui.add(egui::TextEdit::singleline(value).desired_width(100.0));
        // Apply once editing is done so partial names don't rebind keys
        if response.lost_focus() {
            *settings_changed = true;
        }
    });
}

fn ms_slider(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut u32,
    range: std::ops::RangeInclusive<u32>,
    settings_changed: &mut bool,
) {
    ui.horizontal(|ui| {
        ui.label(label);
        if ui
            .add(egui::Slider::new(value, range).suffix(" ms"))
            .changed()
        {
            *settings_changed = true;
        }
    });
}
