use egui::{Color32, RichText};
use morse_trainer::trainer::{InputState, TargetMatch};

use crate::app::TrainerApp;

pub fn render_main_panel(ui: &mut egui::Ui, app: &mut TrainerApp) {
    if let Some(notice) = app.settings_notice.clone() {
        render_notice(ui, &notice, || app.settings_notice = None);
    }
    if let Some(notice) = app.audio_notice.clone() {
        render_notice(ui, &notice, || app.audio_notice = None);
    }

    render_buffers(ui, app);

    ui.add_space(12.0);
    ui.separator();
    ui.add_space(8.0);

    render_key_hints(ui, app);

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(8.0);

    // Bottom buttons. Focus is released so the dot key can't press them.
    ui.horizontal(|ui| {
        let reference = ui.button("Show Reference");
        if reference.clicked() {
            app.show_reference = !app.show_reference;
        }
        reference.surrender_focus();

        ui.add_space(10.0);

        let new_target = ui.button("New Target");
        if new_target.clicked() {
            app.new_target();
        }
        new_target.surrender_focus();
    });
}

fn render_notice(ui: &mut egui::Ui, notice: &str, mut dismiss: impl FnMut()) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(notice).color(Color32::YELLOW));
        let button = ui.button("Dismiss");
        if button.clicked() {
            dismiss();
        }
        button.surrender_focus();
    });
    ui.add_space(4.0);
}

fn render_buffers(ui: &mut egui::Ui, app: &TrainerApp) {
    let trainer = &app.trainer;
    let size = app.settings.user.font_size + 6.0;

    let code_color = match trainer.state() {
        InputState::Idle => Color32::GRAY,
        InputState::Accumulating => Color32::LIGHT_BLUE,
    };
    let translated_color = match trainer.target_match() {
        TargetMatch::Empty | TargetMatch::OnTrack => Color32::WHITE,
        TargetMatch::Complete => Color32::from_rgb(100, 200, 100),
        TargetMatch::Mismatch => Color32::from_rgb(255, 165, 0),
    };

    egui::Grid::new("buffers_grid")
        .num_columns(2)
        .spacing([20.0, 10.0])
        .show(ui, |ui| {
            ui.label(RichText::new("Current:").strong().size(size));
            ui.label(
                RichText::new(trainer.current_code())
                    .monospace()
                    .size(size)
                    .color(code_color),
            );
            ui.end_row();

            ui.label(RichText::new("Translated:").strong().size(size));
            ui.label(
                RichText::new(trainer.translated())
                    .monospace()
                    .size(size)
                    .color(translated_color),
            );
            ui.end_row();

            ui.label(RichText::new("Target:").strong().size(size));
            ui.label(RichText::new(trainer.target_word()).monospace().size(size));
            ui.end_row();
        });

    if trainer.target_match() == TargetMatch::Complete {
        ui.add_space(4.0);
        ui.label(RichText::new("Correct!").color(Color32::from_rgb(100, 200, 100)));
    }
}

fn render_key_hints(ui: &mut egui::Ui, app: &TrainerApp) {
    let user = &app.settings.user;
    ui.horizontal(|ui| {
        ui.label(RichText::new(&user.dot_key).strong().monospace());
        ui.label("Dot");
        ui.add_space(10.0);

        ui.label(RichText::new(&user.dash_key).strong().monospace());
        ui.label("Dash");
        ui.add_space(10.0);

        ui.label(RichText::new(&user.finalize_key).strong().monospace());
        ui.label("End character");
    });
}
