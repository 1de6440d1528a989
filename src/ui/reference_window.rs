use egui::RichText;
use morse_trainer::audio::PlaybackEngine;
use morse_trainer::morse::MorseTable;

pub fn render_reference_window(
    ctx: &egui::Context,
    table: &MorseTable,
    playback: Option<&PlaybackEngine>,
    show_reference: &mut bool,
) {
    ctx.show_viewport_immediate(
        egui::ViewportId::from_hash_of("reference_viewport"),
        egui::ViewportBuilder::default()
            .with_title("Morse Reference")
            .with_inner_size([320.0, 600.0]),
        |ctx, _class| {
            egui::CentralPanel::default().show(ctx, |ui| {
                render_reference_content(ui, table, playback);
            });

            if ctx.input(|i| i.viewport().close_requested()) {
                *show_reference = false;
            }
        },
    );
}

fn render_reference_content(
    ui: &mut egui::Ui,
    table: &MorseTable,
    playback: Option<&PlaybackEngine>,
) {
    if playback.is_none() {
        ui.label(RichText::new("Audio is not available").weak());
        ui.add_space(4.0);
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        egui::Grid::new("reference_grid")
            .num_columns(3)
            .striped(true)
            .spacing([30.0, 4.0])
            .show(ui, |ui| {
                for (ch, code) in table.sorted_entries() {
                    ui.label(RichText::new(ch.to_string()).strong().monospace());
                    ui.label(RichText::new(code).monospace());
                    if let Some(engine) = playback {
                        if ui.button("Play").clicked() {
                            engine.play_sequence(code);
                        }
                    } else {
                        ui.label("");
                    }
                    ui.end_row();
                }
            });
    });
}
