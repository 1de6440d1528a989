use crossbeam_channel::{bounded, Receiver};
use egui_file_dialog::FileDialog;
use std::time::Instant;

use morse_trainer::audio::PlaybackEngine;
use morse_trainer::config::{AppSettings, SettingsLoadResult, TimingSettings, TrainingSettings};
use morse_trainer::error::ConfigError;
use morse_trainer::keys::{KeyAction, KeyBindings};
use morse_trainer::messages::PlaybackEvent;
use morse_trainer::morse::MorseTable;
use morse_trainer::trainer::{TargetWords, Trainer};

use crate::ui::{render_main_panel, render_reference_window, render_settings_panel, FileDialogTarget};

pub struct TrainerApp {
    pub settings: AppSettings,
    pub trainer: Trainer,

    // Audio system
    playback: Option<PlaybackEngine>,
    event_rx: Receiver<PlaybackEvent>,

    // UI state
    pub show_settings: bool,
    pub show_reference: bool,
    settings_changed: bool,
    pub settings_notice: Option<String>,
    pub audio_notice: Option<String>,
    key_bindings: KeyBindings,
    loaded_word_list: String,

    // File dialog for the word list
    file_dialog: FileDialog,
    file_dialog_target: Option<FileDialogTarget>,
}

impl TrainerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Result<Self, ConfigError> {
        let SettingsLoadResult {
            mut settings,
            notice,
        } = AppSettings::load_with_notice();
        let mut notices: Vec<String> = notice.into_iter().collect();

        if let Err(err) = settings.timing.validate() {
            log::warn!("Invalid timing in settings ({}), using defaults", err);
            notices.push(format!("{}; timing reset to defaults.", err));
            settings.timing = TimingSettings::default();
        }

        // Create channel for playback events
        let (event_tx, event_rx) = bounded::<PlaybackEvent>(64);

        let playback = match PlaybackEngine::new(&settings.audio, &settings.timing, event_tx) {
            Ok(engine) => Some(engine),
            Err(e) => {
                log::error!("Failed to start playback worker: {}", e);
                None
            }
        };

        let (words, words_notice) = load_words(&settings.training);
        notices.extend(words_notice);

        let mut trainer = Trainer::new(MorseTable::standard(), words, &settings.timing)?;
        if let Some(ref engine) = playback {
            trainer = trainer.with_playback(engine.handle());
        }

        let key_bindings = KeyBindings::from_settings(&settings.user);
        let loaded_word_list = settings.training.word_list_file.clone();

        Ok(Self {
            settings,
            trainer,
            playback,
            event_rx,
            show_settings: false,
            show_reference: false,
            settings_changed: false,
            settings_notice: if notices.is_empty() {
                None
            } else {
                Some(notices.join(" "))
            },
            audio_notice: None,
            key_bindings,
            loaded_word_list,
            file_dialog: FileDialog::new(),
            file_dialog_target: None,
        })
    }

    /// Clear the input and pick a new target word
    pub fn new_target(&mut self) {
        self.trainer.reset();
    }

    fn process_playback_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                PlaybackEvent::AudioUnavailable(err) => {
                    log::warn!("Playback request dropped: {}", err);
                    self.audio_notice = Some(format!("Audio problem: {}", err));
                }
            }
        }
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        let actions = ctx.input(|i| self.key_bindings.actions(&i.events));
        for action in actions {
            match action {
                KeyAction::Symbol(symbol) => self.trainer.add_symbol(symbol),
                KeyAction::Finalize => {
                    self.trainer.finalize_character();
                }
            }
        }
    }

    fn apply_settings_changes(&mut self) {
        if !self.settings_changed {
            return;
        }
        self.settings_changed = false;

        if let Err(err) = self.trainer.apply_timing(&self.settings.timing) {
            log::warn!("Ignoring timing change: {}", err);
            self.settings_notice = Some(format!("{}", err));
            return;
        }

        // Update audio settings
        if let Some(ref engine) = self.playback {
            engine.update_settings(self.settings.audio.clone(), self.settings.timing.clone());
        }

        self.key_bindings = KeyBindings::from_settings(&self.settings.user);

        if self.settings.training.word_list_file != self.loaded_word_list {
            let (words, notice) = load_words(&self.settings.training);
            self.trainer.set_words(words);
            self.trainer.reset();
            self.loaded_word_list = self.settings.training.word_list_file.clone();
            if notice.is_some() {
                self.settings_notice = notice;
            }
        }

        // Save settings to file
        if let Err(e) = self.settings.save() {
            log::warn!("Failed to save settings: {}", e);
        }
    }
}

/// Load the configured word list, falling back to the built-in list
fn load_words(training: &TrainingSettings) -> (TargetWords, Option<String>) {
    let path = training.word_list_file.trim();
    if path.is_empty() {
        return (TargetWords::default_list(), None);
    }

    match TargetWords::load(path) {
        Ok(words) => {
            log::info!("Loaded {} target words from {}", words.len(), path);
            (words, None)
        }
        Err(err) => {
            log::warn!("Unable to load word list {}: {}", path, err);
            (
                TargetWords::default_list(),
                Some(format!(
                    "Could not load word list {} ({}). Using built-in words.",
                    path, err
                )),
            )
        }
    }
}

impl eframe::App for TrainerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply font size
        ctx.style_mut(|style| {
            style.text_styles.iter_mut().for_each(|(_, font_id)| {
                font_id.size = self.settings.user.font_size;
            });
        });

        self.process_playback_events();

        // Keying first, so a symbol pressed on the deadline frame restarts the countdown
        self.handle_keyboard(ctx);
        self.trainer.tick();

        self.apply_settings_changes();

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Settings").clicked() {
                        self.show_settings = !self.show_settings;
                        ui.close();
                    }
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Settings window (separate OS window)
        if self.show_settings {
            let settings = &mut self.settings;
            let settings_changed = &mut self.settings_changed;
            let show_settings = &mut self.show_settings;
            let file_dialog = &mut self.file_dialog;
            let file_dialog_target = &mut self.file_dialog_target;

            ctx.show_viewport_immediate(
                egui::ViewportId::from_hash_of("settings_viewport"),
                egui::ViewportBuilder::default()
                    .with_title("Settings")
                    .with_inner_size([420.0, 520.0]),
                |ctx, _class| {
                    file_dialog.update(ctx);

                    if let Some(path) = file_dialog.take_picked() {
                        if let Some(path_str) = path.to_str() {
                            match file_dialog_target {
                                Some(FileDialogTarget::WordList) => {
                                    settings.training.word_list_file = path_str.to_string();
                                    *settings_changed = true;
                                }
                                None => {}
                            }
                        }
                        *file_dialog_target = None;
                    }

                    egui::CentralPanel::default().show(ctx, |ui| {
                        render_settings_panel(
                            ui,
                            settings,
                            settings_changed,
                            file_dialog,
                            file_dialog_target,
                        );
                    });

                    if ctx.input(|i| i.viewport().close_requested()) {
                        *show_settings = false;
                    }
                },
            );
        }

        // Reference sheet (separate OS window)
        if self.show_reference {
            render_reference_window(
                ctx,
                self.trainer.table(),
                self.playback.as_ref(),
                &mut self.show_reference,
            );
        }

        // Main content
        egui::CentralPanel::default().show(ctx, |ui| {
            render_main_panel(ui, self);
        });

        // Wake up for the character timeout even if no input arrives
        if let Some(remaining) = self.trainer.time_remaining(Instant::now()) {
            ctx.request_repaint_after(remaining);
        }
    }
}
