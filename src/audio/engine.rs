use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::sink::{CpalSink, ToneSink};
use super::tone::ToneBank;
use crate::config::{AudioSettings, TimingSettings};
use crate::messages::{PlaybackCommand, PlaybackEvent};
use crate::morse::{parse_code, Symbol};

/// Cloneable front for submitting playback requests.
///
/// Every call returns immediately; the worker renders requests one at a
/// time in the order they were submitted.
#[derive(Clone)]
pub struct PlaybackHandle {
    cmd_tx: Sender<PlaybackCommand>,
    wake_tx: Sender<()>,
    epoch: Arc<AtomicU64>,
}

impl PlaybackHandle {
    pub fn play_symbol(&self, symbol: Symbol) {
        self.submit(PlaybackCommand::PlaySymbol {
            symbol,
            epoch: self.epoch.load(Ordering::SeqCst),
        });
    }

    /// Queue a code string such as `"...---..."`. Characters other than
    /// dots and dashes are ignored.
    pub fn play_sequence(&self, code: &str) {
        let symbols = parse_code(code);
        if symbols.len() != code.chars().count() {
            log::debug!("Ignoring non-morse characters in {:?}", code);
        }
        if symbols.is_empty() {
            return;
        }
        self.submit(PlaybackCommand::PlaySequence {
            symbols,
            epoch: self.epoch.load(Ordering::SeqCst),
        });
    }

    /// Abandon everything submitted so far. A tone already sounding is
    /// allowed to finish; nothing after it starts.
    pub fn cancel(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let _ = self.wake_tx.try_send(());
    }

    pub fn update_settings(&self, audio: AudioSettings, timing: TimingSettings) {
        self.submit(PlaybackCommand::UpdateSettings { audio, timing });
    }

    fn submit(&self, cmd: PlaybackCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            log::warn!("Playback worker has stopped, request dropped");
        }
    }
}

/// Owns the playback worker thread
pub struct PlaybackEngine {
    handle: PlaybackHandle,
    worker: Option<JoinHandle<()>>,
}

impl PlaybackEngine {
    /// Start a worker that plays through the default output device
    pub fn new(
        audio: &AudioSettings,
        timing: &TimingSettings,
        event_tx: Sender<PlaybackEvent>,
    ) -> std::io::Result<Self> {
        Self::with_sink(CpalSink::new, audio, timing, event_tx)
    }

    /// Start a worker around a custom sink. The sink is built on the
    /// worker thread, so it does not need to be `Send`.
    pub fn with_sink<F, S>(
        make_sink: F,
        audio: &AudioSettings,
        timing: &TimingSettings,
        event_tx: Sender<PlaybackEvent>,
    ) -> std::io::Result<Self>
    where
        F: FnOnce() -> S + Send + 'static,
        S: ToneSink + 'static,
    {
        let (cmd_tx, cmd_rx) = unbounded::<PlaybackCommand>();
        let (wake_tx, wake_rx) = bounded::<()>(1);
        let epoch = Arc::new(AtomicU64::new(0));

        // Tones are generated here so they are ready before the first keypress
        let tones = ToneBank::from_settings(audio, timing);
        let symbol_pause = Duration::from_millis(timing.symbol_pause_ms as u64);
        let worker_epoch = Arc::clone(&epoch);

        let worker = thread::Builder::new()
            .name("morse-playback".to_string())
            .spawn(move || {
                PlaybackWorker {
                    sink: make_sink(),
                    tones,
                    symbol_pause,
                    cmd_rx,
                    wake_rx,
                    epoch: worker_epoch,
                    event_tx,
                }
                .run();
            })?;

        Ok(Self {
            handle: PlaybackHandle {
                cmd_tx,
                wake_tx,
                epoch,
            },
            worker: Some(worker),
        })
    }

    pub fn handle(&self) -> PlaybackHandle {
        self.handle.clone()
    }

    pub fn play_symbol(&self, symbol: Symbol) {
        self.handle.play_symbol(symbol);
    }

    pub fn play_sequence(&self, code: &str) {
        self.handle.play_sequence(code);
    }

    pub fn cancel(&self) {
        self.handle.cancel();
    }

    pub fn update_settings(&self, audio: AudioSettings, timing: TimingSettings) {
        self.handle.update_settings(audio, timing);
    }

    /// Abandon queued work, let the current tone finish and join the worker
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        self.handle.cancel();
        let _ = self.handle.cmd_tx.send(PlaybackCommand::Shutdown);
        if worker.join().is_err() {
            log::error!("Playback worker panicked");
        }
    }
}

impl Drop for PlaybackEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

struct PlaybackWorker<S: ToneSink> {
    sink: S,
    tones: ToneBank,
    symbol_pause: Duration,
    cmd_rx: Receiver<PlaybackCommand>,
    wake_rx: Receiver<()>,
    epoch: Arc<AtomicU64>,
    event_tx: Sender<PlaybackEvent>,
}

impl<S: ToneSink> PlaybackWorker<S> {
    fn run(mut self) {
        while let Ok(cmd) = self.cmd_rx.recv() {
            match cmd {
                PlaybackCommand::PlaySymbol { symbol, epoch } => {
                    if self.is_cancelled(epoch) {
                        continue;
                    }
                    self.render(symbol);
                }
                PlaybackCommand::PlaySequence { symbols, epoch } => {
                    self.play_sequence(&symbols, epoch);
                }
                PlaybackCommand::UpdateSettings { audio, timing } => {
                    self.tones = ToneBank::from_settings(&audio, &timing);
                    self.symbol_pause = Duration::from_millis(timing.symbol_pause_ms as u64);
                }
                PlaybackCommand::Shutdown => break,
            }
        }
        log::debug!("Playback worker stopped");
        // Dropping self releases the sink and its output device
    }

    fn play_sequence(&mut self, symbols: &[Symbol], epoch: u64) {
        for (idx, &symbol) in symbols.iter().enumerate() {
            if idx > 0 && !self.rest(epoch) {
                log::debug!("Sequence cancelled after {} of {} symbols", idx, symbols.len());
                return;
            }
            if self.is_cancelled(epoch) {
                return;
            }
            if !self.render(symbol) {
                return;
            }
        }
    }

    /// Play one tone. Returns false if the request had to be dropped.
    fn render(&mut self, symbol: Symbol) -> bool {
        let tone = Arc::clone(self.tones.tone(symbol));
        match self.sink.play(&tone) {
            Ok(()) => true,
            Err(err) => {
                log::debug!("Dropping {:?} playback: {}", symbol, err);
                let _ = self.event_tx.try_send(PlaybackEvent::AudioUnavailable(err));
                false
            }
        }
    }

    /// Wait out the inter-symbol pause. Returns false if cancelled meanwhile.
    fn rest(&self, epoch: u64) -> bool {
        let deadline = Instant::now() + self.symbol_pause;
        loop {
            if self.is_cancelled(epoch) {
                return false;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return true;
            }
            match self.wake_rx.recv_timeout(remaining) {
                // Woken: re-check the epoch, the wake-up may be stale
                Ok(()) => continue,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    thread::sleep(remaining);
                    return !self.is_cancelled(epoch);
                }
            }
        }
    }

    fn is_cancelled(&self, epoch: u64) -> bool {
        self.epoch.load(Ordering::SeqCst) != epoch
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::audio::tone::ToneBuffer;
    use crate::error::AudioError;
    use std::sync::Mutex;

    /// One tone seen by the recording sink
    #[derive(Clone, Debug)]
    pub(crate) struct Played {
        pub samples: usize,
        pub started: Instant,
        pub finished: Instant,
    }

    /// Sink that records what it was asked to play and takes as long as
    /// the tone would on a real device
    pub(crate) struct RecordingSink {
        log: Arc<Mutex<Vec<Played>>>,
        failures_left: usize,
    }

    impl ToneSink for RecordingSink {
        fn play(&mut self, tone: &Arc<ToneBuffer>) -> Result<(), AudioError> {
            if self.failures_left > 0 {
                self.failures_left -= 1;
                return Err(AudioError::Unavailable("test device missing".to_string()));
            }
            let started = Instant::now();
            thread::sleep(tone.duration());
            self.log.lock().unwrap().push(Played {
                samples: tone.len(),
                started,
                finished: Instant::now(),
            });
            Ok(())
        }
    }

    /// 8 kHz so dot = 40 samples (5 ms) and dash = 120 samples (15 ms)
    pub(crate) fn test_settings() -> (AudioSettings, TimingSettings) {
        let audio = AudioSettings {
            sample_rate: 8000,
            ..AudioSettings::default()
        };
        let timing = TimingSettings {
            dit_ms: 5,
            dah_ms: 15,
            symbol_pause_ms: 20,
            character_timeout_ms: 1000,
        };
        (audio, timing)
    }

    pub(crate) const DOT_SAMPLES: usize = 40;
    pub(crate) const DASH_SAMPLES: usize = 120;

    pub(crate) fn recording_engine(
        failures: usize,
    ) -> (PlaybackEngine, Arc<Mutex<Vec<Played>>>, Receiver<PlaybackEvent>) {
        let (audio, timing) = test_settings();
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink_log = Arc::clone(&log);
        let (event_tx, event_rx) = bounded(64);
        let engine = PlaybackEngine::with_sink(
            move || RecordingSink {
                log: sink_log,
                failures_left: failures,
            },
            &audio,
            &timing,
            event_tx,
        )
        .unwrap();
        (engine, log, event_rx)
    }

    pub(crate) fn wait_for(log: &Arc<Mutex<Vec<Played>>>, count: usize) -> Vec<Played> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            let played = log.lock().unwrap().clone();
            if played.len() >= count {
                return played;
            }
            thread::sleep(Duration::from_millis(2));
        }
        log.lock().unwrap().clone()
    }

    #[test]
    fn test_sequence_plays_in_order_with_pauses() {
        let (engine, log, _events) = recording_engine(0);
        engine.play_sequence("...---...");

        let played = wait_for(&log, 9);
        assert_eq!(played.len(), 9);

        let lengths: Vec<usize> = played.iter().map(|p| p.samples).collect();
        let d = DOT_SAMPLES;
        let h = DASH_SAMPLES;
        assert_eq!(lengths, vec![d, d, d, h, h, h, d, d, d]);

        // 8 pauses, one between each pair of tones
        for pair in played.windows(2) {
            let gap = pair[1].started.duration_since(pair[0].finished);
            assert!(gap >= Duration::from_millis(20), "gap too short: {:?}", gap);
        }
    }

    #[test]
    fn test_symbols_never_overlap() {
        let (engine, log, _events) = recording_engine(0);
        engine.play_symbol(Symbol::Dash);
        engine.play_symbol(Symbol::Dot);
        engine.play_symbol(Symbol::Dash);

        let played = wait_for(&log, 3);
        let lengths: Vec<usize> = played.iter().map(|p| p.samples).collect();
        assert_eq!(lengths, vec![DASH_SAMPLES, DOT_SAMPLES, DASH_SAMPLES]);
        for pair in played.windows(2) {
            assert!(pair[1].started >= pair[0].finished);
        }
    }

    #[test]
    fn test_sequence_ignores_other_characters() {
        let (engine, log, _events) = recording_engine(0);
        engine.play_sequence(". x-");
        let played = wait_for(&log, 2);
        let lengths: Vec<usize> = played.iter().map(|p| p.samples).collect();
        assert_eq!(lengths, vec![DOT_SAMPLES, DASH_SAMPLES]);
    }

    #[test]
    fn test_cancel_stops_sequence_between_symbols() {
        let (engine, log, _events) = recording_engine(0);
        engine.play_sequence("----------");
        wait_for(&log, 1);
        engine.cancel();

        thread::sleep(Duration::from_millis(200));
        let played = log.lock().unwrap().len();
        assert!(played < 10, "sequence was not cancelled");

        // Cancellation doesn't affect later requests
        engine.play_symbol(Symbol::Dot);
        let after = wait_for(&log, played + 1);
        assert_eq!(after.len(), played + 1);
        assert_eq!(after.last().unwrap().samples, DOT_SAMPLES);
    }

    #[test]
    fn test_cancel_drops_queued_requests() {
        let (engine, log, _events) = recording_engine(0);
        for _ in 0..20 {
            engine.play_symbol(Symbol::Dash);
        }
        engine.cancel();
        engine.play_symbol(Symbol::Dot);

        thread::sleep(Duration::from_millis(150));
        let played = log.lock().unwrap().clone();
        assert!(played.len() < 21);
        assert_eq!(played.last().unwrap().samples, DOT_SAMPLES);
    }

    #[test]
    fn test_audio_failure_drops_only_that_request() {
        let (engine, log, events) = recording_engine(1);
        engine.play_symbol(Symbol::Dot);
        engine.play_symbol(Symbol::Dash);

        let played = wait_for(&log, 1);
        assert_eq!(played.len(), 1);
        assert_eq!(played[0].samples, DASH_SAMPLES);

        let event = events.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(matches!(
            event,
            PlaybackEvent::AudioUnavailable(AudioError::Unavailable(_))
        ));
    }

    #[test]
    fn test_failure_drops_rest_of_sequence() {
        let (engine, log, events) = recording_engine(1);
        engine.play_sequence("---");
        engine.play_symbol(Symbol::Dot);

        let played = wait_for(&log, 1);
        thread::sleep(Duration::from_millis(50));
        let played_now = log.lock().unwrap().len();
        assert_eq!(played_now, 1);
        assert_eq!(played[0].samples, DOT_SAMPLES);
        assert!(events.try_recv().is_ok());
    }

    #[test]
    fn test_update_settings_regenerates_tones() {
        let (engine, log, _events) = recording_engine(0);
        let (audio, mut timing) = test_settings();
        timing.dit_ms = 10;
        engine.update_settings(audio, timing);
        engine.play_symbol(Symbol::Dot);

        let played = wait_for(&log, 1);
        assert_eq!(played[0].samples, 80);
    }

    #[test]
    fn test_shutdown_with_long_queue() {
        let (engine, log, _events) = recording_engine(0);
        for _ in 0..1000 {
            engine.play_sequence("-----");
        }
        wait_for(&log, 1);

        let started = Instant::now();
        engine.shutdown();
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn test_handle_outlives_engine() {
        let (engine, log, _events) = recording_engine(0);
        let handle = engine.handle();
        drop(engine);

        // Worker is gone; requests are dropped without panicking
        handle.play_symbol(Symbol::Dot);
        handle.play_sequence("..");
        handle.cancel();
        thread::sleep(Duration::from_millis(20));
        assert!(log.lock().unwrap().is_empty());
    }
}
