use anyhow::Result;
use crossterm::{
    event::{self, Event as CrosstermEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::mpsc;
use std::time::Duration;
use tui_textarea::TextArea;
use voicecast_core::config::StdEnv;
use voicecast_core::output::OutputDir;
use voicecast_core::status::StatusEvent;
use voicecast_core::tts::OpenAiSpeechClient;
use voicecast_core::Synthesizer;

use crate::input_handler::{configure_textarea, handle_key_event, StudioAction};
use crate::playback::AudioPlayer;
use crate::state::StudioState;
use crate::ui::draw_ui;
use crate::worker::spawn_conversion;

pub struct StudioApp {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    state: StudioState,
    player: AudioPlayer,
    base_url: String,
    output_dir: OutputDir,
    event_tx: mpsc::Sender<StatusEvent>,
    event_rx: mpsc::Receiver<StatusEvent>,
}

impl StudioApp {
    pub fn new(initial_api_key: Option<String>, base_url: String, output_dir: OutputDir) -> Result<Self> {
        let (event_tx, event_rx) = mpsc::channel();

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        Ok(Self {
            terminal,
            state: StudioState::new(initial_api_key),
            player: AudioPlayer::new(),
            base_url,
            output_dir,
            event_tx,
            event_rx,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        }));

        let mut textarea = TextArea::default();
        configure_textarea(&mut textarea);

        let tick_rate = Duration::from_millis(50);

        loop {
            let state = &self.state;
            let ta = &textarea;
            self.terminal.draw(|frame| draw_ui(frame, state, ta))?;

            if self.state.should_quit {
                break;
            }

            // Worker progress first so a finished conversion shows up promptly.
            while let Ok(event) = self.event_rx.try_recv() {
                self.state.apply(event);
            }

            if !event::poll(tick_rate)? {
                continue;
            }
            let CrosstermEvent::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match handle_key_event(key, &mut textarea, &mut self.state) {
                StudioAction::Convert => self.start_conversion(&textarea.lines().join("\n")),
                StudioAction::Play => self.play(),
                StudioAction::Stop => {
                    if !self.player.is_playing() {
                        tracing::debug!("stop requested with nothing audible");
                    }
                    self.player.stop();
                    self.state.stopped();
                }
                StudioAction::LoadFile => {
                    if let Some(text) = self.state.load_file() {
                        textarea = TextArea::from(text.lines());
                        configure_textarea(&mut textarea);
                    }
                }
                StudioAction::Quit => self.state.should_quit = true,
                StudioAction::None => {}
            }
        }

        self.player.stop();
        self.restore_terminal()?;
        Ok(())
    }

    fn start_conversion(&mut self, text: &str) {
        let Some(request) = self.state.begin_conversion(text, &StdEnv) else {
            return;
        };

        let client = OpenAiSpeechClient::new(request.api_key).with_base_url(self.base_url.clone());
        let synthesizer = Synthesizer::new(client, self.output_dir.clone());

        if let Err(e) = spawn_conversion(synthesizer, request.job, self.event_tx.clone()) {
            tracing::error!(error = %e, "failed to spawn conversion worker");
            self.state.apply(StatusEvent::Failed {
                message: e.to_string(),
            });
        }
    }

    fn play(&mut self) {
        let Some(path) = self.state.audio_to_play() else {
            return;
        };
        match self.player.play_file(&path) {
            Ok(()) => self.state.playing(&path),
            Err(e) => {
                tracing::warn!(error = %e, "playback failed");
                self.state.playback_failed(e);
            }
        }
    }

    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for StudioApp {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
