//! Demo application shell: one staging editor feeding a committed-items list.

use color_eyre::Result;
use crossterm::event::Event;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use ratatui::DefaultTerminal;
use ratatui::Frame;
use ratatui::layout::Constraint;
use ratatui::layout::Layout;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::List;
use ratatui::widgets::ListItem;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;

use crate::app_event::AppEvent;
use crate::app_event::AppEventSender;
use crate::cli::Cli;
use crate::debounce::Debouncer;
use crate::staged_input::RESIZE_MAX_WAIT;
use crate::staged_input::RESIZE_QUIET_WINDOW;
use crate::staged_input::StagedInput;
use crate::staged_input::StagedInputConfig;

pub(crate) struct App {
    staged_input: StagedInput,
    committed: Vec<String>,
    app_event_rx: mpsc::UnboundedReceiver<AppEvent>,
    done: bool,
}

impl App {
    pub(crate) fn new(cli: &Cli) -> Self {
        let (tx, app_event_rx) = mpsc::unbounded_channel();
        let sender = AppEventSender::new(tx);

        let resize_debounce = {
            let sender = sender.clone();
            Debouncer::spawn(RESIZE_QUIET_WINDOW, RESIZE_MAX_WAIT, move || {
                sender.send(AppEvent::FlushResize);
            })
        };
        let on_commit = {
            let sender = sender.clone();
            Box::new(move |items: Vec<String>| sender.send(AppEvent::Committed(items)))
        };
        let config = StagedInputConfig {
            max_rows: cli.max_rows,
            preset_values: (!cli.preset_values.is_empty()).then(|| cli.preset_values.clone()),
            on_commit: Some(on_commit),
        };

        Self {
            staged_input: StagedInput::new(config, resize_debounce),
            committed: Vec::new(),
            app_event_rx,
            done: false,
        }
    }

    pub(crate) async fn run(mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let mut events = EventStream::new();
        while !self.done {
            terminal.draw(|frame| self.draw(frame))?;
            tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(event) => self.handle_terminal_event(event?),
                    None => self.done = true,
                },
                Some(event) = self.app_event_rx.recv() => self.handle_app_event(event),
            }
        }
        Ok(())
    }

    fn handle_terminal_event(&mut self, event: Event) {
        match event {
            Event::Key(key_event) => self.handle_key_event(key_event),
            Event::FocusGained => self.staged_input.set_input_focus(true),
            Event::FocusLost => self.staged_input.set_input_focus(false),
            _ => {}
        }
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        if key_event.kind == KeyEventKind::Release {
            return;
        }
        match (key_event.code, key_event.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                self.done = true;
            }
            _ => {
                self.staged_input.handle_key_event(key_event);
            }
        }
    }

    fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::FlushResize => self.staged_input.apply_resize(),
            AppEvent::Committed(items) => self.committed.extend(items),
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let input_height = self.staged_input.desired_height();
        let [list_area, input_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(input_height)])
                .areas(frame.area());

        let items: Vec<ListItem> = self
            .committed
            .iter()
            .map(String::as_str)
            .map(ListItem::new)
            .collect();
        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title("committed items"),
        );
        frame.render_widget(list, list_area);
        frame.render_widget(&self.staged_input, input_area);
    }
}
