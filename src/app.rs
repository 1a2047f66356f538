use ratatui::widgets::ListState;

use crate::ai::OpenAiClient;
use crate::config::Config;
use crate::credential::Credential;
use crate::image::GeneratedImage;
use crate::roles::RoleRegistry;
use crate::session::ChatSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Chat,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// A transient status line shown above the footer.
///
/// Notices carry validation warnings and provider errors to the user; they
/// are never appended to the conversation log.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub screen: Screen,
    pub input_mode: InputMode,

    // Chat state
    pub session: ChatSession,
    pub chat_input: String,
    pub chat_cursor: usize,
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of transcript area for scroll calculations
    pub chat_width: u16,  // Width of transcript area for wrap calculations

    // Image studio state
    pub image_prompt: String,
    pub image_cursor: usize,
    pub generated_image: Option<GeneratedImage>,

    // Credential entry popup
    pub credential: Credential,
    pub show_credential_input: bool,
    pub credential_input: String,
    pub credential_cursor: usize,

    // Role picker popup
    pub show_role_picker: bool,
    pub role_picker_state: ListState,

    // Status line
    pub notice: Option<Notice>,

    pub registry: RoleRegistry,
    pub config: Config,
    pub openai: OpenAiClient,
}

impl App {
    pub fn new() -> Self {
        let registry = RoleRegistry::new();
        let session = ChatSession::new(registry.default_role().name);

        Self {
            should_quit: false,
            screen: Screen::Chat,
            input_mode: InputMode::Normal,

            session,
            chat_input: String::new(),
            chat_cursor: 0,
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,

            image_prompt: String::new(),
            image_cursor: 0,
            generated_image: None,

            credential: Credential::default(),
            show_credential_input: false,
            credential_input: String::new(),
            credential_cursor: 0,

            show_role_picker: false,
            role_picker_state: ListState::default(),

            notice: None,

            registry,
            config: Config::new(),
            openai: OpenAiClient::new(),
        }
    }

    pub fn switch_screen(&mut self) {
        self.screen = match self.screen {
            Screen::Chat => Screen::Image,
            Screen::Image => Screen::Chat,
        };
        self.input_mode = InputMode::Normal;
    }

    pub fn toggle_image_generation(&mut self) {
        self.config.image_generation = !self.config.image_generation;
        let state = if self.config.image_generation {
            "enabled"
        } else {
            "disabled"
        };
        self.notice = Some(Notice::info(format!("Image generation {}", state)));
    }

    // Role picker

    pub fn open_role_picker(&mut self) {
        let current = self
            .registry
            .names()
            .iter()
            .position(|name| *name == self.session.active_role())
            .unwrap_or(0);
        self.role_picker_state.select(Some(current));
        self.show_role_picker = true;
    }

    pub fn role_picker_nav_down(&mut self) {
        let len = self.registry.names().len();
        if len > 0 {
            let i = self.role_picker_state.selected().unwrap_or(0);
            self.role_picker_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn role_picker_nav_up(&mut self) {
        let i = self.role_picker_state.selected().unwrap_or(0);
        self.role_picker_state.select(Some(i.saturating_sub(1)));
    }

    pub fn select_role(&mut self) {
        if let Some(i) = self.role_picker_state.selected() {
            if let Some(name) = self.registry.names().get(i) {
                self.session.set_active_role(*name);
            }
        }
        self.show_role_picker = false;
    }

    // Transcript scrolling

    pub fn scroll_chat_down(&mut self) {
        let total = self.transcript_line_count();
        if self.chat_scroll < total.saturating_sub(self.chat_height) {
            self.chat_scroll = self.chat_scroll.saturating_add(1);
        }
    }

    pub fn scroll_chat_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    /// Scroll so the newest turn is visible after a send completes.
    pub fn scroll_chat_to_bottom(&mut self) {
        let total = self.transcript_line_count();
        let visible = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };
        self.chat_scroll = total.saturating_sub(visible);
    }

    /// Wrapped line count of the transcript, using the rendered width.
    fn transcript_line_count(&self) -> u16 {
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total: u16 = 0;
        for turn in self.session.turns() {
            total += 1; // Speaker label line
            for line in turn.text.lines() {
                // Character count, not byte length, for UTF-8 content
                let chars = line.chars().count();
                if chars == 0 {
                    total += 1;
                } else {
                    total += ((chars / wrap_width) + 1) as u16;
                }
            }
            total += 1; // Blank line after each turn
        }
        total
    }
}
