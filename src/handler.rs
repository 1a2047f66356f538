use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, InputMode, Notice, Screen};
use crate::credential::Credential;
use crate::error::StudioError;
use crate::image;
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key).await?,
        AppEvent::Resize => {}
    }
    Ok(())
}

async fn handle_key(app: &mut App, key: KeyEvent) -> Result<()> {
    // Global quit works in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return Ok(());
    }

    // Popups capture input before anything else
    if app.show_credential_input {
        handle_credential_input(app, key);
        return Ok(());
    }
    if app.show_role_picker {
        handle_role_picker(app, key);
        return Ok(());
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key).await?,
    }

    Ok(())
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Tab => app.switch_screen(),

        // Start editing the active screen's input field
        KeyCode::Char('i') | KeyCode::Enter => {
            app.input_mode = InputMode::Editing;
            match app.screen {
                Screen::Chat => app.chat_cursor = app.chat_input.chars().count(),
                Screen::Image => app.image_cursor = app.image_prompt.chars().count(),
            }
        }

        KeyCode::Char('r') => app.open_role_picker(),

        KeyCode::Char('K') => {
            app.show_credential_input = true;
            app.credential_input.clear();
            app.credential_cursor = 0;
        }

        KeyCode::Char('g') => app.toggle_image_generation(),

        // Transcript scrolling (chat screen only)
        KeyCode::Char('j') | KeyCode::Down => {
            if app.screen == Screen::Chat {
                app.scroll_chat_down();
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if app.screen == Screen::Chat {
                app.scroll_chat_up();
            }
        }

        KeyCode::Esc => app.notice = None,

        _ => {}
    }
}

async fn handle_editing_mode(app: &mut App, key: KeyEvent) -> Result<()> {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => match app.screen {
            Screen::Chat => submit_chat(app).await,
            Screen::Image => submit_image(app).await,
        },
        code => match app.screen {
            Screen::Chat => edit_field(&mut app.chat_input, &mut app.chat_cursor, code),
            Screen::Image => edit_field(&mut app.image_prompt, &mut app.image_cursor, code),
        },
    }
    Ok(())
}

fn handle_credential_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            app.credential = Credential::new(std::mem::take(&mut app.credential_input));
            app.credential_cursor = 0;
            app.show_credential_input = false;
            app.notice = Some(Notice::info("API key saved for this session"));
        }
        KeyCode::Esc => {
            app.show_credential_input = false;
            app.credential_input.clear();
            app.credential_cursor = 0;
        }
        code => edit_field(&mut app.credential_input, &mut app.credential_cursor, code),
    }
}

fn handle_role_picker(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.show_role_picker = false,
        KeyCode::Char('j') | KeyCode::Down => app.role_picker_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.role_picker_nav_up(),
        KeyCode::Enter => app.select_role(),
        _ => {}
    }
}

/// Cursor-aware editing shared by every text field.
fn edit_field(input: &mut String, cursor: &mut usize, code: KeyCode) {
    match code {
        KeyCode::Backspace => {
            if *cursor > 0 {
                *cursor -= 1;
                let byte_pos = char_to_byte_index(input, *cursor);
                input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = input.chars().count();
            if *cursor < char_count {
                let byte_pos = char_to_byte_index(input, *cursor);
                input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            *cursor = cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = input.chars().count();
            *cursor = (*cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            *cursor = 0;
        }
        KeyCode::End => {
            *cursor = input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(input, *cursor);
            input.insert(byte_pos, c);
            *cursor += 1;
        }
        _ => {}
    }
}

/// Send the chat input. The call is awaited inline: one request per send,
/// and the interaction surface blocks until it returns or errors.
async fn submit_chat(app: &mut App) {
    app.notice = None;
    let text = app.chat_input.clone();

    let result = app
        .session
        .send_message(
            &app.openai,
            &app.credential,
            &app.registry,
            &app.config.chat_model,
            &text,
        )
        .await;

    match result {
        Ok(()) => {
            app.chat_input.clear();
            app.chat_cursor = 0;
            app.scroll_chat_to_bottom();
        }
        Err(err) if err.is_validation() => {
            // Nothing was appended; keep the input so the user can fix it
            app.notice = Some(Notice::warning(err.to_string()));
        }
        Err(err) => {
            // The user turn stays in the log unanswered; clear the input so
            // a resend is deliberate rather than accidental
            app.chat_input.clear();
            app.chat_cursor = 0;
            app.notice = Some(Notice::error(format!("Chat failed: {}", err)));
            app.scroll_chat_to_bottom();
        }
    }
}

/// Generate an image from the prompt input, blocking until the provider
/// answers. The enable toggle is checked inside the operation, before I/O.
async fn submit_image(app: &mut App) {
    app.notice = None;
    let prompt = app.image_prompt.clone();

    let result = image::generate_image(&app.openai, &app.credential, &app.config, &prompt).await;

    match result {
        Ok(generated) => {
            app.notice = Some(Notice::info(format!(
                "Generated a {} image ({} KB)",
                app.config.image_size,
                generated.bytes.len() / 1024
            )));
            app.generated_image = Some(generated);
            app.image_prompt.clear();
            app.image_cursor = 0;
        }
        Err(err) if err.is_validation() => {
            app.notice = Some(Notice::warning(err.to_string()));
        }
        Err(err @ StudioError::Decode(_)) => {
            app.notice = Some(Notice::error(err.to_string()));
        }
        Err(err) => {
            app.notice = Some(Notice::error(format!(
                "Image generation failed: {} (make sure your API key supports image generation)",
                err
            )));
        }
    }
}
