use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::{App, FocusPane, InputMode};
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Paste(text) => {
            if app.input_mode == InputMode::Editing && !app.is_busy() {
                app.insert_str(&text);
            }
        }
        AppEvent::Resize(_, _) => app.scroll_to_bottom(),
        AppEvent::Tick => app.tick_animation(),
    }
    app.poll_request().await;
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Char('i') => focus_input(app),
        KeyCode::Tab => {
            app.focus = app.focus.next();
            if app.focus == FocusPane::Input {
                app.input_mode = InputMode::Editing;
            }
        }

        // Controls
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char('l') => app.settings.nudge_temperature(1),
        KeyCode::Char('-') | KeyCode::Char('h') => app.settings.nudge_temperature(-1),
        KeyCode::Char('s') => app.settings.toggle_structured_output(),
        KeyCode::Char('o') => app.settings.toggle_use_tools(),

        // Examples by number
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            app.fill_example(index);
        }

        KeyCode::Char('e') => match app.export_transcript() {
            Ok(path) => app.status_message = Some(format!("Saved transcript to {}", path.display())),
            Err(err) => app.status_message = Some(format!("Export failed: {}", err)),
        },

        KeyCode::Char('G') | KeyCode::End => app.scroll_to_bottom(),

        KeyCode::Char('j') | KeyCode::Down => match app.focus {
            FocusPane::Examples => app.examples_nav_down(),
            _ => app.scroll_down(),
        },
        KeyCode::Char('k') | KeyCode::Up => match app.focus {
            FocusPane::Examples => app.examples_nav_up(),
            _ => app.scroll_up(),
        },
        KeyCode::Enter => match app.focus {
            FocusPane::Examples => {
                if let Some(i) = app.examples_state.selected() {
                    app.fill_example(i);
                }
            }
            _ => focus_input(app),
        },
        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc || key.code == KeyCode::Tab {
        app.input_mode = InputMode::Normal;
        app.focus = FocusPane::Transcript;
        return;
    }

    // The input is disabled while a request is in flight
    if app.is_busy() {
        return;
    }

    match key.code {
        KeyCode::Enter
            if key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
        {
            app.insert_char('\n');
        }
        KeyCode::Char('j') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.insert_char('\n');
        }
        KeyCode::Enter => app.submit(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }
}

fn focus_input(app: &mut App) {
    app.focus = FocusPane::Input;
    app.input_mode = InputMode::Editing;
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let (x, y) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::ScrollDown => {
            if app.chat_area.is_some_and(|area| point_in_rect(x, y, area)) {
                app.scroll_down();
            }
        }
        MouseEventKind::ScrollUp => {
            if app.chat_area.is_some_and(|area| point_in_rect(x, y, area)) {
                app.scroll_up();
            }
        }
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(area) = app.examples_area.filter(|area| point_in_rect(x, y, *area)) {
                // Row 0 is the top border
                let row = y.saturating_sub(area.y) as usize;
                if row >= 1 {
                    let index = app.examples_state.offset() + row - 1;
                    app.fill_example(index);
                }
            } else if app.input_area.is_some_and(|area| point_in_rect(x, y, area)) {
                focus_input(app);
            } else if app.chat_area.is_some_and(|area| point_in_rect(x, y, area)) {
                app.focus = FocusPane::Transcript;
                app.input_mode = InputMode::Normal;
            }
        }
        _ => {}
    }
}
