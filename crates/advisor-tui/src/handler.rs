use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::app::{App, Screen};
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Paste(text) => {
            if app.screen == Screen::Chat {
                app.insert_str(&text);
            }
        }
        AppEvent::Resize => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Quit => app.should_quit = true,
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work on any screen
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.screen {
        Screen::Landing => handle_landing_key(app, key),
        Screen::Chat => handle_chat_key(app, key),
    }
}

fn handle_landing_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,

        KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => app.select_prev(),

        KeyCode::Enter | KeyCode::Char(' ') => app.activate_selection(),

        // Header navigation
        KeyCode::Char('a') => app.jump_to_about(),
        KeyCode::Char('f') => app.jump_to_faqs(),
        KeyCode::Char('g') => {
            app.landing_scroll = 0;
            app.follow_selection = false;
        }

        KeyCode::Char('c') => app.enter_chat(),

        KeyCode::PageDown => app.scroll_landing(10),
        KeyCode::PageUp => app.scroll_landing(-10),

        _ => {}
    }
}

fn handle_chat_key(app: &mut App, key: KeyEvent) {
    match key.code {
        // Logout
        KeyCode::Esc => app.leave_chat(),

        KeyCode::Enter => {
            app.submit_input();
        }

        // Scrolling the conversation
        KeyCode::Up => app.scroll_chat_up(1),
        KeyCode::Down => app.scroll_chat_down(1),
        KeyCode::PageUp => app.scroll_chat_up(app.chat_height.max(1)),
        KeyCode::PageDown => app.scroll_chat_down(app.chat_height.max(1)),

        // Line editing
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.insert_char(c),

        _ => {}
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let (x, y) = (mouse.column, mouse.row);

    match app.screen {
        Screen::Landing => {
            if !app.landing_area.is_some_and(|r| point_in_rect(x, y, r)) {
                return;
            }
            match mouse.kind {
                MouseEventKind::ScrollDown => app.scroll_landing(3),
                MouseEventKind::ScrollUp => app.scroll_landing(-3),
                _ => {}
            }
        }
        Screen::Chat => {
            if !app.chat_area.is_some_and(|r| point_in_rect(x, y, r)) {
                return;
            }
            match mouse.kind {
                MouseEventKind::ScrollDown => app.scroll_chat_down(3),
                MouseEventKind::ScrollUp => app.scroll_chat_up(3),
                _ => {}
            }
        }
    }
}
