use crate::core::app::{App, Confirmation, ModelPicker, Notice, TextPrompt, UiMode};
use crate::core::command::slash_commands;
use crate::core::text_wrapping::wrap_surface;
use crate::ui::chat_loop::keybindings::HELP_ENTRIES;
use crate::ui::image_popup::HalfBlockImage;
use crate::ui::layout::{centered_box, centered_rect, screen_areas};
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const SURFACE_FG: Color = Color::LightGreen;
const SURFACE_BG: Color = Color::Black;
const DIALOG_WIDTH: u16 = 60;
const HELP_WIDTH: u16 = 72;

fn surface_style() -> Style {
    Style::default().fg(SURFACE_FG).bg(SURFACE_BG)
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let areas = screen_areas(f.area());

    render_tabs(f, app, areas.tabs);
    render_surface(f, app, areas.surface);
    render_status(f, app, areas.status);

    match &app.mode {
        UiMode::Terminal => {}
        UiMode::Prompt(prompt) => render_prompt(f, prompt, areas.surface),
        UiMode::Confirm(confirm) => render_confirmation(f, confirm, areas.surface),
        UiMode::Notice(notice) => render_notice(f, notice, areas.surface),
        UiMode::ModelPicker(picker) => render_model_picker(f, picker, areas.surface),
        UiMode::Help => render_help(f, areas.surface),
    }

    if let Some(popup) = &app.popup {
        let area = centered_rect(80, 80, f.area());
        f.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title("CRT Image Display")
            .style(surface_style());
        let inner = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(HalfBlockImage::new(&popup.image), inner);
    }
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = app
        .sessions
        .iter()
        .map(|session| {
            if session.is_pending() {
                Line::from(format!("{} *", session.title))
            } else {
                Line::from(session.title.clone())
            }
        })
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.active)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(SURFACE_FG)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        );
    f.render_widget(tabs, area);
}

fn render_surface(f: &mut Frame, app: &mut App, area: Rect) {
    let show_cursor = matches!(app.mode, UiMode::Terminal) && app.popup.is_none();
    let Some(session) = app.active_session_mut() else {
        f.render_widget(Block::default().style(surface_style()), area);
        return;
    };

    let cursor = (show_cursor && session.buffer.is_prompt_open()).then(|| session.buffer.cursor());
    let wrapped = wrap_surface(session.buffer.text(), area.width as usize, cursor);

    let height = area.height as usize;
    let max_offset = wrapped.line_count().saturating_sub(height);
    session.viewport.clamp(max_offset);
    let top = max_offset - session.viewport.offset_from_bottom;

    let lines: Vec<Line> = wrapped
        .lines
        .iter()
        .skip(top)
        .take(height)
        .map(|line| Line::from(line.as_str()))
        .collect();
    f.render_widget(Paragraph::new(lines).style(surface_style()), area);

    if let Some((row, col)) = wrapped.cursor {
        if row >= top && row < top + height {
            f.set_cursor_position(Position::new(
                area.x + col as u16,
                area.y + (row - top) as u16,
            ));
        }
    }
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let config = app.config.snapshot();
    let detail = match &app.status {
        Some(status) => status.clone(),
        None => "F1 for help".to_string(),
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", config.current_model),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("| "),
        Span::raw(format!("image: {} ", config.image_display_mode)),
        Span::raw("| "),
        Span::raw(detail),
    ]);
    f.render_widget(
        Paragraph::new(line).style(Style::default().fg(Color::Black).bg(SURFACE_FG)),
        area,
    );
}

fn dialog_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(surface_style())
}

fn render_prompt(f: &mut Frame, prompt: &TextPrompt, area: Rect) {
    let dialog = centered_box(DIALOG_WIDTH, 5, area);
    f.render_widget(Clear, dialog);
    let block = dialog_block(prompt.kind.title());
    let inner = block.inner(dialog);
    f.render_widget(block, dialog);
    if inner.height < 2 || inner.width == 0 {
        return;
    }

    f.render_widget(
        Paragraph::new(prompt.kind.label()),
        Rect { height: 1, ..inner },
    );

    // Scroll horizontally so the cursor stays visible.
    let input_area = Rect {
        y: inner.y + 1,
        height: 1,
        ..inner
    };
    let before_cursor = UnicodeWidthStr::width(&prompt.text()[..prompt.cursor()]);
    let visible = input_area.width as usize;
    let skip = before_cursor.saturating_sub(visible.saturating_sub(1));
    f.render_widget(
        Paragraph::new(prompt.text())
            .style(Style::default().add_modifier(Modifier::UNDERLINED))
            .scroll((0, skip as u16)),
        input_area,
    );
    f.set_cursor_position(Position::new(
        input_area.x + (before_cursor - skip) as u16,
        input_area.y,
    ));
}

fn render_confirmation(f: &mut Frame, confirm: &Confirmation, area: Rect) {
    let dialog = centered_box(DIALOG_WIDTH, 6, area);
    f.render_widget(Clear, dialog);
    let text = vec![
        Line::from(confirm.question()),
        Line::from(""),
        Line::from(Span::styled(
            confirm.hint(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    f.render_widget(
        Paragraph::new(text)
            .block(dialog_block(confirm.title()))
            .wrap(Wrap { trim: true }),
        dialog,
    );
}

fn render_notice(f: &mut Frame, notice: &Notice, area: Rect) {
    let mut text: Vec<Line> = notice.message.lines().map(Line::from).collect();
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "Press Enter to continue",
        Style::default().add_modifier(Modifier::DIM),
    )));
    let dialog = centered_box(DIALOG_WIDTH, text.len() as u16 + 4, area);
    f.render_widget(Clear, dialog);
    f.render_widget(
        Paragraph::new(text)
            .block(dialog_block(&notice.title))
            .wrap(Wrap { trim: true }),
        dialog,
    );
}

fn render_model_picker(f: &mut Frame, picker: &ModelPicker, area: Rect) {
    let dialog = centered_rect(50, 60, area);
    f.render_widget(Clear, dialog);
    let block = dialog_block("Select Model");

    match picker {
        ModelPicker::Loading => {
            f.render_widget(Paragraph::new("Loading models...").block(block), dialog);
        }
        ModelPicker::Ready { models, selected } => {
            let items: Vec<ListItem> = models
                .iter()
                .map(|model| ListItem::new(model.as_str()))
                .collect();
            let list = List::new(items)
                .block(block.title_bottom("Enter select • Esc cancel"))
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                .highlight_symbol("> ");
            let mut state = ListState::default().with_selected(Some(*selected));
            f.render_stateful_widget(list, dialog, &mut state);
        }
    }
}

fn render_help(f: &mut Frame, area: Rect) {
    let commands: Vec<(String, &str)> = slash_commands()
        .iter()
        .map(|command| (format!("/{} <prompt>", command.name), command.help))
        .collect();
    let entries: Vec<(&str, &str)> = HELP_ENTRIES
        .iter()
        .copied()
        .chain(commands.iter().map(|(key, help)| (key.as_str(), *help)))
        .collect();

    let dialog = centered_box(HELP_WIDTH, entries.len() as u16 + 4, area);
    f.render_widget(Clear, dialog);
    let key_width = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);

    let mut lines: Vec<Line> = entries
        .iter()
        .map(|(key, description)| {
            Line::from(vec![
                Span::styled(
                    format!("{key:<key_width$}  "),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(description.to_string()),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Enter or Esc to close",
        Style::default().add_modifier(Modifier::DIM),
    )));

    f.render_widget(Paragraph::new(lines).block(dialog_block("Help")), dialog);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::{apply_action, AppAction, AppActionContext, EditOp};
    use crate::core::config::Config;
    use crate::utils::test_utils::create_test_app;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &mut App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut rows = Vec::new();
        for y in 0..height {
            let row: String = (0..width).map(|x| buffer[(x, y)].symbol()).collect();
            rows.push(row.trim_end().to_string());
        }
        rows.join("\n")
    }

    #[test]
    fn draws_tabs_prompt_and_status() {
        let mut app = create_test_app(Config::default());
        apply_action(
            &mut app,
            AppAction::Edit(EditOp::Insert("hi".to_string())),
            AppActionContext::default(),
        );
        let screen = draw(&mut app, 40, 6);
        let rows: Vec<&str> = screen.lines().collect();
        assert!(rows[0].contains("Chat"));
        assert_eq!(rows[1], "> hi");
        assert!(rows[5].contains("gpt-3.5-turbo"));
    }

    #[test]
    fn surface_follows_tail_when_output_overflows() {
        let mut app = create_test_app(Config::default());
        let session = app.active_session_mut().unwrap();
        session.buffer.clear();
        for n in 0..10 {
            session.buffer.append_output(&format!("line {n}\n"));
        }
        session.buffer.open_prompt();

        let screen = draw(&mut app, 20, 5);
        let rows: Vec<&str> = screen.lines().collect();
        assert_eq!(rows[1], "line 8");
        assert_eq!(rows[2], "line 9");
        assert_eq!(rows[3], ">");
    }

    #[test]
    fn scroll_offset_is_clamped_to_content() {
        let mut app = create_test_app(Config::default());
        app.active_session_mut().unwrap().viewport.scroll_by(100);
        draw(&mut app, 20, 5);
        assert_eq!(
            app.active_session().unwrap().viewport.offset_from_bottom,
            0
        );
    }

    #[test]
    fn notice_is_drawn_over_surface() {
        let mut app = create_test_app(Config::default());
        app.show_notice("Error", "Something failed");
        let screen = draw(&mut app, 70, 12);
        assert!(screen.contains("Something failed"));
        assert!(screen.contains("Press Enter to continue"));
    }

    #[test]
    fn help_lists_slash_commands() {
        let mut app = create_test_app(Config::default());
        app.mode = UiMode::Help;
        let screen = draw(&mut app, 80, 40);
        assert!(screen.contains("/image <prompt>"));
        assert!(screen.contains("Generate an image from a text prompt."));
        assert!(screen.contains("This help"));
    }
}
