use super::layout;
use super::state::{App, Phase, Tab};
use super::theme::{BLUE, BRIGHT_WHITE, DIM, PINK, SEL_BG};
use crate::render;
use crate::response::Package;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, app: &App) {
    let chunks = layout::main_layout(f.area());

    let title = format!("sysadmin {}", app.invocation.display());
    layout::render_header(f, &title, status_span(app), chunks[0]);

    match app.phase {
        Phase::Loading => render_loading(f, app, chunks[1]),
        Phase::Failed => render_failed(f, app, chunks[1]),
        Phase::Ready => render_ready(f, app, chunks[1]),
    }

    let hints = match app.phase {
        Phase::Loading => "q 退出",
        Phase::Failed => "r 重试  q 退出",
        Phase::Ready => "Tab 切换页签  ↑↓ 选择  PgUp/PgDn 翻页  r 重新加载  q 退出",
    };
    layout::render_footer(f, hints, chunks[2]);
}

fn status_span(app: &App) -> Span<'static> {
    match (&app.phase, &app.loaded) {
        (Phase::Ready, Some(loaded)) => {
            let color = if loaded.exit.succeeded() { Color::Green } else { Color::Red };
            Span::styled(
                format!(
                    "{} · 退出码 {} · {}",
                    loaded.exit.real_command(),
                    loaded.exit.exit_code(),
                    loaded.loaded_at.format("%H:%M:%S")
                ),
                Style::default().fg(color),
            )
        }
        (Phase::Failed, _) => Span::styled("失败", Style::default().fg(Color::Red)),
        _ => Span::styled("加载中...", Style::default().fg(Color::Yellow)),
    }
}

fn render_loading(f: &mut Frame, app: &App, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(format!("正在执行 {} {} ...", app.source, app.invocation.display())),
    ];
    layout::render_message(f, "加载中", lines, Color::Yellow, area);
}

fn render_failed(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            app.error_message.clone().unwrap_or_else(|| "无法解析 sysadmin 的响应".to_string()),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
    ];
    if let Some(detail) = &app.error_detail {
        lines.push(Line::from(""));
        for line in detail.lines() {
            lines.push(Line::from(Span::styled(line.to_string(), Style::default().fg(DIM))));
        }
    }
    layout::render_message(f, "错误", lines, Color::Red, area);
}

fn render_ready(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let titles: Vec<Line> = Tab::ALL.iter().map(|tab| Line::from(tab_title(app, *tab))).collect();
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .style(Style::default().fg(DIM))
        .highlight_style(Style::default().fg(BRIGHT_WHITE).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, rows[0]);

    match app.tab {
        Tab::Output => {
            layout::render_scrollable_content(f, "输出", &app.output_lines(), app.scroll, rows[1]);
        }
        Tab::Packages | Tab::Uninstalled => render_packages(f, app, rows[1]),
    }
}

fn tab_title(app: &App, tab: Tab) -> String {
    let response = app.loaded.as_ref().and_then(|l| l.exit.packages_response());
    match (tab, response) {
        (Tab::Packages, Some(r)) => format!("{} ({})", tab.title(), r.packages().len()),
        (Tab::Uninstalled, Some(r)) => {
            format!("{} ({})", tab.title(), r.uninstalled_packages().len())
        }
        _ => tab.title().to_string(),
    }
}

fn render_packages(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let packages = app.current_packages();
    let response = app.loaded.as_ref().and_then(|l| l.exit.packages_response());
    let summary = match (app.tab, response) {
        (Tab::Packages, Some(r)) => render::packages_summary(r),
        (Tab::Uninstalled, Some(r)) => render::uninstalled_summary(r),
        _ => "无结果".to_string(),
    };

    let items: Vec<ListItem> = packages.iter().map(package_item).collect();
    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(" {} ", summary))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .highlight_style(Style::default().bg(SEL_BG).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    if !packages.is_empty() {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(list, columns[0], &mut state);

    let detail: Vec<Line> = match app.selected_package() {
        Some(package) => render::package_detail_lines(package)
            .into_iter()
            .map(Line::from)
            .collect(),
        None => vec![Line::from(Span::styled("没有软件包", Style::default().fg(DIM)))],
    };
    let detail = Paragraph::new(detail)
        .block(
            Block::default()
                .title(" 详情 ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(detail, columns[1]);
}

fn package_item(package: &Package) -> ListItem<'static> {
    let mut spans = vec![
        Span::styled(package.name().to_string(), Style::default().fg(BRIGHT_WHITE)),
        Span::styled(format!(".{}", package.arch()), Style::default().fg(DIM)),
    ];
    match (package.old_version(), package.version()) {
        (Some(old), new) => spans.push(Span::styled(
            format!("  {} -> {}", old, new.unwrap_or("?")),
            Style::default().fg(BLUE),
        )),
        (None, Some(version)) => spans.push(Span::raw(format!("  {version}"))),
        (None, None) => {}
    }
    if package.installed() == Some(true) {
        spans.push(Span::styled("  ●", Style::default().fg(PINK)));
    }
    ListItem::new(Line::from(spans))
}
