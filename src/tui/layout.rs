use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
    Frame,
};

/// 标准三段式布局：Header(3) + Content(弹性) + Footer(3)
pub fn main_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area)
        .to_vec()
}

/// 渲染 header：左侧标题，右侧状态
pub fn render_header(f: &mut Frame, title: &str, status: Span, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("{title}  "),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        status,
    ]))
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Center);
    f.render_widget(header, area);
}

/// 渲染按键提示 footer
pub fn render_footer(f: &mut Frame, text: &str, area: Rect) {
    let footer = Paragraph::new(format!(" {}", text))
        .style(Style::default().fg(Color::Green))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);
    f.render_widget(footer, area);
}

/// 居中显示的提示信息（加载中 / 失败）
pub fn render_message(f: &mut Frame, title: &str, lines: Vec<Line>, color: Color, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

/// 渲染带滚动条的内容区域
pub fn render_scrollable_content(
    f: &mut Frame,
    title: &str,
    lines: &[String],
    scroll_offset: usize,
    area: Rect,
) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let padded = inner.inner(Margin {
        horizontal: 1,
        vertical: 0,
    });

    let visible_height = padded.height as usize;
    let actual_scroll = scroll_offset.min(lines.len().saturating_sub(visible_height));

    let visible: Vec<Line> = lines
        .iter()
        .skip(actual_scroll)
        .take(visible_height)
        .map(|line| Line::from(line.as_str()))
        .collect();
    f.render_widget(Paragraph::new(visible), padded);

    if lines.len() > visible_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        let mut scrollbar_state = ScrollbarState::new(lines.len()).position(actual_scroll);
        f.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                horizontal: 0,
                vertical: 1,
            }),
            &mut scrollbar_state,
        );
    }
}

/// 估算内容区域可见行数（总高度减去 header/footer/页签/边框）
pub fn visible_content_height(term_height: u16) -> usize {
    term_height.saturating_sub(9) as usize
}
