use crate::loader::Loaded;
use crate::render;
use crate::response::Package;
use crate::runner::Invocation;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// ========== 枚举 ==========

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Loading,
    Ready,
    /// 解码或执行失败，不显示任何部分结果
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tab {
    Packages,
    Uninstalled,
    Output,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Packages, Tab::Uninstalled, Tab::Output];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Packages => "软件包",
            Tab::Uninstalled => "未安装",
            Tab::Output => "输出",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Packages => 0,
            Tab::Uninstalled => 1,
            Tab::Output => 2,
        }
    }

    fn next(self) -> Self {
        match self {
            Tab::Packages => Tab::Uninstalled,
            Tab::Uninstalled => Tab::Output,
            Tab::Output => Tab::Packages,
        }
    }
}

/// 按键处理后需要主循环执行的动作
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    None,
    Quit,
    Reload,
}

// ========== 事件 ==========

#[derive(Debug)]
pub enum AppEvent {
    Loaded(Box<Loaded>),
    Failed {
        message: String,
        stderr: Option<String>,
    },
}

// ========== 应用状态 ==========

pub struct App {
    pub invocation: Invocation,
    pub source: String,
    pub phase: Phase,
    pub loaded: Option<Loaded>,
    pub error_message: Option<String>,
    pub error_detail: Option<String>,
    pub tab: Tab,
    pub selected: usize,
    pub scroll: usize,
}

impl App {
    pub fn new(invocation: Invocation, source: String) -> Self {
        Self {
            invocation,
            source,
            phase: Phase::Loading,
            loaded: None,
            error_message: None,
            error_detail: None,
            tab: Tab::Packages,
            selected: 0,
            scroll: 0,
        }
    }

    pub fn start_loading(&mut self) {
        self.phase = Phase::Loading;
        self.error_message = None;
        self.error_detail = None;
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::Loaded(loaded) => {
                self.loaded = Some(*loaded);
                self.phase = Phase::Ready;
                self.error_message = None;
                self.error_detail = None;
                // 失败的调用默认停在输出页，那里有错误信息
                self.tab = match self.loaded.as_ref() {
                    Some(l) if l.exit.packages_response().is_none() => Tab::Output,
                    _ => self.tab,
                };
                self.selected = 0;
                self.scroll = 0;
            }
            AppEvent::Failed { message, stderr } => {
                self.loaded = None;
                self.phase = Phase::Failed;
                self.error_message = Some(message);
                self.error_detail = stderr;
            }
        }
    }

    /// 当前页签对应的包列表
    pub fn current_packages(&self) -> &[Package] {
        let Some(response) = self.loaded.as_ref().and_then(|l| l.exit.packages_response()) else {
            return &[];
        };
        match self.tab {
            Tab::Packages => response.packages(),
            Tab::Uninstalled => response.uninstalled_packages(),
            Tab::Output => &[],
        }
    }

    pub fn selected_package(&self) -> Option<&Package> {
        self.current_packages().get(self.selected)
    }

    pub fn output_lines(&self) -> Vec<String> {
        let Some(loaded) = &self.loaded else {
            return Vec::new();
        };
        let mut lines = render::exit_lines(&loaded.exit);
        if !loaded.stderr.is_empty() {
            lines.push(String::new());
            lines.push("── stderr ──".to_string());
            lines.extend(loaded.stderr.lines().map(|line| format!("⚠ {line}")));
        }
        lines
    }

    pub fn clamp_scroll(&mut self, total: usize, visible: usize) {
        self.scroll = self.scroll.min(total.saturating_sub(visible));
    }

    pub fn on_key(&mut self, key: KeyEvent, page: usize) -> KeyAction {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return KeyAction::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return KeyAction::Quit;
            }
            KeyCode::Char('r') if self.phase != Phase::Loading => return KeyAction::Reload,
            _ => {}
        }

        if self.phase != Phase::Ready {
            return KeyAction::None;
        }

        match key.code {
            KeyCode::Tab => {
                self.tab = self.tab.next();
                self.selected = 0;
                self.scroll = 0;
            }
            KeyCode::Up => {
                if self.tab == Tab::Output {
                    self.scroll = self.scroll.saturating_sub(1);
                } else {
                    self.selected = self.selected.saturating_sub(1);
                }
            }
            KeyCode::Down => {
                if self.tab == Tab::Output {
                    self.scroll += 1;
                } else {
                    let max = self.current_packages().len().saturating_sub(1);
                    if self.selected < max {
                        self.selected += 1;
                    }
                }
            }
            KeyCode::PageUp => {
                if self.tab == Tab::Output {
                    self.scroll = self.scroll.saturating_sub(page);
                } else {
                    self.selected = self.selected.saturating_sub(page);
                }
            }
            KeyCode::PageDown => {
                if self.tab == Tab::Output {
                    self.scroll += page;
                } else {
                    let max = self.current_packages().len().saturating_sub(1);
                    self.selected = (self.selected + page).min(max);
                }
            }
            KeyCode::Home => {
                self.selected = 0;
                self.scroll = 0;
            }
            _ => {}
        }
        KeyAction::None
    }
}
