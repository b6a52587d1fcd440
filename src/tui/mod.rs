mod layout;
pub mod state;
mod theme;
mod view;

use crate::loader::{self, LoadError};
use crate::runner::{Invocation, ProcessRunner};
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use state::{App, AppEvent, KeyAction, Tab};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

pub async fn run(
    runner: Arc<dyn ProcessRunner>,
    invocation: Invocation,
    save_path: Option<PathBuf>,
) -> Result<()> {
    // 终端初始化
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(invocation, runner.describe());
    let (tx, mut rx) = mpsc::channel(8);

    spawn_load(&runner, &app.invocation, &tx);

    // 主循环
    loop {
        let term_size = terminal.size()?;
        let visible = layout::visible_content_height(term_size.height);
        if app.tab == Tab::Output {
            let total = app.output_lines().len();
            app.clamp_scroll(total, visible);
        }

        terminal.draw(|f| view::render(f, &app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                match app.on_key(key, visible.max(1)) {
                    KeyAction::Quit => break,
                    KeyAction::Reload => {
                        app.start_loading();
                        spawn_load(&runner, &app.invocation, &tx);
                    }
                    KeyAction::None => {}
                }
            }
        }

        // 处理异步事件
        while let Ok(event) = rx.try_recv() {
            if let (AppEvent::Loaded(loaded), Some(path)) = (&event, &save_path) {
                match loaded.save_raw(path) {
                    Ok(()) => log::info!("已保存原始响应到 {}", path.display()),
                    Err(e) => log::warn!("保存原始响应失败: {}", e),
                }
            }
            app.apply(event);
        }
    }

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

/// 在阻塞线程池中调用 sysadmin，结果通过 channel 送回主循环
fn spawn_load(
    runner: &Arc<dyn ProcessRunner>,
    invocation: &Invocation,
    tx: &mpsc::Sender<AppEvent>,
) {
    let runner = Arc::clone(runner);
    let invocation = invocation.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let result =
            tokio::task::spawn_blocking(move || loader::load(runner.as_ref(), &invocation)).await;
        let event = match result {
            Ok(Ok(loaded)) => AppEvent::Loaded(Box::new(loaded)),
            Ok(Err(e)) => failed_event(&e),
            Err(e) => AppEvent::Failed {
                message: format!("加载任务异常退出: {}", e),
                stderr: None,
            },
        };
        let _ = tx.send(event).await;
    });
}

fn failed_event(error: &LoadError) -> AppEvent {
    AppEvent::Failed {
        message: error.to_string(),
        stderr: error.stderr().map(str::to_string),
    }
}
