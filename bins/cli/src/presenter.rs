//! Terminal presenter: notices as prompts, progress as a bar.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use schoolbook_core::attachment::{Notice, NoticeAction, Presenter, TransferProgress};
use tracing::warn;

/// Shows notices with `dialoguer` and transfer progress with `indicatif`.
#[derive(Default)]
pub struct TerminalPresenter {
    bar: Mutex<Option<ProgressBar>>,
}

impl TerminalPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    fn finish_progress(&self) {
        if let Ok(mut bar) = self.bar.lock() {
            if let Some(bar) = bar.take() {
                bar.finish_and_clear();
            }
        }
    }
}

fn new_bar(total: Option<u64>) -> ProgressBar {
    match total {
        Some(total) => {
            let bar = ProgressBar::new(total);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            {
                bar.set_style(style.progress_chars("#>-"));
            }
            bar
        }
        None => {
            let bar = ProgressBar::new_spinner();
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        }
    }
}

/// Render a notice and read the user's choice.
///
/// Single-action notices are printed without a prompt. `None` means the
/// prompt could not be shown or was dismissed.
fn prompt(notice: &Notice) -> Option<NoticeAction> {
    println!("\n{}", style(&notice.title).bold());
    println!("{}", notice.message);

    if let [only] = notice.actions.as_slice() {
        return Some(*only);
    }

    let labels: Vec<&str> = notice.actions.iter().map(NoticeAction::label).collect();
    match dialoguer::Select::new()
        .items(&labels)
        .default(0)
        .interact_opt()
    {
        Ok(choice) => choice.and_then(|index| notice.actions.get(index).copied()),
        Err(e) => {
            warn!(error = %e, "Prompt unavailable, using the first action");
            None
        }
    }
}

#[async_trait]
impl Presenter for TerminalPresenter {
    async fn confirm(&self, notice: Notice) -> NoticeAction {
        self.finish_progress();
        let fallback = notice
            .actions
            .first()
            .copied()
            .unwrap_or(NoticeAction::Acknowledge);

        tokio::task::spawn_blocking(move || prompt(&notice))
            .await
            .ok()
            .flatten()
            .unwrap_or(fallback)
    }

    async fn notify(&self, message: &str) {
        self.finish_progress();
        println!("{} {message}", style("✔").green());
    }

    fn progress(&self, progress: TransferProgress) {
        let Ok(mut slot) = self.bar.lock() else {
            return;
        };
        let bar = slot.get_or_insert_with(|| new_bar(progress.total));
        bar.set_position(progress.received);
    }
}
