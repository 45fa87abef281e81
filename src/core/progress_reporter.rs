use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{sleep, spawn, JoinHandle};
use std::time::{Duration, Instant};
use terminal_size::{terminal_size, Width};

/// Prints a terminal progress bar from a background thread while render
/// workers count completed rows through `update`.
pub struct ProgressReporter {
    total_work: u64,
    work_done: Arc<AtomicU64>,
    exit_thread: Arc<AtomicBool>,
    update_thread: Option<JoinHandle<()>>,
    start_time: Instant,
}

impl ProgressReporter {
    pub fn new(total_work: u64, title: &'static str, quiet: bool) -> ProgressReporter {
        let mut reporter = ProgressReporter {
            total_work,
            work_done: Arc::new(AtomicU64::new(0)),
            exit_thread: Arc::new(AtomicBool::new(false)),
            update_thread: None,
            start_time: Instant::now(),
        };
        if quiet || total_work == 0 {
            return reporter;
        }

        let width = match terminal_size() {
            Some((Width(w), _)) => w as usize,
            None => {
                debug!("no terminal attached, progress bar disabled");
                return reporter;
            }
        };

        let work_done = reporter.work_done.clone();
        let exit_thread = reporter.exit_thread.clone();
        let start_time = reporter.start_time;
        reporter.update_thread = Some(spawn(move || {
            let bar_length = width.saturating_sub(title.len() + 28).max(2);
            loop {
                let done = work_done.load(Ordering::SeqCst);
                let fraction = (done as f64 / total_work as f64).min(1.0);
                let filled = ((bar_length as f64 * fraction).round() as usize).min(bar_length);
                let elapsed = start_time.elapsed().as_secs_f64();

                let mut line = format!(
                    "\r{}: [{}{}] {:3.0}%",
                    title,
                    "+".repeat(filled),
                    " ".repeat(bar_length - filled),
                    fraction * 100.0
                );
                if fraction > 0.0 && fraction < 1.0 {
                    let remaining = elapsed / fraction - elapsed;
                    line.push_str(&format!(" ({:.1}s|{:.1}s)  ", elapsed, remaining.max(0.0)));
                } else {
                    line.push_str(&format!(" ({:.1}s)  ", elapsed));
                }
                print!("{}", line);
                let _ = std::io::stdout().flush();

                if exit_thread.load(Ordering::SeqCst) || done >= total_work {
                    println!();
                    break;
                }
                sleep(Duration::from_millis(250));
            }
        }));
        reporter
    }

    /// Record finished units of work. Safe to call from any worker.
    pub fn update(&self, num: u64) {
        self.work_done.fetch_add(num, Ordering::SeqCst);
    }

    pub fn done(&mut self) {
        self.work_done.store(self.total_work, Ordering::SeqCst);
        self.finish();
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    fn finish(&mut self) {
        self.exit_thread.store(true, Ordering::SeqCst);
        if let Some(handle) = self.update_thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        self.finish();
    }
}
