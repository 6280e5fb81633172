//! Progress reporting while several recordings are processed

use indicatif::{ProgressBar, ProgressStyle};

/// Bar over the input files, or `None` for a single file.
pub fn create_file_progress(total_files: usize) -> Option<ProgressBar> {
    if total_files < 2 {
        return None;
    }

    let pb = ProgressBar::new(total_files as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} recordings {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░ "),
    );
    Some(pb)
}

/// Run terminal output with the bar hidden.
pub fn suspend<F: FnOnce()>(pb: Option<&ProgressBar>, f: F) {
    match pb {
        Some(pb) => pb.suspend(f),
        None => f(),
    }
}

pub fn inc_progress(pb: Option<&ProgressBar>) {
    if let Some(pb) = pb {
        pb.inc(1);
    }
}

pub fn finish_progress(pb: Option<ProgressBar>, message: &str) {
    if let Some(pb) = pb {
        pb.finish_with_message(message.to_string());
    }
}
