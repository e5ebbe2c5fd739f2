use indicatif::{ProgressBar, ProgressStyle};

/// Task progress on stderr. Hidden unless running verbose.
pub fn progress_bar(len: usize, verbose: bool) -> ProgressBar {
    if !verbose {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        bar.set_style(style);
    }
    bar
}
