use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar over the regions of one aggregation run
pub struct ProgressTracker {
    bar: ProgressBar,
}

impl ProgressTracker {
    /// Visible bar when `show` is set, otherwise one that draws nothing
    pub fn for_regions(total: usize, show: bool) -> Self {
        if !show {
            return ProgressTracker { bar: ProgressBar::hidden() };
        }

        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} regions ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);

        ProgressTracker { bar }
    }

    /// Mark the start of a region
    pub fn start_region(&self, id: &str) {
        self.bar.set_message(id.to_string());
    }

    pub fn region_done(&self) {
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("all regions sampled");
    }
}
