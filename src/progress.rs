//! Progress bar display for bundling runs

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display over the role directories of a bundling run
pub struct ProgressDisplay {
    dir_pb: ProgressBar,
}

impl ProgressDisplay {
    /// Create a new progress display sized to the number of scheduled directories
    pub fn new(total_dirs: u64) -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let dir_pb = ProgressBar::new(total_dirs);
        dir_pb.set_style(style);

        Self { dir_pb }
    }

    /// Show the directory currently being copied
    pub fn start_dir(&self, dir: &str) {
        // long absolute paths crowd the bar, keep the tail
        let msg = if dir.len() > 50 {
            format!("...{}", &dir[dir.len() - 47..])
        } else {
            dir.to_string()
        };
        self.dir_pb.set_message(msg);
    }

    /// Mark one directory as done
    pub fn inc(&self) {
        self.dir_pb.inc(1);
    }

    /// Finish the bar after a successful run
    pub fn finish(&self) {
        self.dir_pb.finish_with_message("done");
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.dir_pb.abandon();
    }
}
