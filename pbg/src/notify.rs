use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Failure,
    Warning,
    Info,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Success => "success",
            Level::Failure => "failure",
            Level::Warning => "warning",
            Level::Info => "info",
        })
    }
}

/// Where user-facing messages go. Stateless pass-through: no queueing, no dedup.
pub trait Notify {
    fn notify(&mut self, level: Level, msg: &str);

    fn success(&mut self, msg: &str) {
        self.notify(Level::Success, msg);
    }

    fn failure(&mut self, msg: &str) {
        self.notify(Level::Failure, msg);
    }

    fn warning(&mut self, msg: &str) {
        self.notify(Level::Warning, msg);
    }

    fn info(&mut self, msg: &str) {
        self.notify(Level::Info, msg);
    }
}

pub const END_OF_RESULTS: &str = "You've reached the end of search results";

pub fn found(total: u64) -> String {
    format!("Hooray! We found {total} images.")
}

/// Prints to the terminal, colored by level.
#[derive(Debug, Default)]
pub struct Terminal {
    pub color: bool,
}

impl Terminal {
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl Notify for Terminal {
    fn notify(&mut self, level: Level, msg: &str) {
        debug!("notify {}: {}", level, msg);
        if self.color {
            let code = match level {
                Level::Success => 32,
                Level::Failure => 31,
                Level::Warning => 33,
                Level::Info => 36,
            };
            println!("\x1b[{code}m[{level}]\x1b[0m {msg}");
        } else {
            println!("[{level}] {msg}");
        }
    }
}

/// Keeps every message; used to observe the controller.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct Recorder {
    pub messages: Vec<(Level, String)>,
}

#[cfg(test)]
impl Recorder {
    pub fn count(&self, level: Level, msg: &str) -> usize {
        self.messages
            .iter()
            .filter(|(l, m)| *l == level && m == msg)
            .count()
    }

    pub fn last(&self) -> Option<&(Level, String)> {
        self.messages.last()
    }
}

#[cfg(test)]
impl Notify for Recorder {
    fn notify(&mut self, level: Level, msg: &str) {
        self.messages.push((level, msg.to_owned()));
    }
}
