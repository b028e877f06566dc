use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search(String),
    /// Scroll by a number of card rows; negative scrolls up.
    Scroll(f64),
    End,
    Open(usize),
    Next,
    Prev,
    Close,
    Save(Option<PathBuf>),
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
<text>        search for images
/scroll [n]   scroll by n rows (default 1, negative scrolls up)
/end          scroll to the bottom of the gallery
/open <i>     view image i full size
/next /prev   step through images in the viewer
/close        close the viewer
/save [path]  write the gallery page to disk
/status       show the current search
/help         this text
/quit         save and exit";

impl Command {
    /// Parses one line of input. Anything not starting with `/` is a query,
    /// empty ones included.
    pub fn parse(line: &str) -> Result<Self, String> {
        let Some(rest) = line.trim_start().strip_prefix('/') else {
            return Ok(Command::Search(line.to_owned()));
        };
        let mut words = rest.split_whitespace();
        let name = words.next().unwrap_or("");
        let arg = words.next();
        let cmd = match (name, arg) {
            ("scroll" | "s", None) => Command::Scroll(1.),
            ("scroll" | "s", Some(n)) => match n.parse::<f64>() {
                Ok(rows) if rows.is_finite() => Command::Scroll(rows),
                _ => return Err(format!("not a number: {n}")),
            },
            ("end", None) => Command::End,
            ("open" | "o", Some(i)) => {
                Command::Open(i.parse().map_err(|_| format!("not an index: {i}"))?)
            }
            ("next" | "n", None) => Command::Next,
            ("prev" | "p", None) => Command::Prev,
            ("close", None) => Command::Close,
            ("save", path) => Command::Save(path.map(PathBuf::from)),
            ("status", None) => Command::Status,
            ("help" | "h" | "?", None) => Command::Help,
            ("quit" | "q" | "exit", None) => Command::Quit,
            _ => return Err(format!("unknown command: /{rest}")),
        };
        if words.next().is_some() {
            return Err(format!("too many arguments: /{rest}"));
        }
        Ok(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_search() {
        assert_eq!(Command::parse("cats"), Ok(Command::Search("cats".into())));
        assert_eq!(Command::parse(""), Ok(Command::Search("".into())));
        assert_eq!(
            Command::parse("<b>red</b> roses"),
            Ok(Command::Search("<b>red</b> roses".into()))
        );
    }

    #[test]
    fn commands() {
        assert_eq!(Command::parse("/scroll"), Ok(Command::Scroll(1.)));
        assert_eq!(Command::parse("/s -2.5"), Ok(Command::Scroll(-2.5)));
        assert_eq!(Command::parse(" /end"), Ok(Command::End));
        assert_eq!(Command::parse("/open 3"), Ok(Command::Open(3)));
        assert_eq!(Command::parse("/save"), Ok(Command::Save(None)));
        assert_eq!(
            Command::parse("/save out.html"),
            Ok(Command::Save(Some("out.html".into())))
        );
        assert_eq!(Command::parse("/q"), Ok(Command::Quit));
    }

    #[test]
    fn bad_commands() {
        assert!(Command::parse("/open").is_err());
        assert!(Command::parse("/open x").is_err());
        assert!(Command::parse("/scroll 1 2").is_err());
        assert!(Command::parse("/dance").is_err());
    }

    #[test]
    fn scroll_rows_must_be_finite() {
        for n in ["NaN", "nan", "inf", "-inf", "infinity"] {
            assert!(Command::parse(&format!("/scroll {n}")).is_err(), "{n}");
        }
        assert_eq!(Command::parse("/s 1e3"), Ok(Command::Scroll(1000.)));
    }
}
