//! Line commands accepted on stdin.

use std::str::FromStr;

/// Tab reference: 1-based position from `list`, or a tab id prefix.
pub type TabRef = String;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New(Option<String>),
    Close(TabRef),
    Switch(TabRef),
    List,
    Acquire(TabRef),
    Release(TabRef),
    Screen(bool),
    Back,
    Load(TabRef, String),
    Bookmark(TabRef),
    Bookmarks,
    Log,
    ClearLog,
    Help,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),
}

pub const HELP: &str = "\
commands:
  new [url]            open a tab (home page by default)
  close <tab>          close a tab
  switch <tab>         make a tab current
  list                 show tabs
  acquire <tab>        report page activity start
  release <tab>        report page activity end
  screen off|on        simulate the display turning off or on
  back                 press the back button
  load <tab> <url>     navigate a tab
  bookmark <tab>       bookmark a tab's page
  bookmarks            list bookmarks
  log                  print the keep-alive log
  clear-log            delete the keep-alive log
  quit                 save and exit
<tab> is a position from `list` or a tab id prefix";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(CommandError::Usage("help"));
        };
        let arg = words.next().map(str::to_string);
        let extra = words.next().map(str::to_string);

        let tab = |usage| arg.clone().ok_or(CommandError::Usage(usage));
        let command = match verb.to_ascii_lowercase().as_str() {
            "new" => Command::New(arg.clone()),
            "close" => Command::Close(tab("close <tab>")?),
            "switch" => Command::Switch(tab("switch <tab>")?),
            "list" | "ls" => Command::List,
            "acquire" => Command::Acquire(tab("acquire <tab>")?),
            "release" => Command::Release(tab("release <tab>")?),
            "screen" => match arg.as_deref() {
                Some("off") => Command::Screen(false),
                Some("on") => Command::Screen(true),
                _ => return Err(CommandError::Usage("screen off|on")),
            },
            "back" => Command::Back,
            "load" => match (arg.clone(), extra) {
                (Some(tab), Some(url)) => Command::Load(tab, url),
                _ => return Err(CommandError::Usage("load <tab> <url>")),
            },
            "bookmark" => Command::Bookmark(tab("bookmark <tab>")?),
            "bookmarks" => Command::Bookmarks,
            "log" => Command::Log,
            "clear-log" => Command::ClearLog,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}
