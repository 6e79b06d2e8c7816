//! Command dispatch.

use std::collections::BTreeMap;
use std::fmt::Display;

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::history::{DEFAULT_LIMIT, History};
use crate::vfs::{HOME, Vfs, VfsError, display_path, resolve_path};

const COMMANDS: &[(&str, &str)] = &[
    ("help", "show this list"),
    ("ls", "list directory contents"),
    ("cd", "change directory"),
    ("pwd", "print working directory"),
    ("cat", "print a file"),
    ("echo", "print arguments"),
    ("whoami", "print the current user"),
    ("date", "print the current date and time"),
    ("history", "show previous commands"),
    ("clear", "clear the screen"),
    ("fortune", "print a random saying"),
    ("open", "go to a page of this site"),
];

/// Terminal settings, usually read from the `terminal` section of the site config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    pub user: String,
    pub host: String,
    pub history_limit: usize,
    /// Extra files, keyed by absolute or `~`-relative path
    pub files: BTreeMap<String, String>,
    /// Page names `open` knows, mapped to URLs
    pub pages: BTreeMap<String, String>,
    pub fortunes: Vec<String>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        let pages = [
            ("home", "/"),
            ("about", "/#about"),
            ("projects", "/#projects"),
            ("contact", "/#contact"),
            ("garden", "/garden"),
            ("graph", "/graph"),
        ];
        let fortunes = [
            "A note not linked is a note forgotten.",
            "Plant ideas densely; prune links sparingly.",
            "There are only two hard things: cache invalidation and naming things.",
            "Today is a good day to write things down.",
            "The best time to start a garden was years ago. The second best time is now.",
        ];

        Self {
            user: "guest".to_string(),
            host: "garden".to_string(),
            history_limit: DEFAULT_LIMIT,
            files: BTreeMap::new(),
            pages: pages
                .into_iter()
                .map(|(name, url)| (name.to_string(), url.to_string()))
                .collect(),
            fortunes: fortunes.into_iter().map(str::to_string).collect(),
        }
    }
}

impl ShellConfig {
    /// The default filesystem with the configured extra files added.
    pub fn build_vfs(&self) -> Result<Vfs, VfsError> {
        let mut vfs = Vfs::default();
        for (path, content) in &self.files {
            vfs.insert_file(path, content)?;
        }
        Ok(vfs)
    }
}

/// What a command produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Output {
    pub lines: Vec<String>,
    /// Clear the screen before printing
    pub clear: bool,
    /// URL the page should navigate to
    pub open: Option<String>,
}

impl Output {
    fn line(line: impl Into<String>) -> Self {
        Self {
            lines: vec![line.into()],
            ..Default::default()
        }
    }

    fn lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    fn error(command: &str, err: impl Display) -> Self {
        Self::line(format!("{}: {}", command, err))
    }
}

/// One terminal session: a working directory and history over a shared filesystem.
pub struct Shell<'a> {
    vfs: &'a Vfs,
    config: &'a ShellConfig,
    cwd: String,
    history: History,
}

impl<'a> Shell<'a> {
    pub fn new(vfs: &'a Vfs, config: &'a ShellConfig) -> Self {
        Self {
            vfs,
            config,
            cwd: HOME.to_string(),
            history: History::new(config.history_limit),
        }
    }

    /// Restore a working directory. Anything that is not a directory falls back to home.
    pub fn with_cwd(mut self, cwd: &str) -> Self {
        let abs = resolve_path(HOME, cwd);
        if self.vfs.is_dir(&abs) {
            self.cwd = abs;
        }
        self
    }

    pub fn with_history<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.history = History::from_entries(entries, self.config.history_limit);
        self
    }

    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn prompt(&self) -> String {
        format!(
            "{}@{}:{}$",
            self.config.user,
            self.config.host,
            display_path(&self.cwd)
        )
    }

    /// Run one input line. Never fails: errors come back as output lines.
    pub fn execute(&mut self, line: &str) -> Output {
        self.history.push(line);

        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Output::default();
        };
        let args: Vec<&str> = words.collect();

        match command {
            "help" => self.help(),
            "ls" => self.ls(&args),
            "cd" => self.cd(&args),
            "pwd" => Output::line(self.cwd.clone()),
            "cat" => self.cat(&args),
            "echo" => Output::line(args.join(" ")),
            "whoami" => Output::line(self.config.user.clone()),
            "date" => Output::line(
                chrono::Local::now()
                    .format("%a %b %e %H:%M:%S %Y")
                    .to_string(),
            ),
            "history" => self.show_history(),
            "clear" => Output {
                clear: true,
                ..Default::default()
            },
            "fortune" => self.fortune(),
            "open" => self.open(&args),
            "sudo" => Output::line(format!(
                "{} is not in the sudoers file. This incident will be reported.",
                self.config.user
            )),
            "exit" | "logout" => Output::line("There is no escape. Try `clear` instead."),
            "rm" => Output::line("rm: permission denied: this filesystem is read-only"),
            other => Output::line(format!("command not found: {}", other)),
        }
    }

    fn help(&self) -> Output {
        let mut lines = vec!["Available commands:".to_string()];
        lines.extend(
            COMMANDS
                .iter()
                .map(|(name, about)| format!("  {:<10}{}", name, about)),
        );
        Output::lines(lines)
    }

    fn ls(&self, args: &[&str]) -> Output {
        let operand = args.first().copied().unwrap_or(".");
        match self.vfs.list(&self.cwd, operand) {
            Ok(entries) if entries.is_empty() => Output::default(),
            Ok(entries) => Output::line(
                entries
                    .iter()
                    .map(|e| {
                        if e.is_dir {
                            format!("{}/", e.name)
                        } else {
                            e.name.clone()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("  "),
            ),
            Err(err) => Output::error("ls", err),
        }
    }

    fn cd(&mut self, args: &[&str]) -> Output {
        let operand = args.first().copied().unwrap_or("~");
        match self.vfs.directory(&self.cwd, operand) {
            Ok(abs) => {
                self.cwd = abs;
                Output::default()
            }
            Err(err) => Output::error("cd", err),
        }
    }

    fn cat(&self, args: &[&str]) -> Output {
        if args.is_empty() {
            return Output::line("cat: missing operand");
        }

        let mut out = Output::default();
        for operand in args {
            match self.vfs.read(&self.cwd, operand) {
                Ok(content) => out.lines.extend(content.lines().map(str::to_string)),
                Err(err) => out.lines.push(format!("cat: {}", err)),
            }
        }
        out
    }

    fn show_history(&self) -> Output {
        Output::lines(
            self.history
                .entries()
                .enumerate()
                .map(|(i, entry)| format!("{:>5}  {}", i + 1, entry)),
        )
    }

    fn fortune(&self) -> Output {
        match self.config.fortunes.choose(&mut rand::rng()) {
            Some(fortune) => Output::line(fortune.clone()),
            None => Output::line("fortune: no fortunes today"),
        }
    }

    fn open(&self, args: &[&str]) -> Output {
        let Some(name) = args.first() else {
            return Output::line("open: missing operand");
        };
        let key = name.to_lowercase();

        match self.config.pages.get(&key) {
            Some(url) => Output {
                lines: vec![format!("Opening {}...", key)],
                open: Some(url.clone()),
                ..Default::default()
            },
            None => {
                let known: Vec<&str> = self.config.pages.keys().map(String::as_str).collect();
                Output::line(format!(
                    "open: {}: unknown page (try: {})",
                    name,
                    known.join(", ")
                ))
            }
        }
    }
}
