//! Interactive shell for Region Chat.
//!
//! Usage: `region-chat [IMAGE]`. The optional image is uploaded before the
//! first prompt.

#[cfg(not(target_arch = "wasm32"))]
mod repl {
    use std::borrow::Cow::{self, Borrowed, Owned};
    use std::path::Path;

    use colored::Colorize;
    use rustyline::completion::{Completer, Pair};
    use rustyline::error::ReadlineError;
    use rustyline::highlight::Highlighter;
    use rustyline::hint::Hinter;
    use rustyline::validate::Validator;
    use rustyline::{Context, Editor, Helper};

    use region_chat::chart::format_value;
    use region_chat::config::AppConfig;
    use region_chat::constants::NO_IMAGE_MESSAGE;
    use region_chat::model::{ChatMessage, Role};
    use region_chat::shell::{COMMANDS, ShellCommand, selection_lines};
    use region_chat::{Action, SessionController, SessionState, StateChange, Transition};

    // ============================================================================
    // Line editor helper
    // ============================================================================

    /// Completion, hints and highlighting for slash commands.
    struct ShellHelper;

    impl Helper for ShellHelper {}

    impl Completer for ShellHelper {
        type Candidate = Pair;

        fn complete(
            &self,
            line: &str,
            pos: usize,
            _ctx: &Context<'_>,
        ) -> rustyline::Result<(usize, Vec<Pair>)> {
            let line = &line[..pos];
            if !line.starts_with('/') || line.contains(' ') {
                return Ok((0, Vec::new()));
            }
            let candidates = COMMANDS
                .iter()
                .filter(|(name, _)| name.starts_with(line))
                .map(|(name, _)| Pair {
                    display: name.to_string(),
                    replacement: name.to_string(),
                })
                .collect();
            Ok((0, candidates))
        }
    }

    impl Highlighter for ShellHelper {
        fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
            if line.starts_with('/') {
                Owned(line.bright_cyan().to_string())
            } else {
                Borrowed(line)
            }
        }

        fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
            true
        }
    }

    impl Hinter for ShellHelper {
        type Hint = String;

        fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
            let line = &line[..pos];
            if !line.starts_with('/') || line.contains(' ') {
                return None;
            }
            COMMANDS
                .iter()
                .map(|(name, _)| *name)
                .find(|name| name.starts_with(line) && name.len() > line.len())
                .map(|name| name[line.len()..].to_string())
        }
    }

    impl Validator for ShellHelper {}

    // ============================================================================
    // Output
    // ============================================================================

    fn print_message(message: &ChatMessage) {
        match message.role {
            Role::System => println!("{}", message.text.bright_black()),
            Role::User => println!("{}", format!("> {}", message.text).green()),
            Role::Assistant => {
                for line in message.text.lines() {
                    println!("{}", line.bright_blue());
                }
            }
        }
    }

    fn print_error(message: impl std::fmt::Display) {
        eprintln!("{}", format!("Error: {}", message).red());
    }

    /// Print whatever a transition changed that the user should see.
    fn report(transition: &Transition, transcript_before: usize) {
        let state = &transition.state;

        if transition.changed(StateChange::Transcript) {
            let messages = state.chat.messages();
            // A reset transcript is printed from the top
            let start = if messages.len() > transcript_before {
                transcript_before
            } else {
                0
            };
            // The user's own line is already on screen
            messages[start..]
                .iter()
                .filter(|m| m.role != Role::User)
                .for_each(print_message);
        }

        if transition.changed(StateChange::Chart) {
            if let Some(data) = state.chart.data() {
                let max = data.max_value().max(1.0);
                for entry in data.entries() {
                    let bar = "█".repeat(((entry.value / max) * 30.0).round() as usize);
                    println!(
                        "  {:>8} {} {}",
                        entry.category,
                        bar.bright_cyan(),
                        format_value(entry.value)
                    );
                }
                println!("{}", "Chart updated. Use /chart <path> to render it.".bright_black());
            }
        }

        if transition.changed(StateChange::Annotation) && state.images.annotated().is_some() {
            println!(
                "{}",
                "Annotated image updated. Use /save <path> to write it.".bright_black()
            );
        }

        if transition.changed(StateChange::Zoom) {
            let zoom = state.zoom;
            match state.images.dimensions() {
                Some((w, h)) => println!(
                    "{}",
                    format!(
                        "Zoom {:.2}x ({}x{} on screen)",
                        zoom.factor(),
                        zoom.scale(w),
                        zoom.scale(h)
                    )
                    .bright_black()
                ),
                None => println!("{}", format!("Zoom {:.2}x", zoom.factor()).bright_black()),
            }
        }
    }

    fn print_help() {
        println!("{}", "Commands:".bright_magenta());
        for (_, help) in COMMANDS {
            println!("  {}", help);
        }
        println!("  {}", "anything else is a question about the image".bright_black());
    }

    // ============================================================================
    // Shell
    // ============================================================================

    struct Shell {
        controller: SessionController,
        config: AppConfig,
        state: SessionState,
    }

    impl Shell {
        fn apply(&mut self, action: Action) {
            let before = self.state.chat.len();
            let state = std::mem::take(&mut self.state);
            let transition = self.controller.update(state, action);
            report(&transition, before);
            self.state = transition.state;
        }

        fn upload(&mut self, path: &Path) {
            match std::fs::read(path) {
                Ok(bytes) => {
                    log::debug!("📂 Read {} bytes from {:?}", bytes.len(), path);
                    self.apply(Action::UploadBytes(bytes));
                }
                Err(e) => print_error(format!("{}: {}", path.display(), e)),
            }
        }

        fn save_image(&self, path: &Path) {
            let Some(image) = self.state.display_image() else {
                println!("{}", NO_IMAGE_MESSAGE.bright_black());
                return;
            };
            match image.save(path) {
                Ok(()) => println!("{}", format!("Saved {}", path.display()).green()),
                Err(e) => print_error(e),
            }
        }

        fn save_chart(&self, path: &Path) {
            let font = self.controller.annotator().font();
            let Some(chart) = self.state.chart.render(&self.config.chart, font) else {
                println!("{}", "No chart yet. Select a region and ask to analyze it.".bright_black());
                return;
            };
            match chart.save(path) {
                Ok(()) => println!("{}", format!("Saved {}", path.display()).green()),
                Err(e) => print_error(e),
            }
        }

        fn export(&self, path: &Path) {
            let result = self
                .state
                .summary()
                .to_json()
                .map_err(|e| e.to_string())
                .and_then(|json| std::fs::write(path, json).map_err(|e| e.to_string()));
            match result {
                Ok(()) => println!("{}", format!("Exported {}", path.display()).green()),
                Err(e) => print_error(e),
            }
        }

        /// Handle one line. Returns false to leave the shell.
        fn handle(&mut self, line: &str) -> bool {
            let command = match ShellCommand::parse(line) {
                Ok(command) => command,
                Err(e) => {
                    print_error(e);
                    return true;
                }
            };

            match command {
                ShellCommand::Quit => return false,
                ShellCommand::Help => print_help(),
                ShellCommand::Upload(path) => self.upload(&path),
                ShellCommand::Save(path) => self.save_image(&path),
                ShellCommand::Chart(path) => self.save_chart(&path),
                ShellCommand::Export(path) => self.export(&path),
                ShellCommand::Selections => {
                    let lines = selection_lines(self.state.selections.history());
                    if lines.is_empty() {
                        println!("{}", "No selections yet.".bright_black());
                    }
                    for line in lines {
                        println!("  {}", line);
                    }
                }
                other => {
                    if let Some(action) = other.action() {
                        self.apply(action);
                    }
                }
            }
            true
        }
    }

    // ============================================================================
    // Startup
    // ============================================================================

    /// Load the config file, writing defaults on first run.
    fn load_config() -> AppConfig {
        if let Some(config) = AppConfig::load_from_default_path() {
            return config;
        }
        let config = AppConfig::default();
        let missing = AppConfig::default_path().is_some_and(|path| !path.exists());
        if missing {
            if let Err(e) = config.save_to_default_path() {
                log::warn!("Could not write default config: {}", e);
            }
        }
        config
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let config = load_config();
        env_logger::Builder::new()
            .filter_level(config.preferences.log_level.to_level_filter())
            .parse_default_env()
            .init();
        log::info!("⚙️ Backend: {:?}", config.backend.kind);

        let controller = SessionController::from_config(&config)?;
        let mut shell = Shell {
            controller,
            config,
            state: SessionState::new(),
        };

        println!("{}", "=== Region Chat ===".bright_magenta().bold());
        println!(
            "{}",
            format!("Engine: {}. Type /help for commands.", shell.controller.engine_name())
                .bright_black()
        );
        shell.state.chat.messages().iter().for_each(print_message);

        if let Some(path) = std::env::args_os().nth(1) {
            shell.upload(Path::new(&path));
        }

        let mut rl = Editor::new()?;
        rl.set_helper(Some(ShellHelper));

        loop {
            match rl.readline(">> ") {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    if let Err(e) = rl.add_history_entry(trimmed) {
                        log::debug!("History entry not saved: {}", e);
                    }
                    if !shell.handle(trimmed) {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "CTRL-C detected. Type /quit to exit.".yellow());
                }
                Err(ReadlineError::Eof) => {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }
}

/// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = repl::run() {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}

// The shell needs a terminal; there is nothing to run on wasm
#[cfg(target_arch = "wasm32")]
fn main() {}
