use std::io::{self, BufRead, Write};

use tracing::debug;

use famenu_core::bridge::{HapticKind, HostBridge, PopupChoice, ThemePalette};

/// Host bridge for a terminal session. Buttons print to stdout, confirm
/// prompts read a y/n answer from stdin; haptics have nowhere to go.
pub struct TerminalBridge {
    assume_yes: bool,
}

impl TerminalBridge {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl HostBridge for TerminalBridge {
    fn ready(&mut self) {
        debug!("terminal ready");
    }

    fn expand(&mut self) {}

    fn close(&mut self) {}

    fn show_main_button(&mut self, label: &str) {
        println!("[ {label} ]");
    }

    fn hide_main_button(&mut self) {}

    fn update_main_button(&mut self, label: &str, enabled: bool) {
        if !enabled {
            println!("  ({label}: nothing to do)");
        }
    }

    fn show_back_button(&mut self) {}

    fn hide_back_button(&mut self) {}

    fn haptic(&mut self, kind: HapticKind) {
        debug!(?kind, "haptic");
    }

    fn theme(&self) -> ThemePalette {
        ThemePalette::default()
    }

    fn confirm(&mut self, title: Option<&str>, message: &str) -> PopupChoice {
        if self.assume_yes {
            return PopupChoice::Ok;
        }
        if let Some(title) = title {
            eprintln!("{title}");
        }
        eprint!("{message} [y/N] ");
        let _ = io::stderr().flush();
        let answer = io::stdin().lock().lines().next();
        match answer {
            Some(Ok(line)) => parse_answer(&line),
            _ => PopupChoice::Cancel,
        }
    }
}

fn parse_answer(line: &str) -> PopupChoice {
    match line.trim().to_lowercase().as_str() {
        "y" | "yes" | "д" | "да" => PopupChoice::Ok,
        _ => PopupChoice::Cancel,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("y"), PopupChoice::Ok);
        assert_eq!(parse_answer(" YES \n"), PopupChoice::Ok);
        assert_eq!(parse_answer("да"), PopupChoice::Ok);
        assert_eq!(parse_answer(""), PopupChoice::Cancel);
        assert_eq!(parse_answer("nope"), PopupChoice::Cancel);
    }

    #[test]
    fn test_assume_yes_skips_prompt() {
        let mut bridge = TerminalBridge::new(true);
        assert_eq!(bridge.confirm(None, "Reset?"), PopupChoice::Ok);
    }
}
