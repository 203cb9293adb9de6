use crate::reader;
use linefeed::{DefaultTerminal, Interface, ReadResult, Terminal};
use std::path::PathBuf;

const PROMPT: &str = "sexpr> ";
const CONTINUATION: &str = "  ...> ";

pub fn setup() -> std::io::Result<Interface<DefaultTerminal>> {
    let interface = linefeed::Interface::new("sexpr")?;
    interface.set_prompt(PROMPT)?;
    if let Some(path) = history_path() {
        interface.load_history(path).ok();
    };
    Ok(interface)
}

fn history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|mut path| {
        path.push(".sexpr_history");
        path
    })
}

pub fn save_history<T: Terminal>(interface: &Interface<T>) -> std::io::Result<()> {
    match history_path() {
        Some(path) => interface.save_history(path),
        None => Ok(()),
    }
}

/// Reads until a line leaves every list balanced, then hands the gathered
/// source to `processor`. Unfinished input carries over to the next line.
pub fn repl<T: Terminal>(interface: &Interface<T>, processor: impl Fn(&str) -> String) {
    let mut pending = String::new();
    loop {
        match interface.read_line() {
            Ok(ReadResult::Eof) => break,
            Ok(ReadResult::Signal(sig)) => {
                writeln!(interface, "Received signal {:?}", sig).ok();
                pending.clear();
                interface.set_prompt(PROMPT).ok();
            }
            Ok(ReadResult::Input(line)) => {
                if pending.is_empty() && line.trim().is_empty() {
                    continue;
                }
                interface.add_history_unique(line.clone());
                pending.push_str(&line);
                pending.push('\n');
                if reader::is_incomplete(&pending) {
                    interface.set_prompt(CONTINUATION).ok();
                    continue;
                }
                writeln!(interface, "{}", processor(&pending)).ok();
                pending.clear();
                interface.set_prompt(PROMPT).ok();
            }
            Err(e) => {
                writeln!(interface, "Error: {}", e).ok();
                break;
            }
        }
    }
}
