// earsh: a small read-only shell over a virtual filesystem
// the same session drives the browser terminal and the console binary
pub mod command;
pub mod commands;
pub mod completion;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod history;
pub mod launch;
pub mod parser;
pub mod path;
pub mod render;
pub mod script;
pub mod seed;
pub mod shell;
pub mod storage;
pub mod vfs;

use log::{info, warn, Level, LevelFilter, Log, Metadata, Record};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use completion::Completion;
use config::ShellConfig;
use render::{DisplayEvent, MarkdownRenderer, PlainRenderer};
use shell::Shell;
use storage::{BrowserStore, KeyValueStore, MemoryStore};

pub use error::{Result, ShellError};

// log records end up in the browser console
struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg = JsValue::from_str(&format!("[earsh {}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&msg),
            Level::Warn => web_sys::console::warn_1(&msg),
            Level::Info => web_sys::console::info_1(&msg),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

fn init_console_logging() {
    // a second Terminal on the same page keeps the first logger
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }
}

// markdown goes through whatever the page hands us (marked.js and friends)
struct JsRenderer {
    render: js_sys::Function,
}

impl MarkdownRenderer for JsRenderer {
    fn render(&self, markdown: &str) -> String {
        match self.render.call1(&JsValue::NULL, &JsValue::from_str(markdown)) {
            Ok(out) => out.as_string().unwrap_or_else(|| markdown.to_string()),
            Err(e) => {
                warn!("markdown renderer threw: {e:?}");
                markdown.to_string()
            }
        }
    }
}

// response wrapper for js: display events plus the prompt after the command
#[derive(Serialize)]
pub struct TerminalResponse {
    pub events: Vec<DisplayEvent>,
    pub prompt: String,
}

#[derive(Serialize, Default)]
pub struct CompletionResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buffer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing: Option<String>,
}

// js strings index in utf-16 code units (selectionStart), completion works in chars
fn utf16_to_chars(buffer: &str, units: usize) -> usize {
    let mut seen = 0;
    for (count, c) in buffer.chars().enumerate() {
        if seen >= units {
            return count;
        }
        seen += c.len_utf16();
    }
    buffer.chars().count()
}

fn chars_to_utf16(buffer: &str, chars: usize) -> usize {
    buffer.chars().take(chars).map(char::len_utf16).sum()
}

impl From<Completion> for CompletionResponse {
    fn from(completion: Completion) -> Self {
        match completion {
            Completion::Edit { buffer, cursor } => {
                let cursor = chars_to_utf16(&buffer, cursor);
                Self { buffer: Some(buffer), cursor: Some(cursor), ..Self::default() }
            }
            Completion::Listing(listing) => Self { listing: Some(listing), ..Self::default() },
            Completion::Unchanged => Self::default(),
        }
    }
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or_else(|e| {
        warn!("could not serialize response: {e}");
        JsValue::NULL
    })
}

// main terminal struct - keeps the session between calls
#[wasm_bindgen]
pub struct Terminal {
    shell: Shell,
}

impl Terminal {
    fn respond(&self, output: Vec<DisplayEvent>, prompt_before: &str) -> JsValue {
        let prompt = self.shell.prompt();
        if prompt != prompt_before {
            events::emit_prompt_change(&prompt);
        }
        to_js(&TerminalResponse { events: output, prompt })
    }
}

#[wasm_bindgen]
impl Terminal {
    /// `renderer` turns Markdown into HTML; without one posts are shown as is.
    #[wasm_bindgen(constructor)]
    pub fn new(renderer: Option<js_sys::Function>) -> std::result::Result<Terminal, JsValue> {
        init_console_logging();
        let store: Box<dyn KeyValueStore> = match BrowserStore::local() {
            Some(store) => Box::new(store),
            None => {
                warn!("localStorage unavailable, session will not persist");
                Box::new(MemoryStore::new())
            }
        };
        let renderer: Box<dyn MarkdownRenderer> = match renderer {
            Some(render) => Box::new(JsRenderer { render }),
            None => Box::new(PlainRenderer),
        };
        let shell = Shell::boot(ShellConfig::default(), store, renderer)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        info!("terminal ready: {}", shell.prompt());
        Ok(Terminal { shell })
    }

    /// Run a line typed at the prompt.
    pub fn submit(&mut self, line: &str) -> JsValue {
        let before = self.shell.prompt();
        let events = self.shell.submit(line);
        self.respond(events, &before)
    }

    /// Run the `blogpost` query parameter of the page, if present.
    pub fn launch(&mut self) -> JsValue {
        let before = self.shell.prompt();
        let raw = web_sys::window()
            .and_then(|w| w.location().search().ok())
            .and_then(|search| web_sys::UrlSearchParams::new_with_str(&search).ok())
            .and_then(|params| params.get("blogpost"))
            .unwrap_or_default();
        let events = self.shell.launch_blogpost(&raw);
        self.respond(events, &before)
    }

    /// Tab key at `cursor`, the input's `selectionStart` (UTF-16 code units).
    /// The returned cursor uses the same units.
    pub fn complete(&mut self, buffer: &str, cursor: usize) -> JsValue {
        let now_ms = js_sys::Date::now() as u64;
        let completion = self.shell.complete(buffer, utf16_to_chars(buffer, cursor), now_ms);
        to_js(&CompletionResponse::from(completion))
    }

    pub fn history_prev(&mut self) -> Option<String> {
        self.shell.history_prev()
    }

    pub fn history_next(&mut self) -> String {
        self.shell.history_next()
    }

    /// Alt+. recall.
    pub fn last_argument(&mut self) -> Option<String> {
        self.shell.last_argument()
    }

    pub fn prompt(&self) -> String {
        self.shell.prompt()
    }

    pub fn command_names(&self) -> JsValue {
        to_js(&self.shell.registry().get_command_names())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_response_shapes() {
        let edit = CompletionResponse::from(Completion::Edit { buffer: "cd blog/".into(), cursor: 8 });
        assert_eq!(
            serde_json::to_value(&edit).unwrap(),
            serde_json::json!({ "buffer": "cd blog/", "cursor": 8 })
        );
        let listing = CompletionResponse::from(Completion::Listing("cat  cd".into()));
        assert_eq!(serde_json::to_value(&listing).unwrap(), serde_json::json!({ "listing": "cat  cd" }));
        let none = CompletionResponse::from(Completion::Unchanged);
        assert_eq!(serde_json::to_value(&none).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn test_cursor_counts_utf16_units() {
        // "é" is one unit, "🦀" is two
        let buffer = "cat é🦀/x";
        assert_eq!(utf16_to_chars(buffer, 5), 5);
        assert_eq!(utf16_to_chars(buffer, 7), 6);
        assert_eq!(utf16_to_chars(buffer, 100), buffer.chars().count());
        assert_eq!(chars_to_utf16(buffer, 6), 7);
        assert_eq!(chars_to_utf16(buffer, 0), 0);

        let edit = CompletionResponse::from(Completion::Edit { buffer: "cat 🦀.md ".into(), cursor: 9 });
        assert_eq!(edit.cursor, Some(10));
    }

    #[test]
    fn test_display_events_serialize_tagged() {
        let events = vec![DisplayEvent::Line("hi".into()), DisplayEvent::Clear];
        assert_eq!(
            serde_json::to_value(&events).unwrap(),
            serde_json::json!([{ "kind": "line", "content": "hi" }, { "kind": "clear" }])
        );
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn terminal_boots_and_runs_pwd() {
        let mut terminal = Terminal::new(None).unwrap();
        terminal.submit("cd ~");
        assert_eq!(terminal.prompt(), "earentir@hera:~$ ");
        let response = terminal.submit("pwd");
        assert!(!response.is_null());
    }
}
