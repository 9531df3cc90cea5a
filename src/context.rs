use log::{debug, info, warn};

use crate::config::ShellConfig;
use crate::error::Result;
use crate::history::History;
use crate::render::MarkdownRenderer;
use crate::seed;
use crate::storage::{self, KeyValueStore, HISTORY_KEY, PATH_KEY, USER_KEY};
use crate::vfs::{NodeId, VirtualFileSystem};

/// Everything a command can see: the filesystem plus the session state that survives
/// reloads. Every mutation of the session is written back to the store right away.
pub struct TerminalContext {
    pub vfs: VirtualFileSystem,
    pub config: ShellConfig,
    cwd: Vec<String>,
    user: String,
    pub history: History,
    store: Box<dyn KeyValueStore>,
    renderer: Box<dyn MarkdownRenderer>,
}

pub fn home_segments(user: &str) -> Vec<String> {
    vec!["/".to_string(), "home".to_string(), user.to_string()]
}

impl TerminalContext {
    /// Build the filesystem from the configured seed, ingest the blog posts of the
    /// session user and restore the persisted session.
    pub fn boot(
        config: ShellConfig,
        store: Box<dyn KeyValueStore>,
        renderer: Box<dyn MarkdownRenderer>,
    ) -> Result<Self> {
        let mut vfs = VirtualFileSystem::from_seed(seed::load_tree(&config)?)?;
        let user = store.get(USER_KEY).unwrap_or_else(|| config.default_user.clone());
        match seed::load_posts(&config) {
            Ok(posts) => {
                vfs.ingest_posts(&user, posts);
            }
            Err(e) => warn!("blog posts not loaded: {e}"),
        }
        Ok(Self::restore(vfs, config, store, renderer))
    }

    /// Restore session state from `store` over an already built filesystem.
    pub fn restore(
        vfs: VirtualFileSystem,
        config: ShellConfig,
        mut store: Box<dyn KeyValueStore>,
        renderer: Box<dyn MarkdownRenderer>,
    ) -> Self {
        let user = store.get(USER_KEY).unwrap_or_else(|| config.default_user.clone());
        let entries: Vec<String> = storage::get_json(store.as_ref(), HISTORY_KEY).unwrap_or_default();
        let history = History::from_entries(entries, config.history_size);

        let stored: Option<Vec<String>> = storage::get_json(store.as_ref(), PATH_KEY);
        let cwd = match stored {
            Some(path) if vfs.lookup_dir(&path).is_some() && path.first().map(String::as_str) == Some("/") => path,
            Some(path) => {
                warn!("stored path {path:?} no longer exists, falling back to home");
                Self::fallback_dir(&vfs, &user)
            }
            None => {
                let home = Self::fallback_dir(&vfs, &user);
                if let Err(e) = storage::set_json(store.as_mut(), PATH_KEY, &home) {
                    warn!("could not persist initial path: {e}");
                }
                home
            }
        };
        info!("session restored for {user} at {cwd:?} with {} history entries", history.len());

        Self { vfs, config, cwd, user, history, store, renderer }
    }

    fn fallback_dir(vfs: &VirtualFileSystem, user: &str) -> Vec<String> {
        let home = home_segments(user);
        if vfs.lookup_dir(&home).is_some() {
            home
        } else {
            vec!["/".to_string()]
        }
    }

    pub fn cwd(&self) -> &[String] {
        &self.cwd
    }

    pub fn cwd_node(&self) -> NodeId {
        self.vfs.lookup_dir(&self.cwd).unwrap_or_else(|| self.vfs.root())
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// `$HOME` as shown by `echo`.
    pub fn home_path(&self) -> String {
        format!("/home/{}/", self.user)
    }

    pub fn set_cwd(&mut self, segments: Vec<String>) {
        debug!("cwd -> {segments:?}");
        self.cwd = segments;
        if let Err(e) = storage::set_json(self.store.as_mut(), PATH_KEY, &self.cwd) {
            warn!("could not persist current path: {e}");
        }
    }

    pub fn set_user(&mut self, user: &str) {
        debug!("user -> {user}");
        self.user = user.to_string();
        if let Err(e) = self.store.set(USER_KEY, user) {
            warn!("could not persist user: {e}");
        }
    }

    pub fn persist_history(&mut self) {
        if let Err(e) = storage::set_json(self.store.as_mut(), HISTORY_KEY, &self.history.to_vec()) {
            warn!("could not persist history: {e}");
        }
    }

    /// Record an interactive line and persist when it was kept.
    pub fn record_history(&mut self, line: &str) {
        if self.history.record(line) {
            self.persist_history();
        }
    }

    /// `pwd` output: `/` at root, otherwise the path with a trailing slash.
    pub fn pwd(&self) -> String {
        if self.cwd.len() <= 1 {
            "/".to_string()
        } else {
            format!("/{}/", self.cwd[1..].join("/"))
        }
    }

    /// Path as shown in the prompt, with the user's home collapsed to `~`.
    pub fn formatted_path(&self) -> String {
        if self.cwd.len() <= 1 {
            return "/".to_string();
        }
        let in_home = self.cwd.len() >= 3 && self.cwd[1] == "home" && self.cwd[2] == self.user;
        if in_home {
            if self.cwd.len() == 3 {
                "~".to_string()
            } else {
                format!("~/{}", self.cwd[3..].join("/"))
            }
        } else {
            format!("/{}", self.cwd[1..].join("/"))
        }
    }

    pub fn prompt(&self) -> String {
        format!("{}@{}:{}$ ", self.user, self.config.hostname, self.formatted_path())
    }

    pub fn render_markdown(&self, markdown: &str) -> String {
        self.renderer.render(markdown)
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::render::PlainRenderer;
    use crate::storage::MemoryStore;
    use crate::vfs::tests::sample_vfs;

    pub fn sample_ctx() -> TerminalContext {
        TerminalContext::restore(
            sample_vfs(),
            ShellConfig::default(),
            Box::new(MemoryStore::new()),
            Box::new(PlainRenderer),
        )
    }

    pub fn ctx_with_store(store: MemoryStore) -> TerminalContext {
        TerminalContext::restore(
            sample_vfs(),
            ShellConfig::default(),
            Box::new(store),
            Box::new(PlainRenderer),
        )
    }

    fn segs(path: &[&str]) -> Vec<String> {
        path.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults_to_home_and_persists_it() {
        let ctx = sample_ctx();
        assert_eq!(ctx.cwd(), segs(&["/", "home", "earentir"]).as_slice());
        assert_eq!(ctx.user(), "earentir");
        assert_eq!(ctx.store().get(PATH_KEY).as_deref(), Some(r#"["/","home","earentir"]"#));
    }

    #[test]
    fn test_restores_persisted_state() {
        let mut store = MemoryStore::new();
        store.set(USER_KEY, "earentir").unwrap();
        store.set(PATH_KEY, r#"["/","etc"]"#).unwrap();
        store.set(HISTORY_KEY, r#"["ls","pwd"]"#).unwrap();
        let ctx = ctx_with_store(store);
        assert_eq!(ctx.cwd(), segs(&["/", "etc"]).as_slice());
        assert_eq!(ctx.history.to_vec(), vec!["ls", "pwd"]);
    }

    #[test]
    fn test_stale_path_falls_back() {
        let mut store = MemoryStore::new();
        store.set(PATH_KEY, r#"["/","gone"]"#).unwrap();
        let ctx = ctx_with_store(store);
        assert_eq!(ctx.cwd(), segs(&["/", "home", "earentir"]).as_slice());

        let mut store = MemoryStore::new();
        store.set(USER_KEY, "ghost").unwrap();
        let ctx = ctx_with_store(store);
        assert_eq!(ctx.cwd(), segs(&["/"]).as_slice());
    }

    #[test]
    fn test_pwd_and_prompt() {
        let mut ctx = sample_ctx();
        assert_eq!(ctx.pwd(), "/home/earentir/");
        assert_eq!(ctx.prompt(), "earentir@hera:~$ ");
        ctx.set_cwd(segs(&["/", "home", "earentir", "blog"]));
        assert_eq!(ctx.formatted_path(), "~/blog");
        ctx.set_cwd(segs(&["/", "etc"]));
        assert_eq!(ctx.formatted_path(), "/etc");
        assert_eq!(ctx.pwd(), "/etc/");
        ctx.set_cwd(segs(&["/"]));
        assert_eq!(ctx.pwd(), "/");
        assert_eq!(ctx.formatted_path(), "/");
    }

    #[test]
    fn test_user_switch_changes_home_view() {
        let mut ctx = sample_ctx();
        ctx.set_user("guest");
        assert_eq!(ctx.formatted_path(), "/home/earentir");
        assert_eq!(ctx.home_path(), "/home/guest/");
        assert_eq!(ctx.store().get(USER_KEY).as_deref(), Some("guest"));
    }

    #[test]
    fn test_record_history_persists() {
        let mut ctx = sample_ctx();
        ctx.record_history("ls");
        ctx.record_history("ls");
        assert_eq!(ctx.store().get(HISTORY_KEY).as_deref(), Some(r#"["ls"]"#));
    }
}
