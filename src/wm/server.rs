//! Server - Owns every session and implements the split collaborators

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::cmd::find::FindState;
use crate::cmd::format::FormatContext;
use crate::cmd::host::{
    Addressing, CellRef, ClientRef, InputError, LayoutGateway, SpawnGateway, WindowControl,
};
use crate::config::Config;

use super::layout::{LayoutError, Rect, SplitDirection, SplitOptions};
use super::pane::{clamp_u16, Pane, PaneId, PaneState};
use super::session::{Session, SessionId};
use super::spawn::{Environ, LaunchSpec, SpawnError, SpawnRequest, Spawner};
use super::window::{ReflowReason, Window, WindowId};

/// Variable set in every pane's environment to the pane id
pub const PANE_ENV: &str = "SPLITW_PANE";

/// Shell used when none is configured
pub fn default_shell(configured: Option<&str>) -> String {
    configured
        .map(str::to_string)
        .or_else(|| std::env::var("SHELL").ok().filter(|s| !s.is_empty()))
        .unwrap_or_else(|| "/bin/sh".to_string())
}

/// Server state: sessions, windows, panes and the process launcher
pub struct Server {
    sessions: HashMap<SessionId, Session>,
    session_order: Vec<SessionId>,
    next_session_id: SessionId,
    next_window_id: WindowId,
    next_pane_id: PaneId,
    spawner: Box<dyn Spawner>,
    /// Shell for empty and single-string commands
    pub default_shell: String,
    /// Working directory when neither `-c` nor the target pane has one
    pub default_cwd: Option<PathBuf>,
    /// Global environment given to every pane
    pub environment: Environ,
    pub window_base_index: u32,
    pub pane_base_index: u32,
    hooks: HashMap<String, Vec<String>>,
    /// Panes waiting for a client's input, with the client's name
    input_waits: HashMap<PaneId, String>,
}

impl Server {
    pub fn new(spawner: Box<dyn Spawner>) -> Self {
        Self {
            sessions: HashMap::new(),
            session_order: Vec::new(),
            next_session_id: 0,
            next_window_id: 0,
            next_pane_id: 0,
            spawner,
            default_shell: default_shell(None),
            default_cwd: None,
            environment: Environ::new(),
            window_base_index: 0,
            pane_base_index: 0,
            hooks: HashMap::new(),
            input_waits: HashMap::new(),
        }
    }

    /// Create a server with the shell, environment, indexes and hooks from `config`
    pub fn from_config(config: &Config, spawner: Box<dyn Spawner>) -> Self {
        let mut server = Self::new(spawner);
        server.default_shell = default_shell(config.shell.as_deref());
        server.default_cwd = std::env::current_dir().ok();
        server.environment = config.environment.clone();
        server.window_base_index = config.window.base_index;
        server.pane_base_index = config.pane.base_index;
        for (name, commands) in &config.hooks {
            server.set_hook(name, commands.clone());
        }
        server
    }

    #[cfg(test)]
    pub fn set_spawner(&mut self, spawner: Box<dyn Spawner>) {
        self.spawner = spawner;
    }

    pub fn set_hook(&mut self, name: &str, commands: Vec<String>) {
        self.hooks.insert(name.to_string(), commands);
    }

    /// Command lines configured for a hook
    pub fn hook_commands(&self, name: &str) -> &[String] {
        self.hooks.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Create a session with one window running the default shell
    pub fn create_session(
        &mut self,
        name: Option<&str>,
        width: u32,
        height: u32,
    ) -> Result<FindState, SpawnError> {
        let session_id = self.next_session_id;
        let window_id = self.next_window_id;
        let pane_id = self.next_pane_id;

        let window_name = Path::new(&self.default_shell)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.default_shell.clone());
        let mut window = Window::new(window_id, window_name, pane_id, width, height);

        let spec = LaunchSpec {
            command: Vec::new(),
            shell: self.default_shell.clone(),
            environment: self.pane_environment(pane_id, &Environ::new()),
            cwd: self.default_cwd.clone(),
            cols: clamp_u16(width),
            rows: clamp_u16(height),
        };
        let process = self.spawner.launch(&spec)?;
        if let Some(pane) = window.pane_mut(pane_id) {
            pane.cwd = self.default_cwd.clone();
            pane.attach(process);
        }

        let name = name
            .map(str::to_string)
            .unwrap_or_else(|| session_id.to_string());
        info!("created session {} (${}) with @{} and %{}", name, session_id, window_id, pane_id);
        let session = Session::new(session_id, name, window, self.window_base_index);
        self.sessions.insert(session_id, session);
        self.session_order.push(session_id);

        self.next_session_id += 1;
        self.next_window_id += 1;
        self.next_pane_id += 1;
        Ok(FindState {
            session: session_id,
            window: window_id,
            pane: pane_id,
        })
    }

    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    pub fn session_by_name(&self, name: &str) -> Option<&Session> {
        self.session_order
            .iter()
            .filter_map(|id| self.sessions.get(id))
            .find(|s| s.name == name)
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.sessions.values().find_map(|s| s.window(id))
    }

    fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.sessions.values_mut().find_map(|s| s.window_mut(id))
    }

    /// Session and window holding a pane
    pub fn locate_pane(&self, pane: PaneId) -> Option<(SessionId, WindowId)> {
        self.sessions.values().find_map(|session| {
            session
                .windows()
                .find(|w| w.pane(pane).is_some())
                .map(|w| (session.id, w.id))
        })
    }

    fn pane(&self, id: PaneId) -> Option<&Pane> {
        let (_, window) = self.locate_pane(id)?;
        self.window(window)?.pane(id)
    }

    fn pane_mut(&mut self, id: PaneId) -> Option<&mut Pane> {
        let (_, window) = self.locate_pane(id)?;
        self.window_mut(window)?.pane_mut(id)
    }

    /// Global environment, then the overlay, then the pane id
    fn pane_environment(&self, pane: PaneId, overlay: &Environ) -> Environ {
        let mut env = self.environment.clone();
        env.extend(overlay.iter().map(|(k, v)| (k.clone(), v.clone())));
        env.insert(PANE_ENV.to_string(), format!("%{}", pane));
        env
    }

    /// Feed the client's input to a pane waiting for it
    pub fn finish_input(&mut self, pane: PaneId, data: &[u8]) -> Result<(), InputError> {
        let target = self.pane_mut(pane).ok_or(InputError::UnknownPane(pane))?;
        if target.state != PaneState::AwaitingInput {
            return Err(InputError::NotWaiting(pane));
        }
        target.contents.extend_from_slice(data);
        target.state = PaneState::Empty;
        debug!("%{} in @{} received {} bytes of input", pane, target.window, data.len());
        self.input_waits.remove(&pane);
        Ok(())
    }

    /// Windows to redraw and sessions whose status changed since the last call
    pub fn take_dirty(&mut self) -> (Vec<WindowId>, Vec<SessionId>) {
        let mut windows = Vec::new();
        let mut sessions = Vec::new();
        for id in &self.session_order {
            let Some(session) = self.sessions.get_mut(id) else {
                continue;
            };
            if std::mem::take(&mut session.status_dirty) {
                sessions.push(session.id);
            }
            for window in session.windows_mut() {
                if std::mem::take(&mut window.needs_redraw) {
                    windows.push(window.id);
                }
            }
        }
        (windows, sessions)
    }
}

impl LayoutGateway for Server {
    fn pane_size(&self, pane: PaneId) -> Option<(u32, u32)> {
        self.pane(pane).map(|p| (p.width, p.height))
    }

    fn split(
        &mut self,
        pane: PaneId,
        direction: SplitDirection,
        size: Option<u32>,
        options: SplitOptions,
    ) -> Result<CellRef, LayoutError> {
        let (_, window_id) = self.locate_pane(pane).ok_or(LayoutError::UnknownPane(pane))?;
        let window = self
            .window_mut(window_id)
            .ok_or(LayoutError::UnknownPane(pane))?;
        let target = window
            .layout
            .cell_of(pane)
            .ok_or(LayoutError::UnknownPane(pane))?;

        let cell = window.layout.split(target, direction, size, options)?;
        window.reflow(ReflowReason::Split);
        debug!("split cell {} of %{}: new cell {} in @{}", target, pane, cell, window_id);
        Ok(CellRef {
            window: window_id,
            cell,
        })
    }

    fn close(&mut self, cell: CellRef) {
        let Some(window) = self.window_mut(cell.window) else {
            warn!("close: window @{} is gone", cell.window);
            return;
        };
        match window.layout.close(cell.cell) {
            Ok(()) => {
                window.reflow(ReflowReason::Close);
                debug!(
                    "closed cell {} in @{}, {} cells left",
                    cell.cell,
                    cell.window,
                    window.layout.cell_count()
                );
            }
            Err(e) => warn!("close: {}", e),
        }
    }
}

impl SpawnGateway for Server {
    fn spawn(&mut self, request: &SpawnRequest) -> Result<PaneId, SpawnError> {
        let window = self
            .window(request.window)
            .ok_or(SpawnError::WindowGone(request.window))?;
        let layout = &window.layout;
        if !layout.is_leaf(request.cell) || layout.pane_at(request.cell).is_some() {
            return Err(SpawnError::CellInUse(request.cell));
        }
        let rect: Rect = layout
            .geometry(request.cell)
            .ok_or(SpawnError::CellInUse(request.cell))?;
        let cwd = request
            .cwd
            .clone()
            .or_else(|| window.pane(request.target).and_then(|p| p.cwd.clone()))
            .or_else(|| self.default_cwd.clone());

        let id = self.next_pane_id;
        let mut pane = Pane::new(id, request.window, request.cell, rect);
        pane.cwd = cwd.clone();

        if !request.flags.start_empty {
            let spec = LaunchSpec {
                command: request.command.clone(),
                shell: self.default_shell.clone(),
                environment: self.pane_environment(id, &request.environment),
                cwd,
                cols: clamp_u16(rect.width),
                rows: clamp_u16(rect.height),
            };
            let process = self.spawner.launch(&spec)?;
            pane.attach(process);
        }

        let window = self
            .window_mut(request.window)
            .ok_or(SpawnError::WindowGone(request.window))?;
        window
            .layout
            .assign(request.cell, id)
            .map_err(|_| SpawnError::CellInUse(request.cell))?;
        window.add_pane(pane, request.target, request.flags.before);
        window.reflow(ReflowReason::Split);

        self.next_pane_id += 1;
        info!(
            "spawned %{} in ${} @{} ({})",
            id,
            request.session,
            request.window,
            if request.flags.start_empty { "empty" } else { "running" }
        );
        Ok(id)
    }

    fn start_input(&mut self, pane: PaneId, client: Option<&ClientRef>) -> Result<(), InputError> {
        let target = self.pane(pane).ok_or(InputError::UnknownPane(pane))?;
        if !target.is_empty() {
            return Err(InputError::NotEmpty);
        }
        let client = match client {
            Some(c) if !c.exited => c,
            _ => return Err(InputError::NoClient),
        };
        if client.session.is_some() {
            return Err(InputError::ClientAttached);
        }

        if let Some(target) = self.pane_mut(pane) {
            target.state = PaneState::AwaitingInput;
        }
        self.input_waits.insert(pane, client.name.clone());
        debug!("%{} waiting for input from {}", pane, client.name);
        Ok(())
    }

    fn detach_pane(&mut self, pane: PaneId) {
        if let Some(client) = self.input_waits.remove(&pane) {
            debug!("%{} no longer waiting for {}", pane, client);
        }
        if let Some(target) = self.pane_mut(pane) {
            if target.state == PaneState::AwaitingInput {
                target.state = PaneState::Empty;
            }
        }
    }

    fn remove_pane(&mut self, pane: PaneId) {
        let Some((_, window_id)) = self.locate_pane(pane) else {
            return;
        };
        if let Some(window) = self.window_mut(window_id) {
            if window.remove_pane(pane).is_some() {
                window.reflow(ReflowReason::Close);
                info!("removed %{} from @{}", pane, window_id);
            }
        }
        self.input_waits.remove(&pane);
    }
}

impl WindowControl for Server {
    fn push_zoom(&mut self, window: WindowId) -> Option<PaneId> {
        self.window_mut(window)?.push_zoom()
    }

    fn pop_zoom(&mut self, window: WindowId, zoom: bool) {
        let Some(w) = self.window_mut(window).filter(|_| zoom) else {
            return;
        };
        let active = w.active_pane;
        if !w.zoom(active) {
            debug!("@{}: not zooming %{}", window, active);
        }
    }

    fn select_pane(&mut self, window: WindowId, pane: PaneId) {
        let Some(w) = self.window_mut(window) else {
            return;
        };
        if !w.set_active(pane) {
            warn!("@{}: no pane %{} to select", window, pane);
        }
    }

    fn redraw_window(&mut self, window: WindowId) {
        if let Some(w) = self.window_mut(window) {
            w.needs_redraw = true;
        }
    }

    fn status_session(&mut self, session: SessionId) {
        if let Some(s) = self.sessions.get_mut(&session) {
            s.status_dirty = true;
        }
    }
}

impl Addressing for Server {
    fn find_pane(&self, pane: PaneId) -> Option<FindState> {
        let (session, window) = self.locate_pane(pane)?;
        Some(FindState { session, window, pane })
    }

    fn format_context(&self, state: &FindState) -> FormatContext {
        let mut ctx = FormatContext::new();
        let Some(session) = self.session(state.session) else {
            return ctx;
        };
        ctx.add("session_name", &session.name);
        ctx.add("session_id", format!("${}", session.id));

        let Some(window) = session.window(state.window) else {
            return ctx;
        };
        if let Some(index) = session.window_index(window.id) {
            ctx.add("window_index", index);
        }
        ctx.add("window_id", format!("@{}", window.id));
        ctx.add("window_name", &window.name);
        ctx.add("window_panes", window.panes.len());
        ctx.add("window_zoomed_flag", u8::from(window.zoomed_pane_id().is_some()));
        ctx.add("window_layout", &window.layout);

        let Some(pane) = window.pane(state.pane) else {
            return ctx;
        };
        if let Some(index) = window.pane_index(pane.id) {
            ctx.add("pane_index", index as u64 + u64::from(self.pane_base_index));
        }
        ctx.add("pane_id", format!("%{}", pane.id));
        ctx.add("pane_title", pane.display_title());
        ctx.add("pane_width", pane.width);
        ctx.add("pane_height", pane.height);
        ctx.add("pane_left", pane.x);
        ctx.add("pane_top", pane.y);
        ctx.add("pane_active", u8::from(window.active_pane == pane.id));
        ctx.add("pane_empty", u8::from(pane.is_empty()));
        ctx.add("history_bytes", pane.contents.len());
        if let Some(pid) = pane.process.as_ref().and_then(|p| p.pid()) {
            ctx.add("pane_pid", pid);
        }
        if let Some(ref cwd) = pane.cwd {
            ctx.add("pane_current_path", cwd.display());
        }
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wm::spawn::{NullSpawner, ProcessHandle, SplitFlags};
    use std::sync::{Arc, Mutex};

    /// Records every launch it is asked for
    struct Capture(Arc<Mutex<Vec<LaunchSpec>>>);

    impl Spawner for Capture {
        fn launch(&mut self, spec: &LaunchSpec) -> Result<Box<dyn ProcessHandle>, SpawnError> {
            if let Ok(mut seen) = self.0.lock() {
                seen.push(spec.clone());
            }
            NullSpawner.launch(spec)
        }
    }

    fn request(first: &FindState, cell: CellRef) -> SpawnRequest {
        SpawnRequest {
            session: first.session,
            window: first.window,
            target: first.pane,
            cell: cell.cell,
            command: vec!["top".into()],
            environment: Environ::new(),
            cwd: None,
            flags: SplitFlags::default(),
        }
    }

    #[test]
    fn test_create_session_names_and_ids() {
        let mut server = Server::new(Box::new(NullSpawner));
        let first = server.create_session(None, 80, 24).unwrap();
        let second = server.create_session(Some("work"), 80, 24).unwrap();

        assert_eq!((first.session, first.window, first.pane), (0, 0, 0));
        assert_eq!(second.pane, 1);
        assert_eq!(server.session(0).unwrap().name, "0");
        assert_eq!(server.session_by_name("work").unwrap().id, second.session);
        assert_eq!(server.locate_pane(1), Some((second.session, second.window)));
        assert_eq!(server.pane_size(0), Some((80, 24)));
    }

    #[test]
    fn test_spawn_environment_and_cwd() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut server = Server::new(Box::new(Capture(seen.clone())));
        server.environment.insert("GLOBAL".into(), "1".into());
        server.environment.insert("SHARED".into(), "global".into());
        let first = server.create_session(None, 80, 24).unwrap();
        if let Some(pane) = server.pane_mut(first.pane) {
            pane.cwd = Some(PathBuf::from("/srv"));
        }

        let cell = server
            .split(first.pane, SplitDirection::Horizontal, None, SplitOptions::default())
            .unwrap();
        let mut req = request(&first, cell);
        req.environment.insert("SHARED".into(), "overlay".into());
        let id = server.spawn(&req).unwrap();

        let seen = seen.lock().unwrap();
        let spec = seen.last().unwrap();
        assert_eq!(spec.environment.get("GLOBAL").map(String::as_str), Some("1"));
        assert_eq!(spec.environment.get("SHARED").map(String::as_str), Some("overlay"));
        assert_eq!(spec.environment.get(PANE_ENV), Some(&format!("%{}", id)));
        assert_eq!(spec.cwd, Some(PathBuf::from("/srv")));
        assert_eq!((spec.cols, spec.rows), (39, 24));
        assert_eq!(spec.command, vec!["top".to_string()]);
    }

    #[test]
    fn test_spawn_places_then_select_activates() {
        let mut server = Server::new(Box::new(NullSpawner));
        let first = server.create_session(None, 80, 24).unwrap();
        let cell = server
            .split(first.pane, SplitDirection::Vertical, None, SplitOptions::default())
            .unwrap();
        let id = server.spawn(&request(&first, cell)).unwrap();

        let window = server.window(first.window).unwrap();
        assert_eq!(window.pane_order, vec![first.pane, id]);
        assert_eq!(window.active_pane, first.pane);

        server.select_pane(first.window, id);
        let window = server.window(first.window).unwrap();
        assert_eq!(window.active_pane, id);
        assert_eq!(window.last_pane, Some(first.pane));

        // The same cell cannot take a second pane
        assert!(matches!(
            server.spawn(&request(&first, cell)),
            Err(SpawnError::CellInUse(_))
        ));
    }

    #[test]
    fn test_start_input_checks() {
        let mut server = Server::new(Box::new(NullSpawner));
        let first = server.create_session(None, 80, 24).unwrap();
        let client = ClientRef::detached("cli");

        assert_eq!(
            server.start_input(first.pane, Some(&client)),
            Err(InputError::NotEmpty)
        );
        assert_eq!(server.start_input(99, Some(&client)), Err(InputError::UnknownPane(99)));

        let cell = server
            .split(first.pane, SplitDirection::Vertical, None, SplitOptions::default())
            .unwrap();
        let mut req = request(&first, cell);
        req.flags.start_empty = true;
        let id = server.spawn(&req).unwrap();

        let exited = ClientRef { exited: true, ..client.clone() };
        assert_eq!(server.start_input(id, Some(&exited)), Err(InputError::NoClient));
        assert_eq!(server.finish_input(id, b"x"), Err(InputError::NotWaiting(id)));

        server.start_input(id, Some(&client)).unwrap();
        server.detach_pane(id);
        assert_eq!(server.finish_input(id, b"x"), Err(InputError::NotWaiting(id)));
    }

    #[test]
    fn test_format_context() {
        let mut server = Server::new(Box::new(NullSpawner));
        server.pane_base_index = 1;
        let first = server.create_session(Some("dev"), 80, 24).unwrap();
        let ctx = server.format_context(&first);

        assert_eq!(ctx.get("session_name"), Some("dev"));
        assert_eq!(ctx.get("window_index"), Some("0"));
        assert_eq!(ctx.get("pane_index"), Some("1"));
        assert_eq!(ctx.get("pane_id"), Some("%0"));
        assert_eq!(ctx.get("pane_width"), Some("80"));
        assert_eq!(ctx.get("pane_active"), Some("1"));
        assert_eq!(ctx.get("window_layout"), Some("80x24,0,0,0"));
        assert!(ctx.get("pane_pid").is_none());
    }
}
