//! split-window: split a pane and start a command in the new half
//!
//! The split runs in two phases. The layout is cut first and the new cell is
//! held by a [`CellGuard`]; once a pane is attached (and, with `-I`, set to
//! wait for input) the guard is committed. Any failure before that point drops
//! the guard, which closes the cell and removes the partial pane, so the
//! window is left exactly as it was.

use std::ops::{Deref, DerefMut};
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::wm::spawn::{environ_put, Environ, SpawnError, SpawnRequest, SplitFlags};
use crate::wm::{LayoutError, PaneId, Server, SplitDirection};

use super::args::Args;
use super::find::{find_target, FindState};
use super::format::SPLIT_WINDOW_TEMPLATE;
use super::host::{CellRef, ClientRef, InputError, SplitHost};
use super::queue::{CommandPipeline, CommandQueue};
use super::size::{self, SizeError, SizeSpec};
use super::{CmdReturn, CommandContext, CommandEntry};

pub const ENTRY: CommandEntry = CommandEntry {
    name: "split-window",
    alias: Some("splitw"),
    template: "bc:de:fF:hIl:p:Pt:vZ",
    usage: "[-bdefhIPvZ] [-c start-directory] [-e environment] [-F format] \
            [-l size] [-p percentage] [-t target-pane] [shell-command ...]",
    exec,
};

/// Hook scheduled after every successful split
pub const AFTER_SPLIT_WINDOW: &str = "after-split-window";

/// A split, as asked for on the command line
#[derive(Clone, Debug, Default)]
pub struct SplitRequest {
    pub direction: SplitDirection,
    pub size: SizeSpec,
    pub flags: SplitFlags,
    /// Wait for the client's input instead of running a command
    pub input: bool,
    pub command: Vec<String>,
    pub environment: Environ,
    pub cwd: Option<PathBuf>,
    /// Template to print the new pane with
    pub print: Option<String>,
    pub client: Option<ClientRef>,
}

impl SplitRequest {
    /// Build a request from parsed `split-window` arguments
    pub fn from_args(args: &Args, client: Option<ClientRef>) -> Result<Self, SizeError> {
        let direction = if args.has('h') {
            SplitDirection::Horizontal
        } else {
            SplitDirection::Vertical
        };
        let size = SizeSpec::from_args(args.get('l'), args.get('p'))?;

        let mut environment = Environ::new();
        for entry in args.all('e') {
            environ_put(&mut environment, entry);
        }

        let print = if args.has('P') {
            Some(args.get('F').unwrap_or(SPLIT_WINDOW_TEMPLATE).to_string())
        } else {
            None
        };

        Ok(Self {
            direction,
            size,
            flags: SplitFlags {
                before: args.has('b'),
                full_size: args.has('f'),
                start_empty: false,
                detached: args.has('d'),
                zoom: args.has('Z'),
            },
            input: args.has('I'),
            command: args.values().to_vec(),
            environment,
            cwd: args.get('c').map(PathBuf::from),
            print,
            client,
        })
    }
}

#[derive(Error, Debug)]
pub enum SplitError {
    #[error(transparent)]
    InvalidSize(#[from] SizeError),

    #[error("can't find pane %{0}")]
    UnknownTarget(PaneId),

    #[error(transparent)]
    NoSpace(LayoutError),

    #[error("create pane failed: {0}")]
    SpawnFailed(SpawnError),

    #[error(transparent)]
    InputModeFailed(InputError),
}

/// Result of a split that went through
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitOutcome {
    /// The new pane is running
    Ready(FindState),
    /// The new pane is waiting for the client's input
    Pending(FindState),
}

impl SplitOutcome {
    pub fn state(&self) -> FindState {
        match *self {
            SplitOutcome::Ready(state) | SplitOutcome::Pending(state) => state,
        }
    }
}

/// Holds a freshly split cell until its pane is confirmed
///
/// Dropping an uncommitted guard detaches and removes the pane (if one was
/// attached) and closes the cell.
struct CellGuard<'h, H: SplitHost + ?Sized> {
    host: &'h mut H,
    cell: CellRef,
    pane: Option<PaneId>,
    armed: bool,
}

impl<'h, H: SplitHost + ?Sized> CellGuard<'h, H> {
    fn new(host: &'h mut H, cell: CellRef) -> Self {
        Self {
            host,
            cell,
            pane: None,
            armed: true,
        }
    }

    fn commit(mut self) {
        self.armed = false;
    }
}

impl<H: SplitHost + ?Sized> Deref for CellGuard<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        &*self.host
    }
}

impl<H: SplitHost + ?Sized> DerefMut for CellGuard<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        &mut *self.host
    }
}

impl<H: SplitHost + ?Sized> Drop for CellGuard<'_, H> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!(
            "rolling back split: cell {} in @{} (pane {:?})",
            self.cell.cell, self.cell.window, self.pane
        );
        if let Some(pane) = self.pane {
            self.host.detach_pane(pane);
        }
        self.host.close(self.cell);
        if let Some(pane) = self.pane {
            self.host.remove_pane(pane);
        }
    }
}

/// Runs one split against a host and reports to a pipeline
pub struct SplitOrchestrator<'a, H: SplitHost + ?Sized, P: CommandPipeline + ?Sized> {
    host: &'a mut H,
    pipeline: &'a mut P,
}

impl<'a, H: SplitHost + ?Sized, P: CommandPipeline + ?Sized> SplitOrchestrator<'a, H, P> {
    pub fn new(host: &'a mut H, pipeline: &'a mut P) -> Self {
        Self { host, pipeline }
    }

    /// Split `target` as `request` asks
    ///
    /// Unless the split is detached, `current` is moved to the new pane.
    pub fn execute(
        &mut self,
        target: &FindState,
        request: SplitRequest,
        current: &mut FindState,
    ) -> Result<SplitOutcome, SplitError> {
        let (width, height) = self
            .host
            .pane_size(target.pane)
            .ok_or(SplitError::UnknownTarget(target.pane))?;
        let size = size::resolve(&request.size, request.direction, width, height)?;
        debug!(
            "split %{} {:?}: size {:?} of {}x{}",
            target.pane, request.direction, size, width, height
        );

        let zoomed = self.host.push_zoom(target.window);

        let input = request.input && request.command.is_empty();
        let mut flags = request.flags;
        flags.start_empty = input || matches!(request.command.as_slice(), [only] if only.is_empty());

        let cell = match self
            .host
            .split(target.pane, request.direction, size, flags.layout_options())
        {
            Ok(cell) => cell,
            Err(e) => {
                self.host.pop_zoom(target.window, zoomed.is_some());
                return Err(SplitError::NoSpace(e));
            }
        };

        let spawn = SpawnRequest {
            session: target.session,
            window: target.window,
            target: target.pane,
            cell: cell.cell,
            command: request.command,
            environment: request.environment,
            cwd: request.cwd,
            flags,
        };

        let mut guard = CellGuard::new(&mut *self.host, cell);
        let pane = match guard.spawn(&spawn) {
            Ok(pane) => pane,
            Err(e) => {
                drop(guard);
                self.host.pop_zoom(target.window, zoomed.is_some());
                return Err(SplitError::SpawnFailed(e));
            }
        };
        guard.pane = Some(pane);
        if input {
            if let Err(e) = guard.start_input(pane, request.client.as_ref()) {
                drop(guard);
                self.host.pop_zoom(target.window, zoomed.is_some());
                return Err(SplitError::InputModeFailed(e));
            }
        }
        guard.commit();

        let state = self.host.find_pane(pane).unwrap_or(FindState { pane, ..*target });
        if !flags.detached {
            self.host.select_pane(target.window, pane);
            *current = state;
        }

        self.host.pop_zoom(target.window, flags.zoom || zoomed.is_some());
        self.host.redraw_window(target.window);
        self.host.status_session(target.session);

        if let Some(ref template) = request.print {
            let context = self.host.format_context(&state);
            let line = self.pipeline.format(template, &context);
            self.pipeline.print(line);
        }

        self.pipeline.insert_hook(AFTER_SPLIT_WINDOW, state);

        if input {
            Ok(SplitOutcome::Pending(state))
        } else {
            Ok(SplitOutcome::Ready(state))
        }
    }
}

fn exec(server: &mut Server, queue: &mut CommandQueue, ctx: &mut CommandContext, args: &Args) -> CmdReturn {
    let target = match find_target(server, args.get('t').unwrap_or(""), &ctx.current) {
        Ok(target) => target,
        Err(e) => {
            queue.error(e.to_string());
            return CmdReturn::Error;
        }
    };
    let request = match SplitRequest::from_args(args, ctx.client.clone()) {
        Ok(request) => request,
        Err(e) => {
            queue.error(e.to_string());
            return CmdReturn::Error;
        }
    };

    let mut orchestrator = SplitOrchestrator::new(server, queue);
    match orchestrator.execute(&target, request, &mut ctx.current) {
        Ok(outcome) => {
            let state = outcome.state();
            if let SplitOutcome::Pending(_) = outcome {
                info!("split %{} into %{} (waiting for input)", target.pane, state.pane);
                ctx.waiting = Some(state.pane);
                return CmdReturn::Wait;
            }
            info!("split %{} into %{}", target.pane, state.pane);
            CmdReturn::Normal
        }
        Err(e) => {
            queue.error(e.to_string());
            CmdReturn::Error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::format::FormatContext;
    use crate::cmd::host::{Addressing, LayoutGateway, SpawnGateway, WindowControl};
    use crate::wm::spawn::FailingSpawner;
    use crate::wm::{NullSpawner, SessionId, SplitOptions, WindowId};

    /// Counts the calls the orchestrator makes on a real server
    struct Recording {
        server: Server,
        splits: usize,
        spawns: usize,
        closes: usize,
        removes: usize,
    }

    impl Recording {
        fn new(server: Server) -> Self {
            Self {
                server,
                splits: 0,
                spawns: 0,
                closes: 0,
                removes: 0,
            }
        }
    }

    impl LayoutGateway for Recording {
        fn pane_size(&self, pane: PaneId) -> Option<(u32, u32)> {
            self.server.pane_size(pane)
        }

        fn split(
            &mut self,
            pane: PaneId,
            direction: SplitDirection,
            size: Option<u32>,
            options: SplitOptions,
        ) -> Result<CellRef, LayoutError> {
            self.splits += 1;
            self.server.split(pane, direction, size, options)
        }

        fn close(&mut self, cell: CellRef) {
            self.closes += 1;
            self.server.close(cell)
        }
    }

    impl SpawnGateway for Recording {
        fn spawn(&mut self, request: &SpawnRequest) -> Result<PaneId, SpawnError> {
            self.spawns += 1;
            self.server.spawn(request)
        }

        fn start_input(&mut self, pane: PaneId, client: Option<&ClientRef>) -> Result<(), InputError> {
            self.server.start_input(pane, client)
        }

        fn detach_pane(&mut self, pane: PaneId) {
            self.server.detach_pane(pane)
        }

        fn remove_pane(&mut self, pane: PaneId) {
            self.removes += 1;
            self.server.remove_pane(pane)
        }
    }

    impl WindowControl for Recording {
        fn push_zoom(&mut self, window: WindowId) -> Option<PaneId> {
            self.server.push_zoom(window)
        }

        fn pop_zoom(&mut self, window: WindowId, zoom: bool) {
            self.server.pop_zoom(window, zoom)
        }

        fn select_pane(&mut self, window: WindowId, pane: PaneId) {
            self.server.select_pane(window, pane)
        }

        fn redraw_window(&mut self, window: WindowId) {
            self.server.redraw_window(window)
        }

        fn status_session(&mut self, session: SessionId) {
            self.server.status_session(session)
        }
    }

    impl Addressing for Recording {
        fn find_pane(&self, pane: PaneId) -> Option<FindState> {
            self.server.find_pane(pane)
        }

        fn format_context(&self, state: &FindState) -> FormatContext {
            self.server.format_context(state)
        }
    }

    fn setup(width: u32, height: u32) -> (Recording, FindState) {
        let mut server = Server::new(Box::new(NullSpawner));
        let first = server.create_session(Some("work"), width, height).unwrap();
        (Recording::new(server), first)
    }

    fn run(
        host: &mut Recording,
        queue: &mut CommandQueue,
        target: FindState,
        request: SplitRequest,
    ) -> (Result<SplitOutcome, SplitError>, FindState) {
        let mut current = target;
        let result = SplitOrchestrator::new(host, queue).execute(&target, request, &mut current);
        (result, current)
    }

    fn layout_of(host: &Recording, window: WindowId) -> (String, usize) {
        let window = host.server.window(window).unwrap();
        (window.layout.to_string(), window.layout.cell_count())
    }

    #[test]
    fn test_percentage_split_sizes_new_pane() {
        let (mut host, first) = setup(80, 24);
        let mut queue = CommandQueue::new();
        let request = SplitRequest {
            size: SizeSpec::Percentage("30".into()),
            ..Default::default()
        };

        let (result, current) = run(&mut host, &mut queue, first, request);
        let state = result.unwrap().state();
        assert_eq!(current, state);
        assert_eq!(host.server.pane_size(state.pane), Some((80, 7)));
        assert_eq!(host.server.pane_size(first.pane), Some((80, 16)));
        assert_eq!(host.server.window(first.window).unwrap().active_pane, state.pane);
        assert_eq!(host.server.take_dirty(), (vec![first.window], vec![first.session]));
    }

    #[test]
    fn test_invalid_size_touches_nothing() {
        let (mut host, first) = setup(80, 24);
        let mut queue = CommandQueue::new();
        let before = layout_of(&host, first.window);
        let request = SplitRequest {
            size: SizeSpec::Absolute("ten".into()),
            ..Default::default()
        };

        let (result, current) = run(&mut host, &mut queue, first, request);
        let err = result.unwrap_err();
        assert!(matches!(err, SplitError::InvalidSize(SizeError::Invalid { .. })));
        assert_eq!(err.to_string(), "lines invalid");
        assert_eq!((host.splits, host.spawns), (0, 0));
        assert_eq!(layout_of(&host, first.window), before);
        assert_eq!(current, first);
        assert_eq!(queue.pending_hooks(), 0);
    }

    #[test]
    fn test_no_space_leaves_window_unchanged() {
        let (mut host, first) = setup(80, 2);
        let mut queue = CommandQueue::new();
        let before = layout_of(&host, first.window);

        let (result, _) = run(&mut host, &mut queue, first, SplitRequest::default());
        let err = result.unwrap_err();
        assert!(matches!(err, SplitError::NoSpace(LayoutError::NoSpace)));
        assert_eq!(err.to_string(), "no space for new pane");
        assert_eq!(host.spawns, 0);
        assert_eq!(layout_of(&host, first.window), before);
        assert_eq!(host.server.window(first.window).unwrap().panes.len(), 1);
    }

    #[test]
    fn test_spawn_failure_restores_layout() {
        let (mut host, first) = setup(80, 24);
        let mut queue = CommandQueue::new();
        let (second, _) = run(&mut host, &mut queue, first, SplitRequest::default());
        let second = second.unwrap().state();

        let before = layout_of(&host, first.window);
        host.server.set_spawner(Box::new(FailingSpawner("fork failed".into())));
        let request = SplitRequest {
            direction: SplitDirection::Horizontal,
            command: vec!["top".into()],
            ..Default::default()
        };
        let (result, current) = run(&mut host, &mut queue, second, request);

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "create pane failed: failed to open pty: fork failed");
        assert_eq!(layout_of(&host, first.window), before);
        assert_eq!(host.server.window(first.window).unwrap().panes.len(), 2);
        assert_eq!(host.closes, 1);
        assert_eq!(current, second);
    }

    #[test]
    fn test_detached_split_keeps_current() {
        let (mut host, first) = setup(80, 24);
        let mut queue = CommandQueue::new();
        let request = SplitRequest {
            flags: SplitFlags { detached: true, ..Default::default() },
            ..Default::default()
        };

        let (result, current) = run(&mut host, &mut queue, first, request);
        assert!(result.is_ok());
        assert_eq!(current, first);
        assert_eq!(host.server.window(first.window).unwrap().active_pane, first.pane);
    }

    #[test]
    fn test_input_capture_is_pending() {
        let (mut host, first) = setup(80, 24);
        let mut queue = CommandQueue::new();
        let request = SplitRequest {
            input: true,
            client: Some(ClientRef::detached("cli")),
            ..Default::default()
        };

        let (result, _) = run(&mut host, &mut queue, first, request);
        let SplitOutcome::Pending(state) = result.unwrap() else {
            panic!("expected a pending split");
        };
        let pane = host.server.window(state.window).unwrap().pane(state.pane).unwrap();
        assert!(pane.is_empty());

        host.server.finish_input(state.pane, b"hello\n").unwrap();
        let pane = host.server.window(state.window).unwrap().pane(state.pane).unwrap();
        assert_eq!(pane.contents, b"hello\n");
    }

    #[test]
    fn test_input_with_command_runs_normally() {
        let (mut host, first) = setup(80, 24);
        let mut queue = CommandQueue::new();
        let request = SplitRequest {
            input: true,
            command: vec!["cat".into()],
            ..Default::default()
        };

        let (result, _) = run(&mut host, &mut queue, first, request);
        assert!(matches!(result.unwrap(), SplitOutcome::Ready(_)));
    }

    #[test]
    fn test_input_failure_rolls_back() {
        let (mut host, first) = setup(80, 24);
        let mut queue = CommandQueue::new();
        let before = layout_of(&host, first.window);
        let attached = ClientRef {
            session: Some(first.session),
            ..ClientRef::detached("tty")
        };
        let request = SplitRequest {
            input: true,
            client: Some(attached),
            ..Default::default()
        };

        let (result, current) = run(&mut host, &mut queue, first, request);
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "client already attached");
        assert_eq!(layout_of(&host, first.window), before);
        assert_eq!(host.removes, 1);
        assert_eq!(host.server.window(first.window).unwrap().panes.len(), 1);
        assert_eq!(current, first);

        let request = SplitRequest {
            input: true,
            ..Default::default()
        };
        let (result, _) = run(&mut host, &mut queue, first, request);
        assert_eq!(result.unwrap_err().to_string(), "no client");
        assert_eq!(layout_of(&host, first.window), before);
    }

    #[test]
    fn test_empty_string_command_starts_empty() {
        let (mut host, first) = setup(80, 24);
        let mut queue = CommandQueue::new();
        let request = SplitRequest {
            command: vec![String::new()],
            ..Default::default()
        };

        let (result, _) = run(&mut host, &mut queue, first, request);
        let state = result.unwrap().state();
        let pane = host.server.window(state.window).unwrap().pane(state.pane).unwrap();
        assert!(pane.is_empty());
    }

    #[test]
    fn test_zoom_follows_active_pane() {
        let (mut host, first) = setup(80, 24);
        let mut queue = CommandQueue::new();
        let across = || SplitRequest {
            direction: SplitDirection::Horizontal,
            ..Default::default()
        };
        let (second, _) = run(&mut host, &mut queue, first, across());
        let second = second.unwrap().state();
        host.server.pop_zoom(first.window, true);
        assert_eq!(host.server.window(first.window).unwrap().zoomed_pane_id(), Some(second.pane));

        // A plain split of the zoomed pane moves the zoom to the new active pane
        let (third, _) = run(&mut host, &mut queue, second, across());
        let third = third.unwrap().state();
        let window = host.server.window(first.window).unwrap();
        assert_eq!(window.active_pane, third.pane);
        assert_eq!(window.zoomed_pane_id(), Some(third.pane));
        assert_eq!(host.server.pane_size(third.pane), Some((80, 24)));

        let detached = SplitRequest {
            flags: SplitFlags { zoom: true, detached: true, ..Default::default() },
            ..across()
        };
        let (fourth, _) = run(&mut host, &mut queue, third, detached);
        let fourth = fourth.unwrap().state();
        let window = host.server.window(first.window).unwrap();
        assert_eq!(window.active_pane, third.pane);
        assert_eq!(window.zoomed_pane_id(), Some(third.pane));
        assert_ne!(host.server.pane_size(fourth.pane), Some((80, 24)));

        let zoomed = SplitRequest {
            flags: SplitFlags { zoom: true, ..Default::default() },
            ..across()
        };
        let (fifth, _) = run(&mut host, &mut queue, third, zoomed);
        let fifth = fifth.unwrap().state();
        let window = host.server.window(first.window).unwrap();
        assert_eq!(window.active_pane, fifth.pane);
        assert_eq!(window.zoomed_pane_id(), Some(fifth.pane));
        assert_eq!(host.server.pane_size(fifth.pane), Some((80, 24)));
    }

    #[test]
    fn test_zoom_restored_after_failure() {
        let (mut host, first) = setup(80, 24);
        let mut queue = CommandQueue::new();
        let (second, _) = run(&mut host, &mut queue, first, SplitRequest::default());
        let second = second.unwrap().state();
        host.server.pop_zoom(first.window, true);

        host.server.set_spawner(Box::new(FailingSpawner("no pty".into())));
        let (result, _) = run(&mut host, &mut queue, second, SplitRequest::default());
        assert!(result.is_err());
        let window = host.server.window(first.window).unwrap();
        assert_eq!(window.zoomed_pane_id(), Some(second.pane));
        assert_eq!(window.active_pane, second.pane);
    }

    #[test]
    fn test_input_failure_keeps_active_and_last_pane() {
        let (mut host, first) = setup(80, 24);
        let mut queue = CommandQueue::new();
        let (second, _) = run(&mut host, &mut queue, first, SplitRequest::default());
        let second = second.unwrap().state();
        let window = host.server.window(first.window).unwrap();
        assert_eq!((window.active_pane, window.last_pane), (second.pane, Some(first.pane)));

        let request = SplitRequest {
            input: true,
            client: Some(ClientRef {
                session: Some(first.session),
                ..ClientRef::detached("tty")
            }),
            ..Default::default()
        };
        let (result, current) = run(&mut host, &mut queue, second, request);
        assert!(matches!(result, Err(SplitError::InputModeFailed(InputError::ClientAttached))));
        assert_eq!(current, second);

        let window = host.server.window(first.window).unwrap();
        assert_eq!(window.active_pane, second.pane);
        assert_eq!(window.last_pane, Some(first.pane));
        assert_eq!(window.pane_order, vec![first.pane, second.pane]);
    }

    #[test]
    fn test_print_and_hook() {
        let (mut host, first) = setup(80, 24);
        let mut queue = CommandQueue::new();
        let request = SplitRequest {
            print: Some(SPLIT_WINDOW_TEMPLATE.to_string()),
            ..Default::default()
        };

        let (result, _) = run(&mut host, &mut queue, first, request);
        let state = result.unwrap().state();
        assert_eq!(queue.take_output(), vec!["work:0.1".to_string()]);

        let hook = queue.next_hook().unwrap();
        assert_eq!(hook.name, AFTER_SPLIT_WINDOW);
        assert_eq!(hook.state, state);
    }

    #[test]
    fn test_third_pane_spawn_failure_leaves_two() {
        let (mut host, first) = setup(80, 24);
        let mut queue = CommandQueue::new();
        let (second, _) = run(&mut host, &mut queue, first, SplitRequest::default());
        assert!(second.is_ok());

        host.server.set_spawner(Box::new(FailingSpawner("boom".into())));
        let (result, _) = run(&mut host, &mut queue, first, SplitRequest::default());
        assert!(matches!(result, Err(SplitError::SpawnFailed(_))));
        assert_eq!(host.server.window(first.window).unwrap().panes.len(), 2);
        assert_eq!(host.server.window(first.window).unwrap().layout.cell_count(), 3);
    }

    #[test]
    fn test_request_from_args() {
        let argv: Vec<String> = ["-dhPb", "-l", "30%", "-e", "A=1", "-e", "junk", "-c", "/tmp", "vim", "x"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let args = Args::parse(ENTRY.template, &argv).unwrap();
        let request = SplitRequest::from_args(&args, None).unwrap();

        assert_eq!(request.direction, SplitDirection::Horizontal);
        assert_eq!(request.size, SizeSpec::Percentage("30".into()));
        assert!(request.flags.detached && request.flags.before);
        assert!(!request.flags.full_size && !request.flags.zoom);
        assert_eq!(request.environment.len(), 1);
        assert_eq!(request.cwd, Some(PathBuf::from("/tmp")));
        assert_eq!(request.print.as_deref(), Some(SPLIT_WINDOW_TEMPLATE));
        assert_eq!(request.command, vec!["vim".to_string(), "x".to_string()]);

        let argv: Vec<String> = ["-l", "5", "-p", "5"].iter().map(|s| s.to_string()).collect();
        let args = Args::parse(ENTRY.template, &argv).unwrap();
        assert!(matches!(SplitRequest::from_args(&args, None), Err(SizeError::Conflict)));
    }
}
