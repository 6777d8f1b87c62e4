//! Commands - Parsing, dispatch and the commands themselves

pub mod args;
pub mod find;
pub mod format;
pub mod host;
pub mod list_panes;
pub mod queue;
pub mod size;
pub mod split_window;

use tracing::{debug, warn};

use crate::wm::{PaneId, Server};

use self::args::Args;
use self::find::FindState;
use self::host::ClientRef;
use self::queue::CommandQueue;

/// How a command finished
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CmdReturn {
    Normal,
    Error,
    /// Finished, but the client must feed input before it is done
    Wait,
}

/// State shared by the commands of one invocation
#[derive(Clone, Debug)]
pub struct CommandContext {
    /// Pane the next command targets by default
    pub current: FindState,
    pub client: Option<ClientRef>,
    /// Pane left waiting for the client's input
    pub waiting: Option<PaneId>,
}

impl CommandContext {
    pub fn new(current: FindState, client: Option<ClientRef>) -> Self {
        Self {
            current,
            client,
            waiting: None,
        }
    }
}

type ExecFn = fn(&mut Server, &mut CommandQueue, &mut CommandContext, &Args) -> CmdReturn;

/// A command name, its flags and its implementation
pub struct CommandEntry {
    pub name: &'static str,
    pub alias: Option<&'static str>,
    pub template: &'static str,
    pub usage: &'static str,
    pub exec: ExecFn,
}

pub const COMMANDS: &[CommandEntry] = &[split_window::ENTRY, list_panes::ENTRY];

/// Find a command by name or alias
pub fn lookup(name: &str) -> Option<&'static CommandEntry> {
    COMMANDS
        .iter()
        .find(|entry| entry.name == name || entry.alias == Some(name))
}

/// Run a single command line (`argv[0]` is the command name)
pub fn execute(
    server: &mut Server,
    queue: &mut CommandQueue,
    ctx: &mut CommandContext,
    argv: &[String],
) -> CmdReturn {
    let Some((name, rest)) = argv.split_first() else {
        return CmdReturn::Normal;
    };
    let Some(entry) = lookup(name) else {
        queue.error(format!("unknown command: {}", name));
        return CmdReturn::Error;
    };
    let args = match Args::parse(entry.template, rest) {
        Ok(args) => args,
        Err(e) => {
            queue.error(format!("{}: {}", entry.name, e));
            queue.error(format!("usage: {} {}", entry.name, entry.usage));
            return CmdReturn::Error;
        }
    };
    debug!("running {} {:?}", entry.name, rest);
    (entry.exec)(server, queue, ctx, &args)
}

/// Split an argument list into commands at `;` separators
///
/// A trailing `;` on an argument (`splitw;`) also ends a command, and `\;`
/// is a literal semicolon.
pub fn split_commands(argv: &[String]) -> Vec<Vec<String>> {
    let mut commands = Vec::new();
    let mut current = Vec::new();

    for arg in argv {
        if arg == ";" {
            commands.push(std::mem::take(&mut current));
        } else if let Some(escaped) = arg.strip_suffix("\\;") {
            current.push(format!("{};", escaped));
        } else if let Some(head) = arg.strip_suffix(';') {
            if !head.is_empty() {
                current.push(head.to_string());
            }
            commands.push(std::mem::take(&mut current));
        } else {
            current.push(arg.clone());
        }
    }
    commands.push(current);
    commands.retain(|c| !c.is_empty());
    commands
}

/// Split a command line into words, honouring single and double quotes
pub fn parse_command_line(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some('"') if c == '\\' => {
                if let Some(next) = chars.next() {
                    word.push(next);
                }
            }
            Some(_) => word.push(c),
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    in_word = true;
                }
                '\\' => {
                    if let Some(next) = chars.next() {
                        word.push(next);
                    }
                    in_word = true;
                }
                c if c.is_whitespace() => {
                    if in_word {
                        words.push(std::mem::take(&mut word));
                        in_word = false;
                    }
                }
                c => {
                    word.push(c);
                    in_word = true;
                }
            },
        }
    }
    if in_word {
        words.push(word);
    }
    words
}

/// Hooks allowed to run from one invocation before giving up
const HOOK_LIMIT: usize = 100;

/// Run every queued hook, including hooks scheduled by hooks
///
/// Returns the number of hook commands that failed.
pub fn run_hooks(server: &mut Server, queue: &mut CommandQueue, client: Option<ClientRef>) -> usize {
    let mut ran = 0;
    let mut failed = 0;
    debug!("{} hooks queued", queue.pending_hooks());

    while let Some(hook) = queue.next_hook() {
        let lines = server.hook_commands(&hook.name).to_vec();
        for line in lines {
            if ran >= HOOK_LIMIT {
                warn!("hook limit reached, dropping {} and the rest", hook.name);
                while queue.next_hook().is_some() {}
                return failed;
            }
            ran += 1;

            let mut ctx = CommandContext::new(hook.state, client.clone());
            for argv in split_commands(&parse_command_line(&line)) {
                debug!("hook {}: {:?}", hook.name, argv);
                if execute(server, queue, &mut ctx, &argv) == CmdReturn::Error {
                    failed += 1;
                    break;
                }
            }
        }
    }
    failed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wm::NullSpawner;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn server() -> (Server, CommandContext) {
        let mut server = Server::new(Box::new(NullSpawner));
        let first = server.create_session(None, 80, 24).unwrap();
        (server, CommandContext::new(first, Some(ClientRef::detached("test"))))
    }

    #[test]
    fn test_split_commands() {
        let argv = words(&["splitw", "-h", ";", "lsp;", "splitw", "echo\\;"]);
        assert_eq!(
            split_commands(&argv),
            vec![
                words(&["splitw", "-h"]),
                words(&["lsp"]),
                words(&["splitw", "echo;"]),
            ]
        );
        assert!(split_commands(&words(&[";", ";"])).is_empty());
    }

    #[test]
    fn test_parse_command_line() {
        assert_eq!(
            parse_command_line(r#"splitw -c '/my dir' "echo \"hi\"" a\ b"#),
            words(&["splitw", "-c", "/my dir", "echo \"hi\"", "a b"])
        );
        assert_eq!(parse_command_line("  "), Vec::<String>::new());
        assert_eq!(parse_command_line("splitw ''"), words(&["splitw", ""]));
    }

    #[test]
    fn test_unknown_command_and_bad_flag() {
        let (mut server, mut ctx) = server();
        let mut queue = CommandQueue::new();

        assert_eq!(execute(&mut server, &mut queue, &mut ctx, &words(&["nope"])), CmdReturn::Error);
        assert_eq!(queue.take_errors(), vec!["unknown command: nope".to_string()]);

        assert_eq!(execute(&mut server, &mut queue, &mut ctx, &words(&["splitw", "-x"])), CmdReturn::Error);
        let errors = queue.take_errors();
        assert_eq!(errors[0], "split-window: unknown flag -x");
        assert!(errors[1].starts_with("usage: split-window [-bdefhIPvZ]"));
    }

    #[test]
    fn test_split_through_dispatch() {
        let (mut server, mut ctx) = server();
        let mut queue = CommandQueue::new();
        let first = ctx.current;

        let argv = words(&["splitw", "-P", "-F", "#{pane_id}", "-l", "30%"]);
        assert_eq!(execute(&mut server, &mut queue, &mut ctx, &argv), CmdReturn::Normal);
        assert_ne!(ctx.current, first);
        assert_eq!(queue.take_output(), vec![format!("%{}", ctx.current.pane)]);

        let argv = words(&["splitw", "-t", "%42"]);
        assert_eq!(execute(&mut server, &mut queue, &mut ctx, &argv), CmdReturn::Error);
        assert_eq!(queue.take_errors(), vec!["can't find pane: %42".to_string()]);

        let argv = words(&["splitw", "-l", "101%"]);
        assert_eq!(execute(&mut server, &mut queue, &mut ctx, &argv), CmdReturn::Error);
        assert_eq!(queue.take_errors(), vec!["percentage too large".to_string()]);
    }

    #[test]
    fn test_input_split_waits() {
        let (mut server, mut ctx) = server();
        let mut queue = CommandQueue::new();

        let argv = words(&["splitw", "-I"]);
        assert_eq!(execute(&mut server, &mut queue, &mut ctx, &argv), CmdReturn::Wait);
        assert_eq!(ctx.waiting, Some(ctx.current.pane));
    }

    #[test]
    fn test_hooks_run_configured_commands() {
        let (mut server, mut ctx) = server();
        server.set_hook("after-split-window", vec!["list-panes -F '#{pane_id}'".into()]);
        let mut queue = CommandQueue::new();

        let argv = words(&["splitw"]);
        assert_eq!(execute(&mut server, &mut queue, &mut ctx, &argv), CmdReturn::Normal);
        assert_eq!(run_hooks(&mut server, &mut queue, ctx.client.clone()), 0);
        assert_eq!(queue.take_output().len(), 2);
    }

    #[test]
    fn test_recursive_hooks_stop() {
        let (mut server, mut ctx) = server();
        server.set_hook("after-split-window", vec!["splitw -d -l 1".into()]);
        let mut queue = CommandQueue::new();

        execute(&mut server, &mut queue, &mut ctx, &words(&["splitw", "-d", "-l", "1"]));
        run_hooks(&mut server, &mut queue, None);
        assert_eq!(queue.pending_hooks(), 0);
    }
}
