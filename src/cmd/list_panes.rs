//! list-panes: print the panes of a window

use crate::cmd::host::Addressing;
use crate::wm::Server;

use super::args::Args;
use super::find::{find_target, FindState};
use super::queue::{CommandPipeline, CommandQueue};
use super::{CmdReturn, CommandContext, CommandEntry};

pub const ENTRY: CommandEntry = CommandEntry {
    name: "list-panes",
    alias: Some("lsp"),
    template: "F:t:",
    usage: "[-F format] [-t target-window]",
    exec,
};

const LIST_PANES_TEMPLATE: &str =
    "#{pane_index}: [#{pane_width}x#{pane_height}] #{pane_id}#{pane_active_marker}";

fn exec(server: &mut Server, queue: &mut CommandQueue, ctx: &mut CommandContext, args: &Args) -> CmdReturn {
    let target = match find_target(server, args.get('t').unwrap_or(""), &ctx.current) {
        Ok(target) => target,
        Err(e) => {
            queue.error(e.to_string());
            return CmdReturn::Error;
        }
    };
    let Some(window) = server.window(target.window) else {
        queue.error(format!("can't find window: @{}", target.window));
        return CmdReturn::Error;
    };

    let template = args.get('F').unwrap_or(LIST_PANES_TEMPLATE);
    for &pane in &window.pane_order {
        let state = FindState { pane, ..target };
        let mut context = server.format_context(&state);
        if pane == window.active_pane {
            context.add("pane_active_marker", " (active)");
        }
        let line = queue.format(template, &context);
        queue.print(line);
    }
    CmdReturn::Normal
}
