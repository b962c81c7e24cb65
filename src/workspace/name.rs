/// Characters tmux reserves in target syntax (`session:window.pane`)
const FORBIDDEN: [char; 2] = ['.', ':'];

/// Turn a directory basename into a usable tmux session name
///
/// `my.app` → `my_app`, `a:b` → `a_b`. Idempotent.
pub fn sanitize(raw: &str) -> String {
    raw.replace(FORBIDDEN, "_")
}
