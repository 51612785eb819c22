/// Per-user execution/debug controller owned by the embedded interpreter.
///
/// The bridge only forwards verbs; suspension, stepping and frame capture
/// happen on the interpreter side, which reports back through the
/// service's `paused`/`resumed` entry points.
pub trait DebugController: Send + Sync {
    fn set_breakpoint(&self, url: &str, row: u32);
    fn clear_breakpoint(&self, url: &str, row: u32);
    fn step_into(&self);
    fn step_over(&self);
    fn continue_execution(&self);
    fn pause_execution(&self);
    fn resume_execution(&self);
}
