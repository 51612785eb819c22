use crate::error::{BridgeError, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Wire format of a breakpoint id: `<url ending in .js>:<row>:<col>:`.
    /// The URL itself may contain colons, so the row/col/terminator are
    /// anchored at the end.
    static ref BREAKPOINT_ID: Regex =
        Regex::new(r"^(?P<url>.+\.js):(?P<row>\d+):(?P<col>\d+):$").expect("breakpoint id pattern");
}

/// A breakpoint id decoded back into its (url, row, col) parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireBreakpoint {
    pub url: String,
    pub row: u32,
    pub col: u32,
}

/// Decodes a wire breakpoint id. Ids that do not match the pattern yield
/// a structured error so the dispatcher can answer with a protocol error
/// instead of calling the controller with nonsense.
pub fn parse_breakpoint_id(raw: &str) -> Result<WireBreakpoint> {
    let captures = BREAKPOINT_ID
        .captures(raw)
        .ok_or_else(|| BridgeError::MalformedBreakpointId(raw.to_string()))?;

    let row = captures["row"]
        .parse()
        .map_err(|_| BridgeError::MalformedBreakpointId(raw.to_string()))?;
    let col = captures["col"]
        .parse()
        .map_err(|_| BridgeError::MalformedBreakpointId(raw.to_string()))?;

    Ok(WireBreakpoint {
        url: captures["url"].to_string(),
        row,
        col,
    })
}
