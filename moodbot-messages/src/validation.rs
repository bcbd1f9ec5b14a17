//! Text protocol on the token validation link
//!
//! Each side sends a token as a decimal line and expects `True` (already used)
//! or `False` (not used) back.

use core::fmt::Write;

use heapless::String;

use crate::VerdictError;
use crate::token::Token;

/// Longest token line: 20 digits of u64 plus the newline
pub const TOKEN_LINE_LEN: usize = 21;

pub const USED: &str = "True";
pub const UNUSED: &str = "False";

/// Encode a token as a newline terminated decimal line
pub fn token_line(token: Token) -> String<TOKEN_LINE_LEN> {
    let mut line = String::new();
    // u64::MAX has 20 digits, so the line always fits
    let _ = writeln!(line, "{}", token.0);
    line
}

/// Parse a token line sent by the other controller
pub fn parse_token(line: &[u8]) -> Option<Token> {
    let text = core::str::from_utf8(line).ok()?;
    text.trim().parse::<u64>().ok().map(Token)
}

/// Encode the answer to a token line. The peer compares its read against the
/// bare word, so no terminator is sent; the reader ends the line on timeout.
pub fn verdict_line(used: bool) -> &'static str {
    if used { USED } else { UNUSED }
}

/// Parse the answer to a token line. `Ok(true)` means the token is already used.
pub fn parse_verdict(line: &[u8]) -> Result<bool, VerdictError> {
    let text = core::str::from_utf8(line).map_err(|_| VerdictError::NotText)?;
    match text.trim() {
        USED => Ok(true),
        UNUSED => Ok(false),
        _ => Err(VerdictError::Unrecognized),
    }
}
