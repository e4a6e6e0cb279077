//! Dispatch trace lines
//!
//! With tracing on, every dispatch cycle logs one line on the [`TRACE_TARGET`] target:
//!
//! ```text
//! start init: decimal number '100' at 0 -> add_token -> init
//! ```

use crate::lexing::Token;
use std::fmt;

/// Log target of dispatch trace lines
pub const TRACE_TARGET: &str = "asmfsm::trace";

#[derive(Debug, Clone, Copy)]
pub struct TraceLine<'a> {
    pub machine: &'a str,
    pub state: &'a str,
    pub token: &'a Token,
    pub action: &'a str,
    /// None when the dispatch ended the machine
    pub next: Option<&'a str>,
}

impl fmt::Display for TraceLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} -> {} -> {}",
            self.machine,
            self.state,
            self.token,
            self.action,
            self.next.unwrap_or("done")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexing::TokenKind;

    #[test]
    fn test_trace_format() {
        let number = Token::new(TokenKind::Decimal, "100", 0..3);
        let comma = Token::new(TokenKind::Comma, ",", 3..4);
        let end = Token::new(TokenKind::EndOfStatement, "", 11..11);
        let lines = [
            TraceLine {
                machine: "start",
                state: "init",
                token: &number,
                action: "add_token",
                next: Some("init"),
            },
            TraceLine {
                machine: "start",
                state: "init",
                token: &comma,
                action: "start_done",
                next: Some("region"),
            },
            TraceLine {
                machine: "start",
                state: "end",
                token: &end,
                action: "end",
                next: None,
            },
        ];
        let rendered: Vec<String> = lines.iter().map(ToString::to_string).collect();

        insta::assert_snapshot!(rendered.join("\n"), @r###"
        start init: decimal number '100' at 0 -> add_token -> init
        start init: comma ',' at 3 -> start_done -> region
        start end: end of statement at 11 -> end -> done
        "###);
    }
}
