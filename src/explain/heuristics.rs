//! Offline explanations: canned remediation text chosen by pattern.
//!
//! Always produces a result, so an explanation is available with no network
//! and no configured model.

use regex::Regex;
use std::sync::OnceLock;

const NODE_INVALID_TOKEN: &str = "\
Node.js could not parse one of your files: it hit a character that is not valid JavaScript.

1. Open the file and line shown in the stack trace and look for stray characters, \
smart quotes or an unclosed string or template literal.
2. If the file is TypeScript or JSX, make sure it is compiled or run through a loader \
instead of being executed by plain `node`.
3. Check that the file is saved as UTF-8 and does not start with a byte-order mark.
4. Run `node --check <file>` to confirm the syntax error is gone.";

const PYTHON_TRACEBACK: &str = "\
Python raised an exception. The last line of the traceback names the exception and \
the frame just above it is where it was raised.

1. Read the final `ExceptionType: message` line to see what went wrong.
2. Open the last `File \"...\", line N` entry that points into your own code.
3. Inspect the values used on that line (print them or use `breakpoint()`).
4. Fix the input or add handling for the failing case, then rerun.";

const UNDEFINED_PROPERTY: &str = "\
JavaScript tried to read a property of `undefined`: an object you expected to exist \
was missing at runtime.

1. Find the expression on the failing line that is named in the message.
2. Trace where that value comes from (function argument, API response, array lookup).
3. Guard the access with optional chaining (`obj?.prop`) or an explicit check.
4. If the value comes from async code, make sure it is awaited before use.";

const COMPILER_ERROR: &str = "\
The compiler stopped on an error, so no output was produced.

1. Fix the first `error:` reported; later errors are often caused by it.
2. Check the file and line it names for missing declarations, includes or semicolons.
3. Make sure every header or module it mentions exists and is on the include path.
4. Rebuild and repeat until no errors remain.";

const GENERIC_FALLBACK: &str = "\
No specific rule matched this output yet.

1. Look at the last error line in the output; it usually names the failure.
2. Open the innermost file and line from your own code shown in the trace.
3. Search the exact error message together with the tool or library name.
4. Configure a language model (`llm.provider` in the config) for a tailored explanation.";

fn re_node_invalid_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"SyntaxError:\s*Invalid or unexpected token")
            .expect("re_node_invalid_token: pattern is valid and should always compile")
    })
}

fn re_undefined_property() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"Cannot read propert(?:y|ies)\b.*\bof undefined")
            .expect("re_undefined_property: pattern is valid and should always compile")
    })
}

/// Pick the canned explanation for a raw log. Rules are checked in fixed order.
pub fn explain_heuristically(log: &str) -> String {
    let text = if re_node_invalid_token().is_match(log) {
        NODE_INVALID_TOKEN
    } else if log.contains("Traceback (most recent call last)") {
        PYTHON_TRACEBACK
    } else if re_undefined_property().is_match(log) {
        UNDEFINED_PROPERTY
    } else if log.contains("error:") && log.contains("compilation terminated") {
        COMPILER_ERROR
    } else {
        GENERIC_FALLBACK
    };
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_invalid_token() {
        let text = explain_heuristically("/app/x.js:3\n  const a = ’x’;\nSyntaxError: Invalid or unexpected token");
        assert!(text.starts_with("Node.js could not parse"));
    }

    #[test]
    fn test_python_traceback() {
        let text = explain_heuristically("Traceback (most recent call last):\n  File \"a.py\", line 1\nKeyError: 'x'");
        assert!(text.starts_with("Python raised an exception"));
    }

    #[test]
    fn test_undefined_property_both_wordings() {
        for log in [
            "TypeError: Cannot read properties of undefined (reading 'id')",
            "TypeError: Cannot read property 'id' of undefined",
        ] {
            let text = explain_heuristically(log);
            assert!(text.starts_with("JavaScript tried to read"), "{log}");
        }
    }

    #[test]
    fn test_compiler_needs_both_markers() {
        let log = "main.c:1:10: fatal error: foo.h: No such file or directory\ncompilation terminated.";
        assert!(explain_heuristically(log).starts_with("The compiler stopped"));
        assert!(explain_heuristically("main.c:1:10: error: x").starts_with("No specific rule"));
    }

    #[test]
    fn test_rule_order_prefers_earlier_rules() {
        let log = "Traceback (most recent call last):\nTypeError: Cannot read properties of undefined";
        assert!(explain_heuristically(log).starts_with("Python raised an exception"));
    }

    #[test]
    fn test_fallback_for_empty_input() {
        assert!(explain_heuristically("").starts_with("No specific rule matched"));
    }
}
