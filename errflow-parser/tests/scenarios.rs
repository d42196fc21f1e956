//! End-to-end parsing scenarios over realistic terminal captures.

use errflow_parser::{ErrorFlow, Frame, MAX_FLOW_FRAMES, parse_log, render_chain, render_diagram};

fn frame(label: &str, file: &str, line: u32, column: Option<u32>) -> Frame {
    Frame {
        label: label.to_string(),
        file: file.to_string(),
        line,
        column,
    }
}

#[test]
fn node_trace_becomes_causal_flow() {
    let log = "at stepThree (stepThree.js:12:5)\n\
               at stepTwo (stepTwo.js:8:3)\n\
               TypeError: Cannot read properties of undefined (reading 'value')";
    let flow = parse_log(log);

    assert_eq!(
        flow.frames,
        vec![
            frame("stepTwo line 8", "stepTwo.js", 8, Some(3)),
            frame("stepThree line 12, col 5", "stepThree.js", 12, Some(5)),
        ]
    );
    assert_eq!(flow.error_type.as_deref(), Some("TypeError"));
    assert_eq!(
        flow.error_message.as_deref(),
        Some("Cannot read properties of undefined (reading 'value')")
    );
}

#[test]
fn duplicate_python_frames_collapse() {
    let flow = parse_log("File \"app.py\", line 10\nFile \"app.py\", line 10\nKeyError: 'x'");

    assert_eq!(flow.frames, vec![frame("app line 10", "app.py", 10, None)]);
    assert_eq!(flow.error_type.as_deref(), Some("KeyError"));
    assert_eq!(flow.error_message.as_deref(), Some("'x'"));
}

#[test]
fn node_internal_frames_are_skipped() {
    let flow = parse_log("    at require (node:internal/modules:100:5)");
    assert!(flow.frames.is_empty());
}

#[test]
fn unrecognized_log_renders_two_node_diagram() {
    let flow = parse_log("Compiling project...\nwaiting for changes\n\ndone in 3.2s");

    assert_eq!(flow, ErrorFlow::default());
    assert_eq!(render_chain(&flow), r#"Start([Run]) --> Error["Error"]"#);
}

#[test]
fn long_traces_are_capped_at_eight_frames() {
    let log: String = (1..=10)
        .map(|n| format!("    at fn{n} (src/mod{n}.js:{n}:1)\n"))
        .collect();
    let flow = parse_log(&log);

    assert_eq!(flow.frames.len(), MAX_FLOW_FRAMES);
    assert_eq!(flow.frames[0].file, "src/mod10.js");
    assert_eq!(flow.frames[7].file, "src/mod3.js");

    let chain = render_chain(&flow);
    assert_eq!(chain.split(" --> ").count(), 10);
    assert!(chain.contains(r#"F8["mod3 line 3, col 1"]"#));
    assert!(!chain.contains("F9"));
}

#[test]
fn ansi_colored_python_traceback() {
    let log = "\x1b[31mTraceback (most recent call last):\x1b[0m\r\n\
               \x20 File \"/srv/app/main.py\", line 20, in <module>\r\n\
               \x20   run()\r\n\
               \x20 File \"/srv/app/jobs.py\", line 7, in run\r\n\
               \x20   data[\"missing\"]\r\n\
               \x1b[1;31mKeyError\x1b[0m: 'missing'\r\n";
    let flow = parse_log(log);

    let files: Vec<&str> = flow.frames.iter().map(|f| f.file.as_str()).collect();
    assert_eq!(files, vec!["/srv/app/jobs.py", "/srv/app/main.py"]);
    assert_eq!(flow.error_type.as_deref(), Some("KeyError"));
    assert_eq!(flow.error_message.as_deref(), Some("'missing'"));
}

#[test]
fn rust_panic_with_generic_location() {
    let log = "thread 'main' panicked at src/config.rs:42:17:\n\
               called `Option::unwrap()` on a `None` value\n\
               note: run with `RUST_BACKTRACE=1` environment variable to display a backtrace";
    let flow = parse_log(log);

    assert_eq!(flow.frames, vec![frame("config line 42, col 17", "src/config.rs", 42, Some(17))]);
    assert_eq!(flow.error_type.as_deref(), Some("note"));
}

#[test]
fn compiler_errors_are_frames() {
    let log = "gcc -o app main.c\n\
               main.c: In function 'main':\n\
               main.c:5:3: error: 'y' undeclared (first use in this function)\n\
               compilation terminated.";
    let flow = parse_log(log);

    assert_eq!(flow.frames.len(), 1);
    assert_eq!(flow.frames[0].file, "main.c");
    assert_eq!(flow.frames[0].label, "main line 5, col 3");
}

#[test]
fn parsing_is_idempotent() {
    let log = "at a (a.js:1:2)\nat b (b.js:3:4)\nRangeError: Maximum call stack size exceeded";
    assert_eq!(parse_log(log), parse_log(log));
    assert_eq!(render_diagram(&parse_log(log)), render_diagram(&parse_log(log)));
}

#[test]
fn error_message_never_exceeds_80_chars() {
    let log = format!("ValueError: {}", "é".repeat(300));
    let flow = parse_log(&log);
    let message = flow.error_message.expect("message");
    assert_eq!(message.chars().count(), 80);
}

#[test]
fn flow_serializes_for_visualization() {
    let flow = parse_log("at main (index.js:3:1)\nError: boom");
    let json = serde_json::to_string(&flow).expect("serialize");
    assert_eq!(
        json,
        r#"{"errorType":"Error","errorMessage":"boom","frames":[{"label":"index line 3, col 1","file":"index.js","line":3,"column":1}]}"#
    );
}
