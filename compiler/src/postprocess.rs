//! Post-processing pass over bundler output.
//!
//! Development JSX transforms pass the enclosing `this` as the sixth
//! "owner" argument of `jsxDEV` calls, e.g.
//! `jsxDEV("div", props, void 0, false, source, this)`. The bundle later runs
//! as a browser module where that `this` has no meaning, so the argument is
//! replaced with `undefined`.
//!
//! The bundle is scanned as JavaScript tokens, not as plain text: string,
//! template and regex literals and comments are skipped, and only a bare
//! `this` in the owner slot of a `jsxDEV(...)` call is rewritten. Every other
//! `this` (`forEach(fn, this)`, `"(that, this)"`, `createElement(p, null, this)`)
//! is left exactly as the bundler wrote it.

/// Element factory whose sixth argument is the debug owner.
const DEV_FACTORY: &[u8] = b"jsxDEV";

/// Number of top-level commas in a full `jsxDEV(type, props, key, isStatic, source, owner)` call.
const OWNER_COMMAS: usize = 5;

/// Words after which a `/` starts a regex literal rather than a division.
const REGEX_PREFIX_WORDS: &[&[u8]] = &[
    b"return", b"typeof", b"case", b"do", b"else", b"in", b"of", b"void", b"yield", b"await",
    b"delete", b"new", b"throw",
];

/// Replace the debug-owner `this` of every `jsxDEV` call with `undefined`.
pub fn strip_debug_owner(bundle: &str) -> String {
    if !bundle.contains("jsxDEV") {
        return bundle.to_string();
    }

    let mut owners = find_owner_args(bundle.as_bytes());
    if owners.is_empty() {
        return bundle.to_string();
    }
    owners.sort_unstable();

    let mut out = String::with_capacity(bundle.len() + owners.len() * 5);
    let mut last = 0;
    for start in owners {
        out.push_str(&bundle[last..start]);
        out.push_str("undefined");
        last = start + "this".len();
    }
    out.push_str(&bundle[last..]);
    out
}

/// One open bracket while scanning.
struct Frame {
    open: u8,
    /// `(` of a `jsxDEV` call.
    dev_factory: bool,
    /// `{` of a `${...}` inside a template literal.
    template_expr: bool,
    commas: usize,
    last_comma: Option<usize>,
}

impl Frame {
    fn new(open: u8) -> Self {
        Self {
            open,
            dev_factory: false,
            template_expr: false,
            commas: 0,
            last_comma: None,
        }
    }
}

/// Byte offsets of each `this` sitting in a `jsxDEV` owner slot.
fn find_owner_args(src: &[u8]) -> Vec<usize> {
    let mut owners = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    // Last significant byte of code, used to tell regex literals from division.
    let mut prev: u8 = 0;
    let mut prev_end = 0;
    let mut i = 0;

    while i < src.len() {
        let b = src[i];
        match b {
            b'"' | b'\'' => {
                i = skip_quoted(src, i);
                prev = b;
                continue;
            }
            b'`' => {
                match scan_template(src, i + 1) {
                    TemplateEnd::Closed(next) => i = next,
                    TemplateEnd::Expr(next) => {
                        let mut frame = Frame::new(b'{');
                        frame.template_expr = true;
                        stack.push(frame);
                        i = next;
                    }
                }
                prev = b'`';
                continue;
            }
            b'/' if src.get(i + 1) == Some(&b'/') => {
                i = src[i..].iter().position(|&c| c == b'\n').map_or(src.len(), |p| i + p);
                continue;
            }
            b'/' if src.get(i + 1) == Some(&b'*') => {
                i = find(src, i + 2, b"*/").map_or(src.len(), |p| p + 2);
                continue;
            }
            b'/' if starts_regex(src, prev, prev_end) => {
                i = skip_regex(src, i);
                prev = b'/';
                continue;
            }
            b'(' => {
                let mut frame = Frame::new(b'(');
                frame.dev_factory = callee_is_dev_factory(src, i);
                stack.push(frame);
            }
            b'[' | b'{' => stack.push(Frame::new(b)),
            b',' => {
                if let Some(top) = stack.last_mut() {
                    top.commas += 1;
                    top.last_comma = Some(i);
                }
            }
            b')' | b']' | b'}' => {
                let Some(frame) = stack.pop() else {
                    i += 1;
                    continue;
                };
                if frame.template_expr && b == b'}' {
                    match scan_template(src, i + 1) {
                        TemplateEnd::Closed(next) => i = next,
                        TemplateEnd::Expr(next) => {
                            stack.push(frame);
                            i = next;
                        }
                    }
                    prev = b'`';
                    prev_end = i;
                    continue;
                }
                if b == b')' && frame.open == b'(' && frame.dev_factory && frame.commas == OWNER_COMMAS {
                    if let Some(comma) = frame.last_comma {
                        if let Some(offset) = bare_this(&src[comma + 1..i]) {
                            owners.push(comma + 1 + offset);
                        }
                    }
                }
            }
            _ => {}
        }
        if !b.is_ascii_whitespace() {
            prev = b;
            prev_end = i + 1;
        }
        i += 1;
    }

    owners
}

enum TemplateEnd {
    /// Index just past the closing backtick.
    Closed(usize),
    /// Index just past a `${`.
    Expr(usize),
}

/// Scan template literal text starting at `i` (inside the literal).
fn scan_template(src: &[u8], mut i: usize) -> TemplateEnd {
    while i < src.len() {
        match src[i] {
            b'\\' => i += 2,
            b'`' => return TemplateEnd::Closed(i + 1),
            b'$' if src.get(i + 1) == Some(&b'{') => return TemplateEnd::Expr(i + 2),
            _ => i += 1,
        }
    }
    TemplateEnd::Closed(src.len())
}

/// Index just past the string literal opened at `start`.
fn skip_quoted(src: &[u8], start: usize) -> usize {
    let quote = src[start];
    let mut i = start + 1;
    while i < src.len() {
        match src[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    src.len()
}

/// Index just past the regex literal (and its flags) opened at `start`.
fn skip_regex(src: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    let mut in_class = false;
    while i < src.len() {
        match src[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b'[' => {
                in_class = true;
                i += 1;
            }
            b']' => {
                in_class = false;
                i += 1;
            }
            b'/' if !in_class => {
                i += 1;
                while i < src.len() && src[i].is_ascii_alphabetic() {
                    i += 1;
                }
                return i;
            }
            _ => i += 1,
        }
    }
    src.len()
}

/// A `/` is a regex literal after an operator, an opening bracket, or a
/// keyword like `return`; after a value it is division.
fn starts_regex(src: &[u8], prev: u8, prev_end: usize) -> bool {
    match prev {
        0 => true,
        b')' | b']' | b'}' | b'"' | b'\'' | b'`' => false,
        c if is_ident(c) => {
            let word = ident_before(src, prev_end);
            REGEX_PREFIX_WORDS.contains(&word)
        }
        _ => true,
    }
}

/// Whether the identifier right before the `(` at `paren` is `jsxDEV`.
fn callee_is_dev_factory(src: &[u8], paren: usize) -> bool {
    let mut end = paren;
    while end > 0 && src[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    ident_before(src, end) == DEV_FACTORY
}

/// Identifier ending at `end` (exclusive).
fn ident_before(src: &[u8], end: usize) -> &[u8] {
    let mut start = end;
    while start > 0 && is_ident(src[start - 1]) {
        start -= 1;
    }
    &src[start..end]
}

/// Offset of `this` if `arg` is exactly `this` surrounded by whitespace.
fn bare_this(arg: &[u8]) -> Option<usize> {
    let start = arg.iter().position(|c| !c.is_ascii_whitespace())?;
    let end = arg.iter().rposition(|c| !c.is_ascii_whitespace())? + 1;
    (&arg[start..end] == b"this").then_some(start)
}

fn is_ident(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'$' || c >= 0x80
}

fn find(src: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    src.get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| from + p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_owner_argument() {
        let input = r#"jsxDEV("div", { children: "hi" }, void 0, false, { fileName: "a.tsx" }, this)"#;
        let output = strip_debug_owner(input);
        assert!(output.ends_with(", undefined)"));
        assert!(!output.contains("this"));
    }

    #[test]
    fn test_handles_multiline_and_nested_calls() {
        let input = "jsxDEV(App, { children: jsxDEV(\"b\", {}, void 0, false, {},this) }, void 0, true, {},\n  this\n);";
        let output = strip_debug_owner(input);
        assert_eq!(
            output,
            "jsxDEV(App, { children: jsxDEV(\"b\", {}, void 0, false, {},undefined) }, void 0, true, {},\n  undefined\n);"
        );
    }

    #[test]
    fn test_member_call_is_patched() {
        let input = "import_runtime.jsxDEV(\"p\", {}, void 0, false, {}, this)";
        assert_eq!(
            strip_debug_owner(input),
            "import_runtime.jsxDEV(\"p\", {}, void 0, false, {}, undefined)"
        );
    }

    #[test]
    fn test_leaves_string_contents_alone() {
        let input = r#"jsxDEV("p", { children: "Pick one (that, this)" }, void 0, false, {}, this)"#;
        let output = strip_debug_owner(input);
        assert!(output.contains(r#""Pick one (that, this)""#));
        assert!(output.ends_with("{}, undefined)"));

        let template = "jsxDEV(\"p\", { children: `a ${f(x, this)} (b, this)` }, void 0, false, {}, this)";
        let output = strip_debug_owner(template);
        assert!(output.contains("`a ${f(x, this)} (b, this)`"));
        assert!(output.ends_with("{}, undefined)"));
    }

    #[test]
    fn test_leaves_non_owner_this_alone() {
        let input = "import { jsxDEV } from \"react/jsx-dev-runtime\";\n\
            items.forEach(fn, this);\n\
            el.addEventListener(\"click\", this);\n\
            jsx(\"p\", {}, this);\n\
            createElement(\"p\", null, this);\n\
            jsxDEV(\"p\", {}, this);\n\
            f(a, this.state); g(thisArg); k(a, othis);\n";
        assert_eq!(strip_debug_owner(input), input);
    }

    #[test]
    fn test_comments_and_regexes_skipped() {
        let input = "// jsxDEV(a, b, c, d, e, this)\n\
            /* jsxDEV(a, b, c, d, e, this) */\n\
            const re = /[(]\\)/g; const half = total / 2;\n\
            jsxDEV(\"p\", {}, void 0, false, {}, this);";
        let output = strip_debug_owner(input);
        assert!(output.starts_with("// jsxDEV(a, b, c, d, e, this)\n/* jsxDEV(a, b, c, d, e, this) */"));
        assert!(output.contains("/[(]\\)/g"));
        assert!(output.ends_with("{}, undefined);"));
    }

    #[test]
    fn test_without_dev_factory_is_untouched() {
        let input = "x(a,this); y(\"(b, this)\")";
        assert_eq!(strip_debug_owner(input), input);
    }
}
