//! Text signals extracted from a code submission.
//!
//! Every signal is a keyword or pattern test over the raw text. The patterns are
//! the union across supported languages, so a Python keyword can fire on Java
//! code and vice versa. Loop nesting and recursion are approximations: nesting is
//! two or more raw `for` substrings, recursion is any `return name(` call.
//! Word boundaries and word characters are ASCII-only.

use std::sync::LazyLock;

use regex::Regex;

static FOR_KEYWORD: LazyLock<Regex> = LazyLock::new(|| compile(r"(?-u:\b)for(?-u:\b)"));
static WHILE_KEYWORD: LazyLock<Regex> = LazyLock::new(|| compile(r"(?-u:\b)while(?-u:\b)"));
static RETURN_CALL: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?-u:\b)return\s+(?-u:\w)+\s*\("));
static HASH_MAP: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)(?-u:\b)(map|hashmap|dict|\{\}|set|object)(?-u:\b)"));
static ARRAY: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\[\]|(?-u:\b)array(?-u:\b)|(?-u:\b)list(?-u:\b)"));
static FUNCTION: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)(?-u:\b)(def|function|=>|func|class|method)(?-u:\b)"));
static COMMENT: LazyLock<Regex> = LazyLock::new(|| compile(r#"//|/\*|#|"""|'''"#));
static DOCSTRING: LazyLock<Regex> = LazyLock::new(|| compile(r#"(?s)""".*?"""|'''.*?'''"#));
static ERROR_HANDLING: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)(?-u:\b)(try|catch|except|finally|throw|raise)(?-u:\b)"));
static VALIDATION: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)(?-u:\b)(if|validate|check|assert)(?-u:\b)"));
static CONSTANT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?-u:\b)(const|final|readonly|[A-Z_]{2,})(?-u:\b)"));
static RETURN_KEYWORD: LazyLock<Regex> = LazyLock::new(|| compile(r"(?-u:\b)return(?-u:\b)"));
static BREAK_CONTINUE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?-u:\b)(break|continue)(?-u:\b)"));
static BINARY_SEARCH: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)(?-u:\b)binary.?search(?-u:\b)"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static signal pattern compiles")
}

/// Boolean and count signals derived from a submission's text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signals {
    /// Number of non-blank lines.
    pub line_count: usize,
    /// Length in UTF-16 code units.
    pub char_length: usize,
    /// Occurrences of the `for` keyword.
    pub for_count: usize,
    /// Whether a `while` keyword is present.
    pub has_while: bool,
    /// Whether the raw substring `for` occurs at least twice.
    pub nested_loops: bool,
    /// Whether the code returns the result of a call.
    pub recursion: bool,
    /// Hash map, dict, set or object usage.
    pub hash_map: bool,
    /// Array or list usage.
    pub array: bool,
    /// Function, method or class definitions.
    pub has_functions: bool,
    /// Line or block comment markers.
    pub has_comments: bool,
    /// Closed triple-quoted docstring blocks.
    pub has_docstrings: bool,
    /// try/catch/except/finally/throw/raise.
    pub has_error_handling: bool,
    /// if/validate/check/assert.
    pub has_validation: bool,
    /// const/final/readonly or ALL_CAPS identifiers.
    pub has_constants: bool,
    /// More than one `return`.
    pub has_early_return: bool,
    /// break/continue usage.
    pub has_break_continue: bool,
    /// Any ASCII digit in the text.
    pub has_digits: bool,
    /// Hash map usage or a binary search.
    pub optimized_search: bool,
}

impl Signals {
    /// Whether any loop keyword was seen.
    pub fn has_loops(&self) -> bool {
        self.for_count > 0 || self.has_while
    }

    /// Whether any comment or docstring was seen.
    pub fn is_documented(&self) -> bool {
        self.has_comments || self.has_docstrings
    }
}

/// Scan source text and derive every signal in one pass per pattern.
pub fn extract_signals(code: &str) -> Signals {
    let hash_map = HASH_MAP.is_match(code);

    Signals {
        line_count: count_non_blank_lines(code),
        char_length: code.encode_utf16().count(),
        for_count: FOR_KEYWORD.find_iter(code).count(),
        has_while: WHILE_KEYWORD.is_match(code),
        nested_loops: code.matches("for").count() >= 2,
        recursion: RETURN_CALL.is_match(code),
        hash_map,
        array: ARRAY.is_match(code),
        has_functions: FUNCTION.is_match(code),
        has_comments: COMMENT.is_match(code),
        has_docstrings: DOCSTRING.is_match(code),
        has_error_handling: ERROR_HANDLING.is_match(code),
        has_validation: VALIDATION.is_match(code),
        has_constants: CONSTANT.is_match(code),
        has_early_return: RETURN_KEYWORD.is_match(code) && code.matches("return").count() >= 2,
        has_break_continue: BREAK_CONTINUE.is_match(code),
        has_digits: code.bytes().any(|byte| byte.is_ascii_digit()),
        optimized_search: hash_map || BINARY_SEARCH.is_match(code),
    }
}

fn count_non_blank_lines(code: &str) -> usize {
    code.split('\n')
        .filter(|line| !line.trim().is_empty())
        .count()
}

#[cfg(test)]
mod tests {
    use super::{Signals, extract_signals};

    #[test]
    fn empty_code_has_no_signals() {
        assert_eq!(extract_signals(""), Signals::default());
    }

    #[test]
    fn counts_only_non_blank_lines() {
        let signals = extract_signals("a = 1\n\n   \nb = 2\n");
        assert_eq!(signals.line_count, 2);
        assert_eq!(signals.char_length, 17);
    }

    #[test]
    fn nested_loops_uses_raw_substring_occurrences() {
        let nested = extract_signals("for i in a:\n  for j in b:\n    pass");
        assert_eq!(nested.for_count, 2);
        assert!(nested.nested_loops);

        let single = extract_signals("for i in a:\n  print(i)");
        assert_eq!(single.for_count, 1);
        assert!(!single.nested_loops);

        // "format" contains "for" and trips the crude counter.
        let crude = extract_signals("for x in xs:\n  print(format(x))");
        assert_eq!(crude.for_count, 1);
        assert!(crude.nested_loops);
    }

    #[test]
    fn recursion_matches_return_of_a_call() {
        assert!(extract_signals("return fib(n - 1) + fib(n - 2)").recursion);
        assert!(extract_signals("return helper (x)").recursion);
        assert!(!extract_signals("return x + 1").recursion);
    }

    #[test]
    fn hash_map_detection_is_case_insensitive() {
        assert!(extract_signals("let m = HashMap::new();").hash_map);
        assert!(extract_signals("seen = set()").hash_map);
        assert!(extract_signals("counts = DICT").hash_map);
        assert!(extract_signals("Map<String, Integer> m;").hash_map);
        assert!(!extract_signals("total = 0").hash_map);
    }

    #[test]
    fn optimized_search_includes_binary_search() {
        let signals = extract_signals("int idx = binarySearch(arr, key);");
        assert!(!signals.hash_map);
        assert!(signals.optimized_search);

        let spaced = extract_signals("def binary_search(items, target): pass");
        assert!(spaced.optimized_search);
    }

    #[test]
    fn detects_arrays_and_lists() {
        assert!(extract_signals("int[] values;").array);
        assert!(extract_signals("items = list(range(3))").array);
        assert!(extract_signals("const a = new Array(3)").array);
        assert!(!extract_signals("x = 1").array);
    }

    #[test]
    fn detects_quality_markers() {
        let code = "# add numbers\ndef add(a, b):\n    if a is None:\n        raise ValueError()\n    return a + b\n";
        let signals = extract_signals(code);
        assert!(signals.has_functions);
        assert!(signals.has_comments);
        assert!(signals.has_error_handling);
        assert!(signals.has_validation);
        assert!(!signals.has_constants);
        assert!(!signals.has_early_return);
    }

    #[test]
    fn docstrings_require_closed_blocks() {
        assert!(extract_signals("def f():\n    \"\"\"Doc.\"\"\"\n    pass").has_docstrings);
        assert!(!extract_signals("x = \"\"\"open").has_docstrings);
        assert!(extract_signals("x = \"\"\"open").has_comments);
    }

    #[test]
    fn constants_match_keywords_and_upper_case_names() {
        assert!(extract_signals("const limit = 3;").has_constants);
        assert!(extract_signals("MAX_SIZE = 10").has_constants);
        assert!(!extract_signals("Const x = 1").has_constants);
        assert!(!extract_signals("A = 1").has_constants);
    }

    #[test]
    fn early_return_needs_two_returns() {
        let code = "if x:\n    return 1\nreturn 2";
        let signals = extract_signals(code);
        assert!(signals.has_early_return);
        assert!(!extract_signals("return 1").has_early_return);
    }

    #[test]
    fn loop_helpers_combine_for_and_while() {
        let signals = extract_signals("while (i < n) { i++; continue; }");
        assert!(signals.has_loops());
        assert!(signals.has_break_continue);
        assert!(!signals.has_digits);
    }

    #[test]
    fn word_boundaries_and_length_are_ascii_oriented() {
        let signals = extract_signals("\u{e9}for x in y: pass\nreturn \u{e9}(1)");
        assert_eq!(signals.for_count, 1);
        assert!(!signals.recursion);

        let emoji = "\u{1F600}".repeat(30);
        assert_eq!(extract_signals(&emoji).char_length, 60);
        assert_eq!(extract_signals("abc").char_length, 3);
    }
}
