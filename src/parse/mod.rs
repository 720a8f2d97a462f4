use regex::Regex;
use std::sync::OnceLock;

use crate::errors::ParseFailure;
use crate::wire::GeneratedArtifact;

const FENCE: &str = "```";
const CLASS_MARKER: &str = "class ";

fn import_stmt_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"import.*?;").expect("static pattern"))
}

fn module_specifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"['"]([^'"]*)['"]"#).expect("static pattern"))
}

/// Scan a raw model response into a validated artifact. Each step has its own
/// failure state so malformed output is diagnosable, not just "bad".
pub fn parse(raw: &str) -> Result<GeneratedArtifact, ParseFailure> {
    let block = extract_fenced_block(raw)?;
    let source_text = strip_leading_tag(block);
    if source_text.trim().is_empty() {
        return Err(ParseFailure::EmptyBlock);
    }
    let class_name = extract_class_name(&source_text)?;
    let imported_packages = scan_imports(&source_text);

    Ok(GeneratedArtifact {
        class_name,
        source_text,
        imported_packages,
    })
}

/// The segment between the first pair of triple-backtick markers.
fn extract_fenced_block(raw: &str) -> Result<&str, ParseFailure> {
    let open = raw.find(FENCE).ok_or(ParseFailure::MissingOpeningFence)?;
    let rest = &raw[open + FENCE.len()..];
    let close = rest.find(FENCE).ok_or(ParseFailure::MissingClosingFence)?;
    Ok(&rest[..close])
}

/// Models sometimes prepend a language tag ("typescript") as the first fenced
/// line; drop the first line unless it already starts an import statement.
fn strip_leading_tag(block: &str) -> String {
    let first_line = block.lines().next().unwrap_or("");
    if first_line.starts_with("import") {
        block.to_string()
    } else {
        match block.find('\n') {
            Some(nl) => block[nl + 1..].to_string(),
            None => String::new(),
        }
    }
}

/// The whitespace-delimited token following the `class ` declaration marker.
fn extract_class_name(src: &str) -> Result<String, ParseFailure> {
    let at = src.find(CLASS_MARKER).ok_or(ParseFailure::MissingClassMarker)?;
    let after = &src[at + CLASS_MARKER.len()..];
    let name: String = after
        .chars()
        .take_while(|c| !c.is_whitespace() && *c != '{')
        .collect();
    if name.is_empty() {
        return Err(ParseFailure::EmptyClassName);
    }
    Ok(name)
}

/// Quoted module specifiers of single-line `import …;` statements, in source
/// order, duplicates kept. Statements without a quoted specifier are skipped.
fn scan_imports(src: &str) -> Vec<String> {
    import_stmt_re()
        .find_iter(src)
        .filter_map(|m| {
            module_specifier_re()
                .captures(m.as_str())
                .map(|c| c[1].to_string())
        })
        .collect()
}
