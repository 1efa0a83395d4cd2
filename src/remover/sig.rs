//! Rewriting Sorbet signatures when an `attr_accessor` is split in two.

use once_cell::sync::Lazy;
use regex::Regex;

static RETURNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\breturns\s*\(").expect("valid regex"));
static PARAMS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bparams\s*\(").expect("valid regex"));

/// Type of the attribute described by an accessor sig: the `returns(T)` type,
/// or the type of the single `params(name: T)` entry of a writer sig
pub fn attribute_type(sig: &str) -> Option<&str> {
    if let Some(found) = RETURNS.find(sig) {
        return parenthesized(sig, found.end()).map(str::trim);
    }

    let found = PARAMS.find(sig)?;
    let params = parenthesized(sig, found.end())?;
    let (_, ty) = params.split_once(':')?;
    Some(ty.trim())
}

pub fn reader_sig(ty: &str) -> String {
    format!("sig {{ returns({}) }}", ty)
}

pub fn writer_sig(name: &str, ty: &str) -> String {
    format!("sig {{ params({}: {}).returns({}) }}", name, ty, ty)
}

// Text up to the parenthesis closing the one opened just before `from`
fn parenthesized(text: &str, from: usize) -> Option<&str> {
    let mut depth = 1usize;
    for (offset, c) in text[from..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[from..from + offset]);
                }
            }
            _ => {}
        }
    }
    None
}
