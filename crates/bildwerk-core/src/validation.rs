// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Upload gatekeeping — extension allow-list and filesystem-safe filenames.

use unicode_normalization::UnicodeNormalization;

/// Extensions accepted when no explicit allow-set is configured.
pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "jfif"];

/// Whether `filename` carries one of the default image extensions.
pub fn is_allowed(filename: &str) -> bool {
    is_allowed_with(filename, DEFAULT_ALLOWED_EXTENSIONS)
}

/// Whether the segment after the last `.` of `filename`, lower-cased, is in
/// `allowed`. Filenames without a dot are rejected.
pub fn is_allowed_with<I, S>(filename: &str, allowed: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let Some((_, extension)) = filename.rsplit_once('.') else {
        return false;
    };
    let extension = extension.to_ascii_lowercase();
    allowed
        .into_iter()
        .any(|candidate| candidate.as_ref().eq_ignore_ascii_case(&extension))
}

/// Reduce a caller-supplied filename to a form that is safe to join onto a
/// storage directory.
///
/// The name is NFKD-decomposed first so accented letters keep their base
/// letter, then non-ASCII characters are dropped, `/` and `\` become word
/// breaks, whitespace runs collapse to `_`, anything outside `[A-Za-z0-9_.-]`
/// is removed and leading/trailing `.`/`_` are trimmed. The result may be
/// empty.
pub fn sanitize_filename(filename: &str) -> String {
    let separated: String = filename
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = separated.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}
