/// Strip one leading `https://` or `http://` prefix, case-insensitively.
///
/// Only the protocol token itself is removed; the remainder keeps its case.
/// Anything else — other schemes, bare hosts, plain SPDX tokens, the empty
/// string — passes through unchanged, which makes the transform idempotent.
pub fn normalize(raw: &str) -> String {
    for prefix in ["https://", "http://"] {
        if let Some(head) = raw.get(..prefix.len()) {
            if head.eq_ignore_ascii_case(prefix) {
                return raw[prefix.len()..].to_string();
            }
        }
    }
    raw.to_string()
}

/// Well-known license URLs and the SPDX tokens they stand for.
///
/// Keys are stored protocol-less; lookups strip the protocol and any trailing
/// slash first, so `https://opensource.org/licenses/MIT/` still resolves.
const KNOWN_LICENSE_URLS: &[(&str, &str)] = &[
    ("opensource.org/licenses/MIT", "MIT"),
    ("opensource.org/licenses/mit-license.php", "MIT"),
    ("www.opensource.org/licenses/mit-license.php", "MIT"),
    ("licenses.nuget.org/MIT", "MIT"),
    ("apache.org/licenses/LICENSE-2.0", "Apache-2.0"),
    ("www.apache.org/licenses/LICENSE-2.0", "Apache-2.0"),
    ("www.apache.org/licenses/LICENSE-2.0.html", "Apache-2.0"),
    ("www.apache.org/licenses/LICENSE-2.0.txt", "Apache-2.0"),
    ("opensource.org/licenses/Apache-2.0", "Apache-2.0"),
    ("licenses.nuget.org/Apache-2.0", "Apache-2.0"),
    ("opensource.org/licenses/BSD-2-Clause", "BSD-2-Clause"),
    ("opensource.org/licenses/BSD-3-Clause", "BSD-3-Clause"),
    ("opensource.org/licenses/ISC", "ISC"),
    ("opensource.org/licenses/0BSD", "0BSD"),
    ("unlicense.org", "Unlicense"),
    ("www.postgresql.org/about/licence", "PostgreSQL"),
];

/// Map a license URL to its SPDX token, if the URL is a well-known one.
///
/// Returns `None` for everything else, including non-URL strings, so callers
/// can feed any candidate through without a shape check first.
pub fn recognize_license_url(url: &str) -> Option<&'static str> {
    let stripped = normalize(url);
    let stripped = stripped.trim_end_matches('/');
    KNOWN_LICENSE_URLS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(stripped))
        .map(|(_, token)| *token)
}
