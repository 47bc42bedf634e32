//! Sense identifier condensing, domain code normalization and the canonical
//! digit forms used for identifiers in the normalized output.

/// Width of entry identifiers in the normalized output.
pub const ENTRY_ID_DIGITS: usize = 6;
/// Width of sense identifiers in the normalized output.
pub const SENSE_ID_DIGITS: usize = 15;

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Splits `sense-000001-000002` into (`sense-`, [`000001`, `000002`]).
/// An identifier starting with a digit has an empty prefix.
fn split_prefix(id: &str) -> (&str, Vec<&str>) {
    match id.find('-') {
        Some(dash) if !is_numeric(&id[..dash]) => {
            let (prefix, rest) = id.split_at(dash + 1);
            (prefix, rest.split('-').collect())
        }
        _ => ("", id.split('-').collect()),
    }
}

/// Collapses a hierarchical sense identifier to its minimal form.
///
/// - `sense-12300-12345` → `sense-12345`: equal-length segments where each
///   later segment only fills in zeros of the earlier one.
/// - `sense-1234-56` → `sense-1256`: shorter segments overlay the right end.
///
/// Anything else is returned unchanged.
pub fn condense_sense_id(id: &str) -> String {
    let (prefix, segments) = split_prefix(id);

    if segments.len() < 2 || !segments.iter().all(|s| is_numeric(s)) {
        return id.to_string();
    }

    let first_len = segments[0].len();

    if segments.iter().all(|s| s.len() == first_len) {
        for pair in segments.windows(2) {
            let (earlier, later) = (pair[0].as_bytes(), pair[1].as_bytes());

            let Some(pos) = earlier.iter().zip(later).position(|(a, b)| a != b) else {
                return id.to_string();
            };

            let earlier_zeros = earlier[pos..].iter().all(|&c| c == b'0');
            let later_filled = later[pos..].iter().any(|&c| c != b'0');

            if !earlier_zeros || !later_filled {
                return id.to_string();
            }
        }

        return format!("{}{}", prefix, segments[segments.len() - 1]);
    }

    if segments.windows(2).any(|pair| pair[1].len() > pair[0].len()) {
        return id.to_string();
    }

    let mut acc = segments[0].to_string();
    for segment in &segments[1..] {
        let keep = acc.len() - segment.len();
        acc.replace_range(keep.., segment);
    }

    format!("{}{}", prefix, acc)
}

/// Result of normalizing a raw domain code attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedCodes {
    pub codes: Vec<String>,
    /// Tokens whose digit count is not a multiple of three.
    pub malformed: Vec<String>,
}

/// Normalizes 3-digit-group domain codes to dotted decimal form.
///
/// The input may hold several codes separated by whitespace, `,`, `;` or `|`.
/// Non-digit characters inside a code are discarded, so `001.002`, `001:002`
/// and `<b>001002</b>` all give `1.2`. Tokens with a digit count that is not a
/// multiple of three are collected in `malformed` and produce no code.
pub fn normalize_domain_codes(raw: &str) -> NormalizedCodes {
    let mut result = NormalizedCodes::default();

    let tokens = raw
        .split(|c: char| c.is_whitespace() || c == ',' || c == ';' || c == '|')
        .filter(|t| !t.is_empty());

    for token in tokens {
        let digits: String = token.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            continue;
        }
        if digits.len() % 3 != 0 {
            result.malformed.push(token.to_string());
            continue;
        }

        let groups: Vec<String> = digits
            .as_bytes()
            .chunks(3)
            .map(|chunk| {
                let group = std::str::from_utf8(chunk).unwrap_or("0");
                group.parse::<u32>().unwrap_or(0).to_string()
            })
            .collect();

        let code = groups.join(".");
        if !result.codes.contains(&code) {
            result.codes.push(code);
        }
    }

    result
}

/// The first normalized code of `raw`, if any.
pub fn normalize_domain_code(raw: &str) -> Option<String> {
    normalize_domain_codes(raw).codes.into_iter().next()
}

/// Parent of a dotted code: `1.2.3` → `1.2`. Top-level codes have none.
pub fn parent_domain_code(code: &str) -> Option<&str> {
    code.rfind('.').map(|i| &code[..i])
}

/// Digits of `id`, right-padded with zeros or truncated to `width`.
pub fn canonical_digits(id: &str, width: usize) -> String {
    let mut digits: String = id.chars().filter(|c| c.is_ascii_digit()).take(width).collect();
    while digits.len() < width {
        digits.push('0');
    }
    digits
}

pub fn output_entry_id(id: &str) -> String {
    canonical_digits(id, ENTRY_ID_DIGITS)
}

pub fn output_sense_id(id: &str) -> String {
    canonical_digits(id, SENSE_ID_DIGITS)
}
