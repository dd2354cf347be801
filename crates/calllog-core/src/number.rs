//! Phone number and SIP address equivalence.
//!
//! Two call-log entries only collapse into one row when their numbers denote
//! the same party. Bare numbers are compared loosely (formatting, trunk and
//! international prefixes are ignored); URI-form addresses are compared with
//! SIP rules (case-sensitive user part, case-insensitive host part).

/// Minimum trailing dialable characters two long numbers must share.
pub const MIN_MATCH: usize = 7;

/// Returns true if the number is a URI-form address rather than a dialable number.
///
/// Recognizes a literal `@` as well as its percent-escaped form `%40`.
pub fn is_uri_number(number: &str) -> bool {
    number.contains('@') || number.contains("%40")
}

/// Returns true if both numbers denote the same party.
///
/// URI-form addresses on either side use [`sip_addresses_equivalent`];
/// everything else uses [`phone_numbers_equivalent`], which treats absent and
/// empty numbers alike.
pub fn numbers_equivalent(a: Option<&str>, b: Option<&str>) -> bool {
    if a.is_some_and(is_uri_number) || b.is_some_and(is_uri_number) {
        sip_addresses_equivalent(a, b)
    } else {
        phone_numbers_equivalent(a.unwrap_or_default(), b.unwrap_or_default())
    }
}

/// Compares two SIP addresses.
///
/// Each address is split at its first `@` into a user part and the remainder
/// (which keeps the `@`). The user part must match exactly; the remainder
/// matches ignoring case.
pub fn sip_addresses_equivalent(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            let (user_a, rest_a) = split_userinfo(a);
            let (user_b, rest_b) = split_userinfo(b);
            user_a == user_b && eq_ignore_case(rest_a, rest_b)
        }
        _ => false,
    }
}

fn split_userinfo(address: &str) -> (&str, &str) {
    address
        .find('@')
        .map_or((address, ""), |idx| address.split_at(idx))
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Loosely compares two dialable numbers.
///
/// Formatting characters are skipped and the numbers are matched from the
/// end. Numbers sharing fewer than [`MIN_MATCH`] trailing characters must be
/// identical once formatting is removed. Longer matches are equal when one
/// side is exhausted, or when what remains on both sides is an international
/// prefix (`+`, `00`, `011`), or a trunk `0` against an international prefix
/// with a country code.
pub fn phone_numbers_equivalent(a: &str, b: &str) -> bool {
    // A hidden number never matches a present one, dialable or not.
    if a.is_empty() != b.is_empty() {
        return false;
    }

    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // Exclusive ends of the unscanned prefixes.
    let mut end_a = a.len();
    let mut end_b = b.len();
    let mut matched = 0;

    while end_a > 0 && end_b > 0 {
        let ca = a[end_a - 1];
        let cb = b[end_b - 1];
        let mut skipped = false;

        if !is_dialable(ca) {
            end_a -= 1;
            skipped = true;
        }
        if !is_dialable(cb) {
            end_b -= 1;
            skipped = true;
        }

        if !skipped {
            if ca != cb {
                break;
            }
            end_a -= 1;
            end_b -= 1;
            matched += 1;
        }
    }

    if matched < MIN_MATCH {
        let dialable_a = a.iter().filter(|c| is_dialable(**c)).count();
        let dialable_b = b.iter().filter(|c| is_dialable(**c)).count();
        return dialable_a == matched && dialable_b == matched;
    }

    if end_a == 0 || end_b == 0 {
        return true;
    }

    let prefix_a = &a[..end_a];
    let prefix_b = &b[..end_b];

    (is_intl_prefix(prefix_a) && is_intl_prefix(prefix_b))
        || (is_trunk_prefix(prefix_a) && is_intl_prefix_with_country_code(prefix_b))
        || (is_trunk_prefix(prefix_b) && is_intl_prefix_with_country_code(prefix_a))
}

const fn is_dialable(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '*' | '#' | '+')
}

/// Dialable characters plus pause and wait.
const fn is_non_separator(c: char) -> bool {
    is_dialable(c) || matches!(c, ',' | ';')
}

/// Matches `+`, `00` or `011`, ignoring separators.
fn is_intl_prefix(prefix: &[char]) -> bool {
    let mut state = 0;
    for &c in prefix {
        state = match (state, c) {
            (0, '+') => 1,
            (0, '0') => 2,
            (2, '0') => 3,
            (2, '1') => 4,
            (4, '1') => 5,
            (_, c) if is_non_separator(c) => return false,
            (s, _) => s,
        };
    }
    matches!(state, 1 | 3 | 5)
}

/// Matches an international prefix followed by a 1-3 digit country code.
fn is_intl_prefix_with_country_code(prefix: &[char]) -> bool {
    let mut state = 0;
    for &c in prefix {
        state = match (state, c) {
            (0, '+') => 1,
            (0, '0') => 2,
            (2, '0') => 3,
            (2, '1') => 4,
            (4, '1') => 5,
            (1 | 3 | 5, d) if d.is_ascii_digit() => 6,
            (s @ (6 | 7), d) if d.is_ascii_digit() => s + 1,
            (_, c) if is_non_separator(c) => return false,
            (s, _) => s,
        };
    }
    matches!(state, 6..=8)
}

/// Matches a single national trunk `0`, ignoring separators.
fn is_trunk_prefix(prefix: &[char]) -> bool {
    let mut found = false;
    for &c in prefix {
        if c == '0' && !found {
            found = true;
        } else if is_non_separator(c) {
            return false;
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== SIP Address Tests ==========

    #[test]
    fn sip_user_part_is_case_sensitive() {
        assert!(!sip_addresses_equivalent(
            Some("Alice@Example.com"),
            Some("alice@EXAMPLE.COM")
        ));
    }

    #[test]
    fn sip_host_part_is_case_insensitive() {
        assert!(sip_addresses_equivalent(
            Some("alice@Example.com"),
            Some("alice@EXAMPLE.COM")
        ));
    }

    #[test]
    fn sip_absent_addresses() {
        assert!(sip_addresses_equivalent(None, None));
        assert!(!sip_addresses_equivalent(Some("alice@example.com"), None));
        assert!(!sip_addresses_equivalent(None, Some("alice@example.com")));
        assert!(!sip_addresses_equivalent(Some(""), None));
    }

    #[test]
    fn sip_without_at_compares_whole_string_as_user() {
        assert!(sip_addresses_equivalent(Some("alice"), Some("alice")));
        assert!(!sip_addresses_equivalent(Some("alice"), Some("Alice")));
        assert!(!sip_addresses_equivalent(Some("alice"), Some("alice@host")));
    }

    #[test]
    fn sip_only_first_at_splits() {
        assert!(sip_addresses_equivalent(
            Some("bob@proxy@Example.com"),
            Some("bob@PROXY@example.COM")
        ));
        assert!(!sip_addresses_equivalent(
            Some("bob@proxy@example.com"),
            Some("bob@other@example.com")
        ));
        assert!(sip_addresses_equivalent(Some("@"), Some("@")));
        assert!(sip_addresses_equivalent(Some("@@"), Some("@@")));
    }

    // ========== Dispatch Tests ==========

    #[test]
    fn uri_detection() {
        assert!(is_uri_number("alice@example.com"));
        assert!(is_uri_number("alice%40example.com"));
        assert!(!is_uri_number("+1 650-555-1234"));
        assert!(!is_uri_number(""));
    }

    #[test]
    fn numbers_equivalent_uses_sip_rules_when_either_side_is_uri() {
        assert!(numbers_equivalent(
            Some("alice@Example.com"),
            Some("alice@example.COM")
        ));
        assert!(!numbers_equivalent(Some("alice@example.com"), Some("5551234")));
        assert!(!numbers_equivalent(Some("alice@example.com"), None));
    }

    #[test]
    fn numbers_equivalent_uses_phone_rules_otherwise() {
        assert!(numbers_equivalent(Some("555-1234"), Some("5551234")));
        assert!(!numbers_equivalent(Some("555-1234"), Some("555-9999")));
    }

    #[test]
    fn absent_and_empty_numbers() {
        assert!(numbers_equivalent(None, None));
        assert!(numbers_equivalent(None, Some("")));
        assert!(numbers_equivalent(Some(""), Some("")));
        assert!(!numbers_equivalent(None, Some("5551234")));
        assert!(!numbers_equivalent(Some(""), Some("5551234")));
    }

    #[test]
    fn hidden_number_never_matches_a_non_dialable_one() {
        assert!(!numbers_equivalent(None, Some("anonymous")));
        assert!(!numbers_equivalent(Some(""), Some("Private")));
        assert!(!numbers_equivalent(Some("Private"), None));
        assert!(!phone_numbers_equivalent("", "-"));

        // Two non-empty numbers without dialable characters still match.
        assert!(numbers_equivalent(Some("anonymous"), Some("Private")));
    }

    // ========== Phone Number Tests ==========

    #[test]
    fn formatting_is_ignored() {
        assert!(phone_numbers_equivalent("(650) 555-1234", "650.555.1234"));
        assert!(phone_numbers_equivalent("650 555 1234", "6505551234"));
    }

    #[test]
    fn short_numbers_must_match_exactly() {
        assert!(phone_numbers_equivalent("911", "911"));
        assert!(phone_numbers_equivalent("(911)", "911"));
        assert!(!phone_numbers_equivalent("911", "1911"));
        assert!(!phone_numbers_equivalent("555-1234", "556-1234"));
    }

    #[test]
    fn country_code_on_one_side() {
        assert!(phone_numbers_equivalent("+1 650-555-1234", "650 555 1234"));
        assert!(phone_numbers_equivalent("+16505551234", "16505551234"));
    }

    #[test]
    fn international_prefixes_match_each_other() {
        assert!(phone_numbers_equivalent("0044 20 7946 0958", "+44 20 7946 0958"));
        assert!(phone_numbers_equivalent("011 44 20 7946 0958", "+44 20 7946 0958"));
    }

    #[test]
    fn trunk_prefix_matches_international_with_country_code() {
        assert!(phone_numbers_equivalent("020 7946 0958", "+44 20 7946 0958"));
        assert!(phone_numbers_equivalent("+44 20 7946 0958", "020 7946 0958"));
    }

    #[test]
    fn different_area_codes_do_not_match() {
        assert!(!phone_numbers_equivalent("650-555-1234", "415-555-1234"));
        assert!(!phone_numbers_equivalent("+1 650 555 1234", "+44 650 555 1234"));
    }

    #[test]
    fn prefix_helpers() {
        let chars = |s: &str| s.chars().collect::<Vec<_>>();

        assert!(is_intl_prefix(&chars("+")));
        assert!(is_intl_prefix(&chars("00")));
        assert!(is_intl_prefix(&chars("011")));
        assert!(is_intl_prefix(&chars("0-0")));
        assert!(!is_intl_prefix(&chars("0")));
        assert!(!is_intl_prefix(&chars("")));

        assert!(is_intl_prefix_with_country_code(&chars("+44")));
        assert!(is_intl_prefix_with_country_code(&chars("011 1")));
        assert!(is_intl_prefix_with_country_code(&chars("00353")));
        assert!(!is_intl_prefix_with_country_code(&chars("+")));
        assert!(!is_intl_prefix_with_country_code(&chars("+1234")));

        assert!(is_trunk_prefix(&chars("0")));
        assert!(is_trunk_prefix(&chars("(0)")));
        assert!(!is_trunk_prefix(&chars("00")));
        assert!(!is_trunk_prefix(&chars("")));
    }
}
