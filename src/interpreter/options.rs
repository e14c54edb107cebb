use regex::Regex;
use std::sync::LazyLock;

use super::{FieldAnswers, FormField};

// Consent, policy and "may we share your application" questions
static AUTO_YES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(privacy\s*policy|data\s*protection|consent|acknowledg(e|ement)|terms|gdpr|agree|share\s+(your|my)\s+application|dele\s+din\s+ansøgning|må\s+dele\s+min\s+ansøgning)",
    )
    .expect("valid consent regex")
});

// Prior-employment and conflict-of-interest questions
static AUTO_NO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(currently\s*employ(ed)?\s*by|ever\s*been\s*employ(ed)?\s*by|subsidiar(y|ies)|conflict\s*of\s*interest)",
    )
    .expect("valid conflict regex")
});

const PLACEHOLDER_OPTIONS: [&str; 10] = [
    "vælg",
    "select",
    "choose",
    "please select",
    "-- select --",
    "- select -",
    "vælg...",
    "(vælg)",
    "— vælg —",
    "choose...",
];

const FALLBACK_OPTIONS: [&str; 4] = ["andet", "other", "ikke relevant", "n/a"];

const YES_WORDS: [&str; 2] = ["ja", "yes"];

const NO_WORDS: [&str; 2] = ["nej", "no"];

fn norm(s: &str) -> String {
    s.trim().to_lowercase()
}

pub fn is_placeholder(option: &str) -> bool {
    let option = norm(option);
    option.is_empty() || PLACEHOLDER_OPTIONS.contains(&option.as_str())
}

/// Snap a free-text answer onto one of the allowed options.
///
/// Tries an exact match, then a prefix match, then a substring match, and
/// finally the option with the highest similarity ratio.
pub fn best_option_match<'a>(options: &'a [String], want: &str) -> Option<&'a str> {
    let want = norm(want);
    if options.is_empty() || want.is_empty() {
        return None;
    }

    if let Some(hit) = options.iter().find(|o| norm(o) == want) {
        return Some(hit.as_str());
    }
    if let Some(hit) = options.iter().find(|o| norm(o).starts_with(&want)) {
        return Some(hit.as_str());
    }
    if let Some(hit) = options.iter().find(|o| norm(o).contains(&want)) {
        return Some(hit.as_str());
    }

    let mut best: Option<(&str, f64)> = None;
    for option in options {
        let score = similarity(&norm(option), &want);
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((option.as_str(), score));
        }
    }
    best.map(|(option, _)| option)
}

/// Ratcliff/Obershelp similarity: `2 * matches / (len(a) + len(b))`
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (i, j, len) = longest_common_block(a, b);
    if len == 0 {
        return 0;
    }
    len + matching_chars(&a[..i], &b[..j]) + matching_chars(&a[i + len..], &b[j + len..])
}

/// Start in `a`, start in `b` and length of the longest common run
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut previous = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        let mut current = vec![0usize; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                let len = previous[j] + 1;
                current[j + 1] = len;
                if len > best.2 {
                    best = (i + 1 - len, j + 1 - len, len);
                }
            }
        }
        previous = current;
    }

    best
}

/// A safe answer for a required select the model left blank
pub fn fallback_required_option(options: &[String]) -> Option<&str> {
    for want in FALLBACK_OPTIONS {
        if let Some(hit) = options.iter().find(|o| norm(o).contains(want)) {
            return Some(hit.as_str());
        }
    }
    options
        .iter()
        .find(|o| !is_placeholder(o))
        .or_else(|| options.first())
        .map(String::as_str)
}

fn option_led_by<'a>(options: &'a [String], words: &[&str]) -> Option<&'a str> {
    options
        .iter()
        .find(|o| {
            let lower = norm(o);
            let first = lower
                .split(|c: char| !c.is_alphanumeric())
                .find(|w| !w.is_empty())
                .unwrap_or_default();
            words.contains(&first)
        })
        .map(String::as_str)
}

pub fn affirmative_option(options: &[String]) -> Option<&str> {
    option_led_by(options, &YES_WORDS)
}

pub fn negative_option(options: &[String]) -> Option<&str> {
    option_led_by(options, &NO_WORDS)
}

/// Post-process raw model answers into one answer per field
pub fn normalize_answers(fields: &[FormField], raw: &FieldAnswers) -> FieldAnswers {
    let mut answers = FieldAnswers::new();

    for field in fields {
        let given = raw
            .get(&field.field_id)
            .map(|a| a.trim().to_string())
            .unwrap_or_default();

        let answer = if field.options.is_empty() {
            given
        } else {
            select_answer(field, &given)
        };

        answers.insert(field.field_id.clone(), answer);
    }

    answers
}

fn select_answer(field: &FormField, given: &str) -> String {
    let options = &field.options;

    let forced = if AUTO_YES.is_match(&field.label) {
        affirmative_option(options)
    } else if AUTO_NO.is_match(&field.label) {
        negative_option(options)
    } else {
        None
    };
    if let Some(option) = forced {
        ::log::debug!("Forced {:?} for {:?}", option, field.label);
        return option.to_string();
    }

    if let Some(option) = best_option_match(options, given) {
        return option.to_string();
    }

    if field.required {
        if let Some(option) = fallback_required_option(options) {
            ::log::debug!("Fallback {:?} for required {:?}", option, field.label);
            return option.to_string();
        }
    }

    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn select(id: &str, label: &str, options: &[&str], required: bool) -> FormField {
        FormField {
            field_id: id.to_string(),
            label: label.to_string(),
            field_type: "select".to_string(),
            options: opts(options),
            required,
        }
    }

    #[test]
    fn test_best_option_match_order() {
        let study = opts(&["IT", "Markedsføring", "Andet område"]);
        assert_eq!(best_option_match(&study, "markedsføring"), Some("Markedsføring"));

        let degrees = opts(&["Bachelor", "Master / Kandidat", "Ph.d.", "Andet"]);
        assert_eq!(best_option_match(&degrees, "bach"), Some("Bachelor"));
        assert_eq!(best_option_match(&degrees, "Kandidat"), Some("Master / Kandidat"));
        assert_eq!(best_option_match(&degrees, "PhD"), Some("Ph.d."));

        assert_eq!(best_option_match(&degrees, "  "), None);
        assert_eq!(best_option_match(&[], "anything"), None);
    }

    #[test]
    fn test_similarity() {
        assert!((similarity("abcd", "bcde") - 0.75).abs() < 1e-9);
        assert!((similarity("", "") - 1.0).abs() < 1e-9);
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_fallback_required_option() {
        assert_eq!(
            fallback_required_option(&opts(&["Vælg", "IT", "Andet område"])),
            Some("Andet område")
        );
        assert_eq!(
            fallback_required_option(&opts(&["-- Select --", "Copenhagen", "Aarhus"])),
            Some("Copenhagen")
        );
        assert_eq!(fallback_required_option(&opts(&["Vælg"])), Some("Vælg"));
        assert_eq!(fallback_required_option(&[]), None);
    }

    #[test]
    fn test_consent_and_conflict_overrides() {
        let fields = vec![
            select("D", "Venligst besvar, om vi må dele din ansøgning", &["Nej", "Ja"], true),
            select("E", "I accept the privacy policy", &["No", "Yes, I agree"], true),
            select("F", "Are you currently employed by Acme or a subsidiary?", &["Yes", "No"], true),
        ];
        let mut raw = FieldAnswers::new();
        raw.insert("D".to_string(), "Nej".to_string());
        raw.insert("F".to_string(), "Yes".to_string());

        let answers = normalize_answers(&fields, &raw);
        assert_eq!(answers["D"], "Ja");
        assert_eq!(answers["E"], "Yes, I agree");
        assert_eq!(answers["F"], "No");
    }

    #[test]
    fn test_required_select_gets_fallback() {
        let fields = vec![
            select("A", "Fagområde", &["Vælg", "IT", "Andet område"], true),
            select("B", "Hvor hørte du om os?", &["LinkedIn", "Jobindex"], false),
            FormField {
                field_id: "C".to_string(),
                label: "First name".to_string(),
                field_type: "text".to_string(),
                options: Vec::new(),
                required: true,
            },
        ];
        let mut raw = FieldAnswers::new();
        raw.insert("C".to_string(), "  Kasper ".to_string());
        raw.insert("unknown".to_string(), "ignored".to_string());

        let answers = normalize_answers(&fields, &raw);
        assert_eq!(answers["A"], "Andet område");
        assert_eq!(answers["B"], "");
        assert_eq!(answers["C"], "Kasper");
        assert!(!answers.contains_key("unknown"));
    }
}
