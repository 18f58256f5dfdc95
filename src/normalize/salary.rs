use std::sync::LazyLock;

use regex::Regex;

static REJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(commensurate|negotiable|competitive|doe|tbd|n/a|none|unpaid)\b").unwrap()
});
static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$?\s*(\d[\d,]*(?:\.\d+)?)\s*(k)?\s*(?:-|\bto\b)\s*\$?\s*(\d[\d,]*(?:\.\d+)?)\s*(k)?").unwrap()
});
// Money-shaped figures: $-prefixed, thousands-separated, or k-shorthand.
static MONEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\s*(\d[\d,]*(?:\.\d+)?)\s*(k)?|\b(\d{1,3}(?:,\d{3})+(?:\.\d+)?)\b|\b(\d+(?:\.\d+)?)\s*k\b").unwrap()
});
static BARE_NUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{3,6}(?:\.\d+)?)\b").unwrap());

/// Annualized salary bounds. A single figure has `min == max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
}

impl SalaryRange {
    fn single(value: f64) -> Self {
        Self { min: value, max: value }
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// Parse free-text salary into annualized bounds.
///
/// Precedence: explicit range, single money figure, k-shorthand, stipend
/// phrase with a bare number. Period units (per month/week/hour) are only
/// honored when the text names them; a figure with no unit is taken as
/// annual. Multi-number text that is not a range returns None rather than
/// picking one.
pub fn parse_salary(text: &str) -> Option<SalaryRange> {
    let s = fold(text);
    if s.is_empty() || REJECT_RE.is_match(&s) {
        return None;
    }

    let mult = unit_multiplier(&s).unwrap_or(1.0);

    if let Some(caps) = RANGE_RE.captures(&s) {
        let mut min = parse_num(&caps[1])?;
        let k1 = caps.get(2).is_some();
        let mut max = parse_num(&caps[3])?;
        let k2 = caps.get(4).is_some();
        if k1 {
            min *= 1000.0;
        }
        if k2 {
            max *= 1000.0;
            // "$30-35k" carries the suffix across both bounds
            if !k1 && min < 1000.0 {
                min *= 1000.0;
            }
        }
        // "for 9-12 months" also looks like a range; only accept spans
        // that are money-shaped themselves
        let matched = caps.get(0).map_or("", |m| m.as_str());
        let money_like = matched.contains('$') || k1 || k2 || min >= 1000.0;
        if money_like && min <= max {
            return Some(SalaryRange { min: min * mult, max: max * mult });
        }
    }

    let candidates = money_candidates(&s);
    match candidates.len() {
        1 => Some(SalaryRange::single(candidates[0] * mult)),
        0 if s.contains("stipend") => {
            let v = BARE_NUM_RE.captures(&s).and_then(|c| parse_num(&c[1]))?;
            (v >= 100.0).then(|| SalaryRange::single(v * mult))
        }
        _ => None,
    }
}

fn fold(text: &str) -> String {
    text.to_lowercase().replace(['\u{2013}', '\u{2014}'], "-").trim().to_string()
}

fn parse_num(s: &str) -> Option<f64> {
    s.replace(',', "").parse().ok()
}

// Unit phrases, not bare words: "academic year" must not read as weekly
// because it mentions neither, and "for 12 months" must not read as monthly.
// Year wins when several units appear, matching the board's usual phrasing.
fn unit_multiplier(s: &str) -> Option<f64> {
    const YEAR: &[&str] = &["per year", "/year", "/yr", "annually", "annual", "per annum", "a year"];
    const MONTH: &[&str] = &["per month", "/month", "/mo", "monthly", "a month"];
    const WEEK: &[&str] = &["per week", "/week", "/wk", "weekly", "a week"];
    const HOUR: &[&str] = &["per hour", "/hour", "/hr", "hourly", "an hour"];

    if YEAR.iter().any(|u| s.contains(u)) {
        Some(1.0)
    } else if MONTH.iter().any(|u| s.contains(u)) {
        Some(12.0)
    } else if WEEK.iter().any(|u| s.contains(u)) {
        Some(52.0)
    } else if HOUR.iter().any(|u| s.contains(u)) {
        Some(2080.0)
    } else {
        None
    }
}

fn money_candidates(s: &str) -> Vec<f64> {
    let mut out = Vec::new();
    for caps in MONEY_RE.captures_iter(s) {
        if let Some(m) = caps.get(1) {
            if let Some(mut v) = parse_num(m.as_str()) {
                if caps.get(2).is_some() {
                    if v > 500.0 {
                        continue; // "401k" and friends, not a salary
                    }
                    v *= 1000.0;
                }
                out.push(v);
            }
        } else if let Some(m) = caps.get(3) {
            if let Some(v) = parse_num(m.as_str()) {
                out.push(v);
            }
        } else if let Some(m) = caps.get(4) {
            if let Some(v) = parse_num(m.as_str()) {
                // retirement plans masquerading as k-shorthand
                if v <= 500.0 && v != 401.0 && v != 403.0 {
                    out.push(v * 1000.0);
                }
            }
        }
    }
    out
}
