use std::collections::HashMap;

/// Slug used when a heading has no sluggable characters.
pub const EMPTY_SLUG: &str = "section";

/// Extracts a `{#custom-id}` suffix from heading text.
///
/// If the text ends with `{#some-id}` (where the id contains ASCII alphanumerics,
/// hyphens, or underscores), returns the trimmed text without the suffix and `Some(id)`.
/// Otherwise returns the original text and `None`.
///
/// ```
/// use quire_core::slug::extract_custom_id;
///
/// assert_eq!(extract_custom_id("Setup {#setup}"), ("Setup", Some("setup")));
/// assert_eq!(extract_custom_id("Setup"), ("Setup", None));
/// ```
pub fn extract_custom_id(text: &str) -> (&str, Option<&str>) {
    let trimmed = text.trim_end();
    let Some(inner) = trimmed.strip_suffix('}') else {
        return (text, None);
    };
    let Some(open) = inner.rfind("{#") else {
        return (text, None);
    };

    let id = &inner[open + 2..];
    let valid = !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if valid {
        (inner[..open].trim_end(), Some(id))
    } else {
        (text, None)
    }
}

/// Per-document slug generator.
///
/// Tracks every id handed out (or reserved) so repeated headings get
/// `-1`, `-2`, ... suffixes. One instance lives for exactly one document.
#[derive(Debug, Default)]
pub struct Slugger {
    counts: HashMap<String, usize>,
}

impl Slugger {
    /// Creates a new slugger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates the next unique slug for the given heading text.
    pub fn next_slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        if !self.is_taken(&base) {
            self.counts.insert(base.clone(), 1);
            return base;
        }

        // A suffixed candidate can already exist as a literal heading
        // ("Intro 1"), so keep counting until one is free.
        loop {
            let counter = self.counts.entry(base.clone()).or_insert(1);
            let n = *counter;
            *counter += 1;
            let candidate = format!("{base}-{n}");
            if !self.is_taken(&candidate) {
                self.counts.insert(candidate.clone(), 1);
                return candidate;
            }
        }
    }

    /// Reserves an id so future auto-generated slugs won't collide with it.
    pub fn reserve(&mut self, slug: &str) {
        *self.counts.entry(slug.to_string()).or_insert(0) += 1;
    }

    /// Returns true if the id was generated or reserved already.
    pub fn is_taken(&self, slug: &str) -> bool {
        self.counts.get(slug).is_some_and(|n| *n > 0)
    }
}

/// Returns true if the character is a Unicode combining mark commonly found in
/// headings (diacritics, Indic viramas and nuktas, Hebrew and Arabic points).
fn is_combining_mark(ch: char) -> bool {
    matches!(
        ch as u32,
        0x0300..=0x036F
            | 0x0591..=0x05BD
            | 0x05BF
            | 0x05C1..=0x05C2
            | 0x05C4..=0x05C5
            | 0x05C7
            | 0x0610..=0x061A
            | 0x064B..=0x065F
            | 0x0670
            | 0x0900..=0x0903
            | 0x093A..=0x094F
            | 0x0951..=0x0957
            | 0x0962..=0x0963
            | 0x0E31..=0x0E3A
            | 0x0E47..=0x0E4E
            | 0x1AB0..=0x1AFF
            | 0x1DC0..=0x1DFF
            | 0x302A..=0x302F
            | 0x3099..=0x309A
            | 0xFE20..=0xFE2F
    )
}

/// Converts heading text to its base slug (no uniqueness suffix).
///
/// Matches github-slugger:
/// 1. Lowercase
/// 2. Remove all non-alphanumeric, non-space characters
/// 3. Replace spaces with hyphens
/// 4. No trimming or collapsing of hyphens
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());

    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            slug.push(ch.to_ascii_lowercase());
        } else if !ch.is_ascii() && (ch.is_alphanumeric() || is_combining_mark(ch)) {
            slug.extend(ch.to_lowercase());
        } else if ch == ' ' {
            slug.push('-');
        }
    }

    if slug.is_empty() {
        slug.push_str(EMPTY_SLUG);
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
    }

    #[test]
    fn punctuation_dropped() {
        assert_eq!(slugify("What's `infer`?"), "whats-infer");
        assert_eq!(slugify("Pick<T, K>"), "pickt-k");
        assert_eq!(slugify("TypeScript & JSX"), "typescript--jsx");
    }

    #[test]
    fn cjk_preserved() {
        assert_eq!(slugify("类型体操 入门"), "类型体操-入门");
    }

    #[test]
    fn hindi_marks_preserved() {
        assert_eq!(slugify("डेवलपर केंद्रित"), "डेवलपर-केंद्रित");
    }

    #[test]
    fn empty_text_falls_back() {
        assert_eq!(slugify("!!!"), EMPTY_SLUG);
    }

    #[test]
    fn duplicates_get_numbered() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.next_slug("Intro"), "intro");
        assert_eq!(slugger.next_slug("Intro"), "intro-1");
        assert_eq!(slugger.next_slug("intro"), "intro-2");
    }

    #[test]
    fn suffix_never_collides_with_literal_heading() {
        let mut slugger = Slugger::new();
        assert_eq!(slugger.next_slug("Intro 1"), "intro-1");
        assert_eq!(slugger.next_slug("Intro"), "intro");
        assert_eq!(slugger.next_slug("Intro"), "intro-2");
    }

    #[test]
    fn reserve_prevents_collision() {
        let mut slugger = Slugger::new();
        slugger.reserve("intro");
        assert!(slugger.is_taken("intro"));
        assert_eq!(slugger.next_slug("Intro"), "intro-1");
    }

    #[test]
    fn custom_id_suffix() {
        assert_eq!(
            extract_custom_id("My Heading {#my-heading}  "),
            ("My Heading", Some("my-heading"))
        );
        assert_eq!(
            extract_custom_id("Title {#bad id}"),
            ("Title {#bad id}", None)
        );
        assert_eq!(extract_custom_id("Title {#}"), ("Title {#}", None));
    }
}
