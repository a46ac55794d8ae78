//! Rule-based English lemmatizer.
//!
//! Reduces plural nouns and regular verb inflections to a base form, with an
//! exception table for irregular forms and words the rules would mangle.
//! Input is a lower-cased token.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

static IRREGULAR: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        // nouns
        ("children", "child"),
        ("men", "man"),
        ("women", "woman"),
        ("feet", "foot"),
        ("teeth", "tooth"),
        ("mice", "mouse"),
        ("geese", "goose"),
        ("analyses", "analysis"),
        ("theses", "thesis"),
        ("hypotheses", "hypothesis"),
        ("criteria", "criterion"),
        ("phenomena", "phenomenon"),
        ("lives", "life"),
        ("wives", "wife"),
        ("knives", "knife"),
        ("leaves", "leaf"),
        ("halves", "half"),
        ("movies", "movie"),
        ("buses", "bus"),
        ("gases", "gas"),
        ("lenses", "lens"),
        ("shoes", "shoe"),
        ("toes", "toe"),
        ("foes", "foe"),
        ("canoes", "canoe"),
        // verbs
        ("goes", "go"),
        ("does", "do"),
        ("went", "go"),
        ("gone", "go"),
        ("going", "go"),
        ("ran", "run"),
        ("ate", "eat"),
        ("eaten", "eat"),
        ("wrote", "write"),
        ("written", "write"),
        ("made", "make"),
        ("took", "take"),
        ("taken", "take"),
        ("gave", "give"),
        ("given", "give"),
        ("came", "come"),
        ("became", "become"),
        ("becoming", "become"),
        ("used", "use"),
        ("using", "use"),
        ("saw", "see"),
        ("seen", "see"),
        ("seeing", "see"),
        ("knew", "know"),
        ("known", "know"),
        ("thought", "think"),
        ("found", "find"),
        ("told", "tell"),
        ("said", "say"),
        ("added", "add"),
        ("adding", "add"),
        ("dying", "die"),
        ("lying", "lie"),
        ("including", "include"),
        ("included", "include"),
        ("began", "begin"),
        ("begun", "begin"),
        ("brought", "bring"),
        ("bought", "buy"),
        ("caught", "catch"),
        ("taught", "teach"),
        ("chose", "choose"),
        ("chosen", "choose"),
        ("held", "hold"),
        ("kept", "keep"),
        ("meant", "mean"),
        ("paid", "pay"),
        ("sent", "send"),
        ("spent", "spend"),
        ("stood", "stand"),
        ("understood", "understand"),
        // adjectives
        ("better", "good"),
        ("best", "good"),
        ("worse", "bad"),
        ("worst", "bad"),
    ]
    .into_iter()
    .collect()
});

/// Words whose inflection-like endings are part of the base form.
static INVARIANT: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "series", "species", "news", "always", "perhaps", "physics", "mathematics",
        "economics", "politics", "ethics", "statistics", "bias", "canvas", "atlas",
        "alias", "morning", "evening", "nothing", "something", "anything",
        "everything", "ceiling", "indeed", "hundred", "kindred", "sacred", "naked",
        "wicked", "beloved", "sometimes", "whereas", "perhaps",
    ]
    .into_iter()
    .collect()
});

/// Reduce a lower-cased word to its base form.
pub fn lemmatize(word: &str) -> String {
    if let Some(base) = IRREGULAR.get(word) {
        return (*base).to_string();
    }
    if word.chars().count() <= 3 || INVARIANT.contains(word) {
        return word.to_string();
    }

    plural_noun(word)
        .or_else(|| verb_form(word))
        .unwrap_or_else(|| word.to_string())
}

fn plural_noun(word: &str) -> Option<String> {
    if let Some(stem) = word.strip_suffix("ies") {
        if stem.chars().count() >= 2 {
            return Some(format!("{}y", stem));
        }
    }
    if word.ends_with("sses") {
        return Some(word[..word.len() - 2].to_string());
    }
    for suffix in ["ches", "shes", "xes", "zzes"] {
        if word.ends_with(suffix) {
            return Some(word[..word.len() - 2].to_string());
        }
    }
    // heroes, potatoes, echoes
    if let Some(stem) = word.strip_suffix("oes") {
        if stem.chars().count() >= 2 {
            return Some(format!("{}o", stem));
        }
    }
    if word.ends_with('s') && !(word.ends_with("ss") || word.ends_with("us") || word.ends_with("is"))
    {
        return Some(word[..word.len() - 1].to_string());
    }
    None
}

fn verb_form(word: &str) -> Option<String> {
    if let Some(stem) = word.strip_suffix("ied") {
        if stem.chars().count() >= 2 {
            return Some(format!("{}y", stem));
        }
    }
    if let Some(stem) = word.strip_suffix("eed") {
        let chars: Vec<char> = stem.chars().collect();
        return if measure(&chars) > 0 {
            Some(format!("{}ee", stem))
        } else {
            None
        };
    }

    let stem = word
        .strip_suffix("ing")
        .or_else(|| word.strip_suffix("ed"))?;
    let chars: Vec<char> = stem.chars().collect();
    if chars.len() < 3 || !has_vowel(&chars) {
        return None;
    }
    Some(restore_base(stem, &chars))
}

/// Undo spelling changes made when the suffix was attached.
fn restore_base(stem: &str, chars: &[char]) -> String {
    if stem.ends_with("at") || stem.ends_with("bl") || stem.ends_with("iz") {
        return format!("{}e", stem);
    }

    let n = chars.len();
    if chars[n - 1] == chars[n - 2]
        && is_consonant(chars, n - 1)
        && !matches!(chars[n - 1], 'l' | 's' | 'z')
    {
        return chars[..n - 1].iter().collect();
    }

    if measure(chars) == 1 && ends_cvc(chars) {
        return format!("{}e", stem);
    }

    stem.to_string()
}

fn is_consonant(chars: &[char], i: usize) -> bool {
    match chars[i] {
        'a' | 'e' | 'i' | 'o' | 'u' => false,
        'y' => i == 0 || !is_consonant(chars, i - 1),
        _ => true,
    }
}

fn has_vowel(chars: &[char]) -> bool {
    (0..chars.len()).any(|i| !is_consonant(chars, i))
}

/// Number of vowel-consonant sequences in the stem.
fn measure(chars: &[char]) -> usize {
    let mut m = 0;
    let mut prev_vowel = false;
    for i in 0..chars.len() {
        let consonant = is_consonant(chars, i);
        if consonant && prev_vowel {
            m += 1;
        }
        prev_vowel = !consonant;
    }
    m
}

/// Consonant-vowel-consonant ending, last consonant not w, x or y.
fn ends_cvc(chars: &[char]) -> bool {
    let n = chars.len();
    n >= 3
        && is_consonant(chars, n - 3)
        && !is_consonant(chars, n - 2)
        && is_consonant(chars, n - 1)
        && !matches!(chars[n - 1], 'w' | 'x' | 'y')
}
