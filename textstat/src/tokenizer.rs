use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)[\p{L}\p{N}_]+(?:'[\p{L}\p{N}_]+)?").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            // English
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","shan't","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves",
            // Russian
            "и","в","во","не","что","он","на","я","с","со","как","а","то","все","она","так","его","но","да",
            "ты","к","у","же","вы","за","бы","по","ее","мне","было","вот","от","меня","еще","нет","о","из",
            "ему","теперь","когда","даже","ну","вдруг","ли","если","уже","или","ни","быть","был","него","до",
            "вас","нибудь","опять","уж","вам","ведь","там","потом","себя","ничего","ей","может","они","тут","где",
            "есть","надо","ней","для","мы","тебя","их","чем","была","сам","чтоб","без","будто","чего","раз",
            "тоже","себе","под","будет","ж","тогда","кто","этот","того","потому","этого","какой","совсем","ним",
            "здесь","этом","один","почти","мой","тем","чтобы","нее","сейчас","были","куда","зачем","всех","никогда",
            "можно","при","наконец","два","об","другой","хоть","после","над","больше","тот","через","эти","нас",
            "про","всего","них","какая","много","разве","три","эту","моя","впрочем","хорошо","свою","этой","перед",
            "иногда","лучше","чуть","том","нельзя","такой","им","более","всегда","конечно","всю","между",
        ];
        words.iter().copied().collect()
    };
}

/// Set of words excluded from frequency statistics.
///
/// The default set is the built-in English + Russian list. Custom sets are
/// lower-cased on construction so lookups match tokenizer output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl Default for StopwordSet {
    fn default() -> Self {
        Self { words: STOPWORDS.iter().map(|w| w.to_string()).collect() }
    }
}

impl StopwordSet {
    /// A set that filters nothing.
    pub fn empty() -> Self {
        Self { words: HashSet::new() }
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::empty();
        set.extend(words);
        set
    }

    pub fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for w in words {
            let w = w.as_ref().trim();
            if !w.is_empty() { self.words.insert(w.to_lowercase()); }
        }
    }

    pub fn contains(&self, token: &str) -> bool { self.words.contains(token) }

    pub fn len(&self) -> usize { self.words.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }
}

/// Tokenize text into lowercase word tokens, in source order.
///
/// A token is a run of letters, digits or `_`, optionally joined to a second
/// such run by one apostrophe (`don't`). Everything else is a separator.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.to_lowercase();
    RE.find_iter(&normalized).map(|m| m.as_str().to_string()).collect()
}

/// Drop stop words, keeping the order of what remains.
pub fn filter_stopwords(tokens: Vec<String>, stopwords: &StopwordSet) -> Vec<String> {
    tokens.into_iter().filter(|t| !stopwords.contains(t)).collect()
}

pub fn tokenize_filtered(text: &str, stopwords: &StopwordSet) -> Vec<String> {
    filter_stopwords(tokenize(text), stopwords)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("Don't STOP, me-now!");
        assert_eq!(t, vec!["don't", "stop", "me", "now"]);
    }

    #[test]
    fn second_apostrophe_splits() {
        assert_eq!(tokenize("rock'n'roll"), vec!["rock'n", "roll"]);
        assert_eq!(tokenize("'quoted'"), vec!["quoted"]);
    }

    #[test]
    fn empty_text_has_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  ... !!").is_empty());
    }

    #[test]
    fn custom_set_is_lowercased() {
        let set = StopwordSet::from_words(["Foo", " bar ", ""]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("foo"));
        assert!(set.contains("bar"));
    }
}
