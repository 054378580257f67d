use textstat::tokenizer::{filter_stopwords, tokenize, tokenize_filtered, StopwordSet};

#[test]
fn it_lowercases_and_keeps_contractions() {
    let words = tokenize("Running Runners RUN! The café's menu, don't.");
    assert_eq!(words, vec!["running", "runners", "run", "the", "café's", "menu", "don't"]);
}

#[test]
fn it_filters_stopwords() {
    let words = tokenize_filtered("The quick brown fox and the lazy dog", &StopwordSet::default());
    assert_eq!(words, vec!["quick", "brown", "fox", "lazy", "dog"]);
}

#[test]
fn it_filters_russian_stopwords() {
    let words = tokenize_filtered("Я и ты на берегу реки", &StopwordSet::default());
    assert_eq!(words, vec!["берегу", "реки"]);
}

#[test]
fn it_preserves_order_and_duplicates() {
    let set = StopwordSet::from_words(["b"]);
    let out = filter_stopwords(tokenize("c b a b c"), &set);
    assert_eq!(out, vec!["c", "a", "c"]);
}

#[test]
fn empty_set_filters_nothing() {
    let out = tokenize_filtered("the and of", &StopwordSet::empty());
    assert_eq!(out.len(), 3);
}

#[test]
fn digits_and_underscores_are_word_characters() {
    assert_eq!(tokenize("v2_final, 2024-10"), vec!["v2_final", "2024", "10"]);
}
