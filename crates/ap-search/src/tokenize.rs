//! Unicode word segmentation shared by keyword extraction, free-text search
//! and escalation detection.

use unicode_segmentation::UnicodeSegmentation;

/// Filler words that never narrow an inventory search.
const STOP_WORDS: &[&str] = &[
    // Russian
    "хочу", "хотел", "хотела", "хотим", "нужен", "нужна", "нужно", "нужны", "ищу", "ищем",
    "подбери", "подберите", "подобрать", "покажи", "покажите", "посоветуй", "посоветуйте",
    "есть", "какие", "какой", "какая", "машина", "машину", "машины", "машин", "авто",
    "автомобиль", "автомобиля", "автомобили", "тачка", "тачку", "года", "году", "лет",
    "цена", "цене", "ценой", "рублей", "руб", "тыс", "тысяч", "млн", "около", "примерно",
    "пробег", "пробегом", "пробега", "бюджет", "новее", "старше", "дешевле", "дороже",
    "пожалуйста", "что", "нибудь", "или", "для", "без", "под", "меня", "мне", "нас",
    // English
    "want", "need", "looking", "search", "find", "show", "car", "cars", "vehicle", "the",
    "and", "for", "with", "any", "some", "please", "year", "years", "price", "mileage",
    "under", "from", "about", "around", "budget", "than", "newer", "older", "cheap",
    "cheaper",
];

/// A lowercased word and its byte offset in the text it was cut from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Split text into lowercased words with byte offsets.
///
/// Offsets refer to the lowercased text, which is what every extraction
/// rule scans.
pub fn words(text: &str) -> Vec<Token> {
    let lower = normalize(text);
    lower
        .unicode_word_indices()
        .map(|(start, word)| Token {
            text: word.to_string(),
            start,
            end: start + word.len(),
        })
        .collect()
}

/// Lowercase and fold typographic apostrophes so "don’t" and "don't" agree.
pub fn normalize(text: &str) -> String {
    text.to_lowercase().replace('\u{2019}', "'")
}

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Digits with optional decimal separators and nothing else.
pub fn is_numeric(word: &str) -> bool {
    word.chars().any(|c| c.is_numeric())
        && word.chars().all(|c| c.is_numeric() || c == '.' || c == ',')
}

/// Long enough to be a search term: more than two characters, or a
/// two-character model code mixing a letter and a digit ("x1", "a4").
pub fn is_significant(word: &str) -> bool {
    let len = word.chars().count();
    len > 2
        || (len == 2
            && word.chars().any(char::is_alphabetic)
            && word.chars().any(char::is_numeric))
}

/// Terms for full-text search: significant, non-stop words. Numbers stay,
/// since the whole record (year, price) is searched.
pub fn query_terms(text: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for token in words(text) {
        if is_significant(&token.text)
            && !is_stop_word(&token.text)
            && !terms.contains(&token.text)
        {
            terms.push(token.text);
        }
    }
    terms
}
