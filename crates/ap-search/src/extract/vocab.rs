//! Fixed-vocabulary fields: transmission and engine/fuel type.

use ap_protocol::{EngineType, Gearbox};

/// Gearbox named earliest in the text, if any.
pub fn gearbox(text: &str) -> Option<Gearbox> {
    earliest(text, &Gearbox::ALL, Gearbox::terms)
}

/// Engine type named earliest in the text, if any.
pub fn engine(text: &str) -> Option<EngineType> {
    earliest(text, &EngineType::ALL, EngineType::terms)
}

/// True when the word names any gearbox or engine type.
pub fn is_vocabulary_word(word: &str) -> bool {
    Gearbox::ALL
        .iter()
        .flat_map(Gearbox::terms)
        .chain(EngineType::ALL.iter().flat_map(EngineType::terms))
        .any(|term| word.contains(term))
}

fn earliest<T: Copy>(
    text: &str,
    variants: &[T],
    terms: fn(&T) -> &'static [&'static str],
) -> Option<T> {
    variants
        .iter()
        .flat_map(|v| {
            let v = *v;
            terms(&v)
                .iter()
                .filter_map(move |t| text.find(t).map(|pos| (pos, v)))
        })
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn russian_gearbox_terms() {
        assert_eq!(gearbox("седан автомат"), Some(Gearbox::Automatic));
        assert_eq!(gearbox("на механике"), Some(Gearbox::Manual));
        assert_eq!(gearbox("акпп"), Some(Gearbox::Automatic));
        assert_eq!(gearbox("вариатор"), Some(Gearbox::Cvt));
    }

    #[test]
    fn english_terms() {
        assert_eq!(gearbox("manual hatchback"), Some(Gearbox::Manual));
        assert_eq!(gearbox("toyota cvt"), Some(Gearbox::Cvt));
        assert_eq!(engine("petrol or diesel"), Some(EngineType::Gasoline));
    }

    #[test]
    fn earliest_mention_wins() {
        assert_eq!(gearbox("механика, но можно автомат"), Some(Gearbox::Manual));
        assert_eq!(engine("дизель или бензин"), Some(EngineType::Diesel));
    }

    #[test]
    fn engine_stems_cover_inflections() {
        assert_eq!(engine("на бензине"), Some(EngineType::Gasoline));
        assert_eq!(engine("электромобиль"), Some(EngineType::Electric));
        assert_eq!(engine("гибридный"), Some(EngineType::Hybrid));
    }

    #[test]
    fn absent_vocabulary_is_none() {
        assert_eq!(gearbox("bmw x1"), None);
        assert_eq!(engine("bmw x1"), None);
    }

    #[test]
    fn vocabulary_words() {
        assert!(is_vocabulary_word("автомат"));
        assert!(is_vocabulary_word("дизельный"));
        assert!(!is_vocabulary_word("седан"));
    }
}
