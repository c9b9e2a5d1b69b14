//! Escalation detection on fallback completion replies.
//!
//! A trigger is a short phrase. It fires when its words appear as
//! consecutive words of the reply: every word but the last must match
//! exactly, and the last is a stem ("менеджер" also matches "менеджера").
//! Matching is anchored at word starts, so "pagemanager" never fires.

use crate::tokenize;

const TRIGGERS: &[&str] = &[
    // Russian
    "не знаю",
    "не уверен",
    "затрудняюсь",
    "сложно сказать",
    "трудно сказать",
    "менеджер",
    "оператор",
    "специалист",
    "консультант",
    "связаться",
    "свяжитесь",
    "позвать",
    "позовите",
    // English
    "not sure",
    "don't know",
    "do not know",
    "manager",
    "operator",
    "human",
    "specialist",
    "unsure",
    "uncertain",
];

/// True when the reply signals uncertainty or suggests a human.
///
/// Adding text to a reply never turns a positive result negative.
pub fn needs_escalation(reply: &str) -> bool {
    let words: Vec<String> = tokenize::words(reply)
        .into_iter()
        .map(|t| t.text)
        .collect();
    if words.is_empty() {
        return false;
    }
    TRIGGERS.iter().any(|phrase| {
        let parts: Vec<String> = tokenize::words(phrase).into_iter().map(|t| t.text).collect();
        contains_phrase(&words, &parts)
    })
}

fn contains_phrase(words: &[String], phrase: &[String]) -> bool {
    let Some((stem, exact)) = phrase.split_last() else {
        return false;
    };
    words.windows(phrase.len()).any(|window| {
        let (last, head) = match window.split_last() {
            Some(split) => split,
            None => return false,
        };
        head == exact && last.starts_with(stem.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn russian_uncertainty_and_manager() {
        assert!(needs_escalation("Я не знаю, лучше позвать менеджера"));
        assert!(needs_escalation("Затрудняюсь ответить точно."));
        assert!(needs_escalation("Свяжитесь с нашим специалистом."));
    }

    #[test]
    fn english_triggers() {
        assert!(needs_escalation("I'm not sure, a manager can help."));
        assert!(needs_escalation("I don’t know that model."));
        assert!(needs_escalation("Let me connect you with a human."));
    }

    #[test]
    fn confident_reply_does_not_escalate() {
        assert!(!needs_escalation(
            "Kia Rio 2019 года отлично подходит для города. Какой бюджет рассматриваете?"
        ));
        assert!(!needs_escalation(""));
    }

    #[test]
    fn triggers_are_word_anchored() {
        assert!(!needs_escalation("see pagemanager docs"));
        assert!(!needs_escalation("незнаю"));
    }

    #[test]
    fn phrase_words_must_be_adjacent() {
        assert!(!needs_escalation("не всегда знаю"));
    }

    #[test]
    fn appending_text_keeps_escalation() {
        for reply in ["Честно, не знаю", "Уточните, пожалуйста", "Отличный выбор"] {
            let before = needs_escalation(reply);
            let after = needs_escalation(&format!("{reply} менеджер"));
            assert!(after);
            if before {
                assert!(needs_escalation(&format!("{reply} и ещё текст")));
            }
        }
    }
}
