//! Built-in phrase catalog used to seed stores.

use swiftspeak_core::{Lang, Phrase};

const EN_VOICE: &str = "en-US-Standard-F";
const YO_VOICE: &str = "yo-NG-Standard-A";
const IG_VOICE: &str = "ig-NG-Standard-A";
const HA_VOICE: &str = "ha-NG-Standard-A";

fn phrase(id: &str, lang: Lang, topic: &str, text: &str, gloss: &str, voice: &str) -> Phrase {
    Phrase {
        id: id.to_string(),
        lang,
        topic: topic.to_string(),
        text_native: text.to_string(),
        gloss_en: gloss.to_string(),
        voice: voice.to_string(),
    }
}

/// All seed phrases.
pub fn phrases() -> Vec<Phrase> {
    use Lang::*;

    vec![
        phrase("en_1", En, "greetings", "How are you today?", "Greeting", EN_VOICE),
        phrase("en_2", En, "greetings", "Nice to meet you", "Polite phrase", EN_VOICE),
        phrase("en_7", En, "greetings", "What's your name?", "Question", EN_VOICE),
        phrase("en_3", En, "travel", "Where is the airport?", "Question", EN_VOICE),
        phrase("en_8", En, "travel", "I need a taxi", "Request", EN_VOICE),
        phrase("en_9", En, "travel", "Does this bus go to the city center?", "Question", EN_VOICE),
        phrase("en_4", En, "food", "I would like to order water", "Request", EN_VOICE),
        phrase("en_10", En, "food", "Can I see the menu, please?", "Request", EN_VOICE),
        phrase("en_11", En, "food", "The check, please", "Request", EN_VOICE),
        phrase("en_5", En, "business", "What time is the meeting?", "Question", EN_VOICE),
        phrase("en_12", En, "business", "Here is my business card", "Statement", EN_VOICE),
        phrase("en_13", En, "business", "Let's schedule a follow-up call", "Suggestion", EN_VOICE),
        phrase("en_6", En, "health", "I need to see a doctor", "Statement", EN_VOICE),
        phrase("en_14", En, "health", "Where is the nearest pharmacy?", "Question", EN_VOICE),
        phrase("en_15", En, "health", "I have a headache", "Statement", EN_VOICE),
        phrase("yo_1", Yo, "greetings", "Ẹ káàrọ̀", "Good morning", YO_VOICE),
        phrase("yo_2", Yo, "greetings", "Báwo ni?", "How are you?", YO_VOICE),
        phrase("yo_3", Yo, "food", "Mo fẹ́ jẹun", "I want to eat", YO_VOICE),
        phrase("yo_4", Yo, "greetings", "Ẹ ṣé", "Thank you", YO_VOICE),
        phrase("ig_1", Ig, "greetings", "Ụtụtụ ọma", "Good morning", IG_VOICE),
        phrase("ig_2", Ig, "greetings", "Kedu?", "How are you?", IG_VOICE),
        phrase("ig_3", Ig, "food", "Biko nye m mmiri", "Please give me water", IG_VOICE),
        phrase("ig_4", Ig, "greetings", "Daalụ", "Thank you", IG_VOICE),
        phrase("ha_1", Ha, "greetings", "Ina kwana", "Good morning", HA_VOICE),
        phrase("ha_2", Ha, "greetings", "Yaya kake?", "How are you?", HA_VOICE),
        phrase("ha_3", Ha, "travel", "Ina tashar jirgi?", "Where is the airport?", HA_VOICE),
        phrase("ha_4", Ha, "greetings", "Nagode", "Thank you", HA_VOICE),
    ]
}
