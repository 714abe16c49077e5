//! Built-in true/false question bank.

/// One statement with its truth value.
#[derive(Debug, Clone)]
pub struct Question {
    pub text: String,
    pub is_true: bool,
}

const BANK: &[(&str, bool)] = &[
    ("The Great Wall of China is visible from the Moon with the naked eye.", false),
    ("Honey never spoils if stored properly.", true),
    ("The Atlantic is the largest ocean on Earth.", false),
    ("Octopuses have three hearts.", true),
    ("Mount Everest is the tallest mountain on Earth measured from base to peak.", false),
    ("Lightning never strikes the same place twice.", false),
    ("Bananas are berries, botanically speaking.", true),
    ("The human body has four lungs.", false),
    ("Sharks existed before trees.", true),
    ("Sound travels faster in water than in air.", true),
    ("Goldfish have a memory span of only three seconds.", false),
    ("Venus is the hottest planet in the solar system.", true),
    ("The capital of Australia is Sydney.", false),
    ("Adult humans have 206 bones.", true),
    ("Bulls are enraged by the color red.", false),
    ("A group of crows is called a murder.", true),
    ("The Sahara is the largest desert on Earth.", false),
    ("Hot water can freeze faster than cold water under some conditions.", true),
    ("Penguins live at the North Pole.", false),
    ("The speed of light is roughly 300,000 kilometers per second.", true),
];

/// Returns a fresh copy of the bank; each session draws from its own copy
/// without replacement.
pub fn question_bank() -> Vec<Question> {
    BANK.iter()
        .map(|&(text, is_true)| Question {
            text: text.to_string(),
            is_true,
        })
        .collect()
}
