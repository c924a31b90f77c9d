// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_markup(mentions: usize) -> String {
    let mut value = String::new();
    for i in 0..mentions {
        value.push_str(&format!("Message {i} for @[Person {i}]({i}) about the plan. "));
    }
    value
}

#[allow(dead_code)]
pub fn engine() -> mentions_input_engine::MentionsEngine {
    mentions_input_engine::MentionsEngine::from_template(
        &mentions_input_engine::GrammarRegistry::new(),
        mentions_input_engine::DEFAULT_MARKUP,
    )
    .unwrap()
}
