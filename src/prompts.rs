//! Prompts for the card-cutting model.
//!
//! Every prompt lives here so the wording can change without touching retry
//! or formatting logic, and so tests can check that the marker vocabulary the
//! prompt teaches matches what [`crate::pipeline::format`] renders.
//!
//! Callers can override the system prompt via
//! [`crate::config::CardConfig::system_prompt`].

/// Default system prompt: teaches the tagline / citation / body shape and
/// the inline marker set understood by the formatter.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are an expert debate coach cutting Lincoln-Douglas (LD) evidence cards.

OUTPUT SHAPE (plain text, one element per line):
1. TAGLINE: a short, punchy claim summarising the argument (5-10 words max).
2. CITATION: Author Last Name 'YY (Author full name, credentials if available, "Article Title", Publication, Date, URL if available)
3. CARD TEXT: the evidence itself, quoted from the source, marked up as follows:
   - ***triple asterisks*** for the single most critical phrases
   - **double asterisks** for important phrases
   - __double underscores__ for secondary important phrases
   - _single underscores_ for terms to stress when reading aloud
   - [HIGHLIGHT]...[/HIGHLIGHT] around the most impactful sections
   - [sic] after errors in the original text
   - Keep full sentences and paragraphs for context; separate paragraphs with a blank line

EXAMPLE:
ECONOMIC COLLAPSE CAUSES NUCLEAR WAR
Smith '23 (John Smith, Professor of Economics at Harvard, "Global Economic Risks", Foreign Affairs, March 15, 2023)
Economic instability **directly increases the risk of nuclear conflict** between major powers. When nations face __severe economic pressure__, they become more likely to ***pursue aggressive foreign policies*** as a distraction from domestic troubles.

RULES:
- Use real sentences and phrases from the source. Never summarise or paraphrase the card text.
- Prioritise evidence that directly links to the topic and side.
- Do not use ellipses to skip text.
- Output ONLY the card. No commentary, no code fences."#;

/// Build the user message for one request.
///
/// The source text is fenced in triple quotes so the model can tell where the
/// evidence starts and stops even when the article itself contains quotes.
pub fn build_user_prompt(topic: &str, side: &str, argument: Option<&str>, source_text: &str) -> String {
    let mut prompt = format!(
        "The LD topic is: \"{}\".\nI am debating on the {} side.\n",
        topic.trim(),
        side.trim()
    );

    if let Some(arg) = argument {
        prompt.push_str(&format!(
            "The specific argument this card must support is: \"{}\".\n",
            arg.trim()
        ));
    }

    prompt.push_str(&format!(
        "\nHere is the source text:\n\"\"\"\n{}\n\"\"\"\n\n\
Please cut a card based on the arguments relevant to my side. \
Do NOT summarize; use real sentences and phrases from the source. \
Cut for maximum clarity and persuasiveness.",
        source_text
    ));

    prompt
}
