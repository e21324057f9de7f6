use super::language::Tokenizer;

/// One sentence of a parsed document
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    /// Verbatim sentence text
    pub text: String,
    /// Raw word tokens in order
    pub words: Vec<String>,
    /// All-caps lines are kept as headings and never extracted
    pub is_heading: bool,
}

/// Plain-text document split into paragraphs of sentences
#[derive(Debug, Clone, Default)]
pub struct Document {
    paragraphs: Vec<Vec<Sentence>>,
}

impl Document {
    /// Parse plain text.
    ///
    /// Blank lines separate paragraphs. Inside a paragraph, consecutive lines are
    /// joined with a single space before sentence splitting, so hard-wrapped text
    /// (typical of PDF extraction) yields whole sentences.
    pub fn parse(text: &str, tokenizer: &dyn Tokenizer) -> Self {
        let mut paragraphs = Vec::new();
        let mut current: Vec<Line<'_>> = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if is_heading(line) {
                current.push(Line::Heading(line));
            } else if line.is_empty() {
                if !current.is_empty() {
                    paragraphs.push(to_sentences(&current, tokenizer));
                    current.clear();
                }
            } else {
                current.push(Line::Text(line));
            }
        }
        if !current.is_empty() {
            paragraphs.push(to_sentences(&current, tokenizer));
        }

        paragraphs.retain(|p: &Vec<Sentence>| !p.is_empty());
        Self { paragraphs }
    }

    /// Candidate sentences (headings excluded) in document order
    pub fn sentences(&self) -> Vec<&Sentence> {
        self.paragraphs
            .iter()
            .flatten()
            .filter(|s| !s.is_heading)
            .collect()
    }

    /// Every word in the document, headings included
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.paragraphs
            .iter()
            .flatten()
            .flat_map(|s| s.words.iter().map(String::as_str))
    }

    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }
}

enum Line<'a> {
    Text(&'a str),
    Heading(&'a str),
}

/// A line with at least one cased letter and no lower-case letters
fn is_heading(line: &str) -> bool {
    line.chars().any(char::is_uppercase) && !line.chars().any(char::is_lowercase)
}

fn to_sentences(lines: &[Line<'_>], tokenizer: &dyn Tokenizer) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let mut text = String::new();

    let flush = |text: &mut String, sentences: &mut Vec<Sentence>| {
        if text.trim().is_empty() {
            text.clear();
            return;
        }
        for sentence in tokenizer.sentences(text) {
            let words = tokenizer.words(&sentence);
            sentences.push(Sentence {
                text: sentence,
                words,
                is_heading: false,
            });
        }
        text.clear();
    };

    for line in lines {
        match line {
            Line::Heading(heading) => {
                flush(&mut text, &mut sentences);
                sentences.push(Sentence {
                    text: heading.to_string(),
                    words: tokenizer.words(heading),
                    is_heading: true,
                });
            }
            Line::Text(line) => {
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(line);
            }
        }
    }
    flush(&mut text, &mut sentences);

    sentences
}
