use unicode_segmentation::UnicodeSegmentation;

/// Separator hierarchy for markdown documents, coarsest first: headings,
/// fenced code, horizontal rules, paragraphs, lines, words, characters.
const MARKDOWN_SEPARATORS: &[&str] = &[
    "\n# ", "\n## ", "\n### ", "\n#### ", "\n##### ", "\n###### ",
    "```\n",
    "\n***\n", "\n---\n", "\n___\n",
    "\n\n", "\n", " ", "",
];

/// Recursive character splitter for markdown text.
///
/// Splits on the coarsest separator present, recursing into finer ones for
/// pieces that are still too large, then merges adjacent pieces back into
/// chunks of at most `chunk_size` graphemes with `chunk_overlap` graphemes
/// carried over between consecutive chunks.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

fn text_len(s: &str) -> usize {
    s.graphemes(true).count()
}

impl TextSplitter {
    /// `chunk_overlap` must be smaller than `chunk_size`; config validation
    /// enforces this before construction.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return vec![];
        }
        self.split_with(text, MARKDOWN_SEPARATORS)
    }

    fn split_with(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let position = separators
            .iter()
            .position(|sep| !sep.is_empty() && text.contains(sep))
            .unwrap_or(separators.len() - 1);
        let separator = separators[position];
        let finer = &separators[position + 1..];

        // The separator stays attached to the piece that follows it, so
        // structural markers (heading prefixes, rules) survive into chunks.
        let parts: Vec<String> = if separator.is_empty() {
            vec![text.to_string()]
        } else {
            split_keeping_separator(text, separator)
        };

        let mut chunks = Vec::new();
        let mut window: Vec<String> = Vec::new();

        for part in parts {
            if text_len(&part) <= self.chunk_size {
                window.push(part);
                continue;
            }

            // Oversized piece: flush what we have, then recurse into finer
            // separators (or hard-split at the character level).
            self.merge_into(&mut chunks, &window);
            window.clear();

            if finer.is_empty() {
                chunks.extend(self.split_fixed(&part));
            } else {
                chunks.extend(self.split_with(&part, finer));
            }
        }

        self.merge_into(&mut chunks, &window);
        chunks
    }

    /// Merge small pieces into chunks no longer than `chunk_size`, keeping a
    /// tail of previous pieces as overlap when a chunk boundary is emitted.
    /// Pieces carry their own separators, so concatenation reconstructs the
    /// original text.
    fn merge_into(&self, chunks: &mut Vec<String>, parts: &[String]) {
        let joined_len = |items: &[String]| -> usize { items.iter().map(|s| text_len(s)).sum() };

        let mut current: Vec<String> = Vec::new();
        for part in parts {
            let part_len = text_len(part);
            if !current.is_empty() && joined_len(&current) + part_len > self.chunk_size {
                push_chunk(chunks, &current.concat());
                while !current.is_empty()
                    && (joined_len(&current) > self.chunk_overlap
                        || joined_len(&current) + part_len > self.chunk_size)
                {
                    current.remove(0);
                }
            }
            current.push(part.clone());
        }

        if !current.is_empty() {
            push_chunk(chunks, &current.concat());
        }
    }

    /// Last resort for a run with no usable separator: fixed-size grapheme
    /// windows advancing by `chunk_size - chunk_overlap`.
    fn split_fixed(&self, text: &str) -> Vec<String> {
        let graphemes: Vec<&str> = text.graphemes(true).collect();
        let step = (self.chunk_size - self.chunk_overlap).max(1);

        let mut chunks = Vec::new();
        let mut start = 0;
        while start < graphemes.len() {
            let end = (start + self.chunk_size).min(graphemes.len());
            push_chunk(&mut chunks, &graphemes[start..end].concat());
            if end == graphemes.len() {
                break;
            }
            start += step;
        }
        chunks
    }
}

/// Split `text` on `separator`, prepending the separator to each piece that
/// followed it. Only a leading match produces an empty piece, which is
/// dropped.
fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    let mut parts = Vec::new();
    for (i, piece) in text.split(separator).enumerate() {
        if i == 0 {
            if !piece.is_empty() {
                parts.push(piece.to_string());
            }
        } else {
            parts.push(format!("{separator}{piece}"));
        }
    }
    parts
}

fn push_chunk(chunks: &mut Vec<String>, chunk: &str) {
    let trimmed = chunk.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}
