/// Split report text into overlapping chunks for indexing.
///
/// Non-empty lines are packed into chunks of at most `chunk_size`
/// characters. Lines that are too long are split on whitespace, and a single
/// word longer than `chunk_size` becomes a chunk of its own. Each new chunk
/// starts with the trailing lines of the previous one that fit within
/// `chunk_overlap` characters.
pub fn chunk_document(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let chunk_size = chunk_size.max(1);
    let pieces = split_pieces(text, chunk_size);

    let mut chunks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_len = 0;

    for piece in pieces {
        let piece_len = char_len(&piece);
        let separator = usize::from(!current.is_empty());

        if !current.is_empty() && current_len + separator + piece_len > chunk_size {
            chunks.push(current.join("\n"));
            current = overlap_tail(&current, chunk_overlap, chunk_size, piece_len);
            current_len = joined_len(&current);
        }

        current_len += usize::from(!current.is_empty()) + piece_len;
        current.push(piece);
    }

    if !current.is_empty() {
        chunks.push(current.join("\n"));
    }

    chunks
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn joined_len(pieces: &[String]) -> usize {
    let chars: usize = pieces.iter().map(|piece| char_len(piece)).sum();
    chars + pieces.len().saturating_sub(1)
}

/// Non-empty trimmed lines, with over-long lines broken into word runs.
fn split_pieces(text: &str, chunk_size: usize) -> Vec<String> {
    let mut pieces = Vec::new();

    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if char_len(line) <= chunk_size {
            pieces.push(line.to_string());
            continue;
        }

        let mut run = String::new();
        for word in line.split_whitespace() {
            let needed = if run.is_empty() {
                char_len(word)
            } else {
                char_len(&run) + 1 + char_len(word)
            };

            if needed > chunk_size && !run.is_empty() {
                pieces.push(std::mem::take(&mut run));
            }
            if !run.is_empty() {
                run.push(' ');
            }
            run.push_str(word);
        }
        if !run.is_empty() {
            pieces.push(run);
        }
    }

    pieces
}

/// Trailing pieces of the finished chunk to repeat at the start of the next.
fn overlap_tail(
    previous: &[String],
    chunk_overlap: usize,
    chunk_size: usize,
    next_len: usize,
) -> Vec<String> {
    let mut tail: Vec<String> = Vec::new();
    let mut tail_len = 0;

    for piece in previous.iter().rev() {
        let candidate = tail_len + usize::from(!tail.is_empty()) + char_len(piece);
        if candidate > chunk_overlap || candidate + 1 + next_len > chunk_size {
            break;
        }
        tail_len = candidate;
        tail.insert(0, piece.clone());
    }

    tail
}
