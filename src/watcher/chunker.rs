//! Content chunking for indexing.
//!
//! The strategy is picked once per file from its extension:
//! - code files split at structural lines (`def `, `class `, `function `, `{`)
//!   and are force-closed once a chunk grows past a line limit
//! - structured config files split at every unindented, non-comment line
//! - everything else is packed paragraph by paragraph up to a size threshold

/// Extensions chunked with the code strategy.
const CODE_EXTENSIONS: &[&str] = &[
    "rs", "py", "js", "ts", "jsx", "tsx", "go", "java", "c", "cpp", "cc", "h", "hpp", "cs", "rb",
    "php", "swift", "kt", "scala", "sh", "bash", "zsh", "sql", "nix", "lua", "pl", "xml", "html",
    "css", "scss", "vue", "svelte",
];

/// Extensions chunked with the structured-config strategy.
const CONFIG_EXTENSIONS: &[&str] = &["yaml", "yml", "toml", "json"];

/// Substrings that open a new code chunk.
const STRUCTURAL_SIGNALS: &[&str] = &["def ", "class ", "function ", "{"];

/// Chunk of a file's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Chunk content.
    pub content: String,
    /// Zero-based position within the file.
    pub index: usize,
    /// Number of chunks produced for the file.
    pub total_count: usize,
}

/// Chunking configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkerConfig {
    /// A code chunk holding more lines than this is closed.
    pub max_code_lines: usize,
    /// Generic text up to this many characters stays in one chunk.
    pub max_text_chars: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_code_lines: 50,
            max_text_chars: 2000,
        }
    }
}

/// Splitting strategy selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkStrategy {
    /// Programming and markup languages.
    Code,
    /// YAML, TOML and JSON.
    Config,
    /// Fallback for prose and unknown types.
    Text,
}

impl ChunkStrategy {
    /// Pick the strategy for an extension (case-insensitive, leading dot optional).
    #[must_use]
    pub fn for_extension(extension: &str) -> Self {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();

        if CONFIG_EXTENSIONS.contains(&ext.as_str()) {
            Self::Config
        } else if CODE_EXTENSIONS.contains(&ext.as_str()) {
            Self::Code
        } else {
            Self::Text
        }
    }

    /// Split content according to this strategy.
    #[must_use]
    pub fn split(self, content: &str, config: &ChunkerConfig) -> Vec<String> {
        match self {
            Self::Code => split_code(content, config.max_code_lines),
            Self::Config => split_config(content),
            Self::Text => split_text(content, config.max_text_chars),
        }
    }
}

/// Content chunker.
#[derive(Debug, Clone, Default)]
pub struct ContentChunker {
    config: ChunkerConfig,
}

impl ContentChunker {
    /// Create a new chunker with config.
    #[must_use]
    pub const fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    /// Create a chunker with default config.
    #[must_use]
    pub fn default_chunker() -> Self {
        Self::new(ChunkerConfig::default())
    }

    /// Split content into ordered chunk strings.
    ///
    /// Whitespace-only content yields no chunks.
    #[must_use]
    pub fn chunk(&self, content: &str, extension: &str) -> Vec<String> {
        if content.trim().is_empty() {
            return Vec::new();
        }
        ChunkStrategy::for_extension(extension).split(content, &self.config)
    }

    /// Split content into indexed [`Chunk`]s.
    #[must_use]
    pub fn chunks(&self, content: &str, extension: &str) -> Vec<Chunk> {
        let pieces = self.chunk(content, extension);
        let total_count = pieces.len();

        pieces
            .into_iter()
            .enumerate()
            .map(|(index, content)| Chunk {
                content,
                index,
                total_count,
            })
            .collect()
    }
}

/// Line buffer shared by the line-oriented strategies.
#[derive(Default)]
struct LineChunks<'a> {
    current: Vec<&'a str>,
    chunks: Vec<String>,
}

impl<'a> LineChunks<'a> {
    fn push(&mut self, line: &'a str) {
        self.current.push(line);
    }

    fn len(&self) -> usize {
        self.current.len()
    }

    /// Close the current chunk, dropping it if it holds only whitespace.
    fn close(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let chunk = self.current.join("\n");
        self.current.clear();
        if !chunk.trim().is_empty() {
            self.chunks.push(chunk);
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.close();
        self.chunks
    }
}

fn is_structural(trimmed: &str) -> bool {
    STRUCTURAL_SIGNALS.iter().any(|s| trimmed.contains(s))
}

fn split_code(content: &str, max_lines: usize) -> Vec<String> {
    let mut state = LineChunks::default();

    for line in content.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            state.push(line);
            continue;
        }

        if is_structural(trimmed) {
            state.close();
        }
        state.push(line);

        if state.len() > max_lines {
            state.close();
        }
    }

    state.finish()
}

fn split_config(content: &str) -> Vec<String> {
    let mut state = LineChunks::default();

    for line in content.lines() {
        let top_level =
            !line.trim().is_empty() && !line.starts_with(' ') && !line.starts_with('#');
        if top_level {
            state.close();
        }
        state.push(line);
    }

    state.finish()
}

fn split_text(content: &str, max_chars: usize) -> Vec<String> {
    if content.chars().count() <= max_chars {
        return vec![content.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for paragraph in paragraphs(content) {
        let paragraph_chars = paragraph.chars().count();

        if !current.is_empty() && current_chars + 2 + paragraph_chars > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }

        if !current.is_empty() {
            current.push_str("\n\n");
            current_chars += 2;
        }
        current.push_str(&paragraph);
        current_chars += paragraph_chars;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Blank-line separated paragraphs with their inner newlines kept.
fn paragraphs(content: &str) -> Vec<String> {
    let mut state = LineChunks::default();

    for line in content.lines() {
        if line.trim().is_empty() {
            state.close();
        } else {
            state.push(line);
        }
    }

    state.finish()
}
