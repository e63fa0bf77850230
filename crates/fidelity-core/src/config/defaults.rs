// Single source of truth for all default values.

// --- Alignment ---
pub const DEFAULT_LOOKAHEAD_WINDOW: usize = 8;
pub const MAX_LOOKAHEAD_WINDOW: usize = 256;
/// 1.0 = any Missing token fails the check.
pub const DEFAULT_MIN_PRESERVATION_RATIO: f64 = 1.0;
pub const DEFAULT_EVIDENCE_CONTEXT_TOKENS: usize = 6;

// --- Quotes ---
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.85;
pub const DEFAULT_EVIDENCE_CONTEXT_CHARS: usize = 160;
pub const DEFAULT_GROUNDED_CLAIM_PASS_RATIO: f64 = 0.70;

// --- Refinement ---
pub const DEFAULT_TARGET_AGGREGATE: f64 = 4.5;
pub const DEFAULT_MAX_ITERATIONS: u32 = 5;
pub const DEFAULT_FEEDBACK_DIMENSIONS: usize = 2;
pub const DEFAULT_SCORE_MIN: f64 = 1.0;
pub const DEFAULT_SCORE_MAX: f64 = 5.0;

// --- Oracle retry ---
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_INITIAL_BACKOFF_MS: u64 = 500;
pub const DEFAULT_MAX_BACKOFF_MS: u64 = 8_000;
pub const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 60;

// --- Project layout ---
pub const DEFAULT_SOURCE_FILE: &str = "source.txt";
pub const DEFAULT_TRANSFORMED_FILE: &str = "formatted.md";
pub const DEFAULT_QUOTES_FILE: &str = "quotes.json";
pub const DEFAULT_DRAFT_FILE: &str = "abstract.md";
pub const DEFAULT_RUBRIC_FILE: &str = "rubric.json";
