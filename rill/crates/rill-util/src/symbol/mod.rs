//! String interning for identifiers and keywords.
//!
//! [`Symbol`] is a compact (4-byte) handle to an interned string, giving O(1)
//! comparison and de-duplicated storage for the names that show up over and
//! over in a parsed program: keywords, variable names, map keys, function
//! names.
//!
//! ```
//! use rill_util::symbol::Symbol;
//!
//! let s1 = Symbol::intern("hello");
//! let s2 = Symbol::intern("hello");
//! assert_eq!(s1, s2);
//! assert_eq!(s1.as_str(), "hello");
//! ```

mod interner;

pub use interner::STRING_TABLE;

/// Profiling statistics for the global string interner.
#[derive(Clone, Copy, Debug, Default)]
pub struct InternerStats {
    pub count: usize,
    pub capacity: usize,
    pub collisions: usize,
    pub hits: usize,
    pub misses: usize,
}

impl InternerStats {
    pub const fn new(count: usize, capacity: usize, collisions: usize, hits: usize, misses: usize) -> Self {
        Self { count, capacity, collisions, hits, misses }
    }

    pub fn load_factor(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.count as f64 / self.capacity as f64
        }
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// An interned string identifier: a 4-byte handle into the global string
/// table, comparable in O(1).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    pub(crate) index: u32,
}

/// Symbols with index < this value are the language's reserved keywords,
/// pre-interned at startup so they have stable indices.
const RESERVED_SYMBOLS_END: u32 = 32;

pub const KW_AND: Symbol = Symbol { index: 0 };
pub const KW_OR: Symbol = Symbol { index: 1 };
pub const KW_NOT: Symbol = Symbol { index: 2 };
pub const KW_IF: Symbol = Symbol { index: 3 };
pub const KW_THEN: Symbol = Symbol { index: 4 };
pub const KW_ELIF: Symbol = Symbol { index: 5 };
pub const KW_ELSE: Symbol = Symbol { index: 6 };
pub const KW_FOR: Symbol = Symbol { index: 7 };
pub const KW_TO: Symbol = Symbol { index: 8 };
pub const KW_STEP: Symbol = Symbol { index: 9 };
pub const KW_WHILE: Symbol = Symbol { index: 10 };
pub const KW_FUN: Symbol = Symbol { index: 11 };
pub const KW_END: Symbol = Symbol { index: 12 };
pub const KW_RETURN: Symbol = Symbol { index: 13 };
pub const KW_BREAK: Symbol = Symbol { index: 14 };
pub const KW_CONTINUE: Symbol = Symbol { index: 15 };

/// All reserved keywords, in the same order as their `KW_*` constants.
pub const KEYWORDS: &[&str] = &[
    "and", "or", "not", "if", "then", "elif", "else", "for", "to", "step", "while", "fun", "end",
    "return", "break", "continue",
];

impl Symbol {
    pub const MAX_INDEX: u32 = u32::MAX;

    /// Intern a string, returning its symbol. O(1) amortized.
    #[inline]
    pub fn intern(string: &str) -> Self {
        STRING_TABLE.intern(string)
    }

    /// Get the string this symbol names. O(n) in the number of interned
    /// strings; avoid in hot loops, prefer `eq_str` for comparisons.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        STRING_TABLE.get(*self).unwrap_or("")
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    #[inline]
    pub fn eq_str(&self, other: &str) -> bool {
        self.as_str() == other
    }

    /// True for the language's sixteen reserved keywords.
    #[inline]
    pub fn is_known(&self) -> bool {
        self.index < RESERVED_SYMBOLS_END
    }

    #[inline]
    pub fn as_u32(&self) -> u32 {
        self.index
    }

    /// # Safety
    /// `index` must name a valid entry already present in the string table.
    #[inline]
    pub unsafe fn from_u32_unchecked(index: u32) -> Self {
        Self { index }
    }

    pub fn stats_struct() -> InternerStats {
        STRING_TABLE.stats()
    }

    /// Intern a keyword, returning its predefined symbol if `string` is one
    /// of the language's reserved words, else intern it as an ordinary
    /// identifier.
    #[inline]
    pub fn intern_keyword(string: &str) -> Self {
        match string {
            "and" => KW_AND,
            "or" => KW_OR,
            "not" => KW_NOT,
            "if" => KW_IF,
            "then" => KW_THEN,
            "elif" => KW_ELIF,
            "else" => KW_ELSE,
            "for" => KW_FOR,
            "to" => KW_TO,
            "step" => KW_STEP,
            "while" => KW_WHILE,
            "fun" => KW_FUN,
            "end" => KW_END,
            "return" => KW_RETURN,
            "break" => KW_BREAK,
            "continue" => KW_CONTINUE,
            _ => Self::intern(string),
        }
    }

    /// `true` if `string` names one of the language's reserved keywords.
    #[inline]
    pub fn is_keyword(string: &str) -> bool {
        KEYWORDS.contains(&string)
    }
}

impl std::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({})", self.as_str())
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static_assertions::assert_impl_all!(Symbol: Send, Sync);
