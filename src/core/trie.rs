//! Multi-pattern matcher for dotted resource keys.
//!
//! An Aho-Corasick automaton with one twist: whitespace that directly follows a
//! `.` in the input is absorbed, so `Resources.  Strings.Title` still matches the
//! pattern `Resources.Strings.Title`. Whitespace *before* a dot is not tolerated.
//!
//! Nodes live in an arena and link to each other by index; the root is index 0.
//! The automaton must be compiled after all patterns are inserted and is
//! read-only afterwards, so one compiled trie can back many [`Matcher`]s.

use std::collections::{HashMap, VecDeque};

use crate::core::ScanError;

/// Index of an automaton state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId(usize);

impl StateId {
    pub const ROOT: StateId = StateId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// One automaton state.
#[derive(Debug, Default)]
pub struct TrieElement {
    successors: HashMap<char, StateId>,
    /// Failure link: longest proper suffix state. `None` only for the root.
    predecessor: Option<StateId>,
    /// Nearest terminal state along the failure chain.
    shortcut: Option<StateId>,
    word: Option<String>,
    /// Inbound transition consumed a `.`; whitespace may follow.
    after_dot: bool,
    depth: usize,
}

impl TrieElement {
    pub fn is_terminal(&self) -> bool {
        self.word.is_some()
    }

    pub fn word(&self) -> Option<&str> {
        self.word.as_deref()
    }

    pub fn predecessor(&self) -> Option<StateId> {
        self.predecessor
    }

    pub fn shortcut(&self) -> Option<StateId> {
        self.shortcut
    }

    pub fn successor(&self, c: char) -> Option<StateId> {
        self.successors.get(&c).copied()
    }

    pub fn allows_whitespace(&self) -> bool {
        self.after_dot
    }

    /// Number of characters on the path from the root.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// One occurrence of a pattern in a character stream.
///
/// `start` and `end` are `char` offsets into the stream, `end` exclusive. Absorbed
/// whitespace after a dot lies inside the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrieMatch<'t> {
    pub pattern: &'t str,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug)]
pub struct Trie {
    nodes: Vec<TrieElement>,
    patterns: usize,
    compiled: bool,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieElement::default()],
            patterns: 0,
            compiled: false,
        }
    }

    /// Build and compile a trie in one go.
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self, ScanError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = Self::new();
        for pattern in patterns {
            trie.insert(pattern.as_ref())?;
        }
        trie.compile()?;
        Ok(trie)
    }

    pub fn root(&self) -> StateId {
        StateId::ROOT
    }

    pub fn node(&self, id: StateId) -> &TrieElement {
        &self.nodes[id.0]
    }

    /// Number of distinct patterns.
    pub fn len(&self) -> usize {
        self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns == 0
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    /// Add a pattern and return its terminal state.
    ///
    /// Inserting the same pattern again returns the same state and changes nothing.
    pub fn insert(&mut self, pattern: &str) -> Result<StateId, ScanError> {
        if self.compiled {
            return Err(ScanError::AlreadyCompiled);
        }
        if pattern.is_empty() {
            return Err(ScanError::EmptyPattern);
        }

        let mut current = StateId::ROOT;
        for c in pattern.chars() {
            current = match self.nodes[current.0].successor(c) {
                Some(next) => next,
                None => {
                    let next = StateId(self.nodes.len());
                    let depth = self.nodes[current.0].depth + 1;
                    self.nodes.push(TrieElement {
                        depth,
                        ..Default::default()
                    });
                    self.nodes[current.0].successors.insert(c, next);
                    next
                }
            };
            if c == '.' {
                self.nodes[current.0].after_dot = true;
            }
        }

        let node = &mut self.nodes[current.0];
        if node.word.is_none() {
            node.word = Some(pattern.to_string());
            self.patterns += 1;
        }
        Ok(current)
    }

    /// Compute failure links and shortcuts. Must run exactly once, after the
    /// last insert and before the first step.
    pub fn compile(&mut self) -> Result<(), ScanError> {
        if self.compiled {
            return Err(ScanError::AlreadyCompiled);
        }

        let mut queue: VecDeque<StateId> = VecDeque::new();
        let first_level: Vec<StateId> = self.nodes[0].successors.values().copied().collect();
        for child in first_level {
            self.nodes[child.0].predecessor = Some(StateId::ROOT);
            queue.push_back(child);
        }

        // Breadth-first: every state shallower than the one being linked is
        // already complete, including its shortcut.
        while let Some(parent) = queue.pop_front() {
            let parent_predecessor = self.nodes[parent.0].predecessor.unwrap_or(StateId::ROOT);
            let edges: Vec<(char, StateId)> = self.nodes[parent.0]
                .successors
                .iter()
                .map(|(&c, &child)| (c, child))
                .collect();

            for (c, child) in edges {
                let predecessor = self.follow(parent_predecessor, c);
                let shortcut = if self.nodes[predecessor.0].is_terminal() {
                    Some(predecessor)
                } else {
                    self.nodes[predecessor.0].shortcut
                };
                let node = &mut self.nodes[child.0];
                node.predecessor = Some(predecessor);
                node.shortcut = shortcut;
                queue.push_back(child);
            }
        }

        self.compiled = true;
        Ok(())
    }

    /// Consume one character from `state`.
    pub fn step(&self, state: StateId, c: char) -> Result<StateId, ScanError> {
        if !self.compiled {
            return Err(ScanError::NotCompiled);
        }
        Ok(self.advance(state, c).0)
    }

    /// Patterns ending at `state`: its own word, then the shortcut chain.
    pub fn outputs(&self, state: StateId) -> Outputs<'_> {
        let node = self.node(state);
        let next = if node.is_terminal() {
            Some(state)
        } else {
            node.shortcut
        };
        Outputs { trie: self, next }
    }

    /// Every occurrence of every pattern in `text`, ordered by end offset.
    pub fn find_all(&self, text: &str) -> Result<Vec<TrieMatch<'_>>, ScanError> {
        let mut matcher = Matcher::new(self)?;
        let mut matches = Vec::new();
        for c in text.chars() {
            matcher.feed(c, &mut matches);
        }
        Ok(matches)
    }

    /// Returns the next state and whether `c` was absorbed as whitespace after a dot.
    fn advance(&self, state: StateId, c: char) -> (StateId, bool) {
        if self.nodes[state.0].after_dot && c.is_whitespace() {
            return (state, true);
        }
        (self.follow(state, c), false)
    }

    fn follow(&self, mut state: StateId, c: char) -> StateId {
        loop {
            let node = &self.nodes[state.0];
            if let Some(next) = node.successor(c) {
                return next;
            }
            match node.predecessor {
                Some(predecessor) if state != StateId::ROOT => state = predecessor,
                _ => return StateId::ROOT,
            }
        }
    }
}

/// Iterator over the patterns recognized at one state.
pub struct Outputs<'t> {
    trie: &'t Trie,
    next: Option<StateId>,
}

impl<'t> Iterator for Outputs<'t> {
    type Item = &'t str;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.trie.node(id);
        self.next = node.shortcut;
        node.word()
    }
}

/// Streaming cursor over a compiled trie.
///
/// Each matcher keeps its own state, so several can run over one trie at once.
pub struct Matcher<'t> {
    trie: &'t Trie,
    state: StateId,
    offset: usize,
    /// Offsets of recently consumed (not absorbed) characters, enough to
    /// recover the start of the longest pattern.
    consumed: VecDeque<usize>,
    window: usize,
}

impl<'t> Matcher<'t> {
    pub fn new(trie: &'t Trie) -> Result<Self, ScanError> {
        if !trie.is_compiled() {
            return Err(ScanError::NotCompiled);
        }
        let window = trie.nodes.iter().map(TrieElement::depth).max().unwrap_or(0);
        Ok(Self {
            trie,
            state: StateId::ROOT,
            offset: 0,
            consumed: VecDeque::with_capacity(window),
            window,
        })
    }

    pub fn state(&self) -> StateId {
        self.state
    }

    /// Characters fed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Feed one character and append the matches ending on it.
    pub fn feed(&mut self, c: char, matches: &mut Vec<TrieMatch<'t>>) {
        let (next, absorbed) = self.trie.advance(self.state, c);
        self.state = next;

        let offset = self.offset;
        self.offset += 1;
        if absorbed || self.window == 0 {
            return;
        }

        if self.consumed.len() == self.window {
            self.consumed.pop_front();
        }
        self.consumed.push_back(offset);

        let trie = self.trie;
        let mut id = if trie.node(next).is_terminal() {
            Some(next)
        } else {
            trie.node(next).shortcut
        };
        while let Some(current) = id {
            let node = trie.node(current);
            if let Some(pattern) = node.word() {
                let back = node.depth.min(self.consumed.len());
                let start = self.consumed[self.consumed.len() - back];
                matches.push(TrieMatch {
                    pattern,
                    start,
                    end: self.offset,
                });
            }
            id = node.shortcut;
        }
    }
}
